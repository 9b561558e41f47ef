use contracts::shared::FieldErrors;
use contracts::system::auth::LoginRequest;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::shared::components::ui::TextField;
use crate::system::auth::{use_session, AuthError};

/// Splits an auth failure into field markers and a banner text
pub(crate) fn split_auth_error(error: &AuthError) -> (FieldErrors, Option<String>) {
    match error {
        AuthError::Invalid(fields) => (fields.clone(), None),
        other => (
            other.field_errors().cloned().unwrap_or_default(),
            Some(other.to_string()),
        ),
    }
}

#[component]
pub fn LoginPage(on_register: Callback<()>) -> impl IntoView {
    let session = use_session();
    let form = RwSignal::new(LoginRequest::default());
    let errors = RwSignal::new(FieldErrors::new());
    let error_message = RwSignal::new(Option::<String>::None);
    let is_loading = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if is_loading.get_untracked() {
            return;
        }

        let credentials = form.get_untracked();
        is_loading.set(true);
        error_message.set(None);

        spawn_local(async move {
            // A successful login flips the session and the router swaps pages
            if let Err(e) = session.login(credentials).await {
                log::warn!("login failed: {:?}", e);
                let (fields, banner) = split_auth_error(&e);
                errors.set(fields);
                error_message.set(banner);
            }
            is_loading.set(false);
        });
    };

    let field_error = move |name: &'static str| Signal::derive(move || errors.with(|e| e.get(name).map(str::to_string)));

    view! {
        <div class="login-container">
            <div class="login-box">
                <h1>"Tricol"</h1>
                <h2>"Connexion"</h2>

                <Show when=move || error_message.get().is_some()>
                    <div class="error-message">
                        {move || error_message.get().unwrap_or_default()}
                    </div>
                </Show>

                <form on:submit=on_submit>
                    <TextField
                        label="Nom d'utilisateur"
                        value=Signal::derive(move || form.with(|f| f.username.clone()))
                        on_input=Callback::new(move |v| form.update(|f| f.username = v))
                        error=field_error(LoginRequest::USERNAME.name)
                        disabled=is_loading
                    />
                    <TextField
                        label="Mot de passe"
                        input_type="password".to_string()
                        value=Signal::derive(move || form.with(|f| f.password.clone()))
                        on_input=Callback::new(move |v| form.update(|f| f.password = v))
                        error=field_error(LoginRequest::PASSWORD.name)
                        disabled=is_loading
                    />

                    <button
                        type="submit"
                        class="btn-primary"
                        disabled=move || is_loading.get()
                    >
                        {move || if is_loading.get() { "Connexion..." } else { "Se connecter" }}
                    </button>
                </form>

                <div class="login-info">
                    <span>"Pas encore de compte ? "</span>
                    <a href="#" on:click=move |ev| {
                        ev.prevent_default();
                        on_register.run(());
                    }>"Créer un compte"</a>
                </div>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::http::ApiError;

    #[test]
    fn test_split_auth_error() {
        let mut fields = FieldErrors::new();
        fields.insert("username", "Nom d'utilisateur est obligatoire");
        let (markers, banner) = split_auth_error(&AuthError::Invalid(fields.clone()));
        assert_eq!(markers, fields);
        assert!(banner.is_none());

        let (markers, banner) =
            split_auth_error(&AuthError::Api(ApiError::from_status(401, r#"{"message":"Identifiants invalides"}"#)));
        assert!(markers.is_empty());
        assert_eq!(banner.as_deref(), Some("Identifiants invalides"));
    }
}
