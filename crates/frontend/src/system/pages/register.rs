use contracts::shared::FieldErrors;
use contracts::system::auth::{RegisterForm, UserRole};
use leptos::prelude::*;
use leptos::task::spawn_local;

use super::login::split_auth_error;
use crate::shared::components::ui::{SelectField, TextField};
use crate::system::auth::use_session;

fn role_options() -> Vec<(String, String)> {
    UserRole::ALL
        .iter()
        .map(|r| (r.code().to_string(), r.label().to_string()))
        .collect()
}

#[component]
pub fn RegisterPage(on_login: Callback<()>) -> impl IntoView {
    let session = use_session();
    let form = RwSignal::new(RegisterForm::default());
    let errors = RwSignal::new(FieldErrors::new());
    let error_message = RwSignal::new(Option::<String>::None);
    let is_loading = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if is_loading.get_untracked() {
            return;
        }

        let data = form.get_untracked();
        is_loading.set(true);
        error_message.set(None);

        spawn_local(async move {
            match session.register(data).await {
                Ok(()) => errors.set(FieldErrors::new()),
                Err(e) => {
                    log::warn!("register failed: {:?}", e);
                    let (fields, banner) = split_auth_error(&e);
                    errors.set(fields);
                    error_message.set(banner);
                }
            }
            is_loading.set(false);
        });
    };

    let field_error = move |name: &'static str| {
        Signal::derive(move || errors.with(|e| e.get(name).map(str::to_string)))
    };
    let text = move |read: fn(&RegisterForm) -> &String| {
        Signal::derive(move || form.with(|f| read(f).clone()))
    };

    view! {
        <div class="login-container">
            <div class="login-box">
                <h1>"Tricol"</h1>
                <h2>"Créer un compte"</h2>

                <Show when=move || error_message.get().is_some()>
                    <div class="error-message">
                        {move || error_message.get().unwrap_or_default()}
                    </div>
                </Show>

                <form on:submit=on_submit>
                    <TextField
                        label="Nom d'utilisateur"
                        value=text(|f| &f.username)
                        on_input=Callback::new(move |v| form.update(|f| f.username = v))
                        error=field_error(RegisterForm::USERNAME.name)
                    />
                    <TextField
                        label="Email"
                        input_type="email".to_string()
                        value=text(|f| &f.email)
                        on_input=Callback::new(move |v| form.update(|f| f.email = v))
                        error=field_error(RegisterForm::EMAIL.name)
                    />
                    <div class="form__row">
                        <TextField
                            label="Prénom"
                            value=text(|f| &f.first_name)
                            on_input=Callback::new(move |v| form.update(|f| f.first_name = v))
                            error=field_error(RegisterForm::FIRST_NAME.name)
                        />
                        <TextField
                            label="Nom"
                            value=text(|f| &f.last_name)
                            on_input=Callback::new(move |v| form.update(|f| f.last_name = v))
                            error=field_error(RegisterForm::LAST_NAME.name)
                        />
                    </div>
                    <TextField
                        label="Mot de passe"
                        input_type="password".to_string()
                        value=text(|f| &f.password)
                        on_input=Callback::new(move |v| form.update(|f| f.password = v))
                        error=field_error(RegisterForm::PASSWORD.name)
                    />
                    <TextField
                        label="Confirmer le mot de passe"
                        input_type="password".to_string()
                        value=text(|f| &f.confirm_password)
                        on_input=Callback::new(move |v| form.update(|f| f.confirm_password = v))
                        error=field_error(RegisterForm::CONFIRM_PASSWORD.name)
                    />
                    <SelectField
                        label="Rôle"
                        value=Signal::derive(move || form.with(|f| f.role.code().to_string()))
                        options=Signal::derive(role_options)
                        on_change=Callback::new(move |code: String| {
                            if let Some(role) = UserRole::from_code(&code) {
                                form.update(|f| f.role = role);
                            }
                        })
                    />

                    <button
                        type="submit"
                        class="btn-primary"
                        disabled=move || is_loading.get()
                    >
                        {move || if is_loading.get() { "Inscription..." } else { "S'inscrire" }}
                    </button>
                </form>

                <div class="login-info">
                    <span>"Déjà inscrit ? "</span>
                    <a href="#" on:click=move |ev| {
                        ev.prevent_default();
                        on_login.run(());
                    }>"Se connecter"</a>
                </div>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_options_cover_every_role() {
        let options = role_options();
        assert_eq!(options.len(), 4);
        assert_eq!(options[2], ("WAREHOUSE_KEEPER".to_string(), "Magasinier".to_string()));
    }
}
