use leptos::ev;
use leptos::prelude::*;

use super::ui::{Button, ButtonVariant};

/// Modal form frame: title, body, cancel and submit buttons.
///
/// Clicking the overlay closes it; clicks inside the frame do not reach the
/// overlay.
#[component]
pub fn FormModal(
    #[prop(into)] title: Signal<String>,
    on_close: Callback<()>,
    on_submit: Callback<()>,
    #[prop(optional, into)] submitting: Signal<bool>,
    #[prop(optional, into)] submit_label: MaybeProp<String>,
    /// Error returned by the last submission
    #[prop(optional, into)]
    error: Signal<Option<String>>,
    children: Children,
) -> impl IntoView {
    let stop_propagation = move |ev: ev::MouseEvent| ev.stop_propagation();
    let handle_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        on_submit.run(());
    };
    let label = move || {
        if submitting.get() {
            "Enregistrement...".to_string()
        } else {
            submit_label.get().unwrap_or_else(|| "Enregistrer".to_string())
        }
    };

    view! {
        <div class="modal-overlay" on:click=move |_| on_close.run(())>
            <div class="modal" on:click=stop_propagation>
                <div class="modal-header">
                    <h2 class="modal-title">{move || title.get()}</h2>
                    <button
                        type="button"
                        class="button button--icon modal__close"
                        on:click=move |_| on_close.run(())
                    >
                        "×"
                    </button>
                </div>
                <form class="modal-body" on:submit=handle_submit>
                    {move || error.get().map(|e| view! { <div class="form__submit-error">{e}</div> })}
                    {children()}
                    <div class="modal-footer">
                        <Button
                            variant=ButtonVariant::Secondary
                            on_click=Callback::new(move |_| on_close.run(()))
                        >
                            "Annuler"
                        </Button>
                        <Button button_type="submit".to_string() disabled=submitting>
                            {label}
                        </Button>
                    </div>
                </form>
            </div>
        </div>
    }
}
