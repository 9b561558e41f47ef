//! Labelled form inputs with inline error markers

use leptos::prelude::*;

/// Number typed in an input; `None` while the text is not a finite number.
/// A decimal comma is accepted.
pub fn parse_number(raw: &str) -> Option<f64> {
    let normalized = raw.trim().replace(',', ".");
    if normalized.is_empty() {
        return None;
    }
    normalized.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Select value of an optional id; empty string for none
pub fn id_option_value(id: Option<i64>) -> String {
    id.map(|id| id.to_string()).unwrap_or_default()
}

pub fn parse_id(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}

fn input_class(base: &str, invalid: bool) -> String {
    if invalid {
        format!("{} form__input--invalid", base)
    } else {
        base.to_string()
    }
}

#[component]
fn FieldError(#[prop(into)] error: Signal<Option<String>>) -> impl IntoView {
    move || {
        error
            .get()
            .map(|message| view! { <div class="form__error">{message}</div> })
    }
}

#[component]
pub fn TextField(
    #[prop(into)] label: String,
    #[prop(into)] value: Signal<String>,
    on_input: Callback<String>,
    #[prop(optional, into)] error: Signal<Option<String>>,
    /// "text" (default), "email", "password", "date", ...
    #[prop(optional, into)]
    input_type: MaybeProp<String>,
    #[prop(optional, into)] placeholder: MaybeProp<String>,
    #[prop(optional, into)] disabled: Signal<bool>,
) -> impl IntoView {
    let input_t = move || input_type.get().unwrap_or_else(|| "text".to_string());
    let invalid = move || error.with(Option::is_some);

    view! {
        <div class="form__group">
            <label class="form__label">{label}</label>
            <input
                class=move || input_class("form__input", invalid())
                type=input_t
                placeholder=move || placeholder.get().unwrap_or_default()
                prop:value=move || value.get()
                disabled=move || disabled.get()
                on:input=move |ev| on_input.run(event_target_value(&ev))
            />
            <FieldError error=error />
        </div>
    }
}

#[component]
pub fn NumberField(
    #[prop(into)] label: String,
    #[prop(into)] value: Signal<Option<f64>>,
    on_input: Callback<Option<f64>>,
    #[prop(optional, into)] error: Signal<Option<String>>,
    #[prop(optional, into)] step: MaybeProp<String>,
) -> impl IntoView {
    let invalid = move || error.with(Option::is_some);

    view! {
        <div class="form__group">
            <label class="form__label">{label}</label>
            <input
                class=move || input_class("form__input", invalid())
                type="number"
                step=move || step.get().unwrap_or_else(|| "any".to_string())
                prop:value=move || value.get().map(|n| n.to_string()).unwrap_or_default()
                on:input=move |ev| on_input.run(parse_number(&event_target_value(&ev)))
            />
            <FieldError error=error />
        </div>
    }
}

#[component]
pub fn TextAreaField(
    #[prop(into)] label: String,
    #[prop(into)] value: Signal<String>,
    on_input: Callback<String>,
    #[prop(optional, into)] error: Signal<Option<String>>,
) -> impl IntoView {
    view! {
        <div class="form__group">
            <label class="form__label">{label}</label>
            <textarea
                class="form__textarea"
                prop:value=move || value.get()
                on:input=move |ev| on_input.run(event_target_value(&ev))
            />
            <FieldError error=error />
        </div>
    }
}

/// Select over `(value, label)` pairs with an empty first choice
#[component]
pub fn SelectField(
    #[prop(into)] label: String,
    #[prop(into)] value: Signal<String>,
    #[prop(into)] options: Signal<Vec<(String, String)>>,
    on_change: Callback<String>,
    #[prop(optional, into)] error: Signal<Option<String>>,
) -> impl IntoView {
    let invalid = move || error.with(Option::is_some);

    view! {
        <div class="form__group">
            <label class="form__label">{label}</label>
            <select
                class=move || input_class("form__select", invalid())
                on:change=move |ev| on_change.run(event_target_value(&ev))
            >
                <option value="" selected=move || value.with(String::is_empty)>
                    "-- Sélectionner --"
                </option>
                <For
                    each=move || options.get()
                    key=|(val, _)| val.clone()
                    children=move |(val, text)| {
                        let current = val.clone();
                        let is_selected = move || value.with(|v| *v == current);
                        view! { <option value=val selected=is_selected>{text}</option> }
                    }
                />
            </select>
            <FieldError error=error />
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("12.5"), Some(12.5));
        assert_eq!(parse_number(" 3,25 "), Some(3.25));
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number("inf"), None);
    }

    #[test]
    fn test_id_round_trip_through_select() {
        assert_eq!(id_option_value(None), "");
        assert_eq!(parse_id(&id_option_value(Some(7))), Some(7));
        assert_eq!(parse_id(""), None);
    }
}
