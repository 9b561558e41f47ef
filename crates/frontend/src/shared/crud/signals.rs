//! Derived signals over a screen's [`CrudState`], for binding form inputs

use leptos::prelude::*;

use super::state::CrudState;

pub type ScreenState<T, F> = RwSignal<CrudState<T, F>>;

pub fn rows<T, F>(state: ScreenState<T, F>) -> Signal<Vec<T>>
where
    T: Clone + Send + Sync + 'static,
    F: Send + Sync + 'static,
{
    Signal::derive(move || state.with(|s| s.list.rows.clone()))
}

pub fn loading<T, F>(state: ScreenState<T, F>) -> Signal<bool>
where
    T: Send + Sync + 'static,
    F: Send + Sync + 'static,
{
    Signal::derive(move || state.with(|s| s.list.is_loading()))
}

pub fn text<T, F>(state: ScreenState<T, F>, read: fn(&F) -> &String) -> Signal<String>
where
    T: Send + Sync + 'static,
    F: Send + Sync + 'static,
{
    Signal::derive(move || {
        state.with(|s| s.form_values().map(|f| read(f).clone()).unwrap_or_default())
    })
}

pub fn number<T, F>(state: ScreenState<T, F>, read: fn(&F) -> Option<f64>) -> Signal<Option<f64>>
where
    T: Send + Sync + 'static,
    F: Send + Sync + 'static,
{
    Signal::derive(move || state.with(|s| s.form_values().and_then(read)))
}

/// Marker of one field, visible once the form has been submitted
pub fn error<T, F>(state: ScreenState<T, F>, field: impl Into<String>) -> Signal<Option<String>>
where
    T: Send + Sync + 'static,
    F: Send + Sync + 'static,
{
    let field = field.into();
    Signal::derive(move || {
        state.with(|s| s.form.as_ref().and_then(|f| f.visible_error(&field)))
    })
}

pub fn title<T, F>(
    state: ScreenState<T, F>,
    create: &'static str,
    edit: &'static str,
) -> Signal<String>
where
    T: Send + Sync + 'static,
    F: Send + Sync + 'static,
{
    Signal::derive(move || {
        let is_edit = state.with(|s| s.form.as_ref().is_some_and(|f| f.is_edit()));
        if is_edit { edit } else { create }.to_string()
    })
}

pub fn submitting<T, F>(state: ScreenState<T, F>) -> Signal<bool>
where
    T: Send + Sync + 'static,
    F: Send + Sync + 'static,
{
    Signal::derive(move || state.with(|s| s.form.as_ref().is_some_and(|f| f.is_submitting)))
}

pub fn submit_error<T, F>(state: ScreenState<T, F>) -> Signal<Option<String>>
where
    T: Send + Sync + 'static,
    F: Send + Sync + 'static,
{
    Signal::derive(move || {
        state.with(|s| s.form.as_ref().and_then(|f| f.submit_error.clone()))
    })
}
