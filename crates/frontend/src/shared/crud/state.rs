use contracts::domain::common::{Identified, RowId};
use contracts::shared::FieldErrors;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListPhase {
    #[default]
    Idle,
    Loading,
    Loaded,
    LoadError,
}

/// Rows of one remote collection; replaced wholesale on every load
#[derive(Debug, Clone, PartialEq)]
pub struct ListState<T> {
    pub rows: Vec<T>,
    pub phase: ListPhase,
    pub last_error: Option<String>,
    /// Bumped by every load; only the latest load may write its result
    pub generation: u64,
}

impl<T> Default for ListState<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            phase: ListPhase::Idle,
            last_error: None,
            generation: 0,
        }
    }
}

impl<T> ListState<T> {
    pub fn is_loading(&self) -> bool {
        self.phase == ListPhase::Loading
    }

    /// Never requested
    pub fn is_idle(&self) -> bool {
        self.phase == ListPhase::Idle
    }
}

impl<T: Identified> ListState<T> {
    pub fn find(&self, id: RowId) -> Option<&T> {
        self.rows.iter().find(|row| row.row_id() == id)
    }
}

/// States holding one or more lists, addressed by row type
pub trait HasList<T> {
    fn list(&self) -> &ListState<T>;
    fn list_mut(&mut self) -> &mut ListState<T>;
}

impl<T> HasList<T> for ListState<T> {
    fn list(&self) -> &ListState<T> {
        self
    }

    fn list_mut(&mut self) -> &mut ListState<T> {
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    /// Identity of the edited row, kept apart from the form values
    Edit(RowId),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormState<F> {
    pub mode: FormMode,
    pub values: F,
    pub errors: FieldErrors,
    /// Set by the first submit attempt; markers are shown from then on
    pub touched: bool,
    pub is_submitting: bool,
    pub submit_error: Option<String>,
}

impl<F> FormState<F> {
    pub fn new(mode: FormMode, values: F) -> Self {
        Self {
            mode,
            values,
            errors: FieldErrors::new(),
            touched: false,
            is_submitting: false,
            submit_error: None,
        }
    }

    /// Marker for a field, once the form has been touched
    pub fn visible_error(&self, field: &str) -> Option<String> {
        if self.touched {
            self.errors.get(field).map(str::to_string)
        } else {
            None
        }
    }

    pub fn is_edit(&self) -> bool {
        matches!(self.mode, FormMode::Edit(_))
    }
}

/// Everything a CRUD screen displays
#[derive(Debug, Clone, PartialEq)]
pub struct CrudState<T, F> {
    pub list: ListState<T>,
    pub form: Option<FormState<F>>,
}

impl<T, F> Default for CrudState<T, F> {
    fn default() -> Self {
        Self {
            list: ListState::default(),
            form: None,
        }
    }
}

impl<T, F> HasList<T> for CrudState<T, F> {
    fn list(&self) -> &ListState<T> {
        &self.list
    }

    fn list_mut(&mut self) -> &mut ListState<T> {
        &mut self.list
    }
}

/// Observable phase of a CRUD screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenPhase {
    Idle,
    Loading,
    Loaded,
    LoadError,
    FormOpen(FormMode),
    Submitting,
}

impl<T, F> CrudState<T, F> {
    pub fn phase(&self) -> ScreenPhase {
        match &self.form {
            Some(form) if form.is_submitting => ScreenPhase::Submitting,
            Some(form) => ScreenPhase::FormOpen(form.mode),
            None => match self.list.phase {
                ListPhase::Idle => ScreenPhase::Idle,
                ListPhase::Loading => ScreenPhase::Loading,
                ListPhase::Loaded => ScreenPhase::Loaded,
                ListPhase::LoadError => ScreenPhase::LoadError,
            },
        }
    }

    pub fn form_values(&self) -> Option<&F> {
        self.form.as_ref().map(|f| &f.values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_follows_form_then_list() {
        let mut state: CrudState<u8, String> = CrudState::default();
        assert_eq!(state.phase(), ScreenPhase::Idle);

        state.list.phase = ListPhase::Loaded;
        assert_eq!(state.phase(), ScreenPhase::Loaded);

        state.form = Some(FormState::new(FormMode::Edit(4), String::new()));
        assert_eq!(state.phase(), ScreenPhase::FormOpen(FormMode::Edit(4)));

        if let Some(form) = state.form.as_mut() {
            form.is_submitting = true;
        }
        assert_eq!(state.phase(), ScreenPhase::Submitting);
    }

    #[test]
    fn test_markers_hidden_until_touched() {
        let mut form = FormState::new(FormMode::Create, ());
        form.errors.insert("nom", "Nom est obligatoire");
        assert!(form.visible_error("nom").is_none());
        form.touched = true;
        assert_eq!(form.visible_error("nom").as_deref(), Some("Nom est obligatoire"));
    }
}
