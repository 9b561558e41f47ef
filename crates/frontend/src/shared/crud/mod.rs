//! Generic list + form workflow shared by every entity screen
//!
//! A screen plugs a remote resource, a form model and its messages into
//! [`CrudController`]; the controller owns the fetch → table → form →
//! submit → refetch cycle.

pub mod controller;
pub mod signals;
pub mod state;

use async_trait::async_trait;
use contracts::domain::common::RowId;
use contracts::shared::FieldErrors;

use crate::shared::http::ApiError;

pub use controller::{load_list, reload_list, ActionMessages, CrudController, ScreenMessages};
pub use state::{CrudState, FormMode, FormState, HasList, ListPhase, ListState, ScreenPhase};

/// Values edited in a screen's form
pub trait FormModel: Clone + Default {
    type Row;

    /// Prefill for editing an existing row
    fn from_row(row: &Self::Row) -> Self;

    fn validate(&self) -> FieldErrors;
}

#[async_trait(?Send)]
pub trait ListResource {
    type Row;

    async fn list(&self) -> Result<Vec<Self::Row>, ApiError>;
}

#[async_trait(?Send)]
pub trait SubmitResource<F> {
    /// Create or update, depending on `mode`
    async fn submit(&self, mode: FormMode, form: &F) -> Result<(), ApiError>;
}

#[async_trait(?Send)]
pub trait DeleteResource {
    async fn delete(&self, id: RowId) -> Result<(), ApiError>;
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::collections::VecDeque;
    use std::rc::Rc;

    /// In-memory resource that records calls and replays queued answers
    pub struct FakeResource<T, F> {
        pub lists: RefCell<VecDeque<Result<Vec<T>, ApiError>>>,
        pub list_calls: Cell<usize>,
        pub submits: RefCell<Vec<(FormMode, F)>>,
        pub submit_result: RefCell<Result<(), ApiError>>,
        pub deletes: RefCell<Vec<RowId>>,
        pub delete_result: RefCell<Result<(), ApiError>>,
    }

    impl<T, F> FakeResource<T, F> {
        pub fn new() -> Rc<Self> {
            Rc::new(Self {
                lists: RefCell::new(VecDeque::new()),
                list_calls: Cell::new(0),
                submits: RefCell::new(Vec::new()),
                submit_result: RefCell::new(Ok(())),
                deletes: RefCell::new(Vec::new()),
                delete_result: RefCell::new(Ok(())),
            })
        }

        pub fn queue_list(&self, result: Result<Vec<T>, ApiError>) {
            self.lists.borrow_mut().push_back(result);
        }
    }

    #[async_trait(?Send)]
    impl<T, F> ListResource for Rc<FakeResource<T, F>> {
        type Row = T;

        async fn list(&self) -> Result<Vec<T>, ApiError> {
            self.list_calls.set(self.list_calls.get() + 1);
            self.lists.borrow_mut().pop_front().unwrap_or(Ok(Vec::new()))
        }
    }

    #[async_trait(?Send)]
    impl<T, F: Clone> SubmitResource<F> for Rc<FakeResource<T, F>> {
        async fn submit(&self, mode: FormMode, form: &F) -> Result<(), ApiError> {
            self.submits.borrow_mut().push((mode, form.clone()));
            self.submit_result.borrow().clone()
        }
    }

    #[async_trait(?Send)]
    impl<T, F> DeleteResource for Rc<FakeResource<T, F>> {
        async fn delete(&self, id: RowId) -> Result<(), ApiError> {
            self.deletes.borrow_mut().push(id);
            self.delete_result.borrow().clone()
        }
    }
}
