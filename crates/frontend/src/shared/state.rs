//! Screen state cells
//!
//! Controllers mutate screen state through [`StateCell`]. In the browser the
//! cell is a Leptos `RwSignal`, so every write notifies the view; under test
//! it is a plain `Rc<RefCell<_>>`.

use leptos::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

pub trait StateCell<T> {
    /// Read without subscribing the caller to changes
    fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R;
    fn write(&self, f: impl FnOnce(&mut T));
}

impl<T: Send + Sync + 'static> StateCell<T> for RwSignal<T> {
    fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.with_untracked(f)
    }

    fn write(&self, f: impl FnOnce(&mut T)) {
        self.update(f);
    }
}

impl<T> StateCell<T> for Rc<RefCell<T>> {
    fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.borrow())
    }

    fn write(&self, f: impl FnOnce(&mut T)) {
        f(&mut self.borrow_mut());
    }
}
