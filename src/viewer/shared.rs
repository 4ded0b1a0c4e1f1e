//! Shared handle for a view driven from toolkit callbacks.
//!
//! Cell callbacks run while the view is mutably borrowed and may call back
//! into the same handle. Borrows are checked and report [`GridError::Busy`]
//! instead of panicking.

use std::cell::{Ref, RefCell, RefMut};
use std::rc::{Rc, Weak};

use crate::error::{GridError, Result};

pub struct SharedView<T> {
    inner: Rc<RefCell<T>>,
}

impl<T> SharedView<T> {
    pub fn new(view: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(view)),
        }
    }

    /// # Errors
    /// Returns [`GridError::Busy`] while the view is being updated.
    pub fn read(&self) -> Result<Ref<'_, T>> {
        self.inner.try_borrow().map_err(|_| GridError::Busy)
    }

    /// # Errors
    /// Returns [`GridError::Busy`] while the view is read or updated.
    pub fn write(&self) -> Result<RefMut<'_, T>> {
        self.inner.try_borrow_mut().map_err(|_| GridError::Busy)
    }

    /// Handle for event listeners that must not keep the view alive
    pub fn downgrade(&self) -> WeakView<T> {
        WeakView {
            inner: Rc::downgrade(&self.inner),
        }
    }
}

impl<T> Clone for SharedView<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

pub struct WeakView<T> {
    inner: Weak<RefCell<T>>,
}

impl<T> WeakView<T> {
    pub fn upgrade(&self) -> Option<SharedView<T>> {
        self.inner.upgrade().map(|inner| SharedView { inner })
    }
}
