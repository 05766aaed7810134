//! Helpers shared by the integration tests.

use std::cell::RefCell;

/// Records what steps did, in order.
#[derive(Debug, Default)]
pub struct Journal(RefCell<Vec<String>>);

impl Journal {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.borrow_mut().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.borrow().clone()
    }
}
