//! Common test utilities for integration tests.

#![allow(dead_code)]

pub mod harness;

use slint_trace_editor::Changes;
use std::cell::RefCell;
use std::rc::Rc;

/// Records every change notification emitted by the controller.
#[derive(Default, Clone)]
pub struct ChangeTracker {
    pub changes: Rc<RefCell<Vec<Changes>>>,
}

impl ChangeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.changes.borrow().len()
    }

    pub fn graph_changes(&self) -> usize {
        self.changes.borrow().iter().filter(|c| c.graph).count()
    }

    pub fn view_changes(&self) -> usize {
        self.changes.borrow().iter().filter(|c| c.view).count()
    }

    pub fn last(&self) -> Option<Changes> {
        self.changes.borrow().last().copied()
    }

    /// Clear all recorded notifications.
    pub fn clear(&self) {
        self.changes.borrow_mut().clear();
    }
}
