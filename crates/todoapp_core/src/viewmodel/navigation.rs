//! Navigation requests emitted by view-models.

use crate::model::task::TaskId;
use std::cell::RefCell;

/// Outcome reported back to the screen that opened another one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenResult {
    TaskSaved,
    TaskDeleted,
    Cancelled,
}

/// Screen transition requested by a view-model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    AddTask,
    TaskDetails(TaskId),
    EditTask(TaskId),
    /// Close the current screen and report `ScreenResult` to the caller.
    Back(ScreenResult),
}

/// Host-side router for screen transitions.
pub trait Navigator {
    fn navigate(&self, destination: Destination);
}

impl<N: Navigator + ?Sized> Navigator for &N {
    fn navigate(&self, destination: Destination) {
        (**self).navigate(destination)
    }
}

/// Navigator that queues requests for hosts that route after the call
/// returns (FFI, CLI).
#[derive(Debug, Default)]
pub struct PendingNavigator {
    pending: RefCell<Vec<Destination>>,
}

impl PendingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns queued destinations in request order.
    pub fn take(&self) -> Vec<Destination> {
        std::mem::take(&mut *self.pending.borrow_mut())
    }

    pub fn last(&self) -> Option<Destination> {
        self.pending.borrow().last().cloned()
    }
}

impl Navigator for PendingNavigator {
    fn navigate(&self, destination: Destination) {
        log::debug!("event=navigate module=viewmodel destination={destination:?}");
        self.pending.borrow_mut().push(destination);
    }
}
