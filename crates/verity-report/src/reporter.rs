use std::io;
use std::sync::Arc;

use crate::case::{LifecycleEvent, TestCaseView};

/// Sink for lifecycle events, shared by every concurrently running test.
///
/// `report` is called once per transition and never fails the caller; sink
/// errors are logged. Output of a single `report` or `write` call is never
/// interleaved with another call's output.
pub trait Reporter: Send + Sync {
    fn report(&self, event: LifecycleEvent, case: &dyn TestCaseView);

    /// Ad hoc output outside any lifecycle event.
    fn write(&self, content: &[u8]) -> io::Result<usize>;

    /// True when every event is rendered as a discrete record as it happens.
    fn stream(&self) -> bool;
}

impl<R: Reporter + ?Sized> Reporter for Arc<R> {
    fn report(&self, event: LifecycleEvent, case: &dyn TestCaseView) {
        (**self).report(event, case)
    }

    fn write(&self, content: &[u8]) -> io::Result<usize> {
        (**self).write(content)
    }

    fn stream(&self) -> bool {
        (**self).stream()
    }
}

impl<R: Reporter + ?Sized> Reporter for Box<R> {
    fn report(&self, event: LifecycleEvent, case: &dyn TestCaseView) {
        (**self).report(event, case)
    }

    fn write(&self, content: &[u8]) -> io::Result<usize> {
        (**self).write(content)
    }

    fn stream(&self) -> bool {
        (**self).stream()
    }
}
