//! Reporter emitting the subunit v2 event stream.

use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard};

use crate::case::{LifecycleEvent, TestCaseView};
use crate::error::EncodeError;
use crate::reporter::Reporter;
use crate::subunit::{Event, Status, StreamWriter, Timestamp};

pub struct ProtocolReporter<W> {
    streamer: Mutex<StreamWriter<W>>,
    timestamps: bool,
}

impl<W: Write + Send> ProtocolReporter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            streamer: Mutex::new(StreamWriter::new(writer)),
            timestamps: false,
        }
    }

    /// Stamps every event with the wall-clock time it was reported at.
    pub fn with_timestamps(mut self, timestamps: bool) -> Self {
        self.timestamps = timestamps;
        self
    }

    pub fn into_inner(self) -> W {
        self.streamer
            .into_inner()
            .unwrap_or_else(|e| e.into_inner())
            .into_inner()
    }

    fn lock(&self) -> MutexGuard<'_, StreamWriter<W>> {
        self.streamer.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn stamp(&self, event: Event) -> Event {
        if self.timestamps {
            event.with_timestamp(Timestamp::now())
        } else {
            event
        }
    }
}

/// The record a lifecycle event maps to.
pub fn event_for(event: LifecycleEvent, case: &dyn TestCaseView) -> Event {
    let basic = |status| Event::for_test(case.test_name(), status);
    match event {
        LifecycleEvent::Started => basic(Status::InProgress),
        LifecycleEvent::Succeeded => basic(Status::Success),
        LifecycleEvent::Failed | LifecycleEvent::Panicked => {
            basic(Status::Fail).with_text("details", case.log_text())
        }
        LifecycleEvent::Skipped => {
            let reason = case.reason();
            if reason.is_empty() {
                basic(Status::Skip)
            } else {
                basic(Status::Skip).with_text("reason", reason)
            }
        }
        LifecycleEvent::ExpectedFailure => basic(Status::ExpectedFailure),
        LifecycleEvent::Missed => basic(Status::Undefined),
    }
}

impl<W: Write + Send> Reporter for ProtocolReporter<W> {
    fn report(&self, event: LifecycleEvent, case: &dyn TestCaseView) {
        let record = self.stamp(event_for(event, case));
        if let Err(e) = self.lock().status(&record) {
            tracing::warn!(
                "failed to write subunit {} event for {}: {}",
                record.status,
                case.test_name(),
                e
            );
        }
    }

    /// Raw output has no test to attach to, so it travels as an anonymous
    /// `details` blob.
    fn write(&self, content: &[u8]) -> io::Result<usize> {
        let record = self.stamp(Event::new(Status::Undefined).with_text("details", content));
        match self.lock().status(&record) {
            Ok(()) => Ok(content.len()),
            Err(EncodeError::Io(e)) => Err(e),
            Err(e) => Err(io::Error::new(io::ErrorKind::InvalidInput, e)),
        }
    }

    fn stream(&self) -> bool {
        true
    }
}
