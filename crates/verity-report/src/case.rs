//! What a reporter reads from a test case.

use std::io::{self, Write};
use std::sync::Mutex;
use std::time::Duration;

use crate::callsite::CallSite;

/// One transition in a test case's life. All but `Started` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleEvent {
    Started,
    Failed,
    Panicked,
    Succeeded,
    ExpectedFailure,
    Skipped,
    Missed,
}

impl LifecycleEvent {
    pub const ALL: [LifecycleEvent; 7] = [
        LifecycleEvent::Started,
        LifecycleEvent::Failed,
        LifecycleEvent::Panicked,
        LifecycleEvent::Succeeded,
        LifecycleEvent::ExpectedFailure,
        LifecycleEvent::Skipped,
        LifecycleEvent::Missed,
    ];

    pub fn is_terminal(self) -> bool {
        self != LifecycleEvent::Started
    }

    /// `Failed` and `Panicked`: rendered at every verbosity.
    pub fn is_problem(self) -> bool {
        matches!(self, LifecycleEvent::Failed | LifecycleEvent::Panicked)
    }

    /// Header label of the text reporter.
    pub fn label(self) -> &'static str {
        match self {
            LifecycleEvent::Started => "START",
            LifecycleEvent::Failed => "FAIL",
            LifecycleEvent::Panicked => "PANIC",
            LifecycleEvent::Succeeded => "PASS",
            LifecycleEvent::ExpectedFailure => "FAIL EXPECTED",
            LifecycleEvent::Skipped => "SKIP",
            LifecycleEvent::Missed => "MISS",
        }
    }
}

/// Ordinary test methods versus fixture methods (set-up, tear-down).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaseKind {
    #[default]
    Test,
    Fixture,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaseStatus {
    #[default]
    Succeeded,
    Failed,
    Skipped,
    Panicked,
    Missed,
}

/// Read-only facade over a test case owned by the scheduler.
pub trait TestCaseView: Send + Sync {
    fn call_site(&self) -> Option<CallSite>;

    /// Stable identifier used by the protocol reporter.
    fn test_name(&self) -> String;

    /// Set on skip or expected failure; empty otherwise.
    fn reason(&self) -> String;

    fn kind(&self) -> CaseKind;

    fn status(&self) -> CaseStatus;

    fn elapsed(&self) -> Duration;

    fn timer_string(&self) -> String {
        format!("{:.3}s", self.elapsed().as_secs_f64())
    }

    /// Streams the accumulated log into `out`.
    fn write_log_to(&self, out: &mut dyn Write) -> io::Result<u64>;

    fn log_text(&self) -> String;
}

/// A plain [`TestCaseView`] with an append-only log buffer.
#[derive(Debug, Default)]
pub struct CaseRecord {
    call_site: Option<CallSite>,
    name: String,
    reason: String,
    kind: CaseKind,
    status: CaseStatus,
    elapsed: Duration,
    log: Mutex<Vec<u8>>,
}

impl CaseRecord {
    pub fn new(name: impl Into<String>, call_site: Option<CallSite>) -> Self {
        Self {
            call_site,
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }

    pub fn with_kind(mut self, kind: CaseKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_status(mut self, status: CaseStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_elapsed(mut self, elapsed: Duration) -> Self {
        self.elapsed = elapsed;
        self
    }

    /// Appends one line to the log.
    pub fn log(&self, line: impl AsRef<str>) {
        let mut log = self.log.lock().unwrap_or_else(|e| e.into_inner());
        log.extend_from_slice(line.as_ref().as_bytes());
        log.push(b'\n');
    }
}

impl TestCaseView for CaseRecord {
    fn call_site(&self) -> Option<CallSite> {
        self.call_site
    }

    fn test_name(&self) -> String {
        self.name.clone()
    }

    fn reason(&self) -> String {
        self.reason.clone()
    }

    fn kind(&self) -> CaseKind {
        self.kind
    }

    fn status(&self) -> CaseStatus {
        self.status
    }

    fn elapsed(&self) -> Duration {
        self.elapsed
    }

    fn write_log_to(&self, out: &mut dyn Write) -> io::Result<u64> {
        let log = self.log.lock().unwrap_or_else(|e| e.into_inner());
        out.write_all(&log)?;
        Ok(log.len() as u64)
    }

    fn log_text(&self) -> String {
        let log = self.log.lock().unwrap_or_else(|e| e.into_inner());
        String::from_utf8_lossy(&log).into_owned()
    }
}
