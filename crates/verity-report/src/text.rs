//! Human-readable reporter.
//!
//! Verbosity 0 shows only failures and panics, each as a block closed off by
//! a separator line and followed by the case log. Verbosity 1 also shows the
//! terminal lines of ordinary tests. Verbosity 2 and above streams: a start
//! line per case, blank-line separated terminal lines, and no log copies.

use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard};

use crate::callsite::CallSiteNamer;
use crate::case::{CaseKind, CaseStatus, LifecycleEvent, TestCaseView};
use crate::reporter::Reporter;

pub const SEPARATOR: &str =
    "\n----------------------------------------------------------------------\n";

struct Shared<W> {
    writer: W,
    wrote_call_problem_last: bool,
}

pub struct TextReporter<W> {
    shared: Mutex<Shared<W>>,
    stream: bool,
    verbose: bool,
    namer: CallSiteNamer,
}

impl<W: Write + Send> TextReporter<W> {
    pub fn new(writer: W, verbosity: u8) -> Self {
        Self {
            shared: Mutex::new(Shared {
                writer,
                wrote_call_problem_last: false,
            }),
            stream: verbosity > 1,
            verbose: verbosity > 0,
            namer: CallSiteNamer::from_current_dir(),
        }
    }

    pub fn with_namer(mut self, namer: CallSiteNamer) -> Self {
        self.namer = namer;
        self
    }

    pub fn into_inner(self) -> W {
        self.shared
            .into_inner()
            .unwrap_or_else(|e| e.into_inner())
            .writer
    }

    fn lock(&self) -> MutexGuard<'_, Shared<W>> {
        self.shared.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn render_header(
        &self,
        label: &str,
        case: &dyn TestCaseView,
        prefix: &str,
        suffix: &str,
    ) -> String {
        let site = case.call_site();
        format!(
            "{}{}: {}: {}{}",
            prefix,
            label,
            self.namer.path(site.as_ref()),
            self.namer.function(site.as_ref()),
            suffix
        )
    }

    fn write_started(&self, case: &dyn TestCaseView) {
        if !self.stream {
            return;
        }
        let header = self.render_header(LifecycleEvent::Started.label(), case, "", "\n");
        let mut shared = self.lock();
        if let Err(e) = shared.writer.write_all(header.as_bytes()) {
            tracing::warn!("failed to write start line: {}", e);
        }
    }

    fn write_problem(&self, label: &str, case: &dyn TestCaseView) {
        let prefix = if self.stream { "" } else { SEPARATOR };
        let header = self.render_header(label, case, prefix, "\n\n");
        let mut shared = self.lock();
        shared.wrote_call_problem_last = true;
        if let Err(e) = shared.writer.write_all(header.as_bytes()) {
            tracing::warn!("failed to write {} header: {}", label, e);
            return;
        }
        if !self.stream {
            if let Err(e) = case.write_log_to(&mut shared.writer) {
                tracing::warn!("failed to copy case log: {}", e);
            }
        }
    }

    fn write_success(&self, label: &str, case: &dyn TestCaseView) {
        if !(self.stream || (self.verbose && case.kind() == CaseKind::Test)) {
            return;
        }
        let mut suffix = String::new();
        let reason = case.reason();
        if !reason.is_empty() {
            suffix.push_str(" (");
            suffix.push_str(&reason);
            suffix.push(')');
        }
        if case.status() == CaseStatus::Succeeded {
            suffix.push('\t');
            suffix.push_str(&case.timer_string());
        }
        suffix.push('\n');
        if self.stream {
            suffix.push('\n');
        }
        let mut header = self.render_header(label, case, "", &suffix);

        let mut shared = self.lock();
        // The flag is only stable under the lock.
        if !self.stream && shared.wrote_call_problem_last {
            header.insert_str(0, SEPARATOR);
        }
        shared.wrote_call_problem_last = false;
        if let Err(e) = shared.writer.write_all(header.as_bytes()) {
            tracing::warn!("failed to write {} line: {}", label, e);
        }
    }
}

impl<W: Write + Send> Reporter for TextReporter<W> {
    fn report(&self, event: LifecycleEvent, case: &dyn TestCaseView) {
        match event {
            LifecycleEvent::Started => self.write_started(case),
            LifecycleEvent::Failed | LifecycleEvent::Panicked => {
                self.write_problem(event.label(), case)
            }
            LifecycleEvent::Succeeded
            | LifecycleEvent::ExpectedFailure
            | LifecycleEvent::Skipped
            | LifecycleEvent::Missed => self.write_success(event.label(), case),
        }
    }

    /// Raw output lands in one piece even when the sink takes short writes.
    fn write(&self, content: &[u8]) -> io::Result<usize> {
        self.lock().writer.write_all(content)?;
        Ok(content.len())
    }

    fn stream(&self) -> bool {
        self.stream
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callsite::CallSite;
    use crate::case::CaseRecord;
    use std::time::Duration;

    const SITE: CallSite = CallSite::new("suite/lib.rs", 12, "suite::MySuite::test_one");

    fn reporter(verbosity: u8) -> TextReporter<Vec<u8>> {
        TextReporter::new(Vec::new(), verbosity).with_namer(CallSiteNamer::default())
    }

    fn output(reporter: TextReporter<Vec<u8>>) -> String {
        String::from_utf8(reporter.into_inner()).unwrap()
    }

    fn case() -> CaseRecord {
        CaseRecord::new("MySuite.test_one", Some(SITE)).with_elapsed(Duration::from_millis(5))
    }

    #[test]
    fn quiet_failure_block_then_separator() {
        let r = reporter(0);
        let failing = case().with_status(CaseStatus::Failed);
        failing.log("... obtained int = 1");
        r.report(LifecycleEvent::Failed, &failing);
        r.report(LifecycleEvent::Succeeded, &case());
        assert_eq!(
            output(r),
            format!(
                "{SEPARATOR}FAIL: suite/lib.rs:12: MySuite.test_one\n\n... obtained int = 1\n"
            )
        );
    }

    #[test]
    fn verbose_success_after_problem_closes_block() {
        let r = reporter(1);
        r.report(LifecycleEvent::Panicked, &case().with_status(CaseStatus::Panicked));
        r.report(LifecycleEvent::Succeeded, &case());
        r.report(LifecycleEvent::Skipped, &case().with_status(CaseStatus::Skipped).with_reason("slow"));
        assert_eq!(
            output(r),
            format!(
                "{SEPARATOR}PANIC: suite/lib.rs:12: MySuite.test_one\n\n\
                 {SEPARATOR}PASS: suite/lib.rs:12: MySuite.test_one\t0.005s\n\
                 SKIP: suite/lib.rs:12: MySuite.test_one (slow)\n"
            )
        );
    }

    #[test]
    fn verbose_hides_fixture_successes() {
        let r = reporter(1);
        r.report(LifecycleEvent::Succeeded, &case().with_kind(CaseKind::Fixture));
        assert_eq!(output(r), "");
    }

    #[test]
    fn streaming_lines() {
        let r = reporter(2);
        let failing = case().with_status(CaseStatus::Failed);
        failing.log("withheld");
        r.report(LifecycleEvent::Started, &failing);
        r.report(LifecycleEvent::Failed, &failing);
        r.report(LifecycleEvent::Started, &case());
        r.report(LifecycleEvent::Missed, &case().with_status(CaseStatus::Missed));
        assert_eq!(
            output(r),
            "START: suite/lib.rs:12: MySuite.test_one\n\
             FAIL: suite/lib.rs:12: MySuite.test_one\n\n\
             START: suite/lib.rs:12: MySuite.test_one\n\
             MISS: suite/lib.rs:12: MySuite.test_one\n\n"
        );
    }

    #[test]
    fn unknown_call_site() {
        let r = reporter(2);
        r.report(LifecycleEvent::ExpectedFailure, &CaseRecord::new("x", None).with_status(CaseStatus::Failed));
        assert_eq!(output(r), "FAIL EXPECTED: <unknown path>: <unknown function>\n\n");
    }

    #[test]
    fn raw_writes_pass_through() {
        let r = reporter(0);
        assert_eq!(r.write(b"log line\n").unwrap(), 9);
        assert!(!r.stream());
        assert_eq!(output(r), "log line\n");
    }
}
