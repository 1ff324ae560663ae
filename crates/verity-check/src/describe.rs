//! Failure descriptions: the `... name type = value` block an assertion
//! logs when a check does not hold.

use std::fmt::Write as _;

use crate::checker::{run_check, CheckResult, Checker};
use crate::comment::CheckComment;
use crate::value::Value;

/// Prefixes every non-empty line of `text` with `with`.
pub fn indent(text: &str, with: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut eol = true;
    for c in text.chars() {
        match c {
            '\n' | '\r' => eol = true,
            _ if eol => {
                eol = false;
                out.push_str(with);
            }
            _ => {}
        }
        out.push(c);
    }
    out
}

fn is_multi_line(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() > 1 && bytes[..bytes.len() - 1].contains(&b'\n')
}

fn write_multi_line(out: &mut String, s: &str) {
    let lines: Vec<&str> = s.split_inclusive('\n').collect();
    for (i, line) in lines.iter().enumerate() {
        let _ = write!(out, "...     {:?}", line);
        if i + 1 < lines.len() {
            out.push_str(" +");
        }
        out.push('\n');
    }
}

fn write_value(out: &mut String, label: &str, value: &Value) {
    let text = value.text_form();
    if label.is_empty() {
        match text {
            Some(text) => {
                let _ = writeln!(out, "... {} ({:?})", value, text);
            }
            None => {
                let _ = writeln!(out, "... {}", value);
            }
        }
        return;
    }
    if matches!(value, Value::Nil) {
        let _ = writeln!(out, "... {} = nil", label);
        return;
    }
    let type_name = value.type_name();
    if let Some(text) = text {
        let fv = value.to_string();
        let qv = format!("{:?}", text);
        if fv != qv {
            let _ = writeln!(out, "... {} {} = {} ({})", label, type_name, fv, qv);
            return;
        }
    }
    match value.as_str() {
        Some(s) if is_multi_line(s) => {
            let _ = writeln!(out, "... {} {} = \"\" +", label, type_name);
            write_multi_line(out, s);
        }
        _ => {
            let _ = writeln!(out, "... {} {} = {}", label, type_name, value);
        }
    }
}

/// Renders the lines logged for a check that did not hold.
///
/// Uses the params and names the checker rewrote, if any, so an error shows
/// as its message and a probed function as its panic payload.
pub fn describe_failure(
    result: &CheckResult,
    params: &[Value],
    names: &[String],
    comment: Option<&dyn CheckComment>,
) -> String {
    let mut out = String::new();
    for (name, value) in result.names(names).iter().zip(result.params(params)) {
        write_value(&mut out, name, value);
    }
    if let Some(comment) = comment {
        let _ = writeln!(out, "... {}", comment.check_comment_string());
    }
    if !result.message().is_empty() {
        let _ = writeln!(out, "... {}", result.message());
    }
    out
}

/// Runs `checker` and returns the failure description when it does not hold.
pub fn verify(
    checker: &dyn Checker,
    params: &[Value],
    comment: Option<&dyn CheckComment>,
) -> Result<(), String> {
    let result = run_check(checker, params);
    if result.passed {
        return Ok(());
    }
    let names = checker.info().params;
    Err(describe_failure(&result, params, &names, comment))
}
