use regex::Regex;

use crate::checker::{CheckResult, Checker, CheckerInfo, ParamView};
use crate::value::Value;

/// Full-match of `regex` against `value`: a plain string, or any value with
/// a `String()` method.
pub(crate) fn matches(value: &Value, regex: &Value) -> CheckResult {
    let Some(pattern) = regex.as_str() else {
        return CheckResult::usage("Regex must be a string");
    };
    let text = match value.as_str() {
        Some(text) => text.to_string(),
        None => match value.stringer_text() {
            Some(text) => text,
            None => {
                return CheckResult::usage("Obtained value is not a string and has no .String()")
            }
        },
    };
    match Regex::new(&format!("^(?:{})$", pattern)) {
        Ok(re) => CheckResult::from_bool(re.is_match(&text)),
        Err(err) => CheckResult::usage(format!("Can't compile regex: {}", err)),
    }
}

pub struct Matches;

impl Checker for Matches {
    fn info(&self) -> CheckerInfo {
        CheckerInfo::new("Matches", &["value", "regex"])
    }

    fn check(&self, params: &[Value], _names: &[String]) -> CheckResult {
        matches(&params[0], &params[1])
    }
}

/// Matches the message of an error-like value. The obtained slot is
/// rewritten to the message and renamed `error`.
pub struct ErrorMatches;

impl Checker for ErrorMatches {
    fn info(&self) -> CheckerInfo {
        CheckerInfo::new("ErrorMatches", &["value", "regex"])
    }

    fn check(&self, params: &[Value], names: &[String]) -> CheckResult {
        if matches!(params[0], Value::Nil) {
            return CheckResult::usage("Error value is nil");
        }
        let Some(message) = params[0].error_text() else {
            return CheckResult::usage("Value is not an error");
        };
        let view = ParamView::replace(params, names, 0, Value::String(message), "error");
        matches(&view.params[0], &params[1]).with_view(view)
    }
}
