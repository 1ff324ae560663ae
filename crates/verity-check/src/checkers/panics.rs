use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use crate::checker::{CheckResult, Checker, CheckerInfo, ParamView};
use crate::equality::deep_equal;
use crate::value::Value;

use super::matches::matches;

const NOT_NULLARY: &str = "Function must take zero arguments";
const NOT_PANICKED: &str = "Function has not panicked";

/// Calls a zero-argument function value and returns its panic payload, or
/// `Ok(None)` when it returned normally. A nil payload is still a panic.
fn probe(function: &Value) -> Result<Option<Value>, &'static str> {
    let Value::Func(func) = function else {
        return Err(NOT_NULLARY);
    };
    if func.arity != 0 {
        return Err(NOT_NULLARY);
    }
    let Some(body) = func.body.as_ref() else {
        return Ok(Some(Value::error(
            "runtime error: invalid memory address or nil pointer dereference",
        )));
    };
    match panic::catch_unwind(AssertUnwindSafe(|| body(&[]))) {
        Ok(_) => Ok(None),
        Err(payload) => {
            let payload = payload_value(payload);
            tracing::trace!(payload = %payload, "probed function panicked");
            Ok(Some(payload))
        }
    }
}

fn payload_value(payload: Box<dyn Any + Send>) -> Value {
    let payload = match payload.downcast::<Value>() {
        Ok(value) => return *value,
        Err(other) => other,
    };
    let payload = match payload.downcast::<String>() {
        Ok(text) => return Value::String(*text),
        Err(other) => other,
    };
    match payload.downcast::<&'static str>() {
        Ok(text) => Value::string(*text),
        Err(_) => Value::string("Box<dyn Any>"),
    }
}

/// Holds when calling the function panics with a payload deeply equal to
/// `expected`. The function slot is rewritten to the payload and renamed
/// `panic`.
///
/// The panic is caught with `catch_unwind`, which leaves the process panic
/// hook in place: every probed panic still prints a `thread ... panicked at`
/// message to stderr, even when the check holds. Runners that want quiet
/// output install their own hook with `std::panic::set_hook`.
pub struct Panics;

impl Checker for Panics {
    fn info(&self) -> CheckerInfo {
        CheckerInfo::new("Panics", &["function", "expected"])
    }

    fn check(&self, params: &[Value], names: &[String]) -> CheckResult {
        let payload = match probe(&params[0]) {
            Err(message) => return CheckResult::usage(message),
            Ok(None) => return CheckResult::usage(NOT_PANICKED),
            Ok(Some(payload)) => payload,
        };
        let passed = deep_equal(&payload, &params[1]);
        let view = ParamView::replace(params, names, 0, payload, "panic");
        CheckResult::from_bool(passed).with_view(view)
    }
}

/// Holds when calling the function panics with a string or error whose text
/// fully matches the `expected` regex. The function slot is rewritten to
/// that text and renamed `panic`. Like [`Panics`], the caught panic is
/// still printed by the process panic hook.
pub struct PanicMatches;

impl Checker for PanicMatches {
    fn info(&self) -> CheckerInfo {
        CheckerInfo::new("PanicMatches", &["function", "expected"])
    }

    fn check(&self, params: &[Value], names: &[String]) -> CheckResult {
        let payload = match probe(&params[0]) {
            Err(message) => return CheckResult::usage(message),
            Ok(None) => return CheckResult::usage(NOT_PANICKED),
            Ok(Some(payload)) => payload,
        };
        let text = match (payload.error_text(), payload) {
            (Some(message), _) => message,
            (None, Value::String(text)) => text,
            (None, _) => {
                let view = ParamView::replace(params, names, 0, params[0].clone(), "panic");
                return CheckResult::usage("Panic value is not a string or an error").with_view(view);
            }
        };
        let view = ParamView::replace(params, names, 0, Value::String(text), "panic");
        matches(&view.params[0], &params[1]).with_view(view)
    }
}
