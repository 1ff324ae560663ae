use crate::checker::{CheckResult, Checker, CheckerInfo};
use crate::value::Value;

/// Holds when the value is nil: untyped nil or a nil slice, map, pointer,
/// channel or function.
pub struct IsNil;

impl Checker for IsNil {
    fn info(&self) -> CheckerInfo {
        CheckerInfo::new("IsNil", &["value"])
    }

    fn check(&self, params: &[Value], _names: &[String]) -> CheckResult {
        CheckResult::from_bool(params[0].is_nil())
    }
}

pub struct NotNil;

impl Checker for NotNil {
    fn info(&self) -> CheckerInfo {
        CheckerInfo::new("NotNil", &["value"])
    }

    fn check(&self, params: &[Value], _names: &[String]) -> CheckResult {
        CheckResult::from_bool(!params[0].is_nil())
    }
}
