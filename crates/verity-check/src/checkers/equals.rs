use crate::checker::{CheckResult, Checker, CheckerInfo};
use crate::equality::{deep_equal, shallow_equal};
use crate::value::Value;

/// `obtained == expected`. Comparing two values of an uncomparable type is
/// reported as a usage fault naming the type.
pub struct Equals;

impl Checker for Equals {
    fn info(&self) -> CheckerInfo {
        CheckerInfo::new("Equals", &["obtained", "expected"])
    }

    fn check(&self, params: &[Value], _names: &[String]) -> CheckResult {
        match shallow_equal(&params[0], &params[1]) {
            Ok(equal) => CheckResult::from_bool(equal),
            Err(fault) => CheckResult::usage(fault.to_string()),
        }
    }
}

/// Structural equality; never faults.
pub struct DeepEquals;

impl Checker for DeepEquals {
    fn info(&self) -> CheckerInfo {
        CheckerInfo::new("DeepEquals", &["obtained", "expected"])
    }

    fn check(&self, params: &[Value], _names: &[String]) -> CheckResult {
        CheckResult::from_bool(deep_equal(&params[0], &params[1]))
    }
}
