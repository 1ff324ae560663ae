use crate::checker::{CheckResult, Checker, CheckerInfo};
use crate::types::IntKind;
use crate::value::Value;

pub struct HasLen;

impl Checker for HasLen {
    fn info(&self) -> CheckerInfo {
        CheckerInfo::new("HasLen", &["obtained", "n"])
    }

    fn check(&self, params: &[Value], _names: &[String]) -> CheckResult {
        let Value::Int(IntKind::Int, n) = &params[1] else {
            return CheckResult::usage("n must be an int");
        };
        let Some(len) = params[0].len() else {
            return CheckResult::usage("obtained value type has no length");
        };
        CheckResult::from_bool(i64::try_from(len).is_ok_and(|len| len == *n))
    }
}
