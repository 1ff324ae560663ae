use crate::checker::{CheckResult, Checker, CheckerInfo};
use crate::types::Type;
use crate::value::Value;

/// Holds when the obtained value has exactly the sample's dynamic type.
pub struct FitsTypeOf;

impl Checker for FitsTypeOf {
    fn info(&self) -> CheckerInfo {
        CheckerInfo::new("FitsTypeOf", &["obtained", "sample"])
    }

    fn check(&self, params: &[Value], _names: &[String]) -> CheckResult {
        let Some(obtained) = params[0].type_of() else {
            return CheckResult::fail();
        };
        let Some(sample) = params[1].type_of() else {
            return CheckResult::usage("Invalid sample value");
        };
        CheckResult::from_bool(obtained == sample)
    }
}

/// Holds when the obtained value satisfies the interface of the variable
/// `ifaceptr` points to.
pub struct Implements;

impl Checker for Implements {
    fn info(&self) -> CheckerInfo {
        CheckerInfo::new("Implements", &["obtained", "ifaceptr"])
    }

    fn check(&self, params: &[Value], _names: &[String]) -> CheckResult {
        let Some(obtained) = params[0].type_of() else {
            return CheckResult::fail();
        };
        let Value::Pointer {
            elem: Type::Interface(iface),
            target: Some(_),
        } = &params[1]
        else {
            return CheckResult::usage("ifaceptr should be a pointer to an interface variable");
        };
        CheckResult::from_bool(obtained.implements(iface))
    }
}
