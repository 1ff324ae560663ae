use crate::checker::{CheckResult, Checker, CheckerInfo};
use crate::equality::{deep_equal, shallow_equal, Uncomparable};
use crate::types::Type;
use crate::value::Value;

type Membership = fn(&Value, &Value) -> Result<bool, Uncomparable>;

/// Membership test shared by [`Contains`] and [`DeepContains`].
///
/// Strings are searched for substrings. Slices and arrays are searched by
/// item and maps by *value*, never by key. The element must have exactly
/// the container's item type, or satisfy it when the item type is an
/// interface.
fn contains(container: &Value, elem: &Value, equal: Membership) -> CheckResult {
    let Some(container_ty) = container.type_of() else {
        return CheckResult::usage("<nil> is not a supported container");
    };

    let items: Vec<&Value> = match container.underlying() {
        Value::String(haystack) => {
            return match elem.as_string_kind() {
                Some(needle) => CheckResult::from_bool(haystack.contains(needle)),
                None => CheckResult::usage(format!(
                    "element is a {} but expected a string",
                    elem.type_name()
                )),
            };
        }
        Value::Slice { items, .. } => items.iter().flatten().collect(),
        Value::Array { items, .. } => items.iter().collect(),
        Value::Map { entries, .. } => entries.iter().flatten().map(|(_, v)| v).collect(),
        _ => {
            return CheckResult::usage(format!("{} is not a supported container", container_ty))
        }
    };

    let Some(item_ty) = container_ty.elem() else {
        return CheckResult::usage(format!("{} is not a supported container", container_ty));
    };
    if let Err(message) = check_element_type(item_ty, elem) {
        return CheckResult::usage(message);
    }

    for item in items {
        match equal(item, elem) {
            Ok(true) => return CheckResult::pass(),
            Ok(false) => {}
            Err(fault) => return CheckResult::usage(fault.to_string()),
        }
    }
    CheckResult::fail()
}

fn check_element_type(item_ty: &Type, elem: &Value) -> Result<(), String> {
    match (item_ty, elem.type_of()) {
        (Type::Interface(_), None) => Ok(()),
        (Type::Interface(iface), Some(elem_ty)) => {
            if elem_ty.implements(iface) {
                Ok(())
            } else {
                Err(format!(
                    "container has items of interface type {} but expected element does not implement it",
                    iface.name
                ))
            }
        }
        (_, Some(elem_ty)) if elem_ty == *item_ty => Ok(()),
        _ => Err(format!(
            "container has items of type {} but expected element is a {}",
            item_ty,
            elem.type_name()
        )),
    }
}

fn deep_membership(item: &Value, elem: &Value) -> Result<bool, Uncomparable> {
    Ok(deep_equal(item, elem))
}

pub struct Contains;

impl Checker for Contains {
    fn info(&self) -> CheckerInfo {
        CheckerInfo::new("Contains", &["container", "elem"])
    }

    fn check(&self, params: &[Value], _names: &[String]) -> CheckResult {
        contains(&params[0], &params[1], shallow_equal)
    }
}

/// Like [`Contains`] but compares items structurally, so uncomparable item
/// types never fault.
pub struct DeepContains;

impl Checker for DeepContains {
    fn info(&self) -> CheckerInfo {
        CheckerInfo::new("DeepContains", &["container", "elem"])
    }

    fn check(&self, params: &[Value], _names: &[String]) -> CheckResult {
        contains(&params[0], &params[1], deep_membership)
    }
}
