//! Shallow (`==`) and deep (structural) equality over [`Value`]s.

use std::sync::Arc;

use thiserror::Error;

use crate::types::Type;
use crate::value::Value;

/// Operational fault raised when `==` is applied to a type that does not
/// define it.
#[derive(Debug, Clone, Error)]
#[error("runtime error: comparing uncomparable type {0}")]
pub struct Uncomparable(pub Type);

/// Identity-level equality.
///
/// Values of different dynamic types are unequal. Values of the same
/// uncomparable type (slices, maps, functions and composites holding them)
/// raise [`Uncomparable`] naming that type.
pub fn shallow_equal(a: &Value, b: &Value) -> Result<bool, Uncomparable> {
    match (a.type_of(), b.type_of()) {
        (None, None) => return Ok(true),
        (Some(ta), Some(tb)) if ta == tb => {
            if !ta.is_comparable() {
                return Err(Uncomparable(ta));
            }
        }
        _ => return Ok(false),
    }

    let equal = match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Int(_, x), Value::Int(_, y)) => x == y,
        (Value::Uint(_, x), Value::Uint(_, y)) => x == y,
        (Value::Float(_, x), Value::Float(_, y)) => x == y,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Array { items: x, .. }, Value::Array { items: y, .. }) => all_shallow(x, y)?,
        (Value::Struct { values: x, .. }, Value::Struct { values: y, .. }) => all_shallow(x, y)?,
        (Value::Named { inner: x, .. }, Value::Named { inner: y, .. }) => shallow_equal(x, y)?,
        (Value::Pointer { target: x, .. }, Value::Pointer { target: y, .. }) => same_arc(x, y),
        (Value::Chan { handle: x, .. }, Value::Chan { handle: y, .. }) => same_arc(x, y),
        (Value::Error(x), Value::Error(y)) => x.same(y),
        _ => false,
    };
    Ok(equal)
}

fn all_shallow(xs: &[Value], ys: &[Value]) -> Result<bool, Uncomparable> {
    for (x, y) in xs.iter().zip(ys) {
        if !shallow_equal(x, y)? {
            return Ok(false);
        }
    }
    Ok(xs.len() == ys.len())
}

fn same_arc<T>(x: &Option<Arc<T>>, y: &Option<Arc<T>>) -> bool {
    match (x, y) {
        (None, None) => true,
        (Some(x), Some(y)) => Arc::ptr_eq(x, y),
        _ => false,
    }
}

/// Recursive structural equality. Never faults: values that cannot be
/// compared structurally are simply unequal.
///
/// Nil and empty slices (or maps) differ, pointers are equal when they are
/// the same pointer or their pointees are deeply equal, and functions are
/// equal only when both are nil.
pub fn deep_equal(a: &Value, b: &Value) -> bool {
    match (a.type_of(), b.type_of()) {
        (None, None) => return true,
        (Some(ta), Some(tb)) if ta == tb => {}
        _ => return false,
    }

    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Int(_, x), Value::Int(_, y)) => x == y,
        (Value::Uint(_, x), Value::Uint(_, y)) => x == y,
        (Value::Float(_, x), Value::Float(_, y)) => x == y,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Slice { items: x, .. }, Value::Slice { items: y, .. }) => match (x, y) {
            (None, None) => true,
            (Some(x), Some(y)) => all_deep(x, y),
            _ => false,
        },
        (Value::Array { items: x, .. }, Value::Array { items: y, .. }) => all_deep(x, y),
        (Value::Struct { values: x, .. }, Value::Struct { values: y, .. }) => all_deep(x, y),
        (Value::Map { entries: x, .. }, Value::Map { entries: y, .. }) => match (x, y) {
            (None, None) => true,
            (Some(x), Some(y)) => maps_deep_equal(x, y),
            _ => false,
        },
        (Value::Pointer { target: x, .. }, Value::Pointer { target: y, .. }) => match (x, y) {
            (None, None) => true,
            (Some(x), Some(y)) => Arc::ptr_eq(x, y) || deep_equal(x, y),
            _ => false,
        },
        (Value::Chan { handle: x, .. }, Value::Chan { handle: y, .. }) => same_arc(x, y),
        (Value::Func(x), Value::Func(y)) => x.body.is_none() && y.body.is_none(),
        (Value::Named { inner: x, .. }, Value::Named { inner: y, .. }) => deep_equal(x, y),
        (Value::Error(x), Value::Error(y)) => x.same(y) || x.message() == y.message(),
        _ => false,
    }
}

fn all_deep(xs: &[Value], ys: &[Value]) -> bool {
    xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| deep_equal(x, y))
}

fn maps_deep_equal(xs: &[(Value, Value)], ys: &[(Value, Value)]) -> bool {
    xs.len() == ys.len()
        && xs.iter().all(|(key, value)| {
            ys.iter()
                .find(|(other, _)| shallow_equal(key, other).unwrap_or(false))
                .is_some_and(|(_, other)| deep_equal(value, other))
        })
}
