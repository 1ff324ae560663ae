//! Dynamically typed values.
//!
//! A [`Value`] is what checkers receive: an obtained value or an expected
//! value whose shape is only known at run time. Pointers, channels and error
//! values carry identity: clones share it, separately built values do not.

use std::fmt;
use std::sync::Arc;

use crate::types::{Field, FloatKind, InterfaceType, IntKind, NamedType, Type, UintKind};

/// Body of a function value.
pub type FuncBody = Arc<dyn Fn(&[Value]) -> Value + Send + Sync>;

#[derive(Clone)]
pub struct Func {
    pub arity: usize,
    pub body: Option<FuncBody>,
}

impl fmt::Debug for Func {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Func")
            .field("arity", &self.arity)
            .field("nil", &self.body.is_none())
            .finish()
    }
}

/// Channel handle; only its identity and buffered item count are observable.
#[derive(Debug)]
pub struct ChanHandle {
    pub buffered: usize,
}

/// Error value created by [`Value::error`].
#[derive(Debug, Clone)]
pub struct ErrorValue {
    message: Arc<str>,
}

impl ErrorValue {
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn same(&self, other: &ErrorValue) -> bool {
        Arc::ptr_eq(&self.message, &other.message)
    }
}

#[derive(Debug, Clone)]
pub enum Value {
    /// Untyped nil: the empty interface holding nothing.
    Nil,
    Bool(bool),
    Int(IntKind, i64),
    Uint(UintKind, u64),
    Float(FloatKind, f64),
    String(String),
    Slice {
        elem: Type,
        items: Option<Vec<Value>>,
    },
    Array {
        elem: Type,
        items: Vec<Value>,
    },
    Map {
        key: Type,
        elem: Type,
        entries: Option<Vec<(Value, Value)>>,
    },
    Pointer {
        elem: Type,
        target: Option<Arc<Value>>,
    },
    Chan {
        elem: Type,
        handle: Option<Arc<ChanHandle>>,
    },
    Func(Func),
    Struct {
        fields: Vec<Field>,
        values: Vec<Value>,
    },
    Named {
        ty: Arc<NamedType>,
        inner: Box<Value>,
    },
    Error(ErrorValue),
}

impl Value {
    pub fn bool(v: bool) -> Self {
        Value::Bool(v)
    }

    pub fn int(v: i64) -> Self {
        Value::Int(IntKind::Int, v)
    }

    pub fn int32(v: i32) -> Self {
        Value::Int(IntKind::I32, i64::from(v))
    }

    pub fn int64(v: i64) -> Self {
        Value::Int(IntKind::I64, v)
    }

    pub fn uint8(v: u8) -> Self {
        Value::Uint(UintKind::U8, u64::from(v))
    }

    pub fn float64(v: f64) -> Self {
        Value::Float(FloatKind::F64, v)
    }

    pub fn string(v: impl Into<String>) -> Self {
        Value::String(v.into())
    }

    /// A `[]uint8` holding `bytes`.
    pub fn bytes(bytes: &[u8]) -> Self {
        Value::slice(
            Type::UINT8,
            bytes.iter().copied().map(Value::uint8).collect(),
        )
    }

    pub fn slice(elem: Type, items: Vec<Value>) -> Self {
        Value::Slice {
            elem,
            items: Some(items),
        }
    }

    pub fn nil_slice(elem: Type) -> Self {
        Value::Slice { elem, items: None }
    }

    pub fn array(elem: Type, items: Vec<Value>) -> Self {
        Value::Array { elem, items }
    }

    pub fn map(key: Type, elem: Type, entries: Vec<(Value, Value)>) -> Self {
        Value::Map {
            key,
            elem,
            entries: Some(entries),
        }
    }

    pub fn nil_map(key: Type, elem: Type) -> Self {
        Value::Map {
            key,
            elem,
            entries: None,
        }
    }

    /// A fresh pointer to `value`. Pointing at untyped nil yields a pointer
    /// to an empty-interface variable.
    pub fn ptr(value: Value) -> Self {
        let elem = value
            .type_of()
            .unwrap_or_else(|| Type::Interface(InterfaceType::empty()));
        Value::Pointer {
            elem,
            target: Some(Arc::new(value)),
        }
    }

    pub fn nil_ptr(elem: Type) -> Self {
        Value::Pointer { elem, target: None }
    }

    /// A pointer to a nil variable declared with the interface type `iface`.
    pub fn iface_ptr(iface: &Arc<InterfaceType>) -> Self {
        Value::Pointer {
            elem: Type::interface(iface),
            target: Some(Arc::new(Value::Nil)),
        }
    }

    pub fn chan(elem: Type, buffered: usize) -> Self {
        Value::Chan {
            elem,
            handle: Some(Arc::new(ChanHandle { buffered })),
        }
    }

    pub fn nil_chan(elem: Type) -> Self {
        Value::Chan { elem, handle: None }
    }

    /// A function taking no arguments.
    pub fn func0(body: impl Fn() -> Value + Send + Sync + 'static) -> Self {
        Value::func(0, move |_| body())
    }

    pub fn func(arity: usize, body: impl Fn(&[Value]) -> Value + Send + Sync + 'static) -> Self {
        Value::Func(Func {
            arity,
            body: Some(Arc::new(body)),
        })
    }

    pub fn nil_func(arity: usize) -> Self {
        Value::Func(Func { arity, body: None })
    }

    pub fn error(message: impl AsRef<str>) -> Self {
        Value::Error(ErrorValue {
            message: Arc::from(message.as_ref()),
        })
    }

    /// An anonymous struct. Untyped nil fields are typed as `interface {}`.
    pub fn structure<S: Into<String>>(fields: impl IntoIterator<Item = (S, Value)>) -> Self {
        let (fields, values) = fields
            .into_iter()
            .map(|(name, value)| {
                let ty = value
                    .type_of()
                    .unwrap_or_else(|| Type::Interface(InterfaceType::empty()));
                (
                    Field {
                        name: name.into(),
                        ty,
                    },
                    value,
                )
            })
            .unzip();
        Value::Struct { fields, values }
    }

    pub fn named(ty: &Arc<NamedType>, inner: Value) -> Self {
        Value::Named {
            ty: Arc::clone(ty),
            inner: Box::new(inner),
        }
    }

    /// Panics with this value as the payload, the way a probed function
    /// raises an abrupt fault.
    pub fn panic_with(self) -> ! {
        std::panic::panic_any(self)
    }

    /// Dynamic type, or `None` for untyped nil.
    pub fn type_of(&self) -> Option<Type> {
        let ty = match self {
            Value::Nil => return None,
            Value::Bool(_) => Type::Bool,
            Value::Int(kind, _) => Type::Int(*kind),
            Value::Uint(kind, _) => Type::Uint(*kind),
            Value::Float(kind, _) => Type::Float(*kind),
            Value::String(_) => Type::String,
            Value::Slice { elem, .. } => Type::slice(elem.clone()),
            Value::Array { elem, items } => Type::array(items.len(), elem.clone()),
            Value::Map { key, elem, .. } => Type::map(key.clone(), elem.clone()),
            Value::Pointer { elem, .. } => Type::pointer(elem.clone()),
            Value::Chan { elem, .. } => Type::chan(elem.clone()),
            Value::Func(func) => Type::Func(func.arity),
            Value::Struct { fields, .. } => Type::Struct(fields.clone()),
            Value::Named { ty, .. } => Type::Named(Arc::clone(ty)),
            Value::Error(_) => Type::Error,
        };
        Some(ty)
    }

    /// Display name of the dynamic type; `<nil>` for untyped nil.
    pub fn type_name(&self) -> String {
        self.type_of()
            .map(|ty| ty.to_string())
            .unwrap_or_else(|| "<nil>".to_string())
    }

    /// Strips named-type wrappers.
    pub fn underlying(&self) -> &Value {
        match self {
            Value::Named { inner, .. } => inner.underlying(),
            other => other,
        }
    }

    pub fn is_nil(&self) -> bool {
        match self.underlying() {
            Value::Nil => true,
            Value::Slice { items, .. } => items.is_none(),
            Value::Map { entries, .. } => entries.is_none(),
            Value::Pointer { target, .. } => target.is_none(),
            Value::Chan { handle, .. } => handle.is_none(),
            Value::Func(func) => func.body.is_none(),
            _ => false,
        }
    }

    /// Length of strings (in bytes), slices, arrays, maps and channels.
    pub fn len(&self) -> Option<usize> {
        match self.underlying() {
            Value::String(s) => Some(s.len()),
            Value::Slice { items, .. } => Some(items.as_ref().map_or(0, Vec::len)),
            Value::Array { items, .. } => Some(items.len()),
            Value::Map { entries, .. } => Some(entries.as_ref().map_or(0, Vec::len)),
            Value::Chan { handle, .. } => Some(handle.as_ref().map_or(0, |h| h.buffered)),
            _ => None,
        }
    }

    /// The text of a plain `string` value (named string types excluded).
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// The text of any string-kinded value, named string types included.
    pub fn as_string_kind(&self) -> Option<&str> {
        match self.underlying() {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Calls the string-returning method `name` if the value's method set
    /// has it with a body.
    pub fn call_string_method(&self, name: &str) -> Option<String> {
        match self {
            Value::Error(err) if name == "Error" => Some(err.message().to_string()),
            Value::Named { ty, .. } => {
                let method = ty.find_method(name)?;
                if method.pointer_receiver {
                    return None;
                }
                method.body.as_ref().map(|body| body(self))
            }
            Value::Pointer {
                elem: Type::Named(ty),
                target: Some(target),
            } => {
                let method = ty.find_method(name)?;
                method.body.as_ref().map(|body| body(target))
            }
            _ => None,
        }
    }

    /// Message of an error-like value (anything with a callable `Error()`).
    pub fn error_text(&self) -> Option<String> {
        self.call_string_method("Error")
    }

    /// Result of `String()` for stringer values.
    pub fn stringer_text(&self) -> Option<String> {
        self.call_string_method("String")
    }

    /// Text form used in failure descriptions: `Error()` first, then `String()`.
    pub fn text_form(&self) -> Option<String> {
        self.error_text().or_else(|| self.stringer_text())
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

/// Structural equality; see [`crate::equality::deep_equal`].
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        crate::equality::deep_equal(self, other)
    }
}

fn join<T: fmt::Display>(items: impl IntoIterator<Item = T>) -> String {
    items
        .into_iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn write_struct_body(f: &mut fmt::Formatter<'_>, fields: &[Field], values: &[Value]) -> fmt::Result {
    let parts: Vec<String> = fields
        .iter()
        .zip(values)
        .map(|(field, value)| format!("{}:{}", field.name, value))
        .collect();
    write!(f, "{{{}}}", parts.join(", "))
}

/// Go-syntax-like rendering used by failure descriptions.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => f.write_str("nil"),
            Value::Bool(v) => write!(f, "{}", v),
            Value::Int(_, v) => write!(f, "{}", v),
            Value::Uint(_, v) => write!(f, "0x{:x}", v),
            Value::Float(_, v) => write!(f, "{}", v),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Slice { elem, items: None } => write!(f, "[]{}(nil)", elem),
            Value::Slice {
                elem,
                items: Some(items),
            } => write!(f, "[]{}{{{}}}", elem, join(items)),
            Value::Array { elem, items } => write!(f, "[{}]{}{{{}}}", items.len(), elem, join(items)),
            Value::Map {
                key,
                elem,
                entries: None,
            } => write!(f, "map[{}]{}(nil)", key, elem),
            Value::Map {
                key,
                elem,
                entries: Some(entries),
            } => {
                let mut parts: Vec<String> = entries
                    .iter()
                    .map(|(k, v)| format!("{}:{}", k, v))
                    .collect();
                parts.sort();
                write!(f, "map[{}]{}{{{}}}", key, elem, parts.join(", "))
            }
            Value::Pointer { elem, target: None } => write!(f, "(*{})(nil)", elem),
            Value::Pointer {
                target: Some(target),
                ..
            } => write!(f, "&{}", target),
            Value::Chan { elem, handle: None } => write!(f, "(chan {})(nil)", elem),
            Value::Chan {
                elem,
                handle: Some(handle),
            } => write!(f, "(chan {})(len={})", elem, handle.buffered),
            Value::Func(func) => {
                let ty = Type::Func(func.arity);
                match func.body {
                    Some(_) => write!(f, "({})(func)", ty),
                    None => write!(f, "({})(nil)", ty),
                }
            }
            Value::Struct { fields, values } => {
                write!(f, "{}", Type::Struct(fields.clone()))?;
                write_struct_body(f, fields, values)
            }
            Value::Named { ty, inner } => match inner.as_ref() {
                Value::Struct { fields, values } => {
                    f.write_str(&ty.name)?;
                    write_struct_body(f, fields, values)
                }
                other => write!(f, "{}({})", ty.name, other),
            },
            Value::Error(err) => write!(f, "&errors.errorString{{s:{:?}}}", err.message()),
        }
    }
}
