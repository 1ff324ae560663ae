//! Runtime type descriptors for dynamically typed [`Value`]s.
//!
//! Type names render the way diagnostics print them (`[]uint8`,
//! `map[string]int`, `check_test.myStruct`). Named and interface types are
//! identified by their qualified name; every other type is structural.

use std::fmt;
use std::sync::Arc;

use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntKind {
    Int,
    I8,
    I16,
    I32,
    I64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UintKind {
    Uint,
    U8,
    U16,
    U32,
    U64,
    Uintptr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FloatKind {
    F32,
    F64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub ty: Type,
}

#[derive(Debug, Clone)]
pub enum Type {
    Bool,
    Int(IntKind),
    Uint(UintKind),
    Float(FloatKind),
    String,
    Slice(Box<Type>),
    Array(usize, Box<Type>),
    Map(Box<Type>, Box<Type>),
    Pointer(Box<Type>),
    Chan(Box<Type>),
    /// Function type; only the parameter count is tracked.
    Func(usize),
    Struct(Vec<Field>),
    Named(Arc<NamedType>),
    Interface(Arc<InterfaceType>),
    /// The builtin error implementation (`*errors.errorString`).
    Error,
}

impl Type {
    pub const BOOL: Type = Type::Bool;
    pub const INT: Type = Type::Int(IntKind::Int);
    pub const INT32: Type = Type::Int(IntKind::I32);
    pub const INT64: Type = Type::Int(IntKind::I64);
    pub const UINT8: Type = Type::Uint(UintKind::U8);
    pub const FLOAT64: Type = Type::Float(FloatKind::F64);
    pub const STRING: Type = Type::String;

    pub fn slice(elem: Type) -> Self {
        Type::Slice(Box::new(elem))
    }

    pub fn array(len: usize, elem: Type) -> Self {
        Type::Array(len, Box::new(elem))
    }

    pub fn map(key: Type, elem: Type) -> Self {
        Type::Map(Box::new(key), Box::new(elem))
    }

    pub fn pointer(elem: Type) -> Self {
        Type::Pointer(Box::new(elem))
    }

    pub fn chan(elem: Type) -> Self {
        Type::Chan(Box::new(elem))
    }

    pub fn structure<S: Into<String>>(fields: impl IntoIterator<Item = (S, Type)>) -> Self {
        Type::Struct(
            fields
                .into_iter()
                .map(|(name, ty)| Field {
                    name: name.into(),
                    ty,
                })
                .collect(),
        )
    }

    pub fn interface(iface: &Arc<InterfaceType>) -> Self {
        Type::Interface(Arc::clone(iface))
    }

    /// Strips named types down to the type they are declared over.
    pub fn underlying(&self) -> &Type {
        match self {
            Type::Named(named) => named.underlying.underlying(),
            other => other,
        }
    }

    /// Whether `==` is defined for values of this type.
    pub fn is_comparable(&self) -> bool {
        match self {
            Type::Slice(_) | Type::Map(..) | Type::Func(_) => false,
            Type::Array(_, elem) => elem.is_comparable(),
            Type::Struct(fields) => fields.iter().all(|f| f.ty.is_comparable()),
            Type::Named(named) => named.underlying.is_comparable(),
            _ => true,
        }
    }

    /// Element type of slices, arrays, maps (the value type), pointers and channels.
    pub fn elem(&self) -> Option<&Type> {
        match self.underlying() {
            Type::Slice(elem)
            | Type::Array(_, elem)
            | Type::Map(_, elem)
            | Type::Pointer(elem)
            | Type::Chan(elem) => Some(elem),
            _ => None,
        }
    }

    /// Names of the methods callable on a value of this type.
    pub fn method_set(&self) -> Vec<&str> {
        match self {
            Type::Named(named) => named
                .methods
                .iter()
                .filter(|m| !m.pointer_receiver)
                .map(|m| m.name.as_str())
                .collect(),
            Type::Pointer(elem) => match elem.as_ref() {
                Type::Named(named) => named.methods.iter().map(|m| m.name.as_str()).collect(),
                _ => Vec::new(),
            },
            Type::Interface(iface) => iface.methods.iter().map(String::as_str).collect(),
            Type::Error => vec!["Error"],
            _ => Vec::new(),
        }
    }

    pub fn implements(&self, iface: &InterfaceType) -> bool {
        let methods = self.method_set();
        iface
            .methods
            .iter()
            .all(|required| methods.contains(&required.as_str()))
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Type::Bool, Type::Bool) | (Type::String, Type::String) | (Type::Error, Type::Error) => {
                true
            }
            (Type::Int(a), Type::Int(b)) => a == b,
            (Type::Uint(a), Type::Uint(b)) => a == b,
            (Type::Float(a), Type::Float(b)) => a == b,
            (Type::Slice(a), Type::Slice(b))
            | (Type::Pointer(a), Type::Pointer(b))
            | (Type::Chan(a), Type::Chan(b)) => a == b,
            (Type::Array(n, a), Type::Array(m, b)) => n == m && a == b,
            (Type::Map(ka, va), Type::Map(kb, vb)) => ka == kb && va == vb,
            (Type::Func(a), Type::Func(b)) => a == b,
            (Type::Struct(a), Type::Struct(b)) => a == b,
            (Type::Named(a), Type::Named(b)) => Arc::ptr_eq(a, b) || a.name == b.name,
            (Type::Interface(a), Type::Interface(b)) => Arc::ptr_eq(a, b) || a.name == b.name,
            _ => false,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Bool => f.write_str("bool"),
            Type::Int(kind) => f.write_str(match kind {
                IntKind::Int => "int",
                IntKind::I8 => "int8",
                IntKind::I16 => "int16",
                IntKind::I32 => "int32",
                IntKind::I64 => "int64",
            }),
            Type::Uint(kind) => f.write_str(match kind {
                UintKind::Uint => "uint",
                UintKind::U8 => "uint8",
                UintKind::U16 => "uint16",
                UintKind::U32 => "uint32",
                UintKind::U64 => "uint64",
                UintKind::Uintptr => "uintptr",
            }),
            Type::Float(FloatKind::F32) => f.write_str("float32"),
            Type::Float(FloatKind::F64) => f.write_str("float64"),
            Type::String => f.write_str("string"),
            Type::Slice(elem) => write!(f, "[]{}", elem),
            Type::Array(len, elem) => write!(f, "[{}]{}", len, elem),
            Type::Map(key, elem) => write!(f, "map[{}]{}", key, elem),
            Type::Pointer(elem) => write!(f, "*{}", elem),
            Type::Chan(elem) => write!(f, "chan {}", elem),
            Type::Func(arity) => {
                let params = vec!["interface {}"; *arity];
                write!(f, "func({})", params.join(", "))
            }
            Type::Struct(fields) => {
                if fields.is_empty() {
                    return f.write_str("struct {}");
                }
                let parts: Vec<String> = fields
                    .iter()
                    .map(|field| format!("{} {}", field.name, field.ty))
                    .collect();
                write!(f, "struct {{ {} }}", parts.join("; "))
            }
            Type::Named(named) => f.write_str(&named.name),
            Type::Interface(iface) => f.write_str(&iface.name),
            Type::Error => f.write_str("*errors.errorString"),
        }
    }
}

/// Body of a string-returning method. It receives the receiver value
/// (the pointee for pointer receivers).
pub type MethodFn = Arc<dyn Fn(&Value) -> String + Send + Sync>;

#[derive(Clone)]
pub struct Method {
    pub name: String,
    pub pointer_receiver: bool,
    pub body: Option<MethodFn>,
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Method")
            .field("name", &self.name)
            .field("pointer_receiver", &self.pointer_receiver)
            .field("callable", &self.body.is_some())
            .finish()
    }
}

/// A declared type with its own name and method set.
#[derive(Debug, Clone)]
pub struct NamedType {
    pub name: String,
    pub underlying: Type,
    pub methods: Vec<Method>,
}

impl NamedType {
    pub fn new(name: impl Into<String>, underlying: Type) -> Self {
        Self {
            name: name.into(),
            underlying,
            methods: Vec::new(),
        }
    }

    /// Declares a value-receiver method without a callable body.
    pub fn method(self, name: impl Into<String>) -> Self {
        self.push_method(name.into(), false, None)
    }

    /// Declares a pointer-receiver method without a callable body.
    pub fn pointer_method(self, name: impl Into<String>) -> Self {
        self.push_method(name.into(), true, None)
    }

    pub fn string_method(
        self,
        name: impl Into<String>,
        body: impl Fn(&Value) -> String + Send + Sync + 'static,
    ) -> Self {
        self.push_method(name.into(), false, Some(Arc::new(body)))
    }

    pub fn pointer_string_method(
        self,
        name: impl Into<String>,
        body: impl Fn(&Value) -> String + Send + Sync + 'static,
    ) -> Self {
        self.push_method(name.into(), true, Some(Arc::new(body)))
    }

    fn push_method(mut self, name: String, pointer_receiver: bool, body: Option<MethodFn>) -> Self {
        self.methods.retain(|m| m.name != name);
        self.methods.push(Method {
            name,
            pointer_receiver,
            body,
        });
        self
    }

    pub fn build(self) -> Arc<NamedType> {
        Arc::new(self)
    }

    pub fn find_method(&self, name: &str) -> Option<&Method> {
        self.methods.iter().find(|m| m.name == name)
    }
}

/// A capability set: the method names a value must have.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceType {
    pub name: String,
    pub methods: Vec<String>,
}

impl InterfaceType {
    pub fn new<S: Into<String>>(name: impl Into<String>, methods: impl IntoIterator<Item = S>) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            methods: methods.into_iter().map(Into::into).collect(),
        })
    }

    /// `interface {}`, satisfied by every value.
    pub fn empty() -> Arc<Self> {
        Self::new("interface {}", Vec::<String>::new())
    }

    pub fn error() -> Arc<Self> {
        Self::new("error", ["Error"])
    }

    pub fn runtime_error() -> Arc<Self> {
        Self::new("runtime.Error", ["Error", "RuntimeError"])
    }
}
