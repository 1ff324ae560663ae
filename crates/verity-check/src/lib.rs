pub mod checker;
pub mod checkers;
pub mod comment;
pub mod describe;
pub mod equality;
pub mod registry;
pub mod types;
pub mod value;

pub use checker::{run_check, CheckResult, Checker, CheckerInfo, Not, ParamView};
pub use comment::{CheckComment, Comment};
pub use describe::{describe_failure, indent, verify};
pub use equality::{deep_equal, shallow_equal, Uncomparable};
pub use registry::{builtin_checkers, lookup};
pub use types::{InterfaceType, NamedType, Type};
pub use value::Value;
