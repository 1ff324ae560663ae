pub mod callsite;
pub mod case;
pub mod config;
pub mod error;
pub mod protocol;
pub mod reporter;
pub mod subunit;
pub mod text;

pub use callsite::{nice_function_name, CallSite, CallSiteNamer};
pub use case::{CaseKind, CaseRecord, CaseStatus, LifecycleEvent, TestCaseView};
pub use config::{build_reporter, load_config, ReportConfig, ReportFormat};
pub use error::{ConfigError, DecodeError, EncodeError};
pub use protocol::ProtocolReporter;
pub use reporter::Reporter;
pub use text::TextReporter;
