use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::callsite::CallSiteNamer;
use crate::error::ConfigError;
use crate::protocol::ProtocolReporter;
use crate::reporter::Reporter;
use crate::text::TextReporter;

pub const SUPPORTED_CONFIG_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Subunit,
}

/// Reporter settings, usually read from a `verity.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportConfig {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub verbosity: u8,
    #[serde(default)]
    pub format: ReportFormat,
    /// Subunit only.
    #[serde(default)]
    pub timestamps: bool,
    /// Call-site paths are shown relative to this; defaults to the working
    /// directory.
    #[serde(default)]
    pub base_dir: Option<PathBuf>,
}

fn default_version() -> u32 {
    SUPPORTED_CONFIG_VERSION
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            version: SUPPORTED_CONFIG_VERSION,
            verbosity: 0,
            format: ReportFormat::Text,
            timestamps: false,
            base_dir: None,
        }
    }
}

pub fn parse_config(raw: &str) -> Result<ReportConfig, ConfigError> {
    let cfg: ReportConfig = serde_yaml::from_str(raw)?;
    if cfg.version != SUPPORTED_CONFIG_VERSION {
        return Err(ConfigError::UnsupportedVersion {
            found: cfg.version,
            supported: SUPPORTED_CONFIG_VERSION,
        });
    }
    Ok(cfg)
}

pub fn load_config(path: &Path) -> Result<ReportConfig, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let cfg = parse_config(&raw)?;
    tracing::debug!(
        path = %path.display(),
        verbosity = cfg.verbosity,
        format = ?cfg.format,
        "loaded report config"
    );
    Ok(cfg)
}

/// Builds the reporter `cfg` describes on top of `writer`.
pub fn build_reporter<W>(cfg: &ReportConfig, writer: W) -> Box<dyn Reporter>
where
    W: Write + Send + 'static,
{
    match cfg.format {
        ReportFormat::Text => {
            let namer = match &cfg.base_dir {
                Some(dir) => CallSiteNamer::new(Some(dir.clone())),
                None => CallSiteNamer::from_current_dir(),
            };
            Box::new(TextReporter::new(writer, cfg.verbosity).with_namer(namer))
        }
        ReportFormat::Subunit => {
            Box::new(ProtocolReporter::new(writer).with_timestamps(cfg.timestamps))
        }
    }
}
