//! Export config loader (strict parsing).

pub mod schema;

use std::fs;

use metricscope_core::error::{MetricsError, Result};

pub use schema::{ExportConfig, OutputSection, RequestSection, SeedMetric};

pub fn load_from_file(path: &str) -> Result<ExportConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| MetricsError::Internal(format!("read config failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<ExportConfig> {
    let cfg: ExportConfig = serde_yaml::from_str(s)
        .map_err(|e| MetricsError::BadRequest(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
