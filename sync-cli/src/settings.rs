//! Job settings file loading.
//!
//! The settings file is a JSON array of job settings objects. Each entry
//! must carry a non-empty `name`; everything else is opaque and passed to
//! the registry untouched.

use anyhow::{bail, Context, Result};
use remote_traits::JobSpec;
use serde_json::Value;
use std::fs;
use std::path::Path;

pub fn load_job_specs(path: &Path) -> Result<Vec<JobSpec>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("could not read job settings file {}", path.display()))?;
    let declared: Value = serde_json::from_str(&raw)
        .with_context(|| format!("job settings file {} is not valid JSON", path.display()))?;

    let Some(entries) = declared.as_array() else {
        bail!(
            "job settings file {} must contain a JSON array of job settings objects",
            path.display()
        );
    };

    entries
        .iter()
        .map(|entry| {
            let name = entry
                .get("name")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .with_context(|| {
                    format!("every job settings entry needs a non-empty \"name\": {}", entry)
                })?;
            Ok(JobSpec {
                name: name.to_string(),
                settings: entry.clone(),
            })
        })
        .collect()
}
