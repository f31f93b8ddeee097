//! `package.json` rewriting.

use serde_json::Value;

use super::error::DomainError;
use super::project::ProjectName;

/// Set `name` to the project name and `private` to `true`.
///
/// Existing keys keep their order; missing keys are appended. Output is
/// two-space indented JSON.
pub fn patch_package_json(raw: &str, name: &ProjectName) -> Result<String, DomainError> {
    let mut manifest: Value =
        serde_json::from_str(raw).map_err(|e| DomainError::InvalidManifest {
            reason: e.to_string(),
        })?;

    let Some(fields) = manifest.as_object_mut() else {
        return Err(DomainError::InvalidManifest {
            reason: "top-level value is not an object".into(),
        });
    };

    fields.insert("name".into(), Value::String(name.as_str().into()));
    fields.insert("private".into(), Value::Bool(true));

    serde_json::to_string_pretty(&manifest).map_err(|e| DomainError::InvalidManifest {
        reason: e.to_string(),
    })
}
