use std::path::Path;

use crate::visibility::errors::VisibilityError;
use crate::visibility::rules::parse_kdl_document;
use crate::visibility::types::{CustomField, VisibilityRule};
use crate::visibility::VisibilityState;

/// Load all `.kdl` rules files from the given directory, in sorted filename
/// order, and concatenate their rules. Rule indices count positions in the
/// concatenated list.
pub fn load_rules(dir: &Path) -> Result<Vec<VisibilityRule>, VisibilityError> {
    if !dir.is_dir() {
        return Err(VisibilityError::InvalidRule(format!(
            "rules directory `{}` does not exist or is not a directory",
            dir.display()
        )));
    }

    let mut entries: Vec<_> = std::fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.path()
                .extension()
                .map(|ext| ext == "kdl")
                .unwrap_or(false)
        })
        .collect();
    entries.sort_by_key(|e| e.path());

    let mut rules = Vec::new();
    let mut file_count = 0;

    for entry in entries {
        let path = entry.path();
        let contents =
            std::fs::read_to_string(&path).map_err(|source| VisibilityError::RulesLoadError {
                path: path.display().to_string(),
                source,
            })?;
        rules.extend(parse_kdl_document(&contents)?);
        file_count += 1;
    }

    tracing::debug!(files = file_count, rules = rules.len(), "Parsed rules files");

    Ok(rules)
}

/// Load the site's field registry export. A missing file is tolerated as "no
/// fields configured": the resolver then produces nothing, and misconfiguration
/// never takes the page down.
///
/// Accepts either a bare JSON array of fields or a site export object with a
/// `user_fields` array.
pub fn load_field_registry(path: &Path) -> Result<Vec<CustomField>, VisibilityError> {
    if !path.exists() {
        tracing::warn!(
            path = %path.display(),
            "Field registry not found; treating as no fields configured"
        );
        return Ok(Vec::new());
    }

    let contents =
        std::fs::read_to_string(path).map_err(|source| VisibilityError::RegistryLoad {
            path: path.display().to_string(),
            source,
        })?;

    let value: serde_json::Value =
        serde_json::from_str(&contents).map_err(|source| VisibilityError::RegistryParse {
            path: path.display().to_string(),
            source,
        })?;

    let fields_value = match value {
        serde_json::Value::Object(mut map) => map
            .remove("user_fields")
            .unwrap_or(serde_json::Value::Array(Vec::new())),
        other => other,
    };

    serde_json::from_value(fields_value).map_err(|source| VisibilityError::RegistryParse {
        path: path.display().to_string(),
        source,
    })
}

/// Load and assemble the full immutable visibility state.
pub fn load_state(
    rules_dir: &Path,
    field_registry: &Path,
) -> Result<VisibilityState, VisibilityError> {
    let rules = load_rules(rules_dir)?;
    let fields = load_field_registry(field_registry)?;

    for rule in &rules {
        let known = fields
            .iter()
            .any(|f| f.name.to_lowercase() == rule.field_name.to_lowercase());
        if !known {
            tracing::warn!(
                field = %rule.field_name,
                "Rule references a field not present in the registry; it will be ignored"
            );
        }
    }

    tracing::info!(
        fields = fields.len(),
        rules = rules.len(),
        "Loaded field visibility configuration"
    );

    Ok(VisibilityState { fields, rules })
}
