use crate::visibility::errors::VisibilityError;
use crate::visibility::types::{GroupSelector, VisibilityRule};
use kdl::KdlDocument;

/// Parse a KDL rules document into visibility rules, in declaration order.
///
/// Two shapes are accepted and normalized into one `GroupSelector`:
///
/// ```kdl
/// // legacy slot shape: pipe-delimited group names
/// field "Favorite Color" allowed-groups="staff|vip"
///
/// // current shape: group identifiers
/// rule "Favorite Color" {
///     allowed-groups {
///         - 3
///         - 12
///     }
/// }
/// ```
///
/// Nodes with a missing or blank field name are inert and skipped without error;
/// misconfiguration must never take the field display down with it.
pub fn parse_kdl_document(source: &str) -> Result<Vec<VisibilityRule>, VisibilityError> {
    let doc: KdlDocument = source
        .parse()
        .map_err(|e: kdl::KdlError| VisibilityError::KdlParse(e.to_string()))?;

    let mut rules = Vec::new();

    for node in doc.nodes() {
        match node.name().value() {
            "field" => {
                let Some(field_name) = first_string_arg(node) else {
                    tracing::debug!("skipping `field` node without a field name");
                    continue;
                };
                if field_name.trim().is_empty() {
                    tracing::debug!("skipping `field` node with a blank field name");
                    continue;
                }

                let names = node
                    .get("allowed-groups")
                    .and_then(|e| e.value().as_string())
                    .map(split_group_names)
                    .unwrap_or_default();

                rules.push(VisibilityRule {
                    field_name,
                    allowed_groups: GroupSelector::ByName(names),
                });
            }
            "rule" => {
                let Some(field_name) = first_string_arg(node) else {
                    tracing::debug!("skipping `rule` node without a field name");
                    continue;
                };
                if field_name.trim().is_empty() {
                    tracing::debug!("skipping `rule` node with a blank field name");
                    continue;
                }

                let mut group_ids = Vec::new();

                if let Some(children) = node.children() {
                    for child in children.nodes() {
                        match child.name().value() {
                            "allowed-groups" => {
                                group_ids = dash_id_list(child);
                            }
                            other => {
                                return Err(VisibilityError::InvalidRule(format!(
                                    "unexpected child `{other}` in rule `{field_name}` (expected `allowed-groups`)"
                                )));
                            }
                        }
                    }
                }

                rules.push(VisibilityRule {
                    field_name,
                    allowed_groups: GroupSelector::ById(group_ids),
                });
            }
            other => {
                // Ignore comments and unknown top-level nodes with a warning
                tracing::warn!("ignoring unknown top-level KDL node `{other}`");
            }
        }
    }

    Ok(rules)
}

/// Split a pipe-delimited group-name string into trimmed, non-empty tokens.
fn split_group_names(s: &str) -> Vec<String> {
    s.split('|')
        .map(|g| g.trim())
        .filter(|g| !g.is_empty())
        .map(|g| g.to_string())
        .collect()
}

/// Extract the first string argument from a KDL node.
fn first_string_arg(node: &kdl::KdlNode) -> Option<String> {
    node.entries()
        .iter()
        .find(|e| e.name().is_none())
        .and_then(|e| e.value().as_string())
        .map(|s| s.to_string())
}

/// Extract dash-list children holding group identifiers: nodes named "-" whose
/// first argument is a non-negative integer.
fn dash_id_list(node: &kdl::KdlNode) -> Vec<u64> {
    let Some(children) = node.children() else {
        return Vec::new();
    };
    children
        .nodes()
        .iter()
        .filter(|n| n.name().value() == "-")
        .filter_map(|n| {
            n.entries()
                .iter()
                .find(|e| e.name().is_none())
                .and_then(|e| e.value().as_i64())
        })
        .filter(|id| *id >= 0)
        .map(|id| id as u64)
        .collect()
}
