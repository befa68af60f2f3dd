use std::collections::HashSet;

use crate::visibility::types::{CustomField, Directive, Group, VisibilityRule};

/// Single resolution pass: match the configured rules against the field
/// registry and the viewer's groups, producing directives in emission order.
/// Stateless and run-to-completion; callers share the inputs immutably.
///
/// - Rules with blank field names are dropped first; rule indices count the
///   remaining rules.
/// - Field lookup is a case-insensitive exact match on the registry name;
///   rules naming an unknown field yield nothing.
/// - One hide directive per field id, emitted on first encounter, so every
///   hide for a field precedes any show for it.
/// - One show directive per rule the viewer satisfies, tagged with the rule
///   index; multiple satisfied rules for the same field each contribute one.
///
/// Nothing here can fail: every abnormal input is a no-op, because absent
/// configuration must never break the page.
pub fn resolve(
    viewer_groups: &[Group],
    fields: &[CustomField],
    rules: &[VisibilityRule],
) -> Vec<Directive> {
    let active: Vec<&VisibilityRule> = rules
        .iter()
        .filter(|r| !r.field_name.trim().is_empty())
        .collect();

    if active.is_empty() || fields.is_empty() {
        return Vec::new();
    }

    let mut directives = Vec::new();
    let mut hidden: HashSet<u64> = HashSet::new();

    for (rule_index, rule) in active.iter().enumerate() {
        let wanted = rule.field_name.to_lowercase();
        let Some(field) = fields.iter().find(|f| f.name.to_lowercase() == wanted) else {
            continue;
        };

        if hidden.insert(field.id) {
            directives.push(Directive::hide(field));
        }

        if rule.allowed_groups.matches(viewer_groups) {
            directives.push(Directive::show(field, rule_index));
        }
    }

    directives
}
