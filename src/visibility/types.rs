use serde::{Deserialize, Serialize};

/// A custom profile field as defined in the site's field registry.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CustomField {
    pub id: u64,
    pub name: String,
    /// Pre-dasherized name supplied by some registry exports.
    #[serde(default)]
    pub dasherized_name: Option<String>,
}

impl CustomField {
    /// CSS-safe token for this field: the registry's dasherized name when
    /// present, otherwise the lower-cased name with whitespace runs collapsed
    /// to single hyphens.
    pub fn css_token(&self) -> String {
        match &self.dasherized_name {
            Some(d) if !d.trim().is_empty() => d.clone(),
            _ => self
                .name
                .to_lowercase()
                .split_whitespace()
                .collect::<Vec<_>>()
                .join("-"),
        }
    }
}

/// A group the viewer belongs to. Exposes both the identifier and the display
/// name because the two rule shapes match on different keys.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Group {
    pub id: u64,
    pub name: String,
}

/// Which groups a rule admits, in whichever representation the configuration
/// used. Both shapes normalize to this one selector so the resolution pipeline
/// exists only once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupSelector {
    /// Trimmed, non-empty group names (legacy pipe-delimited shape).
    ByName(Vec<String>),
    /// Group identifiers (current shape).
    ById(Vec<u64>),
}

impl GroupSelector {
    /// True when the selector names at least one group the viewer belongs to.
    /// Name matching is exact and case-sensitive; an empty selector never
    /// matches, so a rule with no groups hides its field from everyone.
    pub fn matches(&self, viewer_groups: &[Group]) -> bool {
        match self {
            GroupSelector::ByName(names) => viewer_groups
                .iter()
                .any(|g| names.iter().any(|n| *n == g.name)),
            GroupSelector::ById(ids) => viewer_groups.iter().any(|g| ids.contains(&g.id)),
        }
    }
}

/// An admin-configured mapping from a field name to the groups permitted to
/// see it. A rule whose `field_name` is blank is inert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibilityRule {
    pub field_name: String,
    pub allowed_groups: GroupSelector,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayState {
    Shown,
    Hidden,
}

impl DisplayState {
    pub fn css_value(self) -> &'static str {
        match self {
            DisplayState::Shown => "block",
            DisplayState::Hidden => "none",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DirectiveKind {
    Hide,
    Show { rule_index: usize },
}

/// A computed show/hide instruction for one field, realized downstream as a
/// style element. Hide directives are emitted at most once per field; show
/// directives once per satisfying rule, tagged with the rule's position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    pub field_id: u64,
    pub css_token: String,
    kind: DirectiveKind,
}

impl Directive {
    pub fn hide(field: &CustomField) -> Self {
        Self {
            field_id: field.id,
            css_token: field.css_token(),
            kind: DirectiveKind::Hide,
        }
    }

    pub fn show(field: &CustomField, rule_index: usize) -> Self {
        Self {
            field_id: field.id,
            css_token: field.css_token(),
            kind: DirectiveKind::Show { rule_index },
        }
    }

    pub fn display(&self) -> DisplayState {
        match self.kind {
            DirectiveKind::Hide => DisplayState::Hidden,
            DirectiveKind::Show { .. } => DisplayState::Shown,
        }
    }

    /// Position of the satisfying rule; present on show directives only.
    pub fn rule_index(&self) -> Option<usize> {
        match self.kind {
            DirectiveKind::Hide => None,
            DirectiveKind::Show { rule_index } => Some(rule_index),
        }
    }

    /// Stable style-element id. Hide ids are keyed by field only; show ids also
    /// carry the rule index so directives from different rules never collide.
    pub fn element_id(&self) -> String {
        match self.kind {
            DirectiveKind::Hide => format!("hide-{}", self.field_id),
            DirectiveKind::Show { rule_index } => {
                format!("show-{}-rule-{}", self.field_id, rule_index)
            }
        }
    }
}

// ---------- API request/response types ----------

#[derive(Debug, Deserialize)]
pub struct ResolveRequest {
    /// The viewer's group memberships; empty for unauthenticated viewers.
    #[serde(default)]
    pub groups: Vec<Group>,
}

#[derive(Debug, Serialize)]
pub struct ResolveResponse {
    pub directives: Vec<DirectiveInfo>,
}

#[derive(Debug, Serialize)]
pub struct DirectiveInfo {
    pub id: String,
    pub field_id: u64,
    pub display: DisplayState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_index: Option<usize>,
}

impl From<&Directive> for DirectiveInfo {
    fn from(d: &Directive) -> Self {
        Self {
            id: d.element_id(),
            field_id: d.field_id,
            display: d.display(),
            rule_index: d.rule_index(),
        }
    }
}
