use crate::visibility::types::Directive;

/// Every DOM shape a public profile field can appear under in the host markup:
/// the generic and namespaced public-field classes, the same two inside a user
/// card, the id-suffixed field class in its three scopes, and the data-attribute
/// form inside a collapsed card.
fn selectors(field_id: u64, token: &str) -> [String; 8] {
    [
        format!(".public-user-field.{token}"),
        format!(".public-user-field.public-user-field__{token}"),
        format!(".user-card .public-user-field.{token}"),
        format!(".user-card .public-user-field__{token}"),
        format!(".user-field-{field_id}"),
        format!(".user-profile-fields .user-field-{field_id}"),
        format!(".public-user-fields .user-field-{field_id}"),
        format!(".collapsed-info .user-field[data-field-id=\"{field_id}\"]"),
    ]
}

/// Render a directive as CSS text, one rule per selector shape. Show rules use
/// the same selector set as hide rules at equal specificity, so whichever is
/// applied later wins in the consuming stylesheet.
pub fn render(directive: &Directive) -> String {
    let display = directive.display().css_value();
    selectors(directive.field_id, &directive.css_token)
        .iter()
        .map(|sel| format!("{sel} {{ display: {display} !important; }}"))
        .collect::<Vec<_>>()
        .join("\n")
}
