pub mod css;
pub mod errors;
pub mod loader;
pub mod resolver;
pub mod rules;
pub mod sink;
pub mod types;
pub mod web;

use types::{CustomField, VisibilityRule};

/// Compiled visibility configuration, loaded from the rules directory and the
/// site's field registry export.
/// Immutable after construction — configuration changes require a service reload.
#[derive(Debug)]
pub struct VisibilityState {
    /// Custom profile fields defined by the site, in registry order.
    pub fields: Vec<CustomField>,
    /// Visibility rules in declaration order (blank-named entries already dropped).
    pub rules: Vec<VisibilityRule>,
}
