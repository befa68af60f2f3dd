//! Umbriel - per-viewer visibility for forum profile custom fields.
//!
//! Administrators write rules mapping a custom field name to the groups allowed
//! to see it. The resolver turns a viewer's group memberships into CSS show/hide
//! directives, which a sink realizes as style elements.

pub mod settings;
pub mod visibility;
