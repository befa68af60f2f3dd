use miette::Diagnostic;
use thiserror::Error;

/// Load-time failures only. Resolution itself is total: once the state is
/// loaded, no request path can produce one of these.
#[derive(Debug, Error, Diagnostic)]
pub enum VisibilityError {
    #[error("Failed to load rules file `{path}`")]
    #[diagnostic(
        code(umbriel::visibility::rules_load),
        help("Check that the file exists and contains valid KDL syntax")
    )]
    RulesLoadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid visibility rule: {0}")]
    #[diagnostic(
        code(umbriel::visibility::invalid_rule),
        help("Rule syntax: rule \"<field name>\" {{ allowed-groups {{ - <group id> }} }} or field \"<field name>\" allowed-groups=\"name|name\"")
    )]
    InvalidRule(String),

    #[error("KDL parse error: {0}")]
    #[diagnostic(
        code(umbriel::visibility::kdl_parse),
        help("Check your KDL file syntax — see https://kdl.dev for the specification")
    )]
    KdlParse(String),

    #[error("Failed to read field registry `{path}`")]
    #[diagnostic(
        code(umbriel::visibility::registry_load),
        help("Point [content].field_registry at a JSON export of the site's user fields")
    )]
    RegistryLoad {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse field registry `{path}`: {source}")]
    #[diagnostic(
        code(umbriel::visibility::registry_parse),
        help("The registry must be a JSON array of fields, or an object with a `user_fields` array")
    )]
    RegistryParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error: {0}")]
    #[diagnostic(code(umbriel::visibility::io))]
    Io(#[from] std::io::Error),
}
