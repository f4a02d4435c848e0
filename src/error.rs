use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Uplink(#[from] UplinkError),

    #[error("No route registered for {0}")]
    RouteNotFound(String),

    #[error(transparent)]
    Bind(#[from] BindError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GatewayError>;

/// Failures turning SDL text into a [`crate::schema::Schema`].
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Cannot parse schema: {0}")]
    Parse(String),

    #[error("Schema has no root query type ({0} is not defined)")]
    MissingQueryType(String),

    #[error("Type {0} is defined more than once")]
    DuplicateType(String),

    #[error("{owner}.{field} refers to unknown type {type_name}")]
    UnknownTypeReference {
        owner: String,
        field: String,
        type_name: String,
    },
}

/// Hard failures of route synthesis. They abort a single root field only.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SynthesisError {
    #[error("Could not find field {field} on type {type_name} in schema")]
    FieldNotFound { type_name: String, field: String },

    #[error("Could not find type {0} in schema")]
    TypeNotFound(String),
}

/// Failures fetching the supergraph from Apollo Studio.
#[derive(Error, Debug)]
pub enum UplinkError {
    #[error("Could not decode graph ref '{0}', expected <graph>@<variant>")]
    InvalidGraphRef(String),

    #[error("Could not retrieve supergraph SDL: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Supergraph fetch failed: {0}")]
    Api(String),

    #[error("Supergraph response for {0} carried no SDL")]
    MissingSdl(String),
}

/// Request values that cannot be bound to a route's variables.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BindError {
    #[error("Unknown parameter: {0}")]
    UnknownParameter(String),

    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    #[error("Parameter {name} expects {expected}, got '{value}'")]
    InvalidValue {
        name: String,
        expected: String,
        value: String,
    },

    #[error("Parameter {0} takes a single value")]
    RepeatedParameter(String),

    #[error("Request body must be a JSON object")]
    BodyNotObject,

    #[error("Request body is not valid JSON: {0}")]
    MalformedBody(String),

    #[error("Query string cannot be decoded: {0}")]
    MalformedQuery(String),
}
