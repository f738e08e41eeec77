use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiFieldsError {
    #[error("Configuration error on {entity}.{field}: {message}")]
    Configuration {
        entity: &'static str,
        field: String,
        message: String,
    },
    #[error("Config error: {0}")]
    Config(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl ApiFieldsError {
    pub fn configuration(entity: &'static str, field: &str, message: impl Into<String>) -> Self {
        Self::Configuration {
            entity,
            field: field.to_owned(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiFieldsError>;

// Helper conversions
impl From<serde_json::Error> for ApiFieldsError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

impl From<config::ConfigError> for ApiFieldsError {
    fn from(e: config::ConfigError) -> Self {
        Self::Config(e.to_string())
    }
}
