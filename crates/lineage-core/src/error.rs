pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("Root person not found: {person_id}")]
    RootNotFound { person_id: String },

    #[error("Cannot build a tree without any persons")]
    EmptyTree,

    #[error("Invalid configuration ({field}): {message}")]
    Configuration {
        field: &'static str,
        message: String,
    },
}

impl Error {
    pub(crate) fn config(field: &'static str, message: impl Into<String>) -> Self {
        Self::Configuration {
            field,
            message: message.into(),
        }
    }
}
