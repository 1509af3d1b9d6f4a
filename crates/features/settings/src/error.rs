use std::borrow::Cow;
use thesis_database::DatabaseError;
use thesis_kernel::prelude::ApiError;

/// A specialized [`SettingsError`] enum of this crate.
#[thesis_derive::thesis_error]
pub enum SettingsError {
    #[error("{message}{}", format_context(.context))]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("{message}{}", format_context(.context))]
    NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Database error{}: {source}", format_context(.context))]
    Database {
        #[source]
        source: DatabaseError,
        context: Option<Cow<'static, str>>,
    },

    #[error("Internal settings error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl From<SettingsError> for ApiError {
    fn from(err: SettingsError) -> Self {
        match err {
            SettingsError::Validation { message, context } => Self::Validation { message, context },
            SettingsError::NotFound { message, context } => Self::NotFound { message, context },
            other => Self::internal(other.to_string()),
        }
    }
}
