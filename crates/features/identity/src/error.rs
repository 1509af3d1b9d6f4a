use std::borrow::Cow;
use thesis_database::DatabaseError;
use thesis_kernel::prelude::ApiError;

/// A specialized [`IdentityError`] enum of this crate.
#[thesis_derive::thesis_error]
pub enum IdentityError {
    /// Token service misconfiguration (empty secret).
    #[error("Identity config error{}: {message}", format_context(.context))]
    Config { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("{message}{}", format_context(.context))]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Missing, malformed or rejected credentials.
    #[error("{message}{}", format_context(.context))]
    Unauthorized { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("{message}{}", format_context(.context))]
    NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("{message}{}", format_context(.context))]
    Conflict { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Token error{}: {source}", format_context(.context))]
    Token {
        #[source]
        source: jsonwebtoken::errors::Error,
        context: Option<Cow<'static, str>>,
    },

    #[error("Database error{}: {source}", format_context(.context))]
    Database {
        #[source]
        source: DatabaseError,
        context: Option<Cow<'static, str>>,
    },

    #[error("Internal identity error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl From<IdentityError> for ApiError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::Validation { message, context } => Self::Validation { message, context },
            IdentityError::Unauthorized { message, context } => {
                Self::Unauthorized { message, context }
            },
            IdentityError::NotFound { message, context } => Self::NotFound { message, context },
            IdentityError::Conflict { message, context } => Self::Conflict { message, context },
            IdentityError::Token { .. } => Self::unauthorized(crate::auth::INVALID_TOKEN),
            other => Self::internal(other.to_string()),
        }
    }
}
