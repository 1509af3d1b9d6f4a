use std::borrow::Cow;
use thesis_database::DatabaseError;
use thesis_identity::IdentityError;
use thesis_kernel::prelude::ApiError;
use thesis_period::PeriodError;
use thesis_settings::SettingsError;

/// A specialized [`TopicError`] enum of this crate.
#[thesis_derive::thesis_error]
pub enum TopicError {
    #[error("{message}{}", format_context(.context))]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The caller may see the topic but not change it.
    #[error("{message}{}", format_context(.context))]
    Forbidden { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("{message}{}", format_context(.context))]
    NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("{message}{}", format_context(.context))]
    Conflict { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("{source}{}", format_context(.context))]
    Identity {
        #[source]
        source: IdentityError,
        context: Option<Cow<'static, str>>,
    },

    #[error("{source}{}", format_context(.context))]
    Period {
        #[source]
        source: PeriodError,
        context: Option<Cow<'static, str>>,
    },

    #[error("{source}{}", format_context(.context))]
    Settings {
        #[source]
        source: SettingsError,
        context: Option<Cow<'static, str>>,
    },

    #[error("Database error{}: {source}", format_context(.context))]
    Database {
        #[source]
        source: DatabaseError,
        context: Option<Cow<'static, str>>,
    },

    #[error("Internal topic error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl From<TopicError> for ApiError {
    fn from(err: TopicError) -> Self {
        match err {
            TopicError::Validation { message, context } => Self::Validation { message, context },
            TopicError::Forbidden { message, context } => Self::Forbidden { message, context },
            TopicError::NotFound { message, context } => Self::NotFound { message, context },
            TopicError::Conflict { message, context } => Self::Conflict { message, context },
            TopicError::Identity { source, .. } => source.into(),
            TopicError::Period { source, .. } => source.into(),
            TopicError::Settings { source, .. } => source.into(),
            other => Self::internal(other.to_string()),
        }
    }
}
