use std::borrow::Cow;
use thesis_database::DatabaseError;
use thesis_identity::IdentityError;
use thesis_kernel::prelude::ApiError;
use thesis_settings::SettingsError;
use thesis_topic::TopicError;

/// A specialized [`GroupError`] enum of this crate.
#[thesis_derive::thesis_error]
pub enum GroupError {
    #[error("{message}{}", format_context(.context))]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

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
    Settings {
        #[source]
        source: SettingsError,
        context: Option<Cow<'static, str>>,
    },

    #[error("{source}{}", format_context(.context))]
    Topic {
        #[source]
        source: TopicError,
        context: Option<Cow<'static, str>>,
    },

    #[error("Database error{}: {source}", format_context(.context))]
    Database {
        #[source]
        source: DatabaseError,
        context: Option<Cow<'static, str>>,
    },

    #[error("Internal group error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl From<GroupError> for ApiError {
    fn from(err: GroupError) -> Self {
        match err {
            GroupError::Validation { message, context } => Self::Validation { message, context },
            GroupError::Forbidden { message, context } => Self::Forbidden { message, context },
            GroupError::NotFound { message, context } => Self::NotFound { message, context },
            GroupError::Conflict { message, context } => Self::Conflict { message, context },
            GroupError::Identity { source, .. } => source.into(),
            GroupError::Settings { source, .. } => source.into(),
            GroupError::Topic { source, .. } => source.into(),
            other => Self::internal(other.to_string()),
        }
    }
}
