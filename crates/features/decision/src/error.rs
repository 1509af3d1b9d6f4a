use std::borrow::Cow;
use thesis_database::DatabaseError;
use thesis_kernel::prelude::ApiError;
use thesis_kernel::timeline::TimelineError;

/// A specialized [`DecisionError`] enum of this crate.
#[thesis_derive::thesis_error]
pub enum DecisionError {
    #[error("{message}{}", format_context(.context))]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("{message}{}", format_context(.context))]
    NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("{message}{}", format_context(.context))]
    Conflict { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("{source}{}", format_context(.context))]
    Timeline {
        #[source]
        source: TimelineError,
        context: Option<Cow<'static, str>>,
    },

    #[error("Database error{}: {source}", format_context(.context))]
    Database {
        #[source]
        source: DatabaseError,
        context: Option<Cow<'static, str>>,
    },

    #[error("Internal decision error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl From<DecisionError> for ApiError {
    fn from(err: DecisionError) -> Self {
        match err {
            DecisionError::Validation { message, context } => Self::Validation { message, context },
            DecisionError::NotFound { message, context } => Self::NotFound { message, context },
            DecisionError::Conflict { message, context } => Self::Conflict { message, context },
            DecisionError::Timeline { source, .. } => source.into(),
            other => Self::internal(other.to_string()),
        }
    }
}
