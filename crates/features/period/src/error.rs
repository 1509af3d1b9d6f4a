use std::borrow::Cow;
use thesis_database::DatabaseError;
use thesis_kernel::prelude::ApiError;
use thesis_kernel::timeline::TimelineError;

/// A specialized [`PeriodError`] enum of this crate.
#[thesis_derive::thesis_error]
pub enum PeriodError {
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

    #[error("Internal period error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl From<PeriodError> for ApiError {
    fn from(err: PeriodError) -> Self {
        match err {
            PeriodError::Validation { message, context } => Self::Validation { message, context },
            PeriodError::NotFound { message, context } => Self::NotFound { message, context },
            PeriodError::Conflict { message, context } => Self::Conflict { message, context },
            PeriodError::Timeline { source, .. } => source.into(),
            other => Self::internal(other.to_string()),
        }
    }
}
