use std::borrow::Cow;
use thesis_database::DatabaseError;
use thesis_group::GroupError;
use thesis_kernel::prelude::ApiError;
use thesis_kernel::timeline::TimelineError;

/// A specialized [`MeetingError`] enum of this crate.
#[thesis_derive::thesis_error]
pub enum MeetingError {
    #[error("{message}{}", format_context(.context))]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("{message}{}", format_context(.context))]
    Forbidden { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

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

    #[error("{source}{}", format_context(.context))]
    Group {
        #[source]
        source: GroupError,
        context: Option<Cow<'static, str>>,
    },

    #[error("Database error{}: {source}", format_context(.context))]
    Database {
        #[source]
        source: DatabaseError,
        context: Option<Cow<'static, str>>,
    },

    #[error("Internal meeting error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl From<MeetingError> for ApiError {
    fn from(err: MeetingError) -> Self {
        match err {
            MeetingError::Validation { message, context } => Self::Validation { message, context },
            MeetingError::Forbidden { message, context } => Self::Forbidden { message, context },
            MeetingError::NotFound { message, context } => Self::NotFound { message, context },
            MeetingError::Conflict { message, context } => Self::Conflict { message, context },
            MeetingError::Timeline { source, .. } => source.into(),
            MeetingError::Group { source, .. } => source.into(),
            other => Self::internal(other.to_string()),
        }
    }
}
