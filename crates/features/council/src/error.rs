use std::borrow::Cow;
use thesis_database::DatabaseError;
use thesis_group::GroupError;
use thesis_identity::IdentityError;
use thesis_kernel::prelude::ApiError;
use thesis_kernel::timeline::TimelineError;
use thesis_period::PeriodError;
use thesis_settings::SettingsError;

/// A specialized [`CouncilError`] enum of this crate.
#[thesis_derive::thesis_error]
pub enum CouncilError {
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
    Period {
        #[source]
        source: PeriodError,
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

    #[error("Internal council error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl From<CouncilError> for ApiError {
    fn from(err: CouncilError) -> Self {
        match err {
            CouncilError::Validation { message, context } => Self::Validation { message, context },
            CouncilError::NotFound { message, context } => Self::NotFound { message, context },
            CouncilError::Conflict { message, context } => Self::Conflict { message, context },
            CouncilError::Timeline { source, .. } => source.into(),
            CouncilError::Identity { source, .. } => source.into(),
            CouncilError::Settings { source, .. } => source.into(),
            CouncilError::Period { source, .. } => source.into(),
            CouncilError::Group { source, .. } => source.into(),
            other => Self::internal(other.to_string()),
        }
    }
}
