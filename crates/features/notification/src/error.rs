use std::borrow::Cow;
use thesis_event_bus::EventBusError;
use thesis_group::GroupError;
use thesis_identity::IdentityError;

/// A specialized [`NotificationError`] enum of this crate.
#[thesis_derive::thesis_error]
pub enum NotificationError {
    #[error("Mail delivery failed{}: {message}", format_context(.context))]
    Delivery { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("{source}{}", format_context(.context))]
    Identity {
        #[source]
        source: IdentityError,
        context: Option<Cow<'static, str>>,
    },

    #[error("{source}{}", format_context(.context))]
    Group {
        #[source]
        source: GroupError,
        context: Option<Cow<'static, str>>,
    },

    #[error("Event bus error{}: {source}", format_context(.context))]
    EventBus {
        #[source]
        source: EventBusError,
        context: Option<Cow<'static, str>>,
    },

    #[error("Internal notification error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
