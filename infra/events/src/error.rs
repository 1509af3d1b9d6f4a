use std::borrow::Cow;

/// Errors raised by [`crate::EventBus`].
#[thesis_derive::thesis_error]
pub enum EventBusError {
    /// The channel registered for a type id holds a different payload type.
    #[error("Type mismatch{}: {message}", format_context(.context))]
    TypeMismatch { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A channel must buffer at least one event.
    #[error("Invalid capacity{}: {message}", format_context(.context))]
    InvalidCapacity { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
