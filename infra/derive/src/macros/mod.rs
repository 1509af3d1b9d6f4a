pub mod api;
mod attrs;
pub mod error;
pub mod runtime;
pub mod slice;
