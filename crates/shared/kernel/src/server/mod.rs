//! HTTP plumbing shared by every slice router.

pub mod error;
pub mod extract;
mod health;
pub mod response;
pub mod router;
pub mod state;

pub use error::{ApiError, ApiErrorExt, INTERNAL_MESSAGE};
pub use extract::{ApiJson, ApiQuery};
pub use response::{ApiResponse, DeletedResource};
pub use router::system_router;
pub use state::{ApiState, ApiStateBuilder, ApiStateError};
