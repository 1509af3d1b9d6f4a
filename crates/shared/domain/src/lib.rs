//! # Domain Models
//!
//! Pure domain types with minimal dependencies (`serde`, `bitflags`, `strum`).
//! Keep it lean: no I/O, networking, or heavy logic, just data and simple helpers.
//!
//! The `openapi` feature derives `utoipa::ToSchema` for the enums exposed in
//! request and response bodies.

pub mod config;
pub mod constants;
pub mod events;
pub mod registry;
pub mod roles;
pub mod settings;
pub mod status;
