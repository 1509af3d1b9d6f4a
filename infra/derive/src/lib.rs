#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros shared by every ThesisHub crate.
//!
//! * [`thesis_error`] turns an enum into a context-aware `thiserror` error.
//! * [`api_model`] / [`api_handler`] keep DTOs and handlers consistent with the
//!   `OpenAPI` document.
//! * [`thesis_slice`] builds the `Arc` handle registered in the API state.
//! * [`main`] bootstraps the tuned Tokio runtime.
//!
//! Examples are `ignore`d here because they need the consuming crates.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, ItemFn, ItemStruct, parse_macro_input};

/// Attribute macro that replaces `#[tokio::main]` with a runtime built from
/// a `thesis_runtime::RuntimeConfig` preset.
///
/// Accepted presets: `high_performance`, `memory_efficient`, `default`
/// (or no argument). The function must be `async` and return a `Result`.
///
/// ```rust,ignore
/// #[thesis_runtime::main(high_performance)]
/// async fn main() -> anyhow::Result<()> {
///     Ok(())
/// }
/// ```
#[proc_macro_attribute]
pub fn main(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    macros::runtime::expand_main(args.into(), input).into()
}

/// Declares a request/response DTO.
///
/// Adds `Debug`, `Serialize`, `Deserialize` and `utoipa::ToSchema` when they
/// are not derived already, and applies `#[serde(rename_all = "camelCase")]`
/// plus `#[serde(deny_unknown_fields)]`.
///
/// Both defaults can be changed:
///
/// ```rust,ignore
/// #[api_model(rename_all = "snake_case", deny_unknown_fields = false)]
/// pub struct TopicFilter {
///     pub semester: Option<String>,
/// }
/// ```
#[proc_macro_attribute]
pub fn api_model(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemStruct);
    macros::api::expand_api_model(attr.into(), input).into()
}

/// Wraps an Axum handler with `utoipa::path` so `utoipa_axum::routes!` can
/// pick it up. Arguments are forwarded verbatim to `utoipa::path`.
///
/// ```rust,ignore
/// #[api_handler(
///     get,
///     path = "/api/councils/{id}",
///     params(("id" = String, Path)),
///     responses((status = OK, body = ApiResponse<CouncilView>)),
///     tag = COUNCIL_TAG,
/// )]
/// pub async fn get_council(/* extractors */) -> Result<ApiResponse<CouncilView>, ApiError> {
///     todo!()
/// }
/// ```
#[proc_macro_attribute]
pub fn api_handler(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    macros::api::expand_api_handler(args.into(), input).into()
}

/// Turns an enum with named-field variants into a crate error type.
///
/// # Generated items
///
/// * `#[derive(Debug, thiserror::Error)]` unless already present.
/// * `<Name>Ext` trait with `.context(..)` for `Result<T, Name>` and for
///   `Result<T, Source>` of every variant holding a `source` field.
/// * `From<Source>` for every such variant.
/// * `From<&'static str>` / `From<String>` when an `Internal` variant exists.
/// * a private `format_context` helper for the `#[error(..)]` strings.
///
/// # Requirements
///
/// * Only named-field variants.
/// * A variant with a source must also carry
///   `context: Option<Cow<'static, str>>`.
///
/// ```rust,ignore
/// #[thesis_derive::thesis_error]
/// pub enum CouncilError {
///     #[error("Database error{}: {source}", format_context(.context))]
///     Database { source: thesis_database::DatabaseError, context: Option<Cow<'static, str>> },
///
///     #[error("Not found{}: {message}", format_context(.context))]
///     NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
/// ```
#[proc_macro_attribute]
pub fn thesis_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand_derive(input).into()
}

/// Turns a struct into a vertical-slice handle: the fields move into a
/// `<Name>Inner` struct and `<Name>` becomes a cheap `Arc` wrapper that
/// derefs to it and implements `FeatureSlice`.
///
/// ```rust,ignore
/// #[thesis_derive::thesis_slice]
/// pub struct Councils {
///     pub service: CouncilService,
/// }
///
/// let slice = Councils::new(CouncilsInner { service });
/// ```
#[proc_macro_attribute]
pub fn thesis_slice(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(item as ItemStruct);
    macros::slice::expand_slice(input).into()
}
