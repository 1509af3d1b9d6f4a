use axum::Router;
use axum::middleware::from_fn_with_state;
use thesis::features::identity::require_auth;
use thesis::kernel::prelude::ApiState;
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_axum::router::OpenApiRouter;
use utoipa_scalar::{Scalar, Servable};

#[derive(OpenApi)]
#[openapi(
    info(title = "ThesisHub API", description = "Thesis registration and defense workflow"),
    modifiers(&BearerAuth)
)]
struct ApiDoc;

/// Registers the `bearer` scheme referenced by the handlers' `security` blocks.
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new().scheme(HttpAuthScheme::Bearer).bearer_format("JWT").build(),
            ),
        );
    }
}

#[allow(unreachable_pub)]
pub fn init(state: ApiState) -> Router {
    let api = ApiDoc::openapi();

    // Everything under /api passes the bearer check; /health stays public
    let protected = thesis::api_router().layer(from_fn_with_state(state.clone(), require_auth));

    let (openapi_routes, api_doc) = OpenApiRouter::with_openapi(api)
        .merge(thesis::server::router::system_router())
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
        .split_for_parts();

    let scalar_routes = Scalar::with_url("/api", api_doc);

    Router::new().merge(openapi_routes).merge(scalar_routes)
}
