use anyhow::{Context, Result};
use axum::Router;
use axum::body::Body;
use axum::http::Request;
use axum::middleware::{Next, from_fn};
use axum::response::IntoResponse;
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use utoipa::{
    OpenApi,
    openapi::{Info, OpenApiBuilder},
};
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

use crate::{context::AppContext, notifications, settings::WebserverSettings, tokens};

#[derive(OpenApi)]
struct ApiDoc;

/// Builds the HTTP application, including the Swagger UI.
pub fn app(context: AppContext) -> Router {
    let context_arc = Arc::new(context);
    let api_router = OpenApiRouter::new()
        .merge(tokens::router())
        .merge(notifications::router());

    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .nest("/api", api_router)
        .with_state(context_arc)
        .layer(from_fn(error_logging_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .split_for_parts();

    let api = OpenApiBuilder::from(api)
        .info(Info::new("Push Token Registry API", env!("CARGO_PKG_VERSION")))
        .build();

    router.merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api))
}

pub async fn start(settings: &WebserverSettings, context: AppContext) -> Result<()> {
    let router = app(context);

    let host = settings
        .host
        .parse()
        .with_context(|| format!("Invalid webserver host: {}", settings.host))?;
    let addr = SocketAddr::new(host, settings.port);
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    let server = axum::serve(listener, router.into_make_service());

    let socket_addr = server.local_addr()?;
    info!(
        "Starting webserver on {}:{}",
        settings.host,
        socket_addr.port()
    );

    server.await.context("Server error")?;

    Ok(())
}

async fn error_logging_middleware(request: Request<Body>, next: Next) -> impl IntoResponse {
    let path = request.uri().path().to_owned();
    let method = request.method().clone();

    let response = next.run(request).await;

    if !response.status().is_success() {
        let status = response.status();

        // Log error with context but without body
        tracing::error!(
            status = ?status,
            path = %path,
            method = %method,
            "Request error"
        );
    }

    response
}
