use std::net::SocketAddr;

use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Json, Router,
};
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::error::AppError;
use crate::state::AppState;
use crate::{auth, orders, products, recovery};

pub fn build_app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.frontend_url);

    Router::new()
        .nest(
            "/api",
            Router::new()
                .merge(auth::router())
                .merge(recovery::router())
                .merge(products::router())
                .merge(orders::router())
                .route("/health", get(health)),
        )
        .route("/", get(info))
        .fallback(not_found)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     _latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        if status.is_server_error() {
                            tracing::error!(%status, "response");
                        } else {
                            tracing::info!(%status, "response");
                        }
                    },
                ),
        )
}

fn cors_layer(frontend_url: &str) -> CorsLayer {
    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ];
    match frontend_url.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_credentials(true)
            .allow_methods(methods)
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
        Err(e) => {
            tracing::warn!(error = %e, frontend_url, "invalid FRONTEND_URL; CORS is permissive");
            CorsLayer::permissive()
        }
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "OK", "message": "API está funcionando" }))
}

async fn info() -> Json<serde_json::Value> {
    Json(json!({
        "mensagem": "Bem-vindo à API FRcomerce",
        "versao": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "auth": "/api/auth",
            "produtos": "/api/produtos",
            "pedidos": "/api/pedidos",
            "usuario": "/api/usuario",
        },
    }))
}

async fn not_found() -> AppError {
    AppError::NotFound("Rota não encontrada".into())
}

pub async fn serve(app: Router, config: &AppConfig) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    use crate::testing::TestApp;

    #[tokio::test]
    async fn health_reports_ok() {
        let app = TestApp::new();
        let (status, body) = app.call(Method::GET, "/api/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "OK", "message": "API está funcionando"}));
    }

    #[tokio::test]
    async fn root_describes_the_api() {
        let app = TestApp::new();
        let (status, body) = app.call(Method::GET, "/", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["mensagem"], "Bem-vindo à API FRcomerce");
        assert_eq!(body["versao"], "1.0.0");
        assert_eq!(body["endpoints"]["produtos"], "/api/produtos");
        assert_eq!(body["endpoints"]["usuario"], "/api/usuario");
    }

    #[tokio::test]
    async fn unknown_route_is_json_404() {
        let app = TestApp::new();
        let (status, body) = app.call(Method::GET, "/api/nada", None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["erro"], "Rota não encontrada");
    }
}
