use axum::{
    extract::{DefaultBodyLimit, Request},
    http::{header, HeaderValue, Method},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::App;
use instawin_types::TicketKind;

mod http;

pub struct Api {
    app: Arc<App>,
}

impl Api {
    pub fn new(app: Arc<App>) -> Self {
        Self { app }
    }

    pub fn router(&self) -> Router {
        let allowed_origins = parse_allowed_origins("ALLOWED_HTTP_ORIGINS");
        let allow_any_origin = allowed_origins.contains("*");
        if allowed_origins.is_empty() {
            tracing::warn!("ALLOWED_HTTP_ORIGINS is empty; all browser origins will be rejected");
        }
        let cors_origins = allowed_origins
            .iter()
            .filter(|origin| *origin != "*")
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!("Invalid origin in ALLOWED_HTTP_ORIGINS: {}", origin);
                    None
                }
            })
            .collect::<Vec<_>>();

        let cors = if allow_any_origin {
            CorsLayer::new().allow_origin(AllowOrigin::any())
        } else {
            CorsLayer::new().allow_origin(AllowOrigin::list(cors_origins))
        }
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::HeaderName::from_static("x-request-id"),
        ])
        .expose_headers([header::HeaderName::from_static("x-request-id")]);

        let router = Router::new()
            .route("/healthz", get(http::healthz))
            .route("/register", post(http::register))
            .route("/wallet", get(http::wallet))
            .merge(family_routes("/pull-tabs", TicketKind::PullTab))
            .merge(family_routes("/scratch-tickets", TicketKind::Scratch))
            .route("/metrics/tickets", get(http::ticket_metrics))
            .route("/admin/designs", post(http::create_design))
            .route("/admin/designs/:id/enabled", post(http::set_design_enabled));

        let router = router.layer(cors);
        let router = router.layer(DefaultBodyLimit::max(
            self.app.config.http_body_limit_bytes.max(1),
        ));
        let router = router.layer(middleware::from_fn(request_id_middleware));
        let router = router.layer(TraceLayer::new_for_http());

        router.with_state(self.app.clone())
    }
}

/// Pull tabs and scratch tickets share handlers; the mounted prefix fixes
/// the family a route operates on.
fn family_routes(prefix: &str, kind: TicketKind) -> Router<Arc<App>> {
    Router::new()
        .route(prefix, get(http::my_tickets))
        .route(&format!("{prefix}/designs"), get(http::designs))
        .route(&format!("{prefix}/purchase"), post(http::purchase))
        .route(&format!("{prefix}/reveal"), post(http::reveal))
        .route(&format!("{prefix}/claim"), post(http::claim))
        .route(
            &format!("{prefix}/history/transactions"),
            get(http::transaction_history),
        )
        .layer(axum::Extension(kind))
}

fn parse_allowed_origins(var: &str) -> HashSet<String> {
    std::env::var(var)
        .unwrap_or_default()
        .split(',')
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .collect()
}

async fn request_id_middleware(req: Request, next: Next) -> Response {
    let request_id = req
        .headers()
        .get(header::HeaderName::from_static("x-request-id"))
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let start = Instant::now();
    let mut response = next.run(req).await;
    if let Ok(header_value) = HeaderValue::from_str(&request_id) {
        response
            .headers_mut()
            .insert(header::HeaderName::from_static("x-request-id"), header_value);
    }
    tracing::info!(
        request_id = %request_id,
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "http.request"
    );
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request as HttpRequest, StatusCode};
    use instawin_types::api::RegisterResponse;
    use instawin_types::{PlatformLimits, Sc};
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn test_app(dir: &TempDir, win_probability: f64) -> Arc<App> {
        let config = crate::ServerConfig {
            db_path: dir.path().join("tickets.db"),
            win_probability,
            limits: PlatformLimits::default(),
            starting_sweeps: Sc::from_cents(1_000),
            ..crate::ServerConfig::default()
        };
        App::new(config).expect("build app")
    }

    async fn send(router: &Router, request: HttpRequest<Body>) -> (StatusCode, Value) {
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    fn post_json(path: &str, token: Option<&str>, body: Value) -> HttpRequest<Body> {
        let mut builder = HttpRequest::builder()
            .method("POST")
            .uri(path)
            .header("content-type", "application/json");
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn get_with_token(path: &str, token: &str) -> HttpRequest<Body> {
        HttpRequest::builder()
            .method("GET")
            .uri(path)
            .header("authorization", format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap()
    }

    async fn register(router: &Router) -> RegisterResponse {
        let (status, body) = send(
            router,
            post_json("/register", None, json!({"name": "alice"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        serde_json::from_value(body["data"]["player"].clone()).unwrap()
    }

    #[tokio::test]
    async fn healthz_is_open() {
        let dir = TempDir::new().unwrap();
        let router = Api::new(test_app(&dir, 0.0)).router();
        let (status, body) = send(
            &router,
            HttpRequest::builder()
                .uri("/healthz")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], true);
    }

    #[tokio::test]
    async fn wallet_requires_a_valid_token() {
        let dir = TempDir::new().unwrap();
        let router = Api::new(test_app(&dir, 0.0)).router();

        let (status, body) = send(
            &router,
            HttpRequest::builder()
                .uri("/wallet")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "unauthorized");

        let (status, _) = send(&router, get_with_token("/wallet", "bogus")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn purchase_reveal_claim_round_trip() {
        let dir = TempDir::new().unwrap();
        let router = Api::new(test_app(&dir, 1.0)).router();
        let player = register(&router).await;

        let (status, body) = send(&router, get_with_token("/pull-tabs/designs", &player.token)).await;
        assert_eq!(status, StatusCode::OK);
        let design_id = body["data"][0]["id"].as_i64().unwrap();

        let (status, body) = send(
            &router,
            post_json(
                "/pull-tabs/purchase",
                Some(&player.token),
                json!({"designId": design_id}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        let ticket_id = body["ticket"]["id"].as_i64().unwrap();
        assert_eq!(body["wallet"]["sweepsCoins"], 900);
        let slot_count = body["ticket"]["slots"].as_array().unwrap().len();

        // Reveal every slot; with p=1.0 exactly one carries a prize.
        let mut prize = None;
        for index in 0..slot_count {
            let (status, body) = send(
                &router,
                post_json(
                    "/pull-tabs/reveal",
                    Some(&player.token),
                    json!({"ticketId": ticket_id, "tabIndex": index}),
                ),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
            if let Some(cents) = body["data"]["prize"].as_u64() {
                prize = Some(cents);
            }
        }
        let prize = prize.expect("a p=1.0 ticket must reveal a prize");

        let (status, body) = send(
            &router,
            post_json(
                "/pull-tabs/claim",
                Some(&player.token),
                json!({"ticketId": ticket_id}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["prizeAmount"].as_u64().unwrap(), prize);
        assert_eq!(
            body["wallet"]["sweepsCoins"].as_u64().unwrap(),
            900 + prize
        );

        let (status, body) = send(
            &router,
            post_json(
                "/pull-tabs/claim",
                Some(&player.token),
                json!({"ticketId": ticket_id}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "already_claimed");
    }

    #[tokio::test]
    async fn scratch_family_accepts_slot_index_spelling() {
        let dir = TempDir::new().unwrap();
        let router = Api::new(test_app(&dir, 0.0)).router();
        let player = register(&router).await;

        let (_, body) = send(&router, get_with_token("/scratch-tickets/designs", &player.token)).await;
        let design_id = body["data"][0]["id"].as_i64().unwrap();
        let (_, body) = send(
            &router,
            post_json(
                "/scratch-tickets/purchase",
                Some(&player.token),
                json!({"designId": design_id}),
            ),
        )
        .await;
        let ticket_id = body["ticket"]["id"].as_i64().unwrap();

        let (status, body) = send(
            &router,
            post_json(
                "/scratch-tickets/reveal",
                Some(&player.token),
                json!({"ticketId": ticket_id, "slotIndex": 0}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["slotIndex"], 0);
        assert_eq!(body["data"]["slot"]["revealed"], true);
    }

    #[tokio::test]
    async fn families_do_not_leak_into_each_other() {
        let dir = TempDir::new().unwrap();
        let router = Api::new(test_app(&dir, 0.0)).router();
        let player = register(&router).await;

        let (_, body) = send(&router, get_with_token("/pull-tabs/designs", &player.token)).await;
        let design_id = body["data"][0]["id"].as_i64().unwrap();
        send(
            &router,
            post_json(
                "/pull-tabs/purchase",
                Some(&player.token),
                json!({"designId": design_id}),
            ),
        )
        .await;

        let (status, body) = send(&router, get_with_token("/pull-tabs", &player.token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 1);

        let (status, body) = send(&router, get_with_token("/scratch-tickets", &player.token)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["data"].as_array().unwrap().is_empty());

        // Buying a scratch design through the pull-tab route is rejected.
        let (_, body) = send(&router, get_with_token("/scratch-tickets/designs", &player.token)).await;
        let scratch_id = body["data"][0]["id"].as_i64().unwrap();
        let (status, body) = send(
            &router,
            post_json(
                "/pull-tabs/purchase",
                Some(&player.token),
                json!({"designId": scratch_id}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "design_not_found");
    }

    #[tokio::test]
    async fn insufficient_funds_maps_to_payment_required() {
        let dir = TempDir::new().unwrap();
        let config = crate::ServerConfig {
            db_path: dir.path().join("tickets.db"),
            win_probability: 0.0,
            starting_sweeps: Sc::from_cents(50),
            ..crate::ServerConfig::default()
        };
        let router = Api::new(App::new(config).unwrap()).router();
        let player = register(&router).await;

        let (_, body) = send(&router, get_with_token("/pull-tabs/designs", &player.token)).await;
        let design_id = body["data"][0]["id"].as_i64().unwrap();
        let (status, body) = send(
            &router,
            post_json(
                "/pull-tabs/purchase",
                Some(&player.token),
                json!({"designId": design_id}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::PAYMENT_REQUIRED);
        assert_eq!(body["code"], "insufficient_funds");
    }

    #[tokio::test]
    async fn admin_routes_are_locked_without_a_token() {
        let dir = TempDir::new().unwrap();
        let router = Api::new(test_app(&dir, 0.0)).router();
        let (status, _) = send(
            &router,
            post_json(
                "/admin/designs",
                None,
                json!({
                    "kind": "pull_tab",
                    "name": "High Roller",
                    "cost": 500,
                    "slotCount": 5,
                    "prizeMin": 100,
                    "prizeMax": 5000
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn transaction_history_is_limited_and_ordered() {
        let dir = TempDir::new().unwrap();
        let router = Api::new(test_app(&dir, 0.0)).router();
        let player = register(&router).await;

        let (_, body) = send(&router, get_with_token("/pull-tabs/designs", &player.token)).await;
        let design_id = body["data"][0]["id"].as_i64().unwrap();
        for _ in 0..3 {
            send(
                &router,
                post_json(
                    "/pull-tabs/purchase",
                    Some(&player.token),
                    json!({"designId": design_id}),
                ),
            )
            .await;
        }

        let (status, body) = send(
            &router,
            get_with_token("/pull-tabs/history/transactions?limit=2", &player.token),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let entries = body["data"].as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries[0]["id"].as_i64().unwrap() > entries[1]["id"].as_i64().unwrap());
    }
}
