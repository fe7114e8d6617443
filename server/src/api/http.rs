use axum::{
    extract::{Extension, Path, Query, State as AxumState},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::App;
use instawin_types::api::{
    ApiFailure, ClaimRequest, ClaimResponse, CreateDesignRequest, PurchaseRequest,
    RegisterRequest, RegisterResponse, RevealRequest, RevealResponse, SetDesignEnabledRequest,
    WalletBalances, WalletUpdate,
};
use instawin_types::{LedgerEntry, Ticket, TicketDesign, TicketError, TicketKind};
use std::sync::Arc;

const DEFAULT_HISTORY_LIMIT: u32 = 50;
const MAX_HISTORY_LIMIT: u32 = 200;

#[derive(Serialize)]
struct HealthzResponse {
    ok: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DataEnvelope<T> {
    success: bool,
    data: T,
}

fn ok<T: Serialize>(data: T) -> Response {
    Json(DataEnvelope {
        success: true,
        data,
    })
    .into_response()
}

/// Purchases keep `ticket` and `wallet` at the top level of the envelope
/// for clients that predate the generic `data` wrapper.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PurchaseEnvelope {
    success: bool,
    ticket: Ticket,
    wallet: WalletBalances,
    transaction: LedgerEntry,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ClaimEnvelope {
    success: bool,
    data: ClaimResponse,
    wallet: WalletBalances,
    transaction: LedgerEntry,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RegisteredEnvelope {
    player: RegisterResponse,
    wallet: WalletBalances,
}

fn status_for(err: &TicketError) -> StatusCode {
    match err {
        TicketError::DesignNotFound | TicketError::TicketNotFound => StatusCode::NOT_FOUND,
        TicketError::InvalidDesignConfiguration | TicketError::InvalidSlotIndex => {
            StatusCode::BAD_REQUEST
        }
        TicketError::InsufficientFunds => StatusCode::PAYMENT_REQUIRED,
        TicketError::TicketInactive
        | TicketError::AlreadyClaimed
        | TicketError::SlotAlreadyRevealed
        | TicketError::NoPrize => StatusCode::CONFLICT,
        TicketError::Unauthorized => StatusCode::UNAUTHORIZED,
        TicketError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn reject(app: &App, err: TicketError) -> Response {
    match &err {
        TicketError::Storage(message) => {
            tracing::error!("Ticket operation failed in storage: {message}");
        }
        _ => app.metrics.inc_rejected(),
    }
    (status_for(&err), Json(ApiFailure::from_error(&err))).into_response()
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

fn authenticate(app: &App, headers: &HeaderMap) -> Result<i64, TicketError> {
    let token = bearer_token(headers).ok_or(TicketError::Unauthorized)?;
    app.store.player_by_token(token)
}

fn publish_wallet(app: &App, player_id: i64, wallet: WalletBalances) {
    app.broadcaster.publish(WalletUpdate {
        player_id,
        gold_coins: wallet.gold_coins,
        sweeps_coins: wallet.sweeps_coins,
    });
}

pub(super) async fn healthz() -> Response {
    Json(HealthzResponse { ok: true }).into_response()
}

pub(super) async fn register(
    AxumState(app): AxumState<Arc<App>>,
    Json(payload): Json<RegisterRequest>,
) -> Response {
    let name = payload.name.trim();
    if name.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiFailure {
                success: false,
                error: "player name must not be empty".to_string(),
                code: "invalid_request",
            }),
        )
            .into_response();
    }
    match app.store.register_player(name) {
        Ok((player, wallet)) => {
            tracing::info!(player_id = player.player_id, "Registered player");
            ok(RegisteredEnvelope { player, wallet })
        }
        Err(err) => reject(&app, err),
    }
}

pub(super) async fn wallet(headers: HeaderMap, AxumState(app): AxumState<Arc<App>>) -> Response {
    let player_id = match authenticate(&app, &headers) {
        Ok(player_id) => player_id,
        Err(err) => return reject(&app, err),
    };
    match app.store.wallet(player_id) {
        Ok(balances) => ok(balances),
        Err(err) => reject(&app, err),
    }
}

pub(super) async fn designs(
    Extension(kind): Extension<TicketKind>,
    AxumState(app): AxumState<Arc<App>>,
) -> Response {
    match app.store.designs(kind) {
        Ok(designs) => ok(designs),
        Err(err) => reject(&app, err),
    }
}

pub(super) async fn purchase(
    Extension(kind): Extension<TicketKind>,
    headers: HeaderMap,
    AxumState(app): AxumState<Arc<App>>,
    Json(payload): Json<PurchaseRequest>,
) -> Response {
    let player_id = match authenticate(&app, &headers) {
        Ok(player_id) => player_id,
        Err(err) => return reject(&app, err),
    };
    match app.store.purchase(player_id, payload.design_id, kind) {
        Ok(outcome) => {
            app.metrics.inc_purchase();
            publish_wallet(&app, player_id, outcome.wallet);
            app.notifications.purchase_receipt(&outcome.receipt);
            tracing::info!(
                player_id,
                ticket_id = outcome.ticket.id,
                ticket_number = %outcome.ticket.ticket_number,
                cost = %outcome.receipt.cost,
                kind = %kind,
                "ticket.purchased"
            );
            Json(PurchaseEnvelope {
                success: true,
                ticket: outcome.ticket,
                wallet: outcome.wallet,
                transaction: outcome.entry,
            })
            .into_response()
        }
        Err(err) => reject(&app, err),
    }
}

pub(super) async fn reveal(
    Extension(_kind): Extension<TicketKind>,
    headers: HeaderMap,
    AxumState(app): AxumState<Arc<App>>,
    Json(payload): Json<RevealRequest>,
) -> Response {
    let player_id = match authenticate(&app, &headers) {
        Ok(player_id) => player_id,
        Err(err) => return reject(&app, err),
    };
    match app.store.reveal(player_id, payload.ticket_id, payload.tab_index) {
        Ok(outcome) => {
            app.metrics.inc_reveal();
            ok(RevealResponse {
                slot_index: outcome.slot_index,
                slot: outcome.slot,
                prize: outcome.prize,
            })
        }
        Err(err) => reject(&app, err),
    }
}

pub(super) async fn claim(
    Extension(kind): Extension<TicketKind>,
    headers: HeaderMap,
    AxumState(app): AxumState<Arc<App>>,
    Json(payload): Json<ClaimRequest>,
) -> Response {
    let player_id = match authenticate(&app, &headers) {
        Ok(player_id) => player_id,
        Err(err) => return reject(&app, err),
    };
    match app.store.claim(player_id, payload.ticket_id) {
        Ok(outcome) => {
            app.metrics.inc_claim(outcome.prize.cents());
            publish_wallet(&app, player_id, outcome.wallet);
            tracing::info!(
                player_id,
                ticket_id = payload.ticket_id,
                prize = %outcome.prize,
                kind = %kind,
                "ticket.claimed"
            );
            Json(ClaimEnvelope {
                success: true,
                data: ClaimResponse {
                    prize_amount: outcome.prize,
                    winning_slot_index: outcome.winning_slot_index,
                },
                wallet: outcome.wallet,
                transaction: outcome.entry,
            })
            .into_response()
        }
        Err(err) => reject(&app, err),
    }
}

pub(super) async fn my_tickets(
    Extension(kind): Extension<TicketKind>,
    headers: HeaderMap,
    AxumState(app): AxumState<Arc<App>>,
) -> Response {
    let player_id = match authenticate(&app, &headers) {
        Ok(player_id) => player_id,
        Err(err) => return reject(&app, err),
    };
    match app.store.tickets_for(player_id, kind) {
        Ok(tickets) => ok(tickets),
        Err(err) => reject(&app, err),
    }
}

#[derive(Deserialize)]
pub(super) struct HistoryQuery {
    limit: Option<u32>,
}

pub(super) async fn transaction_history(
    Extension(_kind): Extension<TicketKind>,
    headers: HeaderMap,
    Query(query): Query<HistoryQuery>,
    AxumState(app): AxumState<Arc<App>>,
) -> Response {
    let player_id = match authenticate(&app, &headers) {
        Ok(player_id) => player_id,
        Err(err) => return reject(&app, err),
    };
    let limit = query
        .limit
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
        .clamp(1, MAX_HISTORY_LIMIT);
    match app.store.ledger(player_id, limit) {
        Ok(entries) => ok(entries),
        Err(err) => reject(&app, err),
    }
}

pub(super) async fn ticket_metrics(
    headers: HeaderMap,
    AxumState(app): AxumState<Arc<App>>,
) -> Response {
    if let Some(status) = metrics_auth_error(&headers) {
        return status.into_response();
    }
    ok(app.metrics.snapshot())
}

pub(super) async fn create_design(
    headers: HeaderMap,
    AxumState(app): AxumState<Arc<App>>,
    Json(payload): Json<CreateDesignRequest>,
) -> Response {
    if let Some(status) = admin_auth_error(&headers) {
        return status.into_response();
    }
    let win_probability = payload
        .win_probability
        .unwrap_or(app.config.win_probability);
    let result: Result<TicketDesign, TicketError> = app.store.insert_design(
        payload.kind,
        payload.name.trim(),
        payload.cost,
        payload.slot_count,
        win_probability,
        payload.prize_min,
        payload.prize_max,
        payload.enabled,
    );
    match result {
        Ok(design) => {
            tracing::info!(design_id = design.id, name = %design.name, "Created ticket design");
            ok(design)
        }
        Err(err) => reject(&app, err),
    }
}

pub(super) async fn set_design_enabled(
    headers: HeaderMap,
    Path(design_id): Path<i64>,
    AxumState(app): AxumState<Arc<App>>,
    Json(payload): Json<SetDesignEnabledRequest>,
) -> Response {
    if let Some(status) = admin_auth_error(&headers) {
        return status.into_response();
    }
    match app.store.set_design_enabled(design_id, payload.enabled) {
        Ok(()) => {
            tracing::info!(design_id, enabled = payload.enabled, "Toggled ticket design");
            ok(serde_json::json!({ "id": design_id, "enabled": payload.enabled }))
        }
        Err(err) => reject(&app, err),
    }
}

/// Metrics are open when `METRICS_AUTH_TOKEN` is unset; otherwise the token
/// must arrive as a bearer token or `x-metrics-token` header.
fn metrics_auth_error(headers: &HeaderMap) -> Option<StatusCode> {
    let token = std::env::var("METRICS_AUTH_TOKEN").unwrap_or_default();
    if token.is_empty() {
        return None;
    }
    let bearer = bearer_token(headers);
    let header_token = headers
        .get("x-metrics-token")
        .and_then(|value| value.to_str().ok());
    if bearer == Some(token.as_str()) || header_token == Some(token.as_str()) {
        None
    } else {
        Some(StatusCode::UNAUTHORIZED)
    }
}

/// Admin routes are locked unless `ADMIN_AUTH_TOKEN` is configured and the
/// request carries it as a bearer token or `x-admin-token` header.
fn admin_auth_error(headers: &HeaderMap) -> Option<StatusCode> {
    let token = std::env::var("ADMIN_AUTH_TOKEN").unwrap_or_default();
    if token.is_empty() {
        return Some(StatusCode::UNAUTHORIZED);
    }
    let bearer = bearer_token(headers);
    let header_token = headers
        .get("x-admin-token")
        .and_then(|value| value.to_str().ok());
    if bearer == Some(token.as_str()) || header_token == Some(token.as_str()) {
        None
    } else {
        Some(StatusCode::UNAUTHORIZED)
    }
}
