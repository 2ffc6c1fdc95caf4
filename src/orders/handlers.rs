use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    error::{AppError, AppResult},
    extract::{ApiJson, ApiPath},
    money::fits_money_column,
    orders::{
        dto::{CreateOrderRequest, OrderListResponse, OrderResponse, UpdateOrderStatusRequest},
        repo_types::{Order, OrderStatus},
    },
    state::AppState,
};

const ORDER_NOT_FOUND: &str = "Pedido não encontrado";

pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/pedidos", get(list_my_orders).post(create_order))
        .route("/pedidos/:id", get(get_order).put(update_order_status))
}

#[instrument(skip(state, auth, payload), fields(user_id = %auth.id))]
pub async fn create_order(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(payload): ApiJson<CreateOrderRequest>,
) -> AppResult<(StatusCode, Json<OrderResponse>)> {
    let items = payload
        .itens
        .filter(|v| v.as_array().is_some_and(|lines| !lines.is_empty()));
    let total = payload
        .total
        .filter(|t| t.is_sign_positive() && !t.is_zero() && fits_money_column(*t));
    let (Some(items), Some(total)) = (items, total) else {
        warn!("order with missing items or total");
        return Err(AppError::validation("Dados do pedido incompletos"));
    };

    let order = state.orders.create(auth.id, items, total).await?;

    info!(order_id = %order.id, %total, "order created");
    Ok((
        StatusCode::CREATED,
        Json(OrderResponse {
            mensagem: "Pedido criado com sucesso",
            pedido: order,
        }),
    ))
}

#[instrument(skip(state, auth), fields(user_id = %auth.id))]
pub async fn list_my_orders(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<OrderListResponse>> {
    let pedidos = state.orders.list_by_user(auth.id).await?;
    Ok(Json(OrderListResponse {
        total: pedidos.len(),
        pedidos,
    }))
}

#[instrument(skip(state, auth), fields(user_id = %auth.id))]
pub async fn get_order(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<Json<Order>> {
    let order = find_owned(&state, &auth, id).await?;
    Ok(Json(order))
}

#[instrument(skip(state, auth, payload), fields(user_id = %auth.id))]
pub async fn update_order_status(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<UpdateOrderStatusRequest>,
) -> AppResult<Json<OrderResponse>> {
    let Some(raw) = payload.status.filter(|s| !s.trim().is_empty()) else {
        return Err(AppError::validation("Status é obrigatório"));
    };
    let status: OrderStatus = raw
        .trim()
        .parse()
        .map_err(|_| AppError::validation("Status inválido"))?;

    find_owned(&state, &auth, id).await?;
    let order = state
        .orders
        .update_status(id, status)
        .await?
        .ok_or_else(|| AppError::NotFound(ORDER_NOT_FOUND.into()))?;

    info!(order_id = %id, %status, "order status updated");
    Ok(Json(OrderResponse {
        mensagem: "Pedido atualizado com sucesso",
        pedido: order,
    }))
}

/// Load an order the caller owns: 404 if absent, 403 if someone else's.
async fn find_owned(state: &AppState, auth: &AuthUser, id: Uuid) -> AppResult<Order> {
    let order = state
        .orders
        .find(id)
        .await?
        .ok_or_else(|| AppError::NotFound(ORDER_NOT_FOUND.into()))?;
    if order.user_id != auth.id {
        warn!(order_id = %id, owner = %order.user_id, "order access denied");
        return Err(AppError::Forbidden("Acesso negado".into()));
    }
    Ok(order)
}
