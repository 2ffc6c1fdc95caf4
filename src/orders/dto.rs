use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::orders::repo_types::Order;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateOrderRequest {
    pub itens: Option<serde_json::Value>,
    pub total: Option<Decimal>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateOrderStatusRequest {
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct OrderListResponse {
    pub pedidos: Vec<Order>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub mensagem: &'static str,
    pub pedido: Order,
}
