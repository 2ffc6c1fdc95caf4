use std::{fmt, str::FromStr};

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Order {
    pub id: Uuid,
    #[serde(rename = "usuario_id")]
    pub user_id: Uuid,
    #[serde(rename = "itens")]
    pub items: serde_json::Value, // cart lines as submitted
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub status: String,
    #[serde(rename = "criado_em", with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(rename = "atualizado_em", with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
}

/// The only statuses an order may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pendente",
            OrderStatus::Processing => "processando",
            OrderStatus::Shipped => "enviado",
            OrderStatus::Delivered => "entregue",
            OrderStatus::Cancelled => "cancelado",
        }
    }
}

impl FromStr for OrderStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pendente" => Ok(OrderStatus::Pending),
            "processando" => Ok(OrderStatus::Processing),
            "enviado" => Ok(OrderStatus::Shipped),
            "entregue" => Ok(OrderStatus::Delivered),
            "cancelado" => Ok(OrderStatus::Cancelled),
            _ => Err(UnknownStatus),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownStatus;
