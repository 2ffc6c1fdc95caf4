use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::products::repo_types::Product;

pub const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Deserialize)]
pub struct ListProductsQuery {
    #[serde(default = "default_page")]
    pub pagina: i64,
    #[serde(default = "default_limit")]
    pub limite: i64,
    pub categoria: Option<String>,
}
fn default_page() -> i64 { 1 }
fn default_limit() -> i64 { 50 }

impl ListProductsQuery {
    /// `(limit, offset)` with the page clamped to >= 1 and the size to 1..=100.
    pub fn window(&self) -> (i64, i64) {
        let limit = self.limite.clamp(1, MAX_PAGE_SIZE);
        let page = self.pagina.max(1);
        (limit, (page - 1).saturating_mul(limit))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ProductRequest {
    pub nome: Option<String>,
    pub descricao: Option<String>,
    pub preco: Option<Decimal>,
    pub categoria: Option<String>,
    pub estoque: Option<i32>,
    pub imagem: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProductListResponse {
    pub produtos: Vec<Product>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub mensagem: &'static str,
    pub produto: Product,
}
