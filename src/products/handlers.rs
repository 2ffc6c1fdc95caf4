use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use rust_decimal::Decimal;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::{services::non_blank, AuthUser},
    dto::MessageResponse,
    error::{AppError, AppResult},
    extract::{ApiJson, ApiPath, ApiQuery},
    money::fits_money_column,
    products::{
        dto::{ListProductsQuery, ProductListResponse, ProductRequest, ProductResponse},
        repo_types::{NewProduct, Product, ProductChanges, ProductFilter},
    },
    state::AppState,
};

const PRODUCT_NOT_FOUND: &str = "Produto não encontrado";

pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/produtos", get(list_products).post(create_product))
        .route(
            "/produtos/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
}

#[instrument(skip(state))]
pub async fn list_products(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListProductsQuery>,
) -> AppResult<Json<ProductListResponse>> {
    let (limit, offset) = query.window();
    let produtos = state
        .products
        .list(ProductFilter {
            category: non_blank(query.categoria),
            limit,
            offset,
        })
        .await?;
    Ok(Json(ProductListResponse {
        total: produtos.len(),
        produtos,
    }))
}

#[instrument(skip(state))]
pub async fn get_product(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<Json<Product>> {
    let product = state
        .products
        .find(id)
        .await?
        .ok_or_else(|| AppError::NotFound(PRODUCT_NOT_FOUND.into()))?;
    Ok(Json(product))
}

#[instrument(skip(state, auth, payload), fields(user_id = %auth.id))]
pub async fn create_product(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(payload): ApiJson<ProductRequest>,
) -> AppResult<(StatusCode, Json<ProductResponse>)> {
    validate_amounts(payload.preco, payload.estoque)?;
    let (Some(name), Some(description), Some(price), Some(category), Some(stock)) = (
        non_blank(payload.nome),
        non_blank(payload.descricao),
        payload.preco,
        non_blank(payload.categoria),
        payload.estoque,
    ) else {
        warn!("product with missing fields");
        return Err(AppError::validation("Campos obrigatórios faltando"));
    };

    let product = state
        .products
        .create(NewProduct {
            name,
            description,
            price,
            category,
            stock,
            image: non_blank(payload.imagem),
        })
        .await?;

    info!(product_id = %product.id, "product created");
    Ok((
        StatusCode::CREATED,
        Json(ProductResponse {
            mensagem: "Produto criado com sucesso",
            produto: product,
        }),
    ))
}

#[instrument(skip(state, auth, payload), fields(user_id = %auth.id))]
pub async fn update_product(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<ProductRequest>,
) -> AppResult<Json<ProductResponse>> {
    validate_amounts(payload.preco, payload.estoque)?;
    let changes = ProductChanges {
        name: non_blank(payload.nome),
        description: non_blank(payload.descricao),
        price: payload.preco,
        category: non_blank(payload.categoria),
        stock: payload.estoque,
        image: non_blank(payload.imagem),
    };

    let product = state
        .products
        .update(id, changes)
        .await?
        .ok_or_else(|| AppError::NotFound(PRODUCT_NOT_FOUND.into()))?;

    info!(product_id = %product.id, "product updated");
    Ok(Json(ProductResponse {
        mensagem: "Produto atualizado com sucesso",
        produto: product,
    }))
}

#[instrument(skip(state, auth), fields(user_id = %auth.id))]
pub async fn delete_product(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    if !state.products.delete(id).await? {
        return Err(AppError::NotFound(PRODUCT_NOT_FOUND.into()));
    }
    info!(product_id = %id, "product deleted");
    Ok(Json(MessageResponse::new("Produto deletado com sucesso")))
}

fn validate_amounts(price: Option<Decimal>, stock: Option<i32>) -> AppResult<()> {
    if price.is_some_and(|p| p.is_sign_negative() || !fits_money_column(p)) {
        return Err(AppError::validation("Preço inválido"));
    }
    if stock.is_some_and(|s| s < 0) {
        return Err(AppError::validation("Estoque inválido"));
    }
    Ok(())
}
