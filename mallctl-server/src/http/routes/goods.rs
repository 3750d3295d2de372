//! Goods admin endpoints, mounted under `/admin/goods`

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use mallctl_core::{
    CatAndBrand, Goods, GoodsAllinone, GoodsDetail, GoodsQuery, ListParams, Page,
    ValidationError,
};
use serde::Deserialize;

use crate::http::error::ApiError;
use crate::http::server::AppState;

/// Query string of the detail endpoint
#[derive(Debug, Deserialize)]
pub struct DetailParams {
    pub id: Option<i32>,
}

/// GET /admin/goods/list
async fn list_goods(
    State(state): State<Arc<AppState>>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Page<Goods>>, ApiError> {
    let Query(params) = params?;
    let query = GoodsQuery::try_from(params)?;
    Ok(Json(state.goods.list(&query).await?))
}

/// GET /admin/goods/catAndBrand
async fn cat_and_brand(State(state): State<Arc<AppState>>) -> Result<Json<CatAndBrand>, ApiError> {
    Ok(Json(state.goods.cat_and_brand().await?))
}

/// POST /admin/goods/create
async fn create_goods(
    State(state): State<Arc<AppState>>,
    body: Result<Json<GoodsAllinone>, JsonRejection>,
) -> Result<(StatusCode, Json<Goods>), ApiError> {
    let Json(graph) = body?;
    let goods = state.goods.create(&graph).await?;
    Ok((StatusCode::CREATED, Json(goods)))
}

/// POST /admin/goods/update
async fn update_goods(
    State(state): State<Arc<AppState>>,
    body: Result<Json<GoodsAllinone>, JsonRejection>,
) -> Result<Json<Goods>, ApiError> {
    let Json(graph) = body?;
    Ok(Json(state.goods.update(&graph).await?))
}

/// POST /admin/goods/delete
async fn delete_goods(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Goods>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(goods) = body?;
    state.goods.delete(&goods).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /admin/goods/detail?id=
async fn goods_detail(
    State(state): State<Arc<AppState>>,
    params: Result<Query<DetailParams>, QueryRejection>,
) -> Result<Json<GoodsDetail>, ApiError> {
    let Query(params) = params?;
    let id = params.id.ok_or(ValidationError::Missing { field: "id" })?;
    Ok(Json(state.goods.detail(id).await?))
}

/// Goods routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/list", get(list_goods))
        .route("/catAndBrand", get(cat_and_brand))
        .route("/create", post(create_goods))
        .route("/update", post(update_goods))
        .route("/delete", post(delete_goods))
        .route("/detail", get(goods_detail))
}
