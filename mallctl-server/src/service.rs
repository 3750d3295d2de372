//! Goods administration service
//!
//! Sits between the HTTP handlers and the store: validates input, enforces
//! name uniqueness, computes share URLs and shapes read models.

use std::sync::Arc;

use mallctl_core::{
    CatAndBrand, Goods, GoodsAllinone, GoodsDetail, GoodsQuery, Page, ValidationError,
};
use tracing::{info, warn};

use crate::share::ShareImage;
use crate::store::{GoodsStore, StoreError};

/// Goods service error type
#[derive(Debug, thiserror::Error)]
pub enum GoodsError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("goods name '{0}' already exists")]
    NameExists(String),

    #[error("{resource} '{id}' not found")]
    NotFound { resource: &'static str, id: String },

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for GoodsError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound { resource, id } => Self::NotFound { resource, id },
            other => Self::Store(other),
        }
    }
}

pub type GoodsResult<T> = Result<T, GoodsError>;

#[derive(Clone)]
pub struct GoodsService {
    store: Arc<dyn GoodsStore>,
    share: Arc<dyn ShareImage>,
}

impl GoodsService {
    pub fn new(store: Arc<dyn GoodsStore>, share: Arc<dyn ShareImage>) -> Self {
        Self { store, share }
    }

    /// Is the backing store reachable?
    pub async fn ping(&self) -> GoodsResult<()> {
        Ok(self.store.ping().await?)
    }

    pub async fn list(&self, query: &GoodsQuery) -> GoodsResult<Page<Goods>> {
        Ok(self.store.list_goods(query).await?)
    }

    /// Structural checks, then brand/category existence, then child rows.
    pub async fn validate(&self, graph: &GoodsAllinone) -> GoodsResult<()> {
        graph.check_header()?;

        if let Some(brand_id) = graph.goods.brand_ref() {
            if self.store.find_brand(brand_id).await?.is_none() {
                return Err(ValidationError::UnknownReference {
                    field: "brandId",
                    id: brand_id,
                }
                .into());
            }
        }

        if let Some(category_id) = graph.goods.category_ref() {
            if self.store.find_category(category_id).await?.is_none() {
                return Err(ValidationError::UnknownReference {
                    field: "categoryId",
                    id: category_id,
                }
                .into());
            }
        }

        graph.check_children()?;
        Ok(())
    }

    pub async fn create(&self, graph: &GoodsAllinone) -> GoodsResult<Goods> {
        self.validate(graph).await.inspect_err(log_rejected)?;

        let name = graph.goods.name.clone().unwrap_or_default();
        if self.store.goods_name_exists(&name).await? {
            let err = GoodsError::NameExists(name);
            log_rejected(&err);
            return Err(err);
        }

        let goods = self
            .store
            .create_goods(graph, self.share.as_ref())
            .await
            .map_err(|e| name_conflict(e, &name))
            .inspect_err(log_rejected)?;

        info!(
            goods_id = goods.id,
            name = %name,
            products = graph.products.len(),
            "goods created"
        );
        Ok(goods)
    }

    /// Update the goods row and replace its specifications, attributes and
    /// products with the submitted ones.
    pub async fn update(&self, graph: &GoodsAllinone) -> GoodsResult<Goods> {
        self.validate(graph).await.inspect_err(log_rejected)?;
        let id = graph
            .goods
            .id
            .ok_or(ValidationError::Missing { field: "id" })?;

        let share_url = self
            .share
            .share_url(
                id,
                graph.goods.pic_url.as_deref().unwrap_or_default(),
                graph.goods.name.as_deref().unwrap_or_default(),
            )
            .unwrap_or_default();

        let name = graph.goods.name.clone().unwrap_or_default();
        let goods = self
            .store
            .replace_goods(id, graph, &share_url)
            .await
            .map_err(|e| name_conflict(e, &name))
            .inspect_err(log_rejected)?;

        info!(goods_id = id, name = %name, "goods updated");
        Ok(goods)
    }

    pub async fn delete(&self, goods: &Goods) -> GoodsResult<()> {
        let id = goods.id.ok_or(ValidationError::Missing { field: "id" })?;
        self.store.delete_goods(id).await?;
        info!(goods_id = id, "goods deleted");
        Ok(())
    }

    /// Selector payload: L1 categories with their L2 children, and brands.
    pub async fn cat_and_brand(&self) -> GoodsResult<CatAndBrand> {
        let l1 = self.store.list_l1_categories().await?;
        let children = self.store.list_child_categories().await?;
        let brands = self.store.list_brands().await?;
        Ok(CatAndBrand::build(&l1, &children, &brands))
    }

    pub async fn detail(&self, id: i32) -> GoodsResult<GoodsDetail> {
        let goods = self
            .store
            .find_goods(id)
            .await?
            .ok_or_else(|| GoodsError::NotFound {
                resource: "goods",
                id: id.to_string(),
            })?;

        let products = self.store.list_products(id).await?;
        let specifications = self.store.list_specifications(id).await?;
        let attributes = self.store.list_attributes(id).await?;

        let category_ids = match goods.category_id {
            Some(category_id) => match self.store.find_category(category_id).await? {
                Some(category) => vec![category.pid, category_id],
                None => vec![],
            },
            None => vec![],
        };

        Ok(GoodsDetail {
            goods,
            specifications,
            products,
            attributes,
            category_ids,
        })
    }
}

fn log_rejected(err: &GoodsError) {
    match err {
        GoodsError::Validation(e) => {
            warn!(field = e.field(), errno = e.errno(), "goods rejected: {}", e)
        }
        GoodsError::NameExists(name) => warn!(name = %name, "goods rejected: name already in use"),
        _ => {}
    }
}

/// The live-name index can still fire when a concurrent editor wins the race.
fn name_conflict(err: StoreError, name: &str) -> GoodsError {
    match err {
        StoreError::Conflict { .. } => GoodsError::NameExists(name.to_owned()),
        other => other.into(),
    }
}
