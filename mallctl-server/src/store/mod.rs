//! Persistence seam for the goods service
//!
//! `GoodsStore` is what the service talks to. `PgStore` backs it with
//! Postgres; `MemoryStore` keeps everything in process for tests and
//! database-less runs. Both soft-delete: removed rows stay in place with
//! a `deleted` flag and disappear from every read.

use async_trait::async_trait;
use mallctl_core::{
    Brand, Category, Goods, GoodsAllinone, GoodsAttribute, GoodsProduct, GoodsQuery,
    GoodsSpecification, Page,
};

use crate::share::ShareImage;

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Store error type
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    /// A uniqueness constraint rejected the write
    #[error("conflict on {constraint}")]
    Conflict { constraint: String },
}

impl StoreError {
    pub(crate) fn goods_not_found(id: i32) -> Self {
        Self::NotFound {
            resource: "goods",
            id: id.to_string(),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait GoodsStore: Send + Sync + 'static {
    /// Cheap round trip proving the backend answers.
    async fn ping(&self) -> StoreResult<()>;

    /// Live goods matching the query, one page of them.
    async fn list_goods(&self, query: &GoodsQuery) -> StoreResult<Page<Goods>>;

    async fn find_goods(&self, id: i32) -> StoreResult<Option<Goods>>;

    /// Is the name taken by a live goods record?
    async fn goods_name_exists(&self, name: &str) -> StoreResult<bool>;

    async fn find_category(&self, id: i32) -> StoreResult<Option<Category>>;

    async fn find_brand(&self, id: i32) -> StoreResult<Option<Brand>>;

    async fn list_l1_categories(&self) -> StoreResult<Vec<Category>>;

    /// Categories with a non-zero `pid`. Level is not consulted.
    async fn list_child_categories(&self) -> StoreResult<Vec<Category>>;

    async fn list_brands(&self) -> StoreResult<Vec<Brand>>;

    async fn list_specifications(&self, goods_id: i32) -> StoreResult<Vec<GoodsSpecification>>;

    async fn list_attributes(&self, goods_id: i32) -> StoreResult<Vec<GoodsAttribute>>;

    async fn list_products(&self, goods_id: i32) -> StoreResult<Vec<GoodsProduct>>;

    /// Insert a goods graph atomically.
    ///
    /// The share URL is derived from the new id inside the same
    /// transaction and stored only when non-empty.
    async fn create_goods(
        &self,
        graph: &GoodsAllinone,
        share: &dyn ShareImage,
    ) -> StoreResult<Goods>;

    /// Update the goods row and replace all of its children atomically.
    ///
    /// Only supplied goods fields change; `share_url` is always written.
    /// Current children are soft-deleted and the submitted ones inserted
    /// with fresh ids. Fails with `NotFound` (and writes nothing) when the
    /// goods id does not name a live record.
    async fn replace_goods(
        &self,
        id: i32,
        graph: &GoodsAllinone,
        share_url: &str,
    ) -> StoreResult<Goods>;

    /// Soft-delete a goods record and its children atomically.
    /// Unknown ids are a no-op.
    async fn delete_goods(&self, id: i32) -> StoreResult<()>;
}
