//! mallctl-core: goods administration domain
//!
//! Records, input validation, list queries and the catalog selector
//! payload shared by the server and the CLI. Nothing in here touches the
//! database directly; enable the `sqlx` feature to derive row mappings.

pub mod catalog;
pub mod codes;
pub mod config;
pub mod goods;
pub mod query;
pub mod validation;

pub use catalog::{Brand, BrandOption, CatAndBrand, Category, CategoryOption};
pub use config::{load_dotenv, MallConfig};
pub use goods::{
    Goods, GoodsAllinone, GoodsAttribute, GoodsDetail, GoodsProduct, GoodsSpecification,
};
pub use query::{GoodsQuery, ListParams, Page, SortField, SortOrder};
pub use validation::ValidationError;
