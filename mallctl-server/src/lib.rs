//! mallctl-server: goods administration over HTTP
//!
//! The admin UI's goods editor talks to this crate: listing, creating,
//! editing and retiring goods together with their specifications,
//! attributes and sellable products.

pub mod db;
pub mod http;
pub mod service;
pub mod share;
pub mod store;

pub use http::{build_router, run_server, ApiError, AppState, ServerConfig, ServerError};
pub use service::{GoodsError, GoodsService};
pub use share::ShareImage;
pub use store::{GoodsStore, MemoryStore, PgStore, StoreError};
