//! Repository implementations for database access
//!
//! Each repository follows these patterns:
//! - Reads take the pool and filter out soft-deleted rows
//! - Writes take a connection so callers can group them in a transaction
//! - Child rows are flagged deleted, never removed

pub mod attributes;
pub mod catalog;
pub mod goods;
pub mod products;
pub mod specifications;

pub use attributes::AttributeRepo;
pub use catalog::{BrandRepo, CategoryRepo};
pub use goods::GoodsRepo;
pub use products::ProductRepo;
pub use specifications::SpecificationRepo;
