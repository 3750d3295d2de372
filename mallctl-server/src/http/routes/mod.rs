//! Route handlers organized by resource

pub mod goods;
pub mod health;
