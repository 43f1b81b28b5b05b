//! Core business logic - framework-agnostic catalog reads and admin writes.

/// Admin identity checks and seeding
pub mod admin;
/// The storefront query interface over any product store
pub mod catalog;
/// Price coercion and formatting
pub mod price;
/// Product administration on the live table
pub mod product;
/// Shared filter, sort and pagination semantics
pub mod query;
/// Related-product selection
pub mod recommend;
/// Deterministic daily sampling
pub mod sampling;
