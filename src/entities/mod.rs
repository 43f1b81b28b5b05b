//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod admin;
pub mod product;

// Re-export specific types to avoid conflicts
pub use admin::{Entity as Admin, Model as AdminModel};
pub use product::{Entity as Product, Model as ProductModel};
