//! Admin entity - Identities allowed to manage the catalog.
//!
//! The admin API checks every session against this table, so removing a row
//! revokes access immediately.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Admin database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "admins")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Login identity, stored lowercased
    #[sea_orm(unique)]
    pub email: String,
    /// bcrypt hash of the operator-provisioned access key
    #[serde(skip_serializing)]
    pub access_key_hash: String,
    /// When the admin was added
    pub created_at: DateTime,
}

/// Admins have no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
