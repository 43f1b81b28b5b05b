//! Admin identity checks for the catalog management surface.
//!
//! An admin is a row in the `admins` table. Only a bcrypt hash of the access key
//! is stored. Logging in verifies the submitted key against that hash, and every
//! later admin request re-checks that the identity is still listed, so deleting
//! the row locks the admin out.

use crate::{
    config::settings::AdminSeed,
    entities::{Admin, admin},
    errors::{Error, Result},
};
use sea_orm::{Set, prelude::*};
use tracing::{info, warn};

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

// Minimum cost in tests so hashing stays fast
const HASH_COST: u32 = if cfg!(test) { 4 } else { bcrypt::DEFAULT_COST };

/// Finds an admin by email, case-insensitively.
pub async fn find_admin_by_email(
    db: &DatabaseConnection,
    email: &str,
) -> Result<Option<admin::Model>> {
    Admin::find()
        .filter(admin::Column::Email.eq(normalize_email(email)))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Adds an admin.
///
/// # Errors
/// Returns an error if the email or access key is blank, hashing fails, or the
/// insert fails (including when the email is already taken).
pub async fn create_admin(
    db: &DatabaseConnection,
    email: &str,
    access_key: &str,
) -> Result<admin::Model> {
    let email = normalize_email(email);
    if email.is_empty() {
        return Err(Error::Config {
            message: "Admin email cannot be empty".to_string(),
        });
    }
    if access_key.trim().is_empty() {
        return Err(Error::Config {
            message: format!("Admin {email} has an empty access key"),
        });
    }

    let admin = admin::ActiveModel {
        email: Set(email),
        access_key_hash: Set(bcrypt::hash(access_key.trim(), HASH_COST)?),
        created_at: Set(chrono::Utc::now().naive_utc()),
        ..Default::default()
    };
    admin.insert(db).await.map_err(Into::into)
}

/// Inserts configured admins that are not in the table yet and returns how many
/// were added. Existing rows are left untouched.
pub async fn seed_admins(db: &DatabaseConnection, admins: &[AdminSeed]) -> Result<usize> {
    let mut added = 0;
    for seed in admins {
        if find_admin_by_email(db, &seed.email).await?.is_some() {
            continue;
        }
        create_admin(db, &seed.email, &seed.access_key).await?;
        info!("Seeded admin {}", normalize_email(&seed.email));
        added += 1;
    }
    Ok(added)
}

/// Checks login credentials.
///
/// # Errors
/// Returns `Error::Unauthorized` for an unknown email or a wrong key.
pub async fn verify_credentials(
    db: &DatabaseConnection,
    email: &str,
    access_key: &str,
) -> Result<admin::Model> {
    let Some(admin) = find_admin_by_email(db, email).await? else {
        warn!("Login attempt for unknown admin {}", normalize_email(email));
        return Err(Error::Unauthorized);
    };

    if !bcrypt::verify(access_key.trim(), &admin.access_key_hash)? {
        warn!("Login attempt with wrong key for {}", admin.email);
        return Err(Error::Unauthorized);
    }

    Ok(admin)
}

/// Confirms that an already authenticated identity is still an admin.
///
/// # Errors
/// Returns `Error::Forbidden` when the email is not in the `admins` table.
pub async fn ensure_admin(db: &DatabaseConnection, email: &str) -> Result<admin::Model> {
    find_admin_by_email(db, email)
        .await?
        .ok_or_else(|| Error::Forbidden {
            email: normalize_email(email),
        })
}
