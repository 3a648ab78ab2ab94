//! User entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thrush_core::entity::PermissionBearing;
use thrush_core::types::{DbId, Timestamp};

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses directly.
/// Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub mobile: Option<String>,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub image: Option<String>,
    pub is_active: bool,
    pub is_superuser: bool,
    pub mobile_verified: bool,
    pub email_verified: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

thrush_core::impl_timestamped_entity!(User);

impl PermissionBearing for User {
    const MODEL_NAME: &'static str = "user";

    /// A new user owns its own account.
    fn creator_id(&self) -> Option<DbId> {
        Some(self.id)
    }
}

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub mobile: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub image: Option<String>,
    pub is_active: bool,
    pub is_superuser: bool,
    pub mobile_verified: bool,
    pub email_verified: bool,
    pub created_at: Timestamp,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            mobile: user.mobile.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            image: user.image.clone(),
            is_active: user.is_active,
            is_superuser: user.is_superuser,
            mobile_verified: user.mobile_verified,
            email_verified: user.email_verified,
            created_at: user.created_at,
        }
    }
}

/// DTO for creating a new user.
#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub mobile: Option<String>,
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub image: Option<String>,
    /// New registrations start inactive until their code is verified.
    pub is_active: bool,
    pub is_superuser: bool,
}
