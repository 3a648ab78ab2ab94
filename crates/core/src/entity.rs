//! Capability traits shared by every persisted entity.
//!
//! Entity structs opt into the capabilities they support instead of
//! inheriting from a common base:
//!
//! - [`Identifiable`] -- has an immutable database id.
//! - [`Timestamped`] -- carries creation and modification timestamps.
//! - [`SoftDeletable`] -- is hidden by a flag instead of being removed.
//! - [`PermissionBearing`] -- participates in object-level authorization.

use crate::types::{DbId, Timestamp};

pub trait Identifiable {
    fn id(&self) -> DbId;
}

pub trait Timestamped {
    fn created_at(&self) -> Timestamp;
    fn updated_at(&self) -> Timestamp;
}

/// An entity whose deletion flips `is_deleted` and keeps the row.
pub trait SoftDeletable: Identifiable {
    /// Table holding rows of this entity.
    const TABLE: &'static str;

    fn is_deleted(&self) -> bool;
}

/// An entity that receives object-level permission grants on creation.
pub trait PermissionBearing: Identifiable {
    /// Tag substituted into permission templates (`"{model}.view"` -> `"post.view"`).
    const MODEL_NAME: &'static str;

    /// The user that should receive object grants when this entity is created.
    fn creator_id(&self) -> Option<DbId> {
        None
    }
}

/// Implement [`Identifiable`] and [`Timestamped`] for a struct with
/// `id`, `created_at` and `updated_at` fields.
#[macro_export]
macro_rules! impl_timestamped_entity {
    ($ty:ty) => {
        impl $crate::entity::Identifiable for $ty {
            fn id(&self) -> $crate::types::DbId {
                self.id
            }
        }

        impl $crate::entity::Timestamped for $ty {
            fn created_at(&self) -> $crate::types::Timestamp {
                self.created_at
            }

            fn updated_at(&self) -> $crate::types::Timestamp {
                self.updated_at
            }
        }
    };
}

/// Implement [`SoftDeletable`] for a struct with an `is_deleted` field.
#[macro_export]
macro_rules! impl_soft_deletable {
    ($ty:ty, $table:literal) => {
        impl $crate::entity::SoftDeletable for $ty {
            const TABLE: &'static str = $table;

            fn is_deleted(&self) -> bool {
                self.is_deleted
            }
        }
    };
}
