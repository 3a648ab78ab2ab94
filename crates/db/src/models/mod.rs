//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches, where the
//!   entity supports updates

pub mod address;
pub mod bookmark;
pub mod category;
pub mod comment;
pub mod permission;
pub mod post;
pub mod price;
pub mod product;
pub mod slide;
pub mod star;
pub mod tag;
pub mod user;
