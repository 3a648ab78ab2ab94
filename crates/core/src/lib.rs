//! Thrush domain core.
//!
//! Pure domain logic with no I/O: identifiers and timestamps, the error
//! taxonomy, entity capability traits, permission templates, rating bounds,
//! verification-code generation and encryption, the expiring code cache,
//! placeholder redirect rules and product variants.

pub mod cache;
pub mod entity;
pub mod error;
pub mod groups;
pub mod permissions;
pub mod placeholder;
pub mod product;
pub mod rating;
pub mod types;
pub mod verification;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
