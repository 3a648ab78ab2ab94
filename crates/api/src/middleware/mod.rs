//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- the caller identified by a JWT Bearer token.
//! - [`auth::OptionalAuthUser`] -- the same, for routes open to anonymous callers.
//! - [`rbac::RequireSuperuser`] -- rejects everyone but superusers.
//! - [`rbac`] also holds the class-wide and per-object permission checks.

pub mod auth;
pub mod rbac;
