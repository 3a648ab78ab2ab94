//! Well-known group name constants.
//!
//! These must match the seed data in `20260301000008_seed_groups_and_permissions.sql`.

/// Group every newly registered user joins.
pub const GROUP_REGISTERED_USERS: &str = "registered_users";
pub const GROUP_MODERATORS: &str = "moderators";
pub const GROUP_EDITORS: &str = "editors";
