//! Shared response envelope types for API handlers.
//!
//! Every resource response is wrapped as `{ "data": ... }`. Use
//! [`DataResponse`] rather than ad-hoc `json!` envelopes.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
