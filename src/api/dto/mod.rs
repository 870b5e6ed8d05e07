//! Data Transfer Objects for REST request/response serialization.
//!
//! Every body carries a `success` flag so clients can branch without
//! inspecting the status code.

pub mod stats_dto;
pub mod submit_dto;

pub use stats_dto::*;
pub use submit_dto::*;
