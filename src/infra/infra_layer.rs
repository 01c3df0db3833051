// The infra module contains implementations of core traits.
// Each external service gets its own submodule.

#[path = "ai/mod.rs"]
pub mod ai;

#[path = "auth/mod.rs"]
pub mod auth;

#[path = "drive/mod.rs"]
pub mod drive;
