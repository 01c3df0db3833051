// The core module contains all business logic.
// Each feature gets its own submodule; none of them know about HTTP or the terminal.

#[path = "ai/mod.rs"]
pub mod ai;

#[path = "auth/mod.rs"]
pub mod auth;

#[path = "drive/mod.rs"]
pub mod drive;

#[path = "links/link_resolver.rs"]
pub mod links;
