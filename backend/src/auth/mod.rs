//! Authentication module
//!
//! Identity is established by the reverse proxy; see [`identity`].

mod identity;

pub use identity::{resolve_username, CurrentUser};
