//! URL codec layer.
//!
//! - [`query`]: decode a query string into a [`FilterState`](crate::domain::FilterState)
//!   and encode it back in canonical form
//! - [`identity`]: the canonical key used for invalidation and response tagging

pub mod identity;
pub mod query;

pub use identity::QueryIdentity;
pub use query::{decode, encode};
