//! Platform API client and authentication.
//!
//! Provides the [`PlatformClient`] used to locate and download uploaded
//! archives and to read keyrings, along with [`Auth`] and the
//! [`ArtifactStore`] seam the Maple client is written against.

mod auth;
mod platform;
mod store;

pub use auth::Auth;
pub use platform::{KeyringSummary, PlatformClient};
pub use store::ArtifactStore;
