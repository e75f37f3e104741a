//! Provider 实现

#[cfg(feature = "spotify")]
pub mod spotify;

#[cfg(feature = "spotify")]
pub use spotify::{SpotifyEndpoints, SpotifyProvider};
