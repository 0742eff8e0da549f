//! Artifact persistence
//!
//! Provides [`JsonArtifactStore`], a one-file-per-artifact JSON store that
//! implements the [`ArtifactStore`](boardroom_application::ArtifactStore) port.

mod json_store;

pub use json_store::JsonArtifactStore;
