//! Classification of a run's artifact root.

use url::Url;

/// Storage backing a run's artifact root.
///
/// The pipeline registers the fitted model with the model registry when the
/// artifact root lives behind a remote store, and persists the model to the
/// local model directory when the tracking backend writes artifacts straight
/// to the local filesystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactStore {
    /// `file://` URIs and plain filesystem paths.
    Local,
    /// Any scheme-addressed root that is not the local filesystem.
    Remote,
}

impl ArtifactStore {
    pub fn from_uri(uri: &str) -> ArtifactStore {
        match Url::parse(uri) {
            Ok(url) if url.scheme() == "file" => ArtifactStore::Local,
            Ok(_) => ArtifactStore::Remote,
            // plain paths like `./mlruns/0` are not URLs at all
            Err(_) => ArtifactStore::Local,
        }
    }
}
