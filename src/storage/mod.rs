//! Audio object storage backends for the streaming proxy.
//!
//! The proxy is a pure relay: backends hand back streaming bodies, never
//! whole objects in memory, so per-request cost stays O(buffer) and a slow
//! client backpressures the upstream read through the body stream.

mod fs;
mod http;
mod location;
mod range;

pub use fs::FsBackend;
pub use http::HttpBackend;
pub use location::{is_absolute_url, StreamTarget};
pub use range::{ByteRange, Span, Unsatisfiable};

use async_trait::async_trait;
use axum::body::Body;
use std::path::Path;

use crate::error::ApiError;

/// Fallback MIME type when nothing better is known.
pub const DEFAULT_AUDIO_MIME: &str = "audio/mpeg";

/// Size/type facts about an audio object, as learned from a probe.
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectInfo {
    pub total: Option<u64>,
    pub content_type: String,
}

/// What portion of the object a stream carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ServedRange {
    /// Whole object; `total` is `None` when the size is unknown upstream.
    Full { total: Option<u64> },
    Partial { start: u64, end: u64, total: u64 },
}

/// A ready-to-relay audio stream.
#[derive(Debug)]
pub struct AudioStream {
    pub range: ServedRange,
    pub content_type: String,
    pub body: Body,
}

/// A storage backend able to probe and stream audio objects.
///
/// Exactly one backend is active per server process; its `name` is reported
/// by the health endpoint.
#[async_trait]
pub trait AudioBackend: Send + Sync {
    fn name(&self) -> &'static str;

    /// Size up an object without transferring its body (HEAD support).
    async fn probe(&self, target: &StreamTarget) -> Result<ObjectInfo, ApiError>;

    /// Open a (possibly ranged) stream over the object.
    async fn serve(
        &self,
        target: &StreamTarget,
        range: Option<ByteRange>,
    ) -> Result<AudioStream, ApiError>;
}

/// Extension-based MIME guess for audio files.
pub(crate) fn mime_for_extension(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("mp3") => "audio/mpeg",
        Some("ogg") | Some("oga") | Some("opus") => "audio/ogg",
        Some("flac") => "audio/flac",
        Some("wav") => "audio/wav",
        Some("m4a") | Some("mp4") => "audio/mp4",
        Some("aac") => "audio/aac",
        Some("webm") => "audio/webm",
        _ => DEFAULT_AUDIO_MIME,
    }
}
