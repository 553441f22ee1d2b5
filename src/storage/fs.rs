//! Filesystem stream backend.
//!
//! Serves audio objects from a local root directory. Keys are jailed to the
//! root: absolute keys or any `..` component are rejected before touching
//! the filesystem.

use async_trait::async_trait;
use axum::body::Body;
use std::path::{Component, Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt, BufReader, SeekFrom};
use tokio_util::io::ReaderStream;
use tracing::debug;

use super::range::{ByteRange, Span};
use super::{
    mime_for_extension, AudioBackend, AudioStream, ObjectInfo, ServedRange, StreamTarget,
};
use crate::error::ApiError;

const STREAM_BUFFER_SIZE: usize = 4096 * 16;

pub struct FsBackend {
    root: PathBuf,
}

impl FsBackend {
    pub fn new(root: PathBuf) -> FsBackend {
        FsBackend { root }
    }

    fn resolve_key(&self, key: &str) -> Result<PathBuf, ApiError> {
        let relative = Path::new(key);
        if relative.is_absolute() {
            return Err(ApiError::Forbidden("absolute paths not allowed".into()));
        }
        for component in relative.components() {
            match component {
                Component::Normal(_) | Component::CurDir => {}
                _ => {
                    return Err(ApiError::Forbidden(
                        "path escapes the audio root".into(),
                    ))
                }
            }
        }
        Ok(self.root.join(relative))
    }

    fn key_of<'a>(&self, target: &'a StreamTarget) -> Result<&'a str, ApiError> {
        match target {
            StreamTarget::Key(key) => Ok(key),
            StreamTarget::Url(_) => Err(ApiError::Forbidden(
                "absolute URLs not served by the fs backend".into(),
            )),
        }
    }

    fn sniff_content_type(path: &Path) -> String {
        let sniffed = infer::get_from_path(path)
            .ok()
            .flatten()
            .map(|kind| kind.mime_type())
            .filter(|mime| mime.starts_with("audio/"));
        match sniffed {
            Some(mime) => mime.to_string(),
            None => mime_for_extension(path).to_string(),
        }
    }

    async fn object_size(&self, path: &Path) -> Result<u64, ApiError> {
        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|_| ApiError::NotFound)?;
        if !metadata.is_file() {
            return Err(ApiError::NotFound);
        }
        Ok(metadata.len())
    }
}

#[async_trait]
impl AudioBackend for FsBackend {
    fn name(&self) -> &'static str {
        "fs"
    }

    async fn probe(&self, target: &StreamTarget) -> Result<ObjectInfo, ApiError> {
        let path = self.resolve_key(self.key_of(target)?)?;
        let total = self.object_size(&path).await?;
        Ok(ObjectInfo {
            total: Some(total),
            content_type: Self::sniff_content_type(&path),
        })
    }

    async fn serve(
        &self,
        target: &StreamTarget,
        range: Option<ByteRange>,
    ) -> Result<AudioStream, ApiError> {
        let path = self.resolve_key(self.key_of(target)?)?;
        let total = self.object_size(&path).await?;

        let span = match range {
            None => Span::Full,
            Some(range) => range
                .resolve(total)
                .map_err(|_| ApiError::RangeNotSatisfiable { total })?,
        };

        debug!("Streaming {} ({:?})", path.display(), span);
        let content_type = Self::sniff_content_type(&path);

        let mut file = File::open(&path)
            .await
            .map_err(|e| ApiError::UpstreamUnavailable(e.to_string()))?;

        let (range, body) = match span {
            Span::Full => {
                let reader = BufReader::with_capacity(STREAM_BUFFER_SIZE, file);
                let stream = ReaderStream::with_capacity(reader, STREAM_BUFFER_SIZE);
                (
                    ServedRange::Full { total: Some(total) },
                    Body::from_stream(stream),
                )
            }
            Span::Partial { start, end } => {
                file.seek(SeekFrom::Start(start))
                    .await
                    .map_err(|e| ApiError::UpstreamUnavailable(e.to_string()))?;
                let limited = file.take(end - start + 1);
                let reader = BufReader::with_capacity(STREAM_BUFFER_SIZE, limited);
                let stream = ReaderStream::with_capacity(reader, STREAM_BUFFER_SIZE);
                (
                    ServedRange::Partial { start, end, total },
                    Body::from_stream(stream),
                )
            }
        };

        Ok(AudioStream {
            range,
            content_type,
            body,
        })
    }
}
