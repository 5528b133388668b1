//! TUS 1.0.0 resumable upload engine.
//!
//! Content attaches to a fileslot ident in three steps: POST the upload
//! host for a resource bound to the ident, HEAD the resource for its
//! current offset, then PATCH chunks from that offset until the server
//! acknowledges the full length.

use std::io::SeekFrom;
use std::path::Path;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::{header, Client, Response};
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio_util::io::ReaderStream;
use tracing::debug;

use super::{ProgressEvent, TransferError};

/// TUS protocol version sent with every request
const TUS_VERSION: &str = "1.0.0";

/// Path prefix of upload resources on the upload host
const UPLOAD_PATH: &str = "/upload/";

/// Offset and length of a TUS upload resource, from a HEAD probe.
#[derive(Debug, Clone, Copy)]
pub struct ResourceState {
    pub offset: u64,
    pub length: u64,
}

/// Size of the next chunk: the remainder, capped at the chunk size.
fn chunk_len(length: u64, offset: u64, chunk_bytes: u64) -> u64 {
    (length - offset).min(chunk_bytes)
}

/// Chunk size in bytes for a `--chunk-mb` value, saturating instead of
/// overflowing on absurd inputs.
fn chunk_bytes(chunk_mb: u64) -> u64 {
    chunk_mb.saturating_mul(1024 * 1024)
}

/// Validate the `Upload-Offset` a PATCH response acknowledged. A missing
/// header or an offset past the upload length is an error.
fn acknowledged_offset(next: Option<u64>, length: u64) -> Result<u64, TransferError> {
    let next = next.ok_or(TransferError::MissingUploadOffset)?;
    if next > length {
        return Err(TransferError::OffsetOverrun {
            offset: next,
            length,
        });
    }
    Ok(next)
}

/// `Upload-Metadata` value binding the resource to a fileslot ident.
fn upload_metadata(ident: &str) -> String {
    format!("ident {}", BASE64.encode(ident))
}

fn header_u64(response: &Response, name: &str) -> Option<u64> {
    response
        .headers()
        .get(name)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

/// Size of the local file. Unreadable and zero-sized files are rejected
/// before any network traffic.
pub fn probe_local(path: &Path) -> Result<u64, TransferError> {
    let size = std::fs::metadata(path)
        .map_err(|_| TransferError::SourceMissing)?
        .len();
    if size == 0 {
        return Err(TransferError::SourceEmpty);
    }
    Ok(size)
}

/// Create a TUS upload resource bound to `ident` and return its id (the
/// `Location` header minus the upload path prefix).
pub async fn create_resource(
    http: &Client,
    upload_base: &str,
    ident: &str,
    size: u64,
) -> Result<String, TransferError> {
    let url = format!("{}{}", upload_base, UPLOAD_PATH);
    let response = http
        .post(&url)
        .header("Tus-Resumable", TUS_VERSION)
        .header("Upload-Length", size.to_string())
        .header("Upload-Metadata", upload_metadata(ident))
        .send()
        .await?;
    let location = response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(TransferError::NoUploadResource)?;
    debug!(location, "upload resource created");
    Ok(location.replace(UPLOAD_PATH, ""))
}

/// HEAD the resource for its current offset and expected length.
pub async fn probe_resource(
    http: &Client,
    upload_base: &str,
    resource: &str,
) -> Result<ResourceState, TransferError> {
    let url = format!("{}{}{}", upload_base, UPLOAD_PATH, resource);
    let response = http
        .head(&url)
        .header("Tus-Resumable", TUS_VERSION)
        .send()
        .await?;
    match (
        header_u64(&response, "Upload-Offset"),
        header_u64(&response, "Upload-Length"),
    ) {
        (Some(offset), Some(length)) => Ok(ResourceState { offset, length }),
        _ => Err(TransferError::ProbeFailed),
    }
}

/// PATCH the file content into the resource from `state.offset` up to
/// `size`, in `chunk_mb` chunks. `chunk_mb == 0` streams the whole file
/// in a single PATCH from position 0.
///
/// The server's `Upload-Offset` response header drives each following
/// iteration; a response without it is an error.
#[allow(clippy::too_many_arguments)]
pub async fn patch<F>(
    http: &Client,
    upload_base: &str,
    resource: &str,
    path: &Path,
    size: u64,
    state: ResourceState,
    chunk_mb: u64,
    mut progress: F,
) -> Result<(), TransferError>
where
    F: FnMut(ProgressEvent),
{
    let url = format!("{}{}{}", upload_base, UPLOAD_PATH, resource);

    if chunk_mb == 0 {
        progress(ProgressEvent::Started {
            total: Some(size),
            resumed_from: 0,
        });
        let file = tokio::fs::File::open(path).await?;
        let response = http
            .patch(&url)
            .header(header::CONTENT_TYPE, "application/offset+octet-stream")
            .header(header::CONTENT_LENGTH, size.to_string())
            .header("Tus-Resumable", TUS_VERSION)
            .header("Upload-Offset", "0")
            .body(reqwest::Body::wrap_stream(ReaderStream::new(file)))
            .send()
            .await?;
        let offset = acknowledged_offset(header_u64(&response, "Upload-Offset"), size)?;
        if offset != size {
            return Err(TransferError::Incomplete {
                offset,
                length: size,
            });
        }
        progress(ProgressEvent::Chunk(size));
        return Ok(());
    }

    let chunk_size = chunk_bytes(chunk_mb);
    let mut offset = state.offset;
    progress(ProgressEvent::Started {
        total: Some(size),
        resumed_from: offset,
    });

    let mut file = tokio::fs::File::open(path).await?;
    while offset < size {
        let len = chunk_len(size, offset, chunk_size);
        file.seek(SeekFrom::Start(offset)).await?;
        let mut buf = vec![0u8; len as usize];
        file.read_exact(&mut buf).await?;

        let response = http
            .patch(&url)
            .header(header::CONTENT_TYPE, "application/offset+octet-stream")
            .header("Tus-Resumable", TUS_VERSION)
            .header("Upload-Offset", offset.to_string())
            .body(buf)
            .send()
            .await?;
        let next = acknowledged_offset(header_u64(&response, "Upload-Offset"), size)?;
        debug!(offset, next, "chunk acknowledged");
        progress(ProgressEvent::Chunk(next.saturating_sub(offset)));
        offset = next;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MB: u64 = 1024 * 1024;

    #[test]
    fn chunk_arithmetic() {
        // Full chunks while more than chunk_bytes remains.
        assert_eq!(chunk_len(25 * MB, 0, 10 * MB), 10 * MB);
        assert_eq!(chunk_len(25 * MB, 10 * MB, 10 * MB), 10 * MB);
        // The tail chunk is exactly the remainder.
        assert_eq!(chunk_len(25 * MB, 20 * MB, 10 * MB), 5 * MB);
        // Resuming mid-chunk still lands exactly on the length.
        assert_eq!(chunk_len(25 * MB, 24 * MB + 17, 10 * MB), MB - 17);
    }

    #[test]
    fn chunk_bytes_saturates_on_huge_values() {
        assert_eq!(chunk_bytes(10), 10 * MB);
        assert_eq!(chunk_bytes(u64::MAX), u64::MAX);
    }

    #[test]
    fn acknowledged_offset_accepts_up_to_the_length() {
        assert_eq!(acknowledged_offset(Some(0), 25 * MB).unwrap(), 0);
        assert_eq!(
            acknowledged_offset(Some(25 * MB), 25 * MB).unwrap(),
            25 * MB
        );
    }

    #[test]
    fn acknowledged_offset_rejects_missing_and_overrun() {
        assert!(matches!(
            acknowledged_offset(None, 25 * MB),
            Err(TransferError::MissingUploadOffset)
        ));
        // An offset past the length would otherwise loop forever and
        // underflow the remainder arithmetic.
        assert!(matches!(
            acknowledged_offset(Some(25 * MB + 1), 25 * MB),
            Err(TransferError::OffsetOverrun {
                offset,
                length,
            }) if offset == 25 * MB + 1 && length == 25 * MB
        ));
    }

    #[test]
    fn metadata_encodes_ident_in_standard_base64() {
        assert_eq!(upload_metadata("abc123"), "ident YWJjMTIz");
    }

    #[test]
    fn probe_local_rejects_missing_and_empty_files() {
        let dir = tempfile::tempdir().unwrap();

        let missing = dir.path().join("absent.bin");
        assert!(matches!(
            probe_local(&missing),
            Err(TransferError::SourceMissing)
        ));

        let empty = dir.path().join("empty.bin");
        std::fs::write(&empty, b"").unwrap();
        assert!(matches!(
            probe_local(&empty),
            Err(TransferError::SourceEmpty)
        ));

        let small = dir.path().join("small.bin");
        std::fs::write(&small, b"payload").unwrap();
        assert_eq!(probe_local(&small).unwrap(), 7);
    }
}
