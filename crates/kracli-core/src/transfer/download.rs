//! Streaming download of a direct link into a local file, with Range
//! resume.

use std::path::Path;

use futures::StreamExt;
use reqwest::{header, Client, StatusCode};
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::debug;

use super::{ProgressEvent, TransferError};

/// Destination file name for a download link: the basename with query
/// and fragment stripped.
pub fn filename_from_link(link: &str) -> String {
    let path = link.split(['?', '#']).next().unwrap_or(link);
    path.rsplit('/').next().unwrap_or(path).to_string()
}

/// Stream `link` into `dest`.
///
/// An existing destination is an error unless `resume` is set, in which
/// case the missing tail is requested with a Range header. A 200 answer
/// to a ranged request means the server ignored it, and the file is
/// rewritten from scratch. Non-success statuses from the file server are
/// errors; nothing is written in that case.
pub async fn fetch<F>(
    http: &Client,
    link: &str,
    dest: &Path,
    resume: bool,
    mut progress: F,
) -> Result<(), TransferError>
where
    F: FnMut(ProgressEvent),
{
    let existing = tokio::fs::metadata(dest).await.ok().map(|meta| meta.len());
    let mut request = http.get(link);
    let mut resume_from = 0u64;
    match existing {
        Some(len) if resume => {
            request = request.header(header::RANGE, format!("bytes={}-", len));
            resume_from = len;
        }
        Some(_) => {
            return Err(TransferError::AlreadyExists(dest.display().to_string()));
        }
        None => {}
    }

    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(TransferError::DownloadStatus(status));
    }

    let mut file = if resume_from > 0 && status == StatusCode::PARTIAL_CONTENT {
        OpenOptions::new().append(true).open(dest).await?
    } else {
        // Fresh download, or the server ignored the range request.
        resume_from = 0;
        File::create(dest).await?
    };

    let total = response.content_length().map(|len| len + resume_from);
    debug!(link, dest = %dest.display(), resume_from, ?total, "starting download");
    progress(ProgressEvent::Started {
        total,
        resumed_from: resume_from,
    });

    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
        progress(ProgressEvent::Chunk(chunk.len() as u64));
    }
    file.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;

    /// Serve one request with the body trickled a byte at a time.
    async fn trickle_server(body: &'static [u8], delay: Duration) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut sock, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 1024];
            let _ = sock.read(&mut buf).await;
            let head = format!(
                "HTTP/1.1 200 OK\r\ncontent-length: {}\r\nconnection: close\r\n\r\n",
                body.len()
            );
            sock.write_all(head.as_bytes()).await.unwrap();
            for byte in body {
                sock.write_all(std::slice::from_ref(byte)).await.unwrap();
                sock.flush().await.unwrap();
                tokio::time::sleep(delay).await;
            }
        });
        format!("http://{}/slow.bin", addr)
    }

    #[tokio::test]
    async fn streaming_outlasts_a_total_request_deadline() {
        let dir = tempfile::tempdir().unwrap();

        // A client with a total deadline gives up on a healthy trickle.
        let url = trickle_server(b"12345", Duration::from_millis(400)).await;
        let bounded = Client::builder()
            .timeout(Duration::from_millis(600))
            .build()
            .unwrap();
        let dest = dir.path().join("bounded.bin");
        let result = fetch(&bounded, &url, &dest, false, |_| {}).await;
        assert!(matches!(result, Err(TransferError::Network(_))));

        // The transfer client streams the same trickle to completion.
        let url = trickle_server(b"12345", Duration::from_millis(400)).await;
        let client = crate::api::ApiClient::new().unwrap();
        let dest = dir.path().join("streamed.bin");
        fetch(client.transfer_http(), &url, &dest, false, |_| {})
            .await
            .unwrap();
        assert_eq!(std::fs::read(&dest).unwrap(), b"12345");
    }

    #[test]
    fn filename_strips_directories() {
        assert_eq!(
            filename_from_link("https://dl.kra.sk/files/abc/report.pdf"),
            "report.pdf"
        );
    }

    #[test]
    fn filename_strips_query_and_fragment() {
        assert_eq!(
            filename_from_link("https://dl.kra.sk/f/video.mkv?token=xyz"),
            "video.mkv"
        );
        assert_eq!(
            filename_from_link("https://dl.kra.sk/f/video.mkv#part"),
            "video.mkv"
        );
        assert_eq!(
            filename_from_link("https://dl.kra.sk/f/video.mkv?token=xyz#part"),
            "video.mkv"
        );
    }

    #[test]
    fn filename_of_bare_name() {
        assert_eq!(filename_from_link("plain.txt"), "plain.txt");
    }
}
