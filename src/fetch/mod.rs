//! Loading raw bytes for a data source, over HTTP or from disk.

mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use anyhow::{Context, Result, bail};
use flate2::read::GzDecoder;
use std::io::Read;

pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>> {
    let resp = client.get(url.parse()?).await?;
    let status = resp.status();
    if !status.is_success() {
        bail!("GET {url} returned status {status}");
    }
    Ok(resp.bytes().await?.to_vec())
}

/// Reads `source` as a URL when it starts with `http`, otherwise as a local
/// path. Content of a `.gz` source is decompressed.
#[tracing::instrument(skip(client))]
pub async fn load_source<C: HttpClient>(client: &C, source: &str) -> Result<Vec<u8>> {
    let bytes = if source.starts_with("http://") || source.starts_with("https://") {
        fetch_bytes(client, source).await?
    } else {
        tokio::fs::read(source)
            .await
            .with_context(|| format!("failed to read {source}"))?
    };
    tracing::debug!(bytes = bytes.len(), "Source loaded");

    if source.ends_with(".gz") {
        let mut decoded = Vec::new();
        GzDecoder::new(bytes.as_slice())
            .read_to_end(&mut decoded)
            .with_context(|| format!("failed to gunzip {source}"))?;
        return Ok(decoded);
    }

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::Write;

    fn temp_path(name: &str) -> String {
        format!("{}/{}", std::env::temp_dir().display(), name)
    }

    #[tokio::test]
    async fn test_load_local_file() {
        let path = temp_path("bikewatch_test_source.txt");
        std::fs::write(&path, b"hello").unwrap();

        let bytes = load_source(&BasicClient::new(), &path).await.unwrap();
        assert_eq!(bytes, b"hello");

        std::fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_load_gzipped_file() {
        let path = temp_path("bikewatch_test_source.csv.gz");
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"a,b\n1,2\n").unwrap();
        std::fs::write(&path, encoder.finish().unwrap()).unwrap();

        let bytes = load_source(&BasicClient::new(), &path).await.unwrap();
        assert_eq!(bytes, b"a,b\n1,2\n");

        std::fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_missing_file_is_error() {
        let path = temp_path("bikewatch_test_does_not_exist.json");
        assert!(load_source(&BasicClient::new(), &path).await.is_err());
    }
}
