use flate2::read::{GzDecoder, ZlibDecoder};
use reqwest::header::{HeaderMap, ACCEPT_ENCODING, CONTENT_ENCODING};
use reqwest::Client;
use std::io::Read;
use std::time::{Duration, Instant};
use url::Url;

use crate::error::FetchFailure;
use crate::snapshot::Headers;

/// Upper bound on both the received and the decompressed page body.
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Raw outcome of the primary GET, before any DOM work.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub final_url: String,
    pub status: u16,
    pub headers: Headers,
    pub body: String,
    pub elapsed_ms: u64,
}

/// GET the page once. Every HTTP status is a valid answer; only transport
/// errors and the timeout fail.
pub async fn fetch(client: &Client, url: &Url, timeout: Duration) -> Result<FetchedPage, FetchFailure> {
    tracing::info!(url = %url, "Sending HTTP request");
    let start = Instant::now();

    let request = async {
        let mut resp = client
            .get(url.clone())
            .header(ACCEPT_ENCODING, "gzip, deflate")
            .timeout(timeout)
            .send()
            .await?;
        let status = resp.status().as_u16();
        let final_url = resp.url().to_string();
        let headers = header_map(resp.headers());
        let mut bytes = Vec::new();
        while let Some(chunk) = resp.chunk().await? {
            let room = MAX_BODY_BYTES - bytes.len();
            bytes.extend_from_slice(&chunk[..chunk.len().min(room)]);
            if bytes.len() >= MAX_BODY_BYTES {
                tracing::warn!(limit = MAX_BODY_BYTES, "Page body truncated");
                break;
            }
        }
        Ok::<_, reqwest::Error>((status, final_url, headers, bytes))
    };

    // The client timeout already covers the request; this outer bound also
    // covers a body that trickles in.
    let (status, final_url, headers, bytes) = match tokio::time::timeout(timeout, request).await {
        Ok(Ok(parts)) => parts,
        Ok(Err(e)) => {
            let failure = FetchFailure::from_error(&e);
            tracing::error!(url = %url, error = %failure, "Page fetch failed");
            return Err(failure);
        }
        Err(_) => {
            tracing::error!(url = %url, "Page fetch timed out");
            return Err(FetchFailure::timeout(url.as_str(), timeout.as_secs()));
        }
    };
    let elapsed_ms = start.elapsed().as_millis() as u64;

    let encoding = headers.get(CONTENT_ENCODING.as_str()).map(String::as_str).unwrap_or("");
    let decoded = decode_body(&bytes, encoding, MAX_BODY_BYTES);
    let body = String::from_utf8_lossy(&decoded).into_owned();

    tracing::info!(status, elapsed_ms, bytes = body.len(), "Page response received");

    Ok(FetchedPage {
        final_url,
        status,
        headers,
        body,
        elapsed_ms,
    })
}

/// Lowercase header names; repeated headers are joined with ", ".
pub fn header_map(headers: &HeaderMap) -> Headers {
    let mut out = Headers::new();
    for (key, value) in headers {
        let name = key.as_str().to_lowercase();
        let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
        match out.get_mut(&name) {
            Some(existing) => {
                existing.push_str(", ");
                existing.push_str(&value);
            }
            None => {
                out.insert(name, value);
            }
        }
    }
    out
}

/// Undo gzip/deflate transfer compression, stopping at `limit` decoded bytes.
/// Anything undecodable is returned as-is so a lying server still yields a
/// body; a stream that breaks off midway keeps what was decoded.
pub fn decode_body(bytes: &[u8], content_encoding: &str, limit: usize) -> Vec<u8> {
    let encoding = content_encoding.to_lowercase();
    let mut out = Vec::new();
    let result = if encoding.contains("gzip") {
        GzDecoder::new(bytes).take(limit as u64).read_to_end(&mut out)
    } else if encoding.contains("deflate") {
        ZlibDecoder::new(bytes).take(limit as u64).read_to_end(&mut out)
    } else {
        return bytes[..bytes.len().min(limit)].to_vec();
    };
    match result {
        Ok(_) => out,
        Err(e) if !out.is_empty() => {
            tracing::debug!("{} body ended early ({}), keeping decoded part", encoding, e);
            out
        }
        Err(e) => {
            tracing::debug!("{} body could not be decoded ({}), using raw bytes", encoding, e);
            bytes[..bytes.len().min(limit)].to_vec()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use reqwest::header::HeaderValue;
    use std::io::Write;

    #[test]
    fn gzip_body_is_decoded() {
        let mut enc = GzEncoder::new(Vec::new(), Compression::default());
        enc.write_all(b"<html>hello</html>").unwrap();
        let compressed = enc.finish().unwrap();
        assert_eq!(decode_body(&compressed, "gzip", MAX_BODY_BYTES), b"<html>hello</html>");
    }

    #[test]
    fn plain_or_broken_body_passes_through() {
        assert_eq!(decode_body(b"<html></html>", "", MAX_BODY_BYTES), b"<html></html>");
        assert_eq!(decode_body(b"not gzip", "gzip", MAX_BODY_BYTES), b"not gzip");
    }

    #[test]
    fn decompression_stops_at_limit() {
        // 4 MiB of zeros compresses to a few KiB.
        let mut enc = GzEncoder::new(Vec::new(), Compression::best());
        enc.write_all(&vec![0u8; 4 * 1024 * 1024]).unwrap();
        let bomb = enc.finish().unwrap();
        assert!(bomb.len() < 64 * 1024);

        let decoded = decode_body(&bomb, "gzip", 1024);
        assert_eq!(decoded.len(), 1024);

        let plain = decode_body(&[b'a'; 4096], "", 1024);
        assert_eq!(plain.len(), 1024);
    }

    #[test]
    fn header_names_are_lowercased_and_joined() {
        let mut map = HeaderMap::new();
        map.append("Set-Cookie", HeaderValue::from_static("a=1"));
        map.append("Set-Cookie", HeaderValue::from_static("b=2"));
        map.insert("X-Powered-By", HeaderValue::from_static("PHP/8.2"));
        let headers = header_map(&map);
        assert_eq!(headers.get("set-cookie").map(String::as_str), Some("a=1, b=2"));
        assert_eq!(headers.get("x-powered-by").map(String::as_str), Some("PHP/8.2"));
    }
}
