use anyhow::{Context, Result, bail};
use reqwest::Url;
use std::io::{Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;
use tracing::debug;

use super::{Transport, decode_record};
use crate::config::REQUEST_TIMEOUT;
use crate::plan::PlanRecord;

/// Largest raw response (head and body) accepted from a provider.
pub const MAX_RESPONSE_BYTES: u64 = 64 * 1024;

/// Fetches provider records over a bare TCP connection with a single
/// HTTP/1.0 `GET`.
///
/// Only plain `http://` URLs are supported; anything else fails the fetch.
pub struct SocketTransport {
    timeout: Duration,
}

impl SocketTransport {
    pub fn new() -> Self {
        Self::with_timeout(REQUEST_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Tries each resolved address in turn, returning the first connection.
    fn connect(&self, host: &str, port: u16) -> Result<TcpStream> {
        let mut last_err = None;
        for addr in (host, port).to_socket_addrs()? {
            match TcpStream::connect_timeout(&addr, self.timeout) {
                Ok(stream) => return Ok(stream),
                Err(e) => {
                    debug!(%addr, error = %e, "Connect attempt failed");
                    last_err = Some(e);
                }
            }
        }

        match last_err {
            Some(e) => Err(e).with_context(|| format!("could not connect to {host}:{port}")),
            None => bail!("could not resolve {host}:{port}"),
        }
    }
}

impl Default for SocketTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for SocketTransport {
    fn fetch(&self, url: &str) -> Result<PlanRecord> {
        let url = Url::parse(url).with_context(|| format!("invalid url '{url}'"))?;
        if url.scheme() != "http" {
            bail!("unsupported scheme '{}'", url.scheme());
        }

        let host = url.host_str().context("url has no host")?;
        let port = url.port_or_known_default().unwrap_or(80);
        let mut stream = self.connect(host, port)?;
        stream.set_read_timeout(Some(self.timeout))?;
        stream.set_write_timeout(Some(self.timeout))?;

        let mut target = url.path().to_string();
        if let Some(query) = url.query() {
            target.push('?');
            target.push_str(query);
        }
        let host_header = match url.port() {
            Some(p) => format!("{host}:{p}"),
            None => host.to_string(),
        };

        write!(
            stream,
            "GET {target} HTTP/1.0\r\nHost: {host_header}\r\nAccept: application/json\r\nConnection: close\r\n\r\n"
        )?;
        stream.flush()?;

        let mut raw = Vec::new();
        stream.take(MAX_RESPONSE_BYTES + 1).read_to_end(&mut raw)?;
        if raw.len() as u64 > MAX_RESPONSE_BYTES {
            bail!("provider response exceeds {MAX_RESPONSE_BYTES} bytes");
        }
        debug!(bytes = raw.len(), "Provider response received");

        let body = split_response(&raw)?;
        decode_record(body)
    }
}

/// Checks the status line and returns the body of a raw HTTP response.
fn split_response(raw: &[u8]) -> Result<&[u8]> {
    let head_end = raw
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .context("response has no header terminator")?;

    let head = std::str::from_utf8(&raw[..head_end]).context("response head is not utf-8")?;
    let status_line = head.lines().next().unwrap_or_default();
    let status: u16 = status_line
        .split_whitespace()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .with_context(|| format!("malformed status line '{status_line}'"))?;

    if !(200..300).contains(&status) {
        bail!("provider returned status {status}");
    }

    Ok(&raw[head_end + 4..])
}
