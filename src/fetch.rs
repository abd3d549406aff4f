//! Remote asset fetcher.
//!
//! Downloads each configured source into the output directory, one after
//! the other. Every failure (transport error, non-2xx status, write error)
//! is recorded against its item and the batch keeps going. No retries.

use std::fs::File;
use std::io::{BufWriter, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{debug, warn};
use reqwest::blocking::Client;

use crate::outcome::{BatchSummary, ItemOutcome};
use crate::{AssetSource, Error, Result, ToolConfig};

pub struct RemoteAssetFetcher {
    client: Client,
    output_dir: PathBuf,
    user_agent: String,
    timeout_ms: u64,
}

impl RemoteAssetFetcher {
    pub fn new(config: &ToolConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.fetch_timeout_ms))
            .build()
            .map_err(|e| Error::NetworkError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            output_dir: config.output_dir.clone(),
            user_agent: config.user_agent.clone(),
            timeout_ms: config.fetch_timeout_ms,
        })
    }

    /// Download one source. Returns the written path and byte count.
    pub fn fetch_one(&self, source: &AssetSource) -> Result<(PathBuf, u64)> {
        let mut res = self
            .client
            .get(&source.locator)
            .header("User-Agent", self.user_agent.clone())
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    Error::Timeout(self.timeout_ms)
                } else {
                    Error::NetworkError(format!("HTTP GET failed: {}", e))
                }
            })?;

        let status = res.status();
        if !status.is_success() {
            return Err(Error::NetworkError(format!("HTTP {}", status.as_u16())));
        }

        let path = self.output_dir.join(&source.output_name);
        let bytes = write_body(&mut res, &path)?;
        Ok((path, bytes))
    }

    /// Download every source in order and report `successCount/total`.
    pub fn fetch_all<W: Write>(&self, sources: &[AssetSource], out: &mut W) -> Result<BatchSummary> {
        if let Err(e) = std::fs::create_dir_all(&self.output_dir) {
            warn!("Cannot create {}: {}", self.output_dir.display(), e);
        }

        let mut summary = BatchSummary::new();
        for source in sources {
            writeln!(out, "Downloading {}...", source.output_name)?;
            let result = self.fetch_one(source);
            match &result {
                Ok((path, bytes)) => {
                    debug!("{} -> {} ({} bytes)", source.locator, path.display(), bytes);
                    writeln!(out, "✓ {} downloaded", source.output_name)?;
                }
                Err(e) => {
                    warn!("Download of {} failed: {}", source.locator, e);
                    writeln!(out, "✗ Error downloading {}: {}", source.output_name, e)?;
                }
            }
            summary.push(ItemOutcome::from_result(
                source.output_name.clone(),
                &result,
                |(_, bytes)| format!("{} bytes", bytes),
            ));
        }

        writeln!(
            out,
            "\nDownload finished: {}/{} images downloaded",
            summary.succeeded(),
            summary.total()
        )?;
        Ok(summary)
    }
}

/// Stream a response body into `path`. The file is closed on return; a
/// failure mid-stream leaves whatever was written so far.
fn write_body(res: &mut reqwest::blocking::Response, path: &Path) -> Result<u64> {
    let file = File::create(path)?;
    let mut out = BufWriter::new(file);
    let bytes = copy_body(res, &mut out)?;
    out.flush()?;
    Ok(bytes)
}

/// Copy `body` into `out`. Read failures are network errors, write failures
/// stay `Error::Io`.
fn copy_body<R: Read, W: Write>(body: &mut R, out: &mut W) -> Result<u64> {
    let mut buf = [0u8; 8192];
    let mut total = 0u64;
    loop {
        let n = match body.read(&mut buf) {
            Ok(0) => return Ok(total),
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => {
                return Err(Error::NetworkError(format!(
                    "Failed to read response body: {}",
                    e
                )))
            }
        };
        out.write_all(&buf[..n])?;
        total += n as u64;
    }
}
