//! Remote origins: a plain GET streamed into a scoped temporary file.
//!
//! The temp file is deleted when the returned [`NamedTempFile`] drops, so a
//! failed open, a closed handle and an abandoned call all clean up.

use std::io::{self, Read, Write};

use reqwest::blocking::Client;
use tempfile::NamedTempFile;
use tracing::{debug, info};
use url::Url;

use crate::config::EngineConfig;
use crate::error::{OpenError, SourceError};

/// Download `url` into a fresh temp file.
///
/// The temp file keeps the URL's extension so delimited sources can still
/// be recognised after download.
pub(crate) fn fetch_to_temp(
    url: &Url,
    extension: Option<&str>,
    config: &EngineConfig,
) -> Result<NamedTempFile, OpenError> {
    let client = Client::builder()
        .timeout(config.http_timeout)
        .user_agent(config.user_agent.as_str())
        .build()?;

    info!(%url, "fetching remote workbook");
    let response = client.get(url.clone()).send()?;

    let status = response.status();
    if !status.is_success() {
        return Err(OpenError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let suffix = extension.map(|e| format!(".{e}")).unwrap_or_default();
    let mut temp = tempfile::Builder::new()
        .prefix("xlchunk-")
        .suffix(&suffix)
        .tempfile()?;
    debug!(path = %temp.path().display(), "download target");

    let written = match config.max_download_bytes {
        Some(limit) => {
            let copied = copy_body(&mut response.take(limit.saturating_add(1)), &mut temp)?;
            if copied > limit {
                return Err(OpenError::TooLarge { limit });
            }
            copied
        }
        None => {
            let mut response = response;
            copy_body(&mut response, &mut temp)?
        }
    };
    temp.flush().map_err(SourceError::Io)?;

    info!(%url, bytes = written, "remote workbook downloaded");
    Ok(temp)
}

/// Stream `body` into `out`. Read failures belong to the transfer and map to
/// [`OpenError::Download`]; write failures are local I/O.
fn copy_body(body: &mut impl Read, out: &mut impl Write) -> Result<u64, OpenError> {
    let mut chunk = [0u8; 64 * 1024];
    let mut total: u64 = 0;
    loop {
        let n = match body.read(&mut chunk) {
            Ok(0) => return Ok(total),
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(OpenError::Download(e)),
        };
        let data = chunk.get(..n).unwrap_or_default();
        out.write_all(data).map_err(SourceError::Io)?;
        total = total.saturating_add(n as u64);
    }
}
