//! Material upload.
//!
//! Validates the payload, posts it to the backend, and reports the created
//! material. Unlike the read paths, upload failures are always surfaced to
//! the user — there is no sample-data substitution for writes.

use anyhow::{bail, Result};
use std::path::PathBuf;

use crate::api::BackendClient;
use crate::config::Config;
use crate::models::{SourceKind, UploadPayload};

pub async fn run_upload(
    config: &Config,
    title: String,
    notes: Option<String>,
    file: Option<PathBuf>,
    link: bool,
) -> Result<()> {
    if title.trim().is_empty() {
        bail!("--title must not be empty");
    }

    if let Some(ref path) = file {
        if !path.exists() {
            bail!("Upload file does not exist: {}", path.display());
        }
    }

    // A file attachment always means an upload; --link only applies to
    // note-only submissions.
    let source = if file.is_some() {
        SourceKind::Upload
    } else if link {
        SourceKind::Link
    } else {
        SourceKind::Upload
    };

    let payload = UploadPayload {
        title,
        notes,
        source,
        file,
    };

    let client = BackendClient::new(&config.backend)?;
    let id = client.upload_material(&payload).await?;

    println!("Material received. Agents are extracting concepts.");
    println!("id: {}", id);
    Ok(())
}
