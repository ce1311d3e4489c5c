use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::db::Database;
use crate::models::BillAsset;
use crate::store::Store;

/// Outcome of one upload batch.
#[derive(Debug, Default)]
pub(crate) struct UploadReport {
    /// Names of the stored assets, in input order.
    pub(crate) added: Vec<String>,
    /// Files that could not be read, with the reason.
    pub(crate) skipped: Vec<(PathBuf, String)>,
}

struct LoadedFile {
    name: String,
    mime: String,
    bytes: Vec<u8>,
}

/// Read every file concurrently, then append all successful reads with a
/// single write. Failed reads are skipped and reported. Stored order follows
/// `paths`, not completion order.
pub(crate) fn upload(
    store: &mut Store<BillAsset>,
    db: &Database,
    paths: &[PathBuf],
) -> Result<UploadReport> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .context("Failed to start file reader runtime")?;
    let results = runtime.block_on(read_all(paths.to_vec()));

    let mut report = UploadReport::default();
    let mut assets = Vec::new();
    let mut next_id = store.next_id();
    for (path, result) in paths.iter().zip(results) {
        match result {
            Ok(file) => {
                report.added.push(file.name.clone());
                assets.push(BillAsset::new(next_id, file.name, &file.mime, &file.bytes));
                next_id += 1;
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Skipping bill upload");
                report.skipped.push((path.clone(), format!("{e:#}")));
            }
        }
    }

    let count = store.append_batch(db, assets)?;
    info!(added = count, skipped = report.skipped.len(), "Uploaded bills");
    Ok(report)
}

async fn read_all(paths: Vec<PathBuf>) -> Vec<Result<LoadedFile>> {
    let handles: Vec<_> = paths
        .into_iter()
        .map(|path| tokio::spawn(read_one(path)))
        .collect();

    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        results.push(match handle.await {
            Ok(result) => result,
            Err(e) => Err(anyhow::anyhow!("Read task failed: {e}")),
        });
    }
    results
}

async fn read_one(path: PathBuf) -> Result<LoadedFile> {
    let mime = detect_mime(&path);
    if !(mime.starts_with("image/") || mime == "application/pdf") {
        anyhow::bail!("Unsupported file type {mime}, expected an image or PDF");
    }
    let bytes = tokio::fs::read(&path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(LoadedFile { name, mime, bytes })
}

fn detect_mime(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}
