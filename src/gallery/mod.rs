mod lightbox;
mod upload;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::db::Database;
use crate::models::{encode_data_uri, BillAsset};
use crate::store::Store;

pub(crate) use lightbox::Lightbox;
pub(crate) use upload::{upload, UploadReport};

pub(crate) fn rename(
    store: &mut Store<BillAsset>,
    db: &Database,
    id: i64,
    name: &str,
) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        anyhow::bail!("Bill name cannot be empty");
    }
    let asset = store
        .get(id)
        .ok_or_else(|| anyhow::anyhow!("No bill with id {id}"))?;
    let renamed = BillAsset {
        name: name.to_string(),
        ..asset.clone()
    };
    store.replace(db, id, renamed)?;
    info!(id, name, "Renamed bill");
    Ok(())
}

pub(crate) fn delete(store: &mut Store<BillAsset>, db: &Database, id: i64) -> Result<BillAsset> {
    let removed = store.remove(db, id)?;
    info!(id, name = %removed.name, "Deleted bill");
    Ok(removed)
}

/// Decode the asset and write it into `dir`. Returns the written path.
pub(crate) fn download(asset: &BillAsset, dir: &Path) -> Result<PathBuf> {
    let bytes = asset.decode()?;
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    let path = dir.join(download_name(asset));
    std::fs::write(&path, bytes)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!(id = asset.id, path = %path.display(), "Downloaded bill");
    Ok(path)
}

/// File name for a downloaded asset: its name with path separators and
/// control characters replaced, falling back to `bill-<id>`, with an
/// extension added from the mime type when missing.
fn download_name(asset: &BillAsset) -> String {
    let cleaned: String = asset
        .name
        .trim()
        .chars()
        .map(|c| {
            if c == '/' || c == '\\' || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    let base = if cleaned.is_empty() {
        format!("bill-{}", asset.id)
    } else {
        cleaned.to_string()
    };
    if Path::new(&base).extension().is_some() {
        return base;
    }
    match mime_guess::get_mime_extensions_str(asset.mime_type()).and_then(|exts| exts.first()) {
        Some(ext) => format!("{base}.{ext}"),
        None => base,
    }
}

/// Embed an image file as a `data:` URI for an expense photo.
pub(crate) fn photo_data_uri(path: &Path) -> Result<String> {
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    if mime.type_() != mime_guess::mime::IMAGE {
        anyhow::bail!("{} is not an image", path.display());
    }
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(encode_data_uri(mime.essence_str(), &bytes))
}

#[cfg(test)]
mod tests;
