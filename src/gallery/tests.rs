#![allow(clippy::unwrap_used)]

use std::path::PathBuf;

use super::*;
use crate::db::Database;
use crate::models::BillAsset;
use crate::store::Store;

const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}

fn asset(id: i64, name: &str, mime: &str, bytes: &[u8]) -> BillAsset {
    BillAsset::new(id, name.into(), mime, bytes)
}

// ── upload ────────────────────────────────────────────────────

#[test]
fn test_upload_keeps_input_order() {
    let dir = tempfile::tempdir().unwrap();
    let paths = vec![
        write_file(dir.path(), "b.pdf", b"%PDF-1.4 second"),
        write_file(dir.path(), "a.png", PNG_BYTES),
        write_file(dir.path(), "c.jpg", b"jpeg"),
    ];
    let db = Database::open_in_memory().unwrap();
    let mut store = Store::<BillAsset>::load(&db);

    let report = upload(&mut store, &db, &paths).unwrap();
    assert_eq!(report.added, ["b.pdf", "a.png", "c.jpg"]);
    assert!(report.skipped.is_empty());

    let names: Vec<&str> = store.items().iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, ["b.pdf", "a.png", "c.jpg"]);
    assert!(store.items()[0].is_pdf());
    assert_eq!(store.items()[1].mime_type(), "image/png");
    assert_eq!(store.items()[1].decode().unwrap(), PNG_BYTES);
    assert_eq!(store.items()[2].mime_type(), "image/jpeg");
}

#[test]
fn test_upload_assigns_unique_ids() {
    let dir = tempfile::tempdir().unwrap();
    let paths = vec![
        write_file(dir.path(), "1.png", PNG_BYTES),
        write_file(dir.path(), "2.png", PNG_BYTES),
    ];
    let db = Database::open_in_memory().unwrap();
    let mut store = Store::<BillAsset>::load(&db);
    upload(&mut store, &db, &paths).unwrap();
    upload(&mut store, &db, &paths).unwrap();

    let mut ids: Vec<i64> = store.items().iter().map(|a| a.id).collect();
    ids.dedup();
    assert_eq!(ids.len(), 4);
}

#[test]
fn test_upload_skips_failures_and_persists_rest() {
    let dir = tempfile::tempdir().unwrap();
    let paths = vec![
        write_file(dir.path(), "ok.png", PNG_BYTES),
        dir.path().join("missing.png"),
        write_file(dir.path(), "notes.txt", b"plain text"),
        write_file(dir.path(), "bill.pdf", b"%PDF"),
    ];
    let db = Database::open_in_memory().unwrap();
    let mut store = Store::<BillAsset>::load(&db);

    let report = upload(&mut store, &db, &paths).unwrap();
    assert_eq!(report.added, ["ok.png", "bill.pdf"]);
    assert_eq!(report.skipped.len(), 2);
    assert_eq!(report.skipped[0].0, paths[1]);
    assert!(report.skipped[1].1.contains("Unsupported file type"));

    let reloaded = Store::<BillAsset>::load(&db);
    assert_eq!(reloaded.len(), 2);
    assert_eq!(reloaded.items()[1].name, "bill.pdf");
}

#[test]
fn test_upload_nothing_readable_leaves_store_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::open_in_memory().unwrap();
    let mut store = Store::<BillAsset>::load(&db);

    let report = upload(&mut store, &db, &[dir.path().join("gone.png")]).unwrap();
    assert!(report.added.is_empty());
    assert_eq!(report.skipped.len(), 1);
    assert!(store.is_empty());
    assert_eq!(db.get_item("bills").unwrap(), None);
}

// ── rename / delete / download ────────────────────────────────

#[test]
fn test_rename_keeps_content_and_position() {
    let db = Database::open_in_memory().unwrap();
    let mut store = Store::<BillAsset>::load(&db);
    store.append(&db, asset(1, "a.png", "image/png", PNG_BYTES)).unwrap();
    store.append(&db, asset(2, "b.pdf", "application/pdf", b"%PDF")).unwrap();

    rename(&mut store, &db, 2, "  March rent.pdf ").unwrap();
    assert_eq!(store.items()[1].name, "March rent.pdf");
    assert_eq!(store.items()[1].id, 2);
    assert!(store.items()[1].is_pdf());
    assert_eq!(Store::<BillAsset>::load(&db).items()[1].name, "March rent.pdf");
}

#[test]
fn test_rename_rejects_blank_and_unknown() {
    let db = Database::open_in_memory().unwrap();
    let mut store = Store::<BillAsset>::load(&db);
    store.append(&db, asset(1, "a.png", "image/png", PNG_BYTES)).unwrap();

    assert!(rename(&mut store, &db, 1, "   ").is_err());
    assert!(rename(&mut store, &db, 9, "x").is_err());
    assert_eq!(store.items()[0].name, "a.png");
}

#[test]
fn test_delete_by_id() {
    let db = Database::open_in_memory().unwrap();
    let mut store = Store::<BillAsset>::load(&db);
    store.append(&db, asset(1, "a.png", "image/png", PNG_BYTES)).unwrap();
    store.append(&db, asset(2, "b.png", "image/png", PNG_BYTES)).unwrap();

    let removed = delete(&mut store, &db, 1).unwrap();
    assert_eq!(removed.name, "a.png");
    assert_eq!(store.len(), 1);
    assert_eq!(store.items()[0].id, 2);
    assert!(delete(&mut store, &db, 1).is_err());
}

#[test]
fn test_download_writes_decoded_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let bill = asset(7, "receipt.png", "image/png", PNG_BYTES);
    let path = download(&bill, dir.path()).unwrap();
    assert_eq!(path, dir.path().join("receipt.png"));
    assert_eq!(std::fs::read(path).unwrap(), PNG_BYTES);
}

#[test]
fn test_download_name_sanitizes() {
    let bill = asset(7, "../../etc/passwd.pdf", "application/pdf", b"%PDF");
    assert_eq!(download_name(&bill), "_.._etc_passwd.pdf");

    let unnamed = asset(42, "  ", "application/pdf", b"%PDF");
    assert_eq!(download_name(&unnamed), "bill-42.pdf");

    let no_ext = asset(3, "electricity", "application/pdf", b"%PDF");
    assert_eq!(download_name(&no_ext), "electricity.pdf");
}

// ── photo ─────────────────────────────────────────────────────

#[test]
fn test_photo_data_uri_accepts_images_only() {
    let dir = tempfile::tempdir().unwrap();
    let png = write_file(dir.path(), "photo.png", PNG_BYTES);
    let pdf = write_file(dir.path(), "bill.pdf", b"%PDF");

    let uri = photo_data_uri(&png).unwrap();
    assert!(uri.starts_with("data:image/png;base64,"));
    assert!(photo_data_uri(&pdf).is_err());
    assert!(photo_data_uri(&dir.path().join("none.png")).is_err());
}

// ── lightbox ──────────────────────────────────────────────────

#[test]
fn test_lightbox_wraps_both_ways() {
    let mut lb = Lightbox::default();
    lb.open(2, 3);
    lb.next(3);
    assert_eq!(lb.position(), Some(0));
    lb.prev(3);
    assert_eq!(lb.position(), Some(2));
    lb.prev(3);
    assert_eq!(lb.position(), Some(1));
}

#[test]
fn test_lightbox_single_item_stays_put() {
    let mut lb = Lightbox::default();
    lb.open(0, 1);
    lb.next(1);
    assert_eq!(lb.position(), Some(0));
    lb.prev(1);
    assert_eq!(lb.position(), Some(0));
}

#[test]
fn test_lightbox_closed_ignores_navigation() {
    let mut lb = Lightbox::default();
    lb.next(3);
    assert!(!lb.is_open());
    lb.open(5, 3);
    assert!(!lb.is_open());
    lb.open(1, 3);
    lb.close();
    assert_eq!(lb.position(), None);
}

#[test]
fn test_lightbox_clamp_after_delete() {
    let mut lb = Lightbox::default();
    lb.open(2, 3);
    lb.clamp(2);
    assert_eq!(lb.position(), Some(1));
    lb.clamp(0);
    assert!(!lb.is_open());
}
