use classdeck::utils::files::{file_size, format_file_size, mime_for, read_file_part, title_from_path, unique_download_path};
use std::path::Path;

#[test]
fn test_format_file_size() {
    assert_eq!(format_file_size(0), "0 Bytes");
    assert_eq!(format_file_size(512), "512 Bytes");
    assert_eq!(format_file_size(1536), "1.5 KB");
    assert_eq!(format_file_size(10 * 1024 * 1024), "10 MB");
}

#[test]
fn test_title_from_path() {
    assert_eq!(title_from_path(Path::new("/tmp/Week 1.final.pdf")), "Week 1");
    assert_eq!(title_from_path(Path::new("notes")), "notes");
    assert_eq!(title_from_path(Path::new(".hidden")), ".hidden");
}

#[test]
fn test_mime_types() {
    assert_eq!(mime_for(Path::new("a.PDF")), "application/pdf");
    assert_eq!(mime_for(Path::new("a.xls")), "application/vnd.ms-excel");
    assert_eq!(mime_for(Path::new("a.bin")), "application/octet-stream");
}

#[test]
fn test_unique_download_path() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(unique_download_path(dir.path(), "a.pdf"), dir.path().join("a.pdf"));

    std::fs::write(dir.path().join("a.pdf"), b"x").unwrap();
    std::fs::write(dir.path().join("a (1).pdf"), b"x").unwrap();
    assert_eq!(unique_download_path(dir.path(), "a.pdf"), dir.path().join("a (2).pdf"));
}

#[tokio::test]
async fn test_read_file_part() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cards.xlsx");
    std::fs::write(&path, b"PK\x03\x04").unwrap();

    assert_eq!(file_size(&path).await, Some(4));
    assert_eq!(file_size(dir.path()).await, None);

    let part = read_file_part(&path).await.unwrap();
    assert_eq!(part.field, "file");
    assert_eq!(part.file_name, "cards.xlsx");
    assert_eq!(part.bytes, b"PK\x03\x04".to_vec());
}
