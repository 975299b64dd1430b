//! Integration tests for the book binder library

use book_binder::pdf::{count_pages, extract_metadata, OutlineEntryInfo};
use book_binder::{bind_book, BindOptions, Error, OutlineStatus};
use image::{Rgb, RgbImage, Rgba, RgbaImage};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Write a small solid-colour WebP page
fn write_page(dir: &Path, book_id: &str, page: u32) -> PathBuf {
    let path = dir.join(format!("{}_page{}.webp", book_id, page));
    let shade = (page * 20 % 256) as u8;
    RgbImage::from_pixel(8, 12, Rgb([shade, 255 - shade, 64]))
        .save(&path)
        .expect("Failed to write test page");
    path
}

/// Write pages `first..=last` and return the path of the first one
fn write_book(dir: &Path, book_id: &str, first: u32, last: u32) -> PathBuf {
    for page in first..=last {
        write_page(dir, book_id, page);
    }
    dir.join(format!("{}_page{}.webp", book_id, first))
}

fn entry(level: usize, title: &str, page_index: usize) -> OutlineEntryInfo {
    OutlineEntryInfo {
        level,
        title: title.to_string(),
        page_index: Some(page_index),
    }
}

#[test]
fn test_bind_novel_with_bookmark() {
    let temp = TempDir::new().expect("Failed to create temp directory");
    let seed = write_book(temp.path(), "novel", 3, 10);
    fs::write(
        temp.path().join("novel_toc.json"),
        r#"[{"name": "Ch1", "page": "5", "children": []}]"#,
    )
    .unwrap();

    let report = bind_book(&BindOptions::new(&seed)).expect("Failed to bind");

    assert_eq!(report.book_id, "novel");
    assert_eq!(report.start_page, 3);
    assert_eq!(report.output_path, temp.path().join("novel.pdf"));
    assert_eq!(report.page_count, 8);
    assert_eq!(report.outline, OutlineStatus::Attached(1));
    assert!(report.skipped.is_empty());

    let metadata = extract_metadata(&report.output_path).expect("Failed to read output");
    assert_eq!(metadata.page_count, 8);
    assert_eq!(metadata.title.as_deref(), Some("novel"));
    assert_eq!(metadata.outline, vec![entry(0, "Ch1", 2)]);
}

#[test]
fn test_bind_zero_padded_novel() {
    let temp = TempDir::new().expect("Failed to create temp directory");
    for page in 3..=10 {
        let path = temp.path().join(format!("novel_page{:03}.webp", page));
        RgbImage::from_pixel(8, 12, Rgb([page as u8 * 20, 0, 64]))
            .save(&path)
            .expect("Failed to write test page");
    }
    fs::write(
        temp.path().join("novel_toc.json"),
        r#"[{"name": "Ch1", "page": "5"}]"#,
    )
    .unwrap();

    let seed = temp.path().join("novel_page003.webp");
    let report = bind_book(&BindOptions::new(&seed)).expect("Failed to bind");

    assert_eq!(report.book_id, "novel");
    assert_eq!(report.start_page, 3);
    assert_eq!(report.output_path, temp.path().join("novel.pdf"));
    assert_eq!(report.page_count, 8);

    let metadata = extract_metadata(&report.output_path).expect("Failed to read output");
    assert_eq!(metadata.page_count, 8);
    assert_eq!(metadata.outline, vec![entry(0, "Ch1", 2)]);
}

#[test]
fn test_bind_without_sidecar() {
    let temp = TempDir::new().expect("Failed to create temp directory");
    let seed = write_book(temp.path(), "plain", 1, 4);

    let report = bind_book(&BindOptions::new(&seed)).expect("Failed to bind");

    assert_eq!(
        report.outline,
        OutlineStatus::Missing(temp.path().join("plain_toc.json"))
    );
    assert_eq!(count_pages(&report.output_path).unwrap(), 4);
    assert!(extract_metadata(&report.output_path).unwrap().outline.is_empty());
}

#[test]
fn test_nested_outline_and_one_level_up() {
    let temp = TempDir::new().expect("Failed to create temp directory");
    let seed = write_book(temp.path(), "atlas", 3, 8);
    fs::write(
        temp.path().join("atlas_toc.json"),
        r#"[
            {"name": "Front matter", "page": "2", "children": [
                {"name": "Preface", "page": "3"}
            ]},
            {"name": "Part I", "page": "4", "children": [
                {"name": "Maps", "page": "n/a", "children": [
                    {"name": "North", "page": "5"},
                    {"name": "South", "page": "6"}
                ]},
                {"name": "Missing", "page": "42"}
            ]},
            {"name": "第二部", "page": "8"}
        ]"#,
    )
    .unwrap();

    let report = bind_book(&BindOptions::new(&seed)).expect("Failed to bind");
    assert_eq!(report.outline, OutlineStatus::Attached(5));

    let metadata = extract_metadata(&report.output_path).unwrap();
    assert_eq!(
        metadata.outline,
        vec![
            entry(0, "Preface", 0),
            entry(0, "Part I", 1),
            entry(1, "North", 2),
            entry(1, "South", 3),
            entry(0, "第二部", 5),
        ]
    );
}

#[test]
fn test_seed_in_middle_sets_offset() {
    let temp = TempDir::new().expect("Failed to create temp directory");
    write_book(temp.path(), "mid", 1, 5);
    fs::write(
        temp.path().join("mid_toc.json"),
        r#"[{"name": "Start", "page": "3"}, {"name": "Before", "page": "1"}]"#,
    )
    .unwrap();

    // All five pages are bound, but logical numbers are measured from page 3
    let report = bind_book(&BindOptions::new(temp.path().join("mid_page3.webp"))).unwrap();
    assert_eq!(report.page_count, 5);

    let metadata = extract_metadata(&report.output_path).unwrap();
    assert_eq!(metadata.outline, vec![entry(0, "Start", 0)]);
}

#[test]
fn test_corrupt_page_is_skipped() {
    let temp = TempDir::new().expect("Failed to create temp directory");
    let seed = write_book(temp.path(), "torn", 1, 5);
    let corrupt = temp.path().join("torn_page3.webp");
    fs::write(&corrupt, b"not an image").unwrap();

    let report = bind_book(&BindOptions::new(&seed)).expect("Failed to bind");

    assert_eq!(report.page_count, 4);
    assert_eq!(report.skipped, vec![corrupt]);
    assert_eq!(count_pages(&report.output_path).unwrap(), 4);
}

#[test]
fn test_all_pages_corrupt() {
    let temp = TempDir::new().expect("Failed to create temp directory");
    for page in 1..=3 {
        fs::write(temp.path().join(format!("junk_page{}.webp", page)), b"garbage").unwrap();
    }

    let result = bind_book(&BindOptions::new(temp.path().join("junk_page1.webp")));
    assert!(matches!(result, Err(Error::NoUsableImages(3))));
    assert!(!temp.path().join("junk.pdf").exists());
}

#[test]
fn test_invalid_sidecar_falls_back() {
    let temp = TempDir::new().expect("Failed to create temp directory");
    let seed = write_book(temp.path(), "broken", 1, 2);
    fs::write(temp.path().join("broken_toc.json"), r#"{"name": "not an array"}"#).unwrap();

    let report = bind_book(&BindOptions::new(&seed)).expect("Failed to bind");

    assert!(matches!(report.outline, OutlineStatus::Invalid(_)));
    let metadata = extract_metadata(&report.output_path).unwrap();
    assert_eq!(metadata.page_count, 2);
    assert!(metadata.outline.is_empty());
}

#[test]
fn test_outline_disabled_and_custom_paths() {
    let temp = TempDir::new().expect("Failed to create temp directory");
    let seed = write_book(temp.path(), "opts", 1, 3);
    fs::write(temp.path().join("opts_toc.json"), r#"[{"name": "A", "page": "1"}]"#).unwrap();
    let other_toc = temp.path().join("elsewhere.json");
    fs::write(&other_toc, r#"[{"name": "B", "page": "2"}]"#).unwrap();

    let mut options = BindOptions::new(&seed);
    options.outline = false;
    options.output_path = Some(temp.path().join("custom.pdf"));
    let report = bind_book(&options).unwrap();
    assert_eq!(report.outline, OutlineStatus::Disabled);
    assert!(temp.path().join("custom.pdf").exists());
    assert!(!temp.path().join("opts.pdf").exists());

    let mut options = BindOptions::new(&seed);
    options.toc_path = Some(other_toc);
    let report = bind_book(&options).unwrap();
    let metadata = extract_metadata(&report.output_path).unwrap();
    assert_eq!(metadata.outline, vec![entry(0, "B", 1)]);
}

#[test]
fn test_pages_with_alpha_bind() {
    let temp = TempDir::new().expect("Failed to create temp directory");
    let seed = temp.path().join("clear_page1.webp");
    RgbaImage::from_pixel(6, 6, Rgba([10, 20, 30, 100]))
        .save(&seed)
        .unwrap();
    write_page(temp.path(), "clear", 2);

    let report = bind_book(&BindOptions::new(&seed)).expect("Failed to bind");
    assert_eq!(count_pages(&report.output_path).unwrap(), 2);
}

#[test]
fn test_other_books_in_directory_are_ignored() {
    let temp = TempDir::new().expect("Failed to create temp directory");
    let seed = write_book(temp.path(), "vol", 1, 2);
    write_book(temp.path(), "vol_page_extra", 1, 3);
    write_book(temp.path(), "volume", 1, 3);

    let report = bind_book(&BindOptions::new(&seed)).unwrap();
    assert_eq!(report.page_count, 2);
}

#[test]
fn test_seed_without_pages() {
    let temp = TempDir::new().expect("Failed to create temp directory");

    let result = bind_book(&BindOptions::new(temp.path().join("ghost_page1.webp")));
    assert!(matches!(result, Err(Error::NoFilesFound { .. })));
}

#[test]
fn test_rebind_overwrites_output() {
    let temp = TempDir::new().expect("Failed to create temp directory");
    let seed = write_book(temp.path(), "again", 1, 2);

    bind_book(&BindOptions::new(&seed)).unwrap();
    write_page(temp.path(), "again", 3);
    let report = bind_book(&BindOptions::new(&seed)).unwrap();

    assert_eq!(count_pages(&report.output_path).unwrap(), 3);
}
