//! Clip library loading tests
//!
//! Builds real library roots on disk with tempfile and exercises the load
//! path end to end: frame decoding, opening extraction, link-table
//! validation and the fail-fast behavior on malformed assets.

mod helpers;

use std::fs;
use std::path::Path;

use helpers::frames;
use tempfile::TempDir;
use wvgs_dj::error::Error;
use wvgs_dj::library::{codec, ClipKind, ClipLibrary, LinkTable, OPENING_CLIP};

/// Write one clip file in the length-prefixed format
fn write_clip(path: &Path, clip_frames: &[Vec<u8>]) {
    let mut buf = Vec::new();
    codec::write_frames(&mut buf, clip_frames).unwrap();
    fs::write(path, buf).unwrap();
}

/// A complete library root: two songs, one story, opening plus one
/// transition, and a link table file
fn write_library_root() -> TempDir {
    let root = TempDir::new().unwrap();
    for dir in ["Songs", "Stories", "Transitions"] {
        fs::create_dir(root.path().join(dir)).unwrap();
    }

    write_clip(&root.path().join("Songs/BlueMoon.dca"), &frames(1, 3));
    write_clip(&root.path().join("Songs/JingleJangle.dca"), &frames(2, 2));
    write_clip(&root.path().join("Stories/NewVegas.dca"), &frames(3, 4));
    write_clip(&root.path().join("Transitions/Opening.dca"), &frames(0, 2));
    write_clip(
        &root.path().join("Transitions/BlueMoonTransition.dca"),
        &frames(4, 1),
    );

    fs::write(
        root.path().join("links.toml"),
        "[links]\n\"BlueMoonTransition.dca\" = \"BlueMoon.dca\"\n",
    )
    .unwrap();

    root
}

#[test]
fn test_load_complete_library() {
    let root = write_library_root();
    let links = LinkTable::load(&root.path().join("links.toml")).unwrap();
    let library = ClipLibrary::load(root.path(), links).unwrap();

    assert_eq!(
        library.list(ClipKind::Song),
        vec!["BlueMoon.dca", "JingleJangle.dca"]
    );
    assert_eq!(library.list(ClipKind::Story), vec!["NewVegas.dca"]);

    // The opening is pulled out of the transition pool
    assert_eq!(
        library.list(ClipKind::Transition),
        vec!["BlueMoonTransition.dca"]
    );
    assert_eq!(library.opening().name(), OPENING_CLIP);
    assert_eq!(library.opening().frames(), frames(0, 2).as_slice());

    // Decoded frames survive the disk round trip
    let song = library.get(ClipKind::Song, "BlueMoon.dca").unwrap();
    assert_eq!(song.frames(), frames(1, 3).as_slice());

    assert_eq!(
        library.links().follow_up("BlueMoonTransition.dca"),
        Some("BlueMoon.dca")
    );
}

#[test]
fn test_truncated_clip_aborts_load() {
    let root = write_library_root();
    // Prefix declares 5 payload bytes, only 1 follows
    fs::write(root.path().join("Songs/Broken.dca"), [5u8, 0, 1]).unwrap();

    let err = ClipLibrary::load(root.path(), LinkTable::default()).unwrap_err();
    match err {
        Error::ClipLoad { name, reason } => {
            assert_eq!(name, "Broken.dca");
            assert!(reason.contains("truncated"), "reason: {}", reason);
        }
        other => panic!("expected ClipLoad, got {:?}", other),
    }
}

#[test]
fn test_stray_prefix_byte_aborts_load() {
    let root = write_library_root();
    let mut bytes = Vec::new();
    codec::write_frames(&mut bytes, &frames(7, 2)).unwrap();
    bytes.push(0xaa); // lone byte where a length prefix should start
    fs::write(root.path().join("Stories/Broken.dca"), bytes).unwrap();

    let err = ClipLibrary::load(root.path(), LinkTable::default()).unwrap_err();
    assert!(matches!(err, Error::ClipLoad { name, .. } if name == "Broken.dca"));
}

#[test]
fn test_missing_opening_aborts_load() {
    let root = write_library_root();
    fs::remove_file(root.path().join("Transitions").join(OPENING_CLIP)).unwrap();

    let err = ClipLibrary::load(root.path(), LinkTable::default()).unwrap_err();
    assert!(matches!(err, Error::ClipLoad { name, .. } if name == OPENING_CLIP));
}

#[test]
fn test_missing_category_dir_aborts_load() {
    let root = write_library_root();
    fs::remove_dir_all(root.path().join("Stories")).unwrap();

    let err = ClipLibrary::load(root.path(), LinkTable::default()).unwrap_err();
    assert!(matches!(err, Error::ClipLoad { .. }));
}

#[test]
fn test_non_clip_files_ignored() {
    let root = write_library_root();
    fs::write(root.path().join("Songs/README.txt"), "not audio").unwrap();

    let library = ClipLibrary::load(root.path(), LinkTable::default()).unwrap();
    assert_eq!(
        library.list(ClipKind::Song),
        vec!["BlueMoon.dca", "JingleJangle.dca"]
    );
}

#[test]
fn test_link_to_absent_clip_aborts_load() {
    let root = write_library_root();
    let links = LinkTable::from_toml_str("[links]\n\"Ghost.dca\" = \"BlueMoon.dca\"\n").unwrap();

    let err = ClipLibrary::load(root.path(), links).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}

#[test]
fn test_empty_category_aborts_load() {
    let root = write_library_root();
    for entry in fs::read_dir(root.path().join("Songs")).unwrap() {
        fs::remove_file(entry.unwrap().path()).unwrap();
    }

    let err = ClipLibrary::load(root.path(), LinkTable::default()).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}
