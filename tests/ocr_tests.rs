//! Integration tests for engine probing and OCR invocation, driven by
//! shell-script engine stubs so no real Tesseract install is needed.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Instant;

use image::{DynamicImage, GrayImage};
use tempfile::TempDir;

use ocr_studio::engine::{engine_version, installed_languages, Engine, EngineVersion};
use ocr_studio::engine_config::{build_config, EngineParams};
use ocr_studio::errors::OcrError;
use ocr_studio::input::check_payload_size;
use ocr_studio::invoker::{recognize, recognize_with_binary};

// Process-spawning tests share the global temp dir for leak checks, so they
// run one at a time.
static PROCESS_TESTS: Mutex<()> = Mutex::new(());

/// Write an executable stub script into `dir` and return its path.
fn write_stub(dir: &TempDir, name: &str, body: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, body).expect("write stub script");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("chmod stub script");
    path
}

fn stub_engine(binary: PathBuf) -> Engine {
    Engine {
        binary,
        version: EngineVersion {
            major: 5,
            minor: 3,
            patch: 4,
        },
        installed_languages: vec!["eng".to_string(), "fra".to_string()],
    }
}

fn test_image() -> DynamicImage {
    DynamicImage::ImageLuma8(GrayImage::from_pixel(40, 16, image::Luma([255])))
}

fn leftover_temp_images() -> Vec<PathBuf> {
    let mut leftovers = Vec::new();
    if let Ok(entries) = fs::read_dir(std::env::temp_dir()) {
        for entry in entries.flatten() {
            // Only the per-invocation PNGs count; other test binaries may
            // hold live work directories under the same prefix.
            if entry.path().is_file()
                && entry
                    .file_name()
                    .to_string_lossy()
                    .starts_with("ocr-studio-")
            {
                leftovers.push(entry.path());
            }
        }
    }
    leftovers
}

#[tokio::test]
async fn recognition_returns_engine_output_verbatim() {
    let _guard = PROCESS_TESTS.lock().unwrap();
    let dir = TempDir::new().expect("temp dir");
    let binary = write_stub(&dir, "tesseract", "#!/bin/sh\necho \"HELLO 123\"\n");

    let engine = stub_engine(binary);
    let text = recognize(
        &engine,
        &test_image(),
        "eng",
        &EngineParams::default(),
        10,
    )
    .await
    .expect("recognition succeeds");

    // Trailing newline is preserved; results are not normalized.
    assert_eq!(text, "HELLO 123\n");
    assert!(leftover_temp_images().is_empty(), "temp image leaked");
}

#[tokio::test]
async fn recognition_passes_config_flags_to_the_engine() {
    let _guard = PROCESS_TESTS.lock().unwrap();
    let dir = TempDir::new().expect("temp dir");
    // Echo the arguments after the image path so the test can see them.
    let binary = write_stub(&dir, "tesseract", "#!/bin/sh\nshift\necho \"$@\"\n");

    let params = EngineParams::from_indices(1, 6).expect("valid indices");
    let engine = stub_engine(binary);
    let text = recognize(&engine, &test_image(), "fra", &params, 10)
        .await
        .expect("recognition succeeds");

    assert_eq!(text, "stdout -l fra --oem 1 --psm 6\n");
}

#[tokio::test]
async fn timed_out_run_is_killed_and_cleaned_up() {
    let _guard = PROCESS_TESTS.lock().unwrap();
    let dir = TempDir::new().expect("temp dir");
    let binary = write_stub(&dir, "tesseract", "#!/bin/sh\nsleep 30\n");

    let started = Instant::now();
    let err = recognize_with_binary(&binary, &test_image(), "eng", &EngineParams::default(), 1)
        .await
        .expect_err("run must time out");

    assert!(matches!(err, OcrError::OcrTimeout(_)), "got {:?}", err);
    assert!(
        started.elapsed().as_secs() < 3,
        "timeout took {:?}, not bounded by the configured limit",
        started.elapsed()
    );
    assert!(leftover_temp_images().is_empty(), "temp image leaked");
}

#[tokio::test]
async fn uninstalled_language_is_rejected_without_spawning() {
    let _guard = PROCESS_TESTS.lock().unwrap();
    let dir = TempDir::new().expect("temp dir");
    let marker = dir.path().join("invoked");
    let binary = write_stub(
        &dir,
        "tesseract",
        &format!("#!/bin/sh\ntouch {}\n", marker.display()),
    );

    let engine = stub_engine(binary);
    let err = recognize(
        &engine,
        &test_image(),
        "jpn",
        &EngineParams::default(),
        10,
    )
    .await
    .expect_err("uninstalled language must fail");

    assert!(matches!(err, OcrError::LanguageNotInstalled(_)));
    assert!(!marker.exists(), "engine was spawned despite language gate");
}

#[tokio::test]
async fn failed_engine_run_reports_stderr() {
    let _guard = PROCESS_TESTS.lock().unwrap();
    let dir = TempDir::new().expect("temp dir");
    let binary = write_stub(
        &dir,
        "tesseract",
        "#!/bin/sh\necho \"Error: bad image\" >&2\nexit 1\n",
    );

    let err = recognize_with_binary(&binary, &test_image(), "eng", &EngineParams::default(), 10)
        .await
        .expect_err("non-zero exit must fail");

    match err {
        OcrError::OcrEngineError(message) => {
            assert!(message.contains("Error: bad image"), "got {:?}", message)
        }
        other => panic!("expected OcrEngineError, got {:?}", other),
    }
    assert!(leftover_temp_images().is_empty(), "temp image leaked");
}

#[tokio::test]
async fn version_probe_parses_stub_output() {
    let _guard = PROCESS_TESTS.lock().unwrap();
    let dir = TempDir::new().expect("temp dir");
    let binary = write_stub(
        &dir,
        "tesseract",
        "#!/bin/sh\necho \"tesseract 5.3.4\"\necho \" leptonica-1.84.1\"\n",
    );

    let version = engine_version(&binary).await.expect("version probe");
    assert_eq!(
        version,
        EngineVersion {
            major: 5,
            minor: 3,
            patch: 4
        }
    );
}

#[tokio::test]
async fn language_probe_parses_stub_output() {
    let _guard = PROCESS_TESTS.lock().unwrap();
    let dir = TempDir::new().expect("temp dir");
    let binary = write_stub(
        &dir,
        "tesseract",
        "#!/bin/sh\necho \"List of available languages (3):\"\necho eng\necho fra\necho osd\n",
    );

    let languages = installed_languages(&binary).await.expect("language probe");
    assert_eq!(languages, vec!["eng", "fra", "osd"]);
}

#[tokio::test]
async fn missing_binary_is_engine_not_found() {
    let err = recognize_with_binary(
        std::path::Path::new("/nonexistent/ocr-studio-engine"),
        &test_image(),
        "eng",
        &EngineParams::default(),
        5,
    )
    .await
    .expect_err("missing binary must fail");

    assert!(matches!(err, OcrError::EngineNotFound(_)), "got {:?}", err);
}

#[test]
fn config_builder_covers_valid_grid_and_rejects_out_of_range() {
    assert_eq!(build_config(3, 3).expect("defaults"), "--oem 3 --psm 3");
    assert_eq!(build_config(0, 13).expect("extremes"), "--oem 0 --psm 13");

    assert!(matches!(
        build_config(4, 3).expect_err("oem out of range"),
        OcrError::InvalidMode(_)
    ));
    assert!(matches!(
        build_config(3, 14).expect_err("psm out of range"),
        OcrError::InvalidMode(_)
    ));
}

#[test]
fn payload_over_the_limit_is_rejected_before_decoding() {
    let limit = 200 * 1024 * 1024;
    assert!(check_payload_size(limit, limit).is_ok());

    let err = check_payload_size(limit + 1, limit).expect_err("oversized payload");
    assert!(matches!(err, OcrError::PayloadTooLarge(_)));
}
