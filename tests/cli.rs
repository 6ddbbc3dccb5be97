//! Integration tests for the `relay` binary.

mod common;

use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn run_relay(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(env!("CARGO_BIN_EXE_relay"))
        .arg("--config")
        .arg(config_path)
        .args(args)
        .env_remove("GEMINI_API_KEY")
        .env_remove("VITE_GEMINI_API_KEY")
        .output()
        .expect("Failed to run relay binary");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

#[test]
fn test_prompt_without_document() {
    let tmp = TempDir::new().unwrap();
    let (stdout, stderr, success) = run_relay(
        &tmp.path().join("missing.toml"),
        &["prompt", "software engineer"],
    );
    assert!(success, "prompt failed: stderr={}", stderr);
    assert!(!stdout.contains("Context from program"));
    assert!(stdout.contains("career as a software engineer."));
}

#[test]
fn test_blank_query_rejected() {
    let tmp = TempDir::new().unwrap();
    let (_, stderr, success) = run_relay(&tmp.path().join("missing.toml"), &["prompt", "   "]);
    assert!(!success);
    assert!(stderr.contains("Missing query"));
}

#[test]
fn test_ask_without_key_fails_cleanly() {
    let tmp = TempDir::new().unwrap();
    let (_, stderr, success) = run_relay(&tmp.path().join("missing.toml"), &["ask", "nurse"]);
    assert!(!success);
    assert!(stderr.contains("Server missing Gemini API key"));
}

#[test]
fn test_invalid_config_rejected() {
    let tmp = TempDir::new().unwrap();
    let config_path = tmp.path().join("relay.toml");
    fs::write(&config_path, "[retrieval\nmax_chars = ").unwrap();

    let (_, stderr, success) = run_relay(&config_path, &["prompt", "nurse"]);
    assert!(!success);
    assert!(stderr.contains("Failed to parse config file"));
}

#[test]
fn test_missing_document_file() {
    let tmp = TempDir::new().unwrap();
    let (_, stderr, success) = run_relay(
        &tmp.path().join("missing.toml"),
        &[
            "context",
            "nurse",
            "--document",
            tmp.path().join("nope.pdf").to_str().unwrap(),
        ],
    );
    assert!(!success);
    assert!(stderr.contains("Failed to read document"));
}

#[cfg(feature = "pdf")]
#[test]
fn test_context_from_pdf() {
    let tmp = TempDir::new().unwrap();
    let pdf_path = tmp.path().join("program.pdf");
    fs::write(
        &pdf_path,
        common::minimal_pdf_with_text("radiology technician pathway"),
    )
    .unwrap();

    let config_path = tmp.path().join("relay.toml");
    fs::write(&config_path, "[retrieval]\nmax_chars = 200\n").unwrap();

    let (stdout, stderr, success) = run_relay(
        &config_path,
        &[
            "context",
            "radiology",
            "--document",
            pdf_path.to_str().unwrap(),
        ],
    );
    assert!(success, "context failed: stderr={}", stderr);
    assert!(stdout.contains("radiology technician pathway"));
}

#[cfg(feature = "pdf")]
#[test]
fn test_prompt_with_pdf_includes_header() {
    let tmp = TempDir::new().unwrap();
    let pdf_path = tmp.path().join("program.pdf");
    fs::write(&pdf_path, common::minimal_pdf_with_text("dental hygiene courses")).unwrap();

    let (stdout, stderr, success) = run_relay(
        &tmp.path().join("missing.toml"),
        &[
            "prompt",
            "dental hygienist",
            "--document",
            pdf_path.to_str().unwrap(),
        ],
    );
    assert!(success, "prompt failed: stderr={}", stderr);
    assert!(stdout.starts_with("Context from program (relevant excerpts):"));
    assert!(stdout.contains("dental hygiene courses"));
}
