use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use serde_json::Value;

fn marker(name: &str) -> Vec<u8> {
    name.encode_utf16().flat_map(u16::to_le_bytes).collect()
}

fn build_payload(fields: &[(&str, f32)]) -> Vec<u8> {
    let mut buf = b"HSG\x02\x00".to_vec();
    for (name, value) in fields {
        buf.extend_from_slice(&[0x09, 0x00]);
        buf.extend_from_slice(&marker(name));
        buf.extend_from_slice(&value.to_le_bytes());
    }
    buf.extend_from_slice(b"\x00end");
    buf
}

fn write_save(dir: &Path, name: &str, fields: &[(&str, f32)]) -> PathBuf {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(&build_payload(fields))
        .expect("gzip write");
    let path = dir.join(name);
    fs::write(&path, encoder.finish().expect("gzip finish")).expect("write fixture");
    path
}

fn standard_save(dir: &Path) -> PathBuf {
    write_save(
        dir,
        "slot.hsg",
        &[("Money", 1000.0), ("Energy", 0.5), ("NetWorth", 20000.0)],
    )
}

fn read_value(path: &Path, name: &str) -> Option<f32> {
    let bytes = fs::read(path).unwrap_or_else(|e| panic!("failed to read {:?}: {}", path, e));
    let mut raw = Vec::new();
    GzDecoder::new(bytes.as_slice())
        .read_to_end(&mut raw)
        .expect("output should be valid gzip");
    let needle = marker(name);
    let start = raw.windows(needle.len()).position(|w| w == needle)? + needle.len();
    let value: [u8; 4] = raw.get(start..start + 4)?.try_into().ok()?;
    Some(f32::from_le_bytes(value))
}

fn run_cli(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_ambitions-se"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run ambitions-se CLI")
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

#[test]
fn read_only_prints_current_values() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_save(dir.path(), "slot.hsg", &[("Money", 1000.0), ("Energy", 0.5)]);
    let before = fs::read(&path).expect("read fixture");

    let output = run_cli(&["--read-only", &path_arg(&path)]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("  Money: 1000.0\n"));
    assert!(stdout.contains("  Energy: 0.5\n"));
    assert!(stdout.contains("  NetWorth: (field not found)\n"));
    assert_eq!(fs::read(&path).expect("reread"), before);
    assert!(!dir.path().join("slot.hsg.bak").exists());
}

#[test]
fn read_only_json_reports_fields() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = standard_save(dir.path());

    let output = run_cli(&["--read-only", "--json", &path_arg(&path)]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let json: Value = serde_json::from_str(&stdout).expect("stdout should be valid JSON");
    assert_eq!(json["fields"]["Money"]["value"], 1000.0);
    assert_eq!(json["fields"]["NetWorth"]["value"], 20000.0);
}

#[test]
fn money_edit_overwrites_in_place_with_backup() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = standard_save(dir.path());
    let original = fs::read(&path).expect("read fixture");

    let output = run_cli(&["-m", "5000", &path_arg(&path)]);
    assert!(output.status.success(), "{output:?}");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("  Money: 1000.0 -> 5000.0"));
    assert!(stdout.contains("Backup: "));
    assert!(stdout.contains(&format!("Saved to {}", path.display())));

    let bak = dir.path().join("slot.hsg.bak");
    assert_eq!(fs::read(&bak).expect("backup should exist"), original);
    assert_eq!(read_value(&path, "Money"), Some(5000.0));
    assert_eq!(read_value(&path, "Energy"), Some(0.5));
    assert_eq!(read_value(&path, "NetWorth"), Some(20000.0));
}

#[test]
fn negative_values_and_no_backup() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = standard_save(dir.path());

    let output = run_cli(&[
        "--energy",
        "-1.5",
        "--networth",
        "-250",
        "--no-backup",
        &path_arg(&path),
    ]);
    assert!(output.status.success(), "{output:?}");

    assert_eq!(read_value(&path, "Energy"), Some(-1.5));
    assert_eq!(read_value(&path, "NetWorth"), Some(-250.0));
    assert_eq!(read_value(&path, "Money"), Some(1000.0));
    assert!(!dir.path().join("slot.hsg.bak").exists());
}

#[test]
fn output_flag_writes_elsewhere_without_backup() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = standard_save(dir.path());
    let out = dir.path().join("edited.hsg");
    let original = fs::read(&path).expect("read fixture");

    let output = run_cli(&["-n", "7.25", "-o", &path_arg(&out), &path_arg(&path)]);
    assert!(output.status.success(), "{output:?}");

    assert_eq!(fs::read(&path).expect("reread"), original);
    assert!(!dir.path().join("slot.hsg.bak").exists());
    assert_eq!(read_value(&out, "NetWorth"), Some(7.25));
}

#[test]
fn missing_field_is_reported_not_fatal() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_save(dir.path(), "slot.hsg", &[("Money", 3.0)]);

    let output = run_cli(&["-m", "4", "-e", "1", "--no-backup", &path_arg(&path)]);
    assert!(output.status.success(), "{output:?}");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("  Money: 3.0 -> 4.0"));
    assert!(stdout.contains("  Energy: (field not found)"));
    assert_eq!(read_value(&path, "Money"), Some(4.0));
}

#[test]
fn no_values_reports_nothing_changed_and_writes_nothing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = standard_save(dir.path());
    let original = fs::read(&path).expect("read fixture");

    let output = run_cli(&[&path_arg(&path)]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("No changes requested"));
    assert_eq!(fs::read(&path).expect("reread"), original);
    assert!(!dir.path().join("slot.hsg.bak").exists());
}

#[test]
fn missing_source_fails_without_side_effects() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("nope.hsg");

    let output = run_cli(&["-m", "1", &path_arg(&path)]);
    assert_eq!(output.status.code(), Some(1));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not found"));
    assert_eq!(fs::read_dir(dir.path()).expect("list dir").count(), 0);
}

#[test]
fn corrupt_source_fails_with_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("slot.hsg");
    fs::write(&path, b"plain bytes").expect("write fixture");

    let output = run_cli(&["-m", "1", &path_arg(&path)]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Format"));
    assert!(!dir.path().join("slot.hsg.bak").exists());
}

#[test]
fn edit_json_output() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = standard_save(dir.path());

    let output = run_cli(&["--json", "-m", "42", &path_arg(&path)]);
    assert!(output.status.success(), "{output:?}");

    let stdout = String::from_utf8_lossy(&output.stdout);
    let json: Value = serde_json::from_str(&stdout).expect("stdout should be valid JSON");
    assert_eq!(json["written"], true);
    assert_eq!(json["changes"]["Money"]["old"], 1000.0);
    assert_eq!(json["changes"]["Money"]["new"], 42.0);
    assert!(json["backup"].is_string());
}

#[test]
fn read_only_conflicts_with_edit_values() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = standard_save(dir.path());

    let output = run_cli(&["--read-only", "-m", "1", &path_arg(&path)]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn list_scans_saves_dir() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::create_dir(dir.path().join("career")).expect("create dir");
    write_save(&dir.path().join("career"), "b.hsg", &[("Money", 1.0)]);
    write_save(dir.path(), "a.hsg", &[("Money", 1.0)]);
    fs::write(dir.path().join("readme.txt"), b"x").expect("write");

    let output = run_cli(&["--list", "--saves-dir", &path_arg(dir.path())]);
    assert!(output.status.success(), "{output:?}");

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().skip(1).collect();
    assert_eq!(lines, vec!["  a.hsg", "  career/b.hsg"]);
}

#[test]
fn list_reads_saves_dir_from_env() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_save(dir.path(), "only.hsg", &[("Money", 1.0)]);

    let output = Command::new(env!("CARGO_BIN_EXE_ambitions-se"))
        .args(["--list", "--json"])
        .env("AMBITIONS_SAVES_DIR", dir.path())
        .output()
        .expect("failed to run ambitions-se CLI");
    assert!(output.status.success(), "{output:?}");

    let json: Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be valid JSON");
    assert_eq!(json["saves"][0]["name"], "only.hsg");
}

#[test]
fn path_is_required_without_list() {
    let output = run_cli(&["-m", "1"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn list_rejects_edit_flags_and_save_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = standard_save(dir.path());
    let saves = path_arg(dir.path());
    let save = path_arg(&path);

    for args in [
        vec!["--list", "-m", "1", "--saves-dir", saves.as_str()],
        vec!["--list", "--no-backup", "--saves-dir", saves.as_str()],
        vec!["--list", "--read-only", "--saves-dir", saves.as_str()],
        vec!["--list", "--saves-dir", saves.as_str(), save.as_str()],
    ] {
        let output = run_cli(&args);
        assert_eq!(output.status.code(), Some(2), "{args:?}");
    }
    assert_eq!(read_value(&path, "Money"), Some(1000.0));
}

#[test]
fn saves_dir_requires_list() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = standard_save(dir.path());

    let output = run_cli(&["--saves-dir", &path_arg(dir.path()), &path_arg(&path)]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn saves_dir_env_does_not_affect_edits() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = standard_save(dir.path());

    let output = Command::new(env!("CARGO_BIN_EXE_ambitions-se"))
        .args(["-m", "5", &path_arg(&path)])
        .env("AMBITIONS_SAVES_DIR", dir.path())
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run ambitions-se CLI");
    assert!(output.status.success(), "{output:?}");
    assert_eq!(read_value(&path, "Money"), Some(5.0));
}
