//! Integration tests for block-label

use block_label::settings::{find_settings, SETTINGS_FILE};
use block_label::{build_prefix, Config, GenerateError, LabelGenerator, LabelStore};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::tempdir;

/// Write a label store file with the given labels
fn write_store(path: &Path, labels: &[&str]) {
	let json = serde_json::to_string_pretty(labels).unwrap();
	fs::write(path, json).unwrap();
}

fn cli() -> Command {
	Command::new(env!("CARGO_BIN_EXE_block-label"))
}

#[test]
fn test_generate_against_store() {
	let temp = tempdir().unwrap();
	let path = temp.path().join("labels.json");
	write_store(&path, &["SD: Team", "SD: Team 1", "EN: Spring"]);

	let store = LabelStore::load(&path).unwrap();
	let generator = LabelGenerator::default();

	let label = generator
		.generate("Staff Directory", "Team", |l| store.exists(l))
		.unwrap();
	assert_eq!(label, "SD: Team 2");

	let label = generator
		.generate("Events & News!", "Summer", |l| store.exists(l))
		.unwrap();
	assert_eq!(label, "EN: Summer");
}

#[test]
fn test_generated_labels_stay_unique_when_recorded() {
	let mut store = LabelStore::new();
	let generator = LabelGenerator::default();

	let mut produced = Vec::new();
	for _ in 0..4 {
		let label = generator
			.generate("Staff Directory", "Team", |l| store.exists(l))
			.unwrap();
		assert!(store.insert(label.clone()));
		produced.push(label);
	}

	assert_eq!(
		produced,
		vec!["SD: Team", "SD: Team 1", "SD: Team 2", "SD: Team 3"]
	);
}

#[test]
fn test_fixed_point_for_free_labels() {
	let store: LabelStore = ["SD: Team"].into_iter().collect();
	let generator = LabelGenerator::default();

	for title in ["Team 1", "Leads", "Team 3"] {
		let expected = format!("{}: {}", build_prefix("Staff Directory"), title);
		let label = generator
			.generate("Staff Directory", title, |l| store.exists(l))
			.unwrap();
		assert_eq!(label, expected);
	}
}

#[test]
fn test_store_failure_is_not_treated_as_free() {
	let generator = LabelGenerator::default();
	let err = generator
		.generate("Staff Directory", "Team", |_| {
			Err(std::io::Error::new(std::io::ErrorKind::NotConnected, "database offline").into())
		})
		.unwrap_err();

	assert!(matches!(err, GenerateError::Oracle { .. }));
	let source = std::error::Error::source(&err).unwrap();
	assert_eq!(source.to_string(), "database offline");
}

#[test]
fn test_settings_drive_generator() {
	let temp = tempdir().unwrap();
	fs::write(
		temp.path().join(SETTINGS_FILE),
		r#"{ "generateCustomBlockTitle": false, "maxAttempts": 5 }"#,
	)
	.unwrap();

	let settings = find_settings(temp.path()).unwrap();
	let generator = LabelGenerator::new(Config {
		enabled: settings.generate_custom_block_title.unwrap_or(true),
		max_attempts: settings.max_attempts.unwrap_or(1000),
		..Config::default()
	});

	let result = generator
		.fill("", "Staff Directory", "Team", |_| Ok(false))
		.unwrap();
	assert_eq!(result, None);
}

#[test]
fn test_cli_prints_unique_label() {
	let temp = tempdir().unwrap();
	let path = temp.path().join("labels.json");
	write_store(&path, &["SD: Team"]);

	let output = cli()
		.current_dir(temp.path())
		.args(["Staff Directory", "Team", "--store"])
		.arg(&path)
		.output()
		.unwrap();

	assert!(output.status.success());
	assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "SD: Team 1");

	// Store untouched without --record
	let store = LabelStore::load(&path).unwrap();
	assert_eq!(store.len(), 1);
}

#[test]
fn test_cli_record_appends_to_store() {
	let temp = tempdir().unwrap();
	let path = temp.path().join("labels.json");
	write_store(&path, &["SD: Team"]);

	for _ in 0..2 {
		let status = cli()
			.current_dir(temp.path())
			.args(["Staff Directory", "Team", "--record", "--store"])
			.arg(&path)
			.status()
			.unwrap();
		assert!(status.success());
	}

	let store = LabelStore::load(&path).unwrap();
	let labels: Vec<_> = store.labels().collect();
	assert_eq!(labels, vec!["SD: Team", "SD: Team 1", "SD: Team 2"]);
}

#[test]
fn test_cli_dry_run_leaves_store_alone() {
	let temp = tempdir().unwrap();
	let path = temp.path().join("labels.json");
	write_store(&path, &["SD: Team"]);
	let before = fs::read_to_string(&path).unwrap();

	let status = cli()
		.current_dir(temp.path())
		.args(["Staff Directory", "Team", "--record", "--dry-run", "--store"])
		.arg(&path)
		.status()
		.unwrap();
	assert!(status.success());

	assert_eq!(fs::read_to_string(&path).unwrap(), before);
}

#[test]
fn test_cli_uses_store_from_settings() {
	let temp = tempdir().unwrap();
	write_store(&temp.path().join("labels.json"), &["EN: Spring"]);
	fs::write(
		temp.path().join(SETTINGS_FILE),
		r#"{ "generateCustomBlockTitle": true, "labelStore": "labels.json" }"#,
	)
	.unwrap();

	let output = cli()
		.current_dir(temp.path())
		.args(["Events & News!", "Spring"])
		.output()
		.unwrap();

	assert!(output.status.success());
	assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "EN: Spring 1");
}

#[test]
fn test_cli_respects_disabled_settings() {
	let temp = tempdir().unwrap();
	fs::write(
		temp.path().join(SETTINGS_FILE),
		r#"{ "generateCustomBlockTitle": false }"#,
	)
	.unwrap();

	let output = cli()
		.current_dir(temp.path())
		.args(["Staff Directory", "Team", "--current", "Kept"])
		.output()
		.unwrap();
	assert!(output.status.success());
	assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "Kept");

	let output = cli()
		.current_dir(temp.path())
		.args(["Staff Directory", "Team", "--force"])
		.output()
		.unwrap();
	assert!(output.status.success());
	assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "SD: Team");
}

#[test]
fn test_cli_fails_on_invalid_settings() {
	let temp = tempdir().unwrap();
	fs::write(
		temp.path().join(SETTINGS_FILE),
		r#"{ "maxAttempts": "lots" }"#,
	)
	.unwrap();

	let status = cli()
		.current_dir(temp.path())
		.args(["Staff Directory", "Team"])
		.status()
		.unwrap();
	assert!(!status.success());
}

#[test]
fn test_cli_verbose_keeps_stdout_to_the_label() {
	let temp = tempdir().unwrap();
	let path = temp.path().join("labels.json");
	write_store(&path, &["SD: Team"]);

	let output = cli()
		.current_dir(temp.path())
		.args(["Staff Directory", "Team", "-v", "--store"])
		.arg(&path)
		.output()
		.unwrap();

	assert!(output.status.success());
	assert_eq!(String::from_utf8_lossy(&output.stdout), "SD: Team 1\n");
	assert!(String::from_utf8_lossy(&output.stderr).contains("Block Label Generation"));
}

#[test]
fn test_cli_record_into_directory_store_fails_even_on_dry_run() {
	let temp = tempdir().unwrap();
	let dir = temp.path().join("exports");
	fs::create_dir_all(&dir).unwrap();
	write_store(&dir.join("a.json"), &["SD: Team"]);

	for extra in [&["--dry-run"][..], &[][..]] {
		let output = cli()
			.current_dir(temp.path())
			.args(["Staff Directory", "Team", "--record", "--store"])
			.arg(&dir)
			.args(extra)
			.output()
			.unwrap();
		assert!(!output.status.success());
		assert!(output.stdout.is_empty());
	}
}

#[test]
fn test_cli_record_with_kept_current_label_records_nothing() {
	let temp = tempdir().unwrap();
	let path = temp.path().join("labels.json");
	write_store(&path, &["SD: Team"]);

	// A hand-picked current label is kept as-is, so nothing is generated
	let output = cli()
		.current_dir(temp.path())
		.args(["Staff Directory", "Team", "--record", "--current", "SD: Team", "--store"])
		.arg(&path)
		.output()
		.unwrap();
	assert!(output.status.success());
	assert!(String::from_utf8_lossy(&output.stderr).contains("nothing recorded"));

	let store = LabelStore::load(&path).unwrap();
	assert_eq!(store.len(), 1);
}

#[test]
fn test_cli_disabled_record_warns_and_leaves_store_alone() {
	let temp = tempdir().unwrap();
	let path = temp.path().join("labels.json");
	write_store(&path, &["SD: Team"]);
	let before = fs::read_to_string(&path).unwrap();
	fs::write(
		temp.path().join(SETTINGS_FILE),
		r#"{ "generateCustomBlockTitle": false }"#,
	)
	.unwrap();

	let output = cli()
		.current_dir(temp.path())
		.args(["Staff Directory", "Team", "--record", "--store"])
		.arg(&path)
		.output()
		.unwrap();

	assert!(output.status.success());
	let stderr = String::from_utf8_lossy(&output.stderr);
	assert!(stderr.contains("disabled"));
	assert!(stderr.contains("nothing recorded"));
	assert_eq!(fs::read_to_string(&path).unwrap(), before);
}
