use frameprof::output::{read_profile, validate_path, write_profile, write_report};
use frameprof::profile::{FrameRecord, Profile, SamplingMode};
use frameprof::utils::error::ParseError;
use std::path::Path;
use tempfile::NamedTempFile;

fn create_test_profile() -> Profile {
    Profile::new(SamplingMode::ObjectAllocation { every: 1 }, 20)
        .with_frame(
            70261185609100u64,
            FrameRecord::new("A#initialize", 20, 8)
                .with_location("/src/app.rb", Some(105))
                .with_callee(70261185608880u64, 12)
                .with_line_samples([(106, 8)]),
        )
        .with_frame(
            70261185608880u64,
            FrameRecord::new("A.newobj", 12, 12).with_line_samples([(126, 5), (127, 7)]),
        )
}

#[test]
fn test_write_and_read_profile() {
    let profile = create_test_profile();
    let temp_file = NamedTempFile::new().unwrap();
    let path = temp_file.path();

    write_profile(&profile, path).unwrap();
    let loaded = read_profile(path).unwrap();

    assert_eq!(loaded, profile);
}

#[test]
fn test_read_rejects_inconsistent_profile() {
    let temp_file = NamedTempFile::new().unwrap();
    std::fs::write(
        temp_file.path(),
        r#"{"mode":{"kind":"wall","interval":1000},"samples":5,
            "frames":{"1":{"name":"f","total_samples":5,"samples":5,"lines":{"3":4}}}}"#,
    )
    .unwrap();

    let result = read_profile(temp_file.path());
    assert!(matches!(result, Err(ParseError::Integrity(_))));
}

#[test]
fn test_read_rejects_malformed_json() {
    let temp_file = NamedTempFile::new().unwrap();
    std::fs::write(temp_file.path(), "{ not json").unwrap();

    let result = read_profile(temp_file.path());
    assert!(matches!(result, Err(ParseError::JsonError(_))));
}

#[test]
fn test_validate_output_path_empty() {
    let result = validate_path(Path::new(""));
    assert!(result.is_err());
}

#[test]
fn test_validate_output_path_directory() {
    let temp_dir = tempfile::tempdir().unwrap();
    let result = validate_path(temp_dir.path());
    assert!(result.is_err());
}

#[test]
fn test_write_creates_parent_dirs() {
    let temp_dir = tempfile::tempdir().unwrap();
    let nested_path = temp_dir.path().join("nested/dirs/profile.json");

    write_profile(&create_test_profile(), &nested_path).unwrap();

    assert!(nested_path.exists());
}

#[test]
fn test_report_write_creates_parent_dirs() {
    let temp_dir = tempfile::tempdir().unwrap();
    let nested_path = temp_dir.path().join("nested/dirs/profile.dot");

    write_report("digraph profile {\n}\n", &nested_path).unwrap();

    assert_eq!(
        std::fs::read_to_string(&nested_path).unwrap(),
        "digraph profile {\n}\n"
    );
}
