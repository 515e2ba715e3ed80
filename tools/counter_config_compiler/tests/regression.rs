use std::{fs, path::PathBuf};

use counter_config_compiler::{
    generate_from_path, parse_counter_file, render_generated_config, validate_config,
    ConfigCompilerError, PolicyName,
};

fn repo_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("missing tools dir")
        .parent()
        .expect("missing repo root")
        .to_path_buf()
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn snapshot(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("snapshots")
        .join(name)
}

#[test]
fn default_config_matches_snapshot() {
    let config = repo_root().join("config/counter.toml");
    let actual = generate_from_path(&config).expect("default config should compile");
    let expected = fs::read_to_string(snapshot("default_generated.rs"))
        .expect("missing default snapshot file");

    assert_eq!(
        actual, expected,
        "generated output changed; if intentional, update tools/counter_config_compiler/tests/snapshots/default_generated.rs"
    );
}

#[test]
fn generation_is_deterministic_for_same_input() {
    let config = fixture("valid_default.toml");
    let first = generate_from_path(&config).expect("first generation failed");
    let second = generate_from_path(&config).expect("second generation failed");
    assert_eq!(first, second);
}

#[test]
fn lenient_policy_and_detector_floor_override_render() {
    let path = fixture("valid_lenient_override.toml");
    let config = parse_counter_file(&path).expect("fixture should parse");
    assert_eq!(config.peak_detector.policy, PolicyName::Lenient);
    validate_config(&config).expect("fixture should validate");
    let rendered = render_generated_config(&config);

    for needle in [
        "floor: 2000,",
        "floor_to_ceiling: 1800,",
        "vacancy_percent: 15,",
        "floor: Some(1900),",
        "window_size: 7,",
        "policy: PeakPolicy::Lenient,",
    ] {
        assert!(
            rendered.contains(needle),
            "rendered output missing `{needle}`"
        );
    }
}

#[test]
fn semantic_validation_rejects_invalid_ranges() {
    let cases = [
        ("invalid/floor_zero.toml", "thresholds.floor must be > 0"),
        (
            "invalid/range_exceeds_floor.toml",
            "thresholds.floor_to_ceiling must be > 0 and <= thresholds.floor",
        ),
        (
            "invalid/vacancy_zero.toml",
            "thresholds.vacancy_percent must be within 1..=100",
        ),
        (
            "invalid/window_too_large.toml",
            "peak_detector.window_size must be within 1..=16",
        ),
        (
            "invalid/detector_floor_below_ceiling.toml",
            "peak_detector.floor must be within the ceiling..=floor range",
        ),
    ];

    for (fixture_name, expected_msg) in cases {
        let path = fixture(fixture_name);
        let err = generate_from_path(&path).expect_err("fixture should fail validation");
        match err {
            ConfigCompilerError::Validation(msg) => {
                assert!(
                    msg.contains(expected_msg),
                    "expected validation message containing `{expected_msg}`, got `{msg}`"
                );
            }
            other => panic!("expected validation error, got {other}"),
        }
    }
}

#[test]
fn parse_errors_are_reported_for_schema_mismatches() {
    let path = fixture("invalid/missing_path.toml");
    let err = generate_from_path(&path).expect_err("fixture should fail parsing");
    match err {
        ConfigCompilerError::Parse(msg) => {
            assert!(
                msg.contains("path"),
                "expected parse error mentioning path, got `{msg}`"
            );
        }
        other => panic!("expected parse error, got {other}"),
    }

    let path = fixture("invalid/unknown_policy.toml");
    let err = generate_from_path(&path).expect_err("unknown policy should fail parsing");
    assert!(matches!(err, ConfigCompilerError::Parse(_)), "got {err}");
}

#[test]
fn missing_file_is_an_io_error() {
    let err = generate_from_path(&fixture("does_not_exist.toml"))
        .expect_err("missing file should fail");
    assert!(matches!(err, ConfigCompilerError::Io(_)), "got {err}");
}
