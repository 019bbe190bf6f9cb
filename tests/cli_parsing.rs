use clap::Parser;
use forensics::cli::{parse_failure_status, Cli};
use forensics::ExitStatus;
use std::path::Path;

#[test]
fn test_parse_required_arguments() {
    let cli = Cli::try_parse_from(["forensics", "--run-id", "68", "--run-dir", "/data/runs"]).unwrap();

    assert_eq!(cli.run_id, "68");
    assert_eq!(cli.run_dir_path(), Path::new("/data/runs"));
    assert!(cli.config.is_none());
}

#[test]
fn test_parse_underscore_aliases() {
    let cli = Cli::try_parse_from(["forensics", "--run_id", "68", "--run_dir", "/data/runs"]).unwrap();

    assert_eq!(cli.run_id, "68");
    assert_eq!(cli.run_dir, "/data/runs");
}

#[test]
fn test_parse_config_file() {
    let cli = Cli::try_parse_from([
        "forensics",
        "--run-id",
        "68",
        "--run-dir",
        "/data/runs",
        "--config",
        "forensics.yaml",
    ])
    .unwrap();

    assert_eq!(cli.config.as_deref(), Some(Path::new("forensics.yaml")));
}

#[test]
fn test_missing_run_dir_is_invalid_arguments() {
    let err = Cli::try_parse_from(["forensics", "--run-id", "68"]).unwrap_err();
    assert_eq!(parse_failure_status(&err), ExitStatus::InvalidArguments);
}

#[test]
fn test_empty_run_dir_is_invalid_arguments() {
    let err = Cli::try_parse_from(["forensics", "--run-id", "68", "--run-dir", ""]).unwrap_err();
    assert_eq!(parse_failure_status(&err), ExitStatus::InvalidArguments);
}

#[test]
fn test_empty_run_id_is_invalid_arguments() {
    let err = Cli::try_parse_from(["forensics", "--run-id", "", "--run-dir", "/data"]).unwrap_err();
    assert_eq!(parse_failure_status(&err), ExitStatus::InvalidArguments);
}

#[test]
fn test_unknown_flag_is_invalid_arguments() {
    let err = Cli::try_parse_from(["forensics", "--run-id", "1", "--run-dir", "/d", "--verbose"]).unwrap_err();
    assert_eq!(parse_failure_status(&err), ExitStatus::InvalidArguments);
}

#[test]
fn test_help_and_version_are_success() {
    let help = Cli::try_parse_from(["forensics", "--help"]).unwrap_err();
    assert_eq!(parse_failure_status(&help), ExitStatus::Success);

    let version = Cli::try_parse_from(["forensics", "--version"]).unwrap_err();
    assert_eq!(parse_failure_status(&version), ExitStatus::Success);
}
