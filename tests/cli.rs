use std::path::PathBuf;

use assert_cmd::Command;
use tempfile::tempdir;

fn data_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

fn qfever() -> Command {
    Command::cargo_bin("qfever").expect("qfever binary should be built")
}

#[test]
fn writes_report_from_config() {
    let output_dir = tempdir().unwrap();
    let output = qfever()
        .arg("--config")
        .arg(data_path("outbreak_parameters.json"))
        .arg("--output-dir")
        .arg(output_dir.path())
        .arg("--no-progress")
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("steps: 500 (t = 0 to 50)"));
    assert!(stdout.contains("clamped steps: 0"));

    let report = output_dir.path().join("seirv_trajectory.csv");
    let mut reader = csv::Reader::from_path(&report).unwrap();
    assert_eq!(
        reader.headers().unwrap(),
        vec!["time", "S", "E", "I", "R", "V"]
    );
    let rows: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
    assert_eq!(rows.len(), 501);
    assert_eq!(&rows[0][1], "990.0");
    for row in &rows {
        let total: f64 = (1..=5).map(|i| row[i].parse::<f64>().unwrap()).sum();
        assert!((total - 1000.0).abs() < 1e-6);
    }
}

#[test]
fn stdout_mode_emits_only_csv() {
    let output = qfever()
        .args(["--stdout", "--horizon", "4", "--dt", "0.5", "--method", "euler"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[0], "time,S,E,I,R,V");
    assert_eq!(lines.len(), 10);
    assert!(lines[8].starts_with("4.0,"));

    // The summary goes to stderr so the CSV stays clean.
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("peak infectious"));
}

#[test]
fn refuses_to_overwrite_without_flag() {
    let output_dir = tempdir().unwrap();
    let run = || {
        qfever()
            .arg("--output-dir")
            .arg(output_dir.path())
            .args(["--horizon", "2", "--no-progress"])
            .output()
            .unwrap()
    };
    assert!(run().status.success());

    let second = run();
    assert!(!second.status.success());
    let stderr = String::from_utf8(second.stderr).unwrap();
    assert!(stderr.contains("already exists"));

    qfever()
        .arg("--output-dir")
        .arg(output_dir.path())
        .args(["--horizon", "2", "--no-progress", "--overwrite"])
        .assert()
        .success();
}

#[test]
fn invalid_parameters_fail_without_output() {
    let output_dir = tempdir().unwrap();
    let output = qfever()
        .arg("--output-dir")
        .arg(output_dir.path())
        .arg("--beta=-0.3")
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("invalid parameter: beta must be finite and non-negative"));
    assert!(!output_dir.path().join("seirv_trajectory.csv").exists());

    let output = qfever()
        .arg("--output-dir")
        .arg(output_dir.path())
        .args(["--population", "0", "--initial-infected", "0"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("degenerate state"));
}

#[test]
fn lists_dataset_regions() {
    let output = qfever()
        .arg("--dataset")
        .arg(data_path("seroprevalence.csv"))
        .arg("--list-regions")
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(
        stdout,
        "Coast: camel, cattle\nRift Valley: cattle, goat, sheep\n"
    );
}

#[test]
fn dataset_seeds_initial_infectious() {
    let output = qfever()
        .arg("--dataset")
        .arg(data_path("seroprevalence.csv"))
        .args(["--region", "Rift Valley", "--species", "goat"])
        .args(["--horizon", "1", "--stdout"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains(
        "Estimated prevalence for Rift Valley / goat: 12.00% -> initial infectious: 120"
    ));

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.lines().nth(1), Some("0.0,880.0,0.0,120.0,0.0,0.0"));
}

#[test]
fn unknown_dataset_selection_fails() {
    let output = qfever()
        .arg("--dataset")
        .arg(data_path("seroprevalence.csv"))
        .args(["--region", "Coast", "--species", "goat", "--stdout"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("no rows for region 'Coast' and species 'goat'"));
}

#[test]
fn clamping_is_logged_as_warning() {
    let output = qfever()
        .args(["--nu", "1.0", "--dt", "1.5", "--method", "euler", "--stdout"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("WARN"));
    assert!(stderr.contains("clamped to zero"));
    assert!(!stderr.contains("clamped steps: 0"));
}

#[test]
fn module_log_levels() {
    let output = qfever()
        .args(["--horizon", "1", "--stdout"])
        .args(["--log-level", "qfever::simulator=debug,qfever::integrator=trace"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Logging enabled for qfever::simulator at level DEBUG"));
    assert!(stderr.contains("Logging enabled for qfever::integrator at level TRACE"));
    assert!(stderr.contains("qfever::simulator - Simulating 1 rk4 steps"));
    assert!(stderr.contains("qfever::integrator - rk4 step dt=1"));

    // Nothing but CSV on stdout.
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.lines().count(), 3);
}

#[test]
fn verbosity_levels() {
    let output = qfever()
        .args(["--horizon", "1", "--stdout", "-v"])
        .output()
        .unwrap();
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("INFO"));
    assert!(!stderr.contains("DEBUG"));

    let output = qfever()
        .args(["--horizon", "1", "--stdout", "-vvv"])
        .output()
        .unwrap();
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("INFO qfever::simulator"));
    // The integrator keeps its default debug cap unless asked for explicitly.
    assert!(!stderr.contains("qfever::integrator"));
}
