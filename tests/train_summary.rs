use clap::Parser;
use gridworld_rl::cli::commands::{
    plan::{self, PlanArgs},
    train::{self, TrainArgs},
};
use tempfile::tempdir;

#[test]
fn summary_without_extension_appends_json() {
    let tmp = tempdir().unwrap();
    let summary_stem = tmp.path().join("run_overview");

    let args = TrainArgs::parse_from([
        "gridworld-train",
        "--length",
        "4",
        "--episodes",
        "5",
        "--max-steps",
        "20",
        "--eval-episodes",
        "2",
        "--seed",
        "7",
        "--summary",
        summary_stem.to_str().unwrap(),
    ]);

    train::execute(args).expect("training with summary should succeed");

    let expected_path = summary_stem.with_extension("json");
    assert!(
        expected_path.exists(),
        "expected summary at {}",
        expected_path.display()
    );

    let contents = std::fs::read_to_string(&expected_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(parsed["training"]["episodes"], 5);
    assert_eq!(parsed["evaluation"]["episodes"], 2);
    assert_eq!(parsed["evaluation"]["policy"], "greedy");
    assert_eq!(parsed["config"]["length"], 4);
    assert_eq!(parsed["seed"], 7);
}

#[test]
fn summary_directory_argument_creates_default_file() {
    let tmp = tempdir().unwrap();
    let summary_dir = tmp.path().join("summaries");
    let summary_arg = format!("{}/", summary_dir.display());

    let args = TrainArgs::parse_from([
        "gridworld-train",
        "--length",
        "3",
        "--episodes",
        "3",
        "--eval-episodes",
        "0",
        "--summary",
        &summary_arg,
    ]);

    train::execute(args).expect("training with directory summary should succeed");

    let expected_path = summary_dir.join("training_summary.json");
    let contents = std::fs::read_to_string(&expected_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(parsed["training"]["episodes"], 3);
    assert!(parsed["evaluation"].is_null());
}

#[test]
fn plan_summary_reports_termination() {
    let tmp = tempdir().unwrap();
    let summary_path = tmp.path().join("plan.json");

    let args = PlanArgs::parse_from([
        "gridworld-plan",
        "--length",
        "5",
        "--fail-chance",
        "0",
        "--seed",
        "3",
        "--eval-episodes",
        "4",
        "--sweep",
        "synchronous",
        "--summary",
        summary_path.to_str().unwrap(),
    ]);

    plan::execute(args).expect("planning should succeed");

    let contents = std::fs::read_to_string(&summary_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(parsed["termination"]["status"], "converged");
    assert_eq!(parsed["evaluation"]["policy"], "fixed");
    assert_eq!(parsed["evaluation"]["episodes"], 4);
}

#[test]
fn invalid_grid_flags_fail_before_running() {
    let args = TrainArgs::parse_from(["gridworld-train", "--length", "2", "--obstacles", "5"]);
    assert!(train::execute(args).is_err());
}
