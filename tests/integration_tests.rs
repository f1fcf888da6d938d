use serde_json::{json, Value};
use std::io::Write;
use std::process::Command;

const SAMPLE: &str = "test/billboard_sample.csv";

/// Helper function to run hitboard and capture stdout (or stderr on failure)
fn run_hitboard(args: &[&str]) -> Result<String, String> {
    let output = Command::new(env!("CARGO_BIN_EXE_hitboard"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .map_err(|e| format!("Failed to spawn process: {}", e))?;

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    } else {
        Err(String::from_utf8_lossy(&output.stderr).to_string())
    }
}

fn run_json(args: &[&str]) -> Value {
    let stdout = run_hitboard(args).expect("hitboard failed");
    serde_json::from_str(&stdout).expect("Output is not valid JSON")
}

#[test]
fn test_end_to_end_options() {
    let out = run_json(&["--data", SAMPLE, "options"]);
    assert_eq!(out["year_options"], json!([1969, 2019]));
    assert_eq!(out["genre_options"], json!(["Rock", "Soul", "Pop", "Hip Hop"]));
    assert_eq!(out["min_weeks_max"], json!(52));
}

#[test]
fn test_end_to_end_overview_defaults() {
    // The 1990 row is outside the offered years
    let out = run_json(&["--data", SAMPLE, "overview"]);
    assert_eq!(out["metrics"]["total_songs"], json!(9));
    assert_eq!(out["avg_weeks_label"], json!("21.9 weeks"));

    let chart = &out["genre_proportions"];
    assert_eq!(chart["mark"]["type"], json!("bar"));
    assert_eq!(chart["encoding"]["column"]["field"], json!("year"));
}

#[test]
fn test_end_to_end_overview_filtered() {
    let out = run_json(&["--data", SAMPLE, "--genres", "Rock", "--min-weeks", "10", "overview"]);
    assert_eq!(out["metrics"]["total_songs"], json!(2));
    assert_eq!(out["avg_weeks_label"], json!("16.0 weeks"));
    let values = out["genre_proportions"]["data"]["values"].as_array().unwrap();
    assert_eq!(values.len(), 2);
    assert!(values.iter().all(|v| v["proportion"] == json!(1.0)));
}

#[test]
fn test_end_to_end_overview_empty_selection() {
    let out = run_json(&["--data", SAMPLE, "--min-weeks", "53", "overview"]);
    assert_eq!(out["metrics"]["total_songs"], json!(0));
    assert_eq!(out["metrics"]["avg_weeks_on_chart"], Value::Null);
    assert_eq!(out["avg_weeks_label"], json!("no data"));
}

#[test]
fn test_end_to_end_mood_by_year() {
    let out = run_json(&["--data", SAMPLE, "mood"]);
    assert_eq!(
        out["data"]["values"],
        json!([
            {"year": 1969, "proportion_happy": 0.5},
            {"year": 2019, "proportion_happy": 0.6}
        ])
    );
    assert_eq!(out["title"], json!("Proportion of Happy Songs by Year"));
}

#[test]
fn test_end_to_end_mood_by_genre() {
    let out = run_json(&["--data", SAMPLE, "mood", "--view", "genre"]);
    assert_eq!(out["encoding"]["column"]["header"]["title"], json!("Year"));
    assert_eq!(out["encoding"]["x"]["axis"]["labelAngle"], json!(-45));
}

#[test]
fn test_end_to_end_mood_invalid_view() {
    let result = run_hitboard(&["--data", SAMPLE, "mood", "--view", "decade"]);
    let stderr = result.unwrap_err();
    assert!(stderr.contains("invalid value 'decade'"));
    assert!(stderr.contains("[possible values: year, genre]"));
}

#[test]
fn test_end_to_end_gender() {
    let out = run_json(&["--data", SAMPLE, "gender"]);
    assert_eq!(out["weeks_boxplot"]["mark"], json!({"type": "boxplot", "size": 60}));
    assert_eq!(out["weeks_boxplot"]["data"]["values"].as_array().unwrap().len(), 9);
    assert_eq!(out["proportions"]["encoding"]["color"]["field"], json!("gender"));
}

#[test]
fn test_end_to_end_custom_split() {
    let out = run_json(&[
        "--data", SAMPLE, "custom", "--x", "bpm", "--y", "loudness", "--color", "gender",
        "--split-by-year",
    ]);
    assert_eq!(out["width"], json!(350));
    assert_eq!(out["encoding"]["x"]["title"], json!("Bpm"));
    assert_eq!(out["encoding"]["column"]["field"], json!("year"));
    assert_eq!(out["params"][0]["bind"], json!("scales"));
}

#[test]
fn test_end_to_end_custom_unlisted_axis() {
    let result = run_hitboard(&["--data", SAMPLE, "custom", "--x", "song"]);
    assert!(result.unwrap_err().contains("unsupported x-axis 'song'"));
}

#[test]
fn test_end_to_end_custom_unknown_field() {
    let result = run_hitboard(&["--data", SAMPLE, "custom", "--y", "nonexistent_column"]);
    assert!(result.unwrap_err().contains("unknown field 'nonexistent_column'"));
}

#[test]
fn test_end_to_end_missing_file() {
    let result = run_hitboard(&["--data", "test/not_there.csv", "overview"]);
    assert!(result.unwrap_err().contains("Failed to load chart entries"));
}

#[test]
fn test_end_to_end_missing_column() {
    let result = run_hitboard(&["--data", "test/missing_column.csv", "overview"]);
    assert!(result.unwrap_err().contains("missing required column 'gender'"));
}

#[test]
fn test_end_to_end_ragged_rows() {
    let result = run_hitboard(&["--data", "test/ragged.csv", "overview"]);
    assert!(result.is_err(), "Should have failed on a short row");
}

#[test]
fn test_end_to_end_config_file() {
    let mut config = tempfile::NamedTempFile::new().unwrap();
    write!(config, r#"{{"data_path": "{}", "year_options": [1990]}}"#, SAMPLE).unwrap();
    config.flush().unwrap();
    let config_path = config.path().to_str().unwrap();

    let options = run_json(&["--config", config_path, "options"]);
    assert_eq!(options["year_options"], json!([1990]));

    let overview = run_json(&["--config", config_path, "overview"]);
    assert_eq!(overview["metrics"]["total_songs"], json!(1));
}

#[test]
fn test_end_to_end_is_deterministic() {
    let first = run_hitboard(&["--data", SAMPLE, "gender"]).unwrap();
    let second = run_hitboard(&["--data", SAMPLE, "gender"]).unwrap();
    assert_eq!(first, second);
}
