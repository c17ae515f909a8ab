#![cfg(feature = "cli")]

use serde_json::Value;
use std::process::Command;

fn forecast(args: &[&str]) -> (String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_forecast"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap();
    assert!(output.status.success());
    (
        String::from_utf8(output.stdout).unwrap(),
        String::from_utf8(output.stderr).unwrap(),
    )
}

fn prices_json(n: usize) -> String {
    let prices: Vec<f64> = (0..n).map(|i| 100.0 * 1.01_f64.powi(i as i32)).collect();
    serde_json::to_string(&prices).unwrap()
}

#[test]
fn test_verbose_run_prints_one_json_line() {
    let prices = prices_json(40);
    let (stdout, stderr) = forecast(&[
        "--verbose",
        &prices,
        r#"{"p":1,"d":0,"q":0}"#,
        r#"{"p":1,"q":1}"#,
    ]);

    assert_eq!(stdout.lines().count(), 1);
    let value: Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(value["used_model"], "ARIMA(1,0,0) + GARCH(1,1)");
    assert_eq!(value.as_object().unwrap().len(), 3);
    // diagnostics go to stderr only
    assert!(stderr.contains("forecast complete"));
}

#[test]
fn test_short_series_prints_error_object() {
    let (stdout, _) = forecast(&["[1, 2, 3]", r#"{"p":1,"d":0,"q":0}"#, r#"{"p":1,"q":1}"#]);
    assert_eq!(stdout, "{\"error\":\"Not enough data\"}\n");
}

#[test]
fn test_missing_arguments_print_error_object() {
    let (stdout, _) = forecast(&["[1, 2, 3]"]);
    assert_eq!(stdout.lines().count(), 1);
    let value: Value = serde_json::from_str(stdout.trim()).unwrap();
    assert!(value["error"].is_string());
}
