//! Integration tests for headless mode.

use super::common::{run, run_headless, NO_CONFIG};
use std::io::Write;

const FRUIT: [&str; 5] = ["Apple", "Apricot", "Banana", "Mango", "Papaya"];

fn with_fruit<'a>(args: &[&'a str]) -> Vec<&'a str> {
    let mut full: Vec<&str> = FRUIT.to_vec();
    full.extend_from_slice(args);
    full
}

#[test]
fn test_headless_basic_execution() {
    let (code, stdout, _) = run_headless(&with_fruit(&["--headless", "--events", "key:esc"]));

    assert_eq!(code, 0, "Expected exit code 0");
    assert!(
        stdout.contains("Events: 1 executed"),
        "Should show events executed"
    );
    assert!(stdout.contains("smart-complete"), "Header should render");
}

#[test]
fn test_headless_typing_filters_list() {
    let (code, stdout, _) = run_headless(&with_fruit(&[
        "--headless",
        "--events",
        "type:ap",
        "--output",
        "json",
    ]));

    assert_eq!(code, 0);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["state"]["value"], "ap");
    assert_eq!(json["state"]["results_visible"], true);
    assert_eq!(
        json["state"]["results"],
        serde_json::json!(["Apple", "Apricot", "Papaya"])
    );
}

#[test]
fn test_headless_assertion_pass() {
    let (code, stdout, _) = run_headless(&with_fruit(&[
        "--headless",
        "--events",
        "type:ap,assert:contains:Apricot,assert:count=3",
        "--output",
        "json",
    ]));

    assert_eq!(code, 0);
    assert!(stdout.contains(r#""passed": 2"#));
    assert!(stdout.contains(r#""failed": 0"#));
}

#[test]
fn test_headless_assertion_fail() {
    let (code, stdout, _) = run_headless(&with_fruit(&[
        "--headless",
        "--events",
        "type:ap,assert:contains:Banana",
        "--output",
        "json",
    ]));

    assert_eq!(code, 1, "Should exit with code 1 on assertion failure");
    assert!(stdout.contains(r#""passed": 0"#));
    assert!(stdout.contains(r#""failed": 1"#));
}

#[test]
fn test_headless_keyboard_selection() {
    let (code, stdout, _) = run_headless(&with_fruit(&[
        "--headless",
        "--events",
        "type:an,key:down,key:down,key:enter,assert:value=Mango,assert:visible=false",
    ]));

    assert_eq!(code, 0, "{stdout}");
    assert!(stdout.contains("Mango"));
}

#[test]
fn test_headless_no_match_notice() {
    let (code, stdout, _) = run_headless(&with_fruit(&[
        "--headless",
        "--events",
        "type:kiwi,assert:notice=Sorry",
    ]));

    // The notice is the full sentence, so a partial value fails
    assert_eq!(code, 1);
    assert!(stdout.contains("Sorry, No Results Found"));
}

#[test]
fn test_headless_min_chars() {
    let (code, stdout, _) = run_headless(&with_fruit(&[
        "--headless",
        "--min-chars",
        "3",
        "--events",
        "type:ma,assert:visible=false,type:n,assert:visible=true,assert:count=1",
    ]));

    assert_eq!(code, 0, "{stdout}");
}

#[test]
fn test_headless_max_results() {
    let (code, stdout, _) = run_headless(&with_fruit(&[
        "--headless",
        "--max-results",
        "1",
        "--events",
        "type:ap,assert:count=1,assert:contains:Apple,assert:not-contains:Apricot",
    ]));

    assert_eq!(code, 0, "{stdout}");
}

#[test]
fn test_headless_type_ahead() {
    let (code, stdout, _) = run_headless(&with_fruit(&[
        "--headless",
        "--type-ahead",
        "--events",
        "type:man,assert:suggestion=go,key:tab,assert:value=Mango,assert:selections=1",
    ]));

    assert_eq!(code, 0, "{stdout}");
}

#[test]
fn test_headless_force_select() {
    let (code, stdout, _) = run_headless(&with_fruit(&[
        "--headless",
        "--force-select",
        "--events",
        "type:ban,key:enter,assert:value=Banana,type:zz,key:enter,assert:value=",
    ]));

    assert_eq!(code, 0, "{stdout}");
}

#[test]
fn test_headless_clear_shortcut() {
    let (code, stdout, _) = run_headless(&with_fruit(&[
        "--headless",
        "--events",
        "type:pap,key:ctrl+u,assert:value=,assert:visible=false,assert:selections=0",
    ]));

    assert_eq!(code, 0, "{stdout}");
}

#[test]
fn test_headless_custom_size() {
    let (code, stdout, _) = run_headless(&with_fruit(&[
        "--headless",
        "--size",
        "40x10",
        "--events",
        "key:esc",
    ]));

    assert_eq!(code, 0);
    let screen = stdout.split("Events:").next().unwrap_or_default();
    for line in screen.lines() {
        assert!(line.chars().count() <= 40, "Line too wide: {line}");
    }
}

#[test]
fn test_headless_frames_output() {
    let (code, stdout, _) = run_headless(&with_fruit(&[
        "--headless",
        "--events",
        "type:ap,key:down",
        "--output",
        "frames",
    ]));

    assert_eq!(code, 0);
    assert!(stdout.contains("=== FRAME 0 (initial) ==="));
    assert!(stdout.contains("=== FRAME 1 (type:ap) ==="));
    assert!(stdout.contains("=== FRAME 2 (key:down) ==="));
}

#[test]
fn test_headless_script_from_stdin() {
    let script = "# pick a fruit\ntype:pa\nselect:0\nassert:value=Papaya\n";
    let mut args = vec!["--config", NO_CONFIG];
    args.extend(with_fruit(&["--headless", "--script", "-"]));

    let (code, stdout, _) = run(&args, Some(script));

    assert_eq!(code, 0, "{stdout}");
    assert!(stdout.contains("Assertions: 1 passed, 0 failed"));
}

#[test]
fn test_headless_source_file_and_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let list = dir.path().join("cities.txt");
    std::fs::write(&list, "Boston\nNew York\n\nNewark\n").unwrap();
    let out = dir.path().join("out.json");

    let (code, stdout, _) = run_headless(&[
        "--source-file",
        list.to_str().unwrap(),
        "--headless",
        "--events",
        "type:new,assert:count=2",
        "--output",
        "json",
        "--output-file",
        out.to_str().unwrap(),
    ]);

    assert_eq!(code, 0);
    assert!(stdout.is_empty(), "Output should go to the file");
    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(json["state"]["results"], serde_json::json!(["New York", "Newark"]));
}

#[test]
fn test_headless_field_profile() {
    let mut config = tempfile::NamedTempFile::new().unwrap();
    write!(
        config,
        r#"
[defaults]
min_char_limit = 1

[fields.colour]
source = ["Red", "Green", "Blue"]
"#
    )
    .unwrap();

    let (code, stdout, _) = run(
        &[
            "--config",
            config.path().to_str().unwrap(),
            "--field",
            "colour",
            "--headless",
            "--events",
            "type:r,assert:count=2,assert:contains:[colour: static]",
        ],
        None,
    );

    assert_eq!(code, 0, "{stdout}");
}

#[test]
fn test_headless_unknown_field_is_config_error() {
    let (code, _, stderr) = run_headless(&["--field", "missing", "--headless", "--events", "key:esc"]);

    assert_eq!(code, 1);
    assert!(stderr.contains("Configuration Error"), "{stderr}");
    assert!(stderr.contains("Field 'missing' not found"));
}

#[test]
fn test_headless_invalid_event() {
    let (code, _, stderr) = run_headless(&["--headless", "--events", "invalid_no_colon"]);

    assert_eq!(code, 1, "Should fail with invalid event syntax");
    assert!(stderr.contains("Invalid event syntax"));
}

#[test]
fn test_headless_requires_events() {
    let (code, _, stderr) = run_headless(&["--headless"]);

    assert_eq!(code, 1);
    assert!(stderr.contains("--headless requires --events or --script"));
}
