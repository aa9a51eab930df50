//! Config file and command-line layering tests.

use clap::Parser;
use smart_complete::autocomplete::{AutocompleteField, MaxResults, Source};
use smart_complete::cli::Cli;
use smart_complete::config::Config;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_file_profile_and_cli_resolve_into_field_options() {
    let file = write_config(
        r#"
[defaults]
min_char_limit = 1
delay_ms = 120
type_ahead = true

[fields.fruit]
source = ["Apple", "Apricot", "Banana"]
max_results = 5
"#,
    );
    let config = Config::load_from_file(file.path()).unwrap();
    let cli = Cli::parse_from(["smart-complete", "-f", "fruit", "--max-results", "1"]);

    let field = AutocompleteField::attach("fruit", cli.resolve_overrides(&config).unwrap());
    let settings = &field.options().settings;

    assert_eq!(settings.min_char_limit, 1);
    assert_eq!(settings.delay_ms, 120);
    assert!(settings.type_ahead);
    assert_eq!(settings.max_results, MaxResults::Limit(1));
    assert_eq!(field.options().source.as_ref().map(Source::kind), Some("static"));
}

#[test]
fn test_profile_source_file() {
    let mut list = NamedTempFile::new().unwrap();
    writeln!(list, "Oslo\nOttawa").unwrap();
    let file = write_config(&format!(
        "[fields.capital]\nsource_file = {:?}\n",
        list.path().display().to_string()
    ));

    let config = Config::load_from_file(file.path()).unwrap();
    let overrides = config.resolve_field(Some("capital")).unwrap();

    match overrides.source {
        Some(Source::StaticList(items)) => assert_eq!(items.len(), 2),
        other => panic!("expected a static list, got {other:?}"),
    }
}

#[test]
fn test_profile_remote_source() {
    let file = write_config("[fields.city]\nurl = \"http://localhost:9/cities\"\n");
    let config = Config::load_from_file(file.path()).unwrap();

    let overrides = config.resolve_field(Some("city")).unwrap();
    assert_eq!(overrides.source.as_ref().map(Source::kind), Some("remote"));
}

#[test]
fn test_missing_source_file_is_reported() {
    let file = write_config("[fields.x]\nsource_file = \"/nonexistent/list.txt\"\n");
    let config = Config::load_from_file(file.path()).unwrap();

    assert!(config.resolve_field(Some("x")).is_err());
}

#[test]
fn test_malformed_file_names_path() {
    let file = write_config("[defaults\nmin_char_limit = 1\n");
    let err = Config::load_from_file(file.path()).unwrap_err();

    assert_eq!(err.category(), "Configuration Error");
    assert!(err
        .to_string()
        .contains(&file.path().display().to_string()));
}

#[test]
fn test_cli_without_config_file() {
    let cli = Cli::parse_from(["smart-complete", "Red", "Green", "--force-select"]);
    let overrides = cli.resolve_overrides(&Config::default()).unwrap();

    assert_eq!(overrides.settings.force_select, Some(true));
    assert_eq!(overrides.settings.min_char_limit, None);
    assert!(matches!(overrides.source, Some(Source::StaticList(ref list)) if list.len() == 2));
}
