//! End-to-end tests of a field driven through the filter runner.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use smart_complete::autocomplete::{
    candidates, AutocompleteEvent, AutocompleteField, Candidate, EventKind, FilterPass,
    FilterRunner, FnFilter, MaxResults, OptionOverrides, Source, NO_RESULTS_NOTICE,
};
use smart_complete::error::SmartCompleteError;
use std::sync::{Arc, Mutex};
use std::time::Duration;

fn type_text(field: &mut AutocompleteField, text: &str) -> FilterPass {
    let mut last = FilterPass::Skipped;
    for c in text.chars() {
        last = field.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
    }
    last
}

fn shown(field: &AutocompleteField) -> Vec<String> {
    field
        .container()
        .items()
        .iter()
        .map(|item| item.text.clone())
        .collect()
}

/// A custom filter that answers slower for shorter queries.
fn slow_prefix_filter() -> Source {
    Source::custom(FnFilter::new(|query: String| async move {
        let delay = Duration::from_millis(if query.len() < 3 { 200 } else { 10 });
        tokio::time::sleep(delay).await;
        let all = ["Ada", "Adam", "Adele", "Bob"];
        Ok::<_, SmartCompleteError>(
            all.iter()
                .filter(|name| name.to_lowercase().starts_with(&query.to_lowercase()))
                .map(|name| Candidate::new(*name))
                .collect(),
        )
    }))
}

async fn drain(field: &mut AutocompleteField, runner: &mut FilterRunner, wait: Duration) {
    tokio::time::sleep(wait).await;
    while let Some(outcome) = runner.try_recv() {
        field.apply_results(outcome.generation, outcome.results);
    }
}

#[tokio::test]
async fn test_slow_stale_pass_never_overwrites_latest() {
    let mut field = AutocompleteField::attach(
        "name",
        OptionOverrides::new()
            .min_char_limit(1)
            .delay_ms(0)
            .source(slow_prefix_filter()),
    );
    let mut runner = FilterRunner::new();

    // "ad" answers after 200ms, "ade" after 10ms
    for c in ["a", "d"] {
        if let Some(job) = type_text(&mut field, c).into_job() {
            runner.submit(job);
        }
    }
    let stale = field.generation();
    if let Some(job) = type_text(&mut field, "e").into_job() {
        runner.submit(job);
    }
    assert!(field.generation() > stale);

    drain(&mut field, &mut runner, Duration::from_millis(400)).await;

    assert_eq!(shown(&field), vec!["Adele"]);
}

#[tokio::test]
async fn test_stale_results_are_dropped_even_if_delivered() {
    let mut field = AutocompleteField::attach(
        "name",
        OptionOverrides::new()
            .min_char_limit(1)
            .source(Source::list(["Ada", "Bob"])),
    );

    type_text(&mut field, "b");
    let old = field.generation() - 1;

    assert!(!field.apply_results(old, candidates(["Ada"])));
    assert_eq!(shown(&field), vec!["Bob"]);
}

#[tokio::test]
async fn test_debounce_only_runs_last_keystroke() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&calls);
    let mut field = AutocompleteField::attach(
        "name",
        OptionOverrides::new()
            .min_char_limit(1)
            .delay_ms(50)
            .source(Source::custom(FnFilter::new(move |query: String| {
                let seen = Arc::clone(&seen);
                async move {
                    seen.lock().unwrap().push(query.clone());
                    Ok::<_, SmartCompleteError>(vec![Candidate::new(query)])
                }
            }))),
    );
    let mut runner = FilterRunner::new();

    for c in "adel".chars() {
        if let Some(job) = type_text(&mut field, &c.to_string()).into_job() {
            runner.submit(job);
        }
    }
    drain(&mut field, &mut runner, Duration::from_millis(200)).await;

    assert_eq!(*calls.lock().unwrap(), vec!["adel"]);
    assert_eq!(shown(&field), vec!["adel"]);
}

#[tokio::test]
async fn test_custom_filter_is_not_capped() {
    let mut field = AutocompleteField::attach(
        "name",
        OptionOverrides::new()
            .min_char_limit(1)
            .delay_ms(0)
            .max_results(MaxResults::Limit(1))
            .source(Source::custom(FnFilter::new(|_query: String| async {
                Ok::<_, SmartCompleteError>(candidates(["one", "two", "three"]))
            }))),
    );
    let mut runner = FilterRunner::new();

    runner.submit(type_text(&mut field, "x").into_job().unwrap());
    drain(&mut field, &mut runner, Duration::from_millis(100)).await;

    assert_eq!(shown(&field).len(), 3);
}

#[tokio::test]
async fn test_custom_filter_empty_result_shows_notice() {
    let mut field = AutocompleteField::attach(
        "name",
        OptionOverrides::new()
            .min_char_limit(1)
            .delay_ms(0)
            .source(Source::custom(FnFilter::new(|_query: String| async {
                Ok::<_, SmartCompleteError>(Vec::new())
            }))),
    );
    let mut runner = FilterRunner::new();

    runner.submit(type_text(&mut field, "x").into_job().unwrap());
    drain(&mut field, &mut runner, Duration::from_millis(100)).await;

    assert_eq!(field.container().notice(), Some(NO_RESULTS_NOTICE));
    assert!(field.container().is_visible());
}

#[tokio::test]
async fn test_custom_filter_error_is_swallowed() {
    let mut field = AutocompleteField::attach(
        "name",
        OptionOverrides::new()
            .min_char_limit(1)
            .delay_ms(0)
            .source(Source::custom(FnFilter::new(|_query: String| async {
                Err::<Vec<Candidate>, _>(SmartCompleteError::source("backend down"))
            }))),
    );
    let mut runner = FilterRunner::new();

    runner.submit(type_text(&mut field, "x").into_job().unwrap());
    drain(&mut field, &mut runner, Duration::from_millis(100)).await;

    assert!(!field.container().is_visible());
    assert!(field.container().items().is_empty());
}

#[test]
fn test_overridden_selection_keeps_field_value() {
    let picked: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&picked);
    let mut field = AutocompleteField::attach(
        "city",
        OptionOverrides::new()
            .min_char_limit(1)
            .source(Source::list(["Boston", "Berlin"])),
    );
    field
        .override_default(EventKind::ItemSelected, move |event| {
            if let AutocompleteEvent::ItemSelected { text, .. } = event {
                sink.lock().unwrap().push(text.to_uppercase());
            }
        })
        .unwrap();

    type_text(&mut field, "ber");
    assert!(field.select_index(0));

    assert_eq!(*picked.lock().unwrap(), vec!["BERLIN"]);
    assert_eq!(field.value(), "ber");
    assert!(field.container().is_visible());
}

#[test]
fn test_query_changed_cannot_be_overridden() {
    let mut field = AutocompleteField::attach("city", OptionOverrides::new());
    let err = field
        .override_default(EventKind::QueryChanged, |_| {})
        .unwrap_err();
    assert_eq!(err.category(), "Configuration Error");
}

#[test]
fn test_observers_see_the_whole_pipeline() {
    let kinds = Arc::new(Mutex::new(Vec::new()));
    let mut field = AutocompleteField::attach(
        "city",
        OptionOverrides::new()
            .min_char_limit(1)
            .source(Source::list(["Boston"])),
    );
    for kind in EventKind::ALL {
        let sink = Arc::clone(&kinds);
        field.subscribe(kind, move |event| sink.lock().unwrap().push(event.kind()));
    }

    type_text(&mut field, "b");
    field.handle_key(KeyEvent::new(KeyCode::Down, KeyModifiers::NONE));
    field.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));

    assert_eq!(
        *kinds.lock().unwrap(),
        vec![
            EventKind::QueryChanged,
            EventKind::FilterReady,
            EventKind::ResultsShown,
            EventKind::ItemSelected,
            EventKind::ResultsHidden,
        ]
    );
    assert_eq!(field.value(), "Boston");
}

#[test]
fn test_reconfigure_keeps_earlier_options() {
    let mut field = AutocompleteField::attach(
        "city",
        OptionOverrides::new()
            .min_char_limit(1)
            .source(Source::list(["Boston", "Berlin", "Bern"])),
    );

    field.configure(OptionOverrides::new().max_results(MaxResults::Limit(2)));
    type_text(&mut field, "b");
    assert_eq!(shown(&field), vec!["Boston", "Berlin"]);

    field.configure(OptionOverrides::new().disabled(true));
    assert!(matches!(type_text(&mut field, "e"), FilterPass::Skipped));
    assert_eq!(field.options().settings.min_char_limit, 1);
}
