use super::*;
use crate::{config::Setting, obs::metrics_report};

#[test]
fn prepare_fetches_once_until_forced() {
    let (source, calls) = CountingSource::new(25);
    let mut provider = DataProvider::new(source);

    assert!(!provider.is_prepared());
    provider.prepare(false).expect("first prepare");
    provider.prepare(false).expect("second prepare");
    let _ = provider.models().expect("models");
    let _ = provider.keys().expect("keys");

    assert_eq!(calls.pages.get(), 1, "models and keys are fetched together once");
    assert_eq!(calls.totals.get(), 1);

    provider.prepare(true).expect("forced prepare");
    assert_eq!(calls.pages.get(), 2);
    assert_eq!(calls.totals.get(), 1, "the total count survives a forced prepare");
}

#[test]
fn refresh_drops_every_cached_value() {
    let (source, calls) = CountingSource::new(5);
    let mut provider = DataProvider::new(source);
    provider.prepare(false).expect("prepare");

    let before = metrics_report().ops.refreshes;
    provider.refresh();
    assert!(!provider.is_prepared());
    assert_eq!(metrics_report().ops.refreshes - before, 1);

    assert_eq!(provider.count().expect("count"), 5);
    assert_eq!(calls.pages.get(), 2);
    assert_eq!(calls.totals.get(), 2);
}

#[test]
fn keys_line_up_with_models() {
    let (source, _) = CountingSource::new(25);
    let mut provider = DataProvider::new(source);
    provider
        .pagination()
        .expect("pagination enabled")
        .set_limit(10);

    let entries: Vec<(Key, usize)> = provider
        .entries()
        .expect("entries")
        .map(|(key, model)| (key.clone(), *model))
        .collect();

    assert_eq!(entries.len(), 10);
    assert!(
        entries
            .iter()
            .all(|(key, model)| *key == Key::Index(*model))
    );
}

#[test]
fn paginated_window_follows_the_paginator() {
    let (source, calls) = CountingSource::new(25);
    let mut provider = DataProvider::new(source);
    let paginator = provider.pagination().expect("pagination enabled");
    paginator.set_limit(10);
    paginator.set_page(2);

    assert_eq!(provider.models().expect("models"), &[20, 21, 22, 23, 24]);
    assert_eq!(
        calls.windows.get(),
        Some(Some(FetchWindow {
            offset: 20,
            limit: Some(10),
        }))
    );

    let paginator = provider.pagination().expect("pagination enabled");
    assert_eq!(paginator.total_count(), 25);
    assert_eq!(paginator.page_count(), 3);
}

#[test]
fn unlimited_page_fetches_without_a_limit() {
    let (source, calls) = CountingSource::new(42);
    let mut provider = DataProvider::new(source);
    provider
        .pagination()
        .expect("pagination enabled")
        .set_limit(-1);

    assert_eq!(provider.count().expect("count"), 42);
    assert_eq!(
        calls.windows.get(),
        Some(Some(FetchWindow {
            offset: 0,
            limit: None,
        }))
    );
}

#[test]
fn disabled_pagination_counts_the_page() {
    let (source, calls) = CountingSource::new(7);
    let mut provider = DataProvider::new(source).with_pagination(Setting::Disabled);

    assert!(!provider.is_paginated());
    assert!(provider.pagination().is_none());
    assert_eq!(provider.total_count().expect("total"), 7);
    assert_eq!(provider.count().expect("count"), 7);

    assert_eq!(calls.windows.get(), Some(None), "no window without pagination");
    assert_eq!(calls.totals.get(), 0, "no separate count without pagination");
}

#[test]
fn total_count_is_cached_and_overridable() {
    let (source, calls) = CountingSource::new(12);
    let mut provider = DataProvider::new(source);

    assert_eq!(provider.total_count().expect("total"), 12);
    assert_eq!(provider.total_count().expect("total"), 12);
    assert_eq!(calls.totals.get(), 1);

    provider.set_total_count(99);
    assert_eq!(provider.total_count().expect("total"), 99);

    provider.refresh();
    assert_eq!(provider.total_count().expect("total"), 12);
    assert_eq!(calls.totals.get(), 2);
}

#[test]
fn set_models_installs_models_and_derived_keys() {
    let (source, calls) = CountingSource::new(100);
    let mut provider = DataProvider::new(source);

    provider.set_models(vec![7, 3]);

    assert!(provider.is_prepared());
    assert_eq!(provider.models().expect("models"), &[7, 3]);
    assert_eq!(
        provider.keys().expect("keys"),
        &[Key::Index(7), Key::Index(3)]
    );
    assert_eq!(calls.pages.get(), 0);
}

#[test]
fn provider_id_scopes_the_default_paginator() {
    let (source, _) = CountingSource::new(10);
    let mut provider = DataProvider::new(source).with_id("users");

    assert_eq!(provider.id(), Some("users"));
    let paginator = provider.pagination().expect("pagination enabled");
    assert_eq!(paginator.page_param(), "users-page");
    assert_eq!(paginator.limit_param(), "users-per-page");
}

#[test]
fn prepare_records_fetch_metrics() {
    let (source, _) = CountingSource::new(30);
    let mut provider = DataProvider::new(source);

    let before = metrics_report();
    provider.prepare(false).expect("prepare");
    let after = metrics_report();

    assert_eq!(after.ops.page_fetches - before.ops.page_fetches, 1);
    assert_eq!(after.ops.rows_fetched - before.ops.rows_fetched, 20);
    assert_eq!(after.ops.keys_derived - before.ops.keys_derived, 20);

    let counters = &after.sources["counting"];
    assert_eq!(counters.last_total_count, Some(30));
}
