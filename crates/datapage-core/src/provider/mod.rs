//! Module: provider
//! Responsibility: lazy model/key/total-count state and its prepare/refresh
//! lifecycle over a pluggable data source.
//! Does not own: page arithmetic (see `page`) or query execution.
//! Boundary: concrete sources implement `DataSource`; callers hold a
//! `DataProvider`.

mod array;
mod query;

#[cfg(test)]
mod tests;

use crate::{
    config::{PaginationConfig, ProviderConfig, Setting},
    key::Key,
    obs::sink::{self, MetricsEvent},
    page::Paginator,
};
use std::fmt;

// re-exports
pub use array::ArrayProvider;
pub use query::{Query, QueryProvider};

///
/// FetchWindow
///
/// Offset and limit a source must honour when fetching one page.
/// `limit` is `None` when pages are unbounded.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct FetchWindow {
    pub offset: usize,
    pub limit: Option<usize>,
}

impl FetchWindow {
    /// Clamp this window to a source of `len` items.
    #[must_use]
    pub fn range(self, len: usize) -> std::ops::Range<usize> {
        let start = self.offset.min(len);
        let end = self
            .limit
            .map_or(len, |limit| start.saturating_add(limit).min(len));

        start..end
    }
}

///
/// DataSource
///
/// The three extension points a concrete provider fills in.
///

pub trait DataSource {
    type Model;
    type Error;

    /// Short source name used in logs and metrics.
    const KIND: &'static str;

    /// Fetch the models of one page, or every model when `window` is `None`.
    fn fetch_page(&mut self, window: Option<FetchWindow>) -> Result<Vec<Self::Model>, Self::Error>;

    /// Keys for `models`, same length and order.
    fn fetch_keys(&self, models: &[Self::Model]) -> Vec<Key>;

    /// Count every model, ignoring any pagination.
    fn fetch_total_count(&mut self) -> Result<usize, Self::Error>;
}

///
/// DataProvider
///
/// Lazily prepared models, keys and total count over a [`DataSource`].
///
/// Models and keys are fetched together, once, until `refresh` or a forced
/// `prepare`. The total count is fetched separately and only on demand.
/// When pagination is enabled the provider owns its [`Paginator`] and writes
/// the total count into it before reading offset and limit.
///

pub struct DataProvider<S: DataSource> {
    source: S,
    id: Option<String>,
    pagination: Setting<Paginator>,
    models: Option<Vec<S::Model>>,
    keys: Option<Vec<Key>>,
    total_count: Option<usize>,
}

impl<S: DataSource> DataProvider<S> {
    #[must_use]
    pub const fn new(source: S) -> Self {
        Self {
            source,
            id: None,
            pagination: Setting::Default,
            models: None,
            keys: None,
            total_count: None,
        }
    }

    /// Build a provider from configuration: id and pagination.
    #[must_use]
    pub fn from_config(source: S, config: &ProviderConfig) -> Self {
        let mut provider = Self::new(source);
        provider.id.clone_from(&config.id);
        provider.set_pagination_config(config.pagination.clone());

        provider
    }

    /// Identify this provider; scopes the link parameters of a default paginator.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_pagination(mut self, pagination: Setting<Paginator>) -> Self {
        self.set_pagination(pagination);
        self
    }

    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    #[must_use]
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Mutable access to the source. Cached state is kept; call `refresh`
    /// if the change affects what the source returns.
    pub const fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn into_source(self) -> S {
        self.source
    }

    // ------------------------------------------------------------------
    // Pagination
    // ------------------------------------------------------------------

    pub fn set_pagination(&mut self, pagination: Setting<Paginator>) {
        self.pagination = pagination;
    }

    /// Replace pagination from configuration; link parameters are scoped by id.
    pub fn set_pagination_config(&mut self, pagination: Setting<PaginationConfig>) {
        let id = self.id.clone();

        self.pagination =
            pagination.map(|config| Paginator::from_config(&config.scoped(id.as_deref())));
    }

    #[must_use]
    pub const fn is_paginated(&self) -> bool {
        !self.pagination.is_disabled()
    }

    /// The paginator, built with defaults on first access; `None` when disabled.
    pub fn pagination(&mut self) -> Option<&mut Paginator> {
        if matches!(self.pagination, Setting::Default) {
            let config = PaginationConfig::default().scoped(self.id.as_deref());
            self.pagination = Setting::Custom(Paginator::from_config(&config));
        }

        match &mut self.pagination {
            Setting::Custom(paginator) => Some(paginator),
            Setting::Disabled | Setting::Default => None,
        }
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Fetch models and keys unless already prepared; `force` fetches anyway.
    pub fn prepare(&mut self, force: bool) -> Result<(), S::Error> {
        if !force && self.models.is_some() {
            tracing::trace!(source = S::KIND, "models already prepared");
            return Ok(());
        }

        let window = self.fetch_window()?;
        let models = self.source.fetch_page(window)?;
        sink::record(MetricsEvent::PageFetched {
            source: S::KIND,
            rows: sink::count(models.len()),
        });

        self.store_models(models);

        tracing::debug!(
            source = S::KIND,
            provider = self.id.as_deref().unwrap_or_default(),
            ?window,
            rows = self.models.as_ref().map_or(0, Vec::len),
            "page fetched"
        );

        Ok(())
    }

    /// Drop models, keys and total count. Paginator settings are kept.
    pub fn refresh(&mut self) {
        self.models = None;
        self.keys = None;
        self.total_count = None;

        sink::record(MetricsEvent::Refreshed { source: S::KIND });
        tracing::debug!(source = S::KIND, "provider refreshed");
    }

    #[must_use]
    pub const fn is_prepared(&self) -> bool {
        self.models.is_some()
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    pub fn models(&mut self) -> Result<&[S::Model], S::Error> {
        self.prepare(false)?;

        Ok(self.models.as_deref().unwrap_or_default())
    }

    pub fn keys(&mut self) -> Result<&[Key], S::Error> {
        self.prepare(false)?;

        Ok(self.keys.as_deref().unwrap_or_default())
    }

    /// Models paired with their keys, in page order.
    pub fn entries(&mut self) -> Result<impl Iterator<Item = (&Key, &S::Model)>, S::Error> {
        self.prepare(false)?;

        let keys = self.keys.as_deref().unwrap_or_default();
        let models = self.models.as_deref().unwrap_or_default();

        Ok(keys.iter().zip(models))
    }

    /// Number of models on the current page.
    pub fn count(&mut self) -> Result<usize, S::Error> {
        Ok(self.models()?.len())
    }

    /// Number of models across all pages.
    ///
    /// Without pagination the current page is everything, so no separate
    /// count is fetched.
    pub fn total_count(&mut self) -> Result<usize, S::Error> {
        if self.pagination.is_disabled() {
            return self.count();
        }

        self.resolve_total_count()
    }

    // ------------------------------------------------------------------
    // Overrides
    // ------------------------------------------------------------------

    /// Install models directly; keys are derived from them.
    pub fn set_models(&mut self, models: Vec<S::Model>) {
        self.store_models(models);
    }

    /// Override the total count until the next refresh.
    pub const fn set_total_count(&mut self, total_count: usize) {
        self.total_count = Some(total_count);
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn store_models(&mut self, models: Vec<S::Model>) {
        let keys = self.source.fetch_keys(&models);
        debug_assert_eq!(
            keys.len(),
            models.len(),
            "fetch_keys must return one key per model"
        );
        sink::record(MetricsEvent::KeysDerived {
            source: S::KIND,
            keys: sink::count(keys.len()),
        });

        self.models = Some(models);
        self.keys = Some(keys);
    }

    fn resolve_total_count(&mut self) -> Result<usize, S::Error> {
        if let Some(total_count) = self.total_count {
            return Ok(total_count);
        }

        let total_count = self.source.fetch_total_count()?;
        sink::record(MetricsEvent::TotalCountFetched {
            source: S::KIND,
            total: sink::count(total_count),
        });
        tracing::debug!(source = S::KIND, total_count, "total count fetched");

        self.total_count = Some(total_count);

        Ok(total_count)
    }

    // Window for the next fetch; the paginator sees the total count first.
    fn fetch_window(&mut self) -> Result<Option<FetchWindow>, S::Error> {
        if self.pagination.is_disabled() {
            return Ok(None);
        }

        let total_count = self.resolve_total_count()?;
        let Some(paginator) = self.pagination() else {
            return Ok(None);
        };
        paginator.set_total_count(total_count);

        Ok(Some(FetchWindow {
            offset: paginator.offset(),
            limit: paginator.is_bounded().then(|| paginator.limit()),
        }))
    }
}

impl<S> fmt::Debug for DataProvider<S>
where
    S: DataSource + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataProvider")
            .field("source", &self.source)
            .field("id", &self.id)
            .field("pagination", &self.pagination)
            .field("models", &self.models.as_ref().map(Vec::len))
            .field("keys", &self.keys)
            .field("total_count", &self.total_count)
            .finish()
    }
}
