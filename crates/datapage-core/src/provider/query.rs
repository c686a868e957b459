use crate::{
    config::ProviderConfig,
    error::Error,
    key::{Key, KeySelector},
    provider::{DataProvider, DataSource, FetchWindow},
    sort::{Sort, SortTerm},
    value::Record,
};
use std::fmt;

///
/// Query
///
/// Query-execution capability consumed by [`QueryProvider`].
///
/// The query is a cloneable descriptor; the provider clones it before
/// applying a window so the configured query is never mutated. Execution
/// errors are the implementor's own type and reach callers unchanged.
///

pub trait Query: Clone {
    type Row: Record;
    type Error: From<Error>;

    /// Limit the rows returned; `None` removes any limit.
    fn set_limit(&mut self, limit: Option<usize>);

    fn set_offset(&mut self, offset: usize);

    /// Append ordering terms after any existing ones.
    fn add_order_by(&mut self, terms: &[SortTerm]);

    fn clear_order(&mut self);

    /// Primary-key columns of the queried rows, if known.
    fn primary_key(&self) -> &[String] {
        &[]
    }

    /// Execute and return the rows.
    fn all(&self) -> Result<Vec<Self::Row>, Self::Error>;

    /// Execute as a count.
    fn count(&self) -> Result<usize, Self::Error>;
}

///
/// QueryProvider
///
/// Source backed by a live query.
///

pub struct QueryProvider<Q: Query> {
    query: Option<Q>,
    key: Option<KeySelector<Q::Row>>,
    sort: Option<Sort>,
}

impl<Q: Query> QueryProvider<Q> {
    #[must_use]
    pub const fn new(query: Q) -> Self {
        Self {
            query: Some(query),
            key: None,
            sort: None,
        }
    }

    /// A provider with no query yet; fetching fails until one is set.
    #[must_use]
    pub const fn unconfigured() -> Self {
        Self {
            query: None,
            key: None,
            sort: None,
        }
    }

    /// Wrap into a provider with default pagination.
    #[must_use]
    pub fn into_provider(self) -> DataProvider<Self> {
        DataProvider::new(self)
    }

    /// Build a configured provider: id, pagination, sort criteria and key field.
    #[must_use]
    pub fn configured(query: Q, config: &ProviderConfig) -> DataProvider<Self> {
        let mut source = Self::new(query);
        source.sort = config.sort_criteria().cloned();
        source.key = config.key.as_deref().map(|field| KeySelector::field(field));

        DataProvider::from_config(source, config)
    }

    #[must_use]
    pub fn with_key(mut self, key: KeySelector<Q::Row>) -> Self {
        self.key = Some(key);
        self
    }

    #[must_use]
    pub fn with_sort(mut self, sort: Sort) -> Self {
        self.sort = (!sort.is_empty()).then_some(sort);
        self
    }

    #[must_use]
    pub const fn query(&self) -> Option<&Q> {
        self.query.as_ref()
    }

    /// Replace the query. Providers holding this source must refresh.
    pub fn set_query(&mut self, query: Option<Q>) {
        self.query = query;
    }

    fn configured_query(&self) -> Result<&Q, Error> {
        self.query
            .as_ref()
            .ok_or_else(|| Error::invalid_query("query provider has no query to execute"))
    }
}

impl<Q: Query> DataSource for QueryProvider<Q> {
    type Model = Q::Row;
    type Error = Q::Error;

    const KIND: &'static str = "query";

    fn fetch_page(&mut self, window: Option<FetchWindow>) -> Result<Vec<Q::Row>, Q::Error> {
        let mut query = self.configured_query()?.clone();

        if let Some(window) = window {
            query.set_limit(window.limit);
            query.set_offset(window.offset);
        }
        if let Some(sort) = &self.sort {
            query.add_order_by(&sort.orders);
        }

        query.all()
    }

    fn fetch_keys(&self, models: &[Q::Row]) -> Vec<Key> {
        if let Some(selector) = &self.key {
            return selector.keys(models);
        }

        let primary_key = self.query.as_ref().map(Q::primary_key).unwrap_or_default();

        match primary_key {
            [] => (0..models.len()).map(Key::Index).collect(),
            [column] => models
                .iter()
                .map(|row| Key::Value(row.field(column).unwrap_or_default()))
                .collect(),
            columns => models
                .iter()
                .map(|row| {
                    Key::Composite(
                        columns
                            .iter()
                            .map(|column| (column.clone(), row.field(column).unwrap_or_default()))
                            .collect(),
                    )
                })
                .collect(),
        }
    }

    fn fetch_total_count(&mut self) -> Result<usize, Q::Error> {
        let mut query = self.configured_query()?.clone();
        query.set_limit(None);
        query.set_offset(0);
        query.clear_order();

        query.count()
    }
}

impl<Q> fmt::Debug for QueryProvider<Q>
where
    Q: Query + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryProvider")
            .field("query", &self.query)
            .field("key", &self.key)
            .field("sort", &self.sort)
            .finish()
    }
}
