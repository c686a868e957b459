use crate::{
    config::ProviderConfig,
    error::Error,
    key::{Key, KeySelector},
    provider::{DataProvider, DataSource, FetchWindow},
    sort::Sort,
    value::Record,
};
use std::{cell::Cell, cmp::Ordering, fmt};

type Comparator<M> = Box<dyn Fn(&M, &M) -> Ordering>;

///
/// ArrayProvider
///
/// Source over an in-memory list of models.
///
/// Pages are cut from the (optionally sorted) list without reindexing:
/// each model keeps its position in the original list, and those positions
/// are the keys when no key selector is configured.
///

pub struct ArrayProvider<M> {
    all_models: Vec<M>,
    key: Option<KeySelector<M>>,
    order: Option<Comparator<M>>,
    // source positions of the page just fetched, consumed by the next key derivation
    positions: Cell<Option<Vec<usize>>>,
}

impl<M: Clone> ArrayProvider<M> {
    #[must_use]
    pub const fn new(all_models: Vec<M>) -> Self {
        Self {
            all_models,
            key: None,
            order: None,
            positions: Cell::new(None),
        }
    }

    /// Wrap into a provider with default pagination.
    #[must_use]
    pub fn into_provider(self) -> DataProvider<Self> {
        DataProvider::new(self)
    }

    #[must_use]
    pub fn with_key(mut self, key: KeySelector<M>) -> Self {
        self.key = Some(key);
        self
    }

    /// Order the list with a comparator before paging.
    #[must_use]
    pub fn with_order(mut self, compare: impl Fn(&M, &M) -> Ordering + 'static) -> Self {
        self.order = Some(Box::new(compare));
        self
    }

    #[must_use]
    pub fn all_models(&self) -> &[M] {
        &self.all_models
    }

    /// Replace the backing list. Providers holding this source must refresh.
    pub fn set_all_models(&mut self, all_models: Vec<M>) {
        self.all_models = all_models;
        self.positions.set(None);
    }
}

impl<M: Clone + Record + 'static> ArrayProvider<M> {
    /// Order the list by named sort criteria before paging.
    #[must_use]
    pub fn with_sort(self, sort: Sort) -> Self {
        if sort.is_empty() {
            return self;
        }

        self.with_order(move |left, right| sort.compare(left, right))
    }

    /// Build a configured provider: id, pagination, sort criteria and key field.
    #[must_use]
    pub fn configured(all_models: Vec<M>, config: &ProviderConfig) -> DataProvider<Self> {
        let mut source = Self::new(all_models);
        if let Some(sort) = config.sort_criteria() {
            source = source.with_sort(sort.clone());
        }
        if let Some(field) = &config.key {
            source = source.with_key(KeySelector::field(field.as_str()));
        }

        DataProvider::from_config(source, config)
    }
}

impl<M: Clone> DataSource for ArrayProvider<M> {
    type Model = M;
    type Error = Error;

    const KIND: &'static str = "array";

    fn fetch_page(&mut self, window: Option<FetchWindow>) -> Result<Vec<M>, Error> {
        let mut order: Vec<usize> = (0..self.all_models.len()).collect();
        if let Some(compare) = &self.order {
            let models = &self.all_models;
            order.sort_by(|&a, &b| compare(&models[a], &models[b]));
        }

        // only a bounded page is cut; unlimited pages start at 0 anyway
        let selected = match window {
            Some(window) if window.limit.is_some() => &order[window.range(order.len())],
            _ => &order[..],
        };

        self.positions.set(Some(selected.to_vec()));

        Ok(selected
            .iter()
            .map(|&position| self.all_models[position].clone())
            .collect())
    }

    fn fetch_keys(&self, models: &[M]) -> Vec<Key> {
        // positions cover one derivation only; installed models never see them
        let positions = self.positions.take();

        if let Some(selector) = &self.key {
            return selector.keys(models);
        }

        match positions {
            Some(positions) if positions.len() == models.len() => {
                positions.into_iter().map(Key::Index).collect()
            }
            _ => (0..models.len()).map(Key::Index).collect(),
        }
    }

    fn fetch_total_count(&mut self) -> Result<usize, Error> {
        Ok(self.all_models.len())
    }
}

impl<M: fmt::Debug> fmt::Debug for ArrayProvider<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArrayProvider")
            .field("all_models", &self.all_models)
            .field("key", &self.key)
            .field("ordered", &self.order.is_some())
            .finish_non_exhaustive()
    }
}
