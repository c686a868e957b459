use crate::{
    error::Error,
    provider::Query,
    sort::{Sort, SortTerm},
    value::{Record, Value},
};
use std::{
    cell::{Cell, RefCell},
    collections::BTreeMap,
    rc::Rc,
};
use thiserror::Error as ThisError;

pub(crate) type Row = BTreeMap<String, Value>;

/// Build one row from `(field, value)` pairs.
pub(crate) fn row<const N: usize>(fields: [(&str, Value); N]) -> Row {
    fields
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect()
}

/// `count` rows with `id` 0.. and a `name` of `item-{id}`.
pub(crate) fn numbered_rows(count: u64) -> Vec<Row> {
    (0..count)
        .map(|id| {
            row([
                ("id", Value::Uint(id)),
                ("name", Value::Text(format!("item-{id}"))),
            ])
        })
        .collect()
}

///
/// MemoryQueryError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub(crate) enum MemoryQueryError {
    #[error(transparent)]
    Core(#[from] Error),

    #[error("backend unavailable")]
    Unavailable,
}

///
/// QueryLog
///
/// Shared record of what the in-memory backend was asked to run.
///

#[derive(Debug, Default)]
pub(crate) struct QueryLog {
    pub(crate) all_calls: Cell<usize>,
    pub(crate) count_calls: Cell<usize>,
    pub(crate) last_window: Cell<Option<(Option<usize>, usize)>>,
    pub(crate) last_count_order: RefCell<Vec<SortTerm>>,
    pub(crate) fail: Cell<bool>,
}

///
/// MemoryQuery
///
/// In-memory `Query` over shared rows with limit/offset/order support.
///

#[derive(Clone, Debug)]
pub(crate) struct MemoryQuery {
    rows: Rc<Vec<Row>>,
    limit: Option<usize>,
    offset: usize,
    order: Vec<SortTerm>,
    primary_key: Vec<String>,
    pub(crate) log: Rc<QueryLog>,
}

impl MemoryQuery {
    pub(crate) fn new(rows: Vec<Row>) -> Self {
        Self {
            rows: Rc::new(rows),
            limit: None,
            offset: 0,
            order: Vec::new(),
            primary_key: Vec::new(),
            log: Rc::new(QueryLog::default()),
        }
    }

    pub(crate) fn with_primary_key(mut self, columns: &[&str]) -> Self {
        self.primary_key = columns.iter().map(ToString::to_string).collect();
        self
    }

    pub(crate) fn with_order(mut self, terms: Vec<SortTerm>) -> Self {
        self.order = terms;
        self
    }
}

impl Query for MemoryQuery {
    type Row = Row;
    type Error = MemoryQueryError;

    fn set_limit(&mut self, limit: Option<usize>) {
        self.limit = limit;
    }

    fn set_offset(&mut self, offset: usize) {
        self.offset = offset;
    }

    fn add_order_by(&mut self, terms: &[SortTerm]) {
        self.order.extend_from_slice(terms);
    }

    fn clear_order(&mut self) {
        self.order.clear();
    }

    fn primary_key(&self) -> &[String] {
        &self.primary_key
    }

    fn all(&self) -> Result<Vec<Row>, MemoryQueryError> {
        self.log.all_calls.set(self.log.all_calls.get() + 1);
        self.log.last_window.set(Some((self.limit, self.offset)));
        if self.log.fail.get() {
            return Err(MemoryQueryError::Unavailable);
        }

        let mut rows: Vec<&Row> = self.rows.iter().collect();
        let sort = Sort {
            orders: self.order.clone(),
        };
        rows.sort_by(|a, b| sort.compare(*a, *b));

        Ok(rows
            .into_iter()
            .skip(self.offset)
            .take(self.limit.unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }

    fn count(&self) -> Result<usize, MemoryQueryError> {
        self.log.count_calls.set(self.log.count_calls.get() + 1);
        self.log.last_count_order.replace(self.order.clone());
        if self.log.fail.get() {
            return Err(MemoryQueryError::Unavailable);
        }

        let remaining = self.rows.len().saturating_sub(self.offset);

        Ok(self.limit.map_or(remaining, |limit| remaining.min(limit)))
    }
}

/// Read a text field from a row, for assertions.
pub(crate) fn text(row: &Row, field: &str) -> String {
    row.field(field)
        .and_then(|value| value.as_text().map(str::to_string))
        .unwrap_or_default()
}
