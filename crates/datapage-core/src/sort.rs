use crate::{page::SortOrder, value::Record};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

///
/// SortTerm
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SortTerm {
    pub field: String,
    #[serde(default)]
    pub order: SortOrder,
}

impl SortTerm {
    pub fn new(field: impl Into<String>, order: SortOrder) -> Self {
        Self {
            field: field.into(),
            order,
        }
    }
}

///
/// Sort
///
/// Ordered list of sort criteria consulted by providers.
/// Earlier terms take precedence; ties fall through to later terms.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Sort {
    #[serde(default)]
    pub orders: Vec<SortTerm>,
}

impl Sort {
    #[must_use]
    pub const fn new() -> Self {
        Self { orders: Vec::new() }
    }

    #[must_use]
    pub fn asc(mut self, field: impl Into<String>) -> Self {
        self.orders.push(SortTerm::new(field, SortOrder::Asc));
        self
    }

    #[must_use]
    pub fn desc(mut self, field: impl Into<String>) -> Self {
        self.orders.push(SortTerm::new(field, SortOrder::Desc));
        self
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Compare two records under these criteria; missing fields read as null.
    #[must_use]
    pub fn compare<R: Record + ?Sized>(&self, left: &R, right: &R) -> Ordering {
        self.orders
            .iter()
            .map(|term| {
                let l = left.field(&term.field).unwrap_or_default();
                let r = right.field(&term.field).unwrap_or_default();

                term.order.apply(l.cmp(&r))
            })
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

///
/// TESTS
///
