//! Core runtime for datapage: page arithmetic, the memoized paginator, and
//! lazy data providers over in-memory lists or live queries.

// public exports are one module level down
pub mod config;
pub mod error;
pub mod key;
pub mod obs;
pub mod page;
pub mod provider;
pub mod sort;
pub mod value;

// test
#[cfg(test)]
pub(crate) mod test_support;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, metrics, or configuration parsing are re-exported here.
///

pub mod prelude {
    pub use crate::{
        key::{Key, KeySelector},
        page::{Paginator, SortOrder},
        provider::{ArrayProvider, DataProvider, DataSource, Query, QueryProvider},
        sort::Sort,
        value::{Record, Value},
    };
}
