//! ## Crate layout
//! - `core`: page arithmetic, the memoized paginator, data providers,
//!   configuration and observability.
//!
//! The `prelude` module carries the vocabulary needed to list records:
//! providers, the paginator, keys, values and sort criteria.

pub use datapage_core as core;

/// re-exports
///
/// downstream `Record` and `Query` impls can derive serde through here
/// without naming it in their own Cargo.toml
pub mod __reexports {
    pub use serde;
}

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use core::error::Error;

///
/// Prelude
/// using _ brings traits into scope and avoids name conflicts
///

pub mod prelude {
    pub use crate::core::{
        config::{PaginationConfig, ProviderConfig, Setting},
        key::{Key, KeySelector},
        page::{LinkRel, PageDescriptor, PageField, Paginator, SortOrder, UrlBuilder as _},
        provider::{ArrayProvider, DataProvider, DataSource, FetchWindow, Query, QueryProvider},
        sort::{Sort, SortTerm},
        value::{Record, Value},
    };
    pub use serde::{Deserialize, Serialize};
}
