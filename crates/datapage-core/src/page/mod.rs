//! Module: page
//! Responsibility: page arithmetic, memoized paginator state, navigation links.
//! Does not own: fetching records or building URLs.
//! Boundary: `calculate` is pure; `Paginator` is the only stateful type.

mod calculator;
mod direction;
mod link;
mod paginator;

#[cfg(test)]
mod tests;

pub use calculator::{FieldValue, PageDescriptor, PageDisplay, PageField, calculate};
pub use direction::SortOrder;
pub use link::{LinkRel, UrlBuilder};
pub use paginator::Paginator;
