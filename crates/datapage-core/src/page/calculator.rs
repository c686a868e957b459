use crate::{error::Error, page::SortOrder};
use derive_more::{Deref, IntoIterator};
use serde::Serialize;
use std::{fmt, str::FromStr};

///
/// PageDisplay
///
/// Consecutive page indices exposed for rendering navigation.
///

#[derive(Clone, Debug, Default, Deref, Eq, IntoIterator, PartialEq, Serialize)]
#[into_iterator(owned, ref)]
pub struct PageDisplay(Vec<usize>);

impl PageDisplay {
    #[must_use]
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }
}

///
/// PageDescriptor
///
/// Complete navigation state for one (total, page, limit, sort, window) tuple.
/// Produced only by [`calculate`], so every field agrees with every other.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct PageDescriptor {
    pub offset: usize,
    /// Effective items per page; equals the total count when unlimited.
    pub limit: usize,
    pub page_current: usize,
    /// First absolute item index on the page, absent for an empty page.
    pub page_start: Option<usize>,
    /// Last absolute item index on the page, absent for an empty page.
    pub page_end: Option<usize>,
    pub page_first: usize,
    pub page_last: usize,
    pub page_prev: Option<usize>,
    pub page_next: Option<usize>,
    pub page_count: usize,
    pub page_display: PageDisplay,
    /// Items beyond the current page toward the end not yet shown.
    pub count_more: usize,
}

impl PageDescriptor {
    /// Number of items that fall on the current page.
    #[must_use]
    pub fn page_size(&self) -> usize {
        match (self.page_start, self.page_end) {
            (Some(start), Some(end)) => end - start + 1,
            _ => 0,
        }
    }

    /// Read one computed field by name.
    #[must_use]
    pub fn get(&self, field: PageField) -> FieldValue {
        match field {
            PageField::Offset => FieldValue::Number(self.offset),
            PageField::Limit => FieldValue::Number(self.limit),
            PageField::PageCurrent => FieldValue::Number(self.page_current),
            PageField::PageStart => self.page_start.into(),
            PageField::PageEnd => self.page_end.into(),
            PageField::PageFirst => FieldValue::Number(self.page_first),
            PageField::PageLast => FieldValue::Number(self.page_last),
            PageField::PagePrev => self.page_prev.into(),
            PageField::PageNext => self.page_next.into(),
            PageField::PageCount => FieldValue::Number(self.page_count),
            PageField::PageDisplay => FieldValue::Pages(self.page_display.to_vec()),
            PageField::CountMore => FieldValue::Number(self.count_more),
        }
    }
}

///
/// PageField
///
/// Names of the computed pagination fields.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum PageField {
    Offset,
    Limit,
    PageCurrent,
    PageStart,
    PageEnd,
    PageFirst,
    PageLast,
    PagePrev,
    PageNext,
    PageCount,
    PageDisplay,
    CountMore,
}

impl PageField {
    pub const ALL: [Self; 12] = [
        Self::Offset,
        Self::Limit,
        Self::PageCurrent,
        Self::PageStart,
        Self::PageEnd,
        Self::PageFirst,
        Self::PageLast,
        Self::PagePrev,
        Self::PageNext,
        Self::PageCount,
        Self::PageDisplay,
        Self::CountMore,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Offset => "offset",
            Self::Limit => "limit",
            Self::PageCurrent => "page_current",
            Self::PageStart => "page_start",
            Self::PageEnd => "page_end",
            Self::PageFirst => "page_first",
            Self::PageLast => "page_last",
            Self::PagePrev => "page_prev",
            Self::PageNext => "page_next",
            Self::PageCount => "page_count",
            Self::PageDisplay => "page_display",
            Self::CountMore => "count_more",
        }
    }
}

impl fmt::Display for PageField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PageField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| Error::invalid_configuration(format!("unknown pagination field '{s}'")))
    }
}

///
/// FieldValue
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FieldValue {
    Number(usize),
    Absent,
    Pages(Vec<usize>),
}

impl From<Option<usize>> for FieldValue {
    fn from(value: Option<usize>) -> Self {
        value.map_or(Self::Absent, Self::Number)
    }
}

/// Compute the navigation descriptor for one page request.
///
/// `limit <= 0` means unlimited. A negative `page` is treated as 0, and any
/// page past the end is clamped to the last page. `page_window == 0` shows
/// every page.
#[must_use]
pub fn calculate(
    total_count: usize,
    page: i64,
    limit: i64,
    sort: SortOrder,
    page_window: usize,
) -> PageDescriptor {
    let requested = usize::try_from(page).unwrap_or(0);

    match usize::try_from(limit).ok().filter(|limit| *limit > 0) {
        Some(limit) => bounded(total_count, requested, limit, sort, page_window),
        None => unbounded(total_count, page_window),
    }
}

fn bounded(
    total_count: usize,
    requested: usize,
    limit: usize,
    sort: SortOrder,
    page_window: usize,
) -> PageDescriptor {
    let page_count = total_count.div_ceil(limit);
    let page_last = page_count.saturating_sub(1);
    let page = requested.min(page_last);

    let block = match sort {
        SortOrder::Asc => page,
        SortOrder::Desc => page_last.saturating_sub(page),
    };
    let offset = block.saturating_mul(limit);
    let page_end_exclusive = offset.saturating_add(limit).min(total_count);
    let (page_start, page_end) = span(offset, page_end_exclusive);

    // items on the side of the range that later pages move toward
    let count_more = match sort {
        SortOrder::Asc => total_count.saturating_sub(offset.saturating_add(limit)),
        SortOrder::Desc => offset.min(total_count),
    };

    PageDescriptor {
        offset,
        limit,
        page_current: page,
        page_start,
        page_end,
        page_first: 0,
        page_last,
        page_prev: page.checked_sub(1),
        page_next: (page < page_last).then_some(page + 1),
        page_count,
        page_display: display_window(page, page_count, page_window),
        count_more,
    }
}

fn unbounded(total_count: usize, page_window: usize) -> PageDescriptor {
    let page_count = usize::from(total_count > 0);
    let (page_start, page_end) = span(0, total_count);

    PageDescriptor {
        offset: 0,
        limit: total_count,
        page_current: 0,
        page_start,
        page_end,
        page_first: 0,
        page_last: 0,
        page_prev: None,
        page_next: None,
        page_count,
        page_display: display_window(0, page_count, page_window),
        count_more: 0,
    }
}

// Inclusive item span for `start..end`, absent when empty.
const fn span(start: usize, end: usize) -> (Option<usize>, Option<usize>) {
    if end > start {
        (Some(start), Some(end - 1))
    } else {
        (None, None)
    }
}

// Window of `min(page_window, page_count)` pages around `page`, kept in range.
fn display_window(page: usize, page_count: usize, page_window: usize) -> PageDisplay {
    if page_count == 0 {
        return PageDisplay::default();
    }

    let size = if page_window == 0 {
        page_count
    } else {
        page_window.min(page_count)
    };
    let start = page.saturating_sub(size / 2).min(page_count - size);

    PageDisplay((start..start + size).collect())
}
