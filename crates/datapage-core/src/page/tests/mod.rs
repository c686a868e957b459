
use super::*;

// Calculate with a zero page window, which shows every page.
fn calc(total_count: usize, page: i64, limit: i64, sort: SortOrder) -> PageDescriptor {
    calculate(total_count, page, limit, sort, 0)
}
