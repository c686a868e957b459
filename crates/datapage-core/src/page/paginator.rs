use crate::{
    config::{DEFAULT_LIMIT, DEFAULT_PAGE_WINDOW, PaginationConfig},
    error::Error,
    obs::sink::{self, MetricsEvent},
    page::{
        FieldValue, LinkRel, PageDescriptor, PageField, SortOrder, UrlBuilder, calculate,
    },
};
use std::{cell::OnceCell, collections::BTreeMap, fmt};

///
/// Paginator
///
/// Mutable pagination inputs plus a memoized [`PageDescriptor`].
///
/// Setters only empty the cache. Every derived read goes through
/// `ensure_calculated`, which runs the calculator at most once per
/// change of inputs.
///

pub struct Paginator {
    total_count: usize,
    page: i64,
    limit: i64,
    sort: SortOrder,
    page_window: usize,
    default_limit: i64,
    limit_bounds: Option<[usize; 2]>,
    page_param: String,
    limit_param: String,
    url_builder: Option<Box<dyn UrlBuilder>>,
    calculated: OnceCell<PageDescriptor>,
}

impl Paginator {
    #[must_use]
    pub fn new() -> Self {
        Self::from_config(&PaginationConfig::default())
    }

    #[must_use]
    pub fn from_config(config: &PaginationConfig) -> Self {
        Self {
            total_count: 0,
            page: config.page,
            limit: config.limit,
            sort: config.sort,
            page_window: config.page_window,
            default_limit: DEFAULT_LIMIT,
            limit_bounds: config.limit_bounds,
            page_param: config.page_param.clone(),
            limit_param: config.limit_param.clone(),
            url_builder: None,
            calculated: OnceCell::new(),
        }
    }

    /// Attach the collaborator used to build navigation links.
    #[must_use]
    pub fn with_url_builder(mut self, builder: impl UrlBuilder + 'static) -> Self {
        self.url_builder = Some(Box::new(builder));
        self
    }

    #[must_use]
    pub fn with_limit(mut self, limit: i64) -> Self {
        self.set_limit(limit);
        self
    }

    #[must_use]
    pub fn with_page(mut self, page: i64) -> Self {
        self.set_page(page);
        self
    }

    #[must_use]
    pub fn with_sort(mut self, sort: SortOrder) -> Self {
        self.set_sort(sort);
        self
    }

    #[must_use]
    pub fn with_page_window(mut self, page_window: usize) -> Self {
        self.set_page_window(page_window);
        self
    }

    // ------------------------------------------------------------------
    // Inputs
    // ------------------------------------------------------------------

    pub fn set_total_count(&mut self, total_count: usize) {
        self.total_count = total_count;
        self.invalidate();
    }

    /// Request a zero-based page; out-of-range values are clamped on read.
    pub fn set_page(&mut self, page: i64) {
        self.page = page;
        self.invalidate();
    }

    /// Set items per page; `<= 0` means unlimited.
    pub fn set_limit(&mut self, limit: i64) {
        self.limit = limit;
        self.invalidate();
    }

    pub fn set_sort(&mut self, sort: SortOrder) {
        self.sort = sort;
        self.invalidate();
    }

    pub fn set_page_window(&mut self, page_window: usize) {
        self.page_window = page_window;
        self.invalidate();
    }

    pub fn set_limit_bounds(&mut self, bounds: Option<[usize; 2]>) {
        self.limit_bounds = bounds;
        self.invalidate();
    }

    pub fn set_url_builder(&mut self, builder: Option<Box<dyn UrlBuilder>>) {
        self.url_builder = builder;
    }

    #[must_use]
    pub const fn total_count(&self) -> usize {
        self.total_count
    }

    /// The page as requested, before clamping.
    #[must_use]
    pub const fn requested_page(&self) -> i64 {
        self.page
    }

    /// The limit as requested, before bounds are applied.
    #[must_use]
    pub const fn requested_limit(&self) -> i64 {
        self.limit
    }

    #[must_use]
    pub const fn sort(&self) -> SortOrder {
        self.sort
    }

    #[must_use]
    pub const fn page_window(&self) -> usize {
        self.page_window
    }

    #[must_use]
    pub fn page_param(&self) -> &str {
        &self.page_param
    }

    #[must_use]
    pub fn limit_param(&self) -> &str {
        &self.limit_param
    }

    /// Whether pages hold a bounded number of items.
    #[must_use]
    pub fn is_bounded(&self) -> bool {
        self.effective_limit() > 0
    }

    /// Reset one input field to its default.
    ///
    /// Computed fields are derived from the inputs and cannot be unset.
    pub fn unset(&mut self, field: &str) -> Result<(), Error> {
        match field {
            "total_count" => self.set_total_count(0),
            "page" => self.set_page(0),
            "limit" => self.set_limit(self.default_limit),
            "sort" => self.set_sort(SortOrder::default()),
            "page_window" => self.set_page_window(DEFAULT_PAGE_WINDOW),
            "limit_bounds" => self.set_limit_bounds(None),
            other => {
                let computed: PageField = other.parse()?;
                return Err(Error::read_only(computed.as_str()));
            }
        }

        Ok(())
    }

    // ------------------------------------------------------------------
    // Derived
    // ------------------------------------------------------------------

    /// Whether the derived fields are current for the inputs.
    #[must_use]
    pub fn is_calculated(&self) -> bool {
        self.calculated.get().is_some()
    }

    /// Discard the cache and calculate again.
    pub fn recalculate(&mut self) -> &PageDescriptor {
        self.invalidate();
        self.ensure_calculated()
    }

    /// The full derived snapshot.
    #[must_use]
    pub fn descriptor(&self) -> &PageDescriptor {
        self.ensure_calculated()
    }

    /// Read one derived field by name.
    #[must_use]
    pub fn field(&self, field: PageField) -> FieldValue {
        self.ensure_calculated().get(field)
    }

    /// Zero-based current page after clamping.
    #[must_use]
    pub fn page(&self) -> usize {
        self.ensure_calculated().page_current
    }

    #[must_use]
    pub fn offset(&self) -> usize {
        self.ensure_calculated().offset
    }

    /// Effective items per page; the total count when unlimited.
    #[must_use]
    pub fn limit(&self) -> usize {
        self.ensure_calculated().limit
    }

    #[must_use]
    pub fn page_count(&self) -> usize {
        self.ensure_calculated().page_count
    }

    #[must_use]
    pub fn page_start(&self) -> Option<usize> {
        self.ensure_calculated().page_start
    }

    #[must_use]
    pub fn page_end(&self) -> Option<usize> {
        self.ensure_calculated().page_end
    }

    #[must_use]
    pub fn page_first(&self) -> usize {
        self.ensure_calculated().page_first
    }

    #[must_use]
    pub fn page_last(&self) -> usize {
        self.ensure_calculated().page_last
    }

    #[must_use]
    pub fn page_prev(&self) -> Option<usize> {
        self.ensure_calculated().page_prev
    }

    #[must_use]
    pub fn page_next(&self) -> Option<usize> {
        self.ensure_calculated().page_next
    }

    #[must_use]
    pub fn page_display(&self) -> &[usize] {
        self.ensure_calculated().page_display.as_slice()
    }

    #[must_use]
    pub fn count_more(&self) -> usize {
        self.ensure_calculated().count_more
    }

    // ------------------------------------------------------------------
    // Links
    // ------------------------------------------------------------------

    /// Build the URL for a zero-based page.
    ///
    /// The page travels one-based under the page parameter; the limit is
    /// added only when it differs from the default. Without a URL builder
    /// the link is empty.
    #[must_use]
    pub fn create_link(&self, page: usize, absolute: bool) -> String {
        let Some(builder) = self.url_builder.as_deref() else {
            return String::new();
        };

        let mut params = vec![(
            self.page_param.clone(),
            page.saturating_add(1).to_string(),
        )];
        let limit = self.effective_limit();
        if limit != self.default_limit {
            params.push((self.limit_param.clone(), limit.to_string()));
        }

        builder.build(&params, absolute)
    }

    /// Navigation links keyed by relation; absent neighbours map to "".
    #[must_use]
    pub fn links(&self, absolute: bool) -> BTreeMap<LinkRel, String> {
        let descriptor = self.ensure_calculated();
        let link = |page: Option<usize>| {
            page.map(|page| self.create_link(page, absolute))
                .unwrap_or_default()
        };

        LinkRel::ALL
            .into_iter()
            .map(|rel| {
                let url = match rel {
                    LinkRel::Current => link(Some(descriptor.page_current)),
                    LinkRel::First => link(Some(descriptor.page_first)),
                    LinkRel::Prev => link(descriptor.page_prev),
                    LinkRel::Next => link(descriptor.page_next),
                    LinkRel::Last => link(Some(descriptor.page_last)),
                };

                (rel, url)
            })
            .collect()
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn invalidate(&mut self) {
        self.calculated.take();
    }

    // Requested limit with bounds applied to positive values.
    fn effective_limit(&self) -> i64 {
        match self.limit_bounds {
            Some([a, b]) if self.limit > 0 => {
                let min = i64::try_from(a.min(b)).unwrap_or(i64::MAX);
                let max = i64::try_from(a.max(b)).unwrap_or(i64::MAX);

                self.limit.clamp(min, max)
            }
            _ => self.limit,
        }
    }

    fn ensure_calculated(&self) -> &PageDescriptor {
        self.calculated.get_or_init(|| {
            let descriptor = calculate(
                self.total_count,
                self.page,
                self.effective_limit(),
                self.sort,
                self.page_window,
            );

            tracing::debug!(
                total_count = self.total_count,
                page = descriptor.page_current,
                offset = descriptor.offset,
                limit = descriptor.limit,
                page_count = descriptor.page_count,
                "pagination recalculated"
            );
            sink::record(MetricsEvent::PageCalculated {
                page_count: sink::count(descriptor.page_count),
            });

            descriptor
        })
    }
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Paginator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Paginator")
            .field("total_count", &self.total_count)
            .field("page", &self.page)
            .field("limit", &self.limit)
            .field("sort", &self.sort)
            .field("page_window", &self.page_window)
            .field("limit_bounds", &self.limit_bounds)
            .field("url_builder", &self.url_builder.is_some())
            .field("calculated", &self.calculated.get())
            .finish()
    }
}
