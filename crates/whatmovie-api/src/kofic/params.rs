//! KOFIC API request parameter types.

/// Page size used when listing movies.
const DEFAULT_ITEM_PER_PAGE: u32 = 100;

/// `openStartDt` value covering every year.
const OPEN_START_ALL: &str = "0000";

/// `openEndDt` value covering every year.
const OPEN_END_ALL: &str = "3000";

/// Request parameters for `searchMovieList`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieListParams {
    /// 1-based page number (`curPage`).
    pub page: u32,
    /// Page size (`itemPerPage`, default: 100).
    pub item_per_page: u32,
    /// Lower bound of the opening year (`openStartDt`, default: `"0000"`).
    pub open_start_dt: String,
    /// Upper bound of the opening year (`openEndDt`, default: `"3000"`).
    pub open_end_dt: String,
}

impl MovieListParams {
    /// Creates parameters for the given page with the all-years defaults.
    #[must_use]
    pub fn new(page: u32) -> Self {
        Self {
            page,
            item_per_page: DEFAULT_ITEM_PER_PAGE,
            open_start_dt: String::from(OPEN_START_ALL),
            open_end_dt: String::from(OPEN_END_ALL),
        }
    }

    /// Sets the page size.
    #[must_use]
    pub const fn item_per_page(mut self, item_per_page: u32) -> Self {
        self.item_per_page = item_per_page;
        self
    }

    /// Sets the lower bound of the opening year.
    #[must_use]
    pub fn open_start_dt(mut self, year: impl Into<String>) -> Self {
        self.open_start_dt = year.into();
        self
    }

    /// Sets the upper bound of the opening year.
    #[must_use]
    pub fn open_end_dt(mut self, year: impl Into<String>) -> Self {
        self.open_end_dt = year.into();
        self
    }

    /// Query pairs in the order the endpoint documents them (without `key`).
    pub(crate) fn to_query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("openStartDt", self.open_start_dt.clone()),
            ("openEndDt", self.open_end_dt.clone()),
            ("itemPerPage", self.item_per_page.to_string()),
            ("curPage", self.page.to_string()),
        ]
    }
}
