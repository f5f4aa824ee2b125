//! Filter, sort, and pagination builders for job listings.

use bson::{doc, Document, Regex};

/// Default page number for job listings.
pub const DEFAULT_PAGE: u64 = 1;

/// Default page size for job listings.
pub const DEFAULT_PAGE_SIZE: i64 = 12;

/// Sort order for job listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// `created_at` descending.
    #[default]
    Newest,
    /// `created_at` ascending.
    Oldest,
    /// `price` ascending.
    PriceAsc,
    /// `price` descending.
    PriceDesc,
    /// Store default order.
    Unordered,
}

impl SortKey {
    /// Parse a sort key from its query-string spelling. Unknown values fall
    /// through to [`SortKey::Unordered`].
    pub fn parse(value: &str) -> Self {
        match value {
            "newest" => Self::Newest,
            "oldest" => Self::Oldest,
            "price_asc" => Self::PriceAsc,
            "price_desc" => Self::PriceDesc,
            _ => Self::Unordered,
        }
    }

    /// Sort document for the store, or `None` for store default order.
    pub fn to_document(self) -> Option<Document> {
        match self {
            Self::Newest => Some(doc! { "created_at": -1 }),
            Self::Oldest => Some(doc! { "created_at": 1 }),
            Self::PriceAsc => Some(doc! { "price": 1 }),
            Self::PriceDesc => Some(doc! { "price": -1 }),
            Self::Unordered => None,
        }
    }
}

/// Skip/limit pagination window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    page: u64,
    limit: i64,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Page {
    /// Create a pagination window. Values below one are clamped to the
    /// defaults.
    pub fn new(page: u64, limit: i64) -> Self {
        Self {
            page: page.max(DEFAULT_PAGE),
            limit: if limit >= 1 { limit } else { DEFAULT_PAGE_SIZE },
        }
    }

    /// Documents to skip, saturating at `u64::MAX` for oversized windows.
    pub fn skip(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit as u64)
    }

    /// Maximum documents to return.
    pub fn limit(&self) -> i64 {
        self.limit
    }
}

/// Predicate set for the jobs collection.
///
/// Empty search terms and categories are treated as absent, so the builder
/// can be fed query parameters directly.
#[derive(Debug, Clone, Default)]
pub struct JobFilter {
    search: Option<String>,
    category: Option<String>,
    min_price: Option<f64>,
    max_price: Option<f64>,
    posted_by: Option<String>,
}

impl JobFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Case-insensitive substring match on `title` or `description`.
    pub fn search(mut self, term: impl Into<String>) -> Self {
        let term = term.into();
        if !term.is_empty() {
            self.search = Some(term);
        }
        self
    }

    /// Exact category match.
    pub fn category(mut self, category: impl Into<String>) -> Self {
        let category = category.into();
        if !category.is_empty() {
            self.category = Some(category);
        }
        self
    }

    /// Inclusive price bounds; either side may be open.
    pub fn price_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_price = min;
        self.max_price = max;
        self
    }

    /// Jobs posted by the given email.
    pub fn posted_by(mut self, email: impl Into<String>) -> Self {
        self.posted_by = Some(email.into());
        self
    }

    /// Build the store filter document.
    pub fn to_document(&self) -> Document {
        let mut filter = Document::new();

        if let Some(term) = &self.search {
            let pattern = regex::escape(term);
            let title = Regex {
                pattern: pattern.clone(),
                options: "i".to_string(),
            };
            let description = Regex {
                pattern,
                options: "i".to_string(),
            };
            filter.insert(
                "$or",
                vec![doc! { "title": title }, doc! { "description": description }],
            );
        }

        if let Some(category) = &self.category {
            filter.insert("category", category);
        }

        let mut price = Document::new();
        if let Some(min) = self.min_price {
            price.insert("$gte", min);
        }
        if let Some(max) = self.max_price {
            price.insert("$lte", max);
        }
        if !price.is_empty() {
            filter.insert("price", price);
        }

        if let Some(email) = &self.posted_by {
            filter.insert("postedByEmail", email);
        }

        filter
    }
}
