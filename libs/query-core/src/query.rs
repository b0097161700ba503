use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "asc" => Some(SortOrder::Asc),
            "desc" => Some(SortOrder::Desc),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// A query that passed validation, with defaults applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedQuery {
    /// `None` means no upper bound on the page size.
    pub limit: Option<usize>,
    /// 1-based page number.
    pub page: usize,
    pub sort: Option<String>,
    pub order: SortOrder,
    /// Fields to keep in every returned record.
    pub fields: Vec<String>,
    filters: Map<String, Value>,
}

impl ValidatedQuery {
    pub(crate) fn new(
        limit: Option<usize>,
        page: usize,
        sort: Option<String>,
        order: SortOrder,
        fields: Vec<String>,
        filters: Map<String, Value>,
    ) -> Self {
        Self {
            limit,
            page,
            sort,
            order,
            fields,
            filters,
        }
    }

    /// Coerced value of a resource-specific parameter, including defaults.
    pub fn filter(&self, name: &str) -> Option<&Value> {
        self.filters.get(name)
    }

    pub fn filters(&self) -> &Map<String, Value> {
        &self.filters
    }

    /// Deserialize the resource-specific parameters into a typed struct.
    pub fn filters_as<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(Value::Object(self.filters.clone()))
    }

    /// Index range of the requested page within a collection of `len` items.
    pub fn window(&self, len: usize) -> std::ops::Range<usize> {
        let Some(limit) = self.limit else {
            return 0..len;
        };
        let start = limit.saturating_mul(self.page.saturating_sub(1)).min(len);
        let end = start.saturating_add(limit).min(len);
        start..end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(limit: Option<usize>, page: usize) -> ValidatedQuery {
        ValidatedQuery::new(limit, page, None, SortOrder::Asc, Vec::new(), Map::new())
    }

    #[test]
    fn window_without_limit_covers_everything() {
        assert_eq!(query(None, 1).window(7), 0..7);
        assert_eq!(query(None, 3).window(7), 0..7);
    }

    #[test]
    fn window_pages_through() {
        assert_eq!(query(Some(3), 1).window(7), 0..3);
        assert_eq!(query(Some(3), 3).window(7), 6..7);
        assert_eq!(query(Some(3), 4).window(7), 7..7);
    }

    #[test]
    fn order_parses() {
        assert_eq!(SortOrder::parse("desc"), Some(SortOrder::Desc));
        assert_eq!(SortOrder::parse("DESC"), None);
        assert_eq!(SortOrder::default().as_str(), "asc");
    }
}
