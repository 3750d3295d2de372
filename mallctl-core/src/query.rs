//! Goods listing: filters, sort whitelist and paging

use serde::{Deserialize, Serialize};

use crate::validation::ValidationError;

/// Maximum rows per page
const MAX_LIMIT: u32 = 100;

/// Default rows per page
const DEFAULT_LIMIT: u32 = 10;

/// Sortable goods columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    AddTime,
    Id,
}

impl SortField {
    /// Column name, safe to splice into SQL.
    pub fn column(self) -> &'static str {
        match self {
            Self::AddTime => "add_time",
            Self::Id => "id",
        }
    }

    fn parse(s: &str) -> Result<Self, ValidationError> {
        match s {
            "add_time" => Ok(Self::AddTime),
            "id" => Ok(Self::Id),
            other => Err(ValidationError::InvalidVariant {
                field: "sort",
                value: other.to_owned(),
            }),
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }

    fn parse(s: &str) -> Result<Self, ValidationError> {
        match s {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(ValidationError::InvalidVariant {
                field: "order",
                value: other.to_owned(),
            }),
        }
    }
}

/// Raw query string of the list endpoint
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub goods_sn: Option<String>,
    pub name: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub sort: Option<String>,
    pub order: Option<String>,
}

/// Validated goods list query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoodsQuery {
    /// Exact SKU match
    pub goods_sn: Option<String>,
    /// Case-insensitive substring of the name
    pub name: Option<String>,
    /// Page number (1-indexed)
    pub page: u32,
    /// Rows per page (max 100)
    pub limit: u32,
    pub sort: SortField,
    pub order: SortOrder,
}

impl GoodsQuery {
    /// Calculate SQL OFFSET value.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }

    /// Does a record with this SKU and name pass the filters?
    pub fn matches(&self, goods_sn: &str, name: &str) -> bool {
        let sn_ok = self.goods_sn.as_deref().map_or(true, |sn| sn == goods_sn);
        let name_ok = self
            .name
            .as_deref()
            .map_or(true, |n| name.to_lowercase().contains(&n.to_lowercase()));
        sn_ok && name_ok
    }
}

impl Default for GoodsQuery {
    fn default() -> Self {
        Self {
            goods_sn: None,
            name: None,
            page: 1,
            limit: DEFAULT_LIMIT,
            sort: SortField::default(),
            order: SortOrder::default(),
        }
    }
}

impl TryFrom<ListParams> for GoodsQuery {
    type Error = ValidationError;

    /// - Page is clamped to a minimum of 1
    /// - Limit is clamped to 1..=100
    /// - Empty filter strings are treated as absent
    fn try_from(params: ListParams) -> Result<Self, Self::Error> {
        let sort = match params.sort.as_deref() {
            None | Some("") => SortField::default(),
            Some(s) => SortField::parse(s)?,
        };
        let order = match params.order.as_deref() {
            None | Some("") => SortOrder::default(),
            Some(s) => SortOrder::parse(s)?,
        };

        Ok(Self {
            goods_sn: params.goods_sn.filter(|s| !s.is_empty()),
            name: params.name.filter(|s| !s.is_empty()),
            page: params.page.unwrap_or(1).max(1),
            limit: params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT),
            sort,
            order,
        })
    }
}

/// Paged list payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Rows of the current page
    pub list: Vec<T>,
    /// Total matching rows across all pages
    pub total: i64,
    pub page: u32,
    pub limit: u32,
    /// Number of pages; 0 when nothing matched
    pub pages: u32,
}

impl<T> Page<T> {
    pub fn new(list: Vec<T>, total: i64, query: &GoodsQuery) -> Self {
        let total_rows = u64::try_from(total).unwrap_or(0);
        let limit = u64::from(query.limit.max(1));
        let pages = u32::try_from(total_rows.div_ceil(limit)).unwrap_or(u32::MAX);
        Self {
            list,
            total,
            page: query.page,
            limit: query.limit,
            pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(sort: Option<&str>, order: Option<&str>) -> ListParams {
        ListParams {
            sort: sort.map(str::to_owned),
            order: order.map(str::to_owned),
            ..ListParams::default()
        }
    }

    #[test]
    fn defaults() {
        let q = GoodsQuery::try_from(ListParams::default()).unwrap();
        assert_eq!(q, GoodsQuery::default());
        assert_eq!(q.limit, 10);
        assert_eq!(q.sort.column(), "add_time");
        assert_eq!(q.order.keyword(), "DESC");
    }

    #[test]
    fn offset_calculation() {
        let q = GoodsQuery {
            page: 3,
            limit: 25,
            ..GoodsQuery::default()
        };
        assert_eq!(q.offset(), 50);
        assert_eq!(GoodsQuery::default().offset(), 0);
    }

    #[test]
    fn clamps_page_and_limit() {
        let q = GoodsQuery::try_from(ListParams {
            page: Some(0),
            limit: Some(999),
            ..ListParams::default()
        })
        .unwrap();
        assert_eq!(q.page, 1);
        assert_eq!(q.limit, 100);

        let q = GoodsQuery::try_from(ListParams {
            limit: Some(0),
            ..ListParams::default()
        })
        .unwrap();
        assert_eq!(q.limit, 1);
    }

    #[test]
    fn accepts_whitelisted_sort() {
        let q = GoodsQuery::try_from(params(Some("id"), Some("asc"))).unwrap();
        assert_eq!(q.sort, SortField::Id);
        assert_eq!(q.order, SortOrder::Asc);
    }

    #[test]
    fn rejects_unknown_sort_column() {
        let err = GoodsQuery::try_from(params(Some("retail_price; DROP"), None)).unwrap_err();
        assert_eq!(err.errno(), 402);
        assert_eq!(err.field(), "sort");
    }

    #[test]
    fn rejects_unknown_order() {
        let err = GoodsQuery::try_from(params(None, Some("sideways"))).unwrap_err();
        assert_eq!(err.field(), "order");
    }

    #[test]
    fn empty_filters_are_ignored() {
        let q = GoodsQuery::try_from(ListParams {
            goods_sn: Some(String::new()),
            name: Some(String::new()),
            ..ListParams::default()
        })
        .unwrap();
        assert_eq!(q.goods_sn, None);
        assert_eq!(q.name, None);
    }

    #[test]
    fn filter_matching() {
        let q = GoodsQuery {
            goods_sn: Some("SN-1".into()),
            name: Some("shirt".into()),
            ..GoodsQuery::default()
        };
        assert!(q.matches("SN-1", "Linen Shirt"));
        assert!(!q.matches("SN-2", "Linen Shirt"));
        assert!(!q.matches("SN-1", "Mug"));
        assert!(GoodsQuery::default().matches("anything", "at all"));
    }

    #[test]
    fn page_count() {
        let q = GoodsQuery::default();
        assert_eq!(Page::<()>::new(vec![], 0, &q).pages, 0);
        assert_eq!(Page::<()>::new(vec![], 10, &q).pages, 1);
        assert_eq!(Page::<()>::new(vec![], 11, &q).pages, 2);
        assert_eq!(Page::<()>::new(vec![], 25, &q).limit, 10);
    }
}
