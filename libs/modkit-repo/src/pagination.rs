use serde::{Deserialize, Serialize};

use crate::query::Query;
use crate::scope::Scope;

/// Limit/offset window. Values are passed to the query as given: a negative
/// limit means "no limit", zero means zero rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pagination {
    pub limit: i64,
    pub offset: i64,
}

impl Pagination {
    #[must_use]
    pub fn new(limit: i64, offset: i64) -> Self {
        Self { limit, offset }
    }

    /// First `limit` rows.
    #[must_use]
    pub fn first(limit: i64) -> Self {
        Self::new(limit, 0)
    }

    /// 1-based page `number` of `size` rows.
    #[must_use]
    pub fn page(number: i64, size: i64) -> Self {
        Self::new(size, number.saturating_sub(1).saturating_mul(size))
    }

    #[must_use]
    pub fn scope(self) -> Scope {
        Scope::new(move |q| self.apply(q))
    }

    pub fn apply(self, query: Query) -> Query {
        query.limit(self.limit).offset(self.offset)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn page_numbers_are_one_based() {
        assert_eq!(Pagination::page(1, 20), Pagination::new(20, 0));
        assert_eq!(Pagination::page(3, 20), Pagination::new(20, 40));
        assert_eq!(Pagination::page(i64::MAX, 20).offset, i64::MAX);
    }

    #[test]
    fn values_pass_through_unvalidated() {
        let q = Pagination::new(0, -3).apply(Query::new());
        assert_eq!(q.limit_value(), Some(0));
        assert_eq!(q.offset_value(), Some(-3));
        assert_eq!(q.effective_offset(), None);
    }
}
