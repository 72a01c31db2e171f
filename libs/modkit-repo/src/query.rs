//! Entity-agnostic query description.
//!
//! A [`Query`] collects filter conditions, sort keys, a limit and an offset.
//! Condition closures and scopes transform a `Query`; repositories turn it into
//! a `SELECT`, `UPDATE` or `DELETE` for their entity at execution time. Keeping
//! the description separate from any entity lets scopes built for one
//! repository compose with scopes from another.

use sea_orm::sea_query::{IntoCondition, SimpleExpr};
use sea_orm::{
    Condition, DeleteMany, EntityTrait, Order, QueryFilter, QueryOrder, QuerySelect, Select,
    UpdateMany,
};

use crate::order::OrderBy;
use crate::scope::Scope;

#[derive(Debug, Clone, Default)]
#[must_use]
pub struct Query {
    cond: Option<Condition>,
    order: OrderBy,
    limit: Option<i64>,
    offset: Option<i64>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// AND `cond` into the filter.
    pub fn filter<F: IntoCondition>(mut self, cond: F) -> Self {
        let cond = cond.into_condition();
        self.cond = Some(match self.cond.take() {
            Some(current) => current.add(cond),
            None => Condition::all().add(cond),
        });
        self
    }

    /// Append sort keys after those already present.
    pub fn order(mut self, order: OrderBy) -> Self {
        self.order = self.order.then(order);
        self
    }

    /// Append a single sort key.
    pub fn order_by(mut self, expr: SimpleExpr, order: Order) -> Self {
        self.order = self.order.then_by(expr, order);
        self
    }

    /// Drop all sort keys collected so far.
    pub fn clear_order(mut self) -> Self {
        self.order = OrderBy::new();
        self
    }

    /// Negative values leave the query without a LIMIT clause.
    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Negative values leave the query without an OFFSET clause.
    pub fn offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn scope(self, scope: &Scope) -> Self {
        scope.apply(self)
    }

    /// Apply `scopes` left to right.
    pub fn scopes(self, scopes: &[Scope]) -> Self {
        scopes.iter().fold(self, |q, s| s.apply(q))
    }

    #[must_use]
    pub fn condition(&self) -> Option<&Condition> {
        self.cond.as_ref()
    }

    #[must_use]
    pub fn orderings(&self) -> &OrderBy {
        &self.order
    }

    #[must_use]
    pub fn limit_value(&self) -> Option<i64> {
        self.limit
    }

    #[must_use]
    pub fn offset_value(&self) -> Option<i64> {
        self.offset
    }

    /// Effective LIMIT, `None` when unset or negative.
    #[must_use]
    pub fn effective_limit(&self) -> Option<u64> {
        self.limit.and_then(|v| u64::try_from(v).ok())
    }

    /// Effective OFFSET, `None` when unset or negative.
    #[must_use]
    pub fn effective_offset(&self) -> Option<u64> {
        self.offset.and_then(|v| u64::try_from(v).ok())
    }

    /// Add filters, sort keys, limit and offset to `select`.
    #[must_use]
    pub fn apply_to_select<E: EntityTrait>(self, select: Select<E>) -> Select<E> {
        let limit = self.effective_limit();
        let offset = self.effective_offset();

        let mut select = match self.cond {
            Some(cond) => select.filter(cond),
            None => select,
        };
        for (expr, ord) in self.order.into_keys() {
            select = select.order_by(expr, ord);
        }
        // OFFSET needs a LIMIT on some backends; "no limit" becomes the largest one.
        match (limit, offset) {
            (Some(limit), _) => select = select.limit(limit),
            (None, Some(_)) => select = select.limit(i64::MAX.unsigned_abs()),
            (None, None) => {}
        }
        if let Some(offset) = offset {
            select = select.offset(offset);
        }
        select
    }

    #[must_use]
    pub fn into_select<E: EntityTrait>(self) -> Select<E> {
        self.apply_to_select(E::find())
    }

    /// Add the filter to an UPDATE. Ordering and paging are not carried over.
    #[must_use]
    pub fn apply_to_update<E: EntityTrait>(self, update: UpdateMany<E>) -> UpdateMany<E> {
        match self.cond {
            Some(cond) => update.filter(cond),
            None => update,
        }
    }

    /// Add the filter to a DELETE. Ordering and paging are not carried over.
    #[must_use]
    pub fn apply_to_delete<E: EntityTrait>(self, delete: DeleteMany<E>) -> DeleteMany<E> {
        match self.cond {
            Some(cond) => delete.filter(cond),
            None => delete,
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use sea_orm::sea_query::Expr;
    use sea_orm::{DbBackend, QueryTrait};

    use crate::test_support::{account, cols};

    use super::*;

    fn sql(q: Query) -> String {
        q.into_select::<account::Entity>()
            .build(DbBackend::Sqlite)
            .to_string()
    }

    #[test]
    fn empty_query_selects_everything() {
        let s = sql(Query::new());
        assert!(!s.contains("WHERE"), "{s}");
        assert!(!s.contains("ORDER BY"), "{s}");
        assert!(!s.contains("LIMIT"), "{s}");
    }

    #[test]
    fn filters_are_anded() {
        let c = cols();
        let s = sql(Query::new()
            .filter(c.username.eq("u1"))
            .filter(c.age.gte(18)));
        assert!(
            s.contains("WHERE \"username\" = 'u1' AND \"age\" >= 18"),
            "{s}"
        );
    }

    #[test]
    fn negative_limit_and_offset_emit_nothing() {
        let s = sql(Query::new().limit(-1).offset(-5));
        assert!(!s.contains("LIMIT"), "{s}");
        assert!(!s.contains("OFFSET"), "{s}");
    }

    #[test]
    fn offset_without_limit_gets_unbounded_limit() {
        let expected = format!("LIMIT {} OFFSET 3", i64::MAX);
        let s = sql(Query::new().offset(3));
        assert!(s.ends_with(&expected), "{s}");
        let s = sql(Query::new().limit(-1).offset(3));
        assert!(s.ends_with(&expected), "{s}");
    }

    #[test]
    fn zero_limit_passes_through() {
        let s = sql(Query::new().limit(0));
        assert!(s.ends_with("LIMIT 0"), "{s}");
    }

    #[test]
    fn limit_and_offset_render() {
        let s = sql(Query::new().limit(2).offset(1));
        assert!(s.ends_with("LIMIT 2 OFFSET 1"), "{s}");
    }

    #[test]
    fn orderings_append_in_call_order() {
        let c = cols();
        let q = Query::new()
            .order(c.age.desc())
            .order_by(Expr::col(account::Column::Id).into(), Order::Asc);
        assert_eq!(q.orderings().len(), 2);
        let s = sql(q.clone());
        assert!(s.ends_with("ORDER BY \"age\" DESC, \"id\" ASC"), "{s}");

        let s = sql(q.clear_order().order(c.username.asc()));
        assert!(s.ends_with("ORDER BY \"username\" ASC"), "{s}");
    }

    #[test]
    fn writes_ignore_order_and_paging() {
        let c = cols();
        let q = Query::new()
            .filter(c.age.lt(10))
            .order(c.age.desc())
            .limit(3);
        let s = q
            .apply_to_delete(account::Entity::delete_many())
            .build(DbBackend::Sqlite)
            .to_string();
        assert_eq!(s, "DELETE FROM \"accounts\" WHERE \"age\" < 10");
    }

    #[test]
    fn same_inputs_render_same_sql() {
        let c = cols();
        let build = || {
            Query::new()
                .filter(c.nickname.ne("x"))
                .order(c.age.desc())
                .limit(5)
        };
        assert_eq!(sql(build()), sql(build()));
    }
}
