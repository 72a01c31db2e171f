use std::fmt;
use std::sync::Arc;

use sea_orm::EntityTrait;

use crate::order::OrderBy;
use crate::pagination::Pagination;
use crate::query::Query;
use crate::template::RepoTemplate;

/// Reusable query transformation.
///
/// Scopes are plain `Query -> Query` functions, so scopes created from
/// different repository templates compose freely.
#[derive(Clone)]
pub struct Scope(Arc<dyn Fn(Query) -> Query + Send + Sync>);

impl Scope {
    #[must_use]
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Query) -> Query + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn apply(&self, query: Query) -> Query {
        (self.0)(query)
    }

    /// One scope that applies `scopes` in order.
    #[must_use]
    pub fn chain(scopes: &[Scope]) -> Self {
        let scopes = scopes.to_vec();
        Self::new(move |q| q.scopes(&scopes))
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Scope(..)")
    }
}

impl<E, Cols> RepoTemplate<E, Cols>
where
    E: EntityTrait,
    Cols: Send + Sync + 'static,
{
    /// Scope from a condition closure over this template's descriptor.
    #[must_use]
    pub fn scope<F>(&self, cond: F) -> Scope
    where
        F: Fn(Query, &Cols) -> Query + Send + Sync + 'static,
    {
        let cols = self.shared_columns();
        Scope::new(move |q| cond(q, &cols))
    }

    #[must_use]
    pub fn where_scope<F>(&self, cond: F) -> Scope
    where
        F: Fn(Query, &Cols) -> Query + Send + Sync + 'static,
    {
        self.scope(cond)
    }

    #[must_use]
    pub fn order_scope<F>(&self, ordering: F) -> Scope
    where
        F: Fn(&Cols) -> OrderBy + Send + Sync + 'static,
    {
        let cols = self.shared_columns();
        Scope::new(move |q| q.order(ordering(&cols)))
    }

    /// Ordering followed by limit/offset from `page`.
    #[must_use]
    pub fn paginate_scope<F>(&self, ordering: F, page: Pagination) -> Scope
    where
        F: Fn(&Cols) -> OrderBy + Send + Sync + 'static,
    {
        let cols = self.shared_columns();
        Scope::new(move |q| page.apply(q.order(ordering(&cols))))
    }
}
