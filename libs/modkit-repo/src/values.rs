use std::fmt;

use sea_orm::sea_query::SimpleExpr;
use sea_orm::{EntityTrait, IdenStatic, UpdateMany};

/// One `column = expression` assignment of an UPDATE.
pub struct ColumnValue<E: EntityTrait> {
    column: E::Column,
    expr: SimpleExpr,
}

impl<E: EntityTrait> ColumnValue<E> {
    #[must_use]
    pub fn new(column: E::Column, expr: SimpleExpr) -> Self {
        Self { column, expr }
    }

    #[must_use]
    pub fn column(&self) -> E::Column {
        self.column
    }

    #[must_use]
    pub fn expr(&self) -> &SimpleExpr {
        &self.expr
    }

    /// Column name without table qualification.
    #[must_use]
    pub fn name(&self) -> &str {
        IdenStatic::as_str(&self.column)
    }
}

impl<E: EntityTrait> Clone for ColumnValue<E> {
    fn clone(&self) -> Self {
        Self {
            column: self.column,
            expr: self.expr.clone(),
        }
    }
}

impl<E: EntityTrait> fmt::Debug for ColumnValue<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnValue")
            .field("column", &self.name())
            .field("expr", &self.expr)
            .finish()
    }
}

/// Ordered set of assignments; each column appears at most once.
#[must_use]
pub struct ColumnValues<E: EntityTrait> {
    items: Vec<ColumnValue<E>>,
}

impl<E: EntityTrait> ColumnValues<E> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Add an assignment. Assigning a column twice keeps its original
    /// position and the newest expression.
    pub fn with(mut self, value: ColumnValue<E>) -> Self {
        match self.items.iter_mut().find(|v| v.name() == value.name()) {
            Some(slot) => slot.expr = value.expr,
            None => self.items.push(value),
        }
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColumnValue<E>> {
        self.items.iter()
    }

    /// Add every assignment to `update` as `SET column = expr`.
    #[must_use]
    pub fn apply_to(self, update: UpdateMany<E>) -> UpdateMany<E> {
        self.items
            .into_iter()
            .fold(update, |update, v| update.col_expr(v.column, v.expr))
    }
}

impl<E: EntityTrait> Default for ColumnValues<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: EntityTrait> Clone for ColumnValues<E> {
    fn clone(&self) -> Self {
        Self {
            items: self.items.clone(),
        }
    }
}

impl<E: EntityTrait> fmt::Debug for ColumnValues<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.items.iter()).finish()
    }
}

impl<E: EntityTrait> From<ColumnValue<E>> for ColumnValues<E> {
    fn from(value: ColumnValue<E>) -> Self {
        Self::new().with(value)
    }
}

impl<E: EntityTrait> FromIterator<ColumnValue<E>> for ColumnValues<E> {
    fn from_iter<I: IntoIterator<Item = ColumnValue<E>>>(iter: I) -> Self {
        iter.into_iter().fold(Self::new(), Self::with)
    }
}
