//! Typed column handles.
//!
//! A [`Col<E, T>`] names one column of entity `E` whose values have Rust type
//! `T`. Predicates, sort keys and update assignments are built from the handle,
//! so a value of the wrong type for the column does not compile:
//!
//! ```compile_fail
//! # use modkit_repo::Col;
//! # fn demo<E: sea_orm::EntityTrait>(age: Col<E, i32>) {
//! let _ = age.eq("forty-two");
//! # }
//! ```

use std::fmt;
use std::marker::PhantomData;

use sea_orm::sea_query::{Alias, ColumnRef, Expr, IntoColumnRef, LikeExpr, SimpleExpr};
use sea_orm::{EntityTrait, IdenStatic, Order, Value};

use crate::order::OrderBy;
use crate::values::ColumnValue;

/// How column references are qualified in generated SQL.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Decoration {
    /// Bare column name: `"age"`.
    #[default]
    Plain,
    /// Qualified with the entity's table name: `"accounts"."age"`.
    Table,
    /// Qualified with a caller supplied alias: `"a"."age"`.
    Alias(String),
}

/// Handle for a column of entity `E` holding values of type `T`.
pub struct Col<E: EntityTrait, T> {
    column: E::Column,
    column_ref: ColumnRef,
    _value: PhantomData<fn() -> T>,
}

fn value_of<T: Into<Value>>(v: impl Into<T>) -> Value {
    let typed: T = v.into();
    typed.into()
}

impl<E: EntityTrait, T> Col<E, T> {
    #[must_use]
    pub fn new(column: E::Column, decoration: &Decoration) -> Self {
        let column_ref = match decoration {
            Decoration::Plain => column.into_column_ref(),
            Decoration::Table => (E::default(), column).into_column_ref(),
            Decoration::Alias(alias) => (Alias::new(alias.as_str()), column).into_column_ref(),
        };
        Self {
            column,
            column_ref,
            _value: PhantomData,
        }
    }

    /// Underlying entity column, e.g. for `OnConflict::column`.
    #[must_use]
    pub fn column(&self) -> E::Column {
        self.column
    }

    /// Column name without qualification.
    #[must_use]
    pub fn name(&self) -> &str {
        IdenStatic::as_str(&self.column)
    }

    /// True when the reference carries a table or alias prefix.
    #[must_use]
    pub fn is_qualified(&self) -> bool {
        !matches!(self.column_ref, ColumnRef::Column(_))
    }

    #[must_use]
    pub fn column_ref(&self) -> &ColumnRef {
        &self.column_ref
    }

    /// Column reference as an expression, for predicates the handle does not cover.
    #[must_use]
    pub fn expr(&self) -> Expr {
        Expr::col(self.column_ref.clone())
    }

    #[must_use]
    pub fn is_null(&self) -> SimpleExpr {
        self.expr().is_null()
    }

    #[must_use]
    pub fn is_not_null(&self) -> SimpleExpr {
        self.expr().is_not_null()
    }

    pub fn asc(&self) -> OrderBy {
        self.order(Order::Asc)
    }

    pub fn desc(&self) -> OrderBy {
        self.order(Order::Desc)
    }

    pub fn order(&self, order: Order) -> OrderBy {
        OrderBy::by(SimpleExpr::Column(self.column_ref.clone()), order)
    }

    /// Sort by a direction given as text: `"desc"` in any case sorts
    /// descending, everything else ascending.
    pub fn order_by_str(&self, direction: &str) -> OrderBy {
        if direction.trim().eq_ignore_ascii_case("desc") {
            self.desc()
        } else {
            self.asc()
        }
    }

    /// Assign an arbitrary expression, e.g. `Expr::cust("CURRENT_TIMESTAMP")`.
    #[must_use]
    pub fn set_expr(&self, expr: SimpleExpr) -> ColumnValue<E> {
        ColumnValue::new(self.column, expr)
    }
}

impl<E: EntityTrait, T: Into<Value>> Col<E, T> {
    #[must_use]
    pub fn eq(&self, v: impl Into<T>) -> SimpleExpr {
        self.expr().eq(value_of::<T>(v))
    }

    #[must_use]
    pub fn ne(&self, v: impl Into<T>) -> SimpleExpr {
        self.expr().ne(value_of::<T>(v))
    }

    #[must_use]
    pub fn gt(&self, v: impl Into<T>) -> SimpleExpr {
        self.expr().gt(value_of::<T>(v))
    }

    #[must_use]
    pub fn gte(&self, v: impl Into<T>) -> SimpleExpr {
        self.expr().gte(value_of::<T>(v))
    }

    #[must_use]
    pub fn lt(&self, v: impl Into<T>) -> SimpleExpr {
        self.expr().lt(value_of::<T>(v))
    }

    #[must_use]
    pub fn lte(&self, v: impl Into<T>) -> SimpleExpr {
        self.expr().lte(value_of::<T>(v))
    }

    #[must_use]
    pub fn between(&self, low: impl Into<T>, high: impl Into<T>) -> SimpleExpr {
        self.expr()
            .between(value_of::<T>(low), value_of::<T>(high))
    }

    /// `column IN (..)`. An empty list renders a predicate that matches nothing.
    #[must_use]
    pub fn is_in<I, V>(&self, values: I) -> SimpleExpr
    where
        I: IntoIterator<Item = V>,
        V: Into<T>,
    {
        self.expr()
            .is_in(values.into_iter().map(|v| value_of::<T>(v)))
    }

    #[must_use]
    pub fn is_not_in<I, V>(&self, values: I) -> SimpleExpr
    where
        I: IntoIterator<Item = V>,
        V: Into<T>,
    {
        self.expr()
            .is_not_in(values.into_iter().map(|v| value_of::<T>(v)))
    }

    /// Assign a literal value.
    #[must_use]
    pub fn set(&self, v: impl Into<T>) -> ColumnValue<E> {
        ColumnValue::new(self.column, SimpleExpr::Value(value_of::<T>(v)))
    }

    /// Assign `column + v`.
    #[must_use]
    pub fn add(&self, v: impl Into<T>) -> ColumnValue<E> {
        ColumnValue::new(self.column, Expr::col(self.column).add(value_of::<T>(v)))
    }

    /// Assign `column - v`.
    #[must_use]
    pub fn sub(&self, v: impl Into<T>) -> ColumnValue<E> {
        ColumnValue::new(self.column, Expr::col(self.column).sub(value_of::<T>(v)))
    }
}

impl<E: EntityTrait> Col<E, String> {
    /// `LIKE` with a caller supplied pattern.
    #[must_use]
    pub fn like(&self, pattern: impl Into<String>) -> SimpleExpr {
        self.expr().like(pattern.into())
    }

    #[must_use]
    pub fn not_like(&self, pattern: impl Into<String>) -> SimpleExpr {
        self.expr().not_like(pattern.into())
    }

    /// Prefix match; `%` and `_` in `prefix` match literally.
    #[must_use]
    pub fn starts_with(&self, prefix: &str) -> SimpleExpr {
        self.expr()
            .like(LikeExpr::new(format!("{}%", escape_like(prefix))).escape(LIKE_ESCAPE))
    }

    /// Substring match; `%` and `_` in `needle` match literally.
    #[must_use]
    pub fn contains(&self, needle: &str) -> SimpleExpr {
        self.expr()
            .like(LikeExpr::new(format!("%{}%", escape_like(needle))).escape(LIKE_ESCAPE))
    }
}

const LIKE_ESCAPE: char = '\\';

fn escape_like(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            out.push(LIKE_ESCAPE);
        }
        out.push(c);
    }
    out
}

impl<E: EntityTrait, T> Clone for Col<E, T> {
    fn clone(&self) -> Self {
        Self {
            column: self.column,
            column_ref: self.column_ref.clone(),
            _value: PhantomData,
        }
    }
}

impl<E: EntityTrait, T> fmt::Debug for Col<E, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Col")
            .field("column", &self.name())
            .field("column_ref", &self.column_ref)
            .finish()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use sea_orm::{DbBackend, QueryFilter, QueryOrder, QueryTrait};

    use crate::class::HasColumns;
    use crate::test_support::{AccountColumns, account, cols};

    use super::*;

    fn render(cond: SimpleExpr) -> String {
        account::Entity::find()
            .filter(cond)
            .build(DbBackend::Sqlite)
            .to_string()
    }

    #[test]
    fn plain_predicates_render_bare_columns() {
        let c = cols();
        let sql = render(c.username.eq("u1"));
        assert!(sql.ends_with("WHERE \"username\" = 'u1'"), "{sql}");

        let sql = render(c.age.between(18, 30));
        assert!(sql.contains("\"age\" BETWEEN 18 AND 30"), "{sql}");

        let sql = render(c.id.is_in([1_i64, 2, 3]));
        assert!(sql.contains("\"id\" IN (1, 2, 3)"), "{sql}");

        let sql = render(c.nickname.is_null());
        assert!(sql.contains("\"nickname\" IS NULL"), "{sql}");
    }

    #[test]
    fn table_and_alias_decorations_qualify() {
        let c: AccountColumns = account::Entity::columns(&Decoration::Table);
        let sql = render(c.age.gt(21));
        assert!(sql.contains("\"accounts\".\"age\" > 21"), "{sql}");
        assert!(c.age.is_qualified());
        assert!(!cols().age.is_qualified());

        let c: AccountColumns = account::Entity::columns(&Decoration::Alias("a".to_owned()));
        let sql = render(c.age.lte(21));
        assert!(sql.contains("\"a\".\"age\" <= 21"), "{sql}");
    }

    #[test]
    fn text_patterns() {
        let c = cols();
        let sql = render(c.username.starts_with("u"));
        assert!(sql.contains("\"username\" LIKE 'u%'"), "{sql}");
        assert!(sql.contains("ESCAPE"), "{sql}");

        let sql = render(c.username.contains("5_0%"));
        assert!(sql.contains("\"username\" LIKE '%5"), "{sql}");
        assert!(sql.contains("\\_0"), "{sql}");
        assert!(sql.contains("\\%%'"), "{sql}");
        assert!(!sql.contains("'%50%'"), "{sql}");
    }

    #[test]
    fn like_escaping_keeps_user_text() {
        assert_eq!(escape_like("user_1"), "user\\_1");
        assert_eq!(escape_like("50%"), "50\\%");
        assert_eq!(escape_like("a\\b"), "a\\\\b");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[test]
    fn ordering_direction_from_text() {
        let c = cols();
        let order = c.age.order_by_str("DESC").then(c.username.order_by_str("up"));
        let mut select = account::Entity::find();
        for (expr, ord) in order.into_keys() {
            select = select.order_by(expr, ord);
        }
        let sql = select.build(DbBackend::Sqlite).to_string();
        assert!(sql.ends_with("ORDER BY \"age\" DESC, \"username\" ASC"), "{sql}");
    }

    #[test]
    fn handles_report_names() {
        let c = cols();
        assert_eq!(c.username.name(), "username");
        assert!(matches!(c.age.column(), account::Column::Age));
    }
}
