//! Statement-building repository view.
//!
//! [`BuilderRepo`] mirrors [`QueryRepo`] but returns the un-executed `SeaORM`
//! statement instead of running it, so callers can add joins, projections or
//! streaming before executing on [`BuilderRepo::conn`].

use std::sync::Arc;

use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, DeleteMany, EntityTrait, Insert, Select, SelectGetableTuple, Selector,
    UpdateMany,
};

use crate::ctx::ExecCtx;
use crate::error::RepoError;
use crate::order::OrderBy;
use crate::pagination::Pagination;
use crate::query::Query;
use crate::repo::QueryRepo;
use crate::shared::Core;
use crate::values::{ColumnValue, ColumnValues};

pub struct BuilderRepo<'a, E: EntityTrait, Cols, C> {
    core: Core<'a, E, Cols, C>,
}

impl<E: EntityTrait, Cols, C> Clone for BuilderRepo<'_, E, Cols, C> {
    fn clone(&self) -> Self {
        Self {
            core: self.core.clone(),
        }
    }
}

impl<'a, E: EntityTrait, Cols, C> BuilderRepo<'a, E, Cols, C> {
    pub(crate) fn from_core(core: Core<'a, E, Cols, C>) -> Self {
        Self { core }
    }

    /// Executing view over the same connection, descriptor and context.
    #[must_use]
    pub fn repo(&self) -> QueryRepo<'a, E, Cols, C> {
        QueryRepo::from_core(self.core.clone())
    }

    #[must_use]
    pub fn into_repo(self) -> QueryRepo<'a, E, Cols, C> {
        QueryRepo::from_core(self.core)
    }

    #[must_use]
    pub fn with_ctx(&self, ctx: ExecCtx) -> Self {
        let mut core = self.core.clone();
        core.ctx = ctx;
        Self { core }
    }

    #[must_use]
    pub fn ctx(&self) -> &ExecCtx {
        &self.core.ctx
    }

    #[must_use]
    pub fn columns(&self) -> &Cols {
        &self.core.cols
    }

    #[must_use]
    pub fn shared_columns(&self) -> Arc<Cols> {
        Arc::clone(&self.core.cols)
    }

    #[must_use]
    pub fn conn(&self) -> &'a C {
        self.core.conn
    }

    pub fn where_<F>(&self, cond: F) -> Query
    where
        F: FnOnce(Query, &Cols) -> Query,
    {
        self.core.query(cond)
    }

    /// Select limited to one row.
    #[must_use]
    pub fn first<F>(&self, cond: F) -> Select<E>
    where
        F: FnOnce(Query, &Cols) -> Query,
    {
        self.core.first_select(cond)
    }

    #[must_use]
    pub fn find<F>(&self, cond: F) -> Select<E>
    where
        F: FnOnce(Query, &Cols) -> Query,
    {
        self.core.select(cond)
    }

    #[must_use]
    pub fn find_limited<F>(&self, cond: F, limit: i64) -> Select<E>
    where
        F: FnOnce(Query, &Cols) -> Query,
    {
        self.core.limited_select(cond, limit)
    }

    #[must_use]
    pub fn find_page<F, O>(&self, cond: F, ordering: O, page: Pagination) -> Select<E>
    where
        F: FnOnce(Query, &Cols) -> Query,
        O: FnOnce(&Cols) -> OrderBy,
    {
        self.core.page_select(cond, ordering, page)
    }

    #[must_use]
    pub fn find_page_custom<F, P>(&self, cond: F, paging: P) -> Select<E>
    where
        F: FnOnce(Query, &Cols) -> Query,
        P: FnOnce(Query, &Cols) -> Query,
    {
        self.core.custom_select(cond, paging)
    }

    /// Select to pass to `PaginatorTrait::count`.
    #[must_use]
    pub fn count_query<F>(&self, cond: F) -> Select<E>
    where
        F: FnOnce(Query, &Cols) -> Query,
    {
        self.core.select(cond)
    }

    /// `SELECT 1 .. LIMIT 1`; `.one(conn)` yields `Some(1)` when a row matches.
    #[must_use]
    pub fn exists_query<F>(&self, cond: F) -> Selector<SelectGetableTuple<i32>>
    where
        F: FnOnce(Query, &Cols) -> Query,
    {
        self.core.exists_select(cond).into_tuple::<i32>()
    }

    #[must_use]
    pub fn update_one<F, V>(&self, cond: F, value: V) -> UpdateMany<E>
    where
        F: FnOnce(Query, &Cols) -> Query,
        V: FnOnce(&Cols) -> ColumnValue<E>,
    {
        self.core.update(cond, |c| value(c).into())
    }

    #[must_use]
    pub fn update_many<F, V>(&self, cond: F, values: V) -> UpdateMany<E>
    where
        F: FnOnce(Query, &Cols) -> Query,
        V: FnOnce(&Cols) -> ColumnValues<E>,
    {
        self.core.update(cond, values)
    }

    /// # Errors
    /// [`RepoError::MissingKey`] when `model`'s primary key is unset.
    pub fn update_by_key<V>(&self, model: &E::Model, values: V) -> Result<UpdateMany<E>, RepoError>
    where
        V: FnOnce(&Cols) -> ColumnValues<E>,
    {
        self.core.update_by_key(model, values)
    }

    /// # Errors
    /// [`RepoError::MissingKey`] when `model`'s primary key is unset.
    pub fn update_by_key_and_cond<F, V>(
        &self,
        model: &E::Model,
        cond: F,
        values: V,
    ) -> Result<UpdateMany<E>, RepoError>
    where
        F: FnOnce(Query, &Cols) -> Query,
        V: FnOnce(&Cols) -> ColumnValues<E>,
    {
        self.core.update_by_key_and_cond(model, cond, values)
    }

    #[must_use]
    #[allow(clippy::unused_self)]
    pub fn create(&self, model: E::ActiveModel) -> Insert<E::ActiveModel>
    where
        E::ActiveModel: ActiveModelTrait<Entity = E>,
    {
        E::insert(model)
    }

    #[must_use]
    #[allow(clippy::unused_self)]
    pub fn create_many<I>(&self, models: I) -> Insert<E::ActiveModel>
    where
        I: IntoIterator<Item = E::ActiveModel>,
        E::ActiveModel: ActiveModelTrait<Entity = E>,
    {
        E::insert_many(models)
    }

    #[must_use]
    pub fn upsert<K>(&self, model: E::ActiveModel, conflict: K) -> Insert<E::ActiveModel>
    where
        K: FnOnce(&Cols) -> OnConflict,
        E::ActiveModel: ActiveModelTrait<Entity = E>,
    {
        self.core.upsert([model], conflict)
    }

    #[must_use]
    pub fn upsert_many<I, K>(&self, models: I, conflict: K) -> Insert<E::ActiveModel>
    where
        I: IntoIterator<Item = E::ActiveModel>,
        K: FnOnce(&Cols) -> OnConflict,
        E::ActiveModel: ActiveModelTrait<Entity = E>,
    {
        self.core.upsert(models, conflict)
    }

    /// # Errors
    /// [`RepoError::MissingKey`] when `model`'s primary key is unset.
    pub fn delete(&self, model: &E::Model) -> Result<DeleteMany<E>, RepoError> {
        self.core.delete_by_key(model)
    }

    #[must_use]
    pub fn delete_by_cond<F>(&self, cond: F) -> DeleteMany<E>
    where
        F: FnOnce(Query, &Cols) -> Query,
    {
        self.core.delete_by_cond(cond)
    }

    /// # Errors
    /// [`RepoError::MissingKey`] when `model`'s primary key is unset.
    pub fn delete_by_key_and_cond<F>(
        &self,
        model: &E::Model,
        cond: F,
    ) -> Result<DeleteMany<E>, RepoError>
    where
        F: FnOnce(Query, &Cols) -> Query,
    {
        self.core.delete_by_key_and_cond(model, cond)
    }

    /// Hand the connection and descriptor to `run` and return its result.
    pub fn invoke<'s, R, F>(&'s self, run: F) -> R
    where
        F: FnOnce(&'a C, &'s Cols) -> R,
    {
        run(self.core.conn, &self.core.cols)
    }
}
