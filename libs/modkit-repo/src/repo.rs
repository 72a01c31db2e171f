//! Executing repository view.
//!
//! Every operation takes condition closures of the form
//! `|query, cols| query.filter(cols.username.eq("u1"))`, builds the statement
//! for entity `E`, and runs it on the bound connection under the bound
//! [`ExecCtx`]. Engine errors are returned unchanged inside [`RepoError::Db`].
//!
//! ```rust,ignore
//! let repo = accounts.repo(&conn);
//! let page = repo
//!     .find_page(
//!         |q, c| q.filter(c.age.gte(18)),
//!         |c| c.username.desc(),
//!         Pagination::page(1, 20),
//!     )
//!     .await?;
//! ```

use std::future::Future;
use std::sync::Arc;

use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ConnectionTrait, DbErr, EntityTrait, FromQueryResult,
    IntoActiveModel, PaginatorTrait,
};

use crate::ctx::ExecCtx;
use crate::error::{NotFoundOr, RepoError};
use crate::key::table_name;
use crate::order::OrderBy;
use crate::pagination::Pagination;
use crate::query::Query;
use crate::shared::Core;
use crate::values::{ColumnValue, ColumnValues};
use crate::wrap::BuilderRepo;

/// Repository bound to a connection (or transaction) and an execution context.
pub struct QueryRepo<'a, E: EntityTrait, Cols, C> {
    core: Core<'a, E, Cols, C>,
}

impl<E: EntityTrait, Cols, C> Clone for QueryRepo<'_, E, Cols, C> {
    fn clone(&self) -> Self {
        Self {
            core: self.core.clone(),
        }
    }
}

impl<'a, E: EntityTrait, Cols, C> QueryRepo<'a, E, Cols, C> {
    pub(crate) fn from_core(core: Core<'a, E, Cols, C>) -> Self {
        Self { core }
    }

    /// Statement-building view over the same connection, descriptor and context.
    #[must_use]
    pub fn builder(&self) -> BuilderRepo<'a, E, Cols, C> {
        BuilderRepo::from_core(self.core.clone())
    }

    #[must_use]
    pub fn into_builder(self) -> BuilderRepo<'a, E, Cols, C> {
        BuilderRepo::from_core(self.core)
    }

    /// Same repository with a different execution context. `self` is unchanged.
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

    /// Apply `cond` to a fresh query without executing anything.
    pub fn where_<F>(&self, cond: F) -> Query
    where
        F: FnOnce(Query, &Cols) -> Query,
    {
        self.core.query(cond)
    }
}

impl<'a, E, Cols, C> QueryRepo<'a, E, Cols, C>
where
    E: EntityTrait,
    E::Model: FromQueryResult + Send + Sync,
    C: ConnectionTrait,
{
    /// First record matching `cond`.
    ///
    /// # Errors
    /// [`RepoError::NotFound`] when nothing matches; engine errors otherwise.
    pub async fn find_one<F>(&self, cond: F) -> Result<E::Model, RepoError>
    where
        F: FnOnce(Query, &Cols) -> Query,
    {
        self.find_optional(cond)
            .await?
            .ok_or_else(|| RepoError::NotFound {
                table: table_name::<E>(),
            })
    }

    /// Like [`find_one`](Self::find_one), with the "not found" case flagged.
    ///
    /// # Errors
    /// Every failure, flagged with `not_found` when nothing matched.
    pub async fn find_one_e<F>(&self, cond: F) -> Result<E::Model, NotFoundOr>
    where
        F: FnOnce(Query, &Cols) -> Query,
    {
        self.find_one(cond).await.map_err(NotFoundOr::new)
    }

    /// # Errors
    /// Returns the engine error or the context's timeout/cancellation.
    pub async fn find_optional<F>(&self, cond: F) -> Result<Option<E::Model>, RepoError>
    where
        F: FnOnce(Query, &Cols) -> Query,
    {
        let select = self.core.first_select(cond);
        self.core.log_statement("find_one", &select);
        self.core.exec("find_one", select.one(self.core.conn)).await
    }

    /// All records matching `cond`; no rows is an empty vector.
    ///
    /// # Errors
    /// Returns the engine error or the context's timeout/cancellation.
    pub async fn find_many<F>(&self, cond: F) -> Result<Vec<E::Model>, RepoError>
    where
        F: FnOnce(Query, &Cols) -> Query,
    {
        let select = self.core.select(cond);
        self.core.log_statement("find_many", &select);
        self.core.exec("find_many", select.all(self.core.conn)).await
    }

    /// At most `limit` records matching `cond`.
    ///
    /// # Errors
    /// Returns the engine error or the context's timeout/cancellation.
    pub async fn find_limited<F>(&self, cond: F, limit: i64) -> Result<Vec<E::Model>, RepoError>
    where
        F: FnOnce(Query, &Cols) -> Query,
    {
        let select = self.core.limited_select(cond, limit);
        self.core.log_statement("find_limited", &select);
        self.core.exec("find_limited", select.all(self.core.conn)).await
    }

    /// Records matching `cond`, sorted by `ordering`, windowed by `page`.
    ///
    /// # Errors
    /// Returns the engine error or the context's timeout/cancellation.
    pub async fn find_page<F, O>(
        &self,
        cond: F,
        ordering: O,
        page: Pagination,
    ) -> Result<Vec<E::Model>, RepoError>
    where
        F: FnOnce(Query, &Cols) -> Query,
        O: FnOnce(&Cols) -> OrderBy,
    {
        let select = self.core.page_select(cond, ordering, page);
        self.core.log_statement("find_page", &select);
        self.core.exec("find_page", select.all(self.core.conn)).await
    }

    /// Page of records plus the number of records matching `cond` alone.
    ///
    /// Runs two statements; the total ignores ordering and the window.
    ///
    /// # Errors
    /// Returns the first failing statement's error.
    pub async fn find_page_with_total<F, O>(
        &self,
        cond: F,
        ordering: O,
        page: Pagination,
    ) -> Result<(Vec<E::Model>, u64), RepoError>
    where
        F: Fn(Query, &Cols) -> Query,
        O: FnOnce(&Cols) -> OrderBy,
    {
        let rows = self.find_page(&cond, ordering, page).await?;
        let total = self.count(&cond).await?;
        Ok((rows, total))
    }

    /// Records matching `cond`, with sorting and windowing left to `paging`.
    ///
    /// # Errors
    /// Returns the engine error or the context's timeout/cancellation.
    pub async fn find_page_custom<F, P>(
        &self,
        cond: F,
        paging: P,
    ) -> Result<Vec<E::Model>, RepoError>
    where
        F: FnOnce(Query, &Cols) -> Query,
        P: FnOnce(Query, &Cols) -> Query,
    {
        let select = self.core.custom_select(cond, paging);
        self.core.log_statement("find_page_custom", &select);
        self.core.exec("find_page_custom", select.all(self.core.conn)).await
    }

    /// # Errors
    /// Returns the first failing statement's error.
    pub async fn find_page_custom_with_total<F, P>(
        &self,
        cond: F,
        paging: P,
    ) -> Result<(Vec<E::Model>, u64), RepoError>
    where
        F: Fn(Query, &Cols) -> Query,
        P: FnOnce(Query, &Cols) -> Query,
    {
        let rows = self.find_page_custom(&cond, paging).await?;
        let total = self.count(&cond).await?;
        Ok((rows, total))
    }

    /// Whether any record matches `cond`.
    ///
    /// # Errors
    /// Returns the engine error or the context's timeout/cancellation.
    pub async fn exists<F>(&self, cond: F) -> Result<bool, RepoError>
    where
        F: FnOnce(Query, &Cols) -> Query,
    {
        let select = self.core.exists_select(cond);
        self.core.log_statement("exists", &select);
        let found = self
            .core
            .exec("exists", select.into_tuple::<i32>().one(self.core.conn))
            .await?;
        Ok(found.is_some())
    }

    /// Number of records matching `cond`.
    ///
    /// # Errors
    /// Returns the engine error or the context's timeout/cancellation.
    pub async fn count<F>(&self, cond: F) -> Result<u64, RepoError>
    where
        F: FnOnce(Query, &Cols) -> Query,
    {
        let select = self.core.select(cond);
        self.core.log_statement("count", &select);
        self.core.exec("count", select.count(self.core.conn)).await
    }

    /// Set one column on every record matching `cond`; returns rows affected.
    ///
    /// # Errors
    /// Returns the engine error or the context's timeout/cancellation.
    pub async fn update_one<F, V>(&self, cond: F, value: V) -> Result<u64, RepoError>
    where
        F: FnOnce(Query, &Cols) -> Query,
        V: FnOnce(&Cols) -> ColumnValue<E>,
    {
        self.update_many(cond, |c| value(c).into()).await
    }

    /// Apply `values` to every record matching `cond`; returns rows affected.
    ///
    /// # Errors
    /// Returns the engine error or the context's timeout/cancellation.
    pub async fn update_many<F, V>(&self, cond: F, values: V) -> Result<u64, RepoError>
    where
        F: FnOnce(Query, &Cols) -> Query,
        V: FnOnce(&Cols) -> ColumnValues<E>,
    {
        let update = self.core.update(cond, values);
        self.core.log_statement("update", &update);
        let res = self.core.exec("update", update.exec(self.core.conn)).await?;
        Ok(res.rows_affected)
    }

    /// Apply `values` to the record identified by `model`'s primary key.
    ///
    /// # Errors
    /// [`RepoError::MissingKey`] before any SQL when the key is unset;
    /// engine errors otherwise.
    pub async fn update_by_key<V>(&self, model: &E::Model, values: V) -> Result<u64, RepoError>
    where
        V: FnOnce(&Cols) -> ColumnValues<E>,
    {
        let update = self.core.update_by_key(model, values)?;
        self.core.log_statement("update", &update);
        let res = self.core.exec("update", update.exec(self.core.conn)).await?;
        Ok(res.rows_affected)
    }

    /// Like [`update_by_key`](Self::update_by_key), further restricted by `cond`.
    ///
    /// # Errors
    /// [`RepoError::MissingKey`] before any SQL when the key is unset;
    /// engine errors otherwise.
    pub async fn update_by_key_and_cond<F, V>(
        &self,
        model: &E::Model,
        cond: F,
        values: V,
    ) -> Result<u64, RepoError>
    where
        F: FnOnce(Query, &Cols) -> Query,
        V: FnOnce(&Cols) -> ColumnValues<E>,
    {
        let update = self.core.update_by_key_and_cond(model, cond, values)?;
        self.core.log_statement("update", &update);
        let res = self.core.exec("update", update.exec(self.core.conn)).await?;
        Ok(res.rows_affected)
    }

    /// Insert one record and return it as stored.
    ///
    /// # Errors
    /// Returns the engine error or the context's timeout/cancellation.
    pub async fn create(&self, model: E::ActiveModel) -> Result<E::Model, RepoError>
    where
        E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
        E::Model: IntoActiveModel<E::ActiveModel>,
    {
        if self.core.log_statements {
            let insert = E::insert(model.clone());
            self.core.log_statement("create", &insert);
        }
        self.core.exec("create", model.insert(self.core.conn)).await
    }

    /// Insert records in one statement; returns rows inserted.
    /// No input means no statement and `0`.
    ///
    /// # Errors
    /// Returns the engine error or the context's timeout/cancellation.
    pub async fn create_many<I>(&self, models: I) -> Result<u64, RepoError>
    where
        I: IntoIterator<Item = E::ActiveModel>,
        E::ActiveModel: ActiveModelTrait<Entity = E> + Send,
        E::Model: IntoActiveModel<E::ActiveModel>,
    {
        let models: Vec<_> = models.into_iter().collect();
        if models.is_empty() {
            return Ok(0);
        }
        let insert = E::insert_many(models);
        self.core.log_statement("create", &insert);
        self.core
            .exec("create", insert.exec_without_returning(self.core.conn))
            .await
    }

    /// Insert or resolve a conflict as described by `conflict`; returns rows affected.
    ///
    /// # Errors
    /// Returns the engine error or the context's timeout/cancellation.
    pub async fn upsert<K>(&self, model: E::ActiveModel, conflict: K) -> Result<u64, RepoError>
    where
        K: FnOnce(&Cols) -> OnConflict,
        E::ActiveModel: ActiveModelTrait<Entity = E> + Send,
        E::Model: IntoActiveModel<E::ActiveModel>,
    {
        self.upsert_many([model], conflict).await
    }

    /// # Errors
    /// Returns the engine error or the context's timeout/cancellation.
    pub async fn upsert_many<I, K>(&self, models: I, conflict: K) -> Result<u64, RepoError>
    where
        I: IntoIterator<Item = E::ActiveModel>,
        K: FnOnce(&Cols) -> OnConflict,
        E::ActiveModel: ActiveModelTrait<Entity = E> + Send,
        E::Model: IntoActiveModel<E::ActiveModel>,
    {
        let models: Vec<_> = models.into_iter().collect();
        if models.is_empty() {
            return Ok(0);
        }
        let insert = self.core.upsert(models, conflict);
        self.core.log_statement("upsert", &insert);
        self.core
            .exec("upsert", insert.exec_without_returning(self.core.conn))
            .await
    }

    /// Delete the record identified by `model`'s primary key.
    ///
    /// # Errors
    /// [`RepoError::MissingKey`] before any SQL when the key is unset;
    /// engine errors otherwise.
    pub async fn delete(&self, model: &E::Model) -> Result<u64, RepoError> {
        let delete = self.core.delete_by_key(model)?;
        self.core.log_statement("delete", &delete);
        let res = self.core.exec("delete", delete.exec(self.core.conn)).await?;
        Ok(res.rows_affected)
    }

    /// Delete every record matching `cond`.
    ///
    /// # Errors
    /// Returns the engine error or the context's timeout/cancellation.
    pub async fn delete_by_cond<F>(&self, cond: F) -> Result<u64, RepoError>
    where
        F: FnOnce(Query, &Cols) -> Query,
    {
        let delete = self.core.delete_by_cond(cond);
        self.core.log_statement("delete", &delete);
        let res = self.core.exec("delete", delete.exec(self.core.conn)).await?;
        Ok(res.rows_affected)
    }

    /// # Errors
    /// [`RepoError::MissingKey`] before any SQL when the key is unset;
    /// engine errors otherwise.
    pub async fn delete_by_key_and_cond<F>(
        &self,
        model: &E::Model,
        cond: F,
    ) -> Result<u64, RepoError>
    where
        F: FnOnce(Query, &Cols) -> Query,
    {
        let delete = self.core.delete_by_key_and_cond(model, cond)?;
        self.core.log_statement("delete", &delete);
        let res = self.core.exec("delete", delete.exec(self.core.conn)).await?;
        Ok(res.rows_affected)
    }

    /// Run arbitrary work against the bound connection and descriptor under
    /// the bound context.
    ///
    /// # Errors
    /// Returns whatever `run` fails with, or the context's timeout/cancellation.
    pub async fn invoke<'s, T, F, Fut>(&'s self, run: F) -> Result<T, RepoError>
    where
        F: FnOnce(&'a C, &'s Cols) -> Fut,
        Fut: Future<Output = Result<T, DbErr>>,
    {
        self.core
            .exec("invoke", run(self.core.conn, &self.core.cols))
            .await
    }
}
