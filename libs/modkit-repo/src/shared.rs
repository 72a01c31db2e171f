//! State and statement construction shared by [`QueryRepo`](crate::QueryRepo)
//! and [`BuilderRepo`](crate::BuilderRepo).

use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use sea_orm::sea_query::{OnConflict, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DbErr, DeleteMany, EntityTrait, Insert, QueryFilter,
    QuerySelect, QueryTrait, Select, UpdateMany, Value,
};
use tracing::Instrument;

use crate::ctx::ExecCtx;
use crate::error::RepoError;
use crate::key::key_condition;
use crate::order::OrderBy;
use crate::pagination::Pagination;
use crate::query::Query;
use crate::values::ColumnValues;

pub struct Core<'a, E, Cols, C> {
    pub conn: &'a C,
    pub cols: Arc<Cols>,
    pub ctx: ExecCtx,
    pub log_statements: bool,
    entity: PhantomData<fn() -> E>,
}

impl<E, Cols, C> Clone for Core<'_, E, Cols, C> {
    fn clone(&self) -> Self {
        Self {
            conn: self.conn,
            cols: Arc::clone(&self.cols),
            ctx: self.ctx.clone(),
            log_statements: self.log_statements,
            entity: PhantomData,
        }
    }
}

impl<'a, E: EntityTrait, Cols, C> Core<'a, E, Cols, C> {
    pub fn new(conn: &'a C, cols: Arc<Cols>, ctx: ExecCtx, log_statements: bool) -> Self {
        Self {
            conn,
            cols,
            ctx,
            log_statements,
            entity: PhantomData,
        }
    }

    pub fn query<F>(&self, cond: F) -> Query
    where
        F: FnOnce(Query, &Cols) -> Query,
    {
        cond(Query::new(), &self.cols)
    }

    pub fn select<F>(&self, cond: F) -> Select<E>
    where
        F: FnOnce(Query, &Cols) -> Query,
    {
        self.query(cond).into_select()
    }

    pub fn first_select<F>(&self, cond: F) -> Select<E>
    where
        F: FnOnce(Query, &Cols) -> Query,
    {
        self.query(cond).limit(1).into_select()
    }

    pub fn limited_select<F>(&self, cond: F, limit: i64) -> Select<E>
    where
        F: FnOnce(Query, &Cols) -> Query,
    {
        self.query(cond).limit(limit).into_select()
    }

    pub fn page_select<F, O>(&self, cond: F, ordering: O, page: Pagination) -> Select<E>
    where
        F: FnOnce(Query, &Cols) -> Query,
        O: FnOnce(&Cols) -> OrderBy,
    {
        let query = self.query(cond).order(ordering(&self.cols));
        page.apply(query).into_select()
    }

    pub fn custom_select<F, P>(&self, cond: F, paging: P) -> Select<E>
    where
        F: FnOnce(Query, &Cols) -> Query,
        P: FnOnce(Query, &Cols) -> Query,
    {
        paging(self.query(cond), &self.cols).into_select()
    }

    /// `SELECT 1 FROM .. WHERE .. LIMIT 1`.
    pub fn exists_select<F>(&self, cond: F) -> Select<E>
    where
        F: FnOnce(Query, &Cols) -> Query,
    {
        self.select(cond)
            .select_only()
            .expr(SimpleExpr::Value(Value::Int(Some(1))))
            .limit(1)
    }

    pub fn update<F, V>(&self, cond: F, values: V) -> UpdateMany<E>
    where
        F: FnOnce(Query, &Cols) -> Query,
        V: FnOnce(&Cols) -> ColumnValues<E>,
    {
        let update = values(&self.cols).apply_to(E::update_many());
        self.query(cond).apply_to_update(update)
    }

    pub fn update_by_key<V>(&self, model: &E::Model, values: V) -> Result<UpdateMany<E>, RepoError>
    where
        V: FnOnce(&Cols) -> ColumnValues<E>,
    {
        let key = key_condition::<E>(model)?;
        Ok(values(&self.cols).apply_to(E::update_many()).filter(key))
    }

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
        let update = self.update_by_key(model, values)?;
        Ok(self.query(cond).apply_to_update(update))
    }

    pub fn upsert<A, I, K>(&self, models: I, conflict: K) -> Insert<A>
    where
        A: ActiveModelTrait<Entity = E>,
        I: IntoIterator<Item = A>,
        K: FnOnce(&Cols) -> OnConflict,
    {
        E::insert_many(models).on_conflict(conflict(&self.cols))
    }

    #[allow(clippy::unused_self)]
    pub fn delete_by_key(&self, model: &E::Model) -> Result<DeleteMany<E>, RepoError> {
        let key = key_condition::<E>(model)?;
        Ok(E::delete_many().filter(key))
    }

    pub fn delete_by_cond<F>(&self, cond: F) -> DeleteMany<E>
    where
        F: FnOnce(Query, &Cols) -> Query,
    {
        self.query(cond).apply_to_delete(E::delete_many())
    }

    pub fn delete_by_key_and_cond<F>(
        &self,
        model: &E::Model,
        cond: F,
    ) -> Result<DeleteMany<E>, RepoError>
    where
        F: FnOnce(Query, &Cols) -> Query,
    {
        let delete = self.delete_by_key(model)?;
        Ok(self.query(cond).apply_to_delete(delete))
    }
}

impl<E: EntityTrait, Cols, C: ConnectionTrait> Core<'_, E, Cols, C> {
    /// Render `stmt` at debug level when statement logging is enabled.
    pub fn log_statement<S: QueryTrait>(&self, op: &'static str, stmt: &S) {
        if self.log_statements {
            let sql = stmt.build(self.conn.get_database_backend()).to_string();
            tracing::debug!(table = E::default().table_name(), op, %sql, "repo statement");
        }
    }

    /// Run `fut` under the bound context inside a `repo` span.
    pub async fn exec<T, Fut>(&self, op: &'static str, fut: Fut) -> Result<T, RepoError>
    where
        Fut: Future<Output = Result<T, DbErr>>,
    {
        let span = tracing::debug_span!("repo", table = E::default().table_name(), op);
        async {
            let res = self.ctx.run(fut).await;
            match &res {
                Ok(_) => tracing::trace!("statement ok"),
                Err(err) if err.is_not_found() => tracing::debug!("no matching record"),
                Err(err) => tracing::debug!(error = %err, "statement failed"),
            }
            res
        }
        .instrument(span)
        .await
    }
}
