use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use sea_orm::EntityTrait;

use crate::class::HasColumns;
use crate::column::Decoration;
use crate::config::RepoConfig;
use crate::ctx::ExecCtx;
use crate::repo::QueryRepo;
use crate::shared::Core;
use crate::wrap::BuilderRepo;

/// Connection-free repository definition for entity `E`.
///
/// Holds the column descriptor and default execution settings. Build one per
/// entity at startup and bind it to a connection or transaction per call with
/// [`repo`](Self::repo) or [`builder`](Self::builder).
pub struct RepoTemplate<E, Cols> {
    cols: Arc<Cols>,
    ctx: ExecCtx,
    log_statements: bool,
    entity: PhantomData<fn() -> E>,
}

impl<E, Cols> Clone for RepoTemplate<E, Cols> {
    fn clone(&self) -> Self {
        Self {
            cols: Arc::clone(&self.cols),
            ctx: self.ctx.clone(),
            log_statements: self.log_statements,
            entity: PhantomData,
        }
    }
}

impl<E: EntityTrait, Cols> fmt::Debug for RepoTemplate<E, Cols> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RepoTemplate")
            .field("table", &E::default().table_name())
            .field("ctx", &self.ctx)
            .field("log_statements", &self.log_statements)
            .finish_non_exhaustive()
    }
}

impl<E: EntityTrait, Cols> RepoTemplate<E, Cols> {
    #[must_use]
    pub fn new(cols: Cols) -> Self {
        Self::from_shared(Arc::new(cols))
    }

    #[must_use]
    pub fn from_shared(cols: Arc<Cols>) -> Self {
        Self {
            cols,
            ctx: ExecCtx::new(),
            log_statements: false,
            entity: PhantomData,
        }
    }

    #[must_use]
    pub fn from_config(cols: Cols, config: &RepoConfig) -> Self {
        Self::new(cols)
            .with_default_ctx(config.exec_ctx())
            .with_statement_logging(config.log_statements)
    }

    /// Context used by [`repo`](Self::repo) and [`builder`](Self::builder).
    #[must_use]
    pub fn with_default_ctx(mut self, ctx: ExecCtx) -> Self {
        self.ctx = ctx;
        self
    }

    #[must_use]
    pub fn with_statement_logging(mut self, enabled: bool) -> Self {
        self.log_statements = enabled;
        self
    }

    #[must_use]
    pub fn columns(&self) -> &Cols {
        &self.cols
    }

    #[must_use]
    pub fn shared_columns(&self) -> Arc<Cols> {
        Arc::clone(&self.cols)
    }

    #[must_use]
    pub fn repo<'a, C>(&self, conn: &'a C) -> QueryRepo<'a, E, Cols, C> {
        self.with(self.ctx.clone(), conn)
    }

    #[must_use]
    pub fn builder<'a, C>(&self, conn: &'a C) -> BuilderRepo<'a, E, Cols, C> {
        self.wrap(self.ctx.clone(), conn)
    }

    /// Executing repository bound to `conn` under `ctx`.
    #[must_use]
    pub fn with<'a, C>(&self, ctx: ExecCtx, conn: &'a C) -> QueryRepo<'a, E, Cols, C> {
        QueryRepo::from_core(self.core(ctx, conn))
    }

    /// Statement-building repository bound to `conn` under `ctx`.
    #[must_use]
    pub fn wrap<'a, C>(&self, ctx: ExecCtx, conn: &'a C) -> BuilderRepo<'a, E, Cols, C> {
        BuilderRepo::from_core(self.core(ctx, conn))
    }

    fn core<'a, C>(&self, ctx: ExecCtx, conn: &'a C) -> Core<'a, E, Cols, C> {
        Core::new(conn, Arc::clone(&self.cols), ctx, self.log_statements)
    }
}

impl<E: HasColumns> RepoTemplate<E, E::Columns> {
    /// Template over the entity's own descriptor with bare column names.
    #[must_use]
    pub fn of() -> Self {
        Self::decorated(&Decoration::Plain)
    }

    #[must_use]
    pub fn decorated(decoration: &Decoration) -> Self {
        Self::new(E::columns(decoration))
    }
}
