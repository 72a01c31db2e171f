use crate::class::{HasColumns, use_table};
use crate::repo::QueryRepo;
use crate::template::RepoTemplate;
use crate::wrap::BuilderRepo;

use sea_orm::EntityTrait;

/// Repository template paired with a table name and a table-qualified
/// descriptor, for queries that join or alias other tables.
#[derive(Clone, Debug)]
pub struct TableRepo<E: EntityTrait, Cols> {
    table: String,
    base: RepoTemplate<E, Cols>,
}

impl<E: EntityTrait, Cols> TableRepo<E, Cols> {
    #[must_use]
    pub fn new(table: impl Into<String>, cols: Cols) -> Self {
        Self {
            table: table.into(),
            base: RepoTemplate::new(cols),
        }
    }

    #[must_use]
    pub fn table_name(&self) -> &str {
        &self.table
    }

    #[must_use]
    pub fn table_columns(&self) -> &Cols {
        self.base.columns()
    }

    #[must_use]
    pub fn base(&self) -> &RepoTemplate<E, Cols> {
        &self.base
    }

    #[must_use]
    pub fn repo<'a, C>(&self, conn: &'a C) -> QueryRepo<'a, E, Cols, C> {
        self.base.repo(conn)
    }

    #[must_use]
    pub fn builder<'a, C>(&self, conn: &'a C) -> BuilderRepo<'a, E, Cols, C> {
        self.base.builder(conn)
    }
}

impl<E: HasColumns> TableRepo<E, E::Columns> {
    /// Table repository over the entity's own table name.
    #[must_use]
    pub fn of() -> Self {
        let (table, cols) = use_table::<E>();
        Self::new(table, cols)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use sea_orm::{DbBackend, QueryTrait};

    use crate::test_support::{AccountColumns, account};

    use super::*;

    #[test]
    fn table_repo_qualifies_columns() {
        let table = TableRepo::<account::Entity, AccountColumns>::of();
        assert_eq!(table.table_name(), "accounts");
        assert!(table.table_columns().age.is_qualified());

        let conn = ();
        let sql = table
            .builder(&conn)
            .find(|q, c| q.filter(c.age.gt(1)).order(c.id.desc()))
            .build(DbBackend::Sqlite)
            .to_string();
        assert!(
            sql.ends_with("WHERE \"accounts\".\"age\" > 1 ORDER BY \"accounts\".\"id\" DESC"),
            "{sql}"
        );
    }
}
