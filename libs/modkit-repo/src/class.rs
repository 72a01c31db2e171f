//! Entities that know how to build their own column descriptor.

use sea_orm::EntityTrait;

use crate::column::Decoration;

/// Entity with a conventional column descriptor, usually a struct of
/// [`Col`](crate::Col) handles, one per column.
pub trait HasColumns: EntityTrait {
    type Columns: Send + Sync + 'static;

    fn columns(decoration: &Decoration) -> Self::Columns;
}

/// Descriptor with bare column names.
#[must_use]
pub fn columns<E: HasColumns>() -> E::Columns {
    E::columns(&Decoration::Plain)
}

/// Descriptor qualified with the entity's table name.
#[must_use]
pub fn table_columns<E: HasColumns>() -> E::Columns {
    E::columns(&Decoration::Table)
}

/// Table name together with the table-qualified descriptor.
#[must_use]
pub fn use_table<E: HasColumns>() -> (String, E::Columns) {
    (E::default().table_name().to_owned(), table_columns::<E>())
}
