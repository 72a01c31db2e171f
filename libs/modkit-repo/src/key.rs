use sea_orm::sea_query::Expr;
use sea_orm::{Condition, EntityTrait, Iterable, ModelTrait, PrimaryKeyToColumn, Value};

use crate::error::RepoError;

/// Equality condition on every primary key column of `model`.
///
/// Fails with [`RepoError::MissingKey`] when any key column is NULL, zero,
/// empty or the nil UUID.
pub fn key_condition<E: EntityTrait>(model: &E::Model) -> Result<Condition, RepoError> {
    let mut cond = Condition::all();
    for key in E::PrimaryKey::iter() {
        let column = key.into_column();
        let value = model.get(column);
        if is_unset(&value) {
            return Err(RepoError::MissingKey {
                table: table_name::<E>(),
            });
        }
        cond = cond.add(Expr::col(column).eq(value));
    }
    Ok(cond)
}

pub fn table_name<E: EntityTrait>() -> String {
    E::default().table_name().to_owned()
}

fn is_unset(value: &Value) -> bool {
    match value {
        Value::TinyInt(v) => v.is_none_or(|v| v == 0),
        Value::SmallInt(v) => v.is_none_or(|v| v == 0),
        Value::Int(v) => v.is_none_or(|v| v == 0),
        Value::BigInt(v) => v.is_none_or(|v| v == 0),
        Value::TinyUnsigned(v) => v.is_none_or(|v| v == 0),
        Value::SmallUnsigned(v) => v.is_none_or(|v| v == 0),
        Value::Unsigned(v) => v.is_none_or(|v| v == 0),
        Value::BigUnsigned(v) => v.is_none_or(|v| v == 0),
        Value::String(v) => v.as_ref().is_none_or(|s| s.is_empty()),
        Value::Uuid(v) => v.as_ref().is_none_or(|u| u.is_nil()),
        Value::Bytes(v) => v.as_ref().is_none_or(|b| b.is_empty()),
        _ => false,
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
#[allow(clippy::unwrap_used)]
mod tests {
    use sea_orm::{DbBackend, QueryFilter, QueryTrait};

    use crate::test_support::{account, model};

    use super::*;

    #[test]
    fn zero_and_empty_keys_are_unset() {
        assert!(is_unset(&Value::BigInt(Some(0))));
        assert!(is_unset(&Value::BigInt(None)));
        assert!(!is_unset(&Value::BigInt(Some(9))));
        assert!(is_unset(&Value::String(Some(Box::default()))));
        assert!(is_unset(&Value::Uuid(Some(Box::new(uuid::Uuid::nil())))));
        assert!(!is_unset(&Value::Uuid(Some(Box::new(uuid::Uuid::new_v4())))));
        assert!(!is_unset(&Value::Bool(Some(false))));
    }

    #[test]
    fn key_condition_targets_primary_key() {
        let cond = key_condition::<account::Entity>(&model(7, "u7")).unwrap();
        let sql = account::Entity::delete_many()
            .filter(cond)
            .build(DbBackend::Sqlite)
            .to_string();
        assert_eq!(sql, "DELETE FROM \"accounts\" WHERE \"id\" = 7");
    }

    #[test]
    fn missing_key_is_rejected() {
        let err = key_condition::<account::Entity>(&model(0, "ghost")).unwrap_err();
        assert!(matches!(err, RepoError::MissingKey { ref table } if table == "accounts"));
    }
}
