//! Entity and descriptor shared by unit tests.

use crate::class::HasColumns;
use crate::column::{Col, Decoration};

pub mod account {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "accounts")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i64,
        #[sea_orm(unique)]
        pub username: String,
        pub password: String,
        pub nickname: String,
        pub age: i32,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

#[derive(Debug, Clone)]
pub struct AccountColumns {
    pub id: Col<account::Entity, i64>,
    pub username: Col<account::Entity, String>,
    pub password: Col<account::Entity, String>,
    pub nickname: Col<account::Entity, String>,
    pub age: Col<account::Entity, i32>,
}

impl HasColumns for account::Entity {
    type Columns = AccountColumns;

    fn columns(decoration: &Decoration) -> AccountColumns {
        AccountColumns {
            id: Col::new(account::Column::Id, decoration),
            username: Col::new(account::Column::Username, decoration),
            password: Col::new(account::Column::Password, decoration),
            nickname: Col::new(account::Column::Nickname, decoration),
            age: Col::new(account::Column::Age, decoration),
        }
    }
}

pub fn cols() -> AccountColumns {
    account::Entity::columns(&Decoration::Plain)
}

pub fn model(id: i64, username: &str) -> account::Model {
    account::Model {
        id,
        username: username.to_owned(),
        password: "pw".to_owned(),
        nickname: format!("nick-{username}"),
        age: 20,
    }
}
