#![allow(clippy::unwrap_used, clippy::expect_used)]
#![allow(dead_code)]

use modkit_repo::{Col, Decoration, HasColumns, RepoTemplate};
use sea_orm::{ActiveValue, ConnectOptions, ConnectionTrait, Database, DatabaseConnection};

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

pub mod token {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "tokens")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub account_id: i64,
        pub label: String,
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

#[derive(Debug, Clone)]
pub struct TokenColumns {
    pub id: Col<token::Entity, uuid::Uuid>,
    pub account_id: Col<token::Entity, i64>,
    pub label: Col<token::Entity, String>,
}

impl HasColumns for token::Entity {
    type Columns = TokenColumns;

    fn columns(decoration: &Decoration) -> TokenColumns {
        TokenColumns {
            id: Col::new(token::Column::Id, decoration),
            account_id: Col::new(token::Column::AccountId, decoration),
            label: Col::new(token::Column::Label, decoration),
        }
    }
}

pub type Accounts = RepoTemplate<account::Entity, AccountColumns>;
pub type Tokens = RepoTemplate<token::Entity, TokenColumns>;

/// Fresh in-memory database with the test schema.
///
/// A single pooled connection keeps every statement on the same in-memory
/// database.
pub async fn memory_db() -> DatabaseConnection {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opts)
        .await
        .expect("Failed to connect to database");

    db.execute_unprepared(
        "CREATE TABLE accounts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT NOT NULL UNIQUE,
            password TEXT NOT NULL,
            nickname TEXT NOT NULL,
            age INTEGER NOT NULL
        )",
    )
    .await
    .expect("Failed to create accounts");

    db.execute_unprepared(
        "CREATE TABLE tokens (
            id BLOB PRIMARY KEY NOT NULL,
            account_id INTEGER NOT NULL,
            label TEXT NOT NULL
        )",
    )
    .await
    .expect("Failed to create tokens");

    db
}

pub fn new_account(username: &str, nickname: &str, age: i32) -> account::ActiveModel {
    account::ActiveModel {
        id: ActiveValue::NotSet,
        username: ActiveValue::Set(username.to_owned()),
        password: ActiveValue::Set(format!("{username}-secret")),
        nickname: ActiveValue::Set(nickname.to_owned()),
        age: ActiveValue::Set(age),
    }
}

/// Insert accounts in order and return them as stored.
pub async fn seed<C: ConnectionTrait>(
    db: &C,
    rows: &[(&str, &str, i32)],
) -> Vec<account::Model> {
    let repo = Accounts::of();
    let repo = repo.repo(db);
    let mut stored = Vec::with_capacity(rows.len());
    for (username, nickname, age) in rows {
        stored.push(
            repo.create(new_account(username, nickname, *age))
                .await
                .expect("Failed to seed account"),
        );
    }
    stored
}
