use crate::database::{users, SqlitePool};
use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::prelude::*;
use domain::{DomainError, Sex, User, UserRepository};

// Database model - separate from domain entity
#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct UserModel {
    id: i32,
    name: String,
    email: String,
    sex: Option<String>,
    password: String,
    birth_date: Option<NaiveDate>,
    registered_on: Option<NaiveDate>,
}

#[derive(Insertable)]
#[diesel(table_name = users)]
struct NewUserModel {
    name: String,
    email: String,
    sex: Option<String>,
    password: String,
    birth_date: Option<NaiveDate>,
    registered_on: Option<NaiveDate>,
}

impl From<UserModel> for User {
    fn from(model: UserModel) -> Self {
        User {
            id: Some(model.id),
            name: model.name,
            email: model.email,
            // Unknown values are dropped rather than failing the whole read.
            sex: model.sex.and_then(|sex| sex.parse::<Sex>().ok()),
            password: model.password,
            birth_date: model.birth_date,
            registered_on: model.registered_on,
        }
    }
}

impl From<&User> for NewUserModel {
    fn from(user: &User) -> Self {
        NewUserModel {
            name: user.name.clone(),
            email: user.email.clone(),
            sex: user.sex.map(|sex| sex.as_str().to_string()),
            password: user.password.clone(),
            birth_date: user.birth_date,
            registered_on: user.registered_on,
        }
    }
}

pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, DomainError> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        let result = tokio::task::spawn_blocking(move || {
            users::table
                .filter(users::id.eq(id))
                .select(UserModel::as_select())
                .first::<UserModel>(&mut conn)
                .optional()
        })
        .await
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        Ok(result.map(|model| model.into()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        let email = email.to_string();
        let result = tokio::task::spawn_blocking(move || {
            users::table
                .filter(users::email.eq(email))
                .select(UserModel::as_select())
                .first::<UserModel>(&mut conn)
                .optional()
        })
        .await
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        Ok(result.map(|model| model.into()))
    }

    async fn save(&self, user: &User) -> Result<User, DomainError> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        let new_user = NewUserModel::from(user);

        let result = tokio::task::spawn_blocking(move || {
            conn.transaction(|conn| {
                diesel::insert_into(users::table)
                    .values(&new_user)
                    .execute(conn)?;

                // Get the last inserted row
                users::table
                    .order(users::id.desc())
                    .select(UserModel::as_select())
                    .first::<UserModel>(conn)
            })
        })
        .await
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        Ok(result.into())
    }
}
