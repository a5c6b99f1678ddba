use crate::database::{rentals, users, SqlitePool};
use crate::repositories::sqlite_user_repository::UserModel;
use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::prelude::*;
use domain::{
    DomainError, Rental, RentalFilter, RentalKind, RentalRepository, RentalStatus, User,
};
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::debug;

// Database model - separate from domain entity
#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = rentals)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct RentalModel {
    id: i32,
    movie: String,
    month: i32,
    year: i32,
    amount: String,
    user_id: i32,
    kind: String,
    status: String,
    registered_on: Option<NaiveDate>,
}

#[derive(Insertable, AsChangeset)]
#[diesel(table_name = rentals)]
struct NewRentalModel {
    movie: String,
    month: i32,
    year: i32,
    amount: String,
    user_id: i32,
    kind: String,
    status: String,
    registered_on: Option<NaiveDate>,
}

fn missing(field: &str) -> DomainError {
    DomainError::RepositoryError(format!("cannot store a rental without {}", field))
}

fn corrupt(id: i32, field: &str, value: &str) -> DomainError {
    DomainError::RepositoryError(format!("rental {} has invalid {}: {}", id, field, value))
}

impl TryFrom<&Rental> for NewRentalModel {
    type Error = DomainError;

    fn try_from(rental: &Rental) -> Result<Self, Self::Error> {
        Ok(NewRentalModel {
            movie: rental.movie.clone().ok_or_else(|| missing("movie"))?,
            month: rental.month.ok_or_else(|| missing("month"))?,
            year: rental.year.ok_or_else(|| missing("year"))?,
            amount: rental
                .amount
                .ok_or_else(|| missing("amount"))?
                .to_string(),
            user_id: rental.user_id().ok_or_else(|| missing("user"))?,
            kind: rental
                .kind
                .ok_or_else(|| missing("kind"))?
                .as_str()
                .to_string(),
            status: rental
                .status
                .unwrap_or(RentalStatus::Pending)
                .as_str()
                .to_string(),
            registered_on: rental.registered_on,
        })
    }
}

/// Rebuilds a rental together with its owner, loaded in the same query.
fn into_rental((model, owner): (RentalModel, UserModel)) -> Result<Rental, DomainError> {
    let amount = Decimal::from_str(&model.amount)
        .map_err(|_| corrupt(model.id, "amount", &model.amount))?;
    let kind = RentalKind::from_str(&model.kind)
        .map_err(|_| corrupt(model.id, "kind", &model.kind))?;
    let status = RentalStatus::from_str(&model.status)
        .map_err(|_| corrupt(model.id, "status", &model.status))?;

    Ok(Rental {
        id: Some(model.id),
        movie: Some(model.movie),
        month: Some(model.month),
        year: Some(model.year),
        amount: Some(amount),
        user: Some(User::from(owner)),
        kind: Some(kind),
        status: Some(status),
        registered_on: model.registered_on,
    })
}

/// Adds decimal amounts stored as text. `None` for an empty input.
fn sum_amount_texts(amounts: &[String]) -> Result<Option<Decimal>, DomainError> {
    if amounts.is_empty() {
        return Ok(None);
    }

    amounts
        .iter()
        .try_fold(Decimal::ZERO, |total: Decimal, text| {
            let amount = Decimal::from_str(text).map_err(|e| {
                DomainError::RepositoryError(format!("invalid amount {}: {}", text, e))
            })?;
            total
                .checked_add(amount)
                .ok_or_else(|| DomainError::RepositoryError("balance overflow".to_string()))
        })
        .map(Some)
}

fn load_rental(conn: &mut SqliteConnection, id: i32) -> QueryResult<Option<(RentalModel, UserModel)>> {
    rentals::table
        .inner_join(users::table)
        .filter(rentals::id.eq(id))
        .select((RentalModel::as_select(), UserModel::as_select()))
        .first::<(RentalModel, UserModel)>(conn)
        .optional()
}

pub struct SqliteRentalRepository {
    pool: SqlitePool,
}

impl SqliteRentalRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RentalRepository for SqliteRentalRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<Rental>, DomainError> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        let result = tokio::task::spawn_blocking(move || load_rental(&mut conn, id))
            .await
            .map_err(|e| DomainError::RepositoryError(e.to_string()))?
            .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        result.map(into_rental).transpose()
    }

    async fn find_matching(&self, filter: &RentalFilter) -> Result<Vec<Rental>, DomainError> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        let criteria = filter.clone();
        let rows = tokio::task::spawn_blocking(move || {
            // Exact-match fields narrow the scan in SQL; the title is matched
            // by the filter itself so case folding covers non-ASCII text.
            let mut query = rentals::table
                .inner_join(users::table)
                .select((RentalModel::as_select(), UserModel::as_select()))
                .order(rentals::id.asc())
                .into_boxed();

            if let Some(user_id) = criteria.user_id {
                query = query.filter(rentals::user_id.eq(user_id));
            }
            if let Some(month) = criteria.month {
                query = query.filter(rentals::month.eq(month));
            }
            if let Some(year) = criteria.year {
                query = query.filter(rentals::year.eq(year));
            }
            if let Some(kind) = criteria.kind {
                query = query.filter(rentals::kind.eq(kind.as_str()));
            }
            if let Some(status) = criteria.status {
                query = query.filter(rentals::status.eq(status.as_str()));
            }

            query.load::<(RentalModel, UserModel)>(&mut conn)
        })
        .await
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        let candidates = rows
            .into_iter()
            .map(into_rental)
            .collect::<Result<Vec<_>, _>>()?;
        let found = filter.apply(candidates);
        debug!("Rental search matched {} record(s)", found.len());
        Ok(found)
    }

    async fn save(&self, rental: &Rental) -> Result<Rental, DomainError> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        let new_rental = NewRentalModel::try_from(rental)?;

        let result = tokio::task::spawn_blocking(move || {
            conn.transaction(|conn| {
                diesel::insert_into(rentals::table)
                    .values(&new_rental)
                    .execute(conn)?;

                // Get the last inserted row
                let id = rentals::table
                    .select(rentals::id)
                    .order(rentals::id.desc())
                    .first::<i32>(conn)?;

                load_rental(conn, id)
            })
        })
        .await
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        result
            .map(into_rental)
            .transpose()?
            .ok_or_else(|| DomainError::RepositoryError("inserted rental not found".to_string()))
    }

    async fn update(&self, rental: &Rental) -> Result<Rental, DomainError> {
        let rental_id = rental.id.ok_or_else(|| missing("id"))?;

        let mut conn = self
            .pool
            .get()
            .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        let changes = NewRentalModel::try_from(rental)?;

        let result = tokio::task::spawn_blocking(move || {
            conn.transaction(|conn| {
                diesel::update(rentals::table.filter(rentals::id.eq(rental_id)))
                    .set(&changes)
                    .execute(conn)?;

                // Fetch the updated rental
                load_rental(conn, rental_id)
            })
        })
        .await
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        result
            .map(into_rental)
            .transpose()?
            .ok_or_else(|| DomainError::NotFound(format!("rental {}", rental_id)))
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        let deleted = tokio::task::spawn_blocking(move || {
            diesel::delete(rentals::table.filter(rentals::id.eq(id))).execute(&mut conn)
        })
        .await
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        if deleted == 0 {
            return Err(DomainError::NotFound(format!("rental {}", id)));
        }
        Ok(())
    }

    async fn sum_amounts(
        &self,
        user_id: i32,
        kind: RentalKind,
        status: RentalStatus,
    ) -> Result<Option<Decimal>, DomainError> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        let amounts = tokio::task::spawn_blocking(move || {
            rentals::table
                .filter(rentals::user_id.eq(user_id))
                .filter(rentals::kind.eq(kind.as_str()))
                .filter(rentals::status.eq(status.as_str()))
                .select(rentals::amount)
                .load::<String>(&mut conn)
        })
        .await
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        sum_amount_texts(&amounts)
    }
}
