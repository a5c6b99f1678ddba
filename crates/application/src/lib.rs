use domain::*;
use infrastructure::*;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::info;

/// Rental Application - wires storage, repositories and services once at
/// startup and hands them to whoever serves requests.
pub struct RentalApp {
    pub rental_service: RentalService,
    pub user_service: UserService,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserBalance {
    pub user: User,
    pub balance: Decimal,
}

impl RentalApp {
    pub fn new(database_url: &str, pool_size: u32) -> Result<Self, DomainError> {
        // Infrastructure layer - database setup
        let database = Database::new(database_url, pool_size)?;
        Ok(Self::from_database(&database))
    }

    /// Application backed by a fresh in-memory database.
    pub fn in_memory() -> Result<Self, DomainError> {
        let database = Database::in_memory()?;
        Ok(Self::from_database(&database))
    }

    fn from_database(database: &Database) -> Self {
        let pool = database.get_pool().clone();

        // Create repository implementations
        let rental_repository: Arc<dyn RentalRepository> =
            Arc::new(SqliteRentalRepository::new(pool.clone()));
        let user_repository: Arc<dyn UserRepository> =
            Arc::new(SqliteUserRepository::new(pool));

        info!("Rental services initialised");

        Self {
            rental_service: RentalService::new(rental_repository),
            user_service: UserService::new(user_repository),
        }
    }

    /// Balance of an existing user; `NotFound` when the user is unknown.
    pub async fn balance_for_user(&self, user_id: i32) -> Result<UserBalance, DomainError> {
        let user = self.user_service.get_user_by_id(user_id).await?;
        let balance = self.rental_service.balance_for_user(user_id).await?;
        Ok(UserBalance { user, balance })
    }
}
