use crate::entities::{Rental, RentalFilter, RentalKind, RentalStatus};
use crate::errors::DomainError;
use async_trait::async_trait;
use rust_decimal::Decimal;

/// Persistence port for rental records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RentalRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<Rental>, DomainError>;
    /// Records matching every populated field of `filter`, ordered by id.
    async fn find_matching(&self, filter: &RentalFilter) -> Result<Vec<Rental>, DomainError>;
    async fn save(&self, rental: &Rental) -> Result<Rental, DomainError>;
    async fn update(&self, rental: &Rental) -> Result<Rental, DomainError>;
    async fn delete(&self, id: i32) -> Result<(), DomainError>;
    /// Sum of amounts for the user's records of the given kind and status.
    /// `None` when no record matches.
    async fn sum_amounts(
        &self,
        user_id: i32,
        kind: RentalKind,
        status: RentalStatus,
    ) -> Result<Option<Decimal>, DomainError>;
}
