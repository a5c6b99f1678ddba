use crate::entities::{Rental, RentalFilter, RentalKind, RentalStatus};
use crate::errors::DomainError;
use crate::repositories::RentalRepository;
use crate::services::rental_validator;
use chrono::Utc;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, info};

/// Rental lifecycle and balance rules on top of a [`RentalRepository`].
///
/// `update` and `delete` only accept records that were read back from the
/// store. Calling them with a record that has no identifier is a bug in the
/// caller and panics instead of returning a [`DomainError`].
pub struct RentalService {
    rental_repository: Arc<dyn RentalRepository>,
}

impl RentalService {
    pub fn new(rental_repository: Arc<dyn RentalRepository>) -> Self {
        Self { rental_repository }
    }

    pub fn validate(&self, rental: &Rental) -> Result<(), DomainError> {
        rental_validator::validate(rental)
    }

    /// Validate and store a new record. The status is always reset to
    /// pending, whatever the caller supplied.
    pub async fn save(&self, mut rental: Rental) -> Result<Rental, DomainError> {
        self.validate(&rental)?;

        rental.status = Some(RentalStatus::Pending);
        if rental.registered_on.is_none() {
            rental.registered_on = Some(Utc::now().date_naive());
        }

        let saved = self.rental_repository.save(&rental).await?;
        info!("Saved rental {:?} for user {:?}", saved.id, saved.user_id());
        Ok(saved)
    }

    /// Re-validate and store every field of an already persisted record.
    ///
    /// # Panics
    ///
    /// Panics if `rental.id` is `None`.
    pub async fn update(&self, rental: &Rental) -> Result<Rental, DomainError> {
        let id = rental
            .id
            .expect("update called with a rental that was never persisted");

        self.validate(rental)?;

        let updated = self.rental_repository.update(rental).await?;
        debug!("Updated rental {}", id);
        Ok(updated)
    }

    /// Change the status of a loaded record, then run the full update path.
    ///
    /// # Panics
    ///
    /// Panics if `rental.id` is `None`.
    pub async fn update_status(
        &self,
        rental: &mut Rental,
        status: RentalStatus,
    ) -> Result<Rental, DomainError> {
        rental.set_status(status);
        self.update(rental).await
    }

    /// # Panics
    ///
    /// Panics if `rental.id` is `None`.
    pub async fn delete(&self, rental: &Rental) -> Result<(), DomainError> {
        let id = rental
            .id
            .expect("delete called with a rental that was never persisted");

        self.rental_repository.delete(id).await?;
        info!("Deleted rental {}", id);
        Ok(())
    }

    pub async fn search(&self, filter: &RentalFilter) -> Result<Vec<Rental>, DomainError> {
        self.rental_repository.find_matching(filter).await
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Rental>, DomainError> {
        self.rental_repository.find_by_id(id).await
    }

    /// Effective returns minus effective rentals for a user.
    pub async fn balance_for_user(&self, user_id: i32) -> Result<Decimal, DomainError> {
        let returns = self
            .rental_repository
            .sum_amounts(user_id, RentalKind::Return, RentalStatus::Effective)
            .await?
            .unwrap_or(Decimal::ZERO);

        let rentals = self
            .rental_repository
            .sum_amounts(user_id, RentalKind::Rental, RentalStatus::Effective)
            .await?
            .unwrap_or(Decimal::ZERO);

        returns
            .checked_sub(rentals)
            .ok_or_else(|| DomainError::RepositoryError("balance overflow".to_string()))
    }
}
