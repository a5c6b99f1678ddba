//! Business rules a rental record must satisfy before it is stored.
//!
//! Checks run in a fixed order and stop at the first failure. The messages
//! are part of the public HTTP contract and must not change.

use crate::entities::Rental;
use crate::errors::DomainError;
use rust_decimal::Decimal;

pub const INVALID_MOVIE: &str = "Informe um Filme válido.";
pub const INVALID_MONTH: &str = "Informe um Mês válido.";
pub const INVALID_YEAR: &str = "Informe um Ano válido.";
pub const MISSING_USER: &str = "Informe um Usuário.";
pub const INVALID_AMOUNT: &str = "Informe um Valor válido.";
pub const MISSING_KIND: &str = "Informe um tipo de Locação.";

pub fn validate(rental: &Rental) -> Result<(), DomainError> {
    if rental
        .movie
        .as_deref()
        .map_or(true, |movie| movie.trim().is_empty())
    {
        return Err(DomainError::validation(INVALID_MOVIE));
    }

    if !rental.month.is_some_and(|month| (1..=12).contains(&month)) {
        return Err(DomainError::validation(INVALID_MONTH));
    }

    // Length of the decimal rendering, sign included.
    if !rental.year.is_some_and(|year| year.to_string().len() == 4) {
        return Err(DomainError::validation(INVALID_YEAR));
    }

    if rental.user_id().is_none() {
        return Err(DomainError::validation(MISSING_USER));
    }

    if !rental.amount.is_some_and(|amount| amount > Decimal::ZERO) {
        return Err(DomainError::validation(INVALID_AMOUNT));
    }

    if rental.kind.is_none() {
        return Err(DomainError::validation(MISSING_KIND));
    }

    Ok(())
}
