use crate::entities::User;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Whether a rental record charges the user or credits them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RentalKind {
    Rental,
    Return,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RentalStatus {
    Pending,
    Effective,
    Canceled,
}

/// Error returned when a kind or status name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant(pub String);

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown variant: {}", self.0)
    }
}

impl std::error::Error for UnknownVariant {}

impl RentalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RentalKind::Rental => "RENTAL",
            RentalKind::Return => "RETURN",
        }
    }
}

impl FromStr for RentalKind {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "RENTAL" => Ok(RentalKind::Rental),
            "RETURN" => Ok(RentalKind::Return),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

impl fmt::Display for RentalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl RentalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RentalStatus::Pending => "PENDING",
            RentalStatus::Effective => "EFFECTIVE",
            RentalStatus::Canceled => "CANCELED",
        }
    }
}

impl FromStr for RentalStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(RentalStatus::Pending),
            "EFFECTIVE" => Ok(RentalStatus::Effective),
            "CANCELED" => Ok(RentalStatus::Canceled),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

impl fmt::Display for RentalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A movie rental or return tied to a user.
///
/// Every field a caller can omit is optional here, so the validator is the
/// single place that decides whether a record is acceptable. A record read
/// back from the store always has `id`, `user` and `status` set.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Rental {
    pub id: Option<i32>, // None until persisted
    pub movie: Option<String>,
    pub month: Option<i32>,
    pub year: Option<i32>,
    pub amount: Option<Decimal>,
    pub user: Option<User>, // resolved explicitly by the store, never lazily
    pub kind: Option<RentalKind>,
    pub status: Option<RentalStatus>,
    pub registered_on: Option<NaiveDate>,
}

impl Rental {
    pub fn new(
        movie: String,
        month: i32,
        year: i32,
        amount: Decimal,
        user: User,
        kind: RentalKind,
    ) -> Self {
        Self {
            id: None,
            movie: Some(movie),
            month: Some(month),
            year: Some(year),
            amount: Some(amount),
            user: Some(user),
            kind: Some(kind),
            status: None,
            registered_on: None,
        }
    }

    pub fn user_id(&self) -> Option<i32> {
        self.user.as_ref().and_then(|user| user.id)
    }

    pub fn set_status(&mut self, status: RentalStatus) {
        self.status = Some(status);
    }
}
