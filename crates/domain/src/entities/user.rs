use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "MALE",
            Sex::Female => "FEMALE",
        }
    }
}

impl FromStr for Sex {
    type Err = crate::entities::UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MALE" => Ok(Sex::Male),
            "FEMALE" => Ok(Sex::Female),
            other => Err(crate::entities::UnknownVariant(other.to_string())),
        }
    }
}

/// Owner of rental records. The rental core only needs to know it exists.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct User {
    pub id: Option<i32>, // None for new users before persistence
    pub name: String,
    pub email: String,
    pub sex: Option<Sex>,
    #[serde(skip_serializing, default)]
    pub password: String,
    pub birth_date: Option<NaiveDate>,
    pub registered_on: Option<NaiveDate>,
}

impl User {
    pub fn new(name: String, email: String, password: String) -> Self {
        Self {
            id: None,
            name,
            email,
            sex: None,
            password,
            birth_date: None,
            registered_on: None,
        }
    }

    /// A bare reference carrying only the identifier.
    pub fn reference(id: i32) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), crate::DomainError> {
        if self.name.trim().is_empty() {
            return Err(crate::DomainError::validation("Informe um Nome."));
        }

        if self.email.trim().is_empty() {
            return Err(crate::DomainError::validation("Informe um Email."));
        }

        Ok(())
    }
}
