use crate::error::{ApiError, INVALID_STATUS, USER_NOT_FOUND};
use chrono::NaiveDate;
use domain::{Rental, RentalKind, RentalStatus, Sex, User, UserService};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Wire form of a rental record. The owner travels as its identifier only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RentalPayload {
    pub id: Option<i32>,
    pub filme: Option<String>,
    pub mes: Option<i32>,
    pub ano: Option<i32>,
    pub valor: Option<Decimal>,
    pub usuario: Option<i32>,
    pub tipo: Option<String>,
    pub status: Option<String>,
    pub data_cadastro: Option<NaiveDate>,
}

impl From<&Rental> for RentalPayload {
    fn from(rental: &Rental) -> Self {
        Self {
            id: rental.id,
            filme: rental.movie.clone(),
            mes: rental.month,
            ano: rental.year,
            valor: rental.amount,
            usuario: rental.user_id(),
            tipo: rental.kind.map(|kind| kind.to_string()),
            status: rental.status.map(|status| status.to_string()),
            data_cadastro: rental.registered_on,
        }
    }
}

impl RentalPayload {
    /// Build a domain record, resolving the owner through `users`.
    ///
    /// An unknown `tipo` is treated as missing so the validator reports it.
    pub async fn into_rental(self, users: &UserService) -> Result<Rental, ApiError> {
        let user = match self.usuario {
            Some(user_id) => Some(
                users
                    .find_by_id(user_id)
                    .await?
                    .ok_or_else(|| ApiError::bad_request(USER_NOT_FOUND))?,
            ),
            None => None,
        };

        let status = self
            .status
            .as_deref()
            .map(|status| status.parse::<RentalStatus>())
            .transpose()
            .map_err(|_| ApiError::bad_request(INVALID_STATUS))?;

        Ok(Rental {
            id: self.id,
            movie: self.filme,
            month: self.mes,
            year: self.ano,
            amount: self.valor,
            user,
            kind: self
                .tipo
                .as_deref()
                .and_then(|tipo| tipo.parse::<RentalKind>().ok()),
            status,
            registered_on: self.data_cadastro,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusPayload {
    pub status: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUserPayload {
    #[serde(default)]
    pub nome: String,
    #[serde(default)]
    pub email: String,
    pub sexo: Option<Sex>,
    #[serde(default)]
    pub senha: String,
    pub data_nascimento: Option<NaiveDate>,
}

impl From<NewUserPayload> for User {
    fn from(payload: NewUserPayload) -> Self {
        let mut user = User::new(payload.nome, payload.email, payload.senha);
        user.sex = payload.sexo;
        user.birth_date = payload.data_nascimento;
        user
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Option<i32>,
    pub nome: String,
    pub email: String,
    pub sexo: Option<Sex>,
    pub data_nascimento: Option<NaiveDate>,
    pub data_cadastro: Option<NaiveDate>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            nome: user.name,
            email: user.email,
            sexo: user.sex,
            data_nascimento: user.birth_date,
            data_cadastro: user.registered_on,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceResponse {
    pub usuario: i32,
    pub saldo: Decimal,
}
