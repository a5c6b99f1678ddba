use crate::entities::User;
use crate::errors::DomainError;
use crate::repositories::UserRepository;
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

pub const EMAIL_TAKEN: &str = "Já existe um usuário cadastrado com este email.";

/// Registration and lookup of the users rental records belong to.
pub struct UserService {
    user_repository: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(user_repository: Arc<dyn UserRepository>) -> Self {
        Self { user_repository }
    }

    /// Create a new user with business validation
    pub async fn create_user(&self, mut user: User) -> Result<User, DomainError> {
        user.validate()?;
        self.ensure_email_available(&user.email).await?;

        user.id = None;
        user.registered_on = Some(Utc::now().date_naive());

        let saved = self.user_repository.save(&user).await?;
        info!("Registered user {:?}", saved.id);
        Ok(saved)
    }

    pub async fn ensure_email_available(&self, email: &str) -> Result<(), DomainError> {
        if self.user_repository.find_by_email(email).await?.is_some() {
            return Err(DomainError::validation(EMAIL_TAKEN));
        }
        Ok(())
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<User>, DomainError> {
        self.user_repository.find_by_id(id).await
    }

    /// Like [`UserService::find_by_id`] but absence is an error.
    pub async fn get_user_by_id(&self, id: i32) -> Result<User, DomainError> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("user {}", id)))
    }
}
