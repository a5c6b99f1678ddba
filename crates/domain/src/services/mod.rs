pub mod rental_service;
pub mod rental_validator;
pub mod user_service;

pub use rental_service::RentalService;
pub use user_service::UserService;
