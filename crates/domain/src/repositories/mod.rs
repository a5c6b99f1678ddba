pub mod rental_repository;
pub mod user_repository;

pub use rental_repository::RentalRepository;
pub use user_repository::UserRepository;

#[cfg(test)]
pub use rental_repository::MockRentalRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
