pub mod sqlite_rental_repository;
pub mod sqlite_user_repository;

pub use sqlite_rental_repository::SqliteRentalRepository;
pub use sqlite_user_repository::SqliteUserRepository;
