pub mod rental;
pub mod rental_filter;
pub mod user;

pub use rental::*;
pub use rental_filter::*;
pub use user::*;
