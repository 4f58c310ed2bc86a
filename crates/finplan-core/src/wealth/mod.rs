pub mod expenses;
pub mod insurance;
pub mod retirement;
