pub mod credit_score;
pub mod growth;
pub mod loan;
pub mod tax;
pub mod wealth;
