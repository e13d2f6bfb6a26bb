pub mod health;
pub mod scoresheet;
