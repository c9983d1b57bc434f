pub mod affordability;
pub mod payment;
