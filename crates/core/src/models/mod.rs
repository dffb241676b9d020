pub mod holding;
pub mod index;
pub mod portfolio;
