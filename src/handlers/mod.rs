pub mod analytics;
pub mod appointments;
pub mod catalog;
pub mod common;
pub mod inventory;
pub mod messages;
pub mod payment_methods;
pub mod public;
pub mod staff;
