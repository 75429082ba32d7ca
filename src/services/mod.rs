pub mod analytics;
pub mod appointments;
pub mod catalog;
pub mod insights;
pub mod inventory;
pub mod messages;
pub mod payment_methods;
pub mod staff;
