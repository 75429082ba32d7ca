pub mod appointment;
pub mod inventory_item;
pub mod message;
pub mod payment_method;
pub mod salon;
pub mod service;
pub mod staff;
pub mod user;
