pub mod appointment;
pub mod payment;
pub mod pet;
pub mod service;
pub mod user_app;
pub mod veterinarian;
