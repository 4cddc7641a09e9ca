//! Business logic layer: everything here is plain async functions over
//! the repository trait, independent of the HTTP layer.
//!
//! - [`booking`] - appointment creation, conflict detection and the
//!   status state machine
//! - [`user`] - credential verification for the login endpoint

pub mod booking;
pub mod user;
