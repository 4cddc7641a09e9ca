//! Route configuration, grouped by scope.

use super::{auth, booking};
use ntex::web;

/// Appointment API.
///
/// - `GET /appointments` - list (tutors see only their own pets')
/// - `POST /appointments` - create booking
/// - `GET /appointments/{id}` - booking detail
/// - `PUT /appointments/{id}` - status transition
/// - `DELETE /appointments/{id}` - cancel (soft, via status)
pub fn appointments(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/appointments").service((
        booking::list_bookings,
        booking::create_booking,
        booking::get_booking,
        booking::update_booking_status,
        booking::cancel_booking,
    )));
}

/// Session endpoints: `POST /auth/login`, `POST /auth/logout`.
pub fn auth(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/auth").service((auth::login, auth::logout)));
}
