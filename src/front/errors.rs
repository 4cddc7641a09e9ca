use derive_more::{Display, Error};
use log::error;
use ntex::{http, web};
use serde_json::json;

use crate::api::{booking::BookingError, user::AuthError};

#[derive(Debug, Display, Error)]
pub enum ApiError {
    #[display("authentication required")]
    Unauthenticated,
    #[display("{_0}")]
    Booking(BookingError),
    #[display("{_0}")]
    Auth(AuthError),
    #[display("internal server error")]
    Internal(#[error(not(source))] String),
}

impl From<BookingError> for ApiError {
    fn from(err: BookingError) -> Self {
        Self::Booking(err)
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        Self::Auth(err)
    }
}

impl ApiError {
    fn is_internal(&self) -> bool {
        matches!(
            self,
            ApiError::Internal(_)
                | ApiError::Booking(BookingError::Internal(_))
                | ApiError::Auth(AuthError::Internal(_))
        )
    }
}

impl web::error::WebResponseError for ApiError {
    fn error_response(&self, _: &web::HttpRequest) -> web::HttpResponse {
        // Store-internal detail is logged, never sent to the caller.
        let message = if self.is_internal() {
            error!("{:#?}", self);
            "internal server error".to_string()
        } else {
            self.to_string()
        };

        web::HttpResponse::build(self.status_code()).json(&json!({ "error": message }))
    }

    fn status_code(&self) -> http::StatusCode {
        match self {
            ApiError::Unauthenticated => http::StatusCode::UNAUTHORIZED,
            ApiError::Booking(err) => match err {
                BookingError::PetNotFound
                | BookingError::VeterinarianUnavailable
                | BookingError::ServiceUnavailable
                | BookingError::AppointmentNotFound => http::StatusCode::NOT_FOUND,
                BookingError::PermissionDenied | BookingError::TutorsOnlyCancel => {
                    http::StatusCode::FORBIDDEN
                }
                BookingError::SlotConflict => http::StatusCode::CONFLICT,
                BookingError::InvalidTransition { .. } => http::StatusCode::BAD_REQUEST,
                BookingError::Internal(_) => http::StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Auth(err) => match err {
                AuthError::InvalidCredentials => http::StatusCode::UNAUTHORIZED,
                AuthError::Internal(_) => http::StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Internal(_) => http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::appointment::AppointmentStatus;
    use ntex::web::error::WebResponseError;

    #[test]
    fn test_status_code_mapping() {
        assert_eq!(ApiError::Unauthenticated.status_code(), 401);
        assert_eq!(ApiError::Booking(BookingError::PetNotFound).status_code(), 404);
        assert_eq!(
            ApiError::Booking(BookingError::VeterinarianUnavailable).status_code(),
            404
        );
        assert_eq!(
            ApiError::Booking(BookingError::PermissionDenied).status_code(),
            403
        );
        assert_eq!(
            ApiError::Booking(BookingError::TutorsOnlyCancel).status_code(),
            403
        );
        assert_eq!(ApiError::Booking(BookingError::SlotConflict).status_code(), 409);
        assert_eq!(
            ApiError::Booking(BookingError::InvalidTransition {
                from: AppointmentStatus::Completed,
                to: AppointmentStatus::Scheduled,
            })
            .status_code(),
            400
        );
        assert_eq!(ApiError::Auth(AuthError::InvalidCredentials).status_code(), 401);
        assert_eq!(
            ApiError::Booking(BookingError::Internal("boom".into())).status_code(),
            500
        );
    }

    #[test]
    fn test_internal_errors_stay_opaque() {
        let err = ApiError::Booking(BookingError::Internal("sqlite: disk I/O error".into()));
        assert!(err.is_internal());
        assert_eq!(err.to_string(), "booking storage failure: sqlite: disk I/O error");
    }
}
