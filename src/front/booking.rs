//! JSON route handlers for the appointment API. Authorization and
//! validation live in [`api::booking`]; handlers only translate between
//! HTTP and the engine.

use ntex::web;
use serde::Deserialize;
use serde_json::json;

use crate::{
    api,
    front::{AppState, errors, forms},
    models,
};

#[derive(Deserialize)]
pub struct AppointmentPath {
    pub appointment_id: i64,
}

#[web::get("")]
pub async fn list_bookings(
    caller: models::user_app::CallerIdentity,
    query: web::types::Query<forms::booking::ListBookingsQuery>,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let appointments = api::booking::list_bookings(&caller, &query, &app_state.repo)
        .await
        .map_err(errors::ApiError::from)?;

    Ok(web::HttpResponse::Ok().json(&json!({ "appointments": appointments })))
}

#[web::post("")]
pub async fn create_booking(
    caller: models::user_app::CallerIdentity,
    form: web::types::Json<forms::booking::CreateBookingForm>,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let appointment = api::booking::create_booking(&caller, &form, &app_state.repo)
        .await
        .map_err(errors::ApiError::from)?;

    Ok(web::HttpResponse::Created().json(&appointment))
}

#[web::get("/{appointment_id}")]
pub async fn get_booking(
    caller: models::user_app::CallerIdentity,
    path: web::types::Path<AppointmentPath>,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let appointment = api::booking::get_booking(&caller, path.appointment_id, &app_state.repo)
        .await
        .map_err(errors::ApiError::from)?;

    Ok(web::HttpResponse::Ok().json(&appointment))
}

#[web::put("/{appointment_id}")]
pub async fn update_booking_status(
    caller: models::user_app::CallerIdentity,
    path: web::types::Path<AppointmentPath>,
    form: web::types::Json<forms::booking::UpdateStatusForm>,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let appointment = api::booking::transition_status(
        &caller,
        path.appointment_id,
        form.status,
        form.observacoes.clone(),
        &app_state.repo,
    )
    .await
    .map_err(errors::ApiError::from)?;

    Ok(web::HttpResponse::Ok().json(&appointment))
}

/// Cancellation endpoint; the record is kept with status=cancelled.
#[web::delete("/{appointment_id}")]
pub async fn cancel_booking(
    caller: models::user_app::CallerIdentity,
    path: web::types::Path<AppointmentPath>,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let appointment = api::booking::cancel_booking(&caller, path.appointment_id, &app_state.repo)
        .await
        .map_err(errors::ApiError::from)?;

    Ok(web::HttpResponse::Ok().json(&appointment))
}
