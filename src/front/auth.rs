use ntex::web;
use ntex_identity::Identity;
use serde_json::json;

use crate::{
    api,
    front::{AppState, errors, forms},
    models,
};

/// Verifies credentials and mints the identity cookie the rest of the
/// API authenticates with.
#[web::post("/login")]
pub async fn login(
    form: web::types::Json<forms::user::LoginForm>,
    identity: Identity,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let user = api::user::authenticate_user(&form.email, &form.password, &app_state.repo)
        .await
        .map_err(errors::ApiError::from)?;

    let caller = models::user_app::CallerIdentity::from(&user);
    identity.remember(
        serde_json::to_string(&caller)
            .map_err(|e| errors::ApiError::Internal(format!("caller serialization: {e}")))?,
    );

    Ok(web::HttpResponse::Ok().json(&json!({
        "id": user.id,
        "fullName": user.full_name,
        "role": user.role,
    })))
}

#[web::post("/logout")]
pub async fn logout(identity: Identity) -> impl web::Responder {
    identity.forget();
    web::HttpResponse::Ok().finish()
}
