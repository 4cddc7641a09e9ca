use ntex::{
    http::Payload,
    web::{Error, FromRequest, HttpRequest},
};
use ntex_identity::RequestIdentity;

use crate::front::errors;
use crate::models;

/// Extracts the [`CallerIdentity`](models::user_app::CallerIdentity)
/// from the identity cookie minted at login. The booking engine trusts
/// this value and never re-derives it.
fn get_caller(auth_cookie: Option<String>) -> Result<models::user_app::CallerIdentity, Error> {
    serde_json::from_str(&auth_cookie.unwrap_or_default())
        .map_err(|_| errors::ApiError::Unauthenticated.into())
}

impl<Err> FromRequest<Err> for models::user_app::CallerIdentity {
    type Error = Error;

    fn from_request(
        req: &HttpRequest,
        _: &mut Payload,
    ) -> impl std::future::Future<Output = Result<Self, Self::Error>> {
        let identity_cookie = req.get_identity();
        futures::future::ready(get_caller(identity_cookie))
    }
}
