pub mod auth;
pub mod booking;
pub mod errors;
pub mod forms;
pub mod middleware;
pub mod routes;

use crate::repo;

pub struct AppState {
    pub repo: repo::ImplAppRepo,
}
