//! 好莱坞明星目录

pub mod handler;
pub mod model;
pub mod repository;
pub mod service;

use axum::{routing::get, Router};

use handler::AppState;

/// 明星资源路由，挂载在 `/hollywoodStars`
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/hollywoodStars",
            get(handler::list_stars).post(handler::create_star),
        )
        .route(
            "/hollywoodStars/:id",
            get(handler::get_star)
                .put(handler::update_star)
                .delete(handler::delete_star),
        )
}
