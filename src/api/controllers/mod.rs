use axum::Router;

mod ping;
mod tags;

pub fn router() -> Router {
    ping::router()
        .merge(tags::router())
}
