//! Route configuration.

use crate::handlers;
use crate::metrics::metrics_handler;
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let cookbook_routes = Router::new()
        .route("/cookbooks", get(handlers::list_cookbooks))
        .route("/cookbooks/{name}", get(handlers::get_cookbook_versions))
        .route(
            "/cookbooks/{name}/{version}",
            get(handlers::get_cookbook)
                .put(handlers::put_cookbook)
                .delete(handlers::delete_cookbook),
        )
        .route(
            "/cookbooks/{name}/{version}/files/{checksum}",
            get(handlers::get_cookbook_file),
        )
        .route(
            "/cookbooks/{name}/{version}/parts",
            get(handlers::get_cookbook_parts),
        );

    let data_bag_routes = Router::new()
        .route(
            "/data",
            get(handlers::list_data_bags).post(handlers::create_data_bag),
        )
        .route(
            "/data/{bag}",
            get(handlers::get_data_bag)
                .post(handlers::create_data_bag_item)
                .delete(handlers::delete_data_bag),
        )
        .route(
            "/data/{bag}/{item}",
            get(handlers::get_data_bag_item)
                .put(handlers::update_data_bag_item)
                .delete(handlers::delete_data_bag_item),
        );

    let mut router = Router::new()
        .route("/health", get(handlers::health_check))
        .merge(cookbook_routes)
        .merge(data_bag_routes);

    if state.config.server.metrics_enabled {
        router = router.route("/metrics", get(metrics_handler));
    }

    router.layer(TraceLayer::new_for_http()).with_state(state)
}
