//! HTTP API handlers for cardio-predict

pub mod health;
pub mod list;
pub mod predict;
pub mod update;

pub use health::health_routes;
pub use list::list_db_contents;
pub use predict::predict;
pub use update::update;
