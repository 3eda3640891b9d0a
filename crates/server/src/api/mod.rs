pub mod exclusions;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod selection;

pub use routes::create_router;
