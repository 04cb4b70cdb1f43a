//! People service HTTP layer: shared state, error mapping, and routes.

pub mod error;
pub mod routes;
pub mod state;

pub use routes::build_router;
pub use state::AppState;
