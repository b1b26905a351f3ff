pub mod client_handlers;
pub mod diagram_handlers;
pub mod extractors;
pub mod handlers;
pub mod routes;
pub mod user_extractor;

pub use handlers::*;
pub use routes::*;
