//! Request pipeline: path → address token → `IpAddr` → index → response

pub mod address;
pub mod dispatcher;
pub mod error;
pub mod response;
pub mod routes;

pub use dispatcher::{is_known_noise, LookupService, NOISE_PATHS};
pub use error::{translate_failure, LookupError, FAILURE_PREFIX};
pub use response::LookupOutcome;
pub use routes::create_lookup_router;
