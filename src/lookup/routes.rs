use axum::Router;
use std::sync::Arc;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use crate::index::GeolocationIndex;

use super::dispatcher::{dispatch, LookupService};
use super::error::handle_panic;

/// Build the router serving address lookups against `index`
///
/// Every path goes through [`dispatch`]; the whole path is one address
/// expression, so no per-segment routes are registered.
pub fn create_lookup_router(index: Arc<dyn GeolocationIndex>) -> Router {
    let service = Arc::new(LookupService::new(index));

    Router::new()
        .fallback(dispatch)
        .layer(CatchPanicLayer::custom(handle_panic))
        // Failures are already logged once by `LookupError::into_response`.
        .layer(TraceLayer::new_for_http().on_failure(()))
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::RangeIndex;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;
    use tracing_test::traced_test;

    #[tokio::test]
    #[traced_test]
    async fn test_failure_is_logged_once_as_warning() {
        let index = RangeIndex::from_json("[]").unwrap();
        let app = create_lookup_router(Arc::new(index));

        let request = Request::builder()
            .uri("/not-an-ip")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        logs_assert(|lines: &[&str]| {
            let warnings = lines
                .iter()
                .filter(|line| line.contains("WARN") && line.contains("lookup request failed"))
                .count();
            let errors = lines.iter().filter(|line| line.contains("ERROR")).count();

            match (warnings, errors) {
                (1, 0) => Ok(()),
                _ => Err(format!("expected 1 warning and no errors, got {warnings} and {errors}")),
            }
        });
    }
}
