use api::AppState;
use axum::{routing::get, Router};

pub fn build_app(state: AppState) -> Router {
    api::app(state).route("/health", get(healthcheck))
}

async fn healthcheck() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use api::AppState;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use core_sim::{MarketEngine, MemoryStore, RecoveryPolicy};
    use tower::ServiceExt;

    #[tokio::test]
    async fn server_healthcheck_responds_ok() {
        let engine = MarketEngine::open(MemoryStore::new(), RecoveryPolicy::Defaults).unwrap();
        let app = super::build_app(AppState::new(engine));

        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
