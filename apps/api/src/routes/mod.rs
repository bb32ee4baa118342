pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::analysis::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::health_handler))
        // Analysis API
        .route("/api/v1/analysis", post(handlers::handle_analysis))
        .route(
            "/api/v1/analysis/skills",
            post(handlers::handle_skill_comparison),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::matching::{MatchConfig, SynonymTable};
    use crate::scoring::ScoringConfig;
    use crate::test_support::StubJudge;

    fn state_with(judge: Arc<StubJudge>) -> AppState {
        AppState {
            config: Config {
                anthropic_api_key: "test".into(),
                port: 0,
                rust_log: "debug".into(),
                synonyms_path: None,
                fuzzy_cutoff: 0.85,
                recovery_display_limit: 1,
            },
            synonyms: Arc::new(SynonymTable::builtin()),
            match_config: MatchConfig::default(),
            scoring: ScoringConfig::default(),
            judge,
        }
    }

    fn body() -> Value {
        json!({
            "jobDescription": {
                "requiredSkills": ["Rust", "Terraform"],
                "preferredSkills": ["Kubernetes"],
                "responsibilities": ["Own the deployment pipeline"]
            },
            "resume": {
                "contactInfo": {"email": "dev@example.com"},
                "skills": {"technical": ["Rust", "K8s"]},
                "experience": [{"title": "Engineer", "bullets": ["Shipped 3 releases"]}],
                "education": [{"institution": "State University"}]
            }
        })
    }

    async fn send(router: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let response = router.oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn test_root_and_health() {
        let router = build_router(state_with(Arc::new(StubJudge::all_covered())));
        let (status, value) = send(router.clone(), Method::GET, "/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(value["message"].as_str().unwrap().contains("connected"));

        let (status, value) = send(router, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(value["status"], "ok");
        assert_eq!(value["service"], "scorecard-api");
    }

    #[tokio::test]
    async fn test_analysis_returns_camel_case_report() {
        let judge = Arc::new(StubJudge::all_covered());
        let router = build_router(state_with(judge.clone()));

        let (status, value) = send(router, Method::POST, "/api/v1/analysis", Some(body())).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(value["skillComparison"]["missing"], json!(["Terraform"]));
        assert_eq!(value["skillComparison"]["matched"]["preferred"][0]["matchType"], "synonym");
        assert!(value["score"]["overallScore"].as_u64().unwrap() < 100);
        assert_eq!(value["score"]["breakdown"]["required"]["percentage"], 50);
        assert!(value["recoveryPlan"]["items"].as_array().unwrap().len() >= 1);
        assert_eq!(value["topRecoveryItems"].as_array().unwrap().len(), 1);
        assert!(value["resumeFeedback"]["items"].is_array());
        assert_eq!(judge.calls(), 1);
    }

    #[tokio::test]
    async fn test_analysis_rejects_empty_job_description() {
        let router = build_router(state_with(Arc::new(StubJudge::all_covered())));
        let request = json!({"jobDescription": {}, "resume": {}});

        let (status, value) = send(router, Method::POST, "/api/v1/analysis", Some(request)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(value["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_judge_failure_maps_to_generic_503() {
        let router = build_router(state_with(Arc::new(StubJudge::failing())));

        let (status, value) = send(router, Method::POST, "/api/v1/analysis", Some(body())).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(value["error"]["code"], "COLLABORATOR_UNAVAILABLE");
        assert_eq!(
            value["error"]["message"],
            "Analysis is temporarily unavailable. Please try again."
        );
    }

    #[tokio::test]
    async fn test_skill_endpoint_never_calls_judge() {
        let judge = Arc::new(StubJudge::failing());
        let router = build_router(state_with(judge.clone()));

        let (status, value) =
            send(router, Method::POST, "/api/v1/analysis/skills", Some(body())).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(value["skillComparison"]["matched"]["required"][0]["jdSkill"], "Rust");
        assert_eq!(judge.calls(), 0);
    }
}
