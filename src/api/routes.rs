/*
 * Responsibility
 * - URL 構造を定義
 * - /, /health, /api/check-role と caller 互換用の alias
 * - alias はすべて同じ handler (response shape は一つだけ)
 */
use axum::{
    Router,
    routing::{any, get, post},
};

use crate::state::AppState;

use crate::api::handlers::{health::health, index::index, role_check::check_role};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/check-role", any(check_role))
        .route(
            "/api/botghost-check-role",
            get(check_role).post(check_role),
        )
        .route("/webhook", post(check_role))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use serde_json::{Value, json};
    use tower::ServiceExt; // oneshot

    use super::*;
    use crate::config::AppEnv;
    use crate::services::discord::{
        GuildId, LookupError, LookupResult, MembershipClient, RoleId, UserId,
    };
    use crate::services::role_check::RoleCheckService;

    /// In-process upstream: canned answers per user id, records every call.
    #[derive(Debug, Default)]
    struct FakeDiscord {
        answers: HashMap<String, LookupResult<Vec<RoleId>>>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeDiscord {
        fn roles(mut self, user_id: &str, roles: &[&str]) -> Self {
            self.answers.insert(
                user_id.to_string(),
                Ok(roles.iter().map(|r| RoleId::new(*r)).collect()),
            );
            self
        }

        fn fails(mut self, user_id: &str, err: LookupError) -> Self {
            self.answers.insert(user_id.to_string(), Err(err));
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl MembershipClient for FakeDiscord {
        fn backend_name(&self) -> &'static str {
            "fake"
        }

        async fn fetch_member_roles(
            &self,
            guild_id: &GuildId,
            user_id: &UserId,
        ) -> LookupResult<Vec<RoleId>> {
            assert_eq!(guild_id.as_str(), "1325850250027597845");
            self.calls.lock().unwrap().push(user_id.to_string());
            self.answers
                .get(user_id.as_str())
                .cloned()
                .unwrap_or_else(|| {
                    Err(LookupError::Rejected {
                        status: 404,
                        body: r#"{"message": "Unknown Member", "code": 10007}"#.to_string(),
                    })
                })
        }
    }

    fn app(fake: Arc<FakeDiscord>) -> Router {
        let svc = RoleCheckService::new(
            fake,
            GuildId::new("1325850250027597845"),
            RoleId::new("222"),
        );
        routes().with_state(AppState::new(AppEnv::Development, Arc::new(svc)))
    }

    async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
        let res = app.oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn body_user_id_with_target_role_is_granted() {
        let fake = Arc::new(FakeDiscord::default().roles("111", &["999", "222"]));

        let (status, body) = send(
            app(fake.clone()),
            post_json("/api/check-role", json!({ "userId": "111" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["hasRole"], json!(true));
        assert_eq!(body["roleFound"], json!(true));
        assert_eq!(body["authorized"], json!(true));
        assert_eq!(body["result"], json!("true"));
        assert_eq!(body["access"], json!("granted"));
        assert_eq!(body["userId"], json!("111"));
        assert_eq!(body["guildId"], json!("1325850250027597845"));
        assert_eq!(body["roleId"], json!("222"));
        assert_eq!(body["method"], json!("POST"));
        assert!(body["timestamp"].is_string());
        assert_eq!(fake.calls(), vec!["111".to_string()]);
    }

    #[tokio::test]
    async fn query_discord_id_without_target_role_is_denied() {
        let fake = Arc::new(FakeDiscord::default().roles("555", &["111"]));

        let (status, body) = send(app(fake.clone()), get_req("/api/check-role?discord_id=555")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["hasRole"], json!(false));
        assert_eq!(body["result"], json!("false"));
        assert_eq!(body["status"], json!("failed"));
        assert_eq!(body["access"], json!("denied"));
        assert_eq!(body["method"], json!("GET"));
        assert_eq!(fake.calls(), vec!["555".to_string()]);
    }

    #[tokio::test]
    async fn empty_role_list_is_denied() {
        let fake = Arc::new(FakeDiscord::default().roles("1", &[]));

        let (_, body) = send(app(fake), get_req("/api/check-role?id=1")).await;

        assert_eq!(body["hasRole"], json!(false));
    }

    #[tokio::test]
    async fn upstream_forbidden_is_forwarded_not_denied() {
        let fake = Arc::new(FakeDiscord::default().fails(
            "777",
            LookupError::Rejected {
                status: 403,
                body: r#"{"message": "Missing Access", "code": 50001}"#.to_string(),
            },
        ));

        let (status, body) = send(
            app(fake.clone()),
            post_json("/api/check-role", json!({ "user": { "id": "777" } })),
        )
        .await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["success"], json!(false));
        assert_ne!(body["hasRole"], json!(true));
        assert_eq!(body["upstreamStatus"], json!(403));
        assert_eq!(body["error"]["code"], json!("UPSTREAM_REJECTED"));
        assert_eq!(
            body["details"],
            json!(r#"{"message": "Missing Access", "code": 50001}"#)
        );
        assert_eq!(fake.calls().len(), 1);
    }

    #[tokio::test]
    async fn unknown_member_is_reported_as_404() {
        let fake = Arc::new(FakeDiscord::default());

        let (status, body) = send(
            app(fake),
            post_json("/api/check-role", json!({ "member": { "user": { "id": "9" } } })),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["upstreamStatus"], json!(404));
        assert_eq!(body["success"], json!(false));
    }

    #[tokio::test]
    async fn transport_failure_is_bad_gateway_with_debug_in_development() {
        let fake = Arc::new(FakeDiscord::default().fails(
            "5",
            LookupError::Transport {
                message: "error sending request".to_string(),
                detail: "reqwest::Error { kind: Request, source: ConnectionRefused }".to_string(),
            },
        ));

        let (status, body) = send(app(fake), get_req("/api/check-role?userId=5")).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["code"], json!("UPSTREAM_UNAVAILABLE"));
        assert_eq!(
            body["message"],
            json!("Discord API request failed: error sending request")
        );
        assert!(body["debug"].is_string());
    }

    #[tokio::test]
    async fn missing_identifier_never_calls_upstream() {
        let fake = Arc::new(FakeDiscord::default());

        let req = Request::builder()
            .method("POST")
            .uri("/api/check-role")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(app(fake.clone()), req).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["hasRole"], json!(false));
        assert_eq!(body["error"]["code"], json!("MISSING_USER_ID"));
        assert_eq!(body["error"]["message"], json!("User ID is required"));
        assert_eq!(
            body["receivedData"],
            json!({ "method": "POST", "body": {}, "query": {}, "contentType": null })
        );
        assert!(fake.calls().is_empty());
    }

    #[tokio::test]
    async fn malformed_data_without_other_sources_is_missing_identifier() {
        let fake = Arc::new(FakeDiscord::default());

        let (status, body) = send(
            app(fake.clone()),
            post_json("/webhook", json!({ "data": "{not json", "user": { "name": "x" } })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["receivedData"]["body"]["data"], json!("{not json"));
        assert!(fake.calls().is_empty());
    }

    #[tokio::test]
    async fn dot_segment_id_never_calls_upstream() {
        let fake = Arc::new(FakeDiscord::default());

        let (status, body) = send(app(fake.clone()), get_req("/api/check-role?userId=..")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], json!("MISSING_USER_ID"));
        assert!(fake.calls().is_empty());
    }

    #[tokio::test]
    async fn nested_form_user_id_is_accepted() {
        let fake = Arc::new(FakeDiscord::default().roles("777", &["222"]));

        let req = Request::builder()
            .method("POST")
            .uri("/webhook")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from("user%5Bid%5D=777"))
            .unwrap();
        let (status, body) = send(app(fake.clone()), req).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["hasRole"], json!(true));
        assert_eq!(fake.calls(), vec!["777".to_string()]);
    }

    #[tokio::test]
    async fn author_is_used_even_when_data_is_malformed() {
        let fake = Arc::new(FakeDiscord::default().roles("3", &["222"]));

        let (status, body) = send(
            app(fake),
            post_json("/webhook", json!({ "data": "{oops", "author": { "id": "3" } })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["hasRole"], json!(true));
    }

    #[tokio::test]
    async fn same_identifier_twice_gives_same_answer() {
        let fake = Arc::new(FakeDiscord::default().roles("111", &["222"]));

        let (_, first) = send(app(fake.clone()), get_req("/api/check-role?userId=111")).await;
        let (_, second) = send(app(fake.clone()), get_req("/api/check-role?userId=111")).await;

        assert_eq!(
            serde_json::to_vec(&first["hasRole"]).unwrap(),
            serde_json::to_vec(&second["hasRole"]).unwrap()
        );
        assert_eq!(fake.calls().len(), 2);
    }

    #[tokio::test]
    async fn form_encoded_body_is_accepted_on_alias() {
        let fake = Arc::new(FakeDiscord::default().roles("42", &["222"]));

        let req = Request::builder()
            .method("POST")
            .uri("/api/botghost-check-role")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from("discordUserId=42"))
            .unwrap();
        let (status, body) = send(app(fake), req).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["hasRole"], json!(true));
        assert_eq!(body["userId"], json!("42"));
    }

    #[tokio::test]
    async fn check_role_accepts_any_method() {
        let fake = Arc::new(FakeDiscord::default().roles("8", &["222"]));

        let req = Request::builder()
            .method("PUT")
            .uri("/api/check-role?member_id=8")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(app(fake), req).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["method"], json!("PUT"));
    }

    #[tokio::test]
    async fn webhook_alias_is_post_only() {
        let fake = Arc::new(FakeDiscord::default());

        let res = app(fake).oneshot(get_req("/webhook?userId=1")).await.unwrap();

        assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn health_and_index() {
        let fake = Arc::new(FakeDiscord::default());

        let (status, body) = send(app(fake.clone()), get_req("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], json!("OK"));
        assert!(body["timestamp"].is_string());

        let (status, body) = send(app(fake.clone()), get_req("/")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["endpoints"].as_array().map(Vec::len), Some(4));

        assert!(fake.calls().is_empty());
    }
}
