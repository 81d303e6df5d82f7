//! Login, refresh rotation and bearer failures over HTTP

#[cfg(test)]
mod tests {
    use crate::common::{PASSWORD, TestGateway, get, refresh_request, token_request, with_bearer};
    use crate::init_app;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use authgate::Claims;
    use authgate::storage::CredentialStore;
    use serde_json::Value;
    use std::time::Duration;

    #[actix_web::test]
    async fn test_login_returns_usable_token_pair() {
        let gateway = TestGateway::new().await;
        gateway.add_user("alice", &["Viewer"]).await;
        let app = init_app!(gateway);

        let res = test::call_service(&app, token_request("alice", PASSWORD).to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);

        let body: Value = test::read_body_json(res).await;
        let access = body["access_token"].as_str().unwrap();
        assert_eq!(access.split('.').count(), 3);
        assert!(body["refresh_token"].as_str().is_some());
        assert_eq!(body["token_type"], "bearer");
        assert_eq!(body["expires_in"], 1800);

        let res =
            test::call_service(&app, with_bearer(get("/users/me"), access).to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
        let profile: Value = test::read_body_json(res).await;
        assert_eq!(profile["data"]["username"], "alice");
        assert!(profile["data"].get("password_hash").is_none());

        let audit = gateway.store.auth_logs();
        assert_eq!(audit.len(), 1);
        assert!(audit[0].success);
        assert_eq!(audit[0].endpoint, "/auth/token");
        assert_eq!(audit[0].client_ip, "198.51.100.20");
    }

    #[actix_web::test]
    async fn test_login_failures() {
        let gateway = TestGateway::new().await;
        gateway.add_user("alice", &["Viewer"]).await;
        let app = init_app!(gateway);

        let res = test::call_service(&app, token_request("alice", "wrong").to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["error"]["code"], "CREDENTIALS_INVALID");
        assert_eq!(body["error"]["message"], "Could not validate credentials");

        let res = test::call_service(&app, token_request("nobody", PASSWORD).to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["error"]["code"], "INEXISTENT_USERNAME");

        // Missing password field
        let req = test::TestRequest::post()
            .uri("/auth/token")
            .set_form([("username", "alice")])
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let failures = gateway
            .store
            .auth_logs()
            .into_iter()
            .filter(|entry| !entry.success)
            .count();
        assert_eq!(failures, 2);
    }

    #[actix_web::test]
    async fn test_refresh_rotates_and_old_token_is_rejected() {
        let gateway = TestGateway::new().await;
        gateway.add_user("alice", &["Viewer"]).await;
        let app = init_app!(gateway);

        let res = test::call_service(&app, token_request("alice", PASSWORD).to_request()).await;
        let first: Value = test::read_body_json(res).await;
        let first_refresh = first["refresh_token"].as_str().unwrap().to_string();

        let res = test::call_service(&app, refresh_request(&first_refresh).to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
        let second: Value = test::read_body_json(res).await;
        let second_refresh = second["refresh_token"].as_str().unwrap().to_string();
        assert_ne!(first_refresh, second_refresh);

        // Reusing the superseded token fails
        let res = test::call_service(&app, refresh_request(&first_refresh).to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["error"]["code"], "CREDENTIALS_INVALID");

        // The current one still rotates
        let res = test::call_service(&app, refresh_request(&second_refresh).to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_new_login_supersedes_refresh_token() {
        let gateway = TestGateway::new().await;
        gateway.add_user("alice", &["Viewer"]).await;
        let app = init_app!(gateway);

        let res = test::call_service(&app, token_request("alice", PASSWORD).to_request()).await;
        let first: Value = test::read_body_json(res).await;
        let res = test::call_service(&app, token_request("alice", PASSWORD).to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);

        let stale = first["refresh_token"].as_str().unwrap();
        let res = test::call_service(&app, refresh_request(stale).to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_token_types_are_not_interchangeable() {
        let gateway = TestGateway::new().await;
        gateway.add_user("alice", &["Viewer"]).await;
        let app = init_app!(gateway);

        let res = test::call_service(&app, token_request("alice", PASSWORD).to_request()).await;
        let pair: Value = test::read_body_json(res).await;
        let access = pair["access_token"].as_str().unwrap();
        let refresh = pair["refresh_token"].as_str().unwrap();

        let res =
            test::call_service(&app, with_bearer(get("/users/me"), refresh).to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let res = test::call_service(&app, refresh_request(access).to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_expired_and_malformed_tokens_are_401() {
        let gateway = TestGateway::new().await;
        gateway.add_user("alice", &["Viewer"]).await;
        let app = init_app!(gateway);

        let expired = gateway
            .state
            .auth
            .jwt()
            .issue(Claims::access("alice", Vec::new()), Duration::ZERO)
            .unwrap();
        let res =
            test::call_service(&app, with_bearer(get("/users/me"), &expired).to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["error"]["code"], "EXPIRED_TOKEN");
        assert_eq!(body["error"]["message"], "This token has expired");

        let res =
            test::call_service(&app, with_bearer(get("/users/me"), "a.b.c").to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["error"]["code"], "MALFORMED_TOKEN");

        let res = test::call_service(&app, get("/users/me").to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(res.headers().get("www-authenticate").unwrap(), "Bearer");
    }

    #[actix_web::test]
    async fn test_inactive_user_cannot_login_or_use_tokens() {
        let gateway = TestGateway::new().await;
        gateway.add_user("alice", &["Viewer"]).await;
        let app = init_app!(gateway);
        let token = gateway.access_token("alice");

        gateway.store.set_user_active("alice", false).await.unwrap();

        let res = test::call_service(&app, token_request("alice", PASSWORD).to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["error"]["code"], "INACTIVE_USER");

        let res =
            test::call_service(&app, with_bearer(get("/users/me"), &token).to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_token_for_deleted_subject_is_401() {
        let gateway = TestGateway::new().await;
        let app = init_app!(gateway);
        let token = gateway.access_token("ghost");

        let res =
            test::call_service(&app, with_bearer(get("/users/me"), &token).to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["error"]["code"], "INEXISTENT_USERNAME");
    }
}
