//! Adaptive rate limiting over HTTP

#[cfg(test)]
mod tests {
    use crate::common::{TestGateway, get, test_config, with_bearer};
    use crate::init_app;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use authgate::RateLimitPolicy;
    use serde_json::Value;

    #[actix_web::test]
    async fn test_anonymous_fourth_request_is_429_and_audited() {
        let mut config = test_config();
        config.gateway.rate_limit.default_policy = RateLimitPolicy::per_minute(3).ok();
        let gateway = TestGateway::with_config(config).await;
        let app = init_app!(gateway);

        for remaining in ["2", "1", "0"] {
            let res = test::call_service(&app, get("/public/content").to_request()).await;
            assert_eq!(res.status(), StatusCode::OK);
            assert_eq!(res.headers().get("x-ratelimit-remaining").unwrap(), remaining);
        }

        let res = test::call_service(&app, get("/public/content").to_request()).await;
        assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(res.headers().contains_key("retry-after"));
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["error"]["code"], "TOO_MANY_REQUESTS");
        assert_eq!(
            body["error"]["message"],
            "Too many requests. Please try again later."
        );

        let denials = gateway.store.rate_limit_logs();
        assert_eq!(denials.len(), 1);
        assert_eq!(denials[0].identity, "ip:198.51.100.20");
        assert_eq!(denials[0].route, "/public/content");
        assert_eq!(denials[0].policy.times(), 3);
        assert!(denials[0].user_id.is_none());

        let requests = gateway.store.request_logs();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].identity, "anonymous:198.51.100.20");
        assert_eq!(requests[0].status, 429);
    }

    #[actix_web::test]
    async fn test_forwarded_clients_are_counted_separately() {
        let mut config = test_config();
        config.gateway.rate_limit.default_policy = RateLimitPolicy::per_minute(1).ok();
        let gateway = TestGateway::with_config(config).await;
        let app = init_app!(gateway);

        for client in ["203.0.113.1", "203.0.113.2"] {
            let req = get("/public/content")
                .insert_header(("x-forwarded-for", format!("{client}, 10.0.0.1")))
                .to_request();
            assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
        }

        let req = get("/public/content")
            .insert_header(("x-forwarded-for", "203.0.113.1"))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::TOO_MANY_REQUESTS
        );
    }

    #[actix_web::test]
    async fn test_users_are_limited_by_role_policy_per_user() {
        let gateway = TestGateway::new().await;
        gateway
            .set_role_policy("Viewer", RateLimitPolicy::per_minute(2).unwrap())
            .await;
        gateway.add_user("alice", &["Viewer"]).await;
        gateway.add_user("bob", &["Viewer"]).await;
        let app = init_app!(gateway);
        let alice = gateway.access_token("alice");
        let bob = gateway.access_token("bob");

        for _ in 0..2 {
            let res =
                test::call_service(&app, with_bearer(get("/users/me"), &alice).to_request()).await;
            assert_eq!(res.status(), StatusCode::OK);
            assert_eq!(res.headers().get("x-ratelimit-limit").unwrap(), "2");
        }
        let res =
            test::call_service(&app, with_bearer(get("/users/me"), &alice).to_request()).await;
        assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);

        // Same address, different user
        let res = test::call_service(&app, with_bearer(get("/users/me"), &bob).to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);

        let denials = gateway.store.rate_limit_logs();
        assert_eq!(denials.len(), 1);
        assert_eq!(denials[0].identity, "user:alice");
        assert!(denials[0].user_id.is_some());
    }

    #[actix_web::test]
    async fn test_most_permissive_role_policy_applies() {
        let gateway = TestGateway::new().await;
        gateway
            .set_role_policy("Viewer", RateLimitPolicy::per_minute(2).unwrap())
            .await;
        gateway.add_user("carol", &["Viewer", "Editor"]).await;
        let app = init_app!(gateway);
        let token = gateway.access_token("carol");

        let res =
            test::call_service(&app, with_bearer(get("/users/me"), &token).to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers().get("x-ratelimit-limit").unwrap(), "25");
    }

    #[actix_web::test]
    async fn test_user_without_roles_gets_default_policy() {
        let mut config = test_config();
        config.gateway.rate_limit.default_policy = RateLimitPolicy::per_minute(3).ok();
        let gateway = TestGateway::with_config(config).await;
        gateway.add_user("dave", &[]).await;
        let app = init_app!(gateway);
        let token = gateway.access_token("dave");

        let res =
            test::call_service(&app, with_bearer(get("/users/me"), &token).to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers().get("x-ratelimit-limit").unwrap(), "3");
    }

    #[actix_web::test]
    async fn test_no_default_policy_means_anonymous_unlimited() {
        let mut config = test_config();
        config.gateway.rate_limit.default_policy = None;
        let gateway = TestGateway::with_config(config).await;
        let app = init_app!(gateway);

        for _ in 0..20 {
            let res = test::call_service(&app, get("/public/content").to_request()).await;
            assert_eq!(res.status(), StatusCode::OK);
            assert!(!res.headers().contains_key("x-ratelimit-limit"));
        }
        assert!(gateway.store.rate_limit_logs().is_empty());
    }

    #[actix_web::test]
    async fn test_disabled_limiter_never_denies() {
        let mut config = test_config();
        config.gateway.rate_limit.enabled = false;
        config.gateway.rate_limit.default_policy = RateLimitPolicy::per_minute(1).ok();
        let gateway = TestGateway::with_config(config).await;
        let app = init_app!(gateway);

        for _ in 0..5 {
            let res = test::call_service(&app, get("/public/content").to_request()).await;
            assert_eq!(res.status(), StatusCode::OK);
        }
    }

    #[actix_web::test]
    async fn test_routes_have_separate_windows() {
        let mut config = test_config();
        config.gateway.rate_limit.default_policy = RateLimitPolicy::per_minute(1).ok();
        let gateway = TestGateway::with_config(config).await;
        let app = init_app!(gateway);

        assert_eq!(
            test::call_service(&app, get("/public/content").to_request()).await.status(),
            StatusCode::OK
        );
        assert_eq!(
            test::call_service(&app, get("/health/liveness").to_request()).await.status(),
            StatusCode::OK
        );
        assert_eq!(
            test::call_service(&app, get("/public/content").to_request()).await.status(),
            StatusCode::TOO_MANY_REQUESTS
        );
    }
}
