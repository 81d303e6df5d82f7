//! Middleware tests

#[cfg(test)]
mod tests {
    use super::super::{
        AuditMiddleware, AuthMiddleware, AuthenticatedUser, RateLimitMiddleware, RbacGuard,
        RouteMatcher, bearer_token,
    };
    use crate::config::Config;
    use crate::core::models::NewUser;
    use crate::core::rate_limiter::RateLimitPolicy;
    use crate::server::state::AppState;
    use crate::storage::{CredentialStore, MemoryStore, StorageLayer, bootstrap};
    use actix_web::http::StatusCode;
    use actix_web::http::header::{AUTHORIZATION, HeaderMap, HeaderValue};
    use actix_web::{App, HttpResponse, test as actix_test, web};
    use std::net::SocketAddr;
    use std::sync::Arc;

    fn patterns(list: &[&str]) -> Vec<String> {
        list.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn test_route_matcher_globs() {
        let matcher = RouteMatcher::new(&patterns(&["/health", "/docs/*", "/v?/ping"])).unwrap();

        assert!(matcher.is_match("/health"));
        assert!(!matcher.is_match("/health/deep"));
        assert!(matcher.is_match("/docs/"));
        assert!(matcher.is_match("/docs/a/b/c"));
        assert!(!matcher.is_match("/docsx"));
        assert!(matcher.is_match("/v1/ping"));
        assert!(!matcher.is_match("/v10/ping"));
    }

    #[test]
    fn test_route_matcher_escapes_regex_syntax() {
        let matcher = RouteMatcher::new(&patterns(&["/a.b", "/c+(d)"])).unwrap();

        assert!(matcher.is_match("/a.b"));
        assert!(!matcher.is_match("/axb"));
        assert!(matcher.is_match("/c+(d)"));
        assert!(!matcher.is_match("/ccd"));
    }

    #[test]
    fn test_empty_route_matcher_matches_nothing() {
        let matcher = RouteMatcher::new(&[]).unwrap();
        assert!(!matcher.is_match("/"));
        assert!(matcher.patterns().is_empty());
    }

    #[test]
    fn test_bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(bearer_token(&headers), Some("abc.def.ghi"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwYXNz"));
        assert_eq!(bearer_token(&headers), None);
    }

    fn peer() -> SocketAddr {
        "10.1.2.3:40000".parse().unwrap()
    }

    async fn setup(anonymous_per_minute: u32) -> (Arc<MemoryStore>, web::Data<AppState>) {
        let store = Arc::new(MemoryStore::new());
        bootstrap::seed_default_roles(store.as_ref()).await.unwrap();
        for (username, role) in [("alice", "Viewer"), ("root", "Admin")] {
            store
                .create_user(NewUser::new(username, format!("{username}@example.com"), "unused"))
                .await
                .unwrap();
            store.assign_role(username, role).await.unwrap();
        }

        let mut config = Config::default();
        config.gateway.auth.jwt_secret = "middleware-test-secret-0123456789abcdef".to_string();
        config.gateway.rate_limit.default_policy =
            Some(RateLimitPolicy::per_minute(anonymous_per_minute).unwrap());

        let state = AppState::new(config, StorageLayer::from_memory(store.clone())).unwrap();
        (store, web::Data::new(state))
    }

    fn token_for(state: &AppState, username: &str, roles: &[&str]) -> String {
        let roles = roles.iter().map(|r| r.to_string()).collect();
        state
            .auth
            .jwt()
            .create_token_pair(username, roles)
            .unwrap()
            .access_token
    }

    async fn whoami(user: AuthenticatedUser) -> HttpResponse {
        HttpResponse::Ok().body(user.username.clone())
    }

    macro_rules! pipeline {
        ($state:expr) => {
            actix_test::init_service(
                App::new()
                    .app_data($state.clone())
                    .route("/public/ping", web::get().to(|| async { HttpResponse::Ok().finish() }))
                    .route("/health", web::get().to(|| async { HttpResponse::Ok().finish() }))
                    .route("/me", web::get().to(whoami))
                    .route("/me", web::post().to(whoami))
                    .service(
                        web::resource("/admin")
                            .wrap(RbacGuard::any_role(["SuperAdmin", "Admin"]))
                            .route(web::get().to(|| async { HttpResponse::Ok().finish() })),
                    )
                    .service(
                        web::resource("/content")
                            .wrap(RbacGuard::all_permissions(["view_content", "create_content"]))
                            .route(web::get().to(|| async { HttpResponse::Ok().finish() })),
                    )
                    .wrap(AuthMiddleware)
                    .wrap(RateLimitMiddleware)
                    .wrap(AuditMiddleware),
            )
            .await
        };
    }

    fn get(path: &str) -> actix_test::TestRequest {
        actix_test::TestRequest::get().uri(path).peer_addr(peer())
    }

    #[actix_web::test]
    async fn test_public_route_needs_no_token() {
        let (_, state) = setup(10).await;
        let app = pipeline!(state);

        let res = actix_test::call_service(&app, get("/public/ping").to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_protected_route_without_token_is_401() {
        let (_, state) = setup(10).await;
        let app = pipeline!(state);

        let res = actix_test::call_service(&app, get("/me").to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(res.headers().get("www-authenticate").unwrap(), "Bearer");

        let body: serde_json::Value = actix_test::read_body_json(res).await;
        assert_eq!(body["error"]["code"], "MISSING_TOKEN");
    }

    #[actix_web::test]
    async fn test_malformed_token_is_401() {
        let (_, state) = setup(10).await;
        let app = pipeline!(state);

        let req = get("/me")
            .insert_header((AUTHORIZATION, "Bearer not-a-jwt"))
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let body: serde_json::Value = actix_test::read_body_json(res).await;
        assert_eq!(body["error"]["code"], "MALFORMED_TOKEN");
    }

    #[actix_web::test]
    async fn test_valid_token_reaches_handler_with_limit_headers() {
        let (_, state) = setup(10).await;
        let app = pipeline!(state);
        let token = token_for(&state, "alice", &["Viewer"]);

        let req = get("/me")
            .insert_header((AUTHORIZATION, format!("Bearer {token}")))
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers().get("x-ratelimit-limit").unwrap(), "10");
        assert_eq!(res.headers().get("x-ratelimit-remaining").unwrap(), "9");

        let body = actix_test::read_body(res).await;
        assert_eq!(body, "alice");
    }

    #[actix_web::test]
    async fn test_role_guard_denies_viewer() {
        let (_, state) = setup(10).await;
        let app = pipeline!(state);

        let viewer = token_for(&state, "alice", &["Viewer"]);
        let req = get("/admin")
            .insert_header((AUTHORIZATION, format!("Bearer {viewer}")))
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);

        let admin = token_for(&state, "root", &["Admin"]);
        let req = get("/admin")
            .insert_header((AUTHORIZATION, format!("Bearer {admin}")))
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_permission_guard_requires_every_permission() {
        let (_, state) = setup(10).await;
        let app = pipeline!(state);

        // Viewer has view_content only
        let viewer = token_for(&state, "alice", &["Viewer"]);
        let req = get("/content")
            .insert_header((AUTHORIZATION, format!("Bearer {viewer}")))
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);

        let admin = token_for(&state, "root", &["Admin"]);
        let req = get("/content")
            .insert_header((AUTHORIZATION, format!("Bearer {admin}")))
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_roles_come_from_store_not_token() {
        let (_, state) = setup(10).await;
        let app = pipeline!(state);

        // Claims say Admin, the store says Viewer
        let forged = token_for(&state, "alice", &["Admin"]);
        let req = get("/admin")
            .insert_header((AUTHORIZATION, format!("Bearer {forged}")))
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn test_inactive_user_is_401() {
        let (store, state) = setup(10).await;
        let app = pipeline!(state);
        let token = token_for(&state, "alice", &["Viewer"]);
        store.set_user_active("alice", false).await.unwrap();

        let req = get("/me")
            .insert_header((AUTHORIZATION, format!("Bearer {token}")))
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let body: serde_json::Value = actix_test::read_body_json(res).await;
        assert_eq!(body["error"]["code"], "INACTIVE_USER");
    }

    #[actix_web::test]
    async fn test_anonymous_callers_limited_by_address() {
        let (store, state) = setup(3).await;
        let app = pipeline!(state);

        for _ in 0..3 {
            let res = actix_test::call_service(&app, get("/public/ping").to_request()).await;
            assert_eq!(res.status(), StatusCode::OK);
        }

        let res = actix_test::call_service(&app, get("/public/ping").to_request()).await;
        assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
        let retry_after: u64 = res
            .headers()
            .get("retry-after")
            .unwrap()
            .to_str()
            .unwrap()
            .parse()
            .unwrap();
        assert!((1..=60).contains(&retry_after));

        // A different forwarded address has its own window
        let req = get("/public/ping")
            .insert_header(("x-forwarded-for", "192.0.2.7, 10.0.0.1"))
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);

        let denials = store.rate_limit_logs();
        assert_eq!(denials.len(), 1);
        assert_eq!(denials[0].identity, "ip:10.1.2.3");
        assert_eq!(denials[0].route, "/public/ping");
    }

    #[actix_web::test]
    async fn test_denied_request_does_not_reach_auth() {
        let (_, state) = setup(1).await;
        let app = pipeline!(state);

        let res = actix_test::call_service(&app, get("/me").to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        // Over the limit wins over the missing token
        let res = actix_test::call_service(&app, get("/me").to_request()).await;
        assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[actix_web::test]
    async fn test_audit_logs_listed_methods_and_errors_only() {
        let (store, state) = setup(10).await;
        let app = pipeline!(state);
        let token = token_for(&state, "alice", &["Viewer"]);

        // GET 200: not logged
        let req = get("/me")
            .insert_header((AUTHORIZATION, format!("Bearer {token}")))
            .to_request();
        actix_test::call_service(&app, req).await;
        assert!(store.request_logs().is_empty());

        // POST 200: logged by method
        let req = actix_test::TestRequest::post()
            .uri("/me?draft=1")
            .peer_addr(peer())
            .insert_header((AUTHORIZATION, format!("Bearer {token}")))
            .to_request();
        actix_test::call_service(&app, req).await;

        // GET 401: logged by status
        actix_test::call_service(&app, get("/me").to_request()).await;

        let logs = store.request_logs();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].identity, "alice");
        assert_eq!(logs[0].method, "POST");
        assert_eq!(logs[0].query.as_deref(), Some("draft=1"));
        assert_eq!(logs[0].status, 200);
        assert_eq!(logs[1].identity, "anonymous:10.1.2.3");
        assert_eq!(logs[1].status, 401);
        assert!(logs[1].user_id.is_none());
    }

    #[actix_web::test]
    async fn test_audit_skips_exempt_paths() {
        let (store, state) = setup(1).await;
        let app = pipeline!(state);

        actix_test::call_service(&app, get("/health").to_request()).await;
        let res = actix_test::call_service(&app, get("/health").to_request()).await;
        assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);

        assert!(store.request_logs().is_empty());
    }

    #[actix_web::test]
    async fn test_rate_limited_user_is_audited_by_name() {
        let (store, state) = setup(10).await;
        store
            .upsert_role(
                "Viewer",
                RateLimitPolicy::per_minute(1).unwrap(),
                &["view_content".to_string()],
            )
            .await
            .unwrap();
        let app = pipeline!(state);
        let token = token_for(&state, "alice", &["Viewer"]);

        for expected in [StatusCode::OK, StatusCode::TOO_MANY_REQUESTS] {
            let req = get("/me")
                .insert_header((AUTHORIZATION, format!("Bearer {token}")))
                .to_request();
            let res = actix_test::call_service(&app, req).await;
            assert_eq!(res.status(), expected);
        }

        let logs = store.request_logs();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].identity, "alice");
        assert_eq!(logs[0].status, 429);

        let denials = store.rate_limit_logs();
        assert_eq!(denials[0].identity, "user:alice");
    }

    #[actix_web::test]
    async fn test_full_app_audits_without_disturbing_routing() {
        let (store, state) = setup(10).await;
        let app = actix_test::init_service(crate::server::HttpServer::create_app(state)).await;

        let res = actix_test::call_service(&app, get("/health/liveness").to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);

        let req = actix_test::TestRequest::post()
            .uri("/auth/token")
            .peer_addr(peer())
            .set_form([("username", "nobody"), ("password", "wrong")])
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let logs = store.request_logs();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].method, "POST");
        assert_eq!(logs[0].path, "/auth/token");
        assert_eq!(logs[0].identity, "anonymous:10.1.2.3");
        assert_eq!(logs[0].status, 401);
    }

    #[actix_web::test]
    async fn test_guard_without_app_state_fails_closed() {
        let app = actix_test::init_service(
            App::new().service(
                web::resource("/admin")
                    .wrap(RbacGuard::any_role(["Admin"]))
                    .route(web::get().to(|| async { HttpResponse::Ok().finish() })),
            ),
        )
        .await;

        let res = actix_test::call_service(&app, get("/admin").to_request()).await;
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
