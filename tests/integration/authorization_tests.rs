//! Role and permission guards over HTTP

#[cfg(test)]
mod tests {
    use crate::common::{TestGateway, get, with_bearer};
    use crate::init_app;
    use actix_web::http::StatusCode;
    use actix_web::test::{self, TestRequest};
    use serde_json::{Value, json};

    #[actix_web::test]
    async fn test_viewer_denied_admin_route() {
        let gateway = TestGateway::new().await;
        gateway.add_user("alice", &["Viewer"]).await;
        gateway.add_user("root", &["Admin"]).await;
        let app = init_app!(gateway);

        let viewer = gateway.access_token("alice");
        let res =
            test::call_service(&app, with_bearer(get("/admin/roles"), &viewer).to_request()).await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["error"]["code"], "INSUFFICIENT_PRIVILEGES");
        assert_eq!(body["error"]["message"], "You don't have enough permissions");

        let admin = gateway.access_token("root");
        let res =
            test::call_service(&app, with_bearer(get("/admin/roles"), &admin).to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["meta"]["total"], 7);
    }

    #[actix_web::test]
    async fn test_system_config_requires_super_admin() {
        let gateway = TestGateway::new().await;
        gateway.add_user("root", &["Admin"]).await;
        gateway.add_user("owner", &["SuperAdmin"]).await;
        let app = init_app!(gateway);

        let admin = gateway.access_token("root");
        let res =
            test::call_service(&app, with_bearer(get("/system/config"), &admin).to_request()).await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);

        let owner = gateway.access_token("owner");
        let res =
            test::call_service(&app, with_bearer(get("/system/config"), &owner).to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["data"]["auth"]["jwt_secret"], "********");
        assert_eq!(body["data"]["auth"]["access_token_ttl_secs"], 1800);
    }

    #[actix_web::test]
    async fn test_content_permissions_per_method() {
        let gateway = TestGateway::new().await;
        gateway.add_user("alice", &["Viewer"]).await;
        gateway.add_user("erin", &["Editor"]).await;
        let app = init_app!(gateway);
        let viewer = gateway.access_token("alice");
        let editor = gateway.access_token("erin");

        let res =
            test::call_service(&app, with_bearer(get("/content"), &viewer).to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);

        let post = |token: &str| {
            with_bearer(TestRequest::post().uri("/content"), token)
                .set_json(json!({"title": "Hello", "body": "World"}))
                .to_request()
        };

        let res = test::call_service(&app, post(&viewer)).await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);

        let res = test::call_service(&app, post(&editor)).await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["data"]["author"], "erin");
    }

    #[actix_web::test]
    async fn test_profile_reports_roles_permissions_and_policy() {
        let gateway = TestGateway::new().await;
        gateway.add_user("alice", &["Viewer", "Contributor"]).await;
        let app = init_app!(gateway);

        let token = gateway.access_token("alice");
        let res =
            test::call_service(&app, with_bearer(get("/users/me"), &token).to_request()).await;
        let body: Value = test::read_body_json(res).await;
        let profile = &body["data"];

        assert_eq!(profile["roles"], json!(["Viewer", "Contributor"]));
        assert_eq!(
            profile["permissions"],
            json!(["access_public_content", "submit_content", "view_content"])
        );
        assert_eq!(profile["rate_limit"]["times"], 10);
        assert_eq!(profile["rate_limit"]["minutes"], 1);
    }

    #[actix_web::test]
    async fn test_role_changes_apply_on_next_request() {
        let gateway = TestGateway::new().await;
        gateway.add_user("owner", &["SuperAdmin"]).await;
        gateway.add_user("bob", &["Viewer"]).await;
        let app = init_app!(gateway);
        let owner = gateway.access_token("owner");
        let bob = gateway.access_token("bob");

        let create = || {
            with_bearer(TestRequest::post().uri("/content"), &bob)
                .set_json(json!({"title": "Draft", "body": ""}))
                .to_request()
        };
        assert_eq!(test::call_service(&app, create()).await.status(), StatusCode::FORBIDDEN);

        let req = with_bearer(TestRequest::post().uri("/admin/users/bob/roles"), &owner)
            .set_json(json!({"role": "Editor"}))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["data"]["roles"][1]["name"], "Editor");

        // Same token, new role
        assert_eq!(test::call_service(&app, create()).await.status(), StatusCode::CREATED);

        let req = with_bearer(TestRequest::delete().uri("/admin/users/bob/roles/Editor"), &owner)
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
        assert_eq!(test::call_service(&app, create()).await.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn test_role_assignment_needs_every_permission() {
        let gateway = TestGateway::new().await;
        gateway.add_user("mod", &["Moderator"]).await;
        gateway.add_user("bob", &["Viewer"]).await;
        let app = init_app!(gateway);

        let token = gateway.access_token("mod");
        let req = with_bearer(TestRequest::post().uri("/admin/users/bob/roles"), &token)
            .set_json(json!({"role": "Admin"}))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn test_admin_errors_for_unknown_targets() {
        let gateway = TestGateway::new().await;
        gateway.add_user("root", &["Admin"]).await;
        let app = init_app!(gateway);
        let token = gateway.access_token("root");

        let req = with_bearer(TestRequest::post().uri("/admin/users/nobody/roles"), &token)
            .set_json(json!({"role": "Viewer"}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

        let req = with_bearer(TestRequest::post().uri("/admin/users/root/roles"), &token)
            .set_json(json!({"role": "Wizard"}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_deactivated_user_loses_access() {
        let gateway = TestGateway::new().await;
        gateway.add_user("root", &["Admin"]).await;
        gateway.add_user("bob", &["Viewer"]).await;
        let app = init_app!(gateway);
        let admin = gateway.access_token("root");
        let bob = gateway.access_token("bob");

        let req = with_bearer(TestRequest::put().uri("/admin/users/bob/active"), &admin)
            .set_json(json!({"is_active": false}))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["data"]["is_active"], false);

        let res = test::call_service(&app, with_bearer(get("/users/me"), &bob).to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        // Admin writes are audited by method
        let logged = gateway
            .store
            .request_logs()
            .iter()
            .any(|entry| entry.method == "PUT" && entry.identity == "root" && entry.status == 200);
        assert!(logged);
    }

    #[actix_web::test]
    async fn test_public_routes_need_no_token() {
        let gateway = TestGateway::new().await;
        let app = init_app!(gateway);

        for path in ["/health", "/health/liveness", "/health/readiness", "/public/content"] {
            let res = test::call_service(&app, get(path).to_request()).await;
            assert_eq!(res.status(), StatusCode::OK, "{path}");
        }

        let res = test::call_service(&app, get("/content").to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(res.headers().get("server").unwrap(), "authgate");
    }
}
