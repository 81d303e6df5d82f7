//! Configuration files driving the pipeline

#[cfg(test)]
mod tests {
    use crate::common::{PASSWORD, TestGateway, get, token_request};
    use crate::init_app;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use authgate::Config;
    use authgate::config::{CounterBackend, CredentialBackend};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    const CONFIG: &str = r#"
auth:
  jwt_secret: "file-config-secret-0123456789abcdefghijkl"
  access_token_ttl_secs: 300
  refresh_token_ttl_secs: 600

rate_limit:
  backend: memory
  default_policy:
    times: 2
    seconds: 30

routes:
  public_patterns:
    - "/health"
    - "/health/*"
    - "/auth/*"

audit:
  methods: ["DELETE"]
  min_status: 500

storage:
  backend: memory

bootstrap:
  super_admin:
    username: owner
    email: owner@example.com
    password: "correct horse battery staple"
"#;

    #[tokio::test]
    async fn test_yaml_file_is_loaded() {
        let file = write_config(CONFIG);
        let config = Config::from_file(file.path()).await.unwrap();

        assert_eq!(config.auth().access_token_ttl_secs, 300);
        assert_eq!(config.rate_limit().backend, CounterBackend::Memory);
        assert_eq!(config.storage().backend, CredentialBackend::Memory);
        let policy = config.rate_limit().default_policy.unwrap();
        assert_eq!(policy.times(), 2);
        assert_eq!(policy.interval().as_secs(), 30);
    }

    #[actix_web::test]
    async fn test_configured_routes_policy_and_bootstrap_apply() {
        let file = write_config(CONFIG);
        let config = Config::from_file(file.path()).await.unwrap();
        let gateway = TestGateway::with_config(config).await;
        let app = init_app!(gateway);

        // /public/* is no longer public
        let res = test::call_service(&app, get("/public/content").to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        // The configured super admin can log in
        let res = test::call_service(&app, token_request("owner", PASSWORD).to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["expires_in"], 300);

        // 401s fall under min_status 500, so nothing was audited
        assert!(gateway.store.request_logs().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_files_are_rejected() {
        let file = write_config("auth: [unclosed");
        assert!(Config::from_file(file.path()).await.is_err());

        let file = write_config("auth:\n  jwt_secret: short\n");
        let err = Config::from_file(file.path()).await.unwrap_err();
        assert!(err.to_string().contains("32 characters"));

        let file = write_config("routes:\n  public_patterns: 5\n");
        assert!(Config::from_file(file.path()).await.is_err());
    }

    #[tokio::test]
    async fn test_missing_file_is_an_error() {
        let result = Config::from_file("/nonexistent/authgate.yaml").await;
        assert!(result.is_err());
    }
}
