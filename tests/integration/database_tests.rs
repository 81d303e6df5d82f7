//! The SQL credential and audit store behind the full pipeline

#[cfg(all(test, feature = "sqlite"))]
mod tests {
    use crate::common::{PASSWORD, TestDatabase, refresh_request, test_config, token_request};
    use actix_web::http::StatusCode;
    use actix_web::{test, web};
    use authgate::auth::password::hash_password;
    use authgate::core::models::NewUser;
    use authgate::storage::{CredentialStore, MemoryStore, StorageLayer, bootstrap};
    use authgate::{AppState, HttpServer};
    use serde_json::Value;
    use std::sync::Arc;

    async fn setup() -> (TestDatabase, web::Data<AppState>) {
        let database = TestDatabase::new().await;
        let db = database.db_arc();

        bootstrap::seed_default_roles(db.as_ref()).await.unwrap();
        db.create_user(NewUser::new(
            "alice",
            "alice@example.com",
            hash_password(PASSWORD).unwrap(),
        ))
        .await
        .unwrap();
        db.assign_role("alice", "Viewer").await.unwrap();

        let storage = StorageLayer {
            credentials: db.clone(),
            counters: Arc::new(MemoryStore::new()),
            audit: db,
        };
        let state = AppState::new(test_config(), storage).unwrap();
        (database, web::Data::new(state))
    }

    #[actix_web::test]
    async fn test_login_and_rotation_against_database() {
        let (database, state) = setup().await;
        let app = test::init_service(HttpServer::create_app(state)).await;

        let res = test::call_service(&app, token_request("alice", PASSWORD).to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
        let first: Value = test::read_body_json(res).await;
        let first_refresh = first["refresh_token"].as_str().unwrap().to_string();

        let res = test::call_service(&app, refresh_request(&first_refresh).to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);

        let res = test::call_service(&app, refresh_request(&first_refresh).to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let stored = database
            .db()
            .find_user_by_username("alice")
            .await
            .unwrap()
            .unwrap();
        assert!(stored.last_login_at.is_some());
        assert_ne!(stored.refresh_token.as_deref(), Some(first_refresh.as_str()));

        assert_eq!(database.db().auth_log_count().await.unwrap(), 3);
        // The POSTs are audited by method
        assert_eq!(database.db().request_log_count().await.unwrap(), 3);
    }

    #[actix_web::test]
    async fn test_failed_login_is_audited_in_database() {
        let (database, state) = setup().await;
        let app = test::init_service(HttpServer::create_app(state)).await;

        let res = test::call_service(&app, token_request("alice", "nope").to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        assert_eq!(database.db().auth_log_count().await.unwrap(), 1);
    }
}
