//! Common test utilities for authgate
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::common::{TestGateway, PASSWORD, token_request};
//!
//! #[actix_web::test]
//! async fn my_test() {
//!     let gateway = TestGateway::new().await;
//!     gateway.add_user("alice", &["Viewer"]).await;
//!     let app = crate::init_app!(gateway);
//!     // ...
//! }
//! ```

pub mod database;
pub mod fixtures;

// Re-export commonly used items
pub use database::TestDatabase;
pub use fixtures::{
    PASSWORD, PEER, TestGateway, get, refresh_request, test_config, token_request, with_bearer,
};

/// Build the full application service for a [`TestGateway`]
#[macro_export]
macro_rules! init_app {
    ($gateway:expr) => {
        actix_web::test::init_service(authgate::HttpServer::create_app($gateway.data())).await
    };
}
