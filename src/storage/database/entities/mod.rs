/// Auth audit entity module
pub mod auth_log;
/// Permission entity module
pub mod permission;
/// Rate-limit denial entity module
pub mod rate_limit_log;
/// Request audit entity module
pub mod request_log;
/// Role entity module
pub mod role;
/// Role-permission association module
pub mod role_permission;
/// User entity module
pub mod user;
/// User-role association module
pub mod user_role;

pub use auth_log::Entity as AuthLog;
pub use permission::Entity as Permission;
pub use rate_limit_log::Entity as RateLimitLog;
pub use request_log::Entity as RequestLog;
pub use role::Entity as Role;
pub use role_permission::Entity as RolePermission;
pub use user::Entity as User;
pub use user_role::Entity as UserRole;
