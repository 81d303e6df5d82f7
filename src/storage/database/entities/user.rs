use sea_orm::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// User ID (UUID)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Username (unique)
    #[sea_orm(unique)]
    pub username: String,

    /// Email address (unique)
    #[sea_orm(unique)]
    pub email: String,

    /// Argon2 PHC string
    pub password_hash: String,

    pub is_active: bool,

    /// Most recently issued access token
    pub access_token: Option<String>,

    /// Current refresh token, compared on rotation
    pub refresh_token: Option<String>,

    /// Last login timestamp
    pub last_login_at: Option<DateTimeWithTimeZone>,

    /// Creation timestamp
    pub created_at: DateTimeWithTimeZone,

    /// Last update timestamp
    pub updated_at: DateTimeWithTimeZone,
}

/// User entity relations
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user_role::Entity")]
    UserRoles,
}

impl Related<super::user_role::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserRoles.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Convert to the domain user with already-resolved roles
    pub fn to_domain_user(
        &self,
        roles: Vec<crate::core::models::Role>,
    ) -> crate::core::models::User {
        crate::core::models::User {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            password_hash: self.password_hash.clone(),
            is_active: self.is_active,
            roles,
            access_token: self.access_token.clone(),
            refresh_token: self.refresh_token.clone(),
            last_login_at: self.last_login_at.map(|dt| dt.naive_utc().and_utc()),
            created_at: self.created_at.naive_utc().and_utc(),
        }
    }

    /// Build an insertable row from a registration request
    pub fn from_new_user(user: &crate::core::models::NewUser) -> ActiveModel {
        let now: DateTimeWithTimeZone = chrono::Utc::now().into();
        ActiveModel {
            id: Set(Uuid::new_v4()),
            username: Set(user.username.clone()),
            email: Set(user.email.clone()),
            password_hash: Set(user.password_hash.clone()),
            is_active: Set(user.is_active),
            access_token: Set(None),
            refresh_token: Set(None),
            last_login_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
    }
}
