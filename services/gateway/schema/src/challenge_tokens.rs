use sea_orm::entity::prelude::*;

/// Outstanding second-factor challenge, bound to one user and one client address.
/// Deleted when verified; expired rows are purged by the sweeper.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "challenge_tokens")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: i32,
    /// Upper-case alphanumeric code.
    pub token: String,
    pub ip: String,
    pub expires_at: chrono::DateTime<chrono::Utc>,
    /// Flipped by the out-of-band notifier once the code has been sent.
    pub delivered: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
