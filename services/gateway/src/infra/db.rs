use std::net::IpAddr;

use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter,
};

use tfagate_domain::id::{ChallengeTokenId, Principal};
use tfagate_gateway_schema::{challenge_tokens, login_ips, tfa_enrollments};

use crate::domain::repository::{ChallengeTokenRepository, EnrollmentRepository, LoginRecorder};
use crate::domain::types::ChallengeToken;
use crate::error::GatewayError;

// ── Enrollment repository ─────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbEnrollmentRepository {
    pub db: DatabaseConnection,
}

impl EnrollmentRepository for DbEnrollmentRepository {
    async fn is_enabled(&self, principal: Principal) -> Result<bool, GatewayError> {
        let model = tfa_enrollments::Entity::find_by_id(principal.0)
            .one(&self.db)
            .await
            .context("find 2fa enrollment")?;
        Ok(model.is_some())
    }
}

// ── ChallengeToken repository ─────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbChallengeTokenRepository {
    pub db: DatabaseConnection,
}

impl ChallengeTokenRepository for DbChallengeTokenRepository {
    async fn find_live(
        &self,
        principal: Principal,
        client_ip: IpAddr,
        now: DateTime<Utc>,
    ) -> Result<Option<ChallengeToken>, GatewayError> {
        let model = challenge_tokens::Entity::find()
            .filter(challenge_tokens::Column::UserId.eq(principal.0))
            .filter(challenge_tokens::Column::Ip.eq(client_ip.to_string()))
            .filter(challenge_tokens::Column::ExpiresAt.gt(now))
            .one(&self.db)
            .await
            .context("find live challenge token")?;
        model.map(token_from_model).transpose()
    }

    async fn insert(&self, token: &ChallengeToken) -> Result<(), GatewayError> {
        challenge_tokens::ActiveModel {
            id: Set(token.id.0),
            user_id: Set(token.principal.0),
            token: Set(token.token.clone()),
            ip: Set(token.client_ip.to_string()),
            expires_at: Set(token.expires_at),
            delivered: Set(token.delivered),
            created_at: Set(token.created_at),
        }
        .insert(&self.db)
        .await
        .context("insert challenge token")?;
        Ok(())
    }

    async fn find_for_verification(
        &self,
        principal: Principal,
        client_ip: IpAddr,
        code: &str,
    ) -> Result<Option<ChallengeToken>, GatewayError> {
        let model = challenge_tokens::Entity::find()
            .filter(challenge_tokens::Column::UserId.eq(principal.0))
            .filter(challenge_tokens::Column::Ip.eq(client_ip.to_string()))
            .filter(challenge_tokens::Column::Token.eq(code))
            .one(&self.db)
            .await
            .context("find challenge token for verification")?;
        model.map(token_from_model).transpose()
    }

    async fn delete(&self, id: ChallengeTokenId) -> Result<bool, GatewayError> {
        // A single DELETE is atomic: of two racing verifications only one sees a row affected.
        let result = challenge_tokens::Entity::delete_many()
            .filter(challenge_tokens::Column::Id.eq(id.0))
            .exec(&self.db)
            .await
            .context("delete challenge token")?;
        Ok(result.rows_affected > 0)
    }

    async fn delete_all(
        &self,
        principal: Principal,
        client_ip: IpAddr,
    ) -> Result<u64, GatewayError> {
        let result = challenge_tokens::Entity::delete_many()
            .filter(challenge_tokens::Column::UserId.eq(principal.0))
            .filter(challenge_tokens::Column::Ip.eq(client_ip.to_string()))
            .exec(&self.db)
            .await
            .context("delete challenge tokens for client")?;
        Ok(result.rows_affected)
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, GatewayError> {
        let result = challenge_tokens::Entity::delete_many()
            .filter(challenge_tokens::Column::ExpiresAt.lte(now))
            .exec(&self.db)
            .await
            .context("purge expired challenge tokens")?;
        Ok(result.rows_affected)
    }
}

fn token_from_model(model: challenge_tokens::Model) -> Result<ChallengeToken, GatewayError> {
    let client_ip = model
        .ip
        .parse::<IpAddr>()
        .with_context(|| format!("stored challenge token ip {:?} is not an address", model.ip))?;
    Ok(ChallengeToken {
        id: ChallengeTokenId(model.id),
        principal: Principal(model.user_id),
        token: model.token,
        client_ip,
        expires_at: model.expires_at,
        delivered: model.delivered,
        created_at: model.created_at,
    })
}

// ── Login recorder ───────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbLoginRecorder {
    pub db: DatabaseConnection,
}

impl LoginRecorder for DbLoginRecorder {
    async fn record(&self, principal: Principal, client_ip: IpAddr) -> Result<(), GatewayError> {
        let row = login_ips::ActiveModel {
            user_id: Set(principal.0),
            ip: Set(client_ip.to_string()),
            occurrences: Set(1),
        };
        login_ips::Entity::insert(row)
            .on_conflict(
                OnConflict::columns([login_ips::Column::UserId, login_ips::Column::Ip])
                    .value(
                        login_ips::Column::Occurrences,
                        Expr::col((login_ips::Entity, login_ips::Column::Occurrences)).add(1),
                    )
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .context("record login ip")?;
        Ok(())
    }
}
