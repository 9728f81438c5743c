use sea_orm::DatabaseConnection;

use crate::infra::db::{DbChallengeTokenRepository, DbEnrollmentRepository, DbLoginRecorder};
use crate::infra::delivery::HttpDelivery;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub delivery: HttpDelivery,
}

impl AppState {
    pub fn enrollment_repo(&self) -> DbEnrollmentRepository {
        DbEnrollmentRepository {
            db: self.db.clone(),
        }
    }

    pub fn token_repo(&self) -> DbChallengeTokenRepository {
        DbChallengeTokenRepository {
            db: self.db.clone(),
        }
    }

    pub fn login_recorder(&self) -> DbLoginRecorder {
        DbLoginRecorder {
            db: self.db.clone(),
        }
    }

    pub fn delivery(&self) -> HttpDelivery {
        self.delivery.clone()
    }
}
