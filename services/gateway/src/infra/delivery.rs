use std::time::Duration;

use crate::domain::repository::DeliveryPort;
use crate::domain::types::ChallengeToken;

/// Pokes the local notifier that new tokens are waiting to be sent.
///
/// Each dispatch runs on its own task, so a slow or dead endpoint never adds
/// latency to issuance. Failures are logged and dropped.
#[derive(Clone)]
pub struct HttpDelivery {
    client: reqwest::Client,
    url: String,
}

impl HttpDelivery {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

impl DeliveryPort for HttpDelivery {
    fn dispatch(&self, token: &ChallengeToken) {
        let request = self.client.get(&self.url);
        let token_id = token.id;
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!(token_id = %token_id, "no runtime for delivery dispatch");
            return;
        };
        runtime.spawn(async move {
            match request.send().await {
                Ok(resp) if resp.status().is_success() => {
                    tracing::debug!(token_id = %token_id, "delivery notified");
                }
                Ok(resp) => {
                    tracing::warn!(token_id = %token_id, status = %resp.status(), "delivery endpoint refused");
                }
                Err(e) => {
                    tracing::warn!(token_id = %token_id, error = %e, "delivery endpoint unreachable");
                }
            }
        });
    }
}
