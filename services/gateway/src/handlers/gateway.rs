use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Response},
};
use chrono::Utc;
use serde::Deserialize;

use tfagate_session::client_ip::ClientIp;
use tfagate_session::session::{ENTRY_PATH, FlashKind, FlashMessage, Session, redirect_found};

use crate::domain::gate::{CLEAR_PATH, GATEWAY_PATH, VERIFY_PATH};
use crate::domain::types::{GatewayOutcome, MSG_CODE_RESENT, MSG_LOGGED_IN, VerificationOutcome};
use crate::error::GatewayError;
use crate::state::AppState;
use crate::usecase::clear::ClearChallengeUseCase;
use crate::usecase::gateway::OpenGatewayUseCase;
use crate::usecase::verify::{VerifyChallengeInput, VerifyChallengeUseCase};

// ── GET /2fa_gateway ─────────────────────────────────────────────────────────

pub async fn gateway_page(
    State(state): State<AppState>,
    session: Session,
    ClientIp(client_ip): ClientIp,
) -> Result<Response, GatewayError> {
    let principal = session.require_principal()?;

    let usecase = OpenGatewayUseCase {
        enrollments: state.enrollment_repo(),
        tokens: state.token_repo(),
        delivery: state.delivery(),
    };

    match usecase.execute(principal, client_ip, Utc::now()).await? {
        GatewayOutcome::NotEnrolled => {
            session.clear_must_verify();
            Ok(redirect_found(ENTRY_PATH))
        }
        GatewayOutcome::ChallengePending { .. } => {
            Ok(Html(render_gateway_page(&session.take_messages())).into_response())
        }
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn render_gateway_page(messages: &[FlashMessage]) -> String {
    let notices: String = messages
        .iter()
        .map(|m| {
            let class = match m.kind {
                FlashKind::Success => "success",
                FlashKind::Warning => "warning",
            };
            format!(
                "<div class=\"message {class}\">{}</div>\n",
                escape_html(&m.text)
            )
        })
        .collect();

    format!(
        "<!DOCTYPE html>\n\
         <html>\n\
         <head><title>Two Factor Authentication</title></head>\n\
         <body>\n\
         {notices}\
         <form id=\"tfa\" method=\"get\" action=\"{VERIFY_PATH}\">\n\
         <input name=\"token\" maxlength=\"8\" autocomplete=\"one-time-code\" autofocus>\n\
         <button type=\"submit\">Verify</button>\n\
         </form>\n\
         <form method=\"post\" action=\"{CLEAR_PATH}\"><button type=\"submit\">Send a new code</button></form>\n\
         </body>\n\
         </html>\n"
    )
}

// ── GET /2fa_gateway/verify ──────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct VerifyQuery {
    #[serde(default)]
    pub token: String,
}

/// Answers `"0"` on success and `"1"` otherwise, for the page's client-side script.
pub async fn verify_challenge(
    State(state): State<AppState>,
    session: Session,
    ClientIp(client_ip): ClientIp,
    Query(query): Query<VerifyQuery>,
) -> Result<&'static str, GatewayError> {
    let principal = session.require_principal()?;

    let usecase = VerifyChallengeUseCase {
        tokens: state.token_repo(),
        delivery: state.delivery(),
        logins: state.login_recorder(),
    };

    let outcome = usecase
        .execute(VerifyChallengeInput {
            principal,
            client_ip,
            code: query.token,
            now: Utc::now(),
        })
        .await?;

    if outcome == VerificationOutcome::Success {
        session.clear_must_verify();
        session.push_message(FlashMessage::success(MSG_LOGGED_IN));
    }

    Ok(outcome.as_body())
}

// ── GET|POST /2fa_gateway/clear ──────────────────────────────────────────────

pub async fn clear_challenge(
    State(state): State<AppState>,
    session: Session,
    ClientIp(client_ip): ClientIp,
) -> Result<Response, GatewayError> {
    let principal = session.require_principal()?;

    let usecase = ClearChallengeUseCase {
        tokens: state.token_repo(),
    };
    usecase.execute(principal, client_ip).await?;

    session.push_message(FlashMessage::success(MSG_CODE_RESENT));
    Ok(redirect_found(GATEWAY_PATH))
}
