//! Session cookie builder.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

/// Cookie carrying the session id.
pub const SESSION_COOKIE: &str = "tfagate_session";

/// Attributes applied to the session cookie.
#[derive(Debug, Clone)]
pub struct SessionCookieConfig {
    pub domain: Option<String>,
    pub secure: bool,
    /// Max-Age in seconds; matches the store-side TTL.
    pub max_age_secs: u64,
}

impl Default for SessionCookieConfig {
    fn default() -> Self {
        Self {
            domain: None,
            secure: true,
            max_age_secs: 604_800,
        }
    }
}

/// Add the session cookie to the jar.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use tfagate_session::cookie::{set_session_cookie, SessionCookieConfig, SESSION_COOKIE};
///
/// let config = SessionCookieConfig {
///     domain: Some("example.com".to_owned()),
///     ..SessionCookieConfig::default()
/// };
/// let jar = set_session_cookie(CookieJar::new(), "abc".to_owned(), &config);
/// let cookie = jar.get(SESSION_COOKIE).unwrap();
/// assert_eq!(cookie.value(), "abc");
/// assert_eq!(cookie.path(), Some("/"));
/// assert_eq!(cookie.domain(), Some("example.com"));
/// assert!(cookie.http_only().unwrap_or(false));
/// ```
pub fn set_session_cookie(jar: CookieJar, id: String, config: &SessionCookieConfig) -> CookieJar {
    let mut builder = Cookie::build((SESSION_COOKIE, id))
        .path("/")
        .max_age(Duration::seconds(config.max_age_secs as i64))
        .http_only(true)
        .secure(config.secure)
        .same_site(SameSite::Lax);
    if let Some(domain) = &config.domain {
        builder = builder.domain(domain.clone());
    }
    jar.add(builder.build())
}
