//! Cookie-held dashboard session

use tower_cookies::cookie::time::Duration;
use tower_cookies::cookie::SameSite;
use tower_cookies::{Cookie, Cookies};
use tracing::debug;

use crate::application::AuthService;
use crate::domain::User;

pub const SESSION_COOKIE: &str = "access_token";

/// User behind the session cookie. A stale or tampered token is dropped.
pub async fn current_user(auth: &AuthService, cookies: &Cookies) -> Option<User> {
    let token = cookies.get(SESSION_COOKIE)?.value().to_string();
    match auth.authorize(&token).await {
        Ok(user) => Some(user),
        Err(e) => {
            debug!(error = %e, "Discarding invalid dashboard session");
            end_session(cookies);
            None
        }
    }
}

pub fn start_session(cookies: &Cookies, token: &str, lifetime_minutes: i64, secure: bool) {
    let mut cookie = Cookie::new(SESSION_COOKIE, token.to_string());
    cookie.set_http_only(true);
    cookie.set_secure(secure);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_path("/");
    cookie.set_max_age(Duration::minutes(lifetime_minutes));
    cookies.add(cookie);
}

pub fn end_session(cookies: &Cookies) {
    cookies.remove(Cookie::build((SESSION_COOKIE, "")).path("/").into());
}
