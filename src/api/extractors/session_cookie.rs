use crate::config::Config;
use tower_cookies::{Cookie, Cookies};
use tower_cookies::cookie::SameSite;

pub const SESSION_COOKIE: &str = "eventflow_sid";

pub fn set_session_cookie(cookies: &Cookies, token: &str, config: &Config, ttl: chrono::Duration) {
    let mut cookie = Cookie::new(SESSION_COOKIE, token.to_string());
    cookie.set_http_only(true);
    cookie.set_secure(config.session_cookie_secure);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_path("/");
    cookie.set_max_age(time::Duration::seconds(ttl.num_seconds()));
    cookies.add(cookie);
}

pub fn clear_session_cookie(cookies: &Cookies) {
    cookies.remove(Cookie::build((SESSION_COOKIE, "")).path("/").into());
}
