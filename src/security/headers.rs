//! Security headers for API responses

use warp::Reply;

/// Strict Content Security Policy for JSON endpoints
const API_CSP: &str = "default-src 'none'; frame-ancestors 'none';";

/// Wrap a reply with strict security headers for API endpoints.
///
/// `Cache-Control: no-store` keeps issued tokens out of shared caches.
pub fn with_api_security_headers<T: Reply>(reply: T) -> impl Reply {
    let reply = warp::reply::with_header(reply, "X-Frame-Options", "DENY");
    let reply = warp::reply::with_header(reply, "X-Content-Type-Options", "nosniff");
    let reply = warp::reply::with_header(reply, "Referrer-Policy", "no-referrer");
    let reply = warp::reply::with_header(reply, "Content-Security-Policy", API_CSP);
    warp::reply::with_header(reply, "Cache-Control", "no-store")
}
