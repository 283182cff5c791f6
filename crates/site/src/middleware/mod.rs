//! HTTP middleware stack for the site.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request span with method, URI, status, latency)
//! 3. Request ID (add unique ID to each request)
//! 4. Security headers (CSP, frame denial, etc.)
//! 5. Session layer (tower-sessions with in-memory store)
//! 6. Rate limiting on login and contact submissions (governor)
//!
//! The admin gate is an extractor ([`RequireAdminSession`]) rather than a
//! layer so public pages never touch the auth service.

pub mod auth;
pub mod rate_limit;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use auth::{
    AuthRejection, LOGIN_PATH, OptionalAdminSession, RequireAdminSession, clear_admin_session,
    set_current_admin,
};
pub use rate_limit::{contact_rate_limiter, login_rate_limiter};
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::{create_session_layer, session_keys};
