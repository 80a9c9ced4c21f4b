//! LYCEUM Transport - Request Gateway
//!
//! Executes one logical request with per-attempt timeout, retry/backoff and
//! the authentication-refresh flow. Leaf component of the data core; the
//! endpoint registry builds on it and nothing here knows about entities.

pub mod gateway;
pub mod ports;
pub mod request;
pub mod sender;
pub mod session;

pub use gateway::{Gateway, GatewayConfig};
pub use ports::{HttpSend, LoginRedirect, RedirectReason, SessionStore, SessionTokens};
pub use request::{ApiRequest, HttpMethod, PreparedRequest, WireResponse};
pub use sender::ReqwestSender;
pub use session::InMemorySessionStore;
