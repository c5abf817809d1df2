//! Account management: registration, login, session tokens, profile and
//! password mutation, and the password reset flow.
//!
//! Conceptually each user moves between two states: `Active` (normal,
//! login-capable) and `ResetPending` (a reset token has been issued and not
//! yet consumed or expired). A successful reset, or expiry, returns the user
//! to `Active`.

mod forgot_password;
mod log_in;
mod me;
mod password;
mod register;
mod reset_password;
mod token;
mod update_password;
mod update_profile;

pub use forgot_password::forgot_password_endpoint;
pub use log_in::log_in_endpoint;
pub use me::me_endpoint;
pub use password::PasswordHash;
pub use register::register_endpoint;
pub use reset_password::reset_password_endpoint;
pub use token::{Claims, TokenResponse, encode_session_token};
pub use update_password::update_password_endpoint;
pub use update_profile::update_profile_endpoint;
