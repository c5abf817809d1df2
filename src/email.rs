//! The email delivery collaborator.
//!
//! The core only depends on this contract: delivery is requested, succeeds or
//! fails, and every caller treats failure as log-and-carry-on. No operation
//! may fail because an email could not be sent.

use email_address::EmailAddress;

/// A collaborator that delivers account emails.
pub trait Mailer: Send + Sync {
    /// Send a welcome email to a newly registered user.
    ///
    /// # Errors
    /// Returns a human-readable description of the delivery failure.
    fn send_welcome(&self, to: &EmailAddress, name: &str) -> Result<(), String>;

    /// Send a password reset link.
    ///
    /// `reset_url` already carries the reset token as a query parameter.
    ///
    /// # Errors
    /// Returns a human-readable description of the delivery failure.
    fn send_password_reset(&self, to: &EmailAddress, reset_url: &str) -> Result<(), String>;
}

/// A [Mailer] that writes mail to the tracing log instead of sending it.
///
/// Useful for local development: the reset link (token included) shows up in
/// the server log without ever being echoed in an HTTP response.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogMailer;

impl Mailer for LogMailer {
    fn send_welcome(&self, to: &EmailAddress, name: &str) -> Result<(), String> {
        tracing::info!("[mail] Welcome to KashMate, {name}! (to: {to})");
        Ok(())
    }

    fn send_password_reset(&self, to: &EmailAddress, reset_url: &str) -> Result<(), String> {
        tracing::info!("[mail] Password reset requested for {to}: {reset_url}");
        Ok(())
    }
}
