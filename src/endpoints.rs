//! The API endpoint URIs.

/// The route for creating a new account.
pub const REGISTER: &str = "/auth/register";
/// The route for signing in with an email and password.
pub const LOG_IN: &str = "/auth/login";
/// The route for fetching the authenticated user's profile.
pub const ME: &str = "/auth/me";
/// The route for updating the authenticated user's name and email.
pub const UPDATE_PROFILE: &str = "/auth/update-profile";
/// The route for changing the authenticated user's password.
pub const UPDATE_PASSWORD: &str = "/auth/update-password";
/// The route for requesting a password reset link.
pub const FORGOT_PASSWORD: &str = "/auth/forgot-password";
/// The route for completing a password reset with a token.
pub const RESET_PASSWORD: &str = "/auth/reset-password";

/// The route for creating and listing the user's transactions.
pub const TRANSACTIONS: &str = "/transactions";
/// The route for updating or deleting a single transaction.
pub const TRANSACTION: &str = "/transactions/{transaction_id}";
/// The route for the dashboard summary (totals and category breakdown).
pub const SUMMARY: &str = "/transactions/summary";
/// The route for expense totals grouped by payment mode.
pub const PAYMENT_MODE_SUMMARY: &str = "/transactions/summary/paymentMode";

/// The route for submitting and listing reviews.
pub const REVIEWS: &str = "/reviews";
/// The route for aggregate review statistics.
pub const REVIEW_STATS: &str = "/reviews/stats";
