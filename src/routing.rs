//! Assembles the API routes into the application router.

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::{
    AppState,
    auth::{
        forgot_password_endpoint, log_in_endpoint, me_endpoint, register_endpoint,
        reset_password_endpoint, update_password_endpoint, update_profile_endpoint,
    },
    endpoints,
    review::{list_reviews_endpoint, review_stats_endpoint, submit_review_endpoint},
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, edit_transaction_endpoint,
        list_transactions_endpoint, payment_mode_summary_endpoint, summary_endpoint,
    },
};

/// Create the router for the application API.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::REGISTER, post(register_endpoint))
        .route(endpoints::LOG_IN, post(log_in_endpoint))
        .route(endpoints::ME, get(me_endpoint))
        .route(endpoints::UPDATE_PROFILE, put(update_profile_endpoint))
        .route(endpoints::UPDATE_PASSWORD, put(update_password_endpoint))
        .route(endpoints::FORGOT_PASSWORD, post(forgot_password_endpoint))
        .route(endpoints::RESET_PASSWORD, post(reset_password_endpoint))
        .route(
            endpoints::TRANSACTIONS,
            post(create_transaction_endpoint).get(list_transactions_endpoint),
        )
        .route(
            endpoints::TRANSACTION,
            put(edit_transaction_endpoint).delete(delete_transaction_endpoint),
        )
        .route(endpoints::SUMMARY, get(summary_endpoint))
        .route(
            endpoints::PAYMENT_MODE_SUMMARY,
            get(payment_mode_summary_endpoint),
        )
        .route(
            endpoints::REVIEWS,
            post(submit_review_endpoint).get(list_reviews_endpoint),
        )
        .route(endpoints::REVIEW_STATS, get(review_stats_endpoint))
        .with_state(state)
}
