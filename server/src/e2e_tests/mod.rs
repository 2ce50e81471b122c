//! End-to-end tests at the HTTP request/response level.
//!
//! Each test file covers a specific scenario, driving the real router with
//! an in-memory store and a fake payment provider.

#![cfg(test)]


mod test_class_status;
mod test_concurrent_last_seat;
mod test_health_and_token;
mod test_payment_success;
mod test_payment_unconfirmed;
mod test_role_flags;
mod test_token_errors;
mod test_upsert_user;
