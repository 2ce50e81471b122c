// Life of a request:
// 1. HTTP request comes in
// 2. Protected routes verify the bearer token and, where the data belongs
//    to someone, that the token's email owns it
// 3. One domain module runs against the document store:
//     - Reads see a consistent snapshot of every collection
//     - Writes run in a single transaction that commits or leaves no trace
// 4. The result (or an error body) goes back as JSON
//
// System components:
//  - Document store
//  - Role directory, class catalog, selection ledger
//  - Payment/enrollment sequencer backed by the payment provider

pub mod api;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod enrollment;
pub mod error;
pub mod payment;
pub mod roles;
pub mod storage;
pub mod types;

#[cfg(test)]
mod e2e_tests;

pub use api::{AppState, router};
pub use error::ApiError;
