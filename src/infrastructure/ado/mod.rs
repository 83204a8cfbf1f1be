//! Azure DevOps Git REST 연동 계층.

mod client;
mod rest;

pub use client::AdoClient;
pub use rest::RestGateway;
