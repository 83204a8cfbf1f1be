//! Interface layer
//! CLI 인자, 도구 프로토콜 서버, 조립 루트.

pub mod cli;
pub mod composition;
pub mod server;
pub mod tools;
