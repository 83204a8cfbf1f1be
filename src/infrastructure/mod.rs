//! Infrastructure layer
//! 외부 시스템(Azure DevOps REST/Microsoft 인증 서버)과 직접 통신하는 구현체 집합.

pub mod ado;
pub mod auth;
