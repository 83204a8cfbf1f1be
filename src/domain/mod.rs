//! Domain layer
//! 비즈니스 규칙(식별자/자격 증명/diff 정책)을 외부 의존성 없이 표현한다.

pub mod credential;
pub mod diff;
pub mod error;
pub mod locator;
pub mod pr;
