//! 정적 PAT / 대화형 위임 두 가지 자격 증명 공급자.

mod device_code;
mod static_token;

use std::sync::Arc;

pub use device_code::DeviceCodeProvider;
pub use static_token::StaticTokenProvider;

use crate::application::ports::CredentialProvider;

/// 토큰 설정 여부에 따라 공급자를 선택한다.
pub fn build_credential_provider(pat: Option<String>) -> Arc<dyn CredentialProvider> {
    match pat {
        Some(token) if !token.trim().is_empty() => {
            Arc::new(StaticTokenProvider::new(Some(token)))
        }
        _ => Arc::new(DeviceCodeProvider::new()),
    }
}
