//! 인증 자격 증명 값 객체.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// 자격 증명 종류. 정확히 두 가지만 존재하는 닫힌 집합이다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialKind {
    /// 사전 발급된 PAT(personal access token).
    Static,
    /// 대화형 브라우저 위임 플로로 얻은 액세스 토큰.
    Delegated,
}

#[derive(Debug, Clone)]
pub struct Credential {
    pub kind: CredentialKind,
    pub token: String,
}

impl Credential {
    /// `Authorization` 헤더 값을 만든다.
    /// 스킴 선택은 URL이 아니라 자격 증명 종류로 결정된다.
    pub fn authorization_header(&self) -> String {
        match self.kind {
            CredentialKind::Static => {
                let encoded = STANDARD.encode(format!(":{}", self.token));
                format!("Basic {encoded}")
            }
            CredentialKind::Delegated => format!("Bearer {}", self.token),
        }
    }
}
