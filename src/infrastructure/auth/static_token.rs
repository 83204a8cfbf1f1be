//! 사전 발급 PAT를 그대로 내어주는 공급자.

use async_trait::async_trait;

use crate::application::ports::CredentialProvider;
use crate::domain::credential::{Credential, CredentialKind};
use crate::domain::error::{Error, Result};

pub struct StaticTokenProvider {
    token: Option<String>,
}

impl StaticTokenProvider {
    /// 비어 있는 토큰은 미설정으로 취급한다.
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: token.filter(|t| !t.trim().is_empty()),
        }
    }
}

#[async_trait]
impl CredentialProvider for StaticTokenProvider {
    async fn acquire(&self) -> Result<Credential> {
        let token = self.token.clone().ok_or(Error::MissingCredential)?;
        Ok(Credential {
            kind: CredentialKind::Static,
            token,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_configured_token_as_static_credential() {
        let provider = StaticTokenProvider::new(Some("abc".to_string()));
        let credential = provider.acquire().await.unwrap();
        assert_eq!(credential.kind, CredentialKind::Static);
        assert_eq!(credential.token, "abc");
    }

    #[tokio::test]
    async fn fails_without_token() {
        for token in [None, Some(String::new()), Some("   ".to_string())] {
            let provider = StaticTokenProvider::new(token);
            assert!(matches!(
                provider.acquire().await,
                Err(Error::MissingCredential)
            ));
        }
    }
}
