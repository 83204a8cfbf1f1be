//! 대화형 위임 자격 증명 공급자(OAuth 2.0 device authorization grant).
//!
//! 캐시된 계정 상태를 프로세스 전역으로 유지한다. 만료 전 액세스 토큰은
//! 그대로 재사용하고, 만료 시 refresh 토큰으로 조용히 갱신하며, 그것도
//! 실패하면 사용자가 브라우저에서 코드를 입력하는 대화형 플로로 떨어진다.
//! 뮤텍스를 획득 전 과정 동안 잡아 동시 호출이 대화형 플로를 중복
//! 실행하지 않게 한다.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::application::ports::CredentialProvider;
use crate::domain::credential::{Credential, CredentialKind};
use crate::domain::error::{Error, Result};

/// Visual Studio IDE 공개 클라이언트 id. 사용자 앱 등록이 필요 없다.
const CLIENT_ID: &str = "872cd9fa-d31f-45e0-9eab-6e460a02d1f1";
const AUTHORITY: &str = "https://login.microsoftonline.com/organizations";
/// Azure DevOps 리소스 범위 + refresh 토큰 발급용 offline_access.
const SCOPE: &str = "499b84ac-1321-427f-aa17-267ca6975798/.default offline_access";
/// 만료 직전 토큰을 재사용하지 않기 위한 여유.
const EXPIRY_SKEW: Duration = Duration::from_secs(60);

pub struct DeviceCodeProvider {
    client: Client,
    state: Mutex<Option<CachedAccount>>,
}

/// 프로세스 수명 동안 유지되는 계정 핸들.
struct CachedAccount {
    access_token: String,
    expires_at: Instant,
    refresh_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DeviceCodeResponse {
    device_code: String,
    verification_uri: String,
    user_code: String,
    expires_in: u64,
    #[serde(default)]
    interval: Option<u64>,
    #[serde(default)]
    message: Option<String>,
}

/// 토큰 엔드포인트 응답. 성공/오류 필드를 한 구조로 받는다.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<u64>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

impl DeviceCodeProvider {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            state: Mutex::new(None),
        }
    }

    /// 캐시된 refresh 토큰으로 조용한 갱신을 시도한다.
    async fn try_silent_renew(&self, refresh_token: &str) -> Option<CachedAccount> {
        let params = [
            ("client_id", CLIENT_ID),
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("scope", SCOPE),
        ];

        match self.request_token(&params).await {
            Ok(account) => Some(account),
            Err(err) => {
                // 세션 만료/동의 철회 등. 대화형 플로로 넘어간다.
                warn!("silent token renewal failed: {err}");
                None
            }
        }
    }

    /// 브라우저 챌린지가 끝날 때까지 토큰 엔드포인트를 폴링한다.
    /// 사람 속도에 맞춰 무기한에 가깝게 대기할 수 있다(자체 타임아웃 없음).
    async fn interactive_acquire(&self) -> Result<CachedAccount> {
        let device: DeviceCodeResponse = self
            .send_form(&format!("{AUTHORITY}/oauth2/v2.0/devicecode"), &[
                ("client_id", CLIENT_ID),
                ("scope", SCOPE),
            ])
            .await?;

        // 사용자 안내문은 프로토콜 스트림(stdout)이 아닌 stderr로 내보낸다.
        match &device.message {
            Some(message) => eprintln!("{message}"),
            None => eprintln!(
                "To sign in, open {} in a browser and enter the code {}",
                device.verification_uri, device.user_code
            ),
        }

        let deadline = Instant::now() + Duration::from_secs(device.expires_in);
        let mut interval = Duration::from_secs(device.interval.unwrap_or(5));
        let params = [
            ("client_id", CLIENT_ID),
            ("grant_type", "urn:ietf:params:oauth:grant-type:device_code"),
            ("device_code", device.device_code.as_str()),
        ];

        while Instant::now() < deadline {
            tokio::time::sleep(interval).await;

            let reply: TokenResponse = self
                .send_form(&format!("{AUTHORITY}/oauth2/v2.0/token"), &params)
                .await?;

            match reply.error.as_deref() {
                None => return account_from(reply),
                Some("authorization_pending") => continue,
                Some("slow_down") => interval += Duration::from_secs(5),
                Some(code) => {
                    let detail = reply.error_description.unwrap_or_else(|| code.to_string());
                    return Err(Error::AuthenticationFailed(detail));
                }
            }
        }

        Err(Error::AuthenticationFailed(
            "device code expired before sign-in completed".to_string(),
        ))
    }

    async fn request_token(&self, params: &[(&str, &str)]) -> Result<CachedAccount> {
        let reply: TokenResponse = self
            .send_form(&format!("{AUTHORITY}/oauth2/v2.0/token"), params)
            .await?;

        if let Some(code) = reply.error.as_deref() {
            let detail = reply
                .error_description
                .clone()
                .unwrap_or_else(|| code.to_string());
            return Err(Error::AuthenticationFailed(detail));
        }

        account_from(reply)
    }

    /// form POST 후 본문을 JSON으로 읽는다.
    /// 폴링 중 오류 응답도 4xx 본문으로 오므로 상태와 무관하게 파싱한다.
    async fn send_form<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, &str)],
    ) -> Result<T> {
        let context = "acquire delegated credential";
        let response = self
            .client
            .post(url)
            .form(params)
            .send()
            .await
            .map_err(|source| Error::Transport { context, source })?;

        let body = response
            .text()
            .await
            .map_err(|source| Error::Transport { context, source })?;

        serde_json::from_str(&body).map_err(|source| Error::MalformedResponse { context, source })
    }
}

impl Default for DeviceCodeProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn account_from(reply: TokenResponse) -> Result<CachedAccount> {
    let Some(access_token) = reply.access_token.filter(|t| !t.is_empty()) else {
        return Err(Error::AuthenticationFailed(
            "token endpoint returned no access token".to_string(),
        ));
    };

    let lifetime = Duration::from_secs(reply.expires_in.unwrap_or(0));
    Ok(CachedAccount {
        access_token,
        expires_at: Instant::now() + lifetime,
        refresh_token: reply.refresh_token,
    })
}

#[async_trait]
impl CredentialProvider for DeviceCodeProvider {
    async fn acquire(&self) -> Result<Credential> {
        // 락을 플로 전체에 걸쳐 유지한다. 동시 호출자는 첫 호출이 채운
        // 캐시를 바로 재사용하게 된다.
        let mut state = self.state.lock().await;

        if let Some(account) = state.take() {
            if account.expires_at > Instant::now() + EXPIRY_SKEW {
                debug!("reusing cached delegated access token");
                let token = account.access_token.clone();
                *state = Some(account);
                return Ok(Credential {
                    kind: CredentialKind::Delegated,
                    token,
                });
            }

            if let Some(refresh_token) = account.refresh_token.as_deref() {
                if let Some(renewed) = self.try_silent_renew(refresh_token).await {
                    let token = renewed.access_token.clone();
                    *state = Some(renewed);
                    return Ok(Credential {
                        kind: CredentialKind::Delegated,
                        token,
                    });
                }
            }
            // 갱신 실패. 캐시를 비우고 대화형 플로로 내려간다.
        }

        let account = self.interactive_acquire().await?;
        let token = account.access_token.clone();
        *state = Some(account);

        Ok(Credential {
            kind: CredentialKind::Delegated,
            token,
        })
    }
}
