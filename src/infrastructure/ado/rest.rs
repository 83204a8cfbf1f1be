//! 인증 헤더/상태 검사/역직렬화를 공통 처리하는 REST 게이트웨이.

use std::sync::Arc;

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::application::ports::CredentialProvider;
use crate::domain::error::{Error, Result};

/// 모든 원격 호출의 단일 통로.
/// 호출마다 자격 증명을 새로 얻고, 비 2xx는 호출자 라벨과 함께 실패 처리한다.
/// 재시도는 하지 않는다. 정책이 필요하면 호출자 몫이다.
pub struct RestGateway {
    client: Client,
    credentials: Arc<dyn CredentialProvider>,
}

impl RestGateway {
    pub fn new(credentials: Arc<dyn CredentialProvider>) -> Self {
        Self {
            client: Client::new(),
            credentials,
        }
    }

    /// JSON 응답을 기대하는 GET.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        context: &'static str,
    ) -> Result<T> {
        let request = self.request(Method::GET, url).await?;
        let body = self.read_success_body(request, context).await?;
        serde_json::from_str(&body).map_err(|source| Error::MalformedResponse { context, source })
    }

    /// JSON 본문을 보내는 POST. 2xx 상태만 확인하고 응답 본문은 버린다.
    pub async fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
        context: &'static str,
    ) -> Result<()> {
        let request = self.request(Method::POST, url).await?.json(body);
        self.read_success_body(request, context).await?;
        Ok(())
    }

    /// blob 원문용 GET. 빈 본문은 빈 문자열로 돌려준다(오류 아님).
    pub async fn get_text(&self, url: &str, context: &'static str) -> Result<String> {
        let request = self
            .request(Method::GET, url)
            .await?
            .header("Accept", "text/plain");
        self.read_success_body(request, context).await
    }

    async fn request(&self, method: Method, url: &str) -> Result<RequestBuilder> {
        let credential = self.credentials.acquire().await?;
        Ok(self
            .client
            .request(method, url)
            .header("Authorization", credential.authorization_header()))
    }

    async fn read_success_body(
        &self,
        request: RequestBuilder,
        context: &'static str,
    ) -> Result<String> {
        let response: Response = request
            .send()
            .await
            .map_err(|source| Error::Transport { context, source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::RemoteRequestFailed {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("unknown").to_string(),
                context,
            });
        }

        response
            .text()
            .await
            .map_err(|source| Error::Transport { context, source })
    }
}
