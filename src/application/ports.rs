//! 애플리케이션 계층이 의존하는 포트(추상 인터페이스) 모음.

use async_trait::async_trait;

use crate::domain::credential::Credential;
use crate::domain::error::Result;
use crate::domain::locator::PrLocator;
use crate::domain::pr::{ChangeEntry, CommentRequest, PullRequestSummary};

/// 요청 시점에 자격 증명을 내어주는 포트.
/// 위임 모드 구현은 브라우저 챌린지로 인해 무기한 대기할 수 있다.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn acquire(&self) -> Result<Credential>;
}

/// Azure DevOps Git REST 연동 추상화 포트.
#[async_trait]
pub trait PullRequestGateway: Send + Sync {
    /// PR 요약 조회
    async fn fetch_pull_request(&self, locator: &PrLocator) -> Result<PullRequestSummary>;
    /// 대상/원본 브랜치 비교 변경 목록 조회
    async fn fetch_changes(
        &self,
        locator: &PrLocator,
        target_branch: &str,
        source_branch: &str,
    ) -> Result<Vec<ChangeEntry>>;
    /// blob 원문 조회(text/plain)
    async fn fetch_blob(&self, locator: &PrLocator, object_id: &str) -> Result<String>;
    /// 파일 영역 앵커 코멘트 스레드 생성
    async fn create_thread(&self, locator: &PrLocator, request: &CommentRequest) -> Result<()>;
}
