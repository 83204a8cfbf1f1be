//! Azure DevOps Git API 클라이언트 구현.

use async_trait::async_trait;
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use serde_json::json;

use super::RestGateway;
use crate::application::ports::PullRequestGateway;
use crate::domain::error::Result;
use crate::domain::locator::PrLocator;
use crate::domain::pr::{ChangeEntry, ChangeList, CommentRequest, PullRequestSummary};

const API_VERSION: &str = "7.1";
/// 원격 API가 강제하는 변경 항목 상한. 이 설계는 자체 페이징을 하지 않는다.
const CHANGES_TOP: u32 = 2000;
const DEFAULT_SERVICE_ROOT: &str = "https://dev.azure.com";

pub struct AdoClient {
    gateway: RestGateway,
    service_root: String,
}

impl AdoClient {
    pub fn new(gateway: RestGateway) -> Self {
        Self {
            gateway,
            service_root: DEFAULT_SERVICE_ROOT.to_string(),
        }
    }

    /// 테스트 등에서 서비스 루트를 바꿔 끼운다.
    pub fn with_service_root(gateway: RestGateway, service_root: impl Into<String>) -> Self {
        Self {
            gateway,
            service_root: service_root.into().trim_end_matches('/').to_string(),
        }
    }

    fn repository_base(&self, locator: &PrLocator) -> String {
        format!(
            "{}/{}/{}/_apis/git/repositories/{}",
            self.service_root, locator.organization, locator.project, locator.repository
        )
    }

    fn pull_request_endpoint(&self, locator: &PrLocator) -> String {
        format!(
            "{}/pullRequests/{}?api-version={API_VERSION}",
            self.repository_base(locator),
            locator.pull_request_id
        )
    }

    fn diffs_endpoint(&self, locator: &PrLocator, target: &str, source: &str) -> String {
        // baseVersion=병합 기준(target), targetVersion=PR 원본(source).
        let base = utf8_percent_encode(target, NON_ALPHANUMERIC);
        let target_version = utf8_percent_encode(source, NON_ALPHANUMERIC);
        format!(
            "{}/diffs/commits?baseVersion={base}&targetVersion={target_version}&$top={CHANGES_TOP}&api-version={API_VERSION}",
            self.repository_base(locator)
        )
    }

    fn blob_endpoint(&self, locator: &PrLocator, object_id: &str) -> String {
        format!(
            "{}/blobs/{object_id}?api-version={API_VERSION}",
            self.repository_base(locator)
        )
    }

    fn threads_endpoint(&self, locator: &PrLocator) -> String {
        format!(
            "{}/pullRequests/{}/threads?api-version={API_VERSION}",
            self.repository_base(locator),
            locator.pull_request_id
        )
    }
}

#[async_trait]
impl PullRequestGateway for AdoClient {
    async fn fetch_pull_request(&self, locator: &PrLocator) -> Result<PullRequestSummary> {
        self.gateway
            .get_json(&self.pull_request_endpoint(locator), "get PR details")
            .await
    }

    async fn fetch_changes(
        &self,
        locator: &PrLocator,
        target_branch: &str,
        source_branch: &str,
    ) -> Result<Vec<ChangeEntry>> {
        let list: ChangeList = self
            .gateway
            .get_json(
                &self.diffs_endpoint(locator, target_branch, source_branch),
                "get PR changes",
            )
            .await?;
        Ok(list.changes)
    }

    async fn fetch_blob(&self, locator: &PrLocator, object_id: &str) -> Result<String> {
        self.gateway
            .get_text(&self.blob_endpoint(locator, object_id), "get blob content")
            .await
    }

    async fn create_thread(&self, locator: &PrLocator, request: &CommentRequest) -> Result<()> {
        let payload = json!({
            "comments": [{
                "parentCommentId": 0,
                "content": request.text,
                "commentType": 1,
            }],
            "status": 1,
            "threadContext": {
                "filePath": request.path,
                "rightFileStart": {
                    "line": request.start_line,
                    "offset": request.start_offset,
                },
                "rightFileEnd": {
                    "line": request.end_line,
                    "offset": request.end_offset,
                },
            },
        });

        self.gateway
            .post_json(&self.threads_endpoint(locator), &payload, "post PR comment")
            .await
    }
}
