//! PR URL에서 파일별 unified diff 목록을 만드는 유스케이스.

use futures::future::try_join_all;
use tracing::debug;

use crate::application::ports::PullRequestGateway;
use crate::domain::diff;
use crate::domain::error::{Error, Result};
use crate::domain::locator::PrLocator;
use crate::domain::pr::{ChangeEntry, FileDiff, branch_short_name};

/// URL 파싱부터 blob 병렬 조회, diff 합성까지 전체 흐름을 조율한다.
pub struct GetPrChangesUseCase<'a> {
    pub gateway: &'a dyn PullRequestGateway,
}

impl GetPrChangesUseCase<'_> {
    /// 단계 1~5는 순차, 파일별 blob 조회/합성만 병렬이다.
    /// 한 파일이라도 실패하면 전체가 실패한다(부분 결과 없음).
    pub async fn execute(&self, url: &str) -> Result<Vec<FileDiff>> {
        let locator = PrLocator::parse(url)?;

        let summary = self.gateway.fetch_pull_request(&locator).await?;
        if summary.status != "active" {
            return Err(Error::PullRequestNotActive(summary.status));
        }
        if summary.merge_status != "succeeded" {
            return Err(Error::PullRequestHasConflicts(summary.merge_status));
        }

        let source = branch_short_name(&summary.source_ref_name)
            .ok_or(Error::BranchResolutionFailed)?;
        let target = branch_short_name(&summary.target_ref_name)
            .ok_or(Error::BranchResolutionFailed)?;
        debug!(source, target, "resolved comparison branches");

        let changes = self.gateway.fetch_changes(&locator, target, source).await?;
        if changes.is_empty() {
            return Err(Error::NoChangesFound);
        }

        let eligible: Vec<ChangeEntry> =
            changes.into_iter().filter(ChangeEntry::is_eligible).collect();
        if eligible.is_empty() {
            return Err(Error::NoEligibleFiles);
        }
        debug!(count = eligible.len(), "fetching blobs for eligible changes");

        // 결과 순서는 완료 순서가 아니라 필터링된 목록 순서를 따른다.
        try_join_all(
            eligible
                .iter()
                .map(|entry| self.build_file_diff(&locator, entry)),
        )
        .await
    }

    /// 한 항목의 old/new blob을 동시에 받아 diff를 합성한다.
    async fn build_file_diff(
        &self,
        locator: &PrLocator,
        entry: &ChangeEntry,
    ) -> Result<FileDiff> {
        // is_eligible 통과 항목은 item/path가 항상 존재한다.
        let item = entry.item.as_ref().ok_or(Error::NoEligibleFiles)?;
        let path = item.path.clone().ok_or(Error::NoEligibleFiles)?;

        let (original_content, new_content) = tokio::try_join!(
            self.fetch_optional_blob(locator, item.original_object_id.as_deref()),
            self.fetch_optional_blob(locator, item.object_id.as_deref()),
        )?;

        let patch = diff::synthesize(
            &path,
            original_content.as_deref().unwrap_or_default(),
            new_content.as_deref().unwrap_or_default(),
        );

        Ok(FileDiff {
            path,
            original_content,
            patch,
        })
    }

    /// blob id가 없는 쪽은 "내용 없음"이며 네트워크 호출을 생략한다.
    async fn fetch_optional_blob(
        &self,
        locator: &PrLocator,
        object_id: Option<&str>,
    ) -> Result<Option<String>> {
        match object_id {
            Some(id) => Ok(Some(self.gateway.fetch_blob(locator, id).await?)),
            None => Ok(None),
        }
    }
}
