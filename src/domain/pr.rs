//! Azure DevOps PR 도메인 모델과 변경 목록 정책.

use serde::{Deserialize, Serialize};

/// `GET .../pullRequests/{id}` 응답 중 파이프라인이 쓰는 부분.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequestSummary {
    pub pull_request_id: u64,
    pub status: String,
    #[serde(default)]
    pub merge_status: String,
    pub source_ref_name: String,
    pub target_ref_name: String,
}

/// `GET .../diffs/commits` 응답의 변경 항목 목록.
#[derive(Debug, Deserialize)]
pub struct ChangeList {
    #[serde(default)]
    pub changes: Vec<ChangeEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeEntry {
    #[serde(default)]
    pub change_type: Option<String>,
    #[serde(default)]
    pub item: Option<FileItem>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileItem {
    /// 변경 후 blob id. add/edit 항목에서 존재.
    #[serde(default)]
    pub object_id: Option<String>,
    /// 변경 전 blob id. edit 항목에서 존재.
    #[serde(default)]
    pub original_object_id: Option<String>,
    #[serde(default)]
    pub git_object_type: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl ChangeEntry {
    /// diff 대상 자격 판정: add/edit + blob + path/url 존재.
    pub fn is_eligible(&self) -> bool {
        let Some(change_type) = self.change_type.as_deref() else {
            return false;
        };
        if change_type != "add" && change_type != "edit" {
            return false;
        }

        let Some(item) = &self.item else {
            return false;
        };

        item.git_object_type.as_deref() == Some("blob")
            && item.path.as_deref().is_some_and(|p| !p.is_empty())
            && item.url.as_deref().is_some_and(|u| !u.is_empty())
    }
}

/// 파일 하나의 diff 결과. 항목별로 독립이며 병합/중복 제거하지 않는다.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDiff {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_content: Option<String>,
    pub patch: String,
}

/// 파일 영역에 앵커된 리뷰 코멘트 요청.
#[derive(Debug, Clone)]
pub struct CommentRequest {
    pub path: String,
    pub start_line: u64,
    pub start_offset: u64,
    pub end_line: u64,
    pub end_offset: u64,
    pub text: String,
}

/// `refs/heads/` 접두사를 제거해 브랜치 짧은 이름을 얻는다.
/// 제거 결과가 비면 None.
pub fn branch_short_name(ref_name: &str) -> Option<&str> {
    let short = ref_name.strip_prefix("refs/heads/").unwrap_or(ref_name);
    if short.is_empty() { None } else { Some(short) }
}
