//! PR 처리 파이프라인 전반의 실패 분류.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// 파이프라인의 각 단계에서 발생 가능한 실패.
/// 내부 재시도 없이 도구 경계까지 그대로 전파된다.
#[derive(Debug, Error)]
pub enum Error {
    #[error("unsupported pull request URL: {0}")]
    InvalidLocator(String),

    #[error("no personal access token configured")]
    MissingCredential,

    #[error("interactive sign-in did not produce a usable token: {0}")]
    AuthenticationFailed(String),

    #[error("{context} failed ({status} {reason})")]
    RemoteRequestFailed {
        status: u16,
        reason: String,
        context: &'static str,
    },

    #[error("{context}: unexpected response shape: {source}")]
    MalformedResponse {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{context}: request failed: {source}")]
    Transport {
        context: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("pull request is not active (status: {0})")]
    PullRequestNotActive(String),

    #[error("pull request has merge conflicts (mergeStatus: {0})")]
    PullRequestHasConflicts(String),

    #[error("could not resolve source/target branch names")]
    BranchResolutionFailed,

    #[error("no changes found between the pull request branches")]
    NoChangesFound,

    #[error("no added or edited text files in this pull request")]
    NoEligibleFiles,
}
