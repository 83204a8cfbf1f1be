//! 공개 도구 두 개에 대응하는 유스케이스.

pub mod get_pr_changes;
pub mod post_pr_comment;
