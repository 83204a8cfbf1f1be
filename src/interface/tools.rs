//! 도구 서술자/입출력 스키마와 호출 디스패치.

use serde::Deserialize;
use serde_json::{Value, json};

use super::composition::AppComposition;
use crate::domain::pr::CommentRequest;

/// 클라이언트에 광고되는 도구 메타데이터.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// 도구 호출 결과. 실패는 오류 플래그가 달린 텍스트로 표현한다.
#[derive(Debug, serde::Serialize)]
pub struct CallToolResult {
    pub content: Vec<ToolContent>,
    #[serde(rename = "isError")]
    pub is_error: bool,
}

#[derive(Debug, serde::Serialize)]
pub struct ToolContent {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
}

impl CallToolResult {
    fn text(text: String, is_error: bool) -> Self {
        Self {
            content: vec![ToolContent {
                kind: "text".to_string(),
                text,
            }],
            is_error,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GetPrChangesInput {
    pr_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PostPrCommentInput {
    pr_url: String,
    comment: String,
    file_path: String,
    right_file_start_line: u64,
    right_file_start_offset: u64,
    right_file_end_line: u64,
    right_file_end_offset: u64,
}

pub fn tool_descriptors() -> Vec<ToolDescriptor> {
    let get_pr_changes = ToolDescriptor {
        name: "get_pr_changes".to_string(),
        description: "List the file-level changes of an Azure DevOps pull request as unified diffs"
            .to_string(),
        input_schema: json!({
            "type": "object",
            "additionalProperties": false,
            "required": ["prUrl"],
            "properties": {
                "prUrl": {
                    "type": "string",
                    "description": "Pull request URL (dev.azure.com or *.visualstudio.com)"
                }
            }
        }),
    };

    let post_pr_comment = ToolDescriptor {
        name: "post_pr_comment".to_string(),
        description: "Post a review comment anchored to a file region of a pull request"
            .to_string(),
        input_schema: json!({
            "type": "object",
            "additionalProperties": false,
            "required": [
                "prUrl", "comment", "filePath",
                "rightFileStartLine", "rightFileStartOffset",
                "rightFileEndLine", "rightFileEndOffset"
            ],
            "properties": {
                "prUrl": { "type": "string" },
                "comment": { "type": "string" },
                "filePath": { "type": "string" },
                "rightFileStartLine": { "type": "integer", "minimum": 1 },
                "rightFileStartOffset": { "type": "integer", "minimum": 1 },
                "rightFileEndLine": { "type": "integer", "minimum": 1 },
                "rightFileEndOffset": { "type": "integer", "minimum": 1 }
            }
        }),
    };

    vec![get_pr_changes, post_pr_comment]
}

/// 이름/인자로 도구를 실행한다.
/// 어떤 실패도 프로세스를 죽이지 않고 오류 결과로 변환된다.
pub async fn handle_call(
    composition: &AppComposition,
    name: &str,
    arguments: Value,
) -> CallToolResult {
    match name {
        "get_pr_changes" => get_pr_changes(composition, arguments).await,
        "post_pr_comment" => post_pr_comment(composition, arguments).await,
        other => CallToolResult::text(format!("unknown tool: {other}"), true),
    }
}

async fn get_pr_changes(composition: &AppComposition, arguments: Value) -> CallToolResult {
    let input: GetPrChangesInput = match serde_json::from_value(arguments) {
        Ok(input) => input,
        Err(err) => return CallToolResult::text(format!("invalid arguments: {err}"), true),
    };

    match composition.get_pr_changes_usecase().execute(&input.pr_url).await {
        Ok(changes) => {
            let payload = json!({
                "success": true,
                "changesCount": changes.len(),
                "changes": changes,
            });
            CallToolResult::text(payload.to_string(), false)
        }
        Err(err) => CallToolResult::text(format!("error: {err}"), true),
    }
}

async fn post_pr_comment(composition: &AppComposition, arguments: Value) -> CallToolResult {
    let input: PostPrCommentInput = match serde_json::from_value(arguments) {
        Ok(input) => input,
        Err(err) => return CallToolResult::text(format!("invalid arguments: {err}"), true),
    };

    let request = CommentRequest {
        path: input.file_path,
        start_line: input.right_file_start_line,
        start_offset: input.right_file_start_offset,
        end_line: input.right_file_end_line,
        end_offset: input.right_file_end_offset,
        text: input.comment,
    };

    match composition
        .post_pr_comment_usecase()
        .execute(&input.pr_url, &request)
        .await
    {
        Ok(()) => CallToolResult::text(json!({ "success": true }).to_string(), false),
        Err(err) => CallToolResult::text(format!("error: {err}"), true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptors_advertise_both_tools_with_schemas() {
        let descriptors = tool_descriptors();
        let names: Vec<&str> = descriptors.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["get_pr_changes", "post_pr_comment"]);

        for descriptor in &descriptors {
            assert_eq!(descriptor.input_schema["type"], "object");
        }

        let serialized = serde_json::to_value(&descriptors[0]).unwrap();
        assert!(serialized.get("inputSchema").is_some());
    }
}
