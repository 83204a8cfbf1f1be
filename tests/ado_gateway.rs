use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use adopilot::application::ports::PullRequestGateway;
use adopilot::application::usecases::get_pr_changes::GetPrChangesUseCase;
use adopilot::application::usecases::post_pr_comment::PostPrCommentUseCase;
use adopilot::domain::error::Error;
use adopilot::domain::locator::PrLocator;
use adopilot::domain::pr::CommentRequest;
use adopilot::infrastructure::ado::{AdoClient, RestGateway};
use adopilot::infrastructure::auth::StaticTokenProvider;

const PR_URL: &str = "https://dev.azure.com/contoso/tools/_git/backend/pullrequest/5";
const PR_PATH: &str = "/contoso/tools/_apis/git/repositories/backend/pullRequests/5";
const DIFFS_PATH: &str = "/contoso/tools/_apis/git/repositories/backend/diffs/commits";

fn client_for(server: &MockServer, token: &str) -> AdoClient {
    let credentials = Arc::new(StaticTokenProvider::new(Some(token.to_string())));
    AdoClient::with_service_root(RestGateway::new(credentials), server.uri())
}

fn pr_summary(status: &str, merge_status: &str) -> serde_json::Value {
    json!({
        "pullRequestId": 5,
        "status": status,
        "mergeStatus": merge_status,
        "sourceRefName": "refs/heads/feature/x",
        "targetRefName": "refs/heads/main",
    })
}

#[tokio::test]
async fn static_pat_sends_exact_basic_header() {
    let server = MockServer::start().await;

    // base64(":abc") == "OmFiYw=="
    Mock::given(method("GET"))
        .and(path(PR_PATH))
        .and(header("Authorization", "Basic OmFiYw=="))
        .and(query_param("api-version", "7.1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(pr_summary("active", "succeeded")))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, "abc");
    let locator = PrLocator::parse(PR_URL).unwrap();

    let summary = client.fetch_pull_request(&locator).await.unwrap();
    assert_eq!(summary.pull_request_id, 5);
    assert_eq!(summary.source_ref_name, "refs/heads/feature/x");
}

#[tokio::test]
async fn added_file_yields_single_insert_diff() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(PR_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(pr_summary("active", "succeeded")))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(DIFFS_PATH))
        .and(query_param("baseVersion", "main"))
        .and(query_param("targetVersion", "feature/x"))
        .and(query_param("$top", "2000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "changes": [{
                "changeType": "add",
                "item": {
                    "objectId": "aaa111",
                    "gitObjectType": "blob",
                    "path": "/docs/hello.txt",
                    "url": format!("{}/blob/aaa111", server.uri()),
                }
            }]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(
            "/contoso/tools/_apis/git/repositories/backend/blobs/aaa111",
        ))
        .and(header("Accept", "text/plain"))
        .respond_with(ResponseTemplate::new(200).set_body_string("hello\n"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, "abc");
    let usecase = GetPrChangesUseCase { gateway: &client };

    let diffs = usecase.execute(PR_URL).await.unwrap();
    assert_eq!(diffs.len(), 1);

    let diff = &diffs[0];
    assert_eq!(diff.path, "/docs/hello.txt");
    assert!(diff.original_content.is_none());
    assert!(
        diff.patch.ends_with("@@ -0,0 +1,1 @@\n+hello\n"),
        "patch: {}",
        diff.patch
    );
}

#[tokio::test]
async fn edited_file_keeps_original_content_and_minimal_hunk() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(PR_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(pr_summary("active", "succeeded")))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(DIFFS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "changes": [{
                "changeType": "edit",
                "item": {
                    "objectId": "new222",
                    "originalObjectId": "old111",
                    "gitObjectType": "blob",
                    "path": "/src/lib.rs",
                    "url": format!("{}/blob/new222", server.uri()),
                }
            }]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(
            "/contoso/tools/_apis/git/repositories/backend/blobs/old111",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_string("a\nb\nc\n"))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(
            "/contoso/tools/_apis/git/repositories/backend/blobs/new222",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_string("a\nx\nc\n"))
        .mount(&server)
        .await;

    let client = client_for(&server, "abc");
    let usecase = GetPrChangesUseCase { gateway: &client };

    let diffs = usecase.execute(PR_URL).await.unwrap();
    assert_eq!(diffs.len(), 1);
    assert_eq!(diffs[0].original_content.as_deref(), Some("a\nb\nc\n"));
    assert!(
        diffs[0].patch.ends_with("@@ -2,1 +2,1 @@\n-b\n+x\n"),
        "patch: {}",
        diffs[0].patch
    );
}

#[tokio::test]
async fn completed_pr_fails_before_any_diff_fetch() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(PR_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(pr_summary("completed", "succeeded")))
        .mount(&server)
        .await;

    // 변경 목록 엔드포인트는 호출되지 않아야 한다.
    Mock::given(method("GET"))
        .and(path(DIFFS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "changes": [] })))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server, "abc");
    let usecase = GetPrChangesUseCase { gateway: &client };

    let err = usecase.execute(PR_URL).await.unwrap_err();
    assert!(matches!(err, Error::PullRequestNotActive(status) if status == "completed"));
}

#[tokio::test]
async fn conflicted_pr_is_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(PR_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(pr_summary("active", "conflicts")))
        .mount(&server)
        .await;

    let client = client_for(&server, "abc");
    let usecase = GetPrChangesUseCase { gateway: &client };

    let err = usecase.execute(PR_URL).await.unwrap_err();
    assert!(matches!(err, Error::PullRequestHasConflicts(status) if status == "conflicts"));
}

#[tokio::test]
async fn ineligible_only_change_list_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(PR_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(pr_summary("active", "succeeded")))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(DIFFS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "changes": [
                { "changeType": "delete", "item": {
                    "gitObjectType": "blob", "path": "/gone.txt", "url": "u" } },
                { "changeType": "edit", "item": {
                    "gitObjectType": "tree", "path": "/dir", "url": "u" } }
            ]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, "abc");
    let usecase = GetPrChangesUseCase { gateway: &client };

    let err = usecase.execute(PR_URL).await.unwrap_err();
    assert!(matches!(err, Error::NoEligibleFiles));
}

#[tokio::test]
async fn empty_change_list_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(PR_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(pr_summary("active", "succeeded")))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(DIFFS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "changes": [] })))
        .mount(&server)
        .await;

    let client = client_for(&server, "abc");
    let usecase = GetPrChangesUseCase { gateway: &client };

    let err = usecase.execute(PR_URL).await.unwrap_err();
    assert!(matches!(err, Error::NoChangesFound));
}

#[tokio::test]
async fn comment_thread_is_posted_with_anchor() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(
            "/contoso/tools/_apis/git/repositories/backend/pullRequests/5/threads",
        ))
        .and(body_partial_json(json!({
            "comments": [{ "content": "needs a null check", "commentType": 1 }],
            "threadContext": {
                "filePath": "/src/lib.rs",
                "rightFileStart": { "line": 10, "offset": 1 },
                "rightFileEnd": { "line": 12, "offset": 8 },
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 99 })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, "abc");
    let usecase = PostPrCommentUseCase { gateway: &client };

    let request = CommentRequest {
        path: "/src/lib.rs".to_string(),
        start_line: 10,
        start_offset: 1,
        end_line: 12,
        end_offset: 8,
        text: "needs a null check".to_string(),
    };

    usecase.execute(PR_URL, &request).await.unwrap();
}

#[tokio::test]
async fn non_success_status_surfaces_with_context() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(PR_PATH))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = client_for(&server, "abc");
    let usecase = GetPrChangesUseCase { gateway: &client };

    let err = usecase.execute(PR_URL).await.unwrap_err();
    match err {
        Error::RemoteRequestFailed {
            status, context, ..
        } => {
            assert_eq!(status, 404);
            assert_eq!(context, "get PR details");
        }
        other => panic!("unexpected error: {other}"),
    }
}
