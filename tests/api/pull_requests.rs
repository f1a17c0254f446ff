use crate::helpers::{
    add_team, assert_error, backend_team, create_pull_request,
    get_json_response_body, reviewers, TestApp,
};
use review_assigner::domain::{PullRequestId, PullRequestStatus};
use serde_json::json;
use test_context::test_context;

fn pull_request_schema() -> serde_json::Value {
    json!({
      "$schema": "http://json-schema.org/draft-04/schema#",
      "type": "object",
      "properties": {
        "pr": {
          "type": "object",
          "properties": {
            "pull_request_id": { "type": "string", "minLength": 1 },
            "pull_request_name": { "type": "string", "minLength": 1 },
            "author_id": { "type": "string", "minLength": 1 },
            "assigned_reviewers": {
              "type": "array",
              "maxItems": 2,
              "items": { "type": "string" }
            },
            "status": { "enum": ["OPEN", "MERGED"] },
            "createdAt": { "type": "string" },
            "mergedAt": { "type": ["string", "null"] }
          },
          "required": [
            "pull_request_id",
            "pull_request_name",
            "author_id",
            "assigned_reviewers",
            "status",
            "createdAt",
            "mergedAt"
          ]
        }
      },
      "required": ["pr"]
    })
}

async fn is_active(app: &mut TestApp, user_id: &str) -> bool {
    let body = get_json_response_body(app.get_team("backend").await).await;
    body["team"]["members"]
        .as_array()
        .unwrap()
        .iter()
        .find(|m| m["user_id"] == user_id)
        .expect("user should be in backend")["is_active"]
        .as_bool()
        .unwrap()
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_assign_first_two_active_members(app: &mut TestApp) {
    backend_team(app).await;

    let body = create_pull_request(app, "pr-1", "u1").await;

    assert!(
        jsonschema::is_valid(&pull_request_schema(), &body),
        "response does not match schema: {body}"
    );
    assert_eq!(reviewers(&body), ["u2", "u3"]);
    assert_eq!(body["pr"]["status"], "OPEN");
    assert!(body["pr"]["mergedAt"].is_null());
    assert!(!is_active(app, "u2").await);
    assert!(!is_active(app, "u3").await);
    assert!(is_active(app, "u1").await);
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_create_without_reviewers_when_pool_is_empty(app: &mut TestApp) {
    backend_team(app).await;
    create_pull_request(app, "pr-1", "u1").await;

    let body = create_pull_request(app, "pr-2", "u1").await;

    assert!(reviewers(&body).is_empty());
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_merge_and_reactivate_reviewers(app: &mut TestApp) {
    backend_team(app).await;
    create_pull_request(app, "pr-1", "u1").await;

    let response = app.post_pull_request_merge("pr-1").await;

    assert_eq!(response.status().as_u16(), 200);
    let body = get_json_response_body(response).await;
    assert!(jsonschema::is_valid(&pull_request_schema(), &body));
    assert_eq!(body["pr"]["status"], "MERGED");
    assert!(body["pr"]["mergedAt"].is_string());
    assert!(is_active(app, "u2").await);
    assert!(is_active(app, "u3").await);

    let id = PullRequestId::parse("pr-1".to_owned()).unwrap();
    let stored = app
        .pull_request_store
        .read()
        .await
        .get_pull_request(&id)
        .await
        .unwrap();
    assert_eq!(stored.status, PullRequestStatus::Merged);
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_409_after_merge(app: &mut TestApp) {
    backend_team(app).await;
    create_pull_request(app, "pr-1", "u1").await;
    app.post_pull_request_merge("pr-1").await;

    let response = app.post_pull_request_reassign("pr-1", "u2").await;
    assert_eq!(response.status().as_u16(), 409);
    assert_error(&get_json_response_body(response).await, "PR_MERGED");

    let response = app.post_pull_request_merge("pr-1").await;
    assert_eq!(response.status().as_u16(), 409);
    assert_error(&get_json_response_body(response).await, "PR_MERGED");
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_409_for_duplicate_pull_request(app: &mut TestApp) {
    backend_team(app).await;
    create_pull_request(app, "pr-1", "u1").await;

    let response = app
        .post_pull_request_create(&json!({
            "pull_request_id": "pr-1",
            "pull_request_name": "Again",
            "author_id": "u2"
        }))
        .await;

    assert_eq!(response.status().as_u16(), 409);
    assert_error(&get_json_response_body(response).await, "PR_EXISTS");
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_404_for_author_without_team(app: &mut TestApp) {
    let response = app
        .post_pull_request_create(&json!({
            "pull_request_id": "pr-1",
            "pull_request_name": "Orphan",
            "author_id": "u404"
        }))
        .await;

    assert_eq!(response.status().as_u16(), 404);
    assert_error(&get_json_response_body(response).await, "NOT_FOUND");
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_404_for_unknown_pull_request(app: &mut TestApp) {
    let response = app.post_pull_request_merge("nope").await;
    assert_eq!(response.status().as_u16(), 404);

    let response = app.post_pull_request_reassign("nope", "u2").await;
    assert_eq!(response.status().as_u16(), 404);
    assert_error(&get_json_response_body(response).await, "NOT_FOUND");
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_400_if_malformed_request(app: &mut TestApp) {
    let test_cases = [
        json!({ "pull_request_id": "pr-1", "pull_request_name": "x" }),
        json!({ "pull_request_id": "pr-1", "author_id": "u1" }),
        json!({ "pull_request_name": "x", "author_id": "u1" }),
    ];

    for test_case in test_cases.iter() {
        let response = app.post_pull_request_create(test_case).await;
        assert_eq!(
            response.status().as_u16(),
            400,
            "Failed for input: {:?}",
            test_case
        );
        assert_error(&get_json_response_body(response).await, "INVALID_REQUEST");
    }
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_reassign_in_place(app: &mut TestApp) {
    add_team(
        app,
        "backend",
        &[
            ("u1", "Alice", true),
            ("u2", "Bob", true),
            ("u3", "Charlie", true),
            ("u4", "Sam", true),
        ],
    )
    .await;
    create_pull_request(app, "pr-1", "u1").await;

    let response = app.post_pull_request_reassign("pr-1", "u3").await;

    assert_eq!(response.status().as_u16(), 200);
    let body = get_json_response_body(response).await;
    assert!(jsonschema::is_valid(&pull_request_schema(), &body));
    assert_eq!(body["replaced_by"], "u4");
    assert_eq!(reviewers(&body), ["u2", "u4"]);
    assert!(!is_active(app, "u3").await, "Old reviewer stays inactive");
    assert!(is_active(app, "u4").await, "New reviewer is not deactivated");
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_409_when_not_assigned_or_no_candidate(app: &mut TestApp) {
    backend_team(app).await;
    create_pull_request(app, "pr-1", "u1").await;

    let response = app.post_pull_request_reassign("pr-1", "u1").await;
    assert_eq!(response.status().as_u16(), 409);
    assert_error(&get_json_response_body(response).await, "NOT_ASSIGNED");

    let response = app.post_pull_request_reassign("pr-1", "u2").await;
    assert_eq!(response.status().as_u16(), 409);
    assert_error(&get_json_response_body(response).await, "NO_CANDIDATE");
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_run_full_review_cycle(app: &mut TestApp) {
    backend_team(app).await;

    let first = create_pull_request(app, "pr-1", "u1").await;
    assert_eq!(reviewers(&first), ["u2", "u3"]);

    let second = create_pull_request(app, "pr-2", "u1").await;
    assert!(reviewers(&second).is_empty());

    let merged =
        get_json_response_body(app.post_pull_request_merge("pr-1").await).await;
    assert_eq!(merged["pr"]["status"], "MERGED");
    assert!(is_active(app, "u2").await && is_active(app, "u3").await);

    let response = app.post_pull_request_reassign("pr-1", "u2").await;
    assert_eq!(response.status().as_u16(), 409);

    let third = create_pull_request(app, "pr-3", "u2").await;
    assert_eq!(reviewers(&third), ["u1", "u3"]);
}
