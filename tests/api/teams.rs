use crate::helpers::{
    add_team, assert_error, backend_team, get_json_response_body, team_body,
    TestApp,
};
use review_assigner::domain::UserId;
use serde_json::json;
use test_context::test_context;

fn team_schema() -> serde_json::Value {
    json!({
      "$schema": "http://json-schema.org/draft-04/schema#",
      "type": "object",
      "properties": {
        "team": {
          "type": "object",
          "properties": {
            "team_name": { "type": "string", "minLength": 1, "maxLength": 255 },
            "members": {
              "type": "array",
              "items": {
                "type": "object",
                "properties": {
                  "user_id": { "type": "string", "minLength": 1 },
                  "username": { "type": "string", "minLength": 1 },
                  "is_active": { "type": "boolean" }
                },
                "required": ["user_id", "username", "is_active"]
              }
            }
          },
          "required": ["team_name", "members"]
        }
      },
      "required": ["team"]
    })
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_201_and_roster_for_new_team(app: &mut TestApp) {
    let response = app
        .post_team_add(&team_body(
            "backend",
            &[("u1", "Alice", true), ("u2", "Bob", false)],
        ))
        .await;

    assert_eq!(response.status().as_u16(), 201);
    let body = get_json_response_body(response).await;
    assert!(
        jsonschema::is_valid(&team_schema(), &body),
        "response does not match schema: {body}"
    );
    assert_eq!(body["team"]["team_name"], "backend");
    assert_eq!(body["team"]["members"][0]["user_id"], "u1");
    assert_eq!(body["team"]["members"][1]["is_active"], false);
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_400_for_duplicate_team(app: &mut TestApp) {
    backend_team(app).await;

    let response = app
        .post_team_add(&team_body("backend", &[("u9", "Ivy", true)]))
        .await;

    assert_eq!(response.status().as_u16(), 400);
    assert_error(&get_json_response_body(response).await, "TEAM_EXISTS");
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_400_when_member_is_in_another_team(app: &mut TestApp) {
    add_team(app, "S", &[("u5", "Eve", true)]).await;

    let response = app
        .post_team_add(&team_body("T", &[("u6", "Finn", true), ("u5", "Eve", true)]))
        .await;

    assert_eq!(response.status().as_u16(), 400);
    let body = get_json_response_body(response).await;
    assert_error(&body, "USER_IN_ANOTHER_TEAM");
    assert!(
        body["error"]["message"].as_str().unwrap().ends_with("team S"),
        "Message should name the conflicting team: {body}"
    );

    assert_eq!(app.get_team("T").await.status().as_u16(), 404);
    let s = get_json_response_body(app.get_team("S").await).await;
    assert_eq!(s["team"]["members"][0]["user_id"], "u5");

    let u6 = UserId::parse("u6".to_owned()).unwrap();
    assert!(
        app.user_store.read().await.get_user(&u6).await.is_err(),
        "Rejected team must not create users"
    );
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_400_if_invalid_input(app: &mut TestApp) {
    let test_cases = [
        team_body("", &[("u1", "Alice", true)]),
        team_body("   ", &[("u1", "Alice", true)]),
        team_body("backend", &[(" ", "Alice", true)]),
        team_body("backend", &[("", "Alice", true)]),
        team_body("backend", &[("u1", "", true)]),
        team_body(&"x".repeat(256), &[("u1", "Alice", true)]),
        team_body("backend", &[("u1", "Alice", true), ("u1", "Alias", true)]),
    ];

    for test_case in test_cases.iter() {
        let response = app.post_team_add(test_case).await;
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
async fn should_return_400_if_malformed_request(app: &mut TestApp) {
    let test_cases = [
        json!({ "team_name": "backend" }),
        json!({ "members": [] }),
        json!({
            "team_name": "backend",
            "members": [{ "user_id": "u1", "username": "Alice" }]
        }),
        json!({ "team_name": 7, "members": [] }),
    ];

    for test_case in test_cases.iter() {
        let response = app.post_team_add(test_case).await;
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
async fn should_return_400_if_body_is_not_json(app: &mut TestApp) {
    let response = app
        .http_client
        .post(format!("{}/team/add", &app.address))
        .header("content-type", "application/json")
        .body("{\"team_name\": ")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 400);
    assert_error(&get_json_response_body(response).await, "INVALID_REQUEST");
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_live_member_state(app: &mut TestApp) {
    backend_team(app).await;
    app.post_set_is_active("u2", false).await;

    let response = app.get_team("backend").await;

    assert_eq!(response.status().as_u16(), 200);
    let body = get_json_response_body(response).await;
    assert!(jsonschema::is_valid(&team_schema(), &body));
    assert_eq!(body["team"]["members"][1]["user_id"], "u2");
    assert_eq!(body["team"]["members"][1]["is_active"], false);
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_404_for_unknown_team(app: &mut TestApp) {
    let response = app.get_team("nobody").await;

    assert_eq!(response.status().as_u16(), 404);
    assert_error(&get_json_response_body(response).await, "NOT_FOUND");
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_400_without_team_name(app: &mut TestApp) {
    let response = app
        .http_client
        .get(format!("{}/team/get", &app.address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 400);
    assert_error(&get_json_response_body(response).await, "INVALID_REQUEST");
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_move_members_on_update(app: &mut TestApp) {
    backend_team(app).await;
    add_team(app, "frontend", &[("u6", "Dana", true)]).await;

    let response = app
        .put_team_update(&team_body(
            "frontend",
            &[("u6", "Dana", true), ("u2", "Bob", true)],
        ))
        .await;

    assert_eq!(response.status().as_u16(), 200);
    let body = get_json_response_body(response).await;
    assert!(jsonschema::is_valid(&team_schema(), &body));
    assert_eq!(body["team"]["members"][1]["user_id"], "u2");

    let backend = get_json_response_body(app.get_team("backend").await).await;
    let ids: Vec<&str> = backend["team"]["members"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["user_id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, ["u1", "u3"]);

    let u2 = UserId::parse("u2".to_owned()).unwrap();
    let team = app
        .team_store
        .read()
        .await
        .get_team_by_user(&u2)
        .await
        .expect("u2 should belong to a team");
    assert_eq!(team.team_name.as_ref(), "frontend");
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_404_when_updating_unknown_team(app: &mut TestApp) {
    let response = app
        .put_team_update(&team_body("ghost", &[("u1", "Alice", true)]))
        .await;

    assert_eq!(response.status().as_u16(), 404);
    assert_error(&get_json_response_body(response).await, "NOT_FOUND");
}
