use reqwest::Client;
use reqwest::StatusCode;
use serde_json::json;
use serde_json::Value;

use crate::assert_error_code_eq;
use crate::assert_response_status_eq;
use crate::http::tests::admin_headers;
use crate::http::tests::create_team;
use crate::http::tests::run_http_service;
use crate::http::tests::user_headers;

#[tokio::test]
async fn test_teams() {
    let (base_url, _md, _pp) = run_http_service().await.unwrap();
    let cl = Client::new();

    // no bearer token
    {
        let resp = cl
            .get(format!("{base_url}/api/team/get?team_name=backend"))
            .send()
            .await
            .unwrap();
        assert_error_code_eq!(resp, StatusCode::UNAUTHORIZED, "UNAUTHORIZED");
    }

    // unknown token
    {
        let resp = cl
            .get(format!("{base_url}/api/team/get?team_name=backend"))
            .bearer_auth("nope")
            .send()
            .await
            .unwrap();
        assert_response_status_eq!(resp, StatusCode::UNAUTHORIZED);
    }

    // get of un-existing team should return 404
    {
        let resp = cl
            .get(format!("{base_url}/api/team/get?team_name=backend"))
            .headers(user_headers())
            .send()
            .await
            .unwrap();
        assert_error_code_eq!(resp, StatusCode::NOT_FOUND, "NOT_FOUND");
    }

    // create
    {
        let team = create_team(&base_url, "backend", &[("u2", true), ("u1", false)]).await;
        assert_eq!(team["team_name"], "backend");
        assert_eq!(
            team["members"],
            json!([
                {"user_id": "u1", "username": "name u1", "is_active": false},
                {"user_id": "u2", "username": "name u2", "is_active": true},
            ])
        );
    }

    // duplicate team name
    {
        let resp = cl
            .post(format!("{base_url}/api/team/add"))
            .headers(admin_headers())
            .body(json!({"team_name": "backend", "members": []}).to_string())
            .send()
            .await
            .unwrap();
        assert_error_code_eq!(resp, StatusCode::CONFLICT, "TEAM_EXISTS");
    }

    // get
    {
        let resp = cl
            .get(format!("{base_url}/api/team/get?team_name=backend"))
            .headers(user_headers())
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let team: Value = resp.json().await.unwrap();
        assert_eq!(team["members"].as_array().unwrap().len(), 2);
    }

    // moving a user to another team
    {
        create_team(&base_url, "frontend", &[("u1", true)]).await;
        let resp = cl
            .get(format!("{base_url}/api/team/get?team_name=backend"))
            .headers(user_headers())
            .send()
            .await
            .unwrap();
        let team: Value = resp.json().await.unwrap();
        assert_eq!(
            team["members"],
            json!([{"user_id": "u2", "username": "name u2", "is_active": true}])
        );
    }
}

#[tokio::test]
async fn test_teams_bad_requests() {
    let (base_url, _md, _pp) = run_http_service().await.unwrap();
    let cl = Client::new();

    // missing query parameter
    {
        let resp = cl
            .get(format!("{base_url}/api/team/get"))
            .headers(user_headers())
            .send()
            .await
            .unwrap();
        assert_error_code_eq!(resp, StatusCode::BAD_REQUEST, "INVALID_REQUEST");
    }

    // malformed body
    {
        let resp = cl
            .post(format!("{base_url}/api/team/add"))
            .headers(admin_headers())
            .body("{\"team_name\":")
            .send()
            .await
            .unwrap();
        assert_error_code_eq!(resp, StatusCode::BAD_REQUEST, "INVALID_REQUEST");
    }

    // empty names
    {
        let resp = cl
            .post(format!("{base_url}/api/team/add"))
            .headers(admin_headers())
            .body(
                json!({"team_name": "", "members": [{"user_id": "u1", "username": "", "is_active": true}]})
                    .to_string(),
            )
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["error"]["fields"]["team_name"], "must not be empty");
        assert_eq!(body["error"]["fields"]["members[0].username"], "must not be empty");
    }
}
