use reqwest::Client;
use reqwest::StatusCode;
use serde_json::json;

use crate::assert_error_code_eq;
use crate::assert_response_json_eq;
use crate::http::tests::create_team;
use crate::http::tests::run_http_service;
use crate::http::tests::user_headers;

#[tokio::test]
async fn test_statistics() {
    let (base_url, _md, _pp) = run_http_service().await.unwrap();
    let cl = Client::new();

    // empty store
    {
        let resp = cl
            .get(format!("{base_url}/api/stats/pullRequests"))
            .headers(user_headers())
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_response_json_eq!(resp, json!([]));
    }

    create_team(&base_url, "backend", &[("u1", true), ("u2", true)]).await;
    cl.post(format!("{base_url}/api/pullRequest/create"))
        .headers(user_headers())
        .body(json!({"pull_request_id": "pr1", "pull_request_name": "a", "author_id": "u1"}).to_string())
        .send()
        .await
        .unwrap();

    {
        let resp = cl
            .get(format!("{base_url}/api/stats/assignments"))
            .headers(user_headers())
            .send()
            .await
            .unwrap();
        assert_response_json_eq!(
            resp,
            json!([{"user_id": "u2", "username": "name u2", "assignment_count": 1}])
        );
    }

    {
        let resp = cl
            .get(format!("{base_url}/api/stats/pullRequests"))
            .headers(user_headers())
            .send()
            .await
            .unwrap();
        assert_response_json_eq!(resp, json!([{"status": "OPEN", "count": 1}]));
    }

    {
        let resp = cl
            .get(format!("{base_url}/api/stats/teams"))
            .headers(user_headers())
            .send()
            .await
            .unwrap();
        assert_response_json_eq!(
            resp,
            json!([{"team_name": "backend", "member_count": 2, "active_member_count": 2, "pr_count": 1}])
        );
    }

    {
        let resp = cl
            .get(format!("{base_url}/api/stats/teams"))
            .send()
            .await
            .unwrap();
        assert_error_code_eq!(resp, StatusCode::UNAUTHORIZED, "UNAUTHORIZED");
    }
}

#[tokio::test]
async fn test_health() {
    let (base_url, _md, _pp) = run_http_service().await.unwrap();

    let resp = Client::new()
        .get(format!("{base_url}/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_response_json_eq!(resp, json!({"status": "ok", "database": {"status": "ok"}}));
}
