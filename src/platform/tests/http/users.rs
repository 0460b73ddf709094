use reqwest::Client;
use reqwest::StatusCode;
use serde_json::json;
use serde_json::Value;

use crate::assert_error_code_eq;
use crate::assert_response_json_eq;
use crate::http::tests::admin_headers;
use crate::http::tests::create_team;
use crate::http::tests::run_http_service;
use crate::http::tests::user_headers;

#[tokio::test]
async fn test_users() {
    let (base_url, _md, _pp) = run_http_service().await.unwrap();
    let cl = Client::new();

    create_team(&base_url, "backend", &[("u1", true), ("u2", true)]).await;

    // only the admin token may change activity
    {
        let resp = cl
            .post(format!("{base_url}/api/users/setIsActive"))
            .headers(user_headers())
            .body(json!({"user_id": "u2", "is_active": false}).to_string())
            .send()
            .await
            .unwrap();
        assert_error_code_eq!(resp, StatusCode::FORBIDDEN, "ADMIN_REQUIRED");
    }

    {
        let resp = cl
            .post(format!("{base_url}/api/users/setIsActive"))
            .headers(admin_headers())
            .body(json!({"user_id": "u2", "is_active": false}).to_string())
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let user: Value = resp.json().await.unwrap();
        assert_eq!(user["user_id"], "u2");
        assert_eq!(user["team_name"], "backend");
        assert_eq!(user["is_active"], false);
    }

    {
        let resp = cl
            .post(format!("{base_url}/api/users/setIsActive"))
            .headers(admin_headers())
            .body(json!({"user_id": "ghost", "is_active": false}).to_string())
            .send()
            .await
            .unwrap();
        assert_error_code_eq!(resp, StatusCode::NOT_FOUND, "NOT_FOUND");
    }

    // inactive u2 is not picked, and has nothing to review
    {
        let resp = cl
            .post(format!("{base_url}/api/pullRequest/create"))
            .headers(user_headers())
            .body(
                json!({"pull_request_id": "pr1", "pull_request_name": "fix", "author_id": "u1"})
                    .to_string(),
            )
            .send()
            .await
            .unwrap();
        let pr: Value = resp.json().await.unwrap();
        assert_eq!(pr["assigned_reviewers"], json!([]));

        let resp = cl
            .get(format!("{base_url}/api/users/getReview?user_id=u2"))
            .headers(user_headers())
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_response_json_eq!(resp, json!({"user_id": "u2", "pull_requests": []}));
    }

    // reactivated u2 picks up the next pull request
    {
        cl.post(format!("{base_url}/api/users/setIsActive"))
            .headers(admin_headers())
            .body(json!({"user_id": "u2", "is_active": true}).to_string())
            .send()
            .await
            .unwrap();
        cl.post(format!("{base_url}/api/pullRequest/create"))
            .headers(user_headers())
            .body(
                json!({"pull_request_id": "pr2", "pull_request_name": "feat", "author_id": "u1"})
                    .to_string(),
            )
            .send()
            .await
            .unwrap();

        let resp = cl
            .get(format!("{base_url}/api/users/getReview?user_id=u2"))
            .headers(user_headers())
            .send()
            .await
            .unwrap();
        assert_response_json_eq!(
            resp,
            json!({
                "user_id": "u2",
                "pull_requests": [
                    {"pull_request_id": "pr2", "pull_request_name": "feat", "author_id": "u1", "status": "OPEN"}
                ]
            })
        );
    }

    {
        let resp = cl
            .get(format!("{base_url}/api/users/getReview?user_id=ghost"))
            .headers(user_headers())
            .send()
            .await
            .unwrap();
        assert_error_code_eq!(resp, StatusCode::NOT_FOUND, "NOT_FOUND");
    }
}
