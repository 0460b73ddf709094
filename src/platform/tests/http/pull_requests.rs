use reqwest::Client;
use reqwest::StatusCode;
use serde_json::json;
use serde_json::Value;

use crate::assert_error_code_eq;
use crate::http::tests::create_team;
use crate::http::tests::run_http_service;
use crate::http::tests::user_headers;

#[tokio::test]
async fn test_pull_requests() {
    let (base_url, _md, _pp) = run_http_service().await.unwrap();
    let pr_url = format!("{base_url}/api/pullRequest");
    let cl = Client::new();

    create_team(&base_url, "backend", &[("u1", true), ("u2", true), ("u3", true)]).await;

    // create
    let reviewers = {
        let resp = cl
            .post(format!("{pr_url}/create"))
            .headers(user_headers())
            .body(
                json!({"pull_request_id": "pr1", "pull_request_name": "add search", "author_id": "u1"})
                    .to_string(),
            )
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        let pr: Value = resp.json().await.unwrap();
        assert_eq!(pr["pull_request_id"], "pr1");
        assert_eq!(pr["status"], "OPEN");
        assert!(pr["createdAt"].is_string());
        assert!(pr.get("mergedAt").is_none());

        // two candidates, both are taken
        assert_eq!(pr["assigned_reviewers"], json!(["u2", "u3"]));
        pr["assigned_reviewers"].clone()
    };

    // duplicate id
    {
        let resp = cl
            .post(format!("{pr_url}/create"))
            .headers(user_headers())
            .body(
                json!({"pull_request_id": "pr1", "pull_request_name": "again", "author_id": "u1"})
                    .to_string(),
            )
            .send()
            .await
            .unwrap();
        assert_error_code_eq!(resp, StatusCode::CONFLICT, "PR_EXISTS");
    }

    // unknown author
    {
        let resp = cl
            .post(format!("{pr_url}/create"))
            .headers(user_headers())
            .body(
                json!({"pull_request_id": "pr2", "pull_request_name": "x", "author_id": "ghost"})
                    .to_string(),
            )
            .send()
            .await
            .unwrap();
        assert_error_code_eq!(resp, StatusCode::NOT_FOUND, "NOT_FOUND");
    }

    // no one else to take over from u2
    {
        let resp = cl
            .post(format!("{pr_url}/reassign"))
            .headers(user_headers())
            .body(json!({"pull_request_id": "pr1", "old_reviewer_id": "u2"}).to_string())
            .send()
            .await
            .unwrap();
        assert_error_code_eq!(resp, StatusCode::CONFLICT, "NO_CANDIDATE");
    }

    // u1 is the author, not a reviewer
    {
        let resp = cl
            .post(format!("{pr_url}/reassign"))
            .headers(user_headers())
            .body(json!({"pull_request_id": "pr1", "old_reviewer_id": "u1"}).to_string())
            .send()
            .await
            .unwrap();
        assert_error_code_eq!(resp, StatusCode::CONFLICT, "NOT_ASSIGNED");
    }

    // u2 moves to a team with a free member
    {
        create_team(&base_url, "platform", &[("u2", true), ("u4", true)]).await;

        let resp = cl
            .post(format!("{pr_url}/reassign"))
            .headers(user_headers())
            .body(json!({"pull_request_id": "pr1", "old_reviewer_id": "u2"}).to_string())
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["replaced_by"], "u4");
        assert_eq!(body["pr"]["assigned_reviewers"], json!(["u4", "u3"]));
        assert_ne!(body["pr"]["assigned_reviewers"], reviewers);
    }

    // merge
    {
        let resp = cl
            .post(format!("{pr_url}/merge"))
            .headers(user_headers())
            .body(json!({"pull_request_id": "pr1"}).to_string())
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let pr: Value = resp.json().await.unwrap();
        assert_eq!(pr["status"], "MERGED");
        assert!(pr["mergedAt"].is_string());
    }

    // merging again is rejected
    {
        let resp = cl
            .post(format!("{pr_url}/merge"))
            .headers(user_headers())
            .body(json!({"pull_request_id": "pr1"}).to_string())
            .send()
            .await
            .unwrap();
        assert_error_code_eq!(resp, StatusCode::CONFLICT, "PR_MERGED");
    }

    // reassign on merged
    {
        let resp = cl
            .post(format!("{pr_url}/reassign"))
            .headers(user_headers())
            .body(json!({"pull_request_id": "pr1", "old_reviewer_id": "u3"}).to_string())
            .send()
            .await
            .unwrap();
        assert_error_code_eq!(resp, StatusCode::CONFLICT, "PR_MERGED");
    }

    // merge of un-existing pull request
    {
        let resp = cl
            .post(format!("{pr_url}/merge"))
            .headers(user_headers())
            .body(json!({"pull_request_id": "nope"}).to_string())
            .send()
            .await
            .unwrap();
        assert_error_code_eq!(resp, StatusCode::NOT_FOUND, "NOT_FOUND");
    }
}
