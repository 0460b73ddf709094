mod pull_requests;
mod statistics;
mod teams;
mod users;

#[cfg(test)]
mod tests {
    use std::env::temp_dir;
    use std::net::SocketAddr;
    use std::sync::atomic::AtomicU16;
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    use axum::Router;
    use common::config::Config;
    use lazy_static::lazy_static;
    use metadata::MetadataProvider;
    use platform::http::attach_routes;
    use reqwest::header::HeaderMap;
    use reqwest::header::HeaderValue;
    use reqwest::header::AUTHORIZATION;
    use reqwest::header::CONTENT_TYPE;
    use reqwest::Client;
    use serde_json::json;
    use serde_json::Value;
    use tokio::time::sleep;
    use uuid::Uuid;

    lazy_static! {
        pub static ref CFG: Config = Config::default();
    }
    static HTTP_PORT: AtomicU16 = AtomicU16::new(18080);

    fn headers(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(format!("Bearer {token}").as_str()).unwrap(),
        );

        headers
    }

    pub fn admin_headers() -> HeaderMap {
        headers(&CFG.auth.admin_token)
    }

    pub fn user_headers() -> HeaderMap {
        headers(&CFG.auth.user_token)
    }

    pub async fn run_http_service() -> anyhow::Result<(
        String,
        Arc<MetadataProvider>,
        Arc<platform::PlatformProvider>,
    )> {
        let mut path = temp_dir();
        path.push(format!("{}", Uuid::new_v4()));
        let rocks = Arc::new(metadata::rocksdb::new(path.join("md"))?);
        let md = Arc::new(MetadataProvider::try_new(rocks)?);
        let platform_provider = Arc::new(platform::PlatformProvider::new(md.clone()));

        let addr = SocketAddr::from(([127, 0, 0, 1], HTTP_PORT.fetch_add(1, Ordering::SeqCst)));
        let router = attach_routes(Router::new(), &platform_provider, CFG.clone());
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tokio::spawn(async move { axum::serve(listener, router).await });

        sleep(tokio::time::Duration::from_millis(100)).await;

        Ok((format!("http://{addr}"), md, platform_provider))
    }

    /// Creates team `name` with the given `(user_id, is_active)` members.
    pub async fn create_team(base_url: &str, name: &str, members: &[(&str, bool)]) -> Value {
        let members: Vec<Value> = members
            .iter()
            .map(|(id, active)| json!({"user_id": id, "username": format!("name {id}"), "is_active": active}))
            .collect();

        let resp = Client::new()
            .post(format!("{base_url}/api/team/add"))
            .headers(admin_headers())
            .body(json!({"team_name": name, "members": members}).to_string())
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::CREATED);

        resp.json().await.unwrap()
    }

    #[macro_export]
    macro_rules! assert_response_status_eq {
        ($resp:expr,$status:expr) => {{
            assert_eq!(
                $resp.status(),
                $status,
                "{}",
                $resp.text().await.unwrap().as_str()
            )
        }};
    }

    #[macro_export]
    macro_rules! assert_response_json_eq {
        ($resp:expr, $body:expr) => {{
            assert_eq!(
                $resp.json::<serde_json::Value>().await.unwrap(),
                $body
            )
        }};
    }

    #[macro_export]
    macro_rules! assert_error_code_eq {
        ($resp:expr, $status:expr, $code:expr) => {{
            assert_eq!($resp.status(), $status);
            let body = $resp.json::<serde_json::Value>().await.unwrap();
            assert_eq!(body["error"]["code"], $code, "{}", body);
        }};
    }
}
