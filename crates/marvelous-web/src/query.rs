use anyhow::{Context, Result, anyhow};
use marvelous_schema::{
    Resource,
    model::{AuthResponse, ListPage, LoginRequest, SignupRequest},
};
use serde::{Serialize, de::DeserializeOwned};

use crate::{
    fetcher::{ListQuery, ListSource},
    utils::api_host,
};

/// Comics shown on a character page. The endpoint is not paginated beyond this.
pub const CHARACTER_COMICS_LIMIT: u32 = 10;

/// Client for the catalog and auth endpoints.
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    pub fn from_config() -> Self {
        Self::new(&api_host())
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn get_json<T>(&self, path: &str, params: &[(&str, String)]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = self.url(path);
        let res = self
            .http
            .get(&url)
            .query(params)
            .send()
            .await
            .with_context(|| format!("GET {}", url))?;

        let status = res.status();
        if !status.is_success() {
            return Err(anyhow!("GET {} responded {}", url, status));
        }

        res.json()
            .await
            .with_context(|| format!("malformed response from {}", url))
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        let res = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .with_context(|| format!("POST {}", url))?;

        let status = res.status();
        if !status.is_success() {
            let message = res.text().await.unwrap_or_default();
            return Err(anyhow!("POST {} responded {}: {}", url, status, message));
        }

        res.json()
            .await
            .with_context(|| format!("malformed response from {}", url))
    }

    pub async fn list(&self, resource: Resource, query: &ListQuery) -> Result<ListPage> {
        self.get_json(resource.path(), &query.params(resource))
            .await
    }

    pub async fn character_comics(&self, character_id: &str) -> Result<ListPage> {
        let path = format!("characters/{}/comics", character_id);
        self.get_json(
            &path,
            &[
                ("page", "1".to_string()),
                ("limit", CHARACTER_COMICS_LIMIT.to_string()),
            ],
        )
        .await
    }

    pub async fn signup(&self, email: &str, username: &str, password: &str) -> Result<AuthResponse> {
        let body = SignupRequest {
            email: email.to_string(),
            username: username.to_string(),
            password: password.to_string(),
        };
        self.post_json("user/signup", &body).await
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.post_json("user/login", &body).await
    }
}

impl ListSource for ApiClient {
    async fn fetch_list(&self, resource: Resource, query: &ListQuery) -> Result<ListPage> {
        self.list(resource, query).await
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use httpmock::MockServer;
    use serde_json::json;

    #[tokio::test]
    async fn list_characters_with_search() -> Result<()> {
        let server = MockServer::start();
        let mock = server
            .mock_async(|when, then| {
                when.method("GET")
                    .path("/characters")
                    .query_param("page", "2")
                    .query_param("pageSize", "100")
                    .query_param("name", "spider");
                then.status(200).json_body(json!({
                    "count": 101,
                    "results": [{
                        "_id": "5fcf91f4d8a2480017b91454",
                        "name": "Spider-Man",
                        "thumbnail": { "path": "http://x/spidey", "extension": "jpg" }
                    }]
                }));
            })
            .await;

        let client = ApiClient::new(&server.base_url());
        let query = ListQuery {
            page: 2,
            page_size: 100,
            search_term: " spider ".to_string(),
        };
        let page = client.list(Resource::Characters, &query).await?;

        mock.assert_async().await;
        assert_eq!(page.count, 101);
        assert_eq!(page.results[0].label(), "Spider-Man");
        Ok(())
    }

    #[tokio::test]
    async fn list_comics_without_term() -> Result<()> {
        let server = MockServer::start();
        let mock = server
            .mock_async(|when, then| {
                when.method("GET")
                    .path("/comics")
                    .query_param("page", "1")
                    .query_param("pageSize", "100");
                then.status(200).json_body(json!({ "count": "3" }));
            })
            .await;

        let client = ApiClient::new(&format!("{}/", server.base_url()));
        let page = client.list(Resource::Comics, &ListQuery::new(100)).await?;

        mock.assert_async().await;
        assert!(page.results.is_empty());
        assert_eq!(page.count, 3);
        Ok(())
    }

    #[tokio::test]
    async fn list_server_error() {
        let server = MockServer::start();
        let mock = server
            .mock_async(|when, then| {
                when.method("GET").path("/comics");
                then.status(500);
            })
            .await;

        let client = ApiClient::new(&server.base_url());
        assert!(client.list(Resource::Comics, &ListQuery::new(100)).await.is_err());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn list_malformed_body() {
        let server = MockServer::start();
        server
            .mock_async(|when, then| {
                when.method("GET").path("/characters");
                then.status(200).body("<html>gateway</html>");
            })
            .await;

        let client = ApiClient::new(&server.base_url());
        assert!(
            client
                .list(Resource::Characters, &ListQuery::new(100))
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn character_comics_limit() -> Result<()> {
        let server = MockServer::start();
        let mock = server
            .mock_async(|when, then| {
                when.method("GET")
                    .path("/characters/1011334/comics")
                    .query_param("page", "1")
                    .query_param("limit", "10");
                then.status(200).json_body(json!({
                    "results": [{ "_id": "1", "title": "Avengers (1963) #1" }]
                }));
            })
            .await;

        let client = ApiClient::new(&server.base_url());
        let page = client.character_comics("1011334").await?;

        mock.assert_async().await;
        assert_eq!(page.results.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn login_success() -> Result<()> {
        let server = MockServer::start();
        let mock = server
            .mock_async(|when, then| {
                when.method("POST")
                    .path("/user/login")
                    .json_body(json!({ "email": "peter@dailybugle.com", "password": "webs" }));
                then.status(200).json_body(json!({ "token": "jwt" }));
            })
            .await;

        let client = ApiClient::new(&server.base_url());
        let res = client.login("peter@dailybugle.com", "webs").await?;

        mock.assert_async().await;
        assert_eq!(res.token, "jwt");
        Ok(())
    }

    #[tokio::test]
    async fn signup_conflict() {
        let server = MockServer::start();
        let mock = server
            .mock_async(|when, then| {
                when.method("POST").path("/user/signup").json_body(json!({
                    "email": "peter@dailybugle.com",
                    "username": "peter",
                    "password": "webs"
                }));
                then.status(409).json_body(json!({ "message": "email already used" }));
            })
            .await;

        let client = ApiClient::new(&server.base_url());
        let err = client
            .signup("peter@dailybugle.com", "peter", "webs")
            .await
            .unwrap_err();

        mock.assert_async().await;
        assert!(err.to_string().contains("409"));
        assert!(err.to_string().contains("email already used"));
    }
}
