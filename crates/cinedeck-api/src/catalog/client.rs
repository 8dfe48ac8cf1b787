use std::time::Duration;

use reqwest::{Client, StatusCode};

use cinedeck_core::models::Movie;

use super::error::FetchError;
use super::types::{parse_collection, parse_single};
use crate::traits::CatalogBackend;

pub const DEFAULT_BASE_URL: &str = "https://freetestapi.com/api/v1/movies";

/// Client for the public movie catalog. The backend has no paging or search
/// of its own; see `cinedeck_core::catalog`.
pub struct CatalogClient {
    base_url: String,
    http: Client,
}

impl CatalogClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            http: Client::new(),
        }
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            ..Self::new(base_url)
        })
    }

    async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, FetchError> {
        if resp.status().is_success() {
            Ok(resp)
        } else {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            Err(FetchError::Api {
                status,
                message: body,
            })
        }
    }
}

impl CatalogBackend for CatalogClient {
    async fn fetch_all(&self) -> Result<Vec<Movie>, FetchError> {
        let resp = self.http.get(&self.base_url).send().await?;
        let resp = Self::check_response(resp).await?;
        let body = resp.text().await?;
        let movies = parse_collection(&body)?;
        tracing::debug!(count = movies.len(), "Fetched catalog");
        Ok(movies)
    }

    async fn fetch_by_id(&self, id: u64) -> Result<Movie, FetchError> {
        let resp = self
            .http
            .get(format!("{}/{id}", self.base_url))
            .send()
            .await?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(id));
        }
        let resp = Self::check_response(resp).await?;
        let body = resp.text().await?;
        parse_single(id, &body)
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn record(id: u64, title: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "title": title,
            "year": 2010,
            "director": "Christopher Nolan",
            "genre": ["Sci-Fi"],
            "plot": "A thief who steals corporate secrets.",
            "rating": 8.8,
            "poster": format!("https://example.com/{id}.jpg"),
        })
    }

    #[tokio::test]
    async fn test_fetch_all() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/movies"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([record(1, "Alpha"), record(2, "Beta")])),
            )
            .mount(&server)
            .await;

        let client = CatalogClient::new(format!("{}/movies", server.uri()));
        let movies = client.fetch_all().await.unwrap();
        assert_eq!(movies.len(), 2);
        assert_eq!(movies[1].title, "Beta");
    }

    #[tokio::test]
    async fn test_fetch_all_minimal_records() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/movies"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"id": 1, "title": "Alpha"},
                {"id": 2, "title": "Beta"},
            ])))
            .mount(&server)
            .await;

        let movies = CatalogClient::new(format!("{}/movies", server.uri()))
            .fetch_all()
            .await
            .unwrap();
        let ids: Vec<u64> = movies.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_fetch_all_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/movies"))
            .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
            .mount(&server)
            .await;

        let err = CatalogClient::new(format!("{}/movies", server.uri()))
            .fetch_all()
            .await
            .unwrap_err();
        assert!(err.is_transport());
        assert!(matches!(err, FetchError::Api { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_fetch_by_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/movies/7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(record(7, "Inception")))
            .mount(&server)
            .await;

        let client = CatalogClient::new(format!("{}/movies/", server.uri()));
        let movie = client.fetch_by_id(7).await.unwrap();
        assert_eq!(movie.id, 7);
        assert_eq!(movie.title, "Inception");
    }

    #[tokio::test]
    async fn test_fetch_by_id_404_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/movies/999"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = CatalogClient::new(format!("{}/movies", server.uri()))
            .fetch_by_id(999)
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::NotFound(999)));
    }

    #[tokio::test]
    async fn test_fetch_by_id_empty_object_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/movies/5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let err = CatalogClient::new(format!("{}/movies", server.uri()))
            .fetch_by_id(5)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
