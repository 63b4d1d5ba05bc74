pub mod models;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, REFERER, USER_AGENT};
use serde::de::DeserializeOwned;
use tokio::sync::OnceCell;

use crate::config::MovieboxConfig;
use crate::core::catalog::CatalogProvider;
use crate::utils::Error;

pub use models::{
    CaptionVariant, DownloadVariant, DownloadableFilesDetail, SearchItem, SearchResults,
    SubjectType,
};

const API_PREFIX: &str = "/wefeed-h5-bff";

#[derive(Debug)]
pub struct MovieboxClient {
    host_url: String,
    per_page: u32,
    client: reqwest::Client,
    session: OnceCell<()>,
}

impl MovieboxClient {
    pub fn new(config: &MovieboxConfig) -> Result<Self, Error> {
        let host_url = config.host_url();

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
        headers.insert(USER_AGENT, header_value(&config.user_agent)?);
        headers.insert(REFERER, header_value(&format!("{host_url}/"))?);
        headers.insert(
            "X-Client-Info",
            header_value(&serde_json::json!({ "timezone": &config.timezone }).to_string())?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .cookie_store(true)
            .build()?;

        Ok(Self {
            host_url,
            per_page: config.per_page,
            client,
            session: OnceCell::new(),
        })
    }

    fn api_url(&self, path: &str) -> String {
        format!(
            "{}{}/{}",
            self.host_url,
            API_PREFIX,
            path.trim_start_matches('/')
        )
    }

    /// Referer the download endpoint expects: the item's page on the web frontend.
    fn item_page_url(&self, item: &SearchItem) -> String {
        format!(
            "{}/movies/{}?id={}",
            self.host_url, item.detail_path, item.subject_id
        )
    }

    /// The API only answers once the session cookies from this endpoint are set.
    async fn ensure_session(&self) -> Result<(), Error> {
        self.session
            .get_or_try_init(|| async {
                let url = self.api_url("app/get-latest-app-pkgs");
                tracing::debug!("Bootstrapping MovieBox session via {url}");
                let resp = self
                    .client
                    .get(url)
                    .query(&[("app_name", "moviebox")])
                    .send()
                    .await?;
                check_status(resp).await?;
                Ok::<(), Error>(())
            })
            .await?;
        Ok(())
    }

    async fn unwrap_envelope<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let resp = check_status(resp).await?;
        let body = resp.text().await?;
        let envelope: models::ApiEnvelope<T> = serde_json::from_str(&body)?;
        if envelope.code != 0 {
            return Err(Error::ApiError {
                code: envelope.code,
                message: envelope.message,
            });
        }
        envelope
            .data
            .ok_or_else(|| Error::Other("MovieBox API response has no data".to_string()))
    }

    pub async fn search(
        &self,
        query: &str,
        subject_type: SubjectType,
        page: u32,
    ) -> Result<SearchResults, Error> {
        self.ensure_session().await?;

        let payload = models::SearchRequest {
            keyword: query,
            page,
            per_page: self.per_page,
            subject_type,
        };
        let resp = self
            .client
            .post(self.api_url("web/subject/search"))
            .json(&payload)
            .send()
            .await?;

        let results: SearchResults = Self::unwrap_envelope(resp).await?;
        tracing::debug!(
            "Search '{}' page {}: {} item(s), total={} has_more={}",
            query,
            page,
            results.items.len(),
            results.pager.total_count,
            results.pager.has_more
        );
        Ok(results)
    }

    pub async fn downloadable_files(
        &self,
        item: &SearchItem,
    ) -> Result<DownloadableFilesDetail, Error> {
        self.ensure_session().await?;

        let resp = self
            .client
            .get(self.api_url("web/subject/download"))
            .header(REFERER, self.item_page_url(item))
            .query(&[
                ("subjectId", item.subject_id.as_str()),
                ("se", "0"),
                ("ep", "0"),
            ])
            .send()
            .await?;

        let detail: DownloadableFilesDetail = Self::unwrap_envelope(resp).await?;
        for caption in &detail.captions {
            tracing::debug!(
                "Caption {} ({}) delay={}",
                caption.lan,
                caption.id,
                caption.delay
            );
        }
        Ok(detail)
    }
}

#[async_trait]
impl CatalogProvider for MovieboxClient {
    async fn search_movies(&self, title: &str) -> Result<SearchResults, Error> {
        self.search(title, SubjectType::Movies, 1).await
    }

    async fn downloadable_files(&self, item: &SearchItem) -> Result<DownloadableFilesDetail, Error> {
        MovieboxClient::downloadable_files(self, item).await
    }
}

fn header_value(value: &str) -> Result<HeaderValue, Error> {
    HeaderValue::from_str(value).map_err(|e| Error::Other(format!("Invalid header value {value:?}: {e}")))
}

async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, Error> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(Error::HttpStatus { status, body });
    }
    Ok(resp)
}
