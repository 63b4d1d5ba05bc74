use async_trait::async_trait;

use crate::core::moviebox::{DownloadableFilesDetail, SearchItem, SearchResults};
use crate::utils::Error;

/// The two lookups a language report needs from a movie catalog.
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    async fn search_movies(&self, title: &str) -> Result<SearchResults, Error>;

    async fn downloadable_files(&self, item: &SearchItem) -> Result<DownloadableFilesDetail, Error>;
}
