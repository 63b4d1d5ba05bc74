use std::io::Write;

use crate::core::catalog::CatalogProvider;
use crate::core::language;
use crate::core::moviebox::{CaptionVariant, DownloadVariant, SearchItem, SearchResults};
use crate::utils::Error;

const HEAVY_RULE: &str = "================================================================================";
const LIGHT_RULE: &str = "────────────────────────────────────────────────────────────────────────────────";

/// Run the language check and report any failure instead of propagating it.
/// Whatever was written before the failure stays in `out`.
pub async fn run_language_check<P, W>(provider: &P, title: &str, year: Option<i32>, out: &mut W)
where
    P: CatalogProvider + ?Sized,
    W: Write + Send,
{
    let Err(e) = check_movie_languages(provider, title, year, out).await else {
        return;
    };
    report_failure(out, title, &e);
}

/// Report a failure that happened before any lookup could start, such as the
/// catalog client failing to build. The banner is still written first.
pub fn report_setup_failure<W: Write>(out: &mut W, title: &str, year: Option<i32>, e: &Error) {
    if let Err(write_err) = write_banner(out, title, normalize_year(year)) {
        tracing::error!("Failed to write report banner: {write_err}");
    }
    report_failure(out, title, e);
}

fn report_failure<W: Write>(out: &mut W, title: &str, e: &Error) {
    tracing::error!("Language check for '{}' failed: {e:?}", title);
    if let Err(write_err) = write_error(out, e) {
        tracing::error!("Failed to write error report: {write_err}");
    }
}

fn write_error<W: Write>(out: &mut W, e: &Error) -> std::io::Result<()> {
    writeln!(out, "\n❌ Error: {e}")?;
    let mut source = std::error::Error::source(e);
    if source.is_some() {
        writeln!(out, "\nCaused by:")?;
    }
    let mut depth = 0;
    while let Some(cause) = source {
        writeln!(out, "    {depth}: {cause}")?;
        depth += 1;
        source = cause.source();
    }
    Ok(())
}

pub async fn check_movie_languages<P, W>(
    provider: &P,
    title: &str,
    year: Option<i32>,
    out: &mut W,
) -> Result<(), Error>
where
    P: CatalogProvider + ?Sized,
    W: Write + Send,
{
    let year = normalize_year(year);
    write_banner(out, title, year)?;

    writeln!(out, "🔍 Searching for '{title}'...")?;
    let results = provider.search_movies(title).await?;

    if results.items.is_empty() {
        writeln!(out, "❌ No results found for '{title}'")?;
        return Ok(());
    }
    writeln!(out, "✅ Found {} result(s)\n", results.items.len())?;

    let (target, year_matched) = select_target(&results, year);
    let Some(target) = target else {
        return Ok(());
    };
    if let (Some(y), false) = (year, year_matched) {
        writeln!(out, "⚠️  No movie found for year {y}, using first result instead")?;
    }
    tracing::info!(
        "Selected '{}' (subjectId={}, has_resource={}) for query '{}'",
        target.title,
        target.subject_id,
        target.has_resource,
        title
    );

    write_movie_info(out, target)?;

    writeln!(out, "⏳ Fetching downloadable files information...")?;
    let details = provider.downloadable_files(target).await?;

    write_video_qualities(out, &details.downloads)?;
    write_subtitles(out, &details.captions)?;
    write_audio_note(out)?;

    let has_french_subs = language::has_french_subtitles(&details.captions);
    writeln!(out, "{HEAVY_RULE}")?;
    writeln!(out, "📋 SUMMARY:")?;
    writeln!(out, "{HEAVY_RULE}")?;
    writeln!(
        out,
        "✅ French Subtitles: {}",
        if has_french_subs { "YES" } else { "NO" }
    )?;
    writeln!(out, "❌ French Audio Selection: NO (not supported by API)")?;
    writeln!(out, "{HEAVY_RULE}\n")?;

    Ok(())
}

/// A year of 0 means no year filter.
fn normalize_year(year: Option<i32>) -> Option<i32> {
    year.filter(|y| *y != 0)
}

fn write_banner<W: Write>(out: &mut W, title: &str, year: Option<i32>) -> std::io::Result<()> {
    writeln!(out, "\n{HEAVY_RULE}")?;
    writeln!(out, "Checking language support for: {title}")?;
    if let Some(y) = year {
        writeln!(out, "Year filter: {y}")?;
    }
    writeln!(out, "{HEAVY_RULE}\n")?;
    Ok(())
}

/// Pick the first item released in `year`, else the first item.
/// The flag is true when the year filter was satisfied (or no year was asked for).
pub fn select_target(results: &SearchResults, year: Option<i32>) -> (Option<&SearchItem>, bool) {
    let Some(y) = year else {
        return (results.first_item(), true);
    };
    match results.items.iter().find(|item| item.release_year() == Some(y)) {
        Some(item) => (Some(item), true),
        None => (results.first_item(), false),
    }
}

fn write_movie_info<W: Write>(out: &mut W, movie: &SearchItem) -> Result<(), Error> {
    writeln!(out, "📽️  Movie: {}", movie.title)?;
    writeln!(out, "📅 Release Date: {}", movie.release_date)?;
    writeln!(out, "⭐ IMDB Rating: {:?}", movie.imdb_rating_value)?;
    writeln!(out, "🎭 Genre: {}", movie.genre.join(", "))?;
    writeln!(out, "🌍 Country: {}", movie.country_name)?;
    writeln!(out)?;
    Ok(())
}

fn write_section_header<W: Write>(out: &mut W, heading: &str) -> Result<(), Error> {
    writeln!(out, "{LIGHT_RULE}")?;
    writeln!(out, "{heading}")?;
    writeln!(out, "{LIGHT_RULE}")?;
    Ok(())
}

fn write_video_qualities<W: Write>(out: &mut W, downloads: &[DownloadVariant]) -> Result<(), Error> {
    writeln!(out)?;
    write_section_header(out, "📺 AVAILABLE VIDEO QUALITY OPTIONS:")?;
    if downloads.is_empty() {
        writeln!(out, "❌ No video quality options available")?;
        return Ok(());
    }

    writeln!(out, "✅ {} quality option(s) available:\n", downloads.len())?;
    for (i, download) in downloads.iter().enumerate() {
        writeln!(out, "  {}. Resolution: {}p", i + 1, download.resolution)?;
        writeln!(out, "     Size: {:.2} MB", download.size_mb())?;
        writeln!(out, "     Format: {}", download.ext())?;
        writeln!(out)?;
    }
    Ok(())
}

fn write_subtitles<W: Write>(out: &mut W, captions: &[CaptionVariant]) -> Result<(), Error> {
    write_section_header(out, "💬 AVAILABLE SUBTITLE LANGUAGES:")?;
    if captions.is_empty() {
        writeln!(out, "❌ No subtitles available")?;
        return Ok(());
    }

    writeln!(out, "✅ {} subtitle language(s) available:\n", captions.len())?;
    for (i, caption) in captions.iter().enumerate() {
        let marker = if language::is_french_code(&caption.lan) {
            "🇫🇷"
        } else {
            "  "
        };
        writeln!(out, "{marker} {}. {} ({})", i + 1, caption.lan_name, caption.lan)?;
        writeln!(out, "     Size: {:.2} KB", caption.size_kb())?;
        writeln!(out, "     Format: {}", caption.ext())?;
        writeln!(out)?;
    }

    if language::has_french_subtitles(captions) {
        writeln!(out, "✅ French subtitles ARE available!")?;
    } else {
        writeln!(out, "❌ French subtitles NOT found in available options")?;
    }
    Ok(())
}

fn write_audio_note<W: Write>(out: &mut W) -> Result<(), Error> {
    writeln!(out)?;
    write_section_header(out, "🔊 AUDIO TRACK INFORMATION:")?;
    writeln!(out, "ℹ️  The moviebox API does NOT provide separate audio track options.")?;
    writeln!(out, "   Audio tracks are embedded in the video files themselves.")?;
    writeln!(out)?;
    writeln!(out, "🎵 What this means:")?;
    writeln!(out, "   • You CANNOT select VF (French audio) vs VO (original audio) through the API")?;
    writeln!(out, "   • The video file you download will have whatever audio track(s) were")?;
    writeln!(out, "     uploaded with it")?;
    writeln!(out, "   • Some video files MAY contain multiple audio tracks that can be")?;
    writeln!(out, "     selected in media players like VLC or MPV")?;
    writeln!(out)?;
    writeln!(out, "💡 To find French audio versions:")?;
    writeln!(out, "   • Try searching for '[Movie Title] VF' or '[Movie Title] French'")?;
    writeln!(out, "   • Check if the video file has multiple audio tracks after download")?;
    writeln!(out, "   • Use French subtitles as an alternative")?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use serde_json::json;

    use super::*;
    use crate::core::moviebox::DownloadableFilesDetail;

    struct FakeCatalog {
        items: Option<serde_json::Value>,
        detail: Option<serde_json::Value>,
        searches: AtomicUsize,
        detail_calls: AtomicUsize,
    }

    impl FakeCatalog {
        fn new(items: serde_json::Value, detail: Option<serde_json::Value>) -> Self {
            Self {
                items: Some(items),
                detail,
                searches: AtomicUsize::new(0),
                detail_calls: AtomicUsize::new(0),
            }
        }

        fn failing_search() -> Self {
            Self {
                items: None,
                ..Self::new(json!([]), None)
            }
        }
    }

    #[async_trait]
    impl CatalogProvider for FakeCatalog {
        async fn search_movies(&self, _title: &str) -> Result<SearchResults, Error> {
            self.searches.fetch_add(1, Ordering::SeqCst);
            let Some(items) = &self.items else {
                return Err(Error::Other("connection reset by peer".to_string()));
            };
            Ok(serde_json::from_value(json!({ "items": items.clone() }))?)
        }

        async fn downloadable_files(
            &self,
            item: &SearchItem,
        ) -> Result<DownloadableFilesDetail, Error> {
            self.detail_calls.fetch_add(1, Ordering::SeqCst);
            match &self.detail {
                Some(detail) => Ok(serde_json::from_value(detail.clone())?),
                None => Err(Error::ApiError {
                    code: 404,
                    message: format!("no resource for {}", item.subject_id),
                }),
            }
        }
    }

    fn movie(id: &str, release_date: &str) -> serde_json::Value {
        json!({
            "subjectId": id,
            "subjectType": 1,
            "title": format!("Movie {id}"),
            "releaseDate": release_date,
            "imdbRatingValue": "7.9",
            "genre": "Action,Adventure",
            "countryName": "United States",
            "detailPath": format!("movie-{id}")
        })
    }

    fn caption(lan: &str, name: &str) -> serde_json::Value {
        json!({"id": lan, "lan": lan, "lanName": name, "url": format!("https://cdn.example/{lan}.srt"), "size": "2048"})
    }

    async fn report(catalog: &FakeCatalog, title: &str, year: Option<i32>) -> String {
        let mut out = Vec::new();
        run_language_check(catalog, title, year, &mut out).await;
        String::from_utf8(out).unwrap()
    }

    #[tokio::test]
    async fn avatar_2009_with_french_captions() {
        let catalog = FakeCatalog::new(
            json!([movie("1", "2009-12-16")]),
            Some(json!({"downloads": [], "captions": [caption("fr", "French")]})),
        );

        let text = report(&catalog, "Avatar", Some(2009)).await;

        assert!(text.contains("Year filter: 2009"));
        assert!(text.contains("📽️  Movie: Movie 1"));
        assert!(text.contains("🎭 Genre: Action, Adventure"));
        assert!(text.contains("🇫🇷 1. French (fr)"));
        assert!(text.contains("     Size: 2.00 KB"));
        assert!(text.contains("     Format: srt"));
        assert!(text.contains("✅ French subtitles ARE available!"));
        assert!(text.contains("French Subtitles: YES"));
        assert!(!text.contains("No movie found for year"));
    }

    #[tokio::test]
    async fn no_results_skips_detail_fetch() {
        let catalog = FakeCatalog::new(json!([]), Some(json!({})));

        let text = report(&catalog, "Nothing", None).await;

        assert!(text.contains("❌ No results found for 'Nothing'"));
        assert!(!text.contains("SUMMARY"));
        assert_eq!(catalog.searches.load(Ordering::SeqCst), 1);
        assert_eq!(catalog.detail_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn year_matches_later_item() {
        let catalog = FakeCatalog::new(
            json!([movie("1", "2022-12-14"), movie("2", "2009-12-16")]),
            Some(json!({})),
        );

        let text = report(&catalog, "Avatar", Some(2009)).await;

        assert!(text.contains("📽️  Movie: Movie 2"));
        assert!(!text.contains("No movie found for year"));
    }

    #[tokio::test]
    async fn unmatched_year_falls_back_to_first_with_warning() {
        let catalog = FakeCatalog::new(
            json!([movie("1", "2022-12-14"), movie("2", "2009-12-16")]),
            Some(json!({})),
        );

        let text = report(&catalog, "Avatar", Some(1999)).await;

        assert!(text.contains("⚠️  No movie found for year 1999, using first result instead"));
        assert!(text.contains("📽️  Movie: Movie 1"));
    }

    #[tokio::test]
    async fn empty_lists_report_absence() {
        let catalog = FakeCatalog::new(json!([movie("1", "2009-12-16")]), Some(json!({})));

        let text = report(&catalog, "Avatar", None).await;

        assert!(text.contains("❌ No video quality options available"));
        assert!(text.contains("❌ No subtitles available"));
        assert!(text.contains("French Subtitles: NO"));
        assert!(text.contains("French Audio Selection: NO (not supported by API)"));
    }

    #[tokio::test]
    async fn lists_qualities_and_non_french_captions() {
        let catalog = FakeCatalog::new(
            json!([movie("1", "2009-12-16")]),
            Some(json!({
                "downloads": [
                    {"id": "d1", "url": "https://cdn.example/v/a.mp4", "resolution": 1080, "size": "1572864"},
                    {"id": "d2", "url": "https://cdn.example/v/a.mkv", "resolution": 720, "size": 524288}
                ],
                "captions": [caption("en", "English"), caption("es", "Español")]
            })),
        );

        let text = report(&catalog, "Avatar", None).await;

        assert!(text.contains("✅ 2 quality option(s) available:"));
        assert!(text.contains("  1. Resolution: 1080p\n     Size: 1.50 MB\n     Format: mp4"));
        assert!(text.contains("  2. Resolution: 720p\n     Size: 0.50 MB\n     Format: mkv"));
        assert!(text.contains("   1. English (en)"));
        assert!(text.contains("❌ French subtitles NOT found in available options"));
        assert!(text.contains("French Subtitles: NO"));
    }

    #[tokio::test]
    async fn uppercase_three_letter_code_counts_as_french() {
        let catalog = FakeCatalog::new(
            json!([movie("1", "2009-12-16")]),
            Some(json!({"captions": [caption("en", "English"), caption("FRA", "Français")]})),
        );

        let text = report(&catalog, "Avatar", None).await;

        assert!(text.contains("🇫🇷 2. Français (FRA)"));
        assert!(text.contains("French Subtitles: YES"));
    }

    #[tokio::test]
    async fn detail_failure_is_reported_not_propagated() {
        let catalog = FakeCatalog::new(json!([movie("7", "2009-12-16")]), None);

        let text = report(&catalog, "Avatar", None).await;

        assert!(text.contains("📽️  Movie: Movie 7"));
        assert!(text.contains("❌ Error: MovieBox API returned code 404: no resource for 7"));
        assert!(!text.contains("SUMMARY"));
        assert_eq!(catalog.detail_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn search_failure_is_reported_after_banner() {
        let catalog = FakeCatalog::failing_search();

        let text = report(&catalog, "Avatar", Some(2009)).await;

        let banner = text.find("Checking language support for: Avatar").unwrap();
        let error = text.find("❌ Error: Other error: connection reset by peer").unwrap();
        assert!(banner < error);
        assert!(!text.contains("Found"));
        assert!(!text.contains("Caused by:"));
        assert_eq!(catalog.searches.load(Ordering::SeqCst), 1);
        assert_eq!(catalog.detail_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn malformed_detail_prints_cause_chain() {
        let catalog = FakeCatalog::new(
            json!([movie("1", "2009-12-16")]),
            Some(json!({"downloads": "not-a-list"})),
        );

        let text = report(&catalog, "Avatar", None).await;

        assert!(text.contains("❌ Error: JSON decoding failed: "));
        assert!(text.contains("\nCaused by:\n    0: invalid type"));
        assert!(!text.contains("SUMMARY"));
    }

    #[test]
    fn client_setup_failure_is_written_to_report() {
        let config = crate::config::MovieboxConfig {
            user_agent: "bad\nagent".to_string(),
            ..Default::default()
        };
        let err = crate::core::moviebox::MovieboxClient::new(&config).unwrap_err();

        let mut out = Vec::new();
        report_setup_failure(&mut out, "Avatar", Some(2009), &err);
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Checking language support for: Avatar"));
        assert!(text.contains("Year filter: 2009"));
        assert!(text.contains("❌ Error: Other error: Invalid header value"));
    }

    #[tokio::test]
    async fn whole_number_rating_keeps_decimal() {
        let mut item = movie("1", "2009-12-16");
        item["imdbRatingValue"] = json!(8.0);
        let catalog = FakeCatalog::new(json!([item]), Some(json!({})));

        let text = report(&catalog, "Avatar", None).await;

        assert!(text.contains("⭐ IMDB Rating: 8.0\n"));
    }

    #[tokio::test]
    async fn year_zero_means_no_filter() {
        let catalog = FakeCatalog::new(
            json!([movie("1", "2022-12-14"), movie("2", "2009-12-16")]),
            Some(json!({})),
        );

        let text = report(&catalog, "Avatar", Some(0)).await;

        assert!(!text.contains("Year filter"));
        assert!(!text.contains("No movie found for year"));
        assert!(text.contains("📽️  Movie: Movie 1"));
    }

    #[test]
    fn select_without_year_takes_first() {
        let results: SearchResults = serde_json::from_value(
            json!({"items": [movie("1", "2022-01-01"), movie("2", "2009-01-01")]}),
        )
        .unwrap();

        let (target, matched) = select_target(&results, None);
        assert_eq!(target.map(|i| i.subject_id.as_str()), Some("1"));
        assert!(matched);

        let results = SearchResults::default();
        let (target, matched) = select_target(&results, Some(2009));
        assert!(target.is_none());
        assert!(!matched);
    }
}
