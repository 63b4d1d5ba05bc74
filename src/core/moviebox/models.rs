use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Response envelope shared by every `wefeed-h5-bff` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    pub code: i64,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
}

/// Content-type filter used by the search endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubjectType {
    All,
    Movies,
    TvSeries,
    Music,
    Unknown(i64),
}

impl SubjectType {
    pub fn code(self) -> i64 {
        match self {
            SubjectType::All => 0,
            SubjectType::Movies => 1,
            SubjectType::TvSeries => 2,
            SubjectType::Music => 6,
            SubjectType::Unknown(code) => code,
        }
    }
}

impl From<i64> for SubjectType {
    fn from(code: i64) -> Self {
        match code {
            0 => SubjectType::All,
            1 => SubjectType::Movies,
            2 => SubjectType::TvSeries,
            6 => SubjectType::Music,
            other => SubjectType::Unknown(other),
        }
    }
}

impl Serialize for SubjectType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.code())
    }
}

impl<'de> Deserialize<'de> for SubjectType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(SubjectType::from(i64::deserialize(deserializer)?))
    }
}

// ================================================================================================
// Search
// ================================================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest<'a> {
    pub keyword: &'a str,
    pub page: u32,
    pub per_page: u32,
    pub subject_type: SubjectType,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    #[serde(default)]
    pub pager: Pager,
    #[serde(default)]
    pub items: Vec<SearchItem>,
}

impl SearchResults {
    pub fn first_item(&self) -> Option<&SearchItem> {
        self.items.first()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(unused)]
pub struct Pager {
    #[serde(default)]
    pub has_more: bool,
    #[serde(default, deserialize_with = "de::u64_lenient")]
    pub page: u64,
    #[serde(default, deserialize_with = "de::u64_lenient")]
    pub per_page: u64,
    #[serde(default, deserialize_with = "de::u64_lenient")]
    pub total_count: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(unused)]
pub struct SearchItem {
    pub subject_id: String,
    #[serde(default = "default_subject_type")]
    pub subject_type: SubjectType,
    pub title: String,
    /// `YYYY-MM-DD`, as sent by the API.
    #[serde(default)]
    pub release_date: String,
    #[serde(default, deserialize_with = "de::f64_lenient")]
    pub imdb_rating_value: f64,
    #[serde(default, deserialize_with = "de::comma_list")]
    pub genre: Vec<String>,
    #[serde(default)]
    pub country_name: String,
    #[serde(default)]
    pub detail_path: String,
    #[serde(default)]
    pub has_resource: bool,
}

fn default_subject_type() -> SubjectType {
    SubjectType::Movies
}

impl SearchItem {
    pub fn release_year(&self) -> Option<i32> {
        self.release_date
            .trim()
            .split('-')
            .next()
            .filter(|y| !y.is_empty())
            .and_then(|y| y.parse().ok())
    }
}

// ================================================================================================
// Downloadable files
// ================================================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadableFilesDetail {
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub downloads: Vec<DownloadVariant>,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub captions: Vec<CaptionVariant>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(unused)]
pub struct DownloadVariant {
    #[serde(default)]
    pub id: String,
    pub url: String,
    #[serde(default, deserialize_with = "de::u64_lenient")]
    pub resolution: u64,
    #[serde(default, deserialize_with = "de::u64_lenient")]
    pub size: u64,
}

impl DownloadVariant {
    pub fn ext(&self) -> String {
        extension_from_url(&self.url)
    }

    pub fn size_mb(&self) -> f64 {
        self.size as f64 / (1024.0 * 1024.0)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(unused)]
pub struct CaptionVariant {
    #[serde(default)]
    pub id: String,
    pub lan: String,
    #[serde(default)]
    pub lan_name: String,
    pub url: String,
    #[serde(default, deserialize_with = "de::u64_lenient")]
    pub size: u64,
    #[serde(default, deserialize_with = "de::f64_lenient")]
    pub delay: f64,
}

impl CaptionVariant {
    pub fn ext(&self) -> String {
        extension_from_url(&self.url)
    }

    pub fn size_kb(&self) -> f64 {
        self.size as f64 / 1024.0
    }
}

/// File extension of the URL's last path segment, without the dot.
/// Returns an empty string when there is none.
pub fn extension_from_url(url: &str) -> String {
    let path = match reqwest::Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => url.split(['?', '#']).next().unwrap_or_default().to_string(),
    };
    let segment = path.rsplit('/').next().unwrap_or_default();
    match segment.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => ext.to_ascii_lowercase(),
        _ => String::new(),
    }
}

mod de {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    fn value_to_f64(value: &Value) -> Option<f64> {
        match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Numbers the API sends either as JSON numbers or numeric strings ("" and null read as 0).
    pub fn f64_lenient<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        let value = Value::deserialize(deserializer)?;
        match value {
            Value::Null => Ok(0.0),
            Value::String(ref s) if s.trim().is_empty() => Ok(0.0),
            ref v => value_to_f64(v)
                .ok_or_else(|| serde::de::Error::custom(format!("expected a number, got {v}"))),
        }
    }

    pub fn u64_lenient<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        let value = Value::deserialize(deserializer)?;
        match value {
            Value::Null => Ok(0),
            Value::Number(ref n) => n
                .as_u64()
                .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
                .ok_or_else(|| serde::de::Error::custom(format!("expected an integer, got {n}"))),
            Value::String(ref s) if s.trim().is_empty() => Ok(0),
            Value::String(ref s) => s
                .trim()
                .parse()
                .map_err(|_| serde::de::Error::custom(format!("expected an integer, got {s:?}"))),
            v => Err(serde::de::Error::custom(format!("expected an integer, got {v}"))),
        }
    }

    /// "Action,Adventure,Fantasy" -> ["Action", "Adventure", "Fantasy"]; arrays pass through.
    pub fn comma_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
        let value = Value::deserialize(deserializer)?;
        match value {
            Value::Null => Ok(Vec::new()),
            Value::String(s) => Ok(s
                .split(',')
                .map(str::trim)
                .filter(|g| !g.is_empty())
                .map(String::from)
                .collect()),
            Value::Array(items) => Ok(items
                .into_iter()
                .filter_map(|v| v.as_str().map(String::from))
                .collect()),
            v => Err(serde::de::Error::custom(format!("expected a genre list, got {v}"))),
        }
    }

    pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de> + Default,
    {
        Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
    }
}
