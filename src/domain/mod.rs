/// Domain models for the application
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Media kind reported by the APOD service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaType {
    Image,
    Video,
    Other(String),
}

impl MediaType {
    pub fn as_str(&self) -> &str {
        match self {
            MediaType::Image => "image",
            MediaType::Video => "video",
            MediaType::Other(s) => s,
        }
    }
}

impl From<String> for MediaType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "image" => MediaType::Image,
            "video" => MediaType::Video,
            _ => MediaType::Other(s),
        }
    }
}

impl Serialize for MediaType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for MediaType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(MediaType::from)
    }
}

fn missing_media_type() -> MediaType {
    MediaType::Other(String::new())
}

/// Astronomy Picture of the Day record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApodRecord {
    #[serde(default)]
    pub date: String,
    #[serde(default = "missing_media_type")]
    pub media_type: MediaType,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub explanation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copyright: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hdurl: Option<String>,
}

impl ApodRecord {
    /// Primary media location, `None` when absent or blank
    pub fn media_url(&self) -> Option<&str> {
        self.url.as_deref().filter(|u| !u.trim().is_empty())
    }

    pub fn thumbnail(&self) -> Option<&str> {
        self.thumbnail_url
            .as_deref()
            .filter(|u| !u.trim().is_empty())
    }

    /// Whether the record may be surfaced to the view
    pub fn is_displayable(&self) -> bool {
        matches!(self.media_type, MediaType::Image | MediaType::Video) && self.media_url().is_some()
    }
}

/// Outcome of one successful fetch chain
#[derive(Debug, Clone)]
pub struct Selection {
    pub record: ApodRecord,
    pub is_fallback: bool,
    pub attempts: u32,
}

/// Selection state owned by the view
#[derive(Debug, Clone, Default, Serialize)]
pub struct SelectionState {
    pub current_record: Option<ApodRecord>,
    pub is_random_fallback: bool,
    pub is_loading: bool,
    pub generation: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

/// What the presenter draws for a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaView {
    Image { src: String, alt: String },
    Thumbnail { src: String },
    Player { src: String },
    Unavailable,
}

impl MediaView {
    pub fn from_record(record: &ApodRecord) -> Self {
        match (&record.media_type, record.media_url()) {
            (MediaType::Image, Some(url)) => MediaView::Image {
                src: url.to_string(),
                alt: record.title.clone(),
            },
            (MediaType::Video, Some(url)) => match record.thumbnail() {
                Some(thumb) => MediaView::Thumbnail {
                    src: thumb.to_string(),
                },
                None => MediaView::Player {
                    src: url.to_string(),
                },
            },
            _ => MediaView::Unavailable,
        }
    }
}

/// Health check response
#[derive(Serialize)]
pub struct Health {
    pub status: &'static str,
    pub now: DateTime<Utc>,
}
