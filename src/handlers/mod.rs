/// HTTP request handlers
use crate::domain::{Health, MediaView, SelectionState};
use crate::errors::ApiError;
use crate::services::ViewController;
use crate::utils::{current_year, escape_html, parse_date};
use axum::{
    extract::{Query, State},
    response::{Html, Redirect},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub controller: Arc<ViewController>,
}

/// Successful response wrapper
#[derive(Serialize)]
pub struct SuccessResponse<T: Serialize> {
    pub ok: bool,
    #[serde(flatten)]
    pub data: T,
}

impl<T: Serialize> SuccessResponse<T> {
    pub fn new(data: T) -> Self {
        Self { ok: true, data }
    }
}

/// Generation of the chain a request started, comparable with `/api/state`
#[derive(Serialize)]
pub struct ChainStarted {
    pub generation: u64,
}

#[derive(Deserialize)]
pub struct SelectParams {
    pub date: Option<String>,
}

/// Health check handler
pub async fn health() -> Json<Health> {
    Json(Health {
        status: "ok",
        now: Utc::now(),
    })
}

/// Render the viewer page
pub async fn index(State(state): State<AppState>) -> Html<String> {
    let snapshot = state.controller.snapshot().await;
    Html(render_page(&snapshot))
}

/// "Randomize from Archive" form action
pub async fn randomize(State(state): State<AppState>) -> Redirect {
    state.controller.spawn_randomize().await;
    Redirect::to("/")
}

/// JSON view of the selection state
pub async fn get_state(State(state): State<AppState>) -> Json<SuccessResponse<SelectionState>> {
    Json(SuccessResponse::new(state.controller.snapshot().await))
}

/// Start a randomize chain
pub async fn randomize_api(State(state): State<AppState>) -> Json<SuccessResponse<ChainStarted>> {
    let generation = state.controller.spawn_randomize().await;
    Json(SuccessResponse::new(ChainStarted { generation }))
}

/// Start a chain for an explicit archive date
pub async fn select_date(
    Query(params): Query<SelectParams>,
    State(state): State<AppState>,
) -> Result<Json<SuccessResponse<ChainStarted>>, ApiError> {
    let raw = params
        .date
        .ok_or_else(|| ApiError::InvalidInput("missing date".to_string()))?;
    let date = parse_date(&raw)
        .ok_or_else(|| ApiError::InvalidInput(format!("'{}' is not a YYYY-MM-DD date", raw)))?;
    let generation = state.controller.spawn_select_date(date).await?;

    Ok(Json(SuccessResponse::new(ChainStarted { generation })))
}

const FALLBACK_NOTICE: &str =
    "Couldn't get today's matching image/video.<br/>Enjoy this random one from the archive!";

/// Render the whole page for a state snapshot
pub fn render_page(state: &SelectionState) -> String {
    let body = match (&state.current_record, state.is_loading) {
        (Some(record), false) => {
            let mut card = format!("<h1>{}</h1>\n", escape_html(&record.title));
            if state.is_random_fallback {
                card.push_str(&format!("<p class=\"notice\">{}</p>\n", FALLBACK_NOTICE));
            }
            card.push_str(&render_media(&MediaView::from_record(record)));
            card.push_str(&format!(
                "\n<p class=\"explanation\">{}</p>\n",
                escape_html(&record.explanation)
            ));
            let mut meta = escape_html(&record.date);
            if let Some(copyright) = &record.copyright {
                meta.push_str(&format!(" &middot; &copy; {}", escape_html(copyright.trim())));
            }
            card.push_str(&format!("<p class=\"meta\">{}</p>\n", meta));
            card.push_str(
                "<form method=\"post\" action=\"/randomize\">\
                 <button class=\"future-btn\" type=\"submit\">Randomize from Archive</button>\
                 </form>\n",
            );
            card
        }
        _ => "<p class=\"loading\">Loading space wonders...</p>\n".to_string(),
    };

    let refresh = if state.is_loading {
        "<meta http-equiv=\"refresh\" content=\"2\">\n"
    } else {
        ""
    };

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n{refresh}\
         <title>NASA Space Viewer</title>\n</head>\n<body>\n\
         <header><h2>NASA Space Viewer</h2><p class=\"subtitle\">Explore the cosmos, one day at a time</p></header>\n\
         <main class=\"future-card\">\n{body}</main>\n\
         <footer>Made with Rust &amp; NASA API &middot; {year}</footer>\n</body>\n</html>\n",
        refresh = refresh,
        body = body,
        year = current_year(),
    )
}

/// Four-way media dispatch
pub fn render_media(view: &MediaView) -> String {
    match view {
        MediaView::Image { src, alt } => format!(
            "<img class=\"apod-media\" src=\"{}\" alt=\"{}\">",
            escape_html(src),
            escape_html(alt)
        ),
        MediaView::Thumbnail { src } => format!(
            "<img class=\"apod-media\" src=\"{}\" alt=\"Video thumbnail\">",
            escape_html(src)
        ),
        MediaView::Player { src } => format!(
            "<iframe class=\"apod-media\" title=\"nasa-video\" src=\"{}\" width=\"80%\" height=\"500px\" \
             allow=\"autoplay; encrypted-media\"></iframe>",
            escape_html(src)
        ),
        MediaView::Unavailable => {
            "<p class=\"no-media\">No image, animation, or video available.</p>".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{image, record};

    fn shown(record: crate::domain::ApodRecord, fallback: bool) -> SelectionState {
        SelectionState {
            current_record: Some(record),
            is_random_fallback: fallback,
            ..Default::default()
        }
    }

    #[test]
    fn test_page_without_record_shows_loading() {
        let page = render_page(&SelectionState::default());
        assert!(page.contains("Loading space wonders..."));
        assert!(!page.contains("http-equiv=\"refresh\""));
    }

    #[test]
    fn test_loading_page_refreshes() {
        let mut state = shown(image("https://x/img.jpg"), false);
        state.is_loading = true;
        let page = render_page(&state);
        assert!(page.contains("Loading space wonders..."));
        assert!(page.contains("http-equiv=\"refresh\""));
        assert!(!page.contains("<h1>"));
    }

    #[test]
    fn test_page_with_image() {
        let page = render_page(&shown(image("https://x/img.jpg"), false));
        assert!(page.contains("<h1>T</h1>"));
        assert!(page.contains("src=\"https://x/img.jpg\""));
        assert!(page.contains("Randomize from Archive"));
        assert!(!page.contains("Enjoy this random one"));
    }

    #[test]
    fn test_fallback_notice() {
        let page = render_page(&shown(image("https://x/img.jpg"), true));
        assert!(page.contains("Enjoy this random one from the archive!"));
    }

    #[test]
    fn test_video_thumbnail_rendered_as_image() {
        let r = record(serde_json::json!({
            "media_type": "video", "url": "https://x/v", "thumbnail_url": "https://x/t.jpg"
        }));
        let page = render_page(&shown(r, false));
        assert!(page.contains("src=\"https://x/t.jpg\""));
        assert!(!page.contains("<iframe"));
    }

    #[test]
    fn test_video_without_thumbnail_rendered_as_player() {
        let r = record(serde_json::json!({"media_type": "video", "url": "https://x/v"}));
        let page = render_page(&shown(r, false));
        assert!(page.contains("<iframe"));
        assert!(page.contains("src=\"https://x/v\""));
    }

    #[test]
    fn test_record_text_is_escaped() {
        let r = record(serde_json::json!({
            "media_type": "image",
            "url": "https://x/a.jpg",
            "title": "<script>alert(1)</script>",
            "explanation": "a & b",
            "copyright": "\nJane \"J\" Doe\n"
        }));
        let page = render_page(&shown(r, false));
        assert!(!page.contains("<script>"));
        assert!(page.contains("&lt;script&gt;"));
        assert!(page.contains("a &amp; b"));
        assert!(page.contains("Jane &quot;J&quot; Doe"));
    }

    #[test]
    fn test_unavailable_media_placeholder() {
        assert!(render_media(&MediaView::Unavailable).contains("No image, animation, or video"));
    }
}
