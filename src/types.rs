//! Type definitions for the episode-browser application.
//!
//! This module contains the core data structures for shows and episodes,
//! the raw wire shapes they are decoded from, and display helpers shared
//! by the terminal and plain-text renderers.

use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;

/// Catalog-assigned show identifier.
pub type ShowId = u32;

/// Nested image object in catalog payloads.
#[derive(Debug, Default, Deserialize)]
pub struct RawImage {
    #[serde(default)]
    pub medium: Option<String>,
    #[serde(default)]
    pub original: Option<String>,
}

/// Nested rating object in catalog payloads.
#[derive(Debug, Default, Deserialize)]
pub struct RawRating {
    #[serde(default)]
    pub average: Option<f64>,
}

/// Raw show data as returned from `GET /shows`.
///
/// Converted into [`Show`], which flattens the nested image and rating.
#[derive(Debug, Deserialize)]
pub struct RawShow {
    pub id: ShowId,
    pub name: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub rating: Option<RawRating>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub image: Option<RawImage>,
}

/// Raw episode data as returned from `GET /shows/{id}/episodes`.
#[derive(Debug, Deserialize)]
pub struct RawEpisode {
    #[serde(default)]
    pub season: Option<u32>,
    /// Specials come back with a null number.
    #[serde(default)]
    pub number: Option<u32>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub image: Option<RawImage>,
}

fn medium_image(image: Option<RawImage>) -> Option<String> {
    image.and_then(|img| img.medium.or(img.original))
}

/// A series from the catalog. Immutable once fetched.
#[derive(Clone, Debug, PartialEq)]
pub struct Show {
    /// Unique, stable identifier.
    pub id: ShowId,
    /// Display name.
    pub name: String,
    /// Summary, possibly containing HTML markup.
    pub summary: Option<String>,
    /// Genres in catalog order.
    pub genres: Vec<String>,
    /// Running status, e.g. "Ended".
    pub status: String,
    /// Average rating.
    pub rating: Option<f64>,
    /// Runtime in minutes.
    pub runtime: Option<u32>,
    /// Medium-size poster URL.
    pub image_url: Option<String>,
}

impl From<RawShow> for Show {
    fn from(raw: RawShow) -> Self {
        Show {
            id: raw.id,
            name: raw.name,
            summary: raw.summary,
            genres: raw.genres,
            status: raw.status.unwrap_or_default(),
            rating: raw.rating.and_then(|r| r.average),
            runtime: raw.runtime,
            image_url: medium_image(raw.image),
        }
    }
}

impl Show {
    /// Format the show for display in selection menus.
    pub fn to_display(&self) -> String {
        self.name.clone()
    }

    /// Genres joined with commas, or "N/A".
    ///
    /// # Examples
    ///
    /// ```
    /// use episode_browser::types::Show;
    ///
    /// let show = Show {
    ///     id: 82,
    ///     name: "Game of Thrones".to_string(),
    ///     summary: None,
    ///     genres: vec!["Drama".to_string(), "Fantasy".to_string()],
    ///     status: "Ended".to_string(),
    ///     rating: Some(8.9),
    ///     runtime: Some(60),
    ///     image_url: None,
    /// };
    /// assert_eq!(show.genres_display(), "Drama, Fantasy");
    /// assert_eq!(show.runtime_display(), "60 min");
    /// ```
    pub fn genres_display(&self) -> String {
        if self.genres.is_empty() {
            "N/A".to_string()
        } else {
            self.genres.join(", ")
        }
    }

    pub fn status_display(&self) -> &str {
        if self.status.trim().is_empty() {
            "N/A"
        } else {
            &self.status
        }
    }

    pub fn rating_display(&self) -> String {
        match self.rating {
            Some(r) => r.to_string(),
            None => "N/A".to_string(),
        }
    }

    pub fn runtime_display(&self) -> String {
        match self.runtime {
            Some(m) => format!("{} min", m),
            None => "N/A".to_string(),
        }
    }

    /// Summary with markup removed.
    pub fn summary_text(&self) -> String {
        strip_markup(self.summary.as_deref().unwrap_or(""))
    }
}

/// An episode of a show, identified within it by `(season, number)`.
#[derive(Clone, Debug, PartialEq)]
pub struct Episode {
    pub season: u32,
    pub number: u32,
    pub name: String,
    /// Summary, possibly containing HTML markup.
    pub summary: Option<String>,
    /// Medium-size still URL.
    pub image_url: Option<String>,
}

impl From<RawEpisode> for Episode {
    fn from(raw: RawEpisode) -> Self {
        Episode {
            season: raw.season.unwrap_or(0),
            number: raw.number.unwrap_or(0),
            name: raw.name.unwrap_or_default(),
            summary: raw.summary,
            image_url: medium_image(raw.image),
        }
    }
}

impl Episode {
    /// Season/episode code, zero-padded to two digits.
    ///
    /// # Examples
    ///
    /// ```
    /// use episode_browser::types::Episode;
    ///
    /// let ep = Episode {
    ///     season: 1,
    ///     number: 2,
    ///     name: "The Kingsroad".to_string(),
    ///     summary: None,
    ///     image_url: None,
    /// };
    /// assert_eq!(ep.code(), "S01E02");
    /// assert_eq!(ep.to_display(), "S01E02 - The Kingsroad");
    /// ```
    pub fn code(&self) -> String {
        format!("S{:02}E{:02}", self.season, self.number)
    }

    /// Format the episode for display in selection menus.
    pub fn to_display(&self) -> String {
        format!("{} - {}", self.code(), self.name)
    }

    /// Summary with markup removed.
    pub fn summary_text(&self) -> String {
        strip_markup(self.summary.as_deref().unwrap_or(""))
    }

    /// Whether name or summary contains `term`, ignoring case.
    pub fn matches(&self, term: &str) -> bool {
        if term.is_empty() {
            return true;
        }
        let term = term.to_lowercase();
        self.name.to_lowercase().contains(&term)
            || self
                .summary
                .as_deref()
                .map(|s| s.to_lowercase().contains(&term))
                .unwrap_or(false)
    }
}

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());
static SPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Turn an HTML summary into plain text for terminal output.
///
/// Tags are dropped, the handful of entities the catalog uses are decoded
/// and runs of whitespace collapse to a single space.
///
/// # Examples
///
/// ```
/// use episode_browser::types::strip_markup;
///
/// assert_eq!(strip_markup("<p>Winter is <b>coming</b>.</p>"), "Winter is coming.");
/// assert_eq!(strip_markup("Tom &amp; Jerry"), "Tom & Jerry");
/// ```
pub fn strip_markup(html: &str) -> String {
    let without_tags = TAG_RE.replace_all(html, " ");
    let decoded = without_tags
        .replace("&nbsp;", " ")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&");
    let collapsed = SPACE_RE.replace_all(&decoded, " ");
    collapsed
        .trim()
        .replace(" .", ".")
        .replace(" ,", ",")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn show_named(name: &str) -> Show {
        Show {
            id: 1,
            name: name.to_string(),
            summary: None,
            genres: Vec::new(),
            status: String::new(),
            rating: None,
            runtime: None,
            image_url: None,
        }
    }

    fn episode(season: u32, number: u32, name: &str, summary: Option<&str>) -> Episode {
        Episode {
            season,
            number,
            name: name.to_string(),
            summary: summary.map(str::to_string),
            image_url: None,
        }
    }

    #[test]
    fn test_raw_show_conversion() {
        let json = r#"{
            "id": 82,
            "name": "Game of Thrones",
            "summary": "<p>Based on the bestselling book series.</p>",
            "genres": ["Drama", "Adventure", "Fantasy"],
            "status": "Ended",
            "rating": {"average": 8.9},
            "runtime": 60,
            "image": {"medium": "https://static.tvmaze.com/m.jpg", "original": "https://static.tvmaze.com/o.jpg"},
            "language": "English"
        }"#;

        let raw: RawShow = serde_json::from_str(json).unwrap();
        let show = Show::from(raw);
        assert_eq!(show.id, 82);
        assert_eq!(show.genres.len(), 3);
        assert_eq!(show.rating, Some(8.9));
        assert_eq!(show.runtime, Some(60));
        assert_eq!(
            show.image_url.as_deref(),
            Some("https://static.tvmaze.com/m.jpg")
        );
        assert_eq!(show.summary_text(), "Based on the bestselling book series.");
    }

    #[test]
    fn test_raw_show_with_nulls() {
        let json = r#"{
            "id": 5,
            "name": "Obscure",
            "summary": null,
            "genres": [],
            "status": "Running",
            "rating": {"average": null},
            "runtime": null,
            "image": null
        }"#;

        let show = Show::from(serde_json::from_str::<RawShow>(json).unwrap());
        assert_eq!(show.rating_display(), "N/A");
        assert_eq!(show.runtime_display(), "N/A");
        assert_eq!(show.genres_display(), "N/A");
        assert_eq!(show.status_display(), "Running");
        assert!(show.image_url.is_none());
        assert_eq!(show.summary_text(), "");
    }

    #[test]
    fn test_raw_episode_special_has_null_number() {
        let json = r#"{"season": 2, "number": null, "name": "Behind the Scenes", "summary": null, "image": null}"#;
        let ep = Episode::from(serde_json::from_str::<RawEpisode>(json).unwrap());
        assert_eq!(ep.code(), "S02E00");
        assert!(ep.summary.is_none());
    }

    #[test]
    fn test_show_status_blank() {
        assert_eq!(show_named("x").status_display(), "N/A");
    }

    #[test]
    fn test_show_rating_whole_number() {
        let mut show = show_named("x");
        show.rating = Some(9.0);
        assert_eq!(show.rating_display(), "9");
    }

    #[test]
    fn test_episode_code_wide_numbers() {
        let ep = episode(12, 105, "Long Runner", None);
        assert_eq!(ep.code(), "S12E105");
    }

    #[test]
    fn test_episode_matches_name_and_summary() {
        let ep = episode(1, 1, "Pilot", Some("<p>A Start</p>"));
        assert!(ep.matches(""));
        assert!(ep.matches("pil"));
        assert!(ep.matches("start"));
        assert!(!ep.matches("finale"));
    }

    #[test]
    fn test_episode_matches_null_summary_as_empty() {
        let ep = episode(1, 2, "Second", None);
        assert!(ep.matches("sec"));
        assert!(!ep.matches("start"));
    }

    #[test]
    fn test_episode_matches_any_case_term() {
        let ep = episode(1, 1, "Pilot", Some("<p>A Start</p>"));
        assert!(ep.matches("START"));
        assert!(ep.matches("PiLoT"));
        assert!(!ep.matches("FINALE"));
    }

    #[test]
    fn test_strip_markup_collapses_whitespace() {
        let text = strip_markup("<p>One</p>\n<p>Two   &nbsp;three</p>");
        assert_eq!(text, "One Two three");
    }
}
