//! Smart capture: turning freeform text into structured records
//!
//! Two flows share the same pattern table:
//!
//! - **Brain dump** ([`Classifier::extract`]): every non-blank line is tried
//!   as a media line, then as an idea line. Anything else is ignored.
//! - **Quick capture** ([`Classifier::classify_quick`]): the whole text becomes
//!   one journal entry. A bare URL becomes a link; otherwise it is a note, and
//!   a media item is also produced when the text matches a media pattern.
//!
//! ## Pattern order
//!
//! Media patterns are evaluated in declaration order and the first match wins.
//! Several verbs appear in more than one pattern ("watching" is listed for
//! movies, shows and videos), so the order decides the type:
//! `Watching: The Office` is a movie.

use crate::error::{Error, Result};
use crate::types::{Entry, Idea, MediaItem, MediaStatus, MediaType};
use regex::Regex;

/// Ordered `(verb alternation, type)` table.
const MEDIA_PATTERNS: &[(&str, MediaType)] = &[
    ("reading|read|book", MediaType::Book),
    ("watching|watched|movie", MediaType::Movie),
    ("watching|watched|show|tv", MediaType::TvShow),
    ("listening|listened|podcast", MediaType::Podcast),
    ("reading|read|article", MediaType::Article),
    ("watching|watched|video", MediaType::Video),
    ("listening|listened|music|song", MediaType::Music),
];

const URL_PATTERN: &str = r"^https?://(www\.)?[-a-zA-Z0-9@:%._+~#=]{1,256}\.[a-zA-Z0-9()]{1,6}\b([-a-zA-Z0-9()@:%_+.~#?&/=]*)$";

/// Marker that turns a line into an idea
const IDEA_MARKER: &str = "idea:";

struct MediaPattern {
    regex: Regex,
    media_type: MediaType,
}

/// What a single brain-dump line turned into
#[derive(Debug, Clone, PartialEq)]
pub enum LineClass {
    Media(MediaItem),
    Idea(Idea),
    Unmatched,
}

/// Records extracted from one brain dump
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    pub media: Vec<MediaItem>,
    pub ideas: Vec<Idea>,
}

impl Extraction {
    pub fn is_empty(&self) -> bool {
        self.media.is_empty() && self.ideas.is_empty()
    }
}

/// Result of classifying a quick capture
#[derive(Debug, Clone, PartialEq)]
pub enum QuickCapture {
    /// The whole text is a URL
    Link { url: String },
    /// Text mentions media; it is kept as a note and the item is tracked too
    Media { item: MediaItem, note: String },
    /// Plain note
    Note { text: String },
}

impl QuickCapture {
    /// The timeline entry this capture produces.
    pub fn to_entry(&self) -> Result<Entry> {
        match self {
            QuickCapture::Link { url } => Entry::link(url.as_str()),
            QuickCapture::Media { note, .. } => Entry::note(note.as_str()),
            QuickCapture::Note { text } => Entry::note(text.as_str()),
        }
    }

    pub fn media_item(&self) -> Option<&MediaItem> {
        match self {
            QuickCapture::Media { item, .. } => Some(item),
            _ => None,
        }
    }
}

/// Pattern-based classifier for captured text.
pub struct Classifier {
    media_patterns: Vec<MediaPattern>,
    url_pattern: Regex,
}

impl Classifier {
    /// Compile the pattern table.
    pub fn new() -> Result<Self> {
        let media_patterns = MEDIA_PATTERNS
            .iter()
            .map(|(verbs, media_type)| {
                let regex = Regex::new(&format!(r"(?i)(?:{}):\s*(.+)", verbs))
                    .map_err(|e| Error::Config(format!("invalid media pattern {}: {}", verbs, e)))?;
                Ok(MediaPattern {
                    regex,
                    media_type: *media_type,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let url_pattern = Regex::new(URL_PATTERN)
            .map_err(|e| Error::Config(format!("invalid URL pattern: {}", e)))?;

        Ok(Self {
            media_patterns,
            url_pattern,
        })
    }

    /// First media pattern matching `text`, with its trimmed title.
    ///
    /// Matches whose captured title is blank are skipped.
    pub fn match_media(&self, text: &str) -> Option<(MediaType, String)> {
        self.media_patterns.iter().find_map(|pattern| {
            let caps = pattern.regex.captures(text)?;
            let title = caps.get(1)?.as_str().trim();
            (!title.is_empty()).then(|| (pattern.media_type, title.to_string()))
        })
    }

    /// Idea content for a line, if the line is an idea.
    ///
    /// A line is an idea when it starts with `-` or `*`, or mentions `idea:`
    /// anywhere. One leading bullet and one leading `idea:` are stripped.
    pub fn match_idea(&self, line: &str) -> Option<String> {
        let line = line.trim();
        let is_bullet = line.starts_with('-') || line.starts_with('*');
        if !is_bullet && !line.to_lowercase().contains(IDEA_MARKER) {
            return None;
        }

        let mut rest = line;
        if let Some(stripped) = rest.strip_prefix(|c: char| c == '-' || c == '*') {
            rest = stripped.trim_start();
        }
        if let Some(head) = rest.get(..IDEA_MARKER.len()) {
            if head.eq_ignore_ascii_case(IDEA_MARKER) {
                rest = rest[IDEA_MARKER.len()..].trim_start();
            }
        }

        let content = rest.trim();
        (!content.is_empty()).then(|| content.to_string())
    }

    /// Classify one brain-dump line. Media takes precedence over ideas.
    pub fn classify_line(&self, line: &str) -> LineClass {
        let line = line.trim();
        if line.is_empty() {
            return LineClass::Unmatched;
        }

        if let Some((media_type, title)) = self.match_media(line) {
            if let Ok(item) = MediaItem::new(media_type, title, MediaStatus::Consuming) {
                return LineClass::Media(item);
            }
        }

        match self.match_idea(line).map(Idea::new) {
            Some(Ok(idea)) => LineClass::Idea(idea),
            _ => LineClass::Unmatched,
        }
    }

    /// Extract media items and ideas from a multi-line brain dump.
    ///
    /// Blank input is a validation error. Repeated lines yield repeated
    /// records with distinct ids.
    pub fn extract(&self, text: &str) -> Result<Extraction> {
        if text.trim().is_empty() {
            return Err(Error::Validation(
                "capture text must not be empty".to_string(),
            ));
        }

        let mut extraction = Extraction::default();
        for line in text.lines() {
            match self.classify_line(line) {
                LineClass::Media(item) => extraction.media.push(item),
                LineClass::Idea(idea) => extraction.ideas.push(idea),
                LineClass::Unmatched => {}
            }
        }

        tracing::debug!(
            lines = text.lines().count(),
            media = extraction.media.len(),
            ideas = extraction.ideas.len(),
            "Classified brain dump"
        );

        Ok(extraction)
    }

    /// Whether the whole text is a single http(s) URL.
    pub fn is_url(&self, text: &str) -> bool {
        let text = text.trim();
        self.url_pattern.is_match(text) && url::Url::parse(text).is_ok()
    }

    /// Classify a single quick capture.
    ///
    /// URL detection runs first and short-circuits everything else.
    pub fn classify_quick(&self, text: &str) -> Result<QuickCapture> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::Validation(
                "capture text must not be empty".to_string(),
            ));
        }

        if self.is_url(text) {
            return Ok(QuickCapture::Link {
                url: text.to_string(),
            });
        }

        if let Some((media_type, title)) = self.match_media(text) {
            let item = MediaItem::new(media_type, title, MediaStatus::Consuming)?;
            return Ok(QuickCapture::Media {
                item,
                note: text.to_string(),
            });
        }

        Ok(QuickCapture::Note {
            text: text.to_string(),
        })
    }
}

/// Verb used when listing an item back into a brain dump
fn prefill_verb(media_type: MediaType) -> &'static str {
    match media_type {
        MediaType::Book | MediaType::Article => "Reading",
        MediaType::Movie | MediaType::TvShow | MediaType::Video => "Watching",
        MediaType::Podcast | MediaType::Music => "Listening",
        MediaType::Other => "Consuming",
    }
}

/// Starting text for a brain dump: one line per item still being consumed.
///
/// Returns an empty string when nothing is in progress; otherwise the lines
/// are followed by a blank line so the user starts typing below them.
pub fn prefill_from_consuming(items: &[MediaItem]) -> String {
    let lines: Vec<String> = items
        .iter()
        .filter(|item| item.status == MediaStatus::Consuming)
        .map(|item| match item.author.as_deref() {
            Some(author) if !author.is_empty() => format!(
                "{}: {} by {}",
                prefill_verb(item.media_type),
                item.title,
                author
            ),
            _ => format!("{}: {}", prefill_verb(item.media_type), item.title),
        })
        .collect();

    if lines.is_empty() {
        return String::new();
    }
    format!("{}\n\n", lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> Classifier {
        Classifier::new().unwrap()
    }

    fn media(line: &str) -> MediaItem {
        match classifier().classify_line(line) {
            LineClass::Media(item) => item,
            other => panic!("expected media for {:?}, got {:?}", line, other),
        }
    }

    #[test]
    fn test_reading_is_book() {
        let item = media("Reading: Atomic Habits");
        assert_eq!(item.media_type, MediaType::Book);
        assert_eq!(item.title, "Atomic Habits");
        assert_eq!(item.status, MediaStatus::Consuming);
        assert!(item.author.is_none());
    }

    #[test]
    fn test_watching_resolves_to_movie() {
        assert_eq!(media("Watching: The Office").media_type, MediaType::Movie);
        assert_eq!(media("watched: Arrival").media_type, MediaType::Movie);
    }

    #[test]
    fn test_type_specific_prefixes() {
        assert_eq!(media("TV: Severance").media_type, MediaType::TvShow);
        assert_eq!(media("show: Severance").media_type, MediaType::TvShow);
        assert_eq!(media("Podcast: Hardcore History").media_type, MediaType::Podcast);
        assert_eq!(media("Listening: Hardcore History").media_type, MediaType::Podcast);
        assert_eq!(media("article: The Bitter Lesson").media_type, MediaType::Article);
        assert_eq!(media("video: Rust in 100 seconds").media_type, MediaType::Video);
        assert_eq!(media("Song: Holocene").media_type, MediaType::Music);
        assert_eq!(media("BOOK:Dune").title, "Dune");
    }

    #[test]
    fn test_title_is_trimmed() {
        assert_eq!(media("  Book:    Dune   ").title, "Dune");
    }

    #[test]
    fn test_bullet_idea() {
        match classifier().classify_line("- Build a journaling app") {
            LineClass::Idea(idea) => assert_eq!(idea.content, "Build a journaling app"),
            other => panic!("expected idea, got {:?}", other),
        }
    }

    #[test]
    fn test_idea_markers() {
        let c = classifier();
        assert_eq!(c.match_idea("* walk more").as_deref(), Some("walk more"));
        assert_eq!(c.match_idea("Idea: tea subscription").as_deref(), Some("tea subscription"));
        assert_eq!(c.match_idea("- idea: both markers").as_deref(), Some("both markers"));
        // Marker in the middle keeps the whole line
        assert_eq!(
            c.match_idea("random idea: bikes").as_deref(),
            Some("random idea: bikes")
        );
        assert_eq!(c.match_idea("-"), None);
        assert_eq!(c.match_idea("idea:   "), None);
        assert_eq!(c.match_idea("just a line"), None);
    }

    #[test]
    fn test_media_beats_idea() {
        // A bulleted media line is still media
        assert_eq!(media("- Book: Dune").title, "Dune");
    }

    #[test]
    fn test_blank_title_is_not_media() {
        let c = classifier();
        assert_eq!(c.match_media("Reading:   "), None);
        assert_eq!(c.classify_line("Reading:"), LineClass::Unmatched);
    }

    #[test]
    fn test_extract_brain_dump() {
        let text = "Reading: Atomic Habits\n\
                    \n\
                    - Build a journaling app\n\
                    had a long day\n\
                    Podcast: Serial\n\
                    Idea: morning pages";
        let extraction = classifier().extract(text).unwrap();

        let titles: Vec<&str> = extraction.media.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["Atomic Habits", "Serial"]);
        let ideas: Vec<&str> = extraction.ideas.iter().map(|i| i.content.as_str()).collect();
        assert_eq!(ideas, vec!["Build a journaling app", "morning pages"]);
    }

    #[test]
    fn test_duplicates_are_kept() {
        let extraction = classifier()
            .extract("Book: Dune\nBook: Dune")
            .unwrap();
        assert_eq!(extraction.media.len(), 2);
        assert_ne!(extraction.media[0].id, extraction.media[1].id);
    }

    #[test]
    fn test_empty_input_rejected() {
        let c = classifier();
        assert!(c.extract("").unwrap_err().is_validation());
        assert!(c.extract(" \n\t \n").unwrap_err().is_validation());
        assert!(c.classify_quick("   ").unwrap_err().is_validation());
    }

    #[test]
    fn test_quick_capture_link() {
        let capture = classifier()
            .classify_quick("  https://www.example.com/articles/42?ref=home ")
            .unwrap();
        assert_eq!(
            capture,
            QuickCapture::Link {
                url: "https://www.example.com/articles/42?ref=home".to_string()
            }
        );
        let entry = capture.to_entry().unwrap();
        assert_eq!(entry.kind, crate::types::EntryKind::Link);
    }

    #[test]
    fn test_quick_capture_url_must_be_whole_text() {
        let capture = classifier()
            .classify_quick("look at https://example.com later")
            .unwrap();
        assert!(matches!(capture, QuickCapture::Note { .. }));
    }

    #[test]
    fn test_quick_capture_url_short_circuits_media() {
        let capture = classifier()
            .classify_quick("https://example.com/book:dune")
            .unwrap();
        assert!(matches!(capture, QuickCapture::Link { .. }));
    }

    #[test]
    fn test_quick_capture_media_keeps_note() {
        let capture = classifier().classify_quick("Watching: Arrival").unwrap();
        let item = capture.media_item().unwrap();
        assert_eq!(item.media_type, MediaType::Movie);
        assert_eq!(item.title, "Arrival");

        let entry = capture.to_entry().unwrap();
        assert_eq!(entry.kind, crate::types::EntryKind::Note);
        assert_eq!(entry.content, "Watching: Arrival");
    }

    #[test]
    fn test_quick_capture_plain_note() {
        let capture = classifier().classify_quick("slept well").unwrap();
        assert_eq!(
            capture,
            QuickCapture::Note {
                text: "slept well".to_string()
            }
        );
        assert!(capture.media_item().is_none());
    }

    #[test]
    fn test_prefill_from_consuming() {
        let mut dune = MediaItem::new(MediaType::Book, "Dune", MediaStatus::Consuming).unwrap();
        dune.author = Some("Frank Herbert".to_string());
        let severance =
            MediaItem::new(MediaType::TvShow, "Severance", MediaStatus::Consuming).unwrap();
        let done = MediaItem::new(MediaType::Music, "Holocene", MediaStatus::Finished).unwrap();
        let misc = MediaItem::new(MediaType::Other, "Board games", MediaStatus::Consuming).unwrap();

        let text = prefill_from_consuming(&[dune, severance, done, misc]);
        assert_eq!(
            text,
            "Reading: Dune by Frank Herbert\nWatching: Severance\nConsuming: Board games\n\n"
        );
        assert_eq!(prefill_from_consuming(&[]), "");
    }

    #[test]
    fn test_prefill_round_trips_through_extract() {
        let item = MediaItem::new(MediaType::Podcast, "Serial", MediaStatus::Consuming).unwrap();
        let text = prefill_from_consuming(std::slice::from_ref(&item));
        let extraction = classifier().extract(&text).unwrap();
        assert_eq!(extraction.media.len(), 1);
        assert_eq!(extraction.media[0].media_type, MediaType::Podcast);
        assert_eq!(extraction.media[0].title, "Serial");
    }
}
