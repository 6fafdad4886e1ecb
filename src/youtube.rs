//! YouTube transcript retrieval.
//!
//! Resolves video IDs from user-supplied URLs and fetches caption tracks
//! through the YouTube transcript API.

use crate::error::{Result, SvarError};
use async_trait::async_trait;
use regex::Regex;
use yt_transcript_rs::api::YouTubeTranscriptApi;

/// Trait for transcript retrieval implementations.
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    /// Extract a video ID from a URL or bare ID, if the input is recognized.
    fn extract_id(&self, input: &str) -> Option<String>;

    /// Fetch the full transcript text for a video ID.
    async fn fetch_transcript(&self, video_id: &str) -> Result<String>;
}

/// Transcript source backed by YouTube's caption tracks.
pub struct YoutubeTranscriptSource {
    api: YouTubeTranscriptApi,
    video_id_regex: Regex,
    languages: Vec<String>,
}

impl YoutubeTranscriptSource {
    /// Create a new source with English language preference.
    pub fn new() -> Result<Self> {
        let api = YouTubeTranscriptApi::new(None, None, None)
            .map_err(|e| SvarError::TranscriptFetch(format!("Failed to initialize transcript API: {}", e)))?;

        // Matches various YouTube URL formats and bare video IDs
        let video_id_regex = Regex::new(
            r"(?x)
            (?:
                # Full YouTube URLs
                (?:https?://)?
                (?:www\.)?
                (?:youtube\.com/watch\?v=|youtu\.be/|youtube\.com/embed/|youtube\.com/v/)
                ([a-zA-Z0-9_-]{11})
            )
            |
            # Bare video ID (11 characters)
            ^([a-zA-Z0-9_-]{11})$
        ",
        )
        .expect("Invalid regex");

        Ok(Self {
            api,
            video_id_regex,
            languages: vec!["en".to_string()],
        })
    }

    fn extract_video_id(&self, input: &str) -> Option<String> {
        let caps = self.video_id_regex.captures(input.trim())?;

        // Try group 1 (URL format) then group 2 (bare ID)
        caps.get(1)
            .or_else(|| caps.get(2))
            .map(|m| m.as_str().to_string())
    }
}

#[async_trait]
impl TranscriptSource for YoutubeTranscriptSource {
    fn extract_id(&self, input: &str) -> Option<String> {
        self.extract_video_id(input)
    }

    async fn fetch_transcript(&self, video_id: &str) -> Result<String> {
        let languages: Vec<&str> = self.languages.iter().map(String::as_str).collect();

        let transcript = self
            .api
            .fetch_transcript(video_id, &languages, false)
            .await
            .map_err(|e| {
                SvarError::TranscriptFetch(format!(
                    "Could not retrieve a transcript for video {}: {}",
                    video_id, e
                ))
            })?;

        let text = transcript.text();
        if text.trim().is_empty() {
            return Err(SvarError::TranscriptFetch(format!(
                "Transcript for video {} is empty",
                video_id
            )));
        }

        Ok(text)
    }
}
