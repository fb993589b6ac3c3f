//! Sessionize event feed.
//!
//! Deserializes the "All" endpoint of a Sessionize event and provides
//! the joins the pipeline needs: resolving the short-link question,
//! reading a session's publishing code, and collecting speaker records
//! in feed order.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::overlay::SpeakerInfo;

/// Custom question whose answer is the slug a talk is published under.
pub const SHORT_LINK_QUESTION: &str = "Short Link";

/// Event feed errors
#[derive(Error, Debug)]
pub enum SessionizeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("feed parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("event feed has no 'Short Link' question")]
    MissingShortLinkQuestion,
}

pub type Result<T> = std::result::Result<T, SessionizeError>;

/// Everything the "All" endpoint returns for one event. Feed fields
/// the pipeline never reads (rooms, categories) are ignored on
/// deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionizeAll {
    pub sessions: Vec<Session>,
    pub questions: Vec<Question>,
    pub speakers: Vec<Speaker>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub title: String,
    /// Speaker ids, not records. Resolve via [`SessionizeAll::speakers_for`].
    #[serde(default)]
    pub speakers: Vec<String>,
    #[serde(default)]
    pub question_answers: Vec<Answer>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub question_id: String,
    pub answer_value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub question: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Speaker {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    /// Null and empty both mean no tagline.
    #[serde(default)]
    pub tag_line: Option<String>,
    #[serde(default)]
    pub profile_picture: Option<String>,
    #[serde(default)]
    pub links: Vec<SpeakerLink>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeakerLink {
    pub title: String,
    pub url: String,
    pub link_type: String,
}

impl SessionizeAll {
    /// Parse a feed from raw JSON, as downloaded from the API.
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Id of the question whose answers carry short-link codes.
    pub fn short_link_question_id(&self) -> Result<&str> {
        self.questions
            .iter()
            .find(|q| q.question == SHORT_LINK_QUESTION)
            .map(|q| q.id.as_str())
            .ok_or(SessionizeError::MissingShortLinkQuestion)
    }

    /// Speaker records for a session.
    ///
    /// Order follows the top-level speaker list, not the session's id
    /// list. Ids with no matching record are dropped.
    #[must_use]
    pub fn speakers_for(&self, session: &Session) -> Vec<&Speaker> {
        self.speakers
            .iter()
            .filter(|sp| session.speakers.iter().any(|id| *id == sp.id))
            .collect()
    }
}

impl Session {
    /// The session's short-link code, if it answered the question.
    /// Empty answers count as missing.
    #[must_use]
    pub fn code(&self, question_id: &str) -> Option<&str> {
        self.question_answers
            .iter()
            .find(|qa| qa.question_id == question_id)
            .map(|qa| qa.answer_value.as_str())
            .filter(|code| !code.is_empty())
    }
}

impl Speaker {
    /// The tagline to render, if any. Empty and whitespace-only values
    /// count as absent.
    #[must_use]
    pub fn tagline(&self) -> Option<&str> {
        self.tag_line
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

impl From<&Speaker> for SpeakerInfo {
    fn from(speaker: &Speaker) -> Self {
        let info = SpeakerInfo::new(speaker.first_name.clone(), speaker.last_name.clone());
        match &speaker.tag_line {
            Some(tagline) => info.with_tagline(tagline.clone()),
            None => info,
        }
    }
}

/// Fetches the event feed over HTTPS.
pub struct SessionizeClient {
    client: Client,
    url: Url,
}

impl SessionizeClient {
    /// Build a client for one event feed URL.
    pub fn new(url: Url) -> Result<Self> {
        let client = Client::builder()
            .user_agent("chyron/0.3")
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self { client, url })
    }

    /// Download and deserialize the full event feed.
    pub async fn fetch_all(&self) -> Result<SessionizeAll> {
        debug!("fetching event feed from {}", self.url);
        let all: SessionizeAll = self
            .client
            .get(self.url.clone())
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        debug!(
            "feed loaded: {} sessions, {} speakers",
            all.sessions.len(),
            all.speakers.len()
        );
        Ok(all)
    }
}
