//! Batch render pipeline: feed -> match -> compose -> encode -> upload
//!
//! Orchestrates one event's worth of talks: lists the recording store,
//! pairs sessions with recordings via their short-link codes, composes
//! the lower third for each pair, and drives the encoder. A failing
//! talk is counted and logged; the batch keeps going.

use std::fmt;
use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::Config;
use crate::encoder::Encoder;
use crate::overlay::{compose, FilterGraph, SpeakerInfo};
use crate::sessionize::{Session, SessionizeAll, SessionizeClient};
use crate::store::RecordingStore;

/// Usable source recordings carry one of these suffixes.
const RECORDING_SUFFIXES: [&str; 2] = ["RecordingTrimmed.mp4", "RecordingTrimmed.1.mp4"];

/// True for object names the batch treats as source recordings.
#[must_use]
pub fn is_trimmed_recording(name: &str) -> bool {
    RECORDING_SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
}

/// First recording whose name starts with the session code.
#[must_use]
pub fn match_recording<'a>(recordings: &'a [String], code: &str) -> Option<&'a str> {
    recordings
        .iter()
        .map(String::as_str)
        .find(|name| name.starts_with(code))
}

/// Download the event feed named by `feed_url`.
pub async fn fetch_feed(config: &Config) -> Result<SessionizeAll> {
    let raw = config
        .feed_url
        .as_deref()
        .ok_or_else(|| anyhow!("no feed_url configured"))?;
    let url = Url::parse(raw).with_context(|| format!("invalid feed URL {raw}"))?;
    let client = SessionizeClient::new(url)?;
    Ok(client.fetch_all().await?)
}

/// Result of one batch run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Talks rendered into the output directory.
    pub produced: usize,
    /// Sessions left out before any work happened.
    pub skipped: usize,
    /// Talks that reached a production attempt and errored.
    pub failed: usize,
}

/// Why a session is left out of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// No short-link answer, or an empty one.
    NoCode,
    /// Code is on the configured skip list.
    OnSkipList,
    /// No stored recording starts with the code.
    NoRecording,
    /// The talk cannot be laid out.
    ComposeFailed(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCode => write!(f, "no short-link code"),
            Self::OnSkipList => write!(f, "on the skip list"),
            Self::NoRecording => write!(f, "no matching recording"),
            Self::ComposeFailed(e) => write!(f, "composition failed: {e}"),
        }
    }
}

/// One talk the pipeline would render.
#[derive(Debug, Clone)]
pub struct TalkPlan {
    pub code: String,
    pub title: String,
    /// Display names, in overlay order.
    pub speakers: Vec<String>,
    /// Store object name of the source recording.
    pub recording: String,
    pub graph: FilterGraph,
}

/// A session the pipeline would leave out, and why.
#[derive(Debug, Clone)]
pub struct SkippedTalk {
    pub title: String,
    pub code: Option<String>,
    pub reason: SkipReason,
}

/// Dry-run view of a whole batch.
#[derive(Debug, Clone, Default)]
pub struct RunPlan {
    pub talks: Vec<TalkPlan>,
    pub skipped: Vec<SkippedTalk>,
}

/// Full batch pipeline
pub struct RenderPipeline {
    config: Config,
    store: Box<dyn RecordingStore>,
    encoder: Encoder,
}

impl RenderPipeline {
    /// Create a new pipeline. Scratch and output directories are
    /// created up front.
    pub fn new(config: Config, store: Box<dyn RecordingStore>) -> Result<Self> {
        std::fs::create_dir_all(&config.paths.work_dir)
            .with_context(|| format!("failed to create {}", config.paths.work_dir.display()))?;
        std::fs::create_dir_all(&config.paths.output_dir)
            .with_context(|| format!("failed to create {}", config.paths.output_dir.display()))?;

        let encoder = match config.render.ffmpeg_path.as_deref() {
            Some(path) => Encoder::new().with_ffmpeg_path(path),
            None => Encoder::new(),
        };

        Ok(Self {
            config,
            store,
            encoder,
        })
    }

    /// Check if all required pieces are in place.
    pub async fn check_dependencies(&self) -> Result<Vec<(String, bool)>> {
        let mut results = Vec::new();

        results.push(("ffmpeg".to_string(), self.encoder.check_available().await));
        results.push(("intro clip".to_string(), self.config.paths.intro.exists()));
        results.push((
            "recording store".to_string(),
            self.store.list().await.is_ok(),
        ));

        Ok(results)
    }

    /// Classify every session without producing anything. The store is
    /// only listed, never read or written.
    pub async fn plan(&self, feed: &SessionizeAll) -> Result<RunPlan> {
        let recordings = self.trimmed_recordings().await?;
        let question_id = feed.short_link_question_id()?;

        let mut plan = RunPlan::default();
        for session in &feed.sessions {
            let Some(code) = session.code(question_id) else {
                plan.skipped.push(SkippedTalk {
                    title: session.title.clone(),
                    code: None,
                    reason: SkipReason::NoCode,
                });
                continue;
            };
            if self.on_skip_list(code) {
                plan.skipped.push(SkippedTalk {
                    title: session.title.clone(),
                    code: Some(code.to_string()),
                    reason: SkipReason::OnSkipList,
                });
                continue;
            }
            let Some(recording) = match_recording(&recordings, code) else {
                plan.skipped.push(SkippedTalk {
                    title: session.title.clone(),
                    code: Some(code.to_string()),
                    reason: SkipReason::NoRecording,
                });
                continue;
            };

            let speakers = speaker_infos(feed, session);
            match self.compose_graph(&session.title, &speakers) {
                Ok(graph) => plan.talks.push(TalkPlan {
                    code: code.to_string(),
                    title: session.title.clone(),
                    speakers: speakers.iter().map(SpeakerInfo::display_name).collect(),
                    recording: recording.to_string(),
                    graph,
                }),
                Err(e) => plan.skipped.push(SkippedTalk {
                    title: session.title.clone(),
                    code: Some(code.to_string()),
                    reason: SkipReason::ComposeFailed(e.to_string()),
                }),
            }
        }
        Ok(plan)
    }

    /// Fetch the feed and run the whole batch.
    pub async fn run(&self) -> Result<RunSummary> {
        let feed = fetch_feed(&self.config).await?;
        self.run_with_feed(&feed).await
    }

    /// Run the whole batch against an already fetched feed.
    pub async fn run_with_feed(&self, feed: &SessionizeAll) -> Result<RunSummary> {
        let start = Instant::now();
        let recordings = self.trimmed_recordings().await?;
        let question_id = feed.short_link_question_id()?;

        let mut summary = RunSummary::default();
        for session in &feed.sessions {
            let Some(code) = session.code(question_id) else {
                debug!("skipping '{}': no short-link code", session.title);
                summary.skipped += 1;
                continue;
            };
            if self.on_skip_list(code) {
                info!("skipping {}: on the skip list", code);
                summary.skipped += 1;
                continue;
            }
            let Some(recording) = match_recording(&recordings, code) else {
                info!("skipping {}: no matching recording", code);
                summary.skipped += 1;
                continue;
            };

            match self.produce(code, session, feed, recording).await {
                Ok(()) => summary.produced += 1,
                Err(e) => {
                    warn!("{}: {:#}", code, e);
                    summary.failed += 1;
                }
            }

            if self.config.render.only_first {
                info!("only_first set, stopping after {}", code);
                break;
            }
        }

        info!(
            "Batch done in {:.1}s: {} produced, {} skipped, {} failed",
            start.elapsed().as_secs_f64(),
            summary.produced,
            summary.skipped,
            summary.failed
        );
        Ok(summary)
    }

    /// Render one talk end to end.
    async fn produce(
        &self,
        code: &str,
        session: &Session,
        feed: &SessionizeAll,
        recording: &str,
    ) -> Result<()> {
        info!("Producing {} ({})", code, session.title);

        let speakers = speaker_infos(feed, session);
        let graph = self.compose_graph(&session.title, &speakers)?;

        let scratch = self
            .config
            .paths
            .work_dir
            .join(format!("{}.mp4", uuid::Uuid::new_v4()));
        info!("Downloading {}...", recording);
        self.store.download(recording, &scratch).await?;

        let output = self.config.paths.output_dir.join(format!("{code}.mp4"));
        let encoded = self
            .encoder
            .encode(&self.config.paths.intro, &scratch, &graph, &output)
            .await;

        // Scratch file goes away whether the encode worked or not.
        let _ = fs::remove_file(&scratch).await;
        encoded?;

        if self.config.render.upload {
            let object = format!("produced/{code}.mp4");
            info!("Uploading {}...", object);
            if self.store.exists(&object).await? {
                self.store.delete(&object).await?;
            }
            self.store.upload(&output, &object).await?;
            info!("Upload complete");
        }

        Ok(())
    }

    async fn trimmed_recordings(&self) -> Result<Vec<String>> {
        let names = self.store.list().await?;
        let recordings: Vec<String> = names
            .into_iter()
            .filter(|name| is_trimmed_recording(name))
            .collect();
        info!("{} trimmed recordings in the store", recordings.len());
        Ok(recordings)
    }

    fn on_skip_list(&self, code: &str) -> bool {
        self.config.skip.iter().any(|s| s == code)
    }

    fn compose_graph(
        &self,
        title: &str,
        speakers: &[SpeakerInfo],
    ) -> crate::overlay::Result<FilterGraph> {
        let result = compose(
            title,
            speakers,
            &self.config.layout,
            &self.config.timing,
            self.config.render.trimmed,
        )?;
        Ok(result.to_filter_graph(&self.config.layout))
    }
}

fn speaker_infos(feed: &SessionizeAll, session: &Session) -> Vec<SpeakerInfo> {
    feed.speakers_for(session)
        .into_iter()
        .map(SpeakerInfo::from)
        .collect()
}
