//! Overlay composition for a single talk.
//!
//! Turns a title and one or two speakers into the ordered sequence of
//! positioned, time-gated text overlays that make up the lower third.
//! Geometry is resolved here; the drawtext serialization lives in
//! [`graph`](super::graph).

use serde::{Deserialize, Serialize};

use super::wrap::wrap;
use super::{ComposeError, Result};

/// Name line when the speaker has a tagline under it.
const NAME_Y_TAGGED: i32 = 150;
/// Name line when the name stands alone.
const NAME_Y_PLAIN: i32 = 200;
/// First tagline line.
const TAGLINE_Y: i32 = 220;
/// Lift applied to both blocks of a two-speaker layout so the pair stays
/// centered where a single block would sit.
const TWO_SPEAKER_LIFT: i32 = -60;
/// Vertical room reserved for the first speaker's name and tagline block.
const SPEAKER_BLOCK_GAP: i32 = 230;

/// Font class of an overlay, resolved to a concrete drawtext parameter
/// string at serialization time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FontClass {
    /// Title lines and speaker names.
    Regular,
    /// Tagline lines.
    Small,
}

/// One presenter on a talk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeakerInfo {
    pub first_name: String,
    pub last_name: String,
    /// Raw tagline as supplied; empty counts as absent.
    pub tagline: Option<String>,
}

impl SpeakerInfo {
    /// Create a speaker without a tagline.
    #[must_use]
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            tagline: None,
        }
    }

    /// Set the tagline.
    #[must_use]
    pub fn with_tagline(mut self, tagline: impl Into<String>) -> Self {
        self.tagline = Some(tagline.into());
        self
    }

    /// Full name as rendered on the lower third.
    #[must_use]
    pub fn display_name(&self) -> String {
        if self.last_name.is_empty() {
            self.first_name.clone()
        } else {
            format!("{} {}", self.first_name, self.last_name)
        }
    }

    /// The tagline to render, if any. Empty and whitespace-only values
    /// count as absent.
    #[must_use]
    pub fn visible_tagline(&self) -> Option<&str> {
        self.tagline
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

/// Geometry and font parameters for the lower third.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// drawtext parameter string for title lines and speaker names.
    pub font: String,
    /// drawtext parameter string for tagline lines.
    pub font_small: String,
    /// Maximum characters per title line.
    pub title_width: usize,
    /// Vertical distance between title lines.
    pub title_spacing: i32,
    /// Y of the first title line.
    pub title_base_y: i32,
    /// Maximum characters per tagline line.
    pub tagline_width: usize,
    /// Vertical distance between tagline lines.
    pub tagline_spacing: i32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            font: "fontfile=assets/fonts/OpenSans-Bold.ttf:fontsize=52:fontcolor=white:x=(w-text_w)/2".to_string(),
            font_small: "fontfile=assets/fonts/OpenSans-Regular.ttf:fontsize=30:fontcolor=white:x=(w-text_w)/2".to_string(),
            title_width: 35,
            title_spacing: 70,
            title_base_y: 200,
            tagline_width: 35,
            tagline_spacing: 40,
        }
    }
}

/// Enable windows for the overlay groups, in seconds from clip start.
///
/// The title and speaker regions overlap vertically, so the default
/// windows are disjoint: title first, speakers after.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub title_start: f64,
    pub title_end: f64,
    pub speaker_start: f64,
    pub speaker_end: f64,
    /// Output duration when trimming is enabled.
    pub trim_end: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            title_start: 1.0,
            title_end: 12.0,
            speaker_start: 13.0,
            speaker_end: 24.0,
            trim_end: 25.0,
        }
    }
}

/// A single text overlay with resolved position and timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlaySpec {
    pub text: String,
    /// Vertical position in output pixels.
    pub y: i32,
    /// Overlay appears after this many seconds.
    pub start: f64,
    /// Overlay disappears after this many seconds.
    pub end: f64,
    pub font: FontClass,
}

/// The composed lower third for one talk.
///
/// Overlay order is significant: the renderer chains them sequentially,
/// and reordering changes the serialized graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositionResult {
    pub overlays: Vec<OverlaySpec>,
    /// Truncate video and audio to this many seconds, if set.
    pub trim_end: Option<f64>,
}

/// Compose the lower third for one talk.
///
/// Emits the wrapped title block, then each speaker's name and optional
/// tagline block. A two-speaker layout is lifted by 60 pixels and the
/// second block starts 230 pixels below the first.
///
/// # Errors
///
/// [`ComposeError::InvalidInput`] when the speaker list is empty or has
/// more than two entries, a line width is zero, an enable window is
/// negative or inverted, or trimming is requested with a non-positive
/// duration. Validation runs before any overlay is emitted; on error
/// there is no partial result.
pub fn compose(
    title: &str,
    speakers: &[SpeakerInfo],
    layout: &LayoutConfig,
    timing: &TimingConfig,
    trimmed: bool,
) -> Result<CompositionResult> {
    validate(speakers, layout, timing, trimmed)?;

    let mut overlays = Vec::new();

    let mut y = layout.title_base_y;
    for line in wrap(title, layout.title_width) {
        overlays.push(OverlaySpec {
            text: line,
            y,
            start: timing.title_start,
            end: timing.title_end,
            font: FontClass::Regular,
        });
        y += layout.title_spacing;
    }

    let mut delta = if speakers.len() == 2 {
        TWO_SPEAKER_LIFT
    } else {
        0
    };

    for (idx, speaker) in speakers.iter().enumerate() {
        if idx == 1 {
            delta += SPEAKER_BLOCK_GAP;
        }

        let tagline = speaker.visible_tagline();
        let name_base = if tagline.is_some() {
            NAME_Y_TAGGED
        } else {
            NAME_Y_PLAIN
        };
        let name_y = name_base + delta;

        overlays.push(OverlaySpec {
            text: speaker.display_name(),
            y: name_y,
            start: timing.speaker_start,
            end: timing.speaker_end,
            font: FontClass::Regular,
        });

        if let Some(tagline) = tagline {
            let mut y = TAGLINE_Y + delta;
            for line in wrap(tagline, layout.tagline_width) {
                overlays.push(OverlaySpec {
                    text: line,
                    y,
                    start: timing.speaker_start,
                    end: timing.speaker_end,
                    font: FontClass::Small,
                });
                y += layout.tagline_spacing;
            }
        }
    }

    Ok(CompositionResult {
        overlays,
        trim_end: trimmed.then_some(timing.trim_end),
    })
}

fn validate(
    speakers: &[SpeakerInfo],
    layout: &LayoutConfig,
    timing: &TimingConfig,
    trimmed: bool,
) -> Result<()> {
    if speakers.is_empty() {
        return Err(ComposeError::InvalidInput("talk has no speakers".into()));
    }
    if speakers.len() > 2 {
        return Err(ComposeError::InvalidInput(format!(
            "expected one or two speakers, got {}",
            speakers.len()
        )));
    }
    if layout.title_width == 0 || layout.tagline_width == 0 {
        return Err(ComposeError::InvalidInput(
            "line width must be at least 1".into(),
        ));
    }
    if timing.title_start < 0.0 || timing.speaker_start < 0.0 {
        return Err(ComposeError::InvalidInput(
            "enable windows cannot start before 0".into(),
        ));
    }
    if timing.title_end <= timing.title_start {
        return Err(ComposeError::InvalidInput(
            "title window ends before it starts".into(),
        ));
    }
    if timing.speaker_end <= timing.speaker_start {
        return Err(ComposeError::InvalidInput(
            "speaker window ends before it starts".into(),
        ));
    }
    if trimmed && timing.trim_end <= 0.0 {
        return Err(ComposeError::InvalidInput(
            "trim duration must be positive".into(),
        ));
    }
    Ok(())
}
