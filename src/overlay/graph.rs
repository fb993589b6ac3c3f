//! Filter graph serialization.
//!
//! Renders a [`CompositionResult`] into the single `-filter_complex`
//! script the encoder hands to ffmpeg, together with the labels of the
//! final video and audio streams.

use super::composer::{CompositionResult, FontClass, LayoutConfig, OverlaySpec};

/// Splices the intro (input 0) in front of the talk recording (input 1).
/// The overlay chain starts from `[outv]`; audio passes through `[outa]`.
const CONCAT_HEADER: &str = "[0:v:0][0:a:0][1:v:0][1:a:0]concat=n=2:v=1:a=1 [outv] [outa];";

/// A complete filter graph plus the stream labels to map into the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterGraph {
    /// The `-filter_complex` script.
    pub script: String,
    /// Label of the final video stream, brackets included.
    pub video_label: &'static str,
    /// Label of the final audio stream, brackets included.
    pub audio_label: &'static str,
}

impl CompositionResult {
    /// Serialize the composition into an ffmpeg filter graph.
    ///
    /// Overlays become a comma-chained run of `drawtext` filters in
    /// emission order between `[outv]` and `[outt]`. When a trim is
    /// requested, `trim`/`atrim` stages truncate both streams and the
    /// labels move to `[outc]`/`[outac]`.
    #[must_use]
    pub fn to_filter_graph(&self, layout: &LayoutConfig) -> FilterGraph {
        let mut script = String::from(CONCAT_HEADER);
        script.push_str("[outv]");

        let chain: Vec<String> = self
            .overlays
            .iter()
            .map(|overlay| drawtext_filter(overlay, layout))
            .collect();
        script.push_str(&chain.join(","));
        script.push_str("[outt]");

        match self.trim_end {
            Some(end) => {
                script.push_str(&format!(
                    ";[outt]trim=end={end}[outc];[outa]atrim=end={end}[outac]"
                ));
                FilterGraph {
                    script,
                    video_label: "[outc]",
                    audio_label: "[outac]",
                }
            }
            None => FilterGraph {
                script,
                video_label: "[outt]",
                audio_label: "[outa]",
            },
        }
    }
}

fn drawtext_filter(overlay: &OverlaySpec, layout: &LayoutConfig) -> String {
    let font = match overlay.font {
        FontClass::Regular => &layout.font,
        FontClass::Small => &layout.font_small,
    };
    format!(
        "drawtext={font}:y={y}:text='{text}':enable=if(gt(t\\, {start})\\,lt(t\\, {end}))",
        y = overlay.y,
        text = escape_text(&overlay.text),
        start = overlay.start,
        end = overlay.end,
    )
}

/// Escape for a single-quoted drawtext value. An apostrophe closes the
/// quote, emits an escaped quote, and reopens it.
fn escape_text(text: &str) -> String {
    text.replace('\'', "'\\''")
}
