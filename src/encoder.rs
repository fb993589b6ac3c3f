//! ffmpeg render execution.
//!
//! One [`Encoder`] invocation splices the intro clip (input 0) ahead of
//! a talk recording (input 1), burns the overlay chain in, and writes
//! the produced file. The argument list is built separately from the
//! spawn so it can be unit tested and printed by dry runs.

use std::path::Path;
use std::process::Stdio;

use anyhow::{anyhow, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::overlay::FilterGraph;

/// ffmpeg-based render executor
pub struct Encoder {
    /// Path to ffmpeg binary
    ffmpeg_path: String,
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Encoder {
    /// Create a new encoder, searching for the binary in PATH.
    #[must_use]
    pub fn new() -> Self {
        let ffmpeg_path = which::which("ffmpeg")
            .map_or_else(|_| "ffmpeg".to_string(), |p| p.to_string_lossy().to_string());
        Self { ffmpeg_path }
    }

    /// Specify custom ffmpeg binary path
    #[must_use]
    pub fn with_ffmpeg_path(mut self, path: &str) -> Self {
        self.ffmpeg_path = path.to_string();
        self
    }

    /// Check if ffmpeg is available
    pub async fn check_available(&self) -> bool {
        Command::new(&self.ffmpeg_path)
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|s| s.success())
            .unwrap_or(false)
    }

    /// Build the full argument list for one render.
    ///
    /// Input order is load-bearing: the graph addresses the intro as
    /// input 0 and the recording as input 1.
    #[must_use]
    pub fn build_args(
        intro: &Path,
        recording: &Path,
        graph: &FilterGraph,
        output: &Path,
    ) -> Vec<String> {
        vec![
            "-y".to_string(),
            "-i".to_string(),
            intro.to_string_lossy().into_owned(),
            "-i".to_string(),
            recording.to_string_lossy().into_owned(),
            "-filter_complex".to_string(),
            graph.script.clone(),
            "-map".to_string(),
            graph.video_label.to_string(),
            "-map".to_string(),
            graph.audio_label.to_string(),
            output.to_string_lossy().into_owned(),
        ]
    }

    /// Run one render to completion.
    pub async fn encode(
        &self,
        intro: &Path,
        recording: &Path,
        graph: &FilterGraph,
        output: &Path,
    ) -> Result<()> {
        let args = Self::build_args(intro, recording, graph, output);
        debug!("ffmpeg args: {:?}", args);

        let mut child = Command::new(&self.ffmpeg_path)
            .args(&args)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()?;

        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| anyhow!("Failed to capture ffmpeg stderr"))?;

        let reader = BufReader::new(stderr);
        let mut lines = reader.lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if line.contains("Error") {
                warn!("ffmpeg: {}", line);
            } else {
                debug!("ffmpeg: {}", line);
            }
        }

        let status = child.wait().await?;
        if !status.success() {
            return Err(anyhow!("ffmpeg exited with status: {status}"));
        }

        info!("Rendered {}", output.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::{compose, LayoutConfig, SpeakerInfo, TimingConfig};
    use std::path::PathBuf;

    fn sample_graph(trimmed: bool) -> FilterGraph {
        let layout = LayoutConfig::default();
        compose(
            "Rust in Production",
            &[SpeakerInfo::new("Jane", "Doe")],
            &layout,
            &TimingConfig::default(),
            trimmed,
        )
        .unwrap()
        .to_filter_graph(&layout)
    }

    #[test]
    fn test_build_args_order() {
        let graph = sample_graph(false);
        let args = Encoder::build_args(
            &PathBuf::from("assets/intro.mp4"),
            &PathBuf::from("work/recording.mp4"),
            &graph,
            &PathBuf::from("produced/talk.mp4"),
        );

        assert_eq!(args[0], "-y");
        assert_eq!(&args[1..3], ["-i", "assets/intro.mp4"]);
        assert_eq!(&args[3..5], ["-i", "work/recording.mp4"]);
        assert_eq!(args[5], "-filter_complex");
        assert_eq!(args[6], graph.script);
        assert_eq!(&args[7..9], ["-map", "[outt]"]);
        assert_eq!(&args[9..11], ["-map", "[outa]"]);
        assert_eq!(args[11], "produced/talk.mp4");
        assert_eq!(args.len(), 12);
    }

    #[test]
    fn test_build_args_maps_trimmed_labels() {
        let graph = sample_graph(true);
        let args = Encoder::build_args(
            &PathBuf::from("assets/intro.mp4"),
            &PathBuf::from("work/recording.mp4"),
            &graph,
            &PathBuf::from("produced/talk.mp4"),
        );

        assert!(args.contains(&"[outc]".to_string()));
        assert!(args.contains(&"[outac]".to_string()));
        assert!(!args.contains(&"[outt]".to_string()));
    }

    #[test]
    fn test_with_ffmpeg_path_overrides_lookup() {
        let encoder = Encoder::new().with_ffmpeg_path("/opt/ffmpeg/bin/ffmpeg");
        assert_eq!(encoder.ffmpeg_path, "/opt/ffmpeg/bin/ffmpeg");
    }

    #[tokio::test]
    async fn test_missing_binary_reports_unavailable() {
        let encoder = Encoder::new().with_ffmpeg_path("/definitely/not/here/ffmpeg");
        assert!(!encoder.check_available().await);
    }
}
