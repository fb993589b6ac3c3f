//! `chyron` - Lower-third overlays for conference talk recordings
//!
//! # Features
//!
//! - **Overlay layout**: Greedy dash-aware line wrapping, title and speaker
//!   chyron placement with two-speaker stacking
//! - **Filter graphs**: Deterministic ffmpeg `filter_complex` scripts that
//!   splice an intro clip ahead of each talk
//! - **Event feed**: Sessionize "All" endpoint client with short-link
//!   resolution
//! - **Batch pipeline**: Match recordings to sessions, render through ffmpeg,
//!   optionally upload the results back into the store
//!
//! # Example
//!
//! ```rust
//! use chyron::{compose, LayoutConfig, SpeakerInfo, TimingConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     let speakers = [SpeakerInfo::new("Grace", "Hopper").with_tagline("Rear Admiral, USN")];
//!     let result = compose(
//!         "Compilers: A Love Story",
//!         &speakers,
//!         &LayoutConfig::default(),
//!         &TimingConfig::default(),
//!         false,
//!     )?;
//!     let graph = result.to_filter_graph(&LayoutConfig::default());
//!     println!("{}", graph.script);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod encoder;
pub mod overlay;
pub mod pipeline;
pub mod sessionize;
pub mod store;

pub use config::{Config, PathsConfig, RenderConfig};
pub use encoder::Encoder;
pub use overlay::{compose, ComposeError, CompositionResult, FilterGraph, FontClass, LayoutConfig, OverlaySpec, SpeakerInfo, TimingConfig};
pub use pipeline::{fetch_feed, RenderPipeline, RunPlan, RunSummary, SkipReason, SkippedTalk, TalkPlan};
pub use sessionize::{SessionizeAll, SessionizeClient};
pub use store::{LocalStore, RecordingStore};

/// Version of chyron
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
