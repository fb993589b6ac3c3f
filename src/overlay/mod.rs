//! Lower-third overlay synthesis.
//!
//! Everything in this module is pure: the same title, speakers, and
//! configuration always produce the same overlays and the same filter
//! graph, byte for byte. The encoder is the only place the result
//! touches a process boundary.
//!
//! # Example
//!
//! ```
//! use chyron::overlay::{compose, LayoutConfig, SpeakerInfo, TimingConfig};
//!
//! let layout = LayoutConfig::default();
//! let timing = TimingConfig::default();
//! let speakers = [SpeakerInfo::new("Grace", "Hopper")];
//! let result = compose("Compilers: A Love Story", &speakers, &layout, &timing, false)
//!     .unwrap();
//!
//! assert_eq!(result.overlays[0].text, "Compilers - A Love Story");
//! let graph = result.to_filter_graph(&layout);
//! assert!(graph.script.contains("text='Grace Hopper'"));
//! ```

use thiserror::Error;

pub mod composer;
pub mod graph;
pub mod wrap;

pub use composer::{
    compose, CompositionResult, FontClass, LayoutConfig, OverlaySpec, SpeakerInfo, TimingConfig,
};
pub use graph::FilterGraph;
pub use wrap::wrap;

/// Overlay composition errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ComposeError {
    /// The talk cannot be laid out as given.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for overlay operations.
pub type Result<T> = std::result::Result<T, ComposeError>;
