//! Caption animation timeline engine.
//!
//! Given a video-configuration document and a playback time, computes the active
//! caption, its highlighted word runs and the styles to draw it with. Every frame is
//! recomputed from `(config, t)`.

pub mod api;
pub mod config;
pub mod easing;
pub mod error;
pub mod host;
pub mod interpolate;
pub mod phase;
pub mod preset;
pub mod render;
pub mod segment;
pub mod style;
pub mod time;
pub mod timeline;
pub mod video;

pub use api::{Command, ConfigSummary, Engine, EngineErrorEvent, EngineErrorKind, Event};
pub use config::{Anchor, AnimationSlot, FadeWindow, Settings, VideoConfig};
pub use easing::Easing;
pub use error::{EngineError, Result};
pub use host::{MemoryStyleHost, STYLESHEET_ID, StyleHost, highlight_keyframes_css};
pub use interpolate::{TextMetrics, compute_highlight_style, compute_style, sample_keyframes};
pub use phase::{Phase, PhaseState, calculate_phase};
pub use preset::{AnimationPreset, PresetKind, PresetRegistry, ResolvedPreset};
pub use render::{CaptionFrame, RenderOptions, RenderedSegment, render_frame};
pub use segment::{WordRange, WordSegment, segment_words};
pub use style::{AnimationStyle, ContainerStyle, LoopingAnimation, SegmentStyle, Transform};
pub use time::TimeRange;
pub use timeline::{Caption, Highlight};
pub use video::video_opacity;
