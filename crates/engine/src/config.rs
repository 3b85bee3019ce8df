use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::api::ConfigSummary;
use crate::error::{EngineError, Result};
use crate::time::TimeRange;
use crate::timeline::{Caption, Highlight, find_active_caption, validate_track};

/// The declarative document describing one captioned video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoConfig {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<DocumentMeta>,
    /// Source media description. Not read by the engine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeline: Option<TimeRange>,
    pub tracks: Tracks,
    #[serde(default)]
    pub settings: Settings,
    /// Export preferences. Not read by the engine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentMeta {
    pub schema_version: Option<String>,
    pub created_at: Option<String>,
    pub duration: Option<f64>,
    pub time_unit: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tracks {
    #[serde(default)]
    pub video: VideoTrack,
    pub text: TextTrack,
    #[serde(default)]
    pub audio: Vec<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoTrack {
    #[serde(default)]
    pub animation: VideoAnimation,
}

/// Video-level fade settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoAnimation {
    #[serde(default = "default_preset_id")]
    pub preset_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fade_in: Option<FadeWindow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fade_out: Option<FadeWindow>,
}

impl Default for VideoAnimation {
    fn default() -> Self {
        Self {
            preset_id: default_preset_id(),
            fade_in: None,
            fade_out: None,
        }
    }
}

/// A fade starting at `start` seconds and lasting `duration` seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FadeWindow {
    pub start: f64,
    pub duration: f64,
}

impl FadeWindow {
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextTrack {
    #[serde(default)]
    pub global_style: GlobalStyle,
    #[serde(default)]
    pub highlight_style: HighlightStyle,
    #[serde(default)]
    pub animation: TextAnimation,
    #[serde(default)]
    pub captions: Vec<Caption>,
    #[serde(default)]
    pub highlights: Vec<Highlight>,
}

/// Base text style shared by every caption.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GlobalStyle {
    pub font_family: String,
    pub font_size: f64,
    pub font_weight: u32,
    pub color: String,
    pub background: String,
    /// `[vertical, horizontal]` in pixels.
    pub padding: Vec<f64>,
    pub border_radius: f64,
    pub position: Position,
}

impl GlobalStyle {
    /// Vertical and horizontal padding. A single value applies to both axes.
    pub fn padding_px(&self) -> [f64; 2] {
        match self.padding.as_slice() {
            [] => [0.0, 0.0],
            [both] => [*both, *both],
            [vertical, horizontal, ..] => [*vertical, *horizontal],
        }
    }
}

impl Default for GlobalStyle {
    fn default() -> Self {
        Self {
            font_family: "Inter".to_owned(),
            font_size: 14.0,
            font_weight: 700,
            color: "#ffffff".to_owned(),
            background: "rgba(0,0,0,0.45)".to_owned(),
            padding: vec![12.0, 16.0],
            border_radius: 12.0,
            position: Position::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Position {
    pub anchor: Anchor,
    pub offset_y: f64,
}

impl Default for Position {
    fn default() -> Self {
        Self {
            anchor: Anchor::BottomCenter,
            offset_y: -50.0,
        }
    }
}

/// Where the caption container sits in the video frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    BottomCenter,
    TopCenter,
    Center,
    /// Anchors this engine does not know are rendered without positioning.
    #[serde(other)]
    Unknown,
}

/// Extra styling applied to highlighted word runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HighlightStyle {
    pub color: String,
    pub scale: f64,
    pub font_weight: u32,
}

impl Default for HighlightStyle {
    fn default() -> Self {
        Self {
            color: "#ffd166".to_owned(),
            scale: 1.03,
            font_weight: 800,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextAnimation {
    pub entry: AnimationSlot,
    pub exit: AnimationSlot,
    pub highlight: AnimationSlot,
}

/// Preset selection for one animation kind, with an optional duration override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationSlot {
    #[serde(default = "default_preset_id")]
    pub preset_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

impl AnimationSlot {
    pub fn new(preset_id: &str, duration: Option<f64>) -> Self {
        Self {
            preset_id: preset_id.to_owned(),
            duration,
        }
    }
}

impl Default for AnimationSlot {
    fn default() -> Self {
        Self::new("none", None)
    }
}

/// Feature toggles. Missing flags default to enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub auto_captions: bool,
    pub dynamic_animations: bool,
    pub highlight_keywords: bool,
    pub intro_fade_in: bool,
    pub outro_fade_out: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            auto_captions: true,
            dynamic_animations: true,
            highlight_keywords: true,
            intro_fade_in: true,
            outro_fade_out: true,
        }
    }
}

fn default_preset_id() -> String {
    "none".to_owned()
}

impl VideoConfig {
    /// Parses and validates a document.
    ///
    /// # Example
    /// ```
    /// use caption_engine::VideoConfig;
    ///
    /// let config = VideoConfig::from_json_str(
    ///     r#"{
    ///         "id": "demo",
    ///         "tracks": { "text": { "captions": [
    ///             { "id": "c1", "text": "hello world", "start": 0.0, "end": 1.5 }
    ///         ] } }
    ///     }"#,
    /// )
    /// .expect("document is valid");
    /// assert_eq!(config.captions().len(), 1);
    /// assert!(config.settings.dynamic_animations);
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a document from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| EngineError::ConfigIo {
            context: "failed to read configuration",
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self =
            serde_json::from_str(&raw).map_err(|source| EngineError::ConfigSerialization {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        info!(
            path = %path.display(),
            config_id = %config.id,
            captions = config.captions().len(),
            "configuration loaded"
        );
        Ok(config)
    }

    /// Rejects documents whose captions, highlights or fades are malformed.
    pub fn validate(&self) -> Result<()> {
        validate_track(self.captions(), self.highlights())?;

        let animation = &self.tracks.video.animation;
        for (which, window) in [("fadeIn", animation.fade_in), ("fadeOut", animation.fade_out)] {
            let Some(window) = window else {
                continue;
            };
            let finite = window.start.is_finite() && window.duration.is_finite();
            if !finite || window.start < 0.0 || window.duration < 0.0 {
                warn!(
                    which,
                    start = window.start,
                    duration = window.duration,
                    "fade rejected"
                );
                return Err(EngineError::InvalidFade {
                    which,
                    start: window.start,
                    duration: window.duration,
                });
            }
        }
        Ok(())
    }

    pub fn captions(&self) -> &[Caption] {
        &self.tracks.text.captions
    }

    pub fn highlights(&self) -> &[Highlight] {
        &self.tracks.text.highlights
    }

    /// Returns the caption shown at `t`, if any.
    pub fn active_caption(&self, t: f64) -> Option<&Caption> {
        find_active_caption(self.captions(), t).map(|index| &self.captions()[index])
    }

    /// Document length in seconds: the timeline end, else the declared duration,
    /// else the end of the last caption.
    pub fn duration(&self) -> f64 {
        self.timeline
            .map(|timeline| timeline.end)
            .or_else(|| self.meta.as_ref().and_then(|meta| meta.duration))
            .or_else(|| self.captions().last().map(|caption| caption.end))
            .unwrap_or(0.0)
    }

    /// Creates an immutable summary for hosts.
    pub fn summary(&self) -> ConfigSummary {
        let animation = &self.tracks.text.animation;
        ConfigSummary {
            id: self.id.clone(),
            duration: self.duration(),
            caption_count: self.captions().len(),
            highlight_count: self.highlights().len(),
            entry_preset: animation.entry.preset_id.clone(),
            exit_preset: animation.exit.preset_id.clone(),
            highlight_preset: animation.highlight.preset_id.clone(),
            video_preset: self.tracks.video.animation.preset_id.clone(),
            settings: self.settings,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use super::{Anchor, AnimationSlot, GlobalStyle, VideoConfig};
    use crate::error::EngineError;

    fn fixture_path() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/sample_config.json")
    }

    const MINIMAL: &str = r#"{
        "id": "minimal",
        "tracks": {
            "text": {
                "captions": [
                    { "id": "a", "text": "one two", "start": 0.0, "end": 1.0 },
                    { "id": "b", "text": "three", "start": 1.0, "end": 2.0 }
                ],
                "highlights": [
                    { "captionId": "a", "wordStartIndex": 1, "wordEndIndex": 1 }
                ]
            }
        }
    }"#;

    #[test]
    fn minimal_document_fills_defaults() {
        let config = VideoConfig::from_json_str(MINIMAL).expect("minimal document parses");

        assert_eq!(config.tracks.text.global_style, GlobalStyle::default());
        assert_eq!(config.tracks.text.animation.entry, AnimationSlot::new("none", None));
        assert_eq!(config.tracks.video.animation.preset_id, "none");
        assert!(config.settings.highlight_keywords);
        assert!(config.settings.outro_fade_out);
        assert_eq!(config.duration(), 2.0);
    }

    #[test]
    fn sample_fixture_loads_and_summarizes() {
        let config = VideoConfig::load(&fixture_path()).expect("fixture should load");
        let summary = config.summary();

        assert_eq!(summary.id, "test-project-id");
        assert_eq!(summary.caption_count, 17);
        assert_eq!(summary.highlight_count, 10);
        assert_eq!(summary.entry_preset, "slide_up_fade");
        assert_eq!(summary.video_preset, "fade_in_out");
        assert_eq!(summary.duration, 20.8);
        assert_eq!(
            config.tracks.text.animation.highlight,
            AnimationSlot::new("none", Some(0.4))
        );
        assert_eq!(config.tracks.text.global_style.position.anchor, Anchor::BottomCenter);
        assert_eq!(config.tracks.text.global_style.padding_px(), [12.0, 16.0]);
    }

    #[test]
    fn unknown_anchor_is_tolerated() {
        let json = MINIMAL.replace(
            r#""captions""#,
            r#""globalStyle": { "position": { "anchor": "left_edge", "offsetY": 10 } }, "captions""#,
        );
        let config = VideoConfig::from_json_str(&json).expect("unknown anchor parses");
        assert_eq!(config.tracks.text.global_style.position.anchor, Anchor::Unknown);
    }

    #[test]
    fn active_caption_follows_half_open_ranges() {
        let config = VideoConfig::from_json_str(MINIMAL).expect("minimal document parses");
        assert_eq!(config.active_caption(0.5).map(|c| c.id.as_str()), Some("a"));
        assert_eq!(config.active_caption(1.0).map(|c| c.id.as_str()), Some("b"));
        assert_eq!(config.active_caption(2.0).map(|c| c.id.as_str()), Some("b"));
        assert!(config.active_caption(2.01).is_none());
    }

    #[test]
    fn overlapping_captions_are_rejected_at_load() {
        let json = MINIMAL.replace(r#""start": 1.0"#, r#""start": 0.5"#);
        assert!(matches!(
            VideoConfig::from_json_str(&json),
            Err(EngineError::OverlappingCaptions { .. })
        ));
    }

    #[test]
    fn negative_fade_is_rejected() {
        let json = MINIMAL.replace(
            r#""text": {"#,
            r#""video": { "animation": { "presetId": "fade_in", "fadeIn": { "start": 0, "duration": -1 } } }, "text": {"#,
        );
        assert!(matches!(
            VideoConfig::from_json_str(&json),
            Err(EngineError::InvalidFade { which: "fadeIn", .. })
        ));
    }

    #[test]
    fn malformed_json_maps_to_parse_error() {
        assert!(matches!(
            VideoConfig::from_json_str("{ not json"),
            Err(EngineError::ConfigParse(_))
        ));
    }

    #[test]
    fn missing_file_maps_to_io_error() {
        let missing = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/missing.json");
        let error = VideoConfig::load(&missing).expect_err("missing file must fail");
        assert!(matches!(error, EngineError::ConfigIo { .. }));
        assert!(error.to_string().contains("failed to read configuration"));
    }
}
