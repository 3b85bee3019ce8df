use std::path::PathBuf;

use serde::Serialize;
use tracing::{debug, info};

use crate::config::{Settings, VideoConfig};
use crate::error::{EngineError, Result};
use crate::host::{STYLESHEET_ID, StyleHost, highlight_keyframes_css};
use crate::interpolate::TextMetrics;
use crate::render::{CaptionFrame, RenderOptions, render_frame};
use crate::time::normalize_playhead;
use crate::video::video_opacity;

/// Commands accepted by the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Reads, parses and validates a configuration document from disk.
    LoadConfig {
        path: PathBuf,
    },
    /// Installs a document built or fetched by the host. It is validated first.
    SetConfig(Box<VideoConfig>),
    /// Moves the playhead to `t` seconds and renders the frame there.
    ///
    /// # Example
    /// ```
    /// use caption_engine::{Command, Engine, Event, MemoryStyleHost, VideoConfig};
    ///
    /// let config = VideoConfig::from_json_str(
    ///     r#"{ "id": "demo", "tracks": { "text": { "captions": [
    ///         { "id": "c1", "text": "hello", "start": 0.0, "end": 1.0 }
    ///     ] } } }"#,
    /// )
    /// .expect("document is valid");
    ///
    /// let mut engine = Engine::new(MemoryStyleHost::new());
    /// engine
    ///     .handle_command(Command::SetConfig(Box::new(config)))
    ///     .expect("config accepted");
    /// let events = engine
    ///     .handle_command(Command::SetPlayhead { t: 0.5 })
    ///     .expect("playhead accepted");
    /// assert!(matches!(&events[1], Event::FrameReady { frame: Some(_), .. }));
    /// ```
    SetPlayhead {
        t: f64,
    },
    /// Replaces the text box used to resolve relative distances and re-renders.
    SetTextMetrics(TextMetrics),
    /// Registers the highlight keyframes stylesheet with the host, once.
    InstallHighlightKeyframes,
    /// Removes the highlight keyframes stylesheet from the host.
    TeardownHighlightKeyframes,
}

/// Events emitted by the engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum Event {
    ConfigLoaded(ConfigSummary),
    PlayheadChanged {
        t: f64,
    },
    #[serde(rename_all = "camelCase")]
    FrameReady {
        t: f64,
        frame: Option<CaptionFrame>,
        video_opacity: f64,
    },
    HighlightKeyframesInstalled,
    HighlightKeyframesRemoved,
    Error(EngineErrorEvent),
}

/// Coarse classification of engine errors for hosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum EngineErrorKind {
    ConfigNotLoaded,
    ConfigUnreadable,
    InvalidConfig,
}

impl From<&EngineError> for EngineErrorKind {
    fn from(value: &EngineError) -> Self {
        match value {
            EngineError::ConfigNotLoaded => Self::ConfigNotLoaded,
            EngineError::ConfigIo { .. }
            | EngineError::ConfigSerialization { .. }
            | EngineError::ConfigParse(_) => Self::ConfigUnreadable,
            _ => Self::InvalidConfig,
        }
    }
}

/// User-facing error payload emitted as an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineErrorEvent {
    pub kind: EngineErrorKind,
    pub message: String,
}

impl EngineErrorEvent {
    pub fn from_error(error: &EngineError) -> Self {
        Self {
            kind: EngineErrorKind::from(error),
            message: error.to_string(),
        }
    }
}

/// Immutable description of the loaded document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigSummary {
    pub id: String,
    pub duration: f64,
    pub caption_count: usize,
    pub highlight_count: usize,
    pub entry_preset: String,
    pub exit_preset: String,
    pub highlight_preset: String,
    pub video_preset: String,
    pub settings: Settings,
}

/// Command-driven caption engine.
///
/// Holds the document, the playhead and the text metrics. Every frame is derived
/// from those three; nothing about previous frames is kept.
#[derive(Debug)]
pub struct Engine<H> {
    host: H,
    config: Option<VideoConfig>,
    playhead: f64,
    options: RenderOptions,
    keyframes_installed: bool,
}

impl<H> Engine<H>
where
    H: StyleHost,
{
    /// Creates an engine that registers stylesheets with `host`.
    pub fn new(host: H) -> Self {
        Self {
            host,
            config: None,
            playhead: 0.0,
            options: RenderOptions::default(),
            keyframes_installed: false,
        }
    }

    /// Applies one command and returns emitted events.
    pub fn handle_command(&mut self, command: Command) -> Result<Vec<Event>> {
        match command {
            Command::LoadConfig { path } => {
                let config = VideoConfig::load(&path)?;
                Ok(self.install_config(config))
            }
            Command::SetConfig(config) => {
                config.validate()?;
                Ok(self.install_config(*config))
            }
            Command::SetPlayhead { t } => self.set_playhead(t),
            Command::SetTextMetrics(metrics) => {
                self.options.metrics = metrics;
                debug!(width = metrics.width, height = metrics.height, "text metrics set");
                match self.config {
                    Some(_) => Ok(vec![self.frame_event()?]),
                    None => Ok(Vec::new()),
                }
            }
            Command::InstallHighlightKeyframes => Ok(self.install_keyframes()),
            Command::TeardownHighlightKeyframes => Ok(self.teardown_keyframes()),
        }
    }

    /// Applies one command, reporting failure as an [`Event::Error`].
    pub fn handle_command_reporting(&mut self, command: Command) -> Vec<Event> {
        self.handle_command(command)
            .unwrap_or_else(|error| vec![Event::Error(EngineErrorEvent::from_error(&error))])
    }

    pub fn config(&self) -> Option<&VideoConfig> {
        self.config.as_ref()
    }

    pub fn playhead(&self) -> f64 {
        self.playhead
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Renders the frame at the current playhead.
    pub fn current_frame(&self) -> Result<Option<CaptionFrame>> {
        let config = self.config.as_ref().ok_or(EngineError::ConfigNotLoaded)?;
        Ok(render_frame(config, self.playhead, &self.options))
    }

    fn install_config(&mut self, config: VideoConfig) -> Vec<Event> {
        let summary = config.summary();
        info!(
            config_id = %summary.id,
            captions = summary.caption_count,
            highlights = summary.highlight_count,
            "configuration installed"
        );
        self.config = Some(config);
        self.playhead = 0.0;

        vec![
            Event::ConfigLoaded(summary),
            Event::PlayheadChanged { t: 0.0 },
        ]
    }

    fn set_playhead(&mut self, t: f64) -> Result<Vec<Event>> {
        if self.config.is_none() {
            return Err(EngineError::ConfigNotLoaded);
        }
        let normalized = normalize_playhead(t);
        if normalized != t {
            debug!(requested = t, normalized, "playhead normalized");
        }
        self.playhead = normalized;

        Ok(vec![
            Event::PlayheadChanged { t: normalized },
            self.frame_event()?,
        ])
    }

    fn frame_event(&self) -> Result<Event> {
        let config = self.config.as_ref().ok_or(EngineError::ConfigNotLoaded)?;
        Ok(Event::FrameReady {
            t: self.playhead,
            frame: render_frame(config, self.playhead, &self.options),
            video_opacity: video_opacity(config, self.playhead),
        })
    }

    fn install_keyframes(&mut self) -> Vec<Event> {
        if self.keyframes_installed || self.host.has_stylesheet(STYLESHEET_ID) {
            debug!(id = STYLESHEET_ID, "highlight keyframes already installed");
            return Vec::new();
        }
        self.host
            .insert_stylesheet(STYLESHEET_ID, &highlight_keyframes_css());
        self.keyframes_installed = true;
        info!(id = STYLESHEET_ID, "highlight keyframes installed");
        vec![Event::HighlightKeyframesInstalled]
    }

    fn teardown_keyframes(&mut self) -> Vec<Event> {
        if !self.keyframes_installed {
            return Vec::new();
        }
        self.host.remove_stylesheet(STYLESHEET_ID);
        self.keyframes_installed = false;
        info!(id = STYLESHEET_ID, "highlight keyframes removed");
        vec![Event::HighlightKeyframesRemoved]
    }
}
