use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Result type used by the engine crate.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors produced while loading configuration documents and handling engine commands.
///
/// Per-frame evaluation never fails; these only surface at the document boundary.
#[derive(Debug)]
pub enum EngineError {
    ConfigNotLoaded,
    ConfigIo {
        context: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },
    ConfigSerialization {
        path: PathBuf,
        source: serde_json::Error,
    },
    ConfigParse(serde_json::Error),
    InvalidCaptionRange {
        caption_id: String,
        start: f64,
        end: f64,
    },
    DuplicateCaptionId {
        caption_id: String,
    },
    OverlappingCaptions {
        previous_id: String,
        next_id: String,
    },
    UnknownHighlightCaption {
        caption_id: String,
    },
    InvalidHighlightRange {
        caption_id: String,
        word_start: usize,
        word_end: usize,
    },
    HighlightOutOfBounds {
        caption_id: String,
        word_end: usize,
        word_count: usize,
    },
    OverlappingHighlights {
        caption_id: String,
        word_index: usize,
    },
    InvalidFade {
        which: &'static str,
        start: f64,
        duration: f64,
    },
}

impl Display for EngineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ConfigNotLoaded => write!(f, "video configuration is not loaded"),
            Self::ConfigIo {
                context,
                path,
                source,
            } => write!(f, "{context}: {} ({source})", path.display()),
            Self::ConfigSerialization { path, source } => write!(
                f,
                "configuration deserialization failed at {} ({source})",
                path.display()
            ),
            Self::ConfigParse(source) => {
                write!(f, "configuration deserialization failed ({source})")
            }
            Self::InvalidCaptionRange {
                caption_id,
                start,
                end,
            } => write!(
                f,
                "invalid time range in caption {caption_id}: {start}..{end}"
            ),
            Self::DuplicateCaptionId { caption_id } => {
                write!(f, "duplicate caption id: {caption_id}")
            }
            Self::OverlappingCaptions {
                previous_id,
                next_id,
            } => write!(
                f,
                "caption {next_id} starts before caption {previous_id} ends"
            ),
            Self::UnknownHighlightCaption { caption_id } => {
                write!(f, "highlight references unknown caption: {caption_id}")
            }
            Self::InvalidHighlightRange {
                caption_id,
                word_start,
                word_end,
            } => write!(
                f,
                "invalid highlight range in caption {caption_id}: {word_start}..={word_end}"
            ),
            Self::HighlightOutOfBounds {
                caption_id,
                word_end,
                word_count,
            } => write!(
                f,
                "highlight in caption {caption_id} ends at word {word_end} but the caption has {word_count} words"
            ),
            Self::OverlappingHighlights {
                caption_id,
                word_index,
            } => write!(
                f,
                "overlapping highlights in caption {caption_id} at word {word_index}"
            ),
            Self::InvalidFade {
                which,
                start,
                duration,
            } => write!(f, "invalid video {which}: start {start}, duration {duration}"),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ConfigIo { source, .. } => Some(source),
            Self::ConfigSerialization { source, .. } => Some(source),
            Self::ConfigParse(source) => Some(source),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(value: serde_json::Error) -> Self {
        Self::ConfigParse(value)
    }
}
