use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{EngineError, Result};
use crate::segment::{WordRange, split_words};
use crate::time::TimeRange;

/// Opaque identifier for captions.
pub type CaptionId = String;

/// One timed caption line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Caption {
    pub id: CaptionId,
    pub text: String,
    pub start: f64,
    pub end: f64,
    #[serde(default)]
    pub word_count: usize,
    #[serde(default)]
    pub duration_ms: u64,
}

/// Inclusive word span of a caption rendered with the highlight style.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Highlight {
    pub caption_id: CaptionId,
    pub word_start_index: usize,
    pub word_end_index: usize,
}

impl Caption {
    pub fn range(&self) -> TimeRange {
        TimeRange::new(self.start, self.end)
    }

    /// Number of words in the single-space index space highlights refer to.
    pub fn words_len(&self) -> usize {
        split_words(&self.text).len()
    }
}

impl Highlight {
    pub fn word_range(&self) -> WordRange {
        WordRange::new(self.word_start_index, self.word_end_index)
    }
}

/// Finds the caption index active at `t`.
///
/// Captions are half-open (`start <= t < end`) so the later of two adjacent captions
/// wins at their shared boundary. The last caption also includes its end, and a
/// zero-length caption is active at its single instant. The first match in list order
/// wins for documents that were never validated.
///
/// # Example
/// ```
/// use caption_engine::timeline::{Caption, find_active_caption};
///
/// let caption = |id: &str, start: f64, end: f64| Caption {
///     id: id.to_owned(),
///     text: "word".to_owned(),
///     start,
///     end,
///     word_count: 1,
///     duration_ms: 0,
/// };
/// let captions = vec![caption("a", 0.0, 1.0), caption("b", 1.0, 2.0)];
///
/// assert_eq!(find_active_caption(&captions, 1.0), Some(1));
/// assert_eq!(find_active_caption(&captions, 2.0), Some(1));
/// assert_eq!(find_active_caption(&captions, 2.5), None);
/// ```
pub fn find_active_caption(captions: &[Caption], t: f64) -> Option<usize> {
    let last = captions.len().checked_sub(1)?;
    captions.iter().enumerate().position(|(index, caption)| {
        let range = caption.range();
        if index == last || range.duration() == 0.0 {
            range.contains_inclusive(t)
        } else {
            range.contains(t)
        }
    })
}

/// Word ranges of every highlight attached to `caption_id`, in document order.
pub fn highlight_ranges(highlights: &[Highlight], caption_id: &str) -> Vec<WordRange> {
    highlights
        .iter()
        .filter(|highlight| highlight.caption_id == caption_id)
        .map(Highlight::word_range)
        .collect()
}

/// Checks that captions are well-formed, sorted and non-overlapping, and that every
/// highlight targets an existing caption with an in-bounds, non-overlapping range.
pub fn validate_track(captions: &[Caption], highlights: &[Highlight]) -> Result<()> {
    let mut ids = HashSet::with_capacity(captions.len());
    for caption in captions {
        let finite = caption.start.is_finite() && caption.end.is_finite();
        if !finite || caption.end < caption.start {
            warn!(
                caption_id = %caption.id,
                start = caption.start,
                end = caption.end,
                "caption rejected: invalid range"
            );
            return Err(EngineError::InvalidCaptionRange {
                caption_id: caption.id.clone(),
                start: caption.start,
                end: caption.end,
            });
        }
        if !ids.insert(caption.id.as_str()) {
            warn!(caption_id = %caption.id, "caption rejected: duplicate id");
            return Err(EngineError::DuplicateCaptionId {
                caption_id: caption.id.clone(),
            });
        }
    }

    for pair in captions.windows(2) {
        let (previous, next) = (&pair[0], &pair[1]);
        if next.start < previous.end {
            warn!(
                previous_id = %previous.id,
                next_id = %next.id,
                previous_end = previous.end,
                next_start = next.start,
                "caption rejected: overlaps previous caption"
            );
            return Err(EngineError::OverlappingCaptions {
                previous_id: previous.id.clone(),
                next_id: next.id.clone(),
            });
        }
    }

    for caption in captions {
        validate_highlights_of(caption, highlights)?;
    }

    if let Some(orphan) = highlights
        .iter()
        .find(|highlight| !ids.contains(highlight.caption_id.as_str()))
    {
        warn!(caption_id = %orphan.caption_id, "highlight rejected: unknown caption");
        return Err(EngineError::UnknownHighlightCaption {
            caption_id: orphan.caption_id.clone(),
        });
    }

    debug!(
        caption_count = captions.len(),
        highlight_count = highlights.len(),
        "caption track validated"
    );
    Ok(())
}

fn validate_highlights_of(caption: &Caption, highlights: &[Highlight]) -> Result<()> {
    let word_count = caption.words_len();
    let mut covered = vec![false; word_count];

    for range in highlight_ranges(highlights, &caption.id) {
        if range.start > range.end {
            return Err(EngineError::InvalidHighlightRange {
                caption_id: caption.id.clone(),
                word_start: range.start,
                word_end: range.end,
            });
        }
        if range.end >= word_count {
            return Err(EngineError::HighlightOutOfBounds {
                caption_id: caption.id.clone(),
                word_end: range.end,
                word_count,
            });
        }
        for (word_index, slot) in covered
            .iter_mut()
            .enumerate()
            .take(range.end + 1)
            .skip(range.start)
        {
            if *slot {
                return Err(EngineError::OverlappingHighlights {
                    caption_id: caption.id.clone(),
                    word_index,
                });
            }
            *slot = true;
        }
    }

    Ok(())
}
