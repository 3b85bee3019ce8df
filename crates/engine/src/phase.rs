use serde::Serialize;
use tracing::debug;

use crate::config::AnimationSlot;
use crate::preset::{PresetKind, PresetRegistry};
use crate::time::{TimeRange, clamp_unit};

/// Entry duration used when neither the document nor the preset provides one.
pub const DEFAULT_ENTRY_DURATION: f64 = 0.4;
/// Exit duration used when neither the document nor the preset provides one.
pub const DEFAULT_EXIT_DURATION: f64 = 0.25;
/// Highlight duration used when neither the document nor the preset provides one.
pub const DEFAULT_HIGHLIGHT_DURATION: f64 = 0.25;

/// Part of a caption's animated lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Entry,
    Visible,
    Exit,
}

/// Phase plus the normalized progress inside it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PhaseState {
    pub phase: Phase,
    pub progress: f64,
}

impl PhaseState {
    pub const VISIBLE: Self = Self {
        phase: Phase::Visible,
        progress: 1.0,
    };
}

/// Resolves an animation duration: document override, else preset, else `fallback`.
///
/// Negative or non-finite overrides are ignored.
pub fn resolve_duration(
    slot: &AnimationSlot,
    kind: PresetKind,
    registry: &PresetRegistry,
    fallback: f64,
) -> f64 {
    slot.duration
        .filter(|duration| duration.is_finite() && *duration >= 0.0)
        .or_else(|| {
            registry
                .get(kind, &slot.preset_id)
                .map(|preset| preset.duration())
        })
        .unwrap_or(fallback)
}

/// Classifies `t` into the entry, visible or exit phase of a caption.
///
/// Entry is checked first, so when the entry and exit windows overlap (caption
/// shorter than both durations) entry wins, including at the shared boundary.
/// Captions with a non-positive duration are always visible.
///
/// # Example
/// ```
/// use caption_engine::{AnimationSlot, Phase, PresetRegistry, TimeRange, calculate_phase};
///
/// let entry = AnimationSlot::new("fade_in", Some(0.2));
/// let exit = AnimationSlot::new("fade_out", Some(0.2));
/// let registry = PresetRegistry::builtin();
/// let caption = TimeRange::new(0.0, 1.0);
///
/// let state = calculate_phase(caption, 0.1, &entry, &exit, registry);
/// assert_eq!(state.phase, Phase::Entry);
/// assert!((state.progress - 0.5).abs() < 1e-9);
/// assert_eq!(calculate_phase(caption, 0.5, &entry, &exit, registry).phase, Phase::Visible);
/// ```
pub fn calculate_phase(
    caption: TimeRange,
    t: f64,
    entry: &AnimationSlot,
    exit: &AnimationSlot,
    registry: &PresetRegistry,
) -> PhaseState {
    let caption_duration = caption.duration();
    if !caption_duration.is_finite() || caption_duration <= 0.0 {
        return PhaseState::VISIBLE;
    }

    let raw_progress = (t - caption.start) / caption_duration;
    let entry_duration =
        resolve_duration(entry, PresetKind::Entry, registry, DEFAULT_ENTRY_DURATION);
    let exit_duration = resolve_duration(exit, PresetKind::Exit, registry, DEFAULT_EXIT_DURATION);

    let entry_phase_end = entry_duration / caption_duration;
    let exit_phase_start = 1.0 - exit_duration / caption_duration;

    let state = if raw_progress <= entry_phase_end {
        PhaseState {
            phase: Phase::Entry,
            progress: ratio_or_one(raw_progress, entry_phase_end),
        }
    } else if raw_progress >= exit_phase_start {
        PhaseState {
            phase: Phase::Exit,
            progress: ratio_or_one(raw_progress - exit_phase_start, 1.0 - exit_phase_start),
        }
    } else {
        PhaseState::VISIBLE
    };

    debug!(
        t,
        start = caption.start,
        end = caption.end,
        entry_duration,
        exit_duration,
        phase = ?state.phase,
        progress = state.progress,
        "phase calculated"
    );
    state
}

fn ratio_or_one(numerator: f64, denominator: f64) -> f64 {
    if denominator <= 0.0 {
        return 1.0;
    }
    clamp_unit(numerator / denominator)
}
