//! Frame composition: one pure function from `(config, t)` to the styled caption.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{Anchor, GlobalStyle, HighlightStyle, Position, VideoConfig};
use crate::interpolate::{TextMetrics, compute_highlight_style, compute_style};
use crate::phase::{
    DEFAULT_HIGHLIGHT_DURATION, Phase, PhaseState, calculate_phase, resolve_duration,
};
use crate::preset::{PresetKind, PresetRegistry};
use crate::segment::{WordSegment, segment_words};
use crate::style::{
    AnimationStyle, ContainerStyle, Placement, SegmentStyle, Transform, TransformOp, blend_colors,
};
use crate::time::clamp_unit;
use crate::timeline::{Caption, find_active_caption, highlight_ranges};

/// Gap between adjacent segments, in `em`.
pub const SEGMENT_GAP_EM: f64 = 0.3;

/// Host-supplied inputs that are not part of the document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderOptions {
    /// Text box used to resolve relative distances.
    pub metrics: TextMetrics,
}

/// Fully styled caption for one instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptionFrame {
    pub caption_id: String,
    pub phase: PhaseState,
    pub container: ContainerStyle,
    pub segments: Vec<RenderedSegment>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedSegment {
    #[serde(flatten)]
    pub segment: WordSegment,
    pub style: SegmentStyle,
}

impl CaptionFrame {
    /// Segment texts in display order.
    pub fn texts(&self) -> Vec<&str> {
        self.segments
            .iter()
            .map(|rendered| rendered.segment.text.as_str())
            .collect()
    }
}

/// Renders the caption active at `t`, or `None` when no caption is active.
///
/// # Example
/// ```
/// use caption_engine::{Phase, RenderOptions, VideoConfig, render_frame};
///
/// let config = VideoConfig::from_json_str(
///     r#"{
///         "id": "demo",
///         "tracks": { "text": {
///             "animation": { "entry": { "presetId": "fade_in", "duration": 0.2 } },
///             "captions": [
///                 { "id": "c1", "text": "The age between 16 to", "start": 0.08, "end": 1.28 }
///             ],
///             "highlights": [ { "captionId": "c1", "wordStartIndex": 1, "wordEndIndex": 2 } ]
///         } }
///     }"#,
/// )
/// .expect("document is valid");
///
/// let frame = render_frame(&config, 0.5, &RenderOptions::default()).expect("caption active");
/// assert_eq!(frame.phase.phase, Phase::Visible);
/// assert_eq!(frame.texts(), ["The", "age between", "16", "to"]);
/// assert!(render_frame(&config, 2.0, &RenderOptions::default()).is_none());
/// ```
pub fn render_frame(config: &VideoConfig, t: f64, options: &RenderOptions) -> Option<CaptionFrame> {
    let text = &config.tracks.text;
    let caption = &text.captions[find_active_caption(&text.captions, t)?];
    let registry = PresetRegistry::builtin();
    let settings = config.settings;

    let (phase, animation) = if settings.dynamic_animations {
        let phase = calculate_phase(
            caption.range(),
            t,
            &text.animation.entry,
            &text.animation.exit,
            registry,
        );
        let slot = match phase.phase {
            Phase::Entry => Some((PresetKind::Entry, &text.animation.entry)),
            Phase::Exit => Some((PresetKind::Exit, &text.animation.exit)),
            Phase::Visible => None,
        };
        let animation = slot
            .and_then(|(kind, slot)| {
                let preset = registry.get(kind, &slot.preset_id);
                if preset.is_none() {
                    debug!(kind = kind.as_str(), preset_id = %slot.preset_id, "preset not found");
                }
                preset
            })
            .map(|preset| compute_style(preset, phase.progress, options.metrics))
            .unwrap_or_default();
        (phase, animation)
    } else {
        (PhaseState::VISIBLE, AnimationStyle::default())
    };

    let ranges = if settings.highlight_keywords {
        highlight_ranges(&text.highlights, &caption.id)
    } else {
        Vec::new()
    };
    let segments = segment_words(&caption.text, &ranges);

    let highlight_animation = if settings.dynamic_animations {
        highlight_animation(config, caption, t, options.metrics)
    } else {
        AnimationStyle::default()
    };

    let last = segments.len().saturating_sub(1);
    let segments = segments
        .into_iter()
        .enumerate()
        .map(|(index, segment)| {
            let style = segment_style(
                &segment,
                index == last,
                &text.global_style,
                &text.highlight_style,
                &highlight_animation,
            );
            RenderedSegment { segment, style }
        })
        .collect();

    debug!(
        t,
        caption_id = %caption.id,
        phase = ?phase.phase,
        progress = phase.progress,
        "frame rendered"
    );

    Some(CaptionFrame {
        caption_id: caption.id.clone(),
        phase,
        container: container_style(&text.global_style, &animation),
        segments,
    })
}

/// Positions the container according to its anchor. Unknown anchors get no placement.
pub fn placement(position: &Position) -> Placement {
    let offset = format!("{}px", position.offset_y.abs());
    match position.anchor {
        Anchor::BottomCenter => Placement {
            bottom: Some(offset),
            left: Some("50%".to_owned()),
            transform: Transform::from(vec![TransformOp::TranslateXPercent(-50.0)]),
            ..Placement::default()
        },
        Anchor::TopCenter => Placement {
            top: Some(offset),
            left: Some("50%".to_owned()),
            transform: Transform::from(vec![TransformOp::TranslateXPercent(-50.0)]),
            ..Placement::default()
        },
        Anchor::Center => Placement {
            top: Some("50%".to_owned()),
            left: Some("50%".to_owned()),
            transform: Transform::from(vec![TransformOp::TranslatePercent(-50.0, -50.0)]),
            ..Placement::default()
        },
        Anchor::Unknown => Placement::default(),
    }
}

fn container_style(global: &GlobalStyle, animation: &AnimationStyle) -> ContainerStyle {
    let placement = placement(&global.position);
    let transform = placement.transform.then(&animation.transform);
    ContainerStyle {
        font_family: global.font_family.clone(),
        font_size_px: global.font_size,
        font_weight: global.font_weight,
        color: global.color.clone(),
        background: global.background.clone(),
        padding_px: global.padding_px(),
        border_radius_px: global.border_radius,
        placement,
        opacity: animation.opacity,
        transform,
    }
}

/// Highlight animation for the active caption, sampled from its start.
fn highlight_animation(
    config: &VideoConfig,
    caption: &Caption,
    t: f64,
    metrics: TextMetrics,
) -> AnimationStyle {
    let registry = PresetRegistry::builtin();
    let slot = &config.tracks.text.animation.highlight;
    let Some(preset) = registry.get(PresetKind::Highlight, &slot.preset_id) else {
        debug!(preset_id = %slot.preset_id, "highlight preset not found");
        return AnimationStyle::default();
    };
    let duration = resolve_duration(
        slot,
        PresetKind::Highlight,
        registry,
        DEFAULT_HIGHLIGHT_DURATION,
    );
    let progress = if duration > 0.0 {
        clamp_unit((t - caption.start) / duration)
    } else {
        1.0
    };
    compute_highlight_style(preset, duration, progress, metrics)
}

fn segment_style(
    segment: &WordSegment,
    is_last: bool,
    global: &GlobalStyle,
    highlight: &HighlightStyle,
    animation: &AnimationStyle,
) -> SegmentStyle {
    let margin_right_em = if is_last { 0.0 } else { SEGMENT_GAP_EM };
    if !segment.is_highlighted {
        return SegmentStyle {
            margin_right_em,
            ..SegmentStyle::default()
        };
    }

    let color = match animation.color_blend {
        Some(amount) => blend_colors(&global.color, &highlight.color, amount),
        None => highlight.color.clone(),
    };
    let base = Transform::from(vec![TransformOp::Scale(highlight.scale)]);
    SegmentStyle {
        color: Some(color),
        font_weight: Some(highlight.font_weight),
        opacity: animation.opacity,
        transform: base.then(&animation.transform),
        animation: animation.looping.clone(),
        margin_right_em,
    }
}
