use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::preset::{AnimatedProperty, PresetKind, PropertyValue, ResolvedPreset, TextDimension};
use crate::style::{AnimationStyle, LoopingAnimation, Transform, TransformOp};

/// Dimensions of the rendered caption text box, used to resolve relative distances.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextMetrics {
    pub width: f64,
    pub height: f64,
}

impl TextMetrics {
    /// Fallback box for hosts that cannot measure text: 200px wide, 50px tall.
    pub const APPROXIMATE: Self = Self {
        width: 200.0,
        height: 50.0,
    };

    pub fn dimension(&self, dimension: TextDimension) -> f64 {
        match dimension {
            TextDimension::TextWidth => self.width,
            TextDimension::TextHeight => self.height,
        }
    }
}

impl Default for TextMetrics {
    fn default() -> Self {
        Self::APPROXIMATE
    }
}

/// Linear interpolation that returns `from` and `to` exactly at `t = 0` and `t = 1`.
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from * (1.0 - t) + to * t
}

/// Samples a keyframe list at `t`, splitting `[0, 1]` into equal segments.
///
/// Returns `None` for lists shorter than two values.
///
/// # Example
/// ```
/// use caption_engine::sample_keyframes;
///
/// let keyframes = [0.9, 1.08, 1.0];
/// assert_eq!(sample_keyframes(&keyframes, 0.0), Some(0.9));
/// assert_eq!(sample_keyframes(&keyframes, 0.5), Some(1.08));
/// assert_eq!(sample_keyframes(&keyframes, 1.0), Some(1.0));
/// ```
pub fn sample_keyframes(keyframes: &[f64], t: f64) -> Option<f64> {
    if keyframes.len() < 2 {
        return None;
    }
    let t = crate::time::clamp_unit(t);
    let segments = keyframes.len() - 1;
    let scaled = t * segments as f64;
    let index = (scaled.floor() as usize).min(segments - 1);
    let local = scaled - index as f64;
    Some(lerp(keyframes[index], keyframes[index + 1], local))
}

/// Samples every declared property of `preset` at `progress`.
///
/// Easing is applied once, before interpolation. Transform components compose as
/// scale, then translateY, then translateX. A preset with no properties yields an
/// empty style.
pub fn compute_style(
    preset: ResolvedPreset<'_>,
    progress: f64,
    metrics: TextMetrics,
) -> AnimationStyle {
    let eased = preset.easing().apply(progress);
    let properties = preset.properties();
    let kind = preset.preset.kind;
    let mut style = AnimationStyle::default();

    if let Some(opacity) = &properties.opacity {
        let (default_from, default_to) = if kind == PresetKind::Exit {
            (1.0, 0.0)
        } else {
            (0.0, 1.0)
        };
        style.opacity = Some(sample_scalar(
            opacity,
            default_from,
            default_to,
            eased,
            metrics,
        ));
    }

    let mut transform = Transform::new();
    if let Some(scale) = &properties.scale {
        let value = match scale.usable_keyframes() {
            Some(keyframes) => sample_keyframes(keyframes, eased).unwrap_or(1.0),
            None => sample_scalar(scale, 1.0, 1.0, eased, metrics),
        };
        transform.push(TransformOp::Scale(value));
    }
    if let Some(translate_y) = &properties.translate_y {
        let value = sample_scalar(translate_y, 0.0, 0.0, eased, metrics);
        transform.push(TransformOp::TranslateY(value));
    }
    if let Some(translate_x) = &properties.translate_x {
        let value = sample_scalar(translate_x, 0.0, 0.0, eased, metrics);
        transform.push(TransformOp::TranslateX(value));
    }
    style.transform = transform;

    if let Some(blend) = &properties.color_blend {
        style.color_blend = Some(sample_scalar(blend, 0.0, 1.0, eased, metrics));
    }

    style
}

/// Computes the highlight animation for a highlighted segment.
///
/// Oscillating presets hand their timing to the host as a [`LoopingAnimation`] with
/// period `duration`; other presets are sampled at `progress` like entry presets.
pub fn compute_highlight_style(
    preset: ResolvedPreset<'_>,
    duration: f64,
    progress: f64,
    metrics: TextMetrics,
) -> AnimationStyle {
    if preset.properties().is_empty() {
        return AnimationStyle::default();
    }
    if preset.is_oscillating() {
        debug!(preset_id = preset.id(), duration, "highlight delegated to host loop");
        return AnimationStyle {
            looping: Some(LoopingAnimation {
                name: keyframes_name(preset.id()),
                period_secs: duration,
            }),
            ..AnimationStyle::default()
        };
    }
    compute_style(preset, progress, metrics)
}

/// Name of the `@keyframes` block backing an oscillating highlight preset.
pub fn keyframes_name(preset_id: &str) -> String {
    format!("highlight-{preset_id}")
}

/// Resolves one endpoint to a number, using `fallback` for missing or symbolic values.
pub fn resolve_value(value: Option<&PropertyValue>, fallback: f64, metrics: TextMetrics) -> f64 {
    match value {
        Some(PropertyValue::Number(number)) => *number,
        Some(PropertyValue::Relative { factor, dimension }) => {
            factor * metrics.dimension(*dimension)
        }
        Some(PropertyValue::Token(token)) => match token.as_str() {
            "base" => 0.0,
            "highlight" => 1.0,
            _ => fallback,
        },
        None => fallback,
    }
}

fn sample_scalar(
    property: &AnimatedProperty,
    default_from: f64,
    default_to: f64,
    eased: f64,
    metrics: TextMetrics,
) -> f64 {
    let from = resolve_value(property.from.as_ref(), default_from, metrics);
    let to = resolve_value(property.to.as_ref(), default_to, metrics);
    lerp(from, to, eased)
}

#[cfg(test)]
mod tests {
    use super::{TextMetrics, compute_highlight_style, compute_style, sample_keyframes};
    use crate::preset::{PresetKind, PresetRegistry};
    use crate::style::TransformOp;

    fn preset(kind: PresetKind, id: &str) -> crate::preset::ResolvedPreset<'static> {
        PresetRegistry::builtin()
            .get(kind, id)
            .expect("built-in preset exists")
    }

    #[test]
    fn fade_in_at_half_progress_is_eased_out_to_three_quarters() {
        let fade_in = preset(PresetKind::Entry, "fade_in");
        let style = compute_style(fade_in, 0.5, TextMetrics::APPROXIMATE);
        assert_eq!(style.opacity, Some(0.75));
        assert!(style.transform.is_empty());
    }

    #[test]
    fn boundaries_yield_from_and_to_values() {
        let metrics = TextMetrics::APPROXIMATE;
        let start = compute_style(preset(PresetKind::Entry, "slide_up_fade"), 0.0, metrics);
        assert_eq!(start.opacity, Some(0.0));
        assert_eq!(start.transform.ops(), &[TransformOp::TranslateY(30.0)]);

        let end = compute_style(preset(PresetKind::Entry, "slide_up_fade"), 1.0, metrics);
        assert_eq!(end.opacity, Some(1.0));
        assert_eq!(end.transform.ops(), &[TransformOp::TranslateY(0.0)]);

        let exit_end = compute_style(preset(PresetKind::Exit, "pop_out"), 1.0, metrics);
        assert_eq!(exit_end.opacity, Some(0.0));
        assert_eq!(exit_end.transform.ops(), &[TransformOp::Scale(0.85)]);
    }

    #[test]
    fn relative_distances_resolve_against_supplied_metrics() {
        let measured = TextMetrics {
            width: 320.0,
            height: 40.0,
        };
        let style = compute_style(preset(PresetKind::Exit, "slide_left_out"), 1.0, measured);
        let TransformOp::TranslateX(px) = style.transform.ops()[0] else {
            panic!("slide_left_out must translate horizontally");
        };
        assert!((px + 192.0).abs() < 1e-9);
    }

    #[test]
    fn scale_precedes_translation_in_composed_transform() {
        let pop_in = preset(PresetKind::Entry, "pop_in");
        let mut style = compute_style(pop_in, 0.0, TextMetrics::APPROXIMATE);
        style.transform.push(TransformOp::TranslateY(1.0));
        assert_eq!(style.transform.to_string(), "scale(0.85) translateY(1px)");
    }

    #[test]
    fn keyframes_override_from_to_for_scale() {
        let metrics = TextMetrics::APPROXIMATE;
        let bounce = preset(PresetKind::Entry, "bounce_in");
        // easeOut(t) = 0.5 at t = 1 - sqrt(0.5)
        let half = 1.0 - 0.5_f64.sqrt();
        let style = compute_style(bounce, half, metrics);
        let TransformOp::Scale(scale) = style.transform.ops()[0] else {
            panic!("bounce_in must scale");
        };
        assert!((scale - 1.08).abs() < 1e-9);

        let end = compute_style(bounce, 1.0, metrics);
        assert_eq!(end.transform.ops(), &[TransformOp::Scale(1.0)]);
    }

    #[test]
    fn keyframe_sampling_hits_every_stored_value() {
        assert_eq!(sample_keyframes(&[1.0, 1.18, 1.0], 0.5), Some(1.18));
        assert_eq!(sample_keyframes(&[2.0, 4.0], 0.25), Some(2.5));
        assert_eq!(sample_keyframes(&[3.0], 0.5), None);
    }

    #[test]
    fn empty_preset_yields_empty_style() {
        let none = preset(PresetKind::Highlight, "none");
        assert!(compute_style(none, 0.3, TextMetrics::APPROXIMATE).is_empty());
        let highlight = compute_highlight_style(none, 0.4, 0.3, TextMetrics::APPROXIMATE);
        assert!(highlight.is_empty());
    }

    #[test]
    fn oscillating_highlight_is_delegated_to_host_loop() {
        let style = compute_highlight_style(
            preset(PresetKind::Highlight, "pulse_fade"),
            0.4,
            0.1,
            TextMetrics::APPROXIMATE,
        );
        let looping = style.looping.expect("pulse_fade loops");
        assert_eq!(looping.name, "highlight-pulse_fade");
        assert_eq!(looping.period_secs, 0.4);
        assert!(style.opacity.is_none());
        assert!(style.transform.is_empty());
    }

    #[test]
    fn color_emphasis_samples_blend_factor() {
        let style = compute_highlight_style(
            preset(PresetKind::Highlight, "color_emphasis"),
            0.25,
            1.0,
            TextMetrics::APPROXIMATE,
        );
        assert_eq!(style.color_blend, Some(1.0));
        assert!(style.looping.is_none());
    }
}
