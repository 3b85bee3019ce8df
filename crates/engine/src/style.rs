//! Renderer-facing style values produced by the engine.
//!
//! Styles are plain data. `to_css()` helpers render them as inline CSS declarations
//! for hosts that draw captions with a DOM or a CSS-compatible layout engine.

use std::fmt::{Display, Formatter, Write as _};

use serde::{Serialize, Serializer};

/// One component of a composed 2D transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "op", content = "value", rename_all = "camelCase")]
pub enum TransformOp {
    Scale(f64),
    /// Vertical translation in pixels.
    TranslateY(f64),
    /// Horizontal translation in pixels.
    TranslateX(f64),
    /// Horizontal translation as a percentage of the element's own width.
    TranslateXPercent(f64),
    /// Translation as percentages of the element's own width and height.
    TranslatePercent(f64, f64),
}

impl Display for TransformOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Scale(value) => write!(f, "scale({value})"),
            Self::TranslateY(px) => write!(f, "translateY({px}px)"),
            Self::TranslateX(px) => write!(f, "translateX({px}px)"),
            Self::TranslateXPercent(pct) => write!(f, "translateX({pct}%)"),
            Self::TranslatePercent(x, y) => write!(f, "translate({x}%, {y}%)"),
        }
    }
}

/// Ordered transform components. Composition is order-sensitive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transform(Vec<TransformOp>);

impl Transform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, op: TransformOp) {
        self.0.push(op);
    }

    pub fn ops(&self) -> &[TransformOp] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns `self` followed by `other`.
    pub fn then(&self, other: &Transform) -> Transform {
        let mut ops = self.0.clone();
        ops.extend_from_slice(&other.0);
        Transform(ops)
    }
}

impl From<Vec<TransformOp>> for Transform {
    fn from(ops: Vec<TransformOp>) -> Self {
        Self(ops)
    }
}

impl Display for Transform {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (index, op) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_char(' ')?;
            }
            write!(f, "{op}")?;
        }
        Ok(())
    }
}

impl Serialize for Transform {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A looping alternate animation whose timing is owned by the host renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoopingAnimation {
    /// Name of the `@keyframes` block the host must have registered.
    pub name: String,
    /// Length of one half-cycle; direction alternates every period.
    pub period_secs: f64,
}

impl LoopingAnimation {
    /// CSS `animation` shorthand value.
    ///
    /// # Example
    /// ```
    /// use caption_engine::LoopingAnimation;
    ///
    /// let looping = LoopingAnimation { name: "highlight-pulse".into(), period_secs: 0.4 };
    /// assert_eq!(looping.css(), "highlight-pulse 0.4s ease-in-out infinite alternate");
    /// ```
    pub fn css(&self) -> String {
        format!(
            "{} {}s ease-in-out infinite alternate",
            self.name, self.period_secs
        )
    }
}

/// Style derived from sampling a preset at one instant.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Transform::is_empty")]
    pub transform: Transform,
    /// Blend factor from the base text colour (0) to the highlight colour (1).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_blend: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub looping: Option<LoopingAnimation>,
}

impl AnimationStyle {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Absolute placement of the caption container inside the video frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<String>,
    #[serde(skip_serializing_if = "Transform::is_empty")]
    pub transform: Transform,
}

/// Style of the element wrapping every segment of the active caption.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerStyle {
    pub font_family: String,
    pub font_size_px: f64,
    pub font_weight: u32,
    pub color: String,
    pub background: String,
    /// Vertical and horizontal padding in pixels.
    pub padding_px: [f64; 2],
    pub border_radius_px: f64,
    pub placement: Placement,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    /// Placement transform followed by the entry/exit animation transform.
    #[serde(skip_serializing_if = "Transform::is_empty")]
    pub transform: Transform,
}

impl ContainerStyle {
    /// Renders the style as inline CSS declarations.
    pub fn to_css(&self) -> String {
        let mut css = String::new();
        push_decl(&mut css, "position", "absolute");
        push_decl(&mut css, "z-index", "10");
        if let Some(top) = &self.placement.top {
            push_decl(&mut css, "top", top);
        }
        if let Some(bottom) = &self.placement.bottom {
            push_decl(&mut css, "bottom", bottom);
        }
        if let Some(left) = &self.placement.left {
            push_decl(&mut css, "left", left);
        }
        push_decl(&mut css, "font-family", &self.font_family);
        push_decl(&mut css, "font-size", &format!("{}px", self.font_size_px));
        push_decl(&mut css, "font-weight", &self.font_weight.to_string());
        push_decl(&mut css, "color", &self.color);
        push_decl(&mut css, "background", &self.background);
        push_decl(
            &mut css,
            "padding",
            &format!("{}px {}px", self.padding_px[0], self.padding_px[1]),
        );
        push_decl(
            &mut css,
            "border-radius",
            &format!("{}px", self.border_radius_px),
        );
        push_decl(&mut css, "display", "inline-block");
        push_decl(&mut css, "text-align", "center");
        if let Some(opacity) = self.opacity {
            push_decl(&mut css, "opacity", &opacity.to_string());
        }
        if !self.transform.is_empty() {
            push_decl(&mut css, "transform", &self.transform.to_string());
        }
        css
    }
}

/// Style of one word segment.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Transform::is_empty")]
    pub transform: Transform,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animation: Option<LoopingAnimation>,
    /// Gap after the segment, in `em`.
    pub margin_right_em: f64,
}

impl SegmentStyle {
    pub fn to_css(&self) -> String {
        let mut css = String::new();
        push_decl(&mut css, "display", "inline-block");
        push_decl(&mut css, "margin-right", &format!("{}em", self.margin_right_em));
        if let Some(color) = &self.color {
            push_decl(&mut css, "color", color);
        }
        if let Some(weight) = self.font_weight {
            push_decl(&mut css, "font-weight", &weight.to_string());
        }
        if let Some(opacity) = self.opacity {
            push_decl(&mut css, "opacity", &opacity.to_string());
        }
        if !self.transform.is_empty() {
            push_decl(&mut css, "transform", &self.transform.to_string());
            push_decl(&mut css, "transform-origin", "center");
        }
        if let Some(animation) = &self.animation {
            push_decl(&mut css, "animation", &animation.css());
        }
        css
    }
}

fn push_decl(css: &mut String, property: &str, value: &str) {
    if !css.is_empty() {
        css.push(' ');
    }
    let _ = write!(css, "{property}: {value};");
}

/// Mixes two colours by `amount` (0 keeps `base`, 1 yields `highlight`).
///
/// Only `#rgb` and `#rrggbb` are mixed channel-wise; any other notation snaps to
/// whichever side `amount` is closer to.
pub fn blend_colors(base: &str, highlight: &str, amount: f64) -> String {
    let amount = crate::time::clamp_unit(amount);
    match (parse_hex_color(base), parse_hex_color(highlight)) {
        (Some(from), Some(to)) => {
            let mix = |a: u8, b: u8| {
                (f64::from(a) + (f64::from(b) - f64::from(a)) * amount).round() as u8
            };
            format!(
                "#{:02x}{:02x}{:02x}",
                mix(from[0], to[0]),
                mix(from[1], to[1]),
                mix(from[2], to[2])
            )
        }
        _ if amount >= 0.5 => highlight.to_owned(),
        _ => base.to_owned(),
    }
}

fn parse_hex_color(value: &str) -> Option<[u8; 3]> {
    let hex = value.trim().strip_prefix('#')?;
    let channel = |digits: &str| u8::from_str_radix(digits, 16).ok();
    match hex.len() {
        3 => {
            let mut out = [0u8; 3];
            for (slot, digit) in out.iter_mut().zip(hex.chars()) {
                let doubled: String = [digit, digit].iter().collect();
                *slot = channel(&doubled)?;
            }
            Some(out)
        }
        6 => Some([
            channel(hex.get(0..2)?)?,
            channel(hex.get(2..4)?)?,
            channel(hex.get(4..6)?)?,
        ]),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{Transform, TransformOp, blend_colors};

    #[test]
    fn transform_renders_components_in_insertion_order() {
        let transform = Transform::from(vec![
            TransformOp::Scale(0.925),
            TransformOp::TranslateY(15.0),
            TransformOp::TranslateX(-2.5),
        ]);
        assert_eq!(
            transform.to_string(),
            "scale(0.925) translateY(15px) translateX(-2.5px)"
        );
    }

    #[test]
    fn then_appends_after_existing_components() {
        let placement = Transform::from(vec![TransformOp::TranslateXPercent(-50.0)]);
        let animation = Transform::from(vec![TransformOp::Scale(1.1)]);
        assert_eq!(
            placement.then(&animation).to_string(),
            "translateX(-50%) scale(1.1)"
        );
    }

    #[test]
    fn blend_mixes_hex_channels() {
        assert_eq!(blend_colors("#ffffff", "#ffd166", 0.0), "#ffffff");
        assert_eq!(blend_colors("#ffffff", "#ffd166", 1.0), "#ffd166");
        assert_eq!(blend_colors("#000", "#fff", 0.5), "#808080");
    }

    #[test]
    fn blend_snaps_for_unparsed_notation() {
        assert_eq!(blend_colors("white", "#ffd166", 0.4), "white");
        assert_eq!(blend_colors("white", "#ffd166", 0.6), "#ffd166");
    }
}
