//! Built-in animation presets for captions and the video layer.
//!
//! Presets are grouped into four collections (entry, exit, highlight, video). Each
//! collection carries defaults that apply to any preset lacking its own duration or
//! easing. Lookups that miss return `None`; callers render that as "no effect".

use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::easing::Easing;

/// Which part of the document a preset animates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresetKind {
    Entry,
    Exit,
    Highlight,
    Video,
}

impl PresetKind {
    pub const ALL: [PresetKind; 4] = [Self::Entry, Self::Exit, Self::Highlight, Self::Video];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Entry => "entry",
            Self::Exit => "exit",
            Self::Highlight => "highlight",
            Self::Video => "video",
        }
    }
}

impl FromStr for PresetKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "entry" => Ok(Self::Entry),
            "exit" => Ok(Self::Exit),
            "highlight" => Ok(Self::Highlight),
            "video" => Ok(Self::Video),
            other => Err(format!("unknown preset kind: {other}")),
        }
    }
}

/// Rendered text box dimension a relative distance is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextDimension {
    TextWidth,
    TextHeight,
}

/// Endpoint of an animated property.
///
/// Serialized as a bare number, a `relative(<factor> * textWidth|textHeight)`
/// expression, or a symbolic token such as `base`/`highlight` for colour blends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawPropertyValue", into = "RawPropertyValue")]
pub enum PropertyValue {
    Number(f64),
    Relative {
        factor: f64,
        dimension: TextDimension,
    },
    Token(String),
}

impl PropertyValue {
    pub fn relative(factor: f64, dimension: TextDimension) -> Self {
        Self::Relative { factor, dimension }
    }

    pub fn token(name: &str) -> Self {
        Self::Token(name.to_owned())
    }

    /// Returns the literal number, if this endpoint is one.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            _ => None,
        }
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl Display for PropertyValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Relative { factor, dimension } => {
                let dimension = match dimension {
                    TextDimension::TextWidth => "textWidth",
                    TextDimension::TextHeight => "textHeight",
                };
                write!(f, "relative({factor} * {dimension})")
            }
            Self::Token(name) => write!(f, "{name}"),
        }
    }
}

impl FromStr for PropertyValue {
    type Err = std::convert::Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if let Ok(number) = value.trim().parse::<f64>() {
            return Ok(Self::Number(number));
        }
        Ok(parse_relative(value).unwrap_or_else(|| Self::Token(value.to_owned())))
    }
}

fn parse_relative(value: &str) -> Option<PropertyValue> {
    let inner = value
        .trim()
        .strip_prefix("relative(")?
        .strip_suffix(')')?;
    let (left, right) = inner.split_once('*')?;
    let (left, right) = (left.trim(), right.trim());

    let (factor, dimension) = match (left.parse::<f64>(), right.parse::<f64>()) {
        (Ok(factor), _) => (factor, right),
        (_, Ok(factor)) => (factor, left),
        _ => return None,
    };
    let dimension = match dimension {
        "textWidth" => TextDimension::TextWidth,
        "textHeight" => TextDimension::TextHeight,
        _ => return None,
    };
    Some(PropertyValue::Relative { factor, dimension })
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawPropertyValue {
    Number(f64),
    Text(String),
}

impl From<RawPropertyValue> for PropertyValue {
    fn from(value: RawPropertyValue) -> Self {
        match value {
            RawPropertyValue::Number(number) => Self::Number(number),
            RawPropertyValue::Text(text) => match text.parse() {
                Ok(parsed) => parsed,
                Err(never) => match never {},
            },
        }
    }
}

impl From<PropertyValue> for RawPropertyValue {
    fn from(value: PropertyValue) -> Self {
        match value {
            PropertyValue::Number(number) => Self::Number(number),
            other => Self::Text(other.to_string()),
        }
    }
}

/// Whether a property plays once per sample or loops in the host renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyMode {
    Once,
    Oscillate,
}

/// One animated property: either a `from`/`to` pair or a keyframe list.
///
/// When `keyframes` is present it takes precedence over `from`/`to`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnimatedProperty {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<PropertyValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<PropertyValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyframes: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<PropertyMode>,
}

impl AnimatedProperty {
    pub fn between(from: impl Into<PropertyValue>, to: impl Into<PropertyValue>) -> Self {
        Self {
            from: Some(from.into()),
            to: Some(to.into()),
            ..Self::default()
        }
    }

    pub fn keyframes(values: &[f64]) -> Self {
        Self {
            keyframes: Some(values.to_vec()),
            ..Self::default()
        }
    }

    pub fn oscillating(mut self) -> Self {
        self.mode = Some(PropertyMode::Oscillate);
        self
    }

    pub fn is_oscillating(&self) -> bool {
        self.mode == Some(PropertyMode::Oscillate)
    }

    /// Returns the keyframe list when it is usable (at least two values).
    pub fn usable_keyframes(&self) -> Option<&[f64]> {
        self.keyframes
            .as_deref()
            .filter(|keyframes| keyframes.len() >= 2)
    }
}

/// Nested opacity group used by the video `fade_in_out` preset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FadeGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<AnimatedProperty>,
}

/// Properties a preset animates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertySet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<AnimatedProperty>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<AnimatedProperty>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translate_x: Option<AnimatedProperty>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translate_y: Option<AnimatedProperty>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_blend: Option<AnimatedProperty>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fade_in: Option<FadeGroup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fade_out: Option<FadeGroup>,
}

impl PropertySet {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A named bundle of property transitions plus optional timing overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationPreset {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: PresetKind,
    pub properties: PropertySet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub easing: Option<Easing>,
}

/// Timing applied to presets of a collection that lack their own values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PresetDefaults {
    pub duration: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub easing: Option<Easing>,
}

/// All presets of one kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresetCollection {
    pub version: String,
    pub defaults: PresetDefaults,
    pub presets: Vec<AnimationPreset>,
}

impl PresetCollection {
    fn find(&self, id: &str) -> Option<&AnimationPreset> {
        self.presets.iter().find(|preset| preset.id == id)
    }
}

/// A preset together with the defaults of the collection it was found in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedPreset<'a> {
    pub preset: &'a AnimationPreset,
    pub defaults: PresetDefaults,
}

impl<'a> ResolvedPreset<'a> {
    pub fn id(&self) -> &'a str {
        &self.preset.id
    }

    pub fn properties(&self) -> &'a PropertySet {
        &self.preset.properties
    }

    /// Preset duration, else the collection default.
    pub fn duration(&self) -> f64 {
        self.preset.duration.unwrap_or(self.defaults.duration)
    }

    /// Preset easing, else the collection default, else linear.
    pub fn easing(&self) -> Easing {
        self.preset
            .easing
            .or(self.defaults.easing)
            .unwrap_or_default()
    }

    /// True when any property loops in the host renderer instead of being sampled.
    pub fn is_oscillating(&self) -> bool {
        let properties = self.properties();
        [
            &properties.opacity,
            &properties.scale,
            &properties.translate_x,
            &properties.translate_y,
            &properties.color_blend,
        ]
        .into_iter()
        .flatten()
        .any(AnimatedProperty::is_oscillating)
    }
}

/// Static catalogue of presets, one collection per [`PresetKind`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresetRegistry {
    pub entry: PresetCollection,
    pub exit: PresetCollection,
    pub highlight: PresetCollection,
    pub video: PresetCollection,
}

static BUILTIN: LazyLock<PresetRegistry> = LazyLock::new(PresetRegistry::builtin_catalog);

impl PresetRegistry {
    /// Returns the process-wide built-in catalogue.
    pub fn builtin() -> &'static PresetRegistry {
        &BUILTIN
    }

    pub fn collection(&self, kind: PresetKind) -> &PresetCollection {
        match kind {
            PresetKind::Entry => &self.entry,
            PresetKind::Exit => &self.exit,
            PresetKind::Highlight => &self.highlight,
            PresetKind::Video => &self.video,
        }
    }

    /// Looks up a preset by kind and id.
    ///
    /// # Example
    /// ```
    /// use caption_engine::{Easing, PresetKind, PresetRegistry};
    ///
    /// let registry = PresetRegistry::builtin();
    /// let fade = registry.get(PresetKind::Entry, "fade_in").expect("built in");
    /// assert_eq!(fade.duration(), 0.4);
    /// assert_eq!(fade.easing(), Easing::EaseOut);
    /// assert!(registry.get(PresetKind::Entry, "teleport").is_none());
    /// ```
    pub fn get(&self, kind: PresetKind, id: &str) -> Option<ResolvedPreset<'_>> {
        let collection = self.collection(kind);
        collection.find(id).map(|preset| ResolvedPreset {
            preset,
            defaults: collection.defaults,
        })
    }

    /// Iterates resolved presets of one kind in catalogue order.
    pub fn presets(&self, kind: PresetKind) -> impl Iterator<Item = ResolvedPreset<'_>> {
        let collection = self.collection(kind);
        collection.presets.iter().map(|preset| ResolvedPreset {
            preset,
            defaults: collection.defaults,
        })
    }

    fn builtin_catalog() -> Self {
        Self {
            entry: entry_presets(),
            exit: exit_presets(),
            highlight: highlight_presets(),
            video: video_presets(),
        }
    }
}

const SLIDE_FACTOR: f64 = 0.6;

fn preset(kind: PresetKind, id: &str, properties: PropertySet) -> AnimationPreset {
    AnimationPreset {
        id: id.to_owned(),
        kind,
        properties,
        duration: None,
        easing: None,
    }
}

fn timed(mut preset: AnimationPreset, duration: f64, easing: Easing) -> AnimationPreset {
    preset.duration = Some(duration);
    preset.easing = Some(easing);
    preset
}

fn collection(defaults: PresetDefaults, presets: Vec<AnimationPreset>) -> PresetCollection {
    PresetCollection {
        version: "1.0".to_owned(),
        defaults,
        presets,
    }
}

fn slide(dimension: TextDimension, sign: f64) -> PropertyValue {
    PropertyValue::relative(sign * SLIDE_FACTOR, dimension)
}

fn fade(from: f64, to: f64) -> Option<AnimatedProperty> {
    Some(AnimatedProperty::between(from, to))
}

fn entry_presets() -> PresetCollection {
    use TextDimension::{TextHeight, TextWidth};

    let kind = PresetKind::Entry;
    let slide_in = |dimension, sign, with_fade: bool| {
        let travel = Some(AnimatedProperty::between(slide(dimension, sign), 0.0));
        let mut properties = match dimension {
            TextHeight => PropertySet {
                translate_y: travel,
                ..PropertySet::default()
            },
            TextWidth => PropertySet {
                translate_x: travel,
                ..PropertySet::default()
            },
        };
        if with_fade {
            properties.opacity = fade(0.0, 1.0);
        }
        properties
    };

    collection(
        PresetDefaults {
            duration: 0.4,
            easing: Some(Easing::EaseOut),
        },
        vec![
            preset(
                kind,
                "fade_in",
                PropertySet {
                    opacity: fade(0.0, 1.0),
                    ..PropertySet::default()
                },
            ),
            preset(
                kind,
                "pop_in",
                PropertySet {
                    scale: Some(AnimatedProperty::between(0.85, 1.0)),
                    opacity: fade(0.0, 1.0),
                    ..PropertySet::default()
                },
            ),
            preset(kind, "slide_up", slide_in(TextHeight, 1.0, false)),
            preset(kind, "slide_down", slide_in(TextHeight, -1.0, false)),
            preset(kind, "slide_left", slide_in(TextWidth, 1.0, false)),
            preset(kind, "slide_right", slide_in(TextWidth, -1.0, false)),
            preset(kind, "slide_up_fade", slide_in(TextHeight, 1.0, true)),
            preset(kind, "slide_down_fade", slide_in(TextHeight, -1.0, true)),
            preset(kind, "slide_left_fade", slide_in(TextWidth, 1.0, true)),
            preset(kind, "slide_right_fade", slide_in(TextWidth, -1.0, true)),
            preset(
                kind,
                "scale_up",
                PropertySet {
                    scale: Some(AnimatedProperty::between(0.9, 1.0)),
                    ..PropertySet::default()
                },
            ),
            preset(
                kind,
                "scale_down",
                PropertySet {
                    scale: Some(AnimatedProperty::between(1.1, 1.0)),
                    ..PropertySet::default()
                },
            ),
            preset(
                kind,
                "scale_up_fade",
                PropertySet {
                    scale: Some(AnimatedProperty::between(0.9, 1.0)),
                    opacity: fade(0.0, 1.0),
                    ..PropertySet::default()
                },
            ),
            timed(
                preset(
                    kind,
                    "bounce_in",
                    PropertySet {
                        scale: Some(AnimatedProperty::keyframes(&[0.9, 1.08, 1.0])),
                        opacity: fade(0.0, 1.0),
                        ..PropertySet::default()
                    },
                ),
                0.45,
                Easing::EaseOut,
            ),
        ],
    )
}

fn exit_presets() -> PresetCollection {
    use TextDimension::{TextHeight, TextWidth};

    let kind = PresetKind::Exit;
    let slide_out = |dimension, sign, with_fade: bool| {
        let travel = Some(AnimatedProperty::between(0.0, slide(dimension, sign)));
        let mut properties = match dimension {
            TextHeight => PropertySet {
                translate_y: travel,
                ..PropertySet::default()
            },
            TextWidth => PropertySet {
                translate_x: travel,
                ..PropertySet::default()
            },
        };
        if with_fade {
            properties.opacity = fade(1.0, 0.0);
        }
        properties
    };

    collection(
        PresetDefaults {
            duration: 0.25,
            easing: Some(Easing::EaseIn),
        },
        vec![
            preset(
                kind,
                "fade_out",
                PropertySet {
                    opacity: fade(1.0, 0.0),
                    ..PropertySet::default()
                },
            ),
            preset(
                kind,
                "pop_out",
                PropertySet {
                    scale: Some(AnimatedProperty::between(1.0, 0.85)),
                    opacity: fade(1.0, 0.0),
                    ..PropertySet::default()
                },
            ),
            preset(kind, "slide_up_out", slide_out(TextHeight, -1.0, false)),
            preset(kind, "slide_down_out", slide_out(TextHeight, 1.0, false)),
            preset(kind, "slide_left_out", slide_out(TextWidth, -1.0, false)),
            preset(kind, "slide_right_out", slide_out(TextWidth, 1.0, false)),
            preset(kind, "slide_up_fade_out", slide_out(TextHeight, -1.0, true)),
            preset(kind, "slide_down_fade_out", slide_out(TextHeight, 1.0, true)),
            preset(kind, "slide_left_fade_out", slide_out(TextWidth, -1.0, true)),
            preset(kind, "slide_right_fade_out", slide_out(TextWidth, 1.0, true)),
            preset(
                kind,
                "scale_down_out",
                PropertySet {
                    scale: Some(AnimatedProperty::between(1.0, 0.9)),
                    ..PropertySet::default()
                },
            ),
            preset(
                kind,
                "scale_down_fade_out",
                PropertySet {
                    scale: Some(AnimatedProperty::between(1.0, 0.9)),
                    opacity: fade(1.0, 0.0),
                    ..PropertySet::default()
                },
            ),
        ],
    )
}

fn highlight_presets() -> PresetCollection {
    let kind = PresetKind::Highlight;
    let pulse = || Some(AnimatedProperty::between(1.0, 1.12).oscillating());
    let color = || {
        Some(AnimatedProperty::between(
            PropertyValue::token("base"),
            PropertyValue::token("highlight"),
        ))
    };

    collection(
        PresetDefaults {
            duration: 0.25,
            easing: Some(Easing::EaseInOut),
        },
        vec![
            preset(kind, "none", PropertySet::default()),
            preset(
                kind,
                "pulse",
                PropertySet {
                    scale: pulse(),
                    ..PropertySet::default()
                },
            ),
            preset(
                kind,
                "pulse_fade",
                PropertySet {
                    scale: pulse(),
                    opacity: fade(0.9, 1.0),
                    ..PropertySet::default()
                },
            ),
            preset(
                kind,
                "scale_up",
                PropertySet {
                    scale: Some(AnimatedProperty::between(1.0, 1.15)),
                    ..PropertySet::default()
                },
            ),
            timed(
                preset(
                    kind,
                    "bounce_soft",
                    PropertySet {
                        scale: Some(AnimatedProperty::keyframes(&[1.0, 1.18, 1.0])),
                        ..PropertySet::default()
                    },
                ),
                0.3,
                Easing::EaseOut,
            ),
            preset(
                kind,
                "fade_emphasis",
                PropertySet {
                    opacity: fade(0.85, 1.0),
                    ..PropertySet::default()
                },
            ),
            preset(
                kind,
                "color_emphasis",
                PropertySet {
                    color_blend: color(),
                    ..PropertySet::default()
                },
            ),
            preset(
                kind,
                "scale_color_pulse",
                PropertySet {
                    scale: pulse(),
                    color_blend: color(),
                    ..PropertySet::default()
                },
            ),
        ],
    )
}

fn video_presets() -> PresetCollection {
    let kind = PresetKind::Video;
    collection(
        PresetDefaults {
            duration: 0.8,
            easing: None,
        },
        vec![
            preset(kind, "none", PropertySet::default()),
            preset(
                kind,
                "fade_in",
                PropertySet {
                    opacity: fade(0.0, 1.0),
                    ..PropertySet::default()
                },
            ),
            preset(
                kind,
                "fade_out",
                PropertySet {
                    opacity: fade(1.0, 0.0),
                    ..PropertySet::default()
                },
            ),
            preset(
                kind,
                "fade_in_out",
                PropertySet {
                    fade_in: Some(FadeGroup {
                        opacity: fade(0.0, 1.0),
                    }),
                    fade_out: Some(FadeGroup {
                        opacity: fade(1.0, 0.0),
                    }),
                    ..PropertySet::default()
                },
            ),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::{Easing, PresetKind, PresetRegistry, PropertyValue, TextDimension};

    #[test]
    fn presets_without_timing_inherit_collection_defaults() {
        let registry = PresetRegistry::builtin();

        let exit = registry
            .get(PresetKind::Exit, "fade_out")
            .expect("fade_out exists");
        assert_eq!(exit.duration(), 0.25);
        assert_eq!(exit.easing(), Easing::EaseIn);

        let bounce = registry
            .get(PresetKind::Entry, "bounce_in")
            .expect("bounce_in exists");
        assert_eq!(bounce.duration(), 0.45);

        let video = registry
            .get(PresetKind::Video, "fade_in")
            .expect("video fade_in exists");
        assert_eq!(video.duration(), 0.8);
        assert_eq!(video.easing(), Easing::Linear);
    }

    #[test]
    fn lookup_is_scoped_by_kind() {
        let registry = PresetRegistry::builtin();
        assert!(registry.get(PresetKind::Entry, "scale_up").is_some());
        assert!(registry.get(PresetKind::Highlight, "scale_up").is_some());
        assert!(registry.get(PresetKind::Exit, "scale_up").is_none());
        assert!(registry.get(PresetKind::Exit, "fade_in").is_none());
    }

    #[test]
    fn only_pulse_family_oscillates() {
        let registry = PresetRegistry::builtin();
        let oscillating: Vec<&str> = registry
            .presets(PresetKind::Highlight)
            .filter(|preset| preset.is_oscillating())
            .map(|preset| preset.id())
            .collect();
        assert_eq!(oscillating, vec!["pulse", "pulse_fade", "scale_color_pulse"]);
    }

    #[test]
    fn slide_up_starts_below_by_sixty_percent_of_text_height() {
        let preset = PresetRegistry::builtin()
            .get(PresetKind::Entry, "slide_up")
            .expect("slide_up exists");
        let travel = preset
            .properties()
            .translate_y
            .as_ref()
            .expect("slide_up moves vertically");
        assert_eq!(
            travel.from,
            Some(PropertyValue::relative(0.6, TextDimension::TextHeight))
        );
        assert_eq!(travel.to, Some(PropertyValue::Number(0.0)));
    }

    #[test]
    fn relative_expressions_parse_and_print() {
        let parsed: PropertyValue = "relative(-0.6 * textWidth)".parse().expect("infallible");
        assert_eq!(
            parsed,
            PropertyValue::relative(-0.6, TextDimension::TextWidth)
        );
        assert_eq!(parsed.to_string(), "relative(-0.6 * textWidth)");

        let token: PropertyValue = "highlight".parse().expect("infallible");
        assert_eq!(token, PropertyValue::token("highlight"));
    }

    #[test]
    fn preset_json_uses_original_property_names() {
        let preset = PresetRegistry::builtin()
            .get(PresetKind::Entry, "slide_left_fade")
            .expect("slide_left_fade exists");
        let json = serde_json::to_value(preset.preset).expect("serialize preset");
        assert_eq!(json["type"], "entry");
        assert_eq!(
            json["properties"]["translateX"]["from"],
            "relative(0.6 * textWidth)"
        );
        assert_eq!(json["properties"]["opacity"]["to"], 1.0);
    }
}
