use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::interpolate::{TextMetrics, keyframes_name, resolve_value};
use crate::preset::{AnimatedProperty, PresetKind, PresetRegistry};

/// Identifier of the stylesheet carrying the highlight `@keyframes` blocks.
pub const STYLESHEET_ID: &str = "video-editor-animations";

/// Stylesheet operations required by the engine.
///
/// Looping highlight animations run on the host's own animation clock, so the host
/// must know the keyframes they reference.
pub trait StyleHost {
    /// Returns true when a stylesheet with `id` is registered.
    fn has_stylesheet(&self, id: &str) -> bool;

    /// Registers `css` under `id`.
    fn insert_stylesheet(&mut self, id: &str, css: &str);

    /// Removes the stylesheet registered under `id`, if any.
    fn remove_stylesheet(&mut self, id: &str);
}

/// In-memory host for headless use.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStyleHost {
    sheets: BTreeMap<String, String>,
}

impl MemoryStyleHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stylesheet(&self, id: &str) -> Option<&str> {
        self.sheets.get(id).map(String::as_str)
    }
}

impl StyleHost for MemoryStyleHost {
    fn has_stylesheet(&self, id: &str) -> bool {
        self.sheets.contains_key(id)
    }

    fn insert_stylesheet(&mut self, id: &str, css: &str) {
        self.sheets.insert(id.to_owned(), css.to_owned());
    }

    fn remove_stylesheet(&mut self, id: &str) {
        self.sheets.remove(id);
    }
}

/// Generates one `@keyframes highlight-<id>` block per oscillating highlight preset.
///
/// Each block animates the preset's scale and opacity between their `from` and `to`
/// values; hosts play it with `alternate` direction so it swings back and forth.
///
/// # Example
/// ```
/// use caption_engine::highlight_keyframes_css;
///
/// let css = highlight_keyframes_css();
/// assert!(css.contains("@keyframes highlight-pulse {"));
/// assert!(css.contains("to { transform: scale(1.12); opacity: 1; }"));
/// ```
pub fn highlight_keyframes_css() -> String {
    let registry = PresetRegistry::builtin();
    let mut css = String::new();

    for preset in registry
        .presets(PresetKind::Highlight)
        .filter(|preset| preset.is_oscillating())
    {
        let properties = preset.properties();
        let from = keyframe_declarations(
            properties.scale.as_ref(),
            properties.opacity.as_ref(),
            Endpoint::From,
        );
        let to = keyframe_declarations(
            properties.scale.as_ref(),
            properties.opacity.as_ref(),
            Endpoint::To,
        );
        if !css.is_empty() {
            css.push('\n');
        }
        let _ = write!(
            css,
            "@keyframes {} {{\n  from {{ {from} }}\n  to {{ {to} }}\n}}\n",
            keyframes_name(preset.id())
        );
    }

    css
}

#[derive(Debug, Clone, Copy)]
enum Endpoint {
    From,
    To,
}

fn keyframe_declarations(
    scale: Option<&AnimatedProperty>,
    opacity: Option<&AnimatedProperty>,
    endpoint: Endpoint,
) -> String {
    let metrics = TextMetrics::APPROXIMATE;
    let pick = |property: &AnimatedProperty, fallback: f64| {
        let value = match endpoint {
            Endpoint::From => property.from.as_ref(),
            Endpoint::To => property.to.as_ref(),
        };
        resolve_value(value, fallback, metrics)
    };

    let mut declarations = Vec::new();
    if let Some(scale) = scale {
        declarations.push(format!("transform: scale({});", pick(scale, 1.0)));
    }
    if let Some(opacity) = opacity {
        declarations.push(format!("opacity: {};", pick(opacity, 1.0)));
    }
    declarations.join(" ")
}

#[cfg(test)]
mod tests {
    use super::{MemoryStyleHost, STYLESHEET_ID, StyleHost, highlight_keyframes_css};

    #[test]
    fn stylesheet_has_a_block_per_oscillating_preset() {
        let css = highlight_keyframes_css();
        assert_eq!(css.matches("@keyframes ").count(), 3);
        assert!(css.contains("@keyframes highlight-pulse {"));
        assert!(css.contains("@keyframes highlight-pulse_fade {"));
        assert!(css.contains("@keyframes highlight-scale_color_pulse {"));
        assert!(!css.contains("highlight-scale_up"));
    }

    #[test]
    fn pulse_fade_block_animates_scale_and_opacity() {
        let css = highlight_keyframes_css();
        let block = css
            .split("@keyframes ")
            .find(|block| block.starts_with("highlight-pulse_fade "))
            .expect("pulse_fade block exists");
        assert!(block.contains("from { transform: scale(1); opacity: 0.9; }"));
        assert!(block.contains("to { transform: scale(1.12); opacity: 1; }"));
    }

    #[test]
    fn memory_host_tracks_registered_sheets() {
        let mut host = MemoryStyleHost::new();
        assert!(!host.has_stylesheet(STYLESHEET_ID));

        host.insert_stylesheet(STYLESHEET_ID, "a {}");
        assert_eq!(host.stylesheet(STYLESHEET_ID), Some("a {}"));

        host.remove_stylesheet(STYLESHEET_ID);
        assert!(!host.has_stylesheet(STYLESHEET_ID));
    }
}
