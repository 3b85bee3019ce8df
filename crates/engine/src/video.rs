use crate::config::{FadeWindow, VideoConfig};

/// Opacity of the video element at `t`.
///
/// Starts from fully opaque. An enabled fade-in keeps the video hidden before its
/// start and ramps it up linearly inside its window; an enabled fade-out then ramps
/// it down inside its window and hides it afterwards. Fade-out is applied last, so it
/// wins where the windows overlap.
///
/// # Example
/// ```
/// use caption_engine::{VideoConfig, video_opacity};
///
/// let config = VideoConfig::from_json_str(
///     r#"{
///         "id": "fades",
///         "tracks": {
///             "video": { "animation": {
///                 "presetId": "fade_in_out",
///                 "fadeIn": { "start": 0.0, "duration": 0.8 },
///                 "fadeOut": { "start": 18.5, "duration": 2.0 }
///             } },
///             "text": {}
///         }
///     }"#,
/// )
/// .expect("document is valid");
///
/// assert!((video_opacity(&config, 0.4) - 0.5).abs() < 1e-9);
/// assert_eq!(video_opacity(&config, 10.0), 1.0);
/// assert!((video_opacity(&config, 19.5) - 0.5).abs() < 1e-9);
/// assert_eq!(video_opacity(&config, 21.0), 0.0);
/// ```
pub fn video_opacity(config: &VideoConfig, t: f64) -> f64 {
    let animation = &config.tracks.video.animation;
    let mut opacity = 1.0;

    if let Some(fade_in) = animation.fade_in.filter(|_| config.settings.intro_fade_in) {
        if t < fade_in.start {
            opacity = 0.0;
        } else if t <= fade_in.end() {
            opacity = window_progress(fade_in, t).min(1.0);
        }
    }

    if let Some(fade_out) = animation.fade_out.filter(|_| config.settings.outro_fade_out) {
        if t > fade_out.end() {
            opacity = 0.0;
        } else if t >= fade_out.start {
            opacity = (1.0 - window_progress(fade_out, t)).max(0.0);
        }
    }

    opacity
}

/// Linear progress through a window; zero-length windows are already complete.
fn window_progress(window: FadeWindow, t: f64) -> f64 {
    if window.duration <= 0.0 {
        return 1.0;
    }
    (t - window.start) / window.duration
}

#[cfg(test)]
mod tests {
    use super::video_opacity;
    use crate::config::{FadeWindow, VideoConfig};

    const EPSILON: f64 = 1e-9;

    fn config_with_fades(fade_in: Option<FadeWindow>, fade_out: Option<FadeWindow>) -> VideoConfig {
        let mut config = VideoConfig::from_json_str(r#"{ "id": "v", "tracks": { "text": {} } }"#)
            .expect("empty document parses");
        config.tracks.video.animation.fade_in = fade_in;
        config.tracks.video.animation.fade_out = fade_out;
        config
    }

    fn window(start: f64, duration: f64) -> FadeWindow {
        FadeWindow { start, duration }
    }

    #[test]
    fn no_fades_keep_video_opaque() {
        let config = config_with_fades(None, None);
        for t in [0.0, 5.0, 100.0] {
            assert_eq!(video_opacity(&config, t), 1.0);
        }
    }

    #[test]
    fn fade_in_hides_before_start_and_ramps_linearly() {
        let config = config_with_fades(Some(window(1.0, 2.0)), None);
        assert_eq!(video_opacity(&config, 0.5), 0.0);
        assert_eq!(video_opacity(&config, 1.0), 0.0);
        assert!((video_opacity(&config, 2.5) - 0.75).abs() < EPSILON);
        assert_eq!(video_opacity(&config, 3.0), 1.0);
        assert_eq!(video_opacity(&config, 4.0), 1.0);
    }

    #[test]
    fn fade_out_ramps_down_and_hides_after_end() {
        let config = config_with_fades(None, Some(window(18.5, 2.0)));
        assert_eq!(video_opacity(&config, 18.0), 1.0);
        assert!((video_opacity(&config, 19.0) - 0.75).abs() < EPSILON);
        assert_eq!(video_opacity(&config, 20.5), 0.0);
        assert_eq!(video_opacity(&config, 20.6), 0.0);
    }

    #[test]
    fn fade_out_wins_where_windows_overlap() {
        let config = config_with_fades(Some(window(0.0, 4.0)), Some(window(2.0, 4.0)));
        // fade-in alone would give 0.75; fade-out gives 0.75 as well at t = 3
        assert!((video_opacity(&config, 3.0) - 0.75).abs() < EPSILON);
        // fade-in alone would give 0.5; fade-out gives 1.0
        assert_eq!(video_opacity(&config, 2.0), 1.0);
    }

    #[test]
    fn disabled_settings_skip_fades() {
        let mut config = config_with_fades(Some(window(1.0, 1.0)), Some(window(5.0, 1.0)));
        config.settings.intro_fade_in = false;
        config.settings.outro_fade_out = false;
        assert_eq!(video_opacity(&config, 0.0), 1.0);
        assert_eq!(video_opacity(&config, 7.0), 1.0);
    }

    #[test]
    fn zero_length_windows_do_not_divide_by_zero() {
        let config = config_with_fades(Some(window(1.0, 0.0)), Some(window(5.0, 0.0)));
        assert_eq!(video_opacity(&config, 1.0), 1.0);
        assert_eq!(video_opacity(&config, 5.0), 0.0);
        assert_eq!(video_opacity(&config, 3.0), 1.0);
    }
}
