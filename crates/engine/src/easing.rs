use serde::{Deserialize, Serialize};

/// Named easing curves mapping linear progress in `[0, 1]` onto eased progress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Easing {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
}

impl Easing {
    /// Resolves an easing identifier, falling back to [`Easing::Linear`] for unknown
    /// or missing names.
    ///
    /// # Example
    /// ```
    /// use caption_engine::Easing;
    ///
    /// assert_eq!(Easing::from_id(Some("easeOut")), Easing::EaseOut);
    /// assert_eq!(Easing::from_id(Some("bouncy")), Easing::Linear);
    /// assert_eq!(Easing::from_id(None), Easing::Linear);
    /// ```
    pub fn from_id(id: Option<&str>) -> Self {
        match id {
            Some("linear") => Self::Linear,
            Some("easeIn") => Self::EaseIn,
            Some("easeOut") => Self::EaseOut,
            Some("easeInOut") => Self::EaseInOut,
            _ => Self::Linear,
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::EaseIn => "easeIn",
            Self::EaseOut => "easeOut",
            Self::EaseInOut => "easeInOut",
        }
    }

    /// Applies the curve to `t`. Inputs are clamped to `[0, 1]` first.
    pub fn apply(self, t: f64) -> f64 {
        let t = crate::time::clamp_unit(t);
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t,
            Self::EaseOut => t * (2.0 - t),
            Self::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Easing;

    const ALL: [Easing; 4] = [
        Easing::Linear,
        Easing::EaseIn,
        Easing::EaseOut,
        Easing::EaseInOut,
    ];

    #[test]
    fn every_curve_fixes_both_endpoints() {
        for easing in ALL {
            assert_eq!(easing.apply(0.0), 0.0, "{easing:?} at 0");
            assert_eq!(easing.apply(1.0), 1.0, "{easing:?} at 1");
        }
    }

    #[test]
    fn every_curve_is_monotonic_on_the_unit_interval() {
        for easing in ALL {
            let mut previous = 0.0;
            for step in 0..=100 {
                let value = easing.apply(f64::from(step) / 100.0);
                assert!(value >= previous, "{easing:?} decreased at step {step}");
                assert!((0.0..=1.0).contains(&value));
                previous = value;
            }
        }
    }

    #[test]
    fn ease_out_at_half_is_three_quarters() {
        assert!((Easing::EaseOut.apply(0.5) - 0.75).abs() < 1e-12);
        assert!((Easing::EaseIn.apply(0.5) - 0.25).abs() < 1e-12);
        assert!((Easing::EaseInOut.apply(0.5) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn out_of_range_inputs_are_clamped() {
        assert_eq!(Easing::EaseOut.apply(1.7), 1.0);
        assert_eq!(Easing::EaseIn.apply(-0.2), 0.0);
    }

    #[test]
    fn id_round_trips_through_from_id() {
        for easing in ALL {
            assert_eq!(Easing::from_id(Some(easing.id())), easing);
        }
    }
}
