//! Therapeutic goals and the bounds they impose on track queries.
//!
//! A goal is a selector key only; the mapping from goal to filter bounds is
//! server-side truth. Tightening is a merge over a static rule table so the
//! monotonicity guarantee (server bounds always win over looser client
//! bounds) can be tested in isolation.

use serde::{Deserialize, Serialize};

/// Closed enumeration of therapeutic intents. Unrecognized values fail soft
/// to [`Goal::Open`] so stale clients keep working.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    FocusUp,
    AnxietyDown,
    Sleep,
    MoodUp,
    PainDown,
    Open,
}

impl Goal {
    pub fn parse(s: &str) -> Goal {
        match s {
            "focus_up" => Goal::FocusUp,
            "anxiety_down" => Goal::AnxietyDown,
            "sleep" => Goal::Sleep,
            "mood_up" => Goal::MoodUp,
            "pain_down" => Goal::PainDown,
            _ => Goal::Open,
        }
    }
}

/// Per-goal floor/ceiling adjustments. `None` leaves the client bound alone.
struct Tightening {
    valence_min: Option<f64>,
    arousal_max: Option<f64>,
}

const TIGHTENING_RULES: &[(Goal, Tightening)] = &[
    (
        Goal::FocusUp,
        Tightening {
            valence_min: Some(0.70),
            arousal_max: Some(0.50),
        },
    ),
    (
        Goal::AnxietyDown,
        Tightening {
            valence_min: Some(0.65),
            arousal_max: Some(0.45),
        },
    ),
    (
        Goal::Sleep,
        Tightening {
            valence_min: Some(0.65),
            arousal_max: Some(0.45),
        },
    ),
    (
        Goal::MoodUp,
        Tightening {
            valence_min: Some(0.80),
            arousal_max: None,
        },
    ),
    (
        Goal::PainDown,
        Tightening {
            valence_min: Some(0.80),
            arousal_max: None,
        },
    ),
];

/// Effective affect-space bounds for a query, always inside `[0,1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub valence_min: f64,
    pub arousal_max: f64,
    pub dominance_min: f64,
}

impl Default for Bounds {
    fn default() -> Self {
        Bounds {
            valence_min: 0.0,
            arousal_max: 1.0,
            dominance_min: 0.0,
        }
    }
}

fn clamp01(x: f64) -> f64 {
    x.clamp(0.0, 1.0)
}

impl Bounds {
    /// Build bounds from optional client parameters, clamping each to `[0,1]`.
    pub fn from_client(
        valence_min: Option<f64>,
        arousal_max: Option<f64>,
        dominance_min: Option<f64>,
    ) -> Bounds {
        let defaults = Bounds::default();
        Bounds {
            valence_min: clamp01(valence_min.unwrap_or(defaults.valence_min)),
            arousal_max: clamp01(arousal_max.unwrap_or(defaults.arousal_max)),
            dominance_min: clamp01(dominance_min.unwrap_or(defaults.dominance_min)),
        }
    }

    /// Merge goal-derived tightening into these bounds, keeping the more
    /// restrictive side of each.
    pub fn tightened(self, goal: Goal) -> Bounds {
        let rule = TIGHTENING_RULES.iter().find(|(g, _)| *g == goal);
        match rule {
            None => self,
            Some((_, tightening)) => Bounds {
                valence_min: match tightening.valence_min {
                    Some(floor) => self.valence_min.max(floor),
                    None => self.valence_min,
                },
                arousal_max: match tightening.arousal_max {
                    Some(ceiling) => self.arousal_max.min(ceiling),
                    None => self.arousal_max,
                },
                dominance_min: self.dominance_min,
            },
        }
    }
}
