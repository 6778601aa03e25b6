//! Base stat bars: label abbreviation and spring-driven fill.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Largest base stat value; the bar's full scale.
pub const STAT_MAX: u8 = 255;

/// Value shown for every stat before the detail record arrives.
pub const PLACEHOLDER_VALUE: u8 = 1;

pub const PLACEHOLDER_STATS: [&str; 6] = [
    "hp",
    "attack",
    "defense",
    "special-attack",
    "special-defense",
    "speed",
];

/// Applied top to bottom, then the result is uppercased. Order matters:
/// compound names like `special-attack` rely on `attack` going first.
const STAT_ABBREVIATIONS: [(&str, &str); 5] = [
    ("attack", "ATK"),
    ("defense", "DEF"),
    ("special", "S"),
    ("speed", "SPD"),
    ("-", ""),
];

pub fn abbreviate_stat(name: &str) -> String {
    STAT_ABBREVIATIONS
        .iter()
        .fold(name.to_string(), |acc, (pattern, replacement)| {
            acc.replace(pattern, replacement)
        })
        .to_uppercase()
}

/// Split the 0..=255 scale into (filled, remainder); always sums to 255.
pub fn segments_for(value: u8) -> (u16, u16) {
    let filled = value as u16;
    (filled, STAT_MAX as u16 - filled)
}

/// Number of cells of a `width`-wide bar covered by `filled`/255.
pub fn filled_cells(width: u16, filled: u16) -> u16 {
    let filled = filled.min(STAT_MAX as u16) as u32;
    ((width as u32 * filled + STAT_MAX as u32 / 2) / STAT_MAX as u32) as u16
}

const STIFFNESS: f32 = 100.0;
const MASS: f32 = 1.0;
const REST_EPSILON: f32 = 0.01;

/// Critically damped spring on the stat scale.
///
/// Steps use the closed-form solution, so large or uneven frame times
/// neither destabilize nor overshoot from rest. Positions are clamped to
/// `[0, 255]` after every step.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Spring {
    pub position: f32,
    pub velocity: f32,
    pub target: f32,
}

impl Spring {
    pub fn at(value: u8) -> Self {
        Self {
            position: value as f32,
            velocity: 0.0,
            target: value as f32,
        }
    }

    /// Move the target, keeping position and velocity so an in-flight
    /// animation bends toward the new value instead of restarting.
    pub fn retarget(&mut self, target: u8) {
        self.target = target as f32;
    }

    pub fn is_settled(&self) -> bool {
        self.position == self.target && self.velocity == 0.0
    }

    /// Advance by `dt` seconds. Returns true while still moving.
    pub fn step(&mut self, dt: f32) -> bool {
        if self.is_settled() {
            return false;
        }
        let omega = (STIFFNESS / MASS).sqrt();
        let x0 = self.position - self.target;
        let v0 = self.velocity;
        let b = v0 + omega * x0;
        let decay = (-omega * dt).exp();

        let x = (x0 + b * dt) * decay;
        let v = (v0 - omega * b * dt) * decay;

        self.position = self.target + x;
        self.velocity = v;

        let max = STAT_MAX as f32;
        if self.position < 0.0 || self.position > max {
            self.position = self.position.clamp(0.0, max);
            self.velocity = 0.0;
        }
        if (self.position - self.target).abs() < REST_EPSILON && self.velocity.abs() < REST_EPSILON
        {
            self.position = self.target;
            self.velocity = 0.0;
        }
        !self.is_settled()
    }
}

/// One animated base stat row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct StatBar {
    pub name: String,
    pub value: u8,
    pub spring: Spring,
}

impl StatBar {
    pub fn new(name: impl Into<String>, value: u8) -> Self {
        Self {
            name: name.into(),
            value,
            spring: Spring::at(value),
        }
    }

    pub fn retarget(&mut self, value: u8) {
        self.value = value;
        self.spring.retarget(value);
    }

    pub fn label(&self) -> String {
        abbreviate_stat(&self.name)
    }

    /// Currently rendered fill, rounded to a whole stat point.
    pub fn rendered(&self) -> u8 {
        self.spring.position.round().clamp(0.0, STAT_MAX as f32) as u8
    }

    pub fn segments(&self) -> (u16, u16) {
        segments_for(self.rendered())
    }

    pub fn is_animating(&self) -> bool {
        !self.spring.is_settled()
    }
}

pub fn placeholder_bars() -> Vec<StatBar> {
    PLACEHOLDER_STATS
        .iter()
        .map(|name| StatBar::new(*name, PLACEHOLDER_VALUE))
        .collect()
}

/// Reconcile the current bars with freshly loaded stats, retargeting bars
/// that already exist by name so running animations continue.
pub fn retarget_bars(current: &mut Vec<StatBar>, stats: &[(String, u8)]) {
    let mut previous = std::mem::take(current);
    for (name, value) in stats {
        let mut bar = match previous.iter().position(|bar| &bar.name == name) {
            Some(index) => previous.swap_remove(index),
            None => StatBar::new(name.clone(), PLACEHOLDER_VALUE),
        };
        bar.retarget(*value);
        current.push(bar);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const FRAME: f32 = 0.016;

    #[test]
    fn abbreviates_known_stats() {
        assert_eq!(abbreviate_stat("hp"), "HP");
        assert_eq!(abbreviate_stat("attack"), "ATK");
        assert_eq!(abbreviate_stat("defense"), "DEF");
        assert_eq!(abbreviate_stat("special-attack"), "SATK");
        assert_eq!(abbreviate_stat("special-defense"), "SDEF");
        assert_eq!(abbreviate_stat("speed"), "SPD");
    }

    #[test]
    fn abbreviation_is_idempotent() {
        for name in PLACEHOLDER_STATS {
            let once = abbreviate_stat(name);
            assert_eq!(abbreviate_stat(&once), once);
        }
    }

    #[test]
    fn segments_always_cover_full_scale() {
        for value in 0..=STAT_MAX {
            let (filled, remainder) = segments_for(value);
            assert_eq!(filled + remainder, 255);
            assert_eq!(filled, value as u16);
        }
    }

    #[test]
    fn filled_cells_scale_with_width() {
        assert_eq!(filled_cells(20, 0), 0);
        assert_eq!(filled_cells(20, 255), 20);
        assert_eq!(filled_cells(20, 128), 10);
        assert_eq!(filled_cells(0, 200), 0);
    }

    #[test]
    fn spring_settles_on_target() {
        let mut spring = Spring::at(0);
        spring.retarget(120);
        let mut steps = 0;
        while spring.step(FRAME) {
            steps += 1;
            assert!(steps < 1000, "spring never settled");
        }
        assert_eq!(spring.position, 120.0);
        assert_eq!(spring.velocity, 0.0);
    }

    #[test]
    fn critically_damped_from_rest_does_not_overshoot() {
        let mut spring = Spring::at(10);
        spring.retarget(200);
        for _ in 0..600 {
            spring.step(FRAME);
            assert!(spring.position <= 200.0);
        }
    }

    #[test]
    fn retarget_mid_flight_converges_within_bounds() {
        let mut bar = StatBar::new("attack", 50);
        bar.retarget(200);
        for _ in 0..8 {
            bar.spring.step(FRAME);
        }
        let mid = bar.spring.position;
        assert!(mid > 50.0 && mid < 200.0, "should be mid-animation: {mid}");

        bar.retarget(100);
        assert_eq!(bar.spring.position, mid, "retarget must not restart");

        for _ in 0..1000 {
            bar.spring.step(FRAME);
            assert!((0.0..=255.0).contains(&bar.spring.position));
            let (filled, remainder) = bar.segments();
            assert_eq!(filled + remainder, 255);
        }
        assert_eq!(bar.rendered(), 100);
        assert!(!bar.is_animating());
    }

    #[test]
    fn large_steps_stay_stable() {
        let mut spring = Spring::at(0);
        spring.retarget(255);
        for _ in 0..10 {
            spring.step(1.0);
            assert!((0.0..=255.0).contains(&spring.position));
        }
        assert!(spring.is_settled());
    }

    #[test]
    fn retarget_bars_keeps_existing_springs() {
        let mut bars = placeholder_bars();
        bars[0].spring.position = 30.0;
        let stats = vec![("hp".to_string(), 45), ("attack".to_string(), 49)];
        retarget_bars(&mut bars, &stats);

        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].name, "hp");
        assert_eq!(bars[0].value, 45);
        assert_eq!(bars[0].spring.position, 30.0);
        assert_eq!(bars[1].spring.position, PLACEHOLDER_VALUE as f32);
        assert_eq!(bars[1].spring.target, 49.0);
    }
}
