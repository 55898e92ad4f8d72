//! Background colour easing and icon bounce.

use std::time::Duration;

use crate::model::Rgb;

pub const COLOR_TICK: Duration = Duration::from_millis(40);
pub const PHASE_TICK: Duration = Duration::from_millis(30);

const PHASE_STEP: f64 = 0.15;
const BOUNCE_AMPLITUDE: f64 = 10.0;
const SNAP_DISTANCE: i16 = 2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationState {
    current: Rgb,
    target: Rgb,
    phase: f64,
}

impl AnimationState {
    pub fn new(initial: Rgb) -> Self {
        Self { current: initial, target: initial, phase: 0.0 }
    }

    pub fn current(&self) -> Rgb {
        self.current
    }

    pub fn target(&self) -> Rgb {
        self.target
    }

    pub fn phase(&self) -> f64 {
        self.phase
    }

    pub fn set_target(&mut self, target: Rgb) {
        self.target = target;
    }

    /// Moves each channel a tenth of the way to the target, snapping once
    /// within two units of it.
    pub fn tick_color(&mut self) {
        let [cr, cg, cb] = self.current.channels();
        let [tr, tg, tb] = self.target.channels();
        self.current = Rgb(ease(cr, tr), ease(cg, tg), ease(cb, tb));
    }

    pub fn tick_phase(&mut self) {
        self.phase += PHASE_STEP;
    }

    /// Vertical icon offset in [-10, 10].
    pub fn icon_offset(&self) -> i16 {
        (BOUNCE_AMPLITUDE * self.phase.sin()) as i16
    }

    pub fn is_settled(&self) -> bool {
        self.current == self.target
    }
}

fn ease(current: u8, target: u8) -> u8 {
    let diff = i16::from(target) - i16::from(current);
    if diff.abs() <= SNAP_DISTANCE {
        return target;
    }
    // |diff| > SNAP_DISTANCE here, so the floor step can't overshoot.
    let step = (diff.abs() / 10).max(SNAP_DISTANCE + 1);
    (i16::from(current) + step * diff.signum()) as u8
}
