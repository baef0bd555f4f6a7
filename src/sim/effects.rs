//! Short-lived visual effects: explosions and score popups

use std::time::Instant;

use glam::Vec2;

use super::timer::{Animator, Timer};
use crate::consts::{EXPLOSION_FRAME_DELAY, SCORE_STAY_TIME};
use crate::settings::secs;

const LARGE_FRAMES: usize = 5;
const SMALL_FRAMES: usize = 3;

/// Scores that have a popup sprite
pub const POPUP_SCORES: [u32; 5] = [100, 200, 300, 400, 500];

#[derive(Debug, Clone)]
pub struct Explosion {
    pub center: Vec2,
    /// Full-size blast (tank or base) rather than a shot impact
    pub large: bool,
    animator: Animator,
}

impl Explosion {
    pub fn new(center: Vec2, large: bool, now: Instant) -> Self {
        let frames = if large { LARGE_FRAMES } else { SMALL_FRAMES };
        Self {
            center,
            large,
            animator: Animator::new(secs(EXPLOSION_FRAME_DELAY), frames, true, now),
        }
    }

    pub fn frame(&self) -> usize {
        self.animator.state()
    }

    /// Advance the animation; false once the last frame has played
    pub fn update(&mut self, now: Instant) -> bool {
        self.animator.poll(now);
        !self.animator.is_done()
    }
}

#[derive(Debug, Clone)]
pub struct ScorePopup {
    pub pos: Vec2,
    pub score: u32,
    timer: Timer,
}

impl ScorePopup {
    /// Popup for `score`, or `None` when the value has no sprite
    pub fn new(pos: Vec2, score: u32, now: Instant) -> Option<Self> {
        if !POPUP_SCORES.contains(&score) {
            log::warn!("No score popup for {}", score);
            return None;
        }
        Some(Self {
            pos,
            score,
            timer: Timer::armed(secs(SCORE_STAY_TIME), now),
        })
    }

    /// False once the popup has been shown long enough
    pub fn update(&mut self, now: Instant) -> bool {
        !self.timer.tick(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_small_explosion_runs_three_frames() {
        let t0 = Instant::now();
        let step = secs(EXPLOSION_FRAME_DELAY);
        let mut e = Explosion::new(Vec2::ZERO, false, t0);
        assert!(e.update(t0 + step));
        assert_eq!(e.frame(), 1);
        assert!(e.update(t0 + step * 2));
        assert!(!e.update(t0 + step * 3));
        assert_eq!(e.frame(), 2);
    }

    #[test]
    fn test_large_explosion_outlives_small() {
        let t0 = Instant::now();
        let step = secs(EXPLOSION_FRAME_DELAY);
        let mut e = Explosion::new(Vec2::ZERO, true, t0);
        for i in 1..=4 {
            assert!(e.update(t0 + step * i));
        }
        assert!(!e.update(t0 + step * 5));
    }

    #[test]
    fn test_popup_expires() {
        let t0 = Instant::now();
        let mut p = ScorePopup::new(Vec2::ZERO, 300, t0).expect("supported score");
        assert!(p.update(t0 + Duration::from_millis(999)));
        assert!(!p.update(t0 + Duration::from_secs(1)));
    }

    #[test]
    fn test_unknown_score_is_dropped() {
        assert!(ScorePopup::new(Vec2::ZERO, 0, Instant::now()).is_none());
        assert!(ScorePopup::new(Vec2::ZERO, 1000, Instant::now()).is_none());
    }
}
