//! Screen shake after destructions

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::{SHAKE_FRAMES, SHAKE_MAGNITUDE};

/// Countdown started by a shake flag; jitters the whole frame while active
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenShake {
    frames_left: u32,
}

impl ScreenShake {
    /// Start the countdown. Ignored while a shake is already running.
    pub fn trigger(&mut self) {
        if self.frames_left == 0 {
            self.frames_left = SHAKE_FRAMES;
        }
    }

    pub fn is_active(&self) -> bool {
        self.frames_left > 0
    }

    /// Offset for this frame in whole pixels, `[0, 0]` once the shake is over
    pub fn next_offset<R: Rng>(&mut self, rng: &mut R) -> [i32; 2] {
        if self.frames_left == 0 {
            return [0, 0];
        }
        self.frames_left -= 1;
        [
            rng.random_range(-SHAKE_MAGNITUDE..=SHAKE_MAGNITUDE),
            rng.random_range(-SHAKE_MAGNITUDE..=SHAKE_MAGNITUDE),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_shake_runs_for_fixed_frames() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut shake = ScreenShake::default();
        assert_eq!(shake.next_offset(&mut rng), [0, 0]);

        shake.trigger();
        for _ in 0..SHAKE_FRAMES {
            assert!(shake.is_active());
            let [x, y] = shake.next_offset(&mut rng);
            assert!(x.abs() <= SHAKE_MAGNITUDE && y.abs() <= SHAKE_MAGNITUDE);
        }
        assert!(!shake.is_active());
        assert_eq!(shake.next_offset(&mut rng), [0, 0]);
    }

    #[test]
    fn test_trigger_while_shaking_is_ignored() {
        let mut rng = Pcg32::seed_from_u64(6);
        let mut shake = ScreenShake::default();
        shake.trigger();
        for _ in 0..10 {
            shake.next_offset(&mut rng);
        }
        shake.trigger();
        for _ in 10..SHAKE_FRAMES {
            assert!(shake.is_active());
            shake.next_offset(&mut rng);
        }
        assert!(!shake.is_active());
    }
}
