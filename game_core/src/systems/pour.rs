use crate::Vessel;

/// Fill accumulation for the active vessel
///
/// Fill grows by `speed` units per second of real elapsed time between frame
/// samples, so the result does not depend on the frame rate.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Pour {
    pub fill: f64,
    holding: bool,
    last_sample_ms: Option<f64>,
}

impl Pour {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_holding(&self) -> bool {
        self.holding
    }

    /// Input pressed: the press time is the first sample
    pub fn start(&mut self, now_ms: f64) {
        self.holding = true;
        self.last_sample_ms = Some(now_ms);
    }

    /// Frame sample while held. Returns the new fill.
    pub fn sample(&mut self, now_ms: f64, speed: f64, vessel: &Vessel) -> f64 {
        if !self.holding {
            return self.fill;
        }
        let last = match self.last_sample_ms {
            Some(last) => {
                let dt = ((now_ms - last) / 1000.0).max(0.0);
                self.fill = (self.fill + speed * dt).min(vessel.max_fill());
                last.max(now_ms)
            }
            None => now_ms,
        };
        // Never rewinds, so the deltas sum to the real hold time
        self.last_sample_ms = Some(last);
        self.fill
    }

    /// Input released or play interrupted. Returns whether a pour was in progress.
    pub fn stop(&mut self) -> bool {
        let was_holding = self.holding;
        self.holding = false;
        self.last_sample_ms = None;
        was_holding
    }

    /// Empty vessel for the next attempt
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CUP: Vessel = Vessel::new(20.0, 20);

    #[test]
    fn test_fill_uses_elapsed_time() {
        let mut pour = Pour::new();
        pour.start(1000.0);
        pour.sample(1500.0, 30.0, &CUP);
        assert!((pour.fill - 15.0).abs() < 1e-9, "0.5s at 30/s = 15, got {}", pour.fill);
    }

    #[test]
    fn test_fill_is_frame_rate_independent() {
        let mut coarse = Pour::new();
        coarse.start(0.0);
        coarse.sample(400.0, 30.0, &CUP);

        let mut fine = Pour::new();
        fine.start(0.0);
        for i in 1..=40 {
            fine.sample(f64::from(i) * 10.0, 30.0, &CUP);
        }
        assert!((coarse.fill - fine.fill).abs() < 1e-9);
    }

    #[test]
    fn test_fill_clamped_at_overfill() {
        let mut pour = Pour::new();
        pour.start(0.0);
        pour.sample(10_000.0, 30.0, &CUP);
        assert_eq!(pour.fill, 30.0, "Clamp at 1.5x capacity");
    }

    #[test]
    fn test_no_fill_when_not_holding() {
        let mut pour = Pour::new();
        pour.sample(500.0, 30.0, &CUP);
        assert_eq!(pour.fill, 0.0);

        pour.start(0.0);
        pour.sample(100.0, 30.0, &CUP);
        let held = pour.fill;
        assert!(pour.stop());
        pour.sample(900.0, 30.0, &CUP);
        assert_eq!(pour.fill, held, "Released pour must not accumulate");
    }

    #[test]
    fn test_release_before_first_frame_keeps_fill() {
        let mut pour = Pour::new();
        pour.start(250.0);
        assert!(pour.stop());
        assert_eq!(pour.fill, 0.0);
        assert!(!pour.stop(), "Second release is a no-op");
    }

    #[test]
    fn test_frame_stamped_before_press_adds_nothing() {
        let mut pour = Pour::new();
        pour.start(1000.0);
        pour.sample(990.0, 30.0, &CUP);
        assert_eq!(pour.fill, 0.0);

        pour.sample(1010.0, 30.0, &CUP);
        assert!(
            (pour.fill - 0.3).abs() < 1e-9,
            "10ms held at 30/s = 0.3, got {}",
            pour.fill
        );
    }
}
