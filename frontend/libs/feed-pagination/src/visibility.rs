//! Sentinel visibility trigger
//!
//! Turns a stream of "how much of the sentinel is on screen" readings into
//! load requests: every hidden → visible edge fires once.

#[derive(Debug, Clone)]
pub struct VisibilityTrigger {
    threshold: f64,
    visible: bool,
}

impl Default for VisibilityTrigger {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl VisibilityTrigger {
    /// `threshold` is the fraction (0.0 - 1.0) of the sentinel that must be
    /// on screen. 0.0 means any visible pixel; NaN and infinities count as 0.0.
    pub fn new(threshold: f64) -> Self {
        let threshold = if threshold.is_finite() { threshold } else { 0.0 };
        Self {
            threshold: threshold.clamp(0.0, 1.0),
            visible: false,
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Record a visibility reading; true when it is a load request
    pub fn observe(&mut self, fraction: f64) -> bool {
        let now_visible = fraction > 0.0 && fraction >= self.threshold;
        let fired = now_visible && !self.visible;
        self.visible = now_visible;
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_on_rising_edge_only() {
        let mut trigger = VisibilityTrigger::default();
        assert!(trigger.observe(0.2));
        assert!(!trigger.observe(0.6));
        assert!(!trigger.observe(1.0));
        assert!(!trigger.observe(0.0));
        assert!(trigger.observe(0.1));
    }

    #[test]
    fn test_threshold_respected() {
        let mut trigger = VisibilityTrigger::new(0.5);
        assert!(!trigger.observe(0.3));
        assert!(!trigger.is_visible());
        assert!(trigger.observe(0.5));
        assert!(!trigger.observe(0.9));
        // Dropping below threshold re-arms the trigger
        assert!(!trigger.observe(0.4));
        assert!(trigger.observe(1.0));
    }

    #[test]
    fn test_zero_fraction_never_visible() {
        let mut trigger = VisibilityTrigger::new(0.0);
        assert!(!trigger.observe(0.0));
        assert!(!trigger.is_visible());
    }

    #[test]
    fn test_non_finite_threshold_falls_back_to_any_pixel() {
        for threshold in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let mut trigger = VisibilityTrigger::new(threshold);
            assert_eq!(trigger.threshold(), 0.0);
            assert!(trigger.observe(0.1));
        }
    }

    #[test]
    fn test_threshold_clamped() {
        assert_eq!(VisibilityTrigger::new(3.0).threshold(), 1.0);
        assert_eq!(VisibilityTrigger::new(-1.0).threshold(), 0.0);
    }
}
