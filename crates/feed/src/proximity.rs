use crate::FeedConfig;

/// Vertical extent of the scroll container's visible area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub top: f64,
    pub height: f64,
}

/// Vertical extent of the sentinel placed after the last rendered record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sentinel {
    pub top: f64,
    pub height: f64,
}

/// Emitted once per not-near to near transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdvanceTrigger;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SignalState {
    Detached,
    Observing { near: bool },
}

/// Edge detector deciding when the sentinel comes within the proximity margin.
#[derive(Debug, Clone)]
pub struct ProximitySignal {
    margin: f64,
    threshold: f64,
    state: SignalState,
}

impl ProximitySignal {
    #[must_use]
    pub fn new(margin: f64, threshold: f64) -> Self {
        Self {
            margin: margin.max(0.0),
            threshold: threshold.clamp(0.0, 1.0),
            state: SignalState::Detached,
        }
    }

    #[must_use]
    pub fn from_config(config: &FeedConfig) -> Self {
        Self::new(config.proximity_margin_px, config.proximity_threshold)
    }

    /// Start observing. Call again whenever the rendered list changes, so the
    /// next observation is judged against the sentinel's new position.
    pub fn attach(&mut self) {
        self.state = SignalState::Observing { near: false };
    }

    pub fn detach(&mut self) {
        self.state = SignalState::Detached;
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        matches!(self.state, SignalState::Observing { .. })
    }

    pub fn observe(&mut self, viewport: Viewport, sentinel: Sentinel) -> Option<AdvanceTrigger> {
        let SignalState::Observing { near: was_near } = self.state else {
            return None;
        };
        let near = self.is_near(viewport, sentinel);
        self.state = SignalState::Observing { near };
        (near && !was_near).then_some(AdvanceTrigger)
    }

    fn is_near(&self, viewport: Viewport, sentinel: Sentinel) -> bool {
        let zone_top = viewport.top - self.margin;
        let zone_bottom = viewport.top + viewport.height.max(0.0) + self.margin;

        if sentinel.height <= 0.0 {
            return sentinel.top >= zone_top && sentinel.top <= zone_bottom;
        }

        let sentinel_bottom = sentinel.top + sentinel.height;
        let overlap = sentinel_bottom.min(zone_bottom) - sentinel.top.max(zone_top);
        if overlap <= 0.0 {
            return false;
        }
        overlap / sentinel.height >= self.threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Viewport = Viewport {
        top: 0.0,
        height: 800.0,
    };

    fn sentinel(top: f64) -> Sentinel {
        Sentinel { top, height: 40.0 }
    }

    fn attached() -> ProximitySignal {
        let mut signal = ProximitySignal::new(20.0, 0.1);
        signal.attach();
        signal
    }

    #[test]
    fn fires_only_on_entering_edge() {
        let mut signal = attached();
        assert_eq!(signal.observe(VIEWPORT, sentinel(2000.0)), None);
        assert_eq!(signal.observe(VIEWPORT, sentinel(790.0)), Some(AdvanceTrigger));
        assert_eq!(signal.observe(VIEWPORT, sentinel(700.0)), None);
        assert_eq!(signal.observe(VIEWPORT, sentinel(600.0)), None);

        assert_eq!(signal.observe(VIEWPORT, sentinel(1500.0)), None);
        assert_eq!(signal.observe(VIEWPORT, sentinel(780.0)), Some(AdvanceTrigger));
    }

    #[test]
    fn margin_extends_the_viewport() {
        let mut signal = attached();
        // 815..855 overlaps the zone (ends at 820) by 5px = 12.5%.
        assert_eq!(signal.observe(VIEWPORT, sentinel(815.0)), Some(AdvanceTrigger));

        let mut signal = attached();
        // 818..858 overlaps by 2px = 5%, below the threshold.
        assert_eq!(signal.observe(VIEWPORT, sentinel(818.0)), None);
    }

    #[test]
    fn reattach_rearms_the_edge() {
        let mut signal = attached();
        assert!(signal.observe(VIEWPORT, sentinel(500.0)).is_some());
        assert!(signal.observe(VIEWPORT, sentinel(500.0)).is_none());

        signal.attach();
        assert!(signal.observe(VIEWPORT, sentinel(500.0)).is_some());
    }

    #[test]
    fn detached_signal_is_silent() {
        let mut signal = attached();
        signal.detach();
        assert!(!signal.is_attached());
        assert_eq!(signal.observe(VIEWPORT, sentinel(500.0)), None);
    }

    #[test]
    fn zero_height_sentinel_uses_position() {
        let mut signal = attached();
        let point = Sentinel {
            top: 810.0,
            height: 0.0,
        };
        assert_eq!(signal.observe(VIEWPORT, point), Some(AdvanceTrigger));
    }
}
