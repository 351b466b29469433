//! Scroll synchronizer — keeps the messages viewport pinned to bottom.
//!
//! Two triggers, two named operations. A viewport size change (or the very
//! first observation) snaps instantly; a content-signal change (new or
//! mutated entries) scrolls smoothly over render ticks. Both triggers may
//! fire for one underlying event — a new message grows the content and
//! changes the signal — and both are idempotent: re-pinning at the bottom
//! moves nothing.
//!
//! Known limitation, kept deliberately: any growth force-pins to bottom.
//! A user who scrolled up to read history is pulled back down by the next
//! arrival; there is no sticky reading mode.

/// Fraction of the remaining distance covered per animation tick.
const SMOOTH_DIVISOR: u16 = 3;

#[derive(Debug, Default)]
pub struct ScrollSync {
    offset: u16,
    /// Pending smooth-scroll destination. None when settled.
    target: Option<u16>,
    last_viewport: Option<(u16, u16)>,
    last_signal: Option<u64>,
}

impl ScrollSync {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current scroll offset in rows from the top.
    pub fn offset(&self) -> u16 {
        self.offset
    }

    /// Feed one frame's geometry and content signal. `max_offset` is the
    /// bottom: total wrapped rows minus viewport height.
    pub fn observe(&mut self, viewport: (u16, u16), max_offset: u16, signal: u64) {
        let first = self.last_viewport.is_none();
        let size_changed = self.last_viewport != Some(viewport);
        let signal_changed = self.last_signal != Some(signal);
        self.last_viewport = Some(viewport);
        self.last_signal = Some(signal);

        if first || size_changed {
            self.snap_to_bottom(max_offset);
        }
        if signal_changed && !first {
            self.smooth_scroll_to_bottom(max_offset);
        }

        // Content never scrolls past its own end.
        self.offset = self.offset.min(max_offset);
        if let Some(t) = self.target {
            self.target = Some(t.min(max_offset));
        }
    }

    /// Jump to the bottom immediately. Used for the first render and for
    /// raw size-driven corrections.
    pub fn snap_to_bottom(&mut self, max_offset: u16) {
        self.offset = max_offset;
        self.target = None;
    }

    /// Glide to the bottom over the next few ticks. Used when the content
    /// signal reports new or updated messages.
    pub fn smooth_scroll_to_bottom(&mut self, max_offset: u16) {
        if self.offset == max_offset {
            self.target = None;
        } else {
            self.target = Some(max_offset);
        }
    }

    /// Advance the smooth animation by one render tick.
    pub fn tick(&mut self) {
        let Some(target) = self.target else { return };
        if target <= self.offset {
            self.offset = target;
            self.target = None;
            return;
        }
        let step = ((target - self.offset) / SMOOTH_DIVISOR).max(1);
        self.offset = (self.offset + step).min(target);
        if self.offset == target {
            self.target = None;
        }
    }

    /// Manual scroll from user keys. Cancels any running animation; the
    /// next growth re-pins regardless (see module note).
    pub fn scroll_by(&mut self, delta: i32, max_offset: u16) {
        self.target = None;
        let next = i64::from(self.offset) + i64::from(delta);
        self.offset = next.clamp(0, i64::from(max_offset)) as u16;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEW: (u16, u16) = (80, 24);

    fn settled(s: &mut ScrollSync) {
        for _ in 0..64 {
            s.tick();
        }
    }

    #[test]
    fn first_observation_snaps_to_bottom() {
        let mut s = ScrollSync::new();
        s.observe(VIEW, 40, 1);
        assert_eq!(s.offset(), 40);
    }

    #[test]
    fn size_change_snaps_instantly() {
        let mut s = ScrollSync::new();
        s.observe(VIEW, 40, 1);
        s.scroll_by(-20, 40);
        s.observe((80, 30), 34, 1);
        assert_eq!(s.offset(), 34);
    }

    #[test]
    fn signal_change_scrolls_smoothly() {
        let mut s = ScrollSync::new();
        s.observe(VIEW, 40, 1);
        s.scroll_by(-30, 40);
        s.observe(VIEW, 46, 2);
        // Not an instant jump.
        assert!(s.offset() < 46);
        settled(&mut s);
        assert_eq!(s.offset(), 46);
    }

    #[test]
    fn repinning_at_bottom_is_a_noop() {
        let mut s = ScrollSync::new();
        s.observe(VIEW, 40, 1);
        let before = s.offset();
        s.snap_to_bottom(40);
        s.smooth_scroll_to_bottom(40);
        s.tick();
        assert_eq!(s.offset(), before);
    }

    #[test]
    fn both_triggers_for_one_event_are_safe() {
        let mut s = ScrollSync::new();
        s.observe(VIEW, 40, 1);
        // A resize and a new message land in the same frame: the snap and
        // the smooth trigger both fire, and firing twice changes nothing.
        s.observe((80, 30), 44, 2);
        assert_eq!(s.offset(), 44);
        settled(&mut s);
        assert_eq!(s.offset(), 44);
    }

    #[test]
    fn animation_covers_the_distance_monotonically() {
        let mut s = ScrollSync::new();
        s.observe(VIEW, 0, 1);
        s.observe(VIEW, 90, 2);
        let mut last = s.offset();
        let mut steps = 0;
        while s.offset() < 90 {
            s.tick();
            assert!(s.offset() >= last);
            last = s.offset();
            steps += 1;
            assert!(steps < 200, "animation failed to settle");
        }
        assert!(steps > 1, "smooth scroll should take more than one tick");
    }

    #[test]
    fn shrinking_content_clamps_the_offset() {
        let mut s = ScrollSync::new();
        s.observe(VIEW, 40, 1);
        s.observe(VIEW, 10, 2);
        settled(&mut s);
        assert_eq!(s.offset(), 10);
    }

    #[test]
    fn manual_scroll_clamps_to_range() {
        let mut s = ScrollSync::new();
        s.observe(VIEW, 40, 1);
        s.scroll_by(-100, 40);
        assert_eq!(s.offset(), 0);
        s.scroll_by(100, 40);
        assert_eq!(s.offset(), 40);
    }

    #[test]
    fn unchanged_frame_leaves_offset_alone() {
        let mut s = ScrollSync::new();
        s.observe(VIEW, 40, 1);
        s.scroll_by(-15, 40);
        s.observe(VIEW, 40, 1);
        assert_eq!(s.offset(), 25);
    }
}
