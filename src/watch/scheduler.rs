//! Debounce state machine driving re-scans
//!
//! Pure and clock-agnostic: the caller passes `now` in, so the timing rules can
//! be exercised without sleeping.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    /// A scan is due at the deadline
    Pending(Instant),
    Scanning,
}

/// What the event loop should do next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Poll {
    /// Start a scan now; the scheduler is in `Scanning` until `finish_scan`
    Fire,
    WaitUntil(Instant),
    WaitForEvent,
}

#[derive(Debug, Clone)]
pub struct DebounceScheduler {
    state: SchedulerState,
    delay: Duration,
    rescan_owed: bool,
}

impl DebounceScheduler {
    pub fn new(delay: Duration) -> Self {
        Self {
            state: SchedulerState::Idle,
            delay,
            rescan_owed: false,
        }
    }

    pub fn from_millis(delay_ms: u64) -> Self {
        Self::new(Duration::from_millis(delay_ms))
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Record a relevant filesystem event; each event restarts the delay
    pub fn on_event(&mut self, now: Instant) {
        match self.state {
            SchedulerState::Idle | SchedulerState::Pending(_) => {
                self.state = SchedulerState::Pending(now + self.delay);
            }
            SchedulerState::Scanning => self.rescan_owed = true,
        }
    }

    /// Decide the next step; a due deadline only fires while `allowed`
    pub fn poll(&mut self, now: Instant, allowed: bool) -> Poll {
        match self.state {
            SchedulerState::Pending(_) if !allowed => Poll::WaitForEvent,
            SchedulerState::Pending(deadline) if now >= deadline => {
                self.state = SchedulerState::Scanning;
                Poll::Fire
            }
            SchedulerState::Pending(deadline) => Poll::WaitUntil(deadline),
            SchedulerState::Idle | SchedulerState::Scanning => Poll::WaitForEvent,
        }
    }

    /// Leave `Scanning`; events seen during the scan schedule another one
    pub fn finish_scan(&mut self, now: Instant) {
        if self.state != SchedulerState::Scanning {
            return;
        }
        self.state = if std::mem::take(&mut self.rescan_owed) {
            SchedulerState::Pending(now + self.delay)
        } else {
            SchedulerState::Idle
        };
    }
}

impl Default for DebounceScheduler {
    fn default() -> Self {
        Self::from_millis(1500)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_idle_waits_for_events() {
        let mut scheduler = DebounceScheduler::from_millis(100);
        assert_eq!(scheduler.poll(Instant::now(), true), Poll::WaitForEvent);
        assert_eq!(scheduler.state(), SchedulerState::Idle);
    }

    #[test]
    fn test_burst_fires_once_after_last_event() {
        let t0 = Instant::now();
        let mut scheduler = DebounceScheduler::from_millis(1500);

        scheduler.on_event(t0);
        scheduler.on_event(t0 + ms(400));
        scheduler.on_event(t0 + ms(900));

        let due = t0 + ms(900) + ms(1500);
        assert_eq!(scheduler.poll(t0 + ms(1600), true), Poll::WaitUntil(due));
        assert_eq!(scheduler.poll(due - ms(1), true), Poll::WaitUntil(due));
        assert_eq!(scheduler.poll(due, true), Poll::Fire);
        assert_eq!(scheduler.state(), SchedulerState::Scanning);
        assert_eq!(scheduler.poll(due, true), Poll::WaitForEvent);

        scheduler.finish_scan(due + ms(50));
        assert_eq!(scheduler.state(), SchedulerState::Idle);
        assert_eq!(scheduler.poll(due + ms(5000), true), Poll::WaitForEvent);
    }

    #[test]
    fn test_event_during_scan_schedules_rescan() {
        let t0 = Instant::now();
        let mut scheduler = DebounceScheduler::from_millis(100);
        scheduler.on_event(t0);
        assert_eq!(scheduler.poll(t0 + ms(100), true), Poll::Fire);

        scheduler.on_event(t0 + ms(120));
        assert_eq!(scheduler.state(), SchedulerState::Scanning);

        scheduler.finish_scan(t0 + ms(200));
        assert_eq!(scheduler.state(), SchedulerState::Pending(t0 + ms(300)));
        assert_eq!(scheduler.poll(t0 + ms(300), true), Poll::Fire);
        scheduler.finish_scan(t0 + ms(310));
        assert_eq!(scheduler.state(), SchedulerState::Idle);
    }

    #[test]
    fn test_paused_deadline_holds_until_allowed() {
        let t0 = Instant::now();
        let mut scheduler = DebounceScheduler::from_millis(100);
        scheduler.on_event(t0);

        assert_eq!(scheduler.poll(t0 + ms(500), false), Poll::WaitForEvent);
        assert_eq!(scheduler.state(), SchedulerState::Pending(t0 + ms(100)));
        assert_eq!(scheduler.poll(t0 + ms(600), true), Poll::Fire);
    }

    #[test]
    fn test_finish_without_scan_is_ignored() {
        let t0 = Instant::now();
        let mut scheduler = DebounceScheduler::from_millis(100);
        scheduler.on_event(t0);
        scheduler.finish_scan(t0);
        assert_eq!(scheduler.state(), SchedulerState::Pending(t0 + ms(100)));
    }

    #[test]
    fn test_default_delay() {
        assert_eq!(DebounceScheduler::default().delay(), ms(1500));
    }
}
