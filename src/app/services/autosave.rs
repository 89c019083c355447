use std::time::Duration;

/// Fixed-interval autosave schedule. The host polls [`Autosave::is_due`] from
/// its event loop; nothing here spawns timers or threads.
#[derive(Debug, Clone)]
pub struct Autosave {
    interval_millis: i64,
    last_run: i64,
}

impl Autosave {
    pub fn new(interval: Duration, started_at: i64) -> Self {
        Self {
            interval_millis: interval.as_millis() as i64,
            last_run: started_at,
        }
    }

    pub fn is_due(&self, now: i64) -> bool {
        now - self.last_run >= self.interval_millis
    }

    pub fn mark_run(&mut self, now: i64) {
        self.last_run = now;
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_millis as u64)
    }
}
