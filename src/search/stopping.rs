use std::time::Instant;

/// decides when a search should stop before its natural end
pub trait StoppingCriterion {
    /// true if the search should stop now
    fn is_finished(&self) -> bool;
}

/// never stops the search
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverStoppingCriterion;

impl StoppingCriterion for NeverStoppingCriterion {
    fn is_finished(&self) -> bool { false }
}

/// stops the search after a given number of seconds (starting at its creation)
#[derive(Debug, Clone, Copy)]
pub struct TimeStoppingCriterion {
    /// creation time
    start: Instant,
    /// time limit (in seconds)
    limit: f32,
}

impl TimeStoppingCriterion {
    /// creates a criterion that stops after t seconds
    pub fn new(t:f32) -> Self {
        Self { start: Instant::now(), limit: t }
    }
}

impl StoppingCriterion for TimeStoppingCriterion {
    fn is_finished(&self) -> bool {
        self.start.elapsed().as_secs_f32() >= self.limit
    }
}
