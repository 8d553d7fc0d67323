use std::time::Duration;

use crate::Job;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Look the job up by id and report back with `Msg::OutgoingJobResolved`
    /// before the cycle finishes.
    ResolveOutgoingJob { job: Job },
    /// Start the next cycle after `delay`, measured from now.
    ScheduleNextPoll { delay: Duration },
}
