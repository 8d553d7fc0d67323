use crate::{Job, Stats};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// A poll cycle begins; advances the cycle counter.
    CycleStarted,
    /// Result of the current-job fetch. A failed fetch arrives as `None`.
    CurrentJobLoaded(Option<Job>),
    /// Final state of a job that just stopped being current.
    OutgoingJobResolved {
        /// The record last seen as current.
        outgoing: Job,
        /// Fresh record from the by-id lookup, `None` when it failed.
        latest: Option<Job>,
    },
    /// Fresh stats snapshot.
    StatsLoaded(Stats),
    /// All fetches of the cycle have settled.
    CycleFinished,
}
