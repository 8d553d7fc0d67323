use crate::{Effect, Msg, PollState};

/// Pure update function: applies a message to state and returns any effects.
///
/// One poll cycle is `CycleStarted`, `CurrentJobLoaded`, the
/// `OutgoingJobResolved` answering any `ResolveOutgoingJob` effect,
/// `StatsLoaded` when stats arrived, and finally `CycleFinished`.
pub fn update(mut state: PollState, msg: Msg) -> (PollState, Vec<Effect>) {
    let effects = match msg {
        Msg::CycleStarted => {
            state.begin_cycle();
            Vec::new()
        }
        Msg::CurrentJobLoaded(job) => state.apply_current_job(job),
        Msg::OutgoingJobResolved { outgoing, latest } => {
            state.apply_outgoing(outgoing, latest);
            Vec::new()
        }
        Msg::StatsLoaded(stats) => {
            state.apply_stats(stats);
            Vec::new()
        }
        Msg::CycleFinished => state.finish_cycle(),
    };

    (state, effects)
}
