//! Mutation requests sent from the pool façade to its controller.

use crate::core::Result;
use crossbeam::channel::{self, Receiver, Sender};

/// What the controller is asked to do with the worker registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Action {
    AddWorker,
    RemoveWorker,
    /// Add or remove workers until the registry holds exactly this many
    Resize(usize),
}

/// A single registry mutation paired with its one-shot reply channel.
///
/// `respond` consumes the command, so each command is answered at most once.
/// A command dropped without an answer disconnects the reply channel, which
/// the waiting caller observes as a closed pool.
#[derive(Debug)]
pub(crate) struct Command {
    action: Action,
    reply: Sender<Result<usize>>,
}

impl Command {
    /// Build a command and the receiver its outcome will arrive on
    pub(crate) fn new(action: Action) -> (Self, Receiver<Result<usize>>) {
        // Capacity 1 so the controller never blocks on the reply
        let (reply, outcome) = channel::bounded(1);
        (Self { action, reply }, outcome)
    }

    pub(crate) fn action(&self) -> Action {
        self.action
    }

    pub(crate) fn respond(self, result: Result<usize>) {
        // The caller may have given up waiting; nothing to do then
        let _ = self.reply.send(result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PoolError;

    #[test]
    fn test_command_reply_delivered_once() {
        let (cmd, outcome) = Command::new(Action::RemoveWorker);
        assert_eq!(cmd.action(), Action::RemoveWorker);

        cmd.respond(Err(PoolError::NoWorkers));
        assert!(matches!(outcome.recv(), Ok(Err(PoolError::NoWorkers))));
        assert!(outcome.recv().is_err());
    }

    #[test]
    fn test_dropped_command_disconnects_reply() {
        let (cmd, outcome) = Command::new(Action::AddWorker);
        drop(cmd);
        assert!(outcome.recv().is_err());
    }
}
