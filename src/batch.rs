//! Batch Assembler (C4): an ordered accumulator of [`Command`] records
//! representing either an atomic transaction (`MULTI`/`EXEC`) or a
//! non-atomic pipeline, plus the side index of positions whose response must
//! be decoded as a set rather than an array.

use std::time::Duration;

use crate::{
    commands::expects_set_decoding,
    protocol::{Command, RequestType},
};

/// Retry policy for a non-atomic batch, forwarded on the outgoing frame
/// (§4.5) so the transport — which owns retry/backoff execution (§D
/// Non-goals) — knows which failure classes this caller has opted into
/// redriving. Both flags default `false`; enabling either accepts the hazard
/// of out-of-order or duplicate execution that retrying a pipeline against a
/// reordering transport can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RetryStrategy {
    pub retry_server_error: bool,
    pub retry_connection_error: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Atomic,
    Pipeline,
}

/// An ordered sequence of commands submitted to the multiplexer as a single
/// unit. Atomic batches are wrapped in `MULTI`/`EXEC` by [`Batch::finish`];
/// non-atomic batches are submitted as a bare pipeline frame.
#[derive(Debug, Clone)]
pub struct Batch {
    mode: Mode,
    commands: Vec<Command>,
    set_decoded_positions: Vec<usize>,
    retry: RetryStrategy,
    timeout: Option<Duration>,
}

impl Batch {
    /// An atomic transaction: the transport wraps the member commands in
    /// `MULTI`/`EXEC` and honors any `WATCH`ed keys; a conflict or member
    /// failure aborts the whole batch with `ExecAbortError` for every slot.
    pub fn atomic() -> Self {
        Batch {
            mode: Mode::Atomic,
            commands: Vec::new(),
            set_decoded_positions: Vec::new(),
            retry: RetryStrategy::default(),
            timeout: None,
        }
    }

    /// A non-atomic pipeline: member commands are independent; a failing
    /// command's error is stored at its position while siblings proceed.
    pub fn pipeline() -> Self {
        Batch {
            mode: Mode::Pipeline,
            commands: Vec::new(),
            set_decoded_positions: Vec::new(),
            retry: RetryStrategy::default(),
            timeout: None,
        }
    }

    pub fn is_atomic(&self) -> bool {
        self.mode == Mode::Atomic
    }

    /// Sets the retry strategy for a non-atomic batch. Ignored on an atomic
    /// batch — the multiplexer never forwards it on the outgoing frame,
    /// since an atomic batch is never retried silently.
    pub fn with_retry_strategy(mut self, retry: RetryStrategy) -> Self {
        self.retry = retry;
        self
    }

    pub fn retry_strategy(&self) -> RetryStrategy {
        self.retry
    }

    /// Sets this batch's timeout option, one of the three inputs to the
    /// multiplexer's "effective timeout" (§4.5: per-call override, batch
    /// option, client default — narrowest wins).
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Appends a command produced by a [`crate::commands`] factory, recording
    /// its position in the set-decoding side index when its request type
    /// returns a set-shaped reply.
    pub fn add(&mut self, command: Command) -> &mut Self {
        if expects_set_decoding(command.request_type) {
            self.set_decoded_positions.push(self.commands.len());
        }
        self.commands.push(command);
        self
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Positions whose response the multiplexer must decode as a set rather
    /// than an array, in ascending order.
    pub fn set_decoded_positions(&self) -> &[usize] {
        &self.set_decoded_positions
    }

    /// Produces the final command sequence to hand to the multiplexer: for
    /// an atomic batch this wraps the member commands in `MULTI`/`EXEC`,
    /// shifting every recorded set-decoding position by one to account for
    /// the leading `MULTI` reply; a non-atomic batch is returned unwrapped.
    pub fn finish(self) -> (Vec<Command>, Vec<usize>) {
        match self.mode {
            Mode::Pipeline => (self.commands, self.set_decoded_positions),
            Mode::Atomic => {
                let mut wrapped = Vec::with_capacity(self.commands.len() + 2);
                wrapped.push(Command::new(RequestType::Multi, Vec::new()));
                wrapped.extend(self.commands);
                wrapped.push(Command::new(RequestType::Exec, Vec::new()));
                let shifted = self.set_decoded_positions.iter().map(|pos| pos + 1).collect();
                (wrapped, shifted)
            }
        }
    }
}

#[cfg(test)]
mod test;
