//! Callback-slot table: a free-list mapping the `u32` `callback_index`
//! carried on the IPC channel to a parked completion waiter, grounded on the
//! id_set free-list used to hand out pool-checkout tokens elsewhere in this
//! crate's teacher lineage. Staleness after a client-side timeout is handled
//! by tombstoning the slot ([`SlotState::Abandoned`]) rather than by a
//! generation counter: the index stays reserved, unreadable by any new
//! request, until the late response (or a second abandonment) arrives.

use tokio::sync::oneshot;

use crate::{
    decoder::{ExpectedShape, RawResponse, Value},
    error::Result,
};

/// What a response arriving at a slot should be decoded as, recorded at
/// submit time so the multiplexer can apply set/array-of-sets conversion
/// before completing the waiter.
pub type ExpectedDecoding = ExpectedShape;

enum SlotState {
    Empty,
    Live {
        waiter: oneshot::Sender<Result<Value>>,
        expected_decoding: ExpectedDecoding,
    },
    /// A batch/pipeline submission: the multiplexer hands back the raw,
    /// undecoded response tree so [`crate::multiplexer::Multiplexer`] can
    /// split it positionally and apply per-position set decoding itself,
    /// rather than through the single-command `expected_decoding` path.
    LiveBatch {
        waiter: oneshot::Sender<Result<RawResponse>>,
    },
    /// The caller's waiter has already been resolved with a timeout error;
    /// the index stays reserved so a late response can be discarded instead
    /// of being delivered to whichever new request reused the index.
    Abandoned,
}

struct Entry {
    state: SlotState,
}

/// Table of in-flight callback slots. Indices are reused only after a slot
/// has been freed, never while `Live`, `LiveBatch`, or `Abandoned`.
#[derive(Default)]
pub struct CallbackTable {
    entries: Vec<Entry>,
    free: Vec<u32>,
}

impl CallbackTable {
    pub fn new() -> Self {
        CallbackTable {
            entries: Vec::new(),
            free: Vec::new(),
        }
    }

    fn reserve(&mut self, state: SlotState) -> u32 {
        if let Some(index) = self.free.pop() {
            self.entries[index as usize].state = state;
            index
        } else {
            let index = self.entries.len() as u32;
            self.entries.push(Entry { state });
            index
        }
    }

    /// Allocates the next free index, installs a one-shot waiter under it,
    /// and returns both the index to write on the outgoing frame and the
    /// receiver the caller awaits.
    pub fn allocate(
        &mut self,
        expected_decoding: ExpectedDecoding,
    ) -> (u32, oneshot::Receiver<Result<Value>>) {
        let (waiter, receiver) = oneshot::channel();
        let index = self.reserve(SlotState::Live {
            waiter,
            expected_decoding,
        });
        (index, receiver)
    }

    /// Allocates a slot for a batch/pipeline submission, whose single
    /// response frame carries the whole, undecoded response tree.
    pub fn allocate_batch(&mut self) -> (u32, oneshot::Receiver<Result<RawResponse>>) {
        let (waiter, receiver) = oneshot::channel();
        let index = self.reserve(SlotState::LiveBatch { waiter });
        (index, receiver)
    }

    /// Completes the waiter at `index` with `result` and frees the slot. A
    /// response for an `Abandoned` slot is silently discarded (the late
    /// response is expected, not an error); a response for an `Empty` slot
    /// means the transport violated the one-response-per-index invariant.
    pub fn complete(&mut self, index: u32, result: Result<Value>) -> Result<()> {
        let entry = self
            .entries
            .get_mut(index as usize)
            .ok_or_else(|| crate::error::Error::internal("response for unknown callback index"))?;

        match std::mem::replace(&mut entry.state, SlotState::Empty) {
            SlotState::Live { waiter, .. } => {
                let _ = waiter.send(result);
                self.free.push(index);
                Ok(())
            }
            SlotState::LiveBatch { .. } => Err(crate::error::Error::internal(
                "response for callback index does not match its submission kind",
            )),
            SlotState::Abandoned => {
                self.free.push(index);
                Ok(())
            }
            SlotState::Empty => Err(crate::error::Error::internal(
                "response for callback index with no live slot",
            )),
        }
    }

    /// Completes a batch slot at `index` with the raw, undecoded response
    /// tree and frees it. Same abandon/unknown-index handling as
    /// [`CallbackTable::complete`].
    pub fn complete_batch(&mut self, index: u32, result: Result<RawResponse>) -> Result<()> {
        let entry = self
            .entries
            .get_mut(index as usize)
            .ok_or_else(|| crate::error::Error::internal("response for unknown callback index"))?;

        match std::mem::replace(&mut entry.state, SlotState::Empty) {
            SlotState::LiveBatch { waiter } => {
                let _ = waiter.send(result);
                self.free.push(index);
                Ok(())
            }
            SlotState::Live { .. } => Err(crate::error::Error::internal(
                "response for callback index does not match its submission kind",
            )),
            SlotState::Abandoned => {
                self.free.push(index);
                Ok(())
            }
            SlotState::Empty => Err(crate::error::Error::internal(
                "response for callback index with no live slot",
            )),
        }
    }

    /// Marks a slot abandoned after its caller-side waiter was already
    /// resolved with a timeout error. The index is not freed until the
    /// matching response (or another abandonment) arrives.
    pub fn abandon(&mut self, index: u32) {
        if let Some(entry) = self.entries.get_mut(index as usize) {
            if matches!(entry.state, SlotState::Live { .. } | SlotState::LiveBatch { .. }) {
                entry.state = SlotState::Abandoned;
            }
        }
    }

    pub fn expected_decoding(&self, index: u32) -> Option<&ExpectedDecoding> {
        match self.entries.get(index as usize).map(|e| &e.state) {
            Some(SlotState::Live { expected_decoding, .. }) => Some(expected_decoding),
            _ => None,
        }
    }

    /// Drains every live slot with `closing_error`, per §4.5 step 5. Called
    /// once, when the IPC channel closes.
    pub fn close_all(&mut self, error: crate::error::Error) {
        for entry in &mut self.entries {
            match std::mem::replace(&mut entry.state, SlotState::Empty) {
                SlotState::Live { waiter, .. } => {
                    let _ = waiter.send(Err(error.clone()));
                }
                SlotState::LiveBatch { waiter } => {
                    let _ = waiter.send(Err(error.clone()));
                }
                SlotState::Abandoned | SlotState::Empty => {}
            }
        }
        self.free.clear();
    }
}

#[cfg(test)]
mod test;
