//! Latest-response-wins ordering for overlapping fetches.
//!
//! Every outgoing request takes a [`Ticket`] from its stream's
//! [`RequestSequencer`]. When the response arrives the renderer calls
//! [`RequestSequencer::accept`]; a response is rendered only if its ticket
//! is newer than every ticket accepted before it, so a slow, older response
//! can never overwrite a newer one.

use std::sync::atomic::{AtomicU64, Ordering};

use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub fn get(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
pub struct RequestSequencer {
    issued: AtomicU64,
    accepted: AtomicU64,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tickets start at 1 and strictly increase.
    pub fn issue(&self) -> Ticket {
        Ticket(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Record `ticket` as rendered if it is the newest seen so far.
    pub fn accept(&self, ticket: Ticket) -> bool {
        let accepted = self
            .accepted
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                (ticket.0 > last).then_some(ticket.0)
            })
            .is_ok();
        if !accepted {
            debug!("Discarding response #{}: a newer one was already rendered", ticket.0);
        }
        accepted
    }

    pub fn last_accepted(&self) -> Option<Ticket> {
        match self.accepted.load(Ordering::SeqCst) {
            0 => None,
            n => Some(Ticket(n)),
        }
    }
}

/// One sequencer per independently refreshed view.
#[derive(Debug, Default)]
pub struct Streams {
    pub expenses: RequestSequencer,
    pub summary: RequestSequencer,
    pub comparison: RequestSequencer,
    pub daily: RequestSequencer,
}
