//! In-process process group: one OS thread per rank.
//!
//! Every ordered pair of ranks `(src, dst)` owns a zero-capacity
//! `crossbeam-channel`, so `send` returns only once the destination has
//! taken the message. Messages between one pair arrive in the order they
//! were sent. When a rank's thread finishes or panics its channel ends are
//! dropped, and a peer still waiting on it gets a `Communication` error
//! instead of blocking forever.

use crate::communication_error;
use crate::core::error::{ColmaxError, Result};
use crate::core::types::*;
use crate::network::{check_rank, ProcessGroup};
use crossbeam_channel::{bounded, Receiver, Sender};
use log::{debug, trace};
use std::cell::Cell;
use std::thread;

#[derive(Debug)]
struct Envelope {
    tag: Tag,
    payload: Vec<Value>,
}

/// One rank's endpoint in an in-process group.
#[derive(Debug)]
pub struct LocalGroup {
    rank: Rank,
    size: usize,
    /// outboxes[dst] carries messages from this rank to `dst`
    outboxes: Vec<Sender<Envelope>>,
    /// inboxes[src] carries messages from `src` to this rank
    inboxes: Vec<Receiver<Envelope>>,
    sent: Cell<usize>,
}

impl LocalGroup {
    /// Create connected endpoints for every rank of a group of `size`.
    ///
    /// The endpoints must be driven from different threads; a rank blocks in
    /// `send` until its peer receives.
    pub fn create(size: usize) -> Result<Vec<LocalGroup>> {
        if size == 0 {
            return Err(ColmaxError::invalid_parameter(
                "num_ranks",
                "0",
                "a process group needs at least one rank",
            ));
        }

        let mut outboxes: Vec<Vec<Sender<Envelope>>> = (0..size).map(|_| Vec::new()).collect();
        let mut inboxes: Vec<Vec<Receiver<Envelope>>> = (0..size).map(|_| Vec::new()).collect();
        for src in 0..size {
            for dst in 0..size {
                let (tx, rx) = bounded(0);
                outboxes[src].push(tx);
                inboxes[dst].push(rx);
            }
        }

        Ok(outboxes
            .into_iter()
            .zip(inboxes)
            .enumerate()
            .map(|(rank, (outboxes, inboxes))| LocalGroup {
                rank,
                size,
                outboxes,
                inboxes,
                sent: Cell::new(0),
            })
            .collect())
    }

    /// A group containing only this rank.
    pub fn single() -> LocalGroup {
        let (tx, rx) = bounded(0);
        LocalGroup {
            rank: 0,
            size: 1,
            outboxes: vec![tx],
            inboxes: vec![rx],
            sent: Cell::new(0),
        }
    }

    /// Run `f` once per rank, each on its own thread, and collect the return
    /// values in rank order.
    ///
    /// If any rank panics, the remaining ranks are still joined and the first
    /// panic is then resumed on the calling thread.
    pub fn run<F, T>(size: usize, f: F) -> Result<Vec<T>>
    where
        F: Fn(&LocalGroup) -> T + Sync,
        T: Send,
    {
        let groups = Self::create(size)?;
        debug!("Launching {} local ranks", size);

        let f = &f;
        thread::scope(|scope| -> Result<Vec<T>> {
            let mut handles = Vec::with_capacity(size);
            for group in groups {
                let handle = thread::Builder::new()
                    .name(format!("rank-{}", group.rank))
                    .spawn_scoped(scope, move || f(&group))?;
                handles.push(handle);
            }

            let mut results = Vec::with_capacity(size);
            let mut first_panic = None;
            for handle in handles {
                match handle.join() {
                    Ok(value) => results.push(value),
                    Err(payload) => {
                        if first_panic.is_none() {
                            first_panic = Some(payload);
                        }
                    }
                }
            }
            if let Some(payload) = first_panic {
                std::panic::resume_unwind(payload);
            }
            Ok(results)
        })
    }

    /// Number of point-to-point messages this rank has sent so far.
    pub fn messages_sent(&self) -> usize {
        self.sent.get()
    }

    fn check_peer(&self, peer: Rank) -> Result<()> {
        check_rank(peer, self.size)?;
        if peer == self.rank {
            return Err(communication_error!(
                "rank {} cannot exchange messages with itself",
                self.rank
            ));
        }
        Ok(())
    }
}

impl ProcessGroup for LocalGroup {
    fn rank(&self) -> Rank {
        self.rank
    }

    fn size(&self) -> usize {
        self.size
    }

    fn send(&self, dest: Rank, tag: Tag, data: &[Value]) -> Result<()> {
        self.check_peer(dest)?;
        trace!("rank {} -> {}: tag {}, {} values", self.rank, dest, tag, data.len());
        let envelope = Envelope {
            tag,
            payload: data.to_vec(),
        };
        self.outboxes[dest].send(envelope).map_err(|_| {
            communication_error!("rank {} disconnected before receiving from {}", dest, self.rank)
        })?;
        self.sent.set(self.sent.get() + 1);
        Ok(())
    }

    fn recv(&self, source: Rank, tag: Tag, buffer: &mut [Value]) -> Result<()> {
        self.check_peer(source)?;
        let envelope = self.inboxes[source].recv().map_err(|_| {
            communication_error!("rank {} disconnected before sending to {}", source, self.rank)
        })?;
        trace!(
            "rank {} <- {}: tag {}, {} values",
            self.rank,
            source,
            envelope.tag,
            envelope.payload.len()
        );

        if envelope.tag != tag {
            return Err(communication_error!(
                "rank {} expected tag {} from {}, got {}",
                self.rank,
                tag,
                source,
                envelope.tag
            ));
        }
        if envelope.payload.len() != buffer.len() {
            return Err(communication_error!(
                "rank {} expected {} values from {}, got {}",
                self.rank,
                buffer.len(),
                source,
                envelope.payload.len()
            ));
        }
        buffer.copy_from_slice(&envelope.payload);
        Ok(())
    }
}
