//! Process-group transport.
//!
//! `Transport` is the seam between the reduction protocol and whatever moves
//! bytes between ranks. Messages are typed: the coordinator sends
//! [`Message::Range`] requests (the sentinel range included) and workers answer
//! with [`Message::Partial`] reports. Sends and receives are blocking and
//! point-to-point; there is no timeout.
//!
//! `ChannelTransport` runs a group inside one process, one rank per thread,
//! with a dedicated channel for every ordered (source, destination) pair.

use crossbeam_channel::{unbounded, Receiver, Sender};

use psum_core::error::ReduceError;
use psum_core::planner::Range;

/// Encoded partial result, as sent by a worker.
#[derive(Debug, Clone, PartialEq)]
pub struct PartialReport {
    /// Declared payload length; travels ahead of the payload.
    pub len: u64,
    /// Canonical encoding of the partial value.
    pub bytes: Vec<u8>,
    /// Compute time on the worker, in seconds.
    pub elapsed_secs: f64,
}

impl PartialReport {
    /// Wrap an encoded value, declaring its length.
    #[must_use]
    pub fn new(bytes: Vec<u8>, elapsed_secs: f64) -> Self {
        Self {
            len: bytes.len() as u64,
            bytes,
            elapsed_secs,
        }
    }
}

/// A protocol message.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// Work request, or [`Range::SENTINEL`] to terminate.
    Range(Range),
    /// Result of one range.
    Partial(PartialReport),
    /// Barrier arrival (worker to root) or release (root to worker).
    Barrier,
}

impl Message {
    fn kind(&self) -> &'static str {
        match self {
            Self::Range(_) => "range",
            Self::Partial(_) => "partial result",
            Self::Barrier => "barrier token",
        }
    }
}

/// Blocking point-to-point transport between the ranks of a process group.
pub trait Transport: Send {
    /// Number of ranks in the group.
    fn group_size(&self) -> usize;

    /// Rank of this endpoint.
    fn rank(&self) -> usize;

    /// Largest payload a single message may carry, in bytes.
    fn max_message_bytes(&self) -> usize;

    /// Send `msg` to `dest`; returns once the transport has accepted it.
    fn send(&self, dest: usize, msg: Message) -> Result<(), ReduceError>;

    /// Block until a message from `src` arrives.
    fn recv(&self, src: usize) -> Result<Message, ReduceError>;

    /// Block until every rank of the group has reached the barrier.
    ///
    /// Ranks check in with rank 0, which releases them once all have arrived.
    /// A rank that vanished before arriving surfaces as [`ReduceError::PeerLost`]
    /// instead of a hang.
    fn barrier(&self) -> Result<(), ReduceError> {
        const ROOT: usize = 0;
        if self.rank() == ROOT {
            for src in 1..self.group_size() {
                expect_barrier(self, src)?;
            }
            for dest in 1..self.group_size() {
                self.send(dest, Message::Barrier)?;
            }
            Ok(())
        } else {
            self.send(ROOT, Message::Barrier)?;
            expect_barrier(self, ROOT)
        }
    }

    /// Send a work range (or the sentinel).
    fn send_range(&self, dest: usize, range: Range) -> Result<(), ReduceError> {
        self.send(dest, Message::Range(range))
    }

    /// Receive a work range from `src`.
    fn recv_range(&self, src: usize) -> Result<Range, ReduceError> {
        match self.recv(src)? {
            Message::Range(range) => Ok(range),
            other => Err(ReduceError::Protocol(format!(
                "rank {} expected a range from rank {src}, got a {}",
                self.rank(),
                other.kind()
            ))),
        }
    }

    /// Send an encoded partial result.
    ///
    /// Refuses payloads above the transport ceiling instead of truncating them.
    fn send_partial(&self, dest: usize, report: PartialReport) -> Result<(), ReduceError> {
        check_len(&report, self.max_message_bytes())?;
        self.send(dest, Message::Partial(report))
    }

    /// Receive an encoded partial result from `src`.
    fn recv_partial(&self, src: usize) -> Result<PartialReport, ReduceError> {
        match self.recv(src)? {
            Message::Partial(report) => {
                check_len(&report, self.max_message_bytes())?;
                Ok(report)
            }
            other => Err(ReduceError::Protocol(format!(
                "rank {} expected a partial result from rank {src}, got a {}",
                self.rank(),
                other.kind()
            ))),
        }
    }
}

fn expect_barrier<T: Transport + ?Sized>(transport: &T, src: usize) -> Result<(), ReduceError> {
    match transport.recv(src)? {
        Message::Barrier => Ok(()),
        other => Err(ReduceError::Protocol(format!(
            "rank {} expected a barrier token from rank {src}, got a {}",
            transport.rank(),
            other.kind()
        ))),
    }
}

fn check_len(report: &PartialReport, limit: usize) -> Result<(), ReduceError> {
    let declared = usize::try_from(report.len).unwrap_or(usize::MAX);
    if declared > limit || report.bytes.len() > limit {
        return Err(ReduceError::TransportOverflow {
            len: declared.max(report.bytes.len()),
            limit,
        });
    }
    if declared != report.bytes.len() {
        return Err(ReduceError::MalformedResult(format!(
            "declared length {declared} but received {} bytes",
            report.bytes.len()
        )));
    }
    Ok(())
}

/// In-process transport endpoint for one rank.
pub struct ChannelTransport {
    rank: usize,
    max_message_bytes: usize,
    outgoing: Vec<Sender<Message>>,
    incoming: Vec<Receiver<Message>>,
}

impl ChannelTransport {
    /// Build the endpoints of a group of `size` ranks, indexed by rank.
    #[must_use]
    pub fn group(size: usize, max_message_bytes: usize) -> Vec<ChannelTransport> {
        // channels[src][dest]
        let mut senders: Vec<Vec<Sender<Message>>> = Vec::with_capacity(size);
        let mut receivers: Vec<Vec<Option<Receiver<Message>>>> =
            (0..size).map(|_| (0..size).map(|_| None).collect()).collect();
        for src in 0..size {
            let mut row = Vec::with_capacity(size);
            for dest_row in &mut receivers {
                let (tx, rx) = unbounded();
                row.push(tx);
                dest_row[src] = Some(rx);
            }
            senders.push(row);
        }

        senders
            .into_iter()
            .zip(receivers)
            .enumerate()
            .map(|(rank, (outgoing, incoming))| ChannelTransport {
                rank,
                max_message_bytes,
                outgoing,
                incoming: incoming.into_iter().flatten().collect(),
            })
            .collect()
    }

    /// Whether no message from `src` is waiting.
    #[must_use]
    pub fn is_idle(&self, src: usize) -> bool {
        self.incoming.get(src).map_or(true, Receiver::is_empty)
    }

    fn check_peer(&self, peer: usize) -> Result<(), ReduceError> {
        if peer >= self.outgoing.len() || peer == self.rank {
            return Err(ReduceError::Protocol(format!(
                "rank {} cannot address rank {peer} in a group of {}",
                self.rank,
                self.outgoing.len()
            )));
        }
        Ok(())
    }
}

impl Transport for ChannelTransport {
    fn group_size(&self) -> usize {
        self.outgoing.len()
    }

    fn rank(&self) -> usize {
        self.rank
    }

    fn max_message_bytes(&self) -> usize {
        self.max_message_bytes
    }

    fn send(&self, dest: usize, msg: Message) -> Result<(), ReduceError> {
        self.check_peer(dest)?;
        self.outgoing[dest]
            .send(msg)
            .map_err(|_| ReduceError::PeerLost { rank: dest })
    }

    fn recv(&self, src: usize) -> Result<Message, ReduceError> {
        self.check_peer(src)?;
        self.incoming[src]
            .recv()
            .map_err(|_| ReduceError::PeerLost { rank: src })
    }
}
