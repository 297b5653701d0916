//! Search status counters and their datagram encoding
//!
//! Message layout, little-endian:
//!
//! ```text
//! u16 N | u64 total | i16 name_len | name bytes | N × frame
//! frame = u16 problem_size | u16 candidate_count | u16 child_count
//!       | i16 cur_candidate | i16 cur_child
//! ```
//!
//! Frames run from the innermost search node out to the root.

use crate::error::{MastermindError, Result};
use std::cell::Cell;
use std::fmt;

const PREFIX_SIZE: usize = 2 + 8;
const NAME_LENGTH_SIZE: usize = 2;
const FRAME_SIZE: usize = 2 * 5;

/// Counters of one search node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusFrame {
    pub problem_size: u16,
    pub candidate_count: u16,
    /// Non-empty buckets of the current candidate
    pub child_count: u16,
    /// Index of the current candidate, -1 before the first
    pub cur_candidate: i16,
    /// Index of the current bucket, -1 before the first
    pub cur_child: i16,
}

impl StatusFrame {
    #[must_use]
    pub const fn new(problem_size: u16) -> Self {
        Self {
            problem_size,
            candidate_count: 0,
            child_count: 0,
            cur_candidate: -1,
            cur_child: -1,
        }
    }
}

impl fmt::Display for StatusFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "size={} candidates={}/{} children={}/{}",
            self.problem_size,
            self.cur_candidate,
            self.candidate_count,
            self.cur_child,
            self.child_count
        )
    }
}

/// Mutable status of a live search node
///
/// Interior mutability lets the node update its counters while child nodes
/// hold shared references to it.
#[derive(Debug)]
pub struct ProgressStatus {
    frame: Cell<StatusFrame>,
}

impl ProgressStatus {
    #[must_use]
    pub fn new(problem_size: usize) -> Self {
        Self {
            frame: Cell::new(StatusFrame::new(saturate(problem_size))),
        }
    }

    pub fn set_candidate_count(&self, count: usize) {
        self.update(|f| f.candidate_count = saturate(count));
    }

    /// Advance to the next candidate, which has `child_count` buckets
    pub fn next_candidate(&self, child_count: usize) {
        self.update(|f| {
            f.cur_candidate = f.cur_candidate.saturating_add(1);
            f.child_count = saturate(child_count);
            f.cur_child = -1;
        });
    }

    pub fn next_child(&self) {
        self.update(|f| f.cur_child = f.cur_child.saturating_add(1));
    }

    #[must_use]
    pub fn frame(&self) -> StatusFrame {
        self.frame.get()
    }

    fn update(&self, apply: impl FnOnce(&mut StatusFrame)) {
        let mut frame = self.frame.get();
        apply(&mut frame);
        self.frame.set(frame);
    }
}

fn saturate(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

/// A decoded progress message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressMessage {
    /// Entries into the recursive solver so far
    pub total: u64,
    /// Identifies the reporting search
    pub name: String,
    /// Innermost node first
    pub frames: Vec<StatusFrame>,
}

impl fmt::Display for ProgressMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} total={} depth={}", self.name, self.total, self.frames.len())?;
        if let Some(root) = self.frames.last() {
            write!(f, " root[{root}]")?;
        }
        Ok(())
    }
}

/// Encode a progress message
///
/// Names longer than `i16::MAX` bytes are truncated.
#[must_use]
pub fn make_message(total: u64, name: &str, frames: &[StatusFrame]) -> Vec<u8> {
    let name = &name.as_bytes()[..name.len().min(i16::MAX as usize)];
    let count = frames.len().min(usize::from(u16::MAX));

    let mut msg = Vec::with_capacity(PREFIX_SIZE + NAME_LENGTH_SIZE + name.len() + count * FRAME_SIZE);
    msg.extend_from_slice(&(count as u16).to_le_bytes());
    msg.extend_from_slice(&total.to_le_bytes());
    msg.extend_from_slice(&(name.len() as i16).to_le_bytes());
    msg.extend_from_slice(name);

    for frame in &frames[..count] {
        msg.extend_from_slice(&frame.problem_size.to_le_bytes());
        msg.extend_from_slice(&frame.candidate_count.to_le_bytes());
        msg.extend_from_slice(&frame.child_count.to_le_bytes());
        msg.extend_from_slice(&frame.cur_candidate.to_le_bytes());
        msg.extend_from_slice(&frame.cur_child.to_le_bytes());
    }
    msg
}

/// Decode a progress message
///
/// # Errors
/// Returns `Validation` if the message is truncated or the name length is negative.
pub fn parse_message(msg: &[u8]) -> Result<ProgressMessage> {
    let mut reader = Reader { msg, offset: 0 };

    let count = u16::from_le_bytes(reader.take()?);
    let total = u64::from_le_bytes(reader.take()?);
    let name_len = i16::from_le_bytes(reader.take()?);
    let name_len = usize::try_from(name_len).map_err(|_| {
        MastermindError::Validation(format!("Negative name length in progress message: {name_len}"))
    })?;
    let name = String::from_utf8_lossy(reader.slice(name_len)?).into_owned();

    let frames = (0..count)
        .map(|_| {
            Ok(StatusFrame {
                problem_size: u16::from_le_bytes(reader.take()?),
                candidate_count: u16::from_le_bytes(reader.take()?),
                child_count: u16::from_le_bytes(reader.take()?),
                cur_candidate: i16::from_le_bytes(reader.take()?),
                cur_child: i16::from_le_bytes(reader.take()?),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ProgressMessage { total, name, frames })
}

struct Reader<'m> {
    msg: &'m [u8],
    offset: usize,
}

impl<'m> Reader<'m> {
    fn slice(&mut self, len: usize) -> Result<&'m [u8]> {
        let end = self.offset + len;
        let bytes = self.msg.get(self.offset..end).ok_or_else(|| {
            MastermindError::Validation(format!(
                "Truncated progress message: need {end} bytes, have {}",
                self.msg.len()
            ))
        })?;
        self.offset = end;
        Ok(bytes)
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.slice(N)?);
        Ok(out)
    }
}
