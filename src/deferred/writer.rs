// bitweave
// Copyright (C) 2024  bitweave contributors
// SPDX-License-Identifier: GPL-3.0-or-later WITH Classpath-exception-2.0

// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.

// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Deferred binary writer (spec §4.5): wraps an underlying bit-stream
//! writer. Writes accumulate in an ordered queue and only reach the
//! underlying stream on transaction commit — bit streams are rarely
//! random-access for writes, so the engine accumulates and flushes once
//! an encode has fully succeeded.

use alloc::vec::Vec;
use core::mem;

use crate::outcome::VoidOutcome;
use crate::model::BitValue;
use crate::stream::{BitStreamSeeker, BitStreamWriter};
use crate::transaction::{shared, Shared, Transaction};

#[derive(Debug, Clone)]
enum QueuedOp {
    Write(BitValue),
    MoveBy(i64),
}

/// Buffers writes and seeks against `W` until a transaction commits.
pub struct DeferredBitWriter<W> {
    inner: Shared<W>,
    queue: Shared<Vec<QueuedOp>>,
    position: Shared<i64>,
}

impl<W: BitStreamWriter + 'static> DeferredBitWriter<W> {
    /// Wraps `inner`, adopting its current position as the starting
    /// virtual cursor.
    pub fn new(inner: W) -> Self {
        let position = inner.position();
        DeferredBitWriter {
            inner: shared(inner),
            queue: shared(Vec::new()),
            position: shared(position),
        }
    }

    /// Opens a transaction over the pending queue: rollback drops
    /// everything queued since `begin_transaction`; commit drains the
    /// queue into the underlying writer in insertion order.
    pub fn begin_transaction(&self) -> Transaction {
        let queue_snapshot = self.queue.borrow().clone();
        let position_snapshot = *self.position.borrow();
        let rollback_queue = self.queue.clone();
        let rollback_position = self.position.clone();
        let commit_queue = self.queue.clone();
        let commit_inner = self.inner.clone();

        Transaction::new(
            move || {
                *rollback_queue.borrow_mut() = queue_snapshot;
                *rollback_position.borrow_mut() = position_snapshot;
            },
            move || {
                let ops = mem::take(&mut *commit_queue.borrow_mut());
                let mut inner = commit_inner.borrow_mut();
                for op in ops {
                    let result = match op {
                        QueuedOp::Write(v) => inner.write(v),
                        QueuedOp::MoveBy(o) => inner.move_by(o),
                    };
                    if let Some(e) = result.error() {
                        log::error!("deferred writer commit: underlying stream rejected a queued operation: {e}");
                    }
                }
            },
            || {},
        )
    }
}

impl<W> BitStreamSeeker for DeferredBitWriter<W> {
    fn position(&self) -> i64 {
        *self.position.borrow()
    }

    fn move_by(&mut self, offset: i64) -> VoidOutcome {
        self.queue.borrow_mut().push(QueuedOp::MoveBy(offset));
        *self.position.borrow_mut() += offset;
        VoidOutcome::ok(())
    }
}

impl<W> BitStreamWriter for DeferredBitWriter<W> {
    fn write(&mut self, value: BitValue) -> VoidOutcome {
        *self.position.borrow_mut() += value.length() as i64;
        self.queue.borrow_mut().push(QueuedOp::Write(value));
        VoidOutcome::ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::Outcome;

    struct RecordingWriter {
        position: i64,
        written: Vec<BitValue>,
    }

    impl BitStreamSeeker for RecordingWriter {
        fn position(&self) -> i64 {
            self.position
        }
        fn move_by(&mut self, offset: i64) -> VoidOutcome {
            self.position += offset;
            Outcome::ok(())
        }
    }
    impl BitStreamWriter for RecordingWriter {
        fn write(&mut self, value: BitValue) -> VoidOutcome {
            self.position += value.length() as i64;
            self.written.push(value);
            Outcome::ok(())
        }
    }

    #[test]
    fn write_advances_virtual_position_without_touching_inner() {
        let inner = RecordingWriter { position: 0, written: Vec::new() };
        let mut writer = DeferredBitWriter::new(inner);
        writer.write(BitValue::new(0xFF, 8)).unwrap();
        assert_eq!(writer.position(), 8);
        assert!(writer.inner.borrow().written.is_empty());
    }

    #[test]
    fn commit_flushes_in_order() {
        let inner = RecordingWriter { position: 0, written: Vec::new() };
        let writer = DeferredBitWriter::new(inner);
        {
            let mut w = writer.clone_handle();
            w.write(BitValue::new(1, 4)).unwrap();
            w.write(BitValue::new(2, 4)).unwrap();
        }
        let mut txn = writer.begin_transaction();
        txn.commit();
        let flushed = &writer.inner.borrow().written;
        assert_eq!(flushed.len(), 2);
        assert_eq!(flushed[0].bits(), 1);
        assert_eq!(flushed[1].bits(), 2);
    }

    #[test]
    fn rollback_drops_queue() {
        let inner = RecordingWriter { position: 0, written: Vec::new() };
        let writer = DeferredBitWriter::new(inner);
        let mut txn = writer.begin_transaction();
        {
            let mut w = writer.clone_handle();
            w.write(BitValue::new(1, 4)).unwrap();
        }
        txn.rollback();
        let mut txn2 = writer.begin_transaction();
        txn2.commit();
        assert!(writer.inner.borrow().written.is_empty());
    }

    impl<W> DeferredBitWriter<W> {
        // Test-only helper: a second handle sharing the same queue/
        // position/inner, standing in for "the same writer used by a
        // different part of the call chain" without re-threading `&mut`.
        fn clone_handle(&self) -> Self {
            DeferredBitWriter {
                inner: self.inner.clone(),
                queue: self.queue.clone(),
                position: self.position.clone(),
            }
        }
    }
}
