//! Scripted serial/timer mock shared by the unit tests.
//!
//! Writes are logged and split into commands at the `!` terminator;
//! completing a command loads the next staged reply into the read queue.
//! An exhausted reply script behaves like a silent bus. The clock only
//! moves when the driver delays, so timeout paths run instantly.

use core::ops::{Add, Sub};
use core::time::Duration;
use std::collections::VecDeque;

use crate::common::hal_traits::{Sdi12Serial, Sdi12Timer};

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct MockInstant(pub u64); // microseconds

impl Add<Duration> for MockInstant {
    type Output = Self;
    fn add(self, rhs: Duration) -> Self {
        MockInstant(self.0.saturating_add(rhs.as_micros() as u64))
    }
}

impl Sub<MockInstant> for MockInstant {
    type Output = Duration;
    fn sub(self, rhs: MockInstant) -> Duration {
        Duration::from_micros(self.0.saturating_sub(rhs.0))
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MockCommError;

pub struct MockInterface {
    pub now_us: u64,
    /// Completed commands, in transmit order.
    pub commands: Vec<String>,
    /// Break conditions sent.
    pub breaks: usize,
    replies: VecDeque<Option<Vec<u8>>>,
    rx: VecDeque<u8>,
    tx: Vec<u8>,
}

impl MockInterface {
    pub fn new() -> Self {
        MockInterface {
            now_us: 0,
            commands: Vec::new(),
            breaks: 0,
            replies: VecDeque::new(),
            rx: VecDeque::new(),
            tx: Vec::new(),
        }
    }

    /// Stages the reply for the next completed command.
    pub fn stage_reply(&mut self, reply: &[u8]) {
        self.replies.push_back(Some(reply.to_vec()));
    }

    /// Stages silence for the next completed command.
    pub fn stage_silence(&mut self) {
        self.replies.push_back(None);
    }

    /// Moves the mock clock forward without any bus activity.
    pub fn advance_ms(&mut self, ms: u64) {
        self.now_us = self.now_us.saturating_add(ms * 1000);
    }
}

impl Sdi12Timer for MockInterface {
    type Instant = MockInstant;

    fn now(&self) -> Self::Instant {
        MockInstant(self.now_us)
    }

    fn delay_us(&mut self, us: u32) {
        self.now_us = self.now_us.saturating_add(us as u64);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.now_us = self.now_us.saturating_add(ms as u64 * 1000);
    }
}

impl Sdi12Serial for MockInterface {
    type Error = MockCommError;

    fn read_byte(&mut self) -> nb::Result<u8, Self::Error> {
        self.rx.pop_front().ok_or(nb::Error::WouldBlock)
    }

    fn write_byte(&mut self, byte: u8) -> nb::Result<(), Self::Error> {
        self.tx.push(byte);
        if byte == b'!' {
            let command = String::from_utf8_lossy(&self.tx).into_owned();
            self.commands.push(command);
            self.tx.clear();
            if let Some(Some(reply)) = self.replies.pop_front() {
                self.rx.extend(reply);
            }
        }
        Ok(())
    }

    fn flush(&mut self) -> nb::Result<(), Self::Error> {
        Ok(())
    }

    fn send_break(&mut self) -> nb::Result<(), Self::Error> {
        self.breaks += 1;
        Ok(())
    }
}
