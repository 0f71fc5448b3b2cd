//! Test doubles for the transport, pins and delay
//!
//! All doubles can share one event log so tests can assert the order of
//! operations across them (e.g. flush before power-off).

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, ErrorType, OutputPin};
use kimlink_hal::{UartConfig, UartError, UartLifecycle, UartRx, UartTx};

/// Something observable that happened to a double
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Open(u32),
    Close,
    Flush,
    Write(Vec<u8>),
    Read,
    PinHigh(PinRole),
    PinLow(PinRole),
    DelayMs(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinRole {
    Power,
    Wakeup,
}

pub type EventLog = Rc<RefCell<Vec<Event>>>;

pub fn event_log() -> EventLog {
    Rc::new(RefCell::new(Vec::new()))
}

/// Serial port replaying scripted response lines
///
/// Each `read_line` call consumes one scripted line; once the script is
/// exhausted reads time out with nothing received.
pub struct MockSerial {
    lines: VecDeque<Vec<u8>>,
    stale: usize,
    read_fault: Option<UartError>,
    log: EventLog,
}

impl MockSerial {
    pub fn with_lines(lines: &[&str]) -> Self {
        Self::with_log(lines, event_log())
    }

    pub fn with_log(lines: &[&str], log: EventLog) -> Self {
        Self {
            lines: lines.iter().map(|l| l.as_bytes().to_vec()).collect(),
            stale: 0,
            read_fault: None,
            log,
        }
    }

    /// Queue more response lines
    pub fn push_lines(&mut self, lines: &[&str]) {
        self.lines
            .extend(lines.iter().map(|l| l.as_bytes().to_vec()));
    }

    /// Pretend `count` unread bytes are sitting in the receive buffer
    pub fn set_stale_input(&mut self, count: usize) {
        self.stale = count;
    }

    pub fn stale_input(&self) -> usize {
        self.stale
    }

    /// Make the next line read fail
    pub fn fail_next_read(&mut self, error: UartError) {
        self.read_fault = Some(error);
    }

    pub fn events(&self) -> Vec<Event> {
        self.log.borrow().clone()
    }

    pub fn reads(&self) -> usize {
        self.log
            .borrow()
            .iter()
            .filter(|e| **e == Event::Read)
            .count()
    }

    pub fn written(&self) -> Vec<Vec<u8>> {
        self.log
            .borrow()
            .iter()
            .filter_map(|e| match e {
                Event::Write(bytes) => Some(bytes.clone()),
                _ => None,
            })
            .collect()
    }

    fn record(&self, event: Event) {
        self.log.borrow_mut().push(event);
    }
}

impl UartTx for MockSerial {
    fn write_blocking(&mut self, data: &[u8]) -> Result<(), UartError> {
        self.record(Event::Write(data.to_vec()));
        Ok(())
    }

    fn flush(&mut self) -> Result<(), UartError> {
        self.record(Event::Flush);
        Ok(())
    }
}

impl UartRx for MockSerial {
    fn available(&mut self) -> Result<bool, UartError> {
        Ok(self.stale > 0)
    }

    fn read_byte(&mut self) -> Result<Option<u8>, UartError> {
        if self.stale == 0 {
            return Ok(None);
        }
        self.stale -= 1;
        Ok(Some(b'?'))
    }

    fn read_line(&mut self, buf: &mut [u8]) -> Result<usize, UartError> {
        self.record(Event::Read);
        if let Some(error) = self.read_fault.take() {
            return Err(error);
        }

        let Some(mut line) = self.lines.pop_front() else {
            return Ok(0);
        };
        let len = line.len().min(buf.len());
        buf[..len].copy_from_slice(&line[..len]);
        if len < line.len() {
            // Rest of an over-long line stays pending
            self.lines.push_front(line.split_off(len));
        }
        Ok(len)
    }
}

impl UartLifecycle for MockSerial {
    fn open(&mut self, config: &UartConfig) -> Result<(), UartError> {
        self.record(Event::Open(config.baudrate));
        Ok(())
    }

    fn close(&mut self) {
        self.record(Event::Close);
    }
}

/// Pin failure injected by [`MockPin::failing`]
#[derive(Debug)]
pub struct PinFault;

impl digital::Error for PinFault {
    fn kind(&self) -> digital::ErrorKind {
        digital::ErrorKind::Other
    }
}

/// Output pin recording its level changes
pub struct MockPin {
    role: PinRole,
    high: bool,
    fail: bool,
    log: EventLog,
}

impl MockPin {
    pub fn new(role: PinRole, log: EventLog) -> Self {
        Self {
            role,
            // Start high so tests can see the driver pull it low
            high: true,
            fail: false,
            log,
        }
    }

    pub fn failing(role: PinRole, log: EventLog) -> Self {
        Self {
            fail: true,
            ..Self::new(role, log)
        }
    }

    pub fn is_high(&self) -> bool {
        self.high
    }

    fn drive(&mut self, high: bool) -> Result<(), PinFault> {
        if self.fail {
            return Err(PinFault);
        }
        self.high = high;
        let event = if high {
            Event::PinHigh(self.role)
        } else {
            Event::PinLow(self.role)
        };
        self.log.borrow_mut().push(event);
        Ok(())
    }
}

impl ErrorType for MockPin {
    type Error = PinFault;
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.drive(false)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.drive(true)
    }
}

/// Delay that returns immediately and records the requested time
pub struct MockDelay {
    log: EventLog,
}

impl MockDelay {
    pub fn new(log: EventLog) -> Self {
        Self { log }
    }

    /// Sum of all recorded delays
    pub fn total_ms(log: &EventLog) -> u32 {
        log.borrow()
            .iter()
            .filter_map(|e| match e {
                Event::DelayMs(ms) => Some(*ms),
                _ => None,
            })
            .sum()
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.log.borrow_mut().push(Event::DelayMs(ns / 1_000_000));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.log.borrow_mut().push(Event::DelayMs(ms));
    }
}
