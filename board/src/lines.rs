use std::collections::{HashMap, VecDeque};

use crate::error::WireError;

use derive_more::IsVariant;
use log::{debug, trace};
use num_derive::{FromPrimitive, ToPrimitive};

// 68000 interrupt priority levels. Level 0 means "no request" and isn't a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, FromPrimitive, ToPrimitive)]
pub enum IrqLevel {
    L1 = 1,
    L2,
    L3,
    L4,
    L5,
    L6,
    L7,
}

impl IrqLevel {
    pub const NUM_LEVELS: usize = 7;

    pub fn number(self) -> u8 {
        self as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromPrimitive, ToPrimitive)]
pub enum TimerChannel {
    Ch1 = 1,
    Ch2,
    Ch3,
    Ch4,
    Ch5,
}

impl TimerChannel {
    pub const ALL: [TimerChannel; 5] = [
        TimerChannel::Ch1,
        TimerChannel::Ch2,
        TimerChannel::Ch3,
        TimerChannel::Ch4,
        TimerChannel::Ch5,
    ];

    pub fn number(self) -> u8 {
        self as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SerialChannel {
    A,
    B,
}

// Inputs of a serial channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SerialInput {
    RxClock,
    TxClock,
    Rxd,
    Dcd,
    Cts,
}

// Per-channel outputs of the serial chip. The combined interrupt output is
// separate, see LineSource::SerialInt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SerialOutput {
    Txd,
    Dtr,
    Rts,
}

// The two RS-232 connectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Port {
    A,
    B,
}

// Lines a connected peer drives into the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rs232Input {
    Rxd,
    Dsr,
    Cts,
}

// Lines the board drives out to a connected peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rs232Output {
    Txd,
    Dtr,
    Rts,
}

////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IsVariant)]
pub enum LineSource {
    TimerOut(TimerChannel),
    SerialInt,
    Serial(SerialChannel, SerialOutput),
    Port(Port, Rs232Input),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IsVariant)]
pub enum LineSink {
    Irq(IrqLevel),
    Serial(SerialChannel, SerialInput),
    Port(Port, Rs232Output),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineChange {
    pub source: LineSource,
    pub state: bool,
}

// Line transitions waiting to be delivered, oldest first. Devices push into
// this instead of calling each other; the board drains it.
#[derive(Debug, Default)]
pub struct Signals {
    pending: VecDeque<LineChange>,
}

impl Signals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drive(&mut self, source: LineSource, state: bool) {
        trace!("Line: {source:?} -> {}", state as u8);
        self.pending.push_back(LineChange { source, state });
    }

    pub fn pop(&mut self) -> Option<LineChange> {
        self.pending.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }
}

////////////////////////////////////////////////////////////////////////////////

// Fixed point-to-point connections. A source may fan out to several sinks,
// delivered in the order they were connected; a sink has exactly one driver.
#[derive(Debug, Clone)]
pub struct Wiring {
    routes: Vec<(LineSource, Vec<LineSink>)>,
    drivers: HashMap<LineSink, LineSource>,
}

impl Wiring {
    pub fn builder() -> WiringBuilder {
        WiringBuilder::default()
    }

    pub fn sinks(&self, source: LineSource) -> &[LineSink] {
        self.routes
            .iter()
            .find(|(src, _)| *src == source)
            .map(|(_, sinks)| sinks.as_slice())
            .unwrap_or(&[])
    }

    pub fn driver(&self, sink: LineSink) -> Option<LineSource> {
        self.drivers.get(&sink).copied()
    }

    pub fn routes(&self) -> impl Iterator<Item = (LineSource, &[LineSink])> {
        self.routes.iter().map(|(src, sinks)| (*src, sinks.as_slice()))
    }

    pub fn ft68m() -> Result<Wiring, WireError> {
        use LineSink as Dst;
        use LineSource as Src;

        let mut w = Wiring::builder();

        w.connect(Src::SerialInt, Dst::Irq(IrqLevel::L5))?;
        w.connect(Src::TimerOut(TimerChannel::Ch2), Dst::Irq(IrqLevel::L6))?;
        w.connect(Src::TimerOut(TimerChannel::Ch3), Dst::Irq(IrqLevel::L7))?;

        // Baud rate clocks. Receive edge goes first, then transmit.
        w.connect(Src::TimerOut(TimerChannel::Ch4), Dst::Serial(SerialChannel::A, SerialInput::RxClock))?;
        w.connect(Src::TimerOut(TimerChannel::Ch4), Dst::Serial(SerialChannel::A, SerialInput::TxClock))?;
        w.connect(Src::TimerOut(TimerChannel::Ch5), Dst::Serial(SerialChannel::B, SerialInput::RxClock))?;
        w.connect(Src::TimerOut(TimerChannel::Ch5), Dst::Serial(SerialChannel::B, SerialInput::TxClock))?;

        w.connect(Src::Serial(SerialChannel::A, SerialOutput::Txd), Dst::Port(Port::A, Rs232Output::Txd))?;
        w.connect(Src::Serial(SerialChannel::A, SerialOutput::Dtr), Dst::Port(Port::A, Rs232Output::Dtr))?;
        w.connect(Src::Serial(SerialChannel::A, SerialOutput::Rts), Dst::Port(Port::A, Rs232Output::Rts))?;
        w.connect(Src::Port(Port::A, Rs232Input::Rxd), Dst::Serial(SerialChannel::A, SerialInput::Rxd))?;
        w.connect(Src::Port(Port::A, Rs232Input::Dsr), Dst::Serial(SerialChannel::A, SerialInput::Dcd))?;
        w.connect(Src::Port(Port::A, Rs232Input::Cts), Dst::Serial(SerialChannel::A, SerialInput::Cts))?;

        // Channel B only has its data lines brought out.
        w.connect(Src::Serial(SerialChannel::B, SerialOutput::Txd), Dst::Port(Port::B, Rs232Output::Txd))?;
        w.connect(Src::Port(Port::B, Rs232Input::Rxd), Dst::Serial(SerialChannel::B, SerialInput::Rxd))?;

        w.require_irq(IrqLevel::L5);
        w.require_irq(IrqLevel::L6);
        w.require_irq(IrqLevel::L7);
        w.build()
    }
}

#[derive(Debug, Default)]
pub struct WiringBuilder {
    routes: Vec<(LineSource, Vec<LineSink>)>,
    drivers: HashMap<LineSink, LineSource>,
    required: Vec<IrqLevel>,
}

impl WiringBuilder {
    pub fn connect(&mut self, source: LineSource, sink: LineSink) -> Result<&mut Self, WireError> {
        if let Some(first) = self.drivers.get(&sink) {
            return Err(WireError::MultipleDrivers { sink, first: *first, second: source });
        }
        self.drivers.insert(sink, source);
        match self.routes.iter_mut().find(|(src, _)| *src == source) {
            Some((_, sinks)) => sinks.push(sink),
            None => self.routes.push((source, vec![sink])),
        }
        Ok(self)
    }

    // Fail the build unless `level` ends up with a driver.
    pub fn require_irq(&mut self, level: IrqLevel) -> &mut Self {
        self.required.push(level);
        self
    }

    pub fn build(&mut self) -> Result<Wiring, WireError> {
        for level in &self.required {
            if !self.drivers.contains_key(&LineSink::Irq(*level)) {
                return Err(WireError::MissingIrqSource(level.number()));
            }
        }
        debug!("Wiring: {} sources, {} sinks", self.routes.len(), self.drivers.len());
        Ok(Wiring {
            routes: std::mem::take(&mut self.routes),
            drivers: std::mem::take(&mut self.drivers),
        })
    }
}
