use crate::lines::{LineSource, Signals, TimerChannel};

use log::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerRegister {
    Data,
    Control,
}

impl TimerRegister {
    // The chip has a single address line: A1.
    pub fn decode(offset: u32) -> Self {
        if (offset >> 1) & 0x1 == 0 {
            TimerRegister::Data
        } else {
            TimerRegister::Control
        }
    }
}

// Five-channel timer/counter. The board only knows its bus interface and its
// pins; counting is the implementation's business. Output transitions are
// reported by pushing TimerOut changes into `sig`.
//
// reset() models the chip's reset, not a change of the board wiring: gate and
// source levels set by the board must survive it.
pub trait TimerCounter: Send {
    fn reset(&mut self, _sig: &mut Signals) {}
    fn tick(&mut self, _sig: &mut Signals) {}

    fn read(&mut self, sig: &mut Signals, reg: TimerRegister, mask: u16) -> u16;
    fn write(&mut self, sig: &mut Signals, reg: TimerRegister, val: u16, mask: u16);

    fn set_gate(&mut self, sig: &mut Signals, channel: TimerChannel, state: bool);
    fn set_source(&mut self, sig: &mut Signals, channel: TimerChannel, state: bool);
}

////////////////////////////////////////////////////////////////////////////////

// Stand-in with no counters: the data register is a latch whose bit n drives
// OUTn directly. The control register reads back the input pins, gates in
// bits 1..=5 and sources in bits 6..=10.
#[derive(Debug, Default)]
pub struct LatchTimer {
    outputs: u16,
    gates: u16,
    sources: u16,
}

impl LatchTimer {
    pub const OUT_MASK: u16 = 0b11_1110;
    pub const SOURCE_SHIFT: u16 = 5;

    pub fn new() -> Self {
        Self::default()
    }

    fn bit(channel: TimerChannel) -> u16 {
        0x1 << channel.number()
    }

    pub fn output(&self, channel: TimerChannel) -> bool {
        self.outputs & Self::bit(channel) != 0
    }

    pub fn gate(&self, channel: TimerChannel) -> bool {
        self.gates & Self::bit(channel) != 0
    }

    pub fn source(&self, channel: TimerChannel) -> bool {
        self.sources & Self::bit(channel) != 0
    }

    fn set_outputs(&mut self, sig: &mut Signals, val: u16) {
        let val = val & Self::OUT_MASK;
        let changed = self.outputs ^ val;
        self.outputs = val;
        for channel in TimerChannel::ALL {
            if changed & Self::bit(channel) != 0 {
                sig.drive(LineSource::TimerOut(channel), self.output(channel));
            }
        }
    }

    fn control(&self) -> u16 {
        self.gates | (self.sources << Self::SOURCE_SHIFT)
    }
}

impl TimerCounter for LatchTimer {
    fn reset(&mut self, sig: &mut Signals) {
        self.set_outputs(sig, 0);
    }

    fn read(&mut self, _sig: &mut Signals, reg: TimerRegister, mask: u16) -> u16 {
        let val = match reg {
            TimerRegister::Data => self.outputs,
            TimerRegister::Control => self.control(),
        };
        val & mask
    }

    fn write(&mut self, sig: &mut Signals, reg: TimerRegister, val: u16, mask: u16) {
        match reg {
            TimerRegister::Data => {
                let merged = (self.outputs & !mask) | (val & mask);
                self.set_outputs(sig, merged);
            }
            TimerRegister::Control => trace!("LatchTimer: ignoring command {val:#06x}"),
        }
    }

    fn set_gate(&mut self, _sig: &mut Signals, channel: TimerChannel, state: bool) {
        self.gates &= !Self::bit(channel);
        self.gates |= (state as u16) << channel.number();
    }

    fn set_source(&mut self, _sig: &mut Signals, channel: TimerChannel, state: bool) {
        self.sources &= !Self::bit(channel);
        self.sources |= (state as u16) << channel.number();
    }
}
