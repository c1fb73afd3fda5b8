use crate::lines::{LineSource, SerialChannel, SerialInput, SerialOutput, Signals};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerialRegister {
    pub channel: SerialChannel,
    pub control: bool,
}

impl SerialRegister {
    // The chip sees A1 as C/D and A2 as B/A; A0 isn't connected since the
    // chip sits on the upper byte lane.
    pub fn decode(offset: u32) -> Self {
        let index = offset >> 1;
        SerialRegister {
            channel: if index & 0b10 == 0 { SerialChannel::A } else { SerialChannel::B },
            control: index & 0b01 != 0,
        }
    }
}

// Dual-channel serial controller, 8 bits wide. Implementations report their
// outputs (combined interrupt, TxD, DTR, RTS) by pushing changes into `sig`.
pub trait SerialComm: Send {
    fn reset(&mut self, _sig: &mut Signals) {}
    fn tick(&mut self, _sig: &mut Signals) {}

    fn read(&mut self, sig: &mut Signals, reg: SerialRegister) -> u8;
    fn write(&mut self, sig: &mut Signals, reg: SerialRegister, val: u8);

    fn set_input(&mut self, sig: &mut Signals, channel: SerialChannel, input: SerialInput, state: bool);
}

////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Default, Clone, Copy)]
struct ChannelLatch {
    pending: bool,
    dtr: bool,
    rts: bool,
    txd: bool,

    rxd: bool,
    dcd: bool,
    cts: bool,
    rx_clock: bool,
    tx_clock: bool,
    rx_edges: u8,
}

// Stand-in that exposes pins instead of a protocol engine.
//
// Control write: bit 0 raises this channel's interrupt request, bit 1 DTR,
// bit 2 RTS. Data write: bit 0 is TxD.
// Control read: bit 0 request, then RxD, DCD, CTS, receive clock, transmit
// clock in bits 1..=5. Data read: count of receive clock rising edges.
#[derive(Debug, Default)]
pub struct LatchSerial {
    channels: [ChannelLatch; 2],
    int: bool,
}

impl LatchSerial {
    const PENDING: u8 = 0x1 << 0;
    const DTR: u8 = 0x1 << 1;
    const RTS: u8 = 0x1 << 2;

    const RXD: u8 = 0x1 << 1;
    const DCD: u8 = 0x1 << 2;
    const CTS: u8 = 0x1 << 3;
    const RX_CLOCK: u8 = 0x1 << 4;
    const TX_CLOCK: u8 = 0x1 << 5;

    pub fn new() -> Self {
        Self::default()
    }

    fn idx(channel: SerialChannel) -> usize {
        match channel {
            SerialChannel::A => 0,
            SerialChannel::B => 1,
        }
    }

    fn chan(&mut self, channel: SerialChannel) -> &mut ChannelLatch {
        &mut self.channels[Self::idx(channel)]
    }

    pub fn rx_edges(&self, channel: SerialChannel) -> u8 {
        self.channels[Self::idx(channel)].rx_edges
    }

    pub fn interrupt(&self) -> bool {
        self.int
    }

    fn update_int(&mut self, sig: &mut Signals) {
        let int = self.channels.iter().any(|c| c.pending);
        if int != self.int {
            self.int = int;
            sig.drive(LineSource::SerialInt, int);
        }
    }

    fn set_output(sig: &mut Signals, channel: SerialChannel, line: SerialOutput, latch: &mut bool, state: bool) {
        if *latch != state {
            *latch = state;
            sig.drive(LineSource::Serial(channel, line), state);
        }
    }

    fn status(latch: &ChannelLatch) -> u8 {
        let bit = |set: bool, mask: u8| if set { mask } else { 0 };
        bit(latch.pending, Self::PENDING)
            | bit(latch.rxd, Self::RXD)
            | bit(latch.dcd, Self::DCD)
            | bit(latch.cts, Self::CTS)
            | bit(latch.rx_clock, Self::RX_CLOCK)
            | bit(latch.tx_clock, Self::TX_CLOCK)
    }
}

impl SerialComm for LatchSerial {
    fn reset(&mut self, sig: &mut Signals) {
        for channel in [SerialChannel::A, SerialChannel::B] {
            let latch = self.chan(channel);
            latch.pending = false;
            Self::set_output(sig, channel, SerialOutput::Dtr, &mut latch.dtr, false);
            Self::set_output(sig, channel, SerialOutput::Rts, &mut latch.rts, false);
        }
        self.update_int(sig);
    }

    fn read(&mut self, _sig: &mut Signals, reg: SerialRegister) -> u8 {
        let latch = self.chan(reg.channel);
        if reg.control { Self::status(latch) } else { latch.rx_edges }
    }

    fn write(&mut self, sig: &mut Signals, reg: SerialRegister, val: u8) {
        let channel = reg.channel;
        let latch = self.chan(channel);
        if reg.control {
            latch.pending = val & Self::PENDING != 0;
            Self::set_output(sig, channel, SerialOutput::Dtr, &mut latch.dtr, val & Self::DTR != 0);
            Self::set_output(sig, channel, SerialOutput::Rts, &mut latch.rts, val & Self::RTS != 0);
            self.update_int(sig);
        } else {
            Self::set_output(sig, channel, SerialOutput::Txd, &mut latch.txd, val & 0x1 != 0);
        }
    }

    fn set_input(&mut self, _sig: &mut Signals, channel: SerialChannel, input: SerialInput, state: bool) {
        let latch = self.chan(channel);
        match input {
            SerialInput::RxClock => {
                if state && !latch.rx_clock {
                    latch.rx_edges = latch.rx_edges.wrapping_add(1);
                }
                latch.rx_clock = state;
            }
            SerialInput::TxClock => latch.tx_clock = state,
            SerialInput::Rxd => latch.rxd = state,
            SerialInput::Dcd => latch.dcd = state,
            SerialInput::Cts => latch.cts = state,
        }
    }
}
