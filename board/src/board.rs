use std::sync::Arc;

use common::constants::*;
use common::mem::{UPPER_LANE, byte_from_lane, byte_to_lane};
use common::misc::word_align;
use rom::RomImage;

use crate::address_map::{AddressMap, AddressWindow, DeviceId, Resolved};
use crate::boot::BootSequencer;
use crate::bus::{DeviceWidth, Size};
use crate::error::BoardError;
use crate::interrupt::{FakeCpu, InterruptRouter, Processor};
use crate::io::{LatchSerial, LatchTimer, Rs232Port, SerialComm, SerialRegister, SwitchRegister, TimerCounter, TimerRegister};
use crate::lines::{
    IrqLevel, LineChange, LineSink, LineSource, Port, Rs232Input, Rs232Output, Signals, TimerChannel, Wiring,
    WiringBuilder,
};
use crate::memory::{Ram, RomBank};

use delegate::delegate;
use log::{debug, trace, warn};

// Interrupt levels that must have a source on this board.
const WIRED_LEVELS: [IrqLevel; 3] = [IrqLevel::L5, IrqLevel::L6, IrqLevel::L7];

fn port_idx(port: Port) -> usize {
    match port {
        Port::A => 0,
        Port::B => 1,
    }
}

// 8 bit devices are shifted onto whichever lane they're wired to.
fn lane_shift(window: &AddressWindow) -> u32 {
    match window.width {
        DeviceWidth::Bits8 if window.data_mask & UPPER_LANE != 0 => u8::BITS,
        _ => 0,
    }
}

pub struct BoardBuilder {
    rom: RomImage,
    cpu: Option<Arc<dyn Processor>>,
    timer: Option<Box<dyn TimerCounter>>,
    serial: Option<Box<dyn SerialComm>>,
    ports: [Option<Arc<dyn Rs232Port>>; 2],
    wiring: Option<WiringBuilder>,
}

impl BoardBuilder {
    pub fn processor(mut self, cpu: Arc<dyn Processor>) -> Self {
        self.cpu = Some(cpu);
        self
    }

    pub fn timer(mut self, timer: impl TimerCounter + 'static) -> Self {
        self.timer = Some(Box::new(timer));
        self
    }

    pub fn serial(mut self, serial: impl SerialComm + 'static) -> Self {
        self.serial = Some(Box::new(serial));
        self
    }

    pub fn port(mut self, port: Port, peer: Arc<dyn Rs232Port>) -> Self {
        self.ports[port_idx(port)] = Some(peer);
        self
    }

    // Replaces the standard wiring.
    pub fn wiring(mut self, wiring: WiringBuilder) -> Self {
        self.wiring = Some(wiring);
        self
    }

    pub fn build(self) -> Result<Board, BoardError> {
        let boot = BootSequencer::new(&self.rom)?;
        if self.rom.len() > ROM_REGION_SIZE as usize {
            return Err(BoardError::MalformedRomImage {
                len: self.rom.len(),
                reason: "larger than the ROM sockets",
            });
        }

        let map = AddressMap::ft68m()?;
        let wiring = match self.wiring {
            Some(mut builder) => {
                for level in WIRED_LEVELS {
                    builder.require_irq(level);
                }
                builder.build()?
            }
            None => Wiring::ft68m()?,
        };

        let cpu = self.cpu.unwrap_or_else(|| Arc::new(FakeCpu::default()));
        let router = InterruptRouter::new(&wiring, cpu.clone());

        let mut board = Board {
            map,
            wiring,
            router,
            boot,
            signals: Signals::new(),
            cpu,
            rom: self.rom,
            ram: Ram::new("ram", RAM_SIZE),
            rom_banks: [RomBank::new(0), RomBank::new(1)],
            page_map: Ram::new("page map", MAP_STUB_SIZE),
            segment_map: Ram::new("segment map", MAP_STUB_SIZE),
            switches: SwitchRegister::default(),
            timer: self.timer.unwrap_or_else(|| Box::new(LatchTimer::new())),
            serial: self.serial.unwrap_or_else(|| Box::new(LatchSerial::new())),
            ports: self.ports,
        };
        board.start();
        Ok(board)
    }
}

////////////////////////////////////////////////////////////////////////////////

pub struct Board {
    map: AddressMap,
    wiring: Wiring,
    router: InterruptRouter,
    boot: BootSequencer,
    signals: Signals,
    cpu: Arc<dyn Processor>,

    rom: RomImage,
    ram: Ram,
    rom_banks: [RomBank; 2],
    page_map: Ram,
    segment_map: Ram,
    switches: SwitchRegister,
    timer: Box<dyn TimerCounter>,
    serial: Box<dyn SerialComm>,
    ports: [Option<Arc<dyn Rs232Port>>; 2],
}

impl Board {
    pub fn builder(rom: RomImage) -> BoardBuilder {
        BoardBuilder {
            rom,
            cpu: None,
            timer: None,
            serial: None,
            ports: [None, None],
            wiring: None,
        }
    }

    pub fn new(rom: RomImage, cpu: Arc<dyn Processor>) -> Result<Board, BoardError> {
        Board::builder(rom).processor(cpu).build()
    }

    delegate! {
        to self.router {
            pub fn irq_asserted(&self, level: IrqLevel) -> bool;
            pub fn asserted_levels(&self) -> Vec<IrqLevel>;
        }
        to self.map {
            pub fn resolve(&self, addr: u32, size: Size) -> Result<Resolved, BoardError>;
        }
    }

    // Pin strapping, done once at power on. GATE1 is tied to Vcc, every
    // other gate and source input is grounded.
    fn start(&mut self) {
        for channel in TimerChannel::ALL {
            self.timer.set_gate(&mut self.signals, channel, channel == TimerChannel::Ch1);
            self.timer.set_source(&mut self.signals, channel, false);
        }
        self.propagate();
    }

    // Must be called before the CPU runs its first bus cycle.
    pub fn reset(&mut self) {
        debug!("Board: reset");
        self.timer.reset(&mut self.signals);
        self.serial.reset(&mut self.signals);
        self.propagate();
        self.boot.reset(&self.rom, &mut self.ram, &*self.cpu);
    }

    // One clock for the peripheral chips. The timer goes first so that any
    // baud clock edge it produces reaches the serial chip in the same tick.
    pub fn tick(&mut self) {
        self.timer.tick(&mut self.signals);
        self.propagate();
        self.serial.tick(&mut self.signals);
        self.propagate();
    }

    // A level change from whatever is plugged into `port`.
    pub fn rs232_input(&mut self, port: Port, line: Rs232Input, state: bool) {
        self.signals.drive(LineSource::Port(port, line), state);
        self.propagate();
    }

    ///////////////////////////////////////////////////////////////////////////

    pub fn read_byte(&mut self, addr: u32) -> Result<u8, BoardError> {
        let word = self.read(addr, Size::Byte)?;
        Ok(byte_from_lane(addr, word))
    }

    pub fn read_word(&mut self, addr: u32) -> Result<u16, BoardError> {
        self.read(addr, Size::Word)
    }

    pub fn write_byte(&mut self, addr: u32, val: u8) -> Result<(), BoardError> {
        self.write(addr, Size::Byte, byte_to_lane(addr, val))
    }

    pub fn write_word(&mut self, addr: u32, val: u16) -> Result<(), BoardError> {
        self.write(addr, Size::Word, val)
    }

    fn resolve_logged(&self, addr: u32, size: Size) -> Result<Resolved, BoardError> {
        self.map
            .resolve(addr, size)
            .inspect_err(|_| warn!("Board: unmapped {size:?} access at {:06x}", addr & ADDR_MASK))
    }

    fn read(&mut self, addr: u32, size: Size) -> Result<u16, BoardError> {
        let Resolved { window, offset } = self.resolve_logged(addr, size)?;
        let lanes = size.lanes(addr) & window.data_mask;
        if lanes == 0 {
            trace!("Board: {} has nothing on lanes {:#06x}", window.name, size.lanes(addr));
            return Ok(OPEN_BUS);
        }

        let offset = word_align(offset);
        let raw = match window.device {
            DeviceId::Ram => self.ram.read(offset),
            DeviceId::Rom0 => self.rom_banks[0].read(&self.rom, offset),
            DeviceId::Rom1 => self.rom_banks[1].read(&self.rom, offset),
            DeviceId::Serial => {
                let val = self.serial.read(&mut self.signals, SerialRegister::decode(offset));
                (val as u16) << lane_shift(&window)
            }
            DeviceId::Timer => self.timer.read(&mut self.signals, TimerRegister::decode(offset), lanes),
            DeviceId::PageMap => self.page_map.read(offset),
            DeviceId::SegmentMap => self.segment_map.read(offset),
            DeviceId::Switches => self.switches.read(offset),
        };
        self.propagate();

        let val = (raw & lanes) | (OPEN_BUS & !lanes);
        trace!("Board: read {val:#06x} from {:06x} ({})", addr & ADDR_MASK, window.name);
        Ok(val)
    }

    fn write(&mut self, addr: u32, size: Size, val: u16) -> Result<(), BoardError> {
        let Resolved { window, offset } = self.resolve_logged(addr, size)?;
        let lanes = size.lanes(addr) & window.data_mask;
        if lanes == 0 {
            trace!("Board: dropping write to {}, lanes {:#06x} not connected", window.name, size.lanes(addr));
            return Ok(());
        }
        if window.access.is_read_only() {
            debug!("Board: dropping write of {val:#06x} to read-only {}", window.name);
            return Ok(());
        }

        trace!("Board: write {val:#06x} to {:06x} ({})", addr & ADDR_MASK, window.name);
        let offset = word_align(offset);
        match window.device {
            DeviceId::Ram => self.ram.write(offset, val, lanes),
            DeviceId::Serial => {
                let val = (val >> lane_shift(&window)) as u8;
                self.serial.write(&mut self.signals, SerialRegister::decode(offset), val);
            }
            DeviceId::Timer => self.timer.write(&mut self.signals, TimerRegister::decode(offset), val, lanes),
            DeviceId::PageMap => self.page_map.write(offset, val, lanes),
            DeviceId::SegmentMap => self.segment_map.write(offset, val, lanes),
            // Read-only windows were filtered out above.
            DeviceId::Rom0 | DeviceId::Rom1 | DeviceId::Switches => {}
        }
        self.propagate();
        Ok(())
    }

    ///////////////////////////////////////////////////////////////////////////

    // Deliver queued line changes in the order they were produced, and each
    // change to its sinks in the order they were connected. Deliveries may
    // queue further changes, which are handled in the same pass.
    fn propagate(&mut self) {
        while let Some(LineChange { source, state }) = self.signals.pop() {
            let sinks = self.wiring.sinks(source);
            if sinks.is_empty() {
                trace!("Board: {source:?} isn't connected");
            }
            for sink in sinks {
                match *sink {
                    LineSink::Irq(level) => self.router.set_level(level, state),
                    LineSink::Serial(channel, input) => {
                        self.serial.set_input(&mut self.signals, channel, input, state);
                    }
                    LineSink::Port(port, line) => {
                        let Some(peer) = &self.ports[port_idx(port)] else {
                            continue;
                        };
                        match line {
                            Rs232Output::Txd => peer.write_txd(state),
                            Rs232Output::Dtr => peer.write_dtr(state),
                            Rs232Output::Rts => peer.write_rts(state),
                        }
                    }
                }
            }
        }
    }

    ///////////////////////////////////////////////////////////////////////////

    pub fn ram(&self) -> &Ram {
        &self.ram
    }

    pub fn rom(&self) -> &RomImage {
        &self.rom
    }

    pub fn address_map(&self) -> &AddressMap {
        &self.map
    }

    pub fn wiring(&self) -> &Wiring {
        &self.wiring
    }

    pub fn irq_source(&self, level: IrqLevel) -> Option<LineSource> {
        self.router.source_of(level)
    }
}
