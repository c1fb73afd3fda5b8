pub mod address_map;
pub mod board;
pub mod boot;
pub mod bus;
pub mod error;
pub mod interrupt;
pub mod io;
pub mod lines;
pub mod memory;

pub use address_map::{AddressMap, AddressWindow, DeviceId, Resolved};
pub use board::{Board, BoardBuilder};
pub use bus::Size;
pub use error::{BoardError, WireError};
pub use interrupt::{CpuEvent, FakeCpu, InterruptRouter, Processor};
pub use lines::{IrqLevel, LineSink, LineSource, Port, Rs232Input, SerialChannel, TimerChannel, Wiring};
