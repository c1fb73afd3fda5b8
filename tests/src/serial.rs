use std::sync::Arc;

use ft68m_lib::io::PipePort;
use ft68m_lib::lines::Rs232Output;
use ft68m_lib::{Board, FakeCpu, IrqLevel, Port, Rs232Input};

use crate::helpers::test_rom;

const SERIAL_A_DATA: u32 = 0x60_0000;
const SERIAL_A_CONTROL: u32 = 0x60_0002;
const SERIAL_B_DATA: u32 = 0x60_0004;
const SERIAL_B_CONTROL: u32 = 0x60_0006;

const PENDING: u8 = 0x1 << 0;
const DTR: u8 = 0x1 << 1;
const RTS: u8 = 0x1 << 2;

struct Rig {
    board: Board,
    cpu: Arc<FakeCpu>,
    port_a: Arc<PipePort>,
    port_b: Arc<PipePort>,
}

fn rig() -> Rig {
    let cpu = Arc::new(FakeCpu::default());
    let port_a = Arc::new(PipePort::default());
    let port_b = Arc::new(PipePort::default());
    let board = Board::builder(test_rom())
        .processor(cpu.clone())
        .port(Port::A, port_a.clone())
        .port(Port::B, port_b.clone())
        .build()
        .unwrap();
    Rig { board, cpu, port_a, port_b }
}

#[test]
fn port_a_outputs() {
    let mut rig = rig();
    rig.board.write_byte(SERIAL_A_CONTROL, DTR | RTS).unwrap();
    rig.board.write_byte(SERIAL_A_DATA, 1).unwrap();
    assert_eq!(
        Vec::from(rig.port_a.take_output()),
        vec![(Rs232Output::Dtr, true), (Rs232Output::Rts, true), (Rs232Output::Txd, true)]
    );
    assert!(rig.port_b.is_out_empty());

    rig.board.write_byte(SERIAL_A_DATA, 0).unwrap();
    assert_eq!(rig.port_a.pop_output(), Some((Rs232Output::Txd, false)));
    assert!(rig.port_a.is_out_empty());
}

#[test]
fn port_b_only_data() {
    let mut rig = rig();
    rig.board.write_byte(SERIAL_B_CONTROL, DTR | RTS).unwrap();
    assert!(rig.port_b.is_out_empty());

    rig.board.write_byte(SERIAL_B_DATA, 1).unwrap();
    assert_eq!(Vec::from(rig.port_b.take_output()), vec![(Rs232Output::Txd, true)]);
    assert!(rig.port_a.is_out_empty());
}

#[test]
fn unchanged_levels_not_repeated() {
    let mut rig = rig();
    rig.board.write_byte(SERIAL_A_DATA, 1).unwrap();
    rig.board.write_byte(SERIAL_A_DATA, 1).unwrap();
    assert_eq!(Vec::from(rig.port_a.take_output()), vec![(Rs232Output::Txd, true)]);
}

#[test]
fn port_a_inputs() {
    let mut rig = rig();
    rig.board.rs232_input(Port::A, Rs232Input::Rxd, true);
    rig.board.rs232_input(Port::A, Rs232Input::Dsr, true);
    rig.board.rs232_input(Port::A, Rs232Input::Cts, true);
    assert_eq!(rig.board.read_byte(SERIAL_A_CONTROL).unwrap(), 0b1110);
    assert_eq!(rig.board.read_byte(SERIAL_B_CONTROL).unwrap(), 0);

    rig.board.rs232_input(Port::A, Rs232Input::Dsr, false);
    assert_eq!(rig.board.read_byte(SERIAL_A_CONTROL).unwrap(), 0b1010);
}

#[test]
fn port_b_handshake_not_connected() {
    let mut rig = rig();
    rig.board.rs232_input(Port::B, Rs232Input::Dsr, true);
    rig.board.rs232_input(Port::B, Rs232Input::Cts, true);
    assert_eq!(rig.board.read_byte(SERIAL_B_CONTROL).unwrap(), 0);

    rig.board.rs232_input(Port::B, Rs232Input::Rxd, true);
    assert_eq!(rig.board.read_byte(SERIAL_B_CONTROL).unwrap(), 0b0010);
    assert_eq!(rig.board.read_byte(SERIAL_A_CONTROL).unwrap(), 0);
}

#[test]
fn combined_interrupt() {
    let mut rig = rig();
    rig.board.write_byte(SERIAL_A_CONTROL, PENDING).unwrap();
    rig.board.write_byte(SERIAL_B_CONTROL, PENDING).unwrap();
    assert!(rig.cpu.line(IrqLevel::L5));

    rig.board.write_byte(SERIAL_A_CONTROL, 0).unwrap();
    assert!(rig.cpu.line(IrqLevel::L5));
    assert_eq!(rig.board.read_byte(SERIAL_B_CONTROL).unwrap(), PENDING);

    rig.board.write_byte(SERIAL_B_CONTROL, 0).unwrap();
    assert!(!rig.cpu.line(IrqLevel::L5));
    assert!(rig.board.asserted_levels().is_empty());
}

#[test]
fn reset_clears_requests() {
    let mut rig = rig();
    rig.board.write_byte(SERIAL_A_CONTROL, PENDING | DTR).unwrap();
    assert!(rig.board.irq_asserted(IrqLevel::L5));
    rig.port_a.take_output();

    rig.board.reset();
    assert!(!rig.board.irq_asserted(IrqLevel::L5));
    assert!(!rig.cpu.line(IrqLevel::L5));
    assert_eq!(Vec::from(rig.port_a.take_output()), vec![(Rs232Output::Dtr, false)]);
    assert_eq!(rig.board.read_byte(SERIAL_A_CONTROL).unwrap(), 0);
}

#[test]
fn mirrored_access() {
    let mut rig = rig();
    rig.board.write_byte(0x62_0002, PENDING).unwrap();
    assert!(rig.cpu.line(IrqLevel::L5));
    assert_eq!(rig.board.read_byte(0x7f_fffa).unwrap(), PENDING);
}

#[test]
fn lower_lane_writes_dropped() {
    let mut rig = rig();
    rig.board.write_byte(0x60_0003, PENDING).unwrap();
    assert!(!rig.cpu.line(IrqLevel::L5));

    // Word writes take the upper byte.
    rig.board.write_word(SERIAL_A_CONTROL, (PENDING as u16) << 8).unwrap();
    assert!(rig.cpu.line(IrqLevel::L5));
}
