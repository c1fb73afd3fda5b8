use std::sync::Arc;

use ft68m_lib::lines::{Rs232Output, SerialInput, SerialOutput};
use ft68m_lib::{
    Board, BoardError, CpuEvent, FakeCpu, InterruptRouter, IrqLevel, LineSink, LineSource, Port, SerialChannel,
    TimerChannel, WireError, Wiring,
};

use crate::helpers::{board, test_rom};

const TIMER_DATA: u32 = 0x80_0000;

fn out(channel: TimerChannel) -> u16 {
    0x1 << channel.number()
}

#[test]
fn quiet_after_build() {
    let (mut board, cpu) = board();
    board.reset();
    assert!(board.asserted_levels().is_empty());
    for level in [IrqLevel::L1, IrqLevel::L5, IrqLevel::L6, IrqLevel::L7] {
        assert!(!cpu.line(level));
    }
}

#[test]
fn out2_raises_level_6() {
    let (mut board, cpu) = board();
    cpu.take_events();

    board.write_word(TIMER_DATA, out(TimerChannel::Ch2)).unwrap();
    assert!(board.irq_asserted(IrqLevel::L6));
    assert!(cpu.line(IrqLevel::L6));
    assert_eq!(board.asserted_levels(), vec![IrqLevel::L6]);
    assert_eq!(cpu.take_events(), vec![CpuEvent::Irq(IrqLevel::L6, true)]);

    board.write_word(TIMER_DATA, 0).unwrap();
    assert!(!board.irq_asserted(IrqLevel::L6));
    assert!(!cpu.line(IrqLevel::L6));
    assert_eq!(cpu.take_events(), vec![CpuEvent::Irq(IrqLevel::L6, false)]);
}

#[test]
fn out3_raises_level_7() {
    let (mut board, cpu) = board();
    board.write_word(TIMER_DATA, out(TimerChannel::Ch3)).unwrap();
    assert!(cpu.line(IrqLevel::L7));
    assert_eq!(board.asserted_levels(), vec![IrqLevel::L7]);
}

#[test]
fn other_outputs_raise_nothing() {
    let (mut board, cpu) = board();
    cpu.take_events();

    let val = out(TimerChannel::Ch1) | out(TimerChannel::Ch4) | out(TimerChannel::Ch5);
    board.write_word(TIMER_DATA, val).unwrap();
    assert!(board.asserted_levels().is_empty());
    assert!(cpu.take_events().is_empty());
}

#[test]
fn simultaneous_levels() {
    let (mut board, cpu) = board();
    board.write_word(TIMER_DATA, out(TimerChannel::Ch2) | out(TimerChannel::Ch3)).unwrap();
    assert_eq!(board.asserted_levels(), vec![IrqLevel::L6, IrqLevel::L7]);
    assert!(cpu.line(IrqLevel::L6) && cpu.line(IrqLevel::L7));

    board.write_word(TIMER_DATA, out(TimerChannel::Ch3)).unwrap();
    assert_eq!(board.asserted_levels(), vec![IrqLevel::L7]);
}

#[test]
fn serial_raises_level_5() {
    let (mut board, cpu) = board();
    // Channel A control register, request bit.
    board.write_byte(0x60_0002, 0x01).unwrap();
    assert!(cpu.line(IrqLevel::L5));
    assert_eq!(board.asserted_levels(), vec![IrqLevel::L5]);

    board.write_byte(0x60_0002, 0x00).unwrap();
    assert!(!cpu.line(IrqLevel::L5));
}

#[test]
fn irq_sources() {
    let (board, _) = board();
    assert_eq!(board.irq_source(IrqLevel::L5), Some(LineSource::SerialInt));
    assert_eq!(board.irq_source(IrqLevel::L6), Some(LineSource::TimerOut(TimerChannel::Ch2)));
    assert_eq!(board.irq_source(IrqLevel::L7), Some(LineSource::TimerOut(TimerChannel::Ch3)));
    assert_eq!(board.irq_source(IrqLevel::L1), None);
    assert_eq!(board.irq_source(IrqLevel::L4), None);
}

#[test]
fn standard_wiring() {
    let wiring = Wiring::ft68m().unwrap();
    let ch4 = wiring.sinks(LineSource::TimerOut(TimerChannel::Ch4));
    assert_eq!(
        ch4,
        [
            LineSink::Serial(SerialChannel::A, SerialInput::RxClock),
            LineSink::Serial(SerialChannel::A, SerialInput::TxClock),
        ]
    );
    assert_eq!(
        wiring.driver(LineSink::Port(Port::B, Rs232Output::Txd)),
        Some(LineSource::Serial(SerialChannel::B, SerialOutput::Txd))
    );
    assert_eq!(wiring.driver(LineSink::Port(Port::B, Rs232Output::Dtr)), None);
    assert!(wiring.sinks(LineSource::TimerOut(TimerChannel::Ch1)).is_empty());
}

#[test]
fn multiple_drivers() {
    let mut w = Wiring::builder();
    w.connect(LineSource::TimerOut(TimerChannel::Ch2), LineSink::Irq(IrqLevel::L6)).unwrap();
    let err = w
        .connect(LineSource::TimerOut(TimerChannel::Ch3), LineSink::Irq(IrqLevel::L6))
        .err()
        .unwrap();
    assert_eq!(
        err,
        WireError::MultipleDrivers {
            sink: LineSink::Irq(IrqLevel::L6),
            first: LineSource::TimerOut(TimerChannel::Ch2),
            second: LineSource::TimerOut(TimerChannel::Ch3),
        }
    );
}

#[test]
fn missing_level() {
    let mut w = Wiring::builder();
    w.connect(LineSource::SerialInt, LineSink::Irq(IrqLevel::L5)).unwrap();
    w.connect(LineSource::TimerOut(TimerChannel::Ch2), LineSink::Irq(IrqLevel::L6)).unwrap();

    let res = Board::builder(test_rom()).wiring(w).build();
    assert!(matches!(
        res,
        Err(BoardError::InvalidWireConfiguration(WireError::MissingIrqSource(7)))
    ));
}

#[test]
fn custom_wiring() {
    // Swap the timer levels.
    let mut w = Wiring::builder();
    w.connect(LineSource::SerialInt, LineSink::Irq(IrqLevel::L5)).unwrap();
    w.connect(LineSource::TimerOut(TimerChannel::Ch3), LineSink::Irq(IrqLevel::L6)).unwrap();
    w.connect(LineSource::TimerOut(TimerChannel::Ch2), LineSink::Irq(IrqLevel::L7)).unwrap();

    let cpu = Arc::new(FakeCpu::default());
    let mut board = Board::builder(test_rom()).processor(cpu.clone()).wiring(w).build().unwrap();
    board.write_word(TIMER_DATA, out(TimerChannel::Ch2)).unwrap();
    assert_eq!(board.asserted_levels(), vec![IrqLevel::L7]);
    assert!(cpu.line(IrqLevel::L7));
    assert!(!cpu.line(IrqLevel::L6));
}

#[test]
fn router_ignores_unrouted() {
    let cpu = Arc::new(FakeCpu::default());
    let wiring = Wiring::ft68m().unwrap();
    let mut router = InterruptRouter::new(&wiring, cpu.clone());

    assert!(!router.set_line(LineSource::TimerOut(TimerChannel::Ch4), true));
    assert!(cpu.events().is_empty());

    assert!(router.set_line(LineSource::SerialInt, true));
    assert!(router.irq_asserted(IrqLevel::L5));
    assert_eq!(cpu.events(), vec![CpuEvent::Irq(IrqLevel::L5, true)]);
}
