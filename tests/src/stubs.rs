use common::constants::{MAP_STUB_SIZE, PAGE_MAP_START, SEGMENT_MAP_START};
use ft68m_lib::DeviceId;
use ft68m_lib::Size;

use crate::helpers::board;

#[test]
fn page_map_round_trip() {
    let (mut board, _) = board();
    board.write_word(PAGE_MAP_START, 0x1234).unwrap();
    board.write_byte(PAGE_MAP_START + MAP_STUB_SIZE - 1, 0x56).unwrap();
    assert_eq!(board.read_word(PAGE_MAP_START).unwrap(), 0x1234);
    assert_eq!(board.read_byte(PAGE_MAP_START + MAP_STUB_SIZE - 1).unwrap(), 0x56);
}

#[test]
fn segment_map_round_trip() {
    let (mut board, _) = board();
    board.write_word(SEGMENT_MAP_START + 0x10, 0xfedc).unwrap();
    assert_eq!(board.read_word(SEGMENT_MAP_START + 0x10).unwrap(), 0xfedc);
    assert_eq!(board.read_byte(SEGMENT_MAP_START + 0x11).unwrap(), 0xdc);
}

#[test]
fn maps_are_independent() {
    let (mut board, _) = board();
    board.write_word(PAGE_MAP_START + 0x20, 0x1111).unwrap();
    board.write_word(SEGMENT_MAP_START + 0x20, 0x2222).unwrap();
    board.write_word(0x20, 0x3333).unwrap();

    assert_eq!(board.read_word(PAGE_MAP_START + 0x20).unwrap(), 0x1111);
    assert_eq!(board.read_word(SEGMENT_MAP_START + 0x20).unwrap(), 0x2222);
    assert_eq!(board.read_word(0x20).unwrap(), 0x3333);
}

#[test]
fn maps_do_not_translate() {
    let (mut board, _) = board();
    // Whatever the maps hold, RAM stays where it is.
    board.write_word(PAGE_MAP_START, 0xffff).unwrap();
    board.write_word(SEGMENT_MAP_START, 0xffff).unwrap();
    board.write_word(0x40, 0xabcd).unwrap();
    assert_eq!(board.read_word(0x40).unwrap(), 0xabcd);
    assert_eq!(board.ram().as_bytes()[0x40..0x42], [0xab, 0xcd]);
    assert_eq!(board.resolve(0x40, Size::Word).unwrap().window.device, DeviceId::Ram);
}
