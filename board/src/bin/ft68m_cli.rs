use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use common::constants::{CPU_CLOCK_HZ, TIMER_CLOCK_HZ, XTAL_HZ};
use ft68m_lib::{Board, FakeCpu};
use rom::{RomSet, Verify};

use clap::Parser;

/// Forward Technology FT-68M board
#[derive(Parser)]
#[command(about)]
struct Args {
    /// Directory holding the ROM and PROM dumps
    roms: PathBuf,

    /// Don't check the dumps against their known checksums
    #[arg(long)]
    no_verify: bool,

    /// Print the address map
    #[arg(long)]
    dump_map: bool,

    /// Clock the peripheral chips this many times after reset
    #[arg(long, default_value_t = 0)]
    ticks: u64,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let opt = Args::parse();
    let verify = if opt.no_verify { Verify::Skip } else { Verify::Checksums };

    let roms = RomSet::load_dir(&opt.roms, verify)?;
    println!("program:\t{}", roms.program.checksum_hex());
    println!("proms:\t\t{}", roms.proms.checksum_hex());
    println!("clocks:\t\txtal {XTAL_HZ} Hz, cpu {CPU_CLOCK_HZ} Hz, stc {TIMER_CLOCK_HZ} Hz");

    let cpu = Arc::new(FakeCpu::default());
    let mut board = Board::new(roms.program, cpu.clone())?;

    if opt.dump_map {
        for window in board.address_map().windows() {
            println!("{window}");
        }
    }

    board.reset();
    let ssp = ((board.read_word(0)? as u32) << u16::BITS) | board.read_word(2)? as u32;
    let pc = ((board.read_word(4)? as u32) << u16::BITS) | board.read_word(6)? as u32;
    println!("reset:\t\tssp {ssp:#08x}, pc {pc:#08x} ({} reset)", cpu.resets());

    for _ in 0..opt.ticks {
        board.tick();
    }
    let levels: Vec<String> = board.asserted_levels().iter().map(|l| l.number().to_string()).collect();
    println!("irq:\t\t[{}]", levels.join(" "));

    Ok(())
}
