use std::sync::{Arc, Mutex, PoisonError};

use crate::lines::{IrqLevel, LineSink, LineSource, Wiring};

use log::debug;
use num_traits::FromPrimitive;

// The board's view of the CPU: seven interrupt inputs and a reset line.
// Instruction execution lives elsewhere.
pub trait Processor: Send + Sync {
    fn set_irq_line(&self, level: IrqLevel, asserted: bool);
    fn reset(&self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpuEvent {
    Irq(IrqLevel, bool),
    Reset,
}

// Remembers what the board told it.
#[derive(Default)]
pub struct FakeCpu {
    lines: Mutex<[bool; IrqLevel::NUM_LEVELS + 1]>,
    events: Mutex<Vec<CpuEvent>>,
}

impl FakeCpu {
    pub fn line(&self, level: IrqLevel) -> bool {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner)[level.number() as usize]
    }

    pub fn resets(&self) -> usize {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|e| **e == CpuEvent::Reset)
            .count()
    }

    pub fn events(&self) -> Vec<CpuEvent> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn take_events(&self) -> Vec<CpuEvent> {
        std::mem::take(&mut self.events.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl Processor for FakeCpu {
    fn set_irq_line(&self, level: IrqLevel, asserted: bool) {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner)[level.number() as usize] = asserted;
        self.events.lock().unwrap_or_else(PoisonError::into_inner).push(CpuEvent::Irq(level, asserted));
    }

    fn reset(&self) {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).push(CpuEvent::Reset);
    }
}

////////////////////////////////////////////////////////////////////////////////

// Passes each source's level straight through to its CPU input. Sources are
// fixed by the wiring; no masking, queueing or arbitration happens here.
pub struct InterruptRouter {
    cpu: Arc<dyn Processor>,
    routes: Vec<(LineSource, IrqLevel)>,
    levels: [bool; IrqLevel::NUM_LEVELS + 1],
}

impl InterruptRouter {
    pub fn new(wiring: &Wiring, cpu: Arc<dyn Processor>) -> Self {
        let mut routes = Vec::new();
        for (source, sinks) in wiring.routes() {
            for sink in sinks {
                let LineSink::Irq(level) = *sink else {
                    continue;
                };
                debug!("InterruptRouter: {source:?} -> IRQ{}", level.number());
                routes.push((source, level));
            }
        }
        InterruptRouter { cpu, routes, levels: [false; IrqLevel::NUM_LEVELS + 1] }
    }

    // Returns false if `source` isn't wired to any interrupt level.
    pub fn set_line(&mut self, source: LineSource, asserted: bool) -> bool {
        let levels: Vec<IrqLevel> = self.routes.iter().filter(|(src, _)| *src == source).map(|(_, l)| *l).collect();
        for level in &levels {
            self.set_level(*level, asserted);
        }
        !levels.is_empty()
    }

    // Drives one CPU input. The board calls this as it walks a source's sinks.
    pub fn set_level(&mut self, level: IrqLevel, asserted: bool) {
        debug!("InterruptRouter: IRQ{} {}", level.number(), if asserted { "asserted" } else { "cleared" });
        self.levels[level.number() as usize] = asserted;
        self.cpu.set_irq_line(level, asserted);
    }

    pub fn irq_asserted(&self, level: IrqLevel) -> bool {
        self.levels[level.number() as usize]
    }

    pub fn asserted_levels(&self) -> Vec<IrqLevel> {
        (1..self.levels.len())
            .filter(|idx| self.levels[*idx])
            .filter_map(IrqLevel::from_usize)
            .collect()
    }

    pub fn source_of(&self, level: IrqLevel) -> Option<LineSource> {
        self.routes.iter().find(|(_, l)| *l == level).map(|(src, _)| *src)
    }
}
