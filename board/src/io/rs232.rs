use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use crate::lines::Rs232Output;

// Whatever is plugged into one of the serial connectors.
pub trait Rs232Port: Send + Sync {
    fn write_txd(&self, state: bool);
    fn write_dtr(&self, _state: bool) {}
    fn write_rts(&self, _state: bool) {}
}

////////////////////////////////////////////////////////////////////////////////

// Records every level the board drives, in order.
#[derive(Default)]
pub struct PipePort {
    out_buf: Mutex<VecDeque<(Rs232Output, bool)>>,
}

impl PipePort {
    fn push(&self, line: Rs232Output, state: bool) {
        self.out_buf.lock().unwrap_or_else(PoisonError::into_inner).push_back((line, state));
    }

    pub fn take_output(&self) -> VecDeque<(Rs232Output, bool)> {
        std::mem::take(&mut self.out_buf.lock().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn pop_output(&self) -> Option<(Rs232Output, bool)> {
        self.out_buf.lock().unwrap_or_else(PoisonError::into_inner).pop_front()
    }

    pub fn is_out_empty(&self) -> bool {
        self.out_buf.lock().unwrap_or_else(PoisonError::into_inner).is_empty()
    }
}

impl Rs232Port for PipePort {
    fn write_txd(&self, state: bool) {
        self.push(Rs232Output::Txd, state);
    }

    fn write_dtr(&self, state: bool) {
        self.push(Rs232Output::Dtr, state);
    }

    fn write_rts(&self, state: bool) {
        self.push(Rs232Output::Rts, state);
    }
}
