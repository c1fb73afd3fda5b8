use common::constants::SWITCHES_VALUE;

// Context register. There are no real switches behind it here; the constant
// keeps the monitor from running its self test. Writes never reach it, the
// window is read only.
#[derive(Debug, Clone, Copy)]
pub struct SwitchRegister {
    value: u16,
}

impl Default for SwitchRegister {
    fn default() -> Self {
        SwitchRegister { value: SWITCHES_VALUE }
    }
}

impl SwitchRegister {
    // Every offset reads the same.
    pub fn read(&self, _offset: u32) -> u16 {
        self.value
    }
}
