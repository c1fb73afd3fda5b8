pub mod rs232;
pub mod serial;
pub mod switches;
pub mod timer;

pub use rs232::{PipePort, Rs232Port};
pub use serial::{LatchSerial, SerialComm, SerialRegister};
pub use switches::SwitchRegister;
pub use timer::{LatchTimer, TimerCounter, TimerRegister};
