use lazy_static::lazy_static;

use std::net::TcpListener;
use std::sync::Mutex;

const STARTING_PORT: u16 = 20000;
const PORT_STEP: u16 = 10;
// every test binary runs in its own process, spread them apart
const PROCESS_SLOTS: u32 = 2000;

pub struct PseudoRandomMemcachrdPort {
    port: u16,
}

impl PseudoRandomMemcachrdPort {
    pub fn new() -> PseudoRandomMemcachrdPort {
        let slot = (std::process::id() % PROCESS_SLOTS) as u16;
        PseudoRandomMemcachrdPort {
            port: STARTING_PORT + slot * PORT_STEP,
        }
    }

    /// Skips ports with a listener already bound. The server binds with
    /// SO_REUSEPORT, so a collision would otherwise go unnoticed.
    pub fn get_next_port(&mut self) -> u16 {
        loop {
            self.port = self.port.checked_add(1).unwrap_or(STARTING_PORT);
            if TcpListener::bind(("127.0.0.1", self.port)).is_ok() {
                return self.port;
            }
        }
    }
}

lazy_static! {
    pub static ref pseudoRandomPort: Mutex<PseudoRandomMemcachrdPort> =
        Mutex::new(PseudoRandomMemcachrdPort::new());
}
