// A bounded, in-memory record of the engine's load-time and runtime diagnostics: the
// serial debug sink's recent bytes and the one-line notices emitted when construction
// falls back to best-effort behavior (unsupported cartridge type, a boot ROM of the
// wrong size). Exposed read-only to the host; not part of the emulated memory map and
// never persisted.
use std::collections::VecDeque;

// Oldest bytes fall off the front once the ring is full; this is a debugging aid, not
// a replacement for the link-cable protocol (out of scope).
const SERIAL_RING_CAPACITY: usize = 256;

pub struct Diagnostics {
    serial_ring: VecDeque<u8>,
    notices: Vec<String>,
}

impl Diagnostics {
    pub fn power_up() -> Self {
        Self { serial_ring: VecDeque::with_capacity(SERIAL_RING_CAPACITY), notices: Vec::new() }
    }

    pub fn push_serial_byte(&mut self, b: u8) {
        if self.serial_ring.len() == SERIAL_RING_CAPACITY {
            self.serial_ring.pop_front();
        }
        self.serial_ring.push_back(b);
    }

    pub fn push_notice(&mut self, notice: String) {
        self.notices.push(notice);
    }

    pub fn serial_ring(&self) -> &VecDeque<u8> {
        &self.serial_ring
    }

    pub fn notices(&self) -> &[String] {
        &self.notices
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serial_ring_holds_most_recent_bytes_only() {
        let mut d = Diagnostics::power_up();
        for i in 0..(SERIAL_RING_CAPACITY + 10) {
            d.push_serial_byte(i as u8);
        }
        assert_eq!(d.serial_ring().len(), SERIAL_RING_CAPACITY);
        assert_eq!(*d.serial_ring().front().unwrap(), 10u8);
    }

    #[test]
    fn notices_accumulate_in_order() {
        let mut d = Diagnostics::power_up();
        d.push_notice("first".to_owned());
        d.push_notice("second".to_owned());
        assert_eq!(d.notices(), ["first".to_owned(), "second".to_owned()]);
    }
}
