// The top-level owner: wires the CPU to the MMU and drives both forward one frame at a time.
// This is the only public entry point a host program needs to touch.
use super::convention::Term;
use super::cpu::Cpu;
use super::diagnostics::Diagnostics;
use super::gpu::{SCREEN_H, SCREEN_W};
use super::joypad::JoypadKey;
use super::memory::Memory;
use super::mmunit::Mmunit;
use std::cell::RefCell;
use std::rc::Rc;

// T-cycles per frame at 4.194304 MHz / 60 Hz.
pub const CYCLES_PER_FRAME: u32 = 69_905;

pub struct MotherBoard {
    pub mmu: Mmunit,
    pub cpu: Cpu,
}

impl MotherBoard {
    pub fn power_up(rom: Vec<u8>, boot_rom: Option<Vec<u8>>) -> Self {
        let cpu = if boot_rom.is_some() { Cpu::power_up_boot() } else { Cpu::power_up(Term::GB) };
        Self { mmu: Mmunit::power_up(rom, boot_rom), cpu }
    }

    // Runs CPU instructions, feeding their cycle cost to the timer and PPU, until a full
    // frame's worth of cycles has elapsed.
    pub fn step_frame(&mut self) {
        let mut elapsed = 0;
        while elapsed < CYCLES_PER_FRAME {
            let cycles = self.cpu.next(&mut self.mmu);
            self.mmu.next(cycles);
            elapsed += cycles;
        }
    }

    pub fn framebuffer(&self) -> &[[[u8; 3]; SCREEN_W]; SCREEN_H] {
        &self.mmu.gpu.data
    }

    pub fn title(&self) -> String {
        self.mmu.title()
    }

    pub fn press(&mut self, key: JoypadKey) {
        self.mmu.joypad.press(key);
    }

    pub fn release(&mut self, key: JoypadKey) {
        self.mmu.joypad.release(key);
    }

    pub fn ram(&self) -> &[u8] {
        self.mmu.ram()
    }

    pub fn load_ram(&mut self, data: &[u8]) {
        self.mmu.load_ram(data);
    }

    // The recent serial debug-sink bytes and load-time diagnostic notices, read-only.
    pub fn diagnostics(&self) -> Rc<RefCell<Diagnostics>> {
        self.mmu.diagnostics()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank_rom() -> Vec<u8> {
        vec![0x00; 0x8000]
    }

    #[test]
    fn step_frame_consumes_at_least_one_frame_of_cycles() {
        let mut mb = MotherBoard::power_up(blank_rom(), None);
        mb.step_frame();
        assert!(mb.mmu.gpu.mode() as u8 <= 3);
    }

    #[test]
    fn press_and_release_round_trip_through_the_joypad() {
        let mut mb = MotherBoard::power_up(blank_rom(), None);
        mb.press(JoypadKey::A);
        mb.mmu.set(0xff00, 0x10);
        assert_eq!(mb.mmu.get(0xff00) & 0x01, 0x00);
        mb.release(JoypadKey::A);
        assert_eq!(mb.mmu.get(0xff00) & 0x01, 0x01);
    }
}
