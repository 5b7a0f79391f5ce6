// A memory management unit (MMU), sometimes called paged memory management unit (PMMU), is a computer hardware unit
// having all memory references passed through itself, primarily performing the translation of virtual memory addresses
// to physical addresses.
//
// Two access paths exist here on purpose: the CPU goes through `Memory::get`/`set` below and is
// subject to the PPU-mode gating the hardware enforces on VRAM/OAM; the timer and PPU step
// themselves directly via `next` and never go through this decode at all.
use super::cartridge::{self, Cartridge};
use super::diagnostics::Diagnostics;
use super::gpu::{Gpu, Mode};
use super::intf::Intf;
use super::joypad::Joypad;
use super::memory::Memory;
use super::serial::Serial;
use super::timer::Timer;
use std::cell::RefCell;
use std::rc::Rc;

// The boot ROM overlay is exactly 256 bytes on real hardware; anything else is host error.
const BOOT_ROM_LEN: usize = 0x100;

pub struct Mmunit {
    pub cartridge: Box<dyn Cartridge>,
    pub gpu: Gpu,
    pub joypad: Joypad,
    pub serial: Serial,
    pub timer: Timer,
    inte: u8,
    intf: Rc<RefCell<Intf>>,
    diagnostics: Rc<RefCell<Diagnostics>>,
    hram: [u8; 0x7f],
    wram: [u8; 0x2000],
    boot_rom: Option<Vec<u8>>,
    // 0xff50 is write-once in hardware: any nonzero write disables the overlay for good.
    boot_rom_disabled: bool,
    // APU register window (0xff10-0xff3f): no synthesis is modeled, but ROMs probe these
    // registers at boot and expect writes to read back, so they are latched rather than
    // routed to the catch-all unmapped-read arm.
    sound: [u8; 0x30],
}

impl Mmunit {
    pub fn power_up(rom: Vec<u8>, boot_rom: Option<Vec<u8>>) -> Self {
        let intf = Rc::new(RefCell::new(Intf::power_up()));
        let diagnostics = Rc::new(RefCell::new(Diagnostics::power_up()));
        if let Some(b) = &boot_rom {
            if b.len() != BOOT_ROM_LEN {
                let notice = format!("mmu: boot rom is {} bytes, expected {}", b.len(), BOOT_ROM_LEN);
                rog::debugln!("{}", notice);
                diagnostics.borrow_mut().push_notice(notice);
            }
        }
        let mut r = Self {
            cartridge: cartridge::power_up(rom, diagnostics.clone()),
            gpu: Gpu::power_up(intf.clone()),
            joypad: Joypad::power_up(intf.clone()),
            serial: Serial::power_up(diagnostics.clone()),
            timer: Timer::power_up(intf.clone()),
            inte: 0x00,
            intf,
            diagnostics,
            hram: [0x00; 0x7f],
            wram: [0x00; 0x2000],
            boot_rom,
            boot_rom_disabled: false,
            sound: [0x00; 0x30],
        };
        r.set(0xff05, 0x00);
        r.set(0xff06, 0x00);
        r.set(0xff07, 0x00);
        r.set(0xff40, 0x91);
        r.set(0xff42, 0x00);
        r.set(0xff43, 0x00);
        r.set(0xff45, 0x00);
        r.set(0xff47, 0xfc);
        r.set(0xff48, 0xff);
        r.set(0xff49, 0xff);
        r.set(0xff4a, 0x00);
        r.set(0xff4b, 0x00);
        r
    }

    // Drives the timer and PPU the same number of cycles the CPU just spent; called once per
    // `Cpu::next` from the orchestrator.
    pub fn next(&mut self, cycles: u32) {
        self.timer.next(cycles);
        self.gpu.next(cycles);
    }

    pub fn title(&self) -> String {
        self.cartridge.title()
    }

    pub fn ram(&self) -> &[u8] {
        self.cartridge.ram()
    }

    pub fn load_ram(&mut self, data: &[u8]) {
        self.cartridge.load_ram(data);
    }

    pub fn diagnostics(&self) -> Rc<RefCell<Diagnostics>> {
        self.diagnostics.clone()
    }

    fn run_dma(&mut self, v: u8) {
        let base = u16::from(v) << 8;
        for i in 0..0xa0u16 {
            let b = self.get(base + i);
            self.gpu.set(0xfe00 + i, b);
        }
    }
}

impl Memory for Mmunit {
    fn get(&self, a: u16) -> u8 {
        match a {
            0x0000..=0x00ff => {
                if !self.boot_rom_disabled {
                    if let Some(rom) = &self.boot_rom {
                        return rom.get(a as usize).copied().unwrap_or(0xff);
                    }
                }
                self.cartridge.get(a)
            }
            0x0100..=0x7fff => self.cartridge.get(a),
            0x8000..=0x9fff => {
                if self.gpu.mode() == Mode::Transfer {
                    0xff
                } else {
                    self.gpu.get(a)
                }
            }
            0xa000..=0xbfff => self.cartridge.get(a),
            0xc000..=0xdfff => self.wram[a as usize - 0xc000],
            0xe000..=0xfdff => self.wram[a as usize - 0xe000],
            0xfe00..=0xfe9f => {
                if matches!(self.gpu.mode(), Mode::OamScan | Mode::Transfer) {
                    0xff
                } else {
                    self.gpu.get(a)
                }
            }
            0xfea0..=0xfeff => 0xff,
            0xff00 => self.joypad.get(a),
            0xff01 | 0xff02 => self.serial.get(a),
            0xff04..=0xff07 => self.timer.get(a),
            0xff0f => self.intf.borrow().data,
            0xff10..=0xff3f => self.sound[a as usize - 0xff10],
            0xff46 => 0xff,
            0xff40..=0xff4b => self.gpu.get(a),
            0xff50 => {
                if self.boot_rom_disabled {
                    0x01
                } else {
                    0x00
                }
            }
            0xff80..=0xfffe => self.hram[a as usize - 0xff80],
            0xffff => self.inte,
            _ => 0xff,
        }
    }

    fn set(&mut self, a: u16, v: u8) {
        match a {
            0x0000..=0x7fff => self.cartridge.set(a, v),
            0x8000..=0x9fff => {
                if self.gpu.mode() != Mode::Transfer {
                    self.gpu.set(a, v);
                }
            }
            0xa000..=0xbfff => self.cartridge.set(a, v),
            0xc000..=0xdfff => self.wram[a as usize - 0xc000] = v,
            0xe000..=0xfdff => self.wram[a as usize - 0xe000] = v,
            0xfe00..=0xfe9f => {
                if !matches!(self.gpu.mode(), Mode::OamScan | Mode::Transfer) {
                    self.gpu.set(a, v);
                }
            }
            0xfea0..=0xfeff => {}
            0xff00 => self.joypad.set(a, v),
            0xff01 | 0xff02 => self.serial.set(a, v),
            0xff04..=0xff07 => self.timer.set(a, v),
            0xff0f => self.intf.borrow_mut().data = v,
            0xff10..=0xff3f => self.sound[a as usize - 0xff10] = v,
            0xff46 => self.run_dma(v),
            0xff40..=0xff4b => self.gpu.set(a, v),
            0xff50 => {
                if v != 0x00 {
                    self.boot_rom_disabled = true;
                }
            }
            0xff80..=0xfffe => self.hram[a as usize - 0xff80] = v,
            0xffff => self.inte = v,
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank_rom() -> Vec<u8> {
        vec![0x00; 0x8000]
    }

    fn new_mmu() -> Mmunit {
        Mmunit::power_up(blank_rom(), None)
    }

    #[test]
    fn echo_ram_mirrors_work_ram() {
        let mut m = new_mmu();
        m.set(0xc010, 0x5a);
        assert_eq!(m.get(0xe010), 0x5a);
        m.set(0xe020, 0x3c);
        assert_eq!(m.get(0xc020), 0x3c);
    }

    #[test]
    fn vram_blocked_during_transfer() {
        let mut m = new_mmu();
        m.set(0xff40, 0b1000_0001); // lcd on
        while m.gpu.mode() != Mode::Transfer {
            m.gpu.next(1);
        }
        let before = m.get(0x8000);
        m.set(0x8000, 0x42);
        assert_eq!(m.get(0x8000), before);
    }

    #[test]
    fn oam_dma_copies_160_bytes_atomically() {
        let mut m = new_mmu();
        for i in 0..0xa0u16 {
            m.set(0xc000 + i, i as u8);
        }
        m.set(0xff46, 0xc0);
        for i in 0..0xa0u16 {
            assert_eq!(m.gpu.get(0xfe00 + i), i as u8);
        }
    }

    #[test]
    fn boot_rom_overlay_disables_write_once() {
        let mut m = Mmunit::power_up(blank_rom(), Some(vec![0x11; 0x100]));
        assert_eq!(m.get(0x0000), 0x11);
        m.set(0xff50, 0x01);
        assert_eq!(m.get(0x0000), 0x00); // now falls through to cartridge ROM
    }

    #[test]
    fn undersized_boot_rom_is_logged_as_a_diagnostic_notice() {
        let m = Mmunit::power_up(blank_rom(), Some(vec![0x11; 0x40]));
        assert!(m.diagnostics().borrow().notices().iter().any(|n| n.contains("boot rom")));
    }

    #[test]
    fn unusable_region_reads_ff_and_ignores_writes() {
        let mut m = new_mmu();
        m.set(0xfea0, 0x99);
        assert_eq!(m.get(0xfea0), 0xff);
    }

    #[test]
    fn sound_register_window_latches_writes_without_synthesis() {
        let mut m = new_mmu();
        m.set(0xff11, 0x80);
        m.set(0xff26, 0xf1);
        assert_eq!(m.get(0xff11), 0x80);
        assert_eq!(m.get(0xff26), 0xf1);
    }
}
