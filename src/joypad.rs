// The eight gameboy buttons/direction keys are arranged in form of a 2x4 matrix. Select either button or direction
// keys by writing to this register, then read-out bit 0-3.
//
// FF00 - P1/JOYP - Joypad (R/W)
//
// Bit 7 - Not used
// Bit 6 - Not used
// Bit 5 - P15 Select Button Keys      (0=Select)
// Bit 4 - P14 Select Direction Keys   (0=Select)
// Bit 3 - P13 Input Down  or Start    (0=Pressed) (Read Only)
// Bit 2 - P12 Input Up    or Select   (0=Pressed) (Read Only)
// Bit 1 - P11 Input Left  or Button B (0=Pressed) (Read Only)
// Bit 0 - P10 Input Right or Button A (0=Pressed) (Read Only)
use super::intf::{Flag, Intf};
use std::cell::RefCell;
use std::rc::Rc;

#[rustfmt::skip]
#[derive(Clone, Copy, Eq, PartialEq)]
pub enum JoypadKey {
    Right  = 0b0000_0001,
    Left   = 0b0000_0010,
    Up     = 0b0000_0100,
    Down   = 0b0000_1000,
    A      = 0b0001_0000,
    B      = 0b0010_0000,
    Select = 0b0100_0000,
    Start  = 0b1000_0000,
}

pub struct Joypad {
    intf: Rc<RefCell<Intf>>,
    // One bit per button, 0 = pressed. Upper nibble is the action row (A,B,Select,Start),
    // lower nibble the direction row (Right,Left,Up,Down).
    matrix: u8,
    // Selector flags from the last write to P1 bits 5/4; 0 means that row is selected.
    select_action: bool,
    select_direction: bool,
}

impl Joypad {
    pub fn power_up(intf: Rc<RefCell<Intf>>) -> Self {
        Self { intf, matrix: 0xff, select_action: false, select_direction: false }
    }

    pub fn press(&mut self, key: JoypadKey) {
        self.matrix &= !(key as u8);
        self.intf.borrow_mut().hi(Flag::Joypad);
    }

    pub fn release(&mut self, key: JoypadKey) {
        self.matrix |= key as u8;
    }

    pub fn get(&self, a: u16) -> u8 {
        debug_assert_eq!(a, 0xff00);
        let sel5 = if self.select_action { 0x20 } else { 0x00 };
        let sel4 = if self.select_direction { 0x10 } else { 0x00 };
        let direction = if self.select_direction { self.matrix & 0x0f } else { 0x0f };
        let action = if self.select_action { self.matrix >> 4 } else { 0x0f };
        0xc0 | sel5 | sel4 | (direction & action)
    }

    pub fn set(&mut self, a: u16, v: u8) {
        debug_assert_eq!(a, 0xff00);
        self.select_action = v & 0x20 == 0x00;
        self.select_direction = v & 0x10 == 0x00;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_joypad() -> Joypad {
        Joypad::power_up(Rc::new(RefCell::new(Intf::power_up())))
    }

    #[test]
    fn press_then_release_is_idempotent() {
        let mut j = new_joypad();
        j.set(0xff00, 0x10); // select action row
        let before = j.get(0xff00);
        j.press(JoypadKey::A);
        assert_eq!(j.get(0xff00) & 0x01, 0x00);
        j.release(JoypadKey::A);
        assert_eq!(j.get(0xff00), before);
    }

    #[test]
    fn unselected_rows_read_as_all_ones() {
        let mut j = new_joypad();
        j.press(JoypadKey::A);
        j.set(0xff00, 0x10); // select action row (bit5=0 => select_action=true)
        let v = j.get(0xff00);
        assert_eq!(v & 0x80, 0x80);
        assert_eq!(v & 0x40, 0x40);
        assert_eq!(v & 0x20, 0x20);
        assert_eq!(v & 0x10, 0x00);
        assert_eq!(v & 0x01, 0x00);
    }

    #[test]
    fn press_sets_joypad_interrupt() {
        let mut j = new_joypad();
        j.press(JoypadKey::Start);
        assert_eq!(j.intf.borrow().data & 0x10, 0x10);
    }
}
