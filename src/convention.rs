#[derive(Clone, Copy, Eq, PartialEq)]
pub enum Term {
    GB,  // Original GameBoy (GameBoy Classic)
    GBC, // GameBoy Color
}
