use core::fmt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Suit {
    Blue = 0,
    Green = 1,
    Red = 2,
    Yellow = 3,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Blue, Suit::Green, Suit::Red, Suit::Yellow];

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Suit::Blue),
            1 => Some(Suit::Green),
            2 => Some(Suit::Red),
            3 => Some(Suit::Yellow),
            _ => None,
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn symbol(self) -> char {
        match self {
            Suit::Blue => 'B',
            Suit::Green => 'G',
            Suit::Red => 'R',
            Suit::Yellow => 'Y',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol.to_ascii_uppercase() {
            'B' => Some(Suit::Blue),
            'G' => Some(Suit::Green),
            'R' => Some(Suit::Red),
            'Y' => Some(Suit::Yellow),
            _ => None,
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
