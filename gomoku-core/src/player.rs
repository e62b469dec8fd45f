use std::fmt;

/// One of the two stone colors. Numbered 1/2 to match the wire protocol's
/// `s=1`/`s=2` convention and the `{.,#,1,2}` pattern alphabet (spec.md §3).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Player {
    One,
    Two,
}

impl Player {
    pub const fn opponent(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    pub const fn to_index(self) -> usize {
        match self {
            Player::One => 0,
            Player::Two => 1,
        }
    }

    pub const fn to_digit(self) -> u8 {
        match self {
            Player::One => b'1',
            Player::Two => b'2',
        }
    }

    /// +1 for `One`, -1 for `Two`. Used to flip an evaluation from the
    /// absolute frame into the side-to-move's frame for negamax.
    pub const fn sign(self) -> i64 {
        match self {
            Player::One => 1,
            Player::Two => -1,
        }
    }

    pub const fn from_wire(s: u8) -> Option<Self> {
        match s {
            1 => Some(Player::One),
            2 => Some(Player::Two),
            _ => None,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_digit() as char)
    }
}
