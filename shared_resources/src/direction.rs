#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Down,
    Idle,
    Up,
}

impl Direction {
    /// Floor offset of one move in this direction.
    pub fn delta(self) -> i32 {
        match self {
            Direction::Down => -1,
            Direction::Idle => 0,
            Direction::Up => 1,
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            Direction::Down => Direction::Up,
            Direction::Idle => Direction::Idle,
            Direction::Up => Direction::Down,
        }
    }

    pub fn as_symbol(self) -> char {
        match self {
            Direction::Down => 'v',
            Direction::Idle => '-',
            Direction::Up => '^',
        }
    }

    pub fn as_string(self) -> Option<String> {
        match self {
            Direction::Down => Some(String::from("down")),
            Direction::Up => Some(String::from("up")),
            Direction::Idle => None,
        }
    }
}
