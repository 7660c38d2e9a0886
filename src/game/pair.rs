use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two seats in a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Agent1,
    Agent2,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Agent1, Side::Agent2];

    pub const fn opponent(self) -> Self {
        match self {
            Self::Agent1 => Self::Agent2,
            Self::Agent2 => Self::Agent1,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Agent1 => "agent1",
            Self::Agent2 => "agent2",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value held once per side. Every log row and payoff is one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Pair<T> {
    pub agent1: T,
    pub agent2: T,
}

impl<T> Pair<T> {
    pub const fn new(agent1: T, agent2: T) -> Self {
        Self { agent1, agent2 }
    }

    pub fn get(&self, side: Side) -> &T {
        match side {
            Side::Agent1 => &self.agent1,
            Side::Agent2 => &self.agent2,
        }
    }

    pub fn get_mut(&mut self, side: Side) -> &mut T {
        match side {
            Side::Agent1 => &mut self.agent1,
            Side::Agent2 => &mut self.agent2,
        }
    }

    pub fn as_ref(&self) -> Pair<&T> {
        Pair::new(&self.agent1, &self.agent2)
    }

    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> Pair<U> {
        Pair::new(f(self.agent1), f(self.agent2))
    }

    /// Exchanges the sides, so each agent sees the other's value.
    pub fn swapped(self) -> Self {
        Self::new(self.agent2, self.agent1)
    }
}

impl<T> From<(T, T)> for Pair<T> {
    fn from((agent1, agent2): (T, T)) -> Self {
        Self::new(agent1, agent2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opponent_is_involutive() {
        for side in Side::BOTH {
            assert_eq!(side.opponent().opponent(), side);
            assert_ne!(side.opponent(), side);
        }
    }

    #[test]
    fn swapped_exchanges_values() {
        let pair = Pair::new("J", "F").swapped();
        assert_eq!(pair.agent1, "F");
        assert_eq!(pair.agent2, "J");
    }

    #[test]
    fn get_follows_side() {
        let mut pair = Pair::new(1, 2);
        *pair.get_mut(Side::Agent2) += 10;
        assert_eq!(*pair.get(Side::Agent1), 1);
        assert_eq!(*pair.get(Side::Agent2), 12);
    }
}
