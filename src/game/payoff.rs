use super::pair::Pair;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// One row of a payoff table: a two-move key such as `"JF"` and the rewards
/// for the first and second mover.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoffEntry {
    pub moves: String,
    pub rewards: [f64; 2],
}

impl PayoffEntry {
    pub fn new(moves: impl Into<String>, agent1: f64, agent2: f64) -> Self {
        Self {
            moves: moves.into(),
            rewards: [agent1, agent2],
        }
    }
}

/// Immutable reward table of a repeated matrix game.
///
/// The legal move alphabet is the set of first characters of the keys, kept
/// in the order the entries were supplied. That order decides parse
/// tie-breaks and the fallback move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<PayoffEntry>", into = "Vec<PayoffEntry>")]
pub struct PayoffTable {
    entries: Vec<PayoffEntry>,
    index: BTreeMap<String, Pair<f64>>,
    alphabet: Vec<char>,
}

impl PayoffTable {
    pub fn new(entries: Vec<PayoffEntry>) -> Result<Self, ConfigError> {
        if entries.is_empty() {
            return Err(ConfigError::Validation("payoff table is empty".into()));
        }

        let mut seen = BTreeSet::new();
        for entry in &entries {
            if entry.moves.chars().count() != 2 {
                return Err(ConfigError::Validation(format!(
                    "payoff key {:?} must be exactly two moves",
                    entry.moves
                )));
            }
            if !entry.rewards.iter().all(|r| r.is_finite()) {
                return Err(ConfigError::Validation(format!(
                    "payoff {:?} has a non-finite reward",
                    entry.moves
                )));
            }
            if !seen.insert(entry.moves.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate payoff key {:?}",
                    entry.moves
                )));
            }
        }

        Ok(Self::assemble(entries))
    }

    /// Indexes entries whose keys are already known to be valid.
    fn assemble(entries: Vec<PayoffEntry>) -> Self {
        let mut index = BTreeMap::new();
        let mut alphabet = Vec::new();
        for entry in &entries {
            index.insert(entry.moves.clone(), Pair::new(entry.rewards[0], entry.rewards[1]));
            if let Some(first) = entry.moves.chars().next()
                && !alphabet.contains(&first)
            {
                alphabet.push(first);
            }
        }
        Self {
            entries,
            index,
            alphabet,
        }
    }

    /// Legal moves in construction order.
    pub fn alphabet(&self) -> &[char] {
        &self.alphabet
    }

    pub fn entries(&self) -> &[PayoffEntry] {
        &self.entries
    }

    /// Payoff for `agent1` playing `first` against `agent2` playing `second`.
    pub fn lookup(&self, moves: Pair<char>) -> Option<Pair<f64>> {
        self.index.get(&combination_key(moves)).copied()
    }

    /// The classic prisoner's dilemma with `J` (cooperate) and `F` (defect).
    pub fn prisoners_dilemma() -> Self {
        let entries = vec![
            PayoffEntry::new("JJ", 3.0, 3.0),
            PayoffEntry::new("JF", 0.0, 5.0),
            PayoffEntry::new("FJ", 5.0, 0.0),
            PayoffEntry::new("FF", 1.0, 1.0),
        ];
        Self::assemble(entries)
    }
}

pub fn combination_key(moves: Pair<char>) -> String {
    let mut key = String::with_capacity(2);
    key.push(moves.agent1);
    key.push(moves.agent2);
    key
}

impl TryFrom<Vec<PayoffEntry>> for PayoffTable {
    type Error = ConfigError;

    fn try_from(entries: Vec<PayoffEntry>) -> Result<Self, Self::Error> {
        Self::new(entries)
    }
}

impl From<PayoffTable> for Vec<PayoffEntry> {
    fn from(table: PayoffTable) -> Self {
        table.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alphabet_follows_entry_order() {
        let table = PayoffTable::prisoners_dilemma();
        assert_eq!(table.alphabet(), &['J', 'F']);

        let reversed = PayoffTable::new(vec![
            PayoffEntry::new("FF", 1.0, 1.0),
            PayoffEntry::new("JJ", 3.0, 3.0),
        ])
        .unwrap();
        assert_eq!(reversed.alphabet(), &['F', 'J']);
    }

    #[test]
    fn lookup_resolves_both_rewards() {
        let table = PayoffTable::prisoners_dilemma();
        assert_eq!(table.lookup(Pair::new('J', 'F')), Some(Pair::new(0.0, 5.0)));
        assert_eq!(table.lookup(Pair::new('F', 'J')), Some(Pair::new(5.0, 0.0)));
    }

    #[test]
    fn missing_combination_is_none() {
        let table = PayoffTable::new(vec![
            PayoffEntry::new("JJ", 3.0, 3.0),
            PayoffEntry::new("FF", 1.0, 1.0),
        ])
        .unwrap();
        assert_eq!(table.lookup(Pair::new('J', 'F')), None);
    }

    #[test]
    fn malformed_keys_are_rejected() {
        assert!(PayoffTable::new(vec![PayoffEntry::new("J", 1.0, 1.0)]).is_err());
        assert!(PayoffTable::new(vec![PayoffEntry::new("JJJ", 1.0, 1.0)]).is_err());
        assert!(PayoffTable::new(Vec::new()).is_err());
        assert!(
            PayoffTable::new(vec![
                PayoffEntry::new("JJ", 1.0, 1.0),
                PayoffEntry::new("JJ", 2.0, 2.0),
            ])
            .is_err()
        );
    }

    #[test]
    fn non_finite_rewards_are_rejected() {
        assert!(PayoffTable::new(vec![PayoffEntry::new("JJ", f64::NAN, 1.0)]).is_err());
        assert!(PayoffTable::new(vec![PayoffEntry::new("JJ", 1.0, f64::INFINITY)]).is_err());
    }

    #[test]
    fn builtin_dilemma_matches_validated_table() {
        let entries = PayoffTable::prisoners_dilemma().entries().to_vec();
        let validated = PayoffTable::new(entries).unwrap();
        assert_eq!(validated, PayoffTable::prisoners_dilemma());
    }

    #[test]
    fn deserializes_from_entry_list() {
        let json = r#"[{"moves":"JJ","rewards":[3,3]},{"moves":"FF","rewards":[1,1]}]"#;
        let table: PayoffTable = serde_json::from_str(json).unwrap();
        assert_eq!(table.alphabet(), &['J', 'F']);
        assert!(serde_json::from_str::<PayoffTable>(r#"[{"moves":"J","rewards":[1,1]}]"#).is_err());
    }
}
