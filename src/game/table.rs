//! Repeated simultaneous-move matrix game.

use super::moves::MoveParser;
use super::pair::{Pair, Side};
use super::payoff::{PayoffTable, combination_key};
use super::round::RoundRecord;
use crate::agent::{Agent, MemoryUpdate, NEUTRAL_EMOTION, NO_MEMORY_UPDATE, StepPrompt};
use crate::error::{AgentError, ConfigError, Result};
use crate::logger::TwoAgentsLogger;
use serde::{Deserialize, Serialize};

/// Independent switches for the emotion side channels of a repeated game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EmotionFlags {
    /// Query, store and log each side's private emotion every round.
    pub check_inner: bool,
    /// Query and log each side's displayed emotion every round.
    pub demonstrate_outer: bool,
    /// Feed a side's own displayed emotion into its memory update.
    pub memorize_demonstrated: bool,
    /// Feed the opponent's displayed emotion into a side's memory update.
    pub memorize_seen: bool,
}

/// Outcome counters of one repeated-game run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TableRunSummary {
    pub completed_rounds: usize,
    pub skipped_rounds: usize,
}

#[derive(Debug, Clone)]
pub struct RepeatedTableGame {
    payoffs: PayoffTable,
    parser: MoveParser,
    n_steps: usize,
    flags: EmotionFlags,
}

impl RepeatedTableGame {
    pub fn new(
        payoffs: PayoffTable,
        n_steps: usize,
        flags: EmotionFlags,
    ) -> std::result::Result<Self, ConfigError> {
        if n_steps == 0 {
            return Err(ConfigError::Validation(
                "n_steps must be a positive integer".into(),
            ));
        }
        let parser = MoveParser::new(payoffs.alphabet());
        Ok(Self {
            payoffs,
            parser,
            n_steps,
            flags,
        })
    }

    pub fn payoffs(&self) -> &PayoffTable {
        &self.payoffs
    }

    pub fn n_steps(&self) -> usize {
        self.n_steps
    }

    pub fn flags(&self) -> EmotionFlags {
        self.flags
    }

    /// Plays exactly `n_steps` rounds. Unparseable moves and missing payoff
    /// entries are handled per round; only collaborator and logger failures
    /// end the run early.
    pub async fn run<'a>(
        &self,
        agent1: &'a mut dyn Agent,
        agent2: &'a mut dyn Agent,
        logger: &TwoAgentsLogger,
    ) -> Result<TableRunSummary> {
        tracing::info!(
            run = %logger.run(),
            agent1 = agent1.name(),
            agent2 = agent2.name(),
            n_steps = self.n_steps,
            "starting repeated game"
        );

        let mut agents = Pair::new(agent1, agent2);
        for side in Side::BOTH {
            agents
                .get_mut(side)
                .init_memory()
                .await
                .map_err(|e| AgentError::collaborator(side, "init_memory", e))?;
        }

        let mut summary = TableRunSummary::default();
        for step_num in 0..self.n_steps {
            match self.play_round(&mut agents, step_num).await? {
                Some(record) => {
                    record.persist(logger)?;
                    summary.completed_rounds += 1;
                }
                None => summary.skipped_rounds += 1,
            }
        }

        tracing::info!(
            run = %logger.run(),
            completed = summary.completed_rounds,
            skipped = summary.skipped_rounds,
            "repeated game finished"
        );
        Ok(summary)
    }

    async fn play_round(
        &self,
        agents: &mut Pair<&mut dyn Agent>,
        step_num: usize,
    ) -> Result<Option<RoundRecord>> {
        // Side 2 is asked only after side 1 has answered, and never sees it.
        let mut raw = Pair::<String>::default();
        let mut scratchpads = Pair::<Option<String>>::default();
        for side in Side::BOTH {
            let output = agents
                .get_mut(side)
                .make_step(StepPrompt::Round(step_num))
                .await
                .map_err(|e| AgentError::collaborator(side, "make_step", e))?;
            *raw.get_mut(side) = output.decision;
            *scratchpads.get_mut(side) = output.scratchpad;
        }

        let moves = Pair::new(
            self.resolve_move(&raw.agent1, Side::Agent1, step_num),
            self.resolve_move(&raw.agent2, Side::Agent2, step_num),
        );

        let Some(payoffs) = self.payoffs.lookup(moves) else {
            tracing::error!(
                round = step_num,
                combination = %combination_key(moves),
                raw_agent1 = %raw.agent1,
                raw_agent2 = %raw.agent2,
                "move combination missing from payoff table, skipping round"
            );
            return Ok(None);
        };

        let inner_emotions = if self.flags.check_inner {
            let mut labels = Pair::<String>::default();
            for side in Side::BOTH {
                let agent = agents.get_mut(side);
                let label = match agent.emotions() {
                    Some(emotions) => {
                        let label = emotions
                            .inner_emotion()
                            .await
                            .map_err(|e| AgentError::collaborator(side, "inner_emotion", e))?;
                        emotions.update_emotion_memory(&label);
                        label
                    }
                    None => NEUTRAL_EMOTION.to_string(),
                };
                *labels.get_mut(side) = label;
            }
            Some(labels)
        } else {
            None
        };

        let outer_emotions = if self.flags.demonstrate_outer {
            let mut labels = Pair::<String>::default();
            for side in Side::BOTH {
                let label = match agents.get_mut(side).emotions() {
                    Some(emotions) => emotions
                        .outer_emotion()
                        .await
                        .map_err(|e| AgentError::collaborator(side, "outer_emotion", e))?,
                    None => NEUTRAL_EMOTION.to_string(),
                };
                *labels.get_mut(side) = label;
            }
            Some(labels)
        } else {
            None
        };

        let shown = outer_emotions
            .clone()
            .filter(|_| self.flags.memorize_demonstrated)
            .map_or_else(Pair::default, |labels| labels.map(Some));
        let seen = outer_emotions
            .clone()
            .filter(|_| self.flags.memorize_seen)
            .map_or_else(Pair::default, |labels| labels.map(Some).swapped());
        let inner = inner_emotions
            .clone()
            .map_or_else(Pair::default, |labels| labels.map(Some));

        let mut memory = Pair::<String>::default();
        for side in Side::BOTH {
            let other = side.opponent();
            let update = MemoryUpdate {
                own_move: *moves.get(side),
                opponent_move: *moves.get(other),
                own_payoff: *payoffs.get(side),
                opponent_payoff: *payoffs.get(other),
                round: step_num,
                inner_emotion: inner.get(side).clone(),
                outer_emotion: shown.get(side).clone(),
                opponent_outer_emotion: seen.get(side).clone(),
            };
            let summary = match agents.get_mut(side).memory() {
                Some(memory) => memory
                    .update_memory(&update)
                    .await
                    .map_err(|e| AgentError::collaborator(side, "update_memory", e))?,
                None => NO_MEMORY_UPDATE.to_string(),
            };
            *memory.get_mut(side) = summary;
        }

        tracing::debug!(
            round = step_num,
            agent1 = %moves.agent1,
            agent2 = %moves.agent2,
            payoff_agent1 = payoffs.agent1,
            payoff_agent2 = payoffs.agent2,
            "round resolved"
        );

        Ok(Some(RoundRecord {
            round: step_num,
            moves,
            payoffs,
            scratchpads,
            inner_emotions,
            outer_emotions,
            memory,
        }))
    }

    /// Parses one side's reply, substituting the first legal move when the
    /// reply names none.
    fn resolve_move(&self, raw: &str, side: Side, round: usize) -> char {
        if let Some(parsed) = self.parser.parse(raw) {
            return parsed;
        }
        let fallback = self.parser.alphabet()[0];
        tracing::warn!(
            round,
            side = %side,
            raw,
            alphabet = ?self.parser.alphabet(),
            fallback = %fallback,
            "unparseable move, using fallback"
        );
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{FixedMoveAgent, StepOutput};
    use crate::game::PayoffEntry;
    use crate::logger::{RunIdentity, csv};
    use async_trait::async_trait;
    use std::fs;
    use tempfile::TempDir;

    struct Scripted {
        replies: Vec<&'static str>,
    }

    #[async_trait]
    impl Agent for Scripted {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn init_memory(&mut self) -> anyhow::Result<()> {
            Ok(())
        }

        async fn make_step(&mut self, prompt: StepPrompt) -> anyhow::Result<StepOutput> {
            let round = prompt.round().unwrap_or(0);
            Ok(self.replies[round % self.replies.len()].into())
        }
    }

    fn rows(dir: &std::path::Path, file: &str) -> Vec<Vec<String>> {
        csv::read_rows(&fs::read_to_string(dir.join(file)).unwrap_or_default())
    }

    #[test]
    fn zero_rounds_is_rejected() {
        assert!(
            RepeatedTableGame::new(PayoffTable::prisoners_dilemma(), 0, EmotionFlags::default())
                .is_err()
        );
    }

    #[tokio::test]
    async fn fallback_move_is_first_alphabet_member() {
        let tmp = TempDir::new().unwrap();
        let logger = TwoAgentsLogger::for_games(tmp.path(), RunIdentity::named("r")).unwrap();
        let game =
            RepeatedTableGame::new(PayoffTable::prisoners_dilemma(), 2, EmotionFlags::default())
                .unwrap();
        let mut a = Scripted {
            replies: vec!["I dunno"],
        };
        let mut b = FixedMoveAgent::new('F');
        let summary = game.run(&mut a, &mut b, &logger).await.unwrap();

        assert_eq!(summary.completed_rounds, 2);
        let decisions = rows(logger.run_dir(), "decisions.csv");
        assert!(decisions.iter().all(|row| row[1..] == ["J", "F"]));
    }

    #[tokio::test]
    async fn missing_payoff_entry_skips_round() {
        let tmp = TempDir::new().unwrap();
        let logger = TwoAgentsLogger::for_games(tmp.path(), RunIdentity::named("r")).unwrap();
        let table = PayoffTable::new(vec![
            PayoffEntry::new("JJ", 3.0, 3.0),
            PayoffEntry::new("FF", 1.0, 1.0),
        ])
        .unwrap();
        let game = RepeatedTableGame::new(table, 3, EmotionFlags::default()).unwrap();
        let mut a = Scripted {
            replies: vec!["J", "J", "J"],
        };
        let mut b = Scripted {
            replies: vec!["J", "F", "J"],
        };
        let summary = game.run(&mut a, &mut b, &logger).await.unwrap();

        assert_eq!(summary.completed_rounds, 2);
        assert_eq!(summary.skipped_rounds, 1);
        assert_eq!(rows(logger.run_dir(), "decisions.csv").len(), 2);
        assert_eq!(rows(logger.run_dir(), "memory.csv").len(), 2);
    }

    #[tokio::test]
    async fn agents_without_capabilities_get_placeholders() {
        let tmp = TempDir::new().unwrap();
        let logger = TwoAgentsLogger::for_games(tmp.path(), RunIdentity::named("r")).unwrap();
        let flags = EmotionFlags {
            check_inner: true,
            demonstrate_outer: true,
            memorize_demonstrated: true,
            memorize_seen: true,
        };
        let game = RepeatedTableGame::new(PayoffTable::prisoners_dilemma(), 1, flags).unwrap();
        let mut a = FixedMoveAgent::new('J');
        let mut b = FixedMoveAgent::new('J');
        game.run(&mut a, &mut b, &logger).await.unwrap();

        let inner = rows(logger.run_dir(), "inner_emotions.csv");
        assert_eq!(&inner[0][1..], ["neutral", "neutral"]);
        let outer = rows(logger.run_dir(), "outer_emotions.csv");
        assert_eq!(&outer[0][1..], ["neutral", "neutral"]);
        let memory = rows(logger.run_dir(), "memory.csv");
        assert_eq!(&memory[0][1..], [NO_MEMORY_UPDATE, NO_MEMORY_UPDATE]);
    }
}
