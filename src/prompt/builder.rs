use super::engine::TeraEngine;
use crate::agent::{MemoryUpdate, RoundQuestion};
use crate::config::{NamingConfig, PromptOverrides};
use crate::error::PromptError;
use crate::game::division::format_amount;
use tera::Context;

const TABLE_SYSTEM_TEMPLATE: &str = "\
You are playing a repeated game with your {{ coplayer }}. In every round you both \
choose a move at the same time: {{ move1 }} or {{ move2 }}.
{% for entry in payoffs %}- You play {{ entry.own }}, your {{ coplayer }} plays {{ entry.other }}: \
you get {{ entry.own_reward }} {{ currency }}, your {{ coplayer }} gets {{ entry.other_reward }} {{ currency }}.
{% endfor %}\
{% if emotion_instruction %}{{ emotion_instruction }}
{% endif %}\
{% if emotion_history %}Emotions you felt in earlier rounds: {{ emotion_history | join(sep=\", \") }}.
{% endif %}";

const DIVISION_SYSTEM_TEMPLATE: &str = "\
You are taking part in a one-shot money division game with your {{ coplayer }}.
{% if emotion_instruction %}{{ emotion_instruction }}
{% endif %}";

const TABLE_ROUND_TEMPLATE: &str = "\
Round {{ round_number }}. Which move do you choose? Answer with a single letter: \
{{ move1 }} or {{ move2 }}.";

const PROPOSER_TEMPLATE: &str = "\
You have {{ total_sum }} {{ currency }} to split between yourself and your {{ coplayer }}. \
How much do you keep and how much do you give? Answer in the form keep;give, for example 600;400.";

const RESPONDER_TEMPLATE: &str = "\
Your {{ coplayer }} keeps {{ keep_sum }} {{ currency }} of {{ total_sum }} and offers you \
{{ give_sum }} {{ currency }}. If you reject, neither of you gets anything. \
Answer with ACCEPT or REJECT.";

const SCRATCHPAD_TEMPLATE: &str = "\
Before answering, think step by step about the situation and write down your reasoning. \
Do not give your final answer yet.";

const FINAL_ANSWER_TEMPLATE: &str = "Now give only your final answer.";

const INNER_EMOTION_TEMPLATE: &str = "\
Which emotion are you feeling right now? Answer with one word.";

const OUTER_EMOTION_TEMPLATE: &str = "\
Which emotion do you show to your {{ coplayer }}? Answer with one word.";

const MEMORY_UPDATE_TEMPLATE: &str = "\
Round {{ round_number }} result: you played {{ own_move }}, your {{ coplayer }} played \
{{ opponent_move }}. You got {{ own_payoff }} {{ currency }}, your {{ coplayer }} got \
{{ opponent_payoff }} {{ currency }}.\
{% if inner_emotion %} You felt {{ inner_emotion }}.{% endif %}\
{% if outer_emotion %} You showed {{ outer_emotion }}.{% endif %}\
{% if opponent_outer_emotion %} Your {{ coplayer }} showed {{ opponent_outer_emotion }}.{% endif %}";

const SYSTEM_NAME: &str = "system";
const ROUND_NAME: &str = "round_question";
const RESPONDER_NAME: &str = "responder_question";
const SCRATCHPAD_NAME: &str = "scratchpad";
const FINAL_ANSWER_NAME: &str = "final_answer";
const INNER_EMOTION_NAME: &str = "inner_emotion";
const OUTER_EMOTION_NAME: &str = "outer_emotion";
const MEMORY_UPDATE_NAME: &str = "memory_update";

/// Which game an LLM seat is prompted for.
#[derive(Debug, Clone, PartialEq)]
pub enum PromptGame {
    /// Repeated matrix game; rows are `(moves, agent1 reward, agent2 reward)`
    /// seen from the seat's own side.
    Table { payoff_rows: Vec<(String, f64, f64)> },
    Division,
}

/// The templates of one LLM seat with the naming values already bound.
#[derive(Debug)]
pub struct PromptSet {
    engine: TeraEngine,
    base: Context,
    coplayer: String,
}

impl PromptSet {
    pub fn new(
        game: &PromptGame,
        naming: &NamingConfig,
        overrides: &PromptOverrides,
    ) -> Result<Self, PromptError> {
        let mut engine = TeraEngine::new();
        let mut base = Context::new();
        base.insert("currency", &naming.currency);
        base.insert("coplayer", &naming.coplayer);
        base.insert("move1", &naming.move1.to_string());
        base.insert("move2", &naming.move2.to_string());

        let (system, round) = match game {
            PromptGame::Table { payoff_rows } => {
                let rows: Vec<_> = payoff_rows
                    .iter()
                    .map(|(moves, own, other)| {
                        let mut chars = moves.chars();
                        serde_json::json!({
                            "own": chars.next().map(String::from).unwrap_or_default(),
                            "other": chars.next().map(String::from).unwrap_or_default(),
                            "own_reward": format_amount(*own),
                            "other_reward": format_amount(*other),
                        })
                    })
                    .collect();
                base.insert("payoffs", &rows);
                (TABLE_SYSTEM_TEMPLATE, TABLE_ROUND_TEMPLATE)
            }
            PromptGame::Division => (DIVISION_SYSTEM_TEMPLATE, PROPOSER_TEMPLATE),
        };

        engine.add_template(SYSTEM_NAME, overrides.system.as_deref().unwrap_or(system))?;
        engine.add_template(
            ROUND_NAME,
            overrides.round_question.as_deref().unwrap_or(round),
        )?;
        engine.add_template(RESPONDER_NAME, RESPONDER_TEMPLATE)?;
        engine.add_template(SCRATCHPAD_NAME, SCRATCHPAD_TEMPLATE)?;
        engine.add_template(FINAL_ANSWER_NAME, FINAL_ANSWER_TEMPLATE)?;
        engine.add_template(INNER_EMOTION_NAME, INNER_EMOTION_TEMPLATE)?;
        engine.add_template(OUTER_EMOTION_NAME, OUTER_EMOTION_TEMPLATE)?;
        engine.add_template(
            MEMORY_UPDATE_NAME,
            overrides
                .memory_update
                .as_deref()
                .unwrap_or(MEMORY_UPDATE_TEMPLATE),
        )?;

        Ok(Self {
            engine,
            base,
            coplayer: naming.coplayer.clone(),
        })
    }

    /// System prompt, optionally conditioned on an `<emotion>/<style>` label
    /// and the emotions recorded so far.
    pub fn system(
        &self,
        emotion: Option<&str>,
        emotion_history: &[String],
    ) -> Result<String, PromptError> {
        let instruction = match emotion {
            Some(label) => emotion_instruction(label, &self.coplayer)?,
            None => String::new(),
        };
        let mut ctx = self.base.clone();
        ctx.insert("emotion_instruction", &instruction);
        ctx.insert("emotion_history", emotion_history);
        self.render(SYSTEM_NAME, ctx)
    }

    /// Question for a repeated-game round; `round` is 0-based.
    pub fn table_round(&self, round: usize) -> Result<String, PromptError> {
        let mut ctx = self.base.clone();
        ctx.insert("round", &round);
        ctx.insert("round_number", &(round + 1));
        self.render(ROUND_NAME, ctx)
    }

    /// Question for a one-shot division game. A question carrying a split is
    /// the responder's; otherwise the proposer's.
    pub fn division_question(&self, question: &RoundQuestion) -> Result<String, PromptError> {
        let mut ctx = self.base.clone();
        ctx.insert("coplayer", &question.coplayer);
        ctx.insert("total_sum", &format_amount(question.total_sum));
        ctx.insert("keep_sum", &question.keep_sum.map(format_amount).unwrap_or_default());
        ctx.insert("give_sum", &question.give_sum.map(format_amount).unwrap_or_default());
        if question.keep_sum.is_some() && question.give_sum.is_some() {
            self.render(RESPONDER_NAME, ctx)
        } else {
            self.render(ROUND_NAME, ctx)
        }
    }

    pub fn scratchpad(&self) -> Result<String, PromptError> {
        self.render(SCRATCHPAD_NAME, self.base.clone())
    }

    pub fn final_answer(&self) -> Result<String, PromptError> {
        self.render(FINAL_ANSWER_NAME, self.base.clone())
    }

    pub fn inner_emotion(&self) -> Result<String, PromptError> {
        self.render(INNER_EMOTION_NAME, self.base.clone())
    }

    pub fn outer_emotion(&self) -> Result<String, PromptError> {
        self.render(OUTER_EMOTION_NAME, self.base.clone())
    }

    pub fn memory_update(&self, update: &MemoryUpdate) -> Result<String, PromptError> {
        let mut ctx = self.base.clone();
        ctx.insert("round", &update.round);
        ctx.insert("round_number", &(update.round + 1));
        ctx.insert("own_move", &update.own_move.to_string());
        ctx.insert("opponent_move", &update.opponent_move.to_string());
        ctx.insert("own_payoff", &format_amount(update.own_payoff));
        ctx.insert("opponent_payoff", &format_amount(update.opponent_payoff));
        ctx.insert("inner_emotion", update.inner_emotion.as_deref().unwrap_or(""));
        ctx.insert("outer_emotion", update.outer_emotion.as_deref().unwrap_or(""));
        ctx.insert(
            "opponent_outer_emotion",
            update.opponent_outer_emotion.as_deref().unwrap_or(""),
        );
        self.render(MEMORY_UPDATE_NAME, ctx)
    }

    fn render(&self, name: &str, ctx: Context) -> Result<String, PromptError> {
        self.engine
            .render(name, &ctx)
            .map(|text| text.trim_end().to_string())
    }
}

/// Turns `<emotion>/<style>` into the sentence that primes the model.
pub fn emotion_instruction(label: &str, coplayer: &str) -> Result<String, PromptError> {
    let (family, style) = label.split_once('/').unwrap_or((label, "simple"));
    let adjective = match family.trim().to_ascii_lowercase().as_str() {
        "anger" => "angry",
        "happiness" => "happy",
        "sadness" => "sad",
        "fear" => "afraid",
        "disgust" => "disgusted",
        "surprise" => "surprised",
        _ => return Err(PromptError::NotFound(format!("emotion {label}"))),
    };
    match style.trim() {
        "simple" => Ok(format!("You feel {adjective}.")),
        "coplayer" => Ok(format!("Your {coplayer} makes you feel {adjective}.")),
        _ => Err(PromptError::NotFound(format!("emotion style {label}"))),
    }
}
