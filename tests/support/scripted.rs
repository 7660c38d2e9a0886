use async_trait::async_trait;
use emogames::agent::{
    Agent, EmotionCapability, MemoryCapability, MemoryUpdate, RoundQuestion, StepOutput,
    StepPrompt,
};
use emogames::logger::csv;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Everything a scripted agent was asked, in order.
#[derive(Debug, Default)]
pub struct Transcript {
    pub prompts: Vec<StepPrompt>,
    pub questions: Vec<RoundQuestion>,
    pub context: Vec<String>,
    pub memory: Vec<MemoryUpdate>,
    pub init_calls: usize,
}

/// Replies from a fixed script, cycling when the script runs out.
pub struct ScriptedAgent {
    replies: Vec<StepOutput>,
    next: usize,
    emotion: Option<(&'static str, &'static str)>,
    pub transcript: Arc<Mutex<Transcript>>,
}

impl ScriptedAgent {
    pub fn new(replies: &[&str]) -> Self {
        Self {
            replies: replies.iter().map(|r| StepOutput::from(*r)).collect(),
            next: 0,
            emotion: None,
            transcript: Arc::default(),
        }
    }

    pub fn with_scratchpads(replies: &[(&str, &str)]) -> Self {
        Self {
            replies: replies
                .iter()
                .map(|(d, s)| StepOutput::with_scratchpad(*d, *s))
                .collect(),
            ..Self::new(&[])
        }
    }

    /// Reports `inner` and `outer` whenever emotions are queried.
    pub fn feeling(mut self, inner: &'static str, outer: &'static str) -> Self {
        self.emotion = Some((inner, outer));
        self
    }
}

#[async_trait]
impl Agent for ScriptedAgent {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn init_memory(&mut self) -> anyhow::Result<()> {
        self.transcript.lock().unwrap().init_calls += 1;
        Ok(())
    }

    async fn make_step(&mut self, prompt: StepPrompt) -> anyhow::Result<StepOutput> {
        self.transcript.lock().unwrap().prompts.push(prompt);
        anyhow::ensure!(!self.replies.is_empty(), "script is empty");
        let reply = self.replies[self.next % self.replies.len()].clone();
        self.next += 1;
        Ok(reply)
    }

    fn prepare_round_question(&mut self, question: &RoundQuestion) -> anyhow::Result<()> {
        self.transcript.lock().unwrap().questions.push(question.clone());
        Ok(())
    }

    fn push_context(&mut self, text: &str) {
        self.transcript.lock().unwrap().context.push(text.to_string());
    }

    fn emotions(&mut self) -> Option<&mut dyn EmotionCapability> {
        if self.emotion.is_some() { Some(self) } else { None }
    }

    fn memory(&mut self) -> Option<&mut dyn MemoryCapability> {
        Some(self)
    }
}

#[async_trait]
impl EmotionCapability for ScriptedAgent {
    async fn inner_emotion(&mut self) -> anyhow::Result<String> {
        Ok(self.emotion.map(|(inner, _)| inner).unwrap_or_default().to_string())
    }

    async fn outer_emotion(&mut self) -> anyhow::Result<String> {
        Ok(self.emotion.map(|(_, outer)| outer).unwrap_or_default().to_string())
    }

    fn update_emotion_memory(&mut self, _label: &str) {}
}

#[async_trait]
impl MemoryCapability for ScriptedAgent {
    async fn update_memory(&mut self, update: &MemoryUpdate) -> anyhow::Result<String> {
        self.transcript.lock().unwrap().memory.push(update.clone());
        Ok(format!("round {} noted", update.round + 1))
    }
}

/// Rows of one run table without the timestamp column.
pub fn table_rows(run_dir: &Path, file: &str) -> Vec<Vec<String>> {
    let text = std::fs::read_to_string(run_dir.join(file)).unwrap_or_default();
    csv::read_rows(&text)
        .into_iter()
        .map(|mut row| {
            row.remove(0);
            row
        })
        .collect()
}
