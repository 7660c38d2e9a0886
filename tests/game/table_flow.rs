use crate::scripted::{ScriptedAgent, table_rows};
use emogames::agent::{FixedMoveAgent, ImitativeAgent, StepPrompt};
use emogames::game::{EmotionFlags, PayoffEntry, PayoffTable, RepeatedTableGame};
use emogames::logger::{RunIdentity, TwoAgentsLogger};
use tempfile::TempDir;

fn logger(tmp: &TempDir) -> TwoAgentsLogger {
    TwoAgentsLogger::for_games(tmp.path(), RunIdentity::named("pd_test")).unwrap()
}

#[tokio::test]
async fn mutual_cooperation_for_three_rounds() {
    let tmp = TempDir::new().unwrap();
    let logger = logger(&tmp);
    let game = RepeatedTableGame::new(PayoffTable::prisoners_dilemma(), 3, EmotionFlags::default())
        .unwrap();
    let mut a = ScriptedAgent::new(&["J"]);
    let mut b = ScriptedAgent::new(&["J"]);
    let b_transcript = b.transcript.clone();

    let summary = game.run(&mut a, &mut b, &logger).await.unwrap();
    assert_eq!(summary.completed_rounds, 3);
    assert_eq!(summary.skipped_rounds, 0);

    let decisions = table_rows(logger.run_dir(), "decisions.csv");
    assert_eq!(decisions, vec![vec!["J".to_string(), "J".to_string()]; 3]);

    let transcript = b_transcript.lock().unwrap();
    assert_eq!(transcript.init_calls, 1);
    assert_eq!(
        transcript.prompts,
        vec![StepPrompt::Round(0), StepPrompt::Round(1), StepPrompt::Round(2)]
    );
    assert!(transcript.memory.iter().all(|m| m.own_payoff == 3.0 && m.opponent_payoff == 3.0));
    assert!(!logger.run_dir().join("inner_emotions.csv").exists());
}

#[tokio::test]
async fn free_text_moves_are_parsed_or_fall_back() {
    let tmp = TempDir::new().unwrap();
    let logger = logger(&tmp);
    let game = RepeatedTableGame::new(PayoffTable::prisoners_dilemma(), 2, EmotionFlags::default())
        .unwrap();
    let mut a = ScriptedAgent::new(&["I choose F.", "I dunno"]);
    let mut b = FixedMoveAgent::new('J');

    game.run(&mut a, &mut b, &logger).await.unwrap();
    let decisions = table_rows(logger.run_dir(), "decisions.csv");
    assert_eq!(decisions[0], ["F", "J"]);
    assert_eq!(decisions[1], ["J", "J"]);
}

#[tokio::test]
async fn payoffs_are_seen_from_each_side() {
    let tmp = TempDir::new().unwrap();
    let logger = logger(&tmp);
    let game = RepeatedTableGame::new(PayoffTable::prisoners_dilemma(), 1, EmotionFlags::default())
        .unwrap();
    let mut a = ScriptedAgent::new(&["J"]);
    let mut b = ScriptedAgent::new(&["F"]);
    let (ta, tb) = (a.transcript.clone(), b.transcript.clone());

    game.run(&mut a, &mut b, &logger).await.unwrap();
    let a_update = ta.lock().unwrap().memory[0].clone();
    let b_update = tb.lock().unwrap().memory[0].clone();
    assert_eq!((a_update.own_move, a_update.opponent_move), ('J', 'F'));
    assert_eq!((a_update.own_payoff, a_update.opponent_payoff), (0.0, 5.0));
    assert_eq!((b_update.own_move, b_update.opponent_move), ('F', 'J'));
    assert_eq!((b_update.own_payoff, b_update.opponent_payoff), (5.0, 0.0));
}

#[tokio::test]
async fn missing_combination_leaves_no_trace() {
    let tmp = TempDir::new().unwrap();
    let logger = logger(&tmp);
    let table = PayoffTable::new(vec![
        PayoffEntry::new("JJ", 3.0, 3.0),
        PayoffEntry::new("JF", 0.0, 5.0),
        PayoffEntry::new("FF", 1.0, 1.0),
    ])
    .unwrap();
    let game = RepeatedTableGame::new(table, 4, EmotionFlags::default()).unwrap();
    let mut a = ScriptedAgent::new(&["J", "F", "J", "J"]);
    let mut b = ScriptedAgent::new(&["J", "J", "F", "J"]);
    let ta = a.transcript.clone();

    let summary = game.run(&mut a, &mut b, &logger).await.unwrap();
    assert_eq!(summary.completed_rounds, 3);
    assert_eq!(summary.skipped_rounds, 1);
    assert_eq!(table_rows(logger.run_dir(), "decisions.csv").len(), 3);
    assert_eq!(table_rows(logger.run_dir(), "decisions_scratchpad.csv").len(), 3);
    let rounds: Vec<usize> = ta.lock().unwrap().memory.iter().map(|m| m.round).collect();
    assert_eq!(rounds, vec![0, 2, 3]);
}

#[tokio::test]
async fn emotion_channels_follow_flags() {
    let tmp = TempDir::new().unwrap();
    let logger = logger(&tmp);
    let flags = EmotionFlags {
        check_inner: true,
        demonstrate_outer: true,
        memorize_demonstrated: false,
        memorize_seen: true,
    };
    let game = RepeatedTableGame::new(PayoffTable::prisoners_dilemma(), 2, flags).unwrap();
    let mut a = ScriptedAgent::new(&["J"]).feeling("anger", "calm");
    let mut b = ScriptedAgent::new(&["F"]).feeling("joy", "smug");
    let ta = a.transcript.clone();

    game.run(&mut a, &mut b, &logger).await.unwrap();
    let inner = table_rows(logger.run_dir(), "inner_emotions.csv");
    assert_eq!(inner, vec![vec!["anger".to_string(), "joy".to_string()]; 2]);
    let outer = table_rows(logger.run_dir(), "outer_emotions.csv");
    assert_eq!(outer[0], ["calm", "smug"]);

    let update = ta.lock().unwrap().memory[0].clone();
    assert_eq!(update.inner_emotion.as_deref(), Some("anger"));
    assert_eq!(update.outer_emotion, None);
    assert_eq!(update.opponent_outer_emotion.as_deref(), Some("smug"));
}

#[tokio::test]
async fn demonstrated_emotion_is_memorized_without_inner_probe() {
    let tmp = TempDir::new().unwrap();
    let logger = logger(&tmp);
    let flags = EmotionFlags {
        check_inner: false,
        demonstrate_outer: true,
        memorize_demonstrated: true,
        memorize_seen: false,
    };
    let game = RepeatedTableGame::new(PayoffTable::prisoners_dilemma(), 1, flags).unwrap();
    let mut a = ScriptedAgent::new(&["J"]).feeling("anger", "calm");
    let mut b = ScriptedAgent::new(&["F"]).feeling("joy", "smug");
    let (ta, tb) = (a.transcript.clone(), b.transcript.clone());

    game.run(&mut a, &mut b, &logger).await.unwrap();
    assert!(!logger.run_dir().join("inner_emotions.csv").exists());
    assert_eq!(table_rows(logger.run_dir(), "outer_emotions.csv")[0], ["calm", "smug"]);

    let a_update = ta.lock().unwrap().memory[0].clone();
    assert_eq!(a_update.outer_emotion.as_deref(), Some("calm"));
    assert_eq!(a_update.opponent_outer_emotion, None);
    assert_eq!(a_update.inner_emotion, None);
    let b_update = tb.lock().unwrap().memory[0].clone();
    assert_eq!(b_update.outer_emotion.as_deref(), Some("smug"));
    assert_eq!(b_update.opponent_outer_emotion, None);
}

#[tokio::test]
async fn same_replies_give_same_decisions() {
    let mut tables = Vec::new();
    for name in ["first", "second"] {
        let tmp = TempDir::new().unwrap();
        let logger = TwoAgentsLogger::for_games(tmp.path(), RunIdentity::named(name)).unwrap();
        let game =
            RepeatedTableGame::new(PayoffTable::prisoners_dilemma(), 4, EmotionFlags::default())
                .unwrap();
        let mut a = ScriptedAgent::new(&["I pick J", "F!", "jj", "no idea"]);
        let mut b = ScriptedAgent::new(&["let me think... F", "J"]);
        game.run(&mut a, &mut b, &logger).await.unwrap();
        tables.push(table_rows(logger.run_dir(), "decisions.csv"));
    }
    assert_eq!(tables[0], tables[1]);
    assert_eq!(tables[0][3], ["J", "J"]);
}

#[tokio::test]
async fn scratchpads_are_logged_next_to_moves() {
    let tmp = TempDir::new().unwrap();
    let logger = logger(&tmp);
    let game = RepeatedTableGame::new(PayoffTable::prisoners_dilemma(), 1, EmotionFlags::default())
        .unwrap();
    let mut a = ScriptedAgent::with_scratchpads(&[("J", "start friendly")]);
    let mut b = ImitativeAgent::new('J');

    game.run(&mut a, &mut b, &logger).await.unwrap();
    let pads = table_rows(logger.run_dir(), "decisions_scratchpad.csv");
    assert_eq!(pads[0], ["start friendly", ""]);
    let memory = table_rows(logger.run_dir(), "memory.csv");
    assert_eq!(memory[0][0], "round 1 noted");
    assert!(memory[0][1].contains("opponent played J"));
}
