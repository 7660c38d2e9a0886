use crate::scripted::{ScriptedAgent, table_rows};
use emogames::agent::{RatioDivisionAgent, StepPrompt};
use emogames::game::{DivisionGame, DivisionVariant, PARSE_FAILED_MARKER, Split};
use emogames::logger::{RunIdentity, TwoAgentsLogger};
use tempfile::TempDir;

fn logger(tmp: &TempDir) -> TwoAgentsLogger {
    TwoAgentsLogger::for_games(tmp.path(), RunIdentity::named("division_test")).unwrap()
}

#[tokio::test]
async fn dictator_logs_proposal_only() {
    let tmp = TempDir::new().unwrap();
    let logger = logger(&tmp);
    let game = DivisionGame::new(DivisionVariant::Dictator, 1000.0, true, "partner").unwrap();
    let mut proposer = ScriptedAgent::with_scratchpads(&[("I keep 700;300", "be fair-ish")]);
    let mut responder = ScriptedAgent::new(&["ACCEPT"]);
    let (tp, tr) = (proposer.transcript.clone(), responder.transcript.clone());

    let outcome = game.run(&mut proposer, &mut responder, &logger).await.unwrap();
    assert_eq!(outcome.split, Some(Split { keep: 700.0, give: 300.0 }));
    assert_eq!(outcome.accepted, None);
    assert!(!outcome.responder_played());

    assert_eq!(
        table_rows(logger.run_dir(), "div_decisions.csv"),
        vec![vec!["I keep 700;300".to_string(), String::new()]]
    );
    assert_eq!(
        table_rows(logger.run_dir(), "div_decisions_scratchpad.csv")[0],
        ["be fair-ish", ""]
    );

    let proposer_log = tp.lock().unwrap();
    assert_eq!(proposer_log.prompts, vec![StepPrompt::Initial]);
    assert_eq!(proposer_log.questions[0].coplayer, "partner");
    assert_eq!(proposer_log.questions[0].total_sum, 1000.0);
    let responder_log = tr.lock().unwrap();
    assert_eq!(responder_log.init_calls, 1);
    assert!(responder_log.prompts.is_empty());
}

#[tokio::test]
async fn ultimatum_responder_sees_the_split() {
    let tmp = TempDir::new().unwrap();
    let logger = logger(&tmp);
    let game = DivisionGame::new(DivisionVariant::Ultimatum, 1000.0, true, "partner").unwrap();
    let mut proposer = RatioDivisionAgent::new(0.2);
    let mut responder = ScriptedAgent::new(&["REJECT."]);
    let tr = responder.transcript.clone();

    let outcome = game.run(&mut proposer, &mut responder, &logger).await.unwrap();
    assert_eq!(outcome.split, Some(Split { keep: 800.0, give: 200.0 }));
    assert_eq!(outcome.accepted, Some(false));
    assert_eq!(
        table_rows(logger.run_dir(), "div_decisions.csv")[0],
        ["800;200", "REJECT."]
    );

    let log = tr.lock().unwrap();
    assert_eq!(log.questions[0].keep_sum, Some(800.0));
    assert_eq!(log.questions[0].give_sum, Some(200.0));
    assert!(log.context[0].contains("they keep 800"));
}

#[tokio::test]
async fn ultimatum_without_second_step_skips_responder() {
    let tmp = TempDir::new().unwrap();
    let logger = logger(&tmp);
    let game = DivisionGame::new(DivisionVariant::Ultimatum, 50.0, false, "partner").unwrap();
    let mut proposer = ScriptedAgent::new(&["30;20"]);
    let mut responder = ScriptedAgent::new(&["ACCEPT"]);
    let tr = responder.transcript.clone();

    let outcome = game.run(&mut proposer, &mut responder, &logger).await.unwrap();
    assert_eq!(outcome.accepted, None);
    assert!(tr.lock().unwrap().prompts.is_empty());
}

#[tokio::test]
async fn unparseable_proposal_is_marked() {
    let tmp = TempDir::new().unwrap();
    let logger = logger(&tmp);
    let game = DivisionGame::new(DivisionVariant::Ultimatum, 1000.0, true, "partner").unwrap();
    let mut proposer = ScriptedAgent::new(&["Half each, I think"]);
    let mut responder = ScriptedAgent::new(&["ACCEPT"]);
    let tr = responder.transcript.clone();

    let outcome = game.run(&mut proposer, &mut responder, &logger).await.unwrap();
    assert!(outcome.split.is_none());
    let rows = table_rows(logger.run_dir(), "div_decisions.csv");
    assert_eq!(
        rows,
        vec![vec![
            format!("{PARSE_FAILED_MARKER}Half each, I think"),
            String::new()
        ]]
    );
    assert!(tr.lock().unwrap().prompts.is_empty());
}

#[test]
fn non_positive_total_is_rejected() {
    assert!(DivisionGame::new(DivisionVariant::Dictator, 0.0, false, "x").is_err());
    assert!(DivisionGame::new(DivisionVariant::Dictator, f64::NAN, false, "x").is_err());
}
