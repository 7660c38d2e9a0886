use emogames::analysis::{analyze_division_runs, analyze_table_runs};
use emogames::config::{
    AgentConfig, AlternatingConfig, Config, LlmAgentConfig, ProviderConfig, RatioDivisionConfig,
};
use emogames::experiment::{
    DivisionExperiment, ExperimentContext, TableExperiment, run_division_experiment,
    run_table_experiment,
};
use emogames::game::DivisionVariant;
use emogames::providers::create_provider;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn backend(answer: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"choices": [{"message": {"content": answer}}]})),
        )
        .mount(&server)
        .await;
    server
}

fn context(server: &MockServer, logs: &TempDir) -> ExperimentContext {
    let provider = create_provider(&ProviderConfig {
        base_url: server.uri(),
        api_key: Some("test-key".into()),
        max_retries: 0,
        ..ProviderConfig::default()
    });
    ExperimentContext {
        logs_root: logs.path().to_path_buf(),
        provider: Some(provider),
        default_model: "mock-model".into(),
        default_temperature: 0.0,
    }
}

fn angry_llm() -> AgentConfig {
    let mut llm = LlmAgentConfig::default();
    llm.set_emotion_condition("anger/simple");
    AgentConfig::Llm(llm)
}

#[tokio::test]
async fn table_run_feeds_cooperation_analysis() {
    let server = backend("I will play J").await;
    let logs = TempDir::new().unwrap();
    let ctx = context(&server, &logs);

    let mut config = Config::default();
    config.table.n_steps = 3;
    config.agent1 = angry_llm();
    config.agent2 = AgentConfig::Alternating(AlternatingConfig::default());
    let report = run_table_experiment(&TableExperiment::from_config(&config), &ctx)
        .await
        .unwrap();

    assert_eq!(report.summary.completed_rounds, 3);
    assert!(report.run.as_str().starts_with("prisoner_dilemma"));
    for file in [
        "config.json",
        "agent1_config.json",
        "naming_config.json",
        "readable_summary.txt",
    ] {
        assert!(report.run_dir.join(file).exists(), "{file}");
    }

    let analysis = analyze_table_runs(logs.path(), "prisoner_dilemma", 'J').unwrap();
    assert_eq!(analysis.runs.len(), 1);
    assert_eq!(analysis.runs[0].llm, "mock-model");
    assert_eq!(analysis.runs[0].emotion, "anger");
    assert_eq!(
        analysis.pivot.mean(&["mock-model".to_string()], "anger"),
        Some(100.0)
    );
}

#[tokio::test]
async fn division_runs_feed_proposer_and_responder_analysis() {
    let server = backend("I keep 700;300. ACCEPT").await;
    let logs = TempDir::new().unwrap();
    let ctx = context(&server, &logs);

    let mut config = Config::default();
    config.division.name = DivisionVariant::Dictator;
    config.division.total_sum = 1000.0;
    config.agent1 = angry_llm();
    config.agent2 = AgentConfig::RatioDivision(RatioDivisionConfig { ratio: 0.5 });
    let proposer_run = run_division_experiment(&DivisionExperiment::from_config(&config), &ctx)
        .await
        .unwrap();
    assert!(proposer_run.outcome.split.is_some());

    config.division.name = DivisionVariant::Ultimatum;
    config.division.do_second_step = true;
    config.agent1 = AgentConfig::RatioDivision(RatioDivisionConfig { ratio: 0.2 });
    config.agent2 = AgentConfig::Llm(LlmAgentConfig::default());
    let responder_run = run_division_experiment(&DivisionExperiment::from_config(&config), &ctx)
        .await
        .unwrap();
    assert_eq!(responder_run.outcome.accepted, Some(true));
    assert_ne!(proposer_run.run_dir, responder_run.run_dir);

    let analysis = analyze_division_runs(logs.path()).unwrap();
    assert_eq!(analysis.runs.len(), 2);
    assert_eq!(
        analysis
            .proposer
            .mean(&["mock-model".to_string(), "anger".to_string()], "dictator"),
        Some(70.0)
    );
    assert_eq!(
        analysis.responder.mean(&["mock-model".to_string()], "no_emotion"),
        Some(100.0)
    );
}
