use std::path::PathBuf;

use serde_json::{json, Value};
use trace_extract::{
    extract_all, extract_final_output, extract_output, extract_output_detailed, read_trace_file,
    summarize, ExtractError, ExtractionReport, OutputKeyRegistry, OutputTarget, TraceEvent,
};

fn fixtures_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

fn financial_run() -> Vec<TraceEvent> {
    read_trace_file(fixtures_root().join("financial_run.json")).expect("read fixture")
}

fn events(raw: Value) -> Vec<TraceEvent> {
    serde_json::from_value(raw).expect("trace deserializes")
}

#[test]
fn targeted_extraction_returns_latest_coordinator_output() {
    let trace = financial_run();
    let output = extract_final_output(&trace, &OutputKeyRegistry::default())
        .expect("final output present");

    assert_eq!(output["results_overall_score"]["overall_score"], 42);
    assert_eq!(
        output["results_overall_score"]["overall_summary"],
        "Hold with moderate conviction.\nRevisit next quarter."
    );
    assert_eq!(output["session_metadata"]["market_ticker"], "ZOMATO");
    assert!(output.get("interim").is_none());

    let detailed = extract_output_detailed(
        &trace,
        "financial_coordinator",
        "financial_coordinator_output",
    )
    .unwrap();
    assert_eq!(detailed.entry_index, 9);
}

#[test]
fn aggregate_extraction_keeps_first_snapshot_per_key() {
    let trace = financial_run();
    let outputs = extract_all(&trace, &OutputKeyRegistry::default());

    assert_eq!(
        outputs.get("data_analyst_output").unwrap()["signals"]["volume"],
        json!([1.2, 1.4, 1.1])
    );
    assert!(outputs.get("data_analyst_output").unwrap().get("revision").is_none());
    assert_eq!(
        outputs.get("trading_analyst_output"),
        Some(&json!("Strategies drafted without a fenced block."))
    );
    assert_eq!(
        outputs.get("risk_analyst_output"),
        Some(&json!({"risk_level": "moderate"}))
    );
    assert_eq!(outputs.get("execution_analyst_output"), None);
    assert_eq!(
        outputs.get("financial_coordinator_output"),
        Some(&json!({"interim": true}))
    );

    let rendered = serde_json::to_value(&outputs).unwrap();
    assert_eq!(rendered["execution_analyst_output"], Value::Null);
    assert_eq!(rendered.as_object().unwrap().len(), 5);
}

#[test]
fn summary_tracks_authors_and_calls_across_malformed_events() {
    let trace = financial_run();
    let summary = summarize(&trace, OutputKeyRegistry::default().final_output());

    assert_eq!(summary.total_entries, 10);
    assert_eq!(summary.authors[5], "unknown");
    assert_eq!(summary.authors.iter().filter(|a| *a == "financial_coordinator").count(), 4);

    let calls: Vec<_> = summary
        .agent_calls
        .iter()
        .map(|call| (call.entry_index, call.function_name.as_str(), call.author.as_str()))
        .collect();
    assert_eq!(
        calls,
        vec![
            (1, "data_analyst", "financial_coordinator"),
            (3, "trading_analyst", "financial_coordinator"),
            (3, "unknown", "financial_coordinator"),
        ]
    );
    assert!(summary.final_output_found);
}

#[test]
fn single_match_agrees_between_targeted_and_aggregate() {
    let trace = events(json!([
        {"author": "data_analyst", "actions": {"stateDelta": {
            "data_analyst_output": "```json\n{\"x\": 1}\n```"
        }}},
        {"author": "financial_coordinator", "actions": {"stateDelta": {
            "financial_coordinator_output": "```json\n{\"score\": 42}\n```"
        }}}
    ]));
    let registry = OutputKeyRegistry::default();

    let targeted = extract_output(&trace, "financial_coordinator", "financial_coordinator_output");
    assert_eq!(targeted, Some(json!({"score": 42})));
    assert_eq!(
        extract_all(&trace, &registry).get("financial_coordinator_output"),
        targeted.as_ref()
    );

    assert_eq!(
        serde_json::to_value(summarize(&trace, registry.final_output())).unwrap(),
        json!({
            "total_entries": 2,
            "authors": ["data_analyst", "financial_coordinator"],
            "agent_calls": [],
            "final_output_found": true
        })
    );
}

#[test]
fn repeated_key_resolves_differently_per_extractor() {
    let trace = events(json!([
        {"author": "planner", "actions": {"stateDelta": {"plan": "```json\n{\"v\": \"early\"}\n```"}}},
        {"author": "planner", "actions": {"stateDelta": {"plan": "```json\n{\"v\": \"late\"}\n```"}}}
    ]));
    let registry = OutputKeyRegistry::new(OutputTarget::new("planner", "plan"), Vec::new()).unwrap();

    assert_eq!(extract_output(&trace, "planner", "plan"), Some(json!({"v": "late"})));
    assert_eq!(extract_all(&trace, &registry).get("plan"), Some(&json!({"v": "early"})));
}

#[test]
fn unfenced_text_is_absent_for_targeted_and_verbatim_for_aggregate() {
    let trace = events(json!([
        {"author": "planner", "actions": {"stateDelta": {"plan": "just words"}}}
    ]));
    let registry = OutputKeyRegistry::new(OutputTarget::new("planner", "plan"), Vec::new()).unwrap();

    assert_eq!(extract_output(&trace, "planner", "plan"), None);
    assert!(matches!(
        extract_output_detailed(&trace, "planner", "plan"),
        Err(ExtractError::MissingFence { entry_index: 0, .. })
    ));
    assert_eq!(extract_all(&trace, &registry).get("plan"), Some(&json!("just words")));
}

#[test]
fn empty_trace_yields_documented_defaults() {
    let registry = OutputKeyRegistry::default();

    assert_eq!(extract_final_output(&[], &registry), None);

    let outputs = serde_json::to_value(extract_all(&[], &registry)).unwrap();
    let outputs = outputs.as_object().unwrap();
    assert_eq!(outputs.len(), registry.key_count());
    assert!(outputs.values().all(Value::is_null));

    assert_eq!(
        serde_json::to_value(summarize(&[], registry.final_output())).unwrap(),
        json!({"total_entries": 0, "authors": [], "agent_calls": [], "final_output_found": false})
    );
}

#[test]
fn malformed_events_do_not_block_extraction_elsewhere() {
    let trace = events(json!([
        {"actions": {"stateDelta": {"financial_coordinator_output": "```json\n{\"orphan\": true}\n```"}}},
        "not an object",
        {"author": "financial_coordinator"},
        {"author": "financial_coordinator", "actions": null},
        {"author": "financial_coordinator", "actions": {"stateDelta": {
            "financial_coordinator_output": "```json\n{\"ok\": true}\n```"
        }}},
        {"author": "financial_coordinator", "actions": {"stateDelta": 12}},
        {"content": {"parts": "nope"}}
    ]));
    let registry = OutputKeyRegistry::default();

    assert_eq!(
        extract_final_output(&trace, &registry),
        Some(json!({"ok": true}))
    );
    // Aggregate ignores authorship, so the orphan event resolves the key first.
    assert_eq!(
        extract_all(&trace, &registry).get("financial_coordinator_output"),
        Some(&json!({"orphan": true}))
    );
    let summary = summarize(&trace, registry.final_output());
    assert_eq!(summary.total_entries, 7);
    assert_eq!(summary.authors[0], "unknown");
    assert!(summary.final_output_found);
}

#[test]
fn report_bundles_all_extractions() {
    let trace = financial_run();
    let report = ExtractionReport::build(&trace, &OutputKeyRegistry::default());

    assert!(report.extraction_successful);
    assert_eq!(report.total_entries, 10);
    assert_eq!(report.error, None);
    assert_eq!(report.conversation_summary.agent_calls.len(), 3);
    assert_eq!(report.agent_outputs.resolved_count(), 4);
}
