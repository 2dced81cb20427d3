use regaut_lib::{
    config::{ConversionConfig, CorrectionConfig, EliminationConfig, EliminationOrder, RegautConfig},
    pipeline::{Pipeline, PipelineReport},
};

#[test]
fn test_report_serializes() {
    let report = Pipeline::default().report("(a|b)*abb").unwrap();
    let json = serde_json::to_string(&report).unwrap();
    let parsed: PipelineReport = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed, report);
    assert_eq!(report.minimized_states, Some(4));
    assert_eq!(report.equivalent, Some(true));
}

#[test]
fn test_report_from_toml_config() {
    let config = RegautConfig::from_toml_str(
        r#"
        [conversion]
        complete = true
        minimize = false

        [elimination]
        order = "Ascending"
        from_minimized = false
        verify_word_length = 5
        "#,
    )
    .unwrap();
    let report = Pipeline::new(config).report("a(aa)*b*").unwrap();

    assert!(report.dfa_complete);
    assert_eq!(report.minimized_states, None);
    assert_eq!(report.equivalent, Some(true));
}

#[test]
fn test_verification_can_be_disabled() {
    let config = RegautConfig::default()
        .with_elimination(EliminationConfig::default().with_verify_word_length(None));
    let report = Pipeline::new(config).report("ab").unwrap();

    assert_eq!(report.equivalent, None);
    assert_eq!(report.synthesized.as_deref(), Some("ab"));
}

#[test]
fn test_accepts_agree() {
    let config = RegautConfig::default()
        .with_conversion(ConversionConfig::default().with_complete(true));
    let pipeline = Pipeline::new(config);

    for word in ["", "a", "ab", "abab", "aba", "b"] {
        let report = pipeline.accepts("(ab)*", word).unwrap();
        assert!(report.consistent(), "{}", word);
        assert_eq!(report.nfa, word.len() % 2 == 0 && !word.ends_with('a'), "{}", word);
    }
}

#[test]
fn test_correct() {
    let report = Pipeline::default().correct("colou?r", "colr").unwrap();

    assert_eq!(report.distance, Some(1));
    assert_eq!(report.corrected_accepts, Some(true));
    assert!(report.corrected.is_some());
    assert_eq!(report.steps.len(), 4);
}

#[test]
fn test_correct_without_materialization() {
    let config = RegautConfig::default().with_correction(
        CorrectionConfig::default()
            .with_materialize(false)
            .with_from_minimized(true),
    );
    let report = Pipeline::new(config).correct("a+b", "bb").unwrap();

    assert_eq!(report.distance, Some(1));
    assert!(report.corrected.is_none());
    assert_eq!(report.corrected_accepts, None);
}

#[test]
fn test_orders_agree_on_language() {
    for order in [EliminationOrder::Heuristic, EliminationOrder::Ascending] {
        let config = RegautConfig::default()
            .with_elimination(EliminationConfig::default().with_order(order));
        let report = Pipeline::new(config).report("(a|b)*a(a|b)").unwrap();

        assert_eq!(report.equivalent, Some(true), "{:?}", order);
    }
}
