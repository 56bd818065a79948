use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use sentiment_breakdown::aggregate::{Aggregator, Breakdown, Classifier, Label, LabelMap};
use sentiment_breakdown::error::{PipelineError, Result};

/// Labels by keyword, like a tiny deterministic model.
struct KeywordClassifier {
    calls: AtomicUsize,
}

impl KeywordClassifier {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
        })
    }
}

impl Classifier for KeywordClassifier {
    fn classify(&self, clause: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let lower = clause.to_lowercase();
        if lower.contains("boom") {
            Err(PipelineError::Classification("unsupported sequence".into()))
        } else if lower.contains("good") {
            Ok("Positive".into())
        } else if lower.contains("bad") {
            Ok("NEGATIVE".into())
        } else if lower.contains("meh") {
            Ok("mixed".into())
        } else {
            Ok("neutral".into())
        }
    }
}

fn assert_breakdown(b: &Breakdown, positive: f64, negative: f64, neutral: f64, overall: Label) {
    assert!((b.positive - positive).abs() < 1e-9, "positive: {}", b.positive);
    assert!((b.negative - negative).abs() < 1e-9, "negative: {}", b.negative);
    assert!((b.neutral - neutral).abs() < 1e-9, "neutral: {}", b.neutral);
    assert_eq!(b.overall, overall);
}

#[tokio::test]
async fn empty_and_blank_statements_are_neutral() -> Result<()> {
    let classifier = KeywordClassifier::new();
    let aggregator = Aggregator::new(classifier.clone());

    for statement in ["", "   ", " . .. \n"] {
        let report = aggregator.aggregate(statement).await?;
        assert_eq!(report.breakdown, Breakdown::empty());
        assert_breakdown(&report.breakdown, 0.0, 0.0, 0.0, Label::Neutral);
        assert!(report.clauses.is_empty());
    }
    assert_eq!(classifier.calls.load(Ordering::SeqCst), 0);
    Ok(())
}

#[tokio::test]
async fn single_positive_clause() -> Result<()> {
    let aggregator = Aggregator::new(KeywordClassifier::new());
    let report = aggregator.aggregate("Good.").await?;

    assert_breakdown(&report.breakdown, 100.0, 0.0, 0.0, Label::Positive);
    assert_eq!(report.breakdown.total, 1);
    assert_eq!(report.clauses[0].raw_label.as_deref(), Some("positive"));
    Ok(())
}

#[tokio::test]
async fn even_split_resolves_to_first_label_seen() -> Result<()> {
    let aggregator = Aggregator::new(KeywordClassifier::new());

    let report = aggregator.aggregate("Good. Bad.").await?;
    assert_breakdown(&report.breakdown, 50.0, 50.0, 0.0, Label::Positive);

    let report = aggregator.aggregate("Bad. Good.").await?;
    assert_breakdown(&report.breakdown, 50.0, 50.0, 0.0, Label::Negative);
    Ok(())
}

#[tokio::test]
async fn consecutive_separators_classify_two_clauses() -> Result<()> {
    let classifier = KeywordClassifier::new();
    let aggregator = Aggregator::new(classifier.clone());

    let report = aggregator.aggregate("Good.. Bad.").await?;
    assert_eq!(report.breakdown.total, 2);
    assert_eq!(classifier.calls.load(Ordering::SeqCst), 2);
    let texts: Vec<_> = report.clauses.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, vec!["Good", "Bad"]);
    Ok(())
}

#[tokio::test]
async fn failing_clause_counts_as_neutral() -> Result<()> {
    let aggregator = Aggregator::new(KeywordClassifier::new());
    let report = aggregator.aggregate("Good day. It went boom. Bad night.").await?;

    assert_eq!(report.breakdown.total, 3);
    assert_eq!(report.failures(), 1);
    let failed = &report.clauses[1];
    assert_eq!(failed.label, Label::Neutral);
    assert!(failed.raw_label.is_none());
    assert_eq!(failed.error.as_deref(), Some("unsupported sequence"));

    let third = 100.0 / 3.0;
    assert_breakdown(&report.breakdown, third, third, third, Label::Positive);
    Ok(())
}

#[tokio::test]
async fn known_labels_sum_to_one_hundred() -> Result<()> {
    let aggregator = Aggregator::new(KeywordClassifier::new());
    let report = aggregator
        .aggregate("good. bad. fine. good again. still good. bad luck. whatever")
        .await?;

    let b = &report.breakdown;
    assert_eq!(b.other, 0.0);
    assert!((b.positive + b.negative + b.neutral - 100.0).abs() < 1e-9);
    assert_eq!(b.overall, Label::Positive);
    Ok(())
}

#[tokio::test]
async fn unknown_labels_go_to_other_bucket() -> Result<()> {
    let aggregator = Aggregator::new(KeywordClassifier::new());
    let report = aggregator.aggregate("meh. good").await?;

    let b = &report.breakdown;
    assert_eq!(b.other, 50.0);
    assert_eq!(b.positive, 50.0);
    assert!((b.positive + b.negative + b.neutral + b.other - 100.0).abs() < 1e-9);
    assert_eq!(b.overall, Label::Other);
    assert_eq!(report.clauses[0].raw_label.as_deref(), Some("mixed"));
    Ok(())
}

#[tokio::test]
async fn label_aliases_map_raw_model_labels() -> Result<()> {
    let classifier = Arc::new(|clause: &str| -> Result<String> {
        Ok(if clause.starts_with('+') { "LABEL_2" } else { "LABEL_0" }.to_string())
    });
    let labels = LabelMap::new()
        .with_alias("LABEL_0", Label::Negative)
        .with_alias("LABEL_2", Label::Positive);
    let aggregator = Aggregator::new(classifier).with_labels(labels);

    let report = aggregator.aggregate("+ yes. - no. - nope").await?;
    let b = &report.breakdown;
    assert!((b.negative - 200.0 / 3.0).abs() < 1e-9);
    assert_eq!(b.overall, Label::Negative);
    Ok(())
}

#[tokio::test]
async fn slow_clause_times_out_as_neutral() -> Result<()> {
    let classifier = Arc::new(|clause: &str| -> Result<String> {
        if clause == "slow" {
            std::thread::sleep(Duration::from_millis(300));
        }
        Ok("positive".to_string())
    });
    let aggregator = Aggregator::new(classifier).with_timeout(Duration::from_millis(50));

    let report = aggregator.aggregate("fast. slow. fast").await?;
    assert_eq!(report.failures(), 1);
    assert_eq!(report.clauses[1].label, Label::Neutral);
    assert!(report.clauses[1]
        .error
        .as_deref()
        .is_some_and(|e| e.contains("timed out")));
    assert_breakdown(&report.breakdown, 200.0 / 3.0, 0.0, 100.0 / 3.0, Label::Positive);
    Ok(())
}

#[tokio::test]
async fn panicking_classifier_fails_whole_statement() {
    let classifier = Arc::new(|_: &str| -> Result<String> { panic!("inference engine crashed") });
    let aggregator = Aggregator::new(classifier);

    let err = aggregator.aggregate("one. two").await.unwrap_err();
    assert!(matches!(err, PipelineError::Unexpected(_)));
}

#[tokio::test]
async fn repeated_runs_are_identical() -> Result<()> {
    let aggregator = Aggregator::new(KeywordClassifier::new());
    let statement = "Good food. Bad service. Okay prices. Good view.";

    let first = aggregator.aggregate(statement).await?;
    let second = aggregator.aggregate(statement).await?;
    assert_eq!(first.breakdown, second.breakdown);
    assert_eq!(first.clauses, second.clauses);
    Ok(())
}

#[tokio::test]
async fn shared_between_tasks() -> Result<()> {
    let classifier: Arc<dyn Classifier> = KeywordClassifier::new();
    let aggregator = Arc::new(Aggregator::new(classifier));

    let handles: Vec<_> = ["good. bad", "bad. bad", "good"]
        .into_iter()
        .map(|statement| {
            let aggregator = Arc::clone(&aggregator);
            tokio::spawn(async move { aggregator.aggregate(statement).await })
        })
        .collect();

    let mut overall = Vec::new();
    for handle in handles {
        let report = handle.await.expect("task panicked")?;
        overall.push(report.breakdown.overall);
    }
    assert_eq!(overall, vec![Label::Positive, Label::Negative, Label::Positive]);
    Ok(())
}
