use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use async_trait::async_trait;
use nc_core::{ArticleInput, ChatModel, ChatRequest, Error, Result};
use nc_inference::runner::{RunEvent, RunMode, SummaryRun};
use nc_inference::{fallback_summary, InferenceConfig, Summarizer};

/// Answers after `latency`, echoing the article's first sentence as the TL;DR.
#[derive(Debug)]
struct SlowModel {
    latency: Duration,
    calls: AtomicUsize,
}

#[async_trait]
impl ChatModel for SlowModel {
    fn name(&self) -> &str {
        "slow"
    }

    async fn complete(&self, request: &ChatRequest) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.latency).await;
        let prompt = request.user_content().unwrap_or_default();
        let article = prompt
            .split("Article: ")
            .nth(1)
            .and_then(|rest| rest.split('.').next())
            .unwrap_or_default();
        Ok(format!(
            "TL;DR: {}.\nKey Takeaways:\n1. The takeaway for this story is clear.",
            article
        ))
    }
}

/// Answers quickly for the first article and slowly for every other one.
#[derive(Debug)]
struct UnevenModel {
    fast: Duration,
    slow: Duration,
}

#[async_trait]
impl ChatModel for UnevenModel {
    fn name(&self) -> &str {
        "uneven"
    }

    async fn complete(&self, request: &ChatRequest) -> Result<String> {
        let prompt = request.user_content().unwrap_or_default();
        let latency = if prompt.contains("topic0") { self.fast } else { self.slow };
        tokio::time::sleep(latency).await;
        Ok("TL;DR: Researchers published new findings today.\nKey Takeaways:\n1. The takeaway for this story is clear.".to_string())
    }
}

#[derive(Debug)]
struct BrokenModel;

#[async_trait]
impl ChatModel for BrokenModel {
    fn name(&self) -> &str {
        "broken"
    }

    async fn complete(&self, _request: &ChatRequest) -> Result<String> {
        Err(Error::Inference("503 Service Unavailable".to_string()))
    }
}

fn slow(latency: Duration) -> Arc<SlowModel> {
    Arc::new(SlowModel {
        latency,
        calls: AtomicUsize::new(0),
    })
}

fn summarizer(model: Arc<dyn ChatModel>) -> Arc<Summarizer> {
    Arc::new(Summarizer::new(model, InferenceConfig::default()))
}

fn articles(n: usize) -> Vec<ArticleInput> {
    (0..n)
        .map(|i| {
            ArticleInput::new(format!("id-{}", i), format!("Health story number {}", i))
                .with_description(format!("Researchers published findings about topic{} today. More follows.", i))
        })
        .collect()
}

async fn drain(run: &mut SummaryRun) -> Vec<RunEvent> {
    let mut events = Vec::new();
    while let Some(event) = run.next_event().await {
        events.push(event);
    }
    events
}

#[tokio::test]
async fn test_sequential_run_emits_events_in_order() {
    let model = slow(Duration::from_millis(1));
    let mut run = SummaryRun::start(
        summarizer(model.clone()),
        articles(3),
        RunMode::Sequential { delay: Duration::from_millis(5) },
    );

    let events = drain(&mut run).await;
    let results = run.join().await.unwrap();

    assert_eq!(results.len(), 3);
    assert_eq!(model.calls.load(Ordering::SeqCst), 3);
    assert_eq!(
        results["id-1"].tldr,
        "Researchers published findings about topic1 today."
    );

    let order: Vec<String> = events
        .iter()
        .filter_map(|e| match e {
            RunEvent::Started { id, .. } => Some(format!("start {}", id)),
            RunEvent::Finished { id, .. } => Some(format!("finish {}", id)),
            _ => None,
        })
        .collect();
    assert_eq!(
        order,
        vec!["start id-0", "finish id-0", "start id-1", "finish id-1", "start id-2", "finish id-2"]
    );
    assert_eq!(events.last(), Some(&RunEvent::Done { processed: 3 }));
}

#[tokio::test]
async fn test_batched_run_overlaps_requests() {
    let model = slow(Duration::from_millis(100));
    let started = std::time::Instant::now();
    let run = SummaryRun::start(
        summarizer(model.clone()),
        articles(4),
        RunMode::Batched {
            group_size: 4,
            stagger: Duration::from_millis(5),
            pause: Duration::from_millis(5),
        },
    );
    let results = run.join().await.unwrap();

    assert_eq!(results.len(), 4);
    // Four sequential calls would take at least 400ms.
    assert!(started.elapsed() < Duration::from_millis(350));
}

#[tokio::test]
async fn test_batched_run_covers_every_group() {
    let model = slow(Duration::from_millis(1));
    let mut run = SummaryRun::start(
        summarizer(model.clone()),
        articles(5),
        RunMode::Batched {
            group_size: 2,
            stagger: Duration::from_millis(1),
            pause: Duration::from_millis(5),
        },
    );
    let events = drain(&mut run).await;
    let results = run.join().await.unwrap();

    assert_eq!(results.keys().cloned().collect::<Vec<_>>(), vec!["id-0", "id-1", "id-2", "id-3", "id-4"]);
    assert_eq!(events.last(), Some(&RunEvent::Done { processed: 5 }));
}

#[tokio::test]
async fn test_cancel_stops_pending_work() {
    let model = slow(Duration::from_millis(1));
    let mut run = SummaryRun::start(
        summarizer(model.clone()),
        articles(3),
        RunMode::Sequential { delay: Duration::from_secs(30) },
    );

    loop {
        match run.next_event().await {
            Some(RunEvent::Finished { .. }) => break,
            Some(_) => continue,
            None => panic!("run ended before the first summary"),
        }
    }
    run.cancel();

    let events = tokio::time::timeout(Duration::from_secs(5), drain(&mut run))
        .await
        .unwrap();
    assert_eq!(events, vec![RunEvent::Cancelled]);

    let results = run.join().await.unwrap();
    assert_eq!(results.len(), 1);
    assert!(results.contains_key("id-0"));
    assert_eq!(model.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_in_flight_results_discarded_after_cancel() {
    let model = slow(Duration::from_millis(200));
    let mut run = SummaryRun::start(
        summarizer(model.clone()),
        articles(2),
        RunMode::Batched {
            group_size: 2,
            stagger: Duration::ZERO,
            pause: Duration::ZERO,
        },
    );

    match run.next_event().await {
        Some(RunEvent::Started { .. }) => run.cancel(),
        other => panic!("unexpected event {:?}", other),
    }

    let events = drain(&mut run).await;
    assert!(events.iter().all(|e| !matches!(e, RunEvent::Finished { .. })));
    assert_eq!(events.last(), Some(&RunEvent::Cancelled));
    assert!(run.join().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_cancel_keeps_group_members_that_already_finished() {
    let model = Arc::new(UnevenModel {
        fast: Duration::from_millis(10),
        slow: Duration::from_millis(400),
    });
    let mut run = SummaryRun::start(
        summarizer(model),
        articles(2),
        RunMode::Batched {
            group_size: 2,
            stagger: Duration::ZERO,
            pause: Duration::ZERO,
        },
    );

    loop {
        match run.next_event().await {
            Some(RunEvent::Finished { id, .. }) => {
                assert_eq!(id, "id-0");
                break;
            }
            Some(_) => continue,
            None => panic!("run ended before the fast summary"),
        }
    }
    run.cancel();

    let events = tokio::time::timeout(Duration::from_secs(5), drain(&mut run))
        .await
        .unwrap();
    assert!(events.iter().all(|e| !matches!(e, RunEvent::Finished { .. })));
    assert_eq!(events.last(), Some(&RunEvent::Cancelled));

    let results = run.join().await.unwrap();
    assert_eq!(results.keys().cloned().collect::<Vec<_>>(), vec!["id-0"]);
}

#[tokio::test]
async fn test_failing_model_still_produces_results() {
    let run = SummaryRun::start(
        summarizer(Arc::new(BrokenModel)),
        articles(2),
        RunMode::Sequential { delay: Duration::ZERO },
    );
    let results = run.join().await.unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(
        results["id-0"],
        fallback_summary(
            Some("Researchers published findings about topic0 today. More follows."),
            Some("Health story number 0")
        )
    );
}

#[tokio::test]
async fn test_empty_run() {
    let mut run = SummaryRun::start(summarizer(slow(Duration::ZERO)), Vec::new(), RunMode::default());
    assert_eq!(drain(&mut run).await, vec![RunEvent::Done { processed: 0 }]);
    assert!(run.join().await.unwrap().is_empty());
}
