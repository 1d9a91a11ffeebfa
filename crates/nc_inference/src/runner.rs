use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use futures::future::join_all;
use nc_core::{ArticleInput, Error, Result, SummaryResult};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, info};

use crate::summarizer::Summarizer;

/// Delay between sequential requests.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(1500);

/// How a batch of articles is scheduled against the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// One article at a time with `delay` between requests.
    Sequential { delay: Duration },
    /// Groups of `group_size` run concurrently; request `i` of a group starts
    /// after `i * stagger`, and groups are separated by `pause`.
    Batched {
        group_size: usize,
        stagger: Duration,
        pause: Duration,
    },
}

impl Default for RunMode {
    fn default() -> Self {
        Self::Sequential { delay: DEFAULT_DELAY }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RunEvent {
    Started {
        index: usize,
        total: usize,
        id: String,
        title: String,
    },
    Finished {
        index: usize,
        total: usize,
        id: String,
        summary: SummaryResult,
    },
    Cancelled,
    Done {
        processed: usize,
    },
}

/// Cancels a running [`SummaryRun`]; cheap to clone and hand to a signal handler.
#[derive(Debug, Clone)]
pub struct RunCanceller {
    tx: Arc<watch::Sender<bool>>,
}

impl RunCanceller {
    pub fn cancel(&self) {
        // send_replace never fails, even with no receivers left
        self.tx.send_replace(true);
    }
}

/// Handle to a summarization run spawned on the tokio runtime.
pub struct SummaryRun {
    events: mpsc::UnboundedReceiver<RunEvent>,
    canceller: RunCanceller,
    handle: JoinHandle<BTreeMap<String, SummaryResult>>,
}

impl SummaryRun {
    pub fn start(summarizer: Arc<Summarizer>, articles: Vec<ArticleInput>, mode: RunMode) -> Self {
        let (event_tx, events) = mpsc::unbounded_channel();
        let (cancel_tx, cancel_rx) = watch::channel(false);

        let handle = tokio::spawn(async move {
            let runner = Runner {
                summarizer,
                events: event_tx,
                cancel: cancel_rx,
                results: BTreeMap::new(),
            };
            runner.run(articles, mode).await
        });

        Self {
            events,
            canceller: RunCanceller { tx: Arc::new(cancel_tx) },
            handle,
        }
    }

    /// Next progress event, or `None` once the run has finished and all
    /// events were drained.
    pub async fn next_event(&mut self) -> Option<RunEvent> {
        self.events.recv().await
    }

    /// Stops scheduling further requests. Summaries finished before the cancel
    /// are kept; calls still in flight complete but their results are discarded.
    pub fn cancel(&self) {
        self.canceller.cancel();
    }

    pub fn canceller(&self) -> RunCanceller {
        self.canceller.clone()
    }

    /// Waits for the run and returns the summaries keyed by article id.
    pub async fn join(self) -> Result<BTreeMap<String, SummaryResult>> {
        // Keep the cancel sender alive: the task treats a dropped sender as
        // a cancellation.
        let Self { canceller, handle, .. } = self;
        let results = handle.await.map_err(|e| Error::External(e.into()));
        drop(canceller);
        results
    }
}

struct Runner {
    summarizer: Arc<Summarizer>,
    events: mpsc::UnboundedSender<RunEvent>,
    cancel: watch::Receiver<bool>,
    results: BTreeMap<String, SummaryResult>,
}

impl Runner {
    async fn run(mut self, articles: Vec<ArticleInput>, mode: RunMode) -> BTreeMap<String, SummaryResult> {
        let total = articles.len();
        info!("📚 Summarizing {} articles ({:?})", total, mode);

        let completed = match mode {
            RunMode::Sequential { delay } => self.run_sequential(articles, delay).await,
            RunMode::Batched { group_size, stagger, pause } => {
                self.run_batched(articles, group_size.max(1), stagger, pause).await
            }
        };

        if completed {
            info!("✅ Summarized {} of {} articles", self.results.len(), total);
            self.emit(RunEvent::Done { processed: self.results.len() });
        } else {
            info!("🛑 Run cancelled after {} articles", self.results.len());
            self.emit(RunEvent::Cancelled);
        }
        self.results
    }

    async fn run_sequential(&mut self, articles: Vec<ArticleInput>, delay: Duration) -> bool {
        let total = articles.len();
        for (index, article) in articles.into_iter().enumerate() {
            if index > 0 && !pause(delay, &mut self.cancel).await {
                return false;
            }
            if is_cancelled(&self.cancel) {
                return false;
            }

            self.emit_started(index, total, &article);
            let summary = self.summarizer.summarize(&article, rand::random()).await;
            if is_cancelled(&self.cancel) {
                debug!("Discarding summary for {} after cancellation", article.id);
                return false;
            }
            self.record(index, total, article.id, summary);
        }
        true
    }

    async fn run_batched(
        &mut self,
        articles: Vec<ArticleInput>,
        group_size: usize,
        stagger: Duration,
        pause_between: Duration,
    ) -> bool {
        let total = articles.len();
        for (group, chunk) in articles.chunks(group_size).enumerate() {
            if group > 0 && !pause(pause_between, &mut self.cancel).await {
                return false;
            }
            if is_cancelled(&self.cancel) {
                return false;
            }

            let base = group * group_size;
            let futures = chunk.iter().enumerate().map(|(offset, article)| {
                let summarizer = self.summarizer.clone();
                let events = self.events.clone();
                let mut cancel = self.cancel.clone();
                let index = base + offset;
                let wait = stagger * offset as u32;
                async move {
                    if !pause(wait, &mut cancel).await {
                        return None;
                    }
                    let _ = events.send(RunEvent::Started {
                        index,
                        total,
                        id: article.id.clone(),
                        title: article.title.clone(),
                    });
                    let summary = summarizer.summarize(article, rand::random()).await;
                    if is_cancelled(&cancel) {
                        debug!("Discarding summary for {} after cancellation", article.id);
                        return None;
                    }
                    let _ = events.send(RunEvent::Finished {
                        index,
                        total,
                        id: article.id.clone(),
                        summary: summary.clone(),
                    });
                    Some((article.id.clone(), summary))
                }
            });
            let finished = join_all(futures).await;
            self.results.extend(finished.into_iter().flatten());

            if is_cancelled(&self.cancel) {
                debug!("Stopping after group {}", group + 1);
                return false;
            }
        }
        true
    }

    fn emit(&self, event: RunEvent) {
        // The handle may have stopped listening; the results still count.
        let _ = self.events.send(event);
    }

    fn emit_started(&self, index: usize, total: usize, article: &ArticleInput) {
        self.emit(RunEvent::Started {
            index,
            total,
            id: article.id.clone(),
            title: article.title.clone(),
        });
    }

    fn record(&mut self, index: usize, total: usize, id: String, summary: SummaryResult) {
        self.emit(RunEvent::Finished {
            index,
            total,
            id: id.clone(),
            summary: summary.clone(),
        });
        self.results.insert(id, summary);
    }
}

/// Sleeps for `duration` unless cancelled first. Returns `false` on cancel.
async fn pause(duration: Duration, cancel: &mut watch::Receiver<bool>) -> bool {
    if is_cancelled(cancel) {
        return false;
    }
    if duration.is_zero() {
        return true;
    }
    tokio::select! {
        _ = sleep(duration) => !is_cancelled(cancel),
        changed = cancel.changed() => changed.is_ok() && !*cancel.borrow(),
    }
}

fn is_cancelled(cancel: &watch::Receiver<bool>) -> bool {
    *cancel.borrow() || cancel.has_changed().is_err()
}
