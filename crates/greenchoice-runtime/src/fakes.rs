//! In-memory tab driver and scoring backend for unit tests.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use futures::stream;
use futures::StreamExt;
use greenchoice_protocols::{
    ClassifyRequest, ClassifyResponse, CollectorRequest, ScoreRequestItem, ScoredItem,
    ScoringError, ScoringService, TabDriver, TabError, TabId, TabStatus, TabStatusStream,
};
use parking_lot::Mutex;
use serde_json::{json, Value};

pub(crate) struct FakeTabDriver {
    next_id: AtomicU64,
    scripts: Mutex<HashMap<String, VecDeque<Result<Value, TabError>>>>,
    opened: Mutex<Vec<String>>,
    open_tabs: Mutex<HashSet<TabId>>,
    closed: Mutex<Vec<TabId>>,
    sends: AtomicUsize,
    injects: AtomicUsize,
    max_open: AtomicUsize,
    fail_open: bool,
    fail_inject: bool,
    never_complete: bool,
    send_delay: Option<Duration>,
}

impl FakeTabDriver {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            scripts: Mutex::new(HashMap::new()),
            opened: Mutex::new(Vec::new()),
            open_tabs: Mutex::new(HashSet::new()),
            closed: Mutex::new(Vec::new()),
            sends: AtomicUsize::new(0),
            injects: AtomicUsize::new(0),
            max_open: AtomicUsize::new(0),
            fail_open: false,
            fail_inject: false,
            never_complete: false,
            send_delay: None,
        }
    }

    pub fn failing_open(mut self) -> Self {
        self.fail_open = true;
        self
    }

    pub fn failing_injection(mut self) -> Self {
        self.fail_inject = true;
        self
    }

    pub fn never_completing(mut self) -> Self {
        self.never_complete = true;
        self
    }

    pub fn with_send_delay(mut self, delay: Duration) -> Self {
        self.send_delay = Some(delay);
        self
    }

    /// Queue responses for an action. Unscripted sends answer `[]`.
    pub fn script(&self, action: &str, responses: Vec<Result<Value, TabError>>) {
        self.scripts
            .lock()
            .entry(action.to_string())
            .or_default()
            .extend(responses);
    }

    pub fn opened_urls(&self) -> Vec<String> {
        self.opened.lock().clone()
    }

    pub fn close_count(&self) -> usize {
        self.closed.lock().len()
    }

    pub fn open_tab_count(&self) -> usize {
        self.open_tabs.lock().len()
    }

    pub fn max_concurrent_tabs(&self) -> usize {
        self.max_open.load(Ordering::SeqCst)
    }

    pub fn send_count(&self) -> usize {
        self.sends.load(Ordering::SeqCst)
    }

    pub fn inject_count(&self) -> usize {
        self.injects.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TabDriver for FakeTabDriver {
    async fn open_hidden_tab(&self, url: &str) -> Result<TabId, TabError> {
        if self.fail_open {
            return Err(TabError::OpenFailed("no window".to_string()));
        }
        let tab = TabId(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.opened.lock().push(url.to_string());
        let mut open = self.open_tabs.lock();
        open.insert(tab);
        self.max_open.fetch_max(open.len(), Ordering::SeqCst);
        Ok(tab)
    }

    async fn close_tab(&self, tab: TabId) -> Result<(), TabError> {
        self.open_tabs.lock().remove(&tab);
        self.closed.lock().push(tab);
        Ok(())
    }

    async fn send_to_tab(&self, tab: TabId, request: &CollectorRequest) -> Result<Value, TabError> {
        self.sends.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.send_delay {
            tokio::time::sleep(delay).await;
        }
        if !self.open_tabs.lock().contains(&tab) {
            return Err(TabError::TabNotFound(tab.0));
        }
        self.scripts
            .lock()
            .get_mut(&request.action)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Ok(json!([])))
    }

    async fn inject_collector(&self, _tab: TabId) -> Result<(), TabError> {
        self.injects.fetch_add(1, Ordering::SeqCst);
        if self.fail_inject {
            return Err(TabError::InjectionFailed("script missing".to_string()));
        }
        Ok(())
    }

    async fn status_changes(&self, _tab: TabId) -> Result<TabStatusStream, TabError> {
        let loading = stream::iter(vec![TabStatus::Loading]);
        if self.never_complete {
            Ok(Box::pin(loading.chain(stream::pending())))
        } else {
            Ok(Box::pin(loading.chain(stream::iter(vec![TabStatus::Complete]))))
        }
    }
}

pub(crate) struct FakeScoring {
    classification: Option<ClassifyResponse>,
    scores: HashMap<String, f64>,
    fail_score: bool,
    score_calls: Mutex<Vec<Vec<ScoreRequestItem>>>,
}

impl FakeScoring {
    /// A backend whose classifier is down.
    pub fn new() -> Self {
        Self {
            classification: None,
            scores: HashMap::new(),
            fail_score: false,
            score_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn classifying(mut self, category: &str, gender: &str) -> Self {
        self.classification = Some(ClassifyResponse {
            category: category.to_string(),
            gender: gender.to_string(),
        });
        self
    }

    /// Score for a title. Unlisted titles score 50.
    pub fn scoring(mut self, title: &str, score: f64) -> Self {
        self.scores.insert(title.to_string(), score);
        self
    }

    pub fn failing_score(mut self) -> Self {
        self.fail_score = true;
        self
    }

    pub fn score_calls(&self) -> Vec<Vec<ScoreRequestItem>> {
        self.score_calls.lock().clone()
    }
}

#[async_trait]
impl ScoringService for FakeScoring {
    async fn classify(&self, _request: &ClassifyRequest) -> Result<ClassifyResponse, ScoringError> {
        self.classification
            .clone()
            .ok_or_else(|| ScoringError::Network("connection refused".to_string()))
    }

    async fn score(&self, products: &[ScoreRequestItem]) -> Result<Vec<ScoredItem>, ScoringError> {
        self.score_calls.lock().push(products.to_vec());
        if self.fail_score {
            return Err(ScoringError::ApiError {
                status: 500,
                message: "boom".to_string(),
            });
        }
        Ok(products
            .iter()
            .map(|p| ScoredItem {
                name: p.title.clone(),
                url: p.url.clone(),
                price: p.price.clone(),
                numeric_score: self.scores.get(&p.title).copied().unwrap_or(50.0),
                grade: "C".to_string(),
            })
            .collect())
    }
}
