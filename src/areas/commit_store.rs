//! Commit sources
//!
//! The panel pulls its commits through [`CommitStore`]: `model()` returns
//! the current sequence, `request_more()` asks for a longer one. Requests
//! are fire-and-forget; the panel notices growth the next time it pulls.
//!
//! Two stores are provided:
//!
//! - `MemoryStore`: a sequence handed in by the host, recording requests
//! - `PagedCommitStore`: loads pages in the background on a tokio runtime
//!   and applies results on the caller's thread

use crate::artifacts::objects::commit::Commit;
use std::cell::{Cell, RefCell};
use std::future::Future;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

/// Ask the store for a different slice of history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadMoreRequest {
    /// Commits the panel had when it asked
    pub loaded: usize,
    /// Commits wanted in total; `None` for the whole history
    pub limit: Option<usize>,
    /// Load every branch instead of the history of `HEAD`
    pub all_branches: bool,
    /// Load again from scratch because the repository may have changed,
    /// even if the history looked complete before
    pub reload: bool,
}

pub trait CommitStore {
    /// The current commit sequence, newest first
    fn model(&self) -> Arc<[Commit]>;

    /// Grow or reshape the sequence; the result shows up in a later `model()`
    fn request_more(&self, request: LoadMoreRequest);
}

/// Produces commit sequences for [`PagedCommitStore`]
pub trait CommitLoader: Send + Sync + 'static {
    fn load(
        &self,
        limit: Option<usize>,
        all_branches: bool,
    ) -> impl Future<Output = anyhow::Result<Vec<Commit>>> + Send;
}

/// Store over a sequence owned by the host
#[derive(Debug, Default)]
pub struct MemoryStore {
    model: RefCell<Arc<[Commit]>>,
    requests: RefCell<Vec<LoadMoreRequest>>,
}

impl MemoryStore {
    pub fn new(commits: Vec<Commit>) -> Self {
        MemoryStore {
            model: RefCell::new(Arc::from(commits)),
            requests: RefCell::new(Vec::new()),
        }
    }

    /// Replace the sequence, as a host-side loader would after a request
    pub fn replace(&self, commits: Vec<Commit>) {
        *self.model.borrow_mut() = Arc::from(commits);
    }

    /// Requests received so far, oldest first
    pub fn requests(&self) -> Vec<LoadMoreRequest> {
        self.requests.borrow().clone()
    }
}

impl CommitStore for MemoryStore {
    fn model(&self) -> Arc<[Commit]> {
        Arc::clone(&self.model.borrow())
    }

    fn request_more(&self, request: LoadMoreRequest) {
        self.requests.borrow_mut().push(request);
    }
}

struct LoadResult {
    generation: u64,
    limit: Option<usize>,
    all_branches: bool,
    commits: anyhow::Result<Vec<Commit>>,
}

/// Store that loads history page by page in the background
///
/// Every request spawns a load tagged with a new generation. Results travel
/// back over a channel and are applied by [`poll_loaded`] or
/// [`wait_loaded`] on the thread that owns the store; a result whose
/// generation was superseded by a later request is dropped. A load that
/// fails leaves the sequence as it was.
///
/// [`poll_loaded`]: PagedCommitStore::poll_loaded
/// [`wait_loaded`]: PagedCommitStore::wait_loaded
pub struct PagedCommitStore<L> {
    runtime: Handle,
    loader: Arc<L>,
    model: RefCell<Arc<[Commit]>>,
    requested: Cell<u64>,
    applied: Cell<u64>,
    exhausted: Cell<bool>,
    sender: UnboundedSender<LoadResult>,
    receiver: RefCell<UnboundedReceiver<LoadResult>>,
}

impl<L: CommitLoader> PagedCommitStore<L> {
    pub fn new(runtime: Handle, loader: L) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();

        PagedCommitStore {
            runtime,
            loader: Arc::new(loader),
            model: RefCell::new(Arc::from(Vec::new())),
            requested: Cell::new(0),
            applied: Cell::new(0),
            exhausted: Cell::new(false),
            sender,
            receiver: RefCell::new(receiver),
        }
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// A load is in flight whose result has not been applied yet
    pub fn is_loading(&self) -> bool {
        self.applied.get() < self.requested.get()
    }

    /// Apply finished loads without blocking
    ///
    /// # Returns
    ///
    /// Whether the sequence changed
    pub fn poll_loaded(&self) -> bool {
        let mut changed = false;
        while let Ok(result) = self.receiver.borrow_mut().try_recv() {
            changed |= self.apply(result);
        }
        changed
    }

    /// Block until the latest requested load has been applied
    ///
    /// Must not be called from within the runtime's async context.
    ///
    /// # Returns
    ///
    /// Whether the sequence changed
    pub fn wait_loaded(&self) -> bool {
        let mut changed = false;
        while self.is_loading() {
            let Some(result) = self.receiver.borrow_mut().blocking_recv() else {
                break;
            };
            changed |= self.apply(result);
        }
        changed
    }

    fn apply(&self, result: LoadResult) -> bool {
        if result.generation != self.requested.get() {
            debug!(
                generation = result.generation,
                latest = self.requested.get(),
                "discarding superseded commit load"
            );
            return false;
        }
        self.applied.set(result.generation);

        match result.commits {
            Ok(commits) => {
                info!(
                    generation = result.generation,
                    commits = commits.len(),
                    all_branches = result.all_branches,
                    "commits loaded"
                );
                let exhausted = result.limit.is_none_or(|limit| commits.len() < limit);
                self.exhausted.set(exhausted && !result.all_branches);
                *self.model.borrow_mut() = Arc::from(commits);
                true
            }
            Err(error) => {
                warn!(generation = result.generation, "failed to load commits: {error:#}");
                false
            }
        }
    }
}

impl<L: CommitLoader> CommitStore for PagedCommitStore<L> {
    fn model(&self) -> Arc<[Commit]> {
        Arc::clone(&self.model.borrow())
    }

    fn request_more(&self, request: LoadMoreRequest) {
        // The whole single-branch history is already here; paging further
        // would load the same commits
        if !request.reload
            && request.limit.is_some()
            && !request.all_branches
            && self.exhausted.get()
        {
            debug!(loaded = request.loaded, "history exhausted, ignoring load request");
            return;
        }

        let generation = self.requested.get() + 1;
        self.requested.set(generation);
        debug!(generation, ?request, "requesting commits");

        let loader = Arc::clone(&self.loader);
        let sender = self.sender.clone();
        self.runtime.spawn(async move {
            let commits = loader.load(request.limit, request.all_branches).await;
            // The store may be gone by now
            let _ = sender.send(LoadResult {
                generation,
                limit: request.limit,
                all_branches: request.all_branches,
                commits,
            });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::sha::Sha;
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::runtime::Runtime;

    fn history(len: usize) -> Vec<Commit> {
        (0..len)
            .map(|i| {
                Commit::new(
                    Sha::try_parse(format!("{:040x}", i + 1)).unwrap(),
                    format!("commit {i}"),
                    Vec::new(),
                )
            })
            .collect()
    }

    /// Serves prefixes of a history that tests may grow, optionally slowing
    /// down the first call so that a later request overtakes it
    struct FakeLoader {
        history: Mutex<Vec<Commit>>,
        slow_first: bool,
        calls: Mutex<Vec<Option<usize>>>,
    }

    impl FakeLoader {
        fn new(len: usize) -> Self {
            FakeLoader {
                history: Mutex::new(history(len)),
                slow_first: false,
                calls: Mutex::new(Vec::new()),
            }
        }

        /// Make `len` commits available to later loads
        fn grow(&self, len: usize) {
            *self.history.lock().unwrap() = history(len);
        }
    }

    impl CommitLoader for FakeLoader {
        async fn load(
            &self,
            limit: Option<usize>,
            _all_branches: bool,
        ) -> anyhow::Result<Vec<Commit>> {
            let first = {
                let mut calls = self.calls.lock().unwrap();
                calls.push(limit);
                calls.len() == 1
            };
            if self.slow_first && first {
                tokio::time::sleep(Duration::from_millis(200)).await;
            }
            if limit == Some(0) {
                anyhow::bail!("nothing to load");
            }

            let history = self.history.lock().unwrap();
            let len = limit.unwrap_or(usize::MAX).min(history.len());
            Ok(history[..len].to_vec())
        }
    }

    fn request(loaded: usize, limit: Option<usize>) -> LoadMoreRequest {
        LoadMoreRequest {
            loaded,
            limit,
            all_branches: false,
            reload: false,
        }
    }

    #[test]
    fn memory_store_records_requests() {
        let store = MemoryStore::new(history(3));
        store.request_more(request(3, Some(10)));

        assert_eq!(store.model().len(), 3);
        assert_eq!(store.requests(), vec![request(3, Some(10))]);

        store.replace(history(5));
        assert_eq!(store.model().len(), 5);
    }

    #[test]
    fn loads_pages_in_the_background() {
        let runtime = Runtime::new().unwrap();
        let store = PagedCommitStore::new(runtime.handle().clone(), FakeLoader::new(50));
        assert!(store.model().is_empty());

        store.request_more(request(0, Some(20)));
        assert!(store.wait_loaded());
        assert_eq!(store.model().len(), 20);

        store.request_more(request(20, Some(40)));
        assert!(store.wait_loaded());
        let model = store.model();
        assert_eq!(model.len(), 40);
        assert_eq!(&model[..20], &history(50)[..20]);
    }

    #[test]
    fn superseded_results_are_discarded() {
        let runtime = Runtime::new().unwrap();
        let loader = FakeLoader {
            slow_first: true,
            ..FakeLoader::new(50)
        };
        let store = PagedCommitStore::new(runtime.handle().clone(), loader);

        store.request_more(request(0, Some(10)));
        store.request_more(request(0, Some(30)));
        assert!(store.wait_loaded());
        assert_eq!(store.model().len(), 30);

        // The slow first load arrives late and must not shrink the model
        std::thread::sleep(Duration::from_millis(300));
        assert!(!store.poll_loaded());
        assert_eq!(store.model().len(), 30);
    }

    #[test]
    fn failed_load_keeps_the_sequence() {
        let runtime = Runtime::new().unwrap();
        let store = PagedCommitStore::new(runtime.handle().clone(), FakeLoader::new(5));

        store.request_more(request(0, Some(3)));
        store.wait_loaded();
        store.request_more(request(3, Some(0)));

        assert!(!store.wait_loaded());
        assert_eq!(store.model().len(), 3);
        assert!(!store.is_loading());
    }

    #[test]
    fn exhausted_history_is_not_requested_again() {
        let runtime = Runtime::new().unwrap();
        let store = PagedCommitStore::new(runtime.handle().clone(), FakeLoader::new(5));

        store.request_more(request(0, Some(10)));
        store.wait_loaded();
        assert_eq!(store.model().len(), 5);

        store.request_more(request(5, Some(20)));
        assert!(!store.is_loading());

        // Unlimited loads always go through
        store.request_more(request(5, None));
        assert!(store.is_loading());
        store.wait_loaded();
    }

    #[test]
    fn reload_goes_through_once_history_is_exhausted() {
        let runtime = Runtime::new().unwrap();
        let store = PagedCommitStore::new(runtime.handle().clone(), FakeLoader::new(5));
        store.request_more(request(0, Some(10)));
        store.wait_loaded();

        store.loader().grow(8);
        store.request_more(LoadMoreRequest {
            reload: true,
            ..request(5, Some(10))
        });

        assert!(store.is_loading());
        assert!(store.wait_loaded());
        assert_eq!(store.model().len(), 8);
    }
}
