//! TaskViewModel - the session's task set and its derived view.
//!
//! Consistency model: every successful mutation is followed by a full
//! `list_all` and a fresh derivation. Nothing is patched locally, so the
//! in-memory set is always a snapshot the store actually returned.

use chrono::{DateTime, Utc};

use crate::app::view::{AnnotatedTask, FilterMode, SortMode, ViewQuery, derive_view};
use crate::domain::{DayplanError, NewTask, Task, TaskId};
use crate::ports::{Clock, TaskRepository};

/// Owns the last fetched task set and the presentation selections.
///
/// # Usage
/// ```ignore
/// let mut vm = TaskViewModel::new(SqliteTaskRepository::open("database.sqlite")?, SystemClock);
/// vm.load().await?;
/// vm.add_task(NewTask::new("Buy milk", "Errands", None, Priority::High)).await?;
/// for row in vm.view() { println!("{} {}", row.task.text, row.countdown); }
/// ```
///
/// # Failure
/// When a repository call fails the intent returns the error and leaves
/// `tasks`, the selections and the derived view exactly as they were.
pub struct TaskViewModel<R, C> {
    repository: R,
    clock: C,
    tasks: Vec<Task>,
    query: ViewQuery,
    view: Vec<AnnotatedTask>,
    derived_at: Option<DateTime<Utc>>,
}

impl<R: TaskRepository, C: Clock> TaskViewModel<R, C> {
    /// An empty view-model. Call `load()` to fetch the initial set.
    pub fn new(repository: R, clock: C) -> Self {
        Self {
            repository,
            clock,
            tasks: Vec::new(),
            query: ViewQuery::default(),
            view: Vec::new(),
            derived_at: None,
        }
    }

    /// Fetch the full task set and derive the view.
    pub async fn load(&mut self) -> Result<(), DayplanError> {
        self.resync().await
    }

    /// The current derived list, in presentation order.
    pub fn view(&self) -> &[AnnotatedTask] {
        &self.view
    }

    /// Instant the current view was annotated against.
    pub fn derived_at(&self) -> Option<DateTime<Utc>> {
        self.derived_at
    }

    pub fn query(&self) -> &ViewQuery {
        &self.query
    }

    pub fn search_term(&self) -> &str {
        &self.query.search
    }

    pub fn filter_mode(&self) -> FilterMode {
        self.query.filter
    }

    pub fn sort_mode(&self) -> SortMode {
        self.query.sort
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.query.search = term.into();
        self.rederive();
    }

    pub fn set_filter_mode(&mut self, filter: FilterMode) {
        self.query.filter = filter;
        self.rederive();
    }

    pub fn set_sort_mode(&mut self, sort: SortMode) {
        self.query.sort = sort;
        self.rederive();
    }

    pub fn set_query(&mut self, query: ViewQuery) {
        self.query = query;
        self.rederive();
    }

    /// Recompute the view from the in-memory set against the clock's `now`.
    pub fn rederive(&mut self) {
        let now = self.clock.now();
        self.view = derive_view(&self.tasks, &self.query, now);
        self.derived_at = Some(now);
    }

    /// Create a task. Blank text is rejected before the repository is called.
    ///
    /// Returns the id the store assigned.
    pub async fn add_task(&mut self, task: NewTask) -> Result<TaskId, DayplanError> {
        let task = NewTask::new(task.text, task.category, task.due_date, task.priority);
        if task.text.is_empty() {
            return Err(DayplanError::EmptyText);
        }

        tracing::debug!(text = %task.text, priority = %task.priority, "add task");
        let id = self.repository.create(task).await?;
        self.resync().await?;
        Ok(id)
    }

    pub async fn toggle_task(&mut self, id: TaskId) -> Result<(), DayplanError> {
        tracing::debug!(task_id = %id, "toggle task");
        self.repository.toggle(id).await?;
        self.resync().await
    }

    /// Replace a task's text. Blank text is ignored without a store call.
    pub async fn rename_task(&mut self, id: TaskId, text: &str) -> Result<(), DayplanError> {
        let text = text.trim();
        if text.is_empty() {
            tracing::debug!(task_id = %id, "ignoring blank rename");
            return Ok(());
        }

        tracing::debug!(task_id = %id, text, "rename task");
        self.repository.rename(id, text).await?;
        self.resync().await
    }

    pub async fn delete_task(&mut self, id: TaskId) -> Result<(), DayplanError> {
        tracing::debug!(task_id = %id, "delete task");
        self.repository.delete(id).await?;
        self.resync().await
    }

    pub async fn clear_completed(&mut self) -> Result<(), DayplanError> {
        tracing::debug!("clear completed tasks");
        self.repository.clear_completed().await?;
        self.resync().await
    }

    async fn resync(&mut self) -> Result<(), DayplanError> {
        let tasks = self.repository.list_all().await?;
        tracing::debug!(count = tasks.len(), "resynced task set");
        self.tasks = tasks;
        self.rederive();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ErrorKind, Priority, StoreError};
    use crate::impls::InMemoryTaskRepository;
    use crate::ports::FixedClock;
    use async_trait::async_trait;
    use chrono::{Duration, TimeZone};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap()
    }

    fn view_model() -> (
        TaskViewModel<InMemoryTaskRepository, Arc<FixedClock>>,
        InMemoryTaskRepository,
        Arc<FixedClock>,
    ) {
        let repo = InMemoryTaskRepository::new();
        let clock = Arc::new(FixedClock::new(start()));
        (TaskViewModel::new(repo.clone(), Arc::clone(&clock)), repo, clock)
    }

    fn new_task(text: &str, due: Option<&str>, priority: Priority) -> NewTask {
        NewTask::new(text, "General", due.map(str::to_string), priority)
    }

    fn texts<R: TaskRepository, C: Clock>(vm: &TaskViewModel<R, C>) -> Vec<String> {
        vm.view().iter().map(|a| a.task.text.clone()).collect()
    }

    /// Counts every call that reaches the wrapped repository.
    struct CountingRepository {
        inner: InMemoryTaskRepository,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl TaskRepository for CountingRepository {
        async fn list_all(&self) -> Result<Vec<Task>, StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.list_all().await
        }

        async fn create(&self, task: NewTask) -> Result<TaskId, StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.create(task).await
        }

        async fn toggle(&self, id: TaskId) -> Result<(), StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.toggle(id).await
        }

        async fn rename(&self, id: TaskId, text: &str) -> Result<(), StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.rename(id, text).await
        }

        async fn delete(&self, id: TaskId) -> Result<(), StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.delete(id).await
        }

        async fn clear_completed(&self) -> Result<(), StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.clear_completed().await
        }
    }

    #[tokio::test]
    async fn add_task_resyncs_and_derives() {
        let (mut vm, _repo, _clock) = view_model();
        vm.load().await.unwrap();
        assert!(vm.view().is_empty());

        let id = vm
            .add_task(new_task("Buy milk", Some("2025-01-02"), Priority::High))
            .await
            .unwrap();

        assert_eq!(vm.view().len(), 1);
        let row = &vm.view()[0];
        assert_eq!(row.task.id, id);
        assert!(!row.task.completed);
        assert_eq!(row.countdown_label(), "Due Tomorrow");
        assert_eq!(vm.derived_at(), Some(start()));
    }

    #[tokio::test]
    async fn blank_text_is_rejected_before_the_repository() {
        let repo = Arc::new(CountingRepository {
            inner: InMemoryTaskRepository::new(),
            calls: AtomicUsize::new(0),
        });
        let mut vm = TaskViewModel::new(Arc::clone(&repo), FixedClock::new(start()));

        let err = vm
            .add_task(new_task("   ", None, Priority::Low))
            .await
            .unwrap_err();
        assert!(matches!(err, DayplanError::EmptyText));
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(repo.calls.load(Ordering::SeqCst), 0);

        // blank rename is ignored the same way
        vm.rename_task(TaskId::new(1), "  ").await.unwrap();
        assert_eq!(repo.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn every_mutation_is_followed_by_a_full_relist() {
        let repo = Arc::new(CountingRepository {
            inner: InMemoryTaskRepository::new(),
            calls: AtomicUsize::new(0),
        });
        let mut vm = TaskViewModel::new(Arc::clone(&repo), FixedClock::new(start()));

        let id = vm.add_task(new_task("a", None, Priority::Low)).await.unwrap();
        assert_eq!(repo.calls.load(Ordering::SeqCst), 2);

        vm.toggle_task(id).await.unwrap();
        vm.rename_task(id, "b").await.unwrap();
        vm.clear_completed().await.unwrap();
        assert_eq!(repo.calls.load(Ordering::SeqCst), 8);
    }

    #[tokio::test]
    async fn resync_picks_up_changes_made_elsewhere() {
        let (mut vm, repo, _clock) = view_model();
        let id = vm.add_task(new_task("mine", None, Priority::Low)).await.unwrap();

        // another session writes directly to the store
        repo.create(new_task("theirs", None, Priority::Low)).await.unwrap();
        assert_eq!(texts(&vm), vec!["mine"]);

        vm.toggle_task(id).await.unwrap();
        assert_eq!(texts(&vm), vec!["mine", "theirs"]);
    }

    #[tokio::test]
    async fn toggle_twice_restores_completed() {
        let (mut vm, _repo, _clock) = view_model();
        let id = vm.add_task(new_task("a", None, Priority::Low)).await.unwrap();

        vm.toggle_task(id).await.unwrap();
        assert!(vm.view()[0].task.completed);
        vm.toggle_task(id).await.unwrap();
        assert!(!vm.view()[0].task.completed);
    }

    #[tokio::test]
    async fn rename_changes_only_text() {
        let (mut vm, _repo, _clock) = view_model();
        let id = vm
            .add_task(NewTask::new("Old", "Work", Some("2025-02-01".into()), Priority::High))
            .await
            .unwrap();
        vm.toggle_task(id).await.unwrap();
        let before = vm.view()[0].task.clone();

        vm.rename_task(id, "  New  ").await.unwrap();

        let after = vm.view()[0].task.clone();
        assert_eq!(after.text, "New");
        assert_eq!(Task { text: before.text.clone(), ..after }, before);
    }

    #[tokio::test]
    async fn unknown_ids_are_silent_noops() {
        let (mut vm, _repo, _clock) = view_model();
        vm.add_task(new_task("a", None, Priority::Low)).await.unwrap();
        let before = vm.view().to_vec();

        let missing = TaskId::new(404);
        vm.toggle_task(missing).await.unwrap();
        vm.rename_task(missing, "x").await.unwrap();
        vm.delete_task(missing).await.unwrap();

        assert_eq!(vm.view(), before.as_slice());
    }

    #[tokio::test]
    async fn transport_failure_leaves_state_unchanged() {
        let (mut vm, repo, _clock) = view_model();
        let id = vm.add_task(new_task("a", None, Priority::Low)).await.unwrap();
        vm.set_filter_mode(FilterMode::Pending);
        let before = vm.view().to_vec();

        repo.set_offline(true);
        let err = vm.toggle_task(id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert!(vm.add_task(new_task("b", None, Priority::Low)).await.is_err());
        assert!(vm.delete_task(id).await.is_err());
        assert!(vm.clear_completed().await.is_err());

        assert_eq!(vm.view(), before.as_slice());
        assert_eq!(vm.filter_mode(), FilterMode::Pending);

        repo.set_offline(false);
        vm.load().await.unwrap();
        assert_eq!(vm.view(), before.as_slice());
    }

    #[tokio::test]
    async fn selections_rederive_without_touching_the_store() {
        let (mut vm, repo, _clock) = view_model();
        vm.add_task(new_task("Buy Milk", Some("2025-01-10"), Priority::Low))
            .await
            .unwrap();
        let done = vm
            .add_task(new_task("Pay rent", Some("2025-01-03"), Priority::High))
            .await
            .unwrap();
        vm.add_task(new_task("Call mom", None, Priority::Medium))
            .await
            .unwrap();
        vm.toggle_task(done).await.unwrap();

        // store unreachable: selections still work on the in-memory set
        repo.set_offline(true);

        vm.set_sort_mode(SortMode::Priority);
        assert_eq!(texts(&vm), vec!["Pay rent", "Call mom", "Buy Milk"]);

        vm.set_sort_mode(SortMode::DueDate);
        assert_eq!(texts(&vm), vec!["Pay rent", "Buy Milk", "Call mom"]);

        vm.set_filter_mode(FilterMode::Pending);
        assert_eq!(texts(&vm), vec!["Buy Milk", "Call mom"]);

        vm.set_search_term("MILK");
        assert_eq!(texts(&vm), vec!["Buy Milk"]);
        assert_eq!(vm.search_term(), "MILK");

        vm.set_query(ViewQuery::default());
        assert_eq!(texts(&vm), vec!["Buy Milk", "Pay rent", "Call mom"]);
    }

    #[tokio::test]
    async fn rederive_uses_the_current_clock() {
        let (mut vm, _repo, clock) = view_model();
        vm.add_task(new_task("a", Some("2025-01-03"), Priority::Low))
            .await
            .unwrap();
        assert_eq!(vm.view()[0].countdown_label(), "Due in 2 days");
        assert!(!vm.view()[0].is_overdue);

        clock.advance(Duration::days(3));
        // view is a snapshot until something triggers a derivation
        assert_eq!(vm.view()[0].countdown_label(), "Due in 2 days");

        vm.rederive();
        assert_eq!(vm.view()[0].countdown_label(), "Overdue by 1 days");
        assert!(vm.view()[0].is_overdue);
    }
}
