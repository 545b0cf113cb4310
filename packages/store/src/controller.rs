//! # Session/list controller
//!
//! [`NotesController`] orchestrates every user action against the remote
//! collaborators and the local [`NotesState`]:
//!
//! | Action | Local state | Remote call | On failure |
//! |--------|-------------|-------------|------------|
//! | [`sign_in`](NotesController::sign_in) | session set, then load | `authenticate` | cancelled: ignored; otherwise logged |
//! | [`sign_out`](NotesController::sign_out) | session and list cleared | `sign_out` | logged, state kept |
//! | [`load_notes`](NotesController::load_notes) | list replaced, `loading` around the call | `query_by_owner` | logged, list kept |
//! | [`create`](NotesController::create) | prepended after the write | `insert` | logged |
//! | [`delete`](NotesController::delete) | removed before the write | `remove` | logged, resync |
//! | [`modify`](NotesController::modify) | patched before the write | `update` | logged, resync |
//! | [`filter`](NotesController::filter) | read only | none | n/a |
//!
//! State is only touched inside short closures, never across an `.await`, so the
//! UI can keep rendering while a call is in flight.

use chrono::{Local, NaiveDateTime};

use crate::config::KeeperConfig;
use crate::error::AuthError;
use crate::models::{format_timestamp, sort_by_last_modified, Note, NoteDocument, NotePatch, Session};
use crate::remote::{IdentityProvider, NoteStore};
use crate::state::{NotesState, StateHandle};

pub struct NotesController<S, I, H> {
    store: S,
    identity: I,
    state: H,
    timestamp_format: String,
    clock: Box<dyn Fn() -> NaiveDateTime>,
}

impl<S, I, H> NotesController<S, I, H>
where
    S: NoteStore,
    I: IdentityProvider,
    H: StateHandle,
{
    pub fn new(store: S, identity: I, state: H, config: &KeeperConfig) -> Self {
        Self {
            store,
            identity,
            state,
            timestamp_format: config.display.checked_format().to_string(),
            clock: Box::new(|| Local::now().naive_local()),
        }
    }

    /// Replace the wall clock used for note timestamps.
    pub fn with_clock(mut self, clock: impl Fn() -> NaiveDateTime + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn state(&self) -> &H {
        &self.state
    }

    pub fn identity(&self) -> &I {
        &self.identity
    }

    fn now(&self) -> String {
        format_timestamp((self.clock)(), &self.timestamp_format)
    }

    /// Start the interactive sign-in flow.
    pub async fn sign_in(&self) {
        match self.identity.authenticate().await {
            Ok(Some(session)) => self.on_session_change(Some(session)).await,
            Ok(None) => tracing::debug!("sign-in continues outside the app"),
            Err(AuthError::Cancelled) => {}
            Err(e) => tracing::error!("Sign-in error: {e}"),
        }
    }

    pub async fn sign_out(&self) {
        match self.identity.sign_out().await {
            Ok(()) => self.on_session_change(None).await,
            Err(e) => tracing::error!("Sign-out error: {e}"),
        }
    }

    /// React to the identity provider reporting a new session state.
    ///
    /// A signed-in session (re)loads that user's notes; `None` clears the list.
    pub async fn on_session_change(&self, session: Option<Session>) {
        let user_id = session.as_ref().map(|s| s.user_id.clone());
        self.state.update(|state| {
            state.session = session;
            if user_id.is_none() {
                state.notes.clear();
                state.loading = false;
            }
        });
        if let Some(user_id) = user_id {
            self.load_notes(&user_id).await;
        }
    }

    /// Fetch every note owned by `user_id` and replace the local list.
    pub async fn load_notes(&self, user_id: &str) {
        self.state.update(|state| state.loading = true);
        match self.store.query_by_owner(user_id).await {
            Ok(docs) => {
                let mut notes: Vec<Note> = docs.into_iter().map(Note::from).collect();
                sort_by_last_modified(&mut notes, &self.timestamp_format);
                tracing::debug!(count = notes.len(), "loaded notes");
                self.state.update(|state| state.replace(notes));
            }
            Err(e) => tracing::error!("Load error: {e}"),
        }
        self.state.update(|state| state.loading = false);
    }

    async fn resync(&self) {
        let user_id = self.state.read(|state| state.user_id().map(str::to_string));
        if let Some(user_id) = user_id {
            self.load_notes(&user_id).await;
        }
    }

    /// Write a new note, then put it at the head of the list.
    ///
    /// Returns `true` once the note is stored.
    pub async fn create(&self, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        let Some(user_id) = self.state.read(|state| state.user_id().map(str::to_string)) else {
            return false;
        };

        self.state.update(|state| state.creating = true);
        let now = self.now();
        let doc = NoteDocument {
            content: text.to_string(),
            date_created: now.clone(),
            last_modified: now,
            user_id,
        };

        let created = match self.store.insert(&doc).await {
            Ok(id) => {
                self.state
                    .update(|state| state.prepend(Note::from_document(id, doc)));
                true
            }
            Err(e) => {
                tracing::error!("Create error: {e}");
                false
            }
        };
        self.state.update(|state| state.creating = false);
        created
    }

    /// Remove a note locally, then remotely. A failed remote delete triggers a resync.
    pub async fn delete(&self, id: &str) {
        self.state.update(|state| state.remove(id));
        if let Err(e) = self.store.remove(id).await {
            tracing::error!("Delete error: {e}");
            self.resync().await;
        }
    }

    /// Patch a note locally, then remotely. A failed remote update triggers a resync.
    pub async fn modify(&self, id: &str, content: &str) {
        let text = content.trim();
        if text.is_empty() {
            return;
        }
        let patch = NotePatch {
            content: text.to_string(),
            last_modified: self.now(),
        };
        self.state
            .update(|state| state.patch(id, &patch.content, &patch.last_modified));

        if let Err(e) = self.store.update(id, &patch).await {
            tracing::error!("Update error: {e}");
            self.resync().await;
        }
    }

    /// Notes whose content contains `query`, ignoring case.
    pub fn filter(&self, query: &str) -> Vec<Note> {
        self.state.read(|state: &NotesState| state.filtered(query))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use chrono::{Duration, NaiveDate};

    use super::*;
    use crate::memory::{MemoryIdentity, MemoryStore, Operation};
    use crate::state::SharedState;
    use crate::StoreError;

    type TestController = NotesController<MemoryStore, MemoryIdentity, SharedState>;

    fn start() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 14)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    /// Controller whose clock advances one minute per reading.
    fn controller(store: &MemoryStore) -> TestController {
        let ticks = Rc::new(Cell::new(0i64));
        let identity = MemoryIdentity::new(Session::new("u1", "User One"));
        NotesController::new(
            store.clone(),
            identity,
            Rc::new(RefCell::new(NotesState::default())),
            &KeeperConfig::default(),
        )
        .with_clock(move || {
            let n = ticks.get();
            ticks.set(n + 1);
            start() + Duration::minutes(n)
        })
    }

    /// Store that records the local list at the moment each write reaches it.
    #[derive(Clone)]
    struct InFlightStore {
        inner: MemoryStore,
        state: SharedState,
        seen: Rc<RefCell<Vec<Vec<Note>>>>,
    }

    impl InFlightStore {
        fn capture(&self) {
            let notes = self.state.read(|s| s.notes.clone());
            self.seen.borrow_mut().push(notes);
        }
    }

    impl NoteStore for InFlightStore {
        async fn query_by_owner(
            &self,
            owner_id: &str,
        ) -> Result<Vec<crate::DocumentSnapshot>, StoreError> {
            self.inner.query_by_owner(owner_id).await
        }

        async fn insert(&self, doc: &NoteDocument) -> Result<String, StoreError> {
            self.inner.insert(doc).await
        }

        async fn update(&self, id: &str, patch: &NotePatch) -> Result<(), StoreError> {
            self.capture();
            self.inner.update(id, patch).await
        }

        async fn remove(&self, id: &str) -> Result<(), StoreError> {
            self.capture();
            self.inner.remove(id).await
        }
    }

    fn in_flight_controller(
        store: &MemoryStore,
    ) -> NotesController<InFlightStore, MemoryIdentity, SharedState> {
        let state: SharedState = Rc::new(RefCell::new(NotesState::default()));
        let observed = InFlightStore {
            inner: store.clone(),
            state: state.clone(),
            seen: Rc::new(RefCell::new(Vec::new())),
        };
        NotesController::new(
            observed,
            MemoryIdentity::new(Session::new("u1", "User One")),
            state,
            &KeeperConfig::default(),
        )
        .with_clock(start)
    }

    fn notes(c: &TestController) -> Vec<Note> {
        c.state().read(|s| s.notes.clone())
    }

    fn seeded_doc(owner: &str, content: &str, minute: i64) -> NoteDocument {
        let at = format_timestamp(
            start() - Duration::minutes(minute),
            crate::config::DEFAULT_TIMESTAMP_FORMAT,
        );
        NoteDocument {
            content: content.to_string(),
            date_created: at.clone(),
            last_modified: at,
            user_id: owner.to_string(),
        }
    }

    #[tokio::test]
    async fn test_scenario_create_modify_delete() {
        let store = MemoryStore::new();
        let c = controller(&store);

        c.sign_in().await;
        assert!(notes(&c).is_empty());

        assert!(c.create("Buy milk").await);
        let list = notes(&c);
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].content, "Buy milk");
        assert_eq!(list[0].date_created, list[0].last_modified);
        let id = list[0].id.clone();
        let created_at = list[0].last_modified.clone();

        c.modify(&id, "Buy milk and eggs").await;
        let list = notes(&c);
        assert_eq!(list[0].content, "Buy milk and eggs");
        assert_ne!(list[0].last_modified, created_at);
        assert_eq!(list[0].date_created, created_at);
        assert_eq!(store.documents()[0].data.content, "Buy milk and eggs");

        c.delete(&id).await;
        assert!(notes(&c).is_empty());
        assert!(store.documents().is_empty());
    }

    #[tokio::test]
    async fn test_load_sorts_newest_first_and_scopes_to_owner() {
        let store = MemoryStore::new();
        store.seed(seeded_doc("u1", "older", 30));
        store.seed(seeded_doc("someone-else", "not mine", 0));
        store.seed(seeded_doc("u1", "newer", 5));
        let c = controller(&store);

        c.sign_in().await;
        let contents: Vec<_> = notes(&c).into_iter().map(|n| n.content).collect();
        assert_eq!(contents, ["newer", "older"]);
        assert!(!c.state().read(|s| s.loading));
    }

    #[tokio::test]
    async fn test_failed_load_keeps_stale_list() {
        let store = MemoryStore::new();
        store.seed(seeded_doc("u1", "first", 1));
        let c = controller(&store);
        c.sign_in().await;
        assert_eq!(notes(&c).len(), 1);

        store.seed(seeded_doc("u1", "second", 0));
        store.fail(Operation::Query);
        c.load_notes("u1").await;
        assert_eq!(notes(&c).len(), 1);
        assert!(!c.state().read(|s| s.loading));
    }

    #[tokio::test]
    async fn test_create_blank_is_noop() {
        let store = MemoryStore::new();
        let c = controller(&store);
        c.sign_in().await;
        let calls_before = store.calls().len();

        assert!(!c.create("").await);
        assert!(!c.create("   ").await);
        assert!(notes(&c).is_empty());
        assert_eq!(store.calls().len(), calls_before);
    }

    #[tokio::test]
    async fn test_create_without_session_is_noop() {
        let store = MemoryStore::new();
        let c = controller(&store);
        assert!(!c.create("orphan").await);
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn test_create_trims_and_prepends() {
        let store = MemoryStore::new();
        store.seed(seeded_doc("u1", "existing", 10));
        let c = controller(&store);
        c.sign_in().await;

        assert!(c.create("  fresh note \n").await);
        let list = notes(&c);
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].content, "fresh note");
        assert_eq!(list[0].owner_id, "u1");
        assert!(!c.state().read(|s| s.creating));
    }

    #[tokio::test]
    async fn test_failed_create_leaves_list() {
        let store = MemoryStore::new();
        let c = controller(&store);
        c.sign_in().await;
        store.fail(Operation::Insert);

        assert!(!c.create("lost").await);
        assert!(notes(&c).is_empty());
        assert!(!c.state().read(|s| s.creating));
    }

    #[tokio::test]
    async fn test_delete_failure_resyncs() {
        let store = MemoryStore::new();
        let id = store.seed(seeded_doc("u1", "survivor", 1));
        let c = controller(&store);
        c.sign_in().await;

        store.fail(Operation::Remove);
        c.delete(&id).await;

        assert_eq!(
            store.calls(),
            [Operation::Query, Operation::Remove, Operation::Query]
        );
        let list = notes(&c);
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].id, id);
    }

    #[tokio::test]
    async fn test_modify_blank_is_noop() {
        let store = MemoryStore::new();
        let id = store.seed(seeded_doc("u1", "keep", 1));
        let c = controller(&store);
        c.sign_in().await;
        let before = notes(&c);

        c.modify(&id, "").await;
        c.modify(&id, "   ").await;
        assert_eq!(notes(&c), before);
        assert!(!store.calls().contains(&Operation::Update));
    }

    #[tokio::test]
    async fn test_modify_failure_resyncs_to_remote_truth() {
        let store = MemoryStore::new();
        let id = store.seed(seeded_doc("u1", "original", 1));
        let c = controller(&store);
        c.sign_in().await;

        store.fail(Operation::Update);
        c.modify(&id, "edited").await;

        assert_eq!(notes(&c)[0].content, "original");
        assert_eq!(store.calls().last(), Some(&Operation::Query));
    }

    #[tokio::test]
    async fn test_modify_of_vanished_note_resyncs() {
        let store = MemoryStore::new();
        let id = store.seed(seeded_doc("u1", "gone soon", 1));
        let c = controller(&store);
        c.sign_in().await;

        store.remove(&id).await.unwrap();
        c.modify(&id, "too late").await;
        assert!(notes(&c).is_empty());
        assert_eq!(
            store.update(&id, &NotePatch {
                content: String::new(),
                last_modified: String::new(),
            })
            .await,
            Err(StoreError::NotFound(id.clone()))
        );
    }

    #[tokio::test]
    async fn test_delete_removes_locally_before_remote_call() {
        let store = MemoryStore::new();
        let id = store.seed(seeded_doc("u1", "doomed", 2));
        store.seed(seeded_doc("u1", "kept", 1));
        let c = in_flight_controller(&store);
        c.sign_in().await;

        store.fail(Operation::Remove);
        c.delete(&id).await;

        let seen = c.store.seen.borrow();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].iter().all(|n| n.id != id));
        assert_eq!(seen[0].len(), 1);
    }

    #[tokio::test]
    async fn test_modify_patches_locally_before_remote_call() {
        let store = MemoryStore::new();
        let id = store.seed(seeded_doc("u1", "draft", 1));
        let c = in_flight_controller(&store);
        c.sign_in().await;

        store.fail(Operation::Update);
        c.modify(&id, "  final  ").await;

        let seen = c.store.seen.borrow();
        assert_eq!(seen.len(), 1);
        let during = &seen[0][0];
        assert_eq!(during.id, id);
        assert_eq!(during.content, "final");
        assert_eq!(
            during.last_modified,
            format_timestamp(start(), crate::config::DEFAULT_TIMESTAMP_FORMAT)
        );
        // the failed write was rolled back by the resync
        assert_eq!(c.state().read(|s| s.notes[0].content.clone()), "draft");
    }

    #[tokio::test]
    async fn test_unusable_timestamp_format_does_not_break_create() {
        let store = MemoryStore::new();
        let mut config = KeeperConfig::default();
        config.display.timestamp_format = "%Q %Y".to_string();
        let c = NotesController::new(
            store.clone(),
            MemoryIdentity::new(Session::new("u1", "User One")),
            Rc::new(RefCell::new(NotesState::default())),
            &config,
        )
        .with_clock(start);
        c.sign_in().await;

        assert!(c.create("hello").await);
        assert_eq!(
            notes(&c)[0].last_modified,
            format_timestamp(start(), crate::config::DEFAULT_TIMESTAMP_FORMAT)
        );
    }

    #[tokio::test]
    async fn test_filter_leaves_list_untouched() {
        let store = MemoryStore::new();
        store.seed(seeded_doc("u1", "Buy MILK", 2));
        store.seed(seeded_doc("u1", "walk dog", 1));
        let c = controller(&store);
        c.sign_in().await;
        let calls = store.calls().len();

        assert_eq!(c.filter("").len(), 2);
        let hits = c.filter("milk");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].content, "Buy MILK");
        assert_eq!(notes(&c).len(), 2);
        assert_eq!(store.calls().len(), calls);
    }

    #[tokio::test]
    async fn test_cancelled_sign_in_is_silent() {
        let store = MemoryStore::new();
        let c = controller(&store);
        c.identity().fail_next_sign_in(AuthError::Cancelled);

        c.sign_in().await;
        assert_eq!(c.state().read(|s| s.session.clone()), None);
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn test_sign_out_clears_list() {
        let store = MemoryStore::new();
        store.seed(seeded_doc("u1", "private", 1));
        let c = controller(&store);
        c.sign_in().await;
        assert_eq!(notes(&c).len(), 1);

        c.sign_out().await;
        assert!(notes(&c).is_empty());
        assert_eq!(c.state().read(|s| s.session.clone()), None);
        assert_eq!(c.identity().current_user().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_external_expiry_clears_list() {
        let store = MemoryStore::new();
        store.seed(seeded_doc("u1", "private", 1));
        let c = controller(&store);
        c.sign_in().await;

        c.identity().expire();
        let reported = c.identity().current_user().await.unwrap();
        c.on_session_change(reported).await;
        assert!(notes(&c).is_empty());
    }
}
