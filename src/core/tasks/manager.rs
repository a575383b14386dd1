use std::{
    sync::{
        atomic::{
            AtomicBool,
            Ordering,
        },
        mpsc,
        Arc,
        Mutex,
    },
    thread,
    time::Instant,
};

use chrono::Utc;
use tokio::runtime::Runtime;
use tracing::{
    debug,
    warn,
};

use super::{
    handle::TaskHandle,
    queue::{
        ProgressCommand,
        ProgressQueue,
    },
    types::StateUpdate,
};
use crate::{
    api::{
        types::{
            GenerateAiPayload,
            GenerateQuizPayload,
            ListPayload,
            ProgressPayload,
            QuizSubmission,
            SubmittedAnswer,
            WordPayload,
        },
        ApiClient,
    },
    core::{
        config::ClientConfig,
        models::MasteryStatus,
    },
    state::{
        details::DetailsAction,
        forms::{
            AiForm,
            ListForm,
            WordForm,
        },
        vocabulary::{
            page_has_more,
            VocabAction,
        },
    },
};

/// Dispatch guard for cancellable work: once the owning view cancelled the
/// task, nothing more reaches the reducer.
fn send_unless_cancelled(
    sender: &mpsc::Sender<StateUpdate>,
    cancel: &Arc<AtomicBool>,
    update: StateUpdate,
) -> bool {
    if cancel.load(Ordering::Relaxed) {
        return false;
    }
    sender.send(update).is_ok()
}

fn refetch_overview(
    runtime: &Runtime,
    client: &ApiClient,
    sender: &mpsc::Sender<StateUpdate>,
    page: usize,
    limit: usize,
) {
    let _ = sender.send(StateUpdate::Vocab(VocabAction::FetchStart));
    match runtime.block_on(client.fetch_lists(page, limit)) {
        Ok(lists) => {
            let has_more = page_has_more(lists.len(), page, limit);
            let _ = sender.send(StateUpdate::Vocab(VocabAction::FetchSuccess {
                lists,
                has_more,
                page,
            }));
        }
        Err(e) => {
            let _ = sender.send(StateUpdate::Vocab(VocabAction::FetchError(e.user_message())));
        }
    }
}

fn refetch_detail(
    runtime: &Runtime,
    client: &ApiClient,
    sender: &mpsc::Sender<StateUpdate>,
    list_id: &str,
) {
    let _ = sender.send(StateUpdate::Details(DetailsAction::FetchStart));
    match runtime.block_on(client.fetch_list(list_id)) {
        Ok(list) => {
            let _ = sender.send(StateUpdate::Details(DetailsAction::FetchSuccess(list)));
        }
        Err(e) => {
            let _ = sender.send(StateUpdate::Details(DetailsAction::FetchError(e.user_message())));
        }
    }
}

/// Bridges the REST client to the reducers: every operation runs on the
/// shared runtime in a background thread and reports back through the
/// update channel, which the host drains once per frame.
pub struct TaskManager {
    runtime: Arc<Runtime>,
    receiver: mpsc::Receiver<StateUpdate>,
    sender: mpsc::Sender<StateUpdate>,
    client: Arc<ApiClient>,
    page_size: usize,
    fetch_handle: Mutex<Option<TaskHandle>>,
    progress_queue: Arc<ProgressQueue>,
}

impl TaskManager {
    pub fn new(client: ApiClient, config: &ClientConfig) -> Self {
        let runtime = Arc::new(Runtime::new().expect("Failed to create TaskManager runtime"));
        let (sender, receiver) = mpsc::channel();

        Self {
            runtime,
            receiver,
            sender,
            client: Arc::new(client),
            page_size: config.page_size,
            fetch_handle: Mutex::new(None),
            progress_queue: Arc::new(ProgressQueue::new()),
        }
    }

    pub fn poll_updates(&mut self) -> Vec<StateUpdate> {
        let mut updates = Vec::new();

        while let Ok(update) = self.receiver.try_recv() {
            updates.push(update);
        }

        updates
    }

    fn task_context(&self) -> (mpsc::Sender<StateUpdate>, Arc<Runtime>) {
        (self.sender.clone(), self.runtime.clone())
    }

    /// Prime the session: fetches the CSRF token (and its cookie) and
    /// reports whether the backend is reachable.
    pub fn check_connection(&self) {
        let (sender, runtime) = self.task_context();
        let client = self.client.clone();

        thread::spawn(move || {
            let connected = runtime.block_on(client.fetch_csrf_token()).is_ok();
            let _ = sender.send(StateUpdate::Connection(connected));
        });
    }

    /// Paginated overview fetch. Starting a new fetch cancels the previous
    /// in-flight one; a cancelled fetch dispatches nothing at all.
    pub fn fetch_lists(&self, page: usize) {
        let (sender, runtime) = self.task_context();
        let client = self.client.clone();
        let limit = self.page_size;

        // The previous in-flight fetch dies before the new one starts, so a
        // late response cannot overwrite newer state.
        self.cancel_fetch();

        let cancel = Arc::new(AtomicBool::new(false));
        let token = cancel.clone();

        let join = thread::spawn(move || {
            let started = Instant::now();
            if !send_unless_cancelled(&sender, &token, StateUpdate::Vocab(VocabAction::FetchStart))
            {
                return;
            }

            match runtime.block_on(client.fetch_lists(page, limit)) {
                Ok(lists) => {
                    debug!(
                        "overview fetch page {}: {} lists ({:.2}s)",
                        page,
                        lists.len(),
                        started.elapsed().as_secs_f32()
                    );
                    let has_more = page_has_more(lists.len(), page, limit);
                    send_unless_cancelled(
                        &sender,
                        &token,
                        StateUpdate::Vocab(VocabAction::FetchSuccess { lists, has_more, page }),
                    );
                }
                Err(e) => {
                    warn!("overview fetch failed: {}", e);
                    send_unless_cancelled(
                        &sender,
                        &token,
                        StateUpdate::Vocab(VocabAction::FetchError(e.user_message())),
                    );
                }
            }
        });

        *self.fetch_handle.lock().expect("fetch handle lock") =
            Some(TaskHandle::new(cancel, join));
    }

    /// Cancel the in-flight overview fetch, if any. Called when the owning
    /// view unmounts.
    pub fn cancel_fetch(&self) {
        if let Some(handle) = self.fetch_handle.lock().expect("fetch handle lock").take() {
            handle.cancel();
        }
    }

    pub fn create_list(&self, form: ListForm) {
        let (sender, runtime) = self.task_context();
        let client = self.client.clone();
        let limit = self.page_size;
        let payload = ListPayload::from(&form);

        thread::spawn(move || {
            let _ = sender.send(StateUpdate::Vocab(VocabAction::SaveStart));

            match runtime.block_on(client.create_list(&payload)) {
                Ok(list) => {
                    debug!("created vocabulary list {}", list.id);
                    let _ = sender.send(StateUpdate::Vocab(VocabAction::CloseListModal));
                    let _ = sender.send(StateUpdate::Vocab(VocabAction::ResetListForm));
                    refetch_overview(&runtime, &client, &sender, 1, limit);
                }
                Err(e) => {
                    let _ = sender.send(StateUpdate::Alert(e.user_message()));
                }
            }

            let _ = sender.send(StateUpdate::Vocab(VocabAction::SaveEnd));
        });
    }

    pub fn add_word(&self, list_id: String, form: WordForm) {
        let (sender, runtime) = self.task_context();
        let client = self.client.clone();
        let payload = WordPayload::from(&form);

        thread::spawn(move || {
            let _ = sender.send(StateUpdate::Vocab(VocabAction::SaveStart));

            match runtime.block_on(client.create_word(&list_id, &payload)) {
                Ok(word) => {
                    let _ = sender
                        .send(StateUpdate::Vocab(VocabAction::AddWordSuccess { list_id, word }));
                    let _ = sender.send(StateUpdate::Vocab(VocabAction::CloseWordModal));
                    let _ = sender.send(StateUpdate::Vocab(VocabAction::ResetWordForm));
                }
                Err(e) => {
                    let _ = sender.send(StateUpdate::Alert(e.user_message()));
                }
            }

            let _ = sender.send(StateUpdate::Vocab(VocabAction::SaveEnd));
        });
    }

    pub fn generate_ai_list(&self, form: AiForm) {
        let (sender, runtime) = self.task_context();
        let client = self.client.clone();
        let limit = self.page_size;
        let payload = GenerateAiPayload::from(&form);

        thread::spawn(move || {
            let _ = sender.send(StateUpdate::Vocab(VocabAction::AiStart));

            match runtime.block_on(client.generate_ai_list(&payload)) {
                Ok(list) => {
                    debug!("AI generation produced list {} ({} words)", list.id, list.word_count());
                    let _ = sender.send(StateUpdate::Vocab(VocabAction::CloseAiModal));
                    let _ = sender.send(StateUpdate::Vocab(VocabAction::ResetAiForm));
                    refetch_overview(&runtime, &client, &sender, 1, limit);
                }
                Err(e) => {
                    let _ = sender.send(StateUpdate::Alert(e.user_message()));
                }
            }

            let _ = sender.send(StateUpdate::Vocab(VocabAction::AiEnd));
        });
    }

    /// Optimistic mastery update. The reducer action goes out synchronously,
    /// before any network activity; persistence rides the command queue. On
    /// delivery failure the user gets an alert and one corrective refetch of
    /// the current page, never a targeted rollback.
    pub fn update_word_progress(
        &self,
        word_id: String,
        status: MasteryStatus,
        list_id: Option<String>,
        page: usize,
    ) {
        let mastery = status.optimistic_mastery();
        let _ = self.sender.send(StateUpdate::Vocab(VocabAction::UpdateWordProgress {
            word_id: word_id.clone(),
            status,
            mastery,
            now: Utc::now(),
        }));

        self.progress_queue.enqueue(ProgressCommand { word_id, status, list_id });
        self.flush_progress(page);
    }

    /// Deliver pending progress commands. Stops at the first failure: the
    /// failed command is re-enqueued (unless superseded) and the remainder
    /// stays queued for the next flush.
    pub fn flush_progress(&self, page: usize) {
        let (sender, runtime) = self.task_context();
        let client = self.client.clone();
        let queue = self.progress_queue.clone();
        let limit = self.page_size;

        thread::spawn(move || {
            for command in queue.take_pending() {
                let payload = ProgressPayload {
                    status: command.status,
                    list_id: command.list_id.clone(),
                };

                match runtime.block_on(client.update_word_progress(&command.word_id, &payload)) {
                    Ok(()) => {
                        debug!(
                            "persisted progress {} -> {}",
                            command.word_id,
                            command.status.as_str()
                        );
                    }
                    Err(e) => {
                        warn!("progress persistence failed for {}: {}", command.word_id, e);
                        queue.requeue(command);
                        let _ = sender.send(StateUpdate::Alert(e.user_message()));
                        refetch_overview(&runtime, &client, &sender, page, limit);
                        break;
                    }
                }
            }
        });
    }

    pub fn fetch_list_detail(&self, list_id: String) {
        let (sender, runtime) = self.task_context();
        let client = self.client.clone();

        thread::spawn(move || {
            refetch_detail(&runtime, &client, &sender, &list_id);
        });
    }

    pub fn update_list(&self, list_id: String, form: ListForm) {
        let (sender, runtime) = self.task_context();
        let client = self.client.clone();
        let payload = ListPayload::from(&form);

        thread::spawn(move || {
            let _ = sender.send(StateUpdate::Details(DetailsAction::SaveStart));

            match runtime.block_on(client.update_list(&list_id, &payload)) {
                Ok(_) => {
                    refetch_detail(&runtime, &client, &sender, &list_id);
                    let _ = sender.send(StateUpdate::Details(DetailsAction::CloseEditList));
                }
                Err(e) => {
                    let _ = sender.send(StateUpdate::Alert(e.user_message()));
                }
            }

            let _ = sender.send(StateUpdate::Details(DetailsAction::SaveEnd));
        });
    }

    pub fn delete_list(&self, list_id: String) {
        let (sender, runtime) = self.task_context();
        let client = self.client.clone();

        thread::spawn(move || {
            let _ = sender.send(StateUpdate::Details(DetailsAction::SaveStart));

            match runtime.block_on(client.delete_list(&list_id)) {
                Ok(()) => {
                    let _ = sender.send(StateUpdate::Details(DetailsAction::ListDeleted));
                    let _ = sender.send(StateUpdate::ListDeleted { list_id });
                }
                Err(e) => {
                    let _ = sender.send(StateUpdate::Alert(e.user_message()));
                }
            }

            let _ = sender.send(StateUpdate::Details(DetailsAction::SaveEnd));
        });
    }

    pub fn update_word(&self, list_id: String, word_id: String, form: WordForm) {
        let (sender, runtime) = self.task_context();
        let client = self.client.clone();
        let payload = WordPayload::from(&form);

        thread::spawn(move || {
            let _ = sender.send(StateUpdate::Details(DetailsAction::SaveStart));

            match runtime.block_on(client.update_word(&list_id, &word_id, &payload)) {
                Ok(_) => {
                    refetch_detail(&runtime, &client, &sender, &list_id);
                    let _ = sender.send(StateUpdate::Details(DetailsAction::CloseEditWord));
                }
                Err(e) => {
                    let _ = sender.send(StateUpdate::Alert(e.user_message()));
                }
            }

            let _ = sender.send(StateUpdate::Details(DetailsAction::SaveEnd));
        });
    }

    pub fn delete_word(&self, list_id: String, word_id: String) {
        let (sender, runtime) = self.task_context();
        let client = self.client.clone();

        thread::spawn(move || {
            let _ = sender.send(StateUpdate::Details(DetailsAction::SaveStart));

            match runtime.block_on(client.delete_word(&list_id, &word_id)) {
                Ok(()) => {
                    refetch_detail(&runtime, &client, &sender, &list_id);
                    let _ = sender.send(StateUpdate::Details(DetailsAction::CancelDelete));
                }
                Err(e) => {
                    let _ = sender.send(StateUpdate::Alert(e.user_message()));
                }
            }

            let _ = sender.send(StateUpdate::Details(DetailsAction::SaveEnd));
        });
    }

    pub fn fetch_quizzes(&self) {
        let (sender, runtime) = self.task_context();
        let client = self.client.clone();

        thread::spawn(move || {
            let result =
                runtime.block_on(client.fetch_quizzes()).map_err(|e| e.user_message());
            let _ = sender.send(StateUpdate::Quizzes(result));
        });
    }

    pub fn generate_quiz(&self, payload: GenerateQuizPayload) {
        let (sender, runtime) = self.task_context();
        let client = self.client.clone();

        thread::spawn(move || {
            let result =
                runtime.block_on(client.generate_quiz(&payload)).map_err(|e| e.user_message());
            let _ = sender.send(StateUpdate::QuizGenerated(result));
        });
    }

    pub fn fetch_quiz(&self, quiz_id: String) {
        let (sender, runtime) = self.task_context();
        let client = self.client.clone();

        thread::spawn(move || {
            let result =
                runtime.block_on(client.fetch_quiz(&quiz_id)).map_err(|e| e.user_message());
            let _ = sender.send(StateUpdate::QuizLoaded(result));
        });
    }

    /// Submit the full answer set in one request. The returned attempt is
    /// read-only display data; no reducer models quiz state.
    pub fn submit_quiz(&self, quiz_id: String, answers: Vec<SubmittedAnswer>) {
        let (sender, runtime) = self.task_context();
        let client = self.client.clone();

        thread::spawn(move || {
            let submission = QuizSubmission { answers };
            let result = runtime
                .block_on(client.submit_quiz(&quiz_id, &submission))
                .map_err(|e| e.user_message());
            let _ = sender.send(StateUpdate::QuizSubmitted(result));
        });
    }

    /// Fetch the two analytics feeds together; each reports independently.
    pub fn fetch_analytics(&self) {
        let (sender, runtime) = self.task_context();
        let client = self.client.clone();

        thread::spawn(move || {
            let (summary, recommendations) = runtime.block_on(futures::future::join(
                client.fetch_progress_summary(),
                client.fetch_recommendations(),
            ));

            let _ = sender
                .send(StateUpdate::ProgressSummary(summary.map_err(|e| e.user_message())));
            let _ = sender.send(StateUpdate::Recommendations(
                recommendations.map_err(|e| e.user_message()),
            ));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancelled_fetch_dispatches_nothing() {
        let (sender, receiver) = mpsc::channel::<StateUpdate>();
        let cancel = Arc::new(AtomicBool::new(false));

        assert!(send_unless_cancelled(
            &sender,
            &cancel,
            StateUpdate::Vocab(VocabAction::FetchStart)
        ));
        assert!(receiver.try_recv().is_ok());

        cancel.store(true, Ordering::Relaxed);
        assert!(!send_unless_cancelled(
            &sender,
            &cancel,
            StateUpdate::Vocab(VocabAction::FetchStart)
        ));
        assert!(!send_unless_cancelled(
            &sender,
            &cancel,
            StateUpdate::Vocab(VocabAction::FetchSuccess {
                lists: Vec::new(),
                has_more: false,
                page: 1
            })
        ));
        assert!(receiver.try_recv().is_err());
    }

    #[test]
    fn optimistic_update_is_dispatched_before_any_network_roundtrip() {
        let config = ClientConfig::default();
        let client = ApiClient::new(&config).unwrap();
        let mut manager = TaskManager::new(client, &config);

        manager.update_word_progress("w1".into(), MasteryStatus::Mastered, None, 1);

        // The optimistic action was sent synchronously; it is already in
        // the channel regardless of what the background flush does.
        let updates = manager.poll_updates();
        match updates.first() {
            Some(StateUpdate::Vocab(VocabAction::UpdateWordProgress {
                word_id,
                status,
                mastery,
                ..
            })) => {
                assert_eq!(word_id, "w1");
                assert_eq!(*status, MasteryStatus::Mastered);
                assert_eq!(*mastery, 1.0);
            }
            other => panic!("expected optimistic progress update, got {:?}", other.map(|u| u.update_type())),
        }
    }

    #[test]
    fn update_types_are_stable_labels() {
        assert_eq!(StateUpdate::Alert("x".into()).update_type(), "alert");
        assert_eq!(
            StateUpdate::ListDeleted { list_id: "l1".into() }.update_type(),
            "list_deleted"
        );
        assert_eq!(StateUpdate::Vocab(VocabAction::FetchStart).update_type(), "vocab");
    }
}
