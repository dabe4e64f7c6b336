use super::actions::Action;
use crate::api::models::Slide;
use crate::api::{ApiError, LmsBackend};
use crate::service::{self, Mutation, RefreshTarget};
use std::collections::HashMap;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub type TaskId = u64;

#[derive(Debug)]
pub struct BackgroundTask {
    pub id: TaskId,
    pub handle: JoinHandle<()>,
    pub description: String,
    pub started_at: std::time::Instant,
}

/// Runs backend calls off the UI loop and reports back as [`Action`]s.
///
/// Session expiry is never reported as an error here: the session has
/// already announced it and the app returns to the login screen.
pub struct TaskManager {
    backend: Arc<dyn LmsBackend>,
    tasks: HashMap<TaskId, BackgroundTask>,
    next_task_id: TaskId,
    action_sender: mpsc::UnboundedSender<Action>,
}

impl TaskManager {
    pub fn new(backend: Arc<dyn LmsBackend>) -> (Self, mpsc::UnboundedReceiver<Action>) {
        let (tx, rx) = mpsc::unbounded_channel();

        (
            Self {
                backend,
                tasks: HashMap::new(),
                next_task_id: 1,
                action_sender: tx,
            },
            rx,
        )
    }

    pub fn backend(&self) -> Arc<dyn LmsBackend> {
        Arc::clone(&self.backend)
    }

    fn spawn<F>(&mut self, description: String, future: F) -> TaskId
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let task_id = self.next_task_id;
        self.next_task_id += 1;

        log::debug!("Task {}: {}", task_id, description);

        let task = BackgroundTask {
            id: task_id,
            handle: tokio::spawn(future),
            description,
            started_at: std::time::Instant::now(),
        };

        self.tasks.insert(task_id, task);
        task_id
    }

    /// Exchange credentials, then resolve who logged in.
    pub fn spawn_login(&mut self, username: String, password: String) -> TaskId {
        let backend = self.backend();
        let sender = self.action_sender.clone();

        self.spawn(format!("Login as '{}'", username), async move {
            let result = match backend.login(&username, &password).await {
                Ok(()) => backend.current_user().await,
                Err(e) => Err(e),
            };

            let action = match result {
                Ok(user) => Action::LoginSucceeded(user),
                Err(e) => Action::LoginFailed(e.to_string()),
            };
            let _ = sender.send(action);
        })
    }

    /// Restore a persisted token and, if present, verify it.
    pub fn spawn_verify_session(&mut self) -> TaskId {
        let backend = self.backend();
        let sender = self.action_sender.clone();

        self.spawn("Verify stored session".to_string(), async move {
            match backend.restore_session().await {
                Ok(true) => match backend.current_user().await {
                    Ok(user) => {
                        let _ = sender.send(Action::LoginSucceeded(user));
                    }
                    Err(e) => log::info!("Session: stored token rejected: {}", e),
                },
                Ok(false) => log::debug!("Session: no stored token"),
                Err(e) => log::warn!("Session: could not read stored token: {}", e),
            }
        })
    }

    pub fn spawn_logout(&mut self) -> TaskId {
        let backend = self.backend();
        self.spawn("Logout".to_string(), async move {
            backend.logout().await;
        })
    }

    /// Fetch each target in order, reporting each result separately.
    pub fn spawn_load(&mut self, targets: Vec<RefreshTarget>) -> TaskId {
        let backend = self.backend();
        let sender = self.action_sender.clone();
        let description = format!("Load {} target(s)", targets.len());

        self.spawn(description, async move {
            refresh_targets(backend.as_ref(), &sender, &targets).await;
        })
    }

    /// Mutate, re-fetch `refresh` on success, then report the outcome.
    pub fn spawn_mutation(&mut self, mutation: Mutation, refresh: Vec<RefreshTarget>) -> TaskId {
        let backend = self.backend();
        let sender = self.action_sender.clone();
        let kind = mutation.kind();

        self.spawn(format!("Mutation {:?}", kind), async move {
            match service::apply(backend.as_ref(), mutation).await {
                Ok(message) => {
                    if !refresh_targets(backend.as_ref(), &sender, &refresh).await {
                        return;
                    }
                    let _ = sender.send(Action::MutationApplied { kind, message });
                }
                Err(ApiError::SessionExpired) => {}
                Err(error) => {
                    log::warn!("Mutation {:?} failed: {}", kind, error);
                    let _ = sender.send(Action::MutationFailed { kind, error });
                }
            }
        })
    }

    pub fn spawn_chat(&mut self, message: String) -> TaskId {
        let backend = self.backend();
        let sender = self.action_sender.clone();

        self.spawn("Chat message".to_string(), async move {
            match backend.chat(&message).await {
                Ok(reply) => {
                    let _ = sender.send(Action::ChatReplied(reply.response));
                }
                Err(ApiError::SessionExpired) => {}
                Err(e) => {
                    log::warn!("Chat failed: {}", e);
                    let _ = sender.send(Action::ChatFailed);
                }
            }
        })
    }

    pub fn spawn_document_download(&mut self, slide: Slide, dir: PathBuf) -> TaskId {
        let backend = self.backend();
        let sender = self.action_sender.clone();

        self.spawn(format!("Download '{}'", slide.title), async move {
            match service::download_document(backend.as_ref(), &slide, &dir).await {
                Ok(path) => {
                    let _ = sender.send(Action::DocumentReady {
                        title: slide.title.clone(),
                        path,
                    });
                }
                Err(ApiError::SessionExpired) => {}
                Err(e) => {
                    let _ = sender.send(Action::DocumentFailed(format!("Failed to open \"{}\": {}", slide.title, e)));
                }
            }
        })
    }

    /// Check for completed tasks and clean them up
    pub fn cleanup_finished_tasks(&mut self) -> Vec<TaskId> {
        let finished: Vec<TaskId> = self
            .tasks
            .iter()
            .filter(|(_, task)| task.handle.is_finished())
            .map(|(id, _)| *id)
            .collect();

        for task_id in &finished {
            if let Some(task) = self.tasks.remove(task_id) {
                log::debug!(
                    "Task {} finished after {:?}: {}",
                    task.id,
                    task.started_at.elapsed(),
                    task.description
                );
            }
        }

        finished
    }

    /// Cancel all running tasks
    pub fn cancel_all_tasks(&mut self) {
        for (_, task) in self.tasks.drain() {
            task.handle.abort();
        }
    }

    /// Get the number of active tasks
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_busy(&self) -> bool {
        self.tasks.values().any(|task| !task.handle.is_finished())
    }
}

/// Returns false when the session expired part way.
async fn refresh_targets(
    backend: &dyn LmsBackend,
    sender: &mpsc::UnboundedSender<Action>,
    targets: &[RefreshTarget],
) -> bool {
    for target in targets {
        match service::load(backend, target).await {
            Ok(refreshed) => {
                let _ = sender.send(Action::Loaded(refreshed));
            }
            Err(ApiError::SessionExpired) => return false,
            Err(e) => {
                log::warn!("Failed to load {}: {}", target.describe(), e);
                let _ = sender.send(Action::LoadFailed {
                    target: target.clone(),
                    error: e.to_string(),
                });
            }
        }
    }
    true
}

impl Drop for TaskManager {
    fn drop(&mut self) {
        // Cancel all tasks when the manager is dropped
        self.cancel_all_tasks();
    }
}
