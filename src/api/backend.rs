//! Typed access to the learning platform endpoints.
//!
//! [`LmsBackend`] is the seam the UI talks to. [`HttpBackend`] implements it
//! over a [`SessionManager`], so every call shares the session's token and
//! 401 handling.

use async_trait::async_trait;
use serde_json::Value;

use super::models::{
    ChatMessage, ChatReply, Class, ClassStats, Flashcard, FlashcardAssignment, FlashcardDraft, Id, NewClass, NewUser,
    Slide, User, UserAssignment, UserClass,
};
use super::session::{ApiRequest, FilePart, SessionManager};
use super::ApiResult;

/// Backend operations used by the dashboards.
#[async_trait]
pub trait LmsBackend: Send + Sync {
    // Session
    async fn login(&self, username: &str, password: &str) -> ApiResult<()>;

    /// Load a persisted token. Returns whether one was found.
    async fn restore_session(&self) -> ApiResult<bool>;
    async fn logout(&self);
    async fn current_user(&self) -> ApiResult<User>;

    // Classes
    async fn list_classes(&self) -> ApiResult<Vec<Class>>;
    async fn create_class(&self, class: NewClass) -> ApiResult<Class>;
    async fn class_stats(&self, class_id: Id) -> ApiResult<ClassStats>;
    async fn assign_user(&self, class_id: Id, user_id: Id) -> ApiResult<()>;
    async fn unassign_user(&self, class_id: Id, user_id: Id) -> ApiResult<()>;

    // Users
    async fn list_users(&self) -> ApiResult<Vec<User>>;
    async fn create_user(&self, user: NewUser) -> ApiResult<User>;
    async fn delete_user(&self, user_id: Id) -> ApiResult<()>;
    async fn user_classes(&self, user_id: Id) -> ApiResult<Vec<UserClass>>;

    // Flashcards
    async fn list_flashcards(&self, category: Option<&str>) -> ApiResult<Vec<Flashcard>>;
    async fn flashcard_categories(&self) -> ApiResult<Vec<String>>;
    async fn class_flashcards(&self, class_id: Id) -> ApiResult<Vec<Flashcard>>;
    async fn create_flashcard(&self, draft: FlashcardDraft) -> ApiResult<Flashcard>;
    async fn update_flashcard(&self, flashcard_id: Id, draft: FlashcardDraft) -> ApiResult<Flashcard>;
    async fn delete_flashcard(&self, flashcard_id: Id) -> ApiResult<()>;

    /// Replace the set of classes a flashcard is assigned to.
    async fn assign_flashcard(&self, flashcard_id: Id, class_ids: Vec<Id>) -> ApiResult<()>;
    async fn unassign_flashcard(&self, flashcard_id: Id, class_id: Id) -> ApiResult<()>;
    async fn bulk_upload_flashcards(&self, file: FilePart) -> ApiResult<Vec<Flashcard>>;

    // Documents
    async fn list_slides(&self, class_id: Id) -> ApiResult<Vec<Slide>>;
    async fn upload_slide(&self, class_id: Id, title: &str, file: FilePart) -> ApiResult<Slide>;
    async fn download_slide(&self, slide_id: Id) -> ApiResult<Vec<u8>>;
    async fn delete_slide(&self, slide_id: Id) -> ApiResult<()>;

    // Assistant
    async fn chat(&self, message: &str) -> ApiResult<ChatReply>;
}

/// HTTP implementation of [`LmsBackend`].
#[derive(Clone)]
pub struct HttpBackend {
    session: SessionManager,
}

impl HttpBackend {
    pub fn new(session: SessionManager) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    // Mutation endpoints answer with a status message we don't need
    async fn call(&self, request: ApiRequest) -> ApiResult<()> {
        self.session.authenticated_request::<Value>(request).await.map(|_| ())
    }
}

#[async_trait]
impl LmsBackend for HttpBackend {
    async fn login(&self, username: &str, password: &str) -> ApiResult<()> {
        self.session.login(username, password).await.map(|_| ())
    }

    async fn restore_session(&self) -> ApiResult<bool> {
        self.session.restore().await
    }

    async fn logout(&self) {
        self.session.logout().await
    }

    async fn current_user(&self) -> ApiResult<User> {
        self.session.current_user().await
    }

    async fn list_classes(&self) -> ApiResult<Vec<Class>> {
        self.session.authenticated_request(ApiRequest::get("/classes/")).await
    }

    async fn create_class(&self, class: NewClass) -> ApiResult<Class> {
        self.session
            .authenticated_request(ApiRequest::post("/classes/").json(&class)?)
            .await
    }

    async fn class_stats(&self, class_id: Id) -> ApiResult<ClassStats> {
        self.session
            .authenticated_request(ApiRequest::get(format!("/classes/{}/stats", class_id)))
            .await
    }

    async fn assign_user(&self, class_id: Id, user_id: Id) -> ApiResult<()> {
        self.call(ApiRequest::post(format!("/classes/{}/assign-user", class_id)).json(&UserAssignment { user_id })?)
            .await
    }

    async fn unassign_user(&self, class_id: Id, user_id: Id) -> ApiResult<()> {
        self.call(ApiRequest::post(format!("/classes/{}/unassign-user", class_id)).json(&UserAssignment { user_id })?)
            .await
    }

    async fn list_users(&self) -> ApiResult<Vec<User>> {
        self.session.authenticated_request(ApiRequest::get("/auth/users")).await
    }

    async fn create_user(&self, user: NewUser) -> ApiResult<User> {
        self.session
            .authenticated_request(ApiRequest::post("/auth/register").json(&user)?)
            .await
    }

    async fn delete_user(&self, user_id: Id) -> ApiResult<()> {
        self.call(ApiRequest::delete(format!("/auth/users/{}", user_id))).await
    }

    async fn user_classes(&self, user_id: Id) -> ApiResult<Vec<UserClass>> {
        self.session
            .authenticated_request(ApiRequest::get(format!("/auth/users/{}/classes", user_id)))
            .await
    }

    async fn list_flashcards(&self, category: Option<&str>) -> ApiResult<Vec<Flashcard>> {
        let mut request = ApiRequest::get("/flashcards/");
        if let Some(category) = category.filter(|c| !c.is_empty()) {
            request = request.query("category", category);
        }
        self.session.authenticated_request(request).await
    }

    async fn flashcard_categories(&self) -> ApiResult<Vec<String>> {
        self.session
            .authenticated_request(ApiRequest::get("/flashcards/categories"))
            .await
    }

    async fn class_flashcards(&self, class_id: Id) -> ApiResult<Vec<Flashcard>> {
        self.session
            .authenticated_request(ApiRequest::get(format!("/flashcards/class/{}", class_id)))
            .await
    }

    async fn create_flashcard(&self, draft: FlashcardDraft) -> ApiResult<Flashcard> {
        self.session
            .authenticated_request(ApiRequest::post("/flashcards/").json(&draft)?)
            .await
    }

    async fn update_flashcard(&self, flashcard_id: Id, draft: FlashcardDraft) -> ApiResult<Flashcard> {
        self.session
            .authenticated_request(ApiRequest::put(format!("/flashcards/{}", flashcard_id)).json(&draft)?)
            .await
    }

    async fn delete_flashcard(&self, flashcard_id: Id) -> ApiResult<()> {
        self.call(ApiRequest::delete(format!("/flashcards/{}", flashcard_id))).await
    }

    async fn assign_flashcard(&self, flashcard_id: Id, class_ids: Vec<Id>) -> ApiResult<()> {
        let body = FlashcardAssignment {
            flashcard_id,
            class_ids,
        };
        self.call(ApiRequest::post(format!("/flashcards/{}/assign", flashcard_id)).json(&body)?)
            .await
    }

    async fn unassign_flashcard(&self, flashcard_id: Id, class_id: Id) -> ApiResult<()> {
        self.call(ApiRequest::delete(format!(
            "/flashcards/{}/unassign/{}",
            flashcard_id, class_id
        )))
        .await
    }

    async fn bulk_upload_flashcards(&self, file: FilePart) -> ApiResult<Vec<Flashcard>> {
        self.session
            .authenticated_request(ApiRequest::post("/flashcards/bulk-excel").file(file))
            .await
    }

    async fn list_slides(&self, class_id: Id) -> ApiResult<Vec<Slide>> {
        self.session
            .authenticated_request(ApiRequest::get(format!("/slides/class/{}", class_id)))
            .await
    }

    async fn upload_slide(&self, class_id: Id, title: &str, file: FilePart) -> ApiResult<Slide> {
        let request = ApiRequest::post(format!("/slides/upload/{}", class_id))
            .query("title", title)
            .file(file);
        self.session.authenticated_request(request).await
    }

    async fn download_slide(&self, slide_id: Id) -> ApiResult<Vec<u8>> {
        self.session
            .authenticated_bytes(ApiRequest::get(format!("/slides/{}", slide_id)))
            .await
    }

    async fn delete_slide(&self, slide_id: Id) -> ApiResult<()> {
        self.call(ApiRequest::delete(format!("/slides/{}", slide_id))).await
    }

    async fn chat(&self, message: &str) -> ApiResult<ChatReply> {
        let body = ChatMessage {
            message: message.to_string(),
        };
        self.session
            .authenticated_request(ApiRequest::post("/chat/").json(&body)?)
            .await
    }
}
