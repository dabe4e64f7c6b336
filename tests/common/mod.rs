//! In-memory LmsBackend shared by the service and UI tests.
#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Mutex;

use async_trait::async_trait;
use classdeck::api::{
    ApiError, ApiResult, ChatReply, Class, ClassStats, FilePart, Flashcard, FlashcardDraft, Id, LmsBackend, NewClass,
    NewUser, Slide, User, UserClass,
};

#[derive(Default)]
pub struct FakeState {
    pub users: Vec<User>,
    pub classes: Vec<Class>,
    pub flashcards: Vec<Flashcard>,
    pub slides: Vec<Slide>,
    /// class id -> flashcard ids
    pub class_cards: BTreeMap<Id, BTreeSet<Id>>,
    /// user id -> class ids
    pub enrollments: BTreeMap<Id, BTreeSet<Id>>,
    pub current_user: Option<User>,
    pub stored_token: bool,
    pub calls: Vec<String>,
    pub failures: HashMap<&'static str, ApiError>,
    pub next_id: Id,
}

#[derive(Default)]
pub struct FakeBackend {
    pub state: Mutex<FakeState>,
}

pub fn user(id: Id, username: &str, is_admin: bool) -> User {
    User {
        id,
        username: username.to_string(),
        email: format!("{}@example.com", username),
        is_admin,
        is_active: true,
    }
}

pub fn class(id: Id, name: &str) -> Class {
    Class {
        id,
        name: name.to_string(),
        description: None,
        is_active: true,
    }
}

pub fn flashcard(id: Id, term: &str, category: Option<&str>) -> Flashcard {
    Flashcard {
        id,
        term: term.to_string(),
        definition: format!("{} definition", term),
        category: category.map(str::to_string),
        is_active: true,
    }
}

pub fn slide(id: Id, title: &str, class_id: Id) -> Slide {
    Slide {
        id,
        title: title.to_string(),
        filename: format!("{}.pdf", title),
        file_type: "application/pdf".to_string(),
        class_id,
        upload_order: id,
    }
}

impl FakeBackend {
    pub fn new() -> Self {
        let backend = Self::default();
        backend.with(|s| s.next_id = 100);
        backend
    }

    /// Two classes, one admin and two students.
    pub fn seeded() -> Self {
        let backend = Self::new();
        backend.with(|s| {
            s.users = vec![user(1, "admin", true), user(2, "alice", false), user(3, "bob", false)];
            s.classes = vec![class(10, "Biology"), class(11, "Chemistry")];
            s.flashcards = vec![
                flashcard(20, "Cell", Some("Bio")),
                flashcard(21, "Atom", Some("Chem")),
                flashcard(22, "Gene", Some("Bio")),
            ];
            s.slides = vec![slide(30, "Intro", 10)];
            s.class_cards.insert(10, [20, 22].into_iter().collect());
            s.class_cards.insert(11, [21].into_iter().collect());
            s.enrollments.insert(2, [10].into_iter().collect());
        });
        backend
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut FakeState) -> R) -> R {
        let mut state = self.state.lock().unwrap();
        f(&mut state)
    }

    pub fn fail(&self, call: &'static str, error: ApiError) {
        self.with(|s| {
            s.failures.insert(call, error);
        });
    }

    pub fn calls(&self) -> Vec<String> {
        self.with(|s| s.calls.clone())
    }

    pub fn call_count(&self, call: &str) -> usize {
        self.with(|s| s.calls.iter().filter(|c| c.as_str() == call).count())
    }

    fn enter(&self, call: &'static str) -> ApiResult<()> {
        self.with(|s| {
            s.calls.push(call.to_string());
            match s.failures.get(call) {
                Some(error) => Err(error.clone()),
                None => Ok(()),
            }
        })
    }

    fn next_id(&self) -> Id {
        self.with(|s| {
            s.next_id += 1;
            s.next_id
        })
    }
}

#[async_trait]
impl LmsBackend for FakeBackend {
    async fn login(&self, username: &str, _password: &str) -> ApiResult<()> {
        self.enter("login")?;
        self.with(|s| {
            let found = s.users.iter().find(|u| u.username == username).cloned();
            match found {
                Some(user) => {
                    s.current_user = Some(user);
                    Ok(())
                }
                None => Err(ApiError::Auth("Incorrect username or password".to_string())),
            }
        })
    }

    async fn restore_session(&self) -> ApiResult<bool> {
        self.enter("restore_session")?;
        Ok(self.with(|s| s.stored_token))
    }

    async fn logout(&self) {
        let _ = self.enter("logout");
        self.with(|s| s.current_user = None);
    }

    async fn current_user(&self) -> ApiResult<User> {
        self.enter("current_user")?;
        self.with(|s| s.current_user.clone())
            .ok_or_else(|| ApiError::Auth("No token available".to_string()))
    }

    async fn list_classes(&self) -> ApiResult<Vec<Class>> {
        self.enter("list_classes")?;
        Ok(self.with(|s| s.classes.clone()))
    }

    async fn create_class(&self, new: NewClass) -> ApiResult<Class> {
        self.enter("create_class")?;
        let id = self.next_id();
        let created = Class {
            id,
            name: new.name,
            description: new.description,
            is_active: true,
        };
        self.with(|s| s.classes.push(created.clone()));
        Ok(created)
    }

    async fn class_stats(&self, class_id: Id) -> ApiResult<ClassStats> {
        self.enter("class_stats")?;
        Ok(self.with(|s| ClassStats {
            content_count: s.slides.iter().filter(|sl| sl.class_id == class_id).count(),
            student_count: s.enrollments.values().filter(|c| c.contains(&class_id)).count(),
        }))
    }

    async fn assign_user(&self, class_id: Id, user_id: Id) -> ApiResult<()> {
        self.enter("assign_user")?;
        self.with(|s| {
            s.enrollments.entry(user_id).or_default().insert(class_id);
        });
        Ok(())
    }

    async fn unassign_user(&self, class_id: Id, user_id: Id) -> ApiResult<()> {
        self.enter("unassign_user")?;
        self.with(|s| {
            s.enrollments.entry(user_id).or_default().remove(&class_id);
        });
        Ok(())
    }

    async fn list_users(&self) -> ApiResult<Vec<User>> {
        self.enter("list_users")?;
        Ok(self.with(|s| s.users.clone()))
    }

    async fn create_user(&self, new: NewUser) -> ApiResult<User> {
        self.enter("create_user")?;
        let created = User {
            id: self.next_id(),
            username: new.username,
            email: new.email,
            is_admin: false,
            is_active: true,
        };
        self.with(|s| s.users.push(created.clone()));
        Ok(created)
    }

    async fn delete_user(&self, user_id: Id) -> ApiResult<()> {
        self.enter("delete_user")?;
        self.with(|s| {
            s.users.retain(|u| u.id != user_id);
            s.enrollments.remove(&user_id);
        });
        Ok(())
    }

    async fn user_classes(&self, user_id: Id) -> ApiResult<Vec<UserClass>> {
        self.enter("user_classes")?;
        Ok(self.with(|s| {
            let enrolled = s.enrollments.get(&user_id).cloned().unwrap_or_default();
            s.classes
                .iter()
                .filter(|c| enrolled.contains(&c.id))
                .map(|c| UserClass {
                    id: c.id,
                    name: c.name.clone(),
                    description: c.description.clone(),
                })
                .collect()
        }))
    }

    async fn list_flashcards(&self, category: Option<&str>) -> ApiResult<Vec<Flashcard>> {
        self.enter("list_flashcards")?;
        Ok(self.with(|s| {
            s.flashcards
                .iter()
                .filter(|f| category.is_none() || f.category.as_deref() == category)
                .cloned()
                .collect()
        }))
    }

    async fn flashcard_categories(&self) -> ApiResult<Vec<String>> {
        self.enter("flashcard_categories")?;
        Ok(self.with(|s| {
            let categories: BTreeSet<String> = s.flashcards.iter().filter_map(|f| f.category.clone()).collect();
            categories.into_iter().collect()
        }))
    }

    async fn class_flashcards(&self, class_id: Id) -> ApiResult<Vec<Flashcard>> {
        self.enter("class_flashcards")?;
        Ok(self.with(|s| {
            let ids = s.class_cards.get(&class_id).cloned().unwrap_or_default();
            s.flashcards.iter().filter(|f| ids.contains(&f.id)).cloned().collect()
        }))
    }

    async fn create_flashcard(&self, draft: FlashcardDraft) -> ApiResult<Flashcard> {
        self.enter("create_flashcard")?;
        let created = Flashcard {
            id: self.next_id(),
            term: draft.term,
            definition: draft.definition,
            category: draft.category,
            is_active: true,
        };
        self.with(|s| s.flashcards.push(created.clone()));
        Ok(created)
    }

    async fn update_flashcard(&self, flashcard_id: Id, draft: FlashcardDraft) -> ApiResult<Flashcard> {
        self.enter("update_flashcard")?;
        self.with(|s| -> ApiResult<Flashcard> {
            let card = s
                .flashcards
                .iter_mut()
                .find(|f| f.id == flashcard_id)
                .ok_or(ApiError::Request {
                    status: 404,
                    detail: "Flashcard not found".to_string(),
                })?;
            card.term = draft.term;
            card.definition = draft.definition;
            card.category = draft.category;
            Ok(card.clone())
        })
    }

    async fn delete_flashcard(&self, flashcard_id: Id) -> ApiResult<()> {
        self.enter("delete_flashcard")?;
        self.with(|s| {
            s.flashcards.retain(|f| f.id != flashcard_id);
            for cards in s.class_cards.values_mut() {
                cards.remove(&flashcard_id);
            }
        });
        Ok(())
    }

    async fn assign_flashcard(&self, flashcard_id: Id, class_ids: Vec<Id>) -> ApiResult<()> {
        self.enter("assign_flashcard")?;
        // The real endpoint replaces the card's class list
        self.with(|s| {
            for (class_id, cards) in s.class_cards.iter_mut() {
                if !class_ids.contains(class_id) {
                    cards.remove(&flashcard_id);
                }
            }
            for class_id in class_ids {
                s.class_cards.entry(class_id).or_default().insert(flashcard_id);
            }
        });
        Ok(())
    }

    async fn unassign_flashcard(&self, flashcard_id: Id, class_id: Id) -> ApiResult<()> {
        self.enter("unassign_flashcard")?;
        self.with(|s| {
            s.class_cards.entry(class_id).or_default().remove(&flashcard_id);
        });
        Ok(())
    }

    async fn bulk_upload_flashcards(&self, _file: FilePart) -> ApiResult<Vec<Flashcard>> {
        self.enter("bulk_upload_flashcards")?;
        let created = vec![
            flashcard(self.next_id(), "Imported A", None),
            flashcard(self.next_id(), "Imported B", None),
        ];
        self.with(|s| s.flashcards.extend(created.clone()));
        Ok(created)
    }

    async fn list_slides(&self, class_id: Id) -> ApiResult<Vec<Slide>> {
        self.enter("list_slides")?;
        Ok(self.with(|s| s.slides.iter().filter(|sl| sl.class_id == class_id).cloned().collect()))
    }

    async fn upload_slide(&self, class_id: Id, title: &str, file: FilePart) -> ApiResult<Slide> {
        self.enter("upload_slide")?;
        let mut created = slide(self.next_id(), title, class_id);
        created.filename = file.file_name;
        self.with(|s| s.slides.push(created.clone()));
        Ok(created)
    }

    async fn download_slide(&self, _slide_id: Id) -> ApiResult<Vec<u8>> {
        self.enter("download_slide")?;
        Ok(b"%PDF-1.4 fake".to_vec())
    }

    async fn delete_slide(&self, slide_id: Id) -> ApiResult<()> {
        self.enter("delete_slide")?;
        self.with(|s| s.slides.retain(|sl| sl.id != slide_id));
        Ok(())
    }

    async fn chat(&self, message: &str) -> ApiResult<ChatReply> {
        self.enter("chat")?;
        Ok(ChatReply {
            message: message.to_string(),
            response: format!("echo: {}", message),
        })
    }
}
