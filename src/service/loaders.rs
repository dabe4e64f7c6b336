use crate::api::{ApiError, ApiResult, LmsBackend};
use crate::constants::RECENT_CLASSES_LIMIT;

use super::{AdminOverview, ClassSummary, RefreshTarget, Refreshed, StudentClassCard, UserRow};

/// Downgrade a secondary lookup failure to `None`.
///
/// Session expiry still aborts the whole load.
fn soft<T>(result: ApiResult<T>, what: &str) -> ApiResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(ApiError::SessionExpired) => Err(ApiError::SessionExpired),
        Err(e) => {
            log::warn!("Load: {} unavailable: {}", what, e);
            Ok(None)
        }
    }
}

/// Fetch the current server state for one target.
pub async fn load(backend: &dyn LmsBackend, target: &RefreshTarget) -> ApiResult<Refreshed> {
    log::debug!("Load: fetching {}", target.describe());

    match target {
        RefreshTarget::AdminOverview => load_admin_overview(backend).await.map(Refreshed::AdminOverview),
        RefreshTarget::Users => load_users(backend).await.map(Refreshed::Users),
        RefreshTarget::Classes => backend.list_classes().await.map(Refreshed::Classes),
        RefreshTarget::Flashcards { category } => {
            let flashcards = backend.list_flashcards(category.as_deref()).await?;
            Ok(Refreshed::Flashcards {
                category: category.clone(),
                flashcards,
            })
        }
        RefreshTarget::Categories => backend.flashcard_categories().await.map(Refreshed::Categories),
        RefreshTarget::ClassSlides { class_id } => {
            let slides = backend.list_slides(*class_id).await?;
            Ok(Refreshed::ClassSlides {
                class_id: *class_id,
                slides,
            })
        }
        RefreshTarget::ClassFlashcardAssignments { class_id } => {
            let flashcards = backend.list_flashcards(None).await?;
            let assigned = backend
                .class_flashcards(*class_id)
                .await?
                .into_iter()
                .map(|card| card.id)
                .collect();
            Ok(Refreshed::ClassFlashcardAssignments {
                class_id: *class_id,
                flashcards,
                assigned,
            })
        }
        RefreshTarget::UserAssignments { user_id } => {
            let classes = backend.list_classes().await?;
            let assigned = backend
                .user_classes(*user_id)
                .await?
                .into_iter()
                .map(|class| class.id)
                .collect();
            Ok(Refreshed::UserAssignments {
                user_id: *user_id,
                classes,
                assigned,
            })
        }
        RefreshTarget::StudentClasses => load_student_classes(backend).await.map(Refreshed::StudentClasses),
        RefreshTarget::ViewerSlides { class_id, class_name } => {
            let slides = backend.list_slides(*class_id).await?;
            Ok(Refreshed::ViewerSlides {
                class_id: *class_id,
                class_name: class_name.clone(),
                slides,
            })
        }
        RefreshTarget::ViewerFlashcards { class_id, class_name } => {
            let flashcards = backend.class_flashcards(*class_id).await?;
            Ok(Refreshed::ViewerFlashcards {
                class_id: *class_id,
                class_name: class_name.clone(),
                flashcards,
            })
        }
    }
}

async fn load_admin_overview(backend: &dyn LmsBackend) -> ApiResult<AdminOverview> {
    let classes = backend.list_classes().await?;

    let student_count = soft(backend.list_users().await, "student count")?
        .map(|users| users.iter().filter(|u| !u.is_admin).count())
        .unwrap_or(0);

    let total_flashcards = if classes.is_empty() {
        0
    } else {
        soft(backend.list_flashcards(None).await, "flashcard total")?
            .map(|cards| cards.len())
            .unwrap_or(0)
    };

    let mut recent = Vec::new();
    for class in classes.iter().take(RECENT_CLASSES_LIMIT) {
        let document_count = soft(backend.list_slides(class.id).await, "class documents")?
            .map(|slides| slides.len())
            .unwrap_or(0);
        let flashcard_count = soft(backend.class_flashcards(class.id).await, "class flashcards")?
            .map(|cards| cards.len())
            .unwrap_or(0);

        recent.push(ClassSummary {
            class: class.clone(),
            document_count,
            flashcard_count,
        });
    }

    Ok(AdminOverview {
        classes,
        student_count,
        resource_count: 0,
        recent,
        total_flashcards,
    })
}

async fn load_users(backend: &dyn LmsBackend) -> ApiResult<Vec<UserRow>> {
    let users = backend.list_users().await?;

    let mut rows = Vec::new();
    for user in users.into_iter().filter(|u| !u.is_admin) {
        let classes = soft(backend.user_classes(user.id).await, "user classes")?;
        rows.push(UserRow { user, classes });
    }

    Ok(rows)
}

async fn load_student_classes(backend: &dyn LmsBackend) -> ApiResult<Vec<StudentClassCard>> {
    let classes = backend.list_classes().await?;

    let mut cards = Vec::with_capacity(classes.len());
    for class in classes {
        let content_count = soft(backend.class_stats(class.id).await, "class stats")?.map(|s| s.content_count);
        let flashcard_count = soft(backend.class_flashcards(class.id).await, "class flashcards")?.map(|c| c.len());

        cards.push(StudentClassCard {
            class,
            content_count,
            flashcard_count,
        });
    }

    Ok(cards)
}
