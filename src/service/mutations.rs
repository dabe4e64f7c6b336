use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use crate::api::models::{Id, Slide};
use crate::api::{ApiError, ApiResult, LmsBackend};
use crate::constants::{
    ERROR_CLASS_CREATE_FAILED, ERROR_CLASS_EXISTS, SUCCESS_CLASS_CREATED, SUCCESS_FLASHCARD_CREATED,
    SUCCESS_FLASHCARD_DELETED, SUCCESS_FLASHCARD_UPDATED,
};
use crate::utils::files::{file_size, read_file_part, title_from_path, unique_download_path};
use crate::validation::{validate_excel, validate_pdf, ValidationError};

use super::Mutation;

fn plural(count: usize, one: &str, many: &str) -> String {
    if count == 1 {
        format!("{} {}", count, one)
    } else {
        format!("{} {}", count, many)
    }
}

/// Perform a mutation and return the success message to show.
///
/// Nothing is refreshed here; callers re-fetch their targets afterwards.
pub async fn apply(backend: &dyn LmsBackend, mutation: Mutation) -> ApiResult<String> {
    match mutation {
        Mutation::CreateClass(class) => match backend.create_class(class).await {
            Ok(created) => {
                log::info!("Mutation: created class '{}' ({})", created.name, created.id);
                Ok(SUCCESS_CLASS_CREATED.to_string())
            }
            Err(ApiError::SessionExpired) => Err(ApiError::SessionExpired),
            Err(e) => {
                let message = if e.to_string().contains("already exists") {
                    ERROR_CLASS_EXISTS
                } else {
                    ERROR_CLASS_CREATE_FAILED
                };
                Err(ValidationError::new("name", message).into())
            }
        },

        Mutation::CreateUser { user, class_id } => {
            let username = user.username.clone();
            let created = backend.create_user(user).await?;
            if let Some(class_id) = class_id {
                backend.assign_user(class_id, created.id).await?;
            }
            log::info!("Mutation: created student '{}' ({})", created.username, created.id);
            Ok(format!("Student \"{}\" created successfully!", username))
        }

        Mutation::DeleteUser { user_id, username } => {
            backend.delete_user(user_id).await?;
            Ok(format!("User \"{}\" deleted successfully", username))
        }

        Mutation::SetUserAssignments {
            user_id,
            username,
            add,
            remove,
        } => {
            for class_id in &add {
                backend.assign_user(*class_id, user_id).await?;
            }
            for class_id in &remove {
                backend.unassign_user(*class_id, user_id).await?;
            }

            Ok(match (add.len(), remove.len()) {
                (0, 0) => format!("No changes for {}", username),
                (a, 0) => format!("{} assigned to {}", username, plural(a, "class", "classes")),
                (0, r) => format!("{} removed from {}", username, plural(r, "class", "classes")),
                (a, r) => format!(
                    "{} assigned to {} and removed from {}",
                    username,
                    plural(a, "class", "classes"),
                    plural(r, "class", "classes")
                ),
            })
        }

        Mutation::CreateFlashcard(draft) => {
            backend.create_flashcard(draft).await?;
            Ok(SUCCESS_FLASHCARD_CREATED.to_string())
        }

        Mutation::UpdateFlashcard { id, draft } => {
            backend.update_flashcard(id, draft).await?;
            Ok(SUCCESS_FLASHCARD_UPDATED.to_string())
        }

        Mutation::DeleteFlashcard { id } => {
            backend.delete_flashcard(id).await?;
            Ok(SUCCESS_FLASHCARD_DELETED.to_string())
        }

        Mutation::BulkUploadFlashcards { path } => {
            let exists = file_size(&path).await.is_some();
            validate_excel(&path.to_string_lossy(), exists)?;

            let part = read_file_part(&path).await?;
            let created = backend.bulk_upload_flashcards(part).await?;
            Ok(format!("Successfully created {} flashcards from Excel file!", created.len()))
        }

        Mutation::SaveFlashcardAssignments {
            class_id,
            class_name,
            add,
            remove,
            assigned_total,
        } => {
            save_flashcard_assignments(backend, class_id, &add, &remove).await?;
            Ok(format!(
                "Successfully assigned {} flashcards to {}!",
                assigned_total, class_name
            ))
        }

        Mutation::UploadSlides { class_id, paths } => upload_slides(backend, class_id, &paths).await,

        Mutation::DeleteSlide { slide_id, title } => {
            backend.delete_slide(slide_id).await?;
            Ok(format!("\"{}\" deleted successfully", title))
        }
    }
}

/// Commit a class's flashcard membership changes.
///
/// The assign endpoint replaces a card's whole class list, so additions are
/// sent with the card's other current classes merged in.
async fn save_flashcard_assignments(
    backend: &dyn LmsBackend,
    class_id: Id,
    add: &[Id],
    remove: &[Id],
) -> ApiResult<()> {
    if !add.is_empty() {
        let mut memberships: BTreeMap<Id, BTreeSet<Id>> = BTreeMap::new();
        for class in backend.list_classes().await? {
            if class.id == class_id {
                continue;
            }
            for card in backend.class_flashcards(class.id).await? {
                memberships.entry(card.id).or_default().insert(class.id);
            }
        }

        for flashcard_id in add {
            let mut class_ids = memberships.remove(flashcard_id).unwrap_or_default();
            class_ids.insert(class_id);
            backend
                .assign_flashcard(*flashcard_id, class_ids.into_iter().collect())
                .await?;
        }
    }

    for flashcard_id in remove {
        backend.unassign_flashcard(*flashcard_id, class_id).await?;
    }

    log::info!(
        "Mutation: class {} flashcards +{} -{}",
        class_id,
        add.len(),
        remove.len()
    );
    Ok(())
}

/// Upload documents in order. Every file is validated before the first request.
async fn upload_slides(backend: &dyn LmsBackend, class_id: Id, paths: &[PathBuf]) -> ApiResult<String> {
    if paths.is_empty() {
        return Err(ValidationError::new("file", crate::constants::VALIDATION_FILE_REQUIRED).into());
    }

    for path in paths {
        validate_pdf(&path.to_string_lossy(), file_size(path).await)?;
    }

    for path in paths {
        let part = read_file_part(path).await?;
        let title = title_from_path(path);
        let slide = backend.upload_slide(class_id, &title, part).await?;
        log::info!("Mutation: uploaded '{}' as document {}", slide.title, slide.id);
    }

    Ok(if paths.len() == 1 {
        "Document uploaded successfully!".to_string()
    } else {
        format!("{} documents uploaded successfully!", paths.len())
    })
}

/// Fetch a document and save it into `dir`. Returns the written path.
pub async fn download_document(backend: &dyn LmsBackend, slide: &Slide, dir: &Path) -> ApiResult<PathBuf> {
    let bytes = backend.download_slide(slide.id).await?;

    tokio::fs::create_dir_all(dir).await?;

    // Server file names are not trusted as paths
    let file_name = Path::new(&slide.filename)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| format!("{}.pdf", crate::utils::csv::sanitize_file_stem(&slide.title)));
    let path = unique_download_path(dir, &file_name);
    tokio::fs::write(&path, bytes).await?;

    log::info!("Download: saved '{}' to {}", slide.title, path.display());
    Ok(path)
}
