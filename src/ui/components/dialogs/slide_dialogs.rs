use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, ListItem},
    Frame,
};

use super::common::{
    create_instructions_paragraph, form_height, render_banner, render_empty_state, render_form, render_modal_frame,
    render_selectable_list, shortcuts, InstructionShortcut,
};
use super::{list_bindings, step, ModalDialog};
use crate::api::models::{Id, Slide};
use crate::service::{Mutation, RefreshTarget};
use crate::ui::components::text_input::Form;
use crate::ui::core::{
    Action, BannerSlot, DeleteTarget, ModalBinding, ModalCommand, ModalContext, ModalKind, ModalTrigger,
};
use crate::validation::{validate_pdf, ValidationError};

/// Split the path field into individual files; `;` separates several.
pub fn parse_upload_paths(raw: &str) -> Vec<PathBuf> {
    raw.split(';')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentsFocus {
    List,
    Upload,
}

/// A class's PDF documents: list, upload, delete and open.
pub struct ClassDocumentsDialog {
    class_id: Option<Id>,
    class_name: String,
    slides: Vec<Slide>,
    selected: usize,
    form: Form,
    focus: DocumentsFocus,
    loading: bool,
    uploading: bool,
    banner: BannerSlot,
}

impl Default for ClassDocumentsDialog {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassDocumentsDialog {
    pub fn new() -> Self {
        Self {
            class_id: None,
            class_name: String::new(),
            slides: Vec::new(),
            selected: 0,
            form: Form::new().field("file", "PDF path(s), separated by ;"),
            focus: DocumentsFocus::List,
            loading: false,
            uploading: false,
            banner: BannerSlot::new(),
        }
    }

    pub fn class_id(&self) -> Option<Id> {
        self.class_id
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn focus(&self) -> DocumentsFocus {
        self.focus
    }

    pub fn apply_slides(&mut self, class_id: Id, slides: Vec<Slide>) {
        if self.class_id != Some(class_id) {
            return;
        }
        self.slides = slides;
        self.loading = false;
        self.selected = self.selected.min(self.slides.len().saturating_sub(1));
    }

    /// Called once an upload finished, successfully or not.
    pub fn upload_finished(&mut self, succeeded: bool) {
        self.uploading = false;
        if succeeded {
            self.form.reset();
            self.focus = DocumentsFocus::List;
        }
    }

    fn submit_upload(&mut self) -> Action {
        let Some(class_id) = self.class_id else {
            return Action::None;
        };
        if self.uploading {
            return Action::None;
        }

        self.form.clear_errors();
        let paths = parse_upload_paths(self.form.value("file"));
        if paths.is_empty() {
            if let Err(error) = validate_pdf("", None) {
                self.show_field_error(&error);
            }
            return Action::None;
        }

        for path in &paths {
            let size = std::fs::metadata(path).ok().filter(|m| m.is_file()).map(|m| m.len());
            if let Err(error) = validate_pdf(&path.to_string_lossy(), size) {
                self.show_field_error(&error);
                return Action::None;
            }
        }

        self.uploading = true;
        Action::Mutate {
            mutation: Mutation::UploadSlides { class_id, paths },
            refresh: Vec::new(),
        }
    }

    fn selected_slide(&self) -> Option<&Slide> {
        self.slides.get(self.selected)
    }
}

impl ModalDialog for ClassDocumentsDialog {
    fn kind(&self) -> ModalKind {
        ModalKind::ClassDocuments
    }

    fn bindings(&self) -> Vec<ModalBinding> {
        let mut bindings = list_bindings();
        bindings.extend([
            ModalBinding::command(KeyCode::Tab, ModalCommand::FocusNext),
            ModalBinding::command(KeyCode::BackTab, ModalCommand::FocusPrevious),
            ModalBinding::key(KeyCode::Enter, ModalTrigger::Submit),
            ModalBinding::command(KeyCode::Char('d'), ModalCommand::Delete),
            ModalBinding::command(KeyCode::Char('v'), ModalCommand::View),
            ModalBinding::command(KeyCode::Char('u'), ModalCommand::FocusNext),
        ]);
        bindings
    }

    fn on_open(&mut self, context: &ModalContext, _reset_form: bool) -> Action {
        let ModalContext::Class { id, name } = context else {
            return Action::None;
        };

        if self.class_id != Some(*id) {
            self.slides.clear();
        }
        self.class_id = Some(*id);
        self.class_name = name.clone();
        self.selected = 0;
        self.form.reset();
        self.focus = DocumentsFocus::List;
        self.loading = self.slides.is_empty();
        self.uploading = false;

        Action::Load(vec![RefreshTarget::ClassSlides { class_id: *id }])
    }

    fn handle_trigger(&mut self, trigger: ModalTrigger, _context: &ModalContext) -> Action {
        match (trigger, self.focus) {
            (ModalTrigger::Command(ModalCommand::FocusNext | ModalCommand::FocusPrevious), _) => {
                self.focus = match self.focus {
                    DocumentsFocus::List => DocumentsFocus::Upload,
                    DocumentsFocus::Upload => DocumentsFocus::List,
                };
            }
            (ModalTrigger::Submit, DocumentsFocus::Upload) => return self.submit_upload(),
            (ModalTrigger::Command(ModalCommand::Up), DocumentsFocus::List) => {
                self.selected = step(self.selected, self.slides.len(), false);
            }
            (ModalTrigger::Command(ModalCommand::Down), DocumentsFocus::List) => {
                self.selected = step(self.selected, self.slides.len(), true);
            }
            (ModalTrigger::Submit | ModalTrigger::Command(ModalCommand::View), DocumentsFocus::List) => {
                if self.selected_slide().is_some() {
                    return Action::ViewDocuments {
                        title: self.class_name.clone(),
                        slides: self.slides.clone(),
                        start: self.selected,
                    };
                }
            }
            (ModalTrigger::Command(ModalCommand::Delete), DocumentsFocus::List) => {
                if let Some(slide) = self.selected_slide() {
                    return Action::OpenModal {
                        kind: ModalKind::ConfirmDelete,
                        context: ModalContext::Delete(DeleteTarget::Slide {
                            id: slide.id,
                            title: slide.title.clone(),
                            class_id: slide.class_id,
                        }),
                    };
                }
            }
            _ => {}
        }
        Action::None
    }

    fn captures_text(&self) -> bool {
        self.focus == DocumentsFocus::Upload
    }

    fn handle_input(&mut self, key: KeyEvent) -> bool {
        self.form.handle_key(key)
    }

    fn show_field_error(&mut self, error: &ValidationError) -> bool {
        self.form.set_error("file", error.message.clone());
        self.focus = DocumentsFocus::Upload;
        true
    }

    fn banner_mut(&mut self) -> &mut BannerSlot {
        &mut self.banner
    }

    fn load_failed(&mut self) {
        self.loading = false;
    }

    fn render(&mut self, f: &mut Frame, area: Rect) -> Rect {
        let title = format!("Content for {}", self.class_name);
        let height = area.height.saturating_sub(4).max(16);
        let (outer, inner) = render_modal_frame(f, area, 75, height, &title, Color::Blue);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(form_height(&self.form)),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(inner);

        let list_color = if self.focus == DocumentsFocus::List {
            Color::Cyan
        } else {
            Color::Gray
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(format!(" Documents ({}) ", self.slides.len()))
            .style(Style::default().fg(list_color));
        let list_area = block.inner(chunks[0]);
        f.render_widget(block, chunks[0]);

        if self.loading {
            render_empty_state(f, list_area, "Loading documents...");
        } else if self.slides.is_empty() {
            render_empty_state(f, list_area, "No documents uploaded yet");
        } else {
            let items = self
                .slides
                .iter()
                .map(|slide| {
                    let icon = if slide.is_pdf() { "📄 " } else { "📎 " };
                    ListItem::new(Line::from(vec![
                        Span::raw(icon),
                        Span::styled(slide.title.clone(), Style::default().add_modifier(Modifier::BOLD)),
                        Span::styled(format!("  {}", slide.filename), Style::default().fg(Color::Gray)),
                    ]))
                })
                .collect();
            let selected = (self.focus == DocumentsFocus::List).then_some(self.selected);
            render_selectable_list(f, list_area, items, selected);
        }

        render_form(f, chunks[1], &self.form);

        if self.uploading && self.banner.current().is_none() {
            render_empty_state(f, chunks[2], "Uploading...");
        } else {
            render_banner(f, chunks[2], self.banner.current());
        }

        let instructions: &[InstructionShortcut] = match self.focus {
            DocumentsFocus::List => &[
                shortcuts::ARROWS_MOVE,
                ("v", Color::Cyan, " View"),
                shortcuts::DELETE,
                ("u", Color::Green, " Upload"),
                shortcuts::ESC_CLOSE,
            ],
            DocumentsFocus::Upload => &[
                ("Enter", Color::Green, " Upload"),
                ("Tab", Color::Cyan, " Back to list"),
                shortcuts::ESC_CLOSE,
            ],
        };
        f.render_widget(create_instructions_paragraph(instructions), chunks[3]);

        outer
    }
}
