//! Create views: a draft form with debounced autofill and a delayed save.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use uuid::Uuid;

use dv_assist::{Autofill, AutofillEvent, GeminiClassifier};
use dv_core::{
    Category, Command, CommandCategory, CommandDraft, CommandField, CoreResult, Draft,
    FieldErrors, Platform, VaultRepository, Website, WebsiteCategory, WebsiteDraft, WebsiteField,
};
use dv_store::MemoryVault;

use crate::app::Route;
use crate::input::TextInput;

/// What a form field is edited with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FieldWidget {
    Text,
    Choice,
    Toggle,
}

/// Form metadata for a draft type.
pub(crate) trait FormDraft: Draft + Default {
    const TITLE: &'static str;

    fn fields() -> &'static [Self::Field];
    fn label(field: Self::Field) -> &'static str;
    fn widget(field: Self::Field) -> FieldWidget;
    fn placeholder(field: Self::Field) -> &'static str;
    fn set_field_text(&mut self, field: Self::Field, value: String);
    fn cycle(&mut self, field: Self::Field, forward: bool);
    fn toggle(&mut self, field: Self::Field);
    /// Display value for any field.
    fn display(&self, field: Self::Field) -> String;
    /// List shown after a save.
    fn list_route() -> Route;
    fn store(vault: &MemoryVault, record: Self::Record) -> CoreResult<()>;
}

fn cycle_category<C: Category>(current: Option<C>, forward: bool) -> Option<C> {
    let all = C::ALL;
    let position = current.and_then(|value| all.iter().position(|candidate| *candidate == value));
    match (position, forward) {
        (None, true) => all.first().copied(),
        (None, false) => all.last().copied(),
        (Some(i), true) => all.get(i + 1).copied(),
        (Some(0), false) => None,
        (Some(i), false) => all.get(i - 1).copied(),
    }
}

fn cycle_platform(current: Platform, forward: bool) -> Platform {
    let all = Platform::ALL;
    let i = all.iter().position(|p| *p == current).unwrap_or(0);
    let next = if forward {
        (i + 1) % all.len()
    } else {
        (i + all.len() - 1) % all.len()
    };
    all[next]
}

fn category_label<C: Category>(category: Option<C>) -> String {
    category.map_or_else(|| "Select a category".into(), |c| c.label().to_string())
}

fn yes_no(value: bool) -> String {
    if value { "[x]".into() } else { "[ ]".into() }
}

impl FormDraft for CommandDraft {
    const TITLE: &'static str = "Add Command";

    fn fields() -> &'static [CommandField] {
        &CommandField::ALL
    }

    fn label(field: CommandField) -> &'static str {
        match field {
            CommandField::Title => "Title *",
            CommandField::Command => "Command *",
            CommandField::Description => "Description",
            CommandField::Category => "Category",
            CommandField::Platform => "Platform",
            CommandField::Tags => "Tags",
            CommandField::Public => "Public",
        }
    }

    fn widget(field: CommandField) -> FieldWidget {
        match field {
            CommandField::Category | CommandField::Platform => FieldWidget::Choice,
            CommandField::Public => FieldWidget::Toggle,
            _ => FieldWidget::Text,
        }
    }

    fn placeholder(field: CommandField) -> &'static str {
        match field {
            CommandField::Title => "e.g. Create new Git branch",
            CommandField::Command => "e.g. git checkout -b feature/new-feature",
            CommandField::Description => "What does this command do?",
            CommandField::Tags => "comma separated, e.g. git, branch",
            _ => "",
        }
    }

    fn set_field_text(&mut self, field: CommandField, value: String) {
        self.set_text(field, value);
    }

    fn cycle(&mut self, field: CommandField, forward: bool) {
        match field {
            CommandField::Category => self.category = cycle_category(self.category, forward),
            CommandField::Platform => self.platform = cycle_platform(self.platform, forward),
            _ => {}
        }
    }

    fn toggle(&mut self, field: CommandField) {
        if field == CommandField::Public {
            self.is_public = !self.is_public;
        }
    }

    fn display(&self, field: CommandField) -> String {
        match field {
            CommandField::Category => category_label::<CommandCategory>(self.category),
            CommandField::Platform => self.platform.label().to_string(),
            CommandField::Public => yes_no(self.is_public),
            text => self.text(text).unwrap_or_default().to_string(),
        }
    }

    fn list_route() -> Route {
        Route::Commands
    }

    fn store(vault: &MemoryVault, record: Command) -> CoreResult<()> {
        VaultRepository::<Command>::create(vault, record)
    }
}

impl FormDraft for WebsiteDraft {
    const TITLE: &'static str = "Add Website";

    fn fields() -> &'static [WebsiteField] {
        &WebsiteField::ALL
    }

    fn label(field: WebsiteField) -> &'static str {
        match field {
            WebsiteField::Url => "URL *",
            WebsiteField::Name => "Name *",
            WebsiteField::Description => "Description",
            WebsiteField::Category => "Category",
            WebsiteField::Tags => "Tags",
            WebsiteField::Bookmark => "Bookmark",
            WebsiteField::Public => "Public",
        }
    }

    fn widget(field: WebsiteField) -> FieldWidget {
        match field {
            WebsiteField::Category => FieldWidget::Choice,
            WebsiteField::Bookmark | WebsiteField::Public => FieldWidget::Toggle,
            _ => FieldWidget::Text,
        }
    }

    fn placeholder(field: WebsiteField) -> &'static str {
        match field {
            WebsiteField::Url => "https://example.com",
            WebsiteField::Name => "e.g. React Documentation",
            WebsiteField::Description => "What is this site for?",
            WebsiteField::Tags => "comma separated, e.g. react, docs",
            _ => "",
        }
    }

    fn set_field_text(&mut self, field: WebsiteField, value: String) {
        self.set_text(field, value);
    }

    fn cycle(&mut self, field: WebsiteField, forward: bool) {
        if field == WebsiteField::Category {
            self.category = cycle_category(self.category, forward);
        }
    }

    fn toggle(&mut self, field: WebsiteField) {
        match field {
            WebsiteField::Bookmark => self.is_bookmark = !self.is_bookmark,
            WebsiteField::Public => self.is_public = !self.is_public,
            _ => {}
        }
    }

    fn display(&self, field: WebsiteField) -> String {
        match field {
            WebsiteField::Category => category_label::<WebsiteCategory>(self.category),
            WebsiteField::Bookmark => yes_no(self.is_bookmark),
            WebsiteField::Public => yes_no(self.is_public),
            text => self.text(text).unwrap_or_default().to_string(),
        }
    }

    fn list_route() -> Route {
        Route::Websites
    }

    fn store(vault: &MemoryVault, record: Website) -> CoreResult<()> {
        VaultRepository::<Website>::create(vault, record)
    }
}

/// Everything needed to attach autofill to a new create view.
#[derive(Clone, Debug)]
pub struct AssistHandle {
    pub classifier: GeminiClassifier,
    pub debounce: Duration,
    pub runtime: Handle,
}

/// Result of a key press in a create view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FormOutcome {
    Stay,
    Cancel,
}

enum Phase<R> {
    Editing,
    Submitting { until: Instant, record: R },
}

/// State of one open create view.
pub(crate) struct CreateView<D: FormDraft> {
    pub(crate) draft: Arc<Mutex<D>>,
    pub(crate) focus: usize,
    pub(crate) cursor: usize,
    pub(crate) errors: Option<FieldErrors<D::Field>>,
    pub(crate) notice: Option<String>,
    phase: Phase<D::Record>,
    autofill: Option<Autofill<GeminiClassifier, D>>,
    events: Option<mpsc::UnboundedReceiver<AutofillEvent<D::Field>>>,
}

impl<D: FormDraft> CreateView<D> {
    pub(crate) fn new(assist: Option<&AssistHandle>) -> Self {
        let (autofill, events) = match assist {
            Some(assist) => {
                let (autofill, events) = Autofill::new(
                    assist.classifier.clone(),
                    assist.debounce,
                    assist.runtime.clone(),
                );
                (Some(autofill), Some(events))
            }
            None => (None, None),
        };
        Self {
            draft: Arc::new(Mutex::new(D::default())),
            focus: 0,
            cursor: 0,
            errors: None,
            notice: None,
            phase: Phase::Editing,
            autofill,
            events,
        }
    }

    pub(crate) fn with_draft<R>(&self, f: impl FnOnce(&mut D) -> R) -> R {
        let mut guard = match self.draft.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut guard)
    }

    pub(crate) fn focused_field(&self) -> D::Field {
        let fields = D::fields();
        fields[self.focus.min(fields.len() - 1)]
    }

    pub(crate) fn is_generating(&self) -> bool {
        self.autofill.as_ref().is_some_and(Autofill::is_generating)
    }

    pub(crate) fn autofill_enabled(&self) -> bool {
        self.autofill.is_some()
    }

    pub(crate) fn is_submitting(&self) -> bool {
        matches!(self.phase, Phase::Submitting { .. })
    }

    fn move_focus(&mut self, forward: bool) {
        let len = D::fields().len();
        self.focus = if forward {
            (self.focus + 1) % len
        } else {
            (self.focus + len - 1) % len
        };
        let field = self.focused_field();
        self.cursor = self.with_draft(|draft| {
            draft.text(field).map_or(0, |text| text.chars().count())
        });
    }

    pub(crate) fn handle_key(&mut self, key: KeyEvent, now: Instant, save_delay: Duration) -> FormOutcome {
        if self.is_submitting() {
            return FormOutcome::Stay;
        }
        match key.code {
            KeyCode::Esc => return FormOutcome::Cancel,
            KeyCode::Tab | KeyCode::Down => self.move_focus(true),
            KeyCode::BackTab | KeyCode::Up => self.move_focus(false),
            KeyCode::Enter => self.submit(now, save_delay),
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.submit(now, save_delay);
            }
            _ => self.edit_focused(key),
        }
        FormOutcome::Stay
    }

    fn edit_focused(&mut self, key: KeyEvent) {
        let field = self.focused_field();
        let changed = match D::widget(field) {
            FieldWidget::Text => {
                let current = self.with_draft(|draft| draft.text(field).unwrap_or_default().to_string());
                let mut input = TextInput::with_cursor(current, self.cursor);
                let changed = input.handle(key);
                self.cursor = input.cursor;
                if changed {
                    self.with_draft(|draft| draft.set_field_text(field, input.content));
                    if D::trigger_fields().contains(&field) {
                        self.notice = None;
                    }
                    if let Some(autofill) = self.autofill.as_mut() {
                        autofill.start(field, &self.draft);
                    }
                }
                changed
            }
            FieldWidget::Choice => match key.code {
                KeyCode::Right | KeyCode::Char(' ' | 'l') => {
                    self.with_draft(|draft| draft.cycle(field, true));
                    true
                }
                KeyCode::Left | KeyCode::Char('h') => {
                    self.with_draft(|draft| draft.cycle(field, false));
                    true
                }
                _ => false,
            },
            FieldWidget::Toggle => match key.code {
                KeyCode::Char(' ') | KeyCode::Left | KeyCode::Right => {
                    self.with_draft(|draft| draft.toggle(field));
                    true
                }
                _ => false,
            },
        };
        if changed && self.errors.is_some() {
            self.errors = self
                .with_draft(|draft| draft.to_record(Uuid::new_v4(), Utc::now()))
                .err();
        }
    }

    fn submit(&mut self, now: Instant, save_delay: Duration) {
        match self.with_draft(|draft| draft.to_record(Uuid::new_v4(), Utc::now())) {
            Err(errors) => {
                if let Some(first) = errors.iter().next() {
                    if let Some(index) = D::fields().iter().position(|f| *f == first.field) {
                        self.focus = index;
                    }
                }
                tracing::debug!(%errors, "draft rejected");
                self.errors = Some(errors);
            }
            Ok(record) => {
                self.errors = None;
                if let Some(autofill) = self.autofill.as_mut() {
                    autofill.shutdown();
                }
                tracing::info!(form = D::TITLE, "saving draft");
                self.phase = Phase::Submitting {
                    until: now + save_delay,
                    record,
                };
            }
        }
    }

    fn apply_event(&mut self, event: AutofillEvent<D::Field>) {
        let AutofillEvent::Applied { filled, .. } = event else {
            return;
        };
        if filled.is_empty() {
            return;
        }
        let focused = self.focused_field();
        if filled.contains(&focused) {
            self.cursor = self.with_draft(|draft| {
                draft.text(focused).map_or(0, |text| text.chars().count())
            });
        }
        self.notice = Some(format!("Autofilled {} field(s)", filled.len()));
    }

    /// Drain autofill events and finish a pending save. Returns the record
    /// once the save delay has elapsed.
    pub(crate) fn tick(&mut self, now: Instant) -> Option<D::Record> {
        let mut pending = Vec::new();
        if let Some(events) = self.events.as_mut() {
            while let Ok(event) = events.try_recv() {
                pending.push(event);
            }
        }
        for event in pending {
            self.apply_event(event);
        }

        let due = matches!(self.phase, Phase::Submitting { until, .. } if now >= until);
        if !due {
            return None;
        }
        match std::mem::replace(&mut self.phase, Phase::Editing) {
            Phase::Submitting { record, .. } => Some(record),
            Phase::Editing => None,
        }
    }
}
