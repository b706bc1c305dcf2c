use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::{DateTime, Utc};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::widgets::ListState;

use dv_core::{
    category_counts, filter_records, Category, CategoryFilter, Command, CommandCategory,
    CommandDraft, ListFilter, Record, VaultRepository, Website, WebsiteDraft,
};
use dv_store::MemoryVault;

use crate::desktop::{copy_record, ClipboardSink, CopyTracker, UrlOpener};
use crate::form::{AssistHandle, CreateView, FormDraft, FormOutcome};
use crate::input::{clamp_selection, move_list, Move, TextInput};

/// How long a status message stays in the top bar.
const STATUS_TTL: Duration = Duration::from_secs(3);

/// Screens reachable from the side navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Route {
    Dashboard,
    AddCommand,
    AddWebsite,
    Commands,
    Websites,
}

impl Route {
    pub(crate) const ALL: [Route; 5] = [
        Route::Dashboard,
        Route::AddCommand,
        Route::AddWebsite,
        Route::Commands,
        Route::Websites,
    ];

    pub(crate) fn title(self) -> &'static str {
        match self {
            Route::Dashboard => "Dashboard",
            Route::AddCommand => "Add Command",
            Route::AddWebsite => "Add Website",
            Route::Commands => "Commands",
            Route::Websites => "Websites",
        }
    }

    pub(crate) fn index(self) -> usize {
        Route::ALL.iter().position(|route| *route == self).unwrap_or(0)
    }

    pub(crate) fn is_form(self) -> bool {
        matches!(self, Route::AddCommand | Route::AddWebsite)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    Normal,
    Filter,
}

/// A searchable list of one record kind.
pub(crate) struct ListView<T: Record> {
    pub(crate) records: Vec<T>,
    pub(crate) filter_input: TextInput,
    pub(crate) category_index: usize,
    pub(crate) state: ListState,
}

impl<T: Record> Default for ListView<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            filter_input: TextInput::default(),
            category_index: 0,
            state: ListState::default(),
        }
    }
}

impl<T: Record> ListView<T> {
    pub(crate) fn category(&self) -> CategoryFilter<T::Category> {
        CategoryFilter::options()
            .get(self.category_index)
            .copied()
            .unwrap_or_default()
    }

    pub(crate) fn filter(&self) -> ListFilter<T::Category> {
        ListFilter::new(self.filter_input.content.clone(), self.category())
    }

    pub(crate) fn visible(&self) -> Vec<&T> {
        filter_records(&self.records, &self.filter())
    }

    pub(crate) fn selected(&self) -> Option<&T> {
        let index = self.state.selected()?;
        self.visible().get(index).copied()
    }

    pub(crate) fn is_filtered(&self) -> bool {
        !self.filter_input.content.is_empty() || self.category_index != 0
    }

    fn reload(&mut self, records: Vec<T>) {
        self.records = records;
        let len = self.visible().len();
        clamp_selection(&mut self.state, len);
    }

    fn cycle_category(&mut self, forward: bool) {
        let len = <T::Category as Category>::ALL.len() + 1;
        self.category_index = if forward {
            (self.category_index + 1) % len
        } else {
            (self.category_index + len - 1) % len
        };
        self.reset_selection();
    }

    fn reset_selection(&mut self) {
        let len = self.visible().len();
        self.state.select(if len == 0 { None } else { Some(0) });
    }

    fn clear_filter(&mut self) {
        self.filter_input.reset();
        self.category_index = 0;
        self.reset_selection();
    }

    fn move_selection(&mut self, movement: Move) {
        let len = self.visible().len();
        move_list(&mut self.state, len, movement);
    }
}

/// Aggregates shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DashboardStats {
    pub(crate) commands: usize,
    pub(crate) websites: usize,
    pub(crate) categories_in_use: usize,
    pub(crate) added_this_week: usize,
    pub(crate) command_categories: Vec<(&'static str, u64)>,
}

pub(crate) fn dashboard_stats(
    commands: &[Command],
    websites: &[Website],
    now: DateTime<Utc>,
) -> DashboardStats {
    let week_ago = now - chrono::Duration::days(7);
    let command_counts = category_counts(commands);
    let added_this_week = commands
        .iter()
        .map(Record::created_at)
        .chain(websites.iter().map(Record::created_at))
        .filter(|created| *created >= week_ago)
        .count();
    DashboardStats {
        commands: commands.len(),
        websites: websites.len(),
        categories_in_use: command_counts.len() + category_counts(websites).len(),
        added_this_week,
        command_categories: command_counts
            .into_iter()
            .map(|(category, count)| (CommandCategory::label(category), count as u64))
            .collect(),
    }
}

/// Most recently created records first.
pub(crate) fn most_recent<T: Record>(records: &[T], limit: usize) -> Vec<&T> {
    let mut sorted: Vec<&T> = records.iter().collect();
    sorted.sort_by_key(|record| std::cmp::Reverse(record.created_at()));
    sorted.truncate(limit);
    sorted
}

pub struct App {
    pub(crate) route: Route,
    previous: Route,
    pub(crate) input_mode: InputMode,
    pub(crate) show_help: bool,
    pub(crate) status: Option<String>,
    status_until: Option<Instant>,
    pub(crate) commands: ListView<Command>,
    pub(crate) websites: ListView<Website>,
    pub(crate) command_form: Option<CreateView<CommandDraft>>,
    pub(crate) website_form: Option<CreateView<WebsiteDraft>>,
    pub(crate) copies: CopyTracker,
    pub(crate) now: Instant,
    vault: Arc<MemoryVault>,
    clipboard: Box<dyn ClipboardSink>,
    browser: Box<dyn UrlOpener>,
    assist: Option<AssistHandle>,
    save_delay: Duration,
}

impl App {
    pub fn new(
        vault: Arc<MemoryVault>,
        clipboard: Box<dyn ClipboardSink>,
        browser: Box<dyn UrlOpener>,
    ) -> Self {
        let mut app = Self {
            route: Route::Dashboard,
            previous: Route::Dashboard,
            input_mode: InputMode::Normal,
            show_help: false,
            status: None,
            status_until: None,
            commands: ListView::default(),
            websites: ListView::default(),
            command_form: None,
            website_form: None,
            copies: CopyTracker::default(),
            now: Instant::now(),
            vault,
            clipboard,
            browser,
            assist: None,
            save_delay: Duration::from_millis(1000),
        };
        app.refresh();
        app
    }

    pub fn with_assist(mut self, assist: Option<AssistHandle>) -> Self {
        self.assist = assist;
        self
    }

    pub fn with_save_delay(mut self, delay: Duration) -> Self {
        self.save_delay = delay;
        self
    }

    pub(crate) fn autofill_configured(&self) -> bool {
        self.assist.is_some()
    }

    pub(crate) fn is_generating(&self) -> bool {
        match self.route {
            Route::AddCommand => self.command_form.as_ref().is_some_and(CreateView::is_generating),
            Route::AddWebsite => self.website_form.as_ref().is_some_and(CreateView::is_generating),
            _ => false,
        }
    }

    fn refresh(&mut self) {
        match VaultRepository::<Command>::list(self.vault.as_ref()) {
            Ok(records) => self.commands.reload(records),
            Err(err) => tracing::warn!(error = %err, "failed to load commands"),
        }
        match VaultRepository::<Website>::list(self.vault.as_ref()) {
            Ok(records) => self.websites.reload(records),
            Err(err) => tracing::warn!(error = %err, "failed to load websites"),
        }
    }

    pub(crate) fn navigate(&mut self, route: Route) {
        if route == self.route {
            return;
        }
        tracing::debug!(from = ?self.route, to = ?route, "navigate");
        if !route.is_form() {
            self.previous = route;
        }
        self.route = route;
        self.input_mode = InputMode::Normal;
        self.command_form = None;
        self.website_form = None;
        match route {
            Route::AddCommand => {
                self.command_form = Some(CreateView::new(self.assist.as_ref()));
            }
            Route::AddWebsite => {
                self.website_form = Some(CreateView::new(self.assist.as_ref()));
            }
            Route::Dashboard | Route::Commands | Route::Websites => self.refresh(),
        }
    }

    fn step_route(&mut self, forward: bool) {
        let len = Route::ALL.len();
        let index = self.route.index();
        let next = if forward {
            (index + 1) % len
        } else {
            (index + len - 1) % len
        };
        self.navigate(Route::ALL[next]);
    }

    /// Handle a key press. Returns `true` when the app should quit.
    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> Result<bool> {
        self.now = now;
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Ok(true);
        }
        if self.show_help {
            if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc) {
                self.show_help = false;
            }
            return Ok(false);
        }
        if self.input_mode == InputMode::Filter {
            self.handle_filter_input(key);
            return Ok(false);
        }

        let outcome = match self.route {
            Route::AddCommand => self
                .command_form
                .as_mut()
                .map(|form| form.handle_key(key, now, self.save_delay)),
            Route::AddWebsite => self
                .website_form
                .as_mut()
                .map(|form| form.handle_key(key, now, self.save_delay)),
            _ => return Ok(self.handle_browse_key(key, now)),
        };
        if outcome == Some(FormOutcome::Cancel) {
            self.navigate(self.previous);
        }
        Ok(false)
    }

    fn handle_browse_key(&mut self, key: KeyEvent, now: Instant) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('u') => self.move_selection(Move::PageUp),
                KeyCode::Char('d') => self.move_selection(Move::PageDown),
                _ => {}
            }
            return false;
        }

        match key.code {
            KeyCode::Char('q') => return true,
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Right => self.step_route(true),
            KeyCode::Left => self.step_route(false),
            KeyCode::Char(c @ '1'..='5') => {
                let index = c as usize - '1' as usize;
                self.navigate(Route::ALL[index]);
            }
            KeyCode::Char('/') if self.is_list() => {
                self.input_mode = InputMode::Filter;
                self.list_filter_input().move_end();
            }
            KeyCode::Esc => match self.route {
                Route::Commands => self.commands.clear_filter(),
                Route::Websites => self.websites.clear_filter(),
                _ => {}
            },
            KeyCode::Char('h') => self.cycle_category(false),
            KeyCode::Char('l') => self.cycle_category(true),
            KeyCode::Char('j') | KeyCode::Down => self.move_selection(Move::Down),
            KeyCode::Char('k') | KeyCode::Up => self.move_selection(Move::Up),
            KeyCode::PageDown => self.move_selection(Move::PageDown),
            KeyCode::PageUp => self.move_selection(Move::PageUp),
            KeyCode::Home | KeyCode::Char('g') => self.move_selection(Move::First),
            KeyCode::End | KeyCode::Char('G') => self.move_selection(Move::Last),
            KeyCode::Char('c') if self.route == Route::Dashboard => {
                self.navigate(Route::AddCommand);
            }
            KeyCode::Char('w') if self.route == Route::Dashboard => {
                self.navigate(Route::AddWebsite);
            }
            KeyCode::Char('n') => match self.route {
                Route::Commands => self.navigate(Route::AddCommand),
                Route::Websites => self.navigate(Route::AddWebsite),
                _ => {}
            },
            KeyCode::Char('y') => self.copy_selected(now),
            KeyCode::Enter => match self.route {
                Route::Commands => self.copy_selected(now),
                Route::Websites => self.open_selected(),
                _ => {}
            },
            KeyCode::Char('o') => self.open_selected(),
            _ => {}
        }
        false
    }

    fn is_list(&self) -> bool {
        matches!(self.route, Route::Commands | Route::Websites)
    }

    fn list_filter_input(&mut self) -> &mut TextInput {
        match self.route {
            Route::Websites => &mut self.websites.filter_input,
            _ => &mut self.commands.filter_input,
        }
    }

    fn move_selection(&mut self, movement: Move) {
        match self.route {
            Route::Commands => self.commands.move_selection(movement),
            Route::Websites => self.websites.move_selection(movement),
            _ => {}
        }
    }

    fn cycle_category(&mut self, forward: bool) {
        match self.route {
            Route::Commands => self.commands.cycle_category(forward),
            Route::Websites => self.websites.cycle_category(forward),
            _ => {}
        }
    }

    fn reset_list_selection(&mut self) {
        match self.route {
            Route::Commands => self.commands.reset_selection(),
            Route::Websites => self.websites.reset_selection(),
            _ => {}
        }
    }

    fn handle_filter_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                self.list_filter_input().reset();
                self.reset_list_selection();
            }
            KeyCode::Enter => self.input_mode = InputMode::Normal,
            _ => {
                if self.list_filter_input().handle(key) {
                    self.reset_list_selection();
                }
            }
        }
    }

    fn copy_selected(&mut self, now: Instant) {
        let target = match self.route {
            Route::Commands => self
                .commands
                .selected()
                .map(|command| (command.id, command.command.clone())),
            Route::Websites => self
                .websites
                .selected()
                .map(|website| (website.id, website.url.clone())),
            _ => None,
        };
        let Some((id, text)) = target else {
            return;
        };
        if copy_record(self.clipboard.as_mut(), &mut self.copies, id, &text, now) {
            self.set_status("Copied to clipboard");
        } else {
            self.set_status("Clipboard unavailable");
        }
    }

    fn open_selected(&mut self) {
        if self.route != Route::Websites {
            return;
        }
        let Some(url) = self.websites.selected().map(|website| website.url.clone()) else {
            return;
        };
        match self.browser.open(&url) {
            Ok(()) => {
                tracing::debug!(%url, "opened in browser");
                self.set_status(format!("Opened {url}"));
            }
            Err(err) => {
                tracing::warn!(%url, error = %err, "failed to open browser");
                self.set_status("Could not open browser");
            }
        }
    }

    fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
        self.status_until = Some(self.now + STATUS_TTL);
    }

    /// Advance timers: status line, copy indicators, autofill results and
    /// pending saves.
    pub fn tick(&mut self, now: Instant) {
        self.now = now;
        self.copies.prune(now);
        if self.status_until.is_some_and(|until| now >= until) {
            self.status = None;
            self.status_until = None;
        }

        let saved = match self.route {
            Route::AddCommand => finish_save(&self.vault, &mut self.command_form, now),
            Route::AddWebsite => finish_save(&self.vault, &mut self.website_form, now),
            _ => None,
        };
        match saved {
            Some(Ok((name, route))) => {
                self.set_status(format!("Saved \"{name}\""));
                self.navigate(route);
            }
            Some(Err(message)) => self.set_status(message),
            None => {}
        }
    }
}

fn finish_save<D>(
    vault: &MemoryVault,
    form: &mut Option<CreateView<D>>,
    now: Instant,
) -> Option<Result<(String, Route), String>>
where
    D: FormDraft,
    D::Record: Record,
{
    let record = form.as_mut()?.tick(now)?;
    let name = record.display_name().to_string();
    match D::store(vault, record) {
        Ok(()) => {
            tracing::info!(%name, "record saved");
            Some(Ok((name, D::list_route())))
        }
        Err(err) => {
            tracing::warn!(%name, error = %err, "failed to save record");
            Some(Err(format!("Could not save \"{name}\"")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::desktop::tests::{RecordingBrowser, RecordingClipboard};
    use dv_core::WebsiteCategory;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app() -> (App, RecordingClipboard, RecordingBrowser) {
        let clipboard = RecordingClipboard::default();
        let browser = RecordingBrowser::default();
        let vault = Arc::new(MemoryVault::seeded().unwrap());
        let app = App::new(vault, Box::new(clipboard.clone()), Box::new(browser.clone()));
        (app, clipboard, browser)
    }

    fn press(app: &mut App, codes: &[KeyCode], now: Instant) {
        for code in codes {
            assert!(!app.handle_key(key(*code), now).unwrap());
        }
    }

    fn type_text(app: &mut App, text: &str, now: Instant) {
        for c in text.chars() {
            app.handle_key(key(KeyCode::Char(c)), now).unwrap();
        }
    }

    #[test]
    fn filter_popup_narrows_the_list_live() {
        let (mut app, _, _) = app();
        let now = Instant::now();
        app.navigate(Route::Commands);
        press(&mut app, &[KeyCode::Char('/')], now);
        type_text(&mut app, "git", now);

        let titles: Vec<&str> = app.commands.visible().iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["Create new Git branch"]);
        assert_eq!(app.commands.state.selected(), Some(0));

        press(&mut app, &[KeyCode::Esc], now);
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.commands.visible().len(), 8);
    }

    #[test]
    fn category_keys_cycle_through_all() {
        let (mut app, _, _) = app();
        let now = Instant::now();
        app.navigate(Route::Websites);
        press(&mut app, &[KeyCode::Char('l')], now);
        assert_eq!(
            app.websites.category(),
            CategoryFilter::Only(WebsiteCategory::Documentation)
        );
        assert_eq!(app.websites.visible().len(), 2);
        press(&mut app, &[KeyCode::Char('h'), KeyCode::Char('h')], now);
        assert_eq!(app.websites.category(), CategoryFilter::Only(WebsiteCategory::Other));
        assert!(app.websites.visible().is_empty());
        assert_eq!(app.websites.state.selected(), None);
    }

    #[test]
    fn copy_indicators_are_per_record() {
        let (mut app, clipboard, _) = app();
        let start = Instant::now();
        app.navigate(Route::Commands);

        press(&mut app, &[KeyCode::Char('y')], start);
        let first = app.commands.selected().unwrap().id;
        let later = start + Duration::from_millis(1500);
        press(&mut app, &[KeyCode::Down, KeyCode::Enter], later);
        let second = app.commands.selected().unwrap().id;

        assert_eq!(
            *clipboard.writes.lock().unwrap(),
            vec![
                "git checkout -b feature/new-feature",
                "docker run -d -p 3000:3000 --name myapp myimage"
            ]
        );
        let check = start + Duration::from_millis(2100);
        app.tick(check);
        assert!(!app.copies.is_copied(first, check));
        assert!(app.copies.is_copied(second, check));
    }

    #[test]
    fn status_message_expires() {
        let (mut app, _, _) = app();
        let start = Instant::now();
        app.navigate(Route::Commands);
        press(&mut app, &[KeyCode::Char('y')], start);
        assert_eq!(app.status.as_deref(), Some("Copied to clipboard"));

        app.tick(start + Duration::from_millis(2999));
        assert!(app.status.is_some());
        app.tick(start + STATUS_TTL);
        assert_eq!(app.status, None);
    }

    #[test]
    fn copying_a_website_copies_its_url() {
        let (mut app, clipboard, browser) = app();
        let now = Instant::now();
        app.navigate(Route::Websites);
        press(&mut app, &[KeyCode::Char('y')], now);

        let selected = app.websites.selected().unwrap();
        assert_eq!(*clipboard.writes.lock().unwrap(), vec![selected.url.clone()]);
        assert!(app.copies.is_copied(selected.id, now));
        assert!(browser.opened.lock().unwrap().is_empty());
    }

    #[test]
    fn websites_open_in_browser() {
        let (mut app, _, browser) = app();
        app.navigate(Route::Websites);
        press(&mut app, &[KeyCode::Char('G'), KeyCode::Enter], Instant::now());
        assert_eq!(*browser.opened.lock().unwrap(), vec!["https://css-tricks.com"]);
    }

    #[test]
    fn submitting_a_command_saves_then_shows_the_list() {
        let (mut app, _, _) = app();
        let start = Instant::now();
        app.navigate(Route::Commands);
        press(&mut app, &[KeyCode::Char('n')], start);
        assert_eq!(app.route, Route::AddCommand);

        type_text(&mut app, "Show listening ports", start);
        press(&mut app, &[KeyCode::Tab], start);
        type_text(&mut app, "ss -tlnp", start);
        press(&mut app, &[KeyCode::Enter], start);

        app.tick(start + Duration::from_millis(999));
        assert_eq!(app.route, Route::AddCommand);
        assert_eq!(app.vault.command_count(), 8);

        app.tick(start + Duration::from_millis(1000));
        assert_eq!(app.route, Route::Commands);
        assert_eq!(app.vault.command_count(), 9);
        assert!(app.command_form.is_none());
        assert_eq!(app.status.as_deref(), Some("Saved \"Show listening ports\""));
        assert!(app
            .commands
            .visible()
            .iter()
            .any(|c| c.command == "ss -tlnp"));
    }

    #[test]
    fn invalid_draft_stays_on_the_form() {
        let (mut app, _, _) = app();
        let start = Instant::now();
        press(&mut app, &[KeyCode::Char('w')], start);
        assert_eq!(app.route, Route::AddWebsite);
        press(&mut app, &[KeyCode::Enter], start);
        app.tick(start + Duration::from_secs(5));
        assert_eq!(app.route, Route::AddWebsite);
        assert_eq!(app.vault.website_count(), 10);
    }

    #[test]
    fn cancel_returns_to_previous_route() {
        let (mut app, _, _) = app();
        let now = Instant::now();
        app.navigate(Route::Websites);
        press(&mut app, &[KeyCode::Char('n')], now);
        type_text(&mut app, "q", now);
        assert_eq!(app.route, Route::AddWebsite);
        press(&mut app, &[KeyCode::Esc], now);
        assert_eq!(app.route, Route::Websites);
        assert!(app.website_form.is_none());
    }

    #[test]
    fn quit_and_route_keys() {
        let (mut app, _, _) = app();
        let now = Instant::now();
        press(&mut app, &[KeyCode::Char('4')], now);
        assert_eq!(app.route, Route::Commands);
        press(&mut app, &[KeyCode::Right], now);
        assert_eq!(app.route, Route::Websites);
        press(&mut app, &[KeyCode::Right], now);
        assert_eq!(app.route, Route::Dashboard);
        assert!(app.handle_key(key(KeyCode::Char('q')), now).unwrap());
    }

    #[test]
    fn dashboard_counts_seed_data() {
        let commands = dv_store::seed::sample_commands().unwrap();
        let websites = dv_store::seed::sample_websites().unwrap();
        let now = "2024-01-16T00:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let stats = dashboard_stats(&commands, &websites, now);

        assert_eq!(stats.commands, 8);
        assert_eq!(stats.websites, 10);
        assert_eq!(stats.categories_in_use, 7 + 5);
        assert_eq!(stats.added_this_week, 7 + 7);
        assert_eq!(stats.command_categories[0], ("Git", 1));
        assert!(stats.command_categories.contains(&("Terminal", 2)));

        let recent = most_recent(&websites, 3);
        let names: Vec<&str> = recent.iter().map(|w| w.name.as_str()).collect();
        assert_eq!(names, vec!["React Documentation", "Tailwind CSS", "GitHub"]);
    }
}
