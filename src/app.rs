use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::catalog::{Catalog, OTHER_REP_CODE};
use crate::clipboard::Clipboard;
use crate::clock::Clock;
use crate::config::Config;
use crate::engine::entry::RepresentativeEntry;
use crate::session::Session;
use crate::ui::line_input::{InputResult, LineInput, PromptField};
use crate::ui::theme::Theme;

const STATUS_TTL: Duration = Duration::from_secs(3);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Editing,
    Displaying,
}

/// One focusable line of the current entry card.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Row {
    RepCode,
    Categories,
    Product { category: String, name: String },
    CustomProduct(String),
    AddCustom,
    AccProfit,
}

pub enum Overlay {
    None,
    RepPicker { selected: usize },
    Prompt {
        field: PromptField,
        input: LineInput,
        /// Value restored on cancel for fields that update live.
        original: String,
    },
    ConfirmReset,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Error,
}

pub struct StatusMessage {
    pub text: String,
    pub kind: StatusKind,
    pub shown_at: Instant,
}

pub struct App {
    pub session: Session,
    pub catalog: Arc<Catalog>,
    pub theme: &'static Theme,
    pub config: Config,
    pub current_entry: usize,
    pub row_cursor: usize,
    pub category_cursor: usize,
    pub summary_scroll: u16,
    pub overlay: Overlay,
    pub status: Option<StatusMessage>,
    pub should_quit: bool,
    clipboard: Box<dyn Clipboard>,
}

impl App {
    pub fn new(
        config: Config,
        catalog: Arc<Catalog>,
        theme: &'static Theme,
        clock: Box<dyn Clock>,
        clipboard: Box<dyn Clipboard>,
    ) -> Self {
        Self {
            session: Session::new(Arc::clone(&catalog), clock),
            catalog,
            theme,
            config,
            current_entry: 0,
            row_cursor: 0,
            category_cursor: 0,
            summary_scroll: 0,
            overlay: Overlay::None,
            status: None,
            should_quit: false,
            clipboard,
        }
    }

    pub fn screen(&self) -> AppScreen {
        if self.session.is_displaying() {
            AppScreen::Displaying
        } else {
            AppScreen::Editing
        }
    }

    pub fn entry(&self) -> Option<&RepresentativeEntry> {
        self.session.store().entry(self.current_entry)
    }

    /// Focusable rows of the current entry, derived from its state.
    pub fn rows(&self) -> Vec<Row> {
        let mut rows = vec![Row::RepCode, Row::Categories];
        let Some(entry) = self.entry() else {
            return rows;
        };

        for tag in &entry.selected_categories {
            for (name, _) in entry.products_in_category(&self.catalog, tag) {
                rows.push(Row::Product {
                    category: tag.clone(),
                    name: name.to_string(),
                });
            }
        }
        for (name, _) in entry.custom_products.iter() {
            rows.push(Row::CustomProduct(name.to_string()));
        }
        if entry.accepts_custom_products(&self.catalog) {
            rows.push(Row::AddCustom);
        }
        if entry.acc_profit_visible() {
            rows.push(Row::AccProfit);
        }
        rows
    }

    pub fn selected_row(&self) -> Row {
        self.rows()
            .into_iter()
            .nth(self.row_cursor)
            .unwrap_or(Row::RepCode)
    }

    pub fn set_status(&mut self, text: impl Into<String>, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
            shown_at: Instant::now(),
        });
    }

    pub fn on_tick(&mut self) {
        if self
            .status
            .as_ref()
            .is_some_and(|s| s.shown_at.elapsed() > STATUS_TTL)
        {
            self.status = None;
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        match self.overlay {
            Overlay::RepPicker { .. } => return self.handle_picker_key(key),
            Overlay::Prompt { .. } => return self.handle_prompt_key(key),
            Overlay::ConfirmReset => return self.handle_confirm_key(key),
            Overlay::None => {}
        }

        match self.screen() {
            AppScreen::Editing => self.handle_editing_key(key),
            AppScreen::Displaying => self.handle_displaying_key(key),
        }
    }

    pub fn handle_paste(&mut self, text: &str) {
        if let Overlay::Prompt { input, .. } = &mut self.overlay
            && input.insert_str(text) == InputResult::Changed
        {
            self.apply_live_prompt();
        }
    }

    fn handle_editing_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('X') => self.overlay = Overlay::ConfirmReset,
            KeyCode::Char('d') => self.display(),
            KeyCode::Char('a') => self.add_entry(),
            KeyCode::Tab => self.focus_entry(self.current_entry + 1),
            KeyCode::BackTab => {
                let len = self.session.store().len();
                self.focus_entry((self.current_entry + len - 1) % len);
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.row_cursor = self.row_cursor.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let last = self.rows().len().saturating_sub(1);
                self.row_cursor = (self.row_cursor + 1).min(last);
            }
            _ => self.handle_row_key(key),
        }
    }

    fn handle_row_key(&mut self, key: KeyEvent) {
        let index = self.current_entry;
        match self.selected_row() {
            Row::RepCode => match key.code {
                KeyCode::Enter => self.open_rep_picker(),
                KeyCode::Char('e') if self.entry().is_some_and(|e| e.rep_code.is_empty()) => {
                    self.open_prompt(PromptField::RepCode, "");
                }
                _ => {}
            },
            Row::Categories => {
                let count = self.catalog.categories.len();
                match key.code {
                    KeyCode::Left | KeyCode::Char('h') => {
                        self.category_cursor = self.category_cursor.saturating_sub(1);
                    }
                    KeyCode::Right | KeyCode::Char('l') => {
                        self.category_cursor = (self.category_cursor + 1).min(count.saturating_sub(1));
                    }
                    KeyCode::Enter | KeyCode::Char(' ') => {
                        let tag = self
                            .catalog
                            .categories
                            .get(self.category_cursor)
                            .map(|c| c.tag.clone());
                        if let (Some(tag), Some(store)) = (tag, self.session.editor()) {
                            store.select_category(index, &tag);
                        }
                    }
                    _ => {}
                }
            }
            Row::Product { name, .. } => {
                let Some(store) = self.session.editor() else {
                    return;
                };
                match key.code {
                    KeyCode::Right | KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Char('l') => {
                        store.increment_product(index, &name);
                    }
                    KeyCode::Left | KeyCode::Char('-') | KeyCode::Char('h') => {
                        store.decrement_product(index, &name);
                    }
                    KeyCode::Char('0') => store.set_product_quantity(index, &name, 0),
                    _ => {}
                }
            }
            Row::CustomProduct(name) => {
                let Some(store) = self.session.editor() else {
                    return;
                };
                match key.code {
                    KeyCode::Right | KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Char('l') => {
                        store.increment_custom_product(index, &name);
                    }
                    KeyCode::Left | KeyCode::Char('-') | KeyCode::Char('h') => {
                        store.decrement_custom_product(index, &name);
                    }
                    KeyCode::Char('0') => store.set_custom_product_quantity(index, &name, 0),
                    _ => {}
                }
            }
            Row::AddCustom => {
                if key.code == KeyCode::Enter {
                    self.open_prompt(PromptField::CustomProduct, "");
                }
            }
            Row::AccProfit => {
                if key.code == KeyCode::Enter {
                    let current = self.entry().map(|e| e.acc_profit.clone()).unwrap_or_default();
                    self.open_prompt(PromptField::AccProfit, &current);
                }
            }
        }
        self.clamp_cursor();
    }

    fn handle_displaying_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('c') | KeyCode::Char('y') => self.copy_summary(),
            KeyCode::Char('b') | KeyCode::Esc => {
                self.session.back();
                self.clamp_cursor();
            }
            KeyCode::Char('X') => self.overlay = Overlay::ConfirmReset,
            KeyCode::Up | KeyCode::Char('k') => {
                self.summary_scroll = self.summary_scroll.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let last = self
                    .session
                    .summary()
                    .map_or(0, |s| s.lines().count().saturating_sub(1));
                self.summary_scroll = self.summary_scroll.saturating_add(1).min(last as u16);
            }
            _ => {}
        }
    }

    fn handle_picker_key(&mut self, key: KeyEvent) {
        let Overlay::RepPicker { selected } = &mut self.overlay else {
            return;
        };
        let options = self.catalog.picker_options();
        match key.code {
            KeyCode::Esc => self.overlay = Overlay::None,
            KeyCode::Up | KeyCode::Char('k') => *selected = selected.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                *selected = (*selected + 1).min(options.len().saturating_sub(1));
            }
            KeyCode::Enter => {
                let code = options.get(*selected).map(|c| c.to_string());
                self.overlay = Overlay::None;
                if let Some(code) = code {
                    self.choose_rep_code(&code);
                }
            }
            _ => {}
        }
    }

    fn handle_prompt_key(&mut self, key: KeyEvent) {
        let Overlay::Prompt { input, .. } = &mut self.overlay else {
            return;
        };
        match input.handle(key) {
            InputResult::Continue => {}
            InputResult::Changed => self.apply_live_prompt(),
            InputResult::Submit => self.submit_prompt(),
            InputResult::Cancel => self.cancel_prompt(),
        }
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('y') => {
                self.overlay = Overlay::None;
                self.reset_all();
            }
            KeyCode::Char('n') | KeyCode::Esc => self.overlay = Overlay::None,
            _ => {}
        }
    }

    fn open_rep_picker(&mut self) {
        let options = self.catalog.picker_options();
        let current = self.entry().map(|e| e.rep_code.as_str()).unwrap_or_default();
        let selected = options.iter().position(|c| *c == current).unwrap_or(0);
        self.overlay = Overlay::RepPicker { selected };
    }

    fn open_prompt(&mut self, field: PromptField, initial: &str) {
        self.overlay = Overlay::Prompt {
            field,
            input: LineInput::new(initial),
            original: initial.to_string(),
        };
    }

    /// Re-picking the code an entry already has keeps its counts.
    pub fn choose_rep_code(&mut self, code: &str) {
        let index = self.current_entry;
        let unchanged = code != OTHER_REP_CODE && self.entry().is_some_and(|e| e.rep_code == code);
        if !unchanged && let Some(store) = self.session.editor() {
            store.set_rep_code(index, code);
        }
        self.clamp_cursor();
        if code == OTHER_REP_CODE {
            self.open_prompt(PromptField::RepCode, "");
        }
    }

    /// Rep code and profit follow every keystroke, like a bound form field.
    fn apply_live_prompt(&mut self) {
        let index = self.current_entry;
        let Overlay::Prompt { field, input, .. } = &self.overlay else {
            return;
        };
        let value = input.value();
        let field = field.clone();
        let Some(store) = self.session.editor() else {
            return;
        };
        match field {
            PromptField::RepCode => store.set_free_text_rep_code(index, &value),
            PromptField::AccProfit => store.set_acc_profit(index, &value),
            PromptField::CustomProduct => {}
        }
    }

    fn submit_prompt(&mut self) {
        let index = self.current_entry;
        let Overlay::Prompt { field, input, .. } =
            std::mem::replace(&mut self.overlay, Overlay::None)
        else {
            return;
        };
        let value = input.value();
        if let Some(store) = self.session.editor() {
            match field {
                PromptField::RepCode => store.set_free_text_rep_code(index, &value),
                PromptField::AccProfit => store.set_acc_profit(index, &value),
                PromptField::CustomProduct => store.add_custom_product(index, &value),
            }
        }
        self.clamp_cursor();
    }

    fn cancel_prompt(&mut self) {
        let index = self.current_entry;
        let Overlay::Prompt {
            field, original, ..
        } = std::mem::replace(&mut self.overlay, Overlay::None)
        else {
            return;
        };
        if let Some(store) = self.session.editor() {
            match field {
                PromptField::RepCode => store.set_free_text_rep_code(index, &original),
                PromptField::AccProfit => store.set_acc_profit(index, &original),
                PromptField::CustomProduct => {}
            }
        }
    }

    pub fn add_entry(&mut self) {
        if let Some(store) = self.session.editor() {
            store.add_entry();
            let last = store.len() - 1;
            self.focus_entry(last);
        }
    }

    pub fn focus_entry(&mut self, index: usize) {
        let len = self.session.store().len();
        self.current_entry = index % len.max(1);
        self.row_cursor = 0;
        self.category_cursor = 0;
    }

    pub fn display(&mut self) {
        self.summary_scroll = 0;
        self.session.display();
    }

    pub fn copy_summary(&mut self) {
        if self.session.copy_summary(self.clipboard.as_mut()) {
            self.set_status("Summary copied to clipboard", StatusKind::Info);
        } else {
            self.set_status("Could not copy summary", StatusKind::Error);
        }
    }

    pub fn reset_all(&mut self) {
        self.session.reset_all();
        self.focus_entry(0);
        self.summary_scroll = 0;
        self.set_status("All entries cleared", StatusKind::Info);
    }

    fn clamp_cursor(&mut self) {
        let last = self.rows().len().saturating_sub(1);
        self.row_cursor = self.row_cursor.min(last);
    }
}
