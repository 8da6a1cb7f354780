use std::io::{self, Stdout};
use std::ops::{Deref, DerefMut};

use anyhow::{Context, Result};
use crossterm::{
    event::{
        self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyCode, KeyEvent,
        KeyEventKind, KeyModifiers,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use serde_json::Value;

use crate::controller::{Controller, Pane};
use crate::defaults::{DEFAULT_SCHEMA_TEXT, DEFAULT_UI_SCHEMA_TEXT};
use crate::engine::{FormEngine, RenderedForm, SchemaFormEngine};
use crate::ui::{self, UiContext};

const HELP_TEXT: &str =
    "Tab/Shift+Tab switch pane • Up/Down move • Ctrl+Tab next group • Ctrl+R reset • Ctrl+Q quit";
const READY_STATUS: &str = "Ready. Tab switches panes.";

#[derive(Debug, Clone)]
pub struct UiOptions {
    pub show_help: bool,
}

impl Default for UiOptions {
    fn default() -> Self {
        Self { show_help: true }
    }
}

/// Builder for the playground session. `run` blocks until the user quits
/// and returns the final form data.
#[derive(Debug, Default)]
pub struct Playground {
    schema_text: Option<String>,
    ui_schema_text: Option<String>,
    title: Option<String>,
    options: UiOptions,
}

impl Playground {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_schema_text(mut self, text: impl Into<String>) -> Self {
        self.schema_text = Some(text.into());
        self
    }

    pub fn with_ui_schema_text(mut self, text: impl Into<String>) -> Self {
        self.ui_schema_text = Some(text.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_options(mut self, options: UiOptions) -> Self {
        self.options = options;
        self
    }

    pub fn run(self) -> Result<Value> {
        let Playground {
            schema_text,
            ui_schema_text,
            title,
            options,
        } = self;

        let controller = Controller::from_texts(
            schema_text.as_deref().unwrap_or(DEFAULT_SCHEMA_TEXT),
            ui_schema_text.as_deref().unwrap_or(DEFAULT_UI_SCHEMA_TEXT),
        );
        let mut app = App::new(controller, title, options);
        app.run()
    }
}

struct App {
    controller: Controller,
    engine: SchemaFormEngine,
    form: Option<RenderedForm>,
    build_error: Option<String>,
    focus: Pane,
    status_message: String,
    validation_errors: usize,
    should_quit: bool,
    title_override: Option<String>,
    options: UiOptions,
}

impl App {
    fn new(controller: Controller, title_override: Option<String>, options: UiOptions) -> Self {
        let mut app = Self {
            controller,
            engine: SchemaFormEngine,
            form: None,
            build_error: None,
            focus: Pane::Schema,
            status_message: READY_STATUS.to_string(),
            validation_errors: 0,
            should_quit: false,
            title_override,
            options,
        };
        app.refresh_preview();
        app
    }

    fn run(&mut self) -> Result<Value> {
        let mut terminal = TerminalGuard::new()?;
        while !self.should_quit {
            terminal.draw(|frame| self.draw(frame))?;
            match event::read()? {
                Event::Key(key) => self.handle_key(key),
                Event::Paste(text) => self.handle_paste(&text),
                Event::Resize(_, _) => {}
                Event::Mouse(_) => {}
                Event::FocusGained | Event::FocusLost => {}
            }
        }
        Ok(self.controller.form_data().clone())
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let title = self
            .title_override
            .clone()
            .or_else(|| self.form.as_ref().and_then(|form| form.model.title.clone()));
        let help = if self.options.show_help {
            Some(HELP_TEXT)
        } else {
            None
        };
        let error = self.controller.active_error().map(str::to_string);
        let form_data = self.controller.form_data_pretty();

        ui::draw(
            frame,
            UiContext {
                title,
                focus: self.focus,
                schema_editor: &mut self.controller.schema_editor,
                ui_schema_editor: &mut self.controller.ui_schema_editor,
                error,
                form: self.form.as_ref(),
                build_error: self.build_error.clone(),
                form_data,
                status_message: self.status_message.clone(),
                help,
                error_count: self.validation_errors,
            },
        );
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Char('c')
                | KeyCode::Char('C') => {
                    self.should_quit = true;
                }
                KeyCode::Char('r') | KeyCode::Char('R') => {
                    self.controller.reset_to_defaults();
                    self.refresh_preview();
                    self.status_message = "Editors reset to defaults".to_string();
                }
                KeyCode::Tab => {
                    if self.focus == Pane::Preview
                        && let Some(form) = self.form.as_mut()
                    {
                        form.state.focus_next_section(1);
                    }
                }
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Tab => {
                self.focus = next_pane(self.focus, 1);
                self.announce_focus();
            }
            KeyCode::BackTab => {
                self.focus = next_pane(self.focus, -1);
                self.announce_focus();
            }
            KeyCode::Esc => {
                self.status_message = READY_STATUS.to_string();
            }
            _ => match self.focus {
                Pane::Schema => {
                    if self.controller.schema_editor.handle_key(&key) {
                        self.controller.sync_schema();
                        self.refresh_preview();
                    }
                }
                Pane::UiSchema => {
                    if self.controller.ui_schema_editor.handle_key(&key) {
                        self.controller.sync_ui_schema();
                        self.refresh_preview();
                    }
                }
                Pane::Preview => self.handle_preview_key(&key),
            },
        }
    }

    fn handle_paste(&mut self, text: &str) {
        match self.focus {
            Pane::Schema => {
                self.controller.schema_editor.insert_str(text);
                self.controller.sync_schema();
                self.refresh_preview();
            }
            Pane::UiSchema => {
                self.controller.ui_schema_editor.insert_str(text);
                self.controller.sync_ui_schema();
                self.refresh_preview();
            }
            Pane::Preview => {}
        }
    }

    fn handle_preview_key(&mut self, key: &KeyEvent) {
        let Some(form) = self.form.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Up => form.state.focus_prev_field(),
            KeyCode::Down => form.state.focus_next_field(),
            _ => {
                let Some(field) = form.state.focused_field_mut() else {
                    return;
                };
                if field.handle_key(key) {
                    let label = field.schema.display_label();
                    self.apply_form_change();
                    if self.validation_errors == 0 {
                        self.status_message = format!("Updated {label}");
                    }
                }
            }
        }
    }

    /// Pull a change event out of the rendered form and mirror it into the
    /// controller. Validation errors only reach the status line.
    fn apply_form_change(&mut self) {
        let Some(form) = self.form.as_mut() else {
            return;
        };
        match form.change() {
            Some(change) => {
                self.validation_errors = change.errors.len();
                self.controller.on_form_change(change.data, &change.errors);
                if !change.errors.is_empty() {
                    self.status_message =
                        format!("{} validation issue(s)", change.errors.len());
                }
            }
            None => {
                self.validation_errors = form.state.error_count();
                self.status_message = "Value rejected; see the field error".to_string();
            }
        }
    }

    /// Rebuild the preview from the current texts. Only invoked when both
    /// panes hold valid JSON; the current form data is seeded back in.
    fn refresh_preview(&mut self) {
        self.form = None;
        self.build_error = None;
        self.validation_errors = 0;

        if !self.controller.preview_enabled() {
            return;
        }
        let Some(schema) = self.controller.parsed_schema() else {
            return;
        };
        let ui_schema = self.controller.parsed_ui_schema();

        match self
            .engine
            .build(&schema, ui_schema.as_ref(), self.controller.form_data())
        {
            Ok(form) => self.form = Some(form),
            Err(err) => self.build_error = Some(format!("{err:#}")),
        }
    }

    fn announce_focus(&mut self) {
        self.status_message = match self.focus {
            Pane::Schema => "Editing JSON Schema".to_string(),
            Pane::UiSchema => "Editing UI Schema".to_string(),
            Pane::Preview => "Form preview: Up/Down to move, type to edit".to_string(),
        };
    }
}

fn next_pane(current: Pane, delta: i32) -> Pane {
    const ORDER: [Pane; 3] = [Pane::Schema, Pane::UiSchema, Pane::Preview];
    let index = ORDER.iter().position(|pane| *pane == current).unwrap_or(0) as i32;
    let len = ORDER.len() as i32;
    ORDER[(((index + delta) % len + len) % len) as usize]
}

struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalGuard {
    fn new() -> Result<Self> {
        enable_raw_mode().context("failed to enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)
            .context("failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend).context("failed to initialize terminal")?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableBracketedPaste
        );
        let _ = self.terminal.show_cursor();
    }
}

impl Deref for TerminalGuard {
    type Target = Terminal<CrosstermBackend<Stdout>>;

    fn deref(&self) -> &Self::Target {
        &self.terminal
    }
}

impl DerefMut for TerminalGuard {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.terminal
    }
}
