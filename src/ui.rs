use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Tabs, Wrap},
};

use crate::controller::Pane;
use crate::editor::TextEditor;
use crate::engine::RenderedForm;
use crate::form::{FieldState, FormState};

pub struct UiContext<'a> {
    pub title: Option<String>,
    pub focus: Pane,
    pub schema_editor: &'a mut TextEditor,
    pub ui_schema_editor: &'a mut TextEditor,
    pub error: Option<String>,
    pub form: Option<&'a RenderedForm>,
    pub build_error: Option<String>,
    pub form_data: String,
    pub status_message: String,
    pub help: Option<&'a str>,
    pub error_count: usize,
}

pub fn draw(frame: &mut Frame<'_>, mut ctx: UiContext<'_>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(3)])
        .split(frame.area());

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[0]);

    render_editors(frame, columns[0], &mut ctx);
    render_right_panel(frame, columns[1], &ctx);
    render_footer(frame, chunks[1], &ctx);
}

fn render_editors(frame: &mut Frame<'_>, area: Rect, ctx: &mut UiContext<'_>) {
    let constraints: Vec<Constraint> = if ctx.error.is_some() {
        vec![
            Constraint::Percentage(45),
            Constraint::Percentage(45),
            Constraint::Min(3),
        ]
    } else {
        vec![Constraint::Percentage(50), Constraint::Percentage(50)]
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    render_editor(
        frame,
        chunks[0],
        "JSON Schema",
        ctx.schema_editor,
        ctx.focus == Pane::Schema,
    );
    render_editor(
        frame,
        chunks[1],
        "UI Schema (optional)",
        ctx.ui_schema_editor,
        ctx.focus == Pane::UiSchema,
    );

    if let Some(error) = &ctx.error {
        let widget = Paragraph::new(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )))
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Error"));
        frame.render_widget(widget, chunks[2]);
    }
}

fn render_editor(
    frame: &mut Frame<'_>,
    area: Rect,
    title: &str,
    editor: &mut TextEditor,
    focused: bool,
) {
    let border_style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(title);
    let inner = block.inner(area);

    editor.scroll_to_cursor(inner.height as usize);
    let paragraph = Paragraph::new(editor.text())
        .scroll((editor.scroll() as u16, 0))
        .block(block);
    frame.render_widget(paragraph, area);

    if focused && inner.height > 0 {
        let x = inner
            .x
            .saturating_add(editor.display_col() as u16)
            .min(inner.right().saturating_sub(1));
        let y = inner
            .y
            .saturating_add((editor.cursor_row() - editor.scroll()) as u16)
            .min(inner.bottom().saturating_sub(1));
        frame.set_cursor_position((x, y));
    }
}

fn render_right_panel(frame: &mut Frame<'_>, area: Rect, ctx: &UiContext<'_>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Percentage(35)])
        .split(area);

    render_preview(frame, chunks[0], ctx);
    render_form_data(frame, chunks[1], ctx);
}

fn render_preview(frame: &mut Frame<'_>, area: Rect, ctx: &UiContext<'_>) {
    let title = match &ctx.title {
        Some(title) => format!("Form Preview — {title}"),
        None => "Form Preview".to_string(),
    };
    let block = Block::default().borders(Borders::ALL).title(title);

    if ctx.error.is_some() {
        let placeholder = Paragraph::new("Fix the JSON to restore the preview")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(placeholder, area);
        return;
    }

    if let Some(build_error) = &ctx.build_error {
        let width = area.width.saturating_sub(2).max(1) as usize;
        let text = textwrap::fill(build_error, width);
        let widget = Paragraph::new(text)
            .style(Style::default().fg(Color::Red))
            .block(block);
        frame.render_widget(widget, area);
        return;
    }

    let Some(form) = ctx.form else {
        let placeholder = Paragraph::new("No form to show")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(placeholder, area);
        return;
    };

    if form.state.is_empty() {
        let placeholder = Paragraph::new("No editable fields in schema").block(block);
        frame.render_widget(placeholder, area);
        return;
    }

    let mut field_area = area;
    if form.state.sections.len() > 1 {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(1)])
            .split(area);
        render_tabs(frame, chunks[0], &form.state);
        field_area = chunks[1];
    }
    render_fields(frame, field_area, &form.state, ctx.focus == Pane::Preview);
}

fn render_tabs(frame: &mut Frame<'_>, area: Rect, state: &FormState) {
    let titles: Vec<Line<'static>> = state
        .sections
        .iter()
        .map(|section| Line::from(section.title.clone()))
        .collect();
    let tabs = Tabs::new(titles)
        .select(state.section_index)
        .block(Block::default().borders(Borders::ALL).title("Groups"))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(tabs, area);
}

fn render_fields(frame: &mut Frame<'_>, area: Rect, state: &FormState, focused: bool) {
    let Some(section) = state.active_section() else {
        return;
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(section.title.clone());

    if section.fields.is_empty() {
        let placeholder = Paragraph::new("This group has no fields").block(block);
        frame.render_widget(placeholder, area);
        return;
    }

    let items: Vec<ListItem<'static>> = section.fields.iter().map(build_field_row).collect();

    let mut list_state = ListState::default();
    let index = state
        .field_index
        .min(section.fields.len().saturating_sub(1));
    list_state.select(Some(index));

    let highlight = if focused {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::DIM)
    };

    let list = List::new(items)
        .block(block)
        .highlight_style(highlight)
        .highlight_symbol("» ");
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn build_field_row(field: &FieldState) -> ListItem<'static> {
    let mut label = field.schema.display_label();
    if field.schema.required {
        label.push_str(" *");
    }

    let mut lines = vec![Line::from(vec![
        Span::styled(
            label,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(": "),
        Span::styled(field.display_value(), Style::default().fg(Color::White)),
    ])];

    if let Some(description) = &field.schema.description {
        lines.push(Line::from(Span::styled(
            description.clone(),
            Style::default().fg(Color::DarkGray),
        )));
    }

    if let Some(error) = &field.error {
        lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )));
    }

    ListItem::new(lines)
}

fn render_form_data(frame: &mut Frame<'_>, area: Rect, ctx: &UiContext<'_>) {
    let widget = Paragraph::new(ctx.form_data.clone())
        .block(Block::default().borders(Borders::ALL).title("Form Data"));
    frame.render_widget(widget, area);
}

fn render_footer(frame: &mut Frame<'_>, area: Rect, ctx: &UiContext<'_>) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(area);

    let mut status = ctx.status_message.clone();
    if ctx.error_count > 0 {
        status.push_str(&format!(" • {} error(s)", ctx.error_count));
    }
    if status.trim().is_empty() {
        status = "Ready".to_string();
    }

    let status_widget = Paragraph::new(status)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Status"));
    frame.render_widget(status_widget, chunks[0]);

    let help_text = ctx.help.unwrap_or(" ");
    let help_widget = Paragraph::new(help_text.to_string())
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Actions"));
    frame.render_widget(help_widget, chunks[1]);
}
