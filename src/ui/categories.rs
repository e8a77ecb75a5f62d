//! Category management screen
//!
//! A two-field creation form above the table of existing categories.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap},
    Frame,
};

use crate::app::{App, FormField};
use crate::categories::FieldError;

/// Renders the category screen
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Length(1),
            Constraint::Min(4),
            Constraint::Length(1),
        ])
        .split(area);

    let title = Paragraph::new(Line::from(Span::styled(
        "Category Management",
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )));
    frame.render_widget(title, chunks[0]);

    render_field(
        frame,
        chunks[1],
        "Category Name *",
        &app.form.name,
        app.focus == FormField::Name,
        app.busy,
    );
    render_field(
        frame,
        chunks[2],
        "Category Description *",
        &app.form.description,
        app.focus == FormField::Description,
        app.busy,
    );
    render_errors(frame, chunks[3], &app.form_errors, app.busy);
    render_table(frame, chunks[4], app);

    let hint = "tab switch field  enter next/create  esc back  ctrl+c quit";
    super::render_footer(frame, chunks[5], app.toasts.latest().as_ref(), hint);
}

fn render_field(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    value: &str,
    focused: bool,
    disabled: bool,
) {
    let border_color = if disabled {
        Color::DarkGray
    } else if focused {
        Color::Yellow
    } else {
        Color::Gray
    };
    let text = if focused && !disabled {
        format!("{}\u{258F}", value)
    } else {
        value.to_string()
    };

    let input = Paragraph::new(text).wrap(Wrap { trim: false }).block(
        Block::default()
            .title(format!(" {} ", label))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color)),
    );
    frame.render_widget(input, area);
}

fn render_errors(frame: &mut Frame, area: Rect, errors: &[FieldError], busy: bool) {
    let line = if busy {
        Line::from(Span::styled("Working...", Style::default().fg(Color::Yellow)))
    } else {
        Line::from(
            errors
                .iter()
                .map(|e| Span::styled(format!("{}  ", e), Style::default().fg(Color::LightRed)))
                .collect::<Vec<_>>(),
        )
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn render_table(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(" Existing Categories ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    if app.categories.is_empty() {
        let message = if app.categories_loaded {
            "No categories found"
        } else {
            "Loading categories..."
        };
        let empty = Paragraph::new(message)
            .style(Style::default().fg(Color::Gray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let header = Row::new(vec![Cell::from("Name"), Cell::from("Description")])
        .style(Style::default().add_modifier(Modifier::BOLD));
    let rows = app.categories.iter().enumerate().map(|(i, category)| {
        let style = if i % 2 == 0 {
            Style::default()
        } else {
            Style::default().fg(Color::Gray)
        };
        Row::new(vec![
            Cell::from(category.name.clone()),
            Cell::from(category.description_or_default().to_string()),
        ])
        .style(style)
    });

    let table = Table::new(rows, [Constraint::Percentage(30), Constraint::Percentage(70)])
        .header(header)
        .block(block);
    frame.render_widget(table, area);
}
