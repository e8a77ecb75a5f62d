//! Review carousel rendering
//!
//! Shows review cards side by side, one to four depending on terminal width,
//! starting at the app's carousel index and wrapping around the list.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::data::ReviewRecord;
use crate::reviews::{ReviewSource, ReviewsView, MAX_RATING, REVIEW_EXCERPT_WORDS};

/// Minimum terminal width for each number of visible cards, widest first
const CARD_BREAKPOINTS: [(u16, usize); 3] = [(102, 4), (77, 3), (64, 2)];

/// Number of cards that fit side by side in `width` columns
pub fn cards_per_view(width: u16) -> usize {
    CARD_BREAKPOINTS
        .iter()
        .find(|(min_width, _)| width >= *min_width)
        .map(|(_, cards)| *cards)
        .unwrap_or(1)
}

/// Indices of the reviews to draw, in display order
pub fn visible_indices(start: usize, count: usize, per_view: usize) -> Vec<usize> {
    if count == 0 {
        return Vec::new();
    }
    (0..per_view.min(count)).map(|i| (start + i) % count).collect()
}

/// Five-star bar, rounding to the nearest whole star
pub fn star_bar(stars: f64) -> String {
    let filled = (stars + 0.5).floor().clamp(0.0, MAX_RATING) as usize;
    let empty = MAX_RATING as usize - filled;
    format!("{}{}", "\u{2605}".repeat(filled), "\u{2606}".repeat(empty))
}

/// Renders the carousel screen
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(frame, chunks[0], app);

    match &app.reviews {
        ReviewsView::Loaded { reviews, .. } => {
            render_cards(frame, chunks[1], reviews, app.carousel_index);
            render_position(frame, chunks[2], app);
        }
        ReviewsView::Empty => render_empty(frame, chunks[1]),
    }

    let hint = "\u{2190}/\u{2192} browse  space autoplay  r reload  c categories  ? help  q quit";
    super::render_footer(frame, chunks[3], app.toasts.latest().as_ref(), hint);
}

fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let source = match &app.reviews {
        ReviewsView::Loaded {
            source: ReviewSource::Cache,
            ..
        } => "cached",
        ReviewsView::Loaded {
            source: ReviewSource::Network,
            ..
        } => "live",
        ReviewsView::Empty => "",
    };
    let mut spans = vec![Span::styled(
        "Reviews from other learners",
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )];
    if !source.is_empty() {
        spans.push(Span::styled(
            format!("  ({})", source),
            Style::default().fg(Color::DarkGray),
        ));
    }
    if app.busy {
        spans.push(Span::styled("  loading...", Style::default().fg(Color::Yellow)));
    }

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(header, area);
}

fn render_cards(frame: &mut Frame, area: Rect, reviews: &[ReviewRecord], start: usize) {
    let indices = visible_indices(start, reviews.len(), cards_per_view(area.width));
    let constraints: Vec<Constraint> = indices
        .iter()
        .map(|_| Constraint::Ratio(1, indices.len() as u32))
        .collect();
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    for (column, index) in columns.iter().zip(indices) {
        render_card(frame, *column, &reviews[index]);
    }
}

fn render_card(frame: &mut Frame, area: Rect, review: &ReviewRecord) {
    let name = review.author_name();
    let lines = vec![
        Line::from(Span::styled(
            review.course_name().to_string(),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
        Line::from(review.excerpt(REVIEW_EXCERPT_WORDS)),
        Line::from(""),
        Line::from(vec![
            Span::styled(
                review.rating_label(),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
            Span::styled(star_bar(review.stars()), Style::default().fg(Color::Yellow)),
        ]),
    ];

    let block = Block::default()
        .title(format!(" {} ", if name.is_empty() { "Anonymous" } else { name.as_str() }))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    let card = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: true });
    frame.render_widget(card, area);
}

fn render_position(frame: &mut Frame, area: Rect, app: &App) {
    let status = if app.autoplay { "autoplay" } else { "paused" };
    let text = format!(
        "{} / {}  {}",
        app.carousel_index + 1,
        app.review_count(),
        status
    );
    let paragraph = Paragraph::new(text)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

fn render_empty(frame: &mut Frame, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(45),
            Constraint::Length(1),
            Constraint::Percentage(45),
        ])
        .split(area);

    let text = Paragraph::new("No reviews available yet")
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center);
    frame.render_widget(text, chunks[1]);
}
