//! UI rendering module for the SkillPort TUI
//!
//! This module contains all the rendering logic for the terminal user interface,
//! using the ratatui library for TUI components.

pub mod categories;
pub mod help_overlay;
pub mod reviews;

pub use categories::render as render_categories;
pub use help_overlay::render as render_help_overlay;
pub use reviews::render as render_reviews;

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::notify::{Toast, ToastLevel};

/// Renders the latest toast, or a key hint when there is none
pub fn render_footer(frame: &mut Frame, area: Rect, toast: Option<&Toast>, hint: &str) {
    let line = match toast {
        Some(toast) => {
            let (icon, color) = match toast.level {
                ToastLevel::Loading => ("\u{2026}", Color::Cyan),
                ToastLevel::Success => ("\u{2714}", Color::Green),
                ToastLevel::Error => ("\u{2716}", Color::Red),
            };
            Line::from(vec![
                Span::styled(format!(" {} ", icon), Style::default().fg(color)),
                Span::styled(toast.message.clone(), Style::default().fg(color)),
            ])
        }
        None => Line::from(Span::styled(
            format!(" {}", hint),
            Style::default().fg(Color::DarkGray),
        )),
    };
    frame.render_widget(Paragraph::new(line), area);
}
