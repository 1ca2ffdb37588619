pub mod results;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::{
    app::{App, AppState},
    metrics::{AccuracyBand, CharStatus, CharacterStatus},
    personal_best::{KeyValueStore, PersonalBest},
    timer::Clock,
};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;

pub(crate) fn accuracy_color(accuracy: u32) -> Color {
    match AccuracyBand::of(accuracy) {
        AccuracyBand::High => Color::Green,
        AccuracyBand::Medium => Color::Yellow,
        AccuracyBand::Low => Color::Red,
    }
}

pub(crate) fn best_label(best: Option<&PersonalBest>) -> String {
    match best {
        Some(best) => format!("Personal best: {} WPM", best.wpm),
        None => "Personal best: -".to_string(),
    }
}

impl<S: KeyValueStore, C: Clock> Widget for &App<S, C> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.state {
            AppState::Start => {
                render_typing(self, area, buf);
                render_start_overlay(area, buf);
            }
            AppState::Typing => render_typing(self, area, buf),
            AppState::Results => match self.report() {
                Some(report) => results::render_results(report, self.best(), area, buf),
                None => render_typing(self, area, buf),
            },
        }
    }
}

fn render_typing<S: KeyValueStore, C: Clock>(app: &App<S, C>, area: Rect, buf: &mut Buffer) {
    let test = &app.test;
    let stats = test.live_stats();

    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let dim_style = Style::default().add_modifier(Modifier::DIM);
    let italic_style = Style::default().add_modifier(Modifier::ITALIC);

    let max_chars_per_line = area.width.saturating_sub(HORIZONTAL_MARGIN * 2).max(1);
    let passage_width = test.passage().width();
    let passage_lines = if passage_width <= max_chars_per_line as usize {
        1
    } else {
        ((passage_width as f64 / max_chars_per_line as f64).ceil() + 1.0) as u16
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Length(1), // settings
            Constraint::Min(1),    // padding
            Constraint::Length(1), // live stats
            Constraint::Length(1), // padding
            Constraint::Length(passage_lines),
            Constraint::Min(1), // padding
            Constraint::Length(1), // legend
        ])
        .split(area);

    Paragraph::new(Line::from(vec![
        Span::styled("typist", bold_style.fg(Color::Cyan)),
        Span::raw("   "),
        Span::styled(best_label(app.best()), bold_style),
    ]))
    .render(chunks[0], buf);

    Paragraph::new(Span::styled(
        format!(
            "Difficulty: {}   Mode: {}",
            test.difficulty().label(),
            test.mode().label()
        ),
        dim_style,
    ))
    .render(chunks[1], buf);

    Paragraph::new(Line::from(vec![
        Span::raw("WPM: "),
        Span::styled(stats.wpm.to_string(), bold_style),
        Span::raw("   Accuracy: "),
        Span::styled(
            format!("{}%", stats.accuracy),
            bold_style.fg(accuracy_color(stats.accuracy)),
        ),
        Span::raw("   Time: "),
        Span::styled(stats.formatted_time.clone(), bold_style.fg(Color::Yellow)),
    ]))
    .alignment(Alignment::Center)
    .render(chunks[3], buf);

    let show_cursor = !test.is_finished();
    let spans: Vec<Span> = stats
        .character_statuses
        .iter()
        .enumerate()
        .map(|(idx, cs)| passage_span(cs, show_cursor && idx == stats.current_index))
        .collect();

    Paragraph::new(Line::from(spans))
        .alignment(if passage_lines == 1 {
            // when the passage fits on one line centering it reads nicer
            Alignment::Center
        } else {
            Alignment::Left
        })
        .wrap(Wrap { trim: true })
        .render(chunks[5], buf);

    Paragraph::new(Span::styled(
        "(tab) restart / (↑↓) difficulty / (←→) mode / (esc)ape",
        italic_style,
    ))
    .render(chunks[7], buf);
}

fn passage_span(cs: &CharacterStatus, is_current: bool) -> Span<'static> {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);

    let (text, mut style) = match cs.status {
        CharStatus::Correct => (cs.ch.to_string(), bold_style.fg(Color::Green)),
        CharStatus::Incorrect => (
            match cs.ch {
                ' ' => "·".to_owned(),
                c => c.to_string(),
            },
            bold_style.fg(Color::Red),
        ),
        CharStatus::Untyped => (cs.ch.to_string(), bold_style.add_modifier(Modifier::DIM)),
    };

    if cs.was_error {
        style = style.add_modifier(Modifier::UNDERLINED);
    }
    if is_current {
        style = style.add_modifier(Modifier::REVERSED);
    }
    Span::styled(text, style)
}

fn render_start_overlay(area: Rect, buf: &mut Buffer) {
    let width = 44.min(area.width);
    let height = 5.min(area.height);
    let popup = Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    );

    Clear.render(popup, buf);
    Paragraph::new(vec![
        Line::from(Span::styled(
            "Start Typing Test",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "press any key, then start typing",
            Style::default().add_modifier(Modifier::ITALIC),
        )),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL))
    .wrap(Wrap { trim: true })
    .render(popup, buf);
}

#[cfg(test)]
pub(crate) fn buffer_text(buffer: &Buffer) -> String {
    let area = buffer.area();
    (area.top()..area.bottom())
        .map(|y| {
            (area.left()..area.right())
                .map(|x| buffer[(x, y)].symbol())
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}
