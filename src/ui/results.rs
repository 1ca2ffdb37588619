use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};

use crate::{
    app::ResultReport,
    personal_best::{Outcome, PersonalBest},
    ui::{accuracy_color, best_label},
};

/// Heading, blurb and call to action for each outcome
pub struct VariantContent {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub action: &'static str,
}

pub fn variant_content(outcome: Outcome) -> VariantContent {
    match outcome {
        Outcome::Baseline => VariantContent {
            title: "Baseline Established!",
            subtitle: "You've set the bar. Now the real challenge begins: time to beat it.",
            action: "Beat This Score",
        },
        Outcome::Standard => VariantContent {
            title: "Test Complete!",
            subtitle: "Solid run. Keep pushing to beat your high score.",
            action: "Go Again",
        },
        Outcome::Improved => VariantContent {
            title: "High Score Smashed!",
            subtitle: "You're getting faster. That was incredible typing.",
            action: "Go Again",
        },
    }
}

pub(crate) fn render_results(
    report: &ResultReport,
    best: Option<&PersonalBest>,
    area: Rect,
    buf: &mut Buffer,
) {
    let content = variant_content(report.decision.outcome);
    let result = &report.result;

    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let title_style = match report.decision.outcome {
        Outcome::Improved => bold_style.fg(Color::Yellow),
        _ => bold_style.fg(Color::Green),
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(super::HORIZONTAL_MARGIN)
        .vertical_margin(super::VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(1), // personal best
            Constraint::Min(1),
            Constraint::Length(1), // title
            Constraint::Length(2), // subtitle
            Constraint::Length(1),
            Constraint::Length(1), // stats
            Constraint::Min(1),
            Constraint::Length(1), // legend
        ])
        .split(area);

    Paragraph::new(Span::styled(best_label(best), bold_style)).render(chunks[0], buf);

    Paragraph::new(Span::styled(content.title, title_style))
        .alignment(Alignment::Center)
        .render(chunks[2], buf);

    Paragraph::new(Span::styled(
        content.subtitle,
        Style::default().add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .render(chunks[3], buf);

    Paragraph::new(Line::from(vec![
        Span::raw("WPM: "),
        Span::styled(result.wpm.to_string(), bold_style),
        Span::raw("   Accuracy: "),
        Span::styled(
            format!("{}%", result.accuracy),
            bold_style.fg(accuracy_color(result.accuracy)),
        ),
        Span::raw("   Characters: "),
        Span::styled(result.correct_chars.to_string(), bold_style.fg(Color::Green)),
        Span::raw("/"),
        Span::styled(result.incorrect_chars.to_string(), bold_style.fg(Color::Red)),
    ]))
    .alignment(Alignment::Center)
    .render(chunks[5], buf);

    Paragraph::new(Span::styled(
        format!("(enter) {} / (esc)ape", content.action),
        Style::default().add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
    .render(chunks[7], buf);
}
