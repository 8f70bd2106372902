use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph},
};

use crate::app::App;
use crate::models::category_name;
use crate::session::{AnswerRecord, QuizResults};
use crate::store::KeyValueStore;

use super::format_seconds;

const QUESTION_PREVIEW_LENGTH: usize = 55;

pub fn render<Q, K: KeyValueStore>(frame: &mut Frame, area: Rect, app: &App<Q, K>) {
    let Some(results) = app.session().results() else {
        return;
    };
    let grade_color = get_grade_color(results.percentage);

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(10),
        Constraint::Fill(1),
        Constraint::Length(2),
    ])
    .margin(1)
    .split(area);

    render_score_summary(frame, chunks[1], results, grade_color);
    render_question_breakdown(frame, chunks[2], app.session().history(), app.scroll());
    render_controls(frame, chunks[3]);
}

fn get_grade_color(percentage: u32) -> Color {
    match percentage {
        80.. => Color::Green,
        60..=79 => Color::Cyan,
        40..=59 => Color::Yellow,
        _ => Color::Red,
    }
}

fn render_score_summary(frame: &mut Frame, area: Rect, results: &QuizResults, grade_color: Color) {
    let best = results
        .best_seconds
        .map(format_seconds)
        .unwrap_or_else(|| "-".to_string());

    let mut time_line = vec![
        Span::styled("Time ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            format_seconds(results.completion_seconds),
            Style::default().fg(Color::White).bold(),
        ),
        Span::styled(
            format!("  ·  Best ({}) ", results.difficulty.label()),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(best, Style::default().fg(Color::White)),
    ];
    if results.new_record {
        time_line.push(Span::styled(
            "  NEW RECORD!",
            Style::default().fg(Color::Magenta).bold(),
        ));
    }

    let content = vec![
        Line::from(Span::styled(
            "RESULTS",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(
            format!(
                "{} · {}",
                category_name(&results.category),
                results.difficulty.label()
            )
            .fg(Color::DarkGray),
        ),
        Line::from(""),
        Line::from(Span::styled(
            format!("{}/{}", results.score, results.answered),
            Style::default().fg(grade_color).bold(),
        )),
        Line::from(Span::styled(
            format!("{}% Correct  ·  {}", results.percentage, results.verdict()),
            Style::default().fg(grade_color),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Correct ", Style::default().fg(Color::DarkGray)),
            Span::styled(results.score.to_string(), Style::default().fg(Color::Green)),
            Span::styled("  ·  Incorrect ", Style::default().fg(Color::DarkGray)),
            Span::styled(results.incorrect().to_string(), Style::default().fg(Color::Red)),
            Span::styled("  ·  Total ", Style::default().fg(Color::DarkGray)),
            Span::styled(results.answered.to_string(), Style::default().fg(Color::White)),
        ]),
        Line::from(time_line),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(widget, area);
}

fn render_question_breakdown(frame: &mut Frame, area: Rect, history: &[AnswerRecord], scroll: u16) {
    let lines: Vec<Line> = history
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let (symbol, color) = if record.correct {
                ("+", Color::Green)
            } else {
                ("-", Color::Red)
            };

            let mut spans = vec![
                Span::styled(format!(" {} ", symbol), Style::default().fg(color)),
                Span::styled(
                    format!("{:2}. ", index + 1),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(truncate_question(&record.prompt), Style::default().fg(Color::Gray)),
            ];
            if !record.correct {
                spans.push(Span::styled(
                    format!("  → {}", record.correct_answer),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            Line::from(spans)
        })
        .collect();

    let widget = Paragraph::new(lines)
        .block(Block::default().padding(Padding::horizontal(1)))
        .scroll((scroll, 0));
    frame.render_widget(widget, area);
}

fn truncate_question(text: &str) -> String {
    let char_count = text.chars().count();
    if char_count > QUESTION_PREVIEW_LENGTH {
        let truncated: String = text.chars().take(QUESTION_PREVIEW_LENGTH).collect();
        format!("{}...", truncated)
    } else {
        text.to_string()
    }
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let widget = Paragraph::new("j/k scroll  ·  r retry  ·  h home  ·  q quit")
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
