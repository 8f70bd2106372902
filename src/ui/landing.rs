use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};

use crate::app::{App, LandingField, LandingForm};
use crate::models::{MAX_NUM_QUESTIONS, UNKNOWN_CATEGORY, category_name};
use crate::store::KeyValueStore;

use super::{centered, format_seconds};

const FORM_WIDTH: u16 = 56;
const FORM_HEIGHT: u16 = 19;

pub fn render<Q, K: KeyValueStore>(frame: &mut Frame, area: Rect, app: &App<Q, K>) {
    let form = app.form();
    let panel = centered(area, FORM_WIDTH.min(area.width), FORM_HEIGHT.min(area.height));

    let mut content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "QUIZMASTER",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from("Open Trivia Database".fg(Color::DarkGray)),
        Line::from(""),
        field_line(form, LandingField::Category, "Category", category_label(form)),
        field_line(
            form,
            LandingField::Difficulty,
            "Difficulty",
            form.settings.difficulty.label().to_string(),
        ),
        field_line(
            form,
            LandingField::Amount,
            "Questions",
            format!("{} (max {MAX_NUM_QUESTIONS})", form.settings.num_questions),
        ),
        Line::from(""),
        start_line(form, app.is_loading()),
        Line::from(""),
    ];

    let best = app
        .best_time(form.settings.difficulty)
        .map(format_seconds)
        .unwrap_or_else(|| "none yet".to_string());
    content.push(Line::from(
        format!("Best time ({}): {best}", form.settings.difficulty.label()).fg(Color::DarkGray),
    ));

    if let Some(status) = app.status() {
        content.push(Line::from(""));
        content.push(Line::from(Span::styled(
            status,
            Style::default().fg(Color::Red).bold(),
        )));
    }

    let widget = Paragraph::new(content)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Color::DarkGray)
                .padding(Padding::horizontal(1)),
        );
    frame.render_widget(widget, panel);

    let controls = Rect {
        y: area.bottom().saturating_sub(2),
        height: 1,
        ..area
    };
    frame.render_widget(
        Paragraph::new("j/k field  ·  h/l change  ·  enter start  ·  q quit")
            .alignment(Alignment::Center)
            .fg(Color::DarkGray),
        controls,
    );
}

fn category_label(form: &LandingForm) -> String {
    let id = &form.settings.category;
    if id.is_empty() {
        return "Select a category".to_string();
    }
    match category_name(id) {
        UNKNOWN_CATEGORY => format!("{UNKNOWN_CATEGORY} ({id})"),
        name => name.to_string(),
    }
}

fn field_line(form: &LandingForm, field: LandingField, label: &str, value: String) -> Line<'static> {
    let focused = form.focus == field;
    let style = if focused {
        Style::default().fg(Color::Cyan).bold()
    } else {
        Style::default().fg(Color::Gray)
    };
    let (left, right) = if focused { ("< ", " >") } else { ("  ", "  ") };

    Line::from(vec![
        Span::styled(format!("{label:>10}: "), Style::default().fg(Color::DarkGray)),
        Span::styled(left, style),
        Span::styled(value, style),
        Span::styled(right, style),
    ])
}

fn start_line(form: &LandingForm, loading: bool) -> Line<'static> {
    if loading {
        return Line::from(Span::styled(
            "Loading Quiz...",
            Style::default().fg(Color::Yellow).bold(),
        ));
    }
    let style = if form.focus == LandingField::Start {
        Style::default().fg(Color::Black).bg(Color::Green).bold()
    } else {
        Style::default().fg(Color::Green).bold()
    };
    Line::from(Span::styled(" Start Quiz ", style))
}
