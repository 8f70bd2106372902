use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Gauge, Padding, Paragraph, Wrap},
};

use crate::app::{App, Reveal};
use crate::models::Question;
use crate::store::KeyValueStore;

use super::centered;

const OPTION_LABELS: [char; 9] = ['A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I'];

pub fn render<Q, K: KeyValueStore>(frame: &mut Frame, area: Rect, app: &App<Q, K>) {
    let session = app.session();
    let Some(question) = session.current_question() else {
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Length(1), // Header
        Constraint::Length(1), // Progress bar
        Constraint::Length(1), // Score
        Constraint::Length(5), // Question text
        Constraint::Min(6),    // Options
        Constraint::Length(1), // Controls
    ])
    .margin(1)
    .split(area);

    render_header(frame, chunks[0], app);
    render_progress(frame, chunks[1], session.progress());
    render_score(frame, chunks[2], session.score(), session.answered_count());
    render_question_text(frame, chunks[3], question.prompt());
    render_options(frame, chunks[4], question, app.selected_option(), app.reveal());
    render_controls(frame, chunks[5], app.reveal().is_some());

    if app.confirming_exit() {
        render_exit_prompt(frame, area);
    }
}

fn render_header<Q, K: KeyValueStore>(frame: &mut Frame, area: Rect, app: &App<Q, K>) {
    let session = app.session();
    let settings = session.settings();

    let [left, right] =
        Layout::horizontal([Constraint::Fill(1), Constraint::Length(20)]).areas(area);

    let info = Line::from(vec![
        Span::styled(settings.category_name(), Style::default().fg(Color::Cyan).bold()),
        Span::styled("  ·  ", Style::default().fg(Color::DarkGray)),
        Span::styled(settings.difficulty.label(), Style::default().fg(Color::Yellow)),
    ]);
    frame.render_widget(Paragraph::new(info), left);

    let counter = format!(
        "Question {} of {}",
        session.current_index() + 1,
        session.total()
    );
    frame.render_widget(
        Paragraph::new(counter)
            .alignment(Alignment::Right)
            .fg(Color::DarkGray),
        right,
    );
}

fn render_progress(frame: &mut Frame, area: Rect, progress: f64) {
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Cyan).bg(Color::DarkGray))
        .ratio(progress.clamp(0.0, 1.0))
        .label(format!("{:.0}%", progress * 100.0));
    frame.render_widget(gauge, area);
}

fn render_score(frame: &mut Frame, area: Rect, score: usize, answered: usize) {
    let line = Line::from(vec![
        Span::styled("Score ", Style::default().fg(Color::DarkGray)),
        Span::styled(score.to_string(), Style::default().fg(Color::Green).bold()),
        Span::styled("  ·  Answered ", Style::default().fg(Color::DarkGray)),
        Span::styled(answered.to_string(), Style::default().fg(Color::White)),
    ]);
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Right), area);
}

fn render_question_text(frame: &mut Frame, area: Rect, text: &str) {
    let widget = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(Color::White).bold())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .padding(Padding::horizontal(1)),
        );
    frame.render_widget(widget, area);
}

fn render_options(
    frame: &mut Frame,
    area: Rect,
    question: &Question,
    selected: usize,
    reveal: Option<&Reveal>,
) {
    let correct_index = question.correct_index();
    let mut lines: Vec<Line> = Vec::with_capacity(question.presented_answers().len() * 2);

    for (index, option) in question.presented_answers().iter().enumerate() {
        let (marker, style) = match reveal {
            Some(_) if Some(index) == correct_index => ("+", Style::default().fg(Color::Green).bold()),
            Some(reveal) if reveal.selected == index => ("x", Style::default().fg(Color::Red).bold()),
            Some(_) => (" ", Style::default().fg(Color::DarkGray)),
            None if index == selected => (">", Style::default().fg(Color::Cyan).bold()),
            None => (" ", Style::default().fg(Color::Gray)),
        };
        let label = OPTION_LABELS.get(index).copied().unwrap_or('?');

        lines.push(Line::from(vec![
            Span::styled(format!(" {marker} "), style),
            Span::styled(format!("{label}. "), style),
            Span::styled(option.as_str(), style),
        ]));
        lines.push(Line::from(""));
    }

    if let Some(reveal) = reveal {
        let verdict = if reveal.outcome.correct {
            Span::styled("Correct!", Style::default().fg(Color::Green).bold())
        } else {
            Span::styled(
                format!("Wrong. The answer is {}", reveal.outcome.correct_answer),
                Style::default().fg(Color::Red).bold(),
            )
        };
        lines.push(Line::from(verdict));
    }

    let widget = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect, revealing: bool) {
    let text = if revealing {
        "next question coming up..."
    } else {
        "j/k navigate  ·  enter or 1-4 answer  ·  q exit"
    };
    let widget = Paragraph::new(text)
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}

fn render_exit_prompt(frame: &mut Frame, area: Rect) {
    let popup = centered(area, 50.min(area.width), 7.min(area.height));
    let content = vec![
        Line::from(""),
        Line::from("Are you sure you want to exit?".bold()),
        Line::from("Your progress will be lost.".fg(Color::DarkGray)),
        Line::from(""),
        Line::from(vec![
            Span::styled("y", Style::default().fg(Color::Red).bold()),
            Span::raw(" exit  ·  "),
            Span::styled("n", Style::default().fg(Color::Green).bold()),
            Span::raw(" keep playing"),
        ]),
    ];

    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(content).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Color::Yellow),
        ),
        popup,
    );
}
