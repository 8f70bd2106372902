mod landing;
mod quiz;
mod result;

use ratatui::{layout::Flex, prelude::*, widgets::Block};

use crate::app::App;
use crate::screen::Screen;
use crate::store::KeyValueStore;

pub fn render<Q, K: KeyValueStore>(frame: &mut Frame, app: &App<Q, K>) {
    let area = frame.area();
    frame.render_widget(Block::default().bg(Color::Reset), area);

    match app.screen() {
        Screen::Landing => landing::render(frame, area, app),
        Screen::Quiz => quiz::render(frame, area, app),
        Screen::Results => result::render(frame, area, app),
    }
}

/// `42s`, or `3m 07s` from a minute up.
pub(crate) fn format_seconds(seconds: u64) -> String {
    if seconds < 60 {
        format!("{seconds}s")
    } else {
        format!("{}m {:02}s", seconds / 60, seconds % 60)
    }
}

/// A `width` x `height` rectangle centered in `area`.
pub(crate) fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);
    cell
}
