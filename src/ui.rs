use std::cell::Cell;
use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
    MouseEvent, MouseEventKind,
};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction as LayoutDirection, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Padding, Paragraph, Wrap};
use ratatui::{Frame, Terminal};
use textwrap::wrap;
use unicode_width::UnicodeWidthStr;

use crate::catalog::Catalog;
use crate::config::Config;
use crate::feed::{FeedMode, FeedSession, VideoEntry};
use crate::navigation::Direction;
use crate::picker::CategoryPicker;
use crate::viewer::{self, FeedView};

/// Colours for one `ui.theme`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Palette {
    bg: Color,
    panel_bg: Color,
    panel_selected_bg: Color,
    card_bg: Color,
    border_idle: Color,
    border_focused: Color,
    text_primary: Color,
    text_secondary: Color,
    caption: Color,
    accent: Color,
    success: Color,
}

const PALETTE_DEFAULT: Palette = Palette {
    bg: Color::Rgb(30, 30, 46),
    panel_bg: Color::Rgb(24, 24, 36),
    panel_selected_bg: Color::Rgb(69, 71, 90),
    card_bg: Color::Black,
    border_idle: Color::Rgb(49, 50, 68),
    border_focused: Color::Rgb(137, 180, 250),
    text_primary: Color::Rgb(205, 214, 244),
    text_secondary: Color::Rgb(166, 173, 200),
    caption: Color::White,
    accent: Color::Rgb(137, 180, 250),
    success: Color::Rgb(166, 227, 161),
};

const PALETTE_LIGHT: Palette = Palette {
    bg: Color::Rgb(239, 241, 245),
    panel_bg: Color::Rgb(230, 233, 239),
    panel_selected_bg: Color::Rgb(204, 208, 218),
    card_bg: Color::Rgb(220, 224, 232),
    border_idle: Color::Rgb(188, 192, 204),
    border_focused: Color::Rgb(30, 102, 245),
    text_primary: Color::Rgb(76, 79, 105),
    text_secondary: Color::Rgb(108, 111, 133),
    caption: Color::Rgb(17, 17, 27),
    accent: Color::Rgb(30, 102, 245),
    success: Color::Rgb(64, 160, 43),
};

/// Named ANSI colours only, for terminals without truecolor.
const PALETTE_MONO: Palette = Palette {
    bg: Color::Reset,
    panel_bg: Color::Reset,
    panel_selected_bg: Color::DarkGray,
    card_bg: Color::Reset,
    border_idle: Color::DarkGray,
    border_focused: Color::White,
    text_primary: Color::White,
    text_secondary: Color::Gray,
    caption: Color::White,
    accent: Color::White,
    success: Color::White,
};

impl Palette {
    fn for_theme(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "" | "default" | "dark" => PALETTE_DEFAULT,
            "light" => PALETTE_LIGHT,
            "mono" => PALETTE_MONO,
            other => {
                tracing::warn!(theme = other, "unknown theme, using default");
                PALETTE_DEFAULT
            }
        }
    }
}

const FEED_MAX_WIDTH: u16 = 56;
const BUTTON_COLUMN_WIDTH: u16 = 9;
const WHEEL_STEP: i32 = 2;
const IDLE_TICK: Duration = Duration::from_millis(120);
const ANIMATION_TICK: Duration = Duration::from_millis(16);

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

struct Spinner {
    index: usize,
    last_tick: Instant,
}

impl Spinner {
    fn new() -> Self {
        Self {
            index: 0,
            last_tick: Instant::now(),
        }
    }

    fn frame(&self) -> &'static str {
        SPINNER_FRAMES[self.index % SPINNER_FRAMES.len()]
    }

    fn advance(&mut self) -> bool {
        let now = Instant::now();
        if now.duration_since(self.last_tick) >= IDLE_TICK {
            self.index = (self.index + 1) % SPINNER_FRAMES.len();
            self.last_tick = now;
            true
        } else {
            false
        }
    }

    fn reset(&mut self) {
        self.index = 0;
        self.last_tick = Instant::now();
    }
}

enum Screen {
    Picker,
    Feed(Box<FeedView>),
}

#[derive(Clone)]
pub struct Options {
    pub config: Config,
    pub catalog: Catalog,
    /// Skips the picker and opens the feed straight away. An empty list
    /// opens the static catalog feed.
    pub selection: Option<Vec<String>>,
}

pub struct Model {
    config: Config,
    catalog: Catalog,
    picker: CategoryPicker,
    picker_state: ListState,
    screen: Screen,
    status_message: String,
    notice: Option<String>,
    palette: Palette,
    spinner: Spinner,
    needs_redraw: bool,
    feed_area: Cell<Rect>,
    up_button: Cell<Rect>,
    down_button: Cell<Rect>,
}

impl Model {
    pub fn new(opts: Options) -> Self {
        let picker = CategoryPicker::new(&opts.catalog);
        let palette = Palette::for_theme(&opts.config.ui.theme);
        let mut model = Self {
            config: opts.config,
            catalog: opts.catalog,
            picker,
            picker_state: ListState::default().with_selected(Some(0)),
            screen: Screen::Picker,
            status_message: picker_help(),
            notice: None,
            palette,
            spinner: Spinner::new(),
            needs_redraw: true,
            feed_area: Cell::new(Rect::default()),
            up_button: Cell::new(Rect::default()),
            down_button: Cell::new(Rect::default()),
        };
        if let Some(selection) = opts.selection {
            model.open_feed(selection);
        }
        model
    }

    pub fn run(&mut self) -> Result<()> {
        let mut stdout = io::stdout();
        enable_raw_mode()?;
        stdout.execute(EnterAlternateScreen)?;
        stdout.execute(EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;

        let result = self.event_loop(&mut terminal);

        self.close_feed();
        disable_raw_mode()?;
        terminal.backend_mut().execute(DisableMouseCapture)?;
        terminal.backend_mut().execute(LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    fn event_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        loop {
            if self.needs_redraw {
                terminal.draw(|frame| self.draw(frame))?;
                self.needs_redraw = false;
                self.sync_layout();
            }

            if event::poll(self.tick_rate())? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        match self.handle_key(key.code) {
                            Ok(true) => break,
                            Ok(false) => {}
                            Err(err) => {
                                self.status_message = format!("Error: {}", err);
                                self.mark_dirty();
                            }
                        }
                    }
                    Event::Mouse(mouse) => self.handle_mouse(mouse),
                    Event::Resize(_, _) => self.mark_dirty(),
                    _ => {}
                }
            }

            if self.tick(Instant::now()) {
                self.mark_dirty();
            }
        }

        Ok(())
    }

    fn tick_rate(&self) -> Duration {
        match &self.screen {
            Screen::Feed(view) if view.scroll_state().is_animating() => ANIMATION_TICK,
            _ => IDLE_TICK,
        }
    }

    fn tick(&mut self, now: Instant) -> bool {
        let Screen::Feed(view) = &mut self.screen else {
            return false;
        };
        let mut changed = view.tick(now);
        if let Some(notice) = view.take_notice() {
            self.notice = Some(notice);
            changed = true;
        }
        if view.is_loading() {
            changed |= self.spinner.advance();
        } else {
            self.spinner.reset();
        }
        changed
    }

    fn mark_dirty(&mut self) {
        self.needs_redraw = true;
    }

    /// Pushes the size measured during the last draw into the feed view.
    fn sync_layout(&mut self) {
        let area = self.feed_area.get();
        if let Screen::Feed(view) = &mut self.screen {
            if area.height > 0 && view.set_viewport_height(area.height) {
                self.needs_redraw = true;
            }
        }
    }

    fn open_feed(&mut self, selection: Vec<String>) {
        let session = viewer::open_session(&self.catalog, &selection);
        let view = FeedView::from_config(&self.config, session);
        self.status_message = feed_status(view.session(), view.is_exhausted(), &selection);
        self.screen = Screen::Feed(Box::new(view));
        self.mark_dirty();
    }

    fn close_feed(&mut self) {
        if let Screen::Feed(mut view) = std::mem::replace(&mut self.screen, Screen::Picker) {
            view.teardown();
        }
        self.notice = None;
        self.status_message = picker_help();
        self.mark_dirty();
    }

    fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        if self.notice.is_some() {
            if matches!(code, KeyCode::Enter | KeyCode::Esc) {
                self.notice = None;
                self.mark_dirty();
            }
            return Ok(matches!(code, KeyCode::Char('q')));
        }
        match self.screen {
            Screen::Picker => self.handle_picker_key(code),
            Screen::Feed(_) => self.handle_feed_key(code),
        }
    }

    fn handle_picker_key(&mut self, code: KeyCode) -> Result<bool> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
            KeyCode::Char('j') | KeyCode::Down => self.picker.move_by(1),
            KeyCode::Char('k') | KeyCode::Up => self.picker.move_by(-1),
            KeyCode::Char(' ') => self.picker.toggle(),
            KeyCode::Char('a') => self.picker.toggle_all(),
            KeyCode::Enter => {
                let selection = self.picker.selection();
                self.open_feed(selection);
                return Ok(false);
            }
            _ => return Ok(false),
        }
        self.picker_state.select(Some(self.picker.cursor()));
        self.mark_dirty();
        Ok(false)
    }

    fn handle_feed_key(&mut self, code: KeyCode) -> Result<bool> {
        let now = Instant::now();
        match code {
            KeyCode::Char('q') => return Ok(true),
            KeyCode::Char('b') | KeyCode::Esc => self.close_feed(),
            KeyCode::Char('j') | KeyCode::Down | KeyCode::Char(' ') | KeyCode::PageDown => {
                self.navigate(Direction::Down, now)
            }
            KeyCode::Char('k') | KeyCode::Up | KeyCode::PageUp => self.navigate(Direction::Up, now),
            KeyCode::Char('p') => {
                if let Screen::Feed(view) = &mut self.screen {
                    view.toggle_playback();
                    self.mark_dirty();
                }
            }
            _ => {}
        }
        Ok(false)
    }

    fn navigate(&mut self, direction: Direction, now: Instant) {
        if let Screen::Feed(view) = &mut self.screen {
            if view.navigate(direction, now) {
                self.mark_dirty();
            }
        }
    }

    fn handle_mouse(&mut self, event: MouseEvent) {
        let now = Instant::now();
        let point = Rect::new(event.column, event.row, 1, 1);
        match event.kind {
            MouseEventKind::ScrollDown => self.scroll_feed(WHEEL_STEP, now),
            MouseEventKind::ScrollUp => self.scroll_feed(-WHEEL_STEP, now),
            MouseEventKind::Down(MouseButton::Left) => {
                if self.up_button.get().intersects(point) {
                    self.navigate(Direction::Up, now);
                } else if self.down_button.get().intersects(point) {
                    self.navigate(Direction::Down, now);
                }
            }
            _ => {}
        }
    }

    fn scroll_feed(&mut self, delta: i32, now: Instant) {
        if let Screen::Feed(view) = &mut self.screen {
            view.scroll_by(delta, now);
            self.mark_dirty();
        }
    }

    fn draw(&self, frame: &mut Frame<'_>) {
        let area = frame.size();
        frame.render_widget(Block::default().style(Style::default().bg(self.palette.bg)), area);

        let rows = Layout::default()
            .direction(LayoutDirection::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(area);

        match &self.screen {
            Screen::Picker => self.draw_picker(frame, rows[0]),
            Screen::Feed(view) => self.draw_feed(frame, rows[0], view),
        }

        let status = Paragraph::new(Line::from(Span::styled(
            self.status_message.clone(),
            Style::default().fg(self.palette.text_secondary),
        )))
        .style(Style::default().bg(self.palette.panel_bg));
        frame.render_widget(status, rows[1]);

        if let Some(notice) = &self.notice {
            draw_notice(frame, &self.palette, area, notice);
        }
    }

    fn draw_picker(&self, frame: &mut Frame<'_>, area: Rect) {
        let panel = centered_rect(60, 70, area);
        let items: Vec<ListItem> = self
            .picker
            .names()
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                let count = self.catalog.get(name).map_or(0, |videos| videos.len());
                let mark = if self.picker.is_picked(idx) { "[x]" } else { "[ ]" };
                let mark_style = if self.picker.is_picked(idx) {
                    Style::default().fg(self.palette.success)
                } else {
                    Style::default().fg(self.palette.text_secondary)
                };
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{mark} "), mark_style),
                    Span::styled(name.clone(), Style::default().fg(self.palette.text_primary)),
                    Span::styled(
                        format!("  {count} videos"),
                        Style::default().fg(self.palette.text_secondary),
                    ),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .title(" Choose categories ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(self.palette.border_focused))
                    .padding(Padding::horizontal(1))
                    .style(Style::default().bg(self.palette.panel_bg)),
            )
            .highlight_style(
                Style::default()
                    .bg(self.palette.panel_selected_bg)
                    .add_modifier(Modifier::BOLD),
            );
        let mut state = self.picker_state.clone();
        frame.render_stateful_widget(list, panel, &mut state);
    }

    fn draw_feed(&self, frame: &mut Frame<'_>, area: Rect, view: &FeedView) {
        let feed_width = area
            .width
            .saturating_sub(BUTTON_COLUMN_WIDTH)
            .min(FEED_MAX_WIDTH);
        let columns = Layout::default()
            .direction(LayoutDirection::Horizontal)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(feed_width),
                Constraint::Length(BUTTON_COLUMN_WIDTH),
                Constraint::Min(0),
            ])
            .split(area);
        let feed = columns[1];
        self.feed_area.set(feed);
        frame.render_widget(
            Block::default().style(Style::default().bg(self.palette.card_bg)),
            feed,
        );

        if view.entries().is_empty() {
            let empty = Paragraph::new("No videos available.")
                .alignment(Alignment::Center)
                .style(Style::default().fg(self.palette.text_secondary));
            frame.render_widget(empty, centered_rect(100, 20, feed));
        }

        let playing = view.now_playing();
        for (rect, entry) in view.card_rects().iter().zip(view.entries()) {
            let top = rect.top;
            let bottom = top + i32::from(rect.height);
            if bottom <= 0 || top >= i32::from(feed.height) {
                continue;
            }
            let lines = card_lines(
                &self.palette,
                entry,
                feed.width,
                rect.height,
                playing == Some(entry.id),
            );
            let skip = (-top).max(0) as usize;
            let visible = (bottom.min(i32::from(feed.height)) - top.max(0)) as usize;
            let slice: Vec<Line> = lines.into_iter().skip(skip).take(visible).collect();
            let target = Rect::new(feed.x, feed.y + top.max(0) as u16, feed.width, visible as u16);
            frame.render_widget(
                Paragraph::new(Text::from(slice)).style(Style::default().bg(self.palette.card_bg)),
                target,
            );
        }

        if view.is_loading() && feed.height > 0 {
            let row = Rect::new(feed.x, feed.y + feed.height - 1, feed.width, 1);
            let loading = Paragraph::new(Line::from(vec![
                Span::styled(self.spinner.frame(), Style::default().fg(self.palette.accent)),
                Span::raw(" Loading more content..."),
            ]))
            .alignment(Alignment::Center)
            .style(Style::default().fg(self.palette.text_primary).bg(self.palette.panel_bg));
            frame.render_widget(Clear, row);
            frame.render_widget(loading, row);
        }

        self.draw_buttons(frame, columns[2]);
    }

    fn draw_buttons(&self, frame: &mut Frame<'_>, area: Rect) {
        if area.width < 5 || area.height < 7 {
            self.up_button.set(Rect::default());
            self.down_button.set(Rect::default());
            return;
        }
        let mid = area.y + area.height / 2;
        let up = Rect::new(area.x + 2, mid - 3, 5, 3);
        let down = Rect::new(area.x + 2, mid + 1, 5, 3);
        self.up_button.set(up);
        self.down_button.set(down);
        for (rect, glyph) in [(up, "▲"), (down, "▼")] {
            let button = Paragraph::new(glyph)
                .alignment(Alignment::Center)
                .style(Style::default().fg(self.palette.text_primary).bg(self.palette.panel_bg))
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(self.palette.border_idle)),
                );
            frame.render_widget(button, rect);
        }
    }
}

fn feed_status(session: &FeedSession, exhausted: bool, selection: &[String]) -> String {
    if exhausted {
        return "No videos available for this selection. Press b to pick again.".to_string();
    }
    let videos = session.source().len();
    match session.mode() {
        FeedMode::Static => format!("Browsing all {videos} catalog videos in order."),
        FeedMode::Playlist => format!("Playing {} ({videos} videos).", selection.join(", ")),
    }
}

fn picker_help() -> String {
    "j/k: move  space: toggle  a: all  enter: start (none = every category)  q: quit".to_string()
}

/// Full-height rendering of one card: the media placeholder in the middle,
/// caption along the bottom, separator on the last row.
fn card_lines(
    palette: &Palette,
    entry: &VideoEntry,
    width: u16,
    height: u16,
    playing: bool,
) -> Vec<Line<'static>> {
    let height = usize::from(height);
    let width = usize::from(width.max(1));
    let mut lines: Vec<Line<'static>> = vec![Line::raw(""); height];
    if height == 0 {
        return lines;
    }

    let (marker, marker_style) = if playing {
        ("▶ playing", Style::default().fg(palette.success))
    } else {
        ("❚❚ paused", Style::default().fg(palette.text_secondary))
    };
    let media: Vec<Line<'static>> = vec![
        centered(marker, width, marker_style),
        Line::raw(""),
        centered(
            entry.source.file_name(),
            width,
            Style::default().fg(palette.text_primary),
        ),
        centered(
            source_tag(entry),
            width,
            Style::default().fg(palette.text_secondary),
        ),
    ];
    let start = height.saturating_sub(media.len()) / 2;
    for (offset, line) in media.into_iter().enumerate() {
        if let Some(slot) = lines.get_mut(start + offset) {
            *slot = line;
        }
    }

    let caption: Vec<String> = wrap(&entry.caption, width.saturating_sub(2).max(1))
        .into_iter()
        .map(|part| format!(" {part}"))
        .collect();
    let caption_start = height.saturating_sub(caption.len() + 1);
    for (offset, text) in caption.into_iter().enumerate() {
        if let Some(slot) = lines.get_mut(caption_start + offset) {
            *slot = Line::from(Span::styled(
                text,
                Style::default()
                    .fg(palette.caption)
                    .add_modifier(Modifier::BOLD),
            ));
        }
    }
    if let Some(last) = lines.last_mut() {
        *last = Line::from(Span::styled(
            "─".repeat(width),
            Style::default().fg(palette.border_idle),
        ));
    }
    lines
}

fn source_tag(entry: &VideoEntry) -> &'static str {
    if entry.source.is_remote() {
        "stream"
    } else {
        "local file"
    }
}

fn centered(text: &str, width: usize, style: Style) -> Line<'static> {
    let pad = width.saturating_sub(UnicodeWidthStr::width(text)) / 2;
    Line::from(vec![
        Span::raw(" ".repeat(pad)),
        Span::styled(text.to_string(), style),
    ])
}

fn draw_notice(frame: &mut Frame<'_>, palette: &Palette, area: Rect, notice: &str) {
    let popup = centered_rect(50, 25, area);
    frame.render_widget(Clear, popup);
    let body = Paragraph::new(vec![
        Line::from(Span::styled(
            notice.to_string(),
            Style::default().fg(palette.text_primary),
        )),
        Line::raw(""),
        Line::from(Span::styled(
            "Press Enter to dismiss.",
            Style::default().fg(palette.text_secondary),
        )),
    ])
    .wrap(Wrap { trim: true })
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .title(" Session ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.accent))
            .style(Style::default().bg(palette.panel_bg)),
    );
    frame.render_widget(body, popup);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(LayoutDirection::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(LayoutDirection::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SourceRef;
    use crate::feed::caption_for;

    fn entry(id: u64) -> VideoEntry {
        VideoEntry {
            id,
            source: SourceRef::from("https://cdn.test/clips/sunrise.mp4"),
            caption: caption_for(id),
            viewed: false,
        }
    }

    fn line_text(line: &Line<'_>) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    #[test]
    fn card_fills_its_height_with_caption_and_separator() {
        let lines = card_lines(&PALETTE_DEFAULT, &entry(7), 30, 12, true);
        assert_eq!(lines.len(), 12);
        assert_eq!(line_text(&lines[10]).trim(), "Reel #7");
        assert_eq!(line_text(&lines[11]), "─".repeat(30));
        assert!(lines.iter().any(|line| line_text(line).contains("sunrise.mp4")));
        assert!(lines.iter().any(|line| line_text(line).contains("playing")));
    }

    #[test]
    fn tiny_cards_do_not_panic() {
        assert!(card_lines(&PALETTE_DEFAULT, &entry(1), 10, 0, false).is_empty());
        assert_eq!(card_lines(&PALETTE_DEFAULT, &entry(1), 1, 1, false).len(), 1);
    }

    #[test]
    fn card_tags_remote_and_local_sources() {
        let has = |lines: &[Line<'_>], text: &str| {
            lines.iter().any(|line| line_text(line).trim() == text)
        };
        let remote = card_lines(&PALETTE_DEFAULT, &entry(1), 30, 12, false);
        assert!(has(&remote, "stream"));
        assert!(!has(&remote, "local file"));

        let mut local = entry(2);
        local.source = SourceRef::from("/home/me/clips/dusk.mp4");
        let lines = card_lines(&PALETTE_DEFAULT, &local, 30, 12, false);
        assert!(has(&lines, "local file"));
        assert!(lines.iter().any(|line| line_text(line).contains("dusk.mp4")));
    }

    #[test]
    fn theme_selects_palette() {
        assert_eq!(Palette::for_theme("default"), PALETTE_DEFAULT);
        assert_eq!(Palette::for_theme(" Light "), PALETTE_LIGHT);
        assert_eq!(Palette::for_theme("mono"), PALETTE_MONO);
        assert_eq!(Palette::for_theme("dracula"), PALETTE_DEFAULT);

        let mut config = Config::default();
        config.ui.theme = "light".into();
        let model = Model::new(Options {
            config,
            catalog: Catalog::builtin().clone(),
            selection: None,
        });
        assert_eq!(model.palette, PALETTE_LIGHT);
    }

    #[test]
    fn feed_status_describes_the_session() {
        let sources = vec![SourceRef::from("a.mp4"), SourceRef::from("b.mp4")];
        let static_feed = FeedSession::from_static(sources);
        assert_eq!(
            feed_status(&static_feed, false, &[]),
            "Browsing all 2 catalog videos in order."
        );
        let catalog = Catalog::builtin();
        let playlist = viewer::open_session(catalog, &["Fun".to_string()]);
        assert_eq!(
            feed_status(&playlist, false, &["Fun".to_string()]),
            "Playing Fun (2 videos)."
        );
        assert!(feed_status(&playlist, true, &[]).starts_with("No videos available"));
    }

    #[test]
    fn centered_pads_by_display_width() {
        let line = centered("ab", 6, Style::default());
        assert_eq!(line_text(&line), "  ab");
    }

    #[test]
    fn cli_selection_opens_feed_immediately() {
        let mut config = Config::default();
        config.player.autoplay = false;
        config.log.file = None;
        let model = Model::new(Options {
            config,
            catalog: Catalog::builtin().clone(),
            selection: Some(vec!["Nature".to_string()]),
        });
        match &model.screen {
            Screen::Feed(view) => assert_eq!(view.entries().len(), 3),
            Screen::Picker => panic!("expected feed screen"),
        }
    }
}
