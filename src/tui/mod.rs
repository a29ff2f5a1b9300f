// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Myotome-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Myotome and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Terminal UI.
//!
//! The interactive shell (ratatui + crossterm) around one diagram widget: a
//! two-sided body panel, a legend with tri-state indicators, and a footer
//! with key hints. All selection logic lives in the model; this module only
//! routes input and paints state.

use std::error::Error;
use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};

use crate::diagram::{AssetCatalog, BindingPhase, DiagramBinding};
use crate::model::{BodySide, GroupStatus, TaxonomyRegistry, ViewMode};
use crate::render::{render_body_view, render_legend, AnnotatedBodyRender, LegendLine};
use crate::store::PrefsFile;
use crate::ui::ViewModeController;
use crate::vocab::Vocabulary;

mod theme;

use theme::TuiTheme;

const POLL_INTERVAL: Duration = Duration::from_millis(250);
const TOAST_SNAPSHOT_KEYS: usize = 6;

pub struct RunOptions {
    pub catalog: AssetCatalog,
    pub prefs: PrefsFile,
}

/// Runs the interactive terminal UI until quit.
pub fn run(options: RunOptions) -> Result<(), Box<dyn Error>> {
    let theme = match TuiTheme::from_env() {
        Ok(theme) => theme,
        Err(err) => {
            eprintln!("myotome: {err}; using default palette");
            TuiTheme::default()
        }
    };

    let controller = ViewModeController::with_prefs(options.prefs);
    let binding = DiagramBinding::new(
        TaxonomyRegistry::builtin(),
        Vocabulary::builtin(),
        options.catalog,
        controller.get(),
    );

    let mut terminal = TerminalSession::new()?;
    let mut app = App::new(binding, controller, theme);
    app.binding.switch_side(BodySide::Front);

    while !app.should_quit {
        app.binding.poll();
        app.sync_mode();
        terminal.draw(|frame| draw(frame, &mut app))?;

        if event::poll(POLL_INTERVAL)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
                _ => {}
            }
        }
    }

    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Body,
    Legend,
}

struct App<'a> {
    binding: DiagramBinding<'a>,
    controller: ViewModeController,
    theme: TuiTheme,
    focus: Focus,
    cursor: (usize, usize),
    legend_index: usize,
    legend_filter: String,
    filter_editing: bool,
    toast: Option<String>,
    should_quit: bool,
    body_cache: Option<BodyCache>,
}

struct BodyCache {
    side: BodySide,
    render: AnnotatedBodyRender,
}

impl<'a> App<'a> {
    fn new(binding: DiagramBinding<'a>, controller: ViewModeController, theme: TuiTheme) -> Self {
        Self {
            binding,
            controller,
            theme,
            focus: Focus::Body,
            cursor: (0, 0),
            legend_index: 0,
            legend_filter: String::new(),
            filter_editing: false,
            toast: None,
            should_quit: false,
            body_cache: None,
        }
    }

    /// Keeps the widget's display mode in step with the shared controller,
    /// so mode changes from any surface reach this renderer next tick.
    fn sync_mode(&mut self) {
        let mode = self.controller.get();
        if self.binding.mode() != mode {
            self.binding.set_mode(mode);
        }
    }

    fn set_toast(&mut self, message: impl Into<String>) {
        self.toast = Some(message.into());
    }

    fn handle_key(&mut self, key: KeyEvent) {
        self.toast = None;

        if self.filter_editing {
            self.handle_filter_key(key);
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Tab => {
                self.focus = match self.focus {
                    Focus::Body => Focus::Legend,
                    Focus::Legend => Focus::Body,
                };
            }
            KeyCode::Char('v') => self.flip_side(),
            KeyCode::Char('m') => self.toggle_mode(),
            KeyCode::Char('a') => {
                let delta = self.binding.select_all_active();
                self.set_toast(format!("selected {} muscles", delta.changed.len()));
            }
            KeyCode::Char('c') => {
                let delta = self.binding.clear_active();
                self.set_toast(format!("cleared {} muscles", delta.changed.len()));
            }
            KeyCode::Char('r') => {
                if self.binding.retry().is_some() {
                    self.set_toast("reloading body map");
                }
            }
            KeyCode::Char('s') => self.toast_snapshot(),
            KeyCode::Char('/') => {
                self.focus = Focus::Legend;
                self.filter_editing = true;
            }
            KeyCode::Esc => {
                if !self.legend_filter.is_empty() {
                    self.legend_filter.clear();
                    self.legend_index = 0;
                } else {
                    self.should_quit = true;
                }
            }
            KeyCode::Char(' ') | KeyCode::Enter => self.toggle_focused(),
            KeyCode::Up | KeyCode::Char('k') => self.move_focus(0, -1),
            KeyCode::Down | KeyCode::Char('j') => self.move_focus(0, 1),
            KeyCode::Left | KeyCode::Char('h') => self.move_focus(-1, 0),
            KeyCode::Right | KeyCode::Char('l') => self.move_focus(1, 0),
            _ => {}
        }
    }

    fn handle_filter_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.legend_filter.clear();
                self.filter_editing = false;
                self.legend_index = 0;
            }
            KeyCode::Enter => self.filter_editing = false,
            KeyCode::Backspace => {
                self.legend_filter.pop();
                self.legend_index = 0;
            }
            KeyCode::Char(ch) => {
                self.legend_filter.push(ch);
                self.legend_index = 0;
            }
            _ => {}
        }
    }

    fn flip_side(&mut self) {
        let side = self
            .binding
            .active_side()
            .map(BodySide::flipped)
            .unwrap_or(BodySide::Front);
        self.binding.switch_side(side);
        self.cursor = (0, 0);
        self.legend_index = 0;
    }

    fn toggle_mode(&mut self) {
        let (mode, persisted) = self.controller.toggle();
        self.binding.set_mode(mode);
        self.legend_index = 0;
        if let Err(err) = persisted {
            self.set_toast(format!("mode is {mode}, but saving it failed: {err}"));
        } else {
            self.set_toast(format!("{mode} mode"));
        }
    }

    fn toast_snapshot(&mut self) {
        let snapshot = self.binding.snapshot();
        if snapshot.is_empty() {
            self.set_toast("nothing selected");
            return;
        }
        let mut names: Vec<&str> = snapshot
            .iter()
            .take(TOAST_SNAPSHOT_KEYS)
            .map(|key| key.as_str())
            .collect();
        if snapshot.len() > TOAST_SNAPSHOT_KEYS {
            names.push("…");
        }
        self.set_toast(format!(
            "submitting {}: {}",
            snapshot.len(),
            names.join(", ")
        ));
    }

    fn toggle_focused(&mut self) {
        match self.focus {
            Focus::Body => {
                self.binding.toggle_hovered();
            }
            Focus::Legend => {
                let rows = self.legend_rows();
                if let Some(row) = rows.get(self.legend_index) {
                    let key = row.key.clone();
                    self.binding.toggle_legend_key(&key);
                }
            }
        }
    }

    fn move_focus(&mut self, dx: isize, dy: isize) {
        match self.focus {
            Focus::Body => self.move_cursor(dx, dy),
            Focus::Legend => {
                let len = self.legend_rows().len();
                if len == 0 {
                    return;
                }
                let index = self.legend_index as isize + dy;
                self.legend_index = index.clamp(0, len as isize - 1) as usize;
            }
        }
    }

    fn move_cursor(&mut self, dx: isize, dy: isize) {
        let Some(view) = self.binding.view() else {
            return;
        };
        let (width, height) = (view.asset().width(), view.asset().height());
        if width == 0 || height == 0 {
            return;
        }

        let x = (self.cursor.0 as isize + dx).clamp(0, width as isize - 1) as usize;
        let y = (self.cursor.1 as isize + dy).clamp(0, height as isize - 1) as usize;
        self.cursor = (x, y);
        self.binding.set_cursor(x, y);
    }

    /// Legend rows after fuzzy filtering, best match first.
    fn legend_rows(&self) -> Vec<LegendLine> {
        let lines = render_legend(&self.binding.legend_entries());
        let needle = self.legend_filter.trim();
        if needle.is_empty() {
            return lines;
        }

        let mut scored: Vec<(i64, LegendLine)> = lines
            .into_iter()
            .filter_map(|line| {
                let label = line.text.to_ascii_lowercase();
                fuzzy_score(&needle.to_ascii_lowercase(), &label)
                    .map(|score| (score, line))
            })
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored.into_iter().map(|(_, line)| line).collect()
    }

    /// The annotated body render for the ready view, rebuilt on side change.
    fn body_render(&mut self) -> Option<&AnnotatedBodyRender> {
        let side = match self.binding.phase() {
            BindingPhase::Ready { view } => view.side(),
            _ => return None,
        };

        let stale = self
            .body_cache
            .as_ref()
            .map(|cache| cache.side != side)
            .unwrap_or(true);
        if stale {
            let view = self.binding.view()?;
            self.body_cache = Some(BodyCache {
                side,
                render: render_body_view(view),
            });
        }
        self.body_cache.as_ref().map(|cache| &cache.render)
    }
}

fn draw(frame: &mut Frame<'_>, app: &mut App<'_>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(4), Constraint::Length(1)])
        .split(frame.size());

    let panels = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
        .split(chunks[0]);

    draw_body(frame, app, panels[0]);
    draw_legend(frame, app, panels[1]);
    draw_footer(frame, app, chunks[1]);
}

fn draw_body(frame: &mut Frame<'_>, app: &mut App<'_>, area: Rect) {
    let side = app.binding.active_side();
    let title = match side {
        Some(side) => format!(" Body · {side} "),
        None => " Body ".to_owned(),
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(app.theme.panel_border_style(app.focus == Focus::Body));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let phase = app.binding.phase().clone();
    match phase {
        BindingPhase::Uninitialized => {}
        BindingPhase::Loading { side } => {
            let paragraph = Paragraph::new(format!("Loading {side} body map…"))
                .style(app.theme.base_style());
            frame.render_widget(paragraph, inner);
        }
        BindingPhase::Failed { message, .. } => {
            let text = format!("{message}\n\nPress r to reload.");
            let paragraph = Paragraph::new(text)
                .style(app.theme.error_style())
                .wrap(Wrap { trim: false });
            frame.render_widget(paragraph, inner);
        }
        BindingPhase::Ready { .. } => {
            let lines = body_lines(app);
            let paragraph = Paragraph::new(lines).style(app.theme.base_style());
            frame.render_widget(paragraph, inner);
        }
    }
}

/// Builds the styled body grid: each cell carries the style of its region's
/// display status, with the hovered group and the cursor cell emphasized.
fn body_lines(app: &mut App<'_>) -> Vec<Line<'static>> {
    let cursor = app.cursor;
    let body_focused = app.focus == Focus::Body;
    let hovered = app.binding.hovered().cloned();

    let mut cell_styles: Vec<Vec<Option<Style>>> = Vec::new();
    let mut text_lines: Vec<Vec<char>> = Vec::new();

    {
        let theme = app.theme.clone();
        let statuses: Vec<(crate::model::MuscleKey, GroupStatus)> = app
            .binding
            .view()
            .map(|view| {
                view.key_codes()
                    .keys()
                    .map(|key| (key.clone(), app.binding.region_status(key)))
                    .collect()
            })
            .unwrap_or_default();

        let Some(render) = app.body_render() else {
            return Vec::new();
        };

        for line in render.text.split('\n') {
            let chars: Vec<char> = line.chars().collect();
            cell_styles.push(vec![None; chars.len()]);
            text_lines.push(chars);
        }

        for (y, x0, x1) in &render.inert_spans {
            paint_span(&mut cell_styles, *y, *x0, *x1, theme.inert_style());
        }

        for (key, status) in &statuses {
            let Some(spans) = render.highlight_index.get(key) else {
                continue;
            };
            let style = if hovered.as_ref() == Some(key) {
                theme.hover_style(*status)
            } else {
                theme.region_style(*status)
            };
            for (y, x0, x1) in spans {
                paint_span(&mut cell_styles, *y, *x0, *x1, style);
            }
        }

        if body_focused {
            // Rendered lines are right-trimmed; pad the cursor row so the
            // cursor stays visible over background cells.
            if let (Some(chars), Some(styles)) = (
                text_lines.get_mut(cursor.1),
                cell_styles.get_mut(cursor.1),
            ) {
                while chars.len() <= cursor.0 {
                    chars.push(' ');
                    styles.push(None);
                }
            }
            paint_span(
                &mut cell_styles,
                cursor.1,
                cursor.0,
                cursor.0,
                theme.cursor_style(),
            );
        }
    }

    let base = app.theme.base_style();
    text_lines
        .into_iter()
        .zip(cell_styles)
        .map(|(chars, styles)| {
            let spans: Vec<Span<'static>> = chars
                .into_iter()
                .zip(styles)
                .map(|(ch, style)| Span::styled(ch.to_string(), style.unwrap_or(base)))
                .collect();
            Line::from(spans)
        })
        .collect()
}

fn paint_span(
    cell_styles: &mut [Vec<Option<Style>>],
    y: usize,
    x0: usize,
    x1: usize,
    style: Style,
) {
    let Some(row) = cell_styles.get_mut(y) else {
        return;
    };
    if row.is_empty() {
        return;
    }
    for x in x0..=x1.min(row.len() - 1) {
        row[x] = Some(style);
    }
}

fn draw_legend(frame: &mut Frame<'_>, app: &mut App<'_>, area: Rect) {
    let mode = app.binding.mode();
    let title = match mode {
        ViewMode::Simple => " Muscles · simple ",
        ViewMode::Advanced => " Muscles · advanced ",
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(app.theme.panel_border_style(app.focus == Focus::Legend));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = app.legend_rows();
    app.legend_index = app.legend_index.min(rows.len().saturating_sub(1));

    let filter_height = if app.filter_editing || !app.legend_filter.is_empty() {
        1
    } else {
        0
    };
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(filter_height)])
        .split(inner);

    let items: Vec<ListItem> = rows
        .iter()
        .enumerate()
        .map(|(index, row)| {
            let selected = app.focus == Focus::Legend && index == app.legend_index;
            let style = app.theme.legend_row_style(row.status, selected);
            ListItem::new(Line::from(Span::styled(row.text.clone(), style)))
        })
        .collect();

    let mut state = ListState::default();
    state.select((!rows.is_empty()).then_some(app.legend_index));
    frame.render_stateful_widget(List::new(items), sections[0], &mut state);

    if filter_height > 0 {
        let filter = Paragraph::new(format!("/{}", app.legend_filter))
            .style(app.theme.footer_key_style());
        frame.render_widget(filter, sections[1]);
    }
}

fn draw_footer(frame: &mut Frame<'_>, app: &App<'_>, area: Rect) {
    if let Some(toast) = &app.toast {
        let paragraph = Paragraph::new(toast.clone()).style(app.theme.error_style());
        frame.render_widget(paragraph, area);
        return;
    }

    let hints = [
        ("␣", "toggle"),
        ("v", "flip body"),
        ("m", "mode"),
        ("a", "all"),
        ("c", "clear"),
        ("/", "filter"),
        ("s", "submit"),
        ("q", "quit"),
    ];
    let mut spans = Vec::new();
    for (key, label) in hints {
        spans.push(Span::styled(key, app.theme.footer_key_style()));
        spans.push(Span::styled(
            format!(" {label}  "),
            app.theme.footer_label_style(),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Fuzzy match score for legend filtering: rapidfuzz ratio (0–100) with a
/// strong bonus for plain substring hits. `None` means no match worth
/// showing.
fn fuzzy_score(needle: &str, haystack: &str) -> Option<i64> {
    if needle.is_empty() {
        return None;
    }

    let ratio = rapidfuzz::fuzz::ratio(needle.chars(), haystack.chars());
    let mut score = ratio.round() as i64;
    if haystack.contains(needle) {
        score += 200;
    }

    (score > 55).then_some(score)
}

struct TerminalSession {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self, Box<dyn Error>> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).map_err(|err| {
            teardown_terminal();
            err
        })?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).map_err(|err| {
            teardown_terminal();
            err
        })?;
        terminal.clear().map_err(|err| {
            teardown_terminal();
            err
        })?;

        Ok(Self { terminal })
    }

    fn draw(&mut self, draw_fn: impl FnOnce(&mut Frame<'_>)) -> io::Result<()> {
        self.terminal.draw(draw_fn)?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        teardown_terminal();
    }
}

fn teardown_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent};

    use super::{fuzzy_score, App, Focus};
    use crate::diagram::{demo_document, AssetCatalog, BodyAsset, DiagramBinding};
    use crate::model::{BodySide, MuscleKey, TaxonomyRegistry, ViewMode};
    use crate::store::PrefsFile;
    use crate::tui::theme::TuiTheme;
    use crate::ui::ViewModeController;
    use crate::vocab::Vocabulary;

    fn key(value: &str) -> MuscleKey {
        MuscleKey::new(value).expect("muscle key")
    }

    fn ready_app(mode: ViewMode) -> App<'static> {
        let mut binding = DiagramBinding::detached(
            TaxonomyRegistry::builtin(),
            Vocabulary::builtin(),
            AssetCatalog::embedded(),
            mode,
        );
        let token = binding.switch_side(BodySide::Front);
        binding.complete_load(
            BodySide::Front,
            token,
            Ok(BodyAsset::parse(demo_document(BodySide::Front)).expect("demo parses")),
        );
        App::new(
            binding,
            ViewModeController::ephemeral(mode),
            TuiTheme::default(),
        )
    }

    #[test]
    fn fuzzy_score_prefers_substring_hits() {
        let exact = fuzzy_score("bicep", "[ ] biceps").expect("match");
        let fuzzy = fuzzy_score("bcps", "[ ] biceps").unwrap_or(0);
        assert!(exact > fuzzy);
        assert_eq!(fuzzy_score("", "[ ] biceps"), None);
        assert_eq!(fuzzy_score("zzz", "[ ] biceps"), None);
    }

    #[test]
    fn legend_filter_narrows_rows() {
        let mut app = ready_app(ViewMode::Simple);

        let all = app.legend_rows().len();
        app.legend_filter = "biceps".to_owned();
        let filtered = app.legend_rows();
        assert!(filtered.len() < all);
        assert_eq!(filtered[0].key, key("biceps"));
    }

    #[test]
    fn space_on_legend_toggles_group() {
        let mut app = ready_app(ViewMode::Simple);
        app.focus = Focus::Legend;
        app.legend_filter = "biceps".to_owned();
        app.legend_index = 0;

        app.handle_key(KeyEvent::from(KeyCode::Char(' ')));

        assert!(app.binding.selection().is_selected(&key("long-head-bicep")));
        assert!(app.binding.selection().is_selected(&key("short-head-bicep")));
    }

    #[test]
    fn cursor_stays_inside_the_grid() {
        let mut app = ready_app(ViewMode::Simple);
        app.focus = Focus::Body;

        for _ in 0..200 {
            app.handle_key(KeyEvent::from(KeyCode::Left));
            app.handle_key(KeyEvent::from(KeyCode::Up));
        }
        assert_eq!(app.cursor, (0, 0));

        for _ in 0..200 {
            app.handle_key(KeyEvent::from(KeyCode::Right));
            app.handle_key(KeyEvent::from(KeyCode::Down));
        }
        let view = app.binding.view().expect("ready view");
        assert_eq!(
            app.cursor,
            (view.asset().width() - 1, view.asset().height() - 1)
        );
    }

    #[test]
    fn mode_key_flips_controller_and_binding() {
        let mut app = ready_app(ViewMode::Simple);

        app.handle_key(KeyEvent::from(KeyCode::Char('m')));
        assert_eq!(app.controller.get(), ViewMode::Advanced);
        assert_eq!(app.binding.mode(), ViewMode::Advanced);
        assert!(app.toast.is_some());
    }

    #[test]
    fn sync_mode_follows_external_controller_changes() {
        let mut app = ready_app(ViewMode::Simple);

        app.controller.set(ViewMode::Advanced).expect("set");
        app.sync_mode();
        assert_eq!(app.binding.mode(), ViewMode::Advanced);
    }

    #[test]
    fn prefs_file_round_trips_through_run_options() {
        // RunOptions is plain data; just assert the prefs path plumbs through.
        let dir = std::env::temp_dir().join(format!("myotome-tui-test-{}", std::process::id()));
        let prefs = PrefsFile::in_dir(&dir);
        let options = super::RunOptions {
            catalog: AssetCatalog::embedded(),
            prefs,
        };
        assert!(options.prefs.path().ends_with("myotome-prefs.json"));
    }
}
