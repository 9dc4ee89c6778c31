//! Ratatui-based terminal UI.
//!
//! The TUI provides a settings panel for choosing a year, country and ranking
//! size, then renders the year KPIs, the selected country's factor breakdown,
//! the top-N ranking and the score distribution.
//!
//! A dataset that fails validation renders its missing-column message in
//! place of the charts; no metrics are computed from it.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span, Text},
    widgets::{BarChart, Block, Borders, List, ListItem, Paragraph},
};

use crate::app::pipeline::{self, YearView};
use crate::cli::ViewArgs;
use crate::data::{ColumnMap, DataError, list_years};
use crate::domain::{ValidationResult, clamp_top_n};
use crate::error::AppError;
use crate::report;
use crate::report::format::{factor_label, score_bar};

/// Start the TUI.
pub fn run(args: ViewArgs) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(args)?;
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

/// Outcome of loading the selected year.
enum YearState {
    Ready(YearView),
    MissingColumns { year: String, missing: Vec<String> },
    LoadFailed { year: String, message: String },
}

struct App {
    dir: PathBuf,
    map: ColumnMap,
    top_n: usize,
    years: Vec<String>,
    year_idx: usize,
    country_idx: usize,
    state: Option<YearState>,
    selected_field: usize,
    status: String,
}

impl App {
    fn new(args: ViewArgs) -> Result<Self, AppError> {
        let dir = crate::app::resolve_data_dir(&args.source);
        let mut app = Self {
            dir,
            map: ColumnMap::builtin(),
            top_n: clamp_top_n(args.top),
            years: Vec::new(),
            year_idx: 0,
            country_idx: 0,
            state: None,
            selected_field: 0,
            status: "Scanning data directory...".to_string(),
        };
        app.rescan(args.year.as_deref())?;
        if let Some(country) = args.country.as_deref() {
            if !app.select_country(country) {
                app.status = format!("No data for '{country}'; using default country.");
            }
        }
        Ok(app)
    }

    fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code)? {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode) -> Result<bool, AppError> {
        match code {
            KeyCode::Char('q') => return Ok(true),
            KeyCode::Up => {
                if self.selected_field > 0 {
                    self.selected_field -= 1;
                }
            }
            KeyCode::Down => {
                if self.selected_field < 2 {
                    self.selected_field += 1;
                }
            }
            KeyCode::Left => self.adjust_field(-1)?,
            KeyCode::Right => self.adjust_field(1)?,
            KeyCode::Char('r') => {
                self.rescan(None)?;
                self.status = format!("Rescanned '{}'.", self.dir.display());
            }
            KeyCode::Char('e') => self.export_summary(),
            _ => {}
        }

        Ok(false)
    }

    fn adjust_field(&mut self, delta: i32) -> Result<(), AppError> {
        match self.selected_field {
            0 => {
                if self.years.is_empty() {
                    self.status = "No yearly datasets available.".to_string();
                    return Ok(());
                }
                self.year_idx = cycle(self.year_idx, self.years.len(), delta);
                self.reload_year()?;
            }
            1 => {
                let Some(YearState::Ready(view)) = &self.state else {
                    return Ok(());
                };
                if view.countries.is_empty() {
                    return Ok(());
                }
                self.country_idx = cycle(self.country_idx, view.countries.len(), delta);
                self.status = format!("country: {}", self.current_country().unwrap_or_default());
            }
            2 => {
                let next = if delta >= 0 {
                    self.top_n.saturating_add(1)
                } else {
                    self.top_n.saturating_sub(1)
                };
                self.top_n = clamp_top_n(next);
                self.status = format!("top: {}", self.top_n);
            }
            _ => {}
        }
        Ok(())
    }

    /// Re-read the directory listing, keeping the selection when possible.
    fn rescan(&mut self, requested_year: Option<&str>) -> Result<(), AppError> {
        let previous = requested_year
            .map(str::to_string)
            .or_else(|| self.years.get(self.year_idx).cloned());

        // An unreadable directory is fatal to the whole session.
        self.years = list_years(&self.dir).map_err(crate::app::app_error)?;

        if self.years.is_empty() {
            self.state = None;
            self.status = format!("No yearly datasets found in '{}'.", self.dir.display());
            return Ok(());
        }

        self.year_idx = previous
            .and_then(|y| self.years.iter().position(|c| *c == y))
            .unwrap_or(self.years.len() - 1);
        self.reload_year()
    }

    fn reload_year(&mut self) -> Result<(), AppError> {
        let year = self.years[self.year_idx].clone();
        let previous_country = self.current_country();

        self.state = Some(match pipeline::load_year(&self.dir, &year, &self.map) {
            Ok(ValidationResult::Valid(table)) => match pipeline::build_view(&year, table) {
                Some(view) => {
                    self.status = format!("year: {year} ({} countries)", view.stats.n);
                    YearState::Ready(view)
                }
                None => YearState::LoadFailed {
                    year,
                    message: "no usable country rows".to_string(),
                },
            },
            Ok(ValidationResult::Invalid { missing }) => {
                self.status = format!("{year}: dataset missing required columns");
                YearState::MissingColumns { year, missing }
            }
            // A bad year file is scoped to that selection; other years stay
            // usable, so it is not fatal here.
            Err(err @ DataError::Load { .. }) => {
                self.status = err.to_string();
                YearState::LoadFailed {
                    year,
                    message: err.to_string(),
                }
            }
            Err(err) => return Err(crate::app::app_error(err)),
        });

        // Keep the country selection by name if it survived the year change;
        // otherwise fall back to the year's happiest country.
        self.country_idx = 0;
        let kept = previous_country
            .as_deref()
            .is_some_and(|name| self.select_country(name));
        if !kept {
            let fallback = match &self.state {
                Some(YearState::Ready(view)) => Some(view.stats.happiest.country.clone()),
                _ => None,
            };
            if let Some(name) = fallback {
                self.select_country(&name);
            }
        }
        Ok(())
    }

    /// Returns whether the country was found in the current year.
    fn select_country(&mut self, name: &str) -> bool {
        if let Some(YearState::Ready(view)) = &self.state {
            if let Some(idx) = view
                .countries
                .iter()
                .position(|c| c.eq_ignore_ascii_case(name.trim()))
            {
                self.country_idx = idx;
                return true;
            }
        }
        false
    }

    fn current_country(&self) -> Option<String> {
        match &self.state {
            Some(YearState::Ready(view)) => view.countries.get(self.country_idx).cloned(),
            _ => None,
        }
    }

    fn export_summary(&mut self) {
        let Some(YearState::Ready(view)) = &self.state else {
            self.status = "Nothing to export.".to_string();
            return;
        };
        let path = PathBuf::from(format!("whi-{}-summary.json", view.year));
        let summary = pipeline::year_summary(view, self.top_n);
        match crate::io::write_summary_json(&path, &summary) {
            Ok(()) => self.status = format!("Wrote {}", path.display()),
            Err(err) => self.status = format!("Export failed: {err}"),
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("whi", Style::default().fg(Color::Cyan)),
            Span::raw(" — World Happiness dashboard"),
        ]));

        let year = self
            .years
            .get(self.year_idx)
            .cloned()
            .unwrap_or_else(|| "-".to_string());
        lines.push(Line::from(Span::styled(
            format!(
                "year: {year} | years available: {} | data: {}",
                self.years.len(),
                self.dir.display(),
            ),
            Style::default().fg(Color::Gray),
        )));

        if let Some(YearState::Ready(view)) = &self.state {
            lines.push(Line::from(Span::styled(
                format!(
                    "countries: {} | mean: {:.2} | happiest: {} ({:.2}) | least: {} ({:.2})",
                    view.stats.n,
                    view.stats.mean,
                    view.stats.happiest.country,
                    view.stats.happiest.score,
                    view.stats.saddest.country,
                    view.stats.saddest.score,
                ),
                Style::default().fg(Color::Gray),
            )));
        }

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        match &self.state {
            Some(YearState::Ready(_)) => {}
            Some(YearState::MissingColumns { year, missing }) => {
                let msg = Paragraph::new(format!(
                    "Dataset {year} does not contain the required columns.\nMissing: {}",
                    missing.join(", ")
                ))
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default().title("Schema problem").borders(Borders::ALL));
                frame.render_widget(msg, area);
                return;
            }
            Some(YearState::LoadFailed { year, message }) => {
                let msg = Paragraph::new(format!("Failed to load {year}: {message}"))
                    .style(Style::default().fg(Color::Red))
                    .block(Block::default().title("Load problem").borders(Borders::ALL));
                frame.render_widget(msg, area);
                return;
            }
            None => {
                let msg = Paragraph::new("No yearly datasets available. Try `whi sample`.")
                    .style(Style::default().fg(Color::Yellow))
                    .block(Block::default().borders(Borders::ALL));
                frame.render_widget(msg, area);
                return;
            }
        }

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(42), Constraint::Min(0)])
            .split(area);

        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(7), Constraint::Min(0), Constraint::Length(8)])
            .split(columns[0]);
        self.draw_settings(frame, left[0]);
        self.draw_factors(frame, left[1]);
        self.draw_correlations(frame, left[2]);

        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(12)])
            .split(columns[1]);
        self.draw_rankings(frame, right[0]);
        self.draw_histogram(frame, right[1]);
    }

    fn draw_settings(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let year = self
            .years
            .get(self.year_idx)
            .cloned()
            .unwrap_or_else(|| "-".to_string());
        let country = self.current_country().unwrap_or_else(|| "-".to_string());

        let items = vec![
            ListItem::new(format!("Year: {year}")),
            ListItem::new(format!("Country: {country}")),
            ListItem::new(format!("Top-N: {}", self.top_n)),
        ];

        let list = List::new(items)
            .block(Block::default().title("Filters").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ratatui::widgets::ListState::default();
        state.select(Some(self.selected_field));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_factors(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let Some(YearState::Ready(view)) = &self.state else {
            return;
        };
        let Some(country) = self.current_country() else {
            return;
        };

        let title = format!("Factors — {country}");
        let block = Block::default().title(title).borders(Borders::ALL);

        let Some(factors) = report::factor_breakdown(&view.table, &country) else {
            let msg = Paragraph::new(format!("No data available for {country}."))
                .style(Style::default().fg(Color::Yellow))
                .block(block);
            frame.render_widget(msg, area);
            return;
        };

        // BarChart wants integer heights; factor contributions are small
        // floats, so scale to milli-units.
        let data: Vec<(&str, u64)> = factors
            .iter()
            .map(|(name, v)| (factor_label(name), (v.max(0.0) * 1000.0).round() as u64))
            .collect();

        let chart = BarChart::default()
            .block(block)
            .data(data.as_slice())
            .bar_width(5)
            .bar_gap(1)
            .bar_style(Style::default().fg(Color::Cyan))
            .value_style(Style::default().fg(Color::Black).bg(Color::Cyan));
        frame.render_widget(chart, area);
    }

    fn draw_correlations(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let Some(YearState::Ready(view)) = &self.state else {
            return;
        };

        let correlations = report::factor_correlations(&view.table);
        let lines: Vec<Line> = correlations
            .iter()
            .map(|(name, r)| {
                Line::from(Span::raw(format!(
                    "{:<11} {:+.2} {}",
                    factor_label(name),
                    r,
                    score_bar(r.abs(), 1.0, 18),
                )))
            })
            .collect();

        let p = Paragraph::new(Text::from(lines))
            .block(Block::default().title("Correlation with score").borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_rankings(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let Some(YearState::Ready(view)) = &self.state else {
            return;
        };

        let title = format!("Top {} by happiness score", self.top_n);
        let max_score = view.ranked.first().map(|cs| cs.score).unwrap_or(0.0);
        let bar_width = (area.width.saturating_sub(36) as usize).clamp(10, 40);

        let selected = self.current_country();
        let items: Vec<ListItem> = view
            .ranked
            .iter()
            .take(self.top_n)
            .enumerate()
            .map(|(i, cs)| {
                let style = if selected.as_deref() == Some(cs.country.as_str()) {
                    Style::default().fg(Color::Cyan)
                } else {
                    Style::default()
                };
                ListItem::new(Line::from(Span::styled(
                    format!(
                        "{:>3}. {:<20} {:<width$} {:.3}",
                        i + 1,
                        cs.country,
                        score_bar(cs.score, max_score, bar_width),
                        cs.score,
                        width = bar_width,
                    ),
                    style,
                )))
            })
            .collect();

        let list = List::new(items).block(Block::default().title(title).borders(Borders::ALL));
        frame.render_widget(list, area);
    }

    fn draw_histogram(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let Some(YearState::Ready(view)) = &self.state else {
            return;
        };

        // Bucket count adapts to the panel width so labels stay readable.
        let nbins = ((area.width / 6) as usize).clamp(5, 20);
        let bins = report::score_histogram(&view.table, nbins);

        let labels: Vec<String> = bins.iter().map(|b| format!("{:.1}", b.lo)).collect();
        let data: Vec<(&str, u64)> = labels
            .iter()
            .map(String::as_str)
            .zip(bins.iter().map(|b| b.count as u64))
            .collect();

        let chart = BarChart::default()
            .block(Block::default().title("Score distribution").borders(Borders::ALL))
            .data(data.as_slice())
            .bar_width(4)
            .bar_gap(1)
            .bar_style(Style::default().fg(Color::Green))
            .value_style(Style::default().fg(Color::Black).bg(Color::Green));
        frame.render_widget(chart, area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ select  ←/→ adjust  r rescan  e export  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn cycle(current: usize, len: usize, delta: i32) -> usize {
    if len == 0 {
        return 0;
    }
    if delta >= 0 {
        (current + 1) % len
    } else {
        (current + len - 1) % len
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::SourceArgs;
    use std::path::Path;

    fn write_year(dir: &Path, year: &str, rows: &[(&str, f64)]) {
        let mut out = String::from(
            "Country,Happiness Score,Economy (GDP per Capita),Family,\
             Health (Life Expectancy),Freedom,Trust (Government Corruption),Generosity\n",
        );
        for (country, score) in rows {
            out.push_str(&format!("{country},{score},1.0,1.0,1.0,1.0,1.0,1.0\n"));
        }
        std::fs::write(dir.join(format!("{year}.csv")), out).unwrap();
    }

    fn view_args(dir: &Path, year: &str, country: Option<&str>) -> ViewArgs {
        ViewArgs {
            source: SourceArgs { data: Some(dir.to_path_buf()) },
            year: Some(year.to_string()),
            country: country.map(str::to_string),
            top: 10,
            export: None,
            export_summary: None,
        }
    }

    #[test]
    fn cycle_wraps_both_directions() {
        assert_eq!(cycle(0, 3, 1), 1);
        assert_eq!(cycle(2, 3, 1), 0);
        assert_eq!(cycle(0, 3, -1), 2);
        assert_eq!(cycle(0, 0, 1), 0);
    }

    #[test]
    fn year_change_falls_back_to_happiest_when_country_absent() {
        let tmp = tempfile::tempdir().unwrap();
        write_year(tmp.path(), "2018", &[("Alpha", 7.0), ("Omega", 6.0)]);
        write_year(tmp.path(), "2019", &[("Alpha", 6.5), ("Zed", 7.5)]);

        let mut app = App::new(view_args(tmp.path(), "2018", Some("Omega"))).unwrap();
        assert_eq!(app.current_country().as_deref(), Some("Omega"));

        app.year_idx = app.years.iter().position(|y| y == "2019").unwrap();
        app.reload_year().unwrap();
        // "Omega" has no 2019 row; the selection falls back to the year's
        // happiest country rather than the first name alphabetically.
        assert_eq!(app.current_country().as_deref(), Some("Zed"));
    }

    #[test]
    fn year_change_keeps_surviving_selection_by_name() {
        let tmp = tempfile::tempdir().unwrap();
        write_year(tmp.path(), "2018", &[("Alpha", 7.0), ("Omega", 6.0)]);
        write_year(tmp.path(), "2019", &[("Alpha", 6.5), ("Zed", 7.5)]);

        let mut app = App::new(view_args(tmp.path(), "2018", Some("Alpha"))).unwrap();
        app.year_idx = app.years.iter().position(|y| y == "2019").unwrap();
        app.reload_year().unwrap();
        // "Alpha" survives the year change, so no fallback applies even
        // though "Zed" is now the happiest.
        assert_eq!(app.current_country().as_deref(), Some("Alpha"));
    }
}
