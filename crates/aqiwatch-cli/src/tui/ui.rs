//! TUI rendering.
//!
//! ┌──────────────────────────────────────────────────────────┐
//! │ 🌍 aqiwatch  Delhi   #42  every 10.0s  ● LIVE            │
//! ├───────────────────────┬──────────────────────────────────┤
//! │ Current AQI - Delhi 😐│  AQI Trend - Delhi               │
//! │   123  Unhealthy for  │      ╭─╮    ╭──                  │
//! │ Suggestion: ...       │  ───╯  ╰───╯                     │
//! ├───────────────────────┤                                  │
//! │ Last 8 AQI Readings   ├──────────────────────────────────┤
//! │ [121][119][123][124]  │  ███████████░░░░░░  123 / 300    │
//! │ [126][122][120][123]  │                                  │
//! ├───────────────────────┤                                  │
//! │ AQI Legend · max/min  │                                  │
//! ├───────────────────────┴──────────────────────────────────┤
//! │ r: refresh   p: pause   +/-: rate   s: snapshot   q: quit │
//! └──────────────────────────────────────────────────────────┘

use super::app::App;
use aqiwatch_core::{AQI_MAX, BANDS, BandColor, DashboardView, Tile};
use ratatui::{prelude::*, widgets::*};

/// Terminal color for a band color token.
pub fn band_color(color: BandColor) -> Color {
    match color {
        BandColor::Green => Color::Green,
        BandColor::Yellow => Color::Yellow,
        BandColor::Orange => Color::Rgb(255, 165, 0),
        BandColor::Red => Color::Red,
        BandColor::Purple => Color::Rgb(128, 0, 128),
        BandColor::Maroon => Color::Rgb(128, 0, 0),
    }
}

fn tile_style(color: BandColor) -> Style {
    let fg = if color.wants_dark_text() {
        Color::Black
    } else {
        Color::White
    };
    Style::default().bg(band_color(color)).fg(fg).bold()
}

pub fn draw(f: &mut Frame, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // title
            Constraint::Min(12),   // main
            Constraint::Length(1), // status
            Constraint::Length(1), // keys
        ])
        .split(f.area());

    let Some(view) = app.view() else {
        let p = Paragraph::new("No readings yet").block(Block::default().borders(Borders::ALL));
        f.render_widget(p, rows[1]);
        return;
    };

    draw_title(f, rows[0], app, &view);
    draw_main(f, rows[1], app, &view);
    draw_status(f, rows[2], app);
    draw_keys(f, rows[3]);
}

fn draw_title(f: &mut Frame, area: Rect, app: &App, view: &DashboardView) {
    let (state, state_color) = if app.is_live() {
        ("● LIVE", Color::Green)
    } else {
        ("❚❚ PAUSED", Color::Yellow)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Line::from(vec![
            Span::styled(" 🌍 aqiwatch ", Style::default().bold().fg(Color::Cyan)),
            Span::raw(" Dynamic AQI Dashboard: "),
            Span::styled(view.location.as_str(), Style::default().bold().fg(Color::Yellow)),
            Span::styled(
                format!("  #{}  every {:.1}s  ", view.tick, app.refresh_rate_secs()),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(format!("{state} "), Style::default().bold().fg(state_color)),
        ]));

    f.render_widget(block, area);
}

const CURRENT_HEIGHT: u16 = 6;
const LEGEND_MIN_HEIGHT: u16 = 8;
const TILE_HEIGHT: u16 = 3;

/// Tile rows that fit in a column of `height` next to the card and legend.
pub fn visible_tile_rows(total: usize, height: u16) -> usize {
    let room = height.saturating_sub(CURRENT_HEIGHT + LEGEND_MIN_HEIGHT + 2) / TILE_HEIGHT;
    total.min(usize::from(room))
}

fn draw_main(f: &mut Frame, area: Rect, app: &App, view: &DashboardView) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    let rows = app.tile_rows();
    // Newest rows win when the window is taller than the column.
    let shown = visible_tile_rows(rows.len(), cols[0].height);
    let shown_rows = &rows[rows.len() - shown..];
    let tiles_height = u16::try_from(shown)
        .unwrap_or(u16::MAX)
        .saturating_mul(TILE_HEIGHT)
        .saturating_add(2);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(CURRENT_HEIGHT),
            Constraint::Length(tiles_height),
            Constraint::Min(LEGEND_MIN_HEIGHT),
        ])
        .split(cols[0]);

    draw_current(f, left[0], view);
    draw_tiles(f, left[1], view, shown_rows);
    draw_legend(f, left[2], view);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(cols[1]);

    draw_trend(f, right[0], view);
    draw_gauge(f, right[1], view);
}

fn draw_current(f: &mut Frame, area: Rect, view: &DashboardView) {
    let c = &view.classification;
    let color = band_color(c.color);

    let lines = vec![
        Line::from(vec![
            Span::styled(
                format!(" {} ", view.current.aqi),
                tile_style(c.color).add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(c.label, Style::default().bold().fg(color)),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("Suggestion: ", Style::default().bold()),
            Span::raw(c.advisory),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .title(format!(" {} ", view.headline()));
    let p = Paragraph::new(lines).wrap(Wrap { trim: true }).block(block);
    f.render_widget(p, area);
}

fn draw_tiles(f: &mut Frame, area: Rect, view: &DashboardView, rows: &[Vec<Tile>]) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Last {} AQI Readings ", view.samples.len()));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let row_areas =
        Layout::vertical(vec![Constraint::Length(TILE_HEIGHT); rows.len()]).split(inner);

    for (row, row_area) in rows.iter().zip(row_areas.iter()) {
        let cells = Layout::horizontal([Constraint::Ratio(1, 4); 4])
            .spacing(1)
            .split(*row_area);
        for (tile, cell) in row.iter().zip(cells.iter()) {
            draw_tile(f, *cell, tile);
        }
    }
}

fn draw_tile(f: &mut Frame, area: Rect, tile: &Tile) {
    let p = Paragraph::new(vec![Line::from(""), Line::from(tile.text.as_str())])
        .alignment(Alignment::Center)
        .style(tile_style(tile.color));
    f.render_widget(p, area);
}

fn draw_legend(f: &mut Frame, area: Rect, view: &DashboardView) {
    let mut lines: Vec<Line> = BANDS
        .iter()
        .map(|b| {
            let current = b.band == view.classification.band;
            let pointer = if current { "▸" } else { " " };
            let style = if current {
                Style::default().bold().fg(band_color(b.color))
            } else {
                Style::default().fg(band_color(b.color))
            };
            Line::from(vec![
                Span::raw(format!("{pointer} {} ", b.marker)),
                Span::styled(format!("{:<8}", b.band.range_label()), style),
                Span::raw(format!("{} ", b.emoji)),
                Span::styled(b.label, style),
            ])
        })
        .collect();

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("Max AQI: ", Style::default().bold()),
        Span::raw(view.max.to_string()),
        Span::styled("   Min AQI: ", Style::default().bold()),
        Span::raw(view.min.to_string()),
    ]));

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" AQI Legend ");
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_trend(f: &mut Frame, area: Rect, view: &DashboardView) {
    // One dataset per segment so each can take its band color.
    let segment_points: Vec<[(f64, f64); 2]> = view
        .segments
        .iter()
        .map(|s| {
            [
                (s.from.time as f64, f64::from(s.from.aqi)),
                (s.to.time as f64, f64::from(s.to.aqi)),
            ]
        })
        .collect();
    let points: Vec<(f64, f64)> = view
        .samples
        .iter()
        .map(|s| (s.time as f64, f64::from(s.aqi)))
        .collect();

    let mut datasets: Vec<Dataset> = view
        .segments
        .iter()
        .zip(segment_points.iter())
        .map(|(seg, pts)| {
            Dataset::default()
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(band_color(seg.color)))
                .data(pts)
        })
        .collect();
    datasets.push(
        Dataset::default()
            .marker(symbols::Marker::Dot)
            .graph_type(GraphType::Scatter)
            .style(Style::default().fg(Color::White))
            .data(&points),
    );

    let hover = view
        .tiles
        .last()
        .map(|t| format!(" {} ", t.hover))
        .unwrap_or_default();
    let (x_min, x_max) = x_bounds(view);
    let (y_min, y_max) = y_bounds(view.min, view.max);

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" AQI Trend - {} ", view.location))
                .title_bottom(Line::from(hover).fg(Color::DarkGray)),
        )
        .x_axis(
            Axis::default()
                .title("Time")
                .bounds([x_min, x_max])
                .labels(vec![
                    Line::from(format!("{x_min:.0}")),
                    Line::from(format!("{x_max:.0}")),
                ]),
        )
        .y_axis(
            Axis::default()
                .title("AQI")
                .bounds([y_min, y_max])
                .labels(vec![
                    Line::from(format!("{y_min:.0}")),
                    Line::from(format!("{y_max:.0}")),
                ]),
        );

    f.render_widget(chart, area);
}

/// Time axis covering the window; never zero-width.
pub fn x_bounds(view: &DashboardView) -> (f64, f64) {
    let first = view.samples.first().map_or(0, |s| s.time) as f64;
    let last = view.samples.last().map_or(0, |s| s.time) as f64;
    (first, last.max(first + 1.0))
}

/// AQI axis with a little headroom, kept inside the AQI scale.
pub fn y_bounds(min: i32, max: i32) -> (f64, f64) {
    let lo = (f64::from(min) - 10.0).max(0.0);
    let hi = (f64::from(max) + 10.0).min(f64::from(AQI_MAX));
    if hi <= lo { (lo, lo + 1.0) } else { (lo, hi) }
}

fn draw_gauge(f: &mut Frame, area: Rect, view: &DashboardView) {
    let color = band_color(view.classification.color);
    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Current AQI vs. Max "),
        )
        .gauge_style(Style::default().fg(color).bg(Color::DarkGray))
        .ratio(view.gauge)
        .label(format!("{} / {AQI_MAX}", view.current.aqi));
    f.render_widget(gauge, area);
}

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
    let line = if let Some(err) = app.last_error() {
        Line::from(Span::styled(format!(" error: {err}"), Style::default().fg(Color::Red)))
    } else if let Some(path) = app.last_export() {
        Line::from(Span::styled(
            format!(" snapshot saved: {}", path.display()),
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Line::from(Span::styled(
            " All AQI data is simulated for demonstration purposes only.",
            Style::default().fg(Color::DarkGray),
        ))
    };
    f.render_widget(Paragraph::new(line), area);
}

fn draw_keys(f: &mut Frame, area: Rect) {
    let bar = Paragraph::new(
        " r/space: refresh   p: pause/resume live   +/-: rate   s: snapshot   q: quit",
    )
    .style(Style::default().bg(Color::DarkGray).fg(Color::White));
    f.render_widget(bar, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use aqiwatch_core::{DashboardConfig, DashboardSession, ScriptedSource};
    use ratatui::backend::TestBackend;

    fn view(seed_aqi: i32) -> DashboardView {
        let config = DashboardConfig {
            seed_aqi,
            ..Default::default()
        };
        DashboardSession::start(config, ScriptedSource::constant(0))
            .unwrap()
            .view()
            .unwrap()
    }

    fn render(config: DashboardConfig) -> String {
        let rng: Box<dyn aqiwatch_core::RandomSource> = Box::new(ScriptedSource::constant(0));
        let app = App::new(DashboardSession::start(config, rng).unwrap());

        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|f| draw(f, &app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn band_colors_are_distinct() {
        let colors: std::collections::HashSet<String> = BANDS
            .iter()
            .map(|b| format!("{:?}", band_color(b.color)))
            .collect();
        assert_eq!(colors.len(), BANDS.len());
    }

    #[test]
    fn yellow_tiles_use_dark_text() {
        assert_eq!(tile_style(BandColor::Yellow).fg, Some(Color::Black));
        assert_eq!(tile_style(BandColor::Red).fg, Some(Color::White));
    }

    #[test]
    fn y_bounds_stay_on_scale() {
        assert_eq!(y_bounds(100, 120), (90.0, 130.0));
        assert_eq!(y_bounds(3, 20), (0.0, 30.0));
        assert_eq!(y_bounds(295, 300), (285.0, 300.0));
        assert_eq!(y_bounds(300, 300), (290.0, 300.0));
    }

    #[test]
    fn x_bounds_cover_window() {
        let v = view(120);
        assert_eq!(x_bounds(&v), (13.0, 20.0));
    }

    #[test]
    fn draws_full_dashboard() {
        let text = render(DashboardConfig::default());
        assert!(text.contains("aqiwatch"));
        assert!(text.contains("Delhi"));
        assert!(text.contains("120 / 300"));
        assert!(text.contains("AQI Legend"));
        assert!(text.contains("AQI: 120 | Status: Unhealthy for Sensitive Groups"));
    }

    #[test]
    fn draws_windows_taller_than_the_screen() {
        let text = render(DashboardConfig {
            window: 90_000,
            seed_len: 90_000,
            ..Default::default()
        });
        assert!(text.contains("Last 90000 AQI Readings"));
        assert!(text.contains("120 / 300"));
    }

    #[test]
    fn tile_rows_limited_by_height() {
        assert_eq!(visible_tile_rows(2, 35), 2);
        assert_eq!(visible_tile_rows(22_500, 35), 6);
        assert_eq!(visible_tile_rows(22_500, 10), 0);
        assert_eq!(visible_tile_rows(0, 35), 0);
    }
}
