pub mod charting;

use itertools::{Itertools, Position};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Chart, Clear, Dataset, GraphType, Paragraph, Widget, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::{App, Lifecycle};
use crate::config::{Config, Mode};
use crate::session::LetterState;
use crate::stats::StatsEngine;

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

pub fn draw(app: &App, f: &mut Frame) {
    f.render_widget(app, f.area());
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.lifecycle() {
            Lifecycle::Finished => render_results(self, area, buf),
            Lifecycle::Idle | Lifecycle::Active => render_typing(self, area, buf),
        }
    }
}

fn render_typing(app: &App, area: Rect, buf: &mut Buffer) {
    let dim_style = Style::default().add_modifier(Modifier::DIM);
    let counter_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);

    let max_chars_per_line = area.width.saturating_sub(HORIZONTAL_MARGIN * 2).max(1);
    let source_width = app.session().text().source().width() as u16;
    let text_lines = if source_width <= max_chars_per_line {
        1
    } else {
        source_width / max_chars_per_line + 2
    };
    let padding = area.height.saturating_sub(text_lines + 4) / 2;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Length(padding),
            Constraint::Length(1), // config bar
            Constraint::Length(1), // counter
            Constraint::Length(1), // realtime stats
            Constraint::Length(text_lines),
            Constraint::Min(0),
        ])
        .split(area);

    if !app.is_typing() {
        Paragraph::new(config_bar(app.config()))
            .alignment(Alignment::Center)
            .render(chunks[1], buf);
    }

    if let Some(counter) = counter_text(app) {
        Paragraph::new(Span::styled(counter, counter_style))
            .alignment(Alignment::Center)
            .render(chunks[2], buf);
    }

    if app.config().show_realtime_stats {
        Paragraph::new(Span::styled(realtime_stats_text(app.stats()), dim_style))
            .alignment(Alignment::Center)
            .render(chunks[3], buf);
    }

    Paragraph::new(Line::from(text_spans(app)))
        .alignment(if text_lines == 1 {
            Alignment::Center
        } else {
            Alignment::Left
        })
        .wrap(Wrap { trim: false })
        .render(chunks[4], buf);

    if !app.is_focused() {
        Clear.render(chunks[4], buf);
        Paragraph::new(Span::styled(
            "focus lost - press enter to continue",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::ITALIC),
        ))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(chunks[4], buf);
    }
}

fn render_results(app: &App, area: Rect, buf: &mut Buffer) {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let italic_style = Style::default().add_modifier(Modifier::ITALIC);
    let stats = app.stats();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1), // padding
            Constraint::Length(1),
        ])
        .split(area);

    let (overall_duration, highest_wpm) = charting::compute_chart_params(stats.history());
    let raw: Vec<(f64, f64)> = stats.history().iter().map(|s| s.raw_point()).collect();
    let net: Vec<(f64, f64)> = stats.history().iter().map(|s| s.net_point()).collect();

    let datasets = vec![
        Dataset::default()
            .name("raw")
            .marker(symbols::Marker::Braille)
            .style(Style::default().fg(Color::Gray))
            .graph_type(GraphType::Line)
            .data(&raw),
        Dataset::default()
            .name("wpm")
            .marker(symbols::Marker::Braille)
            .style(Style::default().fg(Color::Cyan))
            .graph_type(GraphType::Line)
            .data(&net),
    ];

    Chart::new(datasets)
        .x_axis(
            Axis::default()
                .title("seconds")
                .bounds([1.0, overall_duration])
                .labels(vec![
                    Span::styled("1", bold_style),
                    Span::styled(charting::format_label(overall_duration), bold_style),
                ]),
        )
        .y_axis(
            Axis::default()
                .title("wpm")
                .bounds([0.0, highest_wpm.max(1.0)])
                .labels(vec![
                    Span::styled("0", bold_style),
                    Span::styled(charting::format_label(highest_wpm), bold_style),
                ]),
        )
        .render(chunks[0], buf);

    Paragraph::new(Span::styled(results_text(stats), bold_style))
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

    Paragraph::new(Span::styled(
        "(r)new / (t)retry / (esc)ape",
        italic_style,
    ))
    .render(chunks[3], buf);
}

fn text_spans(app: &App) -> Vec<Span<'static>> {
    let session = app.session();
    let cursor = session.position();
    let show_cursor = app.lifecycle() != Lifecycle::Finished;
    let mut spans = Vec::new();

    for (place, (w, word)) in session.text().words().iter().enumerate().with_position() {
        for (l, ch) in word.iter().enumerate() {
            let mut style = letter_style(session.letter_state(w, l));
            if show_cursor && cursor.word == w && cursor.letter == l {
                style = style.add_modifier(Modifier::UNDERLINED);
            }
            spans.push(Span::styled(ch.to_string(), style));
        }

        if matches!(place, Position::First | Position::Middle) {
            // lit up once the word is done and waiting for its space
            let style = if show_cursor && cursor.word == w && session.awaiting_separator() {
                Style::default().bg(Color::DarkGray)
            } else {
                Style::default()
            };
            spans.push(Span::styled(" ", style));
        }
    }

    spans
}

fn letter_style(state: LetterState) -> Style {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    match state {
        LetterState::Pending => bold.fg(Color::DarkGray),
        LetterState::Correct => bold.fg(Color::Cyan),
        LetterState::Typo => bold.fg(Color::Red),
        LetterState::Completed => bold.fg(Color::White),
    }
}

fn config_bar(config: &Config) -> Line<'static> {
    let active = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let inactive = Style::default().fg(Color::DarkGray);
    let pick = |on: bool| if on { active } else { inactive };
    let on_off = |on: bool| if on { "on" } else { "off" };

    Line::from(vec![
        Span::styled("F1 time", pick(config.mode == Mode::Time)),
        Span::raw("  "),
        Span::styled("F2 words", pick(config.mode == Mode::Words)),
        Span::raw("  "),
        Span::styled("F3 zen", pick(config.mode == Mode::Zen)),
        Span::raw("  |  "),
        Span::styled(
            format!("F4 stats {}", on_off(config.show_realtime_stats)),
            pick(config.show_realtime_stats),
        ),
        Span::raw("  "),
        Span::styled(
            format!("F5 case {}", on_off(config.case_sensitive)),
            pick(config.case_sensitive),
        ),
    ])
}

/// Live counter for the configured mode; zen shows nothing
pub fn counter_text(app: &App) -> Option<String> {
    match app.config().mode {
        Mode::Time => Some(app.stats().seconds_elapsed().to_string()),
        Mode::Words => Some(format!(
            "{}/{}",
            app.stats().words_completed(),
            app.session().text().display_word_count()
        )),
        Mode::Zen => None,
    }
}

pub fn format_accuracy(accuracy: Option<f64>) -> String {
    match accuracy {
        Some(acc) => format!("{acc:.1}%"),
        None => "N/A".to_string(),
    }
}

pub fn realtime_stats_text(stats: &StatsEngine) -> String {
    format!(
        "Elapsed: {}sec   WPM: {:.1}   Accuracy: {}   Typos: {}",
        stats.seconds_elapsed(),
        stats.raw_wpm(),
        format_accuracy(stats.accuracy()),
        stats.typos()
    )
}

pub fn results_text(stats: &StatsEngine) -> String {
    format!(
        "{:.1} wpm   {:.1} net   {} sec   {} acc",
        stats.raw_wpm(),
        stats.net_wpm(),
        stats.seconds_elapsed(),
        format_accuracy(stats.accuracy())
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Key;
    use crate::text_provider::FixedText;
    use std::time::{Duration, Instant};

    fn app_with(text: &str, config: Config) -> App {
        App::new(config, Box::new(FixedText::new(text)))
    }

    fn rendered(app: &App, width: u16, height: u16) -> String {
        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);
        app.render(area, &mut buf);

        (0..height)
            .map(|y| (0..width).map(|x| buf[(x, y)].symbol()).collect::<String>())
            .join("\n")
    }

    #[test]
    fn test_format_accuracy() {
        assert_eq!(format_accuracy(None), "N/A");
        assert_eq!(format_accuracy(Some(75.0)), "75.0%");
        assert_eq!(format_accuracy(Some(100.0)), "100.0%");
    }

    #[test]
    fn test_realtime_stats_before_typing() {
        let stats = StatsEngine::new();
        assert_eq!(
            realtime_stats_text(&stats),
            "Elapsed: 0sec   WPM: 0.0   Accuracy: N/A   Typos: 0"
        );
    }

    #[test]
    fn test_counter_by_mode() {
        let mut app = app_with("one two  three", Config::default());
        assert_eq!(counter_text(&app).as_deref(), Some("0"));

        app.set_mode(Mode::Words);
        assert_eq!(counter_text(&app).as_deref(), Some("0/3"));

        app.set_mode(Mode::Zen);
        assert_eq!(counter_text(&app), None);
    }

    #[test]
    fn test_typing_screen_shows_text_and_config() {
        let app = app_with("cat dog", Config::default());
        let screen = rendered(&app, 80, 12);

        assert!(screen.contains("cat dog"));
        assert!(screen.contains("F1 time"));
        assert!(screen.contains("Accuracy: N/A"));
    }

    #[test]
    fn test_config_bar_hidden_while_typing() {
        let mut app = app_with("cat dog", Config::default());
        app.on_key(Key::Char('c'), Instant::now());

        let screen = rendered(&app, 80, 12);
        assert!(!screen.contains("F1 time"));
        assert!(screen.contains("cat dog"));
    }

    #[test]
    fn test_realtime_stats_can_be_hidden() {
        let config = Config {
            show_realtime_stats: false,
            ..Config::default()
        };
        let app = app_with("cat dog", config);

        assert!(!rendered(&app, 80, 12).contains("Accuracy"));
    }

    #[test]
    fn test_focus_lost_overlay() {
        let mut app = app_with("cat dog", Config::default());
        app.set_focus(false, Instant::now());

        let screen = rendered(&app, 80, 12);
        assert!(screen.contains("focus lost"));
        assert!(!screen.contains("cat dog"));
    }

    #[test]
    fn test_results_screen() {
        let t0 = Instant::now();
        let mut app = app_with("hi", Config::default());
        app.on_key(Key::Char('h'), t0);
        app.on_tick(t0 + Duration::from_secs(2));
        app.on_key(Key::Char('i'), t0 + Duration::from_secs(2));

        let screen = rendered(&app, 80, 20);
        assert!(screen.contains("12.0 wpm"));
        assert!(screen.contains("2 sec"));
        assert!(screen.contains("100.0% acc"));
        assert!(screen.contains("(r)new"));
    }

    #[test]
    fn test_long_text_wraps_without_panicking() {
        let text = "lorem ipsum dolor sit amet ".repeat(20);
        let app = app_with(text.trim_end(), Config::default());

        let screen = rendered(&app, 40, 30);
        assert!(screen.contains("lorem"));
    }
}
