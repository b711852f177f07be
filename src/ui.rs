pub mod charting;
pub mod theme;
pub mod words;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Block, Chart, Dataset, GraphType, Paragraph, Widget},
};

use crate::{
    app::{App, View},
    config::{Config, TestDuration, TestType, WordCount},
    scoring::TestResults,
    session::{Limit, Session},
};
use theme::{palette, Palette};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;
const WORD_ROWS: u16 = 3;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.view() {
            View::Start => render_start(self.config(), area, buf),
            View::Session(session) => match session.results() {
                Some(results) => render_results(session, results, area, buf),
                None => render_typing(session, area, buf),
            },
        }
    }
}

/// Vertically center `height` rows inside `area`.
fn centered(area: Rect, height: u16) -> Rect {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(height),
            Constraint::Fill(1),
        ])
        .split(area);
    chunks[1]
}

/// `a | b | c` with the selected option highlighted.
fn options<T: PartialEq + ToString>(p: &Palette, all: &[T], selected: &T) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    for (idx, opt) in all.iter().enumerate() {
        if idx > 0 {
            spans.push(Span::styled(" ", p.dim()));
        }
        let style = if opt == selected { p.accent() } else { p.dim() };
        spans.push(Span::styled(opt.to_string(), style));
    }
    spans
}

fn render_start(config: &Config, area: Rect, buf: &mut Buffer) {
    let p = palette(config.theme);
    Block::default().style(p.base()).render(area, buf);

    let mut selectors = options(&p, &[TestType::Time, TestType::Words], &config.test_type);
    selectors.push(Span::styled("   ", p.dim()));
    selectors.extend(match config.test_type {
        TestType::Time => options(&p, &TestDuration::ALL, &config.duration),
        TestType::Words => options(&p, &WordCount::ALL, &config.word_count),
    });

    let lines = vec![
        Line::from(Span::styled("keysprint", p.accent())),
        Line::default(),
        Line::from(selectors),
        Line::default(),
        Line::from(Span::styled("words appear", p.bold())),
        Line::from(Span::styled("you type them", p.dim())),
        Line::default(),
        Line::from(Span::styled("press enter to start", p.bold())),
        Line::default(),
        Line::from(Span::styled(
            "(m)ode / (d)uration ←→ / (t)heme / (q)uit",
            p.dim().add_modifier(Modifier::ITALIC),
        )),
    ];

    let height = lines.len() as u16;
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(centered(area, height), buf);
}

fn status_line(session: &Session, p: &Palette) -> Line<'static> {
    let progress = match session.limit() {
        Limit::Time(_) => format!("{}s", session.time_left().unwrap_or(0)),
        Limit::Words(count) => format!(
            "{}/{}",
            session.cursor().word_index.min(count.count()),
            count.count()
        ),
    };

    let mut spans = vec![Span::styled(progress, p.accent())];
    if let Limit::Time(current) = session.limit() {
        if session.pending_duration() != current {
            spans.push(Span::styled(
                format!("   next run {}s", session.pending_duration()),
                p.dim(),
            ));
        }
    }
    Line::from(spans)
}

fn render_typing(session: &Session, area: Rect, buf: &mut Buffer) {
    let p = palette(session.theme());
    Block::default().style(p.base()).render(area, buf);

    let inner = centered(area, WORD_ROWS + 4);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(WORD_ROWS),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

    Paragraph::new(status_line(session, &p)).render(chunks[0], buf);

    let lines = words::render_lines(
        session,
        &p,
        chunks[2].width as usize,
        WORD_ROWS as usize,
    );
    Paragraph::new(lines).render(chunks[2], buf);

    let hint = if session.is_idle() {
        Span::styled("start typing to begin", p.bold())
    } else {
        Span::styled(
            "(tab) restart / (ctrl+t) theme / (ctrl+d) duration / (esc) back",
            p.dim().add_modifier(Modifier::ITALIC),
        )
    };
    Paragraph::new(Line::from(hint))
        .alignment(Alignment::Center)
        .render(chunks[4], buf);
}

fn render_results(session: &Session, results: &TestResults, area: Rect, buf: &mut Buffer) {
    let p = palette(session.theme());
    Block::default().style(p.base()).render(area, buf);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(1), // stats
            Constraint::Length(1), // padding
            Constraint::Min(1),    // chart
            Constraint::Length(1), // settings
            Constraint::Length(1), // padding
            Constraint::Length(1), // legend
        ])
        .split(area);

    let stats = Line::from(vec![
        Span::styled(format!("{}", results.wpm), p.accent()),
        Span::styled(" wpm   ", p.dim()),
        Span::styled(format!("{}%", results.accuracy), p.accent()),
        Span::styled(" acc   ", p.dim()),
        Span::styled(format!("{}", results.total_chars), p.accent()),
        Span::styled(" chars   ", p.dim()),
        Span::styled(format!("{}", results.mistakes), p.accent()),
        Span::styled(" mistakes", p.dim()),
    ]);
    Paragraph::new(stats)
        .alignment(Alignment::Center)
        .render(chunks[0], buf);

    let run_secs = match session.limit() {
        Limit::Time(duration) => duration.secs(),
        Limit::Words(_) => results.elapsed_secs,
    };
    let (overall_duration, highest_wpm) =
        charting::compute_chart_params(&results.samples, run_secs);
    let points: Vec<(f64, f64)> = results.samples.iter().map(|&s| s.into()).collect();
    let datasets = vec![Dataset::default()
        .marker(Marker::Braille)
        .style(Style::default().fg(p.correct))
        .graph_type(GraphType::Line)
        .data(&points)];

    let axis_style = p.dim();
    let label_style = p.bold();
    let chart = Chart::new(datasets)
        .style(p.base())
        .x_axis(
            Axis::default()
                .title("seconds")
                .style(axis_style)
                .bounds([0.0, overall_duration])
                .labels(vec![
                    Span::styled("0", label_style),
                    Span::styled(charting::format_label(overall_duration), label_style),
                ]),
        )
        .y_axis(
            Axis::default()
                .title("wpm")
                .style(axis_style)
                .bounds([0.0, highest_wpm])
                .labels(vec![
                    Span::styled("0", label_style),
                    Span::styled(charting::format_label(highest_wpm), label_style),
                ]),
        );
    chart.render(chunks[2], buf);

    let settings = match session.limit() {
        Limit::Time(duration) => format!(
            "time {}s / next run {}s / theme {}",
            duration,
            session.pending_duration(),
            session.theme()
        ),
        Limit::Words(count) => format!(
            "words {} in {}s / theme {}",
            count,
            results.elapsed_secs,
            session.theme()
        ),
    };
    Paragraph::new(Span::styled(settings, p.dim()))
        .alignment(Alignment::Center)
        .render(chunks[3], buf);

    Paragraph::new(Span::styled(
        "(r)estart / (t)heme / (d)uration / (esc) back / (q)uit",
        p.dim().add_modifier(Modifier::ITALIC),
    ))
    .render(chunks[5], buf);
}
