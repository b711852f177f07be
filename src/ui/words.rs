use std::ops::Range;

use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthStr;

use crate::session::Session;
use crate::ui::theme::Palette;

/// Split words into lines no wider than `width`, counting one separator
/// after every word. Each line is a range of word indices.
pub fn wrap_lines(words: &[&str], width: usize) -> Vec<Range<usize>> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut used = 0;

    for (idx, word) in words.iter().enumerate() {
        let w = word.width() + 1;
        if used > 0 && used + w > width {
            lines.push(start..idx);
            start = idx;
            used = 0;
        }
        used += w;
    }
    if start < words.len() {
        lines.push(start..words.len());
    }
    lines
}

/// Lines to show so that `target_word` stays on screen, roughly centered.
pub fn visible_lines(lines: &[Range<usize>], target_word: usize, rows: usize) -> Range<usize> {
    if lines.is_empty() || rows == 0 {
        return 0..0;
    }
    let target_line = lines
        .iter()
        .position(|l| l.contains(&target_word))
        .unwrap_or(lines.len() - 1);

    let top = target_line
        .saturating_sub(rows.saturating_sub(1) / 2)
        .min(lines.len().saturating_sub(rows));
    top..(top + rows).min(lines.len())
}

/// Styled characters of one word followed by its separator.
fn word_spans<'a>(session: &Session, palette: &Palette, word_index: usize) -> Vec<Span<'a>> {
    let stream = session.stream();
    let cursor = session.cursor();
    let is_active = cursor.word_index == word_index;
    let Some(word) = stream.word(word_index) else {
        return Vec::new();
    };

    let base = if is_active {
        Style::default().bg(palette.highlight)
    } else {
        Style::default()
    };
    let cursor_style = Modifier::UNDERLINED | Modifier::BOLD;

    let mut spans = word
        .chars()
        .enumerate()
        .map(|(char_index, expected)| {
            let abs = stream.absolute_index(word_index, char_index);
            let fg = match session.typed().get(abs) {
                Some(typed) if typed == expected => palette.correct,
                Some(_) => palette.incorrect,
                None => palette.dim,
            };
            let mut style = base.fg(fg);
            if is_active && cursor.char_index == char_index {
                style = style.add_modifier(cursor_style);
            }
            Span::styled(expected.to_string(), style)
        })
        .collect::<Vec<Span>>();

    let word_len = word.chars().count();
    let mut separator = Style::default();
    if session
        .typed()
        .get(stream.absolute_index(word_index, word_len))
        .is_some()
    {
        separator = separator.bg(palette.incorrect);
    }
    if is_active && cursor.char_index >= word_len {
        separator = separator.add_modifier(cursor_style).fg(palette.dim);
    }
    spans.push(Span::styled(" ", separator));
    spans
}

/// The slice of the word stream that fits in `rows` lines of `width`.
pub fn render_lines<'a>(
    session: &Session,
    palette: &Palette,
    width: usize,
    rows: usize,
) -> Vec<Line<'a>> {
    let lines = wrap_lines(session.stream().words(), width);
    let window = visible_lines(&lines, session.scroll_target(), rows);

    lines[window]
        .iter()
        .map(|range| {
            Line::from(
                range
                    .clone()
                    .flat_map(|idx| word_spans(session, palette, idx))
                    .collect::<Vec<Span>>(),
            )
        })
        .collect()
}
