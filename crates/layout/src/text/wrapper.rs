//! Character-budget line breaking.

use crate::LayoutConfig;

/// Splits `text` into its explicit lines with the whitespace prefix shared by
/// every non-blank line removed. Blank lines are ignored when computing the
/// prefix and come out empty, one entry per line.
pub fn dedent(text: &str) -> Vec<&str> {
    let prefix = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| &line[..line.len() - line.trim_start().len()])
        .reduce(|common, indent| {
            let shared = common
                .char_indices()
                .zip(indent.chars())
                .find(|((_, a), b)| a != b)
                .map_or(common.len().min(indent.len()), |((i, _), _)| i);
            &common[..shared]
        })
        .unwrap_or("");

    text.lines()
        .map(|line| {
            if line.trim().is_empty() {
                ""
            } else {
                line.strip_prefix(prefix).unwrap_or(line)
            }
        })
        .collect()
}

/// The maximum number of characters per line for a font size on a page of
/// `page_width` with a horizontal margin of `margin_x` on each side.
pub fn max_chars_per_line(
    font_size: f32,
    page_width: f32,
    margin_x: f32,
    config: &LayoutConfig,
) -> usize {
    let char_width = font_size * config.char_width_factor;
    let usable = page_width - 2.0 * margin_x;
    let budget = usable / char_width;
    if !(char_width > 0.0) || !budget.is_finite() || budget <= 0.0 {
        return config.min_line_chars;
    }
    (budget.floor() as usize).max(config.min_line_chars)
}

/// Greedily wraps one explicit line so that no output line exceeds
/// `max_chars` characters. Runs of whitespace collapse to one space; words
/// longer than the budget are broken.
pub fn wrap_line(line: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in line.split_whitespace() {
        let word_len = word.chars().count();

        if word_len > max_chars {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let chars: Vec<char> = word.chars().collect();
            let mut chunks = chars.chunks(max_chars).peekable();
            while let Some(chunk) = chunks.next() {
                let piece: String = chunk.iter().collect();
                if chunks.peek().is_some() {
                    lines.push(piece);
                } else {
                    current_len = chunk.len();
                    current = piece;
                }
            }
            continue;
        }

        if current.is_empty() {
            current.push_str(word);
            current_len = word_len;
        } else if current_len + 1 + word_len <= max_chars {
            current.push(' ');
            current.push_str(word);
            current_len += 1 + word_len;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
            current_len = word_len;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
