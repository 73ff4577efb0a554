use crate::template::non_negative;
use crate::units::Px;

/// Line height of wrapped text, as a multiple of the font size
pub const LINE_HEIGHT_FACTOR: f32 = 1.2;

/// Anything that can report how far the pen advances for a glyph at a given size.
/// Implementations must be pure: the same glyph and size always yield the same
/// advance.
pub trait GlyphMetrics {
    /// Horizontal advance of `ch` at font size `size`
    fn advance(&self, ch: char, size: Px) -> Px;

    /// Calculate the width of a given string of text at the given font size
    fn width_of_text(&self, text: &str, size: Px) -> Px {
        text.chars().map(|ch| self.advance(ch, size)).sum()
    }
}

impl<T: GlyphMetrics + ?Sized> GlyphMetrics for &T {
    fn advance(&self, ch: char, size: Px) -> Px {
        (**self).advance(ch, size)
    }
}

/// Metrics where every glyph advances by the same fraction of the font size.
/// Useful when no font file is at hand, and fully deterministic.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FixedPitch {
    /// Advance of every glyph, as a fraction of the font size
    pub em_advance: f32,
}

impl Default for FixedPitch {
    fn default() -> Self {
        FixedPitch { em_advance: 0.6 }
    }
}

impl GlyphMetrics for FixedPitch {
    fn advance(&self, _ch: char, size: Px) -> Px {
        size * self.em_advance
    }
}

/// One line of laid out text
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub text: String,
    pub width: Px,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TextSize {
    pub width: Px,
    pub height: Px,
}

/// Text broken into lines, along with the size of the block it occupies
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    /// Always holds at least one (possibly empty) line
    pub lines: Vec<Line>,
    /// Widest line, clamped to the maximum width when one was given
    pub width: Px,
    pub height: Px,
    /// Vertical distance between the tops of consecutive lines
    pub line_height: Px,
}

impl TextBlock {
    pub fn size(&self) -> TextSize {
        TextSize {
            width: self.width,
            height: self.height,
        }
    }
}

/// Greedily pack space-separated words into lines no wider than `max_width`.
///
/// A line is broken before the word that would make it overflow. A word that is
/// wider than `max_width` on its own is never split; it gets a line to itself and
/// overflows. Newlines always start a new line. An empty string yields a single
/// empty line.
pub fn wrap_lines<M: GlyphMetrics + ?Sized>(
    metrics: &M,
    text: &str,
    size: Px,
    max_width: Px,
) -> Vec<Line> {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    let mut lines: Vec<Line> = Vec::new();

    for paragraph in text.split('\n') {
        let mut line = String::new();
        for word in paragraph.split(' ') {
            let candidate = if line.is_empty() {
                word.to_string()
            } else {
                format!("{line} {word}")
            };

            if !line.is_empty() && metrics.width_of_text(&candidate, size) > max_width {
                let width = metrics.width_of_text(&line, size);
                let finished = std::mem::replace(&mut line, word.to_string());
                lines.push(Line {
                    text: finished,
                    width,
                });
            } else {
                line = candidate;
            }
        }

        let width = metrics.width_of_text(&line, size);
        lines.push(Line { text: line, width });
    }

    lines
}

/// Lay out `text` at font size `size`.
///
/// * single line: the whole string on one line, newlines folded into spaces; the
///   width is clamped to `max_width` and the height is the font size
/// * multiline: lines from [wrap_lines]; the width is the widest line clamped to
///   `max_width` and the height is `lines × size × LINE_HEIGHT_FACTOR`
///
/// A missing `max_width` never wraps or clamps.
pub fn layout_text<M: GlyphMetrics + ?Sized>(
    metrics: &M,
    text: &str,
    size: Px,
    max_width: Option<Px>,
    multiline: bool,
) -> TextBlock {
    let size = Px(non_negative(*size));
    let max_width = max_width
        .map(|w| Px(non_negative(*w)))
        .unwrap_or(Px(f32::INFINITY));

    if multiline {
        let lines = wrap_lines(metrics, text, size, max_width);
        let widest = lines.iter().map(|l| l.width).fold(Px(0.0), Px::max);
        let line_height = size * LINE_HEIGHT_FACTOR;
        let height = line_height * lines.len() as f32;
        TextBlock {
            lines,
            width: widest.min(max_width),
            height,
            line_height,
        }
    } else {
        let text = text.replace("\r\n", " ").replace(['\r', '\n'], " ");
        let width = metrics.width_of_text(&text, size);
        TextBlock {
            lines: vec![Line { text, width }],
            width: width.min(max_width),
            height: size,
            line_height: size,
        }
    }
}

/// Measure the box `text` occupies; see [layout_text]
pub fn measure<M: GlyphMetrics + ?Sized>(
    metrics: &M,
    text: &str,
    size: Px,
    max_width: Option<Px>,
    multiline: bool,
) -> TextSize {
    layout_text(metrics, text, size, max_width, multiline).size()
}

#[cfg(test)]
mod tests {
    use super::*;

    // 10px per glyph at size 10
    const MONO: FixedPitch = FixedPitch { em_advance: 1.0 };

    fn texts(lines: &[Line]) -> Vec<&str> {
        lines.iter().map(|l| l.text.as_str()).collect()
    }

    #[test]
    fn single_line_clamps_width_and_uses_font_size_as_height() {
        let size = measure(&MONO, "hello world", Px(10.0), Some(Px(50.0)), false);
        assert_eq!(size.width, Px(50.0));
        assert_eq!(size.height, Px(10.0));

        let size = measure(&MONO, "hi", Px(10.0), None, false);
        assert_eq!(size.width, Px(20.0));
    }

    #[test]
    fn wraps_before_the_overflowing_word() {
        let lines = wrap_lines(&MONO, "aa bb cc dd", Px(10.0), Px(50.0));
        assert_eq!(texts(&lines), ["aa bb", "cc dd"]);
        assert_eq!(lines[0].width, Px(50.0));
    }

    #[test]
    fn long_words_get_their_own_line() {
        let block = layout_text(&MONO, "a enormously b", Px(10.0), Some(Px(40.0)), true);
        assert_eq!(texts(&block.lines), ["a", "enormously", "b"]);
        // the widest line is 100px but the reported width is clamped
        assert_eq!(block.width, Px(40.0));
        assert!((*block.height - 36.0).abs() < 1e-4);
    }

    #[test]
    fn empty_text_is_one_line() {
        let block = layout_text(&MONO, "", Px(10.0), Some(Px(40.0)), true);
        assert_eq!(block.lines.len(), 1);
        assert_eq!(block.width, Px(0.0));
        assert!((*block.height - 12.0).abs() < 1e-4);

        let size = measure(&MONO, "", Px(10.0), None, false);
        assert_eq!(size.height, Px(10.0));
    }

    #[test]
    fn newlines_are_hard_breaks_only_when_multiline() {
        let block = layout_text(&MONO, "ab\ncd", Px(10.0), None, true);
        assert_eq!(texts(&block.lines), ["ab", "cd"]);

        let block = layout_text(&MONO, "ab\r\ncd", Px(10.0), None, false);
        assert_eq!(texts(&block.lines), ["ab cd"]);
    }

    #[test]
    fn measuring_matches_the_drawn_lines() {
        let text = "Acme Widgets International Limited";
        let block = layout_text(&MONO, text, Px(10.0), Some(Px(120.0)), true);
        let again = measure(&MONO, text, Px(10.0), Some(Px(120.0)), true);
        assert_eq!(block.size(), again);
        let widest = block.lines.iter().map(|l| l.width).fold(Px(0.0), Px::max);
        assert_eq!(block.width, widest.min(Px(120.0)));
        assert_eq!(block.lines.len(), 3);
    }

    #[test]
    fn invalid_sizes_are_zero() {
        let size = measure(&MONO, "abc", Px(-3.0), Some(Px(f32::NAN)), true);
        assert_eq!(size.width, Px(0.0));
        assert_eq!(size.height, Px(0.0));
    }
}
