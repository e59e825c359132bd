//! Text auto-fit
//!
//! Card text starts at a comfortable base size and shrinks in small steps
//! until the wrapped block fits inside its box. The minimum size is a hard
//! floor: text that still overflows there is accepted as is.

/// Measured size of a wrapped text block, in points
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Extent {
    pub width_pt: f32,
    pub height_pt: f32,
}

/// Content box of a container (inside its padding), in points
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ContentBox {
    pub width_pt: f32,
    pub height_pt: f32,
}

impl ContentBox {
    pub fn new(width_pt: f32, height_pt: f32) -> Self {
        Self {
            width_pt,
            height_pt,
        }
    }

    /// A box without real layout has no meaningful bounds to fit against
    pub fn is_measurable(&self) -> bool {
        self.width_pt > 0.0 && self.height_pt > 0.0
    }

    pub fn contains(&self, extent: Extent) -> bool {
        extent.width_pt <= self.width_pt && extent.height_pt <= self.height_pt
    }
}

/// Measures text laid out at a given size and wrap width
pub trait TextMeasure {
    fn measure(&self, text: &str, size_pt: f32, max_width_pt: f32) -> Extent;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitParams {
    pub base_size_pt: f32,
    pub min_size_pt: f32,
    pub step_pt: f32,
}

impl Default for FitParams {
    fn default() -> Self {
        Self {
            base_size_pt: 10.0,
            min_size_pt: 7.0,
            step_pt: 0.25,
        }
    }
}

/// Upper bound on shrink steps, whatever the params or the measurer report
pub const MAX_FIT_ITERATIONS: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FitOutcome {
    /// Text fits at this size
    Fitted { size_pt: f32 },
    /// Shrinking stopped (floor or iteration cap) and the text still overflows
    Overflowing { size_pt: f32 },
    /// Container had no layout yet; size left untouched
    Skipped,
}

impl FitOutcome {
    pub fn size_pt(&self) -> Option<f32> {
        match self {
            FitOutcome::Fitted { size_pt } | FitOutcome::Overflowing { size_pt } => Some(*size_pt),
            FitOutcome::Skipped => None,
        }
    }
}

/// Find the largest size in `[min, base]`, stepping down from `base`, at
/// which `text` fits `container`.
pub fn fit_text(
    text: &str,
    container: ContentBox,
    measure: &dyn TextMeasure,
    params: &FitParams,
) -> FitOutcome {
    if !container.is_measurable() {
        return FitOutcome::Skipped;
    }

    let base = params.base_size_pt;
    let min = params.min_size_pt.min(base);

    let mut size = base;
    let mut extent = measure.measure(text, size, container.width_pt);
    let mut iterations = 0;

    while !container.contains(extent) && size > min && iterations < MAX_FIT_ITERATIONS {
        size = (size - params.step_pt).clamp(min, base);
        extent = measure.measure(text, size, container.width_pt);
        iterations += 1;
    }

    if container.contains(extent) {
        FitOutcome::Fitted { size_pt: size }
    } else {
        FitOutcome::Overflowing { size_pt: size }
    }
}

/// Line height as a multiple of the font size
pub const LINE_HEIGHT: f32 = 1.2;

/// Advance widths of Helvetica for ASCII 32..=126, in 1/1000 em
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0..9
    278, 278, 584, 584, 584, 556, 1015, // :..@
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // A..M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N..Z
    278, 278, 278, 469, 556, 333, // [..`
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // a..m
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // n..z
    334, 260, 334, 584, // {..~
];

/// Width used for characters outside the ASCII table
const FALLBACK_WIDTH: u16 = 556;

/// Word-wrapping measurer based on the builtin Helvetica metrics
#[derive(Debug, Clone, Copy, Default)]
pub struct HelveticaMetrics;

impl HelveticaMetrics {
    pub fn char_width(ch: char, size_pt: f32) -> f32 {
        let units = match ch as u32 {
            code @ 32..=126 => HELVETICA_WIDTHS[(code - 32) as usize],
            _ => FALLBACK_WIDTH,
        };
        units as f32 / 1000.0 * size_pt
    }

    pub fn text_width(text: &str, size_pt: f32) -> f32 {
        text.chars().map(|ch| Self::char_width(ch, size_pt)).sum()
    }

    /// Break `text` into lines no wider than `max_width_pt`.
    ///
    /// Explicit newlines always break. Words longer than a line are split
    /// between characters. A non-positive width disables wrapping.
    pub fn wrap(text: &str, size_pt: f32, max_width_pt: f32) -> Vec<String> {
        let mut lines = Vec::new();
        if text.is_empty() {
            return lines;
        }

        let space = Self::char_width(' ', size_pt);

        for paragraph in text.split('\n') {
            if max_width_pt <= 0.0 {
                lines.push(paragraph.trim_end().to_string());
                continue;
            }

            let mut line = String::new();
            let mut line_width = 0.0;

            for word in paragraph.split_whitespace() {
                let word_width = Self::text_width(word, size_pt);
                let needed = if line.is_empty() {
                    word_width
                } else {
                    line_width + space + word_width
                };

                if needed <= max_width_pt {
                    if !line.is_empty() {
                        line.push(' ');
                    }
                    line.push_str(word);
                    line_width = needed;
                    continue;
                }

                if !line.is_empty() {
                    lines.push(std::mem::take(&mut line));
                    line_width = 0.0;
                }

                if word_width <= max_width_pt {
                    line.push_str(word);
                    line_width = word_width;
                    continue;
                }

                // Hard-break a word wider than the whole line
                for ch in word.chars() {
                    let w = Self::char_width(ch, size_pt);
                    if !line.is_empty() && line_width + w > max_width_pt {
                        lines.push(std::mem::take(&mut line));
                        line_width = 0.0;
                    }
                    line.push(ch);
                    line_width += w;
                }
            }

            lines.push(line);
        }

        lines
    }
}

impl TextMeasure for HelveticaMetrics {
    fn measure(&self, text: &str, size_pt: f32, max_width_pt: f32) -> Extent {
        let lines = Self::wrap(text, size_pt, max_width_pt);
        let width_pt = lines
            .iter()
            .map(|line| Self::text_width(line, size_pt))
            .fold(0.0, f32::max);
        Extent {
            width_pt,
            height_pt: lines.len() as f32 * size_pt * LINE_HEIGHT,
        }
    }
}
