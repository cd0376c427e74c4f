//! Alignment pass — shifts finished lines horizontally.
//!
//! Runs strictly after wrapping: it assumes line indices and per-line
//! advance totals are final, and mutates `position_em.x` exactly once.
//! A trailing whitespace glyph does not count towards the visual line
//! width, so right-aligned lines end flush with the block edge
//! regardless of trailing spaces. Whitespace is detected from the
//! source text via the glyph's cluster, the same way the wrap pass
//! finds break opportunities; glyph ink extents are not consulted, so
//! a still-unresolved glyph (zero ink until the atlas catches up)
//! aligns the same before and after resolution.

use crate::engine::LayoutGlyph;
use serde::{Deserialize, Serialize};

/// Horizontal alignment policy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    /// Stretch interior whitespace so both edges are flush. The last
    /// line of the block stays left-aligned.
    Justify,
}

/// Shift every line of a finished layout to match `align` within
/// `max_width` (em units). `text` is the string the glyphs were shaped
/// from. Left alignment is the wrap pass's natural output, so it is a
/// no-op.
pub fn align_glyphs(glyphs: &mut [LayoutGlyph], text: &str, max_width: f32, align: TextAlign) {
    if align == TextAlign::Left || glyphs.is_empty() {
        return;
    }

    let last_line = glyphs[glyphs.len() - 1].line;
    let mut start = 0;
    while start < glyphs.len() {
        let line = glyphs[start].line;
        let mut end = start + 1;
        while end < glyphs.len() && glyphs[end].line == line {
            end += 1;
        }
        align_line(
            &mut glyphs[start..end],
            text,
            max_width,
            align,
            line == last_line,
        );
        start = end;
    }
}

fn align_line(
    line: &mut [LayoutGlyph],
    text: &str,
    max_width: f32,
    align: TextAlign,
    is_last: bool,
) {
    let total: f32 = line.iter().map(|g| g.advance_em.x).sum();

    // Trailing whitespace does not contribute to the visual width.
    let trailing = match line.last() {
        Some(g) if source_is_whitespace(text, g.cluster) => g.advance_em.x,
        _ => 0.0,
    };
    let width = total - trailing;

    let deficit = max_width - width;
    if deficit <= 0.0 {
        return;
    }

    match align {
        TextAlign::Left => {}
        TextAlign::Center => shift(line, deficit / 2.0),
        TextAlign::Right => shift(line, deficit),
        TextAlign::Justify => {
            if is_last {
                return;
            }
            justify_line(line, text, deficit);
        }
    }
}

fn shift(line: &mut [LayoutGlyph], offset: f32) {
    for g in line.iter_mut() {
        g.position_em.x += offset;
    }
}

/// Distribute `deficit` evenly across the line's interior whitespace
/// gaps. A line with no interior gap cannot stretch and stays put.
fn justify_line(line: &mut [LayoutGlyph], text: &str, deficit: f32) {
    let interior = 1..line.len().saturating_sub(1);
    let gaps = line[interior.clone()]
        .iter()
        .filter(|g| source_is_whitespace(text, g.cluster))
        .count();
    if gaps == 0 {
        return;
    }

    let stretch = deficit / gaps as f32;
    let mut offset = 0.0;
    for (i, g) in line.iter_mut().enumerate() {
        g.position_em.x += offset;
        if interior.contains(&i) && source_is_whitespace(text, g.cluster) {
            offset += stretch;
        }
    }
}

fn source_is_whitespace(text: &str, cluster: usize) -> bool {
    text.get(cluster..)
        .and_then(|s| s.chars().next())
        .map_or(false, char::is_whitespace)
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{BreakRule, LineLayoutEngine};
    use quill_core::Vec2;

    const ADVANCE: f32 = 0.6;

    fn laid_out(text: &str, max_width: f32) -> Vec<LayoutGlyph> {
        let mut glyphs: Vec<LayoutGlyph> = text
            .char_indices()
            .map(|(cluster, ch)| LayoutGlyph {
                cluster,
                advance_em: Vec2::new(ADVANCE, 0.0),
                real_size_em: if ch.is_whitespace() {
                    Vec2::ZERO
                } else {
                    Vec2::new(0.5, 0.7)
                },
                ..Default::default()
            })
            .collect();
        LineLayoutEngine::new(1.2, max_width, BreakRule::Word)
            .layout(&mut glyphs, text)
            .unwrap();
        glyphs
    }

    #[test]
    fn test_left_is_noop() {
        let before = laid_out("abc", 10.0);
        let mut after = before.clone();
        align_glyphs(&mut after, "abc", 10.0, TextAlign::Left);
        assert_eq!(before, after);
    }

    #[test]
    fn test_right_shifts_by_deficit() {
        let max = 10.0 * ADVANCE;
        let before = laid_out("abc", max);
        let mut after = before.clone();
        align_glyphs(&mut after, "abc", max, TextAlign::Right);

        let deficit = max - 3.0 * ADVANCE;
        for (b, a) in before.iter().zip(&after) {
            assert!((a.position_em.x - b.position_em.x - deficit).abs() < 1e-6);
            assert_eq!(a.position_em.y, b.position_em.y);
        }
    }

    #[test]
    fn test_right_ignores_trailing_space() {
        let max = 10.0 * ADVANCE;
        let mut glyphs = laid_out("abc ", max);
        align_glyphs(&mut glyphs, "abc ", max, TextAlign::Right);

        // The visual width is 3 advances; 'c' ends flush at the edge.
        let c_right = glyphs[2].position_em.x + ADVANCE;
        assert!((c_right - max).abs() < 1e-6);
    }

    #[test]
    fn test_trailing_unresolved_glyph_keeps_its_advance() {
        // The last glyph is a letter whose atlas entry hasn't resolved
        // yet, so its ink extents are still zero. It is not whitespace
        // and must count towards the visual width.
        let max = 10.0 * ADVANCE;
        let text = "abx";
        let mut glyphs = laid_out(text, max);
        glyphs[2].real_size_em = Vec2::ZERO;
        glyphs[2].quad_size_em = Vec2::ZERO;

        align_glyphs(&mut glyphs, text, max, TextAlign::Right);

        let deficit = max - 3.0 * ADVANCE;
        assert!((glyphs[0].position_em.x - deficit).abs() < 1e-6);
        let x_right = glyphs[2].position_em.x + ADVANCE;
        assert!((x_right - max).abs() < 1e-6);
    }

    #[test]
    fn test_center_splits_deficit() {
        let max = 5.0 * ADVANCE;
        let mut glyphs = laid_out("abc", max);
        align_glyphs(&mut glyphs, "abc", max, TextAlign::Center);
        assert!((glyphs[0].position_em.x - ADVANCE).abs() < 1e-6);
    }

    #[test]
    fn test_overlong_line_stays_put() {
        let before = laid_out("abcdefgh", 2.0 * ADVANCE);
        let mut after = before.clone();
        align_glyphs(&mut after, "abcdefgh", 2.0 * ADVANCE, TextAlign::Right);
        assert_eq!(before, after);
    }

    #[test]
    fn test_justify_stretches_interior_gaps() {
        // Two lines; line 1 "aa bb " wraps, "cc" is the last line.
        let max = 7.0 * ADVANCE;
        let text = "aa bb cc";
        let mut glyphs = laid_out(text, max);
        assert_eq!(glyphs[6].line, 1);

        let last_before = glyphs[7].position_em.x;
        align_glyphs(&mut glyphs, text, max, TextAlign::Justify);

        // Line 1 holds 6 glyphs of advance over max 7 → deficit spread
        // across its interior gaps; 'b' at index 5 ends flush-right of
        // the stretched gap.
        assert!(glyphs[3].position_em.x > 3.0 * ADVANCE);
        // Last line is left-aligned, untouched.
        assert_eq!(glyphs[7].position_em.x, last_before);
    }

    #[test]
    fn test_justify_line_without_gaps_stays_put() {
        let max = 10.0 * ADVANCE;
        let text = "abc\ndef";
        let before = laid_out(text, max);
        let mut after = before.clone();
        align_glyphs(&mut after, text, max, TextAlign::Justify);
        assert_eq!(before, after);
    }

    #[test]
    fn test_justify_ignores_unresolved_ink_glyphs() {
        // Interior letters with zero ink (unresolved) are not gaps;
        // only the real space stretches.
        let max = 8.0 * ADVANCE;
        let text = "ax b\ncd";
        let mut glyphs = laid_out(text, max);
        glyphs[1].real_size_em = Vec2::ZERO;

        align_glyphs(&mut glyphs, text, max, TextAlign::Justify);

        // 'x' at index 1 is not a gap: it moves only with the glyphs
        // before the space, i.e. not at all.
        assert_eq!(glyphs[1].position_em.x, 1.0 * ADVANCE);
        // 'b' after the space absorbed the whole stretch.
        assert!(glyphs[3].position_em.x > 3.0 * ADVANCE + 1e-6);
    }

    #[test]
    fn test_multi_line_right_alignment() {
        let max = 10.0 * ADVANCE;
        let text = "ab\ncdef";
        let mut glyphs = laid_out(text, max);
        align_glyphs(&mut glyphs, text, max, TextAlign::Right);

        // Each line shifts by its own deficit; the trailing newline
        // glyph's advance is excluded from line 0's visual width.
        let line1_first = glyphs.iter().find(|g| g.line == 1).unwrap();
        assert!((line1_first.position_em.x - (max - 4.0 * ADVANCE)).abs() < 1e-6);
    }
}
