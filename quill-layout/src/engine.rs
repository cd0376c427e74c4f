//! Line layout engine — assigns a position and line index to every
//! glyph in a single forward scan with bounded backtrack.
//!
//! Wrapping follows the break rule:
//! - `Word`: lines break at the last break opportunity (whitespace)
//!   before the overflow; glyphs shaped after it are re-scanned onto
//!   the new line. A run with no break opportunity overflows in place.
//! - `Character`: the overflowing glyph itself starts the new line,
//!   mid-word or not.
//! - `None`: only explicit newlines end a line.
//!
//! All distances are em units. Converting to world or pixel space is
//! the renderer's concern, applied after layout.

use quill_core::{UvRect, Vec2};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("glyph cluster {cluster} is not a character boundary of the source text")]
    ClusterOutOfRange { cluster: usize },
}

/// Line breaking policy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BreakRule {
    /// Never wrap; only explicit newlines start a new line.
    None,
    /// Break at the last break opportunity before overflow.
    #[default]
    Word,
    /// Break at the overflowing glyph.
    Character,
}

/// One glyph in layout space. Produced by the bridge, positioned by the
/// wrap pass, shifted by the alignment pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutGlyph {
    /// Byte index into the source string this glyph was shaped from.
    pub cluster: usize,
    /// Line index assigned by the wrap pass.
    pub line: u32,
    /// Pen position at this glyph, em units, assigned by the wrap pass.
    pub position_em: Vec2,
    /// Advance to the next pen position, em units.
    pub advance_em: Vec2,
    /// Bearing offset from the pen to the quad origin, em units.
    pub offset_em: Vec2,
    /// Ink extents, em units. Zero for whitespace and control glyphs.
    pub real_size_em: Vec2,
    /// Quad extents including distance-field padding, em units.
    pub quad_size_em: Vec2,
    /// Normalized atlas region. Zero for unresolved or invisible glyphs.
    pub atlas_uv: UvRect,
}

/// Wrap configuration for one text block.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineLayoutEngine {
    /// Line height in em units (face height / units-per-em).
    pub line_height: f32,
    /// Maximum line width in em units. Zero or negative means unbounded.
    pub max_line_width: f32,
    pub rule: BreakRule,
}

impl LineLayoutEngine {
    pub fn new(line_height: f32, max_line_width: f32, rule: BreakRule) -> Self {
        Self {
            line_height,
            max_line_width,
            rule,
        }
    }

    /// Assign `{position_em, line}` to every glyph and return the block
    /// size `(longest line width, line count × line height)`.
    ///
    /// `text` is the string the glyphs were shaped from; clusters index
    /// into it to detect newlines and break opportunities. Idempotent:
    /// re-running on the same input reproduces identical output.
    pub fn layout(&self, glyphs: &mut [LayoutGlyph], text: &str) -> Result<Vec2, LayoutError> {
        let max_width = if self.max_line_width > 0.0 {
            self.max_line_width
        } else {
            f32::INFINITY
        };
        let mut cursor = WrapCursor::new(self.line_height, max_width, self.rule);

        let mut i = 0;
        while i < glyphs.len() {
            glyphs[i].position_em = cursor.position();
            glyphs[i].line = cursor.line();

            let ch = source_char(text, glyphs[i].cluster)?;
            if is_newline(ch) {
                cursor.advance_line();
                i += 1;
                continue;
            }
            if is_break_opportunity(ch) {
                cursor.mark_break(i);
            }

            i = match cursor.advance(i, glyphs[i].advance_em) {
                Step::Next => i + 1,
                Step::Resume(at) => at,
            };
        }

        Ok(cursor.finish())
    }
}

pub(crate) fn is_newline(ch: char) -> bool {
    matches!(ch, '\n' | '\r')
}

pub(crate) fn is_break_opportunity(ch: char) -> bool {
    ch.is_whitespace() && !is_newline(ch)
}

fn source_char(text: &str, cluster: usize) -> Result<char, LayoutError> {
    text.get(cluster..)
        .and_then(|s| s.chars().next())
        .ok_or(LayoutError::ClusterOutOfRange { cluster })
}

/// Loop control from [`WrapCursor::advance`].
enum Step {
    Next,
    /// Re-scan from this index; positions assigned past it are stale
    /// and get overwritten on the new line.
    Resume(usize),
}

/// Cursor state for the wrap scan.
struct WrapCursor {
    line_height: f32,
    max_width: f32,
    rule: BreakRule,
    cursor: Vec2,
    line: u32,
    longest: f32,
    /// Index of the last break-opportunity glyph on the current line.
    last_break: Option<usize>,
    /// Cursor x just after consuming the break glyph's advance — the
    /// committed width when the line breaks there.
    break_end_x: f32,
}

impl WrapCursor {
    fn new(line_height: f32, max_width: f32, rule: BreakRule) -> Self {
        Self {
            line_height,
            max_width,
            rule,
            cursor: Vec2::ZERO,
            line: 0,
            longest: 0.0,
            last_break: None,
            break_end_x: 0.0,
        }
    }

    fn position(&self) -> Vec2 {
        self.cursor
    }

    fn line(&self) -> u32 {
        self.line
    }

    fn mark_break(&mut self, pos: usize) {
        self.last_break = Some(pos);
    }

    /// Consume the glyph at `pos` or break the line, returning where the
    /// scan continues.
    fn advance(&mut self, pos: usize, advance: Vec2) -> Step {
        let overflows =
            self.rule != BreakRule::None && self.cursor.x + advance.x > self.max_width;
        if !overflows {
            self.consume(pos, advance);
            return Step::Next;
        }

        // Breaking exactly at the overflowing glyph is valid when it is
        // itself the break opportunity; its advance never lands on
        // either line.
        if self.last_break == Some(pos) {
            self.advance_line();
            return Step::Next;
        }

        match self.rule {
            BreakRule::Word => match self.last_break {
                // Unbreakable run: accept the overflow, no infinite loop.
                None => {
                    self.consume(pos, advance);
                    Step::Next
                }
                Some(break_pos) => {
                    self.commit_line(self.break_end_x);
                    Step::Resume(break_pos + 1)
                }
            },
            BreakRule::Character => {
                if self.cursor.x == 0.0 {
                    // Single glyph wider than the line: accept it.
                    self.consume(pos, advance);
                    Step::Next
                } else {
                    self.advance_line();
                    Step::Resume(pos)
                }
            }
            BreakRule::None => unreachable!("None never overflows"),
        }
    }

    /// End the current line at the cursor (explicit newline, or a break
    /// opportunity sitting exactly at the overflow point).
    fn advance_line(&mut self) {
        self.commit_line(self.cursor.x);
    }

    fn commit_line(&mut self, width: f32) {
        self.longest = self.longest.max(width);
        self.cursor.x = 0.0;
        self.cursor.y += self.line_height;
        self.line += 1;
        self.last_break = None;
    }

    fn consume(&mut self, pos: usize, advance: Vec2) {
        self.cursor += advance;
        if self.last_break == Some(pos) {
            self.break_end_x = self.cursor.x;
        }
    }

    /// Commit the final line and return the block size.
    fn finish(mut self) -> Vec2 {
        self.longest = self.longest.max(self.cursor.x);
        Vec2::new(self.longest, self.line_height * (self.line + 1) as f32)
    }
}

// ===================================================================
// Tests
// ===================================================================
