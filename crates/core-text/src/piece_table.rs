//! Piece table: original text + append-only edit buffer + ordered span list.
//!
//! Invariants (hold after every public call):
//! * Concatenating the ranges referenced by `spans`, in order, yields `text()`.
//! * `len() == spans.iter().map(|s| s.len).sum()`.
//! * No span has length 0.

use crate::TextError;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use tracing::trace;

/// Which backing buffer a [`Span`] reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanSource {
    Original,
    Edit,
}

/// A contiguous run of characters in either the original or the edit buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub source: SpanSource,
    pub start: usize,
    pub len: usize,
}

impl Span {
    pub fn original(start: usize, len: usize) -> Self {
        Self {
            source: SpanSource::Original,
            start,
            len,
        }
    }

    pub fn edit(start: usize, len: usize) -> Self {
        Self {
            source: SpanSource::Edit,
            start,
            len,
        }
    }

    fn end(&self) -> usize {
        self.start + self.len
    }

    /// Split at `at` characters into the span. Both halves may be empty.
    fn split(self, at: usize) -> (Span, Span) {
        debug_assert!(at <= self.len);
        (
            Span { len: at, ..self },
            Span {
                start: self.start + at,
                len: self.len - at,
                ..self
            },
        )
    }
}

/// Append-only character store shared between tables split from one another.
#[derive(Debug, Clone, Default)]
struct EditBuffer(Rc<RefCell<Vec<char>>>);

impl EditBuffer {
    /// Append characters and return the buffer range they now occupy.
    fn append(&self, chars: impl IntoIterator<Item = char>) -> (usize, usize) {
        let mut buf = self.0.borrow_mut();
        let start = buf.len();
        buf.extend(chars);
        (start, buf.len() - start)
    }

    fn same_store(&self, other: &EditBuffer) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

#[derive(Debug, Clone)]
pub struct PieceTable {
    original: Rc<[char]>,
    edits: EditBuffer,
    spans: Vec<Span>,
}

impl Default for PieceTable {
    fn default() -> Self {
        Self::empty()
    }
}

impl PieceTable {
    /// Construct a table whose original buffer holds `text`.
    pub fn new(text: &str) -> Self {
        let original: Rc<[char]> = text.chars().collect();
        let spans = if original.is_empty() {
            Vec::new()
        } else {
            vec![Span::original(0, original.len())]
        };
        Self {
            original,
            edits: EditBuffer::default(),
            spans,
        }
    }

    pub fn empty() -> Self {
        Self::new("")
    }

    /// Number of characters currently in the line.
    pub fn len(&self) -> usize {
        self.spans.iter().map(|s| s.len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    pub fn span_count(&self) -> usize {
        self.spans.len()
    }

    /// Current line text, reconstructed from the span list.
    pub fn text(&self) -> String {
        let edits = self.edits.0.borrow();
        let mut out = String::with_capacity(self.len());
        for span in &self.spans {
            let src: &[char] = match span.source {
                SpanSource::Original => &self.original,
                SpanSource::Edit => &edits,
            };
            out.extend(&src[span.start..span.end()]);
        }
        out
    }

    /// Map a character offset to `(span index, offset within span)`.
    /// Returns `None` when `offset >= len()` (i.e. the append position).
    fn locate(&self, offset: usize) -> Option<(usize, usize)> {
        let mut consumed = 0usize;
        for (idx, span) in self.spans.iter().enumerate() {
            if offset < consumed + span.len {
                return Some((idx, offset - consumed));
            }
            consumed += span.len;
        }
        None
    }

    /// Insert `text` so that its first character lands at `offset`.
    ///
    /// An offset past the end clamps to `len()`. The characters are appended
    /// to the edit buffer; the span containing `offset` is split at most once.
    pub fn insert(&mut self, offset: usize, text: &str) {
        if text.is_empty() {
            return;
        }
        let offset = offset.min(self.len());
        let (start, len) = self.edits.append(text.chars());
        let span = Span::edit(start, len);
        match self.locate(offset) {
            None => {
                if !self.extend_previous(self.spans.len(), span) {
                    self.spans.push(span);
                }
            }
            Some((idx, 0)) => {
                if !self.extend_previous(idx, span) {
                    self.spans.insert(idx, span);
                }
            }
            Some((idx, inner)) => {
                let (front, back) = self.spans[idx].split(inner);
                self.spans[idx] = front;
                self.spans.splice(idx + 1..idx + 1, [span, back]);
            }
        }
    }

    /// Consecutive typing appends adjacent edit-buffer runs; grow the span
    /// before `idx` instead of adding a new one when that is the case. Only
    /// two edit spans coalesce: an original span with a matching start reads
    /// a different buffer.
    fn extend_previous(&mut self, idx: usize, span: Span) -> bool {
        let Some(prev) = idx.checked_sub(1).and_then(|i| self.spans.get_mut(i)) else {
            return false;
        };
        if prev.source == SpanSource::Edit
            && span.source == SpanSource::Edit
            && prev.end() == span.start
        {
            prev.len += span.len;
            true
        } else {
            false
        }
    }

    pub fn insert_char(&mut self, offset: usize, ch: char) {
        let mut utf8 = [0u8; 4];
        self.insert(offset, ch.encode_utf8(&mut utf8));
    }

    /// Delete the half-open range `[cursor - count, cursor)`.
    ///
    /// Deletion always runs to the left of `cursor` (backspace semantics). A
    /// count reaching past the start of the line clamps at 0. Returns the
    /// number of characters removed.
    pub fn delete(&mut self, cursor: usize, count: usize) -> Result<usize, TextError> {
        let len = self.len();
        if cursor > len {
            return Err(TextError::DeleteOutOfRange { cursor, len });
        }
        let start = cursor.saturating_sub(count);
        let removed = cursor - start;
        if removed == 0 {
            return Ok(0);
        }
        let Some((mut idx, mut inner)) = self.locate(start) else {
            return Ok(0);
        };
        let mut remaining = removed;
        while remaining > 0 && idx < self.spans.len() {
            let span = self.spans[idx];
            let take = (span.len - inner).min(remaining);
            let back_len = span.len - inner - take;
            match (inner, back_len) {
                (0, 0) => {
                    self.spans.remove(idx);
                }
                (0, _) => {
                    self.spans[idx] = Span {
                        start: span.start + take,
                        len: back_len,
                        ..span
                    };
                    idx += 1;
                }
                (_, 0) => {
                    self.spans[idx].len = inner;
                    idx += 1;
                }
                _ => {
                    self.spans[idx].len = inner;
                    let back = Span {
                        start: span.start + inner + take,
                        len: back_len,
                        ..span
                    };
                    self.spans.insert(idx + 1, back);
                    idx += 2;
                }
            }
            remaining -= take;
            inner = 0;
        }
        Ok(removed)
    }

    /// Delete the single character left of `cursor`.
    pub fn delete_char(&mut self, cursor: usize) -> Result<usize, TextError> {
        self.delete(cursor, 1)
    }

    /// Split into `[0, offset)` and `[offset, len())`.
    ///
    /// Both halves keep read access to this table's buffers; no character data
    /// is copied. Spans wholly on one side pass through unchanged.
    pub fn slice_at(&self, offset: usize) -> Result<(PieceTable, PieceTable), TextError> {
        let len = self.len();
        if offset > len {
            return Err(TextError::OffsetOutOfRange { offset, len });
        }
        let (front_spans, back_spans) = match self.locate(offset) {
            None => (self.spans.clone(), Vec::new()),
            Some((idx, inner)) => {
                let (front, back) = self.spans[idx].split(inner);
                let mut front_spans = self.spans[..idx].to_vec();
                if front.len > 0 {
                    front_spans.push(front);
                }
                let mut back_spans = Vec::with_capacity(self.spans.len() - idx);
                back_spans.push(back);
                back_spans.extend_from_slice(&self.spans[idx + 1..]);
                (front_spans, back_spans)
            }
        };
        trace!(
            target: "text.piece_table",
            offset,
            len,
            front_spans = front_spans.len(),
            back_spans = back_spans.len(),
            "sliced"
        );
        Ok((self.with_spans(front_spans), self.with_spans(back_spans)))
    }

    fn with_spans(&self, spans: Vec<Span>) -> PieceTable {
        PieceTable {
            original: Rc::clone(&self.original),
            edits: self.edits.clone(),
            spans,
        }
    }

    /// Concatenate `other` onto the end of this table at span level.
    ///
    /// Spans that read from a buffer this table already shares move over as-is.
    /// Anything else is copied once into this table's edit buffer and rebased.
    pub fn append(&mut self, other: PieceTable) {
        let shares_original = Rc::ptr_eq(&self.original, &other.original);
        let shares_edits = self.edits.same_store(&other.edits);
        trace!(
            target: "text.piece_table",
            join = self.len(),
            appended = other.len(),
            shares_original,
            shares_edits,
            "append"
        );
        for span in other.spans {
            let moved = match span.source {
                SpanSource::Original if shares_original => span,
                SpanSource::Edit if shares_edits => span,
                SpanSource::Original => {
                    let chars = other.original[span.start..span.end()].to_vec();
                    let (start, len) = self.edits.append(chars);
                    Span::edit(start, len)
                }
                SpanSource::Edit => {
                    let chars = other.edits.0.borrow()[span.start..span.end()].to_vec();
                    let (start, len) = self.edits.append(chars);
                    Span::edit(start, len)
                }
            };
            if !self.extend_previous(self.spans.len(), moved) {
                self.spans.push(moved);
            }
        }
    }
}

impl fmt::Display for PieceTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}
