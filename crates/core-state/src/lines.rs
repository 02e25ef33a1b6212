//! Arena-backed doubly-linked list of document lines.
//!
//! Nodes live in a `Vec` of slots and link to their neighbours by [`LineId`].
//! Every structural operation (insert-before, delete, slice, merge) is O(1)
//! given an id; index lookups walk from the head and exist only for bulk
//! population and diagnostics.
//!
//! Invariants:
//! - `head`/`tail` are `None` iff `len == 0`; a populated document never
//!   drops below one line (`delete` refuses the last line).
//! - For every live node `n`: `n.next.prev == n` and `n.prev.next == n`.
//! - A freed slot's generation is bumped before reuse, so an id that outlived
//!   its node never resolves to the slot's next occupant.

use std::fmt;

use core_render::{RenderCache, RenderHandle, Surface};
use core_text::PieceTable;
use tracing::{debug, trace};

use crate::{EditError, document};

/// Stable identity of one line node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineId {
    slot: u32,
    generation: u32,
}

impl LineId {
    pub fn slot(self) -> u32 {
        self.slot
    }

    pub fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.slot, self.generation)
    }
}

/// One document line: its text plus a lazily created render cache.
#[derive(Debug)]
pub struct LineNode {
    table: PieceTable,
    cache: Option<RenderCache>,
    prev: Option<LineId>,
    next: Option<LineId>,
}

impl LineNode {
    pub fn table(&self) -> &PieceTable {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut PieceTable {
        &mut self.table
    }

    pub fn cache(&self) -> Option<&RenderCache> {
        self.cache.as_ref()
    }

    pub fn cache_mut(&mut self) -> Option<&mut RenderCache> {
        self.cache.as_mut()
    }

    pub fn prev(&self) -> Option<LineId> {
        self.prev
    }

    pub fn next(&self) -> Option<LineId> {
        self.next
    }

    pub fn is_topmost(&self) -> bool {
        self.prev.is_none()
    }

    pub fn is_bottommost(&self) -> bool {
        self.next.is_none()
    }

    pub fn text(&self) -> String {
        self.table.text()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    node: Option<LineNode>,
}

#[derive(Debug, Default)]
pub struct LineList {
    slots: Vec<Slot>,
    free: Vec<u32>,
    head: Option<LineId>,
    tail: Option<LineId>,
    len: usize,
    next_handle: u64,
}

impl LineList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Populate one node per input line, then pad with empty lines up to
    /// `min_lines` (never fewer than one line in total).
    pub fn from_lines<I, S>(lines: I, min_lines: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list = Self::new();
        for line in lines {
            list.push_back(line.as_ref());
        }
        let loaded = list.len;
        while list.len < min_lines.max(1) {
            list.push_back("");
        }
        debug!(target: "state.lines", loaded, total = list.len, "populated");
        list
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn first(&self) -> Option<LineId> {
        self.head
    }

    pub fn last(&self) -> Option<LineId> {
        self.tail
    }

    pub fn contains(&self, id: LineId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: LineId) -> Option<&LineNode> {
        self.slots
            .get(id.slot as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.node.as_ref())
    }

    pub fn get_mut(&mut self, id: LineId) -> Option<&mut LineNode> {
        self.slots
            .get_mut(id.slot as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.node.as_mut())
    }

    fn node(&self, id: LineId) -> Result<&LineNode, EditError> {
        self.get(id).ok_or(EditError::StaleLine(id))
    }

    fn node_mut(&mut self, id: LineId) -> Result<&mut LineNode, EditError> {
        self.get_mut(id).ok_or(EditError::StaleLine(id))
    }

    pub fn prev(&self, id: LineId) -> Option<LineId> {
        self.get(id).and_then(|n| n.prev)
    }

    pub fn next(&self, id: LineId) -> Option<LineId> {
        self.get(id).and_then(|n| n.next)
    }

    pub fn is_topmost(&self, id: LineId) -> bool {
        self.get(id).is_some_and(LineNode::is_topmost)
    }

    pub fn is_bottommost(&self, id: LineId) -> bool {
        self.get(id).is_some_and(LineNode::is_bottommost)
    }

    pub fn text(&self, id: LineId) -> Result<String, EditError> {
        self.node(id).map(LineNode::text)
    }

    pub fn line_len(&self, id: LineId) -> Result<usize, EditError> {
        self.node(id).map(LineNode::len)
    }

    pub fn table_mut(&mut self, id: LineId) -> Result<&mut PieceTable, EditError> {
        self.node_mut(id).map(LineNode::table_mut)
    }

    /// Id of the line at `index` (O(n)).
    pub fn id_at(&self, index: usize) -> Option<LineId> {
        self.iter().nth(index).map(|(id, _)| id)
    }

    /// Position of `id` from the head (O(n)).
    pub fn index_of(&self, id: LineId) -> Option<usize> {
        self.iter().position(|(other, _)| other == id)
    }

    /// Forward traversal from the head. Each call starts over.
    pub fn iter(&self) -> LineIter<'_> {
        LineIter {
            list: self,
            next: self.head,
            remaining: self.len,
        }
    }

    pub fn texts(&self) -> Vec<String> {
        self.iter().map(|(_, node)| node.text()).collect()
    }

    /// Newline-joined text with trailing empty lines trimmed.
    pub fn serialize(&self) -> String {
        document::join_lines(&self.texts())
    }

    /// Reverse lookup of the node owning the cache stamped with `handle` (O(n)).
    pub fn find_by_render_handle(&self, handle: RenderHandle) -> Option<LineId> {
        self.iter()
            .find(|(_, node)| node.cache.as_ref().is_some_and(|c| c.handle() == handle))
            .map(|(id, _)| id)
    }

    /// The line's render cache, created blank (background fill) on first use.
    pub fn render_cache_or_init(
        &mut self,
        id: LineId,
        surface: &Surface,
    ) -> Result<&mut RenderCache, EditError> {
        let counter = &mut self.next_handle;
        let node = self
            .slots
            .get_mut(id.slot as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.node.as_mut())
            .ok_or(EditError::StaleLine(id))?;
        Ok(node.cache.get_or_insert_with(|| {
            let handle = RenderHandle(*counter);
            *counter += 1;
            trace!(target: "state.lines", line = %id, handle = handle.0, "cache_created");
            RenderCache::new(
                handle,
                surface.width,
                surface.line_height,
                surface.palette.background,
            )
        }))
    }

    pub fn push_back(&mut self, text: &str) -> LineId {
        self.link(self.tail, None, PieceTable::new(text))
    }

    /// Splice a new line holding `text` immediately before `anchor`, or at the
    /// head when `anchor` is `None`.
    pub fn insert_before(
        &mut self,
        anchor: Option<LineId>,
        text: &str,
    ) -> Result<LineId, EditError> {
        let (prev, next) = match anchor {
            Some(anchor) => (self.node(anchor)?.prev, Some(anchor)),
            None => (None, self.head),
        };
        let id = self.link(prev, next, PieceTable::new(text));
        trace!(target: "state.lines", line = %id, "inserted");
        Ok(id)
    }

    /// Unlink and drop `id` together with its table and render cache.
    pub fn delete(&mut self, id: LineId) -> Result<(), EditError> {
        self.node(id)?;
        if self.len <= 1 {
            return Err(EditError::EmptyDocument);
        }
        let node = self.release(id).ok_or(EditError::StaleLine(id))?;
        self.unlink(node.prev, node.next);
        trace!(target: "state.lines", line = %id, "deleted");
        Ok(())
    }

    /// Split `id` at `offset`: the front stays in `id`, the back becomes a new
    /// line spliced right after it. Returns the new line's id.
    pub fn slice_at(&mut self, id: LineId, offset: usize) -> Result<LineId, EditError> {
        let node = self.node(id)?;
        let (front, back) = node.table.slice_at(offset)?;
        let next = node.next;
        self.node_mut(id)?.table = front;
        let new_id = self.link(Some(id), next, back);
        trace!(target: "state.lines", line = %id, new_line = %new_id, offset, "sliced");
        Ok(new_id)
    }

    /// Append the next line's text to `id` and drop the next line.
    ///
    /// Returns the length `id` had before the merge, i.e. the join point.
    pub fn merge_with_next(&mut self, id: LineId) -> Result<usize, EditError> {
        let next = self.node(id)?.next.ok_or(EditError::NoNextLine(id))?;
        let absorbed = self.release(next).ok_or(EditError::StaleLine(next))?;
        self.unlink(Some(id), absorbed.next);
        let node = self.node_mut(id)?;
        let join = node.table.len();
        node.table.append(absorbed.table);
        trace!(target: "state.lines", line = %id, absorbed = %next, join, "merged");
        Ok(join)
    }

    fn link(&mut self, prev: Option<LineId>, next: Option<LineId>, table: PieceTable) -> LineId {
        let id = self.alloc(LineNode {
            table,
            cache: None,
            prev,
            next,
        });
        self.set_next(prev, Some(id));
        self.set_prev(next, Some(id));
        self.len += 1;
        id
    }

    /// Join `prev` and `next` after the node between them was released.
    fn unlink(&mut self, prev: Option<LineId>, next: Option<LineId>) {
        self.set_next(prev, next);
        self.set_prev(next, prev);
        self.len -= 1;
    }

    /// `node.next = next`, or the head when `node` is `None`.
    fn set_next(&mut self, node: Option<LineId>, next: Option<LineId>) {
        match node.and_then(|id| self.get_mut(id)) {
            Some(n) => n.next = next,
            None => self.head = next,
        }
    }

    /// `node.prev = prev`, or the tail when `node` is `None`.
    fn set_prev(&mut self, node: Option<LineId>, prev: Option<LineId>) {
        match node.and_then(|id| self.get_mut(id)) {
            Some(n) => n.prev = prev,
            None => self.tail = prev,
        }
    }

    fn alloc(&mut self, node: LineNode) -> LineId {
        if let Some(slot) = self.free.pop() {
            let entry = &mut self.slots[slot as usize];
            entry.node = Some(node);
            return LineId {
                slot,
                generation: entry.generation,
            };
        }
        let slot = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            node: Some(node),
        });
        LineId {
            slot,
            generation: 0,
        }
    }

    fn release(&mut self, id: LineId) -> Option<LineNode> {
        let entry = self
            .slots
            .get_mut(id.slot as usize)
            .filter(|s| s.generation == id.generation)?;
        let node = entry.node.take()?;
        entry.generation = entry.generation.wrapping_add(1);
        self.free.push(id.slot);
        Some(node)
    }
}

/// Finite forward traversal over `(id, node)` pairs.
#[derive(Debug, Clone)]
pub struct LineIter<'a> {
    list: &'a LineList,
    next: Option<LineId>,
    remaining: usize,
}

impl<'a> Iterator for LineIter<'a> {
    type Item = (LineId, &'a LineNode);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.next?;
        let node = self.list.get(id)?;
        self.next = node.next;
        self.remaining -= 1;
        Some((id, node))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn list(lines: &[&str]) -> LineList {
        LineList::from_lines(lines.iter().copied(), 0)
    }

    /// Walk backwards from the tail; must mirror the forward order.
    fn texts_reversed(l: &LineList) -> Vec<String> {
        let mut out = Vec::new();
        let mut cur = l.last();
        while let Some(id) = cur {
            out.push(l.text(id).unwrap());
            cur = l.prev(id);
        }
        out.reverse();
        out
    }

    #[test]
    fn from_lines_pads_to_minimum() {
        let l = LineList::from_lines(["a", "b"], 4);
        assert_eq!(l.texts(), vec!["a", "b", "", ""]);
        assert_eq!(LineList::from_lines(Vec::<String>::new(), 0).len(), 1);
    }

    #[test]
    fn insert_before_head_and_middle() {
        let mut l = list(&["b", "d"]);
        let d = l.id_at(1).unwrap();
        l.insert_before(Some(d), "c").unwrap();
        l.insert_before(None, "a").unwrap();
        assert_eq!(l.texts(), vec!["a", "b", "c", "d"]);
        assert_eq!(texts_reversed(&l), l.texts());
        assert!(l.is_topmost(l.first().unwrap()));
    }

    #[test]
    fn delete_relinks_neighbours() {
        let mut l = list(&["a", "b", "c"]);
        let b = l.id_at(1).unwrap();
        l.delete(b).unwrap();
        assert_eq!(l.texts(), vec!["a", "c"]);
        assert_eq!(texts_reversed(&l), vec!["a", "c"]);
        assert_eq!(l.delete(b), Err(EditError::StaleLine(b)));

        let a = l.first().unwrap();
        l.delete(a).unwrap();
        assert_eq!(l.texts(), vec!["c"]);
        assert!(l.is_topmost(l.first().unwrap()));
    }

    #[test]
    fn delete_refuses_last_line() {
        let mut l = list(&["only"]);
        let only = l.first().unwrap();
        assert_eq!(l.delete(only), Err(EditError::EmptyDocument));
        assert_eq!(l.len(), 1);
    }

    #[test]
    fn recycled_slot_rejects_old_id() {
        let mut l = list(&["a", "b"]);
        let b = l.id_at(1).unwrap();
        l.delete(b).unwrap();
        let fresh = l.push_back("c");
        assert_eq!(fresh.slot(), b.slot());
        assert_ne!(fresh, b);
        assert!(l.get(b).is_none());
        assert_eq!(l.text(fresh).unwrap(), "c");
    }

    #[test]
    fn slice_splices_after() {
        let mut l = list(&["hello", "tail"]);
        let first = l.first().unwrap();
        let back = l.slice_at(first, 2).unwrap();
        assert_eq!(l.texts(), vec!["he", "llo", "tail"]);
        assert_eq!(l.next(first), Some(back));
        assert_eq!(l.prev(back), Some(first));
        assert_eq!(texts_reversed(&l), l.texts());
    }

    #[test]
    fn slice_bottommost_moves_tail() {
        let mut l = list(&["abc"]);
        let first = l.first().unwrap();
        let back = l.slice_at(first, 3).unwrap();
        assert_eq!(l.last(), Some(back));
        assert_eq!(l.texts(), vec!["abc", ""]);
        assert!(matches!(
            l.slice_at(first, 9),
            Err(EditError::Text(core_text::TextError::OffsetOutOfRange { .. }))
        ));
    }

    #[test]
    fn merge_returns_join_point() {
        let mut l = list(&["hello", "world", "!"]);
        let first = l.first().unwrap();
        assert_eq!(l.merge_with_next(first).unwrap(), 5);
        assert_eq!(l.texts(), vec!["helloworld", "!"]);
        assert_eq!(texts_reversed(&l), l.texts());
        let last = l.last().unwrap();
        assert_eq!(l.merge_with_next(last), Err(EditError::NoNextLine(last)));
    }

    #[test]
    fn slice_then_merge_restores_line() {
        let mut l = list(&["abcdef"]);
        let first = l.first().unwrap();
        l.table_mut(first).unwrap().insert(3, "XY");
        l.slice_at(first, 4).unwrap();
        l.merge_with_next(first).unwrap();
        assert_eq!(l.texts(), vec!["abcXYdef"]);
        assert_eq!(l.len(), 1);
    }

    #[test]
    fn merge_after_typing_into_sliced_front() {
        let mut l = list(&["abcdef"]);
        let first = l.first().unwrap();
        let back = l.slice_at(first, 3).unwrap();
        l.table_mut(first).unwrap().insert(3, "xyz");
        l.table_mut(back).unwrap().insert(0, "_");
        assert_eq!(l.texts(), vec!["abcxyz", "_def"]);
        assert_eq!(l.merge_with_next(first).unwrap(), 6);
        assert_eq!(l.texts(), vec!["abcxyz_def"]);
    }

    #[test]
    fn render_cache_is_lazy_and_findable() {
        let s = Surface::default();
        let mut l = list(&["a", "b"]);
        let b = l.id_at(1).unwrap();
        assert!(l.get(b).unwrap().cache().is_none());
        let handle = l.render_cache_or_init(b, &s).unwrap().handle();
        // Second call returns the same cache.
        assert_eq!(l.render_cache_or_init(b, &s).unwrap().handle(), handle);
        assert_eq!(l.find_by_render_handle(handle), Some(b));
        assert_eq!(l.find_by_render_handle(RenderHandle(99)), None);
    }

    #[test]
    fn serialize_trims_trailing_blank_lines() {
        let l = LineList::from_lines(["a", "", "b"], 6);
        assert_eq!(l.serialize(), "a\n\nb");
        assert_eq!(LineList::from_lines([""], 3).serialize(), "");
    }

    #[test]
    fn index_lookups() {
        let l = list(&["x", "y", "z"]);
        let y = l.id_at(1).unwrap();
        assert_eq!(l.index_of(y), Some(1));
        assert_eq!(l.id_at(3), None);
        assert_eq!(y.to_string(), format!("{}v{}", y.slot(), y.generation()));
    }
}
