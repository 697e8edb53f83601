//! Window records and the fixed-capacity registry that owns them.

use core::fmt;
use heapless::String as HString;
use heapless::Vec as HVec;

use crate::config::{MAX_WINDOWS, TITLE_CAPACITY};
use crate::error::WmError;
use crate::geometry::Rect;
use crate::hal::Color;

/// Slot index plus the slot's generation at allocation time. A handle
/// outlives its window only as a stale value: every lookup checks the
/// generation, so a reused slot never answers for an old handle.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct WindowId {
    slot: u8,
    generation: u16,
}

impl WindowId {
    pub fn slot(&self) -> usize {
        self.slot as usize
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}.{}", self.slot, self.generation)
    }
}

/// Which content implementation renders into a window.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum ContentKind {
    #[default]
    None,
    Terminal,
}

#[derive(Debug, Clone)]
pub struct Window {
    pub id: WindowId,
    pub rect: Rect,
    pub title: HString<{ TITLE_CAPACITY + 1 }>,
    pub visible: bool,
    pub focused: bool,
    pub bg_color: Color,
    pub content: ContentKind,
}

#[derive(Debug, Clone, Default)]
struct Slot {
    generation: u16,
    window: Option<Window>,
}

/// Owns window storage and the back-to-front z-order.
///
/// Every live window is in `z_order` exactly once; the last entry is
/// frontmost.
pub struct WindowRegistry {
    slots: [Slot; MAX_WINDOWS],
    z_order: HVec<WindowId, MAX_WINDOWS>,
}

impl WindowRegistry {
    pub fn new() -> Self {
        Self {
            slots: core::array::from_fn(|_| Slot::default()),
            z_order: HVec::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        MAX_WINDOWS
    }

    pub fn len(&self) -> usize {
        self.z_order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.z_order.is_empty()
    }

    /// Allocates a record in the first free slot and appends it to the
    /// front of the z-order.
    pub fn insert(&mut self, rect: Rect, title: &str, bg_color: Color) -> Result<WindowId, WmError> {
        let Some(slot) = self.slots.iter().position(|s| s.window.is_none()) else {
            return Err(WmError::ResourceExhausted { capacity: MAX_WINDOWS });
        };
        let entry = &mut self.slots[slot];
        let id = WindowId {
            slot: slot as u8,
            generation: entry.generation,
        };
        entry.window = Some(Window {
            id,
            rect,
            title: truncated_title(title),
            visible: true,
            focused: false,
            bg_color,
            content: ContentKind::None,
        });
        if self.z_order.push(id).is_err() {
            // Slot scan and z-order share one capacity.
            entry.window = None;
            return Err(WmError::ResourceExhausted { capacity: MAX_WINDOWS });
        }
        Ok(id)
    }

    /// Frees the record and drops it from the z-order.
    pub fn remove(&mut self, id: WindowId) -> Option<Window> {
        let entry = self.slots.get_mut(id.slot())?;
        if entry.generation != id.generation || entry.window.is_none() {
            return None;
        }
        let window = entry.window.take();
        entry.generation = entry.generation.wrapping_add(1);
        if let Some(pos) = self.z_order.iter().position(|z| *z == id) {
            self.z_order.remove(pos);
        }
        window
    }

    pub fn get(&self, id: WindowId) -> Option<&Window> {
        let entry = self.slots.get(id.slot())?;
        if entry.generation != id.generation {
            return None;
        }
        entry.window.as_ref()
    }

    pub fn get_mut(&mut self, id: WindowId) -> Option<&mut Window> {
        let entry = self.slots.get_mut(id.slot())?;
        if entry.generation != id.generation {
            return None;
        }
        entry.window.as_mut()
    }

    pub fn contains(&self, id: WindowId) -> bool {
        self.get(id).is_some()
    }

    /// Moves a live window to the front of the z-order.
    pub fn raise(&mut self, id: WindowId) -> bool {
        let Some(pos) = self.z_order.iter().position(|z| *z == id) else {
            return false;
        };
        let id = self.z_order.remove(pos);
        // Room is guaranteed: one entry was just removed.
        let _ = self.z_order.push(id);
        true
    }

    /// Back to front.
    pub fn z_order(&self) -> &[WindowId] {
        &self.z_order
    }

    pub fn frontmost(&self) -> Option<WindowId> {
        self.z_order.last().copied()
    }

    /// Back to front, visible windows only.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Window> + '_ {
        self.z_order
            .iter()
            .filter_map(move |id| self.get(*id))
            .filter(|win| win.visible)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Window> + '_ {
        self.slots.iter_mut().filter_map(|s| s.window.as_mut())
    }
}

impl Default for WindowRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn truncated_title(title: &str) -> HString<{ TITLE_CAPACITY + 1 }> {
    let mut out = HString::new();
    for ch in title.chars() {
        if out.len() + ch.len_utf8() > TITLE_CAPACITY {
            break;
        }
        let _ = out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect() -> Rect {
        Rect::new(0, 0, 200, 100)
    }

    #[test]
    fn insert_until_full_then_exhausted() {
        let mut reg = WindowRegistry::new();
        let mut ids = std::vec::Vec::new();
        for _ in 0..MAX_WINDOWS {
            ids.push(reg.insert(rect(), "w", 0).unwrap());
        }
        for (i, a) in ids.iter().enumerate() {
            for b in &ids[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert_eq!(
            reg.insert(rect(), "w", 0),
            Err(WmError::ResourceExhausted { capacity: MAX_WINDOWS })
        );
        assert_eq!(reg.len(), MAX_WINDOWS);
    }

    #[test]
    fn stale_handle_does_not_resolve_after_slot_reuse() {
        let mut reg = WindowRegistry::new();
        let old = reg.insert(rect(), "old", 0).unwrap();
        assert!(reg.remove(old).is_some());
        let new = reg.insert(rect(), "new", 0).unwrap();
        assert_eq!(old.slot(), new.slot());
        assert!(reg.get(old).is_none());
        assert!(reg.remove(old).is_none());
        assert_eq!(reg.get(new).unwrap().title.as_str(), "new");
    }

    #[test]
    fn raise_moves_to_back_of_sequence() {
        let mut reg = WindowRegistry::new();
        let a = reg.insert(rect(), "a", 0).unwrap();
        let b = reg.insert(rect(), "b", 0).unwrap();
        let c = reg.insert(rect(), "c", 0).unwrap();
        assert_eq!(reg.z_order(), &[a, b, c]);
        assert!(reg.raise(a));
        assert_eq!(reg.z_order(), &[b, c, a]);
        assert_eq!(reg.frontmost(), Some(a));
        reg.remove(c);
        assert_eq!(reg.z_order(), &[b, a]);
        assert!(!reg.raise(c));
    }

    #[test]
    fn title_is_truncated_to_capacity() {
        let mut reg = WindowRegistry::new();
        let long = "x".repeat(100);
        let id = reg.insert(rect(), &long, 0).unwrap();
        assert_eq!(reg.get(id).unwrap().title.len(), TITLE_CAPACITY);
    }
}
