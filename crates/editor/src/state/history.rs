//! Linear undo/redo over add, remove and transform edits

use shared::ObjectId;

use crate::scene::{PlacedObject, TransformSnapshot};

pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// One completed user edit
#[derive(Debug, Clone)]
pub enum HistoryEntry {
    Add {
        object: PlacedObject,
    },
    Remove {
        object: PlacedObject,
    },
    Transform {
        object_id: ObjectId,
        before: TransformSnapshot,
        after: TransformSnapshot,
    },
}

impl HistoryEntry {
    pub fn object_id(&self) -> &str {
        match self {
            Self::Add { object } | Self::Remove { object } => &object.id,
            Self::Transform { object_id, .. } => object_id,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Add { .. } => "Add",
            Self::Remove { .. } => "Remove",
            Self::Transform { .. } => "Transform",
        }
    }
}

/// Scene mutation requested while replaying an entry
#[derive(Debug)]
pub enum Replay<'a> {
    /// Put a copy of this object into the scene
    Insert(&'a PlacedObject),
    /// Take the object out of the scene; the callback returns what it removed
    Delete(&'a str),
    SetTransform(&'a str, &'a TransformSnapshot),
}

/// Undo and redo stacks
#[derive(Debug)]
pub struct EditHistory {
    past: Vec<HistoryEntry>,
    future: Vec<HistoryEntry>,
    limit: usize,
}

impl Default for EditHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl EditHistory {
    pub fn new(limit: usize) -> Self {
        Self {
            past: Vec::new(),
            future: Vec::new(),
            limit: limit.max(1),
        }
    }

    /// Record a completed edit; drops any redo entries
    pub fn push(&mut self, entry: HistoryEntry) {
        tracing::debug!(kind = entry.label(), id = entry.object_id(), "history push");
        self.past.push(entry);
        self.future.clear();
        if self.past.len() > self.limit {
            self.past.remove(0);
        }
    }

    /// Undo the last edit. Returns false when there is nothing to undo.
    pub fn undo(&mut self, mut apply: impl FnMut(Replay<'_>) -> Option<PlacedObject>) -> bool {
        let Some(mut entry) = self.past.pop() else {
            return false;
        };
        match &mut entry {
            HistoryEntry::Add { object } => {
                if let Some(removed) = apply(Replay::Delete(&object.id)) {
                    *object = removed;
                }
            }
            HistoryEntry::Remove { object } => {
                apply(Replay::Insert(object));
            }
            HistoryEntry::Transform {
                object_id, before, ..
            } => {
                apply(Replay::SetTransform(object_id, before));
            }
        }
        tracing::debug!(kind = entry.label(), "undo");
        self.future.push(entry);
        true
    }

    /// Re-apply the last undone edit. Returns false when there is nothing to redo.
    pub fn redo(&mut self, mut apply: impl FnMut(Replay<'_>) -> Option<PlacedObject>) -> bool {
        let Some(mut entry) = self.future.pop() else {
            return false;
        };
        match &mut entry {
            HistoryEntry::Add { object } => {
                apply(Replay::Insert(object));
            }
            HistoryEntry::Remove { object } => {
                if let Some(removed) = apply(Replay::Delete(&object.id)) {
                    *object = removed;
                }
            }
            HistoryEntry::Transform {
                object_id, after, ..
            } => {
                apply(Replay::SetTransform(object_id, after));
            }
        }
        tracing::debug!(kind = entry.label(), "redo");
        self.past.push(entry);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.past.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.future.len()
    }

    pub fn past(&self) -> &[HistoryEntry] {
        &self.past
    }

    pub fn future(&self) -> &[HistoryEntry] {
        &self.future
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Change the depth limit, dropping the oldest entries if needed
    pub fn set_limit(&mut self, limit: usize) {
        self.limit = limit.max(1);
        if self.past.len() > self.limit {
            let excess = self.past.len() - self.limit;
            self.past.drain(..excess);
        }
    }

    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::build_default_primitive;
    use glam::DVec3;
    use shared::{Color, ShapeKind};

    fn obj() -> PlacedObject {
        PlacedObject::from_primitive(
            build_default_primitive(ShapeKind::Box).unwrap(),
            Color::default(),
        )
    }

    fn moved(x: f64) -> TransformSnapshot {
        TransformSnapshot {
            position: DVec3::new(x, 0.0, 0.0),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_noops() {
        let mut h = EditHistory::default();
        let mut calls = 0;
        assert!(!h.undo(|_| {
            calls += 1;
            None
        }));
        assert!(!h.redo(|_| {
            calls += 1;
            None
        }));
        assert_eq!(calls, 0);
        assert!(!h.can_undo());
        assert!(!h.can_redo());
    }

    #[test]
    fn test_add_inverse_is_delete() {
        let mut h = EditHistory::default();
        let o = obj();
        let id = o.id.clone();
        h.push(HistoryEntry::Add { object: o });

        let mut seen = Vec::new();
        h.undo(|op| {
            if let Replay::Delete(target) = op {
                seen.push(target.to_string());
            }
            None
        });
        assert_eq!(seen, vec![id.clone()]);
        assert_eq!(h.redo_depth(), 1);

        h.redo(|op| {
            if let Replay::Insert(object) = op {
                seen.push(object.id.clone());
            }
            None
        });
        assert_eq!(seen, vec![id.clone(), id]);
        assert_eq!(h.undo_depth(), 1);
        assert_eq!(h.redo_depth(), 0);
    }

    #[test]
    fn test_transform_uses_before_then_after() {
        let mut h = EditHistory::default();
        h.push(HistoryEntry::Transform {
            object_id: "a".into(),
            before: moved(0.0),
            after: moved(3.0),
        });
        let mut applied = Vec::new();
        let mut record = |op: Replay<'_>| {
            if let Replay::SetTransform(_, snap) = op {
                applied.push(snap.position.x);
            }
            None
        };
        h.undo(&mut record);
        h.redo(&mut record);
        assert_eq!(applied, vec![0.0, 3.0]);
    }

    #[test]
    fn test_push_clears_future() {
        let mut h = EditHistory::default();
        h.push(HistoryEntry::Add { object: obj() });
        h.undo(|_| None);
        assert!(h.can_redo());
        h.push(HistoryEntry::Add { object: obj() });
        assert!(!h.can_redo());
        assert_eq!(h.undo_depth(), 1);
    }

    #[test]
    fn test_limit_drops_oldest() {
        let mut h = EditHistory::new(2);
        for x in 0..3 {
            h.push(HistoryEntry::Transform {
                object_id: "a".into(),
                before: moved(x as f64),
                after: moved(x as f64 + 1.0),
            });
        }
        assert_eq!(h.undo_depth(), 2);
        match &h.past()[0] {
            HistoryEntry::Transform { before, .. } => assert_eq!(before.position.x, 1.0),
            _ => panic!("expected transform"),
        }
        h.set_limit(1);
        assert_eq!(h.undo_depth(), 1);
    }

    #[test]
    fn test_delete_refreshes_stored_object() {
        let mut h = EditHistory::default();
        let o = obj();
        h.push(HistoryEntry::Add { object: o.clone() });
        let mut recolored = o;
        recolored.color = Color(0x123456);
        h.undo(|_| Some(recolored.clone()));
        match &h.future()[0] {
            HistoryEntry::Add { object } => assert_eq!(object.color, Color(0x123456)),
            _ => panic!("expected add"),
        }
    }
}
