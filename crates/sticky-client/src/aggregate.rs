//! The canonical collection of visible notes.
//!
//! Newest activity sits at the front. The collection is sorted by `sent_at`
//! once, when history is installed; after that each live arrival is placed at
//! the front and nothing is re-sorted.

use std::cmp::Reverse;
use std::collections::HashSet;

use sticky_shared::Note;

/// What an upsert did to the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Inserted,
    /// The id was already present; its entry was replaced and moved to the front.
    Repositioned,
}

#[derive(Debug, Clone, Default)]
pub struct AggregateView {
    notes: Vec<Note>,
}

impl AggregateView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the view from decoded history, newest first.
    ///
    /// The sort is stable, so equal timestamps keep the order in which the
    /// sources were enumerated. If an id occurs more than once only its first
    /// occurrence after sorting is kept.
    pub fn from_history(mut notes: Vec<Note>) -> Self {
        notes.sort_by_key(|note| Reverse(note.sent_at));

        let mut seen = HashSet::new();
        notes.retain(|note| seen.insert(note.id.clone()));

        Self { notes }
    }

    /// Insert `note` at the front, replacing any entry with the same id.
    pub fn upsert(&mut self, note: Note) -> Upsert {
        let outcome = match self.position(&note.id) {
            Some(index) => {
                self.notes.remove(index);
                Upsert::Repositioned
            }
            None => Upsert::Inserted,
        };
        self.notes.insert(0, note);
        outcome
    }

    /// Remove the note with `id`; returns whether it was present.
    pub fn remove(&mut self, id: &str) -> bool {
        match self.position(id) {
            Some(index) => {
                self.notes.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    pub fn get(&self, id: &str) -> Option<&Note> {
        self.notes.iter().find(|note| note.id == id)
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn clear(&mut self) {
        self.notes.clear();
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.notes.iter().position(|note| note.id == id)
    }
}
