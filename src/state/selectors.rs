use crate::models::{Note, NoteCollection};

/// Number of unpinned notes listed under "Recent".
pub const RECENT_LIMIT: usize = 5;

/// Notes whose title contains `query`, ignoring case. A blank query matches everything.
pub fn filter_by_title<'a>(notes: &'a [Note], query: &str) -> Vec<&'a Note> {
    let q = query.trim().to_lowercase();
    notes
        .iter()
        .filter(|n| q.is_empty() || n.title.to_lowercase().contains(&q))
        .collect()
}

pub fn pinned_notes<'a>(notes: &'a [Note], query: &str) -> Vec<&'a Note> {
    filter_by_title(notes, query)
        .into_iter()
        .filter(|n| n.pinned)
        .collect()
}

/// Unpinned notes, most recently updated first.
pub fn recent_notes<'a>(notes: &'a [Note], query: &str, limit: usize) -> Vec<&'a Note> {
    let mut recent = filter_by_title(notes, query)
        .into_iter()
        .filter(|n| !n.pinned)
        .collect::<Vec<_>>();
    recent.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    recent.truncate(limit);
    recent
}

/// Member notes in membership order. Dangling ids are skipped.
pub fn collection_notes<'a>(notes: &'a [Note], collection: &NoteCollection) -> Vec<&'a Note> {
    collection
        .notes
        .iter()
        .filter_map(|id| notes.iter().find(|n| &n.id == id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{sample_collections, sample_notes};
    use chrono::Duration;

    fn titles(notes: &[&Note]) -> Vec<String> {
        notes.iter().map(|n| n.title.clone()).collect()
    }

    #[test]
    fn test_filter_by_title_is_case_insensitive() {
        let notes = sample_notes();
        assert_eq!(titles(&filter_by_title(&notes, "  reading ")), vec!["Reading List"]);
        assert_eq!(filter_by_title(&notes, "").len(), 3);
        assert!(filter_by_title(&notes, "nothing like this").is_empty());
    }

    #[test]
    fn test_pinned_and_recent_split() {
        let notes = sample_notes();
        assert_eq!(titles(&pinned_notes(&notes, "")), vec!["Welcome to Creative Notes"]);
        assert_eq!(
            titles(&recent_notes(&notes, "", RECENT_LIMIT)),
            vec!["Project Ideas", "Reading List"]
        );
    }

    #[test]
    fn test_recent_notes_sorted_and_limited() {
        let mut notes = sample_notes();
        notes[2].updated_at = notes[1].updated_at + Duration::hours(1);
        assert_eq!(
            titles(&recent_notes(&notes, "", RECENT_LIMIT)),
            vec!["Reading List", "Project Ideas"]
        );
        assert_eq!(recent_notes(&notes, "", 1).len(), 1);
    }

    #[test]
    fn test_collection_notes_skip_dangling_ids() {
        let notes = sample_notes();
        let mut collection = sample_collections(&notes).remove(0);
        collection.notes.insert(0, "gone".to_string());
        assert_eq!(titles(&collection_notes(&notes, &collection)), vec!["Project Ideas"]);
    }
}
