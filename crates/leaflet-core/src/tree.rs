//! Queries over a workspace's page index.
//!
//! The index is the flat list of [`PageMeta`] entries stored in the
//! workspace document; hierarchy comes entirely from each entry's path.

use crate::ids::PageId;
use crate::types::PageMeta;

/// Entries with no path, in index order.
pub fn root_pages(entries: &[PageMeta]) -> Vec<PageMeta> {
    entries
        .iter()
        .filter(|e| e.path.is_none())
        .cloned()
        .collect()
}

pub fn find_entry(entries: &[PageMeta], page_id: PageId) -> Option<&PageMeta> {
    entries.iter().find(|e| e.page_id == page_id)
}

/// Every entry whose ancestor chain includes `page_id`'s reference.
///
/// Returns `None` when `page_id` has no entry in the index. The match covers
/// all descendants, not only direct children.
pub fn children_of(entries: &[PageMeta], page_id: PageId) -> Option<Vec<PageMeta>> {
    let reference = &find_entry(entries, page_id)?.reference;

    Some(
        entries
            .iter()
            .filter(|e| e.path.as_ref().is_some_and(|p| p.contains(reference)))
            .cloned()
            .collect(),
    )
}
