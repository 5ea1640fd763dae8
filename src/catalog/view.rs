//! Page derivation
//!
//! Turning the sorted entity list plus a [`FilterState`] into the visible
//! page is a pure function. When the requested page is out of range the
//! derived view carries a [`PageCorrection`]; committing it is the store's
//! job, so rendering never mutates state.

use serde::Serialize;

use crate::catalog::{apply_filters, FilterState};
use crate::models::Entity;

// == Page Correction ==
/// Clamp that must be written back to the filter state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageCorrection {
    /// Page the filter state asked for
    pub from: usize,
    /// Nearest valid page
    pub to: usize,
}

// == Page View ==
/// One derived page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageView {
    /// Entities in `[start_index, end_index)` of the filtered list
    pub items: Vec<Entity>,
    /// Always within `1..=total_pages`
    pub current_page: usize,
    pub total_pages: usize,
    pub items_per_page: usize,
    pub start_index: usize,
    pub end_index: usize,
    pub filtered_count: usize,
    #[serde(skip)]
    pub correction: Option<PageCorrection>,
}

/// `max(1, ceil(count / per_page))`
pub fn total_pages(count: usize, per_page: usize) -> usize {
    count.div_ceil(per_page.max(1)).max(1)
}

/// Clamps `requested` into `1..=total`.
pub fn clamp_page(requested: usize, total: usize) -> usize {
    requested.clamp(1, total.max(1))
}

// == Derive View ==
/// Filters `entities` (already ascending by id) and slices out the active page.
pub fn derive_view<'a>(
    entities: impl IntoIterator<Item = &'a Entity>,
    filter: &FilterState,
) -> PageView {
    let per_page = filter.items_per_page.max(1);
    let filtered = apply_filters(entities, filter);
    let filtered_count = filtered.len();

    let total = total_pages(filtered_count, per_page);
    let current = clamp_page(filter.current_page, total);
    let correction = (current != filter.current_page).then_some(PageCorrection {
        from: filter.current_page,
        to: current,
    });

    let start_index = (current - 1) * per_page;
    let end_index = start_index + per_page;
    let items = filtered
        .iter()
        .skip(start_index)
        .take(per_page)
        .map(|entity| (*entity).clone())
        .collect();

    PageView {
        items,
        current_page: current,
        total_pages: total,
        items_per_page: per_page,
        start_index,
        end_index,
        filtered_count,
        correction,
    }
}

// == Pager ==
/// Forward navigation is offered only while the current page's index range
/// ends before the highest cached identifier.
pub fn show_next(current_page: usize, per_page: usize, max_key: u32) -> bool {
    current_page.saturating_mul(per_page) < max_key as usize
}

/// Page button or gap in the pager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    Page(usize),
    Ellipsis,
}

impl PageItem {
    /// Page number, `None` for an ellipsis.
    pub fn number(&self) -> Option<usize> {
        match self {
            PageItem::Page(n) => Some(*n),
            PageItem::Ellipsis => None,
        }
    }
}

/// Page buttons for `current` of `total`. `compact` is the narrow layout.
pub fn page_items(current: usize, total: usize, compact: bool) -> Vec<PageItem> {
    use PageItem::{Ellipsis, Page};

    if total <= 6 {
        return (1..=total).map(Page).collect();
    }
    if current < 4 {
        return if compact {
            vec![Page(1), Ellipsis, Page(total)]
        } else {
            vec![Page(1), Page(2), Page(3), Ellipsis, Page(total)]
        };
    }
    if current > total - 3 {
        return if compact {
            vec![Ellipsis, Page(total - 1)]
        } else {
            vec![Page(1), Ellipsis, Page(total - 2), Page(total - 1), Page(total)]
        };
    }

    if compact {
        vec![Ellipsis, Page(current), Ellipsis]
    } else {
        vec![
            Page(1),
            Ellipsis,
            Page(current - 1),
            Page(current),
            Page(current + 1),
            Ellipsis,
            Page(total),
        ]
    }
}
