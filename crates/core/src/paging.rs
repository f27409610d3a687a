//! Incremental page-by-page accumulation of API lists.
//!
//! A [`PagedCollection`] owns the items loaded so far, the page cursor and
//! the "has more" flag. Callers obtain a [`PageTicket`] from [`reset`] or
//! [`load_more`], run the fetch however they like, and hand the batch back
//! through [`complete`] (or report [`fail`]). Only one ticket is outstanding at
//! a time; a reset supersedes it.
//!
//! [`reset`]: PagedCollection::reset
//! [`load_more`]: PagedCollection::load_more
//! [`complete`]: PagedCollection::complete
//! [`fail`]: PagedCollection::fail

use tracing::debug;

/// Page size of the game list.
pub const GAME_PAGE_SIZE: usize = 20;
/// Page size of the price and index time series.
pub const HISTORY_PAGE_SIZE: usize = 30;

/// Where a page beyond the first is merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeDirection {
    /// Later pages go after the loaded items.
    Append,
    /// Later pages go before the loaded items. Used for time series served
    /// newest first, so the visible series stays in ascending date order.
    Prepend,
}

/// Permission to fetch one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageTicket {
    page: usize,
    size: usize,
    generation: u64,
}

impl PageTicket {
    /// Zero-based page to request.
    pub fn page(&self) -> usize {
        self.page
    }

    /// Page size to request.
    pub fn size(&self) -> usize {
        self.size
    }
}

/// Outcome of handing a batch back to the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// The batch replaced or extended the items.
    Merged,
    /// The ticket was superseded by a reset; the batch was dropped.
    Stale,
}

/// Accumulated, page-wise loaded list.
#[derive(Debug, Clone)]
pub struct PagedCollection<T> {
    items: Vec<T>,
    page: usize,
    /// Page 0 has landed since the last reset.
    loaded: bool,
    has_more: bool,
    page_size: usize,
    direction: MergeDirection,
    generation: u64,
    in_flight: Option<PageTicket>,
}

impl<T> PagedCollection<T> {
    /// Empty collection; call [`reset`](Self::reset) to request the first page.
    pub fn new(page_size: usize, direction: MergeDirection) -> Self {
        Self {
            items: Vec::new(),
            page: 0,
            loaded: false,
            has_more: true,
            page_size: page_size.max(1),
            direction,
            generation: 0,
            in_flight: None,
        }
    }

    /// Game list collection: 20 per page, appended.
    pub fn games() -> Self {
        Self::new(GAME_PAGE_SIZE, MergeDirection::Append)
    }

    /// Time series collection: 30 per page, older pages prepended.
    pub fn time_series() -> Self {
        Self::new(HISTORY_PAGE_SIZE, MergeDirection::Prepend)
    }

    /// Items loaded so far.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Whether nothing has been loaded.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Last page merged.
    pub fn page(&self) -> usize {
        self.page
    }

    /// Whether another page may exist.
    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// Whether a fetch is outstanding.
    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Whether a "load more" trigger should be offered.
    pub fn can_load_more(&self) -> bool {
        self.has_more && self.in_flight.is_none()
    }

    /// Restart at page 0, e.g. on first display or after a filter change.
    ///
    /// Any outstanding ticket is superseded. Items stay visible until the
    /// first page arrives and replaces them.
    pub fn reset(&mut self) -> PageTicket {
        self.generation = self.generation.wrapping_add(1);
        self.page = 0;
        self.loaded = false;
        self.has_more = true;
        self.issue(0)
    }

    /// Ticket for the page after the cursor, or `None` when exhausted or busy.
    ///
    /// Until page 0 has landed after a reset this re-requests page 0, so a
    /// failed first page never gets merged into the previous items.
    pub fn load_more(&mut self) -> Option<PageTicket> {
        if !self.can_load_more() {
            return None;
        }
        let next = if self.loaded { self.page + 1 } else { 0 };
        Some(self.issue(next))
    }

    fn issue(&mut self, page: usize) -> PageTicket {
        let ticket = PageTicket {
            page,
            size: self.page_size,
            generation: self.generation,
        };
        self.in_flight = Some(ticket);
        ticket
    }

    fn is_current(&self, ticket: PageTicket) -> bool {
        self.in_flight == Some(ticket)
    }

    /// Merge the batch fetched for `ticket`.
    pub fn complete(&mut self, ticket: PageTicket, batch: Vec<T>) -> Applied {
        if !self.is_current(ticket) {
            debug!(page = ticket.page, "dropping superseded page");
            return Applied::Stale;
        }
        self.in_flight = None;

        if batch.len() < self.page_size {
            self.has_more = false;
        }
        if ticket.page == 0 {
            self.items = batch;
            self.loaded = true;
        } else {
            match self.direction {
                MergeDirection::Append => self.items.extend(batch),
                MergeDirection::Prepend => {
                    let mut merged = batch;
                    merged.append(&mut self.items);
                    self.items = merged;
                }
            }
        }
        self.page = ticket.page;
        Applied::Merged
    }

    /// Record that the fetch for `ticket` failed; the loaded state is kept.
    pub fn fail(&mut self, ticket: PageTicket) -> Applied {
        if !self.is_current(ticket) {
            return Applied::Stale;
        }
        self.in_flight = None;
        Applied::Merged
    }
}
