//! Restartable, newest-first paging over one item's movement log.

use shared::pagination::{Cursor, MAX_PAGE_SIZE, MIN_PAGE_SIZE};

use super::store::MovementLog;
use crate::error::LedgerError;
use crate::models::{ItemId, ItemKind, Movement, MovementPage};

/// Finite pager over the movements of a single item.
///
/// Pages are fetched lazily. Once a short page has been returned the pager
/// is exhausted until [`MovementHistory::restart`] is called.
pub struct MovementHistory<'a, L: ?Sized> {
    log: &'a L,
    kind: ItemKind,
    item_id: ItemId,
    page_size: i64,
    start: Option<Cursor>,
    cursor: Option<Cursor>,
    exhausted: bool,
}

impl<'a, L> MovementHistory<'a, L>
where
    L: MovementLog + ?Sized,
{
    pub fn new(log: &'a L, kind: ItemKind, item_id: ItemId, page_size: i64) -> Self {
        Self {
            log,
            kind,
            item_id,
            page_size: page_size.clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE),
            start: None,
            cursor: None,
            exhausted: false,
        }
    }

    /// Resumes after a position handed out by an earlier page.
    pub fn starting_after(mut self, cursor: Cursor) -> Self {
        self.start = Some(cursor);
        self.cursor = Some(cursor);
        self
    }

    /// Fetches the next page, or `None` once the history is exhausted.
    pub async fn next_page(&mut self) -> Result<Option<Vec<Movement>>, LedgerError> {
        if self.exhausted {
            return Ok(None);
        }

        // One extra row tells us whether another page exists.
        let mut rows = self
            .log
            .list_for_item(self.kind, self.item_id, self.cursor, self.page_size + 1)
            .await?;

        let has_more = rows.len() as i64 > self.page_size;
        rows.truncate(self.page_size as usize);

        match rows.last() {
            Some(last) => self.cursor = Some(Cursor::new(last.occurred_at, last.id)),
            None => {
                self.exhausted = true;
                return Ok(None);
            }
        }
        if !has_more {
            self.exhausted = true;
        }

        Ok(Some(rows))
    }

    /// Fetches one page together with the token for the following one.
    pub async fn next_movement_page(&mut self) -> Result<MovementPage, LedgerError> {
        let movements = self.next_page().await?.unwrap_or_default();
        Ok(MovementPage {
            movements,
            next_cursor: self.next_cursor(),
        })
    }

    /// Token for the next page, if there is one.
    pub fn next_cursor(&self) -> Option<String> {
        if self.exhausted {
            return None;
        }
        self.cursor.map(|c| c.encode())
    }

    /// Rewinds to the position the pager started from.
    pub fn restart(&mut self) {
        self.cursor = self.start;
        self.exhausted = false;
    }
}
