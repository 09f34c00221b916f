//! Offset based pagination for array-backed connections.
//!
//! Cursors and slicing follow the graphql-relay `connectionFromArray`
//! conventions so existing Relay clients can page through the results. A
//! cursor that does not decode is treated as if it was not given.

use async_graphql::connection::CursorType;
use base64::{Engine, engine::general_purpose::STANDARD};

const CURSOR_PREFIX: &str = "arrayconnection:";

/// Cursor pointing at the zero-based offset of an item in the full sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffsetCursor(pub usize);

impl CursorType for OffsetCursor {
    type Error = &'static str;

    fn decode_cursor(s: &str) -> Result<Self, Self::Error> {
        let bytes = STANDARD.decode(s).map_err(|_| "invalid base64")?;
        let raw = std::str::from_utf8(&bytes).map_err(|_| "invalid utf-8")?;
        let offset = raw
            .strip_prefix(CURSOR_PREFIX)
            .ok_or("unknown cursor kind")?
            .parse()
            .map_err(|_| "invalid offset")?;
        Ok(Self(offset))
    }

    fn encode_cursor(&self) -> String {
        STANDARD.encode(format!("{CURSOR_PREFIX}{}", self.0))
    }
}

/// Offset named by a client supplied cursor, if it decodes.
pub fn cursor_offset(cursor: Option<&str>) -> Option<usize> {
    cursor
        .and_then(|cursor| OffsetCursor::decode_cursor(cursor).ok())
        .map(|cursor| cursor.0)
}

/// The part of a sequence selected by the connection arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: usize,
    pub end: usize,
    pub has_previous_page: bool,
    pub has_next_page: bool,
}

impl Window {
    pub fn compute(
        len: usize,
        after: Option<usize>,
        before: Option<usize>,
        first: Option<usize>,
        last: Option<usize>,
    ) -> Self {
        let lower_bound = after.map_or(0, |offset| offset.saturating_add(1));
        let upper_bound = before.unwrap_or(len);

        let mut start = lower_bound;
        let mut end = upper_bound.min(len);
        if let Some(first) = first {
            end = end.min(start.saturating_add(first));
        }
        if let Some(last) = last {
            start = start.max(end.saturating_sub(last));
        }

        Self {
            start,
            end,
            has_previous_page: last.is_some() && start > lower_bound,
            has_next_page: first.is_some() && end < upper_bound,
        }
    }

    /// Returns the selected items together with their absolute offsets.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> impl Iterator<Item = (usize, &'a T)> + 'a {
        let range = if self.start < self.end {
            self.start..self.end
        } else {
            0..0
        };
        items[range.clone()].iter().enumerate().map(move |(i, item)| (range.start + i, item))
    }
}
