//! Current section index

use crate::error::NavigationError;
use crate::Result;

/// The single source of truth for which section is current.
///
/// Unset until the navigator initializes; after that it always indexes a
/// real section. [`set`](Self::set) is the only mutation path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexState {
    current: Option<usize>,
    len: usize,
}

impl IndexState {
    pub fn new(len: usize) -> Self {
        Self { current: None, len }
    }

    pub fn get(&self) -> Option<usize> {
        self.current
    }

    pub fn set(&mut self, index: usize) -> Result<()> {
        if index >= self.len {
            return Err(NavigationError::OutOfBounds {
                index,
                len: self.len,
            });
        }
        self.current = Some(index);
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.current.is_some()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Nearest section to a scroll offset: `round(scroll_y / viewport_height)`.
///
/// `None` for a degenerate viewport or an offset past the last section.
pub fn index_for_offset(scroll_y: f64, viewport_height: f64, len: usize) -> Option<usize> {
    if !scroll_y.is_finite() || !viewport_height.is_finite() || viewport_height <= 0.0 {
        return None;
    }

    let nearest = (scroll_y.max(0.0) / viewport_height).round();
    if nearest >= len as f64 {
        return None;
    }
    Some(nearest as usize)
}
