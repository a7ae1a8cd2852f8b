use crate::types::RECORD_PREFIX_WINDOW;

/// Knobs for a [`Database`](crate::storage::database::Database), fixed at open time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderConfig {
    /// Bytes fetched to decode a record's payload-length and row-id varints
    /// before the exact-size read of the whole record.
    pub record_prefix_window: usize,
    /// Emit a `trace!` event per decoded cell.
    pub trace_cells: bool,
    pub verify_magic: bool,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            record_prefix_window: RECORD_PREFIX_WINDOW,
            trace_cells: false,
            verify_magic: true,
        }
    }
}

impl ReaderConfig {
    pub fn with_trace_cells(mut self, enabled: bool) -> Self {
        self.trace_cells = enabled;
        self
    }

    pub fn with_record_prefix_window(mut self, window: usize) -> Self {
        self.record_prefix_window = window;
        self
    }

    pub fn skip_magic_check(mut self) -> Self {
        self.verify_magic = false;
        self
    }
}
