//! Security Module
//!
//! Limits applied to the input before any parsing starts.

use std::io::Read;

use crate::error::ShiftSheetError;

/// Input limits
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SecurityConfig {
    /// Largest accepted input in bytes
    /// Default: 256MiB (268_435_456 bytes)
    pub max_input_file_size: u64,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_input_file_size: 268_435_456, // 256MiB
        }
    }
}

impl SecurityConfig {
    /// Reads the whole input, refusing anything above the size limit
    ///
    /// At most `max_input_file_size + 1` bytes are pulled from the reader, so
    /// an oversized input is rejected without being buffered completely.
    pub fn read_limited<R: Read>(&self, reader: R) -> Result<Vec<u8>, ShiftSheetError> {
        let mut buffer = Vec::new();
        let bytes_read = reader
            .take(self.max_input_file_size.saturating_add(1))
            .read_to_end(&mut buffer)?;

        if bytes_read as u64 > self.max_input_file_size {
            return Err(ShiftSheetError::SecurityViolation(format!(
                "Input file size exceeds maximum: more than {} bytes",
                self.max_input_file_size
            )));
        }

        Ok(buffer)
    }
}
