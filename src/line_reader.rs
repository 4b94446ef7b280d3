use std::io;

use bytes::{Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt};

/// Provides a facility to read LF- or CRLF-terminated lines from a stream.
pub struct LineReader<T: AsyncRead + Unpin> {
    /// Stores data that's been read in but lacks a line ending.
    buf: BytesMut,
    /// Index in buf before which no LF has been seen.
    maybe_lf_from: usize,
    /// Data source
    reader: T,
    /// On a reading error, this field is set and its value returned once the
    /// buffer is drained of pending lines.
    pending_error: Option<io::Error>,
}

impl<T: AsyncRead + Unpin> LineReader<T> {
    /// Reads a line from the internal buffer and/or reader, without its line
    /// ending. On an end-of-stream condition, any unterminated trailing text is
    /// returned as a final line, then None.
    ///
    /// This function is cancel-safe: its only async operation is a `read_buf`
    /// against the internal `reader`, and so it has the same guarantees:
    /// either a complete read occurs and is processed, or this is cancelled.
    ///
    /// On a read error, the error value is returned after processing all
    /// pending lines in the internal buffer, but calling `read_line` again will
    /// attempt a new read safely.
    pub async fn read_line(&mut self) -> io::Result<Option<Bytes>> {
        loop {
            // Only scan bytes we haven't already looked at, keeping
            // O(bytes_read) behaviour. Pipelined lines that arrive in the same
            // read_buf call are drained before reading again.
            if let Some(eol) = self.buf[self.maybe_lf_from..]
                .iter()
                .position(|c| *c == b'\n')
            {
                let line = self.buf.split_to(self.maybe_lf_from + eol + 1).freeze();
                self.maybe_lf_from = 0;

                return Ok(Some(strip_line_ending(line)));
            }

            self.maybe_lf_from = self.buf.len();

            let n_bytes_read = match self.reader.read_buf(&mut self.buf).await {
                Ok(n) => n,
                Err(e) => {
                    self.pending_error = Some(e);
                    0
                },
            };

            // If we didn't read any bytes this time around, assume we've
            // reached an end-of-stream condition. Hand back whatever is left
            // before reporting the error or the end.
            if n_bytes_read == 0 {
                if !self.buf.is_empty() {
                    self.maybe_lf_from = 0;
                    let line = self.buf.split().freeze();
                    return Ok(Some(strip_line_ending(line)));
                }

                return match self.pending_error.take() {
                    Some(e) => Err(e),
                    None => Ok(None),
                };
            }
        }
    }
}

/// Drops a trailing LF, and a CR before it, if present.
fn strip_line_ending(mut line: Bytes) -> Bytes {
    if line.ends_with(b"\n") {
        line.truncate(line.len() - 1);
    }
    if line.ends_with(b"\r") {
        line.truncate(line.len() - 1);
    }
    line
}

impl<T: AsyncRead + Unpin> From<T> for LineReader<T> {
    fn from(value: T) -> Self {
        Self {
            buf: BytesMut::new(),
            maybe_lf_from: 0,
            reader: value,
            pending_error: None,
        }
    }
}
