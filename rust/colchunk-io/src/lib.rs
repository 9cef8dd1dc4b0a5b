//! Byte transport abstractions used to move raw chunk bytes across process or
//! network boundaries:
//! - `ByteSink`: sequential writer with a `seal()` operation, committing the write activity.
//! - `FrameWriter` / `FrameReader`: length-prefixed framing on top of a sink or a reader.
//! - `InboundFrame`: an owned byte region received from a reader, released with `close()`.
//!
//! Provides a couple of simple sink implementations: memory-based and `std::io::Write`-based.

pub mod frame;
pub mod memory;

pub use frame::{FrameReader, FrameWriter, InboundFrame};

/// A trait for sequential writing with explicit sealing semantics.
///
/// Unlike [`std::io::Write`], the sink requires an explicit [`seal`](ByteSink::seal)
/// once all data is written, so that buffered bytes are committed to the underlying
/// medium.
pub trait ByteSink: Send {
    /// Writes the entire buffer, appending it to any previously written data.
    ///
    /// Either all bytes are written successfully, or an error is returned.
    fn put_bytes(&mut self, buf: &[u8]) -> std::io::Result<()>;

    /// Seals the sink, flushing and committing all buffered data.
    ///
    /// Calling [`put_bytes`](ByteSink::put_bytes) after sealing may result in an error.
    fn seal(&mut self) -> std::io::Result<()>;
}

impl<T: ByteSink + ?Sized> ByteSink for &mut T {
    fn put_bytes(&mut self, buf: &[u8]) -> std::io::Result<()> {
        (**self).put_bytes(buf)
    }

    fn seal(&mut self) -> std::io::Result<()> {
        (**self).seal()
    }
}

/// Adapts any [`std::io::Write`] into a [`ByteSink`]. Sealing flushes the writer.
pub struct WriteSink<W> {
    inner: W,
    sealed: bool,
}

impl<W: std::io::Write + Send> WriteSink<W> {
    pub fn new(inner: W) -> WriteSink<W> {
        WriteSink {
            inner,
            sealed: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: std::io::Write + Send> ByteSink for WriteSink<W> {
    fn put_bytes(&mut self, buf: &[u8]) -> std::io::Result<()> {
        if self.sealed {
            return Err(std::io::Error::other("write to a sealed sink"));
        }
        self.inner.write_all(buf)
    }

    fn seal(&mut self) -> std::io::Result<()> {
        if !self.sealed {
            self.inner.flush()?;
            self.sealed = true;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use crate::{ByteSink, WriteSink};

    #[test]
    fn test_write_sink_file() {
        let mut file = tempfile::tempfile().unwrap();
        {
            let mut sink = WriteSink::new(std::io::BufWriter::new(&mut file));
            sink.put_bytes(b"abcd").unwrap();
            sink.put_bytes(b"123").unwrap();
            sink.seal().unwrap();
            assert!(sink.put_bytes(b"x").is_err());
        }
        use std::io::Seek;
        file.rewind().unwrap();
        let mut contents = Vec::new();
        file.read_to_end(&mut contents).unwrap();
        assert_eq!(contents, b"abcd123");
    }
}
