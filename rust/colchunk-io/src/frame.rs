//! Length-prefixed framing: every frame is a little-endian `u32` payload length
//! followed by the payload bytes.

use std::io::Read;

use byteorder::{ByteOrder, LE};
use colchunk_common::{Result, error::Error};

use crate::ByteSink;

/// Size of the frame length prefix in bytes.
pub const FRAME_PREFIX_SIZE: usize = 4;

/// Writes length-prefixed frames into a [`ByteSink`].
pub struct FrameWriter<S> {
    sink: S,
    frames_written: usize,
}

impl<S: ByteSink> FrameWriter<S> {
    pub fn new(sink: S) -> FrameWriter<S> {
        FrameWriter {
            sink,
            frames_written: 0,
        }
    }

    /// Emits `payload` as a single frame.
    pub fn put_bytes(&mut self, payload: &[u8]) -> Result<()> {
        let len = u32::try_from(payload.len())?;
        let mut prefix = [0u8; FRAME_PREFIX_SIZE];
        LE::write_u32(&mut prefix, len);
        self.sink
            .put_bytes(&prefix)
            .map_err(|e| Error::io("frame prefix", e))?;
        self.sink
            .put_bytes(payload)
            .map_err(|e| Error::io("frame payload", e))?;
        self.frames_written += 1;
        Ok(())
    }

    pub fn frames_written(&self) -> usize {
        self.frames_written
    }

    /// Seals the underlying sink and returns it.
    pub fn finish(mut self) -> Result<S> {
        self.sink.seal().map_err(|e| Error::io("seal", e))?;
        log::debug!("sealed frame writer after {} frames", self.frames_written);
        Ok(self.sink)
    }
}

/// Reads length-prefixed frames from a [`std::io::Read`] source.
pub struct FrameReader<R> {
    reader: R,
}

impl<R: Read> FrameReader<R> {
    pub fn new(reader: R) -> FrameReader<R> {
        FrameReader { reader }
    }

    /// Reads the next frame.
    ///
    /// Returns `Ok(None)` on a clean end of stream at a frame boundary. A stream that
    /// ends inside a prefix or payload is reported as an I/O error.
    pub fn next_frame(&mut self) -> Result<Option<InboundFrame>> {
        let mut prefix = [0u8; FRAME_PREFIX_SIZE];
        let mut filled = 0;
        while filled < FRAME_PREFIX_SIZE {
            let n = self
                .reader
                .read(&mut prefix[filled..])
                .map_err(|e| Error::io("frame prefix", e))?;
            if n == 0 {
                break;
            }
            filled += n;
        }
        if filled == 0 {
            return Ok(None);
        }
        if filled < FRAME_PREFIX_SIZE {
            return Err(Error::io(
                "frame prefix",
                std::io::ErrorKind::UnexpectedEof.into(),
            ));
        }

        // The payload buffer only grows with bytes actually received.
        let len = LE::read_u32(&prefix) as usize;
        let mut payload = Vec::new();
        (&mut self.reader)
            .take(len as u64)
            .read_to_end(&mut payload)
            .map_err(|e| Error::io("frame payload", e))?;
        if payload.len() < len {
            return Err(Error::io(
                "frame payload",
                std::io::ErrorKind::UnexpectedEof.into(),
            ));
        }
        Ok(Some(InboundFrame { data: payload }))
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

/// An owned inbound byte region holding one frame's payload.
#[derive(Debug, Clone)]
pub struct InboundFrame {
    data: Vec<u8>,
}

impl InboundFrame {
    pub fn new(data: Vec<u8>) -> InboundFrame {
        InboundFrame { data }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Closes the frame, handing ownership of the payload bytes to the caller.
    pub fn close(self) -> Vec<u8> {
        self.data
    }
}

impl From<Vec<u8>> for InboundFrame {
    fn from(data: Vec<u8>) -> Self {
        InboundFrame::new(data)
    }
}
