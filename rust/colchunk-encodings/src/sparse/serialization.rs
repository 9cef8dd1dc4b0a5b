//! Raw byte hand-off of sparse chunks. The serialized form is the chunk buffer
//! itself, header and records, with no additional framing.

use colchunk_common::Result;
use colchunk_io::{ByteSink, FrameWriter, InboundFrame};

use super::{SparseIntChunk, layout::SparseLayout};

impl SparseIntChunk {
    /// The chunk buffer exactly as stored.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Returns a copy of the chunk buffer.
    pub fn serialize(&self) -> Vec<u8> {
        self.data.clone()
    }

    /// Consumes the chunk, handing over its buffer.
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Takes ownership of a serialized chunk buffer.
    ///
    /// Only the header is decoded and checked. Records are not validated: a buffer
    /// whose records are unsorted or whose length is not a whole number of records
    /// decodes to unspecified values (trailing partial records are ignored), but
    /// every read stays within the buffer.
    pub fn deserialize(bytes: Vec<u8>) -> Result<SparseIntChunk> {
        let layout = SparseLayout::read_header(&bytes)?;
        let chunk = Self::from_parts(layout, bytes);
        log::debug!(
            "deserialized sparse chunk: len={}, entries={}, row_id_width={}, value_width={}",
            chunk.len(),
            chunk.sparse_len(),
            layout.row_id_width.size(),
            layout.value_width.size()
        );
        Ok(chunk)
    }

    /// Emits the chunk buffer as one frame.
    pub fn write_to<S: ByteSink>(&self, writer: &mut FrameWriter<S>) -> Result<()> {
        writer.put_bytes(&self.data)
    }

    /// Reconstructs a chunk from a received frame, taking ownership of its bytes.
    pub fn read_from(frame: InboundFrame) -> Result<SparseIntChunk> {
        Self::deserialize(frame.close())
    }
}
