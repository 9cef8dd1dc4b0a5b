use crate::ByteSink;

impl ByteSink for Vec<u8> {
    fn put_bytes(&mut self, buf: &[u8]) -> std::io::Result<()> {
        self.extend_from_slice(buf);
        Ok(())
    }

    fn seal(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
