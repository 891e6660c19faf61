use std::io::{self, Write};

/// 1 フレーム分のエスケープシーケンスと文字列を溜めて、まとめて書き出す
#[derive(Default)]
pub struct OutputBuffer {
    buf: Vec<u8>,
}

impl OutputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    pub fn append(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// 溜めた内容を 1 回の write で書き出して空にする
    pub fn flush_to<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        out.write_all(&self.buf)?;
        out.flush()?;
        // 容量は次のフレームで使い回す
        self.buf.clear();
        Ok(())
    }
}

impl Write for OutputBuffer {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.append(bytes);
        Ok(bytes.len())
    }

    // 端末への書き出しは flush_to だけが行う
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
