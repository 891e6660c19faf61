use std::io::{self, Write};

use crate::editor::EditorState;
use crate::error::{Failed, Result};
use crate::output::OutputBuffer;
use crate::{MARKER, VERSION};

pub struct Screen;

impl Screen {
    pub fn welcome_message() -> String {
        format!("Grass Editor -- version {}", VERSION)
    }

    /// 中央寄せしたバナー。画面幅を超える分は切り詰める
    fn draw_welcome_message(buf: &mut OutputBuffer, cols: u16) {
        let msg = Self::welcome_message();
        let cols = usize::from(cols);
        let welcome = &msg.as_bytes()[..msg.len().min(cols)];

        let padding = (cols - welcome.len()) / 2;
        if padding > 0 {
            buf.append(&[MARKER]);
            for _ in 0..padding - 1 {
                buf.append(b" ");
            }
        }
        buf.append(welcome);
    }

    fn draw_rows(buf: &mut OutputBuffer, state: &EditorState) -> io::Result<()> {
        let size = state.size();
        for y in 0..size.rows {
            if y == size.rows / 3 {
                Self::draw_welcome_message(buf, size.cols);
            } else {
                buf.append(&[MARKER]);
            }

            // 行末までクリア
            write!(buf, "{}", termion::clear::UntilNewline)?;
            // 最終行で改行するとスクロールしてしまう
            if y < size.rows - 1 {
                buf.append(b"\r\n");
            }
        }
        Ok(())
    }

    fn compose(buf: &mut OutputBuffer, state: &EditorState) -> io::Result<()> {
        // 描画中はカーソルを隠す
        write!(buf, "{}", termion::cursor::Hide)?;
        buf.append(b"\x1b[H");

        Self::draw_rows(buf, state)?;

        // カーソル位置は 1 始まり。折り返した値でも溢れないよう u64 で計算する
        let cursor = state.cursor();
        write!(
            buf,
            "\x1b[{};{}H",
            u64::from(cursor.row()) + 1,
            u64::from(cursor.col()) + 1
        )?;

        write!(buf, "{}", termion::cursor::Show)?;
        Ok(())
    }

    /// 1 フレームを組み立てて 1 回の write で書き出す
    ///
    /// `out` はバッファリングしない書き込み先であること。`io::stdout()` は行単位で
    /// 書き出すのでフレームが分割される。`terminal::unbuffered` を使う。
    pub fn refresh<W: Write>(out: &mut W, state: &EditorState) -> Result<()> {
        let size = state.size();
        let capacity = (usize::from(size.rows) + 1) * (usize::from(size.cols) + 4);
        let mut buf = OutputBuffer::with_capacity(capacity);
        Self::compose(&mut buf, state).failed("write")?;
        buf.flush_to(out).failed("write")
    }
}
