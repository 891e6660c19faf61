use std::io::{self, Read, Write};
use std::str;

use crate::POSITION_REPORT_MAX;
use crate::error::{Error, Failed, Result};
use crate::logger;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSize {
    pub rows: u16,
    pub cols: u16,
}

/// 端末のサイズを求める
///
/// `direct` は ioctl (TIOCGWINSZ) の結果で、`termion::terminal_size` と同じく (cols, rows) の順。
/// 失敗した場合や列数が 0 の場合は、カーソルを右下へ送って位置を問い合わせる。
pub fn probe_window_size<R: Read, W: Write>(
    direct: io::Result<(u16, u16)>,
    input: &mut R,
    output: &mut W,
) -> Result<WindowSize> {
    match direct {
        Ok((cols, rows)) if cols != 0 => {
            logger::debug(&format!("window size from ioctl: {}x{}", cols, rows));
            return Ok(WindowSize { rows, cols });
        }
        Ok(_) => logger::debug("ioctl returned zero columns, probing cursor position"),
        Err(e) => logger::debug(&format!("ioctl failed ({}), probing cursor position", e)),
    }

    // 999C / 999B は画面端で止まるので右下に到達する
    output.write_all(b"\x1b[999C\x1b[999B").failed("write")?;
    cursor_position(input, output)
}

/// `ESC [6n` でカーソル位置を問い合わせ、`ESC [ rows ; cols R` の応答を読む
pub fn cursor_position<R: Read, W: Write>(input: &mut R, output: &mut W) -> Result<WindowSize> {
    output.write_all(b"\x1b[6n").failed("write")?;
    output.flush().failed("write")?;

    let mut buf = [0u8; POSITION_REPORT_MAX];
    let mut len = 0;
    while len < POSITION_REPORT_MAX {
        let mut byte = [0u8; 1];
        // タイムアウトで 0 バイトが返ったら、そこまでの応答で判定する
        if input.read(&mut byte).failed("read")? != 1 {
            break;
        }
        if byte[0] == b'R' {
            break;
        }
        buf[len] = byte[0];
        len += 1;
    }

    let report = &buf[..len];
    parse_position_report(report).ok_or_else(|| Error::malformed_report("getWindowSize", report))
}

/// `R` を除いた応答 (`ESC [ rows ; cols`) を解釈する
pub fn parse_position_report(report: &[u8]) -> Option<WindowSize> {
    let body = report.strip_prefix(b"\x1b[")?;
    let (rows, cols) = str::from_utf8(body).ok()?.split_once(';')?;
    let rows: u16 = rows.parse().ok()?;
    let cols: u16 = cols.parse().ok()?;
    if rows == 0 || cols == 0 {
        return None;
    }
    Some(WindowSize { rows, cols })
}
