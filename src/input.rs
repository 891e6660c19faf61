use std::io::{self, Read};

use crate::QUIT_KEY;
use crate::error::{Failed, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Left,
    Down,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Quit,
    Move(Direction),
    Ignore,
}

impl Command {
    pub fn from_key(key: u8) -> Self {
        match key {
            QUIT_KEY => Command::Quit,
            b'w' => Command::Move(Direction::Up),
            b'a' => Command::Move(Direction::Left),
            b's' => Command::Move(Direction::Down),
            b'd' => Command::Move(Direction::Right),
            _ => Command::Ignore,
        }
    }
}

/// Ctrl と同時に押したときのキーコード
pub const fn ctrl_key(key: u8) -> u8 {
    key & 0x1f
}

/// 1 バイト読めるまで待つ
///
/// raw mode では VTIME のタイムアウトで 0 バイトが返るので読み直す。
/// EINTR / EAGAIN も読み直し、それ以外の失敗はそのまま返す。
pub fn read_key<R: Read>(input: &mut R) -> Result<u8> {
    let mut byte = [0u8; 1];
    loop {
        match input.read(&mut byte) {
            Ok(1) => return Ok(byte[0]),
            Ok(_) => continue,
            Err(e) if matches!(e.kind(), io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock) => {
                continue;
            }
            Err(e) => return Err(e).failed("read"),
        }
    }
}
