use std::io::{Read, Write};

use crate::cursor::Cursor;
use crate::error::{Failed, Result};
use crate::geometry::WindowSize;
use crate::input::{self, Command, Direction};
use crate::logger;
use crate::screen::Screen;
use crate::terminal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorStatus {
    Running,
    Terminated,
}

/// エディタの状態。描画と入力処理の両方から参照されるが、単一スレッドからしか触らない
pub struct EditorState {
    cursor: Cursor,
    // 起動時に一度だけ決まる
    size: WindowSize,
}

impl EditorState {
    pub fn new(size: WindowSize) -> Self {
        Self::with_cursor(size, Cursor::new())
    }

    pub fn with_cursor(size: WindowSize, cursor: Cursor) -> Self {
        Self { cursor, size }
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn size(&self) -> WindowSize {
        self.size
    }

    pub fn move_cursor(&mut self, direction: Direction) {
        match direction {
            Direction::Up => self.cursor.move_up(),
            Direction::Left => self.cursor.move_left(),
            Direction::Down => self.cursor.move_down(),
            Direction::Right => self.cursor.move_right(),
        }
    }
}

pub struct Editor<R: Read, W: Write> {
    input: R,
    output: W,
    state: EditorState,
    status: EditorStatus,
}

impl<R: Read, W: Write> Editor<R, W> {
    pub fn new(input: R, output: W, size: WindowSize) -> Self {
        Self {
            input,
            output,
            state: EditorState::new(size),
            status: EditorStatus::Running,
        }
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn status(&self) -> EditorStatus {
        self.status
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    pub fn refresh_screen(&mut self) -> Result<()> {
        Screen::refresh(&mut self.output, &self.state)
    }

    /// 1 キー読んで処理する。終了キーなら画面を消して Terminated を返す
    pub fn process_keypress(&mut self) -> Result<EditorStatus> {
        let key = input::read_key(&mut self.input)?;
        match Command::from_key(key) {
            Command::Quit => {
                logger::debug("quit");
                terminal::clear_screen(&mut self.output).failed("write")?;
                self.status = EditorStatus::Terminated;
            }
            Command::Move(direction) => self.state.move_cursor(direction),
            Command::Ignore => {}
        }
        Ok(self.status)
    }

    pub fn run(&mut self) -> Result<()> {
        while self.status == EditorStatus::Running {
            self.refresh_screen()?;
            self.process_keypress()?;
        }
        Ok(())
    }
}
