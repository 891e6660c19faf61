use std::fs::File;
use std::io::{self, Write};
use std::os::fd::AsFd;
use std::os::unix::io::{AsRawFd, RawFd};

use crate::READ_TIMEOUT_DECISECONDS;
use crate::error::{Failed, Result};

/// 端末属性の取得と適用
pub trait ModeControl {
    type Mode: Clone;

    fn fetch(&mut self) -> Result<Self::Mode>;
    fn apply(&mut self, mode: &Self::Mode) -> Result<()>;
    fn raw(mode: &Self::Mode) -> Self::Mode;
}

/// stdin の termios を操作する
pub struct Tty {
    fd: RawFd,
}

impl Tty {
    pub fn stdin() -> Self {
        Self {
            fd: io::stdin().as_raw_fd(),
        }
    }
}

impl ModeControl for Tty {
    type Mode = termios::Termios;

    fn fetch(&mut self) -> Result<Self::Mode> {
        termios::Termios::from_fd(self.fd).failed("tcgetattr")
    }

    fn apply(&mut self, mode: &Self::Mode) -> Result<()> {
        termios::tcsetattr(self.fd, termios::TCSAFLUSH, mode).failed("tcsetattr")
    }

    fn raw(mode: &Self::Mode) -> Self::Mode {
        use termios::*;

        let mut raw = *mode;
        // エコー、カノニカルモード、シグナル (Ctrl-C, Ctrl-Z)、Ctrl-V を無効化
        raw.c_lflag &= !(ECHO | ICANON | ISIG | IEXTEN);
        // フロー制御 (Ctrl-S/Ctrl-Q) と CR -> NL 変換を無効化
        raw.c_iflag &= !(IXON | ICRNL | BRKINT | INPCK | ISTRIP);
        // 出力の後処理 (\n -> \r\n) を無効化
        raw.c_oflag &= !OPOST;
        raw.c_cflag |= CS8;
        // read は 0 バイトで戻ってよい。タイムアウトは 1/10 秒単位
        raw.c_cc[VMIN] = 0;
        raw.c_cc[VTIME] = READ_TIMEOUT_DECISECONDS;
        raw
    }
}

/// raw mode の間だけ生きるガード。drop で元のモードに戻す
pub struct RawMode<C: ModeControl> {
    control: C,
    saved: C::Mode,
    restored: bool,
}

impl<C: ModeControl> RawMode<C> {
    pub fn enter(mut control: C) -> Result<Self> {
        let saved = control.fetch()?;
        let raw = C::raw(&saved);
        // ここで失敗しても drop で保存済みのモードを書き戻す
        let mut guard = Self {
            control,
            saved,
            restored: false,
        };
        guard.control.apply(&raw)?;
        Ok(guard)
    }

    pub fn saved(&self) -> &C::Mode {
        &self.saved
    }

    /// 2 回目以降は何もしない
    pub fn restore(&mut self) -> Result<()> {
        if self.restored {
            return Ok(());
        }
        self.restored = true;
        self.control.apply(&self.saved)
    }
}

impl<C: ModeControl> Drop for RawMode<C> {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}

/// `fd` を複製してバッファリングしない書き込み先にする
///
/// `io::stdout()` は改行ごとに書き出すので、フレームの書き出しにはこちらを使う。
pub fn unbuffered(fd: impl AsFd) -> Result<File> {
    let owned = fd.as_fd().try_clone_to_owned().failed("dup")?;
    Ok(File::from(owned))
}

/// 画面全体を消してカーソルを左上に戻す
pub fn clear_screen(out: &mut impl Write) -> io::Result<()> {
    write!(out, "{}\x1b[H", termion::clear::All)?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::panic::{self, AssertUnwindSafe};
    use std::rc::Rc;

    #[derive(Clone, Debug, PartialEq)]
    enum FakeMode {
        Cooked,
        Raw,
    }

    struct FakeTty {
        applied: Rc<RefCell<Vec<FakeMode>>>,
        fail_apply: bool,
    }

    impl FakeTty {
        fn new() -> (Self, Rc<RefCell<Vec<FakeMode>>>) {
            let applied = Rc::new(RefCell::new(Vec::new()));
            let tty = Self {
                applied: Rc::clone(&applied),
                fail_apply: false,
            };
            (tty, applied)
        }
    }

    impl ModeControl for FakeTty {
        type Mode = FakeMode;

        fn fetch(&mut self) -> Result<FakeMode> {
            Ok(FakeMode::Cooked)
        }

        fn apply(&mut self, mode: &FakeMode) -> Result<()> {
            self.applied.borrow_mut().push(mode.clone());
            if self.fail_apply {
                Err(io::Error::other("not a tty")).failed("tcsetattr")
            } else {
                Ok(())
            }
        }

        fn raw(_mode: &FakeMode) -> FakeMode {
            FakeMode::Raw
        }
    }

    #[test]
    fn test_enter_saves_and_applies_raw() {
        let (tty, applied) = FakeTty::new();
        let guard = RawMode::enter(tty).unwrap();

        assert_eq!(guard.saved(), &FakeMode::Cooked);
        assert_eq!(*applied.borrow(), vec![FakeMode::Raw]);
    }

    #[test]
    fn test_drop_restores_saved_mode() {
        let (tty, applied) = FakeTty::new();
        {
            let _guard = RawMode::enter(tty).unwrap();
        }
        assert_eq!(*applied.borrow(), vec![FakeMode::Raw, FakeMode::Cooked]);
    }

    #[test]
    fn test_restore_is_idempotent() {
        let (tty, applied) = FakeTty::new();
        let mut guard = RawMode::enter(tty).unwrap();

        guard.restore().unwrap();
        guard.restore().unwrap();
        drop(guard);

        assert_eq!(*applied.borrow(), vec![FakeMode::Raw, FakeMode::Cooked]);
    }

    #[test]
    fn test_restores_on_abnormal_exit() {
        let (tty, applied) = FakeTty::new();

        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            let _guard = RawMode::enter(tty).unwrap();
            panic!("abnormal exit");
        }));

        assert!(result.is_err());
        assert_eq!(applied.borrow().last(), Some(&FakeMode::Cooked));
    }

    #[test]
    fn test_enter_fails_when_apply_fails() {
        let (mut tty, applied) = FakeTty::new();
        tty.fail_apply = true;

        let err = RawMode::enter(tty).err().unwrap();

        assert_eq!(err.op(), "tcsetattr");
        // 失敗しても保存済みのモードへ戻そうとする
        assert_eq!(*applied.borrow(), vec![FakeMode::Raw, FakeMode::Cooked]);
    }

    /// 擬似端末のマスター側。使えない環境では None
    fn open_pty() -> Option<File> {
        std::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .open("/dev/ptmx")
            .ok()
    }

    #[test]
    fn test_raw_termios_flags() {
        use termios::*;

        let Some(pty) = open_pty() else {
            return;
        };
        let mut tty = Tty { fd: pty.as_raw_fd() };
        let cooked = tty.fetch().unwrap();

        let raw = Tty::raw(&cooked);

        assert_eq!(raw.c_lflag & (ECHO | ICANON | ISIG | IEXTEN), 0);
        assert_eq!(raw.c_iflag & (IXON | ICRNL | BRKINT | INPCK | ISTRIP), 0);
        assert_eq!(raw.c_oflag & OPOST, 0);
        assert_eq!(raw.c_cflag & CS8, CS8);
        assert_eq!(raw.c_cc[VMIN], 0);
        assert_eq!(raw.c_cc[VTIME], 10);
    }

    #[test]
    fn test_raw_mode_on_pty_restores_original() {
        use termios::*;

        let Some(pty) = open_pty() else {
            return;
        };
        let fd = pty.as_raw_fd();
        let original = Termios::from_fd(fd).unwrap();
        {
            let _guard = RawMode::enter(Tty { fd }).unwrap();
            let current = Termios::from_fd(fd).unwrap();
            assert_eq!(current.c_lflag & (ECHO | ICANON), 0);
        }
        let restored = Termios::from_fd(fd).unwrap();
        assert_eq!(restored.c_lflag, original.c_lflag);
        assert_eq!(restored.c_iflag, original.c_iflag);
        assert_eq!(restored.c_oflag, original.c_oflag);
    }

    #[test]
    fn test_unbuffered_writes_through() {
        use std::io::Read;
        use std::os::unix::net::UnixStream;

        let (tx, mut rx) = UnixStream::pair().unwrap();
        let mut out = unbuffered(&tx).unwrap();

        out.write_all(b"\x1b[H").unwrap();
        // flush せずに届いている
        let mut received = [0u8; 3];
        rx.read_exact(&mut received).unwrap();

        assert_eq!(&received, b"\x1b[H");
    }

    #[test]
    fn test_clear_screen_sequence() {
        let mut out = Vec::new();
        clear_screen(&mut out).unwrap();
        assert_eq!(out, b"\x1b[2J\x1b[H");
    }
}
