use std::io::{self, Write};
use std::process;

use anyhow::Context;
use grass::editor::Editor;
use grass::geometry;
use grass::terminal::{self, RawMode, Tty};
use grass::{LOG_FILE, logger};

fn run() -> anyhow::Result<()> {
    // drop で元の端末モードに戻る
    let mut raw_mode = RawMode::enter(Tty::stdin())?;

    let mut stdin = io::stdin();
    // フレームを 1 回の write で出すため、行バッファを通さない
    let mut stdout = terminal::unbuffered(io::stdout())?;
    let size = geometry::probe_window_size(termion::terminal_size(), &mut stdin, &mut stdout)
        .context("Call getWindowSize failed")?;

    let mut editor = Editor::new(stdin, stdout, size);
    editor.run()?;

    raw_mode.restore()?;
    Ok(())
}

/// 端末モードを戻した後に呼ぶ。画面を消して診断を出し、終了コードを返す
fn report_fatal(err: &anyhow::Error, screen: &mut impl Write, diag: &mut impl Write) -> i32 {
    logger::debug(&format!("fatal: {:#}", err));
    let _ = terminal::clear_screen(screen);
    let _ = write!(diag, "{:#}\r\n", err);
    let _ = diag.flush();
    1
}

fn main() {
    // ログが開けなくても編集はできる
    let _ = logger::init(LOG_FILE);
    logger::debug("starting grass");

    // run から戻った時点で RawMode は drop 済み
    if let Err(err) = run() {
        let code = report_fatal(&err, &mut io::stdout(), &mut io::stderr());
        process::exit(code);
    }
}
