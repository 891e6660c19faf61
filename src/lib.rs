pub mod cursor;
pub mod editor;
pub mod error;
pub mod geometry;
pub mod input;
pub mod logger;
pub mod output;
pub mod screen;
pub mod terminal;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 描画
pub const MARKER: u8 = b'@';

// 入力
pub const QUIT_KEY: u8 = input::ctrl_key(b'q');
/// raw mode の read タイムアウト (1/10 秒単位)
pub const READ_TIMEOUT_DECISECONDS: u8 = 10;

/// カーソル位置応答として読む最大バイト数
pub const POSITION_REPORT_MAX: usize = 31;

pub const LOG_FILE: &str = "grass.log";
