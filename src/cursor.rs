/// 0 始まりのカーソル位置
///
/// 画面サイズによるクランプはしない。0 からの後退や上限からの前進は折り返す。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    col: u32,
    row: u32,
}

impl Cursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(row: u32, col: u32) -> Self {
        Self { col, row }
    }

    pub fn col(&self) -> u32 {
        self.col
    }

    pub fn row(&self) -> u32 {
        self.row
    }

    pub fn move_up(&mut self) {
        self.row = self.row.wrapping_sub(1);
    }

    pub fn move_down(&mut self) {
        self.row = self.row.wrapping_add(1);
    }

    pub fn move_left(&mut self) {
        self.col = self.col.wrapping_sub(1);
    }

    pub fn move_right(&mut self) {
        self.col = self.col.wrapping_add(1);
    }
}
