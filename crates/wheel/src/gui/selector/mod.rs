pub mod model;
pub mod view;

pub use model::{ItemStyle, State};
pub use view::draw;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

pub const WINDOW_WIDTH: i32 = 320;
pub const WINDOW_HEIGHT: i32 = 420;
pub const ITEM_WIDTH: f64 = 200.0;
pub const ITEM_HEIGHT: f64 = 44.0;
pub const CORNER_RADIUS: f64 = 12.0;
pub const LABEL_FONT_SIZE: f64 = 17.0;
pub const DESCRIPTION_FONT_SIZE: f64 = 13.0;
pub const DESCRIPTION_GAP: f64 = 28.0; // below the lowest visible item
pub const FADE_HEIGHT: f64 = 72.0; // top/bottom vignette
pub const SHADOW_OFFSET: f64 = 1.0;
