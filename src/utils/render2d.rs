use crate::core::RenderFrame;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color(pub u8, pub u8, pub u8, pub u8);

impl Color {
    fn rgba(self) -> [u8; 4] { [self.0, self.1, self.2, self.3] }
}

pub const BLACK: Color = Color(0, 0, 0, 255);
pub const WHITE: Color = Color(255, 255, 255, 255);
pub const GRAY: Color = Color(180, 180, 180, 255);
pub const BEIGE: Color = Color(202, 152, 101, 255);
pub const MAUVE: Color = Color(129, 132, 203, 255);

/// A minimal RGBA software canvas.
pub struct Canvas {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>, // RGBA
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        let mut canvas = Self {
            width,
            height,
            pixels: vec![0; (width as usize) * (height as usize) * 4],
        };
        canvas.clear(BLACK);
        canvas
    }

    pub fn clear(&mut self, color: Color) {
        let rgba = color.rgba();
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&rgba);
        }
    }

    #[inline]
    pub fn put_pixel(&mut self, x: i32, y: i32, color: Color) {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height { return; }
        let idx = ((y as u32 * self.width + x as u32) as usize) * 4;
        self.pixels[idx..idx + 4].copy_from_slice(&color.rgba());
    }

    /// Filled rectangle with top-left (x, y), clipped to the canvas.
    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color) {
        for yy in y.max(0)..(y + h).min(self.height as i32) {
            for xx in x.max(0)..(x + w).min(self.width as i32) {
                self.put_pixel(xx, yy, color);
            }
        }
    }

    pub fn fill_circle(&mut self, cx: i32, cy: i32, r: i32, color: Color) {
        for dy in -r..=r {
            for dx in -r..=r {
                if dx * dx + dy * dy <= r * r {
                    self.put_pixel(cx + dx, cy + dy, color);
                }
            }
        }
    }

    /// Bresenham line.
    pub fn draw_line(&mut self, mut x0: i32, mut y0: i32, x1: i32, y1: i32, color: Color) {
        let dx = (x1 - x0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let dy = -(y1 - y0).abs();
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.put_pixel(x0, y0, color);
            if x0 == x1 && y0 == y1 { break; }
            let e2 = 2 * err;
            if e2 >= dy { err += dy; x0 += sx; }
            if e2 <= dx { err += dx; y0 += sy; }
        }
    }

    pub fn into_render_frame(self) -> RenderFrame {
        RenderFrame::Pixels { width: self.width, height: self.height, data: self.pixels }
    }
}
