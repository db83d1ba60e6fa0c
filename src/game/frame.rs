//! Visual surface and frame capture
//!
//! The [`Canvas`] is the surface games draw on. It stores pixels column-major
//! (x outer, y inner), the native layout of most 2-D window surfaces.
//! [`Canvas::capture`] produces a [`Frame`] in row-major (row, column, channel)
//! order, which is what agents and the data pipeline consume.

use serde::{Deserialize, Serialize};

pub type Rgb = [u8; 3];

pub const COLOR_BLACK: Rgb = [0, 0, 0];
pub const COLOR_WHITE: Rgb = [255, 255, 255];
pub const COLOR_GREEN: Rgb = [25, 255, 0];
pub const COLOR_RED: Rgb = [255, 0, 0];

/// Number of channels in a captured frame
pub const FRAME_CHANNELS: usize = 3;

/// An observation: pixel intensities of shape (height, width, channels)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    height: usize,
    width: usize,
    channels: usize,
    data: Vec<u8>,
}

impl Frame {
    /// Build a frame from row-major data
    ///
    /// Returns `None` if `data` does not hold exactly `height * width * channels` values.
    pub fn from_raw(height: usize, width: usize, channels: usize, data: Vec<u8>) -> Option<Self> {
        (data.len() == height * width * channels).then_some(Self {
            height,
            width,
            channels,
            data,
        })
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    /// (height, width, channels)
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.height, self.width, self.channels)
    }

    /// Raw row-major data
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Channel values at (row, col)
    pub fn pixel(&self, row: usize, col: usize) -> &[u8] {
        let start = (row * self.width + col) * self.channels;
        &self.data[start..start + self.channels]
    }

    /// Collapse RGB to a single luminance channel
    pub fn to_grayscale(&self) -> Frame {
        if self.channels == 1 {
            return self.clone();
        }
        let data = self
            .data
            .chunks_exact(self.channels)
            .map(|px| {
                let luma = 0.299 * px[0] as f32 + 0.587 * px[1] as f32 + 0.114 * px[2] as f32;
                luma.round().clamp(0.0, 255.0) as u8
            })
            .collect();
        Frame {
            height: self.height,
            width: self.width,
            channels: 1,
            data,
        }
    }

    /// Nearest-neighbour resize to (height, width)
    pub fn resized(&self, height: usize, width: usize) -> Frame {
        if height == self.height && width == self.width {
            return self.clone();
        }
        let mut data = Vec::with_capacity(height * width * self.channels);
        for row in 0..height {
            let src_row = (row * self.height / height.max(1)).min(self.height.saturating_sub(1));
            for col in 0..width {
                let src_col = (col * self.width / width.max(1)).min(self.width.saturating_sub(1));
                data.extend_from_slice(self.pixel(src_row, src_col));
            }
        }
        Frame {
            height,
            width,
            channels: self.channels,
            data,
        }
    }

    /// Channel-first (C, H, W) values scaled to [0, 1]
    pub fn to_chw_f32(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.data.len());
        for c in 0..self.channels {
            for row in 0..self.height {
                for col in 0..self.width {
                    out.push(self.pixel(row, col)[c] as f32 / 255.0);
                }
            }
        }
        out
    }
}

/// The surface games draw on, addressed in grid cells
#[derive(Debug, Clone)]
pub struct Canvas {
    grid_width: usize,
    grid_height: usize,
    cell_size: usize,
    /// Column-major: index = x * pixel_height + y
    pixels: Vec<Rgb>,
}

impl Canvas {
    pub fn new(grid_width: usize, grid_height: usize, cell_size: usize) -> Self {
        let cell_size = cell_size.max(1);
        Self {
            grid_width,
            grid_height,
            cell_size,
            pixels: vec![COLOR_BLACK; grid_width * grid_height * cell_size * cell_size],
        }
    }

    pub fn grid_width(&self) -> usize {
        self.grid_width
    }

    pub fn grid_height(&self) -> usize {
        self.grid_height
    }

    pub fn cell_size(&self) -> usize {
        self.cell_size
    }

    fn pixel_width(&self) -> usize {
        self.grid_width * self.cell_size
    }

    fn pixel_height(&self) -> usize {
        self.grid_height * self.cell_size
    }

    /// Paint the whole surface
    pub fn fill(&mut self, color: Rgb) {
        self.pixels.fill(color);
    }

    /// Paint one grid cell; cells outside the grid are ignored
    pub fn fill_cell(&mut self, col: i32, row: i32, color: Rgb) {
        if col < 0 || row < 0 || col as usize >= self.grid_width || row as usize >= self.grid_height
        {
            return;
        }
        let height = self.pixel_height();
        let (x0, y0) = (col as usize * self.cell_size, row as usize * self.cell_size);
        for x in x0..x0 + self.cell_size {
            let column = x * height;
            self.pixels[column + y0..column + y0 + self.cell_size].fill(color);
        }
    }

    /// Color of a grid cell (sampled at its top-left pixel)
    pub fn cell(&self, col: usize, row: usize) -> Rgb {
        let (x, y) = (col * self.cell_size, row * self.cell_size);
        self.pixels[x * self.pixel_height() + y]
    }

    /// Snapshot the surface as a row-major frame
    pub fn capture(&self) -> Frame {
        let (width, height) = (self.pixel_width(), self.pixel_height());
        let mut data = Vec::with_capacity(width * height * FRAME_CHANNELS);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&self.pixels[x * height + y]);
            }
        }
        Frame {
            height,
            width,
            channels: FRAME_CHANNELS,
            data,
        }
    }
}
