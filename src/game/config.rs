use serde::{Deserialize, Serialize};

/// Static configuration of a game engine, fixed for its lifetime
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Window / display title
    pub title: String,
    /// Width of the game grid in cells
    pub grid_width: usize,
    /// Height of the game grid in cells
    pub grid_height: usize,
    /// Pixels per cell side in captured frames
    pub cell_size: usize,
    /// Tick rate limit; `None` runs unpaced
    pub fps: Option<u32>,
    /// Seed for game-internal randomness; `None` seeds from entropy
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            title: "Game".to_string(),
            grid_width: 10,
            grid_height: 10,
            cell_size: 10,
            fps: None,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(title: impl Into<String>, width: usize, height: usize) -> Self {
        Self {
            title: title.into(),
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    pub fn with_cell_size(mut self, cell_size: usize) -> Self {
        self.cell_size = cell_size.max(1);
        self
    }

    pub fn with_fps(mut self, fps: Option<u32>) -> Self {
        self.fps = fps.filter(|&f| f > 0);
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Frame height in pixels
    pub fn frame_height(&self) -> usize {
        self.grid_height * self.cell_size
    }

    /// Frame width in pixels
    pub fn frame_width(&self) -> usize {
        self.grid_width * self.cell_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.grid_width, 10);
        assert_eq!(config.grid_height, 10);
        assert_eq!(config.fps, None);
    }

    #[test]
    fn test_frame_dimensions() {
        let config = GameConfig::new("Snake", 20, 15).with_cell_size(4);
        assert_eq!(config.frame_width(), 80);
        assert_eq!(config.frame_height(), 60);
    }

    #[test]
    fn test_zero_fps_means_unpaced() {
        let config = GameConfig::default().with_fps(Some(0));
        assert_eq!(config.fps, None);
    }
}
