use std::collections::VecDeque;

use super::action::Direction;

/// A cell on the game grid; may lie outside it after a move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn moved_by(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn moved_in_direction(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }
}

/// Grid dimensions in cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    pub width: usize,
    pub height: usize,
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Check if a position is within the grid bounds
    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.width as i32 && pos.y >= 0 && pos.y < self.height as i32
    }

    pub fn center(&self) -> Position {
        Position::new((self.width / 2) as i32, (self.height / 2) as i32)
    }

    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }
}

/// The snake, head first
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Head at the front, tail at the back
    pub body: VecDeque<Position>,
    pub direction: Direction,
}

impl Snake {
    /// Lay out `length` segments trailing behind `head`, opposite to `direction`
    pub fn new(head: Position, direction: Direction, length: usize) -> Self {
        let (dx, dy) = direction.delta();
        let body = (0..length.max(1) as i32)
            .map(|i| head.moved_by(-dx * i, -dy * i))
            .collect();
        Self { body, direction }
    }

    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Every segment except the head
    pub fn body_segments(&self) -> impl Iterator<Item = &Position> {
        self.body.iter().skip(1)
    }

    pub fn collides_with_body(&self, pos: Position) -> bool {
        self.body_segments().any(|&segment| segment == pos)
    }

    /// Advance one cell; the tail stays put when growing
    pub fn move_snake(&mut self, should_grow: bool) {
        let new_head = self.head().moved_in_direction(self.direction);
        self.body.push_front(new_head);
        if !should_grow {
            self.body.pop_back();
        }
    }

    /// Turn unless the new direction would reverse the snake onto itself
    ///
    /// Returns the direction the snake ends up heading.
    pub fn turn(&mut self, direction: Direction) -> Direction {
        if !self.direction.is_opposite(direction) {
            self.direction = direction;
        }
        self.direction
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_moves_off_grid() {
        let pos = Position::new(0, 0);
        assert_eq!(pos.moved_in_direction(Direction::Up), Position::new(0, -1));
        assert_eq!(pos.moved_in_direction(Direction::Right), Position::new(1, 0));
        assert_eq!(pos.moved_by(-2, 3), Position::new(-2, 3));
    }

    #[test]
    fn test_body_trails_behind_head() {
        let snake = Snake::new(Position::new(5, 5), Direction::Up, 3);
        let body: Vec<Position> = snake.body.iter().copied().collect();
        assert_eq!(
            body,
            vec![Position::new(5, 5), Position::new(5, 6), Position::new(5, 7)]
        );
        assert_eq!(Snake::new(Position::new(0, 0), Direction::Up, 0).len(), 1);
    }

    #[test]
    fn test_snake_movement() {
        let mut snake = Snake::new(Position::new(5, 5), Direction::Right, 3);

        snake.move_snake(false);
        assert_eq!(snake.len(), 3);
        assert_eq!(snake.head(), Position::new(6, 5));
        assert_eq!(snake.body.back(), Some(&Position::new(4, 5)));

        snake.move_snake(true);
        assert_eq!(snake.len(), 4);
        assert_eq!(snake.head(), Position::new(7, 5));
        assert_eq!(snake.body.back(), Some(&Position::new(4, 5)));
    }

    #[test]
    fn test_turn_ignores_reversal() {
        let mut snake = Snake::new(Position::new(5, 5), Direction::Right, 3);
        assert_eq!(snake.turn(Direction::Left), Direction::Right);
        assert_eq!(snake.turn(Direction::Up), Direction::Up);
    }

    #[test]
    fn test_collision_detection() {
        let snake = Snake::new(Position::new(5, 5), Direction::Right, 3);
        assert!(!snake.collides_with_body(snake.head()));
        assert!(snake.collides_with_body(Position::new(4, 5)));
        assert!(!snake.collides_with_body(Position::new(10, 10)));
    }

    #[test]
    fn test_bounds_checking() {
        let grid = Grid::new(20, 20);

        assert!(grid.contains(Position::new(0, 0)));
        assert!(grid.contains(Position::new(19, 19)));
        assert!(!grid.contains(Position::new(-1, 0)));
        assert!(!grid.contains(Position::new(20, 0)));
        assert!(!grid.contains(Position::new(0, 20)));
        assert_eq!(grid.center(), Position::new(10, 10));
    }
}
