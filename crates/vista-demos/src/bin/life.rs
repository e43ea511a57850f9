//! Conway-rules cellular automaton rendered as a grid of blocks.
//!
//! The simulation steps at a fixed rate decoupled from the render loop.
//! Space toggles pause; Escape quits. Drag to pan, scroll to zoom.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Result;
use rand::Rng;

use vista_engine::coords::Vec2;
use vista_engine::input::Key;
use vista_engine::logging::{LoggingConfig, init_logging};
use vista_engine::paint::Color;
use vista_engine::scene::Scene;
use vista_engine::scene::shapes::Block;
use vista_engine::window::{App, AppControl, Runtime, RuntimeConfig};

const GRID_WIDTH: usize = 160;
const GRID_HEIGHT: usize = 90;
const CELL_SIZE: f32 = 8.0;
const UPDATES_PER_SECOND: f32 = 10.0;

const DEAD_COLOR: Color = Color::WHITE;

struct Life {
    grid: Vec<u8>,
    cells: Vec<Rc<RefCell<Block>>>,
    alive_color: Color,
    playing: bool,
    accumulator: f32,
}

impl Life {
    fn new() -> Self {
        Self {
            grid: Vec::new(),
            cells: Vec::new(),
            alive_color: Color::from_srgb_u8(0x28, 0x23, 0x3a, 0xff),
            playing: true,
            accumulator: 0.0,
        }
    }

    fn cell_color(&self, state: u8) -> Color {
        if state == 1 { self.alive_color } else { DEAD_COLOR }
    }

    fn alive_neighbors(&self, x: usize, y: usize) -> u8 {
        let mut count = 0;
        for dx in -1_i64..=1 {
            for dy in -1_i64..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let nx = x as i64 + dx;
                let ny = y as i64 + dy;
                if nx < 0 || ny < 0 || nx >= GRID_WIDTH as i64 || ny >= GRID_HEIGHT as i64 {
                    continue;
                }
                count += self.grid[ny as usize * GRID_WIDTH + nx as usize];
            }
        }
        count
    }

    /// One generation: live cells survive with 2-3 neighbors, dead cells are
    /// born with exactly 3.
    fn step(&mut self) {
        let mut next = vec![0_u8; self.grid.len()];
        for y in 0..GRID_HEIGHT {
            for x in 0..GRID_WIDTH {
                let idx = y * GRID_WIDTH + x;
                let neighbors = self.alive_neighbors(x, y);
                next[idx] = match (self.grid[idx], neighbors) {
                    (1, 2) | (1, 3) => 1,
                    (0, 3) => 1,
                    _ => 0,
                };
            }
        }

        for (idx, (old, new)) in self.grid.iter().zip(&next).enumerate() {
            if old != new {
                self.cells[idx]
                    .borrow_mut()
                    .set_color(self.cell_color(*new));
            }
        }
        self.grid = next;
    }
}

impl App for Life {
    fn build(&mut self, scene: &mut Scene) -> Result<()> {
        let mut rng = rand::rng();

        self.grid = Vec::with_capacity(GRID_WIDTH * GRID_HEIGHT);
        self.cells = Vec::with_capacity(GRID_WIDTH * GRID_HEIGHT);

        for y in 0..GRID_HEIGHT {
            for x in 0..GRID_WIDTH {
                let state = u8::from(rng.random_bool(0.5));
                self.grid.push(state);

                let block = Block::new(
                    Vec2::new(x as f32 * CELL_SIZE, y as f32 * CELL_SIZE),
                    // Cells overlap by one unit so no background seams show
                    // between neighbors at fractional zoom.
                    Vec2::splat(CELL_SIZE + 1.0),
                    self.cell_color(state),
                );
                self.cells.push(scene.insert(block)?);
            }
        }
        Ok(())
    }

    fn update(&mut self, dt: f32) -> AppControl {
        self.accumulator += dt;
        let step_time = 1.0 / UPDATES_PER_SECOND;
        while self.accumulator >= step_time {
            self.accumulator -= step_time;
            if self.playing {
                self.step();
            }
        }
        AppControl::Continue
    }

    fn key_pressed(&mut self, key: Key) -> AppControl {
        match key {
            Key::Space => {
                self.playing = !self.playing;
                log::info!("simulation {}", if self.playing { "resumed" } else { "paused" });
                AppControl::Continue
            }
            Key::Escape => AppControl::Exit,
            _ => AppControl::Continue,
        }
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    Runtime::run(
        RuntimeConfig {
            title: "vista - life".to_string(),
            show_frame_rate: true,
            ..Default::default()
        },
        Life::new(),
    )
}
