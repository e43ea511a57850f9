//! Three colored blocks in a pannable, zoomable world, plus an outline and
//! a circle marking the far block.
//!
//! Drag to pan, scroll to zoom at the cursor.

use anyhow::Result;

use vista_engine::coords::Vec2;
use vista_engine::logging::{LoggingConfig, init_logging};
use vista_engine::paint::Color;
use vista_engine::scene::Scene;
use vista_engine::scene::shapes::{Block, Circle, Square};
use vista_engine::window::{App, Runtime, RuntimeConfig};

struct Boxes;

impl App for Boxes {
    fn build(&mut self, scene: &mut Scene) -> Result<()> {
        scene.insert(Block::new(
            Vec2::new(0.0, 0.0),
            Vec2::splat(100.0),
            Color::from_srgb_u8(0xd0, 0x3c, 0x3c, 0xff),
        ))?;
        scene.insert(Block::new(
            Vec2::new(100.0, 100.0),
            Vec2::splat(100.0),
            Color::from_srgb_u8(0x3c, 0xa0, 0x46, 0xff),
        ))?;
        scene.insert(Block::new(
            Vec2::new(800.0, 200.0),
            Vec2::splat(100.0),
            Color::from_srgb_u8(0x3c, 0x5a, 0xd0, 0xff),
        ))?;

        // The far block starts off-screen; outline it and drop a dot next to
        // it so there is something to find when panning over.
        scene.insert(Square::new(
            Vec2::new(780.0, 180.0),
            Vec2::splat(140.0),
            2.0,
            Color::from_srgb_u8(0x28, 0x23, 0x3a, 0xff),
        ))?;
        scene.insert(Circle::new(
            Vec2::new(750.0, 250.0),
            20.0,
            Color::from_srgb_u8(0xe0, 0xa0, 0x28, 0xff),
        ))?;
        Ok(())
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    Runtime::run(
        RuntimeConfig {
            title: "vista - boxes".to_string(),
            show_frame_rate: true,
            ..Default::default()
        },
        Boxes,
    )
}
