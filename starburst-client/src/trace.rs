use anyhow::{Context, Result};
use serde::Serialize;
use starburst_core::{Palette, Position, Scene};
use std::str::FromStr;

use crate::headless::{DrawCall, RecordingSurface};

/// A click that lands once `tick` ticks have elapsed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Click {
    pub position: Position,
    pub tick: u32,
}

impl Click {
    pub fn new(x: f32, y: f32, tick: u32) -> Self {
        Self {
            position: Position::new(x, y),
            tick,
        }
    }
}

/// Parses `X,Y` or `X,Y@TICK`
impl FromStr for Click {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let (coords, tick) = match s.split_once('@') {
            Some((coords, tick)) => (
                coords,
                tick.trim()
                    .parse::<u32>()
                    .with_context(|| format!("Invalid tick in click {:?}", s))?,
            ),
            None => (s, 0),
        };

        let (x, y) = coords
            .split_once(',')
            .with_context(|| format!("Click must look like X,Y or X,Y@TICK, got {:?}", s))?;
        let x: f32 = x
            .trim()
            .parse()
            .with_context(|| format!("Invalid x in click {:?}", s))?;
        let y: f32 = y
            .trim()
            .parse()
            .with_context(|| format!("Invalid y in click {:?}", s))?;

        if !(x.is_finite() && y.is_finite()) {
            anyhow::bail!("Click coordinates must be finite, got {:?}", s);
        }

        Ok(Click::new(x, y, tick))
    }
}

/// State of the scene after one tick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickRecord {
    pub tick: u32,
    pub x: f32,
    pub y: f32,
    pub target_x: f32,
    pub target_y: f32,
    pub at_target: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame: Option<Vec<DrawCall>>,
}

/// Drives a scene tick by tick, delivering scheduled clicks between ticks
pub struct Simulation {
    scene: Scene,
    palette: Palette,
    clicks: Vec<Click>,
    next_click: usize,
    tick: u32,
    record_frames: bool,
}

impl Simulation {
    pub fn new(scene: Scene, mut clicks: Vec<Click>) -> Self {
        clicks.sort_by_key(|click| click.tick);
        Self {
            scene,
            palette: Palette::default(),
            clicks,
            next_click: 0,
            tick: 0,
            record_frames: false,
        }
    }

    pub fn with_frames(mut self, record_frames: bool) -> Self {
        self.record_frames = record_frames;
        self
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn ticks(&self) -> u32 {
        self.tick
    }

    /// All clicks delivered and the shape resting on the last one
    pub fn finished(&self) -> bool {
        self.next_click == self.clicks.len() && self.scene.at_target()
    }

    fn deliver_clicks(&mut self) {
        while let Some(click) = self.clicks.get(self.next_click) {
            if click.tick > self.tick {
                break;
            }
            log::debug!(
                "Click at ({}, {}) after {} ticks",
                click.position.x,
                click.position.y,
                self.tick
            );
            self.scene.set_target(click.position);
            self.next_click += 1;
        }
    }

    /// Deliver due clicks, then advance and optionally draw one tick.
    pub fn step(&mut self) -> TickRecord {
        self.deliver_clicks();

        self.tick += 1;
        let position = self.scene.tick();

        let frame = if self.record_frames {
            let mut surface = RecordingSurface::new();
            self.scene
                .render(&mut surface, &self.palette)
                .unwrap_or_else(|never| match never {});
            Some(surface.into_calls())
        } else {
            None
        };

        log::debug!(
            "Tick {}: ({:.2}, {:.2}), {:.2}px to go",
            self.tick,
            position.x,
            position.y,
            self.scene.remaining_distance()
        );

        TickRecord {
            tick: self.tick,
            x: position.x,
            y: position.y,
            target_x: self.scene.target.x,
            target_y: self.scene.target.y,
            at_target: self.scene.at_target(),
            frame,
        }
    }

    /// Step until finished or until `max_ticks` ticks have run in total.
    pub fn run(&mut self, max_ticks: u32) -> Vec<TickRecord> {
        let mut records = Vec::new();
        // Clicks due before the first tick may already be satisfied
        self.deliver_clicks();

        while !self.finished() && self.tick < max_ticks {
            records.push(self.step());
        }

        if self.finished() {
            log::info!("Reached target after {} ticks", self.tick);
        } else {
            log::warn!(
                "Stopped after {} ticks, {:.2}px from target",
                self.tick,
                self.scene.remaining_distance()
            );
        }

        records
    }
}
