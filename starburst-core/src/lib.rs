#![cfg_attr(not(feature = "std"), no_std)]

/// A 2D position in surface pixel coordinates (origin top-left, y down)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// Translate a pointer position given in client (screen) space into
    /// coordinates relative to `origin`, the top-left corner of the surface.
    pub fn surface_local(client_x: f32, client_y: f32, origin: Position) -> Self {
        Self::new(client_x, client_y) - origin
    }

    pub fn distance(&self, other: &Position) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        #[cfg(feature = "std")]
        {
            (dx * dx + dy * dy).sqrt()
        }
        #[cfg(not(feature = "std"))]
        {
            libm::sqrtf(dx * dx + dy * dy)
        }
    }
}

impl core::ops::Add for Position {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl core::ops::Sub for Position {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

fn abs(value: f32) -> f32 {
    #[cfg(feature = "std")]
    {
        value.abs()
    }
    #[cfg(not(feature = "std"))]
    {
        libm::fabsf(value)
    }
}

fn sin_cos(angle: f32) -> (f32, f32) {
    #[cfg(feature = "std")]
    {
        angle.sin_cos()
    }
    #[cfg(not(feature = "std"))]
    {
        (libm::sinf(angle), libm::cosf(angle))
    }
}

/// An opaque RGB color with components in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
}

/// An RGBA color with components in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::new(1.0, 1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

/// Colors used to paint a frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub background: Rgba,
    pub fill: Rgb,
    pub fill_alpha: f32,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Rgba::WHITE,
            fill: Rgb::new(0.0, 0.5, 0.5),
            fill_alpha: 1.0,
        }
    }
}

/// Configuration for the motion updater
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionConfig {
    /// Pixels per tick along the leading axis
    pub speed: f32,
    /// Scale the shorter axis so both axes arrive together
    pub prevent_slide: bool,
}

impl MotionConfig {
    pub fn new(speed: f32, prevent_slide: bool) -> Self {
        Self {
            speed,
            prevent_slide,
        }
    }
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            speed: 2.0,
            prevent_slide: false,
        }
    }
}

/// Per-tick motion of the shape toward its target
pub mod motion {
    use super::{abs, MotionConfig, Position};

    fn effective_speed(speed: f32) -> f32 {
        // NaN and negative speeds leave the shape where it is
        if speed > 0.0 {
            speed
        } else {
            0.0
        }
    }

    /// Step for the shorter axis so it is covered in the same number of
    /// ticks the longer axis needs at `speed`.
    fn scaled_step(shorter: f32, longer: f32, speed: f32) -> f32 {
        let ticks = longer / speed;
        if ticks > 0.0 {
            shorter / ticks
        } else {
            speed
        }
    }

    /// Per-axis step sizes for the remaining distances `dx` and `dy`.
    ///
    /// Without slide prevention both axes step by the full speed, so a
    /// diagonal approach runs up to √2 times faster than an axis-aligned one.
    /// With slide prevention the axis farther from the target keeps the full
    /// speed and the other one is scaled down, giving a straight-line
    /// approach. Equal distances fall back to full speed on both axes.
    pub fn step_sizes(dx: f32, dy: f32, config: &MotionConfig) -> (f32, f32) {
        let speed = effective_speed(config.speed);
        if !config.prevent_slide {
            return (speed, speed);
        }

        let (ax, ay) = (abs(dx), abs(dy));
        if ax > ay {
            (speed, scaled_step(ay, ax, speed))
        } else if ax < ay {
            (scaled_step(ax, ay, speed), speed)
        } else {
            (speed, speed)
        }
    }

    /// Move one axis a single step toward `target`, snapping onto it once
    /// the remaining distance fits within the step.
    pub fn approach(current: f32, target: f32, step: f32) -> f32 {
        let remaining = current - target;
        if abs(remaining) <= step {
            target
        } else if remaining > 0.0 {
            current - step
        } else {
            current + step
        }
    }

    /// Compute the shape position for the next tick.
    pub fn update(current: Position, target: Position, config: &MotionConfig) -> Position {
        let dx = current.x - target.x;
        let dy = current.y - target.y;
        let (step_x, step_y) = step_sizes(dx, dy, config);

        Position::new(
            approach(current.x, target.x, step_x),
            approach(current.y, target.y, step_y),
        )
    }
}

/// Triangle-fan geometry of the starburst
pub mod geometry {
    use super::{sin_cos, Position};
    use core::f32::consts::{FRAC_PI_2, PI};

    pub const OUTER_RADIUS: f32 = 50.0;
    pub const INNER_RADIUS: f32 = 21.0;
    /// Angular steps in one revolution; the perimeter has one extra vertex
    /// so the fan closes on its starting point.
    pub const SEGMENTS: usize = 20;
    pub const VERTEX_COUNT: usize = SEGMENTS + 2;
    pub const FLOAT_COUNT: usize = VERTEX_COUNT * 2;
    pub const START_ANGLE: f32 = -FRAC_PI_2;

    /// Radius of the `i`-th perimeter vertex: tips on even steps, notches on odd
    pub fn radius_at(i: usize) -> f32 {
        if i % 2 == 0 {
            OUTER_RADIUS
        } else {
            INNER_RADIUS
        }
    }

    pub fn angle_at(i: usize) -> f32 {
        START_ANGLE + i as f32 / SEGMENTS as f32 * 2.0 * PI
    }

    /// Fan vertices for a starburst centered on `center`: the center itself
    /// followed by the perimeter, starting straight up.
    pub fn build_geometry(center: Position) -> [Position; VERTEX_COUNT] {
        let mut vertices = [center; VERTEX_COUNT];

        for (i, vertex) in vertices.iter_mut().skip(1).enumerate() {
            let (sin, cos) = sin_cos(angle_at(i));
            let radius = radius_at(i);
            *vertex = Position::new(center.x + radius * cos, center.y + radius * sin);
        }

        vertices
    }

    /// Flattened `x, y` pairs ready for a vertex buffer.
    pub fn vertex_data(center: Position) -> [f32; FLOAT_COUNT] {
        let mut data = [0.0; FLOAT_COUNT];
        for (pair, vertex) in data.chunks_exact_mut(2).zip(build_geometry(center).iter()) {
            pair[0] = vertex.x;
            pair[1] = vertex.y;
        }
        data
    }
}

/// A surface able to paint one starburst frame
pub trait DrawSurface {
    type Error;

    /// Fill the whole surface with `color`.
    fn clear(&mut self, color: Rgba) -> Result<(), Self::Error>;

    /// Draw a filled triangle fan from flattened `x, y` pixel coordinates.
    fn fill_fan(&mut self, vertices: &[f32], color: Rgb, alpha: f32) -> Result<(), Self::Error>;
}

/// Clear the surface and draw the starburst at `center`.
pub fn draw_starburst<S>(surface: &mut S, center: Position, palette: &Palette) -> Result<(), S::Error>
where
    S: DrawSurface + ?Sized,
{
    surface.clear(palette.background)?;
    let vertices = geometry::vertex_data(center);
    surface.fill_fan(&vertices, palette.fill, palette.fill_alpha)
}

/// Complete animation state: where the shape is, where it is heading, and
/// how it moves. Clicks write `target`, ticks write `current`.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub current: Position,
    pub target: Position,
    pub config: MotionConfig,
    pub width: f32,
    pub height: f32,
}

impl Scene {
    /// Create a scene with the shape resting at the surface center.
    pub fn new(width: f32, height: f32, config: MotionConfig) -> Self {
        let center = Position::new(width / 2.0, height / 2.0);
        Self {
            current: center,
            target: center,
            config,
            width,
            height,
        }
    }

    pub fn center(&self) -> Position {
        Position::new(self.width / 2.0, self.height / 2.0)
    }

    /// Put the shape and its target back at the surface center.
    pub fn reset(&mut self) {
        self.current = self.center();
        self.target = self.current;
    }

    pub fn set_target(&mut self, target: Position) {
        self.target = target;
    }

    /// Advance the shape by one tick and return its new position.
    pub fn tick(&mut self) -> Position {
        self.current = motion::update(self.current, self.target, &self.config);
        self.current
    }

    pub fn at_target(&self) -> bool {
        self.current == self.target
    }

    pub fn remaining_distance(&self) -> f32 {
        self.current.distance(&self.target)
    }

    pub fn render<S>(&self, surface: &mut S, palette: &Palette) -> Result<(), S::Error>
    where
        S: DrawSurface + ?Sized,
    {
        draw_starburst(surface, self.current, palette)
    }
}
