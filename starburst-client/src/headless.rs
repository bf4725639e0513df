use serde::Serialize;
use starburst_core::{DrawSurface, Rgb, Rgba};
use std::convert::Infallible;

/// A single draw call issued while painting a frame
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCall {
    Clear {
        color: [f32; 4],
    },
    FillFan {
        vertices: Vec<f32>,
        color: [f32; 3],
        alpha: f32,
    },
}

/// Surface that records draw calls instead of rasterizing them
#[derive(Debug, Default)]
pub struct RecordingSurface {
    calls: Vec<DrawCall>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    pub fn into_calls(self) -> Vec<DrawCall> {
        self.calls
    }
}

impl DrawSurface for RecordingSurface {
    type Error = Infallible;

    fn clear(&mut self, color: Rgba) -> Result<(), Infallible> {
        self.calls.push(DrawCall::Clear {
            color: [color.r, color.g, color.b, color.a],
        });
        Ok(())
    }

    fn fill_fan(&mut self, vertices: &[f32], color: Rgb, alpha: f32) -> Result<(), Infallible> {
        self.calls.push(DrawCall::FillFan {
            vertices: vertices.to_vec(),
            color: [color.r, color.g, color.b],
            alpha,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use starburst_core::{draw_starburst, Palette, Position};

    #[test]
    fn test_records_clear_then_fan() {
        let mut surface = RecordingSurface::new();
        draw_starburst(&mut surface, Position::new(20.0, 30.0), &Palette::default())
            .unwrap_or_else(|never| match never {});

        let calls = surface.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(
            calls[0],
            DrawCall::Clear {
                color: [1.0, 1.0, 1.0, 1.0]
            }
        );
        match &calls[1] {
            DrawCall::FillFan {
                vertices,
                color,
                alpha,
            } => {
                assert_eq!(vertices.len(), 44);
                assert_eq!(&vertices[..2], &[20.0, 30.0]);
                assert_eq!(*color, [0.0, 0.5, 0.5]);
                assert_eq!(*alpha, 1.0);
            }
            other => panic!("expected a fan, got {:?}", other),
        }
    }

    #[test]
    fn test_draw_call_json_is_tagged() {
        let call = DrawCall::Clear {
            color: [1.0, 1.0, 1.0, 1.0],
        };
        let json = serde_json::to_value(&call).unwrap();
        assert_eq!(json["op"], "clear");
        assert_eq!(json["color"][3], 1.0);
    }
}
