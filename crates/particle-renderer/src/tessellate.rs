//! Converts recorded draw commands into an indexed triangle mesh

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use crate::{Color, DrawCommand};

pub const MIN_DISC_SEGMENTS: u32 = 8;
pub const MAX_DISC_SEGMENTS: u32 = 48;

/// Vertex format uploaded to the GPU: surface-space position plus linear RGBA
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub pos: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub fn new(pos: Vec2, color: Color) -> Self {
        Self {
            pos: pos.to_array(),
            color: color.to_array(),
        }
    }

    pub const fn desc() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: &[wgpu::VertexAttribute] = &[
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x2,
            },
            wgpu::VertexAttribute {
                offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x4,
            },
        ];

        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: ATTRIBUTES,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Triangle fan around `center`
    pub fn push_disc(&mut self, center: Vec2, radius: f32, color: Color) {
        if !(radius > 0.0) {
            return;
        }
        let segments = disc_segments(radius);
        let base = self.vertices.len() as u32;

        self.vertices.push(Vertex::new(center, color));
        for i in 0..segments {
            let angle = i as f32 / segments as f32 * std::f32::consts::TAU;
            let rim = center + Vec2::from_angle(angle) * radius;
            self.vertices.push(Vertex::new(rim, color));
        }

        for i in 0..segments {
            let current = base + 1 + i;
            let next = base + 1 + (i + 1) % segments;
            self.indices.extend_from_slice(&[base, current, next]);
        }
    }

    /// Quad of thickness `width` centred on the segment
    pub fn push_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color) {
        let direction = (to - from).normalize_or_zero();
        if direction == Vec2::ZERO || !(width > 0.0) {
            return;
        }
        let offset = direction.perp() * (width * 0.5);
        let base = self.vertices.len() as u32;

        self.vertices.extend_from_slice(&[
            Vertex::new(from + offset, color),
            Vertex::new(from - offset, color),
            Vertex::new(to - offset, color),
            Vertex::new(to + offset, color),
        ]);
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
}

/// Rim segment count for a disc; small discs stay cheap
pub fn disc_segments(radius: f32) -> u32 {
    ((radius * 4.0).ceil() as u32).clamp(MIN_DISC_SEGMENTS, MAX_DISC_SEGMENTS)
}

/// Rebuild `mesh` from `commands`, returning the clear color if one was recorded
pub fn tessellate_into(commands: &[DrawCommand], mesh: &mut Mesh) -> Option<Color> {
    mesh.clear();
    let mut clear = None;

    for command in commands {
        match *command {
            DrawCommand::Clear(color) => {
                mesh.clear();
                clear = Some(color);
            }
            DrawCommand::Disc {
                center,
                radius,
                color,
            } => mesh.push_disc(center, radius, color),
            DrawCommand::Line {
                from,
                to,
                width,
                color,
            } => mesh.push_line(from, to, width, color),
        }
    }

    clear
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);

    #[test]
    fn test_disc_segments() {
        assert_eq!(disc_segments(0.5), MIN_DISC_SEGMENTS);
        assert_eq!(disc_segments(2.5), 10);
        assert_eq!(disc_segments(100.0), MAX_DISC_SEGMENTS);
    }

    #[test]
    fn test_disc_fan() {
        let mut mesh = Mesh::new();
        mesh.push_disc(Vec2::new(10.0, 10.0), 2.0, WHITE);
        let segments = disc_segments(2.0) as usize;
        assert_eq!(mesh.vertices.len(), segments + 1);
        assert_eq!(mesh.indices.len(), segments * 3);
        assert_eq!(mesh.vertices[0].pos, [10.0, 10.0]);
        for v in &mesh.vertices[1..] {
            let d = Vec2::from_array(v.pos).distance(Vec2::new(10.0, 10.0));
            assert!((d - 2.0).abs() < 1e-4);
        }
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertices.len()));
    }

    #[test]
    fn test_line_quad() {
        let mut mesh = Mesh::new();
        mesh.push_line(Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0), 2.0, WHITE);
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.indices, vec![0, 1, 2, 0, 2, 3]);

        let ys: Vec<f32> = mesh.vertices.iter().map(|v| v.pos[1].abs()).collect();
        assert_eq!(ys, vec![1.0; 4]);
    }

    #[test]
    fn test_degenerate_shapes_are_skipped() {
        let mut mesh = Mesh::new();
        mesh.push_line(Vec2::ONE, Vec2::ONE, 1.0, WHITE);
        mesh.push_disc(Vec2::ONE, 0.0, WHITE);
        assert!(mesh.is_empty());
        assert!(mesh.vertices.is_empty());
    }

    #[test]
    fn test_tessellate_commands() {
        let bg = Color::new(0.0, 0.0, 0.1, 1.0);
        let commands = [
            DrawCommand::Clear(bg),
            DrawCommand::Disc {
                center: Vec2::new(5.0, 5.0),
                radius: 1.0,
                color: WHITE,
            },
            DrawCommand::Line {
                from: Vec2::ZERO,
                to: Vec2::new(0.0, 4.0),
                width: 1.0,
                color: WHITE,
            },
        ];

        let mut mesh = Mesh::new();
        let clear = tessellate_into(&commands, &mut mesh);
        assert_eq!(clear, Some(bg));
        assert_eq!(mesh.vertices.len(), (MIN_DISC_SEGMENTS + 1) as usize + 4);
        assert_eq!(mesh.indices.len(), MIN_DISC_SEGMENTS as usize * 3 + 6);
        // Line indices are offset past the disc's vertices
        assert_eq!(mesh.indices[MIN_DISC_SEGMENTS as usize * 3], MIN_DISC_SEGMENTS + 1);
    }

    #[test]
    fn test_tessellate_reuses_mesh() {
        let mut mesh = Mesh::new();
        mesh.push_disc(Vec2::ONE, 3.0, WHITE);
        let clear = tessellate_into(&[], &mut mesh);
        assert_eq!(clear, None);
        assert!(mesh.is_empty());
    }
}
