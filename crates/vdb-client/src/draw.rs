//! Drawing calls
//!
//! Thin adapters that shape caller data into [`Vdb::emit`] calls: single
//! records from scalars, arrays of records, and strided float buffers where
//! `stride` counts `f32` values between record starts.

use vdb_protocol::Primitive;

use crate::connection::Connector;
use crate::context::Vdb;
use crate::error::VdbResult;

fn flatten<const N: usize>(records: &[[f32; N]]) -> Vec<f32> {
    records.iter().flatten().copied().collect()
}

impl<C: Connector> Vdb<C> {
    pub fn point(&mut self, x: f32, y: f32, z: f32) -> VdbResult<()> {
        self.emit(Primitive::Point, 1, 0, &[x, y, z])
    }

    pub fn line(&mut self, x0: f32, y0: f32, z0: f32, x1: f32, y1: f32, z1: f32) -> VdbResult<()> {
        self.emit(Primitive::Line, 1, 0, &[x0, y0, z0, x1, y1, z1])
    }

    /// Normal at `(x, y, z)` pointing along `(dx, dy, dz)`
    pub fn normal(&mut self, x: f32, y: f32, z: f32, dx: f32, dy: f32, dz: f32) -> VdbResult<()> {
        self.emit(Primitive::Normal, 1, 0, &[x, y, z, dx, dy, dz])
    }

    pub fn triangle(&mut self, a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> VdbResult<()> {
        let mut payload = [0.0; 9];
        payload[0..3].copy_from_slice(&a);
        payload[3..6].copy_from_slice(&b);
        payload[6..9].copy_from_slice(&c);
        self.emit(Primitive::Triangle, 1, 0, &payload)
    }

    pub fn color(&mut self, r: f32, g: f32, b: f32) -> VdbResult<()> {
        self.emit(Primitive::Color, 1, 0, &[r, g, b])
    }

    /// Frame marker. Never suppressed by sampling.
    pub fn frame(&mut self) -> VdbResult<()> {
        self.emit(Primitive::Frame, 1, 0, &[])
    }

    pub fn points(&mut self, points: &[[f32; 3]]) -> VdbResult<()> {
        self.emit(Primitive::Point, points.len(), 3, &flatten(points))
    }

    pub fn lines(&mut self, lines: &[[f32; 6]]) -> VdbResult<()> {
        self.emit(Primitive::Line, lines.len(), 6, &flatten(lines))
    }

    pub fn normals(&mut self, normals: &[[f32; 6]]) -> VdbResult<()> {
        self.emit(Primitive::Normal, normals.len(), 6, &flatten(normals))
    }

    pub fn triangles(&mut self, triangles: &[[f32; 9]]) -> VdbResult<()> {
        self.emit(Primitive::Triangle, triangles.len(), 9, &flatten(triangles))
    }

    pub fn points_strided(&mut self, count: usize, data: &[f32], stride: usize) -> VdbResult<()> {
        self.emit(Primitive::Point, count, stride, data)
    }

    pub fn lines_strided(&mut self, count: usize, data: &[f32], stride: usize) -> VdbResult<()> {
        self.emit(Primitive::Line, count, stride, data)
    }

    pub fn normals_strided(&mut self, count: usize, data: &[f32], stride: usize) -> VdbResult<()> {
        self.emit(Primitive::Normal, count, stride, data)
    }

    pub fn triangles_strided(
        &mut self,
        count: usize,
        data: &[f32],
        stride: usize,
    ) -> VdbResult<()> {
        self.emit(Primitive::Triangle, count, stride, data)
    }
}
