//! Flat vertex/index buffers for line-strip drawing with primitive restart.
//!
//! Positions are `f32` (x, y, z) triples. Indices are split into strips by the
//! maximum value of the index type, which the GPU treats as a restart marker.

mod infrastructure;
mod timetable;

pub use infrastructure::{build_infrastructure, build_infrastructure_by_kind, BucketedGeometry};
pub use timetable::build_timetable;

use crate::error::GeometryError;
use glam::Vec3;
use std::fmt::Debug;

/// Index integer width usable with fixed-index primitive restart.
///
/// `RESTART` is the type's maximum value, so a buffer indexed by `Self` can
/// hold at most `RESTART` vertices (indices `0..RESTART`).
pub trait RestartIndex: Copy + Eq + Debug + 'static {
    const RESTART: Self;

    /// Number of vertices addressable without colliding with `RESTART`
    const CAPACITY: usize;

    /// Convert a vertex position, returning `None` if it would reach `RESTART`
    fn from_vertex(vertex: usize) -> Option<Self>;

    fn to_vertex(self) -> usize;
}

impl RestartIndex for u16 {
    const RESTART: Self = u16::MAX;
    const CAPACITY: usize = u16::MAX as usize;

    fn from_vertex(vertex: usize) -> Option<Self> {
        u16::try_from(vertex).ok().filter(|&i| i != Self::RESTART)
    }

    fn to_vertex(self) -> usize {
        usize::from(self)
    }
}

impl RestartIndex for u32 {
    const RESTART: Self = u32::MAX;
    const CAPACITY: usize = u32::MAX as usize;

    fn from_vertex(vertex: usize) -> Option<Self> {
        u32::try_from(vertex).ok().filter(|&i| i != Self::RESTART)
    }

    fn to_vertex(self) -> usize {
        self as usize
    }
}

/// Append a vertex and return its index.
///
/// # Errors
///
/// Returns [`GeometryError::IndexOverflow`] if the new vertex index would
/// collide with the restart sentinel. Nothing is appended in that case.
pub fn push_vertex<I: RestartIndex>(
    positions: &mut Vec<f32>,
    x: f32,
    y: f32,
    z: f32,
) -> Result<I, GeometryError> {
    let vertex = positions.len() / 3;
    let index = I::from_vertex(vertex).ok_or(GeometryError::IndexOverflow {
        vertices: vertex + 1,
        capacity: I::CAPACITY,
    })?;
    positions.extend_from_slice(&[x, y, z]);
    Ok(index)
}

/// Axis-aligned bounding box of a vertex buffer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Bounds {
    #[must_use]
    pub fn of_positions(positions: &[f32]) -> Option<Self> {
        let mut points = positions.chunks_exact(3).map(Vec3::from_slice);
        let first = points.next()?;
        Some(points.fold(Self { min: first, max: first }, |b, p| Self {
            min: b.min.min(p),
            max: b.max.max(p),
        }))
    }

    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    #[must_use]
    pub fn extent(&self) -> Vec3 {
        self.max - self.min
    }
}

/// One vertex buffer plus one restart-delimited index buffer
#[derive(Debug, Clone, PartialEq)]
pub struct LineGeometry<I: RestartIndex = u16> {
    pub positions: Vec<f32>,
    pub indices: Vec<I>,
}

impl<I: RestartIndex> Default for LineGeometry<I> {
    fn default() -> Self {
        Self {
            positions: Vec::new(),
            indices: Vec::new(),
        }
    }
}

impl<I: RestartIndex> LineGeometry<I> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    ///
    /// See [`push_vertex`].
    pub fn push_vertex(&mut self, x: f32, y: f32, z: f32) -> Result<I, GeometryError> {
        push_vertex(&mut self.positions, x, y, z)
    }

    /// Append a vertex and reference it from the current strip
    ///
    /// # Errors
    ///
    /// See [`push_vertex`].
    pub fn extend_strip(&mut self, x: f32, y: f32, z: f32) -> Result<I, GeometryError> {
        let index = self.push_vertex(x, y, z)?;
        self.indices.push(index);
        Ok(index)
    }

    pub fn end_strip(&mut self) {
        self.indices.push(I::RESTART);
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Number of restart markers, i.e. closed strips
    #[must_use]
    pub fn strip_count(&self) -> usize {
        count_strips(&self.indices)
    }

    /// Strips as index slices, without their restart markers
    pub fn strips(&self) -> impl Iterator<Item = &[I]> {
        split_strips(&self.indices)
    }

    #[must_use]
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::of_positions(&self.positions)
    }
}

pub(crate) fn count_strips<I: RestartIndex>(indices: &[I]) -> usize {
    indices.iter().filter(|&&i| i == I::RESTART).count()
}

pub(crate) fn split_strips<I: RestartIndex>(indices: &[I]) -> impl Iterator<Item = &[I]> {
    let closed = indices
        .iter()
        .rposition(|&i| i == I::RESTART)
        .map_or(0, |last| last + 1);
    indices[..closed]
        .split(|&i| i == I::RESTART)
        .take(count_strips(&indices[..closed]))
}
