use super::{count_strips, push_vertex, split_strips, Bounds, LineGeometry, RestartIndex};
use crate::error::GeometryError;
use crate::models::{Infrastructure, Point, Resource, ResourceKind};

/// Shared vertex buffer with one index buffer per resource kind
#[derive(Debug, Clone, PartialEq)]
pub struct BucketedGeometry<I: RestartIndex = u16> {
    pub positions: Vec<f32>,
    /// One entry per kind, in `ResourceKind::ALL` order
    pub buckets: Vec<(ResourceKind, Vec<I>)>,
}

impl<I: RestartIndex> BucketedGeometry<I> {
    #[must_use]
    pub fn indices(&self, kind: ResourceKind) -> &[I] {
        self.buckets
            .iter()
            .find(|(k, _)| *k == kind)
            .map_or(&[][..], |(_, indices)| indices.as_slice())
    }

    pub fn strips(&self, kind: ResourceKind) -> impl Iterator<Item = &[I]> {
        split_strips(self.indices(kind))
    }

    #[must_use]
    pub fn strip_count(&self) -> usize {
        self.buckets.iter().map(|(_, indices)| count_strips(indices)).sum()
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    #[must_use]
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::of_positions(&self.positions)
    }
}

/// Build all resources into a single index buffer.
///
/// Node vertices come first (z = 0), in node order. Each resource then adds
/// one strip: start node, its waypoints as fresh vertices, end node, restart.
///
/// # Errors
///
/// Returns an error if a resource references a missing node or the vertex
/// count exceeds the capacity of `I`.
pub fn build_infrastructure<I: RestartIndex>(
    infrastructure: &Infrastructure,
) -> Result<LineGeometry<I>, GeometryError> {
    let vertices = infrastructure.nodes.len() + infrastructure.waypoint_count();
    let mut positions = Vec::with_capacity(3 * vertices);
    let mut index_sets = [Vec::new()];
    emit_resource_strips(infrastructure, &mut positions, &mut index_sets, |_, _| Ok(0))?;
    let [indices] = index_sets;
    Ok(LineGeometry { positions, indices })
}

/// Build resources into per-kind index buffers over one shared vertex buffer.
///
/// Vertex emission order is identical to [`build_infrastructure`].
///
/// # Errors
///
/// As [`build_infrastructure`], plus an error for a resource whose type tag
/// is missing or not a known kind.
pub fn build_infrastructure_by_kind<I: RestartIndex>(
    infrastructure: &Infrastructure,
) -> Result<BucketedGeometry<I>, GeometryError> {
    let vertices = infrastructure.nodes.len() + infrastructure.waypoint_count();
    let mut positions = Vec::with_capacity(3 * vertices);
    let mut index_sets: [Vec<I>; 3] = Default::default();
    emit_resource_strips(infrastructure, &mut positions, &mut index_sets, |idx, res| {
        let kind = resource_kind(idx, res)?;
        Ok(ResourceKind::ALL.iter().position(|k| *k == kind).unwrap_or_default())
    })?;

    let buckets = ResourceKind::ALL.into_iter().zip(index_sets).collect();
    Ok(BucketedGeometry { positions, buckets })
}

fn resource_kind(idx: usize, res: &Resource) -> Result<ResourceKind, GeometryError> {
    let restype = res
        .restype
        .as_ref()
        .ok_or(GeometryError::MissingResourceType { resource: idx })?;
    restype.kind().map_err(|_| GeometryError::UnknownResourceType {
        resource: idx,
        tag: restype.tag.clone(),
    })
}

fn emit_resource_strips<I: RestartIndex>(
    infrastructure: &Infrastructure,
    positions: &mut Vec<f32>,
    index_sets: &mut [Vec<I>],
    select: impl Fn(usize, &Resource) -> Result<usize, GeometryError>,
) -> Result<(), GeometryError> {
    let mut node_indices = Vec::with_capacity(infrastructure.nodes.len());
    for node in &infrastructure.nodes {
        let Point { x, y } = node.location;
        node_indices.push(push_vertex::<I>(positions, to_f32(x), to_f32(y), 0.0)?);
    }

    for (res_idx, res) in infrastructure.resources.iter().enumerate() {
        let endpoint = |node: usize| {
            node_indices
                .get(node)
                .copied()
                .ok_or(GeometryError::MissingNode { resource: res_idx, node })
        };
        let start = endpoint(res.node_a)?;
        let end = endpoint(res.node_b)?;
        let indices = &mut index_sets[select(res_idx, res)?];

        indices.push(start);
        for pt in &res.line_segments {
            indices.push(push_vertex(positions, to_f32(pt.x), to_f32(pt.y), 0.0)?);
        }
        indices.push(end);
        indices.push(I::RESTART);
    }

    Ok(())
}

#[allow(clippy::cast_possible_truncation)]
pub(super) fn to_f32(value: f64) -> f32 {
    value as f32
}
