use super::infrastructure::to_f32;
use super::{LineGeometry, RestartIndex};
use crate::error::GeometryError;
use crate::models::{Infrastructure, Point, Timetable};

/// Build one space-time strip per train.
///
/// Each operation contributes the location of the node it enters through at
/// `z = time * time_scale`. The last operation adds a closing vertex at the
/// node it leaves through, at its end time. Trains without operations emit
/// nothing.
///
/// # Errors
///
/// Returns an error if an operation references a missing resource, that
/// resource references a missing node, or the vertex count exceeds the
/// capacity of `I`.
pub fn build_timetable<I: RestartIndex>(
    infrastructure: &Infrastructure,
    timetable: &Timetable,
    time_scale: f64,
) -> Result<LineGeometry<I>, GeometryError> {
    let mut geometry = LineGeometry::new();
    geometry.positions.reserve(3 * (timetable.operation_count() + timetable.trains.len()));

    for (train_idx, train) in timetable.trains.iter().enumerate() {
        let Some(last) = train.operations.len().checked_sub(1) else { continue };

        for (op_idx, op) in train.operations.iter().enumerate() {
            let res = infrastructure
                .resources
                .get(op.resource)
                .ok_or(GeometryError::MissingResource {
                    train: train_idx,
                    operation: op_idx,
                    resource: op.resource,
                })?;
            let location = |node: usize| {
                infrastructure
                    .node_location(node)
                    .ok_or(GeometryError::MissingNode { resource: op.resource, node })
            };

            let Point { x, y } = location(res.entry_node(op.forward))?;
            geometry.extend_strip(to_f32(x), to_f32(y), to_f32(op.time * time_scale))?;

            if op_idx == last {
                let Point { x, y } = location(res.exit_node(op.forward))?;
                geometry.extend_strip(to_f32(x), to_f32(y), to_f32(op.end_time() * time_scale))?;
            }
        }
        geometry.end_strip();
    }

    Ok(geometry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::TIME_SCALE;
    use crate::models::{Node, Operation, Resource, ResourceKind, Train};

    fn line_network() -> Infrastructure {
        Infrastructure {
            nodes: vec![
                Node { location: Point::new(0.0, 0.0) },
                Node { location: Point::new(4.0, 0.0) },
                Node { location: Point::new(4.0, 3.0) },
            ],
            resources: vec![
                Resource::new(0, 1, ResourceKind::SingleTrack),
                Resource::new(1, 2, ResourceKind::Station),
            ],
        }
    }

    fn op(resource: usize, forward: bool, time: f64, min_duration: f64) -> Operation {
        Operation { resource, forward, time, min_duration }
    }

    fn up_and_down() -> Timetable {
        Timetable {
            trains: vec![
                Train { operations: vec![op(0, true, 0.0, 3600.0), op(1, true, 3600.0, 1800.0)] },
                Train {
                    operations: vec![op(1, false, 7200.0, 1800.0), op(0, false, 9000.0, 3600.0)],
                },
            ],
        }
    }

    #[test]
    fn test_forward_train_strip() {
        let tt = Timetable { trains: vec![up_and_down().trains[0].clone()] };
        let geometry =
            build_timetable::<u16>(&line_network(), &tt, TIME_SCALE).expect("well-formed");
        assert_eq!(
            geometry.positions,
            vec![0.0, 0.0, 0.0, 4.0, 0.0, 1.0, 4.0, 3.0, 1.5]
        );
        assert_eq!(geometry.indices, vec![0, 1, 2, u16::MAX]);
    }

    #[test]
    fn test_backward_train_uses_far_endpoint() {
        let tt = Timetable { trains: vec![up_and_down().trains[1].clone()] };
        let geometry =
            build_timetable::<u16>(&line_network(), &tt, TIME_SCALE).expect("well-formed");
        assert_eq!(
            geometry.positions,
            vec![4.0, 3.0, 2.0, 4.0, 0.0, 2.5, 0.0, 0.0, 3.5]
        );
    }

    #[test]
    fn test_k_operations_give_k_plus_one_vertices() {
        let tt = up_and_down();
        let geometry =
            build_timetable::<u32>(&line_network(), &tt, TIME_SCALE).expect("well-formed");
        let strips: Vec<&[u32]> = geometry.strips().collect();
        assert_eq!(strips.len(), tt.trains.len());
        for (strip, train) in strips.iter().zip(&tt.trains) {
            assert_eq!(strip.len(), train.operations.len() + 1);
        }
        assert_eq!(geometry.strip_count(), 2);
    }

    #[test]
    fn test_time_scale_is_linear() {
        let tt = Timetable { trains: vec![Train { operations: vec![op(0, true, 100.0, 50.0)] }] };
        let geometry = build_timetable::<u16>(&line_network(), &tt, 0.5).expect("well-formed");
        let z: Vec<f32> = geometry.positions.chunks(3).map(|p| p[2]).collect();
        assert_eq!(z, vec![50.0, 75.0]);
    }

    #[test]
    fn test_empty_train_emits_nothing() {
        let tt = Timetable { trains: vec![Train::default(), up_and_down().trains[0].clone()] };
        let geometry =
            build_timetable::<u16>(&line_network(), &tt, TIME_SCALE).expect("well-formed");
        assert_eq!(geometry.indices, vec![0, 1, 2, u16::MAX]);
    }

    #[test]
    fn test_missing_resource() {
        let tt = Timetable {
            trains: vec![
                up_and_down().trains[0].clone(),
                Train { operations: vec![op(0, true, 0.0, 1.0), op(7, true, 1.0, 1.0)] },
            ],
        };
        let result = build_timetable::<u16>(&line_network(), &tt, TIME_SCALE);
        assert_eq!(
            result,
            Err(GeometryError::MissingResource { train: 1, operation: 1, resource: 7 })
        );
    }

    #[test]
    fn test_missing_node_behind_resource() {
        let mut infra = line_network();
        infra.resources.push(Resource::new(2, 42, ResourceKind::SingleTrack));
        let tt = Timetable { trains: vec![Train { operations: vec![op(2, true, 0.0, 10.0)] }] };
        let result = build_timetable::<u16>(&infra, &tt, TIME_SCALE);
        assert_eq!(result, Err(GeometryError::MissingNode { resource: 2, node: 42 }));
    }

    #[test]
    fn test_deterministic() {
        let infra = line_network();
        let tt = up_and_down();
        let first = build_timetable::<u16>(&infra, &tt, TIME_SCALE).expect("well-formed");
        let second = build_timetable::<u16>(&infra, &tt, TIME_SCALE).expect("well-formed");
        assert_eq!(first, second);
    }
}
