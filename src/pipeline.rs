//! Two-stage load: infrastructure first, then the timetable that references it.

use crate::api;
use crate::config::ViewerConfig;
use crate::error::GeometryError;
use crate::geometry::{
    build_infrastructure, build_infrastructure_by_kind, build_timetable, BucketedGeometry, Bounds,
    LineGeometry, RestartIndex,
};
#[allow(unused_imports)]
use crate::logging::log;
use crate::models::{Infrastructure, Timetable};
use crate::summary::DataSummary;

#[derive(Debug, Clone, PartialEq)]
pub enum InfrastructureGeometry<I: RestartIndex = u16> {
    Single(LineGeometry<I>),
    ByKind(BucketedGeometry<I>),
}

impl<I: RestartIndex> InfrastructureGeometry<I> {
    #[must_use]
    pub fn positions(&self) -> &[f32] {
        match self {
            InfrastructureGeometry::Single(g) => &g.positions,
            InfrastructureGeometry::ByKind(g) => &g.positions,
        }
    }

    #[must_use]
    pub fn strip_count(&self) -> usize {
        match self {
            InfrastructureGeometry::Single(g) => g.strip_count(),
            InfrastructureGeometry::ByKind(g) => g.strip_count(),
        }
    }
}

/// Result of the first stage
#[derive(Debug, Clone)]
pub struct InfrastructureStage<I: RestartIndex = u16> {
    pub infrastructure: Infrastructure,
    pub geometry: InfrastructureGeometry<I>,
    pub summary: DataSummary,
}

impl<I: RestartIndex> InfrastructureStage<I> {
    #[must_use]
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::of_positions(self.geometry.positions())
    }
}

/// Result of the second stage
#[derive(Debug, Clone)]
pub struct TimetableStage<I: RestartIndex = u16> {
    pub timetable: Timetable,
    pub geometry: LineGeometry<I>,
    pub summary: DataSummary,
}

/// Build infrastructure geometry from already decoded data
///
/// # Errors
///
/// Returns the first malformed-input error found by the builder.
pub fn prepare_infrastructure<I: RestartIndex>(
    infrastructure: Infrastructure,
    config: &ViewerConfig,
) -> Result<InfrastructureStage<I>, GeometryError> {
    let timer = StageTimer::start();
    let geometry = if config.bucket_by_type {
        InfrastructureGeometry::ByKind(build_infrastructure_by_kind(&infrastructure)?)
    } else {
        InfrastructureGeometry::Single(build_infrastructure(&infrastructure)?)
    };
    timer.finish("infrastructure");

    log!(
        "Infrastructure geometry: {} vertices, {} strips",
        geometry.positions().len() / 3,
        geometry.strip_count()
    );

    let summary = DataSummary::from_infrastructure(&infrastructure);
    Ok(InfrastructureStage { infrastructure, geometry, summary })
}

/// Build timetable geometry against a resolved infrastructure stage
///
/// # Errors
///
/// Returns the first malformed-input error found by the builder.
pub fn prepare_timetable<I: RestartIndex>(
    stage: &InfrastructureStage<I>,
    timetable: Timetable,
    config: &ViewerConfig,
) -> Result<TimetableStage<I>, GeometryError> {
    let timer = StageTimer::start();
    let geometry = build_timetable(&stage.infrastructure, &timetable, config.time_scale)?;
    timer.finish("timetable");

    log!(
        "Timetable geometry: {} vertices, {} strips",
        geometry.vertex_count(),
        geometry.strip_count()
    );

    let summary = stage.summary.clone().with_timetable(&timetable);
    Ok(TimetableStage { timetable, geometry, summary })
}

/// Fetch and build the infrastructure stage
///
/// # Errors
///
/// Returns an error if the fetch fails or the data is malformed.
pub async fn load_infrastructure<I: RestartIndex>(
    config: &ViewerConfig,
) -> Result<InfrastructureStage<I>, String> {
    let infrastructure = api::fetch_infrastructure(&config.infrastructure_url).await?;
    prepare_infrastructure(infrastructure, config)
        .map_err(|e| format!("Invalid infrastructure {}: {e}", config.infrastructure_url))
}

/// Fetch and build the timetable stage
///
/// # Errors
///
/// Returns an error if the fetch fails or the data is malformed.
pub async fn load_timetable<I: RestartIndex>(
    stage: &InfrastructureStage<I>,
    config: &ViewerConfig,
) -> Result<TimetableStage<I>, String> {
    let timetable = api::fetch_timetable(&config.timetable_url).await?;
    prepare_timetable(stage, timetable, config)
        .map_err(|e| format!("Invalid timetable {}: {e}", config.timetable_url))
}

/// Wall-clock timing of a build stage, only active with `perf_timing` on wasm
struct StageTimer {
    #[cfg(all(target_arch = "wasm32", feature = "perf_timing"))]
    start: Option<f64>,
}

impl StageTimer {
    fn start() -> Self {
        Self {
            #[cfg(all(target_arch = "wasm32", feature = "perf_timing"))]
            start: performance_now(),
        }
    }

    #[allow(clippy::unused_self)]
    fn finish(self, stage: &str) {
        #[cfg(all(target_arch = "wasm32", feature = "perf_timing"))]
        if let Some(elapsed) = self.start.zip(performance_now()).map(|(s, e)| e - s) {
            web_sys::console::log_1(&format!("Built {stage} geometry in {elapsed:.2}ms").into());
        }
        #[cfg(not(all(target_arch = "wasm32", feature = "perf_timing")))]
        let _ = stage;
    }
}

#[cfg(all(target_arch = "wasm32", feature = "perf_timing"))]
fn performance_now() -> Option<f64> {
    web_sys::window()?.performance().map(|p| p.now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Node, Operation, Point, Resource, ResourceKind, ResourceType, Train};

    fn infrastructure() -> Infrastructure {
        Infrastructure {
            nodes: vec![
                Node { location: Point::new(0.0, 0.0) },
                Node { location: Point::new(10.0, 0.0) },
            ],
            resources: vec![Resource::new(0, 1, ResourceKind::DoubleTrack)
                .with_segments(vec![Point::new(5.0, 2.0)])],
        }
    }

    fn timetable() -> Timetable {
        Timetable {
            trains: vec![Train {
                operations: vec![Operation {
                    resource: 0,
                    forward: true,
                    time: 0.0,
                    min_duration: 3600.0,
                }],
            }],
        }
    }

    #[test]
    fn test_two_stage_pipeline() {
        let config = ViewerConfig::default();
        let stage =
            prepare_infrastructure::<u16>(infrastructure(), &config).expect("valid infrastructure");
        assert!(matches!(stage.geometry, InfrastructureGeometry::ByKind(_)));
        assert_eq!(stage.summary.nodes, 2);

        let tt = prepare_timetable(&stage, timetable(), &config).expect("valid timetable");
        assert_eq!(tt.geometry.positions, vec![0.0, 0.0, 0.0, 10.0, 0.0, 1.0]);
        assert_eq!(tt.summary.trains, 1);
        assert_eq!(tt.summary.nodes, 2);
    }

    #[test]
    fn test_unbucketed_stage() {
        let config = ViewerConfig { bucket_by_type: false, ..ViewerConfig::default() };
        let stage =
            prepare_infrastructure::<u32>(infrastructure(), &config).expect("valid infrastructure");
        let InfrastructureGeometry::Single(geometry) = &stage.geometry else {
            panic!("expected single index buffer");
        };
        assert_eq!(geometry.indices, vec![0, 2, 1, u32::MAX]);
    }

    #[test]
    fn test_bounds_cover_waypoints() {
        let stage = prepare_infrastructure::<u16>(infrastructure(), &ViewerConfig::default())
            .expect("valid");
        let bounds = stage.bounds().expect("has vertices");
        assert_eq!(bounds.max.y, 2.0);
        assert_eq!(bounds.max.x, 10.0);
    }

    #[test]
    fn test_unknown_tag_fails_first_stage() {
        let mut infra = infrastructure();
        infra.resources[0].restype =
            Some(ResourceType { tag: "Bridge".to_string(), capacity: None });
        let result = prepare_infrastructure::<u16>(infra, &ViewerConfig::default());
        assert!(matches!(result, Err(GeometryError::UnknownResourceType { .. })));
    }

    #[test]
    fn test_time_scale_from_config() {
        let config = ViewerConfig { time_scale: 1.0 / 60.0, ..ViewerConfig::default() };
        let stage = prepare_infrastructure::<u16>(infrastructure(), &config).expect("valid");
        let tt = prepare_timetable(&stage, timetable(), &config).expect("valid");
        assert_eq!(tt.geometry.positions[5], 60.0);
    }
}
