use rail_spacetime::models::{Infrastructure, Node, Point, Resource, ResourceKind, ResourceType};
use rand::seq::{index, SliceRandom};
use rand::Rng;
use std::collections::{BTreeMap, HashSet, VecDeque};
use std::f64::consts::TAU;

const MAIN_STATION_CAPACITY: usize = 20;
const MAIN_STATION_LENGTH: f64 = 0.5;
const STATION_LENGTH: f64 = 0.2;
const MIN_TRACK_LENGTH: f64 = 1.0;
const TRACK_LENGTH_SPREAD: f64 = 8.0;
const WEST_LINES: usize = 3;
const EAST_LINES: usize = 4;

/// Platform counts drawn for stations on single-track branches
const BRANCH_STATION_TRACKS: [usize; 11] = [1, 2, 2, 2, 2, 2, 2, 2, 3, 4, 5];
const MAIN_STATION_TRACKS: [usize; 1] = [4];

/// Shape of one generated line: alternating open track and stations
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineParams {
    pub min_stations: usize,
    pub max_stations: usize,
    /// Mean track length between stations, in km
    pub avg_distance: f64,
    pub double_track: bool,
    /// Resources point away from the start node when set, towards it otherwise
    pub forward: bool,
    pub direction: Point,
}

impl LineParams {
    fn main_line() -> Self {
        Self {
            min_stations: 10,
            max_stations: 15,
            avg_distance: 4.0,
            double_track: true,
            forward: false,
            direction: Point::new(-1.0, 0.0),
        }
    }

    fn branch(forward: bool, direction: Point) -> Self {
        Self {
            min_stations: 10,
            max_stations: 30,
            avg_distance: 10.0,
            double_track: false,
            forward,
            direction,
        }
    }
}

/// Random network plus the train services that run on it
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedNetwork {
    pub infrastructure: Infrastructure,
    /// Node sequences of services, grouped by the branch they share
    pub service_groups: Vec<Vec<Vec<usize>>>,
    /// Resource every service passes, used to align departures
    pub bottleneck: usize,
}

/// Build a hub network: a double-track main line west of a central station,
/// single-track branches fanning out east of it and off the main line to
/// the west, and services pairing one west branch with one east branch.
///
/// # Errors
///
/// Returns an error if the generated lines do not connect as expected.
pub fn generate_network(rng: &mut impl Rng) -> Result<GeneratedNetwork, String> {
    let mut infrastructure = Infrastructure::default();
    let west = push_node(&mut infrastructure, Point::new(0.0, 0.0));
    let east = push_node(&mut infrastructure, Point::new(1.0, 0.0));
    push_resource(
        &mut infrastructure,
        (west, east),
        station_type(MAIN_STATION_CAPACITY),
        MAIN_STATION_LENGTH,
    );

    let mut main_line = add_line(&mut infrastructure, west, &LineParams::main_line(), rng)?;
    main_line.push(east);
    log::debug!("Main line {main_line:?}");

    let east_lines = (0..EAST_LINES)
        .map(|i| {
            let params = LineParams::branch(true, line_direction(0.0, i, EAST_LINES));
            add_line(&mut infrastructure, east, &params, rng)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let station_starts: HashSet<usize> = infrastructure
        .resources
        .iter()
        .filter(|r| r.restype.as_ref().is_some_and(|t| t.tag == ResourceKind::Station.tag()))
        .map(|r| r.node_a)
        .collect();
    let connection_points: Vec<usize> = main_line
        .iter()
        .skip(1)
        .take(main_line.len().saturating_sub(3))
        .copied()
        .filter(|node| station_starts.contains(node))
        .collect();
    if connection_points.len() < WEST_LINES - 1 {
        return Err(format!(
            "Main line has {} stations, need {} for west branches",
            connection_points.len(),
            WEST_LINES - 1
        ));
    }

    let mut picks = index::sample(rng, connection_points.len(), WEST_LINES - 1).into_vec();
    picks.sort_unstable();
    let origins: Vec<usize> = picks
        .into_iter()
        .rev()
        .map(|i| connection_points[i])
        .chain(std::iter::once(main_line[0]))
        .collect();

    let mut directions: VecDeque<Point> =
        (0..WEST_LINES).map(|i| line_direction(0.5, i, WEST_LINES)).collect();
    let west_lines = origins
        .into_iter()
        .enumerate()
        .map(|(i, origin)| {
            let next = if i % 2 == 0 { directions.pop_back() } else { directions.pop_front() };
            let direction = next.ok_or("Ran out of west branch directions")?;
            add_line(&mut infrastructure, origin, &LineParams::branch(false, direction), rng)
        })
        .collect::<Result<Vec<_>, String>>()?;

    let service_groups = pair_lines(rng, west_lines.len(), east_lines.len())
        .iter()
        .map(|group| {
            group
                .iter()
                .map(|&(w, e)| service_route(&west_lines[w], &main_line, &east_lines[e]))
                .collect::<Result<Vec<_>, String>>()
        })
        .collect::<Result<Vec<_>, String>>()?;

    let bottleneck = infrastructure
        .resources
        .iter()
        .position(|r| r.node_b == west)
        .ok_or("No main line track enters the central station")?;

    log::info!(
        "Generated {} nodes, {} resources, {} service groups",
        infrastructure.nodes.len(),
        infrastructure.resources.len(),
        service_groups.len()
    );
    Ok(GeneratedNetwork { infrastructure, service_groups, bottleneck })
}

/// Append a line of `track, station` pairs starting at `start`.
///
/// Returns the line's nodes ordered along the resource direction, so a
/// backward line ends at `start`.
///
/// # Errors
///
/// Returns an error if `start` is not a node of the network.
pub fn add_line(
    infrastructure: &mut Infrastructure,
    start: usize,
    params: &LineParams,
    rng: &mut impl Rng,
) -> Result<Vec<usize>, String> {
    let mut location = infrastructure
        .node_location(start)
        .ok_or_else(|| format!("Line start node {start} does not exist"))?;
    let station_tracks: &[usize] =
        if params.double_track { &MAIN_STATION_TRACKS } else { &BRANCH_STATION_TRACKS };
    let track_kind =
        if params.double_track { ResourceKind::DoubleTrack } else { ResourceKind::SingleTrack };

    let stations = rng.gen_range(params.min_stations..=params.max_stations);
    let mut line = vec![start];
    let mut from = start;
    let mut total_length = 0.0;
    for _ in 0..stations {
        let jitter = rng.gen_range(-TRACK_LENGTH_SPREAD..=TRACK_LENGTH_SPREAD);
        let track_length = (params.avg_distance + jitter).max(MIN_TRACK_LENGTH);
        total_length += track_length;

        let track_end = step(location, params.direction, 1.0);
        let track_end_node = push_node(infrastructure, track_end);
        push_resource(
            infrastructure,
            oriented(from, track_end_node, params.forward),
            ResourceType::new(track_kind),
            track_length,
        );

        let platforms = station_tracks.choose(rng).copied().unwrap_or(1);
        let station_end = step(track_end, params.direction, STATION_LENGTH);
        let station_end_node = push_node(infrastructure, station_end);
        push_resource(
            infrastructure,
            oriented(track_end_node, station_end_node, params.forward),
            station_type(platforms),
            STATION_LENGTH,
        );

        line.extend([track_end_node, station_end_node]);
        from = station_end_node;
        location = station_end;
    }
    log::debug!("Line from node {start}: {stations} stations, {total_length:.2} km");

    if !params.forward {
        line.reverse();
    }
    Ok(line)
}

/// Unit direction of branch `i` out of `n_lines`, spread over a seventh of
/// a turn either side of `base` (in turns)
#[must_use]
pub fn line_direction(base: f64, i: usize, n_lines: usize) -> Point {
    // Odd counts skip the middle slot so no branch runs straight along the main line
    let (i, n_lines) = if n_lines % 2 == 1 {
        (if i >= n_lines / 2 { i + 1 } else { i }, n_lines + 1)
    } else {
        (i, n_lines)
    };
    let range = 1.0 / 7.0;
    #[allow(clippy::cast_precision_loss)]
    let fraction = i as f64 / n_lines.saturating_sub(1).max(1) as f64;
    let angle = (base - range + 2.0 * range * fraction) * TAU;
    Point::new(angle.cos(), -angle.sin())
}

/// Pair every west branch with an east branch, cycling the shorter side,
/// and group the pairs by the side that repeats
fn pair_lines(rng: &mut impl Rng, n_west: usize, n_east: usize) -> Vec<Vec<(usize, usize)>> {
    if n_west == 0 || n_east == 0 {
        return Vec::new();
    }
    let west_order = index::sample(rng, n_west, n_west).into_vec();
    let east_order = index::sample(rng, n_east, n_east).into_vec();

    let mut groups: BTreeMap<usize, Vec<(usize, usize)>> = BTreeMap::new();
    for i in 0..n_west.max(n_east) {
        let (w, e) = (west_order[i % n_west], east_order[i % n_east]);
        let key = if n_east >= n_west { w } else { e };
        groups.entry(key).or_default().push((w, e));
    }
    groups.into_values().collect()
}

/// Nodes of a service: the west branch into the main line, the main line
/// from the junction onwards, then the east branch
fn service_route(west: &[usize], main: &[usize], east: &[usize]) -> Result<Vec<usize>, String> {
    let junction = *west.last().ok_or("Empty west branch")?;
    let joined = main
        .iter()
        .position(|&n| n == junction)
        .ok_or_else(|| format!("West branch does not join the main line at node {junction}"))?;
    Ok(west.iter().chain(&main[joined + 1..]).chain(east.iter().skip(1)).copied().collect())
}

fn push_node(infrastructure: &mut Infrastructure, location: Point) -> usize {
    infrastructure.nodes.push(Node { location });
    infrastructure.nodes.len() - 1
}

fn push_resource(
    infrastructure: &mut Infrastructure,
    (node_a, node_b): (usize, usize),
    restype: ResourceType,
    length: f64,
) {
    infrastructure.resources.push(Resource {
        node_a,
        node_b,
        line_segments: Vec::new(),
        restype: Some(restype),
        length: Some(length),
    });
}

fn station_type(capacity: usize) -> ResourceType {
    ResourceType { capacity: Some(capacity), ..ResourceType::new(ResourceKind::Station) }
}

fn oriented(from: usize, to: usize, forward: bool) -> (usize, usize) {
    if forward { (from, to) } else { (to, from) }
}

fn step(from: Point, direction: Point, distance: f64) -> Point {
    Point::new(from.x + distance * direction.x, from.y + distance * direction.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rail_spacetime::geometry::build_infrastructure_by_kind;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn fixed_line(forward: bool) -> LineParams {
        LineParams {
            min_stations: 3,
            max_stations: 3,
            avg_distance: 10.0,
            double_track: false,
            forward,
            direction: Point::new(1.0, 0.0),
        }
    }

    fn single_node() -> Infrastructure {
        Infrastructure {
            nodes: vec![Node { location: Point::new(0.0, 0.0) }],
            resources: Vec::new(),
        }
    }

    #[test]
    fn test_line_alternates_track_and_station() {
        let mut infra = single_node();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let line = add_line(&mut infra, 0, &fixed_line(true), &mut rng).expect("start exists");

        assert_eq!(line, vec![0, 1, 2, 3, 4, 5, 6]);
        assert_eq!(infra.resources.len(), 6);
        for (i, res) in infra.resources.iter().enumerate() {
            let tag = &res.restype.as_ref().expect("tagged").tag;
            if i % 2 == 0 {
                assert_eq!(tag, "SingleTrack");
                assert!(res.length.expect("length") >= MIN_TRACK_LENGTH);
            } else {
                assert_eq!(tag, "Station");
                assert_eq!(res.length, Some(STATION_LENGTH));
            }
            assert_eq!((res.node_a, res.node_b), (i, i + 1));
        }
        let end = infra.node_location(6).expect("last station end");
        assert!((end.x - (3.0 + 3.0 * STATION_LENGTH)).abs() < 1e-9);
        assert_eq!(end.y, 0.0);
    }

    #[test]
    fn test_backward_line_points_at_start() {
        let mut infra = single_node();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let line = add_line(&mut infra, 0, &fixed_line(false), &mut rng).expect("start exists");

        assert_eq!(line.first(), Some(&6));
        assert_eq!(line.last(), Some(&0));
        assert_eq!((infra.resources[0].node_a, infra.resources[0].node_b), (1, 0));
    }

    #[test]
    fn test_line_from_missing_node() {
        let mut infra = single_node();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        assert!(add_line(&mut infra, 3, &fixed_line(true), &mut rng).is_err());
    }

    #[test]
    fn test_line_directions_are_unit_and_distinct() {
        let directions: Vec<Point> =
            (0..EAST_LINES).map(|i| line_direction(0.0, i, EAST_LINES)).collect();
        for d in &directions {
            assert!((d.x.hypot(d.y) - 1.0).abs() < 1e-9);
        }
        assert_eq!(directions.len(), 4);
        assert!(directions.windows(2).all(|w| w[0] != w[1]));
        // West branches point back along the main line
        assert!(line_direction(0.5, 0, WEST_LINES).x < 0.0);
    }

    #[test]
    fn test_pairing_covers_every_branch() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let groups = pair_lines(&mut rng, 3, 4);
        let pairs: Vec<(usize, usize)> = groups.iter().flatten().copied().collect();
        assert_eq!(pairs.len(), 4);
        for e in 0..4 {
            assert!(pairs.iter().any(|&(_, pe)| pe == e));
        }
        for w in 0..3 {
            assert!(pairs.iter().any(|&(pw, _)| pw == w));
        }
        assert!(pair_lines(&mut rng, 0, 4).is_empty());
    }

    #[test]
    fn test_service_route_joins_at_junction() {
        let route =
            service_route(&[20, 21, 3], &[5, 4, 3, 2, 0, 1], &[1, 30, 31]).expect("joined");
        assert_eq!(route, vec![20, 21, 3, 2, 0, 1, 30, 31]);
        assert!(service_route(&[20, 9], &[5, 4, 3], &[3]).is_err());
    }

    #[test]
    fn test_generated_network_is_consistent() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let network = generate_network(&mut rng).expect("generated");
        let infra = &network.infrastructure;

        assert!(build_infrastructure_by_kind::<u32>(infra).is_ok());
        assert_eq!(infra.resources[network.bottleneck].node_b, 0);
        assert_eq!(network.service_groups.iter().map(Vec::len).sum::<usize>(), EAST_LINES);
        for route in network.service_groups.iter().flatten() {
            assert!(route.contains(&0) && route.contains(&1));
            assert!(route.iter().all(|&n| n < infra.nodes.len()));
        }
    }

    #[test]
    fn test_same_seed_same_network() {
        let first = generate_network(&mut ChaCha8Rng::seed_from_u64(5)).expect("generated");
        let second = generate_network(&mut ChaCha8Rng::seed_from_u64(5)).expect("generated");
        assert_eq!(first, second);
    }
}
