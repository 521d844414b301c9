use crate::network::GeneratedNetwork;
use rail_spacetime::models::{Infrastructure, Operation, Timetable, Train};
use rand::Rng;
use std::collections::HashMap;

/// Running speed in km/s (60 km/h)
const SPEED: f64 = 60.0 / 3600.0;
/// Departures are generated for six hours
const SPAN: f64 = 6.0 * 3600.0;
/// Running time slack on top of the minimum duration
const SLACK: f64 = 1.04;
/// Headway between departures through the bottleneck
const MAIN_PERIOD: f64 = 10.0 * 60.0;

/// Dispatch a pair of trains (one each way) every [`MAIN_PERIOD`], picking
/// the service group and the service within it that lag furthest behind a
/// randomly drawn relative frequency.
///
/// # Errors
///
/// Returns an error if the network has no services or a service does not
/// pass the bottleneck.
pub fn generate_timetable(
    network: &GeneratedNetwork,
    rng: &mut impl Rng,
) -> Result<Timetable, String> {
    let groups = &network.service_groups;
    if groups.is_empty() || groups.iter().any(Vec::is_empty) {
        return Err("Network has no services to schedule".to_string());
    }

    let group_frequency: Vec<u32> = groups.iter().map(|_| rng.gen_range(3..=10)).collect();
    let service_frequency: Vec<Vec<u32>> = groups
        .iter()
        .map(|group| group.iter().map(|_| rng.gen_range(3..=10)).collect())
        .collect();
    log::debug!("Group frequencies {group_frequency:?}, services {service_frequency:?}");

    let mut group_count = vec![0; groups.len()];
    let mut service_count: Vec<Vec<u32>> =
        groups.iter().map(|group| vec![0; group.len()]).collect();
    let mut trains = Vec::new();
    let mut departure = 0.0;
    while departure < SPAN {
        let g = least_served(&group_count, &group_frequency).ok_or("No service group to pick")?;
        let s = least_served(&service_count[g], &service_frequency[g])
            .ok_or("No service to pick")?;

        for up in [true, false] {
            let route = &groups[g][s];
            let train =
                generate_train(&network.infrastructure, route, up, network.bottleneck, departure)?;
            trains.push(train);
        }

        group_count[g] += 1;
        service_count[g][s] += 1;
        departure += MAIN_PERIOD;
    }

    log::info!("Generated {} trains", trains.len());
    Ok(Timetable { trains })
}

/// Index with the lowest dispatched/frequency ratio; ties go to the higher
/// frequency, then to the lower index
fn least_served(counts: &[u32], frequencies: &[u32]) -> Option<usize> {
    let ratio = |i: usize| f64::from(counts[i]) / f64::from(frequencies[i]);
    (0..counts.len().min(frequencies.len()))
        .min_by(|&a, &b| ratio(a).total_cmp(&ratio(b)).then(frequencies[b].cmp(&frequencies[a])))
}

/// One train along `route`, running forward (`up`) or reversed, shifted
/// so that it enters `reference` at `reference_time`. Consecutive route
/// nodes not joined by a resource are skipped.
///
/// Each operation's minimum duration is the resource length at [`SPEED`];
/// the next operation starts after that duration plus [`SLACK`].
///
/// # Errors
///
/// Returns an error if the route does not pass `reference`.
pub fn generate_train(
    infrastructure: &Infrastructure,
    route: &[usize],
    up: bool,
    reference: usize,
    reference_time: f64,
) -> Result<Train, String> {
    // Resource joining each ordered node pair in the direction of travel
    let mut between: HashMap<(usize, usize), usize> = HashMap::new();
    for (idx, res) in infrastructure.resources.iter().enumerate() {
        between.entry((res.entry_node(up), res.exit_node(up))).or_insert(idx);
    }

    let mut nodes = route.to_vec();
    if !up {
        nodes.reverse();
    }

    let mut time = 0.0;
    let mut operations = Vec::new();
    for pair in nodes.windows(2) {
        let Some(&resource) = between.get(&(pair[0], pair[1])) else { continue };
        let length = infrastructure.resources[resource].length.unwrap_or_default();
        let min_duration = length / SPEED;
        operations.push(Operation { resource, forward: up, time, min_duration });
        time += min_duration * SLACK;
    }

    let shift = operations
        .iter()
        .find(|op| op.resource == reference)
        .map(|op| reference_time - op.time)
        .ok_or_else(|| format!("Route does not pass resource {reference}"))?;
    for op in &mut operations {
        op.time += shift;
    }

    Ok(Train { operations })
}
