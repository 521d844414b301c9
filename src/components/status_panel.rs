use crate::summary::DataSummary;
use leptos::{component, view, IntoView, ReadSignal, SignalGet};

#[derive(Debug, Clone, PartialEq)]
pub enum LoadStatus {
    LoadingInfrastructure,
    LoadingTimetable,
    Ready,
    Failed(String),
}

impl LoadStatus {
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            LoadStatus::LoadingInfrastructure => "Loading infrastructure…".to_string(),
            LoadStatus::LoadingTimetable => "Loading timetable…".to_string(),
            LoadStatus::Ready => "Ready".to_string(),
            LoadStatus::Failed(err) => format!("Error: {err}"),
        }
    }
}

fn summary_lines(summary: &DataSummary) -> Vec<String> {
    let mut lines = vec![format!(
        "{} nodes, {} resources, {} waypoints",
        summary.nodes, summary.resources, summary.waypoints
    )];
    if summary.network_length > 0.0 {
        lines.push(format!("{:.1} km of track", summary.network_length));
    }
    if summary.trains > 0 {
        lines.push(format!("{} trains, {} operations", summary.trains, summary.operations));
    }
    if let Some(span) = summary.format_time_span() {
        lines.push(span);
    }
    lines
}

#[component]
#[must_use]
pub fn StatusPanel(
    status: ReadSignal<LoadStatus>,
    summary: ReadSignal<Option<DataSummary>>,
) -> impl IntoView {
    view! {
        <div
            class="status-panel"
            style="position: absolute; top: 8px; left: 8px; padding: 6px 10px; background: rgba(255,255,255,0.8); font: 12px sans-serif; pointer-events: none;"
        >
            <div
                class="status-line"
                style:color=move || {
                    if matches!(status.get(), LoadStatus::Failed(_)) { "#b00" } else { "#222" }
                }
            >
                {move || status.get().label()}
            </div>
            {move || {
                summary
                    .get()
                    .map(|s| {
                        summary_lines(&s)
                            .into_iter()
                            .map(|line| view! { <div class="summary-line">{line}</div> })
                            .collect::<Vec<_>>()
                    })
            }}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_labels() {
        assert_eq!(LoadStatus::Ready.label(), "Ready");
        assert_eq!(LoadStatus::Failed("boom".to_string()).label(), "Error: boom");
    }

    #[test]
    fn test_summary_lines_skip_empty_sections() {
        let summary = DataSummary { nodes: 2, resources: 1, ..DataSummary::default() };
        assert_eq!(summary_lines(&summary), vec!["2 nodes, 1 resources, 0 waypoints".to_string()]);
    }

    #[test]
    fn test_summary_lines_full() {
        let summary = DataSummary {
            nodes: 4,
            resources: 3,
            waypoints: 2,
            network_length: 12.34,
            trains: 2,
            operations: 6,
            time_span: Some((0.0, 7200.0)),
        };
        let lines = summary_lines(&summary);
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1], "12.3 km of track");
        assert_eq!(lines[3], "00:00 – 02:00");
    }
}
