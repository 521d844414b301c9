use serde::{Deserialize, Serialize};

/// A train's scheduled traversal of one resource
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Operation {
    pub resource: usize,
    pub forward: bool,
    /// Start time in seconds
    pub time: f64,
    /// Minimum running time in seconds
    pub min_duration: f64,
}

impl Operation {
    #[must_use]
    pub fn end_time(&self) -> f64 {
        self.time + self.min_duration
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Train {
    pub operations: Vec<Operation>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Timetable {
    pub trains: Vec<Train>,
}

impl Timetable {
    /// Parse a timetable document
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not match the timetable schema.
    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("Failed to parse timetable: {e}"))
    }

    #[must_use]
    pub fn operation_count(&self) -> usize {
        self.trains.iter().map(|t| t.operations.len()).sum()
    }

    /// Earliest operation start and latest operation end, in seconds
    #[must_use]
    pub fn time_span(&self) -> Option<(f64, f64)> {
        self.trains
            .iter()
            .flat_map(|t| t.operations.iter())
            .fold(None, |span, op| match span {
                None => Some((op.time, op.end_time())),
                Some((start, end)) => Some((start.min(op.time), end.max(op.end_time()))),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn op(time: f64, min_duration: f64) -> Operation {
        Operation { resource: 0, forward: true, time, min_duration }
    }

    #[test]
    fn test_parse_timetable() {
        let json = r#"{"trains": [{"operations": [
            {"resource": 0, "forward": true, "time": 0.0, "min_duration": 60.0},
            {"resource": 1, "forward": false, "time": 62.4, "min_duration": 12.0}
        ]}]}"#;
        let tt = Timetable::from_json(json).expect("valid timetable");
        assert_eq!(tt.trains.len(), 1);
        assert_eq!(tt.operation_count(), 2);
        assert!(!tt.trains[0].operations[1].forward);
    }

    #[test]
    fn test_parse_timetable_missing_field() {
        let json = r#"{"trains": [{"operations": [{"resource": 0, "forward": true, "time": 0.0}]}]}"#;
        let result = Timetable::from_json(json);
        assert!(result.expect_err("min_duration missing").contains("Failed to parse timetable"));
    }

    #[test]
    fn test_end_time() {
        assert_eq!(op(100.0, 20.0).end_time(), 120.0);
    }

    #[test]
    fn test_time_span() {
        let tt = Timetable {
            trains: vec![
                Train { operations: vec![op(600.0, 60.0), op(700.0, 30.0)] },
                Train { operations: vec![op(300.0, 10.0)] },
            ],
        };
        assert_eq!(tt.time_span(), Some((300.0, 730.0)));
    }

    #[test]
    fn test_time_span_empty() {
        let tt = Timetable { trains: vec![Train::default()] };
        assert_eq!(tt.time_span(), None);
    }
}
