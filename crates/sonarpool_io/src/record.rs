use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sonarpool_data::Coord;
use uuid::Uuid;

/// A finished navigator run, as exported by the CLI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryRecord {
    pub navigator_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub source: Option<Coord>,
    pub trajectory: Vec<Coord>,
    /// Whether the last cell is a local intensity maximum.
    pub arrived: bool,
}

impl TrajectoryRecord {
    #[must_use]
    pub fn new(navigator_id: Uuid, source: Option<Coord>, trajectory: Vec<Coord>, arrived: bool) -> Self {
        Self {
            navigator_id,
            created_at: Utc::now(),
            source,
            trajectory,
            arrived,
        }
    }

    /// Moves made, not counting the starting cell.
    #[must_use]
    pub fn moves(&self) -> usize {
        self.trajectory.len().saturating_sub(1)
    }

    #[must_use]
    pub fn last(&self) -> Option<Coord> {
        self.trajectory.last().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serialization::{read_json_file, write_json_file};

    #[test]
    fn test_record_file_roundtrip() {
        let record = TrajectoryRecord::new(
            Uuid::new_v4(),
            Some(Coord::new(1, 1, 1)),
            vec![Coord::new(0, 0, 0), Coord::new(1, 1, 1)],
            true,
        );
        assert_eq!(record.moves(), 1);

        let path = std::env::temp_dir().join(format!("sonarpool-record-{}.json", record.navigator_id));
        write_json_file(&record, &path).unwrap();
        let restored: TrajectoryRecord = read_json_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(restored, record);
        assert_eq!(restored.last(), Some(Coord::new(1, 1, 1)));
    }
}
