//! Headline flight metrics, finalized from the recorded trajectory.

use serde::{Deserialize, Serialize};

use crate::types::TrajectoryRecord;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FlightMetrics {
    pub apogee_m: f64,
    pub apogee_time_s: f64,
    pub peak_speed_m_s: f64,
    pub peak_mach: f64,
    pub flight_time_s: f64,
    pub wet_mass_kg: f64,
    pub dry_mass_kg: f64,
}

impl FlightMetrics {
    /// Scan the recorded steps for the extrema. Mass columns come from the
    /// vehicle, not the trajectory: wet is the pre-flight total, dry is the
    /// total with every tank empty.
    pub fn from_records(records: &[TrajectoryRecord], wet_mass_kg: f64, dry_mass_kg: f64) -> Self {
        let mut metrics = Self {
            wet_mass_kg,
            dry_mass_kg,
            ..Self::default()
        };
        for record in records {
            if record.y_m > metrics.apogee_m {
                metrics.apogee_m = record.y_m;
                metrics.apogee_time_s = record.time_s;
            }
            metrics.peak_speed_m_s = metrics.peak_speed_m_s.max(record.speed_m_s());
            metrics.peak_mach = metrics.peak_mach.max(record.mach);
            metrics.flight_time_s = metrics.flight_time_s.max(record.time_s);
        }
        metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(time_s: f64, y_m: f64, vy_m_s: f64, mach: f64) -> TrajectoryRecord {
        TrajectoryRecord {
            time_s,
            x_m: 0.0,
            y_m,
            vx_m_s: 0.0,
            vy_m_s,
            ax_m_s2: 0.0,
            ay_m_s2: 0.0,
            mass_kg: 30.0,
            thrust_n: 0.0,
            drag_n: 0.0,
            mach,
            phase: "FreeFlight".to_string(),
            components: vec![],
        }
    }

    #[test]
    fn extrema_are_taken_over_the_whole_flight() {
        let records = vec![
            record(0.0, 0.0, 0.0, 0.0),
            record(5.0, 800.0, 250.0, 0.8),
            record(20.0, 3_000.0, 40.0, 0.12),
            record(45.0, 100.0, -90.0, 0.3),
        ];
        let metrics = FlightMetrics::from_records(&records, 34.0, 28.0);
        assert_eq!(metrics.apogee_m, 3_000.0);
        assert_eq!(metrics.apogee_time_s, 20.0);
        assert_eq!(metrics.peak_speed_m_s, 250.0);
        assert_eq!(metrics.peak_mach, 0.8);
        assert_eq!(metrics.flight_time_s, 45.0);
        assert_eq!(metrics.wet_mass_kg, 34.0);
        assert_eq!(metrics.dry_mass_kg, 28.0);
    }

    #[test]
    fn empty_trajectory_keeps_zero_extrema() {
        let metrics = FlightMetrics::from_records(&[], 34.0, 28.0);
        assert_eq!(metrics.apogee_m, 0.0);
        assert_eq!(metrics.flight_time_s, 0.0);
    }
}
