// Reading domain model
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One snapshot of the four monitored channels.
///
/// A reading is either an operator-set target (`is_target = true`) or a
/// generated measurement stamped at generation time. All four channels are
/// always present together; there is no such thing as a partial reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub temperature: f64,
    pub humidity: f64,
    pub pressure: f64,
    pub speed: f64,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub is_target: bool,
}

impl Reading {
    /// Build an operator-set target reading stamped with the current time.
    pub fn target(temperature: f64, humidity: f64, pressure: f64, speed: f64) -> Self {
        Self {
            temperature,
            humidity,
            pressure,
            speed,
            timestamp: Utc::now(),
            is_target: true,
        }
    }

    /// The four channel values in a fixed order (temperature, humidity,
    /// pressure, speed).
    pub fn channels(&self) -> [f64; 4] {
        [self.temperature, self.humidity, self.pressure, self.speed]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_readings_are_flagged() {
        let target = Reading::target(25.0, 60.0, 1013.0, 100.0);
        assert!(target.is_target);
        assert_eq!(target.channels(), [25.0, 60.0, 1013.0, 100.0]);
    }

    #[test]
    fn is_target_defaults_to_false_on_the_wire() {
        // The collector history feed omits the flag for measured readings.
        let json = r#"{
            "temperature": 25.1,
            "humidity": 59.2,
            "pressure": 1010.4,
            "speed": 101.7,
            "timestamp": "2024-05-04T10:00:00Z"
        }"#;
        let reading: Reading = serde_json::from_str(json).unwrap();
        assert!(!reading.is_target);
    }

    #[test]
    fn timestamp_round_trips_as_rfc3339() {
        let target = Reading::target(25.0, 60.0, 1013.0, 100.0);
        let json = serde_json::to_string(&target).unwrap();
        let back: Reading = serde_json::from_str(&json).unwrap();
        assert_eq!(back, target);
    }
}
