//! Lunar data payload returned by the `/lunar-data` endpoint

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Phase of the Moon as seen by the observer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    pub name: String,
    pub emoji: String,
    /// Illuminated fraction in percent (0-100)
    pub illumination: f64,
    /// Days since new moon
    pub age: f64,
    /// Phase angle in degrees
    pub angle: f64,
}

/// Topocentric and equatorial position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub altitude: f64,
    pub azimuth: f64,
    /// Right ascension in hours
    pub right_ascension: f64,
    pub declination: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Distance {
    pub km: f64,
    pub light_seconds: f64,
}

/// Libration components in degrees
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Libration {
    pub longitude: f64,
    pub latitude: f64,
    pub total: f64,
    pub diurnal_longitude: f64,
    pub diurnal_latitude: f64,
}

impl Libration {
    /// Combined magnitude of the diurnal components
    pub fn diurnal_magnitude(&self) -> f64 {
        self.diurnal_longitude.hypot(self.diurnal_latitude)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Orientation {
    pub position_angle: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observer {
    pub latitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    /// Observation date as reported by the backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Resolved address of the requested location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NextPhase {
    pub name: String,
    /// Days until the next major phase
    pub days: f64,
}

/// Full snapshot of the Moon's state for one observer location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LunarSnapshot {
    pub phase: Phase,
    pub position: Position,
    pub distance: Distance,
    pub angular_diameter: f64,
    pub libration: Libration,
    pub orientation: Orientation,
    pub observer: Observer,
    pub julian_day: f64,
    pub next_phase: NextPhase,
    /// Time of the calculation, used when the observer carries no date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl LunarSnapshot {
    /// Check the decoded payload before it is rendered
    ///
    /// Serde already guarantees the shape; this rejects values no view can
    /// display sensibly (NaN/inf, illumination outside 0-100).
    pub fn validate(&self) -> Result<(), String> {
        let numbers = [
            ("phase.illumination", self.phase.illumination),
            ("phase.age", self.phase.age),
            ("phase.angle", self.phase.angle),
            ("position.altitude", self.position.altitude),
            ("position.azimuth", self.position.azimuth),
            ("position.right_ascension", self.position.right_ascension),
            ("position.declination", self.position.declination),
            ("distance.km", self.distance.km),
            ("distance.light_seconds", self.distance.light_seconds),
            ("angular_diameter", self.angular_diameter),
            ("libration.longitude", self.libration.longitude),
            ("libration.latitude", self.libration.latitude),
            ("libration.total", self.libration.total),
            ("libration.diurnal_longitude", self.libration.diurnal_longitude),
            ("libration.diurnal_latitude", self.libration.diurnal_latitude),
            ("orientation.position_angle", self.orientation.position_angle),
            ("observer.latitude", self.observer.latitude),
            ("julian_day", self.julian_day),
            ("next_phase.days", self.next_phase.days),
        ];

        if let Some((field, _)) = numbers.iter().find(|(_, v)| !v.is_finite()) {
            return Err(format!("{} is not a finite number", field));
        }

        if !(0.0..=100.0).contains(&self.phase.illumination) {
            return Err(format!(
                "phase.illumination out of range: {}",
                self.phase.illumination
            ));
        }

        Ok(())
    }
}

/// The last successfully fetched snapshot, owned by the App
#[derive(Debug, Clone)]
pub struct CurrentSnapshot {
    pub data: LunarSnapshot,
    /// Payload exactly as received, used for export and the raw view
    pub raw: serde_json::Value,
    /// Location string that was requested
    pub location: String,
    pub received_at: DateTime<Local>,
}
