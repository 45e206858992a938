//! Presentation mapping - snapshot fields to display values
//!
//! Everything here is pure: the components call these functions on every
//! draw and rebuild their widgets from the result.

use super::snapshot::LunarSnapshot;

/// Compass labels, clockwise from north in 22.5° steps
const DIRECTIONS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

/// Suffix of the terminal window title
pub const APP_TITLE: &str = "Lunar Phase Calculator";

/// Brightness factor for the moon image, 0.7 at new moon up to 1.2 at full
pub fn brightness(illumination: f64) -> f64 {
    0.7 + (illumination / 100.0) * 0.5
}

/// Rotation applied to the moon image in degrees
///
/// Amplified so the libration is visible; not a physical mapping.
pub fn rotation_angle(libration_total: f64) -> f64 {
    libration_total * 2.0
}

/// Qualitative bucket for the libration magnitude
pub fn wobble_label(total: f64) -> &'static str {
    if total < 2.0 {
        "minimal wobble"
    } else if total < 4.0 {
        "moderate wobble"
    } else {
        "significant wobble"
    }
}

/// Map an azimuth in degrees to one of 16 compass labels
pub fn direction(azimuth: f64) -> &'static str {
    // floor(x + 0.5) rounds halves up, rem_euclid keeps negative angles in range
    let index = (azimuth / 22.5 + 0.5).floor() as i64;
    DIRECTIONS[index.rem_euclid(16) as usize]
}

/// Caption describing the moon image
pub fn moon_caption(snapshot: &LunarSnapshot) -> String {
    format!(
        "{} - {:.1}% illuminated",
        snapshot.phase.name, snapshot.phase.illumination
    )
}

/// Window title for the current snapshot
pub fn window_title(snapshot: &LunarSnapshot) -> String {
    format!(
        "{} {} - {}",
        snapshot.phase.emoji, snapshot.phase.name, APP_TITLE
    )
}

/// `12.3456° N` style coordinate
fn hemisphere(value: f64, positive: char, negative: char) -> String {
    let side = if value < 0.0 { negative } else { positive };
    format!("{:.4}° {}", value.abs(), side)
}

/// Where and when the snapshot was computed
///
/// Resolved address, coordinates and date, each only when the backend sent
/// it. `None` when there is nothing beyond the latitude.
pub fn observer_readout(snapshot: &LunarSnapshot) -> Option<String> {
    let observer = &snapshot.observer;
    let mut parts = Vec::new();

    if let Some(location) = observer.location.as_deref().filter(|l| !l.trim().is_empty()) {
        parts.push(location.trim().to_string());
    }
    if let Some(longitude) = observer.longitude {
        parts.push(format!(
            "{}, {}",
            hemisphere(observer.latitude, 'N', 'S'),
            hemisphere(longitude, 'E', 'W')
        ));
    }
    if let Some(date) = observer.date.as_deref().or(snapshot.timestamp.as_deref()) {
        parts.push(date.to_string());
    }

    (!parts.is_empty()).then(|| parts.join(" | "))
}

/// Libration narrative shown under the moon image
#[derive(Debug, Clone, PartialEq)]
pub struct LibrationSummary {
    pub heading: &'static str,
    pub label: &'static str,
    pub sentence: String,
    pub components: String,
}

pub fn libration_summary(snapshot: &LunarSnapshot) -> LibrationSummary {
    let libration = &snapshot.libration;
    let label = wobble_label(libration.total);

    LibrationSummary {
        heading: "🌀 Libration Effects",
        label,
        sentence: format!(
            "The Moon is currently experiencing a {} of {:.3}° from its mean position.",
            label, libration.total
        ),
        components: format!(
            "Longitude: {:.3}° | Latitude: {:.3}°",
            libration.longitude, libration.latitude
        ),
    }
}

/// One labeled value inside a data section
#[derive(Debug, Clone, PartialEq)]
pub struct DataItem {
    pub label: &'static str,
    pub value: String,
}

impl DataItem {
    fn new(label: &'static str, value: String) -> Self {
        Self { label, value }
    }
}

/// A titled group of data items
#[derive(Debug, Clone, PartialEq)]
pub struct DataSection {
    pub title: &'static str,
    pub items: Vec<DataItem>,
}

/// Build the six data sections, in display order
pub fn data_sections(snapshot: &LunarSnapshot) -> Vec<DataSection> {
    let phase = &snapshot.phase;
    let position = &snapshot.position;
    let libration = &snapshot.libration;

    let visibility = if position.altitude > 0.0 {
        "Above Horizon ✅"
    } else {
        "Below Horizon ❌"
    };

    vec![
        DataSection {
            title: "🌙 Current Moon Phase",
            items: vec![
                DataItem::new("Phase", format!("{} {}", phase.emoji, phase.name)),
                DataItem::new("Illumination", format!("{:.1}%", phase.illumination)),
                DataItem::new("Lunar Age", format!("{:.1} days", phase.age)),
            ],
        },
        DataSection {
            title: "👁️ Visibility Status",
            items: vec![
                DataItem::new("Status", visibility.to_string()),
                DataItem::new("Altitude", format!("{:.2}°", position.altitude)),
                DataItem::new(
                    "Next Phase",
                    format!(
                        "{} in {:.1} days",
                        snapshot.next_phase.name, snapshot.next_phase.days
                    ),
                ),
            ],
        },
        DataSection {
            title: "📏 Distance & Size",
            items: vec![
                DataItem::new(
                    "Distance",
                    format!("{} km", format_grouped(snapshot.distance.km)),
                ),
                DataItem::new(
                    "Light Travel Time",
                    format!("{:.2} seconds", snapshot.distance.light_seconds),
                ),
                DataItem::new(
                    "Angular Size",
                    format!("{:.4}°", snapshot.angular_diameter),
                ),
            ],
        },
        DataSection {
            title: "🧭 Position Details",
            items: vec![
                DataItem::new(
                    "Azimuth",
                    format!("{:.2}° ({})", position.azimuth, direction(position.azimuth)),
                ),
                DataItem::new(
                    "Right Ascension",
                    format!("{:.2}h", position.right_ascension),
                ),
                DataItem::new("Declination", format!("{:.2}°", position.declination)),
            ],
        },
        DataSection {
            title: "🌀 Libration (Wobble)",
            items: vec![
                DataItem::new("Longitude Libration", format!("{:.3}°", libration.longitude)),
                DataItem::new("Latitude Libration", format!("{:.3}°", libration.latitude)),
                DataItem::new("Total Wobble", format!("{:.3}°", libration.total)),
                DataItem::new(
                    "Diurnal Effect",
                    format!("{:.4}°", libration.diurnal_magnitude()),
                ),
            ],
        },
        DataSection {
            title: "🔄 Orientation Effects",
            items: vec![
                DataItem::new(
                    "Position Angle",
                    format!("{:.2}°", snapshot.orientation.position_angle),
                ),
                DataItem::new("Phase Angle", format!("{:.2}°", phase.angle)),
                DataItem::new(
                    "Observer Latitude",
                    format!("{:.4}°", snapshot.observer.latitude),
                ),
                DataItem::new("Julian Day", format!("{:.2}", snapshot.julian_day)),
            ],
        },
    ]
}

/// Format a number with thousands separators and up to three decimals
///
/// `384400.5` becomes `384,400.5`, `384400` becomes `384,400`.
pub fn format_grouped(value: f64) -> String {
    let fixed = format!("{:.3}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let negative = value < 0.0 && (int_part != "0" || !frac_part.is_empty());
    let sign = if negative { "-" } else { "" };

    if frac_part.is_empty() {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{}.{}", sign, grouped, frac_part)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// ASCII Moon
// ═══════════════════════════════════════════════════════════════════════════════

/// A single cell of the ASCII moon disc
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoonCell {
    /// Outside the disc
    Space,
    /// Inside the disc, in shadow
    Shadow,
    /// Inside the disc, illuminated
    Lit,
}

/// Sample the moon disc on a `width` x `height` grid
///
/// The terminator sits at `sqrt(1 - y²)·(1 - 2k)` for illuminated fraction
/// `k`; the lit side is east while waxing and west while waning. Sample
/// points are rotated by `rotation_deg` before the test.
pub fn moon_cells(
    illumination: f64,
    phase_angle: f64,
    rotation_deg: f64,
    width: usize,
    height: usize,
) -> Vec<Vec<MoonCell>> {
    let fraction = (illumination / 100.0).clamp(0.0, 1.0);
    let waxing = phase_angle.rem_euclid(360.0) < 180.0;
    let (sin, cos) = rotation_deg.to_radians().sin_cos();

    (0..height)
        .map(|row| {
            (0..width)
                .map(|col| {
                    // Cell centers, normalized to -1..1
                    let x = (col as f64 + 0.5) / width as f64 * 2.0 - 1.0;
                    let y = (row as f64 + 0.5) / height as f64 * 2.0 - 1.0;

                    if x * x + y * y > 1.0 {
                        return MoonCell::Space;
                    }

                    let rx = x * cos + y * sin;
                    let ry = -x * sin + y * cos;
                    let half_chord = (1.0 - ry * ry).max(0.0).sqrt();
                    let terminator = half_chord * (1.0 - 2.0 * fraction);

                    let lit = if waxing {
                        rx >= terminator
                    } else {
                        rx <= -terminator
                    };

                    if lit && fraction > 0.0 {
                        MoonCell::Lit
                    } else {
                        MoonCell::Shadow
                    }
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::snapshot::fixtures::sample;

    #[test]
    fn test_brightness_range_and_monotonic() {
        assert!((brightness(0.0) - 0.7).abs() < 1e-12);
        assert!((brightness(100.0) - 1.2).abs() < 1e-12);
        assert!((brightness(50.0) - 0.95).abs() < 1e-12);

        let mut previous = brightness(0.0);
        for step in 1..=100 {
            let current = brightness(step as f64);
            assert!(current > previous);
            assert!((0.7..=1.2 + 1e-12).contains(&current));
            previous = current;
        }
    }

    #[test]
    fn test_wobble_label_boundaries() {
        assert_eq!(wobble_label(0.0), "minimal wobble");
        assert_eq!(wobble_label(1.999), "minimal wobble");
        assert_eq!(wobble_label(2.0), "moderate wobble");
        assert_eq!(wobble_label(3.999), "moderate wobble");
        assert_eq!(wobble_label(4.0), "significant wobble");
        assert_eq!(wobble_label(9.5), "significant wobble");
    }

    #[test]
    fn test_direction_cardinals() {
        assert_eq!(direction(0.0), "N");
        assert_eq!(direction(90.0), "E");
        assert_eq!(direction(180.0), "S");
        assert_eq!(direction(270.0), "W");
        assert_eq!(direction(11.0), "N");
        assert_eq!(direction(11.25), "NNE");
        assert_eq!(direction(350.0), "N");
        assert_eq!(direction(337.5), "NNW");
    }

    #[test]
    fn test_direction_is_periodic() {
        for step in -64..64 {
            let azimuth = step as f64 * 7.0;
            assert_eq!(direction(azimuth), direction(azimuth + 360.0), "at {}", azimuth);
        }
        assert_eq!(direction(-90.0), "W");
    }

    #[test]
    fn test_rotation_angle_doubles_total() {
        assert_eq!(rotation_angle(3.5), 7.0);
        assert_eq!(rotation_angle(-1.0), -2.0);
    }

    #[test]
    fn test_caption_and_title() {
        let snapshot = sample();
        assert_eq!(moon_caption(&snapshot), "Waxing Gibbous - 78.4% illuminated");
        assert_eq!(
            window_title(&snapshot),
            "🌔 Waxing Gibbous - Lunar Phase Calculator"
        );
    }

    #[test]
    fn test_observer_readout() {
        let snapshot = sample();
        assert_eq!(
            observer_readout(&snapshot).as_deref(),
            Some("Los Angeles, CA, USA | 34.0522° N, 118.2437° W | 2026-10-19")
        );
    }

    #[test]
    fn test_observer_readout_southern_and_partial() {
        let mut snapshot = sample();
        snapshot.observer.latitude = -33.8688;
        snapshot.observer.longitude = Some(151.2093);
        snapshot.observer.location = None;
        snapshot.observer.date = None;
        assert_eq!(
            observer_readout(&snapshot).as_deref(),
            Some("33.8688° S, 151.2093° E | 2026-10-19T20:00:00")
        );

        snapshot.observer.longitude = None;
        snapshot.timestamp = None;
        assert_eq!(observer_readout(&snapshot), None);
    }

    #[test]
    fn test_libration_summary() {
        let summary = libration_summary(&sample());
        assert_eq!(summary.label, "moderate wobble");
        assert_eq!(
            summary.sentence,
            "The Moon is currently experiencing a moderate wobble of 3.384° from its mean position."
        );
        assert_eq!(summary.components, "Longitude: 3.200° | Latitude: -1.100°");
    }

    #[test]
    fn test_data_sections_layout() {
        let sections = data_sections(&sample());
        let titles: Vec<&str> = sections.iter().map(|s| s.title).collect();
        assert_eq!(
            titles,
            vec![
                "🌙 Current Moon Phase",
                "👁️ Visibility Status",
                "📏 Distance & Size",
                "🧭 Position Details",
                "🌀 Libration (Wobble)",
                "🔄 Orientation Effects",
            ]
        );
        let counts: Vec<usize> = sections.iter().map(|s| s.items.len()).collect();
        assert_eq!(counts, vec![3, 3, 3, 3, 4, 4]);
    }

    #[test]
    fn test_data_sections_values() {
        let sections = data_sections(&sample());
        let value = |title: &str, label: &str| -> String {
            sections
                .iter()
                .find(|s| s.title == title)
                .and_then(|s| s.items.iter().find(|i| i.label == label))
                .map(|i| i.value.clone())
                .unwrap()
        };

        assert_eq!(value("🌙 Current Moon Phase", "Phase"), "🌔 Waxing Gibbous");
        assert_eq!(value("🌙 Current Moon Phase", "Lunar Age"), "10.2 days");
        assert_eq!(value("👁️ Visibility Status", "Status"), "Above Horizon ✅");
        assert_eq!(value("👁️ Visibility Status", "Next Phase"), "Full Moon in 4.6 days");
        assert_eq!(value("📏 Distance & Size", "Distance"), "384,400.123 km");
        assert_eq!(value("📏 Distance & Size", "Angular Size"), "0.5182°");
        assert_eq!(value("🧭 Position Details", "Azimuth"), "182.00° (S)");
        assert_eq!(value("🧭 Position Details", "Right Ascension"), "5.52h");
        assert_eq!(value("🌀 Libration (Wobble)", "Total Wobble"), "3.384°");
        assert_eq!(value("🌀 Libration (Wobble)", "Diurnal Effect"), "0.0361°");
        assert_eq!(value("🔄 Orientation Effects", "Observer Latitude"), "34.0522°");
        assert_eq!(value("🔄 Orientation Effects", "Julian Day"), "2461333.33");
    }

    #[test]
    fn test_below_horizon_status() {
        let mut snapshot = sample();
        snapshot.position.altitude = 0.0;
        let sections = data_sections(&snapshot);
        assert_eq!(sections[1].items[0].value, "Below Horizon ❌");
    }

    #[test]
    fn test_format_grouped() {
        assert_eq!(format_grouped(384400.0), "384,400");
        assert_eq!(format_grouped(384400.5), "384,400.5");
        assert_eq!(format_grouped(1234567.891), "1,234,567.891");
        assert_eq!(format_grouped(999.0), "999");
        assert_eq!(format_grouped(0.0), "0");
        assert_eq!(format_grouped(-1500.25), "-1,500.25");
    }

    #[test]
    fn test_moon_cells_full_and_new() {
        let full = moon_cells(100.0, 180.0, 0.0, 20, 10);
        let new = moon_cells(0.0, 0.0, 0.0, 20, 10);

        let count = |grid: &Vec<Vec<MoonCell>>, cell: MoonCell| {
            grid.iter().flatten().filter(|c| **c == cell).count()
        };

        assert!(count(&full, MoonCell::Lit) > 0);
        assert_eq!(count(&full, MoonCell::Shadow), 0);
        assert_eq!(count(&new, MoonCell::Lit), 0);
        assert_eq!(count(&full, MoonCell::Space), count(&new, MoonCell::Space));
    }

    #[test]
    fn test_moon_cells_waxing_lights_east_side() {
        let grid = moon_cells(50.0, 90.0, 0.0, 20, 10);
        let middle = &grid[5];
        assert_eq!(middle[18], MoonCell::Lit);
        assert_eq!(middle[1], MoonCell::Shadow);

        let waning = moon_cells(50.0, 270.0, 0.0, 20, 10);
        assert_eq!(waning[5][1], MoonCell::Lit);
        assert_eq!(waning[5][18], MoonCell::Shadow);
    }
}
