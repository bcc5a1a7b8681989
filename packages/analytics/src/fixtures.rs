//! Record builders shared by the unit tests.

use fire_stats_fire_models::{Coordinates, FireRecord, Location, SizeClassScheme};

pub fn fire(id: &str, year: i32, cause: &str, acres: f64) -> FireRecord {
    FireRecord {
        id: id.to_string(),
        fire_year: year,
        fire_name: None,
        location: Location {
            area: "SOA".to_string(),
            district: None,
            unit: None,
            county: None,
            coordinates: None,
        },
        cause: cause.to_string(),
        general_cause: None,
        specific_cause: None,
        size_acres: acres,
        acres_imputed: false,
        size_class: SizeClassScheme::default()
            .classify(acres)
            .unwrap_or_else(|| panic!("{acres} is not classifiable")),
        ignited_at: None,
        reported_at: None,
        discovered_at: None,
        controlled_at: None,
    }
}

pub fn named(mut record: FireRecord, name: &str) -> FireRecord {
    record.fire_name = Some(name.to_string());
    record
}

pub fn in_area(mut record: FireRecord, area: &str) -> FireRecord {
    record.location.area = area.to_string();
    record
}

pub fn at(mut record: FireRecord, latitude: f64, longitude: f64) -> FireRecord {
    record.location.coordinates = Coordinates::new(latitude, longitude);
    record
}

pub fn general(mut record: FireRecord, general_cause: &str) -> FireRecord {
    record.general_cause = Some(general_cause.to_string());
    record
}

/// A small mixed collection spanning three years, three areas and every
/// cause category.
pub fn sample() -> Vec<FireRecord> {
    vec![
        at(named(in_area(fire("1", 2002, "Lightning", 499_945.0), "SOA"), "Biscuit"), 42.35, -123.85),
        general(in_area(fire("2", 2022, "Human", 0.1), "NOA"), "Debris Burning"),
        at(in_area(fire("3", 2022, "Lightning", 15.0), "EOA"), 44.1, -120.9),
        at(named(in_area(fire("4", 2022, "Human", 1200.0), "EOA"), "Cedar Creek"), 43.7, -122.1),
        general(fire("5", 2015, "Human", 0.2), "Equipment Use"),
        fire("6", 2015, "Under Investigation", 300.0),
    ]
}
