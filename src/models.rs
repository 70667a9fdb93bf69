//! Near-Earth object and close approach records.
//!
//! Both record types are built from a [`FieldMap`], the raw name-to-string
//! view of one input row. Constructors validate and convert each recognized
//! field explicitly; unrecognized fields are ignored.

use std::fmt;
use std::sync::Arc;

use chrono::NaiveDateTime;

use crate::constants::*;
use crate::error::{EtlError, Result};
use crate::time::{cd_to_datetime, datetime_to_str};

/// Ordered field-name to raw-value pairs for a single input row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldMap {
    row: usize,
    entries: Vec<(String, String)>,
}

impl FieldMap {
    /// `row` is the 1-based data row the values came from, used in error messages.
    pub fn new(row: usize) -> Self {
        Self {
            row,
            entries: Vec::new(),
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// First value whose name is one of `names`, in `names` order.
    pub fn first_of(&self, names: &[&str]) -> Option<&str> {
        names.iter().find_map(|name| self.get(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// First non-blank value among `names`; a blank alias column does not
    /// hide a populated one later in the list.
    fn present(&self, names: &[&str]) -> Option<&str> {
        names
            .iter()
            .filter_map(|name| self.get(name))
            .map(str::trim)
            .find(|v| !v.is_empty())
    }

    fn required(&self, names: &[&str], field: &'static str) -> Result<&str> {
        self.present(names).ok_or(EtlError::MissingField {
            field,
            row: self.row,
        })
    }

    fn invalid(&self, field: &'static str, value: &str, reason: impl ToString) -> EtlError {
        EtlError::InvalidField {
            field,
            value: value.to_string(),
            reason: reason.to_string(),
            row: self.row,
        }
    }

    fn parse_f64(&self, field: &'static str, value: &str) -> Result<f64> {
        value
            .parse::<f64>()
            .map_err(|e| self.invalid(field, value, e))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NearEarthObject {
    pub designation: String,
    pub name: Option<String>,
    /// Kilometers; `None` when unknown.
    pub diameter: Option<f64>,
    pub hazardous: bool,
}

impl NearEarthObject {
    pub fn new(
        designation: impl Into<String>,
        name: Option<String>,
        diameter: Option<f64>,
        hazardous: bool,
    ) -> Self {
        Self {
            designation: designation.into(),
            name: name.filter(|n| !n.trim().is_empty()),
            diameter: diameter.filter(|d| !d.is_nan()),
            hazardous,
        }
    }

    /// Build from one NEO CSV row.
    pub fn from_fields(fields: &FieldMap) -> Result<Self> {
        let designation = fields.required(NEO_DESIGNATION_COLUMNS, "designation")?;
        let name = fields.present(NEO_NAME_COLUMNS).map(str::to_string);
        let diameter = match fields.present(NEO_DIAMETER_COLUMNS) {
            Some(raw) => Some(fields.parse_f64("diameter", raw)?),
            None => None,
        };
        let hazardous = match fields.present(NEO_HAZARDOUS_COLUMNS) {
            Some(raw) => parse_hazard_flag(raw).ok_or_else(|| {
                fields.invalid("hazardous", raw, "expected Y or N")
            })?,
            None => false,
        };

        Ok(Self::new(designation, name, diameter, hazardous))
    }

    pub fn full_name(&self) -> String {
        match &self.name {
            Some(name) => format!("{} ({})", self.designation, name),
            None => self.designation.clone(),
        }
    }
}

impl fmt::Display for NearEarthObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let diameter = match self.diameter {
            Some(d) => format!("{d:.3} km"),
            None => "unknown".to_string(),
        };
        let verb = if self.hazardous { "is" } else { "is not" };
        write!(
            f,
            "NEO {} has a diameter of {} and {} potentially hazardous.",
            self.full_name(),
            diameter,
            verb
        )
    }
}

/// Accepts Y/N style flags, plus the spelled-out forms some exports use.
fn parse_hazard_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" | "true" => Some(true),
        "n" | "no" | "false" => Some(false),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CloseApproach {
    pub designation: String,
    pub time: NaiveDateTime,
    /// Astronomical units.
    pub distance: f64,
    /// Kilometers per second.
    pub velocity: f64,
    /// Filled in by [`crate::link::link_approaches`].
    pub neo: Option<Arc<NearEarthObject>>,
}

impl CloseApproach {
    pub fn new(
        designation: impl Into<String>,
        time: NaiveDateTime,
        distance: f64,
        velocity: f64,
    ) -> Self {
        Self {
            designation: designation.into(),
            time,
            distance,
            velocity,
            neo: None,
        }
    }

    /// Build from one row of the CAD JSON document.
    pub fn from_fields(fields: &FieldMap) -> Result<Self> {
        let designation = fields.required(CA_DESIGNATION_FIELDS, "designation")?;

        let raw_time = fields.required(CA_TIME_FIELDS, "time")?;
        let time = cd_to_datetime(raw_time).map_err(|e| fields.invalid("time", raw_time, e))?;

        let raw_distance = fields.required(CA_DISTANCE_FIELDS, "distance")?;
        let distance = fields.parse_f64("distance", raw_distance)?;

        let raw_velocity = fields.required(CA_VELOCITY_FIELDS, "velocity")?;
        let velocity = fields.parse_f64("velocity", raw_velocity)?;

        Ok(Self::new(designation, time, distance, velocity))
    }

    pub fn time_str(&self) -> String {
        datetime_to_str(&self.time)
    }

    pub fn is_linked(&self) -> bool {
        self.neo.is_some()
    }
}

impl fmt::Display for CloseApproach {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let who = match &self.neo {
            Some(neo) => neo.full_name(),
            None => self.designation.clone(),
        };
        write!(
            f,
            "At {}, '{}' approaches Earth at a distance of {:.2} au and a velocity of {:.2} km/s.",
            self.time_str(),
            who,
            self.distance,
            self.velocity
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn neo_row(pairs: &[(&str, &str)]) -> FieldMap {
        let mut map = FieldMap::new(1);
        for (k, v) in pairs {
            map.insert(*k, *v);
        }
        map
    }

    #[test]
    fn test_neo_from_fields_full_row() {
        let map = neo_row(&[
            ("designation", "2000433"),
            ("name", "Eros"),
            ("diameter_km", "16.84"),
            ("pha", "N"),
        ]);
        let neo = NearEarthObject::from_fields(&map).unwrap();
        assert_eq!(neo.designation, "2000433");
        assert_eq!(neo.name.as_deref(), Some("Eros"));
        assert_eq!(neo.diameter, Some(16.84));
        assert!(!neo.hazardous);
        assert_eq!(neo.full_name(), "2000433 (Eros)");
    }

    #[test]
    fn test_neo_blank_optional_fields() {
        let map = neo_row(&[("pdes", "2020 AB"), ("name", ""), ("diameter", ""), ("pha", "Y")]);
        let neo = NearEarthObject::from_fields(&map).unwrap();
        assert_eq!(neo.name, None);
        assert_eq!(neo.diameter, None);
        assert!(neo.hazardous);
        assert_eq!(neo.full_name(), "2020 AB");
        assert_eq!(
            neo.to_string(),
            "NEO 2020 AB has a diameter of unknown and is potentially hazardous."
        );
    }

    #[test]
    fn test_blank_alias_column_falls_through() {
        let map = neo_row(&[("designation", ""), ("pdes", "433"), ("name", "Eros"), ("diameter_km", " "), ("diameter", "16.84")]);
        let neo = NearEarthObject::from_fields(&map).unwrap();
        assert_eq!(neo.designation, "433");
        assert_eq!(neo.diameter, Some(16.84));
    }

    #[test]
    fn test_neo_missing_designation() {
        let map = neo_row(&[("name", "Eros")]);
        let err = NearEarthObject::from_fields(&map).unwrap_err();
        assert!(matches!(
            err,
            EtlError::MissingField { field: "designation", row: 1 }
        ));
    }

    #[test]
    fn test_neo_rejects_bad_diameter_and_flag() {
        let map = neo_row(&[("pdes", "433"), ("diameter", "big")]);
        assert!(matches!(
            NearEarthObject::from_fields(&map),
            Err(EtlError::InvalidField { field: "diameter", .. })
        ));

        let map = neo_row(&[("pdes", "433"), ("pha", "maybe")]);
        assert!(matches!(
            NearEarthObject::from_fields(&map),
            Err(EtlError::InvalidField { field: "hazardous", .. })
        ));
    }

    #[test]
    fn test_approach_from_fields() {
        let map = neo_row(&[
            ("des", "2000433"),
            ("orbit_id", "659"),
            ("cd", "2025-Jan-01 00:00"),
            ("dist", "0.15"),
            ("v_rel", "12.3"),
        ]);
        let ca = CloseApproach::from_fields(&map).unwrap();
        assert_eq!(ca.designation, "2000433");
        assert_eq!(ca.distance, 0.15);
        assert_eq!(ca.velocity, 12.3);
        assert_eq!(ca.time_str(), "2025-01-01 00:00");
        assert!(!ca.is_linked());
    }

    #[test]
    fn test_approach_bad_time() {
        let map = neo_row(&[
            ("des", "433"),
            ("cd", "yesterday"),
            ("dist", "0.1"),
            ("v_rel", "1"),
        ]);
        assert!(matches!(
            CloseApproach::from_fields(&map),
            Err(EtlError::InvalidField { field: "time", .. })
        ));
    }

    #[test]
    fn test_approach_display_uses_linked_name() {
        let map = neo_row(&[
            ("des", "433"),
            ("cd", "2025-Jan-01 00:00"),
            ("dist", "0.15"),
            ("v_rel", "12.3"),
        ]);
        let mut ca = CloseApproach::from_fields(&map).unwrap();
        assert!(ca.to_string().contains("'433'"));

        ca.neo = Some(Arc::new(NearEarthObject::new("433", Some("Eros".into()), None, false)));
        assert_eq!(
            ca.to_string(),
            "At 2025-01-01 00:00, '433 (Eros)' approaches Earth at a distance of 0.15 au and a velocity of 12.30 km/s."
        );
    }
}
