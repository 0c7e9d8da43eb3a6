//! Raw, loosely-typed records as delivered by a source.

/// A scalar reading before coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Missing,
    Number(f64),
    Text(String),
}

impl RawValue {
    /// Coerce to a finite float. Non-numeric and non-finite values are missing.
    pub fn coerce(&self) -> Option<f64> {
        let v = match self {
            RawValue::Missing => return None,
            RawValue::Number(v) => *v,
            RawValue::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        v.is_finite().then_some(v)
    }
}

impl From<Option<f64>> for RawValue {
    fn from(v: Option<f64>) -> Self {
        v.map_or(RawValue::Missing, RawValue::Number)
    }
}

/// A timestamp before parsing.
#[derive(Debug, Clone, PartialEq)]
pub enum RawTimestamp {
    Missing,
    /// Already an absolute instant.
    Instant(chrono::DateTime<chrono::Utc>),
    /// Milliseconds since the Unix epoch.
    EpochMillis(i64),
    Text(String),
    /// Separate date and time fields.
    DateTime { date: String, time: String },
}

/// One source record: a timestamp plus the five telemetry scalars.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub timestamp: RawTimestamp,
    pub iaq: RawValue,
    pub gas_k: RawValue,
    pub temp: RawValue,
    pub hum: RawValue,
    pub pres: RawValue,
}

impl RawRecord {
    /// Record with a timestamp and all readings missing.
    pub fn at(timestamp: RawTimestamp) -> Self {
        Self {
            timestamp,
            iaq: RawValue::Missing,
            gas_k: RawValue::Missing,
            temp: RawValue::Missing,
            hum: RawValue::Missing,
            pres: RawValue::Missing,
        }
    }

    /// Mutable slot for a reading by its store field name.
    pub fn field_mut(&mut self, name: &str) -> Option<&mut RawValue> {
        match name {
            "iaq" => Some(&mut self.iaq),
            "gasK" => Some(&mut self.gas_k),
            "temp" => Some(&mut self.temp),
            "hum" => Some(&mut self.hum),
            "pres" => Some(&mut self.pres),
            _ => None,
        }
    }
}

/// Store field names of the five readings, in row order.
pub const READING_FIELDS: [&str; 5] = ["iaq", "gasK", "temp", "hum", "pres"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coercion_rules() {
        assert_eq!(RawValue::Number(3.5).coerce(), Some(3.5));
        assert_eq!(RawValue::Text(" 12.25 ".into()).coerce(), Some(12.25));
        assert_eq!(RawValue::Text("n/a".into()).coerce(), None);
        assert_eq!(RawValue::Text("inf".into()).coerce(), None);
        assert_eq!(RawValue::Number(f64::NAN).coerce(), None);
        assert_eq!(RawValue::Missing.coerce(), None);
        // Non-numeric is missing, never zero.
        assert_ne!(RawValue::Text("".into()).coerce(), Some(0.0));
    }

    #[test]
    fn field_slots_cover_every_reading() {
        let mut r = RawRecord::at(RawTimestamp::Missing);
        for name in READING_FIELDS {
            *r.field_mut(name).expect("known field") = RawValue::Number(1.0);
        }
        assert!(r.field_mut("lat").is_none());
        assert_eq!(r.pres, RawValue::Number(1.0));
    }
}
