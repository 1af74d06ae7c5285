//! Position fields and their typed values

use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Navigation data fields, with the navigation-core wire codes.
///
/// Declaration order follows the numeric codes so that ordered maps keyed by
/// `FieldKey` iterate in wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(i32)]
pub enum FieldKey {
    Timestamp = 0x0010,
    Latitude = 0x00a0,
    Longitude = 0x00a1,
    Heading = 0x00a3,
    Speed = 0x00a4,
    SimulationMode = 0x00e3,
}

impl FieldKey {
    pub const ALL: [FieldKey; 6] = [
        FieldKey::Timestamp,
        FieldKey::Latitude,
        FieldKey::Longitude,
        FieldKey::Heading,
        FieldKey::Speed,
        FieldKey::SimulationMode,
    ];

    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn from_code(code: i64) -> Option<FieldKey> {
        Self::ALL.into_iter().find(|key| i64::from(key.code()) == code)
    }

    /// TIMESTAMP and SPEED are recognized but never requested from the service
    /// nor returned to clients.
    pub fn is_supported(self) -> bool {
        !matches!(self, FieldKey::Timestamp | FieldKey::Speed)
    }

    /// Decode a wire value into the arm this key selects. `None` when the JSON
    /// type does not match. Integers outside the arm's range wrap.
    pub fn decode_value(self, value: &Value) -> Option<TypedValue> {
        match self {
            FieldKey::Latitude | FieldKey::Longitude => value.as_f64().map(TypedValue::Double),
            FieldKey::Heading | FieldKey::Timestamp => {
                as_integer(value).map(|v| TypedValue::Uint32(v as u32))
            }
            FieldKey::Speed => as_integer(value).map(|v| TypedValue::Int32(v as i32)),
            FieldKey::SimulationMode => value.as_bool().map(TypedValue::Bool),
        }
    }
}

fn as_integer(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_u64().map(|v| v as i64))
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldKey::Timestamp => "TIMESTAMP",
            FieldKey::Latitude => "LATITUDE",
            FieldKey::Longitude => "LONGITUDE",
            FieldKey::Heading => "HEADING",
            FieldKey::Speed => "SPEED",
            FieldKey::SimulationMode => "SIMULATION_MODE",
        };
        f.write_str(name)
    }
}

/// Value of a single position field
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TypedValue {
    Double(f64),
    Int32(i32),
    Uint32(u32),
    Bool(bool),
}

impl TypedValue {
    pub fn as_f64(&self) -> f64 {
        match *self {
            TypedValue::Double(v) => v,
            TypedValue::Int32(v) => f64::from(v),
            TypedValue::Uint32(v) => f64::from(v),
            TypedValue::Bool(v) => f64::from(u8::from(v)),
        }
    }

    /// Truthiness of the value; numeric arms are `true` when nonzero.
    pub fn as_bool(&self) -> bool {
        match *self {
            TypedValue::Double(v) => v != 0.0,
            TypedValue::Int32(v) => v != 0,
            TypedValue::Uint32(v) => v != 0,
            TypedValue::Bool(v) => v,
        }
    }

    pub fn as_u32(&self) -> Option<u32> {
        match *self {
            TypedValue::Uint32(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match *self {
            TypedValue::Int32(v) => Some(v),
            _ => None,
        }
    }
}

/// Decoded position reply, in wire key order
pub type PositionMap = BTreeMap<FieldKey, TypedValue>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_codes_round_trip() {
        for key in FieldKey::ALL {
            assert_eq!(FieldKey::from_code(i64::from(key.code())), Some(key));
        }
        assert_eq!(FieldKey::from_code(0x00a2), None);
    }

    #[test]
    fn test_unsupported_keys() {
        let unsupported: Vec<FieldKey> = FieldKey::ALL
            .into_iter()
            .filter(|k| !k.is_supported())
            .collect();
        assert_eq!(unsupported, vec![FieldKey::Timestamp, FieldKey::Speed]);
    }

    #[test]
    fn test_decode_value_selects_arm() {
        assert_eq!(
            FieldKey::Latitude.decode_value(&json!(35.0)),
            Some(TypedValue::Double(35.0))
        );
        assert_eq!(
            FieldKey::Longitude.decode_value(&json!(139)),
            Some(TypedValue::Double(139.0))
        );
        assert_eq!(
            FieldKey::Heading.decode_value(&json!(90)),
            Some(TypedValue::Uint32(90))
        );
        assert_eq!(FieldKey::Speed.decode_value(&json!(-3)), Some(TypedValue::Int32(-3)));
        assert_eq!(
            FieldKey::SimulationMode.decode_value(&json!(true)),
            Some(TypedValue::Bool(true))
        );

        assert_eq!(FieldKey::Heading.decode_value(&json!(90.5)), None);
        assert_eq!(FieldKey::SimulationMode.decode_value(&json!(1)), None);
        assert_eq!(FieldKey::Latitude.decode_value(&json!("35")), None);
    }

    #[test]
    fn test_out_of_range_integers_wrap() {
        assert_eq!(
            FieldKey::Heading.decode_value(&json!(-1)),
            Some(TypedValue::Uint32(u32::MAX))
        );
        assert_eq!(
            FieldKey::Timestamp.decode_value(&json!(4294967296u64 + 5)),
            Some(TypedValue::Uint32(5))
        );
        assert_eq!(
            FieldKey::Speed.decode_value(&json!(2147483648u64)),
            Some(TypedValue::Int32(i32::MIN))
        );
    }

    #[test]
    fn test_heading_truthiness() {
        assert!(TypedValue::Uint32(90).as_bool());
        assert!(!TypedValue::Uint32(0).as_bool());
        assert_eq!(TypedValue::Uint32(90).as_u32(), Some(90));
    }
}
