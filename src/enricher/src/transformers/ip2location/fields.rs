use std::collections::HashMap;

use common::types;

use crate::data::Schema;
use crate::data::SchemaBuilder;
use crate::data::SchemaRef;
use crate::data::Struct;
use crate::data::Value;
use crate::data::FLOAT32_SCHEMA;
use crate::data::STRING_SCHEMA;
use crate::error::Result;
use crate::lookup::Location;
use crate::lookup::LookupResult;

/// What a lookup contributes to the outgoing record.
#[derive(Debug, Clone, PartialEq)]
pub enum Enrichment {
    Location(Box<Location>),
    Error(String),
}

impl Enrichment {
    pub fn from_outcome(outcome: crate::lookup::Result<LookupResult>) -> Self {
        match outcome {
            Ok(LookupResult::Ok(loc)) => Enrichment::Location(loc),
            Ok(LookupResult::EmptyIpAddress) => Enrichment::Error(types::ERROR_BLANK_IP.to_string()),
            Ok(LookupResult::InvalidIpAddress) => {
                Enrichment::Error(types::ERROR_INVALID_IP.to_string())
            }
            Ok(LookupResult::MissingFile) => {
                Enrichment::Error(types::ERROR_INVALID_DB_PATH.to_string())
            }
            Ok(LookupResult::Ipv6NotSupported) => {
                Enrichment::Error(types::ERROR_IPV6_NOT_SUPPORTED.to_string())
            }
            // prefix and raw status are joined without a separator
            Ok(LookupResult::Unknown(status)) => {
                Enrichment::Error(format!("{}{}", types::ERROR_UNKNOWN, status))
            }
            Err(err) => Enrichment::Error(err.to_string()),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Enrichment::Error(_))
    }
}

fn location_values(loc: &Location) -> [(&'static str, Value); 22] {
    [
        (types::FIELD_COUNTRY_CODE, loc.country_short.as_str().into()),
        (types::FIELD_COUNTRY_NAME, loc.country_long.as_str().into()),
        (types::FIELD_REGION, loc.region.as_str().into()),
        (types::FIELD_CITY, loc.city.as_str().into()),
        (types::FIELD_LATITUDE, loc.latitude.into()),
        (types::FIELD_LONGITUDE, loc.longitude.into()),
        (types::FIELD_ZIP_CODE, loc.zip_code.as_str().into()),
        (types::FIELD_TIME_ZONE, loc.time_zone.as_str().into()),
        (types::FIELD_ISP, loc.isp.as_str().into()),
        (types::FIELD_DOMAIN, loc.domain.as_str().into()),
        (types::FIELD_NET_SPEED, loc.net_speed.as_str().into()),
        (types::FIELD_IDD_CODE, loc.idd_code.as_str().into()),
        (types::FIELD_AREA_CODE, loc.area_code.as_str().into()),
        (
            types::FIELD_WEATHER_STATION_CODE,
            loc.weather_station_code.as_str().into(),
        ),
        (
            types::FIELD_WEATHER_STATION_NAME,
            loc.weather_station_name.as_str().into(),
        ),
        (types::FIELD_MCC, loc.mcc.as_str().into()),
        (types::FIELD_MNC, loc.mnc.as_str().into()),
        (types::FIELD_MOBILE_BRAND, loc.mobile_brand.as_str().into()),
        (types::FIELD_ELEVATION, loc.elevation.into()),
        (types::FIELD_USAGE_TYPE, loc.usage_type.as_str().into()),
        (types::FIELD_ADDRESS_TYPE, loc.address_type.as_str().into()),
        (types::FIELD_CATEGORY, loc.category.as_str().into()),
    ]
}

/// A container the enrichment fields can be written into.
pub trait FieldWriter {
    fn write(&mut self, name: &str, value: Value) -> Result<()>;
}

impl FieldWriter for HashMap<String, Value> {
    fn write(&mut self, name: &str, value: Value) -> Result<()> {
        self.insert(name.to_string(), value);
        Ok(())
    }
}

impl FieldWriter for Struct {
    fn write(&mut self, name: &str, value: Value) -> Result<()> {
        self.put(name, value)?;
        Ok(())
    }
}

/// Adds either all location fields or the error field. Other fields are left alone.
pub fn merge<W: FieldWriter>(mut container: W, enrichment: &Enrichment) -> Result<W> {
    match enrichment {
        Enrichment::Location(loc) => {
            for (name, value) in location_values(loc) {
                container.write(name, value)?;
            }
        }
        Enrichment::Error(msg) => container.write(types::FIELD_ERROR, msg.as_str().into())?,
    }

    Ok(container)
}

/// Output schema for `schema`: name, version, doc and every field carried over, then the
/// enrichment fields appended. Returns a new instance on every call.
pub fn derive_schema(schema: &Schema) -> Result<SchemaRef> {
    let mut builder = SchemaBuilder::copy_basics(schema);
    for field in schema.fields() {
        builder = builder.field(field.name(), field.schema().clone())?;
    }

    for name in types::SUCCESS_FIELDS {
        let field_schema = match name {
            types::FIELD_LATITUDE | types::FIELD_LONGITUDE | types::FIELD_ELEVATION => {
                FLOAT32_SCHEMA.clone()
            }
            _ => STRING_SCHEMA.clone(),
        };
        builder = builder.field(name, field_schema)?;
    }
    builder = builder.field(types::FIELD_ERROR, STRING_SCHEMA.clone())?;

    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::Arc;

    use super::*;
    use crate::data::Type;
    use crate::data::INT32_SCHEMA;
    use crate::error::EnricherError;
    use crate::lookup::LookupError;

    fn location() -> Location {
        let mut loc = Location::filled("-");
        loc.country_short = "US".to_string();
        loc.country_long = "United States of America".to_string();
        loc.latitude = 37.405;
        loc.longitude = -122.078;
        loc
    }

    fn error_of(outcome: crate::lookup::Result<LookupResult>) -> String {
        match Enrichment::from_outcome(outcome) {
            Enrichment::Error(msg) => msg,
            other => panic!("expected error, got {other:?}"),
        }
    }

    #[test]
    fn error_taxonomy() {
        assert_eq!(
            error_of(Ok(LookupResult::EmptyIpAddress)),
            "IP address cannot be blank."
        );
        assert_eq!(
            error_of(Ok(LookupResult::InvalidIpAddress)),
            "Invalid IP address."
        );
        assert_eq!(
            error_of(Ok(LookupResult::MissingFile)),
            "Invalid database path."
        );
        assert_eq!(
            error_of(Ok(LookupResult::Ipv6NotSupported)),
            "This BIN does not contain IPv6 data."
        );
        assert_eq!(
            error_of(Ok(LookupResult::Unknown("INVALID_BIN_DATABASE".to_string()))),
            "Unknown error.INVALID_BIN_DATABASE"
        );
        let io_err = LookupError::Io(io::Error::new(io::ErrorKind::Other, "disk on fire"));
        assert_eq!(error_of(Err(io_err)), "disk on fire");
    }

    #[test]
    fn success_is_not_an_error() {
        let e = Enrichment::from_outcome(Ok(LookupResult::Ok(Box::new(location()))));
        assert!(!e.is_error());
    }

    #[test]
    fn merge_location_into_map() {
        let mut map = HashMap::new();
        map.insert("ip_address".to_string(), Value::from("8.8.8.8"));

        let out = merge(map, &Enrichment::Location(Box::new(location()))).unwrap();
        assert_eq!(out.len(), 1 + types::SUCCESS_FIELDS.len());
        assert_eq!(out["ip_address"], Value::from("8.8.8.8"));
        assert_eq!(out[types::FIELD_COUNTRY_CODE], Value::from("US"));
        assert_eq!(out[types::FIELD_LATITUDE], Value::Float32(37.405));
        assert_eq!(out[types::FIELD_ELEVATION], Value::Float32(0.0));
        assert!(!out.contains_key(types::FIELD_ERROR));
    }

    #[test]
    fn merge_error_into_map() {
        let mut map = HashMap::new();
        map.insert("ip_address".to_string(), Value::from("bad"));

        let out = merge(map, &Enrichment::Error("Invalid IP address.".to_string())).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[types::FIELD_ERROR], Value::from("Invalid IP address."));
        for name in types::SUCCESS_FIELDS {
            assert!(!out.contains_key(name));
        }
    }

    #[test]
    fn derive_appends_fields_in_order() {
        let input = SchemaBuilder::struct_builder()
            .name("name")
            .version(1)
            .doc("doc")
            .field("ip_address", STRING_SCHEMA.clone())
            .unwrap()
            .field("count", INT32_SCHEMA.clone())
            .unwrap()
            .build();

        let out = derive_schema(&input).unwrap();
        assert_eq!(out.name(), Some("name"));
        assert_eq!(out.version(), Some(1));
        assert_eq!(out.doc(), Some("doc"));

        let names: Vec<&str> = out.fields().iter().map(|f| f.name()).collect();
        let mut expected = vec!["ip_address", "count"];
        expected.extend(types::SUCCESS_FIELDS);
        expected.push(types::FIELD_ERROR);
        assert_eq!(names, expected);
        assert_eq!(out.fields().len(), 2 + 23);

        for field in out.fields() {
            let typ = field.schema().typ();
            match field.name() {
                "count" => assert_eq!(typ, Type::Int32),
                types::FIELD_LATITUDE | types::FIELD_LONGITUDE | types::FIELD_ELEVATION => {
                    assert_eq!(typ, Type::Float32)
                }
                _ => assert_eq!(typ, Type::String),
            }
        }
    }

    #[test]
    fn derive_is_deterministic_but_fresh() {
        let input = SchemaBuilder::struct_builder()
            .field("ip_address", STRING_SCHEMA.clone())
            .unwrap()
            .build();

        let a = derive_schema(&input).unwrap();
        let b = derive_schema(&input).unwrap();
        assert_eq!(a, b);
        assert!(!Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn derive_rejects_clashing_field() {
        let input = SchemaBuilder::struct_builder()
            .field(types::FIELD_CITY, STRING_SCHEMA.clone())
            .unwrap()
            .build();

        let err = derive_schema(&input).unwrap_err();
        assert!(matches!(err, EnricherError::DuplicateField(name) if name == types::FIELD_CITY));
    }

    #[test]
    fn merge_into_struct() {
        let input = SchemaBuilder::struct_builder()
            .field("ip_address", STRING_SCHEMA.clone())
            .unwrap()
            .build();
        let schema = derive_schema(&input).unwrap();
        let s = Struct::try_new(schema)
            .unwrap()
            .with("ip_address", "8.8.8.8")
            .unwrap();

        let out = merge(s, &Enrichment::Location(Box::new(location()))).unwrap();
        assert_eq!(out.get(types::FIELD_COUNTRY_CODE).unwrap(), &Value::from("US"));
        assert_eq!(out.get(types::FIELD_LONGITUDE).unwrap(), &Value::Float32(-122.078));
        assert_eq!(out.get(types::FIELD_ERROR).unwrap(), &Value::Null);
        assert_eq!(out.get("ip_address").unwrap(), &Value::from("8.8.8.8"));
    }
}
