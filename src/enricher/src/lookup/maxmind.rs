use std::collections::BTreeMap;
use std::net::IpAddr;
use std::path::Path;

use maxminddb::geoip2;
use maxminddb::MaxMindDBError;
use maxminddb::Reader;
use tracing::debug;

use crate::lookup::Database;
use crate::lookup::Locator;
use crate::lookup::Location;
use crate::lookup::LookupResult;
use crate::lookup::Result;

/// Value of attributes the loaded database does not carry.
pub const NOT_SUPPORTED: &str =
    "This parameter is unavailable for selected data file. Please upgrade the data file.";
/// Value of attributes for addresses the database has no entry for.
pub const UNKNOWN: &str = "-";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edition {
    City,
    Country,
    Isp,
    Asn,
    Other,
}

impl Edition {
    fn from_database_type(typ: &str) -> Self {
        if typ.contains("City") {
            Edition::City
        } else if typ.contains("Country") {
            Edition::Country
        } else if typ.contains("ISP") {
            Edition::Isp
        } else if typ.contains("ASN") {
            Edition::Asn
        } else {
            Edition::Other
        }
    }
}

/// Opens MaxMind DB files.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaxmindLocator;

impl Locator for MaxmindLocator {
    fn open(&self, path: &Path) -> Result<Box<dyn Database>> {
        if !path.is_file() {
            debug!("database file {:?} not found", path);
            return Ok(Box::new(MaxmindDatabase { reader: None }));
        }
        let reader = Reader::open_readfile(path)?;
        debug!(
            "opened {} database {:?}",
            reader.metadata.database_type, path
        );

        Ok(Box::new(MaxmindDatabase {
            reader: Some(reader),
        }))
    }
}

pub struct MaxmindDatabase {
    // None when the path did not point at a file; queries then report a missing file
    reader: Option<Reader<Vec<u8>>>,
}

impl MaxmindDatabase {
    fn resolve(
        reader: &Reader<Vec<u8>>,
        ip: IpAddr,
    ) -> std::result::Result<Location, MaxMindDBError> {
        let loc = match Edition::from_database_type(&reader.metadata.database_type) {
            Edition::City => city(reader.lookup(ip)?),
            Edition::Country => country(reader.lookup(ip)?),
            Edition::Isp => isp(reader.lookup(ip)?),
            Edition::Asn => asn(reader.lookup(ip)?),
            Edition::Other => Location::filled(NOT_SUPPORTED),
        };

        Ok(loc)
    }
}

fn city(city: geoip2::City) -> Location {
    let mut loc = Location::filled(NOT_SUPPORTED);
    if let Some(country) = city.country {
        loc.country_short = country.iso_code.unwrap_or(UNKNOWN).to_string();
        loc.country_long = english(country.names.as_ref());
    }
    if let Some(region) = city.subdivisions.as_ref().and_then(|s| s.first()) {
        loc.region = english(region.names.as_ref());
    }
    if let Some(c) = city.city {
        loc.city = english(c.names.as_ref());
    }
    if let Some(location) = city.location {
        loc.latitude = location.latitude.unwrap_or_default() as f32;
        loc.longitude = location.longitude.unwrap_or_default() as f32;
        loc.time_zone = location.time_zone.unwrap_or(UNKNOWN).to_string();
    }
    if let Some(postal) = city.postal {
        loc.zip_code = postal.code.unwrap_or(UNKNOWN).to_string();
    }

    loc
}

fn country(country: geoip2::Country) -> Location {
    let mut loc = Location::filled(NOT_SUPPORTED);
    if let Some(country) = country.country {
        loc.country_short = country.iso_code.unwrap_or(UNKNOWN).to_string();
        loc.country_long = english(country.names.as_ref());
    }

    loc
}

fn isp(isp: geoip2::Isp) -> Location {
    let mut loc = Location::filled(NOT_SUPPORTED);
    loc.isp = isp.isp.unwrap_or(UNKNOWN).to_string();
    loc.mcc = isp.mobile_country_code.unwrap_or(UNKNOWN).to_string();
    loc.mnc = isp.mobile_network_code.unwrap_or(UNKNOWN).to_string();

    loc
}

fn asn(asn: geoip2::Asn) -> Location {
    let mut loc = Location::filled(NOT_SUPPORTED);
    loc.isp = asn
        .autonomous_system_organization
        .unwrap_or(UNKNOWN)
        .to_string();

    loc
}

fn english(names: Option<&BTreeMap<&str, &str>>) -> String {
    names
        .and_then(|names| names.get("en"))
        .copied()
        .unwrap_or(UNKNOWN)
        .to_string()
}

/// Blank and unparsable addresses are rejected before the database is consulted.
fn parse_address(addr: &str) -> std::result::Result<IpAddr, LookupResult> {
    let addr = addr.trim();
    if addr.is_empty() {
        return Err(LookupResult::EmptyIpAddress);
    }

    addr.parse().map_err(|_| LookupResult::InvalidIpAddress)
}

fn supports(ip_version: u16, ip: IpAddr) -> bool {
    !(ip.is_ipv6() && ip_version == 4)
}

fn outcome(res: std::result::Result<Location, MaxMindDBError>) -> LookupResult {
    match res {
        Ok(loc) => LookupResult::Ok(Box::new(loc)),
        Err(MaxMindDBError::AddressNotFoundError(_)) => {
            LookupResult::Ok(Box::new(Location::filled(UNKNOWN)))
        }
        Err(err) => LookupResult::Unknown(err.to_string()),
    }
}

impl Database for MaxmindDatabase {
    fn query(&self, addr: &str) -> LookupResult {
        let ip = match parse_address(addr) {
            Ok(ip) => ip,
            Err(res) => return res,
        };
        let reader = match &self.reader {
            Some(reader) => reader,
            None => return LookupResult::MissingFile,
        };
        if !supports(reader.metadata.ip_version, ip) {
            return LookupResult::Ipv6NotSupported;
        }

        outcome(Self::resolve(reader, ip))
    }

    fn close(&mut self) {
        self.reader = None;
    }
}
