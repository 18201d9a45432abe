//! Geolocation lookup seam.
//!
//! A [`Locator`] opens a database, the returned [`Database`] answers one query per record and
//! is closed right after. [`lookup`] performs the whole cycle and guarantees the close.

pub mod maxmind;

use std::io;
use std::path::Path;
use std::result;

use maxminddb::MaxMindDBError;
use thiserror::Error;

pub use maxmind::MaxmindLocator;

pub type Result<T> = result::Result<T, LookupError>;

/// Failure to open or read the database. The message becomes the record's error field.
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("{0}")]
    Io(#[from] io::Error),
    #[error("{0}")]
    Maxmind(#[from] MaxMindDBError),
}

/// Attributes resolved for one address.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub country_short: String,
    pub country_long: String,
    pub region: String,
    pub city: String,
    pub latitude: f32,
    pub longitude: f32,
    pub zip_code: String,
    pub time_zone: String,
    pub isp: String,
    pub domain: String,
    pub net_speed: String,
    pub idd_code: String,
    pub area_code: String,
    pub weather_station_code: String,
    pub weather_station_name: String,
    pub mcc: String,
    pub mnc: String,
    pub mobile_brand: String,
    pub elevation: f32,
    pub usage_type: String,
    pub address_type: String,
    pub category: String,
}

impl Location {
    /// Every text attribute set to `text`, every number to zero.
    pub fn filled(text: &str) -> Self {
        let s = || text.to_string();
        Location {
            country_short: s(),
            country_long: s(),
            region: s(),
            city: s(),
            latitude: 0.0,
            longitude: 0.0,
            zip_code: s(),
            time_zone: s(),
            isp: s(),
            domain: s(),
            net_speed: s(),
            idd_code: s(),
            area_code: s(),
            weather_station_code: s(),
            weather_station_name: s(),
            mcc: s(),
            mnc: s(),
            mobile_brand: s(),
            elevation: 0.0,
            usage_type: s(),
            address_type: s(),
            category: s(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LookupResult {
    Ok(Box<Location>),
    EmptyIpAddress,
    InvalidIpAddress,
    MissingFile,
    Ipv6NotSupported,
    Unknown(String),
}

impl LookupResult {
    pub fn status(&self) -> &str {
        match self {
            LookupResult::Ok(_) => "OK",
            LookupResult::EmptyIpAddress => "EMPTY_IP_ADDRESS",
            LookupResult::InvalidIpAddress => "INVALID_IP_ADDRESS",
            LookupResult::MissingFile => "MISSING_FILE",
            LookupResult::Ipv6NotSupported => "IPV6_NOT_SUPPORTED",
            LookupResult::Unknown(status) => status.as_str(),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, LookupResult::Ok(_))
    }
}

pub trait Locator: Send + Sync {
    fn open(&self, path: &Path) -> Result<Box<dyn Database>>;
}

/// An opened database. Queries report every condition through [`LookupResult`].
pub trait Database {
    fn query(&self, addr: &str) -> LookupResult;

    fn close(&mut self);
}

/// Closes the wrapped database when dropped.
struct Session {
    db: Box<dyn Database>,
}

impl Drop for Session {
    fn drop(&mut self) {
        self.db.close();
    }
}

/// Opens the database at `path`, queries `addr` once and closes it again on every exit path.
pub fn lookup(locator: &dyn Locator, path: &Path, addr: &str) -> Result<LookupResult> {
    let session = Session {
        db: locator.open(path)?,
    };

    Ok(session.db.query(addr))
}
