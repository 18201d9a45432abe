//! Test utilities

use std::collections::HashMap;
use std::net::IpAddr;
use std::path::Path;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use enricher::lookup;
use enricher::lookup::Database;
use enricher::lookup::Locator;
use enricher::lookup::Location;
use enricher::lookup::LookupResult;

#[derive(Default)]
pub struct Counters {
    pub opened: AtomicUsize,
    pub closed: AtomicUsize,
    pub queries: AtomicUsize,
}

impl Counters {
    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

/// In-memory locator answering from a fixed table.
pub struct TableLocator {
    pub counters: Arc<Counters>,
    table: Arc<HashMap<IpAddr, Location>>,
}

impl TableLocator {
    pub fn new() -> Self {
        let mut table = HashMap::new();
        let mut google = Location::filled("-");
        google.country_short = "US".to_string();
        google.country_long = "United States of America".to_string();
        google.region = "California".to_string();
        google.city = "Mountain View".to_string();
        google.latitude = 37.40599;
        google.longitude = -122.078514;
        google.zip_code = "94043".to_string();
        google.time_zone = "-07:00".to_string();
        table.insert("8.8.8.8".parse().unwrap(), google);

        let mut cloudflare = Location::filled("-");
        cloudflare.country_short = "AU".to_string();
        cloudflare.country_long = "Australia".to_string();
        table.insert("1.1.1.1".parse().unwrap(), cloudflare);

        TableLocator {
            counters: Arc::new(Counters::default()),
            table: Arc::new(table),
        }
    }
}

impl Default for TableLocator {
    fn default() -> Self {
        Self::new()
    }
}

struct TableDatabase {
    counters: Arc<Counters>,
    table: Arc<HashMap<IpAddr, Location>>,
}

impl Locator for TableLocator {
    fn open(&self, _path: &Path) -> lookup::Result<Box<dyn Database>> {
        self.counters.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(TableDatabase {
            counters: self.counters.clone(),
            table: self.table.clone(),
        }))
    }
}

impl Database for TableDatabase {
    fn query(&self, addr: &str) -> LookupResult {
        self.counters.queries.fetch_add(1, Ordering::SeqCst);
        if addr.trim().is_empty() {
            return LookupResult::EmptyIpAddress;
        }
        let ip: IpAddr = match addr.parse() {
            Ok(ip) => ip,
            Err(_) => return LookupResult::InvalidIpAddress,
        };
        if ip.is_ipv6() {
            return LookupResult::Ipv6NotSupported;
        }
        match self.table.get(&ip) {
            Some(loc) => LookupResult::Ok(Box::new(loc.clone())),
            None => LookupResult::Ok(Box::new(Location::filled("-"))),
        }
    }

    fn close(&mut self) {
        self.counters.closed.fetch_add(1, Ordering::SeqCst);
    }
}
