pub mod ip2location;
