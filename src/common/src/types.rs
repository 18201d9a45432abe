pub const FIELD_PREFIX: &str = "ip2location_";

pub const FIELD_COUNTRY_CODE: &str = "ip2location_country_code";
pub const FIELD_COUNTRY_NAME: &str = "ip2location_country_name";
pub const FIELD_REGION: &str = "ip2location_region";
pub const FIELD_CITY: &str = "ip2location_city";
pub const FIELD_LATITUDE: &str = "ip2location_latitude";
pub const FIELD_LONGITUDE: &str = "ip2location_longitude";
pub const FIELD_ZIP_CODE: &str = "ip2location_zip_code";
pub const FIELD_TIME_ZONE: &str = "ip2location_time_zone";
pub const FIELD_ISP: &str = "ip2location_isp";
pub const FIELD_DOMAIN: &str = "ip2location_domain";
pub const FIELD_NET_SPEED: &str = "ip2location_net_speed";
pub const FIELD_IDD_CODE: &str = "ip2location_idd_code";
pub const FIELD_AREA_CODE: &str = "ip2location_area_code";
pub const FIELD_WEATHER_STATION_CODE: &str = "ip2location_weather_station_code";
pub const FIELD_WEATHER_STATION_NAME: &str = "ip2location_weather_station_name";
pub const FIELD_MCC: &str = "ip2location_mcc";
pub const FIELD_MNC: &str = "ip2location_mnc";
pub const FIELD_MOBILE_BRAND: &str = "ip2location_mobile_brand";
pub const FIELD_ELEVATION: &str = "ip2location_elevation";
pub const FIELD_USAGE_TYPE: &str = "ip2location_usage_type";
pub const FIELD_ADDRESS_TYPE: &str = "ip2location_address_type";
pub const FIELD_CATEGORY: &str = "ip2location_category";
pub const FIELD_ERROR: &str = "ip2location_error";

/// Success fields in output order. `FIELD_ERROR` is appended after them.
pub const SUCCESS_FIELDS: [&str; 22] = [
    FIELD_COUNTRY_CODE,
    FIELD_COUNTRY_NAME,
    FIELD_REGION,
    FIELD_CITY,
    FIELD_LATITUDE,
    FIELD_LONGITUDE,
    FIELD_ZIP_CODE,
    FIELD_TIME_ZONE,
    FIELD_ISP,
    FIELD_DOMAIN,
    FIELD_NET_SPEED,
    FIELD_IDD_CODE,
    FIELD_AREA_CODE,
    FIELD_WEATHER_STATION_CODE,
    FIELD_WEATHER_STATION_NAME,
    FIELD_MCC,
    FIELD_MNC,
    FIELD_MOBILE_BRAND,
    FIELD_ELEVATION,
    FIELD_USAGE_TYPE,
    FIELD_ADDRESS_TYPE,
    FIELD_CATEGORY,
];

pub const ERROR_BLANK_IP: &str = "IP address cannot be blank.";
pub const ERROR_INVALID_IP: &str = "Invalid IP address.";
pub const ERROR_INVALID_DB_PATH: &str = "Invalid database path.";
pub const ERROR_IPV6_NOT_SUPPORTED: &str = "This BIN does not contain IPv6 data.";
pub const ERROR_UNKNOWN: &str = "Unknown error.";
