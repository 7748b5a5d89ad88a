//! Semantic string format checkers
//!
//! Each checker takes the raw string and returns the reason the value is
//! rejected, if any. Format checks run at value-validation time only; the
//! compile phase stays free of I/O.
//!
//! Copyright (c) 2025 Schemaforge Team
//! Licensed under the Apache-2.0 license

use crate::descriptor::SemanticFormat;
use chrono::{DateTime, NaiveDate, NaiveTime};
use regex::Regex;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::path::Path;
use std::sync::OnceLock;
use url::Url;

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)+$")
            .expect("email regex is valid")
    })
}

/// Check a string value against a semantic format.
///
/// Returns `Err(reason)` when the value does not satisfy the format.
pub fn check_format(format: SemanticFormat, value: &str) -> Result<(), String> {
    match format {
        SemanticFormat::Email => {
            if email_regex().is_match(value) {
                Ok(())
            } else {
                Err(format!("'{}' is not a valid email address", value))
            }
        }
        SemanticFormat::Uri => match Url::parse(value) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => Ok(()),
            Ok(url) => Err(format!("unsupported URL scheme '{}'", url.scheme())),
            Err(err) => Err(format!("'{}' is not a valid URL: {}", value, err)),
        },
        SemanticFormat::Ipv4 => value
            .parse::<Ipv4Addr>()
            .map(|_| ())
            .map_err(|_| format!("'{}' is not a valid IPv4 address", value)),
        SemanticFormat::Ipv6 => value
            .parse::<Ipv6Addr>()
            .map(|_| ())
            .map_err(|_| format!("'{}' is not a valid IPv6 address", value)),
        SemanticFormat::Date => NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map(|_| ())
            .map_err(|_| format!("'{}' is not a valid date (expected YYYY-MM-DD)", value)),
        SemanticFormat::Time => NaiveTime::parse_from_str(value, "%H:%M:%S%.f")
            .map(|_| ())
            .map_err(|_| format!("'{}' is not a valid time (expected HH:MM:SS)", value)),
        SemanticFormat::DateTime => DateTime::parse_from_rfc3339(value)
            .map(|_| ())
            .map_err(|_| format!("'{}' is not a valid RFC 3339 date-time", value)),
        // Any string payload qualifies as binary; the format is metadata
        SemanticFormat::Binary => Ok(()),
        SemanticFormat::FilePath => {
            if Path::new(value).is_file() {
                Ok(())
            } else {
                Err(format!("'{}' does not point to an existing file", value))
            }
        }
    }
}
