use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for validating issue type codes
    /// Must be lowercase alphanumeric words joined by single underscores
    /// - Valid: "pothole", "water_leak", "street_light2"
    /// - Invalid: "_leak", "leak_", "water__leak", "Pothole", "water-leak"
    pub static ref ISSUE_TYPE_REGEX: Regex = Regex::new(r"^[a-z0-9]+(?:_[a-z0-9]+)*$").unwrap();
}
