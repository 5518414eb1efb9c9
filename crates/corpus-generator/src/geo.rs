//! Structured geographic records.
//!
//! Geo sources are CSV rows: `country,state` for state pages,
//! `country,state,city` for city pages. Fields may be quoted.

use crate::error::CandidateRejected;
use crate::source::record_text;
use csv::StringRecord;

/// Characters that would change the shape of the URL if left in a segment.
const RESERVED: [char; 3] = ['/', '?', '#'];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeoRecord {
    pub country: String,
    pub state: String,
    pub city: Option<String>,
}

impl GeoRecord {
    pub fn new(country: &str, state: &str, city: Option<&str>) -> Self {
        Self {
            country: country.to_string(),
            state: state.to_string(),
            city: city.map(str::to_string),
        }
    }
}

impl TryFrom<&StringRecord> for GeoRecord {
    type Error = CandidateRejected;

    fn try_from(record: &StringRecord) -> Result<Self, Self::Error> {
        let fields: Vec<&str> = record.iter().map(str::trim).collect();
        if fields.iter().any(|f| f.is_empty()) {
            return Err(CandidateRejected::MalformedGeoRecord(
                record_text(record).into_owned(),
            ));
        }

        match fields.as_slice() {
            [country, state] => Ok(GeoRecord::new(country, state, None)),
            [country, state, city] => Ok(GeoRecord::new(country, state, Some(*city))),
            _ => Err(CandidateRejected::MalformedGeoRecord(
                record_text(record).into_owned(),
            )),
        }
    }
}

/// Lower-case a path segment and join inner whitespace with `-`.
///
/// Empty segments and segments holding `/`, `?` or `#` are rejected.
pub fn slug(segment: &str) -> Result<String, CandidateRejected> {
    if segment.contains(RESERVED) {
        return Err(CandidateRejected::ReservedCharacter(segment.to_string()));
    }
    let slug = segment
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase();
    if slug.is_empty() {
        return Err(CandidateRejected::EmptyComponent("path segment"));
    }
    Ok(slug)
}
