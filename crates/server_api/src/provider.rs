//! Address providers behind the lookup endpoint.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use sha2::{Digest, Sha256};
use shared::domain::CandidateAddress;

#[async_trait]
pub trait AddressProvider: Send + Sync {
    /// Candidates for an already validated postcode and street number, in
    /// the order they should be shown.
    async fn find(&self, postcode: &str, street_number: &str) -> Result<Vec<CandidateAddress>>;
}

const STREETS: &[&str] = &[
    "Keizersgracht",
    "Prinsengracht",
    "Herengracht",
    "Singel",
    "Damrak",
    "Rokin",
    "Kalverstraat",
    "Spuistraat",
];

const CITIES: &[(&str, f64, f64)] = &[
    ("Amsterdam", 52.3676, 4.9041),
    ("Rotterdam", 51.9244, 4.4777),
    ("Utrecht", 52.0907, 5.1214),
    ("Den Haag", 52.0705, 4.3007),
    ("Eindhoven", 51.4416, 5.4697),
];

/// Deterministic stand-in for a real address API.
///
/// The same postcode and street number always yield the same one to three
/// candidates. Street number zero has no addresses.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockAddressProvider;

#[async_trait]
impl AddressProvider for MockAddressProvider {
    async fn find(&self, postcode: &str, street_number: &str) -> Result<Vec<CandidateAddress>> {
        Ok(mock_addresses(postcode, street_number))
    }
}

pub fn mock_addresses(postcode: &str, street_number: &str) -> Vec<CandidateAddress> {
    if street_number.trim_start_matches('0').is_empty() {
        return Vec::new();
    }

    let seed = Sha256::digest(format!("{postcode}:{street_number}").as_bytes());
    let count = 1 + usize::from(seed[0]) % 3;
    let (city, base_lat, base_lon) = CITIES[usize::from(seed[1]) % CITIES.len()];

    (0..count)
        .map(|index| {
            let digest = Sha256::digest(format!("{postcode}:{street_number}:{index}").as_bytes());
            CandidateAddress {
                id: URL_SAFE_NO_PAD.encode(&digest[..9]),
                postcode: postcode.to_string(),
                street: STREETS[usize::from(digest[0]) % STREETS.len()].to_string(),
                house_number: street_number.to_string(),
                city: city.to_string(),
                lat: jitter(base_lat, digest[1]),
                lon: jitter(base_lon, digest[2]),
            }
        })
        .collect()
}

fn jitter(base: f64, byte: u8) -> f64 {
    let offset = (f64::from(byte) - 128.0) / 10_000.0;
    ((base + offset) * 10_000.0).round() / 10_000.0
}

/// Serves candidates from a JSON array of addresses on disk.
#[derive(Debug, Clone)]
pub struct JsonFixtureProvider {
    addresses: Vec<CandidateAddress>,
}

impl JsonFixtureProvider {
    pub fn new(addresses: Vec<CandidateAddress>) -> Self {
        Self { addresses }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read fixtures '{}'", path.display()))?;
        let addresses = serde_json::from_str(&raw)
            .with_context(|| format!("fixtures '{}' are not a JSON address list", path.display()))?;
        Ok(Self::new(addresses))
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }
}

#[async_trait]
impl AddressProvider for JsonFixtureProvider {
    async fn find(&self, postcode: &str, street_number: &str) -> Result<Vec<CandidateAddress>> {
        Ok(self
            .addresses
            .iter()
            .filter(|a| a.postcode == postcode && a.house_number == street_number)
            .cloned()
            .collect())
    }
}
