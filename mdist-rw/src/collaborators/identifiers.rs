//! WUPC and ISRC generation

use chrono::Datelike;
use mdist_common::time;
use rand::Rng;

use super::IdentifierGenerator;

/// GS1 prefix reserved for in-store numbering
const WUPC_PREFIX: char = '2';

/// GTIN check digit for a 12-digit body
///
/// Weights alternate 1 and 3 from the left.
pub fn gtin_check_digit(body: &str) -> Option<u32> {
    let mut sum = 0;
    for (index, c) in body.chars().enumerate() {
        let digit = c.to_digit(10)?;
        sum += if index % 2 == 0 { digit } else { digit * 3 };
    }
    Some((10 - sum % 10) % 10)
}

/// Random identifiers with a fixed ISRC registrant code
#[derive(Debug, Clone)]
pub struct RandomIdentifierGenerator {
    isrc_registrant: String,
}

impl RandomIdentifierGenerator {
    /// `isrc_registrant` is the 5-character country and registrant code
    pub fn new(isrc_registrant: impl Into<String>) -> Self {
        Self {
            isrc_registrant: isrc_registrant.into().to_ascii_uppercase(),
        }
    }
}

impl IdentifierGenerator for RandomIdentifierGenerator {
    fn generate_wupc(&self) -> String {
        let mut rng = rand::thread_rng();
        let mut body = String::with_capacity(13);
        body.push(WUPC_PREFIX);
        for _ in 0..11 {
            body.push(char::from(b'0' + rng.gen_range(0..10u8)));
        }
        let check = gtin_check_digit(&body).unwrap_or(0);
        body.push_str(&check.to_string());
        body
    }

    fn generate_isrc(&self) -> String {
        let year = time::now().year() % 100;
        let designation: u32 = rand::thread_rng().gen_range(0..100_000);
        format!("{}{:02}{:05}", self.isrc_registrant, year, designation)
    }
}
