//! Machine Readable Zone handling for TD3 passports
//!
//! - `locator`: gets the two MRZ lines from an OCR provider
//! - `parser`: fixed-column field extraction and check digit evaluation
//! - `checksum`: the ICAO 9303 weighted modulo-10 check digit
//! - `score`: aggregate validity score and acceptance threshold

pub mod checksum;
pub mod locator;
pub mod parser;
pub mod score;

pub use checksum::CheckDigit;
pub use locator::{locate_mrz, mrz_band_height, mrz_candidate_lines};
pub use parser::parse_and_validate;
pub use score::{CheckOutcome, ScorePolicy};
