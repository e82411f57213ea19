//! Compact string transport for embedding a game or its stats in a URL:
//! JSON, gzip, base64, then a URL-safe character substitution. Pure
//! in-memory transforms with no I/O.

use std::io::{Read, Write};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::result::{Error, Result};

pub fn encode<T: Serialize>(value: &T) -> Result<String> {
    let json = serde_json::to_vec(value).map_err(|err| Error::Encode(err.to_string()))?;
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(&json)
        .map_err(|err| Error::Encode(err.to_string()))?;
    let compressed = encoder
        .finish()
        .map_err(|err| Error::Encode(err.to_string()))?;
    let encoded = STANDARD.encode(compressed);
    Ok(encoded
        .replace('+', ".")
        .replace('/', "_")
        .replace('=', "-"))
}

pub fn decode<T: DeserializeOwned>(data: &str) -> Result<T> {
    let restored = data.replace('.', "+").replace('_', "/").replace('-', "=");
    let compressed = STANDARD
        .decode(restored)
        .map_err(|err| Error::Decode(err.to_string()))?;
    let mut json = Vec::new();
    GzDecoder::new(compressed.as_slice())
        .read_to_end(&mut json)
        .map_err(|err| Error::Decode(err.to_string()))?;
    serde_json::from_slice(&json).map_err(|err| Error::Decode(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Game;
    use crate::parser::tests::load_sample;
    use crate::stats::Stats;

    #[test]
    fn game_round_trips() {
        let (_, game) = load_sample();
        let encoded = encode(&game).unwrap();
        // URL-safe: none of the standard alphabet's special characters.
        assert!(!encoded.contains('+') && !encoded.contains('/') && !encoded.contains('='));
        let decoded: Game = decode(&encoded).unwrap();
        assert_eq!(decoded, game);
    }

    #[test]
    fn stats_round_trip() {
        let (_, game) = load_sample();
        let stats = Stats::of(&game);
        let decoded: Stats = decode(&encode(&stats).unwrap()).unwrap();
        assert_eq!(decoded, stats);
    }

    #[test]
    fn corrupt_data_is_a_decode_error() {
        for data in ["", "!!!", "AAAA", "not base64 at all"] {
            let result: Result<Game> = decode(data);
            assert!(matches!(result, Err(Error::Decode(_))), "data {data:?}");
        }
    }
}
