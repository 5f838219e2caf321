//! Friendly ULIDs.
//!
//! A fulid is 26 characters long and made of three segments:
//!
//! ```text
//! 01DWF3DM7E   H40BTYB4S   AAAAAAA
//! |--time--|   |random-|   |-seq-|
//!    10            9          7
//! ```
//!
//! The time segment is the Crockford base32 timestamp of a ULID. The
//! randomness and sequence segments only use characters of the configured
//! [`Alphabet`], so every character after the time segment is easy to type.
//! The sequence segment continues from a previous fulid chosen by the caller.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::alphabet::{Alphabet, SEQUENCE_LEN};
use crate::error::{Error, Result};

/// Length of the ULID timestamp prefix.
pub const TIME_LEN: usize = 10;

/// Length of the randomness segment.
pub const RANDOMNESS_LEN: usize = 9;

/// Total length of a fulid.
pub const FULID_LEN: usize = TIME_LEN + RANDOMNESS_LEN + SEQUENCE_LEN;

const ZERO_RANDOMNESS: &str = "0000000000000000";

/// A full identifier, stored uppercase.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Fulid(String);

impl Fulid {
    /// Parse and check every segment against `alphabet`.
    pub fn parse_with(value: &str, alphabet: &Alphabet) -> Result<Self> {
        let fulid: Fulid = value.parse()?;
        for ch in fulid.0[TIME_LEN..].chars() {
            alphabet.index_of(ch).map_err(|_| Error::InvalidCharacter {
                character: ch,
                input: fulid.0.clone(),
            })?;
        }
        Ok(fulid)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The 10 character time segment.
    pub fn time(&self) -> &str {
        &self.0[..TIME_LEN]
    }

    /// The 9 character randomness segment, verbatim.
    pub fn randomness(&self) -> &str {
        &self.0[TIME_LEN..TIME_LEN + RANDOMNESS_LEN]
    }

    /// The 7 character sequence segment, verbatim.
    pub fn sequence(&self) -> &str {
        &self.0[TIME_LEN + RANDOMNESS_LEN..]
    }

    /// Decoded value of the sequence segment.
    pub fn sequence_value(&self, alphabet: &Alphabet) -> Result<u64> {
        alphabet.decode(self.sequence())
    }

    /// Milliseconds since the Unix epoch captured in the time segment.
    pub fn timestamp_ms(&self) -> u64 {
        // The time segment was validated on construction.
        decode_time_segment(self.time()).unwrap_or_default()
    }

    /// Capture time of the identifier.
    pub fn timestamp(&self) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp_millis(self.timestamp_ms() as i64).unwrap_or_default()
    }
}

impl FromStr for Fulid {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        if trimmed.chars().count() != FULID_LEN || !trimmed.is_ascii() {
            return Err(Error::InvalidId(format!(
                "'{trimmed}' is not a {FULID_LEN} character identifier"
            )));
        }
        let upper = trimmed.to_ascii_uppercase();
        decode_time_segment(&upper[..TIME_LEN])?;
        Ok(Self(upper))
    }
}

impl TryFrom<String> for Fulid {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Fulid> for String {
    fn from(value: Fulid) -> Self {
        value.0
    }
}

impl AsRef<str> for Fulid {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fulid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn decode_time_segment(time: &str) -> Result<u64> {
    // 48 bit timestamps never start above '7'.
    if time.as_bytes().first().is_some_and(|first| *first > b'7') {
        return Err(Error::InvalidId(format!("time segment '{time}' overflows")));
    }
    let ulid = Ulid::from_string(&format!("{time}{ZERO_RANDOMNESS}"))
        .map_err(|err| Error::InvalidId(format!("bad time segment '{time}': {err}")))?;
    Ok(ulid.timestamp_ms())
}

/// Mints fulids over one alphabet.
#[derive(Debug, Clone, Default)]
pub struct FulidGenerator {
    alphabet: Alphabet,
}

impl FulidGenerator {
    pub fn new(alphabet: Alphabet) -> Self {
        Self { alphabet }
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Mint a fulid for the current time.
    ///
    /// With no `previous` the sequence starts at zero; otherwise it is one
    /// more than the sequence of `previous`.
    pub fn generate(&self, previous: Option<&Fulid>) -> Result<Fulid> {
        let now = Ulid::new().timestamp_ms();
        self.generate_with(&mut rand::thread_rng(), now, previous)
    }

    /// Mint a fulid from an explicit random source and timestamp.
    pub fn generate_with<R: Rng>(
        &self,
        rng: &mut R,
        timestamp_ms: u64,
        previous: Option<&Fulid>,
    ) -> Result<Fulid> {
        let sequence = self.next_sequence(previous)?;

        let mut id = String::with_capacity(FULID_LEN);
        let time = Ulid::from_parts(timestamp_ms, 0).to_string();
        id.push_str(&time[..TIME_LEN]);
        for _ in 0..RANDOMNESS_LEN {
            id.push(self.alphabet.symbol_at(rng.gen_range(0..self.alphabet.base())));
        }
        id.push_str(&self.alphabet.encode(sequence, Some(SEQUENCE_LEN)));

        tracing::debug!(id = %id, sequence, "minted fulid");
        Ok(Fulid(id))
    }

    fn next_sequence(&self, previous: Option<&Fulid>) -> Result<u64> {
        let Some(previous) = previous else {
            return Ok(0);
        };
        let next = previous.sequence_value(&self.alphabet)? + 1;
        if next >= self.alphabet.sequence_capacity() {
            return Err(Error::SequenceExhausted(next));
        }
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const FIRST: &str = "01DW02J8WWJNB109DA0AAAAAAA";

    fn generator() -> FulidGenerator {
        FulidGenerator::default()
    }

    #[test]
    fn generates_full_length_ids() {
        let id = generator().generate(None).unwrap();
        assert_eq!(id.as_str().len(), FULID_LEN);
    }

    #[test]
    fn randomness_and_sequence_use_the_alphabet() {
        let gen = generator();
        let id = gen.generate(None).unwrap();
        for ch in id.randomness().chars().chain(id.sequence().chars()) {
            assert!(ch.is_ascii_uppercase());
            assert!(gen.alphabet().contains(ch), "{ch} not in alphabet");
        }
    }

    #[test]
    fn first_in_stream_has_zero_sequence() {
        let id = generator().generate(None).unwrap();
        assert_eq!(id.sequence(), "AAAAAAA");
    }

    #[test]
    fn continues_sequence_from_previous() {
        let previous: Fulid = FIRST.parse().unwrap();
        let id = generator().generate(Some(&previous)).unwrap();
        assert_eq!(id.sequence(), "AAAAAAS");
    }

    #[test]
    fn previous_with_foreign_sequence_propagates_error() {
        let previous: Fulid = "01DW02J8WWJNB109DA0AAAAAA7".parse().unwrap();
        let err = generator().generate(Some(&previous)).expect_err("corrupt");
        assert!(matches!(err, Error::InvalidCharacter { character: '7', .. }));
    }

    #[test]
    fn exhausted_sequence_is_an_error() {
        let previous: Fulid = "01DW02J8WWJNB109DA0RRRRRRR".parse().unwrap();
        let err = generator().generate(Some(&previous)).expect_err("exhausted");
        assert!(matches!(err, Error::SequenceExhausted(10_000_000)));
    }

    #[test]
    fn same_millisecond_sequences_increase() {
        let gen = FulidGenerator::new(Alphabet::new("abcdefgh", "").unwrap());
        let mut rng = StdRng::seed_from_u64(7);
        let mut previous = gen.generate_with(&mut rng, 1_572_000_000_000, None).unwrap();
        for _ in 0..50 {
            let next = gen
                .generate_with(&mut rng, 1_572_000_000_000, Some(&previous))
                .unwrap();
            assert_eq!(
                next.sequence_value(gen.alphabet()).unwrap(),
                previous.sequence_value(gen.alphabet()).unwrap() + 1
            );
            assert_eq!(next.time(), previous.time());
            assert!(next.sequence() > previous.sequence());
            previous = next;
        }
    }

    #[test]
    fn seeded_generation_is_deterministic() {
        let gen = generator();
        let a = gen
            .generate_with(&mut StdRng::seed_from_u64(1), 1_572_000_000_000, None)
            .unwrap();
        let b = gen
            .generate_with(&mut StdRng::seed_from_u64(1), 1_572_000_000_000, None)
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn accessors_split_segments() {
        let id: Fulid = FIRST.parse().unwrap();
        assert_eq!(id.time(), "01DW02J8WW");
        assert_eq!(id.randomness(), "JNB109DA0");
        assert_eq!(id.sequence(), "AAAAAAA");
        assert_eq!(id.sequence_value(&Alphabet::default()).unwrap(), 0);
    }

    #[test]
    fn timestamp_round_trips_through_time_segment() {
        let id = generator()
            .generate_with(&mut StdRng::seed_from_u64(3), 1_572_000_123_456, None)
            .unwrap();
        assert_eq!(id.timestamp_ms(), 1_572_000_123_456);
        assert_eq!(id.timestamp().timestamp_millis(), 1_572_000_123_456);
    }

    #[test]
    fn parse_normalizes_case_and_rejects_garbage() {
        let id: Fulid = FIRST.to_lowercase().parse().unwrap();
        assert_eq!(id.as_str(), FIRST);

        assert!(matches!("short".parse::<Fulid>(), Err(Error::InvalidId(_))));
        assert!(matches!(
            "ZZDW02J8WWJNB109DA0AAAAAAA".parse::<Fulid>(),
            Err(Error::InvalidId(_))
        ));
        assert!(matches!(
            "0#DW02J8WWJNB109DA0AAAAAAA".parse::<Fulid>(),
            Err(Error::InvalidId(_))
        ));
    }

    #[test]
    fn parse_with_checks_alphabet() {
        let alphabet = Alphabet::default();
        assert!(Fulid::parse_with("01DWF3DM7EASDFGHJWEAAAAAAA", &alphabet).is_ok());
        let err = Fulid::parse_with(FIRST, &alphabet).expect_err("digits in randomness");
        assert!(matches!(err, Error::InvalidCharacter { .. }));
    }

    #[test]
    fn serde_is_transparent_string() {
        let id: Fulid = FIRST.parse().unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{FIRST}\""));
        let back: Fulid = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
