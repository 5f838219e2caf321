//! Stateless identifier commands: new, inspect, encode, decode.

use crate::error::{Error, Result};
use crate::fulid::{Fulid, FulidGenerator, FULID_LEN};
use crate::output::{emit_success, HumanOutput};

use super::Context;

#[derive(serde::Serialize)]
struct NewReport {
    id: Fulid,
    sequence: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    previous: Option<Fulid>,
}

#[derive(serde::Serialize)]
struct InspectReport {
    id: Fulid,
    timestamp: chrono::DateTime<chrono::Utc>,
    randomness: String,
    sequence: String,
    sequence_value: u64,
}

#[derive(serde::Serialize)]
struct EncodeReport {
    number: u64,
    encoded: String,
}

#[derive(serde::Serialize)]
struct DecodeReport {
    text: String,
    number: u64,
}

pub fn run_new(context: &Context, previous: Option<&str>) -> Result<()> {
    let alphabet = context.config.alphabet()?;
    // Only the sequence segment of `previous` has to be in the alphabet.
    let previous = previous.map(str::parse::<Fulid>).transpose()?;
    let generator = FulidGenerator::new(alphabet);
    let id = generator.generate(previous.as_ref())?;
    let sequence = id.sequence_value(generator.alphabet())?;

    let mut human = HumanOutput::new("");
    human.push_row(id.to_string());

    let report = NewReport {
        id,
        sequence,
        previous,
    };
    emit_success(context.output, "new", &report, Some(&human))
}

pub fn run_inspect(context: &Context, input: &str) -> Result<()> {
    let alphabet = context.config.alphabet()?;
    let id = Fulid::parse_with(input, &alphabet)?;
    let report = InspectReport {
        timestamp: id.timestamp(),
        randomness: id.randomness().to_string(),
        sequence: id.sequence().to_string(),
        sequence_value: id.sequence_value(&alphabet)?,
        id,
    };

    let mut human = HumanOutput::new(report.id.to_string());
    human.push_summary("timestamp", report.timestamp.to_rfc3339());
    human.push_summary("randomness", report.randomness.clone());
    human.push_summary(
        "sequence",
        format!("{} ({})", report.sequence, report.sequence_value),
    );

    emit_success(context.output, "inspect", &report, Some(&human))
}

pub fn run_encode(context: &Context, number: u64, pad: Option<usize>) -> Result<()> {
    if let Some(width) = pad.filter(|width| *width > FULID_LEN) {
        return Err(Error::InvalidArgument(format!(
            "--pad {width} is wider than an identifier ({FULID_LEN} characters)"
        )));
    }
    let encoded = context.config.alphabet()?.encode(number, pad);

    let mut human = HumanOutput::new("");
    human.push_row(encoded.clone());

    let report = EncodeReport { number, encoded };
    emit_success(context.output, "encode", &report, Some(&human))
}

pub fn run_decode(context: &Context, text: &str) -> Result<()> {
    let number = context.config.alphabet()?.decode(text.trim())?;

    let mut human = HumanOutput::new("");
    human.push_row(number.to_string());

    let report = DecodeReport {
        text: text.trim().to_string(),
        number,
    };
    emit_success(context.output, "decode", &report, Some(&human))
}
