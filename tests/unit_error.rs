use std::path::PathBuf;

use fulid::error::{exit_codes, Error};

#[test]
fn exit_codes_map_correctly() {
    let user = Error::InvalidArgument("bad".to_string());
    assert_eq!(user.exit_code(), exit_codes::USER_ERROR);

    let missing = Error::NotFound("zz".to_string());
    assert_eq!(missing.exit_code(), exit_codes::USER_ERROR);

    let exhausted = Error::SequenceExhausted(10_000_000);
    assert_eq!(exhausted.exit_code(), exit_codes::OPERATION_FAILED);

    let lock = Error::LockFailed(PathBuf::from("ledger.lock"));
    assert_eq!(lock.exit_code(), exit_codes::OPERATION_FAILED);
}

#[test]
fn invalid_character_carries_details() {
    let err = Error::InvalidCharacter {
        character: '7',
        input: "AAAAAA7".to_string(),
    };
    assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
    assert!(err.to_string().contains("Invalid character '7'"));

    let details = err.details().expect("details");
    assert_eq!(details["character"], "7");
    assert_eq!(details["input"], "AAAAAA7");
}

#[test]
fn variants_without_details_omit_them() {
    assert!(Error::InvalidId("too short".to_string()).details().is_none());
    assert!(Error::SequenceExhausted(1).details().is_none());
}
