//! Date and time serializers.
//!
//! Instants and date-times are encoded as an 8-byte integer count of
//! milliseconds since the Unix epoch; dates as an 8-byte day count since the
//! same epoch. Values are normalized to UTC on encode and assumed UTC on
//! decode — converting to and from other zones is the caller's job.

use alloc::format;
use core::marker::PhantomData;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};

use super::{
    Serializer,
    primitive::{BigEndian, ByteOrder, I64Serializer},
};
use crate::{ByteBuf, CodecError};

/// Day number of 1970-01-01 in the proleptic Gregorian calendar used by
/// [Datelike::num_days_from_ce].
const EPOCH_DAYS_FROM_CE: i64 = 719_163;

// INSTANT
// ================================================================================================

/// Serializer for UTC instants as 8-byte epoch milliseconds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InstantSerializer<E: ByteOrder = BigEndian>(PhantomData<E>);

impl<E: ByteOrder> InstantSerializer<E> {
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<E: ByteOrder> Serializer<DateTime<Utc>> for InstantSerializer<E> {
    fn encode(&self, value: &DateTime<Utc>, target: &mut ByteBuf) -> Result<(), CodecError> {
        I64Serializer::<E>::new().encode(&value.timestamp_millis(), target)
    }

    fn decode(&self, source: &mut ByteBuf) -> Result<DateTime<Utc>, CodecError> {
        let millis = I64Serializer::<E>::new().decode(source)?;
        DateTime::from_timestamp_millis(millis).ok_or_else(|| {
            CodecError::InvalidValue(format!("{millis} ms is outside the representable instant range"))
        })
    }
}

// DATE-TIME
// ================================================================================================

/// Serializer for naive date-times, interpreted as UTC, as 8-byte epoch
/// milliseconds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DateTimeSerializer<E: ByteOrder = BigEndian>(PhantomData<E>);

impl<E: ByteOrder> DateTimeSerializer<E> {
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<E: ByteOrder> Serializer<NaiveDateTime> for DateTimeSerializer<E> {
    fn encode(&self, value: &NaiveDateTime, target: &mut ByteBuf) -> Result<(), CodecError> {
        I64Serializer::<E>::new().encode(&value.and_utc().timestamp_millis(), target)
    }

    fn decode(&self, source: &mut ByteBuf) -> Result<NaiveDateTime, CodecError> {
        InstantSerializer::<E>::new().decode(source).map(|instant| instant.naive_utc())
    }
}

// DATE
// ================================================================================================

/// Serializer for calendar dates as an 8-byte count of days since
/// 1970-01-01.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DateSerializer<E: ByteOrder = BigEndian>(PhantomData<E>);

impl<E: ByteOrder> DateSerializer<E> {
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<E: ByteOrder> Serializer<NaiveDate> for DateSerializer<E> {
    fn encode(&self, value: &NaiveDate, target: &mut ByteBuf) -> Result<(), CodecError> {
        let days = i64::from(value.num_days_from_ce()) - EPOCH_DAYS_FROM_CE;
        I64Serializer::<E>::new().encode(&days, target)
    }

    fn decode(&self, source: &mut ByteBuf) -> Result<NaiveDate, CodecError> {
        let days = I64Serializer::<E>::new().decode(source)?;
        days.checked_add(EPOCH_DAYS_FROM_CE)
            .and_then(|ce| i32::try_from(ce).ok())
            .and_then(NaiveDate::from_num_days_from_ce_opt)
            .ok_or_else(|| {
                CodecError::InvalidValue(format!(
                    "{days} days from epoch is outside the representable date range"
                ))
            })
    }
}

// TESTS
// ================================================================================================

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::super::primitive::LittleEndian;
    use super::*;

    #[test]
    fn instant_layout_is_epoch_millis() {
        let millis = 1_234_567_890_123i64;
        let value = DateTime::from_timestamp_millis(millis).unwrap();

        let be = InstantSerializer::<BigEndian>::new();
        assert_eq!(be.encode_to_vec(&value).unwrap(), millis.to_be_bytes());

        let le = InstantSerializer::<LittleEndian>::new();
        assert_eq!(le.encode_to_vec(&value).unwrap(), millis.to_le_bytes());
    }

    #[test]
    fn instant_round_trip() {
        let ser = InstantSerializer::<BigEndian>::new();
        for millis in [0i64, 1, -1, 1_700_000_000_000, -62_135_596_800_000] {
            let value = DateTime::from_timestamp_millis(millis).unwrap();
            let bytes = ser.encode_to_vec(&value).unwrap();
            assert_eq!(ser.decode_from_slice(&bytes).unwrap(), value);
        }
    }

    #[test]
    fn instant_rejects_out_of_range_millis() {
        let ser = InstantSerializer::<BigEndian>::new();
        assert_matches!(
            ser.decode_from_slice(&i64::MAX.to_be_bytes()),
            Err(CodecError::InvalidValue(_))
        );
    }

    #[test]
    fn date_time_round_trip() {
        let ser = DateTimeSerializer::<BigEndian>::new();
        let value = DateTime::from_timestamp_millis(1_234_567_890_123).unwrap().naive_utc();
        let bytes = ser.encode_to_vec(&value).unwrap();
        assert_eq!(bytes.len(), 8);
        assert_eq!(ser.decode_from_slice(&bytes).unwrap(), value);
    }

    #[test]
    fn date_layout_is_epoch_days() {
        let ser = DateSerializer::<BigEndian>::new();
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
        assert_eq!(ser.encode_to_vec(&epoch).unwrap(), 0i64.to_be_bytes());

        let next = NaiveDate::from_ymd_opt(1970, 1, 2).unwrap();
        assert_eq!(ser.encode_to_vec(&next).unwrap(), 1i64.to_be_bytes());

        let prev = NaiveDate::from_ymd_opt(1969, 12, 31).unwrap();
        assert_eq!(ser.encode_to_vec(&prev).unwrap(), (-1i64).to_be_bytes());
    }

    #[test]
    fn date_round_trip() {
        let ser = DateSerializer::<LittleEndian>::new();
        for (y, m, d) in [(1970, 1, 1), (2024, 2, 29), (1066, 10, 14), (9999, 12, 31)] {
            let value = NaiveDate::from_ymd_opt(y, m, d).unwrap();
            let bytes = ser.encode_to_vec(&value).unwrap();
            assert_eq!(ser.decode_from_slice(&bytes).unwrap(), value);
        }
    }

    #[test]
    fn date_rejects_out_of_range_days() {
        let ser = DateSerializer::<BigEndian>::new();
        assert_matches!(
            ser.decode_from_slice(&i64::MAX.to_be_bytes()),
            Err(CodecError::InvalidValue(_))
        );
    }
}
