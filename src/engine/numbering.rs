// ==========================================
// Recycling transport planning - numbering
// ==========================================
// Formats counter values into human-facing numbers.
// Counters themselves live in SequenceRepository.
// ==========================================

use thiserror::Error;

/// Digits of the processor id prefix
pub const PROCESSOR_ID_LEN: usize = 5;
/// Digits of the waste stream counter suffix
pub const WASTE_STREAM_COUNTER_LEN: usize = 7;
pub const WASTE_STREAM_COUNTER_MAX: i64 = 9_999_999;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NumberingError {
    #[error("Invalid processor id: {0}")]
    InvalidProcessorId(String),

    #[error("Waste stream counter exhausted for processor {0}")]
    SequenceExhausted(String),

    #[error("Invalid counter value: {0}")]
    InvalidCounter(i64),
}

/// Transport display number `{YY}-{NNNNNN}`
///
/// Counters past 999999 keep their full width.
pub fn format_transport_number(pickup_year: i32, counter: i64) -> Result<String, NumberingError> {
    if counter < 1 {
        return Err(NumberingError::InvalidCounter(counter));
    }
    Ok(format!("{:02}-{:06}", pickup_year.rem_euclid(100), counter))
}

pub fn is_valid_processor_id(processor_id: &str) -> bool {
    processor_id.len() == PROCESSOR_ID_LEN && processor_id.chars().all(|c| c.is_ascii_digit())
}

/// Waste stream number: processor id + 7 digit counter (12 digits total)
pub fn format_waste_stream_number(processor_id: &str, counter: i64) -> Result<String, NumberingError> {
    if !is_valid_processor_id(processor_id) {
        return Err(NumberingError::InvalidProcessorId(processor_id.to_string()));
    }
    if counter < 1 {
        return Err(NumberingError::InvalidCounter(counter));
    }
    if counter > WASTE_STREAM_COUNTER_MAX {
        return Err(NumberingError::SequenceExhausted(processor_id.to_string()));
    }
    Ok(format!(
        "{}{:0width$}",
        processor_id,
        counter,
        width = WASTE_STREAM_COUNTER_LEN
    ))
}

pub fn is_valid_waste_stream_number(number: &str) -> bool {
    number.len() == PROCESSOR_ID_LEN + WASTE_STREAM_COUNTER_LEN
        && number.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_number() {
        assert_eq!(format_transport_number(2026, 42).unwrap(), "26-000042");
        assert_eq!(format_transport_number(2009, 1).unwrap(), "09-000001");
        assert_eq!(format_transport_number(2026, 1_234_567).unwrap(), "26-1234567");
        assert!(format_transport_number(2026, 0).is_err());
    }

    #[test]
    fn test_waste_stream_number() {
        let number = format_waste_stream_number("08797", 1).unwrap();
        assert_eq!(number, "087970000001");
        assert!(is_valid_waste_stream_number(&number));

        let last = format_waste_stream_number("08797", WASTE_STREAM_COUNTER_MAX).unwrap();
        assert_eq!(last, "087979999999");
        assert!(number < last);
    }

    #[test]
    fn test_waste_stream_number_rejects() {
        assert_eq!(
            format_waste_stream_number("8797", 1),
            Err(NumberingError::InvalidProcessorId("8797".to_string()))
        );
        assert_eq!(
            format_waste_stream_number("08797", WASTE_STREAM_COUNTER_MAX + 1),
            Err(NumberingError::SequenceExhausted("08797".to_string()))
        );
        assert!(!is_valid_waste_stream_number("08797000001a"));
    }
}
