use thiserror::Error;

/// Which side of a curve a lookup went through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    Offset,
    Value,
}

impl std::fmt::Display for Lookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Lookup::Offset => f.write_str("offset"),
            Lookup::Value => f.write_str("value"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DistributionError {
    #[error("a piecewise distribution needs at least two checkpoints, got {count}")]
    EmptyInput { count: usize },
    #[error(
        "values must always increase with offset: checkpoint ({offset}, {value}) \
         is followed by ({next_offset}, {next_value})"
    )]
    DecreasingValue {
        offset: f32,
        value: f32,
        next_offset: f32,
        next_value: f32,
    },
    #[error("two checkpoints share offset {offset}")]
    DuplicateOffset { offset: f32 },
    #[error("checkpoint ({offset}, {value}) is not finite")]
    NonFinite { offset: f32, value: f32 },
    #[error("the first slice must start at {expected}, got {position}")]
    FirstValueNotZero { position: f32, expected: f32 },
    #[error("slice position {position} is outside {start}..={end}")]
    OutOfRange { position: f32, start: f32, end: f32 },
    #[error("slice at {position} overlaps the previous slice at {previous}")]
    OverlappingRange { position: f32, previous: f32 },
    #[error("sensitivity {sensitivity} at {position} must be finite and positive")]
    InvalidSensitivity { sensitivity: f32, position: f32 },
    #[error("offset domain {start}..={end} must be finite and non-empty")]
    InvalidDomain { start: f32, end: f32 },
    #[error("no segment covers {lookup} {input}")]
    NoSegment { lookup: Lookup, input: f32 },
}
