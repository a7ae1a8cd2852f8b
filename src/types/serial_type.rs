use crate::types::{SerialCode, error::DatabaseError};

/// Storage class and width of one record column.
///
/// | code          | class   | width       |
/// |---------------|---------|-------------|
/// | 0             | Null    | 0           |
/// | 1..=4         | IntN    | 1, 2, 3, 4  |
/// | 5             | Int48   | 6           |
/// | 6             | Int64   | 8           |
/// | 7             | Float64 | 8           |
/// | 8, 9          | 0 / 1   | 0           |
/// | 10, 11        | reserved               |
/// | N >= 12 even  | Blob    | (N - 12) / 2 |
/// | N >= 13 odd   | Text    | (N - 13) / 2 |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerialType {
    Null,
    Int8,
    Int16,
    Int24,
    Int32,
    Int48,
    Int64,
    Float64,
    Zero,
    One,
    Blob(usize),
    Text(usize),
}

impl SerialType {
    pub fn resolve(code: SerialCode) -> Result<Self, DatabaseError> {
        match code {
            0 => Ok(Self::Null),
            1 => Ok(Self::Int8),
            2 => Ok(Self::Int16),
            3 => Ok(Self::Int24),
            4 => Ok(Self::Int32),
            5 => Ok(Self::Int48),
            6 => Ok(Self::Int64),
            7 => Ok(Self::Float64),
            8 => Ok(Self::Zero),
            9 => Ok(Self::One),
            10 | 11 => Err(DatabaseError::ReservedSerialType(code)),
            n if n % 2 == 0 => Ok(Self::Blob(body_len(n, 12)?)),
            n => Ok(Self::Text(body_len(n, 13)?)),
        }
    }

    /// Number of body bytes the column occupies.
    pub fn width(&self) -> usize {
        match *self {
            Self::Null | Self::Zero | Self::One => 0,
            Self::Int8 => 1,
            Self::Int16 => 2,
            Self::Int24 => 3,
            Self::Int32 => 4,
            Self::Int48 => 6,
            Self::Int64 | Self::Float64 => 8,
            Self::Blob(len) | Self::Text(len) => len,
        }
    }

    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            Self::Int8 | Self::Int16 | Self::Int24 | Self::Int32 | Self::Int48 | Self::Int64
        )
    }
}

fn body_len(code: SerialCode, base: SerialCode) -> Result<usize, DatabaseError> {
    usize::try_from((code - base) / 2).map_err(|_| DatabaseError::MalformedHeader {
        reason: format!("serial code {} is wider than this platform can address", code),
    })
}
