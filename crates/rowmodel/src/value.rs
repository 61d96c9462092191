//! Cell values for table models.
//!
//! [`CellValue`] is the type-erased container a model hands to its view for
//! each cell. It covers the common scalar and string cases directly and
//! falls back to `Any` for application-specific payloads.

use std::any::Any;
use std::fmt;

/// Type-erased container for one table cell.
///
/// `CellValue::None` renders as the empty string, which doubles as the
/// masked-failure sentinel for accessor dispatch (see
/// [`DispatchPolicy`](crate::DispatchPolicy)).
///
/// # Example
///
/// ```
/// use rowmodel::CellValue;
///
/// let value = CellValue::from("Ann");
/// assert_eq!(value.as_str(), Some("Ann"));
///
/// let value = CellValue::from(30u32);
/// assert_eq!(value.as_int(), Some(30));
/// assert_eq!(value.to_string(), "30");
/// ```
#[derive(Debug, Default)]
pub enum CellValue {
    /// No data. Displays as the empty string.
    #[default]
    None,
    /// String data.
    String(String),
    /// Integer data. `From` conversions from unsigned sources saturate at
    /// `i64::MAX`.
    Int(i64),
    /// Floating point data.
    Float(f64),
    /// Boolean data.
    Bool(bool),
    /// Custom data (type-erased).
    Custom(Box<dyn Any + Send + Sync>),
}

impl Clone for CellValue {
    fn clone(&self) -> Self {
        match self {
            CellValue::None => CellValue::None,
            CellValue::String(s) => CellValue::String(s.clone()),
            CellValue::Int(n) => CellValue::Int(*n),
            CellValue::Float(n) => CellValue::Float(*n),
            CellValue::Bool(b) => CellValue::Bool(*b),
            // Custom data cannot be cloned; becomes None
            CellValue::Custom(_) => CellValue::None,
        }
    }
}

impl CellValue {
    /// Creates new custom data from any type.
    pub fn new<T: Any + Send + Sync + 'static>(value: T) -> Self {
        CellValue::Custom(Box::new(value))
    }

    /// Returns `true` if this is `CellValue::None`.
    pub fn is_none(&self) -> bool {
        matches!(self, CellValue::None)
    }

    /// Returns `true` if this contains some data.
    pub fn is_some(&self) -> bool {
        !self.is_none()
    }

    /// Attempts to get the data as a string slice.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Attempts to get the data as an owned string.
    pub fn into_string(self) -> Option<String> {
        match self {
            CellValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Attempts to get the data as an integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            CellValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to get the data as a float.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            CellValue::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to get the data as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CellValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Attempts to downcast custom data to the specified type.
    pub fn downcast<T: Any>(&self) -> Option<&T> {
        match self {
            CellValue::Custom(data) => data.downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Attempts to downcast and take ownership of custom data.
    pub fn downcast_into<T: Any>(self) -> Option<T> {
        match self {
            CellValue::Custom(data) => data.downcast::<T>().ok().map(|b| *b),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::None => Ok(()),
            CellValue::String(s) => f.write_str(s),
            CellValue::Int(n) => write!(f, "{n}"),
            CellValue::Float(n) => write!(f, "{n}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Custom(_) => f.write_str("<custom>"),
        }
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(s)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Float(n)
    }
}

impl From<f32> for CellValue {
    fn from(n: f32) -> Self {
        CellValue::Float(n as f64)
    }
}

macro_rules! int_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for CellValue {
                fn from(n: $ty) -> Self {
                    CellValue::Int(n as i64)
                }
            }
        )*
    };
}

int_from!(i8, i16, i32, i64, isize, u8, u16, u32);

// Unsigned values above i64::MAX saturate rather than wrap negative.
macro_rules! saturating_int_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for CellValue {
                fn from(n: $ty) -> Self {
                    CellValue::Int(i64::try_from(n).unwrap_or(i64::MAX))
                }
            }
        )*
    };
}

saturating_int_from!(u64, usize);

impl<V: Into<CellValue>> From<Option<V>> for CellValue {
    fn from(opt: Option<V>) -> Self {
        match opt {
            Some(value) => value.into(),
            None => CellValue::None,
        }
    }
}
