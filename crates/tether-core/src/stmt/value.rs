use super::Type;
use crate::{Error, Result};

#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    /// Null value
    #[default]
    Null,

    /// Boolean value
    Bool(bool),

    /// Signed 64-bit integer
    I64(i64),

    /// String value
    String(String),

    /// Raw bytes
    Bytes(Vec<u8>),
}

impl Value {
    pub const fn null() -> Self {
        Self::Null
    }

    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::I64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Name of the variant, used in error messages.
    pub fn variant_name(&self) -> &'static str {
        match self {
            Self::Null => "Null",
            Self::Bool(_) => "Bool",
            Self::I64(_) => "I64",
            Self::String(_) => "String",
            Self::Bytes(_) => "Bytes",
        }
    }

    pub fn is_a(&self, ty: Type) -> bool {
        matches!(
            (self, ty),
            (Self::Null, _)
                | (Self::Bool(_), Type::Bool)
                | (Self::I64(_), Type::I64)
                | (Self::String(_), Type::String)
                | (Self::Bytes(_), Type::Bytes)
        )
    }

    /// Casts a value read back from storage to the declared column type.
    ///
    /// Storage engines without a native boolean hand back integers, and
    /// some hand back text for everything; both are accepted when the
    /// conversion is lossless.
    pub fn cast(self, ty: Type) -> Result<Value> {
        if self.is_a(ty) {
            return Ok(self);
        }

        match (self, ty) {
            (Value::I64(v @ (0 | 1)), Type::Bool) => Ok(Value::Bool(v == 1)),
            (Value::Bool(v), Type::I64) => Ok(Value::I64(v as i64)),
            (Value::String(v), Type::I64) => match v.parse() {
                Ok(parsed) => Ok(Value::I64(parsed)),
                Err(_) => Err(Error::type_conversion(Value::String(v), ty.name())),
            },
            (Value::String(v), Type::Bytes) => Ok(Value::Bytes(v.into_bytes())),
            (value, ty) => Err(Error::type_conversion(value, ty.name())),
        }
    }
}

impl From<bool> for Value {
    fn from(src: bool) -> Self {
        Self::Bool(src)
    }
}

impl From<i64> for Value {
    fn from(src: i64) -> Self {
        Self::I64(src)
    }
}

impl From<i32> for Value {
    fn from(src: i32) -> Self {
        Self::I64(src as i64)
    }
}

impl From<String> for Value {
    fn from(src: String) -> Self {
        Self::String(src)
    }
}

impl From<&String> for Value {
    fn from(src: &String) -> Self {
        Self::String(src.clone())
    }
}

impl From<&str> for Value {
    fn from(src: &str) -> Self {
        Self::String(src.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(src: Vec<u8>) -> Self {
        Self::Bytes(src)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(src: Option<T>) -> Self {
        match src {
            Some(value) => value.into(),
            None => Self::Null,
        }
    }
}
