use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Primitive {
    Integer(i64),
    Text(String),
}

impl Primitive {
    pub fn type_name(&self) -> &'static str {
        match self {
            Primitive::Integer(_) => "integer",
            Primitive::Text(_) => "text",
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Primitive::Integer(value) => Some(*value),
            Primitive::Text(_) => None,
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Primitive::Integer(value) => write!(f, "{}", value),
            Primitive::Text(value) => write!(f, "{}", value),
        }
    }
}

impl From<i64> for Primitive {
    fn from(value: i64) -> Self {
        Primitive::Integer(value)
    }
}

impl From<bool> for Primitive {
    fn from(value: bool) -> Self {
        Primitive::Text(value.to_string())
    }
}
