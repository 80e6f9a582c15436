use crate::coerce::Value;
use crate::field::Kind;

/// Exclusive borrow of one configuration field, typed by the field's Rust type
#[derive(Debug)]
pub enum Slot<'a> {
    Str(&'a mut String),
    I8(&'a mut i8),
    I16(&'a mut i16),
    I32(&'a mut i32),
    I64(&'a mut i64),
    Isize(&'a mut isize),
    Bool(&'a mut bool),
    F32(&'a mut f32),
    F64(&'a mut f64),
    List(&'a mut Vec<String>),
}

impl Slot<'_> {
    /// Kind of value this slot accepts
    pub fn kind(&self) -> Kind {
        match self {
            Slot::Str(_) => Kind::String,
            Slot::I8(_) | Slot::I16(_) | Slot::I32(_) | Slot::I64(_) | Slot::Isize(_) => {
                Kind::Integer
            }
            Slot::Bool(_) => Kind::Boolean,
            Slot::F32(_) | Slot::F64(_) => Kind::Float,
            Slot::List(_) => Kind::StringList,
        }
    }

    /// Write a coerced value into the field.
    ///
    /// Lists are appended to, everything else is overwritten. Returns the value
    /// back when it does not fit this slot. Integer and float values are expected
    /// to be already range checked against the slot's bit width.
    pub fn store(self, value: Value) -> Result<(), Value> {
        match (self, value) {
            (Slot::Str(slot), Value::Str(v)) => *slot = v,
            (Slot::I8(slot), Value::Int(v)) => *slot = i8::try_from(v).map_err(|_| Value::Int(v))?,
            (Slot::I16(slot), Value::Int(v)) => {
                *slot = i16::try_from(v).map_err(|_| Value::Int(v))?
            }
            (Slot::I32(slot), Value::Int(v)) => {
                *slot = i32::try_from(v).map_err(|_| Value::Int(v))?
            }
            (Slot::I64(slot), Value::Int(v)) => *slot = v,
            (Slot::Isize(slot), Value::Int(v)) => {
                *slot = isize::try_from(v).map_err(|_| Value::Int(v))?
            }
            (Slot::Bool(slot), Value::Bool(v)) => *slot = v,
            (Slot::F32(slot), Value::Float(v)) => *slot = v as f32,
            (Slot::F64(slot), Value::Float(v)) => *slot = v,
            (Slot::List(slot), Value::List(v)) => slot.extend(v),
            (_, value) => return Err(value),
        }
        Ok(())
    }
}

macro_rules! impl_from_mut {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl<'a> From<&'a mut $ty> for Slot<'a> {
                fn from(field: &'a mut $ty) -> Self {
                    Slot::$variant(field)
                }
            }
        )*
    };
}

impl_from_mut! {
    String => Str,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    isize => Isize,
    bool => Bool,
    f32 => F32,
    f64 => F64,
    Vec<String> => List,
}
