//! ZCL wire data types.
//!
//! Each attribute on the air is tagged with a one-byte data type. Only the
//! integral types used by attribute reporting are modelled here.

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use strum::{Display, FromRepr};

/// ZCL data type tag.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, FromRepr, Display, Serialize, Deserialize)]
#[repr(u8)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DataType {
    Boolean = 0x10,
    Bitmap8 = 0x18,
    Bitmap16 = 0x19,
    Bitmap32 = 0x1B,
    Uint8 = 0x20,
    Uint16 = 0x21,
    Uint32 = 0x23,
    Int8 = 0x28,
    Int16 = 0x29,
    Int32 = 0x2B,
    Enum8 = 0x30,
    Enum16 = 0x31,
}

impl DataType {
    /// Type tag as carried in write and configure-reporting frames.
    pub const fn tag(self) -> u8 {
        self as u8
    }

    /// Values representable by this type.
    ///
    /// The "invalid" sentinels some types reserve (e.g. 0xFF for uint8) are
    /// not excluded here; attributes that use them narrow their own range.
    pub fn range(self) -> RangeInclusive<i64> {
        match self {
            DataType::Boolean => 0..=1,
            DataType::Bitmap8 | DataType::Uint8 | DataType::Enum8 => 0..=i64::from(u8::MAX),
            DataType::Bitmap16 | DataType::Uint16 | DataType::Enum16 => 0..=i64::from(u16::MAX),
            DataType::Bitmap32 | DataType::Uint32 => 0..=i64::from(u32::MAX),
            DataType::Int8 => i64::from(i8::MIN)..=i64::from(i8::MAX),
            DataType::Int16 => i64::from(i16::MIN)..=i64::from(i16::MAX),
            DataType::Int32 => i64::from(i32::MIN)..=i64::from(i32::MAX),
        }
    }

    pub fn contains(self, raw: i64) -> bool {
        self.range().contains(&raw)
    }
}
