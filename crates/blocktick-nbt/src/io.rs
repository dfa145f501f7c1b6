//! Little-endian NBT read/write, the variant used for block storage.
//!
//! The root of a storage blob is always a named TAG_Compound; the root name is
//! not meaningful to callers and an empty string is written on encode.

use bytes::{Buf, BufMut};

use crate::error::NbtError;
use crate::tag::{NbtCompound, NbtTag};

/// Maximum nesting depth to prevent stack overflow on hostile input.
const MAX_DEPTH: usize = 512;

/// Read a root compound from little-endian NBT bytes.
pub fn read_compound_le(buf: &mut impl Buf) -> Result<NbtCompound, NbtError> {
    if !buf.has_remaining() {
        return Err(NbtError::UnexpectedEof);
    }
    let tag_type = buf.get_u8();
    if tag_type != 10 {
        return Err(NbtError::ExpectedCompound { got: tag_type });
    }
    let _root_name = read_string(buf)?;
    read_compound(buf, 0)
}

/// Write a root compound as little-endian NBT bytes (empty root name).
pub fn write_compound_le(buf: &mut impl BufMut, compound: &NbtCompound) {
    buf.put_u8(10); // TAG_Compound
    write_string(buf, "");
    write_compound(buf, compound);
}

fn read_compound(buf: &mut impl Buf, depth: usize) -> Result<NbtCompound, NbtError> {
    if depth > MAX_DEPTH {
        return Err(NbtError::NestingTooDeep { limit: MAX_DEPTH });
    }
    let mut map = NbtCompound::new();
    loop {
        need(buf, 1)?;
        let tag_type = buf.get_u8();
        if tag_type == 0 {
            break; // TAG_End
        }
        let name = read_string(buf)?;
        let tag = read_tag(buf, tag_type, depth)?;
        map.insert(name, tag);
    }
    Ok(map)
}

fn read_tag(buf: &mut impl Buf, tag_type: u8, depth: usize) -> Result<NbtTag, NbtError> {
    if depth > MAX_DEPTH {
        return Err(NbtError::NestingTooDeep { limit: MAX_DEPTH });
    }

    match tag_type {
        1 => {
            need(buf, 1)?;
            Ok(NbtTag::Byte(buf.get_i8()))
        }
        2 => {
            need(buf, 2)?;
            Ok(NbtTag::Short(buf.get_i16_le()))
        }
        3 => {
            need(buf, 4)?;
            Ok(NbtTag::Int(buf.get_i32_le()))
        }
        4 => {
            need(buf, 8)?;
            Ok(NbtTag::Long(buf.get_i64_le()))
        }
        5 => {
            need(buf, 4)?;
            Ok(NbtTag::Float(buf.get_f32_le()))
        }
        6 => {
            need(buf, 8)?;
            Ok(NbtTag::Double(buf.get_f64_le()))
        }
        7 => {
            let len = read_len(buf)?;
            need(buf, len)?;
            let mut arr = Vec::with_capacity(len);
            for _ in 0..len {
                arr.push(buf.get_i8());
            }
            Ok(NbtTag::ByteArray(arr))
        }
        8 => Ok(NbtTag::String(read_string(buf)?)),
        9 => {
            need(buf, 1)?;
            let element_type = buf.get_u8();
            let len = read_len(buf)?;
            let mut list = Vec::with_capacity(len);
            for _ in 0..len {
                list.push(read_tag(buf, element_type, depth + 1)?);
            }
            Ok(NbtTag::List(list))
        }
        10 => Ok(NbtTag::Compound(read_compound(buf, depth + 1)?)),
        11 => {
            let len = read_len(buf)?;
            let mut arr = Vec::with_capacity(len);
            for _ in 0..len {
                need(buf, 4)?;
                arr.push(buf.get_i32_le());
            }
            Ok(NbtTag::IntArray(arr))
        }
        12 => {
            let len = read_len(buf)?;
            let mut arr = Vec::with_capacity(len);
            for _ in 0..len {
                need(buf, 8)?;
                arr.push(buf.get_i64_le());
            }
            Ok(NbtTag::LongArray(arr))
        }
        _ => Err(NbtError::UnknownTagType(tag_type)),
    }
}

fn write_compound(buf: &mut impl BufMut, map: &NbtCompound) {
    for (name, tag) in map {
        buf.put_u8(tag.type_id());
        write_string(buf, name);
        write_tag(buf, tag);
    }
    buf.put_u8(0); // TAG_End
}

fn write_tag(buf: &mut impl BufMut, tag: &NbtTag) {
    match tag {
        NbtTag::Byte(v) => buf.put_i8(*v),
        NbtTag::Short(v) => buf.put_i16_le(*v),
        NbtTag::Int(v) => buf.put_i32_le(*v),
        NbtTag::Long(v) => buf.put_i64_le(*v),
        NbtTag::Float(v) => buf.put_f32_le(*v),
        NbtTag::Double(v) => buf.put_f64_le(*v),
        NbtTag::ByteArray(arr) => {
            buf.put_i32_le(arr.len() as i32);
            for &b in arr {
                buf.put_i8(b);
            }
        }
        NbtTag::String(s) => write_string(buf, s),
        NbtTag::List(list) => {
            // Empty lists carry TAG_End as the element type.
            let element_type = list.first().map_or(0, |t| t.type_id());
            buf.put_u8(element_type);
            buf.put_i32_le(list.len() as i32);
            for item in list {
                write_tag(buf, item);
            }
        }
        NbtTag::Compound(map) => write_compound(buf, map),
        NbtTag::IntArray(arr) => {
            buf.put_i32_le(arr.len() as i32);
            for &v in arr {
                buf.put_i32_le(v);
            }
        }
        NbtTag::LongArray(arr) => {
            buf.put_i32_le(arr.len() as i32);
            for &v in arr {
                buf.put_i64_le(v);
            }
        }
    }
}

fn read_len(buf: &mut impl Buf) -> Result<usize, NbtError> {
    need(buf, 4)?;
    let len = buf.get_i32_le();
    if len < 0 {
        return Err(NbtError::NegativeLength(len));
    }
    Ok(len as usize)
}

fn read_string(buf: &mut impl Buf) -> Result<String, NbtError> {
    need(buf, 2)?;
    let len = buf.get_u16_le() as usize;
    need(buf, len)?;
    let data = buf.copy_to_bytes(len);
    String::from_utf8(data.to_vec()).map_err(|_| NbtError::InvalidUtf8)
}

fn write_string(buf: &mut impl BufMut, s: &str) {
    buf.put_u16_le(s.len() as u16);
    buf.put_slice(s.as_bytes());
}

fn need(buf: &impl Buf, bytes: usize) -> Result<(), NbtError> {
    if buf.remaining() < bytes {
        Err(NbtError::UnexpectedEof)
    } else {
        Ok(())
    }
}
