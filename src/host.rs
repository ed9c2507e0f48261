//! Host binding surface
//!
//! Kontrak tipis untuk embedding layer (scripting runtime): constructor
//! handle, dispatch method berdasarkan nama dengan argumen bertipe dinamis,
//! dan konstanta SEEK_*. Runtime host cukup mem-forward panggilan ke sini.

use crate::codec::{Format, Value};
use crate::config::Config;
use crate::core::{Buffer, Init, Whence};
use crate::error::{Error, Result};

pub const SEEK_SET: i64 = Whence::SEEK_SET;
pub const SEEK_CUR: i64 = Whence::SEEK_CUR;
pub const SEEK_END: i64 = Whence::SEEK_END;

/// Pesan untuk alokasi yang gagal
pub const OUT_OF_MEMORY: &str = "memory not enough";

/// Nama method yang bisa di-dispatch lewat [`Handle::call`]
pub const METHODS: &[&str] = &[
    "write", "read", "seek", "pack", "unpack", "get", "set", "toStr", "readI8", "readI16",
    "readI32", "readI64", "readU8", "readU16", "readU32", "readU64", "readF32", "readF64",
    "writeI8", "writeI16", "writeI32", "writeI64", "writeU8", "writeU16", "writeU32", "writeU64",
    "writeF32", "writeF64",
];

/// Value dinamis dari sisi host
#[derive(Debug, Clone, PartialEq)]
pub enum HostValue {
    Nil,
    Integer(i64),
    Number(f64),
    Str(Vec<u8>),
}

impl HostValue {
    /// Integer, atau Number dengan nilai bulat dalam range i64
    pub fn to_integer(&self) -> Option<i64> {
        match self {
            HostValue::Integer(v) => Some(*v),
            HostValue::Number(v)
                if v.fract() == 0.0 && *v >= i64::MIN as f64 && *v < i64::MAX as f64 =>
            {
                Some(*v as i64)
            }
            _ => None,
        }
    }

    pub fn to_number(&self) -> Option<f64> {
        match self {
            HostValue::Integer(v) => Some(*v as f64),
            HostValue::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&[u8]> {
        match self {
            HostValue::Str(s) => Some(s),
            _ => None,
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            HostValue::Nil => "nil",
            HostValue::Integer(_) => "integer",
            HostValue::Number(_) => "number",
            HostValue::Str(_) => "string",
        }
    }
}

impl From<Value> for HostValue {
    fn from(v: Value) -> Self {
        match v {
            Value::Bytes(b) => HostValue::Str(b),
            Value::Int(i) => HostValue::Integer(i),
            Value::Float(f) => HostValue::Number(f),
        }
    }
}

impl From<i64> for HostValue {
    fn from(v: i64) -> Self {
        HostValue::Integer(v)
    }
}

impl From<f64> for HostValue {
    fn from(v: f64) -> Self {
        HostValue::Number(v)
    }
}

impl From<&str> for HostValue {
    fn from(v: &str) -> Self {
        HostValue::Str(v.as_bytes().to_vec())
    }
}

impl From<&[u8]> for HostValue {
    fn from(v: &[u8]) -> Self {
        HostValue::Str(v.to_vec())
    }
}

/// Hasil `create`
#[derive(Debug)]
pub enum Created {
    Handle(Handle),
    /// `capacity <= 0`: tidak ada hasil
    Rejected,
    /// Alokasi gagal: `(nil, message)`
    Failed(&'static str),
}

impl Created {
    pub fn into_handle(self) -> Option<Handle> {
        match self {
            Created::Handle(h) => Some(h),
            _ => None,
        }
    }
}

/// Constructor untuk host: `create(capacity, init?)`
///
/// `init` Integer = fill byte, Str = isi awal, Nil/None = zero-filled.
pub fn create(capacity: i64, init: Option<&HostValue>, config: &Config) -> Result<Created> {
    if capacity <= 0 {
        return Ok(Created::Rejected);
    }
    let Ok(size) = usize::try_from(capacity) else {
        return Ok(Created::Failed(OUT_OF_MEMORY));
    };

    let init = match init {
        None | Some(HostValue::Nil) => Init::Zeroed,
        Some(HostValue::Str(data)) => Init::Bytes(data),
        Some(other) => match other.to_integer() {
            Some(fill) => Init::Fill(fill),
            None => {
                return Err(Error::argument(format!(
                    "init must be integer or string, got {}",
                    other.type_name()
                )))
            }
        },
    };

    match Buffer::with_config(size, init, config) {
        Ok(buffer) => Ok(Created::Handle(Handle::new(buffer, *config))),
        Err(Error::OutOfMemory { capacity }) => {
            tracing::debug!(capacity, "buffer allocation failed");
            Ok(Created::Failed(OUT_OF_MEMORY))
        }
        Err(e) => Err(e),
    }
}

/// Handle milik host; drop = storage dilepas tepat sekali
#[derive(Debug)]
pub struct Handle {
    buffer: Buffer,
    config: Config,
}

impl Handle {
    pub fn new(buffer: Buffer, config: Config) -> Self {
        Self { buffer, config }
    }

    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut Buffer {
        &mut self.buffer
    }

    pub fn into_buffer(self) -> Buffer {
        self.buffer
    }

    pub fn has_method(name: &str) -> bool {
        METHODS.contains(&name)
    }

    /// `buffer[i]`
    ///
    /// Lenient: `None` di luar bounds. Strict: `IndexOutOfBounds`.
    pub fn index(&self, index: i64) -> Result<Option<HostValue>> {
        let byte = if self.config.is_strict() {
            Some(self.buffer.try_get(index)?)
        } else {
            self.buffer.get(index)
        };
        Ok(byte.map(|b| HostValue::Integer(b as i64)))
    }

    /// `buffer[i] = v`
    pub fn new_index(&mut self, index: i64, value: i64) -> Result<()> {
        if self.config.is_strict() {
            self.buffer.try_set(index, value)
        } else {
            self.buffer.set(index, value);
            Ok(())
        }
    }

    /// Dispatch method berdasarkan nama
    ///
    /// Returns daftar hasil (bisa kosong, misalnya `readU32` saat data kurang).
    pub fn call(&mut self, method: &str, args: &[HostValue]) -> Result<Vec<HostValue>> {
        match method {
            "write" => self.write(args),
            "read" => {
                let n = opt_integer(args, 0, 1)?;
                let bytes = usize::try_from(n)
                    .map(|n| self.buffer.read(n))
                    .unwrap_or_default();
                Ok(vec![HostValue::Str(bytes)])
            }
            "seek" => {
                let offset = arg_integer(args, 0)?;
                let raw = opt_integer(args, 1, SEEK_SET)?;
                let whence = Whence::from_raw(raw).ok_or(Error::InvalidWhence(raw))?;
                Ok(vec![HostValue::Integer(self.buffer.seek(offset, whence) as i64)])
            }
            "pack" => self.pack(args),
            "unpack" => {
                let format = Format::parse(&arg_string(args, 0)?)?;
                let unpacked = format.unpack(&mut self.buffer);
                let mut out = Vec::with_capacity(unpacked.values.len() + 1);
                out.push(HostValue::Integer(unpacked.consumed as i64));
                out.extend(unpacked.values.into_iter().map(HostValue::from));
                Ok(out)
            }
            "get" => Ok(self.index(arg_integer(args, 0)?)?.into_iter().collect()),
            "set" => {
                let index = arg_integer(args, 0)?;
                let value = arg_integer(args, 1)?;
                self.new_index(index, value)?;
                Ok(Vec::new())
            }
            "toStr" => {
                let start = opt_integer(args, 0, 0)?;
                let len = opt_integer(args, 1, self.buffer.capacity() as i64)?;
                let bytes = self.buffer.checked_slice(start, len)?;
                Ok(vec![HostValue::Str(bytes.to_vec())])
            }
            "readI8" => Ok(found(self.buffer.read_i8().map(|v| HostValue::Integer(v as i64)))),
            "readU8" => Ok(found(self.buffer.read_u8().map(|v| HostValue::Integer(v as i64)))),
            "readI16" => Ok(found(self.buffer.read_i16().map(|v| HostValue::Integer(v as i64)))),
            "readU16" => Ok(found(self.buffer.read_u16().map(|v| HostValue::Integer(v as i64)))),
            "readI32" => Ok(found(self.buffer.read_i32().map(|v| HostValue::Integer(v as i64)))),
            "readU32" => Ok(found(self.buffer.read_u32().map(|v| HostValue::Integer(v as i64)))),
            "readI64" => Ok(found(self.buffer.read_i64().map(HostValue::Integer))),
            "readU64" => Ok(found(self.buffer.read_u64().map(|v| HostValue::Integer(v as i64)))),
            "readF32" => Ok(found(self.buffer.read_f32().map(|v| HostValue::Number(v as f64)))),
            "readF64" => Ok(found(self.buffer.read_f64().map(HostValue::Number))),
            "writeI8" => Ok(written(self.buffer.write_i8(arg_integer(args, 0)? as i8))),
            "writeU8" => Ok(written(self.buffer.write_u8(arg_integer(args, 0)? as u8))),
            "writeI16" => Ok(written(self.buffer.write_i16(arg_integer(args, 0)? as i16))),
            "writeU16" => Ok(written(self.buffer.write_u16(arg_integer(args, 0)? as u16))),
            "writeI32" => Ok(written(self.buffer.write_i32(arg_integer(args, 0)? as i32))),
            "writeU32" => Ok(written(self.buffer.write_u32(arg_integer(args, 0)? as u32))),
            "writeI64" => Ok(written(self.buffer.write_i64(arg_integer(args, 0)?))),
            "writeU64" => Ok(written(self.buffer.write_u64(arg_integer(args, 0)? as u64))),
            "writeF32" => Ok(written(self.buffer.write_f32(arg_number(args, 0)? as f32))),
            "writeF64" => Ok(written(self.buffer.write_f64(arg_number(args, 0)?))),
            _ => Err(Error::unknown_method(method)),
        }
    }

    /// `write("str")` atau `write(i1, i2, ...)`
    fn write(&mut self, args: &[HostValue]) -> Result<Vec<HostValue>> {
        let written = match args.first() {
            Some(HostValue::Str(data)) => self.buffer.write(data),
            Some(first) if first.to_integer().is_some() => {
                // Berhenti di argumen pertama yang bukan integer
                let ints = args.iter().map_while(HostValue::to_integer);
                self.buffer.write_ints(ints)
            }
            other => {
                return Err(Error::argument(format!(
                    "write expects string or integers, got {}",
                    other.map_or("no value", HostValue::type_name)
                )))
            }
        };
        Ok(vec![HostValue::Integer(written as i64)])
    }

    fn pack(&mut self, args: &[HostValue]) -> Result<Vec<HostValue>> {
        let format = Format::parse(&arg_string(args, 0)?)?;
        let values = args[1..]
            .iter()
            .take(format.value_count())
            .enumerate()
            .map(|(i, arg)| match arg {
                HostValue::Integer(v) => Ok(Value::Int(*v)),
                HostValue::Number(v) => Ok(Value::Float(*v)),
                HostValue::Str(s) => Ok(Value::Bytes(s.clone())),
                HostValue::Nil => Err(Error::argument(format!("pack value #{} is nil", i))),
            })
            .collect::<Result<Vec<_>>>()?;
        let written = format.pack(&mut self.buffer, &values)?;
        Ok(vec![HostValue::Integer(written as i64)])
    }
}

#[inline(always)]
fn found(value: Option<HostValue>) -> Vec<HostValue> {
    value.into_iter().collect()
}

#[inline(always)]
fn written(n: usize) -> Vec<HostValue> {
    vec![HostValue::Integer(n as i64)]
}

fn arg_integer(args: &[HostValue], pos: usize) -> Result<i64> {
    match args.get(pos) {
        Some(v) => v.to_integer().ok_or_else(|| {
            Error::argument(format!(
                "#{} integer expected, got {}",
                pos + 1,
                v.type_name()
            ))
        }),
        None => Err(Error::argument(format!(
            "#{} integer expected, got no value",
            pos + 1
        ))),
    }
}

fn opt_integer(args: &[HostValue], pos: usize, default: i64) -> Result<i64> {
    match args.get(pos) {
        None | Some(HostValue::Nil) => Ok(default),
        Some(_) => arg_integer(args, pos),
    }
}

fn arg_number(args: &[HostValue], pos: usize) -> Result<f64> {
    args.get(pos)
        .and_then(HostValue::to_number)
        .ok_or_else(|| Error::argument(format!("#{} number expected", pos + 1)))
}

fn arg_string(args: &[HostValue], pos: usize) -> Result<String> {
    args.get(pos)
        .and_then(HostValue::as_str)
        .map(|s| String::from_utf8_lossy(s).into_owned())
        .ok_or_else(|| Error::argument(format!("#{} string expected", pos + 1)))
}
