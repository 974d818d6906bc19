#![no_main]

use arbitrary::Arbitrary;
use bytes::{Buf, BufMut};
use libfuzzer_sys::fuzz_target;
use netbuf::{varint, DataBuffer, FixedWidth};

fn roundtrip_fixed<T: FixedWidth + PartialEq + std::fmt::Debug>(value: T) {
    let mut buffer = DataBuffer::with_capacity(T::SIZE).unwrap();
    buffer.append(value).unwrap();
    assert_eq!(buffer.data_length(), T::SIZE);
    assert_eq!(buffer.read::<T>().unwrap(), value);
    assert!(buffer.append(value).is_err());
}

fn roundtrip_f32(value: f32) {
    let mut buffer = DataBuffer::with_capacity(4).unwrap();
    buffer.append(value).unwrap();
    assert_eq!(buffer.read::<f32>().unwrap().to_bits(), value.to_bits());
}

fn roundtrip_f64(value: f64) {
    let mut buffer = DataBuffer::with_capacity(8).unwrap();
    buffer.append(value).unwrap();
    assert_eq!(buffer.read::<f64>().unwrap().to_bits(), value.to_bits());
}

fn roundtrip_var_uint(value: u64) {
    let mut buffer = DataBuffer::with_capacity(varint::MAX_SIZE).unwrap();
    let len = buffer.append_var_uint(value).unwrap();
    assert_eq!(len, varint::size(value));
    assert_eq!(buffer.get_var_uint::<u64>(0).unwrap(), (value, len));
    assert_eq!(buffer.read_var_uint::<u64>().unwrap(), value);
    assert_eq!(buffer.unread_length(), 0);

    // Narrowing succeeds exactly when the value fits
    assert_eq!(
        buffer.get_var_uint::<u32>(0).ok().map(|(v, _)| v),
        u32::try_from(value).ok()
    );
}

fn roundtrip_var_int(value: i64) {
    let mut buffer = DataBuffer::with_capacity(varint::MAX_SIZE).unwrap();
    let len = buffer.append_var_int(value).unwrap();
    assert_eq!(len, varint::size_signed(value));
    assert_eq!(buffer.read_var_int::<i64>().unwrap(), value);
    assert_eq!(
        buffer.get_var_int::<i16>(0).ok().map(|(v, _)| v),
        i16::try_from(value).ok()
    );
}

fn roundtrip_sequence(items: &[Item]) {
    let mut buffer = DataBuffer::with_capacity(items.len() * varint::MAX_SIZE).unwrap();
    for item in items {
        match *item {
            Item::U8(v) => buffer.put_u8(v),
            Item::U32(v) => buffer.put_u32(v),
            Item::VarUint(v) => {
                buffer.append_var_uint(v).unwrap();
            }
            Item::VarInt(v) => {
                buffer.append_var_int(v).unwrap();
            }
        }
    }
    for item in items {
        match *item {
            Item::U8(v) => assert_eq!(buffer.get_u8(), v),
            Item::U32(v) => assert_eq!(buffer.get_u32(), v),
            Item::VarUint(v) => assert_eq!(buffer.read_var_uint::<u64>().unwrap(), v),
            Item::VarInt(v) => assert_eq!(buffer.read_var_int::<i64>().unwrap(), v),
        }
    }
    assert!(!buffer.has_remaining());
}

#[derive(Arbitrary, Debug)]
enum Item {
    U8(u8),
    U32(u32),
    VarUint(u64),
    VarInt(i64),
}

#[derive(Arbitrary, Debug)]
enum FuzzInput {
    // Fixed-width primitives
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),

    // Varints
    VarUint(u64),
    VarInt(i64),

    // Mixed streams
    Sequence(Vec<Item>),
}

fn fuzz(input: FuzzInput) {
    match input {
        FuzzInput::U8(v) => roundtrip_fixed(v),
        FuzzInput::U16(v) => roundtrip_fixed(v),
        FuzzInput::U32(v) => roundtrip_fixed(v),
        FuzzInput::U64(v) => roundtrip_fixed(v),
        FuzzInput::I8(v) => roundtrip_fixed(v),
        FuzzInput::I16(v) => roundtrip_fixed(v),
        FuzzInput::I32(v) => roundtrip_fixed(v),
        FuzzInput::I64(v) => roundtrip_fixed(v),
        FuzzInput::F32(v) => roundtrip_f32(v),
        FuzzInput::F64(v) => roundtrip_f64(v),
        FuzzInput::VarUint(v) => roundtrip_var_uint(v),
        FuzzInput::VarInt(v) => roundtrip_var_int(v),
        FuzzInput::Sequence(items) => roundtrip_sequence(&items),
    };
}

fuzz_target!(|input: FuzzInput| {
    fuzz(input);
});
