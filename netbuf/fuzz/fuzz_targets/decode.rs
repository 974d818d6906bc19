#![no_main]

use libfuzzer_sys::fuzz_target;
use netbuf::{varint, DataBuffer, Error};

fuzz_target!(|data: &[u8]| {
    let mut storage = data.to_vec();
    if storage.is_empty() {
        return;
    }
    let mut buffer = DataBuffer::from_slice(&mut storage);

    // Decoding arbitrary input must either fail cleanly or re-encode canonically
    while buffer.unread_length() > 0 {
        let position = buffer.read_position();
        match buffer.read_var_uint::<u64>() {
            Ok(value) => {
                let consumed = buffer.read_position() - position;
                assert!(consumed <= varint::MAX_SIZE);
                assert!(varint::size(value) <= consumed);
            }
            Err(Error::OutOfBounds { .. }) | Err(Error::MalformedVarint) => {
                assert_eq!(buffer.read_position(), position);
                break;
            }
            Err(err) => panic!("unexpected error: {err}"),
        }
    }

    if let Ok((value, consumed)) = varint::decode_signed(data) {
        let mut encoded = [0u8; varint::MAX_SIZE];
        let len = varint::encode_signed(value, &mut encoded).unwrap();
        assert!(len <= consumed);
        assert_eq!(varint::decode_signed(&encoded[..len]).unwrap(), (value, len));
    }
});
