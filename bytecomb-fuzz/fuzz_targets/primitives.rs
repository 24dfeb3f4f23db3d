#![no_main]

use bytecomb::Serializer;
use bytecomb::ser::{
    BigEndian, BigIntSerializer, BoolSerializer, ByteArraySerializer, CharSerializer,
    DateSerializer, DecimalSerializer, F64Serializer, I24Serializer, I32Serializer, I64Serializer,
    InstantSerializer, LittleEndian, StringSerializer, Utf8Serializer,
};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Decoding arbitrary bytes must only ever return Ok or Err, never panic
    let _ = BoolSerializer::new().decode_from_slice(data);
    let _ = I24Serializer::<BigEndian>::new().decode_from_slice(data);
    let _ = I32Serializer::<BigEndian>::new().decode_from_slice(data);
    let _ = I32Serializer::<LittleEndian>::new().decode_from_slice(data);
    let _ = I64Serializer::<BigEndian>::new().decode_from_slice(data);
    let _ = F64Serializer::<LittleEndian>::new().decode_from_slice(data);
    let _ = CharSerializer::<BigEndian>::new().decode_from_slice(data);
    let _ = ByteArraySerializer::new().decode_from_slice(data);
    let _ = StringSerializer::new().decode_from_slice(data);
    let _ = Utf8Serializer::new().decode_from_slice(data);
    let _ = BigIntSerializer::new().decode_from_slice(data);
    let _ = DecimalSerializer::new().decode_from_slice(data);
    let _ = InstantSerializer::<BigEndian>::new().decode_from_slice(data);
    let _ = DateSerializer::<BigEndian>::new().decode_from_slice(data);
});
