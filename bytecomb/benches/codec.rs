//! Encode/decode benchmarks across the serializer algebra.
//!
//! Covers the three cost profiles: fixed-width primitives (pure cursor
//! arithmetic), framed collections (backpatching plus per-element work), and
//! the encrypted combinator (scratch buffer, pool checkout, AEAD transform).

use std::hint::black_box;
use std::sync::Arc;

use bytecomb::{
    ByteBuf, Serializer,
    cipher::{AesGcmCipher, SecretKey},
    pool::Pool,
    ser::{
        BigEndian, ByteArraySerializer, Encrypted, Framed, I64Serializer, ListSerializer,
        StringSerializer, U16Serializer,
    },
};
use criterion::{Criterion, criterion_group, criterion_main};

fn bench_primitives(c: &mut Criterion) {
    let ser = I64Serializer::<BigEndian>::new();

    c.bench_function("encode_i64", |b| {
        let mut buf = ByteBuf::with_capacity(8);
        b.iter(|| {
            buf = ByteBuf::with_capacity(8);
            ser.encode(black_box(&0x0123_4567_89AB_CDEFi64), &mut buf).unwrap();
        });
    });

    c.bench_function("decode_i64", |b| {
        let bytes = ser.encode_to_vec(&0x0123_4567_89AB_CDEFi64).unwrap();
        b.iter(|| {
            let mut buf = ByteBuf::from(bytes.as_slice());
            black_box(ser.decode(&mut buf).unwrap());
        });
    });
}

fn bench_framed_list(c: &mut Criterion) {
    let ser = Framed::new(
        I64Serializer::<BigEndian>::new(),
        ListSerializer::new(U16Serializer::<BigEndian>::new(), StringSerializer::new()),
    );
    let value: Vec<String> = (0..100).map(|i| format!("item-{i:04}")).collect();

    c.bench_function("encode_framed_list_100", |b| {
        b.iter(|| black_box(ser.encode_to_vec(black_box(&value)).unwrap()));
    });

    c.bench_function("decode_framed_list_100", |b| {
        let bytes = ser.encode_to_vec(&value).unwrap();
        b.iter(|| black_box(ser.decode_from_slice(black_box(&bytes)).unwrap()));
    });
}

fn bench_encrypted(c: &mut Criterion) {
    let key = SecretKey::new();
    let enc_key = key.clone();
    let dec_key = key.clone();
    let ser = Encrypted::new(
        ByteArraySerializer::new(),
        Arc::new(Pool::new(move || AesGcmCipher::new(&enc_key))),
        Arc::new(Pool::new(move || AesGcmCipher::new(&dec_key))),
    );
    let value: Vec<u8> = (0..4096).map(|i| i as u8).collect();

    c.bench_function("encode_encrypted_4k", |b| {
        b.iter(|| black_box(ser.encode_to_vec(black_box(&value)).unwrap()));
    });

    c.bench_function("decode_encrypted_4k", |b| {
        let bytes = ser.encode_to_vec(&value).unwrap();
        b.iter(|| black_box(ser.decode_from_slice(black_box(&bytes)).unwrap()));
    });
}

criterion_group!(codec_group, bench_primitives, bench_framed_list, bench_encrypted);
criterion_main!(codec_group);
