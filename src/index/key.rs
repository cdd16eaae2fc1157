use bytes::{Buf, BufMut};

/// Fixed-width little-endian binary encoding for keys and values stored in
/// tree pages. Every slot in a leaf or internal page is `SIZE` bytes of
/// key (plus value/child), so offsets are pure arithmetic and pages never
/// alias raw memory as structs.
pub trait FixedCodec: Clone {
    /// Encoded width in bytes
    const SIZE: usize;

    /// Writes the encoding into the front of `buf`.
    fn encode(&self, buf: &mut [u8]);

    /// Reads an encoding from the front of `buf`.
    fn decode(buf: &[u8]) -> Self;
}

/// Keys additionally order the tree. The `Ord` impl of the key type is the
/// comparator: all page and tree operations compare decoded keys with it.
pub trait IndexKey: FixedCodec + Ord {}

impl<T: FixedCodec + Ord> IndexKey for T {}

macro_rules! impl_fixed_codec_int {
    ($($t:ty => $size:expr, $put:ident, $get:ident;)*) => {$(
        impl FixedCodec for $t {
            const SIZE: usize = $size;

            fn encode(&self, mut buf: &mut [u8]) {
                buf.$put(*self);
            }

            fn decode(mut buf: &[u8]) -> Self {
                buf.$get()
            }
        }
    )*};
}

impl_fixed_codec_int! {
    u16 => 2, put_u16_le, get_u16_le;
    u32 => 4, put_u32_le, get_u32_le;
    u64 => 8, put_u64_le, get_u64_le;
    i16 => 2, put_i16_le, get_i16_le;
    i32 => 4, put_i32_le, get_i32_le;
    i64 => 8, put_i64_le, get_i64_le;
}

/// Fixed-width byte strings, e.g. padded identifiers.
impl<const N: usize> FixedCodec for [u8; N] {
    const SIZE: usize = N;

    fn encode(&self, buf: &mut [u8]) {
        buf[..N].copy_from_slice(self);
    }

    fn decode(buf: &[u8]) -> Self {
        buf[..N].try_into().unwrap()
    }
}

/// Composite keys, compared lexicographically by the tuple's `Ord`.
impl<A: FixedCodec, B: FixedCodec> FixedCodec for (A, B) {
    const SIZE: usize = A::SIZE + B::SIZE;

    fn encode(&self, buf: &mut [u8]) {
        self.0.encode(&mut buf[..A::SIZE]);
        self.1.encode(&mut buf[A::SIZE..A::SIZE + B::SIZE]);
    }

    fn decode(buf: &[u8]) -> Self {
        (
            A::decode(&buf[..A::SIZE]),
            B::decode(&buf[A::SIZE..A::SIZE + B::SIZE]),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_round_trip() {
        let mut buf = [0u8; 8];
        42u64.encode(&mut buf);
        assert_eq!(u64::decode(&buf), 42);

        let mut buf = [0u8; 4];
        (-7i32).encode(&mut buf);
        assert_eq!(i32::decode(&buf), -7);
    }

    #[test]
    fn test_byte_array_round_trip() {
        let key = *b"user-000042\0\0\0\0\0";
        let mut buf = [0u8; 16];
        key.encode(&mut buf);
        assert_eq!(<[u8; 16]>::decode(&buf), key);
    }

    #[test]
    fn test_tuple_round_trip() {
        let key = (*b"alice\0\0\0", 9u32);
        let mut buf = [0u8; 12];
        key.encode(&mut buf);
        assert_eq!(<([u8; 8], u32)>::decode(&buf), key);
        assert_eq!(<([u8; 8], u32) as FixedCodec>::SIZE, 12);
    }
}
