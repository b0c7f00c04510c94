use super::{Compound, Tag, TagKind, TagList};

/// Rust-тип, в который сужается тег одного конкретного вида.
///
/// Реализован для полезных нагрузок всех типов, кроме `TAG_End`.
/// Приведение между типами (например, `Int` → `Long`) не выполняется.
pub trait TagPayload: Sized {
    /// Вид тега, который содержит этот тип.
    const KIND: TagKind;

    fn from_tag(tag: &Tag) -> Option<&Self>;

    fn from_tag_mut(tag: &mut Tag) -> Option<&mut Self>;
}

macro_rules! impl_tag_payload {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl TagPayload for $ty {
                const KIND: TagKind = TagKind::$variant;

                fn from_tag(tag: &Tag) -> Option<&Self> {
                    match tag {
                        Tag::$variant(v) => Some(v),
                        _ => None,
                    }
                }

                fn from_tag_mut(tag: &mut Tag) -> Option<&mut Self> {
                    match tag {
                        Tag::$variant(v) => Some(v),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_tag_payload! {
    i8 => Byte,
    i16 => Short,
    i32 => Int,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    Vec<u8> => ByteArray,
    String => String,
    TagList => List,
    Compound => Compound,
    Vec<i32> => IntArray,
    Vec<i64> => LongArray,
}
