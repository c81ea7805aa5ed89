//! Conversions between command line text and typed values

use itertools::Itertools;
use std::fmt;
use std::marker::PhantomData;

/// The error a [`Codec`] returns when text cannot be converted to a value
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct CodecError {
    message: String,
}

impl CodecError {
    pub fn new(message: impl Into<String>) -> Self {
        CodecError {
            message: message.into(),
        }
    }
}

/// Converts between the text of a command line token and a value
pub trait Codec: 'static {
    type Value: Clone + 'static;

    /// The name shown as the parameter placeholder in help, e.g. `<integer>`
    fn name(&self) -> &str;

    fn value_from_text(&self, text: &str) -> Result<Self::Value, CodecError>;

    fn text_from_value(&self, value: &Self::Value) -> String;

    /// Renders a value for help text (defaults and presets) and argument dumps
    fn display_value(&self, value: &Self::Value) -> String {
        self.text_from_value(value)
    }
}

/// The identity codec
#[derive(Debug, Clone, Copy, Default)]
pub struct StringCodec;

impl Codec for StringCodec {
    type Value = String;

    fn name(&self) -> &str {
        "string"
    }

    fn value_from_text(&self, text: &str) -> Result<String, CodecError> {
        Ok(text.to_string())
    }

    fn text_from_value(&self, value: &String) -> String {
        value.clone()
    }

    fn display_value(&self, value: &String) -> String {
        format!("{value:?}")
    }
}

/// Decimal `i32`s, independent of locale
#[derive(Debug, Clone, Copy, Default)]
pub struct IntCodec;

impl Codec for IntCodec {
    type Value = i32;

    fn name(&self) -> &str {
        "integer"
    }

    fn value_from_text(&self, text: &str) -> Result<i32, CodecError> {
        text.parse()
            .map_err(|_| CodecError::new(format!("Expected an integer, found '{text}'")))
    }

    fn text_from_value(&self, value: &i32) -> String {
        value.to_string()
    }
}

/// Describes the members of a fieldless enum so that [`EnumCodec`] can convert it
///
/// ```
/// use verb_args::EnumMembers;
///
/// #[derive(Clone, Copy, PartialEq)]
/// enum Color {
///     Red,
///     Green,
/// }
///
/// impl EnumMembers for Color {
///     const TYPE_NAME: &'static str = "Color";
///
///     fn members() -> &'static [Self] {
///         &[Color::Red, Color::Green]
///     }
///
///     fn member_name(&self) -> &'static str {
///         match self {
///             Color::Red => "Red",
///             Color::Green => "Green",
///         }
///     }
/// }
/// ```
pub trait EnumMembers: Clone + 'static {
    const TYPE_NAME: &'static str;

    /// Every member, in declaration order
    fn members() -> &'static [Self];

    fn member_name(&self) -> &'static str;
}

/// Matches tokens against member names, case-sensitively
pub struct EnumCodec<T>(PhantomData<fn() -> T>);

impl<T> EnumCodec<T> {
    pub fn new() -> Self {
        EnumCodec(PhantomData)
    }
}

impl<T> Default for EnumCodec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for EnumCodec<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for EnumCodec<T> {}

impl<T: EnumMembers> fmt::Debug for EnumCodec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EnumCodec<{}>", T::TYPE_NAME)
    }
}

impl<T: EnumMembers> Codec for EnumCodec<T> {
    type Value = T;

    fn name(&self) -> &str {
        T::TYPE_NAME
    }

    fn value_from_text(&self, text: &str) -> Result<T, CodecError> {
        T::members()
            .iter()
            .find(|member| member.member_name() == text)
            .cloned()
            .ok_or_else(|| {
                let expected = T::members().iter().map(EnumMembers::member_name).join(", ");
                CodecError::new(format!("Expected one of ({expected}), found '{text}'"))
            })
    }

    fn text_from_value(&self, value: &T) -> String {
        value.member_name().to_string()
    }
}
