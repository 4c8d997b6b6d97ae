// crates/alarmlink-rs/src/value.rs

use alloc::format;
use alloc::string::{String, ToString};
use core::fmt;

/// The expected kind of value a property slot holds.
///
/// Every slot records its kind explicitly; textual coercion dispatches on
/// this tag instead of inspecting a live value's runtime type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    Bool,
    Int32,
    Double,
    Float,
    UInt16,
    UInt32,
    UInt64,
    String,
    Duration,
    LocalizedText,
}

impl ScalarKind {
    /// Whether text can be coerced into this kind before falling back to
    /// reference binding. String-like kinds are never coerced.
    pub fn is_coercible(self) -> bool {
        !matches!(
            self,
            ScalarKind::String | ScalarKind::Duration | ScalarKind::LocalizedText
        )
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bool => "Bool",
            Self::Int32 => "Int32",
            Self::Double => "Double",
            Self::Float => "Float",
            Self::UInt16 => "UInt16",
            Self::UInt32 => "UInt32",
            Self::UInt64 => "UInt64",
            Self::String => "String",
            Self::Duration => "Duration",
            Self::LocalizedText => "LocalizedText",
        };
        write!(f, "{name}")
    }
}

/// Text could not be coerced into the requested [`ScalarKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueParseError {
    pub kind: ScalarKind,
}

impl fmt::Display for ValueParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Value cannot be parsed as {}", self.kind)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ValueParseError {}

/// A span of time stored as fractional milliseconds.
///
/// Parsed from `[d.]hh:mm[:ss[.fff]]` text (a bare integer counts whole
/// days) and rendered as `d.hh:mm:ss.fff`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Duration {
    millis: f64,
}

impl Duration {
    pub fn from_millis(millis: f64) -> Self {
        Self { millis }
    }

    pub fn as_millis(&self) -> f64 {
        self.millis
    }

    /// Parses duration text.
    ///
    /// Accepted forms: `d.hh:mm:ss.fff`, `hh:mm:ss.fff`, `hh:mm:ss`,
    /// `hh:mm` and a bare integer meaning whole days. Hours are limited to
    /// 0-23 and minutes/seconds to 0-59.
    pub fn parse(text: &str) -> Result<Self, ValueParseError> {
        const ERR: ValueParseError = ValueParseError {
            kind: ScalarKind::Duration,
        };
        let text = text.trim();
        if text.is_empty() {
            return Err(ERR);
        }

        // A bare integer is a count of whole days.
        if !text.contains(':') {
            let days: u32 = text.parse().map_err(|_| ERR)?;
            return Ok(Self::from_millis(days as f64 * 86_400_000.0));
        }

        let mut parts = text.split(':');
        let first = parts.next().ok_or(ERR)?;
        let (days, hours) = match first.split_once('.') {
            Some((d, h)) => (d.parse::<u32>().map_err(|_| ERR)?, h),
            None => (0, first),
        };
        let hours: u32 = hours.parse().map_err(|_| ERR)?;

        let minutes: u32 = parts.next().ok_or(ERR)?.parse().map_err(|_| ERR)?;

        let mut millis = 0.0;
        let mut seconds = 0;
        if let Some(sec_text) = parts.next() {
            let (s, frac) = match sec_text.split_once('.') {
                Some((s, frac)) => {
                    if frac.is_empty() || !frac.bytes().all(|b| b.is_ascii_digit()) {
                        return Err(ERR);
                    }
                    let mut scale = 1u64;
                    for _ in 0..frac.len() {
                        scale = scale.saturating_mul(10);
                    }
                    let digits = frac.parse::<u64>().map_err(|_| ERR)?;
                    (s, digits as f64 / scale as f64 * 1000.0)
                }
                None => (sec_text, 0.0),
            };
            seconds = s.parse().map_err(|_| ERR)?;
            millis = frac;
        }
        if parts.next().is_some() || hours > 23 || minutes > 59 || seconds > 59 {
            return Err(ERR);
        }

        let total = (((days as u64 * 24 + hours as u64) * 60 + minutes as u64) * 60
            + seconds as u64) as f64
            * 1000.0
            + millis;
        Ok(Self::from_millis(total))
    }
}

impl fmt::Display for Duration {
    /// Renders as `d.hh:mm:ss.fff`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.millis.max(0.0) as u64;
        let millis = total % 1000;
        let seconds = (total / 1000) % 60;
        let minutes = (total / 60_000) % 60;
        let hours = (total / 3_600_000) % 24;
        let days = total / 86_400_000;
        write!(f, "{days}.{hours:02}:{minutes:02}:{seconds:02}.{millis:03}")
    }
}

/// A translatable text value: either a translation key (`text_id`) into the
/// host's language tables, a plain literal, or both unset.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LocalizedText {
    pub text_id: Option<String>,
    pub text: Option<String>,
}

impl LocalizedText {
    pub fn from_key(key: impl Into<String>) -> Self {
        Self {
            text_id: Some(key.into()),
            text: None,
        }
    }

    pub fn has_text_id(&self) -> bool {
        self.text_id.as_deref().is_some_and(|id| !id.is_empty())
    }
}

/// Represents any literal value that can be stored in a property slot.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    Bool(bool),
    Int32(i32),
    Double(f64),
    Float(f32),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
    String(String),
    Duration(Duration),
    LocalizedText(LocalizedText),
}

impl ScalarValue {
    pub fn kind(&self) -> ScalarKind {
        match self {
            Self::Bool(_) => ScalarKind::Bool,
            Self::Int32(_) => ScalarKind::Int32,
            Self::Double(_) => ScalarKind::Double,
            Self::Float(_) => ScalarKind::Float,
            Self::UInt16(_) => ScalarKind::UInt16,
            Self::UInt32(_) => ScalarKind::UInt32,
            Self::UInt64(_) => ScalarKind::UInt64,
            Self::String(_) => ScalarKind::String,
            Self::Duration(_) => ScalarKind::Duration,
            Self::LocalizedText(_) => ScalarKind::LocalizedText,
        }
    }

    /// Coerces text into a value of exactly the given kind.
    ///
    /// Booleans accept `1`, `0`, `true` and `false` (ASCII
    /// case-insensitive); anything else is a parse failure so callers can
    /// fall through to reference binding. Numeric kinds use the standard
    /// string parsers on trimmed input.
    pub fn parse(kind: ScalarKind, text: &str) -> Result<Self, ValueParseError> {
        let err = ValueParseError { kind };
        let trimmed = text.trim();
        match kind {
            ScalarKind::Bool => match trimmed {
                "1" => Ok(Self::Bool(true)),
                "0" => Ok(Self::Bool(false)),
                _ if trimmed.eq_ignore_ascii_case("true") => Ok(Self::Bool(true)),
                _ if trimmed.eq_ignore_ascii_case("false") => Ok(Self::Bool(false)),
                _ => Err(err),
            },
            ScalarKind::Int32 => trimmed.parse().map(Self::Int32).map_err(|_| err),
            ScalarKind::Double => trimmed.parse().map(Self::Double).map_err(|_| err),
            ScalarKind::Float => trimmed.parse().map(Self::Float).map_err(|_| err),
            ScalarKind::UInt16 => trimmed.parse().map(Self::UInt16).map_err(|_| err),
            ScalarKind::UInt32 => trimmed.parse().map(Self::UInt32).map_err(|_| err),
            ScalarKind::UInt64 => trimmed.parse().map(Self::UInt64).map_err(|_| err),
            ScalarKind::String => Ok(Self::String(text.to_string())),
            ScalarKind::Duration => Duration::parse(text).map(Self::Duration),
            ScalarKind::LocalizedText => Ok(Self::LocalizedText(LocalizedText::from_key(text))),
        }
    }

    /// Renders the value back into field text.
    ///
    /// Strings round-trip verbatim; localized texts render their key.
    pub fn render(&self) -> String {
        match self {
            Self::Bool(v) => String::from(if *v { "true" } else { "false" }),
            Self::Int32(v) => v.to_string(),
            Self::Double(v) => v.to_string(),
            Self::Float(v) => v.to_string(),
            Self::UInt16(v) => v.to_string(),
            Self::UInt32(v) => v.to_string(),
            Self::UInt64(v) => v.to_string(),
            Self::String(v) => v.clone(),
            Self::Duration(v) => format!("{v}"),
            Self::LocalizedText(v) => v
                .text_id
                .clone()
                .or_else(|| v.text.clone())
                .unwrap_or_default(),
        }
    }
}
