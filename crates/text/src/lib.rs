//! Chat text handling for mob messages.
//!
//! Templates are written with an alternate color escape (`&a`, `&l`, ...) which
//! is translated into the section sign convention understood by clients. Hosts
//! that speak the JSON chat format can turn the translated text into
//! [`TextComponent`]s.

use serde::Serialize;

/// The escape character clients use for legacy formatting codes.
pub const SECTION_SIGN: char = '§';

/// The escape character template authors use in configuration files.
pub const ALTERNATE_COLOR_CHAR: char = '&';

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ColorCode {
    Black,
    DarkBlue,
    DarkGreen,
    DarkAqua,
    DarkRed,
    DarkPurple,
    Gold,
    Gray,
    DarkGray,
    Blue,
    Green,
    Aqua,
    Red,
    LightPurple,
    Yellow,
    White,
    Obfuscated,
    Bold,
    Strikethrough,
    Underline,
    Italic,
    Reset,
}

impl ColorCode {
    /// Parses a code character. Upper case codes are accepted.
    pub fn parse(code: char) -> Option<ColorCode> {
        Some(match code.to_ascii_lowercase() {
            '0' => ColorCode::Black,
            '1' => ColorCode::DarkBlue,
            '2' => ColorCode::DarkGreen,
            '3' => ColorCode::DarkAqua,
            '4' => ColorCode::DarkRed,
            '5' => ColorCode::DarkPurple,
            '6' => ColorCode::Gold,
            '7' => ColorCode::Gray,
            '8' => ColorCode::DarkGray,
            '9' => ColorCode::Blue,
            'a' => ColorCode::Green,
            'b' => ColorCode::Aqua,
            'c' => ColorCode::Red,
            'd' => ColorCode::LightPurple,
            'e' => ColorCode::Yellow,
            'f' => ColorCode::White,
            'k' => ColorCode::Obfuscated,
            'l' => ColorCode::Bold,
            'm' => ColorCode::Strikethrough,
            'n' => ColorCode::Underline,
            'o' => ColorCode::Italic,
            'r' => ColorCode::Reset,
            _ => return None,
        })
    }

    pub fn code(self) -> char {
        match self {
            ColorCode::Black => '0',
            ColorCode::DarkBlue => '1',
            ColorCode::DarkGreen => '2',
            ColorCode::DarkAqua => '3',
            ColorCode::DarkRed => '4',
            ColorCode::DarkPurple => '5',
            ColorCode::Gold => '6',
            ColorCode::Gray => '7',
            ColorCode::DarkGray => '8',
            ColorCode::Blue => '9',
            ColorCode::Green => 'a',
            ColorCode::Aqua => 'b',
            ColorCode::Red => 'c',
            ColorCode::LightPurple => 'd',
            ColorCode::Yellow => 'e',
            ColorCode::White => 'f',
            ColorCode::Obfuscated => 'k',
            ColorCode::Bold => 'l',
            ColorCode::Strikethrough => 'm',
            ColorCode::Underline => 'n',
            ColorCode::Italic => 'o',
            ColorCode::Reset => 'r',
        }
    }

    fn is_formatting(self) -> bool {
        use ColorCode::*;
        matches!(
            self,
            Obfuscated | Bold | Strikethrough | Underline | Italic | Reset
        )
    }
}

impl std::fmt::Display for ColorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", SECTION_SIGN, self.code())
    }
}

/// Replaces `alt_char` followed by a valid code with the section sign.
///
/// An escape character that is not followed by a known code is left alone, so
/// `"Tom & Jerry"` survives untouched.
pub fn translate_alternate_color_codes(alt_char: char, text: &str) -> String {
    let mut translated = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == alt_char {
            if let Some(color) = chars.peek().copied().and_then(ColorCode::parse) {
                chars.next();
                translated.push(SECTION_SIGN);
                translated.push(color.code());
                continue;
            }
        }
        translated.push(c);
    }
    translated
}

/// Removes all section sign formatting codes, e.g. for console output.
pub fn strip_color(text: &str) -> String {
    let mut stripped = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == SECTION_SIGN && chars.peek().copied().and_then(ColorCode::parse).is_some() {
            chars.next();
            continue;
        }
        stripped.push(c);
    }
    stripped
}

/// This is only used for `TextComponent` serialize
#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_false(field: &bool) -> bool {
    !*field
}

#[derive(Serialize, Default, Debug, Clone, PartialEq, Eq)]
pub struct TextComponent {
    pub text: String,
    #[serde(skip_serializing_if = "is_false")]
    pub bold: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub italic: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub underlined: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub strikethrough: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub obfuscated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorCode>,
}

impl TextComponent {
    /// Splits section sign formatted text into styled components.
    ///
    /// A color code starts a fresh component (clearing styles), a formatting
    /// code adds to the current style and `§r` resets everything.
    pub fn from_legacy_text(message: &str) -> Vec<TextComponent> {
        let mut components = Vec::new();
        let mut current = TextComponent::default();

        let mut chars = message.chars();
        while let Some(c) = chars.next() {
            if c != SECTION_SIGN {
                current.text.push(c);
                continue;
            }
            let Some(code) = chars.next() else {
                current.text.push(c);
                break;
            };
            let Some(color) = ColorCode::parse(code) else {
                current.text.push(c);
                current.text.push(code);
                continue;
            };

            let mut next = if color == ColorCode::Reset {
                TextComponent::default()
            } else if color.is_formatting() {
                current.style()
            } else {
                TextComponent {
                    color: Some(color),
                    ..Default::default()
                }
            };
            match color {
                ColorCode::Bold => next.bold = true,
                ColorCode::Italic => next.italic = true,
                ColorCode::Underline => next.underlined = true,
                ColorCode::Strikethrough => next.strikethrough = true,
                ColorCode::Obfuscated => next.obfuscated = true,
                _ => {}
            }

            if !current.text.is_empty() {
                components.push(current);
            }
            current = next;
        }
        if !current.text.is_empty() || components.is_empty() {
            components.push(current);
        }

        components
    }

    /// Copies the styling of this component without its text.
    fn style(&self) -> TextComponent {
        TextComponent {
            text: String::new(),
            ..self.clone()
        }
    }

    pub fn encode_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn is_text_only(&self) -> bool {
        !self.bold
            && !self.italic
            && !self.underlined
            && !self.strikethrough
            && !self.obfuscated
            && self.color.is_none()
    }
}

impl<S> From<S> for TextComponent
where
    S: Into<String>,
{
    fn from(value: S) -> Self {
        TextComponent {
            text: value.into(),
            ..Default::default()
        }
    }
}
