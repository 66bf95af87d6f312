//! Character-level Unicode classification for deciding how text is routed.
//!
//! Japanese script is hiragana, katakana (including halfwidth and the phonetic
//! extensions), CJK ideographs, and the fullwidth/CJK punctuation blocks. Any
//! other alphabetic character is a *foreign letter*; a single foreign letter
//! is enough to send the text through translation.

pub fn is_hiragana(c: char) -> bool {
    ('\u{3041}'..='\u{309F}').contains(&c)
}

pub fn is_katakana(c: char) -> bool {
    ('\u{30A0}'..='\u{30FF}').contains(&c)
        || ('\u{31F0}'..='\u{31FF}').contains(&c)
        || is_halfwidth_katakana(c)
}

pub fn is_halfwidth_katakana(c: char) -> bool {
    ('\u{FF66}'..='\u{FF9F}').contains(&c)
}

pub fn is_kanji(c: char) -> bool {
    ('\u{4E00}'..='\u{9FFF}').contains(&c)
        || ('\u{3400}'..='\u{4DBF}').contains(&c)
        || ('\u{20000}'..='\u{2A6DF}').contains(&c)
        || ('\u{F900}'..='\u{FAFF}').contains(&c)
        || c == '々'
}

/// Fullwidth ASCII variants and CJK symbols/punctuation (including U+3000).
pub fn is_fullwidth(c: char) -> bool {
    ('\u{FF01}'..='\u{FF5E}').contains(&c) || ('\u{3000}'..='\u{303F}').contains(&c)
}

pub fn is_japanese(c: char) -> bool {
    is_hiragana(c) || is_katakana(c) || is_kanji(c) || is_fullwidth(c)
}

fn is_foreign_letter(c: char) -> bool {
    c.is_alphabetic() && !is_japanese(c)
}

/// Whether `text` should be translated to Japanese before transliteration.
///
/// True as soon as one foreign letter is present, so mixed input such as
/// `Tokyo東京` is translated as a whole.
pub fn needs_translation(text: &str) -> bool {
    text.chars().any(is_foreign_letter)
}
