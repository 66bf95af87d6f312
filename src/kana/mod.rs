//! Local katakana conversion that works without any external service.
//!
//! Output of [`force_katakana`] contains only katakana, printable ASCII and
//! whitespace. Kanji are read from a small static table; anything the table
//! does not know becomes the placeholder [`PLACEHOLDER`].

mod kanji;

pub use kanji::lookup_kanji;

use crate::script;

/// Emitted for every character that cannot be read.
pub const PLACEHOLDER: char = 'カ';

const HIRAGANA_OFFSET: u32 = 0x60;
const FULLWIDTH_OFFSET: u32 = 0xFEE0;
const HALFWIDTH_KATAKANA: &str =
    "ヲァィゥェォャュョッーアイウエオカキクケコサシスセソタチツテトナニヌネノハヒフヘホマミムメモヤユヨラリルレロワン";
const VOICEABLE: &str = "カキクケコサシスセソタチツテトハヒフヘホ";
const SEMI_VOICEABLE: &str = "ハヒフヘホ";

pub fn hiragana_to_katakana(text: &str) -> String {
    text.chars().map(shift_hiragana).collect()
}

fn shift_hiragana(c: char) -> char {
    let shiftable = ('\u{3041}'..='\u{3096}').contains(&c) || matches!(c, 'ゝ' | 'ゞ');
    if !shiftable {
        return c;
    }
    char::from_u32(c as u32 + HIRAGANA_OFFSET).unwrap_or(c)
}

pub fn is_allowed(c: char) -> bool {
    ('\u{30A0}'..='\u{30FF}').contains(&c)
        || ('\u{31F0}'..='\u{31FF}').contains(&c)
        || (' '..='~').contains(&c)
        || c.is_whitespace()
}

pub fn is_katakana_safe(text: &str) -> bool {
    text.chars().all(is_allowed)
}

/// Converts arbitrary text into katakana-safe text. Never fails.
pub fn force_katakana(text: &str) -> String {
    let chars = normalize(&hiragana_to_katakana(text));
    let mut out = String::with_capacity(chars.len() * 3);
    let mut last_reading: Option<&'static str> = None;
    let mut index = 0;

    while index < chars.len() {
        let c = chars[index];
        if is_allowed(c) {
            out.push(c);
            last_reading = None;
            index += 1;
            continue;
        }
        if let Some((reading, consumed)) = kanji::lookup_compound(&chars[index..]) {
            out.push_str(reading);
            last_reading = Some(reading);
            index += consumed;
            continue;
        }
        if c == '々' {
            match last_reading {
                Some(reading) => out.push_str(reading),
                None => out.push(PLACEHOLDER),
            }
            index += 1;
            continue;
        }
        match lookup_kanji(c) {
            Some(reading) => {
                out.push_str(reading);
                last_reading = Some(reading);
            }
            None => {
                out.push(PLACEHOLDER);
                last_reading = None;
            }
        }
        index += 1;
    }
    out
}

/// Re-applies [`force_katakana`] only when something disallowed slipped
/// through an earlier stage.
pub fn final_check(text: &str) -> String {
    if is_katakana_safe(text) {
        text.to_string()
    } else {
        force_katakana(text)
    }
}

/// Folds width variants, Japanese punctuation and voicing marks into
/// characters the allowed set understands. Control characters are dropped.
fn normalize(text: &str) -> Vec<char> {
    let mut out: Vec<char> = Vec::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\u{3099}' | '\u{309B}' | '\u{FF9E}' => {
                merge_voicing(&mut out, VOICEABLE, 1);
            }
            '\u{309A}' | '\u{309C}' | '\u{FF9F}' => {
                merge_voicing(&mut out, SEMI_VOICEABLE, 2);
            }
            _ if c.is_control() && !c.is_whitespace() => {}
            _ => out.push(normalize_char(c)),
        }
    }
    out
}

fn normalize_char(c: char) -> char {
    match c {
        '\u{3000}' => ' ',
        '。' | '｡' => '.',
        '、' | '､' => ',',
        '「' | '」' | '『' | '』' | '｢' | '｣' => '"',
        '･' => '・',
        '〜' => '~',
        '【' | '〔' => '[',
        '】' | '〕' => ']',
        '〈' | '《' => '<',
        '〉' | '》' => '>',
        _ if ('\u{FF01}'..='\u{FF5E}').contains(&c) => {
            char::from_u32(c as u32 - FULLWIDTH_OFFSET).unwrap_or(c)
        }
        _ if script::is_halfwidth_katakana(c) => widen_katakana(c),
        _ => c,
    }
}

fn widen_katakana(c: char) -> char {
    let index = (c as u32 - 0xFF66) as usize;
    HALFWIDTH_KATAKANA.chars().nth(index).unwrap_or(c)
}

fn merge_voicing(out: &mut [char], bases: &str, step: u32) {
    let Some(last) = out.last_mut() else {
        return;
    };
    if *last == 'ウ' && step == 1 {
        *last = 'ヴ';
    } else if bases.contains(*last) {
        if let Some(voiced) = char::from_u32(*last as u32 + step) {
            *last = voiced;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hiragana_shifts_to_katakana() {
        assert_eq!(hiragana_to_katakana("ひらがな"), "ヒラガナ");
        assert_eq!(hiragana_to_katakana("ぁゖ"), "ァヶ");
        assert_eq!(hiragana_to_katakana("ゝゞ"), "ヽヾ");
        assert_eq!(hiragana_to_katakana("abc 漢"), "abc 漢");
    }

    #[test]
    fn hiragana_conversion_is_idempotent() {
        for input in ["こんにちは", "カタカナとひらがな", "mixed ﾃｷｽﾄ and 漢字", ""] {
            let once = hiragana_to_katakana(input);
            assert_eq!(hiragana_to_katakana(&once), once);
        }
    }

    #[test]
    fn known_kanji_uses_table_reading() {
        assert_eq!(lookup_kanji('一'), Some("イチ"));
        assert_eq!(force_katakana("一"), "イチ");
    }

    #[test]
    fn unknown_kanji_becomes_placeholder() {
        assert_eq!(lookup_kanji('薔'), None);
        assert_eq!(force_katakana("薔"), "カ");
        assert_eq!(force_katakana("薔薇"), "カカ");
    }

    #[test]
    fn compounds_and_okurigana() {
        assert_eq!(force_katakana("東京へ行く"), "トウキョウヘイク");
        assert_eq!(force_katakana("漢字のテスト"), "カンジノテスト");
        assert_eq!(force_katakana("人々"), "ヒトヒト");
    }

    #[test]
    fn width_and_punctuation_are_normalized() {
        assert_eq!(force_katakana("ＡＢＣ１２３！"), "ABC123!");
        assert_eq!(force_katakana("はい。いいえ、「それ」"), "ハイ.イイエ,\"ソレ\"");
        assert_eq!(force_katakana("ｶﾀｶﾅ"), "カタカナ");
        assert_eq!(force_katakana("ｶﾞｯｺｳ ﾊﾟﾝ ｳﾞ"), "ガッコウ パン ヴ");
        assert_eq!(force_katakana("か\u{3099}"), "ガ");
        assert_eq!(force_katakana("a\u{3000}b"), "a b");
    }

    #[test]
    fn control_characters_are_dropped() {
        assert_eq!(force_katakana("a\u{0007}b\tc\n"), "ab\tc\n");
    }

    #[test]
    fn foreign_scripts_collapse_to_placeholders() {
        assert_eq!(force_katakana("Ωß"), "カカ");
        assert_eq!(force_katakana("😀"), "カ");
    }

    #[test]
    fn force_then_final_check_is_always_safe() {
        let inputs = [
            "",
            "hello world",
            "こんにちは、世界！",
            "薔薇の花",
            "Tokyo東京 2024年",
            "ｺﾝﾆﾁﾊ｡",
            "가나다 αβγ 🍣",
            "々々",
            "\u{309B}\u{309C}",
        ];
        for input in inputs {
            let out = final_check(&force_katakana(input));
            assert!(is_katakana_safe(&out), "{input:?} -> {out:?}");
        }
    }

    #[test]
    fn final_check_leaves_safe_text_untouched() {
        assert_eq!(final_check("カタカナ ok!"), "カタカナ ok!");
        assert_eq!(final_check("ひらがな"), "ヒラガナ");
    }
}
