use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Words whose reading is not the concatenation of their characters' readings.
/// Matched longest-first, so three-character entries win over their prefixes.
const COMPOUNDS: &[(&str, &str)] = &[
    ("日本語", "ニホンゴ"),
    ("東京", "トウキョウ"),
    ("京都", "キョウト"),
    ("日本", "ニホン"),
    ("今日", "キョウ"),
    ("明日", "アシタ"),
    ("昨日", "キノウ"),
    ("今年", "コトシ"),
    ("今朝", "ケサ"),
    ("毎日", "マイニチ"),
    ("大人", "オトナ"),
    ("一人", "ヒトリ"),
    ("二人", "フタリ"),
    ("時計", "トケイ"),
    ("時間", "ジカン"),
    ("世界", "セカイ"),
    ("漢字", "カンジ"),
    ("先生", "センセイ"),
    ("学生", "ガクセイ"),
    ("学校", "ガッコウ"),
    ("大学", "ダイガク"),
    ("会社", "カイシャ"),
    ("電話", "デンワ"),
    ("天気", "テンキ"),
    ("元気", "ゲンキ"),
    ("友達", "トモダチ"),
    ("名前", "ナマエ"),
    ("言葉", "コトバ"),
    ("仕事", "シゴト"),
    ("食事", "ショクジ"),
    ("翻訳", "ホンヤク"),
    ("変換", "ヘンカン"),
    ("自分", "ジブン"),
    ("人間", "ニンゲン"),
    ("音楽", "オンガク"),
    ("映画", "エイガ"),
    ("電車", "デンシャ"),
    ("自動車", "ジドウシャ"),
    ("中国", "チュウゴク"),
    ("外国", "ガイコク"),
    ("英語", "エイゴ"),
    ("一緒", "イッショ"),
];

const KANJI: &[(char, &str)] = &[
    // numerals and counting
    ('一', "イチ"),
    ('二', "ニ"),
    ('三', "サン"),
    ('四', "ヨン"),
    ('五', "ゴ"),
    ('六', "ロク"),
    ('七', "ナナ"),
    ('八', "ハチ"),
    ('九', "キュウ"),
    ('十', "ジュウ"),
    ('百', "ヒャク"),
    ('千', "セン"),
    ('万', "マン"),
    ('円', "エン"),
    ('半', "ハン"),
    ('毎', "マイ"),
    // time
    ('日', "ニチ"),
    ('月', "ゲツ"),
    ('火', "カ"),
    ('水', "スイ"),
    ('木', "モク"),
    ('金', "キン"),
    ('土', "ド"),
    ('年', "ネン"),
    ('時', "ジ"),
    ('分', "フン"),
    ('週', "シュウ"),
    ('今', "イマ"),
    ('春', "ハル"),
    ('夏', "ナツ"),
    ('秋', "アキ"),
    ('冬', "フユ"),
    ('朝', "アサ"),
    ('昼', "ヒル"),
    ('夜', "ヨル"),
    ('夕', "ユウ"),
    ('間', "アイダ"),
    // people
    ('人', "ヒト"),
    ('男', "オトコ"),
    ('女', "オンナ"),
    ('子', "コ"),
    ('父', "チチ"),
    ('母', "ハハ"),
    ('友', "トモ"),
    ('私', "ワタシ"),
    ('僕', "ボク"),
    ('君', "キミ"),
    ('彼', "カレ"),
    ('達', "タチ"),
    ('皆', "ミナ"),
    // body
    ('目', "メ"),
    ('口', "クチ"),
    ('耳', "ミミ"),
    ('手', "テ"),
    ('足', "アシ"),
    ('心', "ココロ"),
    ('体', "カラダ"),
    ('頭', "アタマ"),
    ('顔', "カオ"),
    ('力', "チカラ"),
    // nature
    ('山', "ヤマ"),
    ('川', "カワ"),
    ('海', "ウミ"),
    ('空', "ソラ"),
    ('雨', "アメ"),
    ('雪', "ユキ"),
    ('風', "カゼ"),
    ('花', "ハナ"),
    ('森', "モリ"),
    ('林', "ハヤシ"),
    ('石', "イシ"),
    ('天', "テン"),
    ('気', "キ"),
    ('星', "ホシ"),
    ('光', "ヒカリ"),
    ('犬', "イヌ"),
    ('猫', "ネコ"),
    ('鳥', "トリ"),
    ('魚', "サカナ"),
    ('馬', "ウマ"),
    ('牛', "ウシ"),
    // places and directions
    ('上', "ウエ"),
    ('下', "シタ"),
    ('中', "ナカ"),
    ('外', "ソト"),
    ('左', "ヒダリ"),
    ('右', "ミギ"),
    ('前', "マエ"),
    ('後', "アト"),
    ('東', "ヒガシ"),
    ('西', "ニシ"),
    ('南', "ミナミ"),
    ('北', "キタ"),
    ('国', "クニ"),
    ('京', "キョウ"),
    ('都', "ト"),
    ('町', "マチ"),
    ('村', "ムラ"),
    ('家', "イエ"),
    ('店', "ミセ"),
    ('駅', "エキ"),
    ('道', "ミチ"),
    ('門', "モン"),
    ('車', "クルマ"),
    ('電', "デン"),
    // qualities
    ('大', "ダイ"),
    ('小', "ショウ"),
    ('高', "タカ"),
    ('安', "ヤス"),
    ('新', "シン"),
    ('古', "フル"),
    ('長', "ナガ"),
    ('早', "ハヤ"),
    ('白', "シロ"),
    ('黒', "クロ"),
    ('赤', "アカ"),
    ('青', "アオ"),
    ('多', "オオ"),
    ('少', "スク"),
    ('近', "チカ"),
    ('遠', "トオ"),
    ('強', "ツヨ"),
    ('弱', "ヨワ"),
    ('同', "オナ"),
    ('明', "メイ"),
    ('正', "セイ"),
    ('好', "ス"),
    ('楽', "タノ"),
    ('元', "ゲン"),
    // verbs (stems; okurigana follows as kana)
    ('行', "イ"),
    ('来', "ク"),
    ('見', "ミ"),
    ('食', "タ"),
    ('飲', "ノ"),
    ('話', "ハナ"),
    ('読', "ヨ"),
    ('書', "カ"),
    ('聞', "キ"),
    ('言', "イ"),
    ('思', "オモ"),
    ('知', "シ"),
    ('休', "ヤス"),
    ('買', "カ"),
    ('出', "デ"),
    ('入', "ハイ"),
    ('立', "タ"),
    ('合', "ア"),
    ('会', "カイ"),
    // things and ideas
    ('学', "ガク"),
    ('校', "コウ"),
    ('生', "セイ"),
    ('先', "サキ"),
    ('本', "ホン"),
    ('語', "ゴ"),
    ('文', "ブン"),
    ('字', "ジ"),
    ('漢', "カン"),
    ('名', "ナ"),
    ('物', "モノ"),
    ('事', "コト"),
    ('自', "ジ"),
    ('世', "セ"),
    ('界', "カイ"),
    ('愛', "アイ"),
    ('夢', "ユメ"),
    ('音', "オト"),
    ('色', "イロ"),
    ('茶', "チャ"),
    ('米', "コメ"),
    ('肉', "ニク"),
    ('酒', "サケ"),
    ('変', "ヘン"),
    ('換', "カン"),
    ('翻', "ホン"),
    ('訳', "ヤク"),
    ('何', "ナニ"),
];

static KANJI_READINGS: Lazy<HashMap<char, &'static str>> =
    Lazy::new(|| KANJI.iter().copied().collect());

static COMPOUND_READINGS: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| COMPOUNDS.iter().copied().collect());

static MAX_COMPOUND_CHARS: Lazy<usize> = Lazy::new(|| {
    COMPOUNDS
        .iter()
        .map(|(word, _)| word.chars().count())
        .max()
        .unwrap_or(0)
});

pub fn lookup_kanji(c: char) -> Option<&'static str> {
    KANJI_READINGS.get(&c).copied()
}

/// Longest compound starting at `chars[0]`, as (reading, chars consumed).
pub(crate) fn lookup_compound(chars: &[char]) -> Option<(&'static str, usize)> {
    let longest = chars.len().min(*MAX_COMPOUND_CHARS);
    (2..=longest).rev().find_map(|len| {
        let word: String = chars[..len].iter().collect();
        COMPOUND_READINGS
            .get(word.as_str())
            .map(|reading| (*reading, len))
    })
}
