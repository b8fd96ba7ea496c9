//! The 66 books of the Protestant canon.

use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Testament {
    Old,
    New,
}

/// A book of the Bible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Book {
    /// Traditional Chinese name, e.g. `創世記`.
    pub name: &'static str,
    /// Short form used by the FHL API, e.g. `創`.
    pub abbreviation: &'static str,
    pub english: &'static str,
    pub chapters: u32,
    pub testament: Testament,
}

impl Book {
    pub fn has_chapter(&self, chapter: u32) -> bool {
        (1..=self.chapters).contains(&chapter)
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

const fn book(
    name: &'static str,
    abbreviation: &'static str,
    english: &'static str,
    chapters: u32,
    testament: Testament,
) -> Book {
    Book {
        name,
        abbreviation,
        english,
        chapters,
        testament,
    }
}

/// Every book, in canonical order.
pub const BIBLE_BOOKS: [Book; 66] = [
    book("創世記", "創", "Genesis", 50, Testament::Old),
    book("出埃及記", "出", "Exodus", 40, Testament::Old),
    book("利未記", "利", "Leviticus", 27, Testament::Old),
    book("民數記", "民", "Numbers", 36, Testament::Old),
    book("申命記", "申", "Deuteronomy", 34, Testament::Old),
    book("約書亞記", "書", "Joshua", 24, Testament::Old),
    book("士師記", "士", "Judges", 21, Testament::Old),
    book("路得記", "得", "Ruth", 4, Testament::Old),
    book("撒母耳記上", "撒上", "1 Samuel", 31, Testament::Old),
    book("撒母耳記下", "撒下", "2 Samuel", 24, Testament::Old),
    book("列王紀上", "王上", "1 Kings", 22, Testament::Old),
    book("列王紀下", "王下", "2 Kings", 25, Testament::Old),
    book("歷代志上", "代上", "1 Chronicles", 29, Testament::Old),
    book("歷代志下", "代下", "2 Chronicles", 36, Testament::Old),
    book("以斯拉記", "拉", "Ezra", 10, Testament::Old),
    book("尼希米記", "尼", "Nehemiah", 13, Testament::Old),
    book("以斯帖記", "斯", "Esther", 10, Testament::Old),
    book("約伯記", "伯", "Job", 42, Testament::Old),
    book("詩篇", "詩", "Psalms", 150, Testament::Old),
    book("箴言", "箴", "Proverbs", 31, Testament::Old),
    book("傳道書", "傳", "Ecclesiastes", 12, Testament::Old),
    book("雅歌", "歌", "Song of Songs", 8, Testament::Old),
    book("以賽亞書", "賽", "Isaiah", 66, Testament::Old),
    book("耶利米書", "耶", "Jeremiah", 52, Testament::Old),
    book("耶利米哀歌", "哀", "Lamentations", 5, Testament::Old),
    book("以西結書", "結", "Ezekiel", 48, Testament::Old),
    book("但以理書", "但", "Daniel", 12, Testament::Old),
    book("何西阿書", "何", "Hosea", 14, Testament::Old),
    book("約珥書", "珥", "Joel", 3, Testament::Old),
    book("阿摩司書", "摩", "Amos", 9, Testament::Old),
    book("俄巴底亞書", "俄", "Obadiah", 1, Testament::Old),
    book("約拿書", "拿", "Jonah", 4, Testament::Old),
    book("彌迦書", "彌", "Micah", 7, Testament::Old),
    book("那鴻書", "鴻", "Nahum", 3, Testament::Old),
    book("哈巴谷書", "哈", "Habakkuk", 3, Testament::Old),
    book("西番雅書", "番", "Zephaniah", 3, Testament::Old),
    book("哈該書", "該", "Haggai", 2, Testament::Old),
    book("撒迦利亞書", "亞", "Zechariah", 14, Testament::Old),
    book("瑪拉基書", "瑪", "Malachi", 4, Testament::Old),
    book("馬太福音", "太", "Matthew", 28, Testament::New),
    book("馬可福音", "可", "Mark", 16, Testament::New),
    book("路加福音", "路", "Luke", 24, Testament::New),
    book("約翰福音", "約", "John", 21, Testament::New),
    book("使徒行傳", "徒", "Acts", 28, Testament::New),
    book("羅馬書", "羅", "Romans", 16, Testament::New),
    book("哥林多前書", "林前", "1 Corinthians", 16, Testament::New),
    book("哥林多後書", "林後", "2 Corinthians", 13, Testament::New),
    book("加拉太書", "加", "Galatians", 6, Testament::New),
    book("以弗所書", "弗", "Ephesians", 6, Testament::New),
    book("腓立比書", "腓", "Philippians", 4, Testament::New),
    book("歌羅西書", "西", "Colossians", 4, Testament::New),
    book("帖撒羅尼迦前書", "帖前", "1 Thessalonians", 5, Testament::New),
    book("帖撒羅尼迦後書", "帖後", "2 Thessalonians", 3, Testament::New),
    book("提摩太前書", "提前", "1 Timothy", 6, Testament::New),
    book("提摩太後書", "提後", "2 Timothy", 4, Testament::New),
    book("提多書", "多", "Titus", 3, Testament::New),
    book("腓利門書", "門", "Philemon", 1, Testament::New),
    book("希伯來書", "來", "Hebrews", 13, Testament::New),
    book("雅各書", "雅", "James", 5, Testament::New),
    book("彼得前書", "彼前", "1 Peter", 5, Testament::New),
    book("彼得後書", "彼後", "2 Peter", 3, Testament::New),
    book("約翰一書", "約一", "1 John", 5, Testament::New),
    book("約翰二書", "約二", "2 John", 1, Testament::New),
    book("約翰三書", "約三", "3 John", 1, Testament::New),
    book("猶大書", "猶", "Jude", 1, Testament::New),
    book("啟示錄", "啟", "Revelation", 22, Testament::New),
];

/// Looks a book up by Chinese name, abbreviation or English name.
pub fn find_book(name: &str) -> Option<&'static Book> {
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    BIBLE_BOOKS.iter().find(|book| {
        book.name == name || book.abbreviation == name || book.english.eq_ignore_ascii_case(name)
    })
}
