//! Built-in vocabulary so the app is usable without any configured source.

use crate::domain::VocabRecord;
use crate::vocab::{records_from_rows, RawVocabRow};

fn row(
  id: u64,
  chinese: &str,
  pinyin: &str,
  english: &str,
  word_type: &str,
  category: &str,
  words: &[(&str, &str)],
) -> RawVocabRow {
  let mut r = RawVocabRow {
    id: Some(id),
    chinese: Some(chinese.into()),
    pinyin: Some(pinyin.into()),
    english: Some(english.into()),
    word_type: Some(word_type.into()),
    priority: Some(1),
    known: Some(1),
    quality: Some(1),
    category1: Some(category.into()),
    ..Default::default()
  };
  let mut it = words.iter().map(|(zh, en)| (Some(zh.to_string()), Some(en.to_string())));
  if let Some((zh, en)) = it.next() { r.word1 = zh; r.word1_english = en; }
  if let Some((zh, en)) = it.next() { r.word2 = zh; r.word2_english = en; }
  if let Some((zh, en)) = it.next() { r.word3 = zh; r.word3_english = en; }
  if let Some((zh, en)) = it.next() { r.word4 = zh; r.word4_english = en; }
  r
}

/// Minimal set of combo words that guarantee the quiz works out of the box.
pub fn seed_vocab() -> Vec<VocabRecord> {
  records_from_rows(vec![
    row(1, "黄油", "huáng yóu", "butter", "combo", "food", &[("黄", "yellow"), ("油", "oil")]),
    row(2, "保险", "bǎo xiǎn", "insurance", "combo", "finance", &[("保安", "protect"), ("危险", "danger")]),
    row(3, "半岛", "bàn dǎo", "peninsula", "combo", "geography", &[("半", "half"), ("岛", "island")]),
    row(4, "房贷", "fáng dài", "mortgage; home loan", "combo", "finance", &[("房子", "house"), ("贷款", "loan")]),
    row(5, "油田", "yóu tián", "oil field", "combo", "geography", &[("油", "oil"), ("田", "field")]),
    row(6, "牛奶", "niú nǎi", "milk; cow's milk", "combo", "food", &[("牛", "cow"), ("奶", "milk")]),
    row(7, "牛肉", "niú ròu", "beef", "combo", "food", &[("牛", "cow"), ("肉", "meat")]),
    row(8, "酱油", "jiàng yóu", "soy sauce", "combo", "food", &[("酱", "sauce"), ("油", "oil")]),
    row(9, "加油站", "jiā yóu zhàn", "gas station; petrol station", "phrase", "transport", &[("加油", "refuel"), ("站", "station")]),
    row(10, "油", "yóu", "oil", "single char", "food", &[]),
    row(11, "牛", "niú", "cow; ox", "single char", "animals", &[]),
    row(12, "危险", "wēi xiǎn", "danger; dangerous", "two word", "general", &[("危", "danger"), ("险", "risk")]),
  ])
}
