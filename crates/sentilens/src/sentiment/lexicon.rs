//! AFINN 风格的词典打分器
//!
//! 分词规则：统一小写，常见标点替换为空格后按空白切分。
//! 从后往前扫描词元，命中词典时累加分值；若前一个词是否定词则分值取反。

use std::collections::HashMap;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info};

use super::scorer::{LexicalAnalysis, ScoreError, TextScorer};

const BUILTIN_LEXICON: &str = include_str!("afinn.tsv");

static PUNCTUATION: Lazy<Regex> = Lazy::new(|| Regex::new(r#"[.,/#!?$%^&*;:{}=_`"~()]"#).unwrap());

/// 前一个词命中时，当前词的分值取反
const NEGATORS: &[&str] = &[
    "ain't", "aint", "aren't", "arent", "barely", "cannot", "cant", "can't", "couldn't", "couldnt", "didn't",
    "didnt", "doesn't", "doesnt", "don't", "dont", "hadn't", "hadnt", "hardly", "hasn't", "hasnt", "haven't",
    "havent", "isn't", "isnt", "neither", "never", "no", "nobody", "non", "none", "nor", "not", "nothing",
    "nowhere", "scarcely", "shouldn't", "shouldnt", "wasn't", "wasnt", "weren't", "werent", "without", "won't",
    "wont", "wouldn't", "wouldnt",
];

/// 解析一行 `词<TAB>分值`，空行与 `#` 注释返回 None
fn parse_line(line: &str) -> Option<Result<(String, i32)>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let parsed = line
        .rsplit_once('\t')
        .ok_or_else(|| anyhow!("缺少制表符分隔: {}", line))
        .and_then(|(word, score)| {
            let score = score
                .trim()
                .parse::<i32>()
                .with_context(|| format!("分值不是整数: {}", line))?;
            Ok((word.trim().to_lowercase(), score))
        });
    Some(parsed)
}

pub fn tokenize(text: &str) -> Vec<String> {
    // 统一弯引号，`didn’t` 与 `didn't` 视为同一个词
    let lowered = text.to_lowercase().replace('\u{2019}', "'");
    PUNCTUATION
        .replace_all(&lowered, " ")
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone)]
pub struct LexiconScorer {
    words: HashMap<String, i32>,
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl LexiconScorer {
    /// 使用内置词典创建打分器
    pub fn new() -> Self {
        let words = BUILTIN_LEXICON
            .lines()
            .filter_map(parse_line)
            .filter_map(Result::ok)
            .collect();
        Self { words }
    }

    /// 加载额外词典文件，同名词覆盖内置分值
    pub fn with_extras(mut self, path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).with_context(|| format!("读取额外词典失败: {}", path.display()))?;

        let mut loaded = 0usize;
        for (index, line) in content.lines().enumerate() {
            if let Some(entry) = parse_line(line) {
                let (word, score) = entry.with_context(|| format!("{} 第 {} 行格式错误", path.display(), index + 1))?;
                self.words.insert(word, score);
                loaded += 1;
            }
        }

        info!("已加载额外词典 {}，共 {} 个词", path.display(), loaded);
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl TextScorer for LexiconScorer {
    fn analyze(&self, text: &str) -> Result<LexicalAnalysis, ScoreError> {
        let tokens = tokenize(text);
        let mut analysis = LexicalAnalysis::default();

        for (i, token) in tokens.iter().enumerate().rev() {
            let Some(&polarity) = self.words.get(token) else {
                continue;
            };

            let negated = i > 0 && NEGATORS.contains(&tokens[i - 1].as_str());
            let polarity = if negated { -polarity } else { polarity };

            if polarity > 0 {
                analysis.positive.push(token.clone());
            } else if polarity < 0 {
                analysis.negative.push(token.clone());
            }
            analysis.score += polarity;
        }

        analysis.comparative = if tokens.is_empty() {
            0.0
        } else {
            analysis.score as f64 / tokens.len() as f64
        };

        debug!(
            tokens = tokens.len(),
            score = analysis.score,
            comparative = analysis.comparative,
            "词典打分完成"
        );
        Ok(analysis)
    }
}
