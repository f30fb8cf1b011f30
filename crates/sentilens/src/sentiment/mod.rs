//! 情感打分
//!
//! - `scorer`：打分契约、情感标签与置信度启发式
//! - `lexicon`：默认的词典打分实现

pub mod lexicon;
pub mod scorer;

pub use lexicon::LexiconScorer;
pub use scorer::{ScoreError, ScoreOutcome, SentimentScorer};
