//! Token estimation for the emitted document
//!
//! Uses tiktoken encodings (cl100k_base by default) with a character-class
//! heuristic as fallback, so `--stats` can tell how much of a model's context
//! window the document will take.

use once_cell::sync::Lazy;
use std::fmt;
use std::str::FromStr;
use tiktoken_rs::{cl100k_base, o200k_base, CoreBPE};

/// Supported token encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokenModel {
    /// cl100k_base (GPT-4, GPT-3.5; a fair approximation for Claude)
    #[default]
    Cl100k,
    /// o200k_base (GPT-4o)
    O200k,
    /// Character-class estimate, no BPE
    Heuristic,
}

impl TokenModel {
    fn bpe(&self) -> Option<&'static CoreBPE> {
        match self {
            TokenModel::Cl100k => CL100K_BPE.as_ref().ok(),
            TokenModel::O200k => O200K_BPE.as_ref().ok(),
            TokenModel::Heuristic => None,
        }
    }

    pub fn available_models() -> &'static [&'static str] {
        &["cl100k", "o200k", "heuristic"]
    }
}

impl fmt::Display for TokenModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenModel::Cl100k => "cl100k",
            TokenModel::O200k => "o200k",
            TokenModel::Heuristic => "heuristic",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for TokenModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cl100k" | "cl100k_base" | "gpt4" | "claude" => Ok(TokenModel::Cl100k),
            "o200k" | "o200k_base" | "gpt4o" => Ok(TokenModel::O200k),
            "heuristic" | "fast" => Ok(TokenModel::Heuristic),
            _ => Err(format!(
                "Unknown model: {}. Available: {}",
                s,
                TokenModel::available_models().join(", ")
            )),
        }
    }
}

// Loaded once on first use
static CL100K_BPE: Lazy<Result<CoreBPE, String>> =
    Lazy::new(|| cl100k_base().map_err(|e| format!("Failed to load cl100k_base: {}", e)));

static O200K_BPE: Lazy<Result<CoreBPE, String>> =
    Lazy::new(|| o200k_base().map_err(|e| format!("Failed to load o200k_base: {}", e)));

/// Count tokens in `text`, falling back to the heuristic when the encoding
/// cannot be loaded
pub fn count_tokens(text: &str, model: TokenModel) -> usize {
    if text.is_empty() {
        return 0;
    }

    match model.bpe() {
        Some(bpe) => bpe.encode_with_special_tokens(text).len(),
        None => estimate_tokens_heuristic(text),
    }
}

/// Rough estimate: ~4 ASCII chars per token, ~2 per punctuation or
/// non-ASCII char.
pub fn estimate_tokens_heuristic(text: &str) -> usize {
    let (mut plain, mut dense) = (0usize, 0usize);
    for c in text.chars() {
        if c.is_ascii_alphanumeric() || c.is_ascii_whitespace() {
            plain += 1;
        } else {
            dense += 1;
        }
    }
    plain.div_ceil(4) + dense.div_ceil(2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_tokens_empty() {
        assert_eq!(count_tokens("", TokenModel::Cl100k), 0);
        assert_eq!(count_tokens("", TokenModel::Heuristic), 0);
    }

    #[test]
    fn test_count_tokens_code() {
        let text = "package main\n\nfunc main() { println(\"hi\") }\n";
        let tokens = count_tokens(text, TokenModel::Cl100k);
        assert!(tokens > 5 && tokens < 40);
    }

    #[test]
    fn test_o200k_counts() {
        assert!(count_tokens("Hello world", TokenModel::O200k) > 0);
    }

    #[test]
    fn test_heuristic_ascii() {
        assert_eq!(estimate_tokens_heuristic("abcdefgh"), 2);
    }

    #[test]
    fn test_heuristic_symbols() {
        assert_eq!(estimate_tokens_heuristic("{}"), 1);
        assert_eq!(estimate_tokens_heuristic("a{"), 2);
    }

    #[test]
    fn test_model_from_str() {
        assert_eq!("cl100k".parse::<TokenModel>().unwrap(), TokenModel::Cl100k);
        assert_eq!("O200K".parse::<TokenModel>().unwrap(), TokenModel::O200k);
        assert_eq!("fast".parse::<TokenModel>().unwrap(), TokenModel::Heuristic);
        assert!("bogus".parse::<TokenModel>().is_err());
    }

    #[test]
    fn test_model_display_roundtrip() {
        for name in TokenModel::available_models() {
            let model: TokenModel = name.parse().unwrap();
            assert_eq!(&model.to_string(), name);
        }
    }
}
