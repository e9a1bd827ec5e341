//! Image path remapping.
//!
//! A remap configuration is built once at startup (from CLI pairs or the
//! config file) and passed by reference into the image resolver; it is never
//! mutated afterwards.

use color_eyre::eyre::{Result, bail};
use serde::{Deserialize, Serialize};

/// One rewrite rule for raw image references.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RemapRule {
  /// Substring to match in the raw reference.
  pub from: String,
  /// Replacement text.
  pub to:   String,
}

/// Ordered list of remap rules.
///
/// Rules apply in sequence and each replaces every occurrence of its `from`
/// substring, so a later rule sees the output of earlier ones.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct RemapRules {
  rules: Vec<RemapRule>,
}

impl RemapRules {
  /// Parse CLI-style `from:to` pairs into a rule list.
  ///
  /// The first `:` separates the two halves, so `from` cannot itself
  /// contain a colon.
  pub fn parse_pairs(pairs: &[String]) -> Result<Self> {
    let mut rules = Vec::with_capacity(pairs.len());

    for pair in pairs {
      let Some((from, to)) = pair.split_once(':') else {
        bail!("invalid remap pair '{pair}', expected 'from:to'");
      };
      if from.is_empty() {
        bail!("invalid remap pair '{pair}', the 'from' half is empty");
      }
      rules.push(RemapRule {
        from: from.to_string(),
        to:   to.to_string(),
      });
    }

    Ok(Self { rules })
  }

  /// Apply every rule, in order, to a raw reference.
  #[must_use]
  pub fn apply(&self, reference: &str) -> String {
    let mut result = reference.to_string();
    for rule in &self.rules {
      result = result.replace(&rule.from, &rule.to);
    }
    result
  }

  /// Number of configured rules.
  #[must_use]
  pub fn len(&self) -> usize {
    self.rules.len()
  }

  /// True when no rules are configured.
  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.rules.is_empty()
  }
}

/// Classify a raw reference as external (network) rather than local.
///
/// External references bypass remapping and filesystem resolution entirely
/// and survive the pipeline unchanged.
#[must_use]
pub fn is_external(reference: &str) -> bool {
  reference.split_once("://").is_some_and(|(scheme, _)| {
    !scheme.is_empty()
      && scheme
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
  })
}
