// ============================================================
// Layer 3 — Output Naming Strategy
// ============================================================
// Turns a SinkTarget into a file name. With the defaults:
//
//   All       → All.arff
//   Train(3)  → Train3.arff
//   Test(3)   → Test3.arff

use serde::{Deserialize, Serialize};

use crate::domain::sink::SinkTarget;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputNaming {
    /// Stem of the combined file
    pub all_name: String,

    /// Stem prefix of the training files, followed by the plan index
    pub train_prefix: String,

    /// Stem prefix of the test files, followed by the plan index
    pub test_prefix: String,

    /// Extension shared by inputs and outputs, without the dot
    pub extension: String,
}

impl Default for OutputNaming {
    fn default() -> Self {
        Self {
            all_name:     "All".to_string(),
            train_prefix: "Train".to_string(),
            test_prefix:  "Test".to_string(),
            extension:    "arff".to_string(),
        }
    }
}

impl OutputNaming {
    pub fn file_name(&self, target: SinkTarget) -> String {
        let stem = match target {
            SinkTarget::All      => self.all_name.clone(),
            SinkTarget::Train(k) => format!("{}{}", self.train_prefix, k),
            SinkTarget::Test(k)  => format!("{}{}", self.test_prefix, k),
        };
        if self.extension.is_empty() {
            stem
        } else {
            format!("{}.{}", stem, self.extension)
        }
    }

    /// True when `file_name` is one this naming could produce:
    /// the All file, or a train/test prefix followed by an index.
    pub fn is_output_name(&self, file_name: &str) -> bool {
        let stem = if self.extension.is_empty() {
            file_name
        } else {
            match file_name
                .strip_suffix(self.extension.as_str())
                .and_then(|s| s.strip_suffix('.'))
            {
                Some(stem) => stem,
                None => return false,
            }
        };

        if stem == self.all_name {
            return true;
        }
        [&self.train_prefix, &self.test_prefix].iter().any(|prefix| {
            stem.strip_prefix(prefix.as_str())
                .map_or(false, |k| !k.is_empty() && k.bytes().all(|b| b.is_ascii_digit()))
        })
    }
}
