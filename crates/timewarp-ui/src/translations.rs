use serde::{Deserialize, Serialize};

use crate::clock::Mode;

/// User-visible strings. Missing fields fall back to English when
/// deserialized, so partial JSON overrides work.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Translations {
    pub real_time: String,
    pub flowing: String,
    pub frozen: String,
    pub return_to_present: String,
    pub activate: String,
    pub target_date_time: String,
    pub mode: String,
    pub core: String,
}

impl Default for Translations {
    fn default() -> Self {
        Self {
            real_time: "Real time".into(),
            flowing: "Flowing".into(),
            frozen: "Frozen".into(),
            return_to_present: "Return to present".into(),
            activate: "Activate".into(),
            target_date_time: "Target Date/Time:".into(),
            mode: "Mode:".into(),
            core: "Core".into(),
        }
    }
}

impl Translations {
    pub fn mode_label(&self, mode: Mode) -> &str {
        match mode {
            Mode::Flowing => &self.flowing,
            Mode::Frozen => &self.frozen,
        }
    }
}
