use serde::{Deserialize, Serialize};

/// Retirement account the withdrawal comes from.
///
/// The plan type is carried through to reports for display; it does not
/// change any computed figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlanType {
    #[default]
    Traditional401k,
    Roth401k,
    TraditionalIra,
    RothIra,
}

impl PlanType {
    pub fn all() -> &'static [PlanType] {
        &[
            PlanType::Traditional401k,
            PlanType::Roth401k,
            PlanType::TraditionalIra,
            PlanType::RothIra,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Traditional401k => "401k",
            Self::Roth401k => "Roth 401k",
            Self::TraditionalIra => "IRA",
            Self::RothIra => "Roth IRA",
        }
    }

    pub fn is_roth(&self) -> bool {
        matches!(self, Self::Roth401k | Self::RothIra)
    }

    /// Parses free text such as `"Roth IRA"` or `"traditional 401k"`.
    ///
    /// Case and spaces are ignored. A bare `"roth"` means a Roth 401k.
    pub fn parse(s: &str) -> Option<Self> {
        let normalized: String = s
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();

        match normalized.as_str() {
            "401k" | "traditional401k" => Some(Self::Traditional401k),
            "ira" | "traditionalira" => Some(Self::TraditionalIra),
            "roth401k" | "roth" => Some(Self::Roth401k),
            "rothira" => Some(Self::RothIra),
            _ => None,
        }
    }
}
