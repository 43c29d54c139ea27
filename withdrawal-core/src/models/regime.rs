use serde::{Deserialize, Serialize};

/// How the country of residence treats the withdrawal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Regime {
    /// Only the source country taxes the withdrawal.
    NoResidentTax,

    /// Both countries tax it; source tax is credited against resident tax.
    CreditedResidentTax,
}

/// Residency status of the withdrawer in their home country.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Residency {
    /// Non-resident.
    Nri,
    /// Resident but not ordinarily resident.
    Rnor,
    /// Resident and ordinarily resident.
    Ror,
}

impl Residency {
    /// All statuses, in the order results are presented.
    pub const ALL: [Residency; 3] = [Residency::Nri, Residency::Rnor, Residency::Ror];

    /// Only ordinarily-resident withdrawers owe resident-country tax on
    /// foreign retirement income.
    pub fn regime(&self) -> Regime {
        match self {
            Self::Nri | Self::Rnor => Regime::NoResidentTax,
            Self::Ror => Regime::CreditedResidentTax,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Nri => "NRI",
            Self::Rnor => "RNOR",
            Self::Ror => "ROR",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Nri => "Non-Resident",
            Self::Rnor => "Resident but Not Ordinarily Resident",
            Self::Ror => "Resident and Ordinarily Resident",
        }
    }

    /// Parses a status code, ignoring case and surrounding whitespace.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NRI" => Some(Self::Nri),
            "RNOR" => Some(Self::Rnor),
            "ROR" => Some(Self::Ror),
            _ => None,
        }
    }
}
