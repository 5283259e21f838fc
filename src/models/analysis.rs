//! Response models for the document analysis service.
//!
//! The service extracts a fixed set of six fields from title insurance
//! documents. Each field is optional: the backend returns `null` for
//! anything it could not locate, and the presentation layer renders a
//! placeholder in that case. The field set and its order are a contract
//! preserved end-to-end, from the wire response through to the UI.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A completed analysis of one uploaded document.
///
/// Immutable once received; dropped when the user starts a new cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Server-assigned identifier for this analysis.
    #[serde(default)]
    pub id: Option<String>,
    /// The policy effective date.
    #[serde(default)]
    pub effective_date: Option<String>,
    /// Name of the insured party or parties.
    #[serde(default)]
    pub insured_party: Option<String>,
    /// The insurance company issuing the policy.
    #[serde(default)]
    pub underwriter: Option<String>,
    /// Legal description of the property.
    #[serde(default)]
    pub legal_description: Option<String>,
    /// Exceptions or exclusions listed in the policy.
    #[serde(default)]
    pub exceptions: Option<String>,
    /// The policy coverage amount.
    #[serde(default)]
    pub policy_amount: Option<String>,
    /// Ordered compliance observations generated by the service.
    #[serde(default)]
    pub compliance_notes: Vec<String>,
    /// Server-side processing status (normally "completed").
    #[serde(default)]
    pub processing_status: Option<String>,
    /// When the server produced this result (server clock, no offset).
    #[serde(default)]
    pub timestamp: Option<NaiveDateTime>,
}

impl AnalysisResult {
    /// Display labels for the six extracted fields, in presentation order.
    pub const FIELD_LABELS: [&'static str; 6] = [
        "Effective Date",
        "Insured Party",
        "Underwriter",
        "Legal Description",
        "Exceptions",
        "Policy Amount",
    ];

    /// The six extracted fields as (label, value) pairs in presentation
    /// order. `None` means the service could not locate the field.
    pub fn fields(&self) -> [(&'static str, Option<&str>); 6] {
        [
            (Self::FIELD_LABELS[0], self.effective_date.as_deref()),
            (Self::FIELD_LABELS[1], self.insured_party.as_deref()),
            (Self::FIELD_LABELS[2], self.underwriter.as_deref()),
            (Self::FIELD_LABELS[3], self.legal_description.as_deref()),
            (Self::FIELD_LABELS[4], self.exceptions.as_deref()),
            (Self::FIELD_LABELS[5], self.policy_amount.as_deref()),
        ]
    }

    /// True when the compliance-notes section should be rendered.
    pub fn has_compliance_notes(&self) -> bool {
        !self.compliance_notes.is_empty()
    }
}

/// Health report from the analysis service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    /// Overall status string ("healthy" when everything is up).
    pub status: String,
    #[serde(default)]
    pub timestamp: Option<NaiveDateTime>,
    /// Per-dependency availability (e.g. "tesseract", "openai").
    #[serde(default)]
    pub services: BTreeMap<String, String>,
}
