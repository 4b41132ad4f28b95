//! Trust Report Model
//!
//! The structured assessment bundle consumed by the presentation layer.
//! Every claim in a report must be traceable to an entry in `sources`, or
//! be explicitly marked as model-inferred in its rationale text.
//!
//! Fields default leniently so a report synthesized by the research
//! backend still deserializes when optional sections are missing.

use serde::{Deserialize, Serialize};

/// Whether a claim comes from the vendor or an independent party.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Vendor,
    Independent,
}

impl Default for SourceType {
    fn default() -> Self {
        SourceType::Independent
    }
}

/// Confidence level of the trust score, based on source quantity and quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Default for Confidence {
    fn default() -> Self {
        Confidence::Low
    }
}

/// Severity classification shared by considerations and CVE records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Default for Severity {
    fn default() -> Self {
        Severity::Medium
    }
}

/// Trust score with transparent rationale.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrustScore {
    /// Score from 0-100
    #[serde(default)]
    pub score: u8,
    #[serde(default)]
    pub confidence: Confidence,
    /// Number of sources used in the assessment
    #[serde(default)]
    pub source_count: u32,
    /// How the score was calculated, including model-inferred caveats
    #[serde(default)]
    pub rationale: String,
}

/// Source citation with attribution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceAttribution {
    #[serde(default, rename = "type")]
    pub source_type: SourceType,
    /// Name/title of the source
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub url: String,
    /// Date accessed or published (YYYY-MM-DD)
    #[serde(default)]
    pub date: String,
    /// What this source was used to verify
    #[serde(default)]
    pub relevance: String,
}

/// Security strength finding with source attribution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyStrength {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub source_type: SourceType,
    #[serde(default)]
    pub source_url: String,
}

/// Security consideration or risk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Consideration {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub severity: Severity,
}

/// Compliance certification details.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComplianceCertification {
    /// Certification name (e.g., "SOC 2 Type II")
    #[serde(default)]
    pub cert: String,
    /// Issue date (YYYY-MM-DD)
    #[serde(default)]
    pub issued: String,
    /// Expiration date or "Ongoing"
    #[serde(default)]
    pub expires: String,
    #[serde(default)]
    pub scope: String,
    /// Auditing organization
    #[serde(default)]
    pub auditor: String,
    #[serde(default)]
    pub source_url: String,
}

/// CVE vulnerability record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CveRecord {
    /// CVE identifier (e.g., "CVE-2024-1234")
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub severity: Severity,
    /// CVSS score (e.g., "7.5")
    #[serde(default)]
    pub cvss: String,
    #[serde(default)]
    pub title: String,
    /// Publication date (YYYY-MM-DD)
    #[serde(default)]
    pub published: String,
    /// Patch date if available (YYYY-MM-DD)
    #[serde(default)]
    pub patched: Option<String>,
    /// Whether listed in the CISA Known Exploited Vulnerabilities catalog
    #[serde(default)]
    pub kev: bool,
}

/// Alternative product recommendation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Alternative {
    #[serde(default)]
    pub name: String,
    /// Trust score of the alternative, 0-100
    #[serde(default)]
    pub score: u8,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub pros: Vec<String>,
    #[serde(default)]
    pub cons: Vec<String>,
}

/// Vendor reputation details.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VendorInfo {
    /// Parent company or ownership structure
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub market_presence: String,
    /// Quality of public security documentation
    #[serde(default)]
    pub transparency: String,
    /// Product Security Incident Response Team availability
    #[serde(default)]
    pub psirt_presence: String,
}

/// Encryption standards and practices.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EncryptionDetails {
    /// Encryption for data in transit (e.g., "TLS 1.3")
    #[serde(default)]
    pub in_transit: String,
    /// Encryption for data at rest (e.g., "AES-256")
    #[serde(default)]
    pub at_rest: String,
    /// Key management options (e.g., "EKM available")
    #[serde(default)]
    pub key_management: String,
    #[serde(default)]
    pub backups: String,
}

/// Data location and retention details.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataResidency {
    #[serde(default)]
    pub primary_storage: String,
    #[serde(default)]
    pub eu_residency: String,
    #[serde(default)]
    pub retention: String,
    #[serde(default)]
    pub portability: String,
}

/// Access control feature availability.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccessControl {
    /// Feature name (e.g., "SSO/SAML")
    #[serde(default)]
    pub feature: String,
    /// Plan availability (e.g., "Business+", "All plans")
    #[serde(default)]
    pub plan: String,
}

/// Admin control feature availability.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdminControl {
    /// Feature name (e.g., "Audit logs")
    #[serde(default)]
    pub feature: String,
    /// Plan availability (e.g., "Enterprise Grid")
    #[serde(default)]
    pub plan: String,
}

/// Complete trust assessment report for one product/vendor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrustReport {
    // === ENTITY IDENTIFICATION ===
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub vendor: String,
    /// Primary official website URL
    #[serde(default)]
    pub url: String,
    /// Software classification tags
    #[serde(default)]
    pub taxonomy: Vec<String>,

    // === TRUST ASSESSMENT ===
    #[serde(default)]
    pub trust_score: TrustScore,
    #[serde(default)]
    pub executive_summary: String,

    // === SECURITY POSTURE ===
    #[serde(default)]
    pub strengths: Vec<KeyStrength>,
    #[serde(default)]
    pub considerations: Vec<Consideration>,

    // === COMPLIANCE & CERTIFICATIONS ===
    #[serde(default)]
    pub compliance: Vec<ComplianceCertification>,

    // === VULNERABILITY DATA ===
    #[serde(default)]
    pub cves: Vec<CveRecord>,
    /// Trend analysis (e.g., "-23% vs previous year")
    #[serde(default)]
    pub vulnerability_trend: String,
    /// Average time to patch (e.g., "4.2d")
    #[serde(default)]
    pub avg_patch_time: String,

    // === VENDOR REPUTATION ===
    #[serde(default)]
    pub vendor_info: VendorInfo,

    // === DATA HANDLING ===
    #[serde(default)]
    pub encryption: EncryptionDetails,
    #[serde(default)]
    pub data_residency: DataResidency,

    // === CONTROL MATRICES ===
    #[serde(default)]
    pub access_controls: Vec<AccessControl>,
    #[serde(default)]
    pub admin_controls: Vec<AdminControl>,

    // === ALTERNATIVES ===
    #[serde(default)]
    pub alternatives: Vec<Alternative>,

    // === SOURCES ===
    #[serde(default)]
    pub sources: Vec<SourceAttribution>,
}
