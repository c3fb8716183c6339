//! Request/response shapes of the remote site-analysis API.
//!
//! Scoring happens on the server; these types only carry data. Field names are
//! camelCase on the wire.

use serde::{Deserialize, Serialize};

/// Inclusive integer bounds as the API expects them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinMax {
    pub min: i64,
    pub max: i64,
}

impl MinMax {
    pub fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    /// `"lat,lng"` without spaces.
    pub addr: String,
    pub category: String,
    pub marketing_area: String,
    /// Monthly rent in units of 10,000 won.
    pub budget: MinMax,
    pub management_method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub representative_menu_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub representative_menu_price: Option<i64>,
    /// Average menu price in won.
    pub average_price: MinMax,
    /// Store size in pyeong.
    pub size: MinMax,
    /// Floor code as a string (`"0"` basement … `"5"` rooftop).
    pub height: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpectedPrice {
    pub monthly: f64,
    pub security_deposit: f64,
}

/// One factor of the fit score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreItem {
    pub name: String,
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_price: Option<ExpectedPrice>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSample {
    pub store_name: String,
    pub review_score: f64,
    #[serde(default)]
    pub highlights: Vec<String>,
    pub menu_average_price: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceSummary {
    pub average: f64,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewAnalysis {
    pub summary: String,
    #[serde(default)]
    pub positive_keywords: Vec<String>,
    #[serde(default)]
    pub negative_keywords: Vec<String>,
    #[serde(default)]
    pub review_samples: Vec<ReviewSample>,
    pub average_menu_price: PriceSummary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TipLevel {
    Success,
    Warning,
    Info,
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tip {
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
}

impl Tip {
    pub fn level(&self) -> TipLevel {
        match self.kind.as_str() {
            "success" => TipLevel::Success,
            "warning" => TipLevel::Warning,
            "info" => TipLevel::Info,
            _ => TipLevel::Other,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetailAnalysis {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strengths: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weaknesses: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResponse {
    #[serde(default)]
    pub scores: Vec<ScoreItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_analysis: Option<ReviewAnalysis>,
    #[serde(default)]
    pub tips: Vec<Tip>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail_analysis: Option<DetailAnalysis>,
}

impl AnalysisResponse {
    /// Mean of the per-factor scores, for the headline number.
    pub fn overall_score(&self) -> Option<f64> {
        if self.scores.is_empty() {
            return None;
        }
        let total: f64 = self.scores.iter().map(|s| s.score).sum();
        Some(total / self.scores.len() as f64)
    }

    /// Factors from best to worst.
    pub fn ranked_scores(&self) -> Vec<&ScoreItem> {
        let mut ranked: Vec<&ScoreItem> = self.scores.iter().collect();
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        ranked
    }
}
