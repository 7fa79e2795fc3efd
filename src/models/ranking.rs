use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub urgency: f64,
    pub temperature_risk: f64,
    pub distance_km: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedDelivery {
    pub delivery_id: String,
    pub score: f64,
    pub score_breakdown: ScoreBreakdown,
}
