use serde::{Deserialize, Serialize};

/// The three artifacts of one pipeline run, in production order.
///
/// Serializes to the `GET /generate/{query}` response body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CampaignOutcome {
    pub idea: String,
    /// Content of each retrieved trend document, in retrieval order.
    pub trends: Vec<String>,
    pub campaign_plan: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_http_field_names() {
        let outcome = CampaignOutcome {
            idea: "Bamboo toothbrush subscription".to_string(),
            trends: vec!["Reusable Packaging: Growing demand".to_string()],
            campaign_plan: "Instagram + influencer unboxings".to_string(),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "idea": "Bamboo toothbrush subscription",
                "trends": ["Reusable Packaging: Growing demand"],
                "campaign_plan": "Instagram + influencer unboxings"
            })
        );
    }
}
