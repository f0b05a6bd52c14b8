use campaign_models::TrendDocument;

/// Stands in for the trend block when retrieval found nothing.
pub const NO_TRENDS_SENTINEL: &str = "No trends available";

pub fn idea_prompt(query: &str) -> String {
    format!("Suggest a creative product idea for an e-commerce campaign based on: {query}")
}

pub fn optimization_prompt(idea: &str, trend_block: &str) -> String {
    format!(
        "Optimize a campaign for: {idea} using trends: {trend_block}. \
         Suggest channels and strategy."
    )
}

/// One trend content per line, or the sentinel when there are none.
pub fn trend_block(trends: &[TrendDocument]) -> String {
    let block = trends
        .iter()
        .map(|t| t.content.as_str())
        .collect::<Vec<_>>()
        .join("\n");
    if block.is_empty() {
        NO_TRENDS_SENTINEL.to_string()
    } else {
        block
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campaign_models::Metadata;

    #[test]
    fn idea_prompt_embeds_query() {
        assert_eq!(
            idea_prompt("eco-friendly products"),
            "Suggest a creative product idea for an e-commerce campaign based on: eco-friendly products"
        );
    }

    #[test]
    fn optimization_prompt_embeds_idea_and_trends() {
        assert_eq!(
            optimization_prompt("Bamboo kits", "A: a\nB: b"),
            "Optimize a campaign for: Bamboo kits using trends: A: a\nB: b. Suggest channels and strategy."
        );
    }

    #[test]
    fn trend_block_joins_with_newlines() {
        let trends = vec![
            TrendDocument::new("Reusable Packaging: Growing demand", Metadata::new()),
            TrendDocument::new("Live Shopping: Streams", Metadata::new()),
        ];
        assert_eq!(
            trend_block(&trends),
            "Reusable Packaging: Growing demand\nLive Shopping: Streams"
        );
    }

    #[test]
    fn empty_trends_use_sentinel() {
        assert_eq!(trend_block(&[]), NO_TRENDS_SENTINEL);
        let blank = vec![TrendDocument::new("", Metadata::new())];
        assert_eq!(trend_block(&blank), NO_TRENDS_SENTINEL);
    }
}
