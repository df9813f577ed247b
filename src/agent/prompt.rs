//! Prompt text for research requests

/// Standing instructions for the research analyst
pub const SYSTEM_PROMPT: &str = "You are a professional cryptocurrency research analyst. Your job is to provide
comprehensive, data-driven research briefs about cryptocurrencies.

When researching a cryptocurrency, you should:
1. First fetch the current price and market data using the get_crypto_price tool
2. Then fetch recent news using the get_crypto_news tool
3. Synthesize all information into a well-structured research brief

Your research brief should include:
- **Price Analysis**: Current price, recent price changes, and market position
- **Market Overview**: Market cap, trading volume, and supply information
- **News Summary**: Key recent developments and news (summarize, don't just list)
- **Key Takeaways**: 2-3 bullet points highlighting the most important insights

Be objective and factual. Cite specific numbers from the data. If data is unavailable,
acknowledge it rather than making assumptions.

Format your response in clean markdown with clear sections.";

/// Appended to the request when a detailed brief is asked for
pub const DETAIL_SUFFIX: &str = "\n\nProvide an EXTREMELY detailed analysis including:
- Technical analysis of price movements
- Comparison to market trends
- Detailed news analysis with potential market impact
- Risk factors and considerations
- Supply and tokenomics analysis";

/// Opening user turn for `ticker`, which is expected to be uppercase already
pub fn research_request(ticker: &str, detailed: bool) -> String {
    let suffix = if detailed { DETAIL_SUFFIX } else { "" };
    format!(
        "Research the cryptocurrency {} and provide a comprehensive research brief.{}",
        ticker, suffix
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_research_request_plain() {
        assert_eq!(
            research_request("BTC", false),
            "Research the cryptocurrency BTC and provide a comprehensive research brief."
        );
    }

    #[test]
    fn test_research_request_detailed() {
        let request = research_request("ETH", true);
        assert!(request.starts_with("Research the cryptocurrency ETH"));
        assert!(request.ends_with("- Supply and tokenomics analysis"));
        assert!(request.contains("brief.\n\nProvide an EXTREMELY detailed analysis"));
    }

    #[test]
    fn test_system_prompt_names_both_tools() {
        assert!(SYSTEM_PROMPT.contains("get_crypto_price"));
        assert!(SYSTEM_PROMPT.contains("get_crypto_news"));
    }
}
