//! Static ticker lookup tables

/// Ticker symbol to CoinGecko coin id
const COINGECKO_IDS: &[(&str, &str)] = &[
    ("BTC", "bitcoin"),
    ("ETH", "ethereum"),
    ("SOL", "solana"),
    ("ADA", "cardano"),
    ("DOT", "polkadot"),
    ("DOGE", "dogecoin"),
    ("XRP", "ripple"),
    ("AVAX", "avalanche-2"),
    ("MATIC", "matic-network"),
    ("LINK", "chainlink"),
    ("UNI", "uniswap"),
    ("ATOM", "cosmos"),
    ("LTC", "litecoin"),
    ("BCH", "bitcoin-cash"),
    ("ALGO", "algorand"),
    ("XLM", "stellar"),
    ("VET", "vechain"),
    ("FIL", "filecoin"),
    ("TRX", "tron"),
    ("ETC", "ethereum-classic"),
    ("NEAR", "near"),
    ("APT", "aptos"),
    ("ARB", "arbitrum"),
    ("OP", "optimism"),
    ("SUI", "sui"),
    ("SEI", "sei-network"),
    ("INJ", "injective-protocol"),
    ("TIA", "celestia"),
    ("PEPE", "pepe"),
    ("SHIB", "shiba-inu"),
    ("WIF", "dogwifcoin"),
    ("BONK", "bonk"),
];

/// Ticker symbol to lowercase news search terms, most specific first
const SEARCH_TERMS: &[(&str, &[&str])] = &[
    ("BTC", &["bitcoin", "btc"]),
    ("ETH", &["ethereum", "eth"]),
    ("SOL", &["solana", "sol"]),
    ("ADA", &["cardano", "ada"]),
    ("DOT", &["polkadot", "dot"]),
    ("DOGE", &["dogecoin", "doge"]),
    ("XRP", &["ripple", "xrp"]),
    ("AVAX", &["avalanche", "avax"]),
    ("MATIC", &["polygon", "matic"]),
    ("LINK", &["chainlink", "link"]),
    ("UNI", &["uniswap", "uni"]),
    ("ATOM", &["cosmos", "atom"]),
    ("ARB", &["arbitrum", "arb"]),
    ("OP", &["optimism"]),
    ("SUI", &["sui"]),
    ("NEAR", &["near protocol", "near"]),
    ("APT", &["aptos", "apt"]),
];

/// CoinGecko id for a ticker, falling back to the lowercased ticker
pub fn coingecko_id(ticker: &str) -> String {
    let upper = ticker.to_uppercase();
    COINGECKO_IDS
        .iter()
        .find(|(symbol, _)| *symbol == upper)
        .map(|(_, id)| id.to_string())
        .unwrap_or_else(|| ticker.to_lowercase())
}

/// News search terms for a ticker, falling back to the lowercased ticker
pub fn search_terms(ticker: &str) -> Vec<String> {
    let upper = ticker.to_uppercase();
    SEARCH_TERMS
        .iter()
        .find(|(symbol, _)| *symbol == upper)
        .map(|(_, terms)| terms.iter().map(|t| t.to_string()).collect())
        .unwrap_or_else(|| vec![ticker.to_lowercase()])
}

/// All tickers with a known CoinGecko id, sorted by ticker
pub fn supported() -> Vec<(&'static str, &'static str)> {
    let mut all = COINGECKO_IDS.to_vec();
    all.sort_by_key(|(symbol, _)| *symbol);
    all
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coingecko_id_known_tickers_any_case() {
        assert_eq!(coingecko_id("BTC"), "bitcoin");
        assert_eq!(coingecko_id("btc"), "bitcoin");
        assert_eq!(coingecko_id("Avax"), "avalanche-2");
    }

    #[test]
    fn test_coingecko_id_falls_back_to_lowercase() {
        assert_eq!(coingecko_id("ZZZ"), "zzz");
    }

    #[test]
    fn test_search_terms() {
        assert_eq!(search_terms("btc"), vec!["bitcoin", "btc"]);
        assert_eq!(search_terms("NEAR"), vec!["near protocol", "near"]);
        assert_eq!(search_terms("OP"), vec!["optimism"]);
        assert_eq!(search_terms("ZZZ"), vec!["zzz"]);
    }

    #[test]
    fn test_supported_is_sorted_and_complete() {
        let all = supported();
        assert_eq!(all.len(), COINGECKO_IDS.len());
        assert!(all.windows(2).all(|w| w[0].0 < w[1].0));
        assert!(all.contains(&("WIF", "dogwifcoin")));
    }

    #[test]
    fn test_tables_have_unique_tickers() {
        let mut ids: Vec<&str> = COINGECKO_IDS.iter().map(|(t, _)| *t).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), COINGECKO_IDS.len());

        let mut terms: Vec<&str> = SEARCH_TERMS.iter().map(|(t, _)| *t).collect();
        terms.sort();
        terms.dedup();
        assert_eq!(terms.len(), SEARCH_TERMS.len());
    }
}
