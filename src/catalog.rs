// =============================================================================
// Listing catalog
// =============================================================================
//
// Static reference data: the NSE stocks offered by symbol search and the
// market indices summarised by the overview endpoint.
// =============================================================================

use serde::Serialize;

/// Most results a search returns.
pub const SEARCH_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StockListing {
    pub symbol: &'static str,
    pub name: &'static str,
    pub exchange: &'static str,
    pub sector: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IndexListing {
    pub symbol: &'static str,
    pub name: &'static str,
}

const fn listing(
    symbol: &'static str,
    name: &'static str,
    exchange: &'static str,
    sector: &'static str,
) -> StockListing {
    StockListing {
        symbol,
        name,
        exchange,
        sector,
    }
}

pub const POPULAR_STOCKS: &[StockListing] = &[
    listing("RELIANCE.NS", "Reliance Industries Ltd.", "NSE", "Oil & Gas"),
    listing("TCS.NS", "Tata Consultancy Services Ltd.", "NSE", "IT"),
    listing("HDFCBANK.NS", "HDFC Bank Ltd.", "NSE", "Banking"),
    listing("INFY.NS", "Infosys Ltd.", "NSE", "IT"),
    listing("HINDUNILVR.NS", "Hindustan Unilever Ltd.", "NSE", "FMCG"),
    listing("ICICIBANK.NS", "ICICI Bank Ltd.", "NSE", "Banking"),
    listing("SBIN.NS", "State Bank of India", "NSE", "Banking"),
    listing("BHARTIARTL.NS", "Bharti Airtel Ltd.", "NSE", "Telecom"),
    listing("ITC.NS", "ITC Ltd.", "NSE", "FMCG"),
    listing("KOTAKBANK.NS", "Kotak Mahindra Bank Ltd.", "NSE", "Banking"),
    listing("BAJFINANCE.NS", "Bajaj Finance Ltd.", "NSE", "Financial Services"),
    listing("ASIANPAINT.NS", "Asian Paints Ltd.", "NSE", "Consumer Durables"),
    listing("MARUTI.NS", "Maruti Suzuki India Ltd.", "NSE", "Automobile"),
    listing("TATAMOTORS.NS", "Tata Motors Ltd.", "NSE", "Automobile"),
    listing("TITAN.NS", "Titan Company Ltd.", "NSE", "Consumer Durables"),
    listing("AXISBANK.NS", "Axis Bank Ltd.", "NSE", "Banking"),
    listing("SUNPHARMA.NS", "Sun Pharmaceutical Industries Ltd.", "NSE", "Pharmaceuticals"),
    listing("BAJAJFINSV.NS", "Bajaj Finserv Ltd.", "NSE", "Financial Services"),
    listing("HCLTECH.NS", "HCL Technologies Ltd.", "NSE", "IT"),
    listing("WIPRO.NS", "Wipro Ltd.", "NSE", "IT"),
    listing("NTPC.NS", "NTPC Ltd.", "NSE", "Power"),
    listing("POWERGRID.NS", "Power Grid Corporation of India Ltd.", "NSE", "Power"),
    listing("TATASTEEL.NS", "Tata Steel Ltd.", "NSE", "Metals"),
    listing("M&M.NS", "Mahindra & Mahindra Ltd.", "NSE", "Automobile"),
    listing("ULTRACEMCO.NS", "UltraTech Cement Ltd.", "NSE", "Cement"),
    listing("TECHM.NS", "Tech Mahindra Ltd.", "NSE", "IT"),
    listing("JSWSTEEL.NS", "JSW Steel Ltd.", "NSE", "Metals"),
    listing("NESTLEIND.NS", "Nestle India Ltd.", "NSE", "FMCG"),
    listing("ONGC.NS", "Oil and Natural Gas Corporation Ltd.", "NSE", "Oil & Gas"),
    listing("INDUSINDBK.NS", "IndusInd Bank Ltd.", "NSE", "Banking"),
    listing("GRASIM.NS", "Grasim Industries Ltd.", "NSE", "Cement"),
    listing("ADANIPORTS.NS", "Adani Ports and Special Economic Zone Ltd.", "NSE", "Infrastructure"),
    listing("HINDALCO.NS", "Hindalco Industries Ltd.", "NSE", "Metals"),
    listing("COALINDIA.NS", "Coal India Ltd.", "NSE", "Mining"),
    listing("EICHERMOT.NS", "Eicher Motors Ltd.", "NSE", "Automobile"),
    listing("TATACONSUM.NS", "Tata Consumer Products Ltd.", "NSE", "FMCG"),
    listing("BRITANNIA.NS", "Britannia Industries Ltd.", "NSE", "FMCG"),
    listing("CIPLA.NS", "Cipla Ltd.", "NSE", "Pharmaceuticals"),
    listing("DIVISLAB.NS", "Divi's Laboratories Ltd.", "NSE", "Pharmaceuticals"),
    listing("HEROMOTOCO.NS", "Hero MotoCorp Ltd.", "NSE", "Automobile"),
    listing("DRREDDY.NS", "Dr. Reddy's Laboratories Ltd.", "NSE", "Pharmaceuticals"),
    listing("BAJAJ-AUTO.NS", "Bajaj Auto Ltd.", "NSE", "Automobile"),
    listing("APOLLOHOSP.NS", "Apollo Hospitals Enterprise Ltd.", "NSE", "Healthcare"),
    listing("LT.NS", "Larsen & Toubro Ltd.", "NSE", "Construction"),
    listing("BPCL.NS", "Bharat Petroleum Corporation Ltd.", "NSE", "Oil & Gas"),
    listing("SBILIFE.NS", "SBI Life Insurance Company Ltd.", "NSE", "Insurance"),
    listing("HDFCLIFE.NS", "HDFC Life Insurance Company Ltd.", "NSE", "Insurance"),
    listing("VEDL.NS", "Vedanta Ltd.", "NSE", "Mining"),
    listing("PIDILITIND.NS", "Pidilite Industries Ltd.", "NSE", "Chemicals"),
    listing("IOC.NS", "Indian Oil Corporation Ltd.", "NSE", "Oil & Gas"),
    listing("SHREECEM.NS", "Shree Cement Ltd.", "NSE", "Cement"),
    listing("BERGEPAINT.NS", "Berger Paints India Ltd.", "NSE", "Consumer Durables"),
    listing("DABUR.NS", "Dabur India Ltd.", "NSE", "FMCG"),
    listing("MARICO.NS", "Marico Ltd.", "NSE", "FMCG"),
    listing("HAVELLS.NS", "Havells India Ltd.", "NSE", "Consumer Durables"),
    listing("TORNTPHARM.NS", "Torrent Pharmaceuticals Ltd.", "NSE", "Pharmaceuticals"),
    listing("BANDHANBNK.NS", "Bandhan Bank Ltd.", "NSE", "Banking"),
    listing("GODREJCP.NS", "Godrej Consumer Products Ltd.", "NSE", "FMCG"),
    listing("SIEMENS.NS", "Siemens Ltd.", "NSE", "Capital Goods"),
    listing("GODREJPROP.NS", "Godrej Properties Ltd.", "NSE", "Realty"),
    listing("POLYCAB.NS", "Polycab India Ltd.", "NSE", "Consumer Durables"),
    listing("BIOCON.NS", "Biocon Ltd.", "NSE", "Pharmaceuticals"),
    listing("DLF.NS", "DLF Ltd.", "NSE", "Realty"),
];

pub const NSE_INDICES: &[IndexListing] = &[
    IndexListing { symbol: "^NSEI", name: "NIFTY 50" },
    IndexListing { symbol: "^NSEBANK", name: "NIFTY BANK" },
    IndexListing { symbol: "^CNXIT", name: "NIFTY IT" },
    IndexListing { symbol: "^CNXAUTO", name: "NIFTY AUTO" },
    IndexListing { symbol: "^CNXPHARMA", name: "NIFTY PHARMA" },
];

/// Case-insensitive substring match on symbol or name, catalog order,
/// at most [`SEARCH_LIMIT`] hits. An empty query returns the head of the list.
pub fn search(query: &str) -> Vec<&'static StockListing> {
    let query = query.to_lowercase();
    POPULAR_STOCKS
        .iter()
        .filter(|s| {
            query.is_empty()
                || s.symbol.to_lowercase().contains(&query)
                || s.name.to_lowercase().contains(&query)
        })
        .take(SEARCH_LIMIT)
        .collect()
}

/// Listings on `exchange` (case-insensitive).
pub fn by_exchange(exchange: &str) -> Vec<&'static StockListing> {
    POPULAR_STOCKS
        .iter()
        .filter(|s| s.exchange.eq_ignore_ascii_case(exchange))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn symbols_are_unique_and_on_nse() {
        let symbols: HashSet<_> = POPULAR_STOCKS.iter().map(|s| s.symbol).collect();
        assert_eq!(symbols.len(), POPULAR_STOCKS.len());
        assert!(POPULAR_STOCKS.iter().all(|s| s.symbol.ends_with(".NS")));
        assert_eq!(by_exchange("nse").len(), POPULAR_STOCKS.len());
        assert!(by_exchange("BSE").is_empty());
    }

    #[test]
    fn empty_query_returns_first_page() {
        let hits = search("");
        assert_eq!(hits.len(), SEARCH_LIMIT);
        assert_eq!(hits[0].symbol, "RELIANCE.NS");
    }

    #[test]
    fn matches_symbol_or_name_case_insensitively() {
        assert!(search("tcs").iter().any(|s| s.symbol == "TCS.NS"));
        assert!(search("CONSULTANCY").iter().any(|s| s.symbol == "TCS.NS"));
        assert!(search("zzzz").is_empty());
    }

    #[test]
    fn results_are_capped() {
        // "ltd" appears in nearly every name.
        assert_eq!(search("ltd").len(), SEARCH_LIMIT);
    }

    #[test]
    fn indices() {
        assert_eq!(NSE_INDICES.len(), 5);
        assert_eq!(NSE_INDICES[0].symbol, "^NSEI");
    }
}
