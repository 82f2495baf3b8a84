use super::config::ScoringConfig;

// Every factor is a step function; comparisons are strict on the bracket
// boundary, so a value exactly at a threshold lands in the lower bracket.

pub(crate) fn score_roi(roi: f64) -> u8 {
    if roi > 30.0 {
        25
    } else if roi > 20.0 {
        20
    } else if roi > 10.0 {
        15
    } else if roi > 0.0 {
        5
    } else {
        0
    }
}

pub(crate) fn score_wholesale_spread(spread: f64) -> u8 {
    if spread > 15_000.0 {
        20
    } else if spread > 10_000.0 {
        15
    } else if spread > 5_000.0 {
        10
    } else if spread > 0.0 {
        3
    } else {
        0
    }
}

pub(crate) fn score_arv_confidence(comp_count: usize) -> u8 {
    match comp_count {
        count if count >= 3 => 15,
        2 => 10,
        1 => 5,
        // AVM-only valuation assumed when no comps exist.
        _ => 2,
    }
}

pub(crate) fn score_equity_position(equity: f64) -> u8 {
    if equity > 0.50 {
        15
    } else if equity > 0.30 {
        10
    } else if equity > 0.10 {
        5
    } else {
        0
    }
}

struct DistressRule {
    keywords: &'static [&'static str],
    /// When set, every keyword must appear; otherwise any one suffices.
    requires_all: bool,
    score: u8,
}

// Priority-ordered; the first matching rule wins. Matching is raw
// case-insensitive substring search against the free-text signal.
const DISTRESS_RULES: &[DistressRule] = &[
    DistressRule {
        keywords: &["pre-foreclosure", "lis pendens"],
        requires_all: false,
        score: 10,
    },
    DistressRule {
        keywords: &["tax", "delinq"],
        requires_all: true,
        score: 8,
    },
    DistressRule {
        keywords: &["auction"],
        requires_all: false,
        score: 8,
    },
    DistressRule {
        keywords: &["reo", "bank"],
        requires_all: false,
        score: 7,
    },
    DistressRule {
        keywords: &["probate", "inherit"],
        requires_all: false,
        score: 7,
    },
    DistressRule {
        keywords: &["vacant"],
        requires_all: false,
        score: 6,
    },
    DistressRule {
        keywords: &["code violation"],
        requires_all: false,
        score: 6,
    },
    DistressRule {
        keywords: &["absentee"],
        requires_all: false,
        score: 5,
    },
    DistressRule {
        keywords: &["fsbo"],
        requires_all: false,
        score: 4,
    },
];

pub(crate) fn score_distress_signal(signal: Option<&str>) -> u8 {
    let normalized = match signal {
        Some(raw) if !raw.trim().is_empty() => raw.to_lowercase(),
        _ => return 0,
    };

    for rule in DISTRESS_RULES {
        let matched = if rule.requires_all {
            rule.keywords.iter().all(|kw| normalized.contains(kw))
        } else {
            rule.keywords.iter().any(|kw| normalized.contains(kw))
        };
        if matched {
            return rule.score;
        }
    }

    // Any other non-empty signal still indicates some seller motivation.
    2
}

pub(crate) fn score_location(zip_code: Option<&str>, config: &ScoringConfig) -> u8 {
    match zip_code {
        None => 5,
        Some(zip) if config.premium_zips.contains(zip) => 10,
        Some(zip) if config.good_zips.contains(zip) => 7,
        Some(_) => 4,
    }
}

pub(crate) fn score_days_on_market(dom: Option<u32>) -> u8 {
    match dom {
        None => 2,
        Some(days) if days <= 7 => 5,
        Some(days) if days <= 30 => 3,
        Some(days) if days <= 90 => 1,
        Some(_) => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roi_brackets_are_strict_at_the_boundary() {
        assert_eq!(score_roi(35.0), 25);
        assert_eq!(score_roi(30.0), 20);
        assert_eq!(score_roi(20.0), 15);
        assert_eq!(score_roi(10.0), 5);
        assert_eq!(score_roi(0.0), 0);
        assert_eq!(score_roi(-4.0), 0);
    }

    #[test]
    fn spread_brackets_are_strict_at_the_boundary() {
        assert_eq!(score_wholesale_spread(16_000.0), 20);
        assert_eq!(score_wholesale_spread(15_000.0), 15);
        assert_eq!(score_wholesale_spread(10_000.0), 10);
        assert_eq!(score_wholesale_spread(5_000.0), 3);
        assert_eq!(score_wholesale_spread(0.0), 0);
    }

    #[test]
    fn arv_confidence_depends_on_comp_count() {
        assert_eq!(score_arv_confidence(4), 15);
        assert_eq!(score_arv_confidence(3), 15);
        assert_eq!(score_arv_confidence(2), 10);
        assert_eq!(score_arv_confidence(1), 5);
        assert_eq!(score_arv_confidence(0), 2);
    }

    #[test]
    fn equity_brackets() {
        assert_eq!(score_equity_position(0.55), 15);
        assert_eq!(score_equity_position(0.50), 10);
        assert_eq!(score_equity_position(0.30), 5);
        assert_eq!(score_equity_position(0.10), 0);
        assert_eq!(score_equity_position(-0.20), 0);
    }

    #[test]
    fn distress_rules_resolve_in_priority_order() {
        assert_eq!(score_distress_signal(Some("Pre-foreclosure")), 10);
        assert_eq!(score_distress_signal(Some("Lis Pendens filed")), 10);
        assert_eq!(score_distress_signal(Some("Tax delinquent 2 years")), 8);
        assert_eq!(score_distress_signal(Some("Auction")), 8);
        assert_eq!(score_distress_signal(Some("REO")), 7);
        assert_eq!(score_distress_signal(Some("Inherited estate")), 7);
        assert_eq!(score_distress_signal(Some("Vacant")), 6);
        assert_eq!(score_distress_signal(Some("Code violation")), 6);
        assert_eq!(score_distress_signal(Some("Absentee owner")), 5);
        assert_eq!(score_distress_signal(Some("FSBO")), 4);
        assert_eq!(score_distress_signal(Some("motivated seller")), 2);
        assert_eq!(score_distress_signal(Some("")), 0);
        assert_eq!(score_distress_signal(None), 0);
    }

    #[test]
    fn earlier_distress_rule_wins_on_overlap() {
        // "bank-owned REO, vacant" hits the reo/bank rule before vacant.
        assert_eq!(score_distress_signal(Some("bank-owned REO, vacant")), 7);
        // "tax" alone is not enough for the delinquency rule; falls through
        // to the catch-all.
        assert_eq!(score_distress_signal(Some("tax notice")), 2);
    }

    #[test]
    fn location_tiers_and_unknowns() {
        let config = ScoringConfig::default();
        assert_eq!(score_location(Some("78701"), &config), 10);
        assert_eq!(score_location(Some("78704"), &config), 7);
        assert_eq!(score_location(Some("79901"), &config), 4);
        assert_eq!(score_location(None, &config), 5);
    }

    #[test]
    fn days_on_market_rewards_fresh_listings() {
        assert_eq!(score_days_on_market(Some(5)), 5);
        assert_eq!(score_days_on_market(Some(7)), 5);
        assert_eq!(score_days_on_market(Some(8)), 3);
        assert_eq!(score_days_on_market(Some(30)), 3);
        assert_eq!(score_days_on_market(Some(90)), 1);
        assert_eq!(score_days_on_market(Some(91)), 0);
        assert_eq!(score_days_on_market(None), 2);
    }
}
