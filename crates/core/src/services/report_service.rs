use crate::models::analysis::{Analysis, BehaviorTrait, PerformerSnapshot};
use crate::models::locale::Locale;
use crate::models::portfolio::Portfolio;
use crate::services::analytics_service::AnalyticsService;

/// Renders a classified analysis into the plain-text report sent to the
/// advice API (and shown to the user).
///
/// The locale selects section labels only. Numeric formatting is fixed
/// everywhere: `$` amounts to 2 decimals, percentages to 1, unit quantities
/// to 8, no thousands separators.
pub struct ReportService {
    analytics: AnalyticsService,
}

/// Section labels for one locale.
struct Labels {
    header: &'static str,
    overview: &'static str,
    coin_count: &'static str,
    /// Counter suffix appended after coin counts ("개" in Korean)
    count_suffix: &'static str,
    total_invested: &'static str,
    current_value: &'static str,
    pnl: &'static str,
    assessment: &'static str,
    diversification: &'static str,
    risk: &'static str,
    meme_coins: &'static str,
    best: &'static str,
    worst: &'static str,
    traits: &'static str,
    holdings: &'static str,
    quantity: &'static str,
    cost_basis: &'static str,
    current_price: &'static str,
}

const EN: Labels = Labels {
    header: "Portfolio analysis:",
    overview: "📊 Overview:",
    coin_count: "Coins held",
    count_suffix: "",
    total_invested: "Total invested",
    current_value: "Current value",
    pnl: "P&L",
    assessment: "🎯 Assessment:",
    diversification: "Diversification",
    risk: "Risk level",
    meme_coins: "Meme coins",
    best: "Best performer",
    worst: "Worst performer",
    traits: "Investor traits",
    holdings: "📈 Holdings:",
    quantity: "Quantity",
    cost_basis: "Purchase price",
    current_price: "Current price",
};

const KO: Labels = Labels {
    header: "포트폴리오 분석 결과:",
    overview: "📊 기본 정보:",
    coin_count: "보유 코인 수",
    count_suffix: "개",
    total_invested: "총 투자금",
    current_value: "현재 가치",
    pnl: "손익",
    assessment: "🎯 분석 결과:",
    diversification: "분산투자 수준",
    risk: "위험도",
    meme_coins: "밈 코인",
    best: "최고 수익 코인",
    worst: "최악 수익 코인",
    traits: "신규 투자자 특징",
    holdings: "📈 상세 포트폴리오:",
    quantity: "수량",
    cost_basis: "구매가",
    current_price: "현재가",
};

impl ReportService {
    pub fn new() -> Self {
        Self {
            analytics: AnalyticsService::new(),
        }
    }

    /// Render the report: header, aggregate overview, assessment, then a
    /// numbered per-holding breakdown in portfolio order.
    pub fn render(&self, analysis: &Analysis, portfolio: &Portfolio, locale: Locale) -> String {
        let l = labels(locale);
        let mut out = String::new();

        out.push_str(l.header);
        out.push_str("\n\n");

        out.push_str(l.overview);
        out.push('\n');
        out.push_str(&format!(
            "- {}: {}{}\n",
            l.coin_count, analysis.coin_count, l.count_suffix
        ));
        out.push_str(&format!(
            "- {}: {}\n",
            l.total_invested,
            money(analysis.totals.invested)
        ));
        out.push_str(&format!(
            "- {}: {}\n",
            l.current_value,
            money(analysis.totals.current)
        ));
        out.push_str(&format!(
            "- {}: {} ({})\n\n",
            l.pnl,
            signed_money(analysis.totals.pnl),
            signed_pct(analysis.totals.pnl_pct)
        ));

        out.push_str(l.assessment);
        out.push('\n');
        out.push_str(&format!(
            "- {}: {}\n",
            l.diversification, analysis.diversification
        ));
        out.push_str(&format!("- {}: {}\n", l.risk, analysis.risk));
        out.push_str(&format!(
            "- {}: {}{}\n",
            l.meme_coins, analysis.meme_count, l.count_suffix
        ));
        if let Some(best) = &analysis.best {
            out.push_str(&format!("- {}: {}\n", l.best, performer(best)));
        }
        if let Some(worst) = &analysis.worst {
            out.push_str(&format!("- {}: {}\n", l.worst, performer(worst)));
        }
        if !analysis.traits.is_empty() {
            let listed: Vec<&str> = analysis
                .traits
                .iter()
                .map(|t| trait_label(*t, locale))
                .collect();
            out.push_str(&format!("- {}: {}\n", l.traits, listed.join(", ")));
        }

        out.push('\n');
        out.push_str(l.holdings);
        out.push('\n');
        for (idx, holding) in portfolio.holdings.iter().enumerate() {
            let v = self.analytics.valuate(holding);
            out.push_str(&format!(
                "{}. {} ({})\n",
                idx + 1,
                holding.name,
                holding.symbol
            ));
            out.push_str(&format!("   {}: {:.8}\n", l.quantity, holding.quantity));
            out.push_str(&format!(
                "   {}: {}\n",
                l.cost_basis,
                money(holding.cost_basis)
            ));
            out.push_str(&format!(
                "   {}: {}\n",
                l.current_price,
                money(holding.current_price)
            ));
            out.push_str(&format!(
                "   {}: {} ({})\n\n",
                l.pnl,
                signed_money(v.pnl),
                signed_pct(v.pnl_pct)
            ));
        }

        out.trim_end().to_string()
    }
}

impl Default for ReportService {
    fn default() -> Self {
        Self::new()
    }
}

fn labels(locale: Locale) -> &'static Labels {
    match locale {
        Locale::En => &EN,
        Locale::Ko => &KO,
    }
}

fn trait_label(t: BehaviorTrait, locale: Locale) -> &'static str {
    match (locale, t) {
        (Locale::En, BehaviorTrait::SingleAssetConcentration) => "single-asset concentration",
        (Locale::En, BehaviorTrait::MemeExposure) => "meme-asset exposure",
        (Locale::En, BehaviorTrait::OverDiversification) => "over-diversification",
        (Locale::En, BehaviorTrait::LargeUnrealizedLoss) => "unrealized large loss",
        (Locale::En, BehaviorTrait::LargeUnrealizedGain) => "unrealized large gain",
        (Locale::Ko, BehaviorTrait::SingleAssetConcentration) => "단일 코인 집중",
        (Locale::Ko, BehaviorTrait::MemeExposure) => "밈 코인 투자",
        (Locale::Ko, BehaviorTrait::OverDiversification) => "과도한 다양화",
        (Locale::Ko, BehaviorTrait::LargeUnrealizedLoss) => "심각한 손실 (HODL 중)",
        (Locale::Ko, BehaviorTrait::LargeUnrealizedGain) => "과도한 수익률 (FOMO 가능성)",
    }
}

fn performer(p: &PerformerSnapshot) -> String {
    format!("{} ({})", p.symbol, signed_pct(p.pnl_pct))
}

fn money(value: f64) -> String {
    if value < 0.0 {
        format!("-${:.2}", value.abs())
    } else {
        format!("${value:.2}")
    }
}

fn signed_money(value: f64) -> String {
    if value < 0.0 {
        format!("-${:.2}", value.abs())
    } else {
        format!("+${value:.2}")
    }
}

fn signed_pct(value: f64) -> String {
    if value < 0.0 {
        format!("{value:.1}%")
    } else {
        format!("+{value:.1}%")
    }
}
