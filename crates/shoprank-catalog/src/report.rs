//! Rule-based product analysis keyed on rank tier and platform.

use serde::{Deserialize, Serialize};
use shoprank_core::Platform;

use crate::error::ReportError;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalysisRequest {
    #[serde(default)]
    pub product: Option<String>,
    #[serde(default)]
    pub rank: Option<u32>,
    #[serde(default)]
    pub platform: Option<String>,
}

/// Rank band the rules branch on. A missing rank counts as long tail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Tier {
    Leader,
    Top,
    Upper,
    Mid,
    LongTail,
}

impl Tier {
    fn of(rank: Option<u32>) -> Self {
        match rank {
            Some(1..=10) => Tier::Leader,
            Some(11..=30) => Tier::Top,
            Some(31..=50) => Tier::Upper,
            Some(51..=100) => Tier::Mid,
            _ => Tier::LongTail,
        }
    }

    fn within(self, bound: Tier) -> bool {
        self <= bound
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub market_positioning: MarketPositioning,
    pub performance: Performance,
    pub seasonal_trends: SeasonalTrends,
    pub improvements: Improvements,
    pub benchmarking: Benchmarking,
    pub final_opinion: FinalOpinion,
    pub seller_info: SellerInfo,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketPositioning {
    pub target_customer: String,
    pub price_range: String,
    pub competition: String,
    pub recommendation: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Performance {
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub strategy: String,
    pub key_metrics: KeyMetrics,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyMetrics {
    pub satisfaction: String,
    pub repurchase: String,
    pub recommendation: String,
    pub market_share: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonalTrends {
    pub peak_season: String,
    pub low_season: String,
    pub marketing_timing: String,
    pub yearly_trend: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Improvements {
    pub product_improvements: Vec<String>,
    pub packaging: Vec<String>,
    pub marketing: Vec<String>,
    pub innovation: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Benchmarking {
    pub global_cases: Vec<String>,
    pub influencer_strategy: Vec<String>,
    pub expansion_plan: Vec<String>,
    pub cross_selling: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalOpinion {
    pub market_entry: MarketEntry,
    pub profitability: Profitability,
    pub risks: Vec<String>,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MarketEntry {
    pub level: String,
    pub score: u8,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profitability {
    pub expected_growth: String,
    pub break_even: String,
    pub roi: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerInfo {
    pub name: String,
    pub phone: String,
    pub website: String,
    pub rating: String,
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

/// Builds the report for a product.
///
/// # Errors
///
/// Returns [`ReportError::MissingProduct`] when `product` is absent or blank.
pub fn analyze(request: &AnalysisRequest) -> Result<AnalysisReport, ReportError> {
    let product = request
        .product
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .ok_or(ReportError::MissingProduct)?;
    let tier = Tier::of(request.rank);
    let platform = request
        .platform
        .as_deref()
        .and_then(|p| p.parse::<Platform>().ok());

    Ok(AnalysisReport {
        market_positioning: market_positioning(product, tier, platform),
        performance: performance(tier, platform),
        seasonal_trends: seasonal_trends(product, tier),
        improvements: improvements(platform),
        benchmarking: benchmarking(tier),
        final_opinion: final_opinion(request.rank, tier, platform),
        seller_info: seller_info(platform),
    })
}

fn market_positioning(product: &str, tier: Tier, platform: Option<Platform>) -> MarketPositioning {
    let ages = if tier.within(Tier::Upper) { "20-40대" } else { "30-50대" };
    let gender = if product.contains("남성") {
        "남성"
    } else if product.contains("여성") {
        "여성"
    } else {
        "남녀"
    };
    let region = if tier.within(Tier::Top) { "수도권 중심" } else { "전국" };

    let price_range = match tier {
        Tier::Leader | Tier::Top => "프리미엄 가격대, 높은 브랜드 가치",
        Tier::Upper | Tier::Mid => "중상위 가격대, 합리적 소비 유도",
        Tier::LongTail => "중하위 가격대, 가성비 중심 포지셔닝",
    };

    let level = if tier.within(Tier::Upper) { "치열한 경쟁" } else { "보통 경쟁" };
    let advantage = match platform {
        Some(Platform::Naver) => "네이버 생태계 활용",
        Some(Platform::Coupang) => "로켓배송 인프라",
        _ => "다양한 플랫폼 진출",
    };

    let recommendation = match tier {
        Tier::Leader => "1위 유지를 위한 브랜드 강화 및 신제품 출시",
        Tier::Top | Tier::Upper => "상위권 진입을 위한 차별화 포인트 강화",
        Tier::Mid | Tier::LongTail => "인지도 향상을 위한 마케팅 투자 확대 필요",
    };

    MarketPositioning {
        target_customer: format!("{ages} {gender}, {region} 거주자, 온라인 쇼핑 활발한 소비층"),
        price_range: price_range.to_string(),
        competition: format!("{level} 구간, {advantage} 강점 보유"),
        recommendation: recommendation.to_string(),
    }
}

fn performance(tier: Tier, platform: Option<Platform>) -> Performance {
    let mut strengths = Vec::new();
    if tier.within(Tier::Top) {
        strengths.push("높은 브랜드 인지도".to_string());
    }
    match platform {
        Some(Platform::Coupang) => strengths.push("빠른 배송 서비스".to_string()),
        Some(Platform::Naver) => strengths.push("풍부한 리뷰 데이터".to_string()),
        _ => {}
    }
    strengths.extend(owned(&["우수한 품질 평가", "활발한 고객 소통"]));

    let mut weaknesses = Vec::new();
    if tier == Tier::LongTail {
        weaknesses.extend(owned(&["낮은 브랜드 인지도", "마케팅 노출 부족"]));
    }
    weaknesses.extend(owned(&["일부 고객 불만 존재", "가격 경쟁력 개선 필요"]));

    let strategy = match tier {
        Tier::Leader | Tier::Top => "프리미엄 브랜딩 전략 및 고객 로열티 강화",
        Tier::Upper | Tier::Mid => "성능 개선 및 가격 경쟁력 확보",
        Tier::LongTail => "인지도 제고 및 시장 진입 전략 필요",
    };

    let high = |bound: Tier, yes: &str, no: &str| {
        let chosen = if tier.within(bound) { yes } else { no };
        chosen.to_string()
    };

    Performance {
        strengths,
        weaknesses,
        strategy: strategy.to_string(),
        key_metrics: KeyMetrics {
            satisfaction: high(Tier::Upper, "높음", "보통"),
            repurchase: high(Tier::Top, "80% 이상", "60% 이상"),
            recommendation: high(Tier::Upper, "90% 이상", "70% 이상"),
            market_share: high(Tier::Leader, "5% 이상", "1-3%"),
        },
    }
}

fn seasonal_trends(product: &str, tier: Tier) -> SeasonalTrends {
    let peak = if product.contains("겨울") || product.contains("난방") {
        "11월-2월 (겨울철)"
    } else if product.contains("여름") || product.contains("냉방") {
        "6월-8월 (여름철)"
    } else {
        "11월-12월 (연말 선물시즌), 3월-5월 (신학기)"
    };
    SeasonalTrends {
        peak_season: peak.to_string(),
        low_season: "1월-2월 (소비 침체), 7월-8월 (휴가철)".to_string(),
        marketing_timing: "성수기 2개월 전 집중 마케팅, 비수기 할인 이벤트".to_string(),
        yearly_trend: if tier.within(Tier::Upper) {
            "꾸준한 상승세"
        } else {
            "계절별 등락 반복"
        }
        .to_string(),
    }
}

fn improvements(platform: Option<Platform>) -> Improvements {
    let mut marketing = owned(&["SNS 바이럴 마케팅", "인플루언서 협업", "콘텐츠 마케팅 강화"]);
    match platform {
        Some(Platform::Naver) => marketing.push("네이버 광고 최적화".to_string()),
        Some(Platform::Coupang) => marketing.push("쿠팡 광고 집행".to_string()),
        _ => {}
    }
    Improvements {
        product_improvements: owned(&["사용자 편의성 개선", "내구성 강화", "디자인 세련화", "기능 추가 업그레이드"]),
        packaging: owned(&["친환경 소재 사용", "언박싱 경험 개선", "보관 편의성 증대", "브랜드 아이덴티티 강화"]),
        marketing,
        innovation: owned(&["AI/IoT 기술 접목", "개인화 서비스 도입", "구독 모델 검토", "사용자 커뮤니티 구축"]),
    }
}

fn benchmarking(tier: Tier) -> Benchmarking {
    let expansion: &[&str] = if tier.within(Tier::Top) {
        &["해외 진출 검토", "프리미엄 라인 확장"]
    } else {
        &["국내 시장 점유율 확대", "다양한 옵션 출시"]
    };
    Benchmarking {
        global_cases: owned(&["아마존 베스트셀러 벤치마킹", "일본 시장 성공 사례 분석", "유럽 프리미엄 브랜드 전략"]),
        influencer_strategy: owned(&["관련 분야 전문 리뷰어 협업", "유튜브 언박싱 콘텐츠", "인스타그램 체험단 운영"]),
        expansion_plan: owned(expansion),
        cross_selling: owned(&["관련 액세서리 번들", "사용법 가이드북", "업그레이드 제품 추천"]),
    }
}

fn final_opinion(rank: Option<u32>, tier: Tier, platform: Option<Platform>) -> FinalOpinion {
    let market_entry = match tier {
        Tier::Leader | Tier::Top => MarketEntry {
            level: "매우 높음".to_string(),
            score: 90,
        },
        Tier::Upper | Tier::Mid => MarketEntry {
            level: "높음".to_string(),
            score: 75,
        },
        Tier::LongTail => MarketEntry {
            level: "보통".to_string(),
            score: 60,
        },
    };

    let base_growth = if tier.within(Tier::Upper) { 25 } else { 15 };
    let platform_bonus = match platform {
        Some(Platform::Coupang) => 5,
        Some(Platform::Naver) => 3,
        _ => 0,
    };
    // ROI tapers from 169% at rank 1 to 120% from rank 50 on.
    let roi = 120 + (50 - rank.unwrap_or(50).clamp(1, 50));

    let timing = if tier.within(Tier::Upper) { "3개월 내" } else { "6개월 내" };
    let strategy = if tier.within(Tier::Top) { "프리미엄 전략" } else { "가성비 전략" };

    FinalOpinion {
        market_entry,
        profitability: Profitability {
            expected_growth: format!("{}%", base_growth + platform_bonus),
            break_even: if tier.within(Tier::Top) { "3개월" } else { "6개월" }.to_string(),
            roi: format!("{roi}%"),
        },
        risks: owned(&["경쟁사 신제품 출시", "원자재 가격 상승", "소비자 트렌드 변화", "플랫폼 정책 변경"]),
        recommendations: vec![
            format!("{timing} 신제품 출시 권장"),
            format!("{strategy} 마케팅 집중"),
            "사전 예약 판매 진행".to_string(),
            "고객 피드백 적극 반영".to_string(),
        ],
    }
}

fn seller_info(platform: Option<Platform>) -> SellerInfo {
    match platform {
        Some(Platform::Naver) => SellerInfo {
            name: "네이버쇼핑 고객센터".to_string(),
            phone: "1588-3820".to_string(),
            website: Platform::Naver.base_url().to_string(),
            rating: "4.8/5.0".to_string(),
        },
        Some(Platform::Coupang) => SellerInfo {
            name: "쿠팡 고객센터".to_string(),
            phone: "1577-7011".to_string(),
            website: Platform::Coupang.base_url().to_string(),
            rating: "4.7/5.0".to_string(),
        },
        Some(other) => SellerInfo {
            name: format!("{} 고객센터", other.display_name()),
            phone: "판매자 상세 페이지 참조".to_string(),
            website: other.base_url().to_string(),
            rating: "4.5/5.0".to_string(),
        },
        None => SellerInfo {
            name: "종합쇼핑몰 고객센터".to_string(),
            phone: "판매자 상세 페이지 참조".to_string(),
            website: String::new(),
            rating: "4.5/5.0".to_string(),
        },
    }
}
