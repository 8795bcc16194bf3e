//! Synthetic catalog generator.
//!
//! Fabricates plausible ranked products when no live source exists or when a
//! live source returned fewer items than requested. Randomness is injected so
//! tests can seed it.

use std::ops::RangeInclusive;

use rand::seq::IndexedRandom;
use rand::Rng;
use shoprank_core::{Category, Platform, Pricing, ProductRecord};

/// Magnitude ranges for one platform's fabricated products.
#[derive(Debug, Clone)]
pub struct SyntheticProfile {
    /// List price in KRW.
    pub original_price: RangeInclusive<u64>,
    /// Discount percentage applied to the list price.
    pub discount: RangeInclusive<u8>,
    pub rating: RangeInclusive<f64>,
    pub review_count: RangeInclusive<u32>,
    /// Whether records carry delivery and rocket-shipping fields.
    pub delivery_extras: bool,
}

pub static NAVER_PROFILE: SyntheticProfile = SyntheticProfile {
    original_price: 10_000..=510_000,
    discount: 0..=40,
    rating: 4.0..=5.0,
    review_count: 100..=5_100,
    delivery_extras: false,
};

pub static COUPANG_PROFILE: SyntheticProfile = SyntheticProfile {
    original_price: 10_000..=1_200_000,
    discount: 10..=50,
    rating: 4.0..=5.0,
    review_count: 1_000..=90_000,
    delivery_extras: true,
};

pub static MARKETPLACE_PROFILE: SyntheticProfile = SyntheticProfile {
    original_price: 30_000..=180_000,
    discount: 15..=74,
    rating: 3.8..=5.0,
    review_count: 50..=3_050,
    delivery_extras: false,
};

#[must_use]
pub fn profile_for(platform: Platform) -> &'static SyntheticProfile {
    match platform {
        Platform::Naver => &NAVER_PROFILE,
        Platform::Coupang => &COUPANG_PROFILE,
        _ => &MARKETPLACE_PROFILE,
    }
}

/// Brands and product nouns used to compose titles for a category.
fn templates(category: Category) -> (&'static [&'static str], &'static [&'static str]) {
    match category {
        Category::Electronics => (
            &["삼성", "LG", "애플", "샤오미", "소니", "로지텍"],
            &["무선 이어폰", "스마트워치", "블루투스 스피커", "27인치 모니터", "노트북 거치대", "고속 충전기"],
        ),
        Category::Fashion => (
            &["나이키", "아디다스", "유니클로", "무신사 스탠다드", "뉴발란스", "폴로"],
            &["오버핏 후드티", "경량 패딩", "와이드 청바지", "러닝화", "니트 가디건", "데일리 백팩"],
        ),
        Category::Household => (
            &["크리넥스", "다우니", "피죤", "락앤락", "코멧", "깨끗한나라"],
            &["3겹 화장지 30롤", "섬유유연제 대용량", "주방세제 리필", "밀폐용기 세트", "물티슈 10팩", "극세사 수건"],
        ),
        Category::Food => (
            &["CJ", "농심", "오뚜기", "동원", "풀무원", "삼다수"],
            &["햇반 24개입", "신라면 멀티팩", "참치 선물세트", "생수 2L 12병", "냉동 만두", "견과류 한줌"],
        ),
        Category::Beauty => (
            &["설화수", "이니스프리", "라네즈", "에스트라", "닥터자르트", "롬앤"],
            &["수분 크림", "선크림 SPF50+", "쿠션 팩트", "립 틴트", "클렌징 폼", "비타민 세럼"],
        ),
        Category::Books => (
            &["민음사", "문학동네", "창비", "위즈덤하우스", "길벗", "해커스"],
            &["베스트셀러 소설", "자기계발 에세이", "토익 문제집", "경제 교양서", "그림책 세트", "코딩 입문서"],
        ),
        Category::Games => (
            &["닌텐도", "소니", "레고", "반다이", "코리아보드게임즈", "마이크로소프트"],
            &["스위치 타이틀", "듀얼센스 컨트롤러", "테크닉 블록", "건프라 키트", "보드게임", "게임패드"],
        ),
        Category::Baby => (
            &["하기스", "팸퍼스", "매일유업", "보솜이", "베베숲", "아가방"],
            &["기저귀 대형", "분유 3단계", "아기 물티슈", "유아 로션", "젖병 세트", "출산 선물세트"],
        ),
        Category::Automotive => (
            &["불스원", "아이나비", "보쉬", "한국타이어", "카렉스", "3M"],
            &["블랙박스", "차량용 방향제", "와이퍼 세트", "엔진오일", "차량용 청소기", "유리막 코팅제"],
        ),
        Category::Sports => (
            &["코베아", "데카트론", "나이키", "타이틀리스트", "스노우피크", "언더아머"],
            &["캠핑 의자", "요가 매트", "골프공 12구", "덤벨 세트", "등산 스틱", "러닝 레깅스"],
        ),
        Category::Health => (
            &["종근당", "정관장", "뉴트리원", "센트룸", "고려은단", "락토핏"],
            &["종합 비타민", "홍삼정 스틱", "유산균 60캡슐", "오메가3", "비타민C 1000", "프로틴 파우더"],
        ),
        Category::Furniture | Category::Other => (
            &["한샘", "이케아", "시디즈", "일룸", "에이스침대", "데코뷰"],
            &["원목 책상", "사무용 의자", "3단 수납장", "암막 커튼", "LED 스탠드", "메모리폼 매트리스"],
        ),
    }
}

const VARIANTS: &[&str] = &["블랙", "화이트", "그레이", "네이비", "베이지", "대용량", "1+1", "기획세트"];

const NAVER_MALLS: &[&str] = &["네이버 스마트스토어", "브랜드스토어", "쇼핑윈도", "네이버 플러스스토어"];

/// Generates `count` records ranked `first_rank..first_rank + count`.
///
/// Every record satisfies `price <= original_price` and carries the discount
/// recomputed from its two prices.
pub fn generate<R: Rng + ?Sized>(
    profile: &SyntheticProfile,
    platform: Platform,
    count: usize,
    first_rank: u32,
    rng: &mut R,
) -> Vec<ProductRecord> {
    (0..count)
        .map(|offset| {
            let rank = first_rank.saturating_add(u32::try_from(offset).unwrap_or(u32::MAX));
            fabricate(profile, platform, rank, rng)
        })
        .collect()
}

fn fabricate<R: Rng + ?Sized>(
    profile: &SyntheticProfile,
    platform: Platform,
    rank: u32,
    rng: &mut R,
) -> ProductRecord {
    let category = *Category::CONCRETE
        .choose(rng)
        .unwrap_or(&Category::Household);
    let (brands, nouns) = templates(category);
    let brand = brands.choose(rng).copied().unwrap_or("기본");
    let noun = nouns.choose(rng).copied().unwrap_or("상품");
    let variant = VARIANTS.choose(rng).copied().unwrap_or("");
    let title = format!("{brand} {noun} {variant}").trim_end().to_string();

    // List prices land on 100 KRW steps, sale prices on 10 KRW steps.
    let original_price =
        rng.random_range(profile.original_price.start() / 100..=profile.original_price.end() / 100) * 100;
    let discount = u64::from(rng.random_range(profile.discount.clone()));
    let price = (original_price * (100 - discount) / 100) / 10 * 10;
    let pricing = Pricing::from_list_price(price, original_price);

    let rating = (rng.random_range(profile.rating.clone()) * 10.0).round() / 10.0;
    let review_count = rng.random_range(profile.review_count.clone());

    let product_id = rng.random_range(1_000_000_000_u64..=9_999_999_999).to_string();

    let mall_name = match platform {
        Platform::Naver => NAVER_MALLS
            .choose(rng)
            .copied()
            .unwrap_or(platform.default_mall())
            .to_string(),
        _ => platform.default_mall().to_string(),
    };

    let (delivery_info, free_shipping, is_rocket, vendor_name) = if profile.delivery_extras {
        let rocket = rng.random_bool(0.8);
        let delivery = if rocket { "로켓배송" } else { "판매자배송" };
        (
            Some(delivery.to_string()),
            Some(rocket || rng.random_bool(0.5)),
            Some(rocket),
            Some(if rocket { platform.default_mall().to_string() } else { format!("{brand} 공식판매처") }),
        )
    } else {
        (None, None, None, None)
    };

    ProductRecord {
        rank,
        title,
        price: pricing.price,
        original_price: pricing.original_price,
        discount_rate: pricing.discount_rate,
        image: format!("https://picsum.photos/seed/{}-{product_id}/300/300", platform.id()),
        link: platform.product_url(&product_id),
        mall_name,
        category,
        platform,
        rating,
        review_count,
        brand: Some(brand.to_string()),
        product_id: Some(product_id),
        delivery_info,
        free_shipping,
        is_rocket,
        vendor_name,
    }
}
