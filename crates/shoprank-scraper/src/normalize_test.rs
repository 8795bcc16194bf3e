use shoprank_core::DEFAULT_KEYWORDS;

use super::*;

fn ctx(platform: Platform, rank: u32) -> NormalizeContext {
    NormalizeContext {
        platform,
        rank,
        keywords: DEFAULT_KEYWORDS,
    }
}

#[test]
fn applies_bounds_and_computes_discount() {
    let raw = RawItem {
        title: "<b>LG</b> 그램 노트북".into(),
        low_price: Some(8_000),
        high_price: Some(10_000),
        ..RawItem::default()
    };
    let record = normalize_item(raw, &ctx(Platform::Naver, 3));
    assert_eq!(record.title, "LG 그램 노트북");
    assert_eq!(record.price, 8_000);
    assert_eq!(record.original_price, 10_000);
    assert_eq!(record.discount_rate, 20);
    assert_eq!(record.rank, 3);
    assert!(record.is_consistent());
}

#[test]
fn high_bound_only_becomes_price() {
    let raw = RawItem {
        title: "무선 청소기".into(),
        high_price: Some(12_000),
        ..RawItem::default()
    };
    let record = normalize_item(raw, &ctx(Platform::Naver, 1));
    assert_eq!(record.price, 12_000);
    assert_eq!(record.original_price, 12_000);
    assert_eq!(record.discount_rate, 0);
}

#[test]
fn defaults_fill_absent_fields() {
    let raw = RawItem {
        title: "이름 없는 상품".into(),
        ..RawItem::default()
    };
    let record = normalize_item(raw, &ctx(Platform::Coupang, 5));
    assert_eq!(record.price, 0);
    assert_eq!(record.discount_rate, 0);
    assert_eq!(record.category, Category::Other);
    assert_eq!(record.mall_name, Platform::Coupang.default_mall());
    assert!((record.rating - 0.0).abs() < f64::EPSILON);
    assert_eq!(record.review_count, 0);
    assert_eq!(record.image, "");
    assert!(record.link.starts_with(Platform::Coupang.base_url()));
}

#[test]
fn empty_title_gets_platform_placeholder() {
    let raw = RawItem {
        title: "<b></b>".into(),
        low_price: Some(1_000),
        ..RawItem::default()
    };
    let record = normalize_item(raw, &ctx(Platform::Naver, 7));
    assert_eq!(record.title, "네이버쇼핑 상품 7");
}

#[test]
fn source_category_hint_wins_over_title_keywords() {
    let raw = RawItem {
        title: "비타민 보관함".into(),
        category_hint: Some("생활/건강".into()),
        ..RawItem::default()
    };
    let record = normalize_item(raw, &ctx(Platform::Naver, 1));
    assert_eq!(record.category, Category::Household);
}

#[test]
fn unknown_hint_falls_back_to_title_inference() {
    let raw = RawItem {
        title: "닌텐도 스위치 게임 타이틀".into(),
        category_hint: Some("면세점".into()),
        ..RawItem::default()
    };
    let record = normalize_item(raw, &ctx(Platform::Naver, 1));
    assert_eq!(record.category, Category::Games);
}

#[test]
fn rating_is_clamped_and_rounded() {
    let raw = RawItem {
        title: "상품".into(),
        rating: Some(7.26),
        ..RawItem::default()
    };
    assert!((normalize_item(raw, &ctx(Platform::Ssg, 1)).rating - 5.0).abs() < f64::EPSILON);

    let raw = RawItem {
        title: "상품".into(),
        rating: Some(4.26),
        ..RawItem::default()
    };
    assert!((normalize_item(raw, &ctx(Platform::Ssg, 1)).rating - 4.3).abs() < 1e-9);
}
