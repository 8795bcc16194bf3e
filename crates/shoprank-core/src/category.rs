//! Category enumeration, label aliases, and title keyword inference.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Product category label. Serialized as the Korean label the dashboard shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "전자제품")]
    Electronics,
    #[serde(rename = "패션의류")]
    Fashion,
    #[serde(rename = "생활용품")]
    Household,
    #[serde(rename = "식품")]
    Food,
    #[serde(rename = "화장품")]
    Beauty,
    #[serde(rename = "도서")]
    Books,
    #[serde(rename = "취미게임")]
    Games,
    #[serde(rename = "육아용품")]
    Baby,
    #[serde(rename = "자동차")]
    Automotive,
    #[serde(rename = "스포츠")]
    Sports,
    #[serde(rename = "건강식품")]
    Health,
    #[serde(rename = "가구인테리어")]
    Furniture,
    #[serde(rename = "기타")]
    Other,
}

/// Keyword table used for title-based inference: first matching entry wins.
pub type KeywordTable = [(Category, &'static [&'static str])];

/// Default inference table shared by every platform.
///
/// Ordering matters: `건강식품` is checked before `식품`, baby goods before
/// fashion, and furniture before books so that "책상" is not read as a book.
pub static DEFAULT_KEYWORDS: &KeywordTable = &[
    (Category::Health, &["건강식품", "비타민", "유산균", "홍삼", "오메가", "프로틴", "영양제"]),
    (Category::Baby, &["기저귀", "분유", "유아", "아기", "출산", "육아", "젖병"]),
    (
        Category::Electronics,
        &[
            "노트북", "스마트폰", "이어폰", "헤드폰", "충전기", "모니터", "tv", "usb", "갤럭시",
            "아이폰", "세탁기", "냉장고", "청소기", "태블릿", "스마트워치", "블루투스", "키보드",
        ],
    ),
    (
        Category::Beauty,
        &["화장품", "크림", "립스틱", "틴트", "쿠션", "선크림", "세럼", "클렌징", "마스카라", "향수"],
    ),
    (
        Category::Fashion,
        &["패딩", "코트", "니트", "청바지", "셔츠", "원피스", "운동화", "스니커즈", "가방", "자켓", "티셔츠"],
    ),
    (Category::Food, &["과자", "라면", "커피", "견과", "생수", "쌀", "김치", "음료", "간식", "고기"]),
    (Category::Games, &["게임", "닌텐도", "플레이스테이션", "레고", "퍼즐", "보드게임", "피규어"]),
    (Category::Automotive, &["자동차", "차량용", "블랙박스", "타이어", "와이퍼", "엔진오일"]),
    (Category::Sports, &["요가", "골프", "캠핑", "등산", "자전거", "덤벨", "헬스", "축구"]),
    (Category::Furniture, &["소파", "침대", "책상", "의자", "매트리스", "커튼", "조명", "수납장"]),
    (Category::Books, &["도서", "책", "소설", "문제집", "에세이", "만화"]),
    (
        Category::Household,
        &["물티슈", "세제", "휴지", "칫솔", "치약", "샴푸", "수건", "주방", "행주"],
    ),
];

impl Category {
    /// The twelve concrete categories; excludes [`Category::Other`].
    pub const CONCRETE: [Category; 12] = [
        Category::Electronics,
        Category::Fashion,
        Category::Household,
        Category::Food,
        Category::Beauty,
        Category::Books,
        Category::Games,
        Category::Baby,
        Category::Automotive,
        Category::Sports,
        Category::Health,
        Category::Furniture,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Category::Electronics => "전자제품",
            Category::Fashion => "패션의류",
            Category::Household => "생활용품",
            Category::Food => "식품",
            Category::Beauty => "화장품",
            Category::Books => "도서",
            Category::Games => "취미게임",
            Category::Baby => "육아용품",
            Category::Automotive => "자동차",
            Category::Sports => "스포츠",
            Category::Health => "건강식품",
            Category::Furniture => "가구인테리어",
            Category::Other => "기타",
        }
    }

    /// Upstream search terms used to source live items for this category.
    #[must_use]
    pub fn search_terms(self) -> &'static [&'static str] {
        match self {
            Category::Electronics => &["전자제품", "디지털가전", "스마트기기"],
            Category::Fashion => &["패션의류", "여성의류", "남성의류"],
            Category::Household => &["생활용품", "주방용품", "욕실용품"],
            Category::Food => &["식품", "간식", "가공식품"],
            Category::Beauty => &["화장품", "스킨케어", "메이크업"],
            Category::Books => &["베스트셀러 도서", "소설", "자기계발"],
            Category::Games => &["게임", "장난감", "취미용품"],
            Category::Baby => &["육아용품", "유아용품", "출산용품"],
            Category::Automotive => &["자동차용품", "차량용품"],
            Category::Sports => &["스포츠용품", "캠핑용품", "헬스용품"],
            Category::Health => &["건강식품", "영양제", "비타민"],
            Category::Furniture => &["가구", "인테리어소품", "침구"],
            Category::Other => &["인기상품"],
        }
    }

    /// Parses a category filter value.
    ///
    /// Returns `Ok(None)` for the "no filter" values (`""`, `all`, `전체`).
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnknownCategory`] when the value matches no label
    /// or alias.
    pub fn parse_filter(raw: &str) -> Result<Option<Category>, CoreError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") || trimmed == "전체" {
            return Ok(None);
        }
        Category::from_alias(trimmed)
            .map(Some)
            .ok_or_else(|| CoreError::UnknownCategory(raw.to_string()))
    }

    /// Resolves a label, English alias, or composite upstream label.
    #[must_use]
    pub fn from_alias(raw: &str) -> Option<Category> {
        let value = raw.trim();
        if let Some(found) = Category::CONCRETE
            .into_iter()
            .chain(std::iter::once(Category::Other))
            .find(|c| c.label() == value)
        {
            return Some(found);
        }

        let category = match value.to_ascii_lowercase().as_str() {
            "electronics" | "digital" | "디지털" | "가전" | "디지털/가전" => {
                Category::Electronics
            }
            "fashion" | "패션" | "패션잡화" | "패션의류/잡화" => Category::Fashion,
            "home" | "household" | "생활/건강" | "생활용품/주방" => Category::Household,
            "food" | "음식" | "식품/건강식품" => Category::Food,
            "beauty" | "화장품/미용" | "화장품/뷰티" | "뷰티" => Category::Beauty,
            "books" | "book" | "도서/음반" | "도서/음반/dvd" => Category::Books,
            "games" | "hobby" | "취미" | "게임" | "완구/취미" => Category::Games,
            "baby" | "출산/육아" | "유아/아동" => Category::Baby,
            "auto" | "automotive" | "자동차용품" => Category::Automotive,
            "sports" | "스포츠/레저" => Category::Sports,
            "health" | "건강" => Category::Health,
            "furniture" | "가구/인테리어" | "홈인테리어" | "인테리어" => Category::Furniture,
            "other" | "etc" => Category::Other,
            _ => return None,
        };
        Some(category)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Infers a category from a product title using `table`.
///
/// Matching is case-insensitive substring search; returns `None` when no
/// keyword hits so the caller can choose its own fallback.
#[must_use]
pub fn infer_category(title: &str, table: &KeywordTable) -> Option<Category> {
    let lower = title.to_lowercase();
    table
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(category, _)| *category)
}
