//! Two-level region filter: provincial-level regions and their sub-regions.
//!
//! A sub-region is only meaningful beneath a selected [`BigRegion`]. The
//! [`SubRegion::All`] sentinel (`전지역`) stands for "every sub-region of the
//! selected big region" and is what a fresh big-region selection starts with.

use serde::{Deserialize, Serialize};

/// Label of the "all sub-regions" sentinel.
pub const ALL_SUB_REGIONS: &str = "전지역";

macro_rules! big_regions {
    ($($variant:ident => $label:literal [$($sub:literal),* $(,)?]),* $(,)?) => {
        /// Top-level (provincial) region.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum BigRegion {
            $(
                #[serde(rename = $label)]
                $variant,
            )*
        }

        impl BigRegion {
            /// Every big region in display order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),*];

            /// Display and URL label.
            #[must_use]
            pub const fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)*
                }
            }

            /// Looks up a big region by its label. Unknown labels yield `None`.
            #[must_use]
            pub fn from_label(label: &str) -> Option<Self> {
                match label {
                    $($label => Some(Self::$variant),)*
                    _ => None,
                }
            }

            /// Sub-regions enumerated for this big region, excluding the sentinel.
            #[must_use]
            pub const fn sub_regions(self) -> &'static [&'static str] {
                match self {
                    $(Self::$variant => &[$($sub),*],)*
                }
            }
        }
    };
}

big_regions! {
    Seoul => "서울" [
        "강남구", "강동구", "강북구", "강서구", "관악구", "광진구", "구로구", "금천구", "노원구",
        "도봉구", "동대문구", "동작구", "마포구", "서대문구", "서초구", "성동구", "성북구", "송파구",
        "양천구", "영등포구", "용산구", "은평구", "종로구", "중구", "중랑구",
    ],
    Gyeonggi => "경기" [
        "가평군", "고양시", "과천시", "광명시", "광주시", "구리시", "군포시", "김포시", "남양주시",
        "동두천시", "부천시", "성남시", "수원시", "시흥시", "안산시", "안성시", "안양시", "양주시",
        "양평군", "여주시", "연천군", "오산시", "용인시", "의왕시", "의정부시", "이천시", "파주시",
        "평택시", "포천시", "하남시", "화성시",
    ],
    Incheon => "인천" [
        "강화군", "계양구", "남동구", "동구", "미추홀구", "부평구", "서구", "연수구", "옹진군", "중구",
    ],
    Gangwon => "강원" [
        "강릉시", "고성군", "동해시", "삼척시", "속초시", "양구군", "양양군", "영월군", "원주시",
        "인제군", "정선군", "철원군", "춘천시", "태백시", "평창군", "홍천군", "화천군", "횡성군",
    ],
    Chungbuk => "충북" [
        "괴산군", "단양군", "보은군", "영동군", "옥천군", "음성군", "제천시", "증평군", "진천군",
        "청주시", "충주시",
    ],
    Chungnam => "충남" [
        "계룡시", "공주시", "금산군", "논산시", "당진시", "보령시", "부여군", "서산시", "서천군",
        "아산시", "예산군", "천안시", "청양군", "태안군", "홍성군",
    ],
    Sejong => "세종" ["세종시"],
    Daejeon => "대전" ["대덕구", "동구", "서구", "유성구", "중구"],
    Jeonbuk => "전북" [
        "고창군", "군산시", "김제시", "남원시", "무주군", "부안군", "순창군", "완주군", "익산시",
        "임실군", "장수군", "전주시", "정읍시", "진안군",
    ],
    Jeonnam => "전남" [
        "강진군", "고흥군", "곡성군", "광양시", "구례군", "나주시", "담양군", "목포시", "무안군",
        "보성군", "순천시", "신안군", "여수시", "영광군", "영암군", "완도군", "장성군", "장흥군",
        "진도군", "함평군", "해남군", "화순군",
    ],
    Gwangju => "광주" ["광산구", "남구", "동구", "북구", "서구"],
    Gyeongbuk => "경북" [
        "경산시", "경주시", "고령군", "구미시", "군위군", "김천시", "문경시", "봉화군", "상주시",
        "성주군", "안동시", "영덕군", "영양군", "영주시", "영천시", "예천군", "울릉군", "울진군",
        "의성군", "청도군", "청송군", "칠곡군", "포항시",
    ],
    Gyeongnam => "경남" [
        "거제시", "거창군", "고성군", "김해시", "남해군", "밀양시", "사천시", "산청군", "양산시",
        "의령군", "진주시", "창녕군", "창원시", "통영시", "하동군", "함안군", "함양군", "합천군",
    ],
    Daegu => "대구" ["남구", "달서구", "달성군", "동구", "북구", "서구", "수성구", "중구"],
    Ulsan => "울산" ["남구", "동구", "북구", "울주군", "중구"],
    Busan => "부산" [
        "강서구", "금정구", "기장군", "남구", "동구", "동래구", "부산진구", "북구", "사상구",
        "사하구", "서구", "수영구", "연제구", "영도구", "중구", "해운대구",
    ],
    Jeju => "제주" ["서귀포시", "제주시"],
}

impl BigRegion {
    /// Returns `true` if `name` is one of this region's enumerated sub-regions.
    #[must_use]
    pub fn contains(self, name: &str) -> bool {
        self.sub_regions().contains(&name)
    }
}

impl std::fmt::Display for BigRegion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Second-level region selection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SubRegion {
    /// Every sub-region of the selected big region.
    All,
    /// A single named sub-region.
    Named(String),
}

impl SubRegion {
    /// Display and URL label; the sentinel renders as `전지역`.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::All => ALL_SUB_REGIONS,
            Self::Named(name) => name,
        }
    }
}

impl From<String> for SubRegion {
    fn from(value: String) -> Self {
        if value == ALL_SUB_REGIONS {
            Self::All
        } else {
            Self::Named(value)
        }
    }
}

impl From<&str> for SubRegion {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<SubRegion> for String {
    fn from(value: SubRegion) -> Self {
        match value {
            SubRegion::All => ALL_SUB_REGIONS.to_string(),
            SubRegion::Named(name) => name,
        }
    }
}

/// Combined big/sub region filter.
///
/// Mutators enforce the parent/child rules: clearing the big region clears the
/// sub-region, and choosing a big region resets the sub-region to
/// [`SubRegion::All`]. `set_small` stores its value unconditionally; a
/// sub-region without a big region has no effect on fetches and is dropped by
/// [`RegionFilter::normalized`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct RegionFilter {
    big: Option<BigRegion>,
    small: Option<SubRegion>,
}

impl RegionFilter {
    /// Selected big region, if any.
    #[must_use]
    pub const fn big(&self) -> Option<BigRegion> {
        self.big
    }

    /// Selected sub-region, if any.
    #[must_use]
    pub const fn small(&self) -> Option<&SubRegion> {
        self.small.as_ref()
    }

    /// Sets the big region. `None` clears both levels; a concrete region resets
    /// the sub-region to the sentinel.
    pub fn set_big(&mut self, big: Option<BigRegion>) {
        self.small = big.map(|_| SubRegion::All);
        self.big = big;
    }

    /// Sets the sub-region without consulting the big region.
    pub fn set_small(&mut self, small: SubRegion) {
        self.small = Some(small);
    }

    /// Returns the canonical form of this filter.
    ///
    /// - no big region: sub-region is empty
    /// - big region with a missing or foreign sub-region: the sentinel
    #[must_use]
    pub fn normalized(&self) -> Self {
        let Some(big) = self.big else {
            return Self::default();
        };
        let small = match &self.small {
            Some(SubRegion::Named(name)) if big.contains(name) => SubRegion::Named(name.clone()),
            _ => SubRegion::All,
        };
        Self {
            big: Some(big),
            small: Some(small),
        }
    }

    /// Sub-region name to send to the server; empty for the sentinel or when no
    /// big region is selected.
    #[must_use]
    pub fn fetch_sub_region(&self) -> &str {
        match (self.big, &self.small) {
            (Some(_), Some(SubRegion::Named(name))) => name,
            _ => "",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn labels_round_trip_through_lookup() {
        for region in BigRegion::ALL {
            assert_eq!(BigRegion::from_label(region.label()), Some(*region));
        }
        assert_eq!(BigRegion::ALL.len(), 17);
        assert_eq!(BigRegion::from_label("서울특별시"), None);
    }

    #[test]
    fn clearing_big_region_clears_sub_region() {
        let mut region = RegionFilter::default();
        region.set_big(Some(BigRegion::Seoul));
        region.set_small(SubRegion::from("강남구"));
        region.set_big(None);
        assert_eq!(region.big(), None);
        assert_eq!(region.small(), None);
    }

    #[test]
    fn small_without_big_is_stored_but_not_fetched() {
        let mut region = RegionFilter::default();
        region.set_small(SubRegion::from("강남구"));
        assert_eq!(region.small(), Some(&SubRegion::Named("강남구".into())));
        assert_eq!(region.fetch_sub_region(), "");
        assert_eq!(region.normalized(), RegionFilter::default());
    }

    #[test]
    fn foreign_sub_region_normalizes_to_sentinel() {
        let mut region = RegionFilter::default();
        region.set_big(Some(BigRegion::Jeju));
        region.set_small(SubRegion::from("강남구"));
        assert_eq!(region.normalized().small(), Some(&SubRegion::All));
    }

    #[test]
    fn sentinel_label_parses_to_all() {
        assert_eq!(SubRegion::from(ALL_SUB_REGIONS), SubRegion::All);
        assert_eq!(SubRegion::All.label(), "전지역");
    }

    proptest! {
        #[test]
        fn set_big_leaves_small_empty_or_sentinel(index in 0usize..18, prior in "[가-힣]{1,4}") {
            let mut region = RegionFilter::default();
            region.set_small(SubRegion::from(prior));
            let big = BigRegion::ALL.get(index).copied();
            region.set_big(big);
            match big {
                None => prop_assert_eq!(region.small(), None),
                Some(_) => prop_assert_eq!(region.small(), Some(&SubRegion::All)),
            }
        }

        #[test]
        fn set_small_after_big_is_exact(index in 0usize..17, pick in 0usize..64) {
            let big = BigRegion::ALL[index];
            let subs = big.sub_regions();
            let name = subs[pick % subs.len()];
            let mut region = RegionFilter::default();
            region.set_big(Some(big));
            region.set_small(SubRegion::from(name));
            prop_assert_eq!(region.small(), Some(&SubRegion::Named(name.to_string())));
        }
    }
}
