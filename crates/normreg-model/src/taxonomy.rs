//! Static block taxonomy
//!
//! Seven top-level groups (`"1"`..`"7"`), each expanding to a fixed list of
//! dotted sub-codes. Stored `block` values refer to these codes verbatim, so
//! the table must not be reordered or reformatted.
//!
//! Both the access check and the accessible-block enumeration read from
//! [`BLOCK_TAXONOMY`]; nothing else defines block codes.

use crate::error::ModelError;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Version of the taxonomy table below
///
/// Bump when codes are added or removed.
pub const TAXONOMY_VERSION: u32 = 1;

/// One top-level block group and its sub-codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockGroup {
    /// Top-level code, `"1"`..`"7"`
    pub code: &'static str,
    /// Dotted sub-codes belonging to this group
    pub sub_codes: &'static [&'static str],
}

/// The block taxonomy
pub static BLOCK_TAXONOMY: [BlockGroup; 7] = [
    BlockGroup {
        code: "1",
        sub_codes: &["1.01", "1.02", "1.03", "1.04"],
    },
    BlockGroup {
        code: "2",
        sub_codes: &["2.01", "2.02", "2.03", "2.04", "2.05"],
    },
    BlockGroup {
        code: "3",
        sub_codes: &["3.01", "3.02", "3.03", "3.04", "3.05"],
    },
    BlockGroup {
        code: "4",
        sub_codes: &["4.01", "4.02", "4.03", "4.04"],
    },
    BlockGroup {
        code: "5",
        sub_codes: &[
            "5.01", "5.02", "5.03", "5.04", "5.05", "5.06", "5.07", "5.08", "5.09",
        ],
    },
    BlockGroup {
        code: "6",
        sub_codes: &[
            "6.01", "6.02", "6.03", "6.04", "6.05", "6.06", "6.07", "6.08", "6.09", "6.10",
            "6.11",
        ],
    },
    BlockGroup {
        code: "7",
        sub_codes: &["7.01", "7.02", "7.03"],
    },
];

/// Sub-code titles, as printed in exported plans
static BLOCK_NAMES: [(&str, &str); 41] = [
    ("1.01", "Техническое нормирование, стандартизация, сертификация и метрология"),
    ("1.02", "Предпроектные и проектные работы"),
    ("1.03", "Организация строительного производства"),
    ("1.04", "Эксплуатация"),
    ("2.01", "Основные положения надежности зданий и сооружений"),
    ("2.02", "Пожарная безопасность"),
    ("2.03", "Защита от опасных геофизических и техногенных воздействий"),
    ("2.04", "Внутренний климат и защита от вредных воздействий"),
    ("2.05", "Размерная взаимозаменяемость и совместимость"),
    ("3.01", "Градостроительство"),
    (
        "3.02",
        "Жилые, общественные и производственные здания и сооружения, благоустройство территорий",
    ),
    ("3.03", "Сооружения транспорта и транспортная инфраструктура"),
    ("3.04", "Гидротехнические и мелиоративные сооружения"),
    ("3.05", "Магистральные и промысловые трубопроводы"),
    ("4.01", "Водоснабжение и водоотведение"),
    (
        "4.02",
        "Теплоснабжение и холодоснабжение, отопление, вентиляция и кондиционирование воздуха",
    ),
    ("4.03", "Газоснабжение"),
    (
        "4.04",
        "Электроснабжение, электросиловое оборудование и электрическое освещение, телефонизация, радиофикация и телефикация",
    ),
    ("5.01", "Основания и фундаменты зданий и сооружений"),
    ("5.02", "Каменные и армокаменные конструкции"),
    ("5.03", "Железобетонные и бетонные конструкции и изделия"),
    ("5.04", "Металлические конструкции и изделия"),
    ("5.05", "Деревянные конструкции и изделия"),
    ("5.06", "Конструкции и изделия из других материалов"),
    (
        "5.07",
        "Светопрозрачные ограждения в различных конструктивных исполнениях, двери, ворота и приборы к ним",
    ),
    ("5.08", "Кровли, изоляционные покрытия"),
    ("5.09", "Полы, отделочные и защитные покрытия"),
    ("6.01", "Стеновые кладочные изделия"),
    ("6.02", "Минеральные вяжущие материалы"),
    ("6.03", "Бетоны и растворы"),
    ("6.04", "Щебень, гравий и песок для строительных работ"),
    (
        "6.05",
        "Теплоизоляционные, звукоизоляционные и звукопоглощающие материалы и изделия",
    ),
    (
        "6.06",
        "Кровельные, гидроизоляционные и герметизирующие материалы и изделия",
    ),
    ("6.07", "Отделочные и облицовочные материалы и изделия"),
    ("6.08", "Асбестоцементные изделия"),
    ("6.09", "Дорожные материалы"),
    ("6.10", "Строительное стекло"),
    ("6.11", "Композитные и полимерные материалы и изделия"),
    ("7.01", "Мобильные здания и сооружения"),
    ("7.02", "Специализированная оснастка предприятий стройиндустрии"),
    ("7.03", "Оснастка строительных организаций"),
];

static NAME_INDEX: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| BLOCK_NAMES.iter().copied().collect());

/// Top-level codes in taxonomy order
pub fn top_level_codes() -> impl Iterator<Item = &'static str> {
    BLOCK_TAXONOMY.iter().map(|g| g.code)
}

/// Group whose top-level code equals `rank`
#[must_use]
pub fn group(rank: &str) -> Option<&'static BlockGroup> {
    BLOCK_TAXONOMY.iter().find(|g| g.code == rank)
}

/// Sub-codes of the top-level code `rank`
///
/// Empty for anything that is not one of `"1"`..`"7"`.
#[must_use]
pub fn sub_codes(rank: &str) -> &'static [&'static str] {
    group(rank).map_or(&[], |g| g.sub_codes)
}

/// Every code in the taxonomy: top-level codes first, then all sub-codes
#[must_use]
pub fn all_codes() -> Vec<&'static str> {
    top_level_codes()
        .chain(BLOCK_TAXONOMY.iter().flat_map(|g| g.sub_codes.iter().copied()))
        .collect()
}

/// Whether `code` appears in the taxonomy
#[must_use]
pub fn is_known_block(code: &str) -> bool {
    group(code).is_some() || BLOCK_TAXONOMY.iter().any(|g| g.sub_codes.contains(&code))
}

/// Bare title of a sub-code, without the code prefix
#[must_use]
pub fn block_name(code: &str) -> Option<&'static str> {
    NAME_INDEX.get(code).copied()
}

/// Display title of a block
///
/// Known sub-codes render as `"<code> <title>"`, other non-empty codes as
/// `"Блок <code>"`, and an empty code as an empty string.
#[must_use]
pub fn block_title(code: &str) -> String {
    match block_name(code) {
        Some(name) => format!("{code} {name}"),
        None if code.is_empty() => String::new(),
        None => format!("Блок {code}"),
    }
}

/// Validate a user-supplied block rank
///
/// Accepts an integer between 1 and 7 (surrounding whitespace allowed) and
/// returns the matching top-level code.
///
/// # Errors
/// [`ModelError::InvalidBlockRank`] for anything else.
pub fn validate_rank(raw: &str) -> Result<&'static str, ModelError> {
    let invalid = || ModelError::InvalidBlockRank {
        value: raw.to_string(),
    };
    let n: u8 = raw.trim().parse().map_err(|_| invalid())?;
    BLOCK_TAXONOMY
        .iter()
        .map(|g| g.code)
        .find(|code| code.parse::<u8>().ok() == Some(n))
        .ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn taxonomy_has_seven_groups() {
        let tops: Vec<_> = top_level_codes().collect();
        assert_eq!(tops, vec!["1", "2", "3", "4", "5", "6", "7"]);
    }

    #[test]
    fn all_codes_matches_stored_enumeration() {
        let codes = all_codes();
        assert_eq!(codes.len(), 48);
        assert_eq!(&codes[..8], &["1", "2", "3", "4", "5", "6", "7", "1.01"]);
        assert_eq!(codes.last(), Some(&"7.03"));
    }

    #[test]
    fn every_sub_code_has_a_name() {
        for group in &BLOCK_TAXONOMY {
            for code in group.sub_codes {
                assert!(block_name(code).is_some(), "missing title for {code}");
                assert!(code.starts_with(&format!("{}.", group.code)));
            }
        }
        assert_eq!(NAME_INDEX.len(), BLOCK_NAMES.len());
    }

    #[test]
    fn sub_codes_outside_taxonomy_are_empty() {
        assert_eq!(sub_codes("3"), &["3.01", "3.02", "3.03", "3.04", "3.05"]);
        assert!(sub_codes("8").is_empty());
        assert!(sub_codes("").is_empty());
        assert!(sub_codes("3.01").is_empty());
    }

    #[test]
    fn known_block_lookup() {
        assert!(is_known_block("6"));
        assert!(is_known_block("6.10"));
        assert!(!is_known_block("6.12"));
        assert!(!is_known_block(""));
    }

    #[test]
    fn titles() {
        assert_eq!(block_title("6.10"), "6.10 Строительное стекло");
        assert_eq!(block_title("9.99"), "Блок 9.99");
        assert_eq!(block_title(""), "");
    }

    #[test]
    fn rank_validation() {
        assert_eq!(validate_rank("1"), Ok("1"));
        assert_eq!(validate_rank(" 7 "), Ok("7"));
        assert!(validate_rank("0").is_err());
        assert!(validate_rank("8").is_err());
        assert!(validate_rank("1.01").is_err());
        assert!(validate_rank("abc").is_err());
    }

    proptest! {
        #[test]
        fn known_blocks_are_exactly_the_listed_codes(code in "[0-9.]{0,5}") {
            prop_assert_eq!(is_known_block(&code), all_codes().contains(&code.as_str()));
        }

        #[test]
        fn rank_accepts_only_one_to_seven(n in any::<i64>()) {
            let rank = validate_rank(&n.to_string());
            prop_assert_eq!(rank.is_ok(), (1..=7).contains(&n));
            if let Ok(code) = rank {
                prop_assert_eq!(code, n.to_string());
            }
        }

        #[test]
        fn unknown_codes_get_generic_title(code in "[8-9][0-9.]{0,4}") {
            prop_assert_eq!(block_title(&code), format!("Блок {code}"));
        }
    }
}
