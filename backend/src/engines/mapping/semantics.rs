//! Domain vocabulary used to boost tag/header pairs beyond plain spelling.
//!
//! Stems and words are matched against normalized text (see
//! [`similarity::normalize`](super::similarity::normalize)), so they carry no
//! spaces or underscores. Short keywords that hide inside unrelated words
//! ("filename", "update") are tokens instead, matched against the words of
//! the raw text. Vocabulary covers Catalan, Spanish and English.

use once_cell::sync::Lazy;
use regex::Regex;

use super::similarity::normalize;

/// Boost added once per synonym group shared by tag and header.
pub const SEMANTIC_BOOST: f64 = 0.6;
/// Boost added when the tag's example format hints at the header's type.
pub const CONTENT_BOOST: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SynonymGroup {
    PersonName,
    Address,
    FinancialAmount,
    Date,
    AdministrativeReference,
}

struct GroupVocabulary {
    group: SynonymGroup,
    /// Matched anywhere inside the normalized text.
    stems: &'static [&'static str],
    /// Matched only against the whole normalized text.
    words: &'static [&'static str],
    /// Matched against each lowercase word of the raw text.
    tokens: &'static [&'static str],
}

const GROUPS: &[GroupVocabulary] = &[
    GroupVocabulary {
        group: SynonymGroup::PersonName,
        stems: &[
            "nombre", "solicitant", "sol·licitant", "persona", "titular", "empresa",
            "company", "raosocial", "raósocial", "razonsocial", "beneficiari", "contact",
            "apellid", "cognom", "surname",
        ],
        words: &[],
        tokens: &["nom", "noms", "name", "names"],
    },
    GroupVocabulary {
        group: SynonymGroup::Address,
        stems: &[
            "adreca", "adreça", "direccio", "direcció", "direccion", "dirección", "address",
            "carrer", "calle", "street", "domicili", "poblacio", "població", "ciutat",
            "ciudad", "city", "municipi", "codipostal", "postal",
        ],
        words: &["cp", "zip"],
        tokens: &[],
    },
    GroupVocabulary {
        group: SynonymGroup::FinancialAmount,
        stems: &[
            "import", "amount", "pressupost", "presupuesto", "budget", "preu", "precio",
            "price", "total", "cost", "quantia", "cuantia", "cuantía", "euros", "subvenci",
            "pagament", "pago", "payment", "factura", "invoice", "saldo",
        ],
        words: &["eur"],
        tokens: &[],
    },
    GroupVocabulary {
        group: SynonymGroup::Date,
        stems: &[
            "data", "fecha", "termini", "plazo", "deadline", "venciment", "vencimiento",
        ],
        words: &["dia", "día", "day"],
        tokens: &["date", "dates"],
    },
    GroupVocabulary {
        group: SynonymGroup::AdministrativeReference,
        stems: &[
            "expedient", "referenc", "reference", "codi", "codigo", "código", "code",
            "numero", "número", "registre", "registro",
        ],
        words: &["id", "ref", "num", "nif", "dni", "cif", "nie"],
        tokens: &[],
    },
];

const PERCENT_KEYWORDS: &[&str] = &[
    "percent", "percentatge", "porcentaje", "%", "pct", "rate", "ratio", "interes", "interès",
];

const CURRENCY_SYMBOLS: [char; 4] = ['$', '€', '£', '¥'];

static DATE_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^\s*(?:\d{1,2}[/.\-]\d{1,2}[/.\-]\d{2,4}|\d{4}-\d{2}-\d{2}|\d{1,2}\s+(?:de\s+|d')?\p{L}+\s+(?:de\s+)?\d{4})\s*$",
    )
    .expect("date shape regex is valid")
});

/// Synonym groups the given tag name or header belongs to.
pub fn groups_of(text: &str) -> Vec<SynonymGroup> {
    let normalized = normalize(text);
    let lower = text.to_lowercase();
    let words: Vec<&str> = lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();
    GROUPS
        .iter()
        .filter(|g| {
            g.words.iter().any(|w| normalized == *w)
                || g.stems.iter().any(|s| normalized.contains(s))
                || g.tokens.iter().any(|t| words.contains(t))
        })
        .map(|g| g.group)
        .collect()
}

pub fn in_group(text: &str, group: SynonymGroup) -> bool {
    groups_of(text).contains(&group)
}

/// Sum of [`SEMANTIC_BOOST`] over every group both sides share.
pub fn semantic_boost(tag_name: &str, header: &str) -> f64 {
    let tag_groups = groups_of(tag_name);
    let header_groups = groups_of(header);
    tag_groups
        .iter()
        .filter(|g| header_groups.contains(g))
        .count() as f64
        * SEMANTIC_BOOST
}

pub fn looks_like_currency(example: &str) -> bool {
    example.chars().any(|c| CURRENCY_SYMBOLS.contains(&c))
        || example
            .split(|c: char| !c.is_alphabetic())
            .any(|w| w.eq_ignore_ascii_case("eur") || w.eq_ignore_ascii_case("euros"))
}

pub fn looks_like_date(example: &str) -> bool {
    DATE_SHAPE.is_match(example)
}

pub fn looks_like_percent(example: &str) -> bool {
    example.contains('%')
}

pub fn header_implies_percentage(header: &str) -> bool {
    let normalized = normalize(header);
    PERCENT_KEYWORDS.iter().any(|k| normalized.contains(k))
}

/// Boost earned when the example's format matches what the header suggests.
pub fn content_boost(example: &str, header: &str) -> f64 {
    let mut boost = 0.0;
    if looks_like_currency(example) && in_group(header, SynonymGroup::FinancialAmount) {
        boost += CONTENT_BOOST;
    }
    if looks_like_date(example) && in_group(header, SynonymGroup::Date) {
        boost += CONTENT_BOOST;
    }
    if looks_like_percent(example) && header_implies_percentage(header) {
        boost += CONTENT_BOOST;
    }
    boost
}
