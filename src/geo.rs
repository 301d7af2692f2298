//! Static geography lookup tables: country-name aliases and the
//! country-to-continent mapping
//!
//! Both tables are immutable and built once at first use. Alias
//! substitution is exact-match on the already-uppercased name, so
//! applying it twice is a no-op.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Variant country spellings seen in the export, collapsed to one
/// canonical uppercase form.
static COUNTRY_ALIASES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("UNITED STATES OF AMERICA", "UNITED STATES"),
        (
            "UNITED KINGDOM OF GREAT BRITAIN AND NORTHERN IRELAND",
            "UNITED KINGDOM",
        ),
        ("RUSSIA FEDERATION", "RUSSIA"),
        ("KOREA (REPUBLIC OF)", "SOUTH KOREA"),
        ("VIET NAM", "VIETNAM"),
        ("BOLIVIA (PLURINATIONAL STATE OF)", "BOLIVIA"),
        ("TAIWAN, PROVINCE OF CHINA", "TAIWAN"),
        ("TÜRKIYE", "TURKEY"),
        ("MACEDONIA (FYROM)", "MACEDONIA"),
        ("CÔTE D'IVOIRE", "IVORY COAST"),
        ("RÉUNION", "REUNION"),
        ("CONGO (DEMOCRATIC REPUBLIC OF THE)", "CONGO"),
        ("LAO PEOPLE'S DEMOCRATIC REPUBLIC", "LAOS"),
        ("VENEZUELA (BOLIVARIAN REPUBLIC OF)", "VENEZUELA"),
    ])
});

/// Country lists per continent. Transcontinental countries keep their
/// last listed continent when the reverse map is built.
static CONTINENT_COUNTRIES: &[(&str, &[&str])] = &[
    (
        "AFRICA",
        &[
            "ALGERIA",
            "ANGOLA",
            "BENIN",
            "BOTSWANA",
            "BURKINA FASO",
            "BURUNDI",
            "CABO VERDE",
            "CAMEROON",
            "CENTRAL AFRICAN REPUBLIC",
            "CHAD",
            "COMOROS",
            "CONGO",
            "CONGO, DEMOCRATIC REPUBLIC OF THE",
            "DJIBOUTI",
            "EGYPT",
            "EQUATORIAL GUINEA",
            "ERITREA",
            "ESWATINI",
            "ETHIOPIA",
            "GABON",
            "GAMBIA",
            "GHANA",
            "GUINEA",
            "GUINEA-BISSAU",
            "IVORY COAST",
            "KENYA",
            "LESOTHO",
            "LIBERIA",
            "LIBYA",
            "MADAGASCAR",
            "MALAWI",
            "MALI",
            "MAURITANIA",
            "MAURITIUS",
            "MOROCCO",
            "MOZAMBIQUE",
            "NAMIBIA",
            "NIGER",
            "NIGERIA",
            "RWANDA",
            "SENEGAL",
            "SEYCHELLES",
            "SIERRA LEONE",
            "SOMALIA",
            "SOUTH AFRICA",
            "SOUTH SUDAN",
            "SUDAN",
            "TANZANIA",
            "TOGO",
            "TUNISIA",
            "UGANDA",
            "ZAMBIA",
            "ZIMBABWE",
        ],
    ),
    (
        "ASIA",
        &[
            "AFGHANISTAN",
            "ARMENIA",
            "AZERBAIJAN",
            "BAHRAIN",
            "BANGLADESH",
            "BHUTAN",
            "BRUNEI",
            "CAMBODIA",
            "CHINA",
            "CYPRUS",
            "GEORGIA",
            "INDIA",
            "INDONESIA",
            "IRAN",
            "IRAQ",
            "ISRAEL",
            "JAPAN",
            "JORDAN",
            "KAZAKHSTAN",
            "KUWAIT",
            "KYRGYZSTAN",
            "LAOS",
            "LEBANON",
            "MALAYSIA",
            "MALDIVES",
            "MONGOLIA",
            "MYANMAR",
            "NEPAL",
            "NORTH KOREA",
            "OMAN",
            "PAKISTAN",
            "PALESTINE",
            "PHILIPPINES",
            "QATAR",
            "SAUDI ARABIA",
            "SINGAPORE",
            "SOUTH KOREA",
            "SRI LANKA",
            "SYRIA",
            "TAIWAN",
            "TAJIKISTAN",
            "THAILAND",
            "TIMOR-LESTE",
            "TURKEY",
            "TURKMENISTAN",
            "UNITED ARAB EMIRATES",
            "UZBEKISTAN",
            "VIETNAM",
            "YEMEN",
        ],
    ),
    (
        "EUROPE",
        &[
            "ALBANIA",
            "ANDORRA",
            "ARMENIA",
            "AUSTRIA",
            "AZERBAIJAN",
            "BELARUS",
            "BELGIUM",
            "BOSNIA AND HERZEGOVINA",
            "BULGARIA",
            "CROATIA",
            "CYPRUS",
            "CZECHIA",
            "DENMARK",
            "ESTONIA",
            "FINLAND",
            "FRANCE",
            "GEORGIA",
            "GERMANY",
            "GREECE",
            "HUNGARY",
            "ICELAND",
            "IRELAND",
            "ITALY",
            "KAZAKHSTAN",
            "KOSOVO",
            "LATVIA",
            "LIECHTENSTEIN",
            "LITHUANIA",
            "LUXEMBOURG",
            "MALTA",
            "MOLDOVA",
            "MONACO",
            "MONTENEGRO",
            "NETHERLANDS",
            "NORTH MACEDONIA",
            "NORWAY",
            "POLAND",
            "PORTUGAL",
            "ROMANIA",
            "RUSSIA",
            "SAN MARINO",
            "SERBIA",
            "SLOVAKIA",
            "SLOVENIA",
            "SPAIN",
            "SWEDEN",
            "SWITZERLAND",
            "UKRAINE",
            "UNITED KINGDOM",
        ],
    ),
    (
        "NORTH AMERICA",
        &[
            "ANTIGUA AND BARBUDA",
            "BAHAMAS",
            "BARBADOS",
            "BELIZE",
            "CANADA",
            "COSTA RICA",
            "CUBA",
            "DOMINICA",
            "DOMINICAN REPUBLIC",
            "EL SALVADOR",
            "GRENADA",
            "GUATEMALA",
            "HAITI",
            "HONDURAS",
            "JAMAICA",
            "MEXICO",
            "NICARAGUA",
            "PANAMA",
            "SAINT KITTS AND NEVIS",
            "SAINT LUCIA",
            "SAINT VINCENT AND THE GRENADINES",
            "TRINIDAD AND TOBAGO",
            "UNITED STATES",
        ],
    ),
    (
        "SOUTH AMERICA",
        &[
            "ARGENTINA",
            "BOLIVIA",
            "BRAZIL",
            "CHILE",
            "COLOMBIA",
            "ECUADOR",
            "GUYANA",
            "PARAGUAY",
            "PERU",
            "SURINAME",
            "URUGUAY",
            "VENEZUELA",
        ],
    ),
    (
        "OCEANIA",
        &[
            "AUSTRALIA",
            "FIJI",
            "KIRIBATI",
            "MARSHALL ISLANDS",
            "MICRONESIA",
            "NAURU",
            "NEW ZEALAND",
            "PALAU",
            "PAPUA NEW GUINEA",
            "SAMOA",
            "SOLOMON ISLANDS",
            "TONGA",
            "TUVALU",
            "VANUATU",
        ],
    ),
];

/// Reverse country-to-continent index built from the per-continent lists.
static CONTINENT_OF: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut map = HashMap::new();
    for (continent, countries) in CONTINENT_COUNTRIES {
        for country in countries.iter() {
            map.insert(*country, *continent);
        }
    }
    map
});

/// Uppercase a raw country value and collapse known spelling variants
/// to their canonical form.
pub fn normalize_country(raw: &str) -> String {
    let upper = raw.trim().to_uppercase();
    match COUNTRY_ALIASES.get(upper.as_str()) {
        Some(canonical) => (*canonical).to_string(),
        None => upper,
    }
}

/// Continent for a normalized country name. `None` for countries outside
/// the lookup, including the defaulted "UNKNOWN".
pub fn continent_of(country: &str) -> Option<&'static str> {
    CONTINENT_OF.get(country).copied()
}
