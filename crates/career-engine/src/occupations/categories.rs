use super::domain::OccupationCode;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryAssignment {
    pub category: &'static str,
    pub subcategory: Option<&'static str>,
}

type Table = HashMap<&'static str, CategoryAssignment>;

static CODE_OVERRIDES: OnceLock<Table> = OnceLock::new();
static MAJOR_GROUPS: OnceLock<Table> = OnceLock::new();

/// Category for an occupation: per-SOC overrides first, then the SOC major group.
///
/// Returns `None` for major groups outside the table; callers keep whatever category the
/// record already had in that case.
pub fn assign(code: &OccupationCode) -> Option<CategoryAssignment> {
    code_overrides()
        .get(code.soc())
        .or_else(|| major_groups().get(code.major_group()))
        .copied()
}

const fn entry(category: &'static str, subcategory: Option<&'static str>) -> CategoryAssignment {
    CategoryAssignment {
        category,
        subcategory,
    }
}

fn code_overrides() -> &'static Table {
    CODE_OVERRIDES.get_or_init(|| {
        const OVERRIDES: &[(&str, CategoryAssignment)] = &[
            // Management roles that read as their industry rather than as management
            ("11-9111", entry("Healthcare", Some("Healthcare Management"))),
            ("11-9041", entry("Engineering", Some("Engineering Management"))),
            ("11-3021", entry("Technology", Some("Technology Management"))),
            ("11-9033", entry("Education", Some("Education Administration"))),
            ("11-9032", entry("Education", Some("Education Administration"))),
            // Design work filed under technology or arts
            ("15-1255", entry("Arts & Media", Some("Design"))),
            ("27-1024", entry("Arts & Media", Some("Design"))),
            ("27-1025", entry("Arts & Media", Some("Design"))),
            // Clinical support filed under office and education groups
            ("43-6013", entry("Healthcare", Some("Healthcare Support"))),
            ("25-1071", entry("Education", Some("Postsecondary Teaching"))),
            ("29-2042", entry("Public Safety", Some("Emergency Medical"))),
            ("29-2043", entry("Public Safety", Some("Emergency Medical"))),
            // Skilled trades
            ("47-2111", entry("Construction & Trades", Some("Electrical"))),
            ("47-2152", entry("Construction & Trades", Some("Plumbing"))),
            ("49-9021", entry("Construction & Trades", Some("HVAC"))),
            // Aviation
            ("49-3011", entry("Transportation", Some("Aviation"))),
            ("53-2011", entry("Transportation", Some("Aviation"))),
            ("53-2012", entry("Transportation", Some("Aviation"))),
            ("53-2021", entry("Transportation", Some("Aviation"))),
        ];

        OVERRIDES.iter().copied().collect()
    })
}

fn major_groups() -> &'static Table {
    MAJOR_GROUPS.get_or_init(|| {
        const GROUPS: &[(&str, CategoryAssignment)] = &[
            ("11", entry("Management", None)),
            ("13", entry("Business & Finance", None)),
            ("15", entry("Technology", None)),
            ("17", entry("Engineering", None)),
            ("19", entry("Science", None)),
            ("21", entry("Social Services", None)),
            ("23", entry("Legal", None)),
            ("25", entry("Education", None)),
            ("27", entry("Arts & Media", None)),
            ("29", entry("Healthcare", Some("Healthcare Practitioners"))),
            ("31", entry("Healthcare", Some("Healthcare Support"))),
            ("33", entry("Public Safety", None)),
            ("35", entry("Food Service", None)),
            ("37", entry("Building & Grounds", None)),
            ("39", entry("Personal Care", None)),
            ("41", entry("Sales", None)),
            ("43", entry("Office & Administrative", None)),
            ("45", entry("Agriculture", None)),
            ("47", entry("Construction & Trades", None)),
            ("49", entry("Installation & Repair", None)),
            ("51", entry("Manufacturing", None)),
            ("53", entry("Transportation", None)),
            ("55", entry("Military", None)),
        ];

        GROUPS.iter().copied().collect()
    })
}
