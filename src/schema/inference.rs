/// Naming-convention relationship inference
///
/// Used only when the catalog reports no formal foreign keys. Matching is
/// exact-string against the live table list: a missed relationship is
/// acceptable, a wrong navigation link is not.

use crate::schema::types::{ForeignKeyMap, ForeignKeyTarget, DEFAULT_PRIMARY_KEY};

const ID_SUFFIX: &str = "_id";

/// Candidate table names for a column base noun, in precedence order
///
/// Plural `s`, plural `es`, exact singular, then trailing `y` dropped plus `ies`.
pub fn candidate_tables(base: &str) -> [String; 4] {
    [
        format!("{}s", base),
        format!("{}es", base),
        base.to_string(),
        format!("{}ies", base.trim_end_matches('y')),
    ]
}

/// Infer `column -> {table, id}` for every `*_id` column whose base noun
/// names an existing table
pub fn infer_foreign_keys<C, T>(columns: &[C], live_tables: &[T]) -> ForeignKeyMap
where
    C: AsRef<str>,
    T: AsRef<str>,
{
    let mut foreign_keys = ForeignKeyMap::new();

    for column in columns.iter().map(AsRef::as_ref) {
        if column == DEFAULT_PRIMARY_KEY {
            continue;
        }
        let Some(base) = column.strip_suffix(ID_SUFFIX) else {
            continue;
        };

        let matched = candidate_tables(base)
            .into_iter()
            .find(|candidate| live_tables.iter().any(|t| t.as_ref() == candidate));

        if let Some(table) = matched {
            foreign_keys.insert(
                column.to_string(),
                ForeignKeyTarget::new(table, DEFAULT_PRIMARY_KEY),
            );
        }
    }

    foreign_keys
}
