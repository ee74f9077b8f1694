use crate::models::Import;
use chrono::{DateTime, Utc};

const COLUMNS: [&str; 7] = [
    "id",
    "name",
    "type",
    "status",
    "progress",
    "created_at",
    "updated_at",
];

/// Serialize records to CSV text.
///
/// Every field is wrapped in double quotes with inner quotes doubled,
/// whether or not the value needs it; commas, quotes and newlines inside
/// values survive unchanged.
pub fn build_csv(imports: &[Import]) -> String {
    let mut lines = Vec::with_capacity(imports.len() + 1);
    lines.push(csv_row(COLUMNS.iter().map(|c| c.to_string())));

    for import in imports {
        lines.push(csv_row(
            [
                import.id.clone(),
                import.name.clone(),
                import.import_type.to_string(),
                import.status.to_string(),
                import.progress_display().to_string(),
                import.created_at.to_rfc3339(),
                import.updated_at.to_rfc3339(),
            ]
            .into_iter(),
        ));
    }

    lines.join("\n")
}

/// File name for an export generated at the given instant
pub fn export_file_name(generated_at: DateTime<Utc>) -> String {
    format!("imports-{}.csv", generated_at.format("%Y-%m-%d"))
}

fn csv_row(fields: impl Iterator<Item = String>) -> String {
    fields
        .map(|field| csv_field(&field))
        .collect::<Vec<_>>()
        .join(",")
}

fn csv_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}
