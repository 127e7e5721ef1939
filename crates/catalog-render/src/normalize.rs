//! Row normalization
//!
//! Maps loosely-keyed source rows onto [`ProductRecord`]s through an explicit
//! field resolution table.

use crate::types::*;

/// Canonical product fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Category,
    Name,
    Description,
    Price,
    Stock,
    Image,
}

impl Field {
    /// Candidate source keys, tried in order
    pub fn candidates(self) -> &'static [&'static str] {
        match self {
            Field::Category => &["categoria", "Categoria", "categoría", "Categoría"],
            Field::Name => &["nombre", "Nombre"],
            Field::Description => &["descripcion", "Descripcion", "descripción", "Descripción"],
            Field::Price => &["precio", "Precio"],
            Field::Stock => &["stock", "Stock"],
            Field::Image => &["imagen", "Imagen"],
        }
    }

    /// First value found among the candidate keys, else the empty string
    pub fn resolve(self, row: &RawRow) -> String {
        self.candidates()
            .iter()
            .find_map(|key| row.get(*key))
            .cloned()
            .unwrap_or_default()
    }

    /// Whether any candidate key appears among the headers
    pub fn present_in(self, headers: &[String]) -> bool {
        headers
            .iter()
            .any(|header| self.candidates().contains(&header.as_str()))
    }
}

/// Normalize a single row. Never fails: only the category gets a default.
pub fn normalize_row(row: &RawRow) -> ProductRecord {
    let category = Field::Category.resolve(row);
    let category = if category.trim().is_empty() {
        UNCATEGORIZED.to_string()
    } else {
        category
    };

    ProductRecord {
        category,
        name: Field::Name.resolve(row),
        description: Field::Description.resolve(row),
        price: Field::Price.resolve(row),
        stock: Field::Stock.resolve(row),
        image_reference: Field::Image.resolve(row),
    }
}

/// Normalize every row of a table, keeping input order
pub fn normalize_table(table: &RawTable) -> ProductTable {
    let has_category = Field::Category.present_in(&table.headers)
        || table
            .rows
            .iter()
            .any(|row| Field::Category.candidates().iter().any(|k| row.contains_key(*k)));

    ProductTable {
        records: table.rows.iter().map(normalize_row).collect(),
        has_category,
    }
}
