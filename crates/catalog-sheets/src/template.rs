//! Starter content for a new catalog sheet

use catalog_render::RawTable;

/// Default spreadsheet and worksheet name
pub const DEFAULT_SPREADSHEET: &str = "Catalogo";
pub const DEFAULT_WORKSHEET: &str = "Catalogo";

pub const TEMPLATE_HEADERS: [&str; 6] = [
    "categoria",
    "nombre",
    "descripcion",
    "precio",
    "stock",
    "imagen",
];

pub const DEMO_ROWS: [[&str; 6]; 4] = [
    [
        "Electrónica",
        "Televisor Samsung 40\"",
        "Smart TV 40 pulgadas",
        "250",
        "8",
        "https://drive.google.com/file/d/10VB9sF9j6FXvRRCFM4t7t7idBkz9KARc/view?usp=sharing",
    ],
    [
        "Electrónica",
        "Laptop HP 15\"",
        "15'' RAM 8GB",
        "500",
        "4",
        "https://drive.google.com/file/d/1bVgLB1ps02AYEzoPEQnsxB5lUfO9dJDY/view?usp=sharing",
    ],
    [
        "Hogar",
        "Silla ergonómica",
        "Con soporte lumbar",
        "80",
        "12",
        "https://drive.google.com/file/d/1vV9AD4S1zowIrW-rtTq-6Zb8xRj1zPqg/view?usp=sharing",
    ],
    [
        "Ropa",
        "Camiseta Polo",
        "Algodón premium",
        "30",
        "30",
        "https://drive.google.com/file/d/1-7LrG5cwqQ1bQhU3F2_t5GCKuVWkQUtw/view?usp=sharing",
    ],
];

/// Header row followed by the demo rows, as written to a sheet
pub fn template_values() -> Vec<Vec<String>> {
    std::iter::once(&TEMPLATE_HEADERS)
        .chain(DEMO_ROWS.iter())
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .collect()
}

/// The demo catalog as a raw table
pub fn template_table() -> RawTable {
    let mut table = RawTable::new(TEMPLATE_HEADERS.iter().map(|h| h.to_string()).collect());
    for row in DEMO_ROWS {
        table.push_values(row);
    }
    table
}
