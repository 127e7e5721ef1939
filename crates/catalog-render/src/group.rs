use crate::types::*;

/// Partition records by category, in order of first appearance.
///
/// Records keep their relative input order within each group. When the
/// source schema has no category column, every record lands in a single
/// [`ALL_ITEMS`] group.
pub fn group_by_category(table: &ProductTable) -> Vec<CategoryGroup> {
    if !table.has_category {
        if table.records.is_empty() {
            return Vec::new();
        }
        return vec![CategoryGroup {
            category: ALL_ITEMS.to_string(),
            records: table.records.clone(),
        }];
    }

    let mut groups: Vec<CategoryGroup> = Vec::new();
    for record in &table.records {
        match groups.iter_mut().find(|g| g.category == record.category) {
            Some(group) => group.records.push(record.clone()),
            None => groups.push(CategoryGroup {
                category: record.category.clone(),
                records: vec![record.clone()],
            }),
        }
    }
    groups
}
