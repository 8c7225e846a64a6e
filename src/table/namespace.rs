// src/table/namespace.rs

use crate::constants::{DERIVED_PREFIX, FIELD_PREFIX, NAMESPACE_SEPARATOR};
use crate::table::builder::{flatten_field_name, table_name};
use crate::table::topic_table::{NamespacedTable, TopicTable};

/// `T_vehicle_status_0`, `F_nav_state` -> `T_vehicle_status_0__F_nav_state`
pub fn namespaced_column_name(table: &str, column: &str) -> String {
    format!("{table}{NAMESPACE_SEPARATOR}{column}")
}

/// Splits a namespaced column into `(table, column)`.
pub fn strip_namespace(column: &str) -> Option<(&str, &str)> {
    column.split_once(NAMESPACE_SEPARATOR)
}

/// Full column name of a logged field in the unified table.
pub fn field_column(topic: &str, instance: u32, field: &str) -> String {
    namespaced_column_name(
        &table_name(topic, instance),
        &format!("{FIELD_PREFIX}{}", flatten_field_name(field)),
    )
}

/// Full column name of a derived quantity attached to a topic.
pub fn derived_column(topic: &str, instance: u32, name: &str) -> String {
    namespaced_column_name(&table_name(topic, instance), &format!("{DERIVED_PREFIX}{name}"))
}

/// Prefixes every column of `table` with the table name.
///
/// Takes the table by value and hands back a new one, so no other reference
/// can still read the old column names.
pub fn namespace_table(mut table: TopicTable) -> NamespacedTable {
    for column in table.columns.iter_mut() {
        column.name = namespaced_column_name(&table.name, &column.name);
    }
    NamespacedTable { table }
}

pub fn namespace(tables: Vec<TopicTable>) -> Vec<NamespacedTable> {
    tables.into_iter().map(namespace_table).collect()
}


// src/table/namespace.rs
