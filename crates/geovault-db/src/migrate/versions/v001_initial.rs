//! Revision 001: users and the resources they own

use crate::migrate::schema::{ColumnType, ForeignKey, Index, SchemaOp, Table};
use crate::migrate::Migration;

pub(super) fn migration() -> Migration {
    Migration {
        revision: "001",
        down_revision: None,
        description: "initial migration",
        upgrade,
        downgrade,
    }
}

fn upgrade() -> Vec<SchemaOp> {
    vec![
        SchemaOp::CreateTable(
            Table::new("users")
                .column("id", ColumnType::Serial)
                .column("email", ColumnType::Varchar(255))
                .column("password_hash", ColumnType::Varchar(255))
                .column("created_at", ColumnType::Timestamp)
                .primary_key(&["id"]),
        ),
        SchemaOp::CreateIndex(Index::unique("ix_users_email", "users", &["email"])),
        SchemaOp::CreateIndex(Index::new("ix_users_id", "users", &["id"])),
        SchemaOp::CreateTable(
            Table::new("datasets")
                .column("id", ColumnType::Serial)
                .column("user_id", ColumnType::Integer)
                .column("filename", ColumnType::Varchar(512))
                .column("file_type", ColumnType::Varchar(32))
                .column("storage_path", ColumnType::Varchar(1024))
                .column("n_points", ColumnType::Integer)
                .column("bbox_json", ColumnType::Text)
                .column("created_at", ColumnType::Timestamp)
                .primary_key(&["id"])
                .foreign_key(ForeignKey::cascade("user_id", "users", "id")),
        ),
        SchemaOp::CreateIndex(Index::new("ix_datasets_id", "datasets", &["id"])),
        SchemaOp::CreateIndex(Index::new("ix_datasets_user_id", "datasets", &["user_id"])),
        SchemaOp::CreateTable(
            Table::new("analysis_runs")
                .column("id", ColumnType::Serial)
                .column("dataset_id", ColumnType::Integer)
                .column("user_id", ColumnType::Integer)
                .column("params_json", ColumnType::Text)
                .column("result_json", ColumnType::Text)
                .column("created_at", ColumnType::Timestamp)
                .primary_key(&["id"])
                .foreign_key(ForeignKey::cascade("dataset_id", "datasets", "id"))
                .foreign_key(ForeignKey::cascade("user_id", "users", "id")),
        ),
        SchemaOp::CreateIndex(Index::new(
            "ix_analysis_runs_dataset_id",
            "analysis_runs",
            &["dataset_id"],
        )),
        SchemaOp::CreateIndex(Index::new("ix_analysis_runs_id", "analysis_runs", &["id"])),
        SchemaOp::CreateIndex(Index::new(
            "ix_analysis_runs_user_id",
            "analysis_runs",
            &["user_id"],
        )),
        SchemaOp::CreateTable(
            Table::new("places")
                .column("id", ColumnType::Varchar(36))
                .column("user_id", ColumnType::Integer)
                .nullable_column("name", ColumnType::Varchar(255))
                .nullable_column("category", ColumnType::Varchar(100))
                .column("lat", ColumnType::Double)
                .column("lon", ColumnType::Double)
                .nullable_column("notes", ColumnType::Text)
                .nullable_column("tags", ColumnType::Json)
                .column("created_at", ColumnType::Timestamp)
                .primary_key(&["id"])
                .foreign_key(ForeignKey::cascade("user_id", "users", "id")),
        ),
        SchemaOp::CreateIndex(Index::new("ix_places_id", "places", &["id"])),
        SchemaOp::CreateIndex(Index::new("ix_places_user_id", "places", &["user_id"])),
    ]
}

// Indices go before the tables carrying them, and places / analysis_runs
// before the datasets / users they reference.
fn downgrade() -> Vec<SchemaOp> {
    vec![
        SchemaOp::DropIndex { name: "ix_places_user_id", table: "places" },
        SchemaOp::DropIndex { name: "ix_places_id", table: "places" },
        SchemaOp::DropTable("places"),
        SchemaOp::DropIndex { name: "ix_analysis_runs_user_id", table: "analysis_runs" },
        SchemaOp::DropIndex { name: "ix_analysis_runs_id", table: "analysis_runs" },
        SchemaOp::DropIndex { name: "ix_analysis_runs_dataset_id", table: "analysis_runs" },
        SchemaOp::DropTable("analysis_runs"),
        SchemaOp::DropIndex { name: "ix_datasets_user_id", table: "datasets" },
        SchemaOp::DropIndex { name: "ix_datasets_id", table: "datasets" },
        SchemaOp::DropTable("datasets"),
        SchemaOp::DropIndex { name: "ix_users_id", table: "users" },
        SchemaOp::DropIndex { name: "ix_users_email", table: "users" },
        SchemaOp::DropTable("users"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_downgrade_is_exact_inverse_of_upgrade() {
        let inverted: Vec<SchemaOp> = upgrade().iter().rev().filter_map(SchemaOp::inverse).collect();
        assert_eq!(inverted, downgrade());
    }

    #[test]
    fn test_every_foreign_key_is_indexed() {
        let ops = upgrade();
        let indexed: Vec<(&str, &str)> = ops
            .iter()
            .filter_map(|op| match op {
                SchemaOp::CreateIndex(ix) if ix.columns.len() == 1 => Some((ix.table, ix.columns[0])),
                _ => None,
            })
            .collect();

        for op in &ops {
            if let SchemaOp::CreateTable(table) = op {
                for fk in &table.foreign_keys {
                    assert!(indexed.contains(&(table.name, fk.column)), "{}.{} not indexed", table.name, fk.column);
                }
            }
        }
    }

    #[test]
    fn test_only_email_index_is_unique() {
        let unique: Vec<&str> = upgrade()
            .iter()
            .filter_map(|op| match op {
                SchemaOp::CreateIndex(ix) if ix.unique => Some(ix.name),
                _ => None,
            })
            .collect();
        assert_eq!(unique, ["ix_users_email"]);
    }
}
