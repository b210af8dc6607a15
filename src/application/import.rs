//! Legacy spreadsheet import
//!
//! Reads JSON exports of the old `users` and `inspections` worksheets (an
//! array of row objects, cells as strings) and loads them one row at a time.
//! A bad row is logged and skipped; it never aborts the import.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use super::inspections::InspectionService;
use crate::domain::{DomainResult, InspectionDraft, NewUser, RepositoryProvider};

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Load a worksheet export: a JSON array of row objects.
pub fn read_rows(path: &Path) -> Result<Vec<Value>, ImportError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ImportError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ImportError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[derive(Debug, Deserialize)]
struct LegacyUser {
    #[serde(default)]
    username: String,
    #[serde(default, alias = "hashed_password")]
    password_hash: String,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportReport {
    pub users_imported: usize,
    pub users_skipped: usize,
    pub inspections_imported: usize,
    pub inspections_failed: usize,
}

impl std::fmt::Display for ImportReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "users: {} imported, {} skipped; inspections: {} imported, {} failed",
            self.users_imported,
            self.users_skipped,
            self.inspections_imported,
            self.inspections_failed
        )
    }
}

pub struct LegacyImporter {
    repos: Arc<dyn RepositoryProvider>,
    inspections: InspectionService,
}

impl LegacyImporter {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self {
            inspections: InspectionService::new(repos.clone()),
            repos,
        }
    }

    /// Insert users whose username is not taken yet. Password hashes are
    /// copied verbatim.
    pub async fn import_users(&self, rows: &[Value], report: &mut ImportReport) {
        for (index, row) in rows.iter().enumerate() {
            let user = match LegacyUser::deserialize(row) {
                Ok(user) if !user.username.trim().is_empty() && !user.password_hash.is_empty() => user,
                Ok(_) => {
                    warn!(row = index + 1, "Skipping user row without username or password hash");
                    report.users_skipped += 1;
                    continue;
                }
                Err(e) => {
                    warn!(row = index + 1, error = %e, "Skipping malformed user row");
                    report.users_skipped += 1;
                    continue;
                }
            };

            match self.insert_user(user).await {
                Ok(true) => report.users_imported += 1,
                Ok(false) => report.users_skipped += 1,
                Err(e) => {
                    warn!(row = index + 1, error = %e, "Failed to import user row");
                    report.users_skipped += 1;
                }
            }
        }
    }

    /// `Ok(false)` when the username is already taken.
    async fn insert_user(&self, user: LegacyUser) -> DomainResult<bool> {
        let username = user.username.trim().to_string();
        if self.repos.users().find_by_username(&username).await?.is_some() {
            info!(username = %username, "User already exists, skipping");
            return Ok(false);
        }

        self.repos
            .users()
            .create(NewUser {
                username,
                password_hash: user.password_hash,
            })
            .await?;
        Ok(true)
    }

    /// Validate and insert inspection rows one by one.
    pub async fn import_inspections(&self, rows: &[Value], report: &mut ImportReport) {
        let total = rows.len();
        for (index, row) in rows.iter().enumerate() {
            let draft = match InspectionDraft::deserialize(row) {
                Ok(draft) => draft,
                Err(e) => {
                    warn!(row = index + 1, error = %e, "Skipping malformed inspection row");
                    report.inspections_failed += 1;
                    continue;
                }
            };

            match self.inspections.create(&draft).await {
                Ok(inspection) => {
                    report.inspections_imported += 1;
                    info!(row = index + 1, total, inspection_id = inspection.id, "Imported inspection");
                }
                Err(e) => {
                    report.inspections_failed += 1;
                    warn!(
                        row = index + 1,
                        function_location_id = %draft.function_location_id,
                        error = %e,
                        "Failed to import inspection"
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::{test_connection, SeaOrmRepositoryProvider};
    use serde_json::json;

    async fn importer() -> (LegacyImporter, Arc<dyn RepositoryProvider>) {
        let repos: Arc<dyn RepositoryProvider> =
            Arc::new(SeaOrmRepositoryProvider::new(test_connection().await));
        (LegacyImporter::new(repos.clone()), repos)
    }

    #[tokio::test]
    async fn test_users_are_inserted_once_with_hash_verbatim() {
        let (importer, repos) = importer().await;
        let rows = vec![
            json!({"username": "legacy", "password_hash": "$2b$12$abc"}),
            json!({"username": "legacy", "password_hash": "$2b$12$def"}),
            json!({"username": "", "password_hash": "$2b$12$ghi"}),
            json!(["not", "an", "object"]),
        ];

        let mut report = ImportReport::default();
        importer.import_users(&rows, &mut report).await;

        assert_eq!(report.users_imported, 1);
        assert_eq!(report.users_skipped, 3);
        let user = repos.users().find_by_username("legacy").await.unwrap().unwrap();
        assert_eq!(user.password_hash, "$2b$12$abc");
    }

    #[tokio::test]
    async fn test_user_row_database_errors_do_not_abort() {
        let db = test_connection().await;
        let importer = LegacyImporter::new(Arc::new(SeaOrmRepositoryProvider::new(db.clone())));
        db.close().await.unwrap();

        let rows = vec![
            json!({"username": "first", "password_hash": "$2b$12$abc"}),
            json!({"username": "second", "password_hash": "$2b$12$def"}),
        ];
        let mut report = ImportReport::default();
        importer.import_users(&rows, &mut report).await;

        assert_eq!(report.users_imported, 0);
        assert_eq!(report.users_skipped, 2);
    }

    #[tokio::test]
    async fn test_bad_inspection_rows_are_skipped() {
        let (importer, repos) = importer().await;
        let good = json!({
            "function_location_id": "FL-77",
            "building_name": "Old Gatehouse",
            "facility_type": "Security",
            "hvac_type": "Window, Split",
            "sprinkler": "No",
            "fire_alarm": "Yes",
            "power_source": "",
            "vcp_status": "Not Applicable",
            "eifs_installed_year": "",
            "hvac_condition": "2",
            "full_inspection_completed": "Yes"
        });
        let mut missing_name = good.clone();
        missing_name["building_name"] = json!("");
        let rows = vec![good, missing_name, json!({"zone": {"nested": true}})];

        let mut report = ImportReport::default();
        importer.import_inspections(&rows, &mut report).await;

        assert_eq!(report.inspections_imported, 1);
        assert_eq!(report.inspections_failed, 2);
        assert_eq!(repos.inspections().count().await.unwrap(), 1);
    }

    #[test]
    fn test_read_rows_reports_missing_file() {
        let err = read_rows(Path::new("/nonexistent/inspections.json")).unwrap_err();
        assert!(matches!(err, ImportError::Read { .. }));
    }
}
