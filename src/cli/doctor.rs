use crate::services::database::{current_migration_version, list_indexes, run_integrity_check};
use crate::Config;
use crate::Database;
use anyhow::Result;
use std::path::Path;
use std::time::Duration;

#[derive(Debug)]
enum CheckStatus {
    Ok,
    Warn,
    Fail,
}

impl std::fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckStatus::Ok => write!(f, "\x1b[32m✓ OK\x1b[0m"),
            CheckStatus::Warn => write!(f, "\x1b[33m⚠ WARN\x1b[0m"),
            CheckStatus::Fail => write!(f, "\x1b[31m✗ FAIL\x1b[0m"),
        }
    }
}

struct CheckResult {
    name: String,
    status: CheckStatus,
    detail: String,
}

pub async fn run(config_path: &Path) -> Result<()> {
    println!("\n  Taxa Doctor — System Health Check\n");

    let mut results: Vec<CheckResult> = Vec::new();
    let mut has_failure = false;

    // 1. Config validity
    let config = match Config::load(config_path) {
        Ok(c) => {
            match c.validate() {
                Ok(()) => {
                    results.push(CheckResult {
                        name: "Configuration".into(),
                        status: CheckStatus::Ok,
                        detail: format!("Loaded from {}", config_path.display()),
                    });
                }
                Err(e) => {
                    results.push(CheckResult {
                        name: "Configuration".into(),
                        status: CheckStatus::Fail,
                        detail: format!("Validation error: {}", e),
                    });
                    has_failure = true;
                }
            }
            Some(c)
        }
        Err(e) => {
            results.push(CheckResult {
                name: "Configuration".into(),
                status: CheckStatus::Fail,
                detail: format!("Failed to load: {}", e),
            });
            has_failure = true;
            None
        }
    };

    // If config failed, we can't proceed with the remaining checks
    let config = match config {
        Some(c) => c,
        None => {
            finish(&results, has_failure);
            return Ok(());
        }
    };

    // 2. Database connectivity
    let db = match Database::open(&config.database.path, config.database.pool_size) {
        Ok(db) => {
            match db.health_check() {
                Ok(true) => {
                    results.push(CheckResult {
                        name: "Database connectivity".into(),
                        status: CheckStatus::Ok,
                        detail: format!("Connected to {}", config.database.path),
                    });
                }
                _ => {
                    results.push(CheckResult {
                        name: "Database connectivity".into(),
                        status: CheckStatus::Fail,
                        detail: "Health check returned unexpected result".into(),
                    });
                    has_failure = true;
                }
            }
            Some(db)
        }
        Err(e) => {
            results.push(CheckResult {
                name: "Database connectivity".into(),
                status: CheckStatus::Fail,
                detail: format!("Cannot open: {}", e),
            });
            has_failure = true;
            None
        }
    };

    let db = match db {
        Some(d) => d,
        None => {
            finish(&results, has_failure);
            return Ok(());
        }
    };

    // 3. Database integrity
    match run_integrity_check(&db) {
        Ok(ref msgs) if msgs.len() == 1 && msgs[0] == "ok" => {
            results.push(CheckResult {
                name: "Database integrity".into(),
                status: CheckStatus::Ok,
                detail: "PRAGMA integrity_check passed".into(),
            });
        }
        Ok(msgs) => {
            results.push(CheckResult {
                name: "Database integrity".into(),
                status: CheckStatus::Fail,
                detail: format!("Issues found: {}", msgs.join("; ")),
            });
            has_failure = true;
        }
        Err(e) => {
            results.push(CheckResult {
                name: "Database integrity".into(),
                status: CheckStatus::Fail,
                detail: format!("Check failed: {}", e),
            });
            has_failure = true;
        }
    }

    // 4. Migration status
    {
        let current_version = current_migration_version(&db).unwrap_or(0);
        let latest_version = crate::db::LATEST_MIGRATION;
        if current_version >= latest_version {
            results.push(CheckResult {
                name: "Migration status".into(),
                status: CheckStatus::Ok,
                detail: format!("All {} migration(s) applied", latest_version),
            });
        } else if current_version == 0 {
            results.push(CheckResult {
                name: "Migration status".into(),
                status: CheckStatus::Warn,
                detail: "No migrations applied. Run `taxa migrate`".into(),
            });
        } else {
            results.push(CheckResult {
                name: "Migration status".into(),
                status: CheckStatus::Warn,
                detail: format!(
                    "At version {}/{}. Run `taxa migrate` to apply pending migrations",
                    current_version, latest_version
                ),
            });
        }
    }

    // 5. Uniqueness constraints. The CRUD layer depends on these indexes
    // for conflict detection, so a missing one is a hard failure.
    match list_indexes(&db) {
        Ok(indexes) => {
            let required = [
                "idx_categories_name",
                "idx_categories_slug",
                "idx_tags_name",
                "idx_tags_slug",
            ];
            let missing: Vec<&str> = required
                .iter()
                .filter(|name| !indexes.iter().any(|i| i.name == **name && i.is_unique))
                .copied()
                .collect();
            if missing.is_empty() {
                results.push(CheckResult {
                    name: "Unique indexes".into(),
                    status: CheckStatus::Ok,
                    detail: "name/slug uniqueness enforced for both kinds".into(),
                });
            } else {
                results.push(CheckResult {
                    name: "Unique indexes".into(),
                    status: CheckStatus::Fail,
                    detail: format!("Missing or non-unique: {}", missing.join(", ")),
                });
                has_failure = true;
            }
        }
        Err(e) => {
            results.push(CheckResult {
                name: "Unique indexes".into(),
                status: CheckStatus::Fail,
                detail: format!("Could not inspect indexes: {}", e),
            });
            has_failure = true;
        }
    }

    // 6. Media directory
    let media_dir = Path::new(&config.media.upload_dir);
    if media_dir.is_dir() {
        let test_path = media_dir.join(".taxa_doctor_test");
        match std::fs::write(&test_path, b"test") {
            Ok(()) => {
                let _ = std::fs::remove_file(&test_path);
                results.push(CheckResult {
                    name: "Media directory".into(),
                    status: CheckStatus::Ok,
                    detail: format!("{} (writable)", config.media.upload_dir),
                });
            }
            Err(_) => {
                results.push(CheckResult {
                    name: "Media directory".into(),
                    status: CheckStatus::Warn,
                    detail: format!("{} exists but is not writable", config.media.upload_dir),
                });
            }
        }
    } else {
        results.push(CheckResult {
            name: "Media directory".into(),
            status: CheckStatus::Warn,
            detail: format!("{} does not exist", config.media.upload_dir),
        });
    }

    // 7. Media reachability through the running server
    probe_media(&config, media_dir, &mut results, &mut has_failure).await;

    finish(&results, has_failure);
    Ok(())
}

/// Probes the running server: first /healthz, then every file in the
/// media directory through GET /media/{filename}. An unreachable server
/// is a warning (it may simply not be running); an unreachable file on a
/// reachable server is a failure.
async fn probe_media(
    config: &Config,
    media_dir: &Path,
    results: &mut Vec<CheckResult>,
    has_failure: &mut bool,
) {
    let client = match reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
    {
        Ok(c) => c,
        Err(e) => {
            results.push(CheckResult {
                name: "Server reachability".into(),
                status: CheckStatus::Warn,
                detail: format!("Could not build HTTP client: {}", e),
            });
            return;
        }
    };

    let base = config.base_url();
    let base_url = match reqwest::Url::parse(base) {
        Ok(u) => u,
        Err(e) => {
            results.push(CheckResult {
                name: "Server reachability".into(),
                status: CheckStatus::Warn,
                detail: format!("site.url is not a valid URL ({})", e),
            });
            return;
        }
    };

    match client.get(format!("{}/healthz", base)).send().await {
        Ok(res) if res.status().is_success() => {
            results.push(CheckResult {
                name: "Server reachability".into(),
                status: CheckStatus::Ok,
                detail: format!("{}/healthz responded {}", base, res.status()),
            });
        }
        Ok(res) => {
            results.push(CheckResult {
                name: "Server reachability".into(),
                status: CheckStatus::Warn,
                detail: format!(
                    "{}/healthz responded {}. Skipping media probe",
                    base,
                    res.status()
                ),
            });
            return;
        }
        Err(e) => {
            results.push(CheckResult {
                name: "Server reachability".into(),
                status: CheckStatus::Warn,
                detail: format!("Server not reachable ({}). Skipping media probe", e),
            });
            return;
        }
    }

    let entries = match std::fs::read_dir(media_dir) {
        Ok(entries) => entries,
        Err(_) => {
            results.push(CheckResult {
                name: "Media reachability".into(),
                status: CheckStatus::Warn,
                detail: "Media directory not readable. Nothing to probe".into(),
            });
            return;
        }
    };

    let mut probed = 0usize;
    let mut unreachable = Vec::new();
    for entry in entries.flatten() {
        if !entry.path().is_file() {
            continue;
        }
        let filename = entry.file_name().to_string_lossy().to_string();
        probed += 1;
        // Push as a path segment so spaces and non-ascii names are
        // percent-encoded the way the server expects them
        let mut url = base_url.clone();
        if url
            .path_segments_mut()
            .map(|mut segments| {
                segments.pop_if_empty().push("media").push(&filename);
            })
            .is_err()
        {
            unreachable.push(format!("{} (cannot build URL)", filename));
            continue;
        }
        match client.get(url).send().await {
            Ok(res) if res.status().is_success() => {}
            Ok(res) => unreachable.push(format!("{} ({})", filename, res.status())),
            Err(e) => unreachable.push(format!("{} ({})", filename, e)),
        }
    }

    if probed == 0 {
        results.push(CheckResult {
            name: "Media reachability".into(),
            status: CheckStatus::Ok,
            detail: "No media files to probe".into(),
        });
    } else if unreachable.is_empty() {
        results.push(CheckResult {
            name: "Media reachability".into(),
            status: CheckStatus::Ok,
            detail: format!("All {} media file(s) reachable", probed),
        });
    } else {
        results.push(CheckResult {
            name: "Media reachability".into(),
            status: CheckStatus::Fail,
            detail: format!(
                "{}/{} file(s) unreachable: {}",
                unreachable.len(),
                probed,
                unreachable.join(", ")
            ),
        });
        *has_failure = true;
    }
}

fn finish(results: &[CheckResult], has_failure: bool) {
    print_results(results);
    if has_failure {
        println!("\n  \x1b[31mSome checks failed. Fix the issues above before deploying.\x1b[0m\n");
    } else {
        println!("\n  \x1b[32mAll checks passed.\x1b[0m\n");
    }
}

fn print_results(results: &[CheckResult]) {
    let max_name_len = results.iter().map(|r| r.name.len()).max().unwrap_or(20);

    for (i, result) in results.iter().enumerate() {
        println!(
            "  {:>2}. {:<width$}  {}  {}",
            i + 1,
            result.name,
            result.status,
            result.detail,
            width = max_name_len,
        );
    }
}
