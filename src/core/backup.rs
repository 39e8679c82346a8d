use crate::config::Config;
use crate::db::Store;
use crate::errors::{AppError, AppResult};
use crate::export::fs_utils::{ensure_writable, write_bytes};
use crate::export::model::{Cell, Table, responses_to_table};
use crate::export::xlsx::render_workbook;
use crate::ui::messages::{info, success, warning};
use crate::utils::date::today;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info as trace_info, warn};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

const SNAPSHOT_PREFIX: &str = "almoco_backup_";

pub struct BackupLogic;

impl BackupLogic {
    /// Copy the SQLite database to `dest`, optionally zipped.
    /// Returns the path of the final backup file.
    pub fn backup(
        store: &dyn Store,
        cfg: &Config,
        dest: &Path,
        compress: bool,
        force: bool,
    ) -> AppResult<PathBuf> {
        if cfg.uses_postgres() {
            return Err(AppError::Config(
                "file backups are only available for the SQLite backend".into(),
            ));
        }

        let src = cfg.database_file();

        // 1️⃣ Check DB exists
        if !src.exists() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Database not found: {}", src.display()),
            )
            .into());
        }

        // 2️⃣ Ensure destination folder exists and may be overwritten
        if let Some(parent) = dest.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        ensure_writable(dest, force)?;

        // 3️⃣ Copy database
        fs::copy(&src, dest)?;
        success(format!("Backup created: {}", dest.display()));

        // 4️⃣ Optional compression
        let final_path = if compress {
            let compressed = compress_backup(dest)?;

            if compressed != dest {
                match fs::remove_file(dest) {
                    Ok(()) => info(format!("Removed uncompressed backup: {}", dest.display())),
                    Err(e) => warning(format!("Failed to remove uncompressed backup: {e}")),
                }
            }

            compressed
        } else {
            dest.to_path_buf()
        };

        // 5️⃣ Log in DB
        store.log(
            "backup",
            &final_path.to_string_lossy(),
            if compress {
                "Backup created and compressed"
            } else {
                "Backup created"
            },
        )?;

        Ok(final_path)
    }

    /// Write `<data_dir>/backups/almoco_backup_<today>.xlsx` with the
    /// `respostas` and `alunos` sheets, then prune old snapshots.
    pub fn snapshot_xlsx(store: &dyn Store, cfg: &Config) -> AppResult<PathBuf> {
        let dir = cfg.backup_dir();
        let path = dir.join(format!(
            "{SNAPSHOT_PREFIX}{}.xlsx",
            today().format("%Y-%m-%d")
        ));

        let responses = store.all_responses()?;
        let students = store.all_students()?;

        let mut alunos = Table::new("alunos", &["matricula", "nome", "turma", "atualizado_em"]);
        for s in &students {
            alunos.push(vec![
                Cell::text(&s.matricula),
                Cell::text(&s.nome),
                Cell::text(s.turma.code()),
                Cell::text(&s.atualizado_em),
            ]);
        }

        let bytes = render_workbook(&[responses_to_table("respostas", &responses), alunos])?;
        write_bytes(&path, &bytes)?;

        let removed = Self::prune_old(&dir, cfg.max_backups)?;
        trace_info!(
            path = %path.display(),
            respostas = responses.len(),
            alunos = students.len(),
            removed = removed.len(),
            "xlsx snapshot written"
        );

        Ok(path)
    }

    /// Keep the newest `max_backups` snapshots (by file name), delete the rest.
    pub fn prune_old(dir: &Path, max_backups: usize) -> AppResult<Vec<PathBuf>> {
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut snapshots: Vec<PathBuf> = fs::read_dir(dir)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| {
                p.is_file()
                    && p.extension().is_some_and(|ext| ext == "xlsx")
                    && p.file_name()
                        .and_then(|n| n.to_str())
                        .is_some_and(|n| n.starts_with(SNAPSHOT_PREFIX))
            })
            .collect();

        snapshots.sort();
        snapshots.reverse();

        let mut removed = Vec::new();
        for old in snapshots.into_iter().skip(max_backups) {
            match fs::remove_file(&old) {
                Ok(()) => removed.push(old),
                Err(e) => warn!(path = %old.display(), error = %e, "could not remove old snapshot"),
            }
        }

        Ok(removed)
    }
}

/// Compress a backup using .zip
fn compress_backup(path: &Path) -> AppResult<PathBuf> {
    let zip_path = path.with_extension("zip");
    let file = fs::File::create(&zip_path)?;
    let mut zip = ZipWriter::new(file);

    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    let entry = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "almoco.db".to_string());

    let mut f = fs::File::open(path)?;
    zip.start_file(entry, options)?;
    std::io::copy(&mut f, &mut zip)?;
    zip.finish()?;

    info(format!("Compressed: {}", zip_path.display()));

    Ok(zip_path)
}
