//! Collections persisted as one JSON array per collection under `<data-dir>/tables/`.

use super::*;

fn table_path(data_dir: &std::path::Path, collection: &str) -> PathBuf {
    data_dir.join("tables").join(format!("{}.json", collection))
}

pub(super) fn load_tables_from_disk(
    data_dir: &std::path::Path,
) -> Result<HashMap<String, Vec<Record>>> {
    let mut out = HashMap::new();
    for spec in served_collections() {
        let path = table_path(data_dir, spec.collection);
        let mut rows: Vec<Record> = if path.exists() {
            let bytes = std::fs::read(&path).with_context(|| format!("read {}", path.display()))?;
            serde_json::from_slice(&bytes).with_context(|| format!("parse {}", path.display()))?
        } else {
            Vec::new()
        };
        studio::model::sort_by_recency(&mut rows);
        out.insert(spec.collection.to_string(), rows);
    }
    Ok(out)
}

pub(super) fn persist_table(
    data_dir: &std::path::Path,
    collection: &str,
    rows: &[Record],
) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(rows).context("serialize rows")?;
    write_atomic_overwrite(&table_path(data_dir, collection), &bytes)
        .with_context(|| format!("write {}.json", collection))
}

pub(super) fn write_atomic_overwrite(path: &std::path::Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create dir {}", parent.display()))?;
    }
    let tmp = path.with_extension(format!("tmp.{}", std::process::id()));
    std::fs::write(&tmp, bytes).with_context(|| format!("write {}", tmp.display()))?;
    std::fs::rename(&tmp, path)
        .with_context(|| format!("rename {} -> {}", tmp.display(), path.display()))?;
    Ok(())
}
